use log::debug;

use super::types::{
    ComparisonResult, Constants, InsurancePremium, Inputs, PortfolioOutcome, Verdict,
};

const MONTHS_PER_YEAR: u32 = 12;
const MAX_ADJUSTED_RISK: f64 = 0.80;
/// Longest horizon the yearly portfolio loop walks through.
pub const MAX_SIMULATED_YEARS: u32 = 1_000;

/// Level monthly payment that amortizes `principal` over `years`.
pub fn monthly_loan_payment(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    if principal.is_nan() || principal <= 0.0 {
        return 0.0;
    }

    if years == 0 {
        return principal;
    }

    let n = months(years);
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    if monthly_rate == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + monthly_rate).powf(n);
    finite_or_zero(principal * monthly_rate * growth / (growth - 1.0))
}

/// Probability-like risk figure the premium is priced on: bracket base risk
/// scaled by a term multiplier and capped at 80 %.
pub fn mortality_risk(age: u32, years: u32) -> f64 {
    // 25-29 sits below the under-25 bracket; kept as priced.
    let base_risk = match age {
        0..=24 => 0.05,
        25..=29 => 0.03,
        30..=34 => 0.04,
        35..=39 => 0.05,
        40..=44 => 0.06,
        45..=49 => 0.08,
        50..=54 => 0.12,
        55..=59 => 0.20,
        60..=64 => 0.35,
        _ => 0.60,
    };

    let term_multiplier = if age >= 55 {
        1.12_f64.powi(exponent(years.saturating_sub(10)))
    } else {
        1.05_f64.powi(exponent(years.saturating_sub(15)))
    };

    (base_risk * term_multiplier).min(MAX_ADJUSTED_RISK)
}

fn underwriting_declines(age: u32, years: u32) -> bool {
    let end_age = age.saturating_add(years);
    age >= 70 || end_age >= 85 || (age >= 65 && years >= 15) || (age >= 60 && years >= 25)
}

/// Monthly term life premium covering `loan_amount` until the loan is repaid.
pub fn insurance_premium(
    age: u32,
    years: u32,
    loan_amount: f64,
    constants: &Constants,
) -> InsurancePremium {
    if loan_amount.is_nan()
        || loan_amount <= 0.0
        || years == 0
        || underwriting_declines(age, years)
    {
        return InsurancePremium::Unavailable;
    }

    let expected_payout = loan_amount * mortality_risk(age, years);
    let monthly = (expected_payout * constants.insurance_markup / months(years)).round();

    InsurancePremium::Available {
        monthly: finite_or_zero(monthly).max(0.0),
    }
}

/// Quote shown next to the form before a full evaluation.
pub fn preview_insurance(inputs: &Inputs, constants: &Constants) -> InsurancePremium {
    let loan_amount = (inputs.purchase_price - inputs.capital).max(0.0);
    if loan_amount <= 0.0 {
        return InsurancePremium::NONE;
    }
    insurance_premium(inputs.age, inputs.term_years, loan_amount, constants)
}

/// Compounds the portfolio yearly and pays twelve months of the (growing)
/// withdrawal out of it after each year's growth. Horizons are cut at
/// [`MAX_SIMULATED_YEARS`].
pub fn simulate_portfolio(
    initial_capital: f64,
    annual_return_percent: f64,
    years: u32,
    monthly_withdrawal: f64,
    withdrawal_growth_percent: f64,
) -> PortfolioOutcome {
    let return_rate = annual_return_percent / 100.0;
    let withdrawal_growth = withdrawal_growth_percent / 100.0;

    let mut value = initial_capital;
    let mut withdrawal = monthly_withdrawal;

    for year in 1..=years.min(MAX_SIMULATED_YEARS) {
        value *= 1.0 + return_rate;
        withdrawal *= 1.0 + withdrawal_growth;
        value -= withdrawal * f64::from(MONTHS_PER_YEAR);

        if value < 0.0 {
            return PortfolioOutcome {
                final_value: 0.0,
                depleted_after_years: Some(year),
            };
        }
    }

    PortfolioOutcome {
        final_value: finite_or_zero(value).max(0.0),
        depleted_after_years: None,
    }
}

pub fn property_value(initial_value: f64, annual_appreciation_percent: f64, years: u32) -> f64 {
    finite_or_zero(initial_value * compound_factor(annual_appreciation_percent, years))
}

fn capital_gains_tax(gain: f64, constants: &Constants) -> f64 {
    (gain - constants.tax_free_allowance).max(0.0) * constants.capital_gains_tax_rate
}

/// Monthly share of one year's after-tax stock return on `capital`.
pub fn net_monthly_stock_return(
    capital: f64,
    annual_return_percent: f64,
    constants: &Constants,
) -> f64 {
    let gross = capital * annual_return_percent / 100.0;
    (gross - capital_gains_tax(gross, constants)) / 12.0
}

/// Future value of saving `monthly_amount` at the end of every month.
/// Non-positive rates fall back to the plain sum of deposits.
pub fn future_value(monthly_amount: f64, annual_return_percent: f64, years: u32) -> f64 {
    let n = months(years);
    let monthly_rate = annual_return_percent / 100.0 / 12.0;

    if monthly_rate > 0.0 {
        finite_or_zero(monthly_amount * ((1.0 + monthly_rate).powf(n) - 1.0) / monthly_rate)
    } else {
        monthly_amount * n
    }
}

pub fn conclude(
    portfolio: &PortfolioOutcome,
    monthly_savings: f64,
    wealth_difference: f64,
) -> Verdict {
    if let Some(after_years) = portfolio.depleted_after_years {
        Verdict::PortfolioDepleted { after_years }
    } else if monthly_savings > 0.0 && wealth_difference > 0.0 {
        Verdict::RentWins
    } else if monthly_savings > 0.0 {
        Verdict::Mixed
    } else {
        Verdict::ConsiderBuying
    }
}

/// Buy-versus-rent comparison over the loan term.
pub fn evaluate(inputs: &Inputs, constants: &Constants) -> ComparisonResult {
    let years = inputs.term_years;

    let loan_amount = inputs.purchase_price - inputs.capital;
    let equity_percentage = if inputs.purchase_price > 0.0 {
        inputs.capital / inputs.purchase_price * 100.0
    } else {
        0.0
    };
    let monthly_loan_payment = monthly_loan_payment(loan_amount, inputs.interest_rate, years);

    let surplus_capital = (-loan_amount).max(0.0);
    let total_stock_capital = inputs.capital + surplus_capital;

    let insurance_premium = if inputs.insurance_enabled && loan_amount > 0.0 {
        insurance_premium(inputs.age, years, loan_amount, constants)
    } else {
        InsurancePremium::NONE
    };

    let transaction_costs = inputs.purchase_price * constants.transaction_cost_rate;
    let monthly_maintenance = inputs.purchase_price * constants.maintenance_rate / 12.0;
    let surplus_returns = net_monthly_stock_return(surplus_capital, inputs.stock_return, constants);

    let total_monthly_costs =
        monthly_loan_payment + monthly_maintenance + insurance_premium.monthly_cost();
    let net_purchase_costs = total_monthly_costs - surplus_returns;

    let cold_rent = inputs.living_area * inputs.rent_per_area;
    let stock_returns = net_monthly_stock_return(total_stock_capital, inputs.stock_return, constants);
    let net_rent_costs = cold_rent - stock_returns;

    let property_value = property_value(inputs.purchase_price, inputs.property_appreciation, years);
    let surplus_stock_value =
        finite_or_zero(surplus_capital * compound_factor(inputs.stock_return, years));
    let total_purchase_wealth = property_value + surplus_stock_value;

    // Rent is assumed to rise with property prices.
    let portfolio = simulate_portfolio(
        total_stock_capital,
        inputs.stock_return,
        years,
        cold_rent,
        inputs.property_appreciation,
    );

    let monthly_savings = net_purchase_costs - net_rent_costs;
    let wealth_difference = portfolio.final_value - total_purchase_wealth;

    let saved_per_month = monthly_savings.abs();
    let future_value_savings = future_value(saved_per_month, inputs.stock_return, years);
    let deposits = saved_per_month * months(years);
    let net_future_value_savings =
        future_value_savings - capital_gains_tax(future_value_savings - deposits, constants);

    let verdict = conclude(&portfolio, monthly_savings, wealth_difference);
    debug!(
        "evaluated term={years}y loan={loan_amount:.2} savings={monthly_savings:.2}/m wealth_diff={wealth_difference:.2} verdict={verdict:?}"
    );

    ComparisonResult {
        capital: inputs.capital,
        purchase_price: inputs.purchase_price,
        living_area: inputs.living_area,
        term_years: years,
        loan_amount,
        equity_percentage,
        surplus_capital,
        total_stock_capital,
        monthly_loan_payment,
        insurance_premium,
        transaction_costs,
        monthly_maintenance,
        surplus_returns,
        total_monthly_costs,
        net_purchase_costs,
        cold_rent,
        stock_returns,
        net_rent_costs,
        property_value,
        surplus_stock_value,
        total_purchase_wealth,
        portfolio,
        monthly_savings,
        wealth_difference,
        future_value_savings,
        net_future_value_savings,
        verdict,
    }
}

fn months(years: u32) -> f64 {
    f64::from(years.saturating_mul(MONTHS_PER_YEAR))
}

fn compound_factor(annual_percent: f64, years: u32) -> f64 {
    (1.0 + annual_percent / 100.0).powi(exponent(years))
}

fn exponent(years: u32) -> i32 {
    i32::try_from(years).unwrap_or(i32::MAX)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
