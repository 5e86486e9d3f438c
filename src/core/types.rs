use serde::Serialize;

/// Scalar parameters of the model that deployments may want to tune.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    /// One-off purchase costs (notary, land register, transfer tax) as a fraction of the price.
    pub transaction_cost_rate: f64,
    /// Yearly maintenance reserve as a fraction of the price.
    pub maintenance_rate: f64,
    /// Yearly investment gains that stay untaxed.
    pub tax_free_allowance: f64,
    pub capital_gains_tax_rate: f64,
    /// Loading on the expected insurance payout (profit plus administration).
    pub insurance_markup: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            transaction_cost_rate: 0.08,
            maintenance_rate: 0.002,
            tax_free_allowance: 1_000.0,
            capital_gains_tax_rate: 0.26,
            insurance_markup: 1.3,
        }
    }
}

/// One scenario to compare. Rates are in percent, e.g. `3.5` for 3.5 %.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub capital: f64,
    pub purchase_price: f64,
    pub living_area: f64,
    pub rent_per_area: f64,
    pub interest_rate: f64,
    pub term_years: u32,
    pub stock_return: f64,
    pub property_appreciation: f64,
    pub age: u32,
    pub insurance_enabled: bool,
}

/// Outcome of a term life insurance quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum InsurancePremium {
    /// Monthly premium; zero when no cover is requested or needed.
    Available { monthly: f64 },
    /// Age or term is outside what underwriting accepts.
    Unavailable,
}

impl InsurancePremium {
    pub const NONE: Self = Self::Available { monthly: 0.0 };

    /// Amount that actually lands in the monthly budget.
    pub fn monthly_cost(self) -> f64 {
        match self {
            Self::Available { monthly } if monthly > 0.0 => monthly,
            _ => 0.0,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOutcome {
    pub final_value: f64,
    /// Year in which withdrawals exhausted the portfolio, if they did.
    pub depleted_after_years: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Verdict {
    /// The rent withdrawals exhaust the portfolio; buying is the safer path.
    #[serde(rename_all = "camelCase")]
    PortfolioDepleted { after_years: u32 },
    /// Renting is cheaper every month and ends with more wealth.
    RentWins,
    /// Renting is cheaper every month but ends with less wealth.
    Mixed,
    ConsiderBuying,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub capital: f64,
    pub purchase_price: f64,
    pub living_area: f64,
    pub term_years: u32,

    pub loan_amount: f64,
    pub equity_percentage: f64,
    pub surplus_capital: f64,
    pub total_stock_capital: f64,

    // Buying
    pub monthly_loan_payment: f64,
    pub insurance_premium: InsurancePremium,
    pub transaction_costs: f64,
    pub monthly_maintenance: f64,
    pub surplus_returns: f64,
    pub total_monthly_costs: f64,
    pub net_purchase_costs: f64,

    // Renting
    pub cold_rent: f64,
    pub stock_returns: f64,
    pub net_rent_costs: f64,

    // End of term
    pub property_value: f64,
    pub surplus_stock_value: f64,
    pub total_purchase_wealth: f64,
    pub portfolio: PortfolioOutcome,

    pub monthly_savings: f64,
    pub wealth_difference: f64,
    pub future_value_savings: f64,
    pub net_future_value_savings: f64,

    pub verdict: Verdict,
}
