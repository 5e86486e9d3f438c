mod engine;
mod types;

pub use engine::{
    MAX_SIMULATED_YEARS, conclude, evaluate, future_value, insurance_premium,
    monthly_loan_payment, mortality_risk, net_monthly_stock_return, preview_insurance, property_value, simulate_portfolio,
};
pub use types::{
    ComparisonResult, Constants, InsurancePremium, Inputs, PortfolioOutcome, Verdict,
};
