mod error;
mod regions;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ComparisonResult, Constants, InsurancePremium, Inputs, evaluate, preview_insurance,
};

pub use error::{ApiError, FieldError};
pub use regions::{CUSTOM_REGION, REGIONS, Region, find_region};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EvaluatePayload {
    #[serde(alias = "eigenkapital")]
    capital: Option<f64>,
    #[serde(alias = "kaufpreis")]
    purchase_price: Option<f64>,
    #[serde(alias = "wohnflaeche")]
    living_area: Option<f64>,
    #[serde(alias = "mietpreisQm", alias = "rentPerSqm")]
    rent_per_area: Option<f64>,
    #[serde(alias = "zinssatz")]
    interest_rate: Option<f64>,
    #[serde(alias = "laufzeit")]
    term_years: Option<u32>,
    #[serde(alias = "aktienrendite")]
    stock_return: Option<f64>,
    #[serde(alias = "immobilienWertsteigerung")]
    property_appreciation: Option<f64>,
    #[serde(alias = "alter")]
    age: Option<u32>,
    #[serde(alias = "risikoversicherung")]
    insurance: Option<bool>,
    region: Option<String>,

    transaction_cost_rate: Option<f64>,
    maintenance_rate: Option<f64>,
    tax_free_allowance: Option<f64>,
    capital_gains_tax_rate: Option<f64>,
    insurance_markup: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rentbuy",
    about = "Compare buying a home against renting and investing the difference"
)]
pub struct Cli {
    #[arg(long, default_value_t = 100_000.0, help = "Own capital available today")]
    capital: f64,
    #[arg(long, default_value_t = 340_000.0)]
    purchase_price: f64,
    #[arg(long, default_value_t = 100.0, help = "Living area in square metres")]
    living_area: f64,
    #[arg(long, default_value_t = 11.4, help = "Cold rent per square metre and month")]
    rent_per_area: f64,
    #[arg(long, default_value_t = 3.5, help = "Loan interest rate in percent")]
    interest_rate: f64,
    #[arg(long, default_value_t = 25, help = "Loan term and comparison horizon in years")]
    term_years: u32,
    #[arg(long, default_value_t = 7.0, help = "Expected annual stock return in percent")]
    stock_return: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Annual property appreciation in percent; rents are assumed to grow alike"
    )]
    property_appreciation: f64,
    #[arg(long, default_value_t = 35)]
    age: u32,
    #[arg(long, help = "Add term life insurance on the loan")]
    insurance: bool,
    #[arg(
        long,
        help = "Region preset that fills purchase price and rent from the living area"
    )]
    region: Option<String>,
    #[arg(
        long,
        default_value_t = 0.08,
        help = "One-off purchase costs as a fraction of the price, e.g. 0.08"
    )]
    transaction_cost_rate: f64,
    #[arg(
        long,
        default_value_t = 0.002,
        help = "Yearly maintenance reserve as a fraction of the price"
    )]
    maintenance_rate: f64,
    #[arg(long, default_value_t = 1_000.0, help = "Yearly tax-free investment gains")]
    tax_free_allowance: f64,
    #[arg(
        long,
        default_value_t = 0.26,
        help = "Capital gains tax rate as a fraction, e.g. 0.26"
    )]
    capital_gains_tax_rate: f64,
    #[arg(
        long,
        default_value_t = 1.3,
        help = "Insurer loading on the expected payout, e.g. 1.3 for 30 %"
    )]
    insurance_markup: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct ApiRequest {
    inputs: Inputs,
    constants: Constants,
    region: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResponse {
    region: Option<String>,
    purchase_price: f64,
    rent_per_area: f64,
    result: ComparisonResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsuranceResponse {
    loan_amount: f64,
    premium: InsurancePremium,
}

fn build_inputs(cli: Cli) -> Result<ApiRequest, ApiError> {
    let mut purchase_price = cli.purchase_price;
    let mut rent_per_area = cli.rent_per_area;

    let region = cli.region.filter(|key| key != CUSTOM_REGION);
    if let Some(key) = &region {
        let preset = find_region(key).ok_or_else(|| ApiError::UnknownRegion(key.clone()))?;
        purchase_price = preset.purchase_price_for(cli.living_area);
        rent_per_area = preset.rent_per_sqm;
    }

    let mut errors = Vec::new();
    let mut check = |failed: bool, field: &'static str, message: &str| {
        if failed {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        }
    };

    check(
        !cli.capital.is_finite() || cli.capital < 0.0,
        "capital",
        "must be >= 0",
    );
    check(
        !purchase_price.is_finite() || purchase_price <= 0.0,
        "purchasePrice",
        "must be > 0",
    );
    check(
        !cli.living_area.is_finite() || cli.living_area <= 0.0,
        "livingArea",
        "must be > 0",
    );
    check(
        !rent_per_area.is_finite() || rent_per_area < 0.0,
        "rentPerArea",
        "must be >= 0",
    );
    check(
        !(0.0..=20.0).contains(&cli.interest_rate),
        "interestRate",
        "must be between 0 and 20",
    );
    check(
        !(1..=50).contains(&cli.term_years),
        "termYears",
        "must be between 1 and 50",
    );
    check(
        !(-10.0..=30.0).contains(&cli.stock_return),
        "stockReturn",
        "must be between -10 and 30",
    );
    check(
        !(-5.0..=15.0).contains(&cli.property_appreciation),
        "propertyAppreciation",
        "must be between -5 and 15",
    );
    check(
        !(18..=85).contains(&cli.age),
        "age",
        "must be between 18 and 85",
    );

    for (field, rate) in [
        ("transactionCostRate", cli.transaction_cost_rate),
        ("maintenanceRate", cli.maintenance_rate),
        ("capitalGainsTaxRate", cli.capital_gains_tax_rate),
    ] {
        check(
            !(0.0..=1.0).contains(&rate),
            field,
            "must be a fraction between 0 and 1",
        );
    }
    check(
        !cli.tax_free_allowance.is_finite() || cli.tax_free_allowance < 0.0,
        "taxFreeAllowance",
        "must be >= 0",
    );
    check(
        !cli.insurance_markup.is_finite() || cli.insurance_markup < 1.0,
        "insuranceMarkup",
        "must be >= 1",
    );

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(ApiRequest {
        inputs: Inputs {
            capital: cli.capital,
            purchase_price,
            living_area: cli.living_area,
            rent_per_area,
            interest_rate: cli.interest_rate,
            term_years: cli.term_years,
            stock_return: cli.stock_return,
            property_appreciation: cli.property_appreciation,
            age: cli.age,
            insurance_enabled: cli.insurance,
        },
        constants: Constants {
            transaction_cost_rate: cli.transaction_cost_rate,
            maintenance_rate: cli.maintenance_rate,
            tax_free_allowance: cli.tax_free_allowance,
            capital_gains_tax_rate: cli.capital_gains_tax_rate,
            insurance_markup: cli.insurance_markup,
        },
        region,
    })
}

/// One-shot evaluation from command-line flags, rendered as pretty JSON.
pub fn run_cli(cli: Cli) -> Result<String, ApiError> {
    let request = build_inputs(cli)?;
    let response = build_evaluate_response(&request);
    Ok(serde_json::to_string_pretty(&response)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/evaluate",
            get(evaluate_get_handler).post(evaluate_post_handler),
        )
        .route(
            "/api/insurance",
            get(insurance_get_handler).post(insurance_post_handler),
        )
        .route("/api/regions", get(regions_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("rent-vs-buy HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        serde_json::json!({ "error": "Not found" }),
    )
}

async fn evaluate_get_handler(
    payload: Result<Query<EvaluatePayload>, QueryRejection>,
) -> Response {
    evaluate_handler_impl(payload.map(|Query(p)| p).map_err(ApiError::from))
}

async fn evaluate_post_handler(payload: Result<Json<EvaluatePayload>, JsonRejection>) -> Response {
    evaluate_handler_impl(payload.map(|Json(p)| p).map_err(ApiError::from))
}

fn evaluate_handler_impl(payload: Result<EvaluatePayload, ApiError>) -> Response {
    match payload.and_then(api_request_from_payload) {
        Ok(request) => json_response(StatusCode::OK, build_evaluate_response(&request)),
        Err(err) => err.into_response(),
    }
}

async fn insurance_get_handler(
    payload: Result<Query<EvaluatePayload>, QueryRejection>,
) -> Response {
    insurance_handler_impl(payload.map(|Query(p)| p).map_err(ApiError::from))
}

async fn insurance_post_handler(
    payload: Result<Json<EvaluatePayload>, JsonRejection>,
) -> Response {
    insurance_handler_impl(payload.map(|Json(p)| p).map_err(ApiError::from))
}

fn insurance_handler_impl(payload: Result<EvaluatePayload, ApiError>) -> Response {
    match payload.and_then(api_request_from_payload) {
        Ok(request) => json_response(StatusCode::OK, build_insurance_response(&request)),
        Err(err) => err.into_response(),
    }
}

async fn regions_handler() -> Response {
    json_response(StatusCode::OK, REGIONS)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, ApiError> {
    let payload = serde_json::from_str::<EvaluatePayload>(json)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: EvaluatePayload) -> Result<ApiRequest, ApiError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.capital {
        cli.capital = v;
    }
    if let Some(v) = payload.purchase_price {
        cli.purchase_price = v;
    }
    if let Some(v) = payload.living_area {
        cli.living_area = v;
    }
    if let Some(v) = payload.rent_per_area {
        cli.rent_per_area = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.term_years {
        cli.term_years = v;
    }
    if let Some(v) = payload.stock_return {
        cli.stock_return = v;
    }
    if let Some(v) = payload.property_appreciation {
        cli.property_appreciation = v;
    }
    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.insurance {
        cli.insurance = v;
    }
    if let Some(v) = payload.region {
        cli.region = Some(v);
    }

    if let Some(v) = payload.transaction_cost_rate {
        cli.transaction_cost_rate = v;
    }
    if let Some(v) = payload.maintenance_rate {
        cli.maintenance_rate = v;
    }
    if let Some(v) = payload.tax_free_allowance {
        cli.tax_free_allowance = v;
    }
    if let Some(v) = payload.capital_gains_tax_rate {
        cli.capital_gains_tax_rate = v;
    }
    if let Some(v) = payload.insurance_markup {
        cli.insurance_markup = v;
    }

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        capital: 100_000.0,
        purchase_price: 340_000.0,
        living_area: 100.0,
        rent_per_area: 11.4,
        interest_rate: 3.5,
        term_years: 25,
        stock_return: 7.0,
        property_appreciation: 2.0,
        age: 35,
        insurance: false,
        region: None,
        transaction_cost_rate: 0.08,
        maintenance_rate: 0.002,
        tax_free_allowance: 1_000.0,
        capital_gains_tax_rate: 0.26,
        insurance_markup: 1.3,
    }
}

fn build_evaluate_response(request: &ApiRequest) -> EvaluateResponse {
    EvaluateResponse {
        region: request.region.clone(),
        purchase_price: request.inputs.purchase_price,
        rent_per_area: request.inputs.rent_per_area,
        result: evaluate(&request.inputs, &request.constants),
    }
}

fn build_insurance_response(request: &ApiRequest) -> InsuranceResponse {
    let inputs = &request.inputs;
    InsuranceResponse {
        loan_amount: (inputs.purchase_price - inputs.capital).max(0.0),
        premium: preview_insurance(inputs, &request.constants),
    }
}
