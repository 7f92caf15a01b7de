//! HTTP endpoints for the calculators
//!
//! Routes (JSON in, JSON out, camelCase):
//! - `POST /api/calculate-returns`   projection for a prospective purchase
//! - `POST /api/withdrawal-quote`    quote for a held investment
//! - `POST /api/investment-returns`  returns earned so far on one investment
//! - `POST /api/portfolio`           roll-up across investments
//! - `GET  /api/health`

mod payloads;

pub use payloads::{
    ErrorBody, InvestmentReturnsRequest, PortfolioRequest, WithdrawalQuoteRequest,
    WithdrawalQuoteResponse,
};

use crate::config::CalculatorConfig;
use crate::error::CalcError;
use crate::portfolio::{investment_returns, summarize_portfolio};
use crate::projection::{project_returns, ProjectionInputs};
use crate::withdrawal::{payable_amount, QuoteCalculator};
use chrono::{DateTime, Utc};
use lambda_http::http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode};
use lambda_http::{Body, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct ReturnsApi {
    config: CalculatorConfig,
    calculator: QuoteCalculator,
}

impl ReturnsApi {
    pub fn new(config: CalculatorConfig) -> Self {
        let calculator = QuoteCalculator::new(config.days_per_year);
        Self { config, calculator }
    }

    /// Handle a lambda request
    pub fn handle(&self, req: &Request) -> Response<Body> {
        let resp = self.route(req.method(), req.uri().path(), req.body().as_ref());
        log::info!("{} {} -> {}", req.method(), req.uri().path(), resp.status());
        resp
    }

    /// Dispatch on method and path
    pub fn route(&self, method: &Method, path: &str, body: &[u8]) -> Response<Body> {
        let path = path.trim_end_matches('/');
        let result = match (method, path) {
            (&Method::GET, "/api/health") => {
                Ok(json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" })))
            }
            (&Method::POST, "/api/calculate-returns") => self.calculate_returns(body),
            (&Method::POST, "/api/withdrawal-quote") => self.withdrawal_quote(body),
            (&Method::POST, "/api/investment-returns") => self.investment_returns(body),
            (&Method::POST, "/api/portfolio") => self.portfolio(body),
            _ => {
                return error_response(StatusCode::NOT_FOUND, format!("No route for {} {}", method, path));
            }
        };
        result.unwrap_or_else(|e| {
            let status = status_for(&e);
            log::warn!("{} {} failed: {}", method, path, e);
            error_response(status, e.to_string())
        })
    }

    fn calculate_returns(&self, body: &[u8]) -> Result<Response<Body>, CalcError> {
        let inputs: ProjectionInputs = parse(body)?;
        Ok(json_response(StatusCode::OK, &project_returns(&inputs)?))
    }

    fn withdrawal_quote(&self, body: &[u8]) -> Result<Response<Body>, CalcError> {
        let req: WithdrawalQuoteRequest = parse(body)?;
        let fee = req.management_fee.or(self.config.default_management_fee);
        let quote = self.calculator.quote(&req.investment, fee.as_ref(), now_or(req.now))?;
        let payable = payable_amount(&quote, self.config.negative_net_policy)?;
        Ok(json_response(
            StatusCode::OK,
            &WithdrawalQuoteResponse { quote, payable_amount: payable },
        ))
    }

    fn investment_returns(&self, body: &[u8]) -> Result<Response<Body>, CalcError> {
        let req: InvestmentReturnsRequest = parse(body)?;
        let returns =
            investment_returns(&req.investment, now_or(req.now), self.calculator.days_per_year())?;
        Ok(json_response(StatusCode::OK, &returns))
    }

    fn portfolio(&self, body: &[u8]) -> Result<Response<Body>, CalcError> {
        let req: PortfolioRequest = parse(body)?;
        let fee = req.management_fee.or(self.config.default_management_fee);
        let summary =
            summarize_portfolio(&req.investments, fee.as_ref(), now_or(req.now), &self.calculator)?;
        Ok(json_response(StatusCode::OK, &summary))
    }
}

fn now_or(now: Option<DateTime<Utc>>) -> DateTime<Utc> {
    now.unwrap_or_else(Utc::now)
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, CalcError> {
    Ok(serde_json::from_slice(body)?)
}

fn status_for(err: &CalcError) -> StatusCode {
    match err {
        CalcError::NegativeNetWithdrawal(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CalcError::Remote(_) | CalcError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    match serde_json::to_string(body) {
        Ok(payload) => {
            let mut resp = Response::new(Body::from(payload));
            *resp.status_mut() = status;
            resp.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            resp
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response<Body> {
    let payload = serde_json::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| String::from(r#"{"error":"internal error"}"#));
    let mut resp = Response::new(Body::from(payload));
    *resp.status_mut() = status;
    resp.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}
