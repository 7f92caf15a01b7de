//! Load investment snapshots from CSV exports or JSON API dumps
//!
//! CSV columns: `id, principal, invested_at, maturity_date, rental_yield_earned,
//! current_appreciation, is_after_maturity, penalty_rate, tiers`. The `tiers` column
//! holds `year:percentage` pairs separated by `;` (e.g. `1:8;2:5;3:3`).

use super::{GraduatedPenaltyTier, Investment};
use crate::error::CalcError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One CSV row as exported
#[derive(Debug, Deserialize)]
struct InvestmentRecord {
    id: String,
    principal: f64,
    invested_at: DateTime<Utc>,
    maturity_date: Option<DateTime<Utc>>,
    #[serde(default)]
    rental_yield_earned: Option<f64>,
    #[serde(default)]
    current_appreciation: Option<f64>,
    #[serde(default)]
    is_after_maturity: Option<bool>,
    #[serde(default)]
    penalty_rate: Option<f64>,
    #[serde(default)]
    tiers: String,
}

impl From<InvestmentRecord> for Investment {
    fn from(rec: InvestmentRecord) -> Self {
        let graduated_penalties = parse_tiers(&rec.id, &rec.tiers);
        Investment {
            id: rec.id,
            principal: rec.principal,
            invested_at: rec.invested_at,
            maturity_date: rec.maturity_date,
            rental_yield_earned: rec.rental_yield_earned.unwrap_or(0.0),
            current_appreciation: rec.current_appreciation.unwrap_or(0.0),
            is_after_maturity: rec.is_after_maturity.unwrap_or(false),
            penalty_rate: rec.penalty_rate,
            graduated_penalties,
        }
    }
}

/// Parse `1:8;2:5` into tiers, skipping entries that do not parse
fn parse_tiers(id: &str, raw: &str) -> Vec<GraduatedPenaltyTier> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|entry| {
            let parsed = entry.split_once(':').and_then(|(year, pct)| {
                Some(GraduatedPenaltyTier::new(
                    year.trim().parse().ok()?,
                    pct.trim().parse().ok()?,
                ))
            });
            if parsed.is_none() {
                log::warn!("Investment {}: skipping malformed penalty tier '{}'", id, entry);
            }
            parsed
        })
        .collect()
}

/// Load investments from any CSV reader
pub fn load_investments_from_reader<R: Read>(reader: R) -> Result<Vec<Investment>, CalcError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut investments = Vec::new();
    for record in rdr.deserialize::<InvestmentRecord>() {
        investments.push(Investment::from(record?));
    }
    log::debug!("Loaded {} investments from CSV", investments.len());
    Ok(investments)
}

/// Load investments from a CSV file
pub fn load_investments(path: impl AsRef<Path>) -> Result<Vec<Investment>, CalcError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CalcError::io(path.display().to_string(), e))?;
    load_investments_from_reader(file)
}

/// Load investments from a JSON array, as returned by `GET /api/investments/my`
pub fn load_investments_json(path: impl AsRef<Path>) -> Result<Vec<Investment>, CalcError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CalcError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
