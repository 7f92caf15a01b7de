//! Returns estimate with local fallback
//!
//! The authoritative figures come from the backend `calculate-returns` call. When that call
//! fails the local projection is shown instead, tagged so the caller can label it.

use crate::error::CalcError;
use crate::projection::{project_returns, ProjectionInputs, ProjectionResult};
use serde::Serialize;

/// Anything that can answer a `calculate-returns` request
pub trait ReturnsSource {
    fn calculate_returns(&self, inputs: &ProjectionInputs) -> Result<ProjectionResult, CalcError>;
}

/// In-process projection
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalReturns;

impl ReturnsSource for LocalReturns {
    fn calculate_returns(&self, inputs: &ProjectionInputs) -> Result<ProjectionResult, CalcError> {
        project_returns(inputs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub source: EstimateSource,
    pub result: ProjectionResult,
}

/// Tries `remote` once, then falls back to the local projection
pub struct FallbackEstimator<R> {
    remote: R,
}

impl<R: ReturnsSource> FallbackEstimator<R> {
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    pub fn estimate(&self, inputs: &ProjectionInputs) -> Result<Estimate, CalcError> {
        match self.remote.calculate_returns(inputs) {
            Ok(result) => Ok(Estimate { source: EstimateSource::Remote, result }),
            Err(e) => {
                log::warn!("Remote returns calculation failed, using local projection: {}", e);
                Ok(Estimate { source: EstimateSource::Local, result: project_returns(inputs)? })
            }
        }
    }
}
