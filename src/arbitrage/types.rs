use bigdecimal::BigDecimal;
use serde::Serialize;

/// Thresholds governing the pre-flight decision.
#[derive(Debug, Clone)]
pub struct PreflightConfig {
    /// Minimum net profit (ETH) required to proceed.
    pub min_profit_eth: BigDecimal,
    /// Conservative haircut applied to each quoted leg (fraction).
    pub slippage_tolerance: BigDecimal,
    /// Ceiling for the gas estimate; also the fallback when estimation fails.
    pub max_gas_limit: u64,
}

/// Outcome of the pre-flight profitability check.
///
/// Estimate fields are `None` when the check aborted before they were
/// computed (e.g. a router quote failed).
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub expected_profit_eth: Option<f64>,
    pub estimated_gas: Option<u64>,
    pub gas_cost_eth: Option<f64>,
    pub net_profit_eth: Option<f64>,
    pub proceed: bool,
    pub reason: String,
}

impl PreflightReport {
    /// A non-proceeding report carrying only the failure reason.
    pub fn abort(reason: impl Into<String>) -> Self {
        Self {
            expected_profit_eth: None,
            estimated_gas: None,
            gas_cost_eth: None,
            net_profit_eth: None,
            proceed: false,
            reason: reason.into(),
        }
    }
}
