//! Pre-flight profitability check.
//!
//! Quotes the two swap legs, estimates gas for the flash-loan call and
//! folds everything into a proceed/no-proceed decision. Query failures
//! never escape as errors; they become a non-proceeding report whose
//! reason names the failing leg. No retries.

use bigdecimal::{BigDecimal, ToPrimitive};
use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use tracing::warn;

use super::types::{PreflightConfig, PreflightReport};
use crate::dex::Router;
use crate::flashloan::Arbitrageur;
use crate::models::SwapRoute;
use crate::utils::{apply_slippage, wei_to_eth};

/// Run the full pre-flight sequence for a two-leg arbitrage:
/// `borrow_token` is swapped along `route_out` on `router_out`, and the
/// proceeds are swapped back along `route_back` on `router_back`.
pub async fn run_preflight(
    arb: &Arbitrageur,
    router_out: &Router,
    router_back: &Router,
    borrow_token: Address,
    borrow_amount: U256,
    route_out: &SwapRoute,
    route_back: &SwapRoute,
    cfg: &PreflightConfig,
) -> PreflightReport {
    // The second leg must start where the first one ends.
    if route_out.output_token() != route_back.path.first().copied() {
        return PreflightReport::abort(format!(
            "route mismatch: {} does not feed into {}",
            route_out.label, route_back.label
        ));
    }

    // Leg 1: borrow asset -> intermediate asset.
    let leg1_out = match router_out.amount_out(borrow_amount, &route_out.path).await {
        Ok(out) => out,
        Err(e) => {
            return PreflightReport::abort(format!(
                "getAmountsOut failed on {} ({}): {e}",
                router_out.name(),
                route_out.label
            ));
        }
    };
    let leg1_out = apply_slippage(leg1_out, &cfg.slippage_tolerance);

    // Leg 2: intermediate asset back to the borrow/reference asset.
    let leg2_out = match router_back.amount_out(leg1_out, &route_back.path).await {
        Ok(out) => out,
        Err(e) => {
            return PreflightReport::abort(format!(
                "getAmountsOut failed on {} ({}): {e}",
                router_back.name(),
                route_back.label
            ));
        }
    };
    let reference_out = apply_slippage(leg2_out, &cfg.slippage_tolerance);

    let expected_profit_eth = wei_to_eth(reference_out) - wei_to_eth(borrow_amount);

    // Gas estimate via simulated call; on failure fall back to the ceiling
    // as a conservative bound instead of aborting.
    let estimated_gas = match arb
        .flashloan_call(borrow_token, borrow_amount)
        .estimate_gas()
        .await
    {
        Ok(gas) => clamp_gas(gas, cfg.max_gas_limit),
        Err(e) => {
            warn!(error = %e, "[PREFLIGHT] gas estimation failed, assuming gas ceiling");
            cfg.max_gas_limit
        }
    };

    let gas_price = match arb.client().get_gas_price().await {
        Ok(price) => price,
        Err(e) => return PreflightReport::abort(format!("gas price query failed: {e}")),
    };
    let gas_cost_eth = wei_to_eth(U256::from(estimated_gas) * gas_price);

    decide(
        expected_profit_eth,
        estimated_gas,
        gas_cost_eth,
        &cfg.min_profit_eth,
    )
}

/// Clamp a gas estimate to the configured ceiling.
pub fn clamp_gas(estimate: U256, max_gas_limit: u64) -> u64 {
    if estimate > U256::from(max_gas_limit) {
        max_gas_limit
    } else {
        estimate.as_u64()
    }
}

/// Turn the computed numbers into a proceed/no-proceed report. Pure.
pub fn decide(
    expected_profit_eth: BigDecimal,
    estimated_gas: u64,
    gas_cost_eth: BigDecimal,
    min_profit_eth: &BigDecimal,
) -> PreflightReport {
    let net = &expected_profit_eth - &gas_cost_eth;

    let (proceed, reason) = if net <= BigDecimal::from(0) {
        (
            false,
            format!("net loss: {net} ETH (profit {expected_profit_eth} - gas {gas_cost_eth})"),
        )
    } else if net < *min_profit_eth {
        (
            false,
            format!("net profit {net} ETH below minimum {min_profit_eth} ETH"),
        )
    } else {
        (
            true,
            format!("net profit {net} ETH clears minimum {min_profit_eth} ETH"),
        )
    };

    PreflightReport {
        expected_profit_eth: expected_profit_eth.to_f64(),
        estimated_gas: Some(estimated_gas),
        gas_cost_eth: gas_cost_eth.to_f64(),
        net_profit_eth: net.to_f64(),
        proceed,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn net_loss_rejects() {
        // profit 0.01 ETH, gas 0.02 ETH
        let report = decide(dec("0.01"), 300_000, dec("0.02"), &dec("0.001"));
        assert!(!report.proceed);
        assert!(report.reason.contains("net loss"));
        assert_eq!(report.net_profit_eth, Some(-0.01));
    }

    #[test]
    fn profit_below_minimum_rejects() {
        // net profit 0.0005 ETH, minimum 0.001 ETH
        let report = decide(dec("0.0015"), 300_000, dec("0.001"), &dec("0.001"));
        assert!(!report.proceed);
        assert!(report.reason.contains("below minimum"));
    }

    #[test]
    fn profit_above_minimum_proceeds() {
        let report = decide(dec("0.05"), 300_000, dec("0.01"), &dec("0.001"));
        assert!(report.proceed);
        assert_eq!(report.net_profit_eth, Some(0.04));
        assert_eq!(report.estimated_gas, Some(300_000));
    }

    #[test]
    fn profit_exactly_at_minimum_proceeds() {
        let report = decide(dec("0.011"), 300_000, dec("0.01"), &dec("0.001"));
        assert!(report.proceed);
    }

    #[test]
    fn zero_net_is_a_loss() {
        let report = decide(dec("0.01"), 300_000, dec("0.01"), &dec("0.001"));
        assert!(!report.proceed);
        assert!(report.reason.contains("net loss"));
    }

    #[test]
    fn gas_estimate_clamped_to_ceiling() {
        assert_eq!(clamp_gas(U256::from(2_500_000u64), 1_000_000), 1_000_000);
        assert_eq!(clamp_gas(U256::from(450_000u64), 1_000_000), 450_000);
        assert_eq!(clamp_gas(U256::from(1_000_000u64), 1_000_000), 1_000_000);
    }

    #[tokio::test]
    async fn router_query_failure_rejects_with_context() {
        // Nothing listens on this port, so the very first quote fails and
        // the report must carry the failing leg's label.
        let (arb, uniswap, sushiswap, weth, dai) = offline_handles();
        let cfg = PreflightConfig {
            min_profit_eth: dec("0.001"),
            slippage_tolerance: dec("0.005"),
            max_gas_limit: 1_000_000,
        };
        let route_out = SwapRoute::new("weth->dai", vec![weth, dai]);
        let route_back = SwapRoute::new("dai->weth", vec![dai, weth]);

        let report = run_preflight(
            &arb,
            &uniswap,
            &sushiswap,
            weth,
            U256::from(10u64.pow(18)),
            &route_out,
            &route_back,
            &cfg,
        )
        .await;

        assert!(!report.proceed);
        assert!(report.reason.contains("getAmountsOut failed on uniswap"));
        assert!(report.reason.contains("weth->dai"));
        assert!(report.expected_profit_eth.is_none());
    }

    #[tokio::test]
    async fn mismatched_routes_reject_before_any_query() {
        let (arb, uniswap, sushiswap, weth, dai) = offline_handles();
        let cfg = PreflightConfig {
            min_profit_eth: dec("0.001"),
            slippage_tolerance: dec("0.005"),
            max_gas_limit: 1_000_000,
        };
        // Second leg starts from WETH instead of DAI.
        let route_out = SwapRoute::new("weth->dai", vec![weth, dai]);
        let route_back = SwapRoute::new("weth->weth", vec![weth, weth]);

        let report = run_preflight(
            &arb,
            &uniswap,
            &sushiswap,
            weth,
            U256::from(10u64.pow(18)),
            &route_out,
            &route_back,
            &cfg,
        )
        .await;

        assert!(!report.proceed);
        assert!(report.reason.contains("route mismatch"));
    }

    /// Handles bound to a dead local endpoint; construction never touches
    /// the network.
    fn offline_handles() -> (Arbitrageur, Router, Router, Address, Address) {
        use ethers::middleware::SignerMiddleware;
        use ethers::providers::{Http, Provider};
        use ethers::signers::LocalWallet;
        use std::sync::Arc;

        let provider = Provider::<Http>::try_from("http://127.0.0.1:1").unwrap();
        let wallet: LocalWallet =
            "0000000000000000000000000000000000000000000000000000000000000001"
                .parse()
                .unwrap();
        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        let weth: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
            .parse()
            .unwrap();
        let dai: Address = "0x6B175474E89094C44Da98b954EedeAC495271d0F"
            .parse()
            .unwrap();
        let router_a: Address = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D"
            .parse()
            .unwrap();
        let router_b: Address = "0xd9e1CE17f2641f24aE83637ab66a2cca9C378B9F"
            .parse()
            .unwrap();
        let contract: Address = "0x0000000000000000000000000000000000000042"
            .parse()
            .unwrap();

        let arb = Arbitrageur::attach(contract, client.clone());
        let uniswap = Router::new("uniswap", router_a, client.clone());
        let sushiswap = Router::new("sushiswap", router_b, client);
        (arb, uniswap, sushiswap, weth, dai)
    }

    #[test]
    fn abort_report_carries_reason_only() {
        let report = PreflightReport::abort("getAmountsOut failed on uniswap (weth->dai): timeout");
        assert!(!report.proceed);
        assert!(report.reason.contains("uniswap"));
        assert!(report.expected_profit_eth.is_none());
        assert!(report.estimated_gas.is_none());
        assert!(report.net_profit_eth.is_none());
    }
}
