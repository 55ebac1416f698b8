use std::sync::Arc;

use anyhow::Result;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use flashloan_arbitrage::{
    arbitrage::{PreflightConfig, run_preflight},
    config::AppConfig,
    dex::Router,
    flashloan::{self, Arbitrageur, DeployArgs},
    models::SwapRoute,
    utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let cfg = AppConfig::from_env()?;

    let provider = Provider::<Http>::try_from(cfg.rpc_url.as_str())?;
    let chain_id = provider.get_chainid().await?.as_u64();
    let wallet: LocalWallet = cfg.private_key.parse()?;
    let wallet = wallet.with_chain_id(chain_id);
    let account = wallet.address();
    let client = Arc::new(SignerMiddleware::new(provider, wallet));

    tracing::info!(chain_id, ?account, "[INIT] flashloan-arbitrage starting");

    let uniswap = Router::new("uniswap", cfg.uniswap_router, client.clone());
    let sushiswap = Router::new("sushiswap", cfg.sushiswap_router, client.clone());

    // Locate or deploy the flash-loan contract -----------------------------
    let arb = match cfg.contract_address {
        Some(address) => {
            tracing::info!(?address, "[INIT] attaching to deployed contract");
            Arbitrageur::attach(address, client.clone())
        }
        None => {
            let artifact = cfg
                .contract_artifact
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no CONTRACT_ADDRESS and no CONTRACT_ARTIFACT"))?;
            let args = DeployArgs {
                aave_provider: cfg.aave_provider,
                uniswap_router: uniswap.address(),
                sushiswap_router: sushiswap.address(),
                weth: cfg.weth_address,
                dai: cfg.dai_address,
            };
            Arbitrageur::deploy_from_artifact(&artifact, &args, client.clone()).await?
        }
    };

    // Fund the contract with collateral ------------------------------------
    let deposit_wei = utils::eth_to_wei(&cfg.deposit_amount_eth)?;
    if cfg.wrap_eth {
        flashloan::wrap_eth(client.clone(), cfg.weth_address, deposit_wei).await?;
        tracing::info!(amount_eth = %cfg.deposit_amount_eth, "[FUND] wrapped native ETH into WETH");
    }
    flashloan::approve_erc20(client.clone(), cfg.weth_address, arb.address(), deposit_wei).await?;
    arb.deposit(deposit_wei).await?;
    let contract_balance = arb.erc20_balance(cfg.weth_address).await?;
    tracing::info!(
        deposited_eth = %utils::wei_to_eth(contract_balance),
        "[FUND] collateral deposited"
    );

    // Pre-flight profitability check ----------------------------------------
    let borrow_wei = utils::eth_to_wei(&cfg.borrow_amount_eth)?;
    let route_out = SwapRoute::new("weth->dai", vec![cfg.weth_address, cfg.dai_address]);
    let route_back = SwapRoute::new("dai->weth", vec![cfg.dai_address, cfg.weth_address]);
    let preflight_cfg = PreflightConfig {
        min_profit_eth: cfg.min_profit_eth.clone(),
        slippage_tolerance: cfg.slippage_tolerance.clone(),
        max_gas_limit: cfg.max_gas_limit,
    };

    let report = run_preflight(
        &arb,
        &uniswap,
        &sushiswap,
        cfg.weth_address,
        borrow_wei,
        &route_out,
        &route_back,
        &preflight_cfg,
    )
    .await;
    tracing::info!(report = %serde_json::to_string(&report)?, "[PREFLIGHT] result");

    if !report.proceed {
        tracing::warn!(reason = %report.reason, "[PREFLIGHT] aborting, not profitable");
        return Ok(());
    }

    // Submit the flash-loan transaction -------------------------------------
    let receipt = arb.flashloan(cfg.weth_address, borrow_wei).await?;
    let tx_hash = format!("{:?}", receipt.transaction_hash);
    tracing::info!(
        tx = %tx_hash,
        block = ?receipt.block_number,
        "[EXEC] flashloan transaction confirmed"
    );
    if let Some(template) = &cfg.explorer_tx_url {
        tracing::info!(
            "View your flashloan tx here: {}",
            template.replace("{tx}", &tx_hash)
        );
    }

    Ok(())
}
