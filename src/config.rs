//! Configuration loader and application settings.

use std::path::PathBuf;

use bigdecimal::BigDecimal;
use ethers::types::Address;

use crate::errors::{AppError, Result};

// Mainnet defaults; on a fork these are the same addresses, on a testnet
// every one of them must come from the environment.
const DEFAULT_WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const DEFAULT_DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
const DEFAULT_UNISWAP_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";
const DEFAULT_SUSHISWAP_ROUTER: &str = "0xd9e1CE17f2641f24aE83637ab66a2cca9C378B9F";
const DEFAULT_AAVE_PROVIDER: &str = "0xB53C1a33016B2DC2fF3653530bfF1848a515c8c5";

/// Consolidated application configuration, loaded from environment
/// variables (after `dotenvy::dotenv()` has run).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// RPC endpoint for the Ethereum-compatible node.
    pub rpc_url: String,
    /// Hex private key of the account funding and triggering the contract.
    pub private_key: String,
    /// Address of an already-deployed flash-loan contract, if any.
    pub contract_address: Option<Address>,
    /// Path to a compiled artifact (ABI + bytecode) used to deploy when no
    /// contract address is configured.
    pub contract_artifact: Option<PathBuf>,
    /// WETH token (collateral and borrow/reference asset).
    pub weth_address: Address,
    /// DAI token (intermediate asset of the two-leg swap).
    pub dai_address: Address,
    /// First-leg router (Uniswap V2).
    pub uniswap_router: Address,
    /// Second-leg router (Sushiswap).
    pub sushiswap_router: Address,
    /// Aave lending-pool address provider, passed to the constructor on deploy.
    pub aave_provider: Address,
    /// Collateral to deposit into the contract, in ETH.
    pub deposit_amount_eth: BigDecimal,
    /// Amount to flash-borrow, in ETH.
    pub borrow_amount_eth: BigDecimal,
    /// Minimum net profit (ETH) required to proceed.
    pub min_profit_eth: BigDecimal,
    /// Conservative haircut applied to every quote (fraction, e.g. 0.005).
    pub slippage_tolerance: BigDecimal,
    /// Ceiling for the gas estimate, also the fallback when estimation fails.
    pub max_gas_limit: u64,
    /// Wrap native ETH into WETH before depositing (forked/dev chains).
    pub wrap_eth: bool,
    /// Explorer URL template for the final transaction; `{tx}` is replaced
    /// with the transaction hash.
    pub explorer_tx_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let rpc_url = require("RPC_URL")?;
        let private_key = require("PRIVATE_KEY")?;

        let contract_address = match std::env::var("CONTRACT_ADDRESS") {
            Ok(raw) => Some(parse_address("CONTRACT_ADDRESS", &raw)?),
            Err(_) => None,
        };
        let contract_artifact = std::env::var("CONTRACT_ARTIFACT").ok().map(PathBuf::from);
        if contract_address.is_none() && contract_artifact.is_none() {
            return Err(AppError::Config(
                "set CONTRACT_ADDRESS to attach to a deployed contract, \
                 or CONTRACT_ARTIFACT to deploy one"
                    .into(),
            ));
        }

        let weth_address = address_or("WETH_ADDRESS", DEFAULT_WETH)?;
        let dai_address = address_or("DAI_ADDRESS", DEFAULT_DAI)?;
        let uniswap_router = address_or("UNISWAP_ROUTER", DEFAULT_UNISWAP_ROUTER)?;
        let sushiswap_router = address_or("SUSHISWAP_ROUTER", DEFAULT_SUSHISWAP_ROUTER)?;
        let aave_provider = address_or("AAVE_ADDRESS_PROVIDER", DEFAULT_AAVE_PROVIDER)?;

        let deposit_amount_eth = decimal_or("DEPOSIT_AMOUNT_ETH", "5")?;
        let borrow_amount_eth = decimal_or("BORROW_AMOUNT_ETH", "20")?;
        let min_profit_eth = decimal_or("MIN_PROFIT_ETH", "0.001")?;
        let slippage_tolerance = decimal_or("SLIPPAGE_TOLERANCE", "0.005")?;

        let max_gas_limit: u64 = std::env::var("MAX_GAS_LIMIT")
            .unwrap_or_else(|_| "1000000".into())
            .parse()
            .map_err(|e| AppError::Config(format!("MAX_GAS_LIMIT: {e}")))?;

        let wrap_eth = std::env::var("WRAP_ETH").unwrap_or_else(|_| "0".into()) == "1";
        let explorer_tx_url = std::env::var("EXPLORER_TX_URL").ok();

        Ok(Self {
            rpc_url,
            private_key,
            contract_address,
            contract_artifact,
            weth_address,
            dai_address,
            uniswap_router,
            sushiswap_router,
            aave_provider,
            deposit_amount_eth,
            borrow_amount_eth,
            min_profit_eth,
            slippage_tolerance,
            max_gas_limit,
            wrap_eth,
            explorer_tx_url,
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| AppError::Config(format!("set {key} env var")))
}

fn parse_address(key: &str, raw: &str) -> Result<Address> {
    raw.parse()
        .map_err(|e| AppError::Config(format!("{key}: invalid address {raw:?}: {e}")))
}

fn address_or(key: &str, default: &str) -> Result<Address> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.into());
    parse_address(key, &raw)
}

fn decimal_or(key: &str, default: &str) -> Result<BigDecimal> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.into());
    raw.parse()
        .map_err(|e| AppError::Config(format!("{key}: invalid decimal {raw:?}: {e}")))
}
