//! Core library for the flashloan-arbitrage project.
//!
//! This crate wires together the pieces the binary (`main.rs`) drives
//! sequentially: configuration, router quoting, the flash-loan contract
//! client and the pre-flight profitability check.

pub mod arbitrage;
pub mod config;
pub mod dex;
pub mod errors;
pub mod flashloan;
pub mod models;
pub mod utils;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;

/// The client type every contract handle in this crate is bound to:
/// an HTTP provider wrapped with a local signing wallet.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;
