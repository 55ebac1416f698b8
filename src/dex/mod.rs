//! UniswapV2-style router integration.
//!
//! Both legs of the arbitrage are quoted through `getAmountsOut`; the
//! actual swaps run inside the flash-loan contract, so quoting is the
//! only router surface this crate needs.

use crate::SignerClient;
use crate::errors::{AppError, Result};
use ethers::{
    contract::abigen,
    types::{Address, U256},
};
use std::sync::Arc;

abigen!(
    IUniswapV2Router02,
    r#"[
        function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts)
    ]"#,
);

/// Handle for quoting swaps against one router.
#[derive(Clone)]
pub struct Router {
    name: String,
    contract: IUniswapV2Router02<SignerClient>,
}

impl Router {
    pub fn new(name: impl Into<String>, address: Address, client: Arc<SignerClient>) -> Self {
        Self {
            name: name.into(),
            contract: IUniswapV2Router02::new(address, client),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Quote `getAmountsOut` for the given input amount and path.
    pub async fn amounts_out(&self, amount_in: U256, path: &[Address]) -> Result<Vec<U256>> {
        let amounts = self
            .contract
            .get_amounts_out(amount_in, path.to_vec())
            .call()
            .await?;
        Ok(amounts)
    }

    /// Quote the final output of a path (the last element of `getAmountsOut`).
    pub async fn amount_out(&self, amount_in: U256, path: &[Address]) -> Result<U256> {
        let amounts = self.amounts_out(amount_in, path).await?;
        amounts.last().copied().ok_or_else(|| {
            AppError::Other(format!("{}: getAmountsOut returned no amounts", self.name))
        })
    }
}
