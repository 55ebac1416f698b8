//! Shared data structures used throughout the application.

use ethers::types::Address;

/// An ordered token path through a UniswapV2-style router, plus a label
/// used in log lines and abort reasons.
#[derive(Debug, Clone)]
pub struct SwapRoute {
    pub label: String,
    pub path: Vec<Address>,
}

impl SwapRoute {
    pub fn new(label: impl Into<String>, path: Vec<Address>) -> Self {
        Self {
            label: label.into(),
            path,
        }
    }

    /// Final token of the path (the asset the swap pays out in).
    pub fn output_token(&self) -> Option<Address> {
        self.path.last().copied()
    }
}
