//! `ChainIO` is a library for reading token state from an EVM chain.
mod reader;

pub use reader::{ChainReader, RpcChainReader};

use IERC20::IERC20Instance;

use alloy::{
    primitives::Address,
    providers::{RootProvider, fillers::FillProvider, utils::JoinedRecommendedFillers},
    sol,
};
use derive_more::derive::Deref;

/// Alias to the default provider with all recommended fillers (read-only).
pub type DefaultProvider = FillProvider<JoinedRecommendedFillers, RootProvider>;

/// A wrapper over an `IERC20` contract bound to a read-only provider.
#[derive(Debug, Clone, Deref)]
pub struct Erc20Token(IERC20Instance<DefaultProvider>);

impl Erc20Token {
    /// Create a new `Erc20Token` instance at the given contract address.
    pub const fn new_readonly(address: Address, provider: DefaultProvider) -> Self {
        Self(IERC20Instance::new(address, provider))
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}
