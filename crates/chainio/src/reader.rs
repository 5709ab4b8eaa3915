use alloy::{
    primitives::{Address, U256},
    providers::{Provider, ProviderBuilder},
    rpc::client::ClientBuilder,
};
use async_trait::async_trait;
use derive_more::Debug;
use eyre::{Result, WrapErr};
use primitives::retries::DEFAULT_RETRY_LAYER;
use url::Url;

use crate::{DefaultProvider, Erc20Token};

/// Read-only view of a single token on a single chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current head block number.
    async fn block_number(&self) -> Result<u64>;

    /// Raw token balance of `owner` at head, in the token's smallest unit.
    async fn balance_of(&self, owner: Address) -> Result<U256>;
}

/// [`ChainReader`] backed by an HTTP JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcChainReader {
    #[debug(skip)]
    provider: DefaultProvider,
    token: Erc20Token,
}

impl RpcChainReader {
    /// Connect to `rpc_url` and bind the token contract at `token_address`.
    pub fn new(rpc_url: Url, token_address: Address) -> Self {
        let client = ClientBuilder::default().layer(DEFAULT_RETRY_LAYER).http(rpc_url);
        let provider = ProviderBuilder::new().connect_client(client);
        let token = Erc20Token::new_readonly(token_address, provider.clone());
        Self { provider, token }
    }

    /// Read the token's `decimals()`.
    pub async fn decimals(&self) -> Result<u8> {
        self.token.decimals().call().await.wrap_err("failed to read token decimals")
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn block_number(&self) -> Result<u64> {
        self.provider.get_block_number().await.wrap_err("failed to fetch block number")
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.token
            .balanceOf(owner)
            .call()
            .await
            .wrap_err_with(|| format!("failed to read balance of {owner}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn word(value: u64) -> String {
        format!("0x{value:064x}")
    }

    #[tokio::test]
    async fn reads_block_number() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "eth_blockNumber" })))
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 0, "result": "0x3e8" }).to_string())
            .create_async()
            .await;

        let reader = RpcChainReader::new(Url::parse(&server.url()).unwrap(), Address::ZERO);
        assert_eq!(reader.block_number().await.unwrap(), 1000);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reads_balance_through_eth_call() {
        let mut server = Server::new_async().await;
        let token = Address::repeat_byte(0x35);
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "eth_call" })))
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 0, "result": word(42) }).to_string())
            .create_async()
            .await;

        let reader = RpcChainReader::new(Url::parse(&server.url()).unwrap(), token);
        let balance = reader.balance_of(Address::repeat_byte(1)).await.unwrap();
        assert_eq!(balance, U256::from(42u64));
    }

    #[tokio::test]
    async fn surfaces_rpc_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 0,
                    "error": { "code": -32000, "message": "execution reverted" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reader = RpcChainReader::new(Url::parse(&server.url()).unwrap(), Address::ZERO);
        let err = reader.balance_of(Address::repeat_byte(1)).await.unwrap_err();
        assert!(err.to_string().contains("failed to read balance"));
    }
}
