//! JSON-RPC chain client over an alloy HTTP provider

use std::sync::Arc;

use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use alloy::transports::TransportError;

use super::{ChainClient, ConfirmationReceipt};
use crate::config::ConfirmationPolicy;
use crate::error::RescueError;
use crate::fee::FeeData;
use crate::signer::SignedPayload;

/// Type alias for the filler-less provider (nonce, gas and signing are done offline)
type ReadProvider = Arc<RootProvider<Ethereum>>;

/// Chain client talking to a single RPC endpoint
pub struct RpcChainClient {
    provider: ReadProvider,
    confirmation: ConfirmationPolicy,
}

impl RpcChainClient {
    /// Create a client for `rpc_url` with the given receipt polling window
    pub fn new(
        rpc_url: impl AsRef<str>,
        confirmation: ConfirmationPolicy,
    ) -> Result<Self, RescueError> {
        let url: Url = rpc_url
            .as_ref()
            .parse()
            .map_err(|e| RescueError::Configuration(format!("invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Ok(Self::with_provider(provider, confirmation))
    }

    /// Wrap an already connected provider
    pub fn with_provider(
        provider: RootProvider<Ethereum>,
        confirmation: ConfirmationPolicy,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            confirmation,
        }
    }
}

/// Message of a JSON-RPC error response, if the node answered with one
fn node_error(err: &TransportError) -> Option<String> {
    err.as_error_resp()
        .map(|payload| format!("{} (code {})", payload.message, payload.code))
}

impl ChainClient for RpcChainClient {
    async fn chain_id(&self) -> Result<u64, RescueError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| RescueError::rpc("eth_chainId", e))
    }

    async fn block_number(&self) -> Result<u64, RescueError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| RescueError::rpc("eth_blockNumber", e))
    }

    async fn nonce(&self, account: Address) -> Result<u64, RescueError> {
        self.provider
            .get_transaction_count(account)
            .await
            .map_err(|e| RescueError::rpc("eth_getTransactionCount", e))
    }

    async fn fee_data(&self) -> Result<FeeData, RescueError> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| RescueError::rpc("eth_gasPrice", e))?;

        Ok(FeeData { gas_price })
    }

    async fn balance(&self, account: Address) -> Result<U256, RescueError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| RescueError::rpc("eth_getBalance", e))
    }

    async fn simulate_call(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<Bytes, RescueError> {
        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);

        self.provider.call(request).await.map_err(|e| match node_error(&e) {
            // Any error response to eth_call means the execution itself failed
            Some(reason) => RescueError::SimulationReverted { reason },
            None => RescueError::rpc("eth_call", e),
        })
    }

    async fn broadcast(&self, payload: &SignedPayload) -> Result<TxHash, RescueError> {
        let pending = self
            .provider
            .send_raw_transaction(&payload.raw)
            .await
            .map_err(|e| RescueError::BroadcastRejected {
                kind: payload.kind,
                reason: node_error(&e).unwrap_or_else(|| e.to_string()),
            })?;

        Ok(*pending.tx_hash())
    }

    async fn await_confirmation(
        &self,
        hash: TxHash,
        min_confirmations: u64,
    ) -> Result<ConfirmationReceipt, RescueError> {
        let max_attempts = self.confirmation.max_attempts;
        let poll_interval = self.confirmation.poll_interval;

        for attempt in 0..max_attempts {
            let receipt: Option<TransactionReceipt> = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| RescueError::rpc("eth_getTransactionReceipt", e))?;

            if let Some(receipt) = receipt {
                let mined_at = ReceiptResponse::block_number(&receipt).unwrap_or_default();
                let head = self.block_number().await?;
                let depth = head.saturating_sub(mined_at) + 1;

                if depth >= min_confirmations {
                    return Ok(ConfirmationReceipt {
                        hash,
                        block_number: mined_at,
                        success: ReceiptResponse::status(&receipt),
                    });
                }
            }

            tracing::debug!(
                "Waiting for {} (attempt {}/{})",
                hash,
                attempt + 1,
                max_attempts
            );
            tokio::time::sleep(poll_interval).await;
        }

        Err(RescueError::ConfirmationTimeout {
            hash: hash.to_string(),
            attempts: max_attempts,
        })
    }
}
