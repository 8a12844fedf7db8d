//! Local private key accounts

use std::fmt;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, TxKind};
use alloy::signers::local::PrivateKeySigner;
use eyre::{Context, Result};

use super::SignedPayload;
use crate::error::RescueError;
use crate::types::TransactionIntent;

/// An account whose key lives in this process
pub struct LocalAccount {
    signer: PrivateKeySigner,
    address: Address,
}

impl LocalAccount {
    /// Create an account from a private key hex string
    ///
    /// # Arguments
    ///
    /// * `private_key` - Hex-encoded private key (with or without 0x prefix)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let account = LocalAccount::from_private_key("0x...")?;
    /// ```
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self> {
        let key = private_key.as_ref().trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner = key.parse().context("Failed to parse private key")?;

        Ok(Self::from_signer(signer))
    }

    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self { signer, address }
    }

    /// Returns the account's EVM address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `intent` as an EIP-155 legacy transaction
    pub fn sign(&self, intent: &TransactionIntent) -> Result<SignedPayload, RescueError> {
        if intent.from != self.address {
            return Err(RescueError::Signing {
                kind: intent.kind,
                reason: format!("intent belongs to {}, not {}", intent.from, self.address),
            });
        }
        if intent.gas_limit == 0 || intent.gas_price == 0 {
            return Err(RescueError::Signing {
                kind: intent.kind,
                reason: "gas limit and gas price must be non-zero".to_string(),
            });
        }

        let mut tx = TxLegacy {
            chain_id: Some(intent.chain_id),
            nonce: intent.nonce,
            gas_price: intent.gas_price,
            gas_limit: intent.gas_limit,
            to: TxKind::Call(intent.to),
            value: intent.value,
            input: intent.data.clone(),
        };

        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| RescueError::Signing {
                kind: intent.kind,
                reason: e.to_string(),
            })?;

        let envelope = TxEnvelope::Legacy(tx.into_signed(signature));

        Ok(SignedPayload {
            kind: intent.kind,
            hash: *envelope.tx_hash(),
            raw: envelope.encoded_2718().into(),
        })
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
