//! Scripted in-memory chain for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolValue;

use crate::chain::{ChainClient, ConfirmationReceipt};
use crate::error::RescueError;
use crate::fee::FeeData;
use crate::signer::{LocalAccount, SignedPayload};
use crate::types::IntentKind;

// Anvil dev keys #0 and #1
pub const COMPROMISED_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const FUNDING_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const MINED_BLOCK: u64 = 100;

pub fn compromised_account() -> LocalAccount {
    LocalAccount::from_private_key(COMPROMISED_KEY).unwrap()
}

pub fn funding_account() -> LocalAccount {
    LocalAccount::from_private_key(FUNDING_KEY).unwrap()
}

/// Every call the code under test made, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ChainId,
    BlockNumber,
    Nonce(Address),
    FeeData,
    Balance(Address),
    Simulate { from: Address, to: Address },
    Broadcast(IntentKind),
    Confirm(IntentKind),
}

pub struct MockChain {
    chain_id: u64,
    gas_price: u128,
    nonces: HashMap<Address, u64>,
    balances: HashMap<Address, U256>,
    /// Ok(return data) or Err(revert reason)
    simulation: Result<Bytes, String>,
    rejected: HashSet<IntentKind>,
    unmined: HashSet<IntentKind>,
    unreachable_receipts: HashSet<IntentKind>,
    reverted: HashSet<IntentKind>,
    calls: Mutex<Vec<Call>>,
    sent: Mutex<HashMap<TxHash, IntentKind>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            chain_id: 56,
            gas_price: 5_000_000_000,
            nonces: HashMap::new(),
            balances: HashMap::new(),
            simulation: Ok(U256::from(42u64).abi_encode().into()),
            rejected: HashSet::new(),
            unmined: HashSet::new(),
            unreachable_receipts: HashSet::new(),
            reverted: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_nonce(mut self, account: Address, nonce: u64) -> Self {
        self.nonces.insert(account, nonce);
        self
    }

    pub fn with_balance(mut self, account: Address, balance: U256) -> Self {
        self.balances.insert(account, balance);
        self
    }

    pub fn with_token_id(mut self, token_id: U256) -> Self {
        self.simulation = Ok(token_id.abi_encode().into());
        self
    }

    pub fn with_simulation_output(mut self, output: Bytes) -> Self {
        self.simulation = Ok(output);
        self
    }

    pub fn reverting_simulation(mut self, reason: &str) -> Self {
        self.simulation = Err(reason.to_string());
        self
    }

    /// Node refuses the raw transaction of `kind`
    pub fn rejecting(mut self, kind: IntentKind) -> Self {
        self.rejected.insert(kind);
        self
    }

    /// `kind` is accepted but never mined inside the window
    pub fn never_mining(mut self, kind: IntentKind) -> Self {
        self.unmined.insert(kind);
        self
    }

    /// Receipt lookups for `kind` fail at the RPC layer
    pub fn failing_receipt_lookup(mut self, kind: IntentKind) -> Self {
        self.unreachable_receipts.insert(kind);
        self
    }

    /// `kind` is mined with a failed status
    pub fn reverting_on_chain(mut self, kind: IntentKind) -> Self {
        self.reverted.insert(kind);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<IntentKind> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Broadcast(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    /// Position of the first matching call in the log
    pub fn position(&self, wanted: &Call) -> Option<usize> {
        self.calls().iter().position(|call| call == wanted)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ChainClient for MockChain {
    async fn chain_id(&self) -> Result<u64, RescueError> {
        self.record(Call::ChainId);
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> Result<u64, RescueError> {
        self.record(Call::BlockNumber);
        Ok(MINED_BLOCK)
    }

    async fn nonce(&self, account: Address) -> Result<u64, RescueError> {
        self.record(Call::Nonce(account));
        Ok(self.nonces.get(&account).copied().unwrap_or_default())
    }

    async fn fee_data(&self) -> Result<FeeData, RescueError> {
        self.record(Call::FeeData);
        Ok(FeeData {
            gas_price: self.gas_price,
        })
    }

    async fn balance(&self, account: Address) -> Result<U256, RescueError> {
        self.record(Call::Balance(account));
        Ok(self.balances.get(&account).copied().unwrap_or_default())
    }

    async fn simulate_call(
        &self,
        from: Address,
        to: Address,
        _data: Bytes,
    ) -> Result<Bytes, RescueError> {
        self.record(Call::Simulate { from, to });
        self.simulation
            .clone()
            .map_err(|reason| RescueError::SimulationReverted { reason })
    }

    async fn broadcast(&self, payload: &SignedPayload) -> Result<TxHash, RescueError> {
        self.record(Call::Broadcast(payload.kind));
        if self.rejected.contains(&payload.kind) {
            return Err(RescueError::BroadcastRejected {
                kind: payload.kind,
                reason: "nonce too low".to_string(),
            });
        }
        self.sent.lock().unwrap().insert(payload.hash, payload.kind);
        Ok(payload.hash)
    }

    async fn await_confirmation(
        &self,
        hash: TxHash,
        _min_confirmations: u64,
    ) -> Result<ConfirmationReceipt, RescueError> {
        let kind = self.sent.lock().unwrap().get(&hash).copied();
        let Some(kind) = kind else {
            return Err(RescueError::rpc("eth_getTransactionReceipt", "unknown hash"));
        };
        self.record(Call::Confirm(kind));

        if self.unreachable_receipts.contains(&kind) {
            return Err(RescueError::rpc("eth_getTransactionReceipt", "connection reset"));
        }
        if self.unmined.contains(&kind) {
            return Err(RescueError::ConfirmationTimeout {
                hash: hash.to_string(),
                attempts: 3,
            });
        }

        Ok(ConfirmationReceipt {
            hash,
            block_number: MINED_BLOCK,
            success: !self.reverted.contains(&kind),
        })
    }
}
