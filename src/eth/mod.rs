// src/eth/mod.rs

use async_trait::async_trait;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, H256, U256};

use crate::error::EthError;

pub mod client;
pub mod submit;

pub use client::EthClient;

/// Name of the contract method invoked every cycle.
pub const HATCH_METHOD: &str = "hatchEggs";

/// Everything the hatch loop needs from the chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HatchChain: Send + Sync {
    /// Connectivity check against the node.
    async fn client_version(&self) -> Result<String, EthError>;

    async fn estimate_hatch_gas(&self, operator: Address) -> Result<U256, EthError>;

    async fn gas_price(&self) -> Result<U256, EthError>;

    async fn nonce(&self, operator: Address) -> Result<U256, EthError>;

    /// Legacy `hatchEggs(operator)` transaction carrying exactly the given values.
    async fn build_hatch(
        &self,
        operator: Address,
        gas: U256,
        gas_price: U256,
        nonce: U256,
    ) -> Result<TypedTransaction, EthError>;

    /// Signs locally and returns the RLP-encoded signed transaction.
    async fn sign(&self, tx: &TypedTransaction) -> Result<Bytes, EthError>;

    /// Hands the signed payload to the node. Does not wait for inclusion.
    async fn send_raw(&self, raw: Bytes) -> Result<H256, EthError>;
}
