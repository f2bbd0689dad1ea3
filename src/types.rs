use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, H256, U256, U64};
use serde::Serialize;

/// Values used for one submitted hatch transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HatchReceipt {
    pub tx_hash: H256,
    pub gas: U256,
    pub gas_price: U256,
    pub nonce: U256,
}

impl HatchReceipt {
    /// Upper bound of the fee paid, in wei.
    pub fn max_fee(&self) -> U256 {
        self.gas.saturating_mul(self.gas_price)
    }
}

/// Log view of an unsigned transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSummary {
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
    pub nonce: Option<U256>,
    pub chain_id: Option<U64>,
    pub data: Option<Bytes>,
}

impl From<&TypedTransaction> for TxSummary {
    fn from(tx: &TypedTransaction) -> Self {
        TxSummary {
            from: tx.from().copied(),
            to: tx.to_addr().copied(),
            gas: tx.gas().copied(),
            gas_price: tx.gas_price(),
            nonce: tx.nonce().copied(),
            chain_id: tx.chain_id(),
            data: tx.data().cloned(),
        }
    }
}
