use alloy::{
    network::{AnyTransactionReceipt, ReceiptResponse},
    primitives::TxHash,
};
use serde::Serialize;

pub type TransactionReceipt = AnyTransactionReceipt;

/// Summary of a mined transaction, with the full provider receipt kept as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinedTransaction {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// `false` when the transaction was mined but reverted.
    pub status: bool,
    pub receipt: serde_json::Value,
}

impl From<&TransactionReceipt> for MinedTransaction {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            status: receipt.status(),
            receipt: serde_json::to_value(receipt).unwrap_or(serde_json::Value::Null),
        }
    }
}
