use crate::stdtx::{StdTx, TxEnvelope};

/// How long a node holds the broadcast request open
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// return right after the mempool check
    #[default]
    Sync,
    /// return immediately
    Async,
    /// wait until the transaction is committed in a block
    Block,
}

/// Body of a `POST /txs` request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BroadcastRequest {
    pub tx: StdTx,
    pub mode: BroadcastMode,
}

impl BroadcastRequest {
    pub fn new(tx: StdTx, mode: BroadcastMode) -> Self {
        BroadcastRequest { tx, mode }
    }

    /// The same request with the transaction wrapped in its
    /// `cosmos-sdk/StdTx` envelope
    pub fn to_envelope_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        Ok(serde_json::json!({
            "tx": serde_json::to_value(TxEnvelope::StdTx(self.tx.clone()))?,
            "mode": self.mode,
        }))
    }
}
