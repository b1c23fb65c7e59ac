use crate::msg::Msg;
use crate::signature::StdSignature;
use crate::stdfee::StdFee;
use crate::stdsignmsg::StdSignMsg;
use serde::{Deserialize, Deserializer};

/// A transaction as it is broadcast, messages plus the signatures over
/// the matching [`StdSignMsg`]. `signatures` is `null` while unsigned.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct StdTx {
    pub msg: Vec<Msg>,
    pub fee: StdFee,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[serde(serialize_with = "empty_as_null")]
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<StdSignature>, D::Error> {
    Ok(Option::<Vec<StdSignature>>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_null<S: serde::Serializer>(
    signatures: &[StdSignature],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::Serialize;
    if signatures.is_empty() {
        serializer.serialize_none()
    } else {
        signatures.serialize(serializer)
    }
}

/// The `{"type": "cosmos-sdk/StdTx", "value": ...}` wrapper nodes expect
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "value")]
pub enum TxEnvelope {
    #[serde(rename = "cosmos-sdk/StdTx")]
    StdTx(StdTx),
}

impl StdTx {
    /// An unsigned transaction carrying the payload of `sign_msg`
    pub fn unsigned(sign_msg: &StdSignMsg) -> StdTx {
        StdTx {
            msg: sign_msg.msgs.clone(),
            fee: sign_msg.fee.clone(),
            signatures: Vec::new(),
            memo: sign_msg.memo.clone(),
        }
    }

    /// Recreates the payload a signer of this transaction signs
    pub fn to_sign_msg(&self, chain_id: &str, account_number: u64, sequence: u64) -> StdSignMsg {
        StdSignMsg {
            chain_id: chain_id.to_string(),
            account_number,
            sequence,
            fee: self.fee.clone(),
            msgs: self.msg.clone(),
            memo: self.memo.clone(),
        }
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    pub fn into_envelope(self) -> TxEnvelope {
        TxEnvelope::StdTx(self)
    }
}

impl From<TxEnvelope> for StdTx {
    fn from(envelope: TxEnvelope) -> StdTx {
        match envelope {
            TxEnvelope::StdTx(tx) => tx,
        }
    }
}
