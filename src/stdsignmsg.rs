use crate::canonical_json::to_canonical_json;
use crate::canonical_json::CanonicalJsonError;
use crate::msg::Msg;
use crate::stdfee::StdFee;
use crate::utils::{sha256, u64_string};

/// This denotes a payload that should be signed.
///
/// Contains all the important data for a successful transaction, and can
/// contain other messages with instructions regarding what to do. Every
/// number is a decimal string on the wire.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct StdSignMsg {
    /// Chain ID. Example value: "darchub"
    pub chain_id: String,
    /// Account number. Example value: 1
    #[serde(with = "u64_string")]
    pub account_number: u64,
    /// Sequence number starts with 0 and should always increase
    #[serde(with = "u64_string")]
    pub sequence: u64,
    pub fee: StdFee,
    /// A list of messages
    pub msgs: Vec<Msg>,
    /// Arbitrary message that should be part of the transaction
    pub memo: String,
}

impl StdSignMsg {
    /// This creates a bytes based message using a canonical JSON serialization
    /// format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CanonicalJsonError> {
        Ok(to_canonical_json(self)?)
    }

    /// SHA-256 of the canonical bytes, the digest that gets signed
    pub fn hash(&self) -> Result<[u8; 32], CanonicalJsonError> {
        Ok(sha256(&self.to_bytes()?))
    }
}

#[test]
fn to_bytes() {
    let std_sign_msg = StdSignMsg::default();
    // Safe enough to compare as this is canonical JSON and the representation should be always the same
    assert_eq!(String::from_utf8(std_sign_msg.to_bytes().unwrap()).unwrap(), "{\"account_number\":\"0\",\"chain_id\":\"\",\"fee\":{\"amount\":[],\"gas\":\"0\"},\"memo\":\"\",\"msgs\":[],\"sequence\":\"0\"}");
}

#[test]
fn hash_ignores_field_order() {
    use crate::coin::Coin;
    let msg = StdSignMsg {
        chain_id: "darchub".to_string(),
        account_number: 7,
        sequence: 1,
        fee: StdFee::new(Coin::new(5000u32.into(), "darc".to_string()), 200_000),
        msgs: Vec::new(),
        memo: "hi".to_string(),
    };
    let reordered: StdSignMsg = serde_json::from_value(json!({
        "sequence": "1",
        "memo": "hi",
        "msgs": [],
        "fee": {"gas": "200000", "amount": [{"denom": "darc", "amount": "5000"}]},
        "chain_id": "darchub",
        "account_number": "7",
    }))
    .unwrap();
    assert_eq!(reordered, msg);
    assert_eq!(reordered.hash().unwrap(), msg.hash().unwrap());
    assert_eq!(
        msg.hash().unwrap(),
        sha256(&msg.to_bytes().unwrap())
    );
}
