use crate::address::Address;
use crate::coin::Coin;
use crate::utils::u64_string;

/// The `base_req` block REST endpoints expect before they generate an
/// unsigned transaction on the caller's behalf
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BaseReq {
    pub chain_id: String,
    pub from: Address,
    pub memo: String,
    #[serde(with = "u64_string")]
    pub gas: u64,
    #[serde(with = "u64_string")]
    pub account_number: u64,
    #[serde(with = "u64_string")]
    pub sequence: u64,
    pub fees: Vec<Coin>,
}

/// `{"base_req": {...}}`, the request body itself
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BaseReqBody {
    pub base_req: BaseReq,
}

impl From<BaseReq> for BaseReqBody {
    fn from(base_req: BaseReq) -> Self {
        BaseReqBody { base_req }
    }
}

#[test]
fn base_req_json() {
    let from = Address::from_bytes([1; 20], "darc").unwrap();
    let body: BaseReqBody = BaseReq {
        chain_id: "darchub".to_string(),
        from,
        memo: String::new(),
        gas: 200_000,
        account_number: 7,
        sequence: 1,
        fees: vec![Coin::new(5000u32.into(), "darc".to_string())],
    }
    .into();
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({"base_req": {
            "chain_id": "darchub",
            "from": from.to_string(),
            "memo": "",
            "gas": "200000",
            "account_number": "7",
            "sequence": "1",
            "fees": [{"amount": "5000", "denom": "darc"}],
        }})
    );
}
