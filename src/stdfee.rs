use crate::coin::Coin;
use num256::Uint256;

/// StdFee includes the amount of coins paid in fees and the maximum
/// gas to be used by the transaction. The ratio yields an effective "gasprice",
/// which must be above some miminum to be accepted into the mempool.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Eq, PartialEq, Hash)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: Uint256,
}

impl StdFee {
    /// A fee paid in a single coin
    pub fn new(amount: Coin, gas: u64) -> StdFee {
        StdFee {
            amount: vec![amount],
            gas: gas.into(),
        }
    }
}

#[test]
fn fee_json() {
    let fee = StdFee::new(Coin::new(5000u32.into(), "darc".to_string()), 200_000);
    assert_eq!(
        serde_json::to_value(&fee).unwrap(),
        json!({"amount": [{"amount": "5000", "denom": "darc"}], "gas": "200000"})
    );
}
