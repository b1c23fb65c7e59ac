use num256::Uint256;
use num_traits::Zero;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// Coin holds some amount of one currency, the amount is serialized as a
/// decimal string
#[derive(Serialize, Debug, Default, Clone, Deserialize, Eq, PartialEq, Hash)]
pub struct Coin {
    pub amount: Uint256,
    pub denom: String,
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl TryFrom<&str> for Coin {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Coin {
    type Err = String;

    /// Parses the `100darc` notation, digits followed by the denom
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let split_idx = match value.char_indices().find(|(_, c)| c.is_alphabetic()) {
            Some((idx, _)) => idx,
            None => return Err(format!("No denom in {:?}", value)),
        };
        let (amount, denom) = value.split_at(split_idx);
        if amount.is_empty() {
            return Err(format!("No amount in {:?}", value));
        }
        match amount.parse() {
            Ok(v) => Ok(Coin {
                amount: v,
                denom: denom.to_string(),
            }),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl Coin {
    pub fn new(amount: Uint256, denom: String) -> Coin {
        Coin { amount, denom }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// utility function to display a list of coins
    pub fn display_list(input: &[Coin]) -> String {
        input
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}
