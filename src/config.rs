//! Chain parameters shared by accounts and the transaction builder.
use crate::address::DEFAULT_PREFIX;
use crate::coin::Coin;
use crate::error::ConfigError;
use crate::hd_wallet::{DerivationPath, DEFAULT_DERIVATION_PATH};
use crate::public_key::DEFAULT_PUBKEY_PREFIX;
use crate::stdfee::StdFee;
use crate::utils::ArrayString;

pub const DEFAULT_CHAIN_ID: &str = "darchub";
pub const DEFAULT_DENOM: &str = "darc";
pub const DEFAULT_FEE: u64 = 5000;
pub const DEFAULT_GAS: u64 = 200_000;

/// Anything left out of a JSON config falls back to the DARC defaults
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: String,
    pub address_prefix: String,
    pub pubkey_prefix: String,
    pub derivation_path: String,
    pub fee_denom: String,
    pub fee_amount: u64,
    pub gas: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            address_prefix: DEFAULT_PREFIX.to_string(),
            pubkey_prefix: DEFAULT_PUBKEY_PREFIX.to_string(),
            derivation_path: DEFAULT_DERIVATION_PATH.to_string(),
            fee_denom: DEFAULT_DENOM.to_string(),
            fee_amount: DEFAULT_FEE,
            gas: DEFAULT_GAS,
        }
    }
}

impl ChainConfig {
    /// Parses and validates a JSON config
    pub fn from_json_str(json: &str) -> Result<ChainConfig, ConfigError> {
        let config: ChainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(&self.address_prefix)?;
        validate_prefix(&self.pubkey_prefix)?;
        self.path()?;
        if self.fee_denom.is_empty() {
            return Err(ConfigError::MissingDenom);
        }
        Ok(())
    }

    pub fn path(&self) -> Result<DerivationPath, ConfigError> {
        Ok(self.derivation_path.parse()?)
    }

    /// The fee charged when a transaction does not name one
    pub fn default_fee(&self) -> StdFee {
        StdFee::new(self.fee_coin(self.fee_amount), self.gas)
    }

    pub fn fee_coin(&self, amount: u64) -> Coin {
        Coin::new(amount.into(), self.fee_denom.clone())
    }
}

fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    let ok = !prefix.is_empty()
        && prefix.len() <= ArrayString::MAX_LEN
        // '1' separates the prefix from the data part
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || (c.is_ascii_digit() && c != '1'));
    if !ok {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChainConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.address_prefix, "darc");
        assert_eq!(config.pubkey_prefix, "darcpub");
        assert_eq!(config.path().unwrap(), DerivationPath::default());
        assert_eq!(
            serde_json::to_value(config.default_fee()).unwrap(),
            json!({"amount": [{"amount": "5000", "denom": "darc"}], "gas": "200000"})
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ChainConfig::from_json_str(r#"{"address_prefix": "cosmos", "pubkey_prefix": "cosmospub", "gas": 300000}"#)
                .unwrap();
        assert_eq!(config.address_prefix, "cosmos");
        assert_eq!(config.gas, 300_000);
        assert_eq!(config.fee_denom, "darc");
        assert_eq!(config.chain_id, DEFAULT_CHAIN_ID);
    }

    #[test]
    fn invalid_configs() {
        for bad in [
            r#"{"address_prefix": "Darc"}"#,
            r#"{"address_prefix": ""}"#,
            r#"{"pubkey_prefix": "darc pub"}"#,
            r#"{"address_prefix": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}"#,
            r#"{"address_prefix": "darc1"}"#,
        ]
        .iter()
        {
            match ChainConfig::from_json_str(bad) {
                Err(ConfigError::InvalidPrefix(_)) => {}
                other => panic!("{} gave {:?}", bad, other),
            }
        }
        match ChainConfig::from_json_str(r#"{"derivation_path": "44'/118'"}"#) {
            Err(ConfigError::InvalidPath(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match ChainConfig::from_json_str(r#"{"fee_denom": ""}"#) {
            Err(ConfigError::MissingDenom) => {}
            other => panic!("unexpected {:?}", other),
        }
        match ChainConfig::from_json_str("{") {
            Err(ConfigError::JsonError(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
