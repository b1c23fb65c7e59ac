//! Accounts tie keys to a chain config and track the on chain account
//! number and sequence needed to sign.
use crate::address::Address;
use crate::amino::AminoPubKey;
use crate::config::ChainConfig;
use crate::error::{AccountError, PublicKeyError, TxError};
use crate::hd_wallet::DerivationPath;
use crate::keystore::{self, ExportOptions, KeystoreV3};
use crate::mnemonic::Mnemonic;
use crate::msg::Msg;
use crate::multisig::MultisigThresholdPubKey;
use crate::private_key::PrivateKey;
use crate::public_key::PublicKey;
use crate::signature::StdSignature;
use crate::stdtx::StdTx;
use crate::tx_builder::{TxBuilder, TxInfo};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A single key account
#[derive(Debug, Clone)]
pub struct Account {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
    mnemonic: Option<Mnemonic>,
    path: DerivationPath,
    pubkey_prefix: String,
    account_number: Option<u64>,
    sequence: Option<u64>,
}

/// Exported form of an [`Account`], it includes the private key
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountJson {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mnemonic: Option<String>,
    /// base64
    pub private_key: String,
    /// base64
    pub public_key: String,
    pub address: Address,
}

impl Account {
    /// A new account behind a fresh 24 word mnemonic
    pub fn generate(config: &ChainConfig) -> Result<Account, AccountError> {
        let mnemonic = Mnemonic::generate()?;
        Account::from_mnemonic(config, mnemonic, "")
    }

    /// Restores the account of a 12 or 24 word phrase
    pub fn recover(config: &ChainConfig, phrase: &str) -> Result<Account, AccountError> {
        Account::recover_with_passphrase(config, phrase, "")
    }

    pub fn recover_with_passphrase(
        config: &ChainConfig,
        phrase: &str,
        passphrase: &str,
    ) -> Result<Account, AccountError> {
        let mnemonic = Mnemonic::from_phrase(phrase)?;
        Account::from_mnemonic(config, mnemonic, passphrase)
    }

    fn from_mnemonic(
        config: &ChainConfig,
        mnemonic: Mnemonic,
        passphrase: &str,
    ) -> Result<Account, AccountError> {
        let path: DerivationPath = config.derivation_path.parse()?;
        let private_key = PrivateKey::from_mnemonic(&mnemonic, passphrase, &path)?;
        let mut account = Account::new(config, private_key, path)?;
        account.mnemonic = Some(mnemonic);
        Ok(account)
    }

    /// Wraps an existing key, the account has no mnemonic
    pub fn from_private_key(
        config: &ChainConfig,
        private_key: PrivateKey,
    ) -> Result<Account, AccountError> {
        let path: DerivationPath = config.derivation_path.parse()?;
        Account::new(config, private_key, path)
    }

    pub fn from_keystore(
        config: &ChainConfig,
        keystore: &KeystoreV3,
        password: &str,
    ) -> Result<Account, AccountError> {
        let private_key = PrivateKey::from_keystore(keystore, password)?;
        Account::from_private_key(config, private_key)
    }

    /// Restores from keystore JSON text, see [`keystore::import_json`] for
    /// `non_strict`
    pub fn from_keystore_json(
        config: &ChainConfig,
        json: &str,
        password: &str,
        non_strict: bool,
    ) -> Result<Account, AccountError> {
        let bytes = keystore::import_json(json, password, non_strict)?;
        let private_key = PrivateKey::from_slice(&bytes)?;
        Account::from_private_key(config, private_key)
    }

    fn new(
        config: &ChainConfig,
        private_key: PrivateKey,
        path: DerivationPath,
    ) -> Result<Account, AccountError> {
        let public_key = private_key.to_public_key()?;
        let address = public_key.to_address(&config.address_prefix)?;
        Ok(Account {
            private_key,
            public_key,
            address,
            mnemonic: None,
            path,
            pubkey_prefix: config.pubkey_prefix.clone(),
            account_number: None,
            sequence: None,
        })
    }

    pub fn to_keystore(
        &self,
        password: &str,
        opts: &ExportOptions,
    ) -> Result<KeystoreV3, AccountError> {
        Ok(self.private_key.to_keystore(
            password,
            &self.address.get_prefix(),
            opts,
        )?)
    }

    /// Records the on chain state of the account, signing requires it
    pub fn update_info(&mut self, account_number: u64, sequence: u64) -> &mut Self {
        self.account_number = Some(account_number);
        self.sequence = Some(sequence);
        self
    }

    /// Bumps the sequence after a transaction was accepted. An account
    /// without chain state is left untouched.
    pub fn increment_sequence(&mut self) -> Result<(), TxError> {
        if let Some(sequence) = self.sequence {
            let next = sequence.checked_add(1).ok_or_else(|| {
                TxError::SignatureState(format!("{} past the last sequence", self.address))
            })?;
            self.sequence = Some(next);
        }
        Ok(())
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// `darcpub1addwnpep...`
    pub fn public_key_bech32(&self) -> Result<String, PublicKeyError> {
        self.public_key.to_bech32(self.pubkey_prefix.as_str())
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        self.mnemonic.as_ref()
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn account_number(&self) -> Option<u64> {
        self.account_number
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    pub fn to_json(&self) -> AccountJson {
        AccountJson {
            mnemonic: self.mnemonic.as_ref().map(|m| m.phrase()),
            private_key: STANDARD.encode(self.private_key.as_bytes()),
            public_key: STANDARD.encode(self.public_key.as_bytes()),
            address: self.address,
        }
    }

    /// Tx info carrying this account's number and sequence on the
    /// builder's chain
    pub fn tx_info(&self, builder: &TxBuilder) -> Result<TxInfo, TxError> {
        match (self.account_number, self.sequence) {
            (Some(account_number), Some(sequence)) => {
                Ok(builder.tx_info(account_number, sequence))
            }
            _ => Err(TxError::SignatureState(format!(
                "{} before update_info",
                self.address
            ))),
        }
    }

    /// Builds and signs a transaction of `msgs`
    pub fn sign(
        &self,
        builder: &TxBuilder,
        msgs: Vec<Msg>,
        memo: &str,
    ) -> Result<StdTx, TxError> {
        let info = TxInfo {
            memo: memo.to_string(),
            ..self.tx_info(builder)?
        };
        let sign_msg = builder.build_sign_msg(msgs, &info)?;
        builder.sign(&sign_msg, &self.private_key)
    }

    /// This account's cosignature on a transaction of `multisig`
    pub fn cosign(
        &self,
        builder: &TxBuilder,
        multisig: &AccountMultisig,
        tx: &StdTx,
    ) -> Result<StdSignature, TxError> {
        builder.sign_tx(tx, &self.private_key, &multisig.tx_info(builder)?)
    }
}

/// A `threshold` of `n` multisig account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMultisig {
    name: String,
    key: MultisigThresholdPubKey,
    address: Address,
    pubkey_prefix: String,
    account_number: Option<u64>,
    sequence: Option<u64>,
}

/// Exported summary of an [`AccountMultisig`], keys in bech32
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountMultisigJson {
    pub name: String,
    pub public_key: String,
    pub public_keys: Vec<String>,
    pub threshold: u32,
}

impl AccountMultisig {
    pub fn new(
        config: &ChainConfig,
        name: &str,
        threshold: u32,
        public_keys: Vec<PublicKey>,
    ) -> Result<AccountMultisig, AccountError> {
        let key = MultisigThresholdPubKey::new(threshold, public_keys)?;
        let address = AminoPubKey::from(key.clone()).address(&config.address_prefix)?;
        Ok(AccountMultisig {
            name: name.to_string(),
            key,
            address,
            pubkey_prefix: config.pubkey_prefix.clone(),
            account_number: None,
            sequence: None,
        })
    }

    /// Cosigners given as bech32 account public keys
    pub fn from_bech32_keys(
        config: &ChainConfig,
        name: &str,
        threshold: u32,
        public_keys: &[&str],
    ) -> Result<AccountMultisig, AccountError> {
        let keys = public_keys
            .iter()
            .map(|k| PublicKey::from_bech32(k))
            .collect::<Result<Vec<PublicKey>, PublicKeyError>>()?;
        AccountMultisig::new(config, name, threshold, keys)
    }

    pub fn update_info(&mut self, account_number: u64, sequence: u64) -> &mut Self {
        self.account_number = Some(account_number);
        self.sequence = Some(sequence);
        self
    }

    pub fn increment_sequence(&mut self) -> Result<(), TxError> {
        if let Some(sequence) = self.sequence {
            let next = sequence.checked_add(1).ok_or_else(|| {
                TxError::SignatureState(format!("{} past the last sequence", self.address))
            })?;
            self.sequence = Some(next);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> u32 {
        self.key.threshold
    }

    pub fn public_keys(&self) -> &[PublicKey] {
        &self.key.pubkeys
    }

    pub fn threshold_key(&self) -> &MultisigThresholdPubKey {
        &self.key
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn account_number(&self) -> Option<u64> {
        self.account_number
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// bech32 of the amino encoded threshold key
    pub fn public_key_bech32(&self) -> Result<String, PublicKeyError> {
        AminoPubKey::from(self.key.clone()).to_bech32(&self.pubkey_prefix)
    }

    pub fn to_json(&self) -> Result<AccountMultisigJson, PublicKeyError> {
        let public_keys = self
            .key
            .pubkeys
            .iter()
            .map(|k| k.to_bech32(self.pubkey_prefix.as_str()))
            .collect::<Result<Vec<String>, PublicKeyError>>()?;
        Ok(AccountMultisigJson {
            name: self.name.clone(),
            public_key: self.public_key_bech32()?,
            public_keys,
            threshold: self.key.threshold,
        })
    }

    pub fn tx_info(&self, builder: &TxBuilder) -> Result<TxInfo, TxError> {
        match (self.account_number, self.sequence) {
            (Some(account_number), Some(sequence)) => {
                Ok(builder.tx_info(account_number, sequence))
            }
            _ => Err(TxError::SignatureState(format!(
                "{} before update_info",
                self.address
            ))),
        }
    }

    /// Folds the cosigners' signatures into `tx`
    pub fn multisign(
        &self,
        builder: &TxBuilder,
        tx: StdTx,
        signatures: &[StdSignature],
    ) -> Result<StdTx, TxError> {
        builder.multisign(&self.key, tx, signatures)
    }
}
