//! Turns messages into signed, broadcastable transactions.
//!
//! The flow is `build_sign_msg` to fix the payload, then either `sign` for
//! a single key account, or `build` followed by one `sign_tx` per cosigner
//! and a final `multisign` for a threshold account.
use crate::address::Address;
use crate::amino::AminoPubKey;
use crate::base_req::BaseReq;
use crate::coin::Coin;
use crate::config::ChainConfig;
use crate::error::TxError;
use crate::msg::Msg;
use crate::msg_builder::{MsgInput, MsgRegistry};
use crate::multisig::{MultisigThresholdPubKey, Multisignature};
use crate::private_key::PrivateKey;
use crate::signature::StdSignature;
use crate::stdfee::StdFee;
use crate::stdsignmsg::StdSignMsg;
use crate::stdtx::StdTx;

/// Everything besides the messages that goes into a sign payload. Fee and
/// gas fall back to the chain config, the rest is required.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TxInfo {
    pub chain_id: Option<String>,
    pub account_number: Option<u64>,
    pub sequence: Option<u64>,
    pub fee: Option<Coin>,
    pub gas: Option<u64>,
    pub memo: String,
}

impl TxInfo {
    pub fn new(chain_id: &str, account_number: u64, sequence: u64) -> TxInfo {
        TxInfo {
            chain_id: Some(chain_id.to_string()),
            account_number: Some(account_number),
            sequence: Some(sequence),
            ..Default::default()
        }
    }

    fn chain_id(&self) -> Result<&str, TxError> {
        match self.chain_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(TxError::MissingField("chainId")),
        }
    }

    fn account_number(&self) -> Result<u64, TxError> {
        self.account_number
            .ok_or(TxError::MissingField("accountNumber"))
    }

    fn sequence(&self) -> Result<u64, TxError> {
        self.sequence.ok_or(TxError::MissingField("sequence"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    config: ChainConfig,
    registry: MsgRegistry,
}

impl TxBuilder {
    pub fn new(config: ChainConfig, registry: MsgRegistry) -> Self {
        TxBuilder { config, registry }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn registry(&self) -> &MsgRegistry {
        &self.registry
    }

    /// Tx info on the configured chain
    pub fn tx_info(&self, account_number: u64, sequence: u64) -> TxInfo {
        TxInfo::new(&self.config.chain_id, account_number, sequence)
    }

    pub fn build_msg(&self, input: MsgInput) -> Result<Msg, TxError> {
        self.registry.build(input)
    }

    fn fee(&self, info: &TxInfo) -> StdFee {
        let amount = match &info.fee {
            Some(coin) => coin.clone(),
            None => self.config.fee_coin(self.config.fee_amount),
        };
        StdFee::new(amount, info.gas.unwrap_or(self.config.gas))
    }

    /// Assembles the payload that every signer signs
    pub fn build_sign_msg(&self, msgs: Vec<Msg>, info: &TxInfo) -> Result<StdSignMsg, TxError> {
        if msgs.is_empty() {
            return Err(TxError::MissingField("msgs"));
        }
        for msg in msgs.iter() {
            if !self.registry.contains(msg.kind()) {
                return Err(TxError::UnregisteredMessageType(
                    msg.kind().type_tag().to_string(),
                ));
            }
        }
        Ok(StdSignMsg {
            chain_id: info.chain_id()?.to_string(),
            account_number: info.account_number()?,
            sequence: info.sequence()?,
            fee: self.fee(info),
            msgs,
            memo: info.memo.clone(),
        })
    }

    /// The unsigned transaction, to be passed around to cosigners
    pub fn build(&self, sign_msg: &StdSignMsg) -> StdTx {
        StdTx::unsigned(sign_msg)
    }

    /// Signature of `key` over `sign_msg`, paired with the key's public half
    pub fn create_signature(
        &self,
        sign_msg: &StdSignMsg,
        key: &PrivateKey,
    ) -> Result<StdSignature, TxError> {
        let bytes = sign_msg.to_bytes()?;
        trace!("Signing {}", String::from_utf8_lossy(&bytes));
        let signature = key.sign_bytes(&bytes)?;
        Ok(StdSignature::new(key.to_public_key()?, signature.to_vec()))
    }

    /// A transaction signed by a single key
    pub fn sign(&self, sign_msg: &StdSignMsg, key: &PrivateKey) -> Result<StdTx, TxError> {
        debug!(
            "Signing {} msgs on {} account {} sequence {}",
            sign_msg.msgs.len(),
            sign_msg.chain_id,
            sign_msg.account_number,
            sign_msg.sequence
        );
        let mut tx = StdTx::unsigned(sign_msg);
        tx.signatures = vec![self.create_signature(sign_msg, key)?];
        Ok(tx)
    }

    /// A cosigner's signature over an unsigned transaction. The payload is
    /// rebuilt from `tx` with the account details of the multisig account
    /// taken from `info`.
    pub fn sign_tx(
        &self,
        tx: &StdTx,
        key: &PrivateKey,
        info: &TxInfo,
    ) -> Result<StdSignature, TxError> {
        let sign_msg = tx.to_sign_msg(info.chain_id()?, info.account_number()?, info.sequence()?);
        self.create_signature(&sign_msg, key)
    }

    /// Checks `signature` against `sign_msg`. A multisig signature is valid
    /// when at least `threshold` cosigners signed and every included
    /// signature verifies.
    pub fn verify(&self, sign_msg: &StdSignMsg, signature: &StdSignature) -> Result<bool, TxError> {
        let hash = sign_msg.hash()?;
        match &signature.pub_key {
            AminoPubKey::Secp256k1(key) => Ok(key.verify(&hash, &signature.signature)?),
            AminoPubKey::MultisigThreshold(key) => {
                let multisig = Multisignature::unmarshal_binary(&signature.signature)?;
                if multisig.bit_array().size() != key.pubkeys.len()
                    || multisig.sigs().len() < key.threshold as usize
                {
                    return Ok(false);
                }
                let signers = key
                    .pubkeys
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| multisig.bit_array().get_index(*i))
                    .map(|(_, k)| k);
                for (signer, sig) in signers.zip(multisig.sigs().iter()) {
                    if !signer.verify(&hash, sig)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Folds cosigner signatures into the single aggregate signature of
    /// `threshold_key`, replacing whatever `tx` carried before
    pub fn multisign(
        &self,
        threshold_key: &MultisigThresholdPubKey,
        mut tx: StdTx,
        signatures: &[StdSignature],
    ) -> Result<StdTx, TxError> {
        if signatures.is_empty() {
            return Err(TxError::SignatureState(
                "multisig transaction without cosigner signatures".to_string(),
            ));
        }
        let mut multisig = Multisignature::new(threshold_key.pubkeys.len());
        for sig in signatures {
            match &sig.pub_key {
                AminoPubKey::Secp256k1(key) => multisig.add_signature_from_pubkey(
                    sig.signature.clone(),
                    key,
                    &threshold_key.pubkeys,
                )?,
                AminoPubKey::MultisigThreshold(_) => {
                    return Err(TxError::InvalidInput(
                        "nested multisig signature".to_string(),
                    ))
                }
            }
        }
        debug!(
            "Aggregated {} of {} signatures, threshold {}",
            multisig.sigs().len(),
            threshold_key.pubkeys.len(),
            threshold_key.threshold
        );
        tx.signatures = vec![StdSignature::new(
            threshold_key.clone(),
            multisig.marshal_binary(),
        )];
        Ok(tx)
    }

    /// The `base_req` block for REST endpoints that generate transactions
    pub fn base_req(&self, from: Address, info: &TxInfo) -> Result<BaseReq, TxError> {
        let fee = self.fee(info);
        Ok(BaseReq {
            chain_id: info.chain_id()?.to_string(),
            from,
            memo: info.memo.clone(),
            gas: info.gas.unwrap_or(self.config.gas),
            account_number: info.account_number()?,
            sequence: info.sequence()?,
            fees: fee.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg_builder::{MsgKind, SendInput};
    use crate::stdtx::TxEnvelope;
    use crate::Mnemonic;

    fn send(builder: &TxBuilder, from: Address, to: Address, amount: u32) -> Msg {
        builder
            .build_msg(MsgInput::Send(SendInput {
                from,
                to,
                amount: Coin::new(amount.into(), "darc".to_string()),
            }))
            .unwrap()
    }

    #[test]
    fn recover_and_sign_send() {
        let _ = env_logger::builder().is_test(true).try_init();
        let builder = TxBuilder::default();
        let mnemonic = Mnemonic::generate().unwrap();
        let key = PrivateKey::from_phrase(&mnemonic.phrase(), "").unwrap();
        let recovered = PrivateKey::from_phrase(&mnemonic.phrase(), "").unwrap();
        assert_eq!(key, recovered);

        let a = key.to_address("darc").unwrap();
        let b = PrivateKey::from_secret(b"b").to_address("darc").unwrap();
        let info = builder.tx_info(7, 1);
        let sign_msg = builder
            .build_sign_msg(vec![send(&builder, a, b, 100)], &info)
            .unwrap();
        assert_eq!(sign_msg.chain_id, "darchub");
        assert_eq!(sign_msg.fee, builder.config().default_fee());

        let tx = builder.sign(&sign_msg, &recovered).unwrap();
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.signatures[0].signature.len(), 64);
        assert!(builder.verify(&sign_msg, &tx.signatures[0]).unwrap());

        let mut other = sign_msg.clone();
        other.sequence = 2;
        assert!(!builder.verify(&other, &tx.signatures[0]).unwrap());

        let v = serde_json::to_value(tx.into_envelope()).unwrap();
        assert_eq!(v["type"], json!("cosmos-sdk/StdTx"));
        assert_eq!(
            v["value"]["signatures"][0]["pub_key"]["type"],
            json!("tendermint/PubKeySecp256k1")
        );
        assert_eq!(v["value"]["msg"][0]["value"]["amount"][0]["amount"], json!("100"));
        let back: TxEnvelope = serde_json::from_value(v).unwrap();
        assert!(StdTx::from(back).is_signed());
    }

    #[test]
    fn sign_msg_requires_account_details() {
        let builder = TxBuilder::default();
        let a = Address::from_bytes([1; 20], "darc").unwrap();
        let msgs = vec![send(&builder, a, a, 1)];
        let cases = [
            (TxInfo::default(), "chainId"),
            (
                TxInfo {
                    chain_id: Some("darchub".to_string()),
                    sequence: Some(0),
                    ..Default::default()
                },
                "accountNumber",
            ),
            (
                TxInfo {
                    chain_id: Some("darchub".to_string()),
                    account_number: Some(0),
                    ..Default::default()
                },
                "sequence",
            ),
        ];
        for (info, field) in cases.iter() {
            match builder.build_sign_msg(msgs.clone(), info) {
                Err(TxError::MissingField(f)) => assert_eq!(f, *field),
                other => panic!("unexpected {:?}", other),
            }
        }
        match builder.build_sign_msg(vec![], &builder.tx_info(0, 0)) {
            Err(TxError::MissingField("msgs")) => {}
            other => panic!("unexpected {:?}", other),
        }
        let info = TxInfo {
            fee: Some(Coin::new(1u32.into(), "udarc".to_string())),
            gas: Some(50_000),
            memo: "note".to_string(),
            ..builder.tx_info(0, 0)
        };
        let sign_msg = builder.build_sign_msg(msgs, &info).unwrap();
        assert_eq!(sign_msg.fee.gas, crate::Uint256::from(50_000u64));
        assert_eq!(sign_msg.fee.amount[0].denom, "udarc");
        assert_eq!(sign_msg.memo, "note");
    }

    #[test]
    fn disabled_kinds_are_rejected_at_build_time() {
        let builder = TxBuilder::new(
            ChainConfig::default(),
            MsgRegistry::with_kinds(vec![MsgKind::Vote]),
        );
        let a = Address::from_bytes([1; 20], "darc").unwrap();
        let msg = MsgInput::Send(SendInput {
            from: a,
            to: a,
            amount: Coin::new(1u32.into(), "darc".to_string()),
        })
        .build()
        .unwrap();
        match builder.build_sign_msg(vec![msg], &builder.tx_info(1, 1)) {
            Err(TxError::UnregisteredMessageType(tag)) => assert_eq!(tag, "cosmos-sdk/MsgSend"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn multisign_two_of_three() {
        let builder = TxBuilder::default();
        let secrets: [&[u8]; 3] = [b"one", b"two", b"three"];
        let keys: Vec<PrivateKey> = secrets
            .iter()
            .map(|s| PrivateKey::from_secret(s))
            .collect();
        let pubkeys = keys.iter().map(|k| k.to_public_key().unwrap()).collect();
        let threshold_key = MultisigThresholdPubKey::new(2, pubkeys).unwrap();
        let multisig_address = AminoPubKey::from(threshold_key.clone())
            .address("darc")
            .unwrap();

        let to = Address::from_bytes([2; 20], "darc").unwrap();
        let info = builder.tx_info(12, 3);
        let sign_msg = builder
            .build_sign_msg(vec![send(&builder, multisig_address, to, 5)], &info)
            .unwrap();
        let unsigned = builder.build(&sign_msg);

        // signatures arrive out of cosigner order
        let sig_c = builder.sign_tx(&unsigned, &keys[2], &info).unwrap();
        let sig_a = builder.sign_tx(&unsigned, &keys[0], &info).unwrap();
        assert!(builder.verify(&sign_msg, &sig_a).unwrap());

        let tx = builder
            .multisign(&threshold_key, unsigned.clone(), &[sig_c.clone(), sig_a.clone()])
            .unwrap();
        assert_eq!(tx.signatures.len(), 1);
        let aggregate = &tx.signatures[0];
        assert_eq!(
            aggregate.pub_key,
            AminoPubKey::MultisigThreshold(threshold_key.clone())
        );
        let decoded = Multisignature::unmarshal_binary(&aggregate.signature).unwrap();
        assert!(decoded.bit_array().get_index(0));
        assert!(!decoded.bit_array().get_index(1));
        assert!(decoded.bit_array().get_index(2));
        assert_eq!(decoded.sigs(), &[sig_a.signature.clone(), sig_c.signature][..]);
        assert!(builder.verify(&sign_msg, aggregate).unwrap());

        // below threshold
        let short = builder
            .multisign(&threshold_key, unsigned.clone(), &[sig_a])
            .unwrap();
        assert!(!builder.verify(&sign_msg, &short.signatures[0]).unwrap());

        match builder.multisign(&threshold_key, unsigned.clone(), &[]) {
            Err(TxError::SignatureState(_)) => {}
            other => panic!("unexpected {:?}", other),
        }

        let outsider = PrivateKey::from_secret(b"four");
        let sig_x = builder.sign_tx(&unsigned, &outsider, &info).unwrap();
        match builder.multisign(&threshold_key, unsigned, &[sig_x]) {
            Err(TxError::MultisigError(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn base_req_uses_config_defaults() {
        let builder = TxBuilder::default();
        let from = Address::from_bytes([3; 20], "darc").unwrap();
        let req = builder.base_req(from, &builder.tx_info(7, 1)).unwrap();
        assert_eq!(req.gas, 200_000);
        assert_eq!(req.fees, vec![Coin::new(5000u32.into(), "darc".to_string())]);
        assert_eq!(req.chain_id, "darchub");
        assert!(builder.base_req(from, &TxInfo::default()).is_err());
    }
}
