//! Multisig threshold keys and the aggregate signature that satisfies them.
use crate::amino::{
    encode_byte_slice, encode_bytes_field, encode_field_key, encode_varint_field, AminoPubKey,
    AminoReader, WIRE_TYPE_BYTE_LENGTH, WIRE_TYPE_VARINT,
};
use crate::error::{AminoError, MultisigError};
use crate::public_key::PublicKey;

/// A fixed size bit set, bits are stored most significant first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompactBitArray {
    extra_bits_stored: u8,
    elems: Vec<u8>,
}

impl CompactBitArray {
    pub fn new(bits: usize) -> Self {
        CompactBitArray {
            extra_bits_stored: (bits % 8) as u8,
            elems: vec![0u8; (bits + 7) / 8],
        }
    }

    /// Number of addressable bits
    pub fn size(&self) -> usize {
        if self.extra_bits_stored == 0 {
            self.elems.len() * 8
        } else {
            (self.elems.len() - 1) * 8 + usize::from(self.extra_bits_stored)
        }
    }

    /// Returns false for indices out of range
    pub fn get_index(&self, index: usize) -> bool {
        if index >= self.size() {
            return false;
        }
        self.elems[index >> 3] & (1 << (7 - (index % 8))) > 0
    }

    pub fn set_index(&mut self, index: usize, value: bool) -> Result<(), MultisigError> {
        if index >= self.size() {
            return Err(MultisigError::IndexOutOfRange {
                index,
                size: self.size(),
            });
        }
        let mask = 1u8 << (7 - (index % 8));
        if value {
            self.elems[index >> 3] |= mask;
        } else {
            self.elems[index >> 3] &= !mask;
        }
        Ok(())
    }

    /// Count of set bits strictly before `index`
    pub fn num_true_bits_before(&self, index: usize) -> usize {
        (0..index.min(self.size()))
            .filter(|i| self.get_index(*i))
            .count()
    }

    /// Count of set bits
    pub fn count(&self) -> usize {
        self.num_true_bits_before(self.size())
    }

    pub fn marshal_binary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_varint_field(1, u64::from(self.extra_bits_stored), &mut out);
        encode_bytes_field(2, &self.elems, &mut out);
        out
    }

    pub fn unmarshal_binary(bytes: &[u8]) -> Result<Self, AminoError> {
        let mut reader = AminoReader::new(bytes);
        let mut out = CompactBitArray::default();
        while !reader.is_empty() {
            match reader.read_field_key()? {
                (1, WIRE_TYPE_VARINT) => {
                    let extra = reader.read_uvarint()?;
                    if extra > 7 {
                        return Err(AminoError::InvalidKey(format!(
                            "extra bits stored {} out of range",
                            extra
                        )));
                    }
                    out.extra_bits_stored = extra as u8;
                }
                (2, WIRE_TYPE_BYTE_LENGTH) => out.elems = reader.read_byte_slice()?.to_vec(),
                (number, wire_type) => {
                    return Err(AminoError::UnexpectedField { number, wire_type })
                }
            }
        }
        if out.elems.is_empty() && out.extra_bits_stored != 0 {
            return Err(AminoError::UnexpectedEof);
        }
        Ok(out)
    }
}

/// Signatures of a subset of cosigners, ordered by cosigner index.
///
/// There is always exactly one signature per set bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisignature {
    bit_array: CompactBitArray,
    sigs: Vec<Vec<u8>>,
}

impl Multisignature {
    /// An empty multisignature for `n` cosigners
    pub fn new(n: usize) -> Self {
        Multisignature {
            bit_array: CompactBitArray::new(n),
            sigs: Vec::new(),
        }
    }

    /// Which cosigners have signed
    pub fn bit_array(&self) -> &CompactBitArray {
        &self.bit_array
    }

    /// Signatures in cosigner index order
    pub fn sigs(&self) -> &[Vec<u8>] {
        &self.sigs
    }

    /// Places `sig` at the position of cosigner `index`, replacing any
    /// signature already present for that cosigner
    pub fn add_signature(&mut self, sig: Vec<u8>, index: usize) -> Result<(), MultisigError> {
        let new_sig_index = self.bit_array.num_true_bits_before(index);
        if self.bit_array.get_index(index) {
            self.sigs[new_sig_index] = sig;
            return Ok(());
        }
        self.bit_array.set_index(index, true)?;
        self.sigs.insert(new_sig_index, sig);
        Ok(())
    }

    /// Looks up the cosigner index of `pubkey` in `keys` by exact bytes
    pub fn add_signature_from_pubkey(
        &mut self,
        sig: Vec<u8>,
        pubkey: &PublicKey,
        keys: &[PublicKey],
    ) -> Result<(), MultisigError> {
        let index = keys
            .iter()
            .position(|k| k.as_bytes() == pubkey.as_bytes())
            .ok_or(MultisigError::UnknownCosigner)?;
        self.add_signature(sig, index)
    }

    pub fn marshal_binary(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_bytes_field(1, &self.bit_array.marshal_binary(), &mut out);
        for sig in self.sigs.iter() {
            encode_field_key(2, WIRE_TYPE_BYTE_LENGTH, &mut out);
            encode_byte_slice(sig, &mut out);
        }
        out
    }

    pub fn unmarshal_binary(bytes: &[u8]) -> Result<Self, AminoError> {
        let mut reader = AminoReader::new(bytes);
        let mut bit_array = CompactBitArray::default();
        let mut sigs = Vec::new();
        while !reader.is_empty() {
            match reader.read_field_key()? {
                (1, WIRE_TYPE_BYTE_LENGTH) => {
                    bit_array = CompactBitArray::unmarshal_binary(reader.read_byte_slice()?)?
                }
                (2, WIRE_TYPE_BYTE_LENGTH) => sigs.push(reader.read_byte_slice()?.to_vec()),
                (number, wire_type) => {
                    return Err(AminoError::UnexpectedField { number, wire_type })
                }
            }
        }
        if sigs.len() != bit_array.count() {
            return Err(AminoError::LengthMismatch {
                expected: bit_array.count(),
                got: sigs.len(),
            });
        }
        Ok(Multisignature { bit_array, sigs })
    }
}

/// A `threshold` of `pubkeys` public key. JSON form is the value of a
/// `tendermint/PubKeyMultisigThreshold` object with the threshold as a
/// decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ThresholdJson", try_from = "ThresholdJson")]
pub struct MultisigThresholdPubKey {
    pub threshold: u32,
    pub pubkeys: Vec<PublicKey>,
}

impl MultisigThresholdPubKey {
    pub fn new(threshold: u32, pubkeys: Vec<PublicKey>) -> Result<Self, MultisigError> {
        if threshold == 0 || threshold as usize > pubkeys.len() {
            return Err(MultisigError::InvalidThreshold {
                threshold,
                keys: pubkeys.len(),
            });
        }
        Ok(MultisigThresholdPubKey { threshold, pubkeys })
    }

    /// Builds the aggregate from `(signer, signature)` pairs in any order
    pub fn aggregate(
        &self,
        signatures: &[(PublicKey, Vec<u8>)],
    ) -> Result<Multisignature, MultisigError> {
        let mut multisig = Multisignature::new(self.pubkeys.len());
        for (pubkey, sig) in signatures {
            multisig.add_signature_from_pubkey(sig.clone(), pubkey, &self.pubkeys)?;
        }
        Ok(multisig)
    }
}

#[derive(Serialize, Deserialize)]
struct ThresholdJson {
    threshold: String,
    pubkeys: Vec<AminoPubKey>,
}

impl From<MultisigThresholdPubKey> for ThresholdJson {
    fn from(key: MultisigThresholdPubKey) -> Self {
        ThresholdJson {
            threshold: key.threshold.to_string(),
            pubkeys: key.pubkeys.into_iter().map(AminoPubKey::Secp256k1).collect(),
        }
    }
}

impl TryFrom<ThresholdJson> for MultisigThresholdPubKey {
    type Error = String;

    fn try_from(value: ThresholdJson) -> Result<Self, Self::Error> {
        let threshold: u32 = value
            .threshold
            .parse()
            .map_err(|e| format!("invalid threshold {}", e))?;
        let mut pubkeys = Vec::with_capacity(value.pubkeys.len());
        for key in value.pubkeys {
            match key {
                AminoPubKey::Secp256k1(k) => pubkeys.push(k),
                AminoPubKey::MultisigThreshold(_) => {
                    return Err("nested multisig keys are not supported".to_string())
                }
            }
        }
        Ok(MultisigThresholdPubKey { threshold, pubkeys })
    }
}
