//! A small amino binary codec covering the two registered public key
//! types that take part in signing.
//!
//! Every registered concrete type is identified by a 4 byte prefix and a
//! 3 byte disambiguation derived from the SHA-256 of its registered name.
//! Struct fields are written in schema order as a uvarint key
//! `(number << 3) | wire_type` followed by either a varint or a uvarint
//! length and that many bytes. Zero valued fields are omitted.
use crate::address::{self, Address};
use crate::error::{AddressError, AminoError, PublicKeyError};
use crate::multisig::MultisigThresholdPubKey;
use crate::public_key::PublicKey;
use crate::utils::sha256;

pub const WIRE_TYPE_VARINT: u8 = 0;
pub const WIRE_TYPE_8BYTE: u8 = 1;
pub const WIRE_TYPE_BYTE_LENGTH: u8 = 2;
pub const WIRE_TYPE_4BYTE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub number: u64,
    pub wire_type: u8,
    pub repeated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: &'static str,
    pub prefix: [u8; 4],
    pub disamb: [u8; 3],
    pub fields: &'static [FieldInfo],
}

impl TypeInfo {
    /// Disambiguation bytes followed by the prefix
    pub fn disfix(&self) -> [u8; 7] {
        let mut out = [0u8; 7];
        out[..3].copy_from_slice(&self.disamb);
        out[3..].copy_from_slice(&self.prefix);
        out
    }

    fn field(&self, number: u64) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.number == number)
    }
}

const SECP256K1_INFO: TypeInfo = TypeInfo {
    name: "tendermint/PubKeySecp256k1",
    prefix: [0xEB, 0x5A, 0xE9, 0x87],
    disamb: [0xF8, 0xCC, 0xEA],
    fields: &[],
};

const MULTISIG_THRESHOLD_INFO: TypeInfo = TypeInfo {
    name: "tendermint/PubKeyMultisigThreshold",
    prefix: [0x22, 0xC1, 0xF7, 0xE2],
    disamb: [0xB4, 0x49, 0xAE],
    fields: &[
        FieldInfo {
            name: "threshold",
            number: 1,
            wire_type: WIRE_TYPE_VARINT,
            repeated: false,
        },
        FieldInfo {
            name: "pubkeys",
            number: 2,
            wire_type: WIRE_TYPE_BYTE_LENGTH,
            repeated: true,
        },
    ],
};

/// The closed set of registered concrete types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoType {
    PubKeySecp256k1,
    PubKeyMultisigThreshold,
}

impl AminoType {
    pub const ALL: [AminoType; 2] = [AminoType::PubKeySecp256k1, AminoType::PubKeyMultisigThreshold];

    pub fn info(&self) -> &'static TypeInfo {
        match self {
            AminoType::PubKeySecp256k1 => &SECP256K1_INFO,
            AminoType::PubKeyMultisigThreshold => &MULTISIG_THRESHOLD_INFO,
        }
    }

    pub fn from_prefix(prefix: &[u8]) -> Result<AminoType, AminoError> {
        if prefix.len() < 4 {
            return Err(AminoError::UnexpectedEof);
        }
        AminoType::ALL
            .iter()
            .find(|t| t.info().prefix[..] == prefix[..4])
            .copied()
            .ok_or_else(|| {
                let mut p = [0u8; 4];
                p.copy_from_slice(&prefix[..4]);
                AminoError::UnknownPrefix(p)
            })
    }

    pub fn from_name(name: &str) -> Option<AminoType> {
        AminoType::ALL.iter().find(|t| t.info().name == name).copied()
    }
}

/// Computes the disambiguation and prefix bytes for a registered name.
///
/// Leading zero bytes of the hash are skipped before each of the two parts.
pub fn name_to_disfix(name: &str) -> ([u8; 3], [u8; 4]) {
    let hash = sha256(name.as_bytes());
    let mut rest = &hash[..];
    while rest.first() == Some(&0) {
        rest = &rest[1..];
    }
    let mut disamb = [0u8; 3];
    disamb.copy_from_slice(&rest[..3]);
    rest = &rest[3..];
    while rest.first() == Some(&0) {
        rest = &rest[1..];
    }
    let mut prefix = [0u8; 4];
    prefix.copy_from_slice(&rest[..4]);
    (disamb, prefix)
}

pub fn encode_uvarint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Reads a uvarint, returning the value and the number of bytes consumed
pub fn decode_uvarint(bytes: &[u8]) -> Result<(u64, usize), AminoError> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        if i >= 10 || (i == 9 && *byte > 1) {
            return Err(AminoError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(AminoError::UnexpectedEof)
}

pub fn encode_field_key(number: u64, wire_type: u8, out: &mut Vec<u8>) {
    encode_uvarint((number << 3) | u64::from(wire_type), out)
}

/// Writes a uvarint length followed by the bytes
pub fn encode_byte_slice(bytes: &[u8], out: &mut Vec<u8>) {
    encode_uvarint(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

/// Writes a varint field, nothing at all when the value is zero
pub fn encode_varint_field(number: u64, value: u64, out: &mut Vec<u8>) {
    if value == 0 {
        return;
    }
    encode_field_key(number, WIRE_TYPE_VARINT, out);
    encode_uvarint(value, out);
}

/// Writes a length prefixed field, nothing at all when the bytes are empty
pub fn encode_bytes_field(number: u64, bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.is_empty() {
        return;
    }
    encode_field_key(number, WIRE_TYPE_BYTE_LENGTH, out);
    encode_byte_slice(bytes, out);
}

/// Cursor over an amino encoded struct body
pub struct AminoReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> AminoReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        AminoReader { buf, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn read_uvarint(&mut self) -> Result<u64, AminoError> {
        let (value, used) = decode_uvarint(&self.buf[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    /// Returns the field number and wire type of the next field
    pub fn read_field_key(&mut self) -> Result<(u64, u8), AminoError> {
        let key = self.read_uvarint()?;
        Ok((key >> 3, (key & 0x7) as u8))
    }

    pub fn read_byte_slice(&mut self) -> Result<&'a [u8], AminoError> {
        let len = self.read_uvarint()? as usize;
        let remaining = self.buf.len() - self.pos;
        if len > remaining {
            return Err(AminoError::LengthMismatch {
                expected: len,
                got: remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }
}

/// Splits registered bytes into their type and the body after the prefix
pub fn split_registered(bytes: &[u8]) -> Result<(AminoType, &[u8]), AminoError> {
    let kind = AminoType::from_prefix(bytes)?;
    Ok((kind, &bytes[4..]))
}

/// A public key as it appears in signatures and multisig descriptors,
/// either a single secp256k1 key or a threshold of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AminoPubKey {
    #[serde(rename = "tendermint/PubKeySecp256k1")]
    Secp256k1(PublicKey),
    #[serde(rename = "tendermint/PubKeyMultisigThreshold")]
    MultisigThreshold(MultisigThresholdPubKey),
}

impl From<PublicKey> for AminoPubKey {
    fn from(key: PublicKey) -> Self {
        AminoPubKey::Secp256k1(key)
    }
}

impl From<MultisigThresholdPubKey> for AminoPubKey {
    fn from(key: MultisigThresholdPubKey) -> Self {
        AminoPubKey::MultisigThreshold(key)
    }
}

impl AminoPubKey {
    pub fn amino_type(&self) -> AminoType {
        match self {
            AminoPubKey::Secp256k1(_) => AminoType::PubKeySecp256k1,
            AminoPubKey::MultisigThreshold(_) => AminoType::PubKeyMultisigThreshold,
        }
    }

    /// Prefix followed by the encoded body, no outer length prefix
    pub fn marshal_binary_bare(&self) -> Vec<u8> {
        let mut out = self.amino_type().info().prefix.to_vec();
        match self {
            AminoPubKey::Secp256k1(key) => encode_byte_slice(key.as_bytes(), &mut out),
            AminoPubKey::MultisigThreshold(key) => {
                let info = self.amino_type().info();
                encode_varint_field(info.fields[0].number, u64::from(key.threshold), &mut out);
                for pubkey in key.pubkeys.iter() {
                    encode_field_key(info.fields[1].number, info.fields[1].wire_type, &mut out);
                    encode_byte_slice(&pubkey.to_amino_bytes(), &mut out);
                }
            }
        }
        out
    }

    pub fn unmarshal_binary_bare(bytes: &[u8]) -> Result<AminoPubKey, AminoError> {
        let (kind, body) = split_registered(bytes)?;
        trace!("Decoding amino {} of {} bytes", kind.info().name, body.len());
        match kind {
            AminoType::PubKeySecp256k1 => {
                let mut reader = AminoReader::new(body);
                let key = reader.read_byte_slice()?;
                if !reader.is_empty() || key.len() != 33 {
                    return Err(AminoError::LengthMismatch {
                        expected: 34,
                        got: body.len(),
                    });
                }
                let key = PublicKey::from_slice(key)
                    .map_err(|e| AminoError::InvalidKey(e.to_string()))?;
                Ok(AminoPubKey::Secp256k1(key))
            }
            AminoType::PubKeyMultisigThreshold => {
                let info = kind.info();
                let mut reader = AminoReader::new(body);
                let mut threshold: u64 = 0;
                let mut pubkeys = Vec::new();
                while !reader.is_empty() {
                    let (number, wire_type) = reader.read_field_key()?;
                    let field = match info.field(number) {
                        Some(f) if f.wire_type == wire_type => f,
                        _ => return Err(AminoError::UnexpectedField { number, wire_type }),
                    };
                    if field.repeated {
                        match AminoPubKey::unmarshal_binary_bare(reader.read_byte_slice()?)? {
                            AminoPubKey::Secp256k1(key) => pubkeys.push(key),
                            AminoPubKey::MultisigThreshold(_) => {
                                return Err(AminoError::UnexpectedType(info.name))
                            }
                        }
                    } else {
                        threshold = reader.read_uvarint()?;
                    }
                }
                if threshold > u64::from(u32::MAX) {
                    return Err(AminoError::InvalidKey(format!(
                        "threshold {} out of range",
                        threshold
                    )));
                }
                Ok(AminoPubKey::MultisigThreshold(MultisigThresholdPubKey {
                    threshold: threshold as u32,
                    pubkeys,
                }))
            }
        }
    }

    /// The 20 address bytes, hash160 for single keys and truncated
    /// SHA-256 of the amino encoding for threshold keys
    pub fn address_bytes(&self) -> [u8; 20] {
        match self {
            AminoPubKey::Secp256k1(key) => address::single_key_address(key.as_bytes()),
            AminoPubKey::MultisigThreshold(_) => {
                address::multisig_address(&self.marshal_binary_bare())
            }
        }
    }

    pub fn address(&self, prefix: &str) -> Result<Address, AddressError> {
        Address::from_bytes(self.address_bytes(), prefix)
    }

    pub fn to_bech32(&self, hrp: &str) -> Result<String, PublicKeyError> {
        Ok(address::encode_bech32(&self.marshal_binary_bare(), hrp)?)
    }

    pub fn from_bech32(s: &str) -> Result<AminoPubKey, PublicKeyError> {
        let (_hrp, bytes) = address::decode_bech32(s)?;
        Ok(AminoPubKey::unmarshal_binary_bare(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};

    fn known_key() -> PublicKey {
        "029651a9aac4c22b27b3019aee6df746266e1ae746ee79772a6e5ead198ebd07c3"
            .parse()
            .unwrap()
    }

    fn abandon_key() -> PublicKey {
        "024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62"
            .parse()
            .unwrap()
    }

    const MULTISIG_HEX: &str = "22c1f7e208021226eb5ae98721029651a9aac4c22b27b3019aee6df746266e1ae746ee79772a6e5ead198ebd07c31226eb5ae98721024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62";

    #[test]
    fn registered_prefixes_match_names() {
        for kind in AminoType::ALL.iter() {
            let info = kind.info();
            let (disamb, prefix) = name_to_disfix(info.name);
            assert_eq!(disamb, info.disamb);
            assert_eq!(prefix, info.prefix);
            assert_eq!(AminoType::from_prefix(&prefix).unwrap(), *kind);
            assert_eq!(AminoType::from_name(info.name), Some(*kind));
        }
        assert_eq!(
            AminoType::PubKeySecp256k1.info().disfix(),
            [0xF8, 0xCC, 0xEA, 0xEB, 0x5A, 0xE9, 0x87]
        );
    }

    #[test]
    fn uvarint_round_trip() {
        for value in [0u64, 1, 127, 128, 300, 16384, u64::from(u32::MAX), u64::MAX] {
            let mut buf = Vec::new();
            encode_uvarint(value, &mut buf);
            assert_eq!(decode_uvarint(&buf).unwrap(), (value, buf.len()));
        }
        let mut buf = Vec::new();
        encode_uvarint(300, &mut buf);
        assert_eq!(buf, vec![0xac, 0x02]);
        assert_eq!(decode_uvarint(&[0x80]), Err(AminoError::UnexpectedEof));
        assert_eq!(decode_uvarint(&[0xff; 11]), Err(AminoError::VarintOverflow));
    }

    #[test]
    fn secp256k1_bytes() {
        let key = AminoPubKey::Secp256k1(known_key());
        let bytes = key.marshal_binary_bare();
        assert_eq!(
            bytes_to_hex_str(&bytes),
            "eb5ae98721029651a9aac4c22b27b3019aee6df746266e1ae746ee79772a6e5ead198ebd07c3"
        );
        assert_eq!(bytes, known_key().to_amino_bytes());
        assert_eq!(AminoPubKey::unmarshal_binary_bare(&bytes).unwrap(), key);
    }

    #[test]
    fn multisig_threshold_bytes() {
        let key = AminoPubKey::MultisigThreshold(MultisigThresholdPubKey {
            threshold: 2,
            pubkeys: vec![known_key(), abandon_key()],
        });
        let bytes = key.marshal_binary_bare();
        assert_eq!(bytes_to_hex_str(&bytes), MULTISIG_HEX);
        assert_eq!(AminoPubKey::unmarshal_binary_bare(&bytes).unwrap(), key);
        assert_eq!(
            key.address("darc").unwrap().to_string(),
            "darc13npgxsamtj58n63l0dsgktwwekw6mhpcdlj3j6"
        );
        assert_eq!(
            key.to_bech32("darcpub").unwrap(),
            "darcpub1ytql0csgqgfzd666axrjzq5k2x5643xz9vnmxqv6aeklw33xdcdww3hw09mj5mj745vca0g8cvfzd666axrjzqj0fc4dn8p56c9ehf3g8j2rr2zp3tuxwvsjjc0e0fmmvdmle5zmvgyfk89a"
        );
    }

    #[test]
    fn zero_threshold_is_omitted() {
        let key = AminoPubKey::MultisigThreshold(MultisigThresholdPubKey {
            threshold: 0,
            pubkeys: vec![],
        });
        assert_eq!(key.marshal_binary_bare(), vec![0x22, 0xc1, 0xf7, 0xe2]);
    }

    #[test]
    fn decode_errors() {
        assert_eq!(
            AminoPubKey::unmarshal_binary_bare(&[0xEB, 0x5A]),
            Err(AminoError::UnexpectedEof)
        );
        assert_eq!(
            AminoPubKey::unmarshal_binary_bare(&[1, 2, 3, 4, 5]),
            Err(AminoError::UnknownPrefix([1, 2, 3, 4]))
        );
        // truncated key
        let mut bytes = AminoPubKey::Secp256k1(known_key()).marshal_binary_bare();
        bytes.pop();
        assert!(matches!(
            AminoPubKey::unmarshal_binary_bare(&bytes),
            Err(AminoError::LengthMismatch { .. })
        ));
        // field 3 is not part of the threshold schema
        let bytes = hex_str_to_bytes("22c1f7e21801").unwrap();
        assert_eq!(
            AminoPubKey::unmarshal_binary_bare(&bytes),
            Err(AminoError::UnexpectedField {
                number: 3,
                wire_type: 0
            })
        );
    }

    #[test]
    fn bech32_round_trip_of_single_key() {
        let key = AminoPubKey::Secp256k1(abandon_key());
        let encoded = key.to_bech32("darcpub").unwrap();
        assert_eq!(
            encoded,
            "darcpub1addwnpepqf85u2kens6dvzum5c5re9p34pqc47r8xgffv8uh5aakxalu6pdkyfz92ah"
        );
        assert_eq!(AminoPubKey::from_bech32(&encoded).unwrap(), key);
    }

    #[test]
    fn serialize_secp256k1_pubkey() {
        let public_key = AminoPubKey::Secp256k1(PublicKey::default());
        let serialized = serde_json::to_string(&public_key).unwrap();
        let deserialized: serde_json::Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized,
            json!({"type": "tendermint/PubKeySecp256k1", "value": "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"})
        );
        let back: AminoPubKey = serde_json::from_value(deserialized).unwrap();
        assert_eq!(back, public_key);
    }
}
