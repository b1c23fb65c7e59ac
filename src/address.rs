use crate::error::AddressError;
use crate::utils::{hash160, sha256, ArrayString};
use bech32::{self, FromBase32, ToBase32, Variant};
use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// Default prefix of DARC account addresses
pub const DEFAULT_PREFIX: &str = "darc";

/// Encodes arbitrary bytes as a bech32 string with the given human readable part
pub fn encode_bech32(bytes: &[u8], hrp: &str) -> Result<String, AddressError> {
    Ok(bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)?)
}

/// Decodes a bech32 string into its human readable part and data bytes
pub fn decode_bech32(s: &str) -> Result<(String, Vec<u8>), AddressError> {
    let (hrp, data, variant) = bech32::decode(s)?;
    if variant != Variant::Bech32 {
        return Err(AddressError::Bech32InvalidEncoding);
    }
    let bytes = Vec::<u8>::from_base32(&data)?;
    Ok((hrp, bytes))
}

/// Checks that `address` is a well formed bech32 string under `prefix`.
///
/// The string must start with `prefix` followed by the `1` separator, contain
/// only ascii alphanumerics and carry a valid checksum. The decoded human
/// readable part must equal `prefix` and the payload must be 20 bytes.
pub fn is_valid_address(address: &str, prefix: &str) -> bool {
    if !address.starts_with(&format!("{}1", prefix)) {
        return false;
    }
    if !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }
    match decode_bech32(address) {
        Ok((hrp, bytes)) => hrp == prefix && bytes.len() == 20,
        Err(_) => false,
    }
}

/// Address bytes of a single secp256k1 key, RIPEMD160(SHA256(key))
pub fn single_key_address(public_key: &[u8]) -> [u8; 20] {
    hash160(public_key)
}

/// Address bytes of a multisig threshold key, the first 20 bytes of
/// SHA256 over its amino encoding
pub fn multisig_address(encoded_threshold_key: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&sha256(encoded_threshold_key)[..20]);
    out
}

/// An address that's derived from a given PublicKey
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Address {
    bytes: [u8; 20],
    prefix: ArrayString,
}

impl Address {
    pub fn from_bytes(bytes: [u8; 20], prefix: &str) -> Result<Address, AddressError> {
        Ok(Address {
            bytes,
            prefix: ArrayString::new(prefix)?,
        })
    }

    pub fn from_slice(bytes: &[u8], prefix: &str) -> Result<Address, AddressError> {
        if bytes.len() != 20 {
            return Err(AddressError::BytesDecodeErrorWrongLength);
        }
        let mut result = [0u8; 20];
        result.copy_from_slice(bytes);
        Address::from_bytes(result, prefix)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn get_prefix(&self) -> String {
        self.prefix.to_string()
    }

    /// Returns the same address under a different prefix, for example
    /// turning an account address into a validator operator address
    pub fn change_prefix(&self, prefix: &str) -> Result<Address, AddressError> {
        Address::from_bytes(self.bytes, prefix)
    }

    /// Obtain a bech32 encoded address using the stored prefix
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        encode_bech32(&self.bytes, &self.prefix.to_string())
    }

    /// Parse a bech32 encoded address
    ///
    /// * `s` - A bech32 encoded address
    pub fn from_bech32(s: &str) -> Result<Address, AddressError> {
        let (hrp, bytes) = decode_bech32(s)?;
        if bytes.len() != 20 {
            return Err(AddressError::Bech32WrongLength);
        }
        Address::from_slice(&bytes, &hrp)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_bech32(s)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.to_bech32() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = self.to_bech32().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
