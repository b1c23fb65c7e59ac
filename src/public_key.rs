use crate::address::{self, Address};
use crate::amino::{AminoPubKey, AminoType};
use crate::error::{AddressError, AminoError, PublicKeyError};
use crate::utils::{contains_non_hex_chars, hex_str_to_bytes};
use base64::{engine::general_purpose, Engine};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey as PublicKeyEC, SECP256K1};
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt::{self, Debug};
use std::str::FromStr;

/// Default prefix of bech32 encoded DARC public keys
pub const DEFAULT_PUBKEY_PREFIX: &str = "darcpub";

/// A compressed secp256k1 public key.
///
/// On the wire it is the value half of a `tendermint/PubKeySecp256k1`
/// amino JSON object, a bare base64 string. Wrap it in [`AminoPubKey`]
/// to get the tagged form.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 33]);

impl Default for PublicKey {
    fn default() -> Self {
        Self([0u8; 33])
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.iter().fmt(f)
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&general_purpose::STANDARD.encode(&self.0[..]))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = general_purpose::STANDARD
            .decode(s)
            .map_err(de::Error::custom)?;
        PublicKey::from_slice(&bytes).map_err(de::Error::custom)
    }
}

impl PublicKey {
    /// Create a public key using an array of bytes
    pub fn from_bytes(bytes: [u8; 33]) -> Self {
        Self(bytes)
    }

    /// Create a public key using a slice of bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        if bytes.len() != 33 {
            return Err(PublicKeyError::BytesDecodeErrorWrongLength);
        }
        let mut result = [0u8; 33];
        result.copy_from_slice(bytes);
        Ok(Self(result))
    }

    /// Returns bytes of a given public key as a slice of bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Create an address object using a given public key.
    pub fn to_address(&self, prefix: &str) -> Result<Address, AddressError> {
        Address::from_bytes(address::single_key_address(&self.0), prefix)
    }

    /// Creates amino representation of a given public key, the registered
    /// prefix followed by the length prefixed key bytes.
    pub fn to_amino_bytes(&self) -> Vec<u8> {
        let mut key_bytes = AminoType::PubKeySecp256k1.info().prefix.to_vec();
        key_bytes.push(self.0.len() as u8);
        key_bytes.extend(self.as_bytes());
        key_bytes
    }

    /// Create a bech32 encoded public key.
    ///
    /// * `hrp` - A prefix for a bech32 encoding, `darcpub` on the DARC chain.
    pub fn to_bech32<T: Into<String>>(&self, hrp: T) -> Result<String, PublicKeyError> {
        Ok(address::encode_bech32(&self.to_amino_bytes(), &hrp.into())?)
    }

    /// Parse a bech32 encoded public key, any prefix is accepted
    ///
    /// * `s` - A bech32 encoded public key
    pub fn from_bech32(s: &str) -> Result<PublicKey, PublicKeyError> {
        match AminoPubKey::from_bech32(s)? {
            AminoPubKey::Secp256k1(key) => Ok(key),
            AminoPubKey::MultisigThreshold(_) => Err(PublicKeyError::AminoError(
                AminoError::UnexpectedType(AminoType::PubKeyMultisigThreshold.info().name),
            )),
        }
    }

    /// Checks a 64 byte compact signature over a 32 byte digest
    pub fn verify(&self, hash: &[u8], signature: &[u8]) -> Result<bool, PublicKeyError> {
        let key = PublicKeyEC::from_slice(&self.0)?;
        let msg = Message::from_slice(hash)?;
        let sig = match Signature::from_compact(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        Ok(SECP256K1.verify_ecdsa(&msg, &sig, &key).is_ok())
    }
}

impl FromStr for PublicKey {
    type Err = PublicKeyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // interpret as hex when it can only be hex, bech32 otherwise
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() == 66 && !contains_non_hex_chars(stripped) {
            let bytes = hex_str_to_bytes(stripped).map_err(PublicKeyError::HexDecodeError)?;
            PublicKey::from_slice(&bytes).map_err(|_| PublicKeyError::HexDecodeErrorWrongLength)
        } else {
            PublicKey::from_bech32(s)
        }
    }
}
