//! Private key implementation supports secp256k1
use crate::address::Address;
use crate::error::PrivateKeyError;
use crate::hd_wallet::{self, DerivationPath};
use crate::keystore::{self, ExportOptions, KeystoreV3};
use crate::mnemonic::Mnemonic;
use crate::public_key::PublicKey;
use crate::utils::{bytes_to_hex_str, contains_non_hex_chars, hex_str_to_bytes, sha256};
use secp256k1::{Message, PublicKey as PublicKeyEC, SecretKey, SECP256K1};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Order of the secp256k1 group minus one
const N_MINUS_ONE: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x40,
];

/// This structure represents a private key, the bytes are wiped on drop
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(Zeroizing<[u8; 32]>);

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

impl PrivateKey {
    /// Deterministically maps an arbitrary secret onto a valid key,
    /// `sha256(secret) mod (n - 1) + 1`
    pub fn from_secret(secret: &[u8]) -> PrivateKey {
        let mut i = sha256(secret);
        if i >= N_MINUS_ONE {
            sub_be(&mut i, &N_MINUS_ONE);
        }
        add_one_be(&mut i);
        PrivateKey(Zeroizing::new(i))
    }

    /// Imports raw key bytes, they must be a valid non zero scalar
    pub fn from_bytes(bytes: [u8; 32]) -> Result<PrivateKey, PrivateKeyError> {
        SecretKey::from_slice(&bytes)?;
        Ok(PrivateKey(Zeroizing::new(bytes)))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<PrivateKey, PrivateKeyError> {
        if bytes.len() != 32 {
            return Err(PrivateKeyError::HexDecodeErrorWrongLength);
        }
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(bytes);
        SecretKey::from_slice(&key[..])?;
        Ok(PrivateKey(key))
    }

    /// Derives the key for the default cosmos path `m/44'/118'/0'/0/0`
    pub fn from_phrase(phrase: &str, passphrase: &str) -> Result<PrivateKey, PrivateKeyError> {
        PrivateKey::from_hd_wallet_path(hd_wallet::DEFAULT_DERIVATION_PATH, phrase, passphrase)
    }

    pub fn from_hd_wallet_path(
        path: &str,
        phrase: &str,
        passphrase: &str,
    ) -> Result<PrivateKey, PrivateKeyError> {
        let path: DerivationPath = path.parse()?;
        let mnemonic = Mnemonic::from_phrase(phrase)?;
        PrivateKey::from_mnemonic(&mnemonic, passphrase, &path)
    }

    pub fn from_mnemonic(
        mnemonic: &Mnemonic,
        passphrase: &str,
        path: &DerivationPath,
    ) -> Result<PrivateKey, PrivateKeyError> {
        let seed = mnemonic.to_seed(passphrase);
        let key = hd_wallet::derive_private_key(&seed[..], path)?;
        Ok(PrivateKey(key))
    }

    /// True for exactly 64 hex characters
    pub fn is_valid_private_hex(input: &str) -> bool {
        input.len() == 64 && !contains_non_hex_chars(input)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex_str(&self.0[..])
    }

    /// Compressed public key of this private key
    pub fn to_public_key(&self) -> Result<PublicKey, PrivateKeyError> {
        let sk = SecretKey::from_slice(&self.0[..])?;
        let pkey = PublicKeyEC::from_secret_key(SECP256K1, &sk);
        Ok(PublicKey::from_bytes(pkey.serialize()))
    }

    pub fn to_address(&self, prefix: &str) -> Result<Address, PrivateKeyError> {
        Ok(self.to_public_key()?.to_address(prefix)?)
    }

    /// Signs a 32 byte digest, returning the 64 byte compact `r || s` form.
    /// `s` is always normalized to the lower half of the group order.
    pub fn sign_hash(&self, hash: &[u8]) -> Result<[u8; 64], PrivateKeyError> {
        let sk = SecretKey::from_slice(&self.0[..])?;
        let msg = Message::from_slice(hash)?;
        let mut sig = SECP256K1.sign_ecdsa(&msg, &sk);
        sig.normalize_s();
        Ok(sig.serialize_compact())
    }

    /// SHA-256 of `bytes`, then [`PrivateKey::sign_hash`]
    pub fn sign_bytes(&self, bytes: &[u8]) -> Result<[u8; 64], PrivateKeyError> {
        self.sign_hash(&sha256(bytes))
    }

    /// Encrypts this key into a V3 keystore tagged with its address
    pub fn to_keystore(
        &self,
        password: &str,
        prefix: &str,
        opts: &ExportOptions,
    ) -> Result<KeystoreV3, PrivateKeyError> {
        let address = self.to_address(prefix)?.to_bech32()?;
        Ok(keystore::export(&self.0[..], password, Some(address), opts)?)
    }

    pub fn from_keystore(
        keystore: &KeystoreV3,
        password: &str,
    ) -> Result<PrivateKey, PrivateKeyError> {
        let bytes = keystore::import(keystore, password)?;
        PrivateKey::from_slice(&bytes)
    }
}

impl FromStr for PrivateKey {
    type Err = PrivateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if !PrivateKey::is_valid_private_hex(s) {
            return Err(PrivateKeyError::HexDecodeErrorWrongLength);
        }
        let bytes = Zeroizing::new(hex_str_to_bytes(s)?);
        PrivateKey::from_slice(&bytes)
    }
}

fn sub_be(a: &mut [u8; 32], b: &[u8; 32]) {
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut v = i16::from(a[i]) - i16::from(b[i]) - borrow;
        borrow = if v < 0 {
            v += 256;
            1
        } else {
            0
        };
        a[i] = v as u8;
    }
}

fn add_one_be(a: &mut [u8; 32]) {
    for byte in a.iter_mut().rev() {
        let (v, overflow) = byte.overflowing_add(1);
        *byte = v;
        if !overflow {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::Kdf;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_secret() {
        let private_key = PrivateKey::from_secret(b"mySecret");
        assert_eq!(
            private_key.as_bytes(),
            &[
                208, 190, 115, 52, 41, 67, 47, 127, 0, 212, 37, 225, 171, 0, 52, 18, 175, 167, 93,
                65, 254, 40, 13, 139, 178, 235, 62, 130, 254, 252, 86, 183,
            ]
        );

        let public_key = private_key
            .to_public_key()
            .expect("Unable to create public key");

        assert_eq!(
            public_key.as_bytes(),
            &[
                2, 150, 81, 169, 170, 196, 194, 43, 39, 179, 1, 154, 238, 109, 247, 70, 38, 110,
                26, 231, 70, 238, 121, 119, 42, 110, 94, 173, 25, 142, 189, 7, 195
            ][..]
        );
        let address = public_key
            .to_address("darc")
            .expect("Unable to create address");
        assert_eq!(
            bytes_to_hex_str(address.as_bytes()),
            "99bcc000f7810f8bbb2af6f03ae37d135dc87852"
        );
        assert_eq!(
            address.to_string(),
            "darc1nx7vqq8hsy8chwe27mcr4cmazdwus7zjqtepzk"
        );
    }

    #[test]
    fn modular_helpers() {
        let mut a = [0u8; 32];
        a[31] = 0xff;
        add_one_be(&mut a);
        assert_eq!(a[30..], [1, 0]);
        let mut b = N_MINUS_ONE;
        sub_be(&mut b, &N_MINUS_ONE);
        assert_eq!(b, [0u8; 32]);
        let max = PrivateKey::from_secret(&[]);
        assert!(SecretKey::from_slice(max.as_bytes()).is_ok());
    }

    #[test]
    fn from_phrase_matches_cosmos() {
        let key = PrivateKey::from_phrase(ABANDON, "").unwrap();
        assert_eq!(
            key.to_hex(),
            "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        );
        assert_eq!(
            key.to_address("cosmos").unwrap().to_string(),
            "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4"
        );
        assert_eq!(
            key.to_address("darc").unwrap().to_string(),
            "darc19rl4cm2hmr8afy4kldpxz3fka4jguq0arpevjz"
        );
        let same = PrivateKey::from_hd_wallet_path("m/44h/118h/0h/0/0", ABANDON, "").unwrap();
        assert_eq!(same, key);
        let other = PrivateKey::from_hd_wallet_path("m/44'/118'/0'/0/1", ABANDON, "").unwrap();
        assert_ne!(other, key);
        assert!(PrivateKey::from_hd_wallet_path("m/44'/x", ABANDON, "").is_err());
    }

    #[test]
    fn hex_import() {
        assert!(PrivateKey::is_valid_private_hex(
            "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        ));
        assert!(!PrivateKey::is_valid_private_hex("c4a48e"));
        assert!(!PrivateKey::is_valid_private_hex(
            "g4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        ));
        let key: PrivateKey = "0xc4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
            .parse()
            .unwrap();
        assert_eq!(key, PrivateKey::from_phrase(ABANDON, "").unwrap());
        assert!(PrivateKey::from_bytes([0u8; 32]).is_err());
        assert_eq!(format!("{:?}", key), "PrivateKey([REDACTED])");
    }

    #[test]
    fn signatures_verify() {
        let key = PrivateKey::from_secret(b"mySecret");
        let public_key = key.to_public_key().unwrap();
        let sig = key.sign_bytes(b"hello darc").unwrap();
        assert!(public_key.verify(&sha256(b"hello darc"), &sig).unwrap());
        assert!(!public_key.verify(&sha256(b"hello cosmos"), &sig).unwrap());
        // deterministic nonces
        assert_eq!(sig, key.sign_bytes(b"hello darc").unwrap());
    }

    #[test]
    fn keystore_round_trip() {
        let key = PrivateKey::from_secret(b"mySecret");
        let opts = ExportOptions {
            kdf: Kdf::Pbkdf2,
            pbkdf2_c: 1024,
            ..Default::default()
        };
        let keystore = key.to_keystore("hunter2", "darc", &opts).unwrap();
        assert_eq!(
            keystore.address.as_deref(),
            Some("darc1nx7vqq8hsy8chwe27mcr4cmazdwus7zjqtepzk")
        );
        assert_eq!(PrivateKey::from_keystore(&keystore, "hunter2").unwrap(), key);
        assert!(PrivateKey::from_keystore(&keystore, "hunter3").is_err());
    }
}
