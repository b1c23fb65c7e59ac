//! BIP32 derivation of secp256k1 private keys from a BIP39 seed.
use crate::error::HdWalletError;
use bip32::{ChildNumber, XPrv};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Cosmos coin type 118, first account, first address
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

/// A parsed path such as `m/44'/118'/0'/0/0`. Hardened components may be
/// marked with `'` or `h`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Child indices with the hardened bit set where applicable
    pub fn indices(&self) -> &[u32] {
        &self.0
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        DerivationPath(vec![
            44 + HARDENED_OFFSET,
            118 + HARDENED_OFFSET,
            HARDENED_OFFSET,
            0,
            0,
        ])
    }
}

impl FromStr for DerivationPath {
    type Err = HdWalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HdWalletError::InvalidPathSpec(s.to_string());
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(invalid());
        }
        let mut indices = Vec::new();
        for part in parts {
            let (number, hardened) = match part
                .strip_suffix('\'')
                .or_else(|| part.strip_suffix('h'))
            {
                Some(n) => (n, true),
                None => (part, false),
            };
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let index: u32 = number.parse().map_err(|_| invalid())?;
            if index >= HARDENED_OFFSET {
                return Err(invalid());
            }
            indices.push(if hardened {
                index + HARDENED_OFFSET
            } else {
                index
            });
        }
        Ok(DerivationPath(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m")?;
        for index in self.0.iter() {
            if *index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

impl DerivationPath {
    fn child_numbers(&self) -> Result<Vec<ChildNumber>, HdWalletError> {
        self.0
            .iter()
            .map(|index| {
                ChildNumber::new(index & !HARDENED_OFFSET, *index >= HARDENED_OFFSET)
                    .map_err(HdWalletError::from)
            })
            .collect()
    }
}

/// An extended private key, the secret plus its chain code
pub struct ExtendedKey(XPrv);

impl ExtendedKey {
    /// The master key, HMAC-SHA512 keyed with "Bitcoin seed"
    pub fn master(seed: &[u8]) -> Result<ExtendedKey, HdWalletError> {
        let master = XPrv::new(seed).map_err(|_| HdWalletError::InvalidSeed)?;
        Ok(ExtendedKey(master))
    }

    pub fn derive_child(&self, index: u32) -> Result<ExtendedKey, HdWalletError> {
        let child = ChildNumber::new(index & !HARDENED_OFFSET, index >= HARDENED_OFFSET)?;
        Ok(ExtendedKey(self.0.derive_child(child)?))
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<ExtendedKey, HdWalletError> {
        let mut key = self.0.clone();
        for child in path.child_numbers()? {
            key = key.derive_child(child)?;
        }
        Ok(ExtendedKey(key))
    }

    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.0.to_bytes())
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.0.attrs().chain_code
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.0.attrs().depth)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Derives the private key at `path` below the master key of `seed`
pub fn derive_private_key(
    seed: &[u8],
    path: &DerivationPath,
) -> Result<Zeroizing<[u8; 32]>, HdWalletError> {
    trace!("Deriving key at {}", path);
    let key = ExtendedKey::master(seed)?.derive_path(path)?;
    Ok(key.secret_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};

    #[test]
    fn parse_paths() {
        let path: DerivationPath = DEFAULT_DERIVATION_PATH.parse().unwrap();
        assert_eq!(path, DerivationPath::default());
        assert_eq!(path.to_string(), DEFAULT_DERIVATION_PATH);

        let h: DerivationPath = "m/44h/118h/0h/0/0".parse().unwrap();
        assert_eq!(h, path);

        let master: DerivationPath = "m".parse().unwrap();
        assert!(master.indices().is_empty());

        for bad in ["", "44'/118'", "m/", "m/x", "m/-1", "m/2147483648", "m/1''"].iter() {
            match bad.parse::<DerivationPath>() {
                Err(HdWalletError::InvalidPathSpec(s)) => assert_eq!(s, **bad),
                other => panic!("{} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn bip32_test_vector_one() {
        let seed = hex_str_to_bytes("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = ExtendedKey::master(&seed).unwrap();
        assert_eq!(
            bytes_to_hex_str(&master.secret_bytes()[..]),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            bytes_to_hex_str(&master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );

        let child = master.derive_path(&"m/0'".parse().unwrap()).unwrap();
        assert_eq!(
            bytes_to_hex_str(&child.secret_bytes()[..]),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        let grandchild = child.derive_child(1).unwrap();
        assert_eq!(
            bytes_to_hex_str(&grandchild.secret_bytes()[..]),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
    }

    #[test]
    fn short_seed_is_rejected() {
        match ExtendedKey::master(&[7u8; 8]) {
            Err(HdWalletError::InvalidSeed) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cosmos_path_from_abandon_seed() {
        let mnemonic: crate::mnemonic::Mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about".parse().unwrap();
        let key = derive_private_key(&mnemonic.to_seed("")[..], &DerivationPath::default())
            .unwrap();
        assert_eq!(
            bytes_to_hex_str(&key[..]),
            "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        );
    }
}
