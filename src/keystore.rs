//! Password encrypted private keys in the Web3 Secret Storage (V3) format.
//!
//! The password is stretched with scrypt or PBKDF2-HMAC-SHA256, the first
//! half of the derived key encrypts the private key with AES-128-CTR and
//! the second half authenticates the ciphertext through a keccak256 MAC.
use crate::error::KeystoreError;
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};
use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use zeroize::Zeroizing;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

pub const KEYSTORE_VERSION: u64 = 3;
pub const DKLEN: u32 = 32;
pub const SALT_SIZE: usize = 32;
pub const IV_SIZE: usize = 16;
pub const SCRYPT_N: u64 = 8192;
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;
pub const PBKDF2_C: u32 = 262_144;
/// Upper bounds accepted for imported or exported KDF parameters
pub const MAX_DKLEN: u32 = 64;
pub const MAX_SCRYPT_N: u64 = 1 << 20;
pub const MAX_SCRYPT_P: u32 = 16;
/// Scrypt needs `128 * r * n` bytes of memory
pub const MAX_SCRYPT_MEMORY: u64 = 1 << 30;
pub const MAX_PBKDF2_C: u32 = 10_000_000;
pub const PBKDF2_PRF: &str = "hmac-sha256";
pub const AES_128_CTR: &str = "aes-128-ctr";

/// Supported key derivation functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kdf {
    Scrypt,
    Pbkdf2,
}

impl Kdf {
    pub fn name(&self) -> &'static str {
        match self {
            Kdf::Scrypt => "scrypt",
            Kdf::Pbkdf2 => "pbkdf2",
        }
    }
}

impl FromStr for Kdf {
    type Err = KeystoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scrypt" => Ok(Kdf::Scrypt),
            "pbkdf2" => Ok(Kdf::Pbkdf2),
            other => Err(KeystoreError::UnsupportedKdf(other.to_string())),
        }
    }
}

impl fmt::Display for Kdf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScryptParams {
    pub dklen: u32,
    pub n: u64,
    pub p: u32,
    pub r: u32,
    pub salt: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Params {
    pub c: u32,
    pub dklen: u32,
    pub prf: String,
    pub salt: String,
}

/// The `kdfparams` object, its shape depends on the `kdf` name
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum KdfParams {
    Scrypt(ScryptParams),
    Pbkdf2(Pbkdf2Params),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub iv: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CryptoParams {
    pub ciphertext: String,
    pub cipherparams: CipherParams,
    pub cipher: String,
    pub kdf: String,
    pub kdfparams: KdfParams,
    pub mac: String,
}

/// A V3 keystore record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeystoreV3 {
    pub version: u64,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(alias = "Crypto")]
    pub crypto: CryptoParams,
}

/// Knobs for [`export`], random salt and iv are drawn when left empty
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub kdf: Kdf,
    pub dklen: u32,
    pub salt: Option<Vec<u8>>,
    pub iv: Option<[u8; IV_SIZE]>,
    pub scrypt_n: u64,
    pub scrypt_r: u32,
    pub scrypt_p: u32,
    pub pbkdf2_c: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            kdf: Kdf::Scrypt,
            dklen: DKLEN,
            salt: None,
            iv: None,
            scrypt_n: SCRYPT_N,
            scrypt_r: SCRYPT_R,
            scrypt_p: SCRYPT_P,
            pbkdf2_c: PBKDF2_C,
        }
    }
}

fn derive_key(
    kdf: Kdf,
    params: &KdfParams,
    password: &str,
) -> Result<Zeroizing<Vec<u8>>, KeystoreError> {
    match (kdf, params) {
        (Kdf::Scrypt, KdfParams::Scrypt(params)) => {
            check_dklen(params.dklen)?;
            if params.n < 2 || !params.n.is_power_of_two() {
                return Err(KeystoreError::InvalidKdfParams(format!(
                    "scrypt n {} is not a power of two",
                    params.n
                )));
            }
            let memory = 128u64
                .checked_mul(params.n)
                .and_then(|m| m.checked_mul(u64::from(params.r)));
            if params.n > MAX_SCRYPT_N
                || params.r == 0
                || params.p == 0
                || params.p > MAX_SCRYPT_P
                || memory.map_or(true, |m| m > MAX_SCRYPT_MEMORY)
            {
                return Err(KeystoreError::InvalidKdfParams(format!(
                    "scrypt n {} r {} p {} out of range",
                    params.n, params.r, params.p
                )));
            }
            let salt = hex_str_to_bytes(&params.salt)?;
            let log_n = params.n.trailing_zeros() as u8;
            let scrypt_params =
                scrypt::Params::new(log_n, params.r, params.p, params.dklen as usize)
                    .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;
            let mut out = Zeroizing::new(vec![0u8; params.dklen as usize]);
            scrypt::scrypt(password.as_bytes(), &salt, &scrypt_params, &mut out)
                .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;
            Ok(out)
        }
        (Kdf::Pbkdf2, KdfParams::Pbkdf2(params)) => {
            check_dklen(params.dklen)?;
            if params.prf != PBKDF2_PRF {
                return Err(KeystoreError::UnsupportedPrf(params.prf.clone()));
            }
            if params.c == 0 || params.c > MAX_PBKDF2_C {
                return Err(KeystoreError::InvalidKdfParams(format!(
                    "pbkdf2 c {} out of range",
                    params.c
                )));
            }
            let salt = hex_str_to_bytes(&params.salt)?;
            let mut out = Zeroizing::new(vec![0u8; params.dklen as usize]);
            pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), &salt, params.c, &mut out)
                .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;
            Ok(out)
        }
        (kdf, _) => Err(KeystoreError::InvalidKdfParams(format!(
            "parameters do not match {}",
            kdf
        ))),
    }
}

fn check_dklen(dklen: u32) -> Result<(), KeystoreError> {
    if dklen < DKLEN {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "dklen {} is shorter than {}",
            dklen, DKLEN
        )));
    }
    if dklen > MAX_DKLEN {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "dklen {} is longer than {}",
            dklen, MAX_DKLEN
        )));
    }
    Ok(())
}

fn mac(derived: &[u8], ciphertext: &[u8]) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(&derived[16..32]);
    hasher.update(ciphertext);
    bytes_to_hex_str(&hasher.finalize())
}

fn apply_aes_128_ctr(derived: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), KeystoreError> {
    let mut cipher = Aes128Ctr::new_from_slices(&derived[..16], iv)
        .map_err(|_| KeystoreError::InvalidKdfParams(format!("iv of {} bytes", iv.len())))?;
    cipher.apply_keystream(data);
    Ok(())
}

/// Encrypts `private_key` under `password`
pub fn export(
    private_key: &[u8],
    password: &str,
    address: Option<String>,
    opts: &ExportOptions,
) -> Result<KeystoreV3, KeystoreError> {
    if password.is_empty() {
        return Err(KeystoreError::EmptyPassword);
    }
    let salt = match &opts.salt {
        Some(salt) => salt.clone(),
        None => {
            let mut salt = vec![0u8; SALT_SIZE];
            OsRng.fill_bytes(&mut salt);
            salt
        }
    };
    let iv = match opts.iv {
        Some(iv) => iv,
        None => {
            let mut iv = [0u8; IV_SIZE];
            OsRng.fill_bytes(&mut iv);
            iv
        }
    };
    let kdfparams = match opts.kdf {
        Kdf::Scrypt => KdfParams::Scrypt(ScryptParams {
            dklen: opts.dklen,
            n: opts.scrypt_n,
            p: opts.scrypt_p,
            r: opts.scrypt_r,
            salt: bytes_to_hex_str(&salt),
        }),
        Kdf::Pbkdf2 => KdfParams::Pbkdf2(Pbkdf2Params {
            c: opts.pbkdf2_c,
            dklen: opts.dklen,
            prf: PBKDF2_PRF.to_string(),
            salt: bytes_to_hex_str(&salt),
        }),
    };
    debug!("Exporting keystore with {}", opts.kdf);
    let derived = derive_key(opts.kdf, &kdfparams, password)?;
    let mut ciphertext = private_key.to_vec();
    apply_aes_128_ctr(&derived, &iv, &mut ciphertext)?;
    let mac = mac(&derived, &ciphertext);

    Ok(KeystoreV3 {
        version: KEYSTORE_VERSION,
        id: Uuid::new_v4().to_string(),
        address,
        crypto: CryptoParams {
            ciphertext: bytes_to_hex_str(&ciphertext),
            cipherparams: CipherParams {
                iv: bytes_to_hex_str(&iv),
            },
            cipher: AES_128_CTR.to_string(),
            kdf: opts.kdf.name().to_string(),
            kdfparams,
            mac,
        },
    })
}

/// Decrypts a keystore, nothing is decrypted unless the MAC matches
pub fn import(keystore: &KeystoreV3, password: &str) -> Result<Zeroizing<Vec<u8>>, KeystoreError> {
    if password.is_empty() {
        return Err(KeystoreError::EmptyPassword);
    }
    if keystore.version != KEYSTORE_VERSION {
        return Err(KeystoreError::UnsupportedVersion(keystore.version));
    }
    let crypto = &keystore.crypto;
    let kdf: Kdf = crypto.kdf.parse()?;
    if crypto.cipher != AES_128_CTR {
        return Err(KeystoreError::UnsupportedCipher(crypto.cipher.clone()));
    }
    debug!("Importing keystore {} with {}", keystore.id, kdf);
    let derived = derive_key(kdf, &crypto.kdfparams, password)?;
    let ciphertext = hex_str_to_bytes(&crypto.ciphertext)?;
    if mac(&derived, &ciphertext) != crypto.mac.to_lowercase() {
        return Err(KeystoreError::MacMismatch);
    }
    let iv = hex_str_to_bytes(&crypto.cipherparams.iv)?;
    let mut plaintext = Zeroizing::new(ciphertext);
    apply_aes_128_ctr(&derived, &iv, &mut plaintext)?;
    Ok(plaintext)
}

/// Parses and decrypts a JSON keystore. With `non_strict` the whole text is
/// lowercased first, which tolerates records written with mixed case keys
/// or hex.
pub fn import_json(
    json: &str,
    password: &str,
    non_strict: bool,
) -> Result<Zeroizing<Vec<u8>>, KeystoreError> {
    let keystore: KeystoreV3 = if non_strict {
        serde_json::from_str(&json.to_lowercase())?
    } else {
        serde_json::from_str(json)?
    };
    import(&keystore, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PBKDF2_VECTOR: &str = r#"{
        "crypto": {
            "cipher": "aes-128-ctr",
            "cipherparams": {"iv": "6087dab2f9fdbbfaddc31a909735c1e6"},
            "ciphertext": "5318b4d5bcd28de64ee5559e671353e16f075ecae9f99c7a79a38af5f869aa46",
            "kdf": "pbkdf2",
            "kdfparams": {
                "c": 262144,
                "dklen": 32,
                "prf": "hmac-sha256",
                "salt": "ae3cd4e7013836a3df6bd7241b12db061dbe2c6785853cce422d148a624ce0bd"
            },
            "mac": "517ead924a9d0dc3124507e3393d175ce3ff7c1e96529c6c555ce9e51205e9b2"
        },
        "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
        "version": 3
    }"#;

    const PRIVATE_KEY: &str = "d0be733429432f7f00d425e1ab003412afa75d41fe280d8bb2eb3e82fefc56b7";

    fn fixed_opts(kdf: Kdf) -> ExportOptions {
        ExportOptions {
            kdf,
            salt: Some((0u8..32).collect()),
            iv: Some([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]),
            ..Default::default()
        }
    }

    #[test]
    fn pbkdf2_known_vector() {
        let key = import_json(PBKDF2_VECTOR, "testpassword", false).unwrap();
        assert_eq!(
            bytes_to_hex_str(&key),
            "7a28b5ba57c53603b0b07b56bba752f7784bf506fa95edc395f5cf6c7514fe9d"
        );
    }

    #[test]
    fn scrypt_known_vector() {
        let private_key = hex_str_to_bytes(PRIVATE_KEY).unwrap();
        let keystore = export(&private_key, "password123", None, &fixed_opts(Kdf::Scrypt)).unwrap();
        assert_eq!(keystore.version, 3);
        assert_eq!(keystore.crypto.kdf, "scrypt");
        assert_eq!(
            keystore.crypto.ciphertext,
            "a7fb6c5f2951a5b48a3b9a27bc50baf1d7391f352b39e88f8be22f3b13c83fb5"
        );
        assert_eq!(
            keystore.crypto.mac,
            "829214748bc8d067f0986e37ca9ca5cf997c39a2fcd2d624ed457110610d0920"
        );
        let json = serde_json::to_value(&keystore).unwrap();
        assert_eq!(json["crypto"]["kdfparams"]["n"], json!(8192));
        assert_eq!(
            json["crypto"]["cipherparams"]["iv"],
            json!("000102030405060708090a0b0c0d0e0f")
        );
        assert!(json.get("address").is_none());

        let back = import(&keystore, "password123").unwrap();
        assert_eq!(&back[..], &private_key[..]);
    }

    #[test]
    fn round_trip_with_random_salt() {
        let private_key = hex_str_to_bytes(PRIVATE_KEY).unwrap();
        let opts = ExportOptions {
            kdf: Kdf::Pbkdf2,
            pbkdf2_c: 1024,
            ..Default::default()
        };
        let a = export(&private_key, "pw", Some("darc1abc".into()), &opts).unwrap();
        let b = export(&private_key, "pw", Some("darc1abc".into()), &opts).unwrap();
        assert_ne!(a.crypto.ciphertext, b.crypto.ciphertext);
        assert_ne!(a.id, b.id);
        assert_eq!(a.address.as_deref(), Some("darc1abc"));
        let json = serde_json::to_string(&a).unwrap();
        let back = import_json(&json, "pw", false).unwrap();
        assert_eq!(&back[..], &private_key[..]);
    }

    #[test]
    fn wrong_password_is_a_mac_mismatch() {
        match import_json(PBKDF2_VECTOR, "wrongpassword", false) {
            Err(KeystoreError::MacMismatch) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejected_records() {
        let mut keystore: KeystoreV3 = serde_json::from_str(PBKDF2_VECTOR).unwrap();
        assert!(matches!(
            import(&keystore, ""),
            Err(KeystoreError::EmptyPassword)
        ));

        keystore.version = 1;
        assert!(matches!(
            import(&keystore, "testpassword"),
            Err(KeystoreError::UnsupportedVersion(1))
        ));

        keystore.version = 3;
        keystore.crypto.kdf = "argon2".to_string();
        assert!(matches!(
            import(&keystore, "testpassword"),
            Err(KeystoreError::UnsupportedKdf(_))
        ));

        keystore.crypto.kdf = "pbkdf2".to_string();
        keystore.crypto.cipher = "aes-256-gcm".to_string();
        assert!(matches!(
            import(&keystore, "testpassword"),
            Err(KeystoreError::UnsupportedCipher(_))
        ));

        keystore.crypto.cipher = AES_128_CTR.to_string();
        if let KdfParams::Pbkdf2(params) = &mut keystore.crypto.kdfparams {
            params.prf = "hmac-sha512".to_string();
        }
        assert!(matches!(
            import(&keystore, "testpassword"),
            Err(KeystoreError::UnsupportedPrf(_))
        ));

        assert!(matches!(
            export(&[1u8; 32], "", None, &ExportOptions::default()),
            Err(KeystoreError::EmptyPassword)
        ));
        let short = ExportOptions {
            dklen: 16,
            ..Default::default()
        };
        assert!(matches!(
            export(&[1u8; 32], "pw", None, &short),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
        let odd_n = ExportOptions {
            scrypt_n: 1000,
            ..Default::default()
        };
        assert!(matches!(
            export(&[1u8; 32], "pw", None, &odd_n),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
        assert!(matches!(
            "argon2".parse::<Kdf>(),
            Err(KeystoreError::UnsupportedKdf(_))
        ));
    }

    #[test]
    fn oversized_kdf_parameters() {
        let huge_n = ExportOptions {
            scrypt_n: 1 << 40,
            ..Default::default()
        };
        assert!(matches!(
            export(&[1u8; 32], "pw", None, &huge_n),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
        let heavy_r = ExportOptions {
            scrypt_n: 1 << 20,
            scrypt_r: 16,
            ..Default::default()
        };
        assert!(matches!(
            export(&[1u8; 32], "pw", None, &heavy_r),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
        let many_p = ExportOptions {
            scrypt_p: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            export(&[1u8; 32], "pw", None, &many_p),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
        let long_key = ExportOptions {
            dklen: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            export(&[1u8; 32], "pw", None, &long_key),
            Err(KeystoreError::InvalidKdfParams(_))
        ));

        let mut keystore: KeystoreV3 = serde_json::from_str(PBKDF2_VECTOR).unwrap();
        if let KdfParams::Pbkdf2(params) = &mut keystore.crypto.kdfparams {
            params.c = u32::MAX;
        }
        assert!(matches!(
            import(&keystore, "testpassword"),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
        if let KdfParams::Pbkdf2(params) = &mut keystore.crypto.kdfparams {
            params.c = 262_144;
            params.dklen = u32::MAX;
        }
        assert!(matches!(
            import(&keystore, "testpassword"),
            Err(KeystoreError::InvalidKdfParams(_))
        ));
    }

    #[test]
    fn capitalized_crypto_and_non_strict() {
        let upper = PBKDF2_VECTOR
            .replace("\"crypto\"", "\"Crypto\"")
            .replace("6087dab2f9fdbbfaddc31a909735c1e6", "6087DAB2F9FDBBFADDC31A909735C1E6");
        // the alias covers the key, the uppercase hex decodes as well
        let key = import_json(&upper, "testpassword", false).unwrap();
        assert_eq!(
            bytes_to_hex_str(&key),
            "7a28b5ba57c53603b0b07b56bba752f7784bf506fa95edc395f5cf6c7514fe9d"
        );
        // non_strict lowercases the whole record before parsing
        let key = import_json(&upper, "testpassword", true).unwrap();
        assert_eq!(
            bytes_to_hex_str(&key),
            "7a28b5ba57c53603b0b07b56bba752f7784bf506fa95edc395f5cf6c7514fe9d"
        );
    }
}
