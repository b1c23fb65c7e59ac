use crate::error::{ArrayStringError, ByteDecodeError};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::str;

/// A function that takes a hexadecimal representation of bytes
/// back into a stream of bytes.
pub fn hex_str_to_bytes(s: &str) -> Result<Vec<u8>, ByteDecodeError> {
    let s = match s.strip_prefix("0x") {
        Some(v) => v,
        None => s,
    };
    if s.len() % 2 != 0 {
        return Err(ByteDecodeError::OddLength(s.len()));
    }
    s.as_bytes()
        .chunks(2)
        .map(|ch| {
            str::from_utf8(ch)
                .map_err(ByteDecodeError::DecodeError)
                .and_then(|res| u8::from_str_radix(res, 16).map_err(ByteDecodeError::ParseError))
        })
        .collect()
}

pub fn bytes_to_hex_str(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:0>2x?}", b))
        .fold(String::new(), |acc, x| acc + &x)
}

pub fn contains_non_hex_chars(input: &str) -> bool {
    for char in input.chars() {
        if !char.is_ascii_hexdigit() {
            return true;
        }
    }
    false
}

/// SHA-256 of the input as a fixed array
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// RIPEMD160(SHA256(data)), the bitcoin style hash used for
/// single key account addresses
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(Sha256::digest(data)));
    out
}

/// Serde adapter for integers that amino JSON carries as decimal strings,
/// use with `#[serde(with = "crate::utils::u64_string")]`
pub mod u64_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A small fixed capacity string, used for bech32 prefixes so that
/// addresses can stay `Copy`
#[derive(PartialEq, Eq, Copy, Clone, Hash, Deserialize, Serialize)]
pub struct ArrayString {
    chars: [Option<char>; ArrayString::MAX_LEN],
    used: usize,
}

impl ArrayString {
    pub const MAX_LEN: usize = 32;

    pub fn new(input: &str) -> Result<Self, ArrayStringError> {
        if input.chars().count() > ArrayString::MAX_LEN {
            Err(ArrayStringError::TooLong)
        } else {
            let mut ret: [Option<char>; ArrayString::MAX_LEN] = [None; ArrayString::MAX_LEN];
            let mut counter = 0;
            for char in input.chars() {
                ret[counter] = Some(char);
                counter += 1;
            }
            Ok(ArrayString {
                chars: ret,
                used: counter,
            })
        }
    }

    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }
}

impl Display for ArrayString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut str = String::new();
        for c in self.chars.iter() {
            if let Some(v) = c {
                str.push(*v)
            } else {
                break;
            }
        }
        write!(f, "{}", str)
    }
}

impl std::fmt::Debug for ArrayString {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?}", self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let bytes = hex_str_to_bytes("0x00ff10Ab").unwrap();
        assert_eq!(bytes, vec![0x00, 0xff, 0x10, 0xab]);
        assert_eq!(bytes_to_hex_str(&bytes), "00ff10ab");
        assert_eq!(hex_str_to_bytes("abc"), Err(ByteDecodeError::OddLength(3)));
        assert!(hex_str_to_bytes("zz").is_err());
    }

    #[test]
    fn u64_as_string() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Seq {
            #[serde(with = "u64_string")]
            sequence: u64,
        }
        let v = serde_json::to_value(Seq { sequence: 7 }).unwrap();
        assert_eq!(v, json!({"sequence": "7"}));
        assert_eq!(
            serde_json::from_value::<Seq>(v).unwrap(),
            Seq { sequence: 7 }
        );
        assert!(serde_json::from_value::<Seq>(json!({"sequence": 7})).is_err());
        assert!(serde_json::from_value::<Seq>(json!({"sequence": "-1"})).is_err());
    }

    #[test]
    fn array_string_limits() {
        let s = ArrayString::new("darcpub").unwrap();
        assert_eq!(s.to_string(), "darcpub");
        assert_eq!(s.len(), 7);
        assert!(ArrayString::new(&"a".repeat(33)).is_err());
    }

    #[test]
    fn hash160_of_known_key() {
        let key = [
            2, 150, 81, 169, 170, 196, 194, 43, 39, 179, 1, 154, 238, 109, 247, 70, 38, 110, 26,
            231, 70, 238, 121, 119, 42, 110, 94, 173, 25, 142, 189, 7, 195,
        ];
        assert_eq!(
            bytes_to_hex_str(&hash160(&key)),
            "99bcc000f7810f8bbb2af6f03ae37d135dc87852"
        );
    }
}
