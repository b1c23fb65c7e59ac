use crate::amino::AminoPubKey;

/// base64 in JSON, raw bytes in memory
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(D::Error::custom)
    }
}

/// A signature together with the key that produced it. For a multisig
/// account `signature` is the amino encoded `Multisignature` and `pub_key`
/// the threshold descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StdSignature {
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    pub pub_key: AminoPubKey,
}

impl StdSignature {
    pub fn new<K: Into<AminoPubKey>>(pub_key: K, signature: Vec<u8>) -> StdSignature {
        StdSignature {
            signature,
            pub_key: pub_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::public_key::PublicKey;

    #[test]
    fn serialize_single_key_signature() {
        let key: PublicKey = "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc"
            .parse()
            .unwrap();
        let sig = StdSignature::new(key, vec![1, 2, 3]);
        let v = serde_json::to_value(&sig).unwrap();
        assert_eq!(
            v,
            json!({
                "signature": "AQID",
                "pub_key": {
                    "type": "tendermint/PubKeySecp256k1",
                    "value": "AqFjPK/MAev7bXjjn2h6HwmVxi/JX1Hq0QoC7gvlUbXc",
                },
            })
        );
        let back: StdSignature = serde_json::from_value(v).unwrap();
        assert_eq!(back, sig);
        assert!(serde_json::from_value::<StdSignature>(json!({
            "signature": "not base64!",
            "pub_key": {"type": "tendermint/PubKeySecp256k1", "value": "AqFjPK/MAev7bXjjn2h6HwmVxi/JX1Hq0QoC7gvlUbXc"},
        }))
        .is_err());
    }
}
