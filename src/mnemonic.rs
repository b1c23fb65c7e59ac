//! BIP39 mnemonic phrases, English word list only.
use crate::error::MnemonicError;
use bip39::{Language, Mnemonic as Bip39Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Word counts accepted when recovering an account
pub const ALLOWED_WORD_COUNTS: [usize; 2] = [12, 24];

#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(Bip39Mnemonic);

impl Mnemonic {
    /// A fresh 24 word phrase from 256 bits of OS entropy
    pub fn generate() -> Result<Mnemonic, MnemonicError> {
        Mnemonic::generate_with_word_count(24)
    }

    /// A fresh phrase of 12 or 24 words
    pub fn generate_with_word_count(words: usize) -> Result<Mnemonic, MnemonicError> {
        if !ALLOWED_WORD_COUNTS.contains(&words) {
            return Err(MnemonicError::BadWordCount(words));
        }
        let mut entropy = Zeroizing::new(vec![0u8; words / 3 * 4]);
        OsRng.fill_bytes(&mut entropy);
        Ok(Mnemonic(Bip39Mnemonic::from_entropy_in(
            Language::English,
            &entropy,
        )?))
    }

    /// Parses a phrase, it must have exactly 12 or 24 words and a valid
    /// checksum
    pub fn from_phrase(phrase: &str) -> Result<Mnemonic, MnemonicError> {
        let words = phrase.split_whitespace().count();
        if !ALLOWED_WORD_COUNTS.contains(&words) {
            return Err(MnemonicError::BadWordCount(words));
        }
        Ok(Mnemonic(Bip39Mnemonic::parse_in_normalized(
            Language::English,
            phrase,
        )?))
    }

    pub fn phrase(&self) -> String {
        self.0.to_string()
    }

    pub fn word_count(&self) -> usize {
        self.0.word_count()
    }

    /// The 64 byte BIP39 seed, PBKDF2 over the phrase salted with
    /// `"mnemonic" + passphrase`
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.0.to_seed_normalized(passphrase))
    }
}

impl FromStr for Mnemonic {
    type Err = MnemonicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mnemonic::from_phrase(s)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.word_count())
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
