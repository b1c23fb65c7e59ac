use crate::canonical_json::CanonicalJsonError;
use secp256k1::Error as CurveError;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::num::ParseIntError;
use std::{error::Error, str::Utf8Error};

#[derive(Debug)]
pub enum AddressError {
    Bech32WrongLength,
    Bech32InvalidBase32,
    Bech32InvalidEncoding,
    PrefixTooLong(ArrayStringError),
    BytesDecodeErrorWrongLength,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressError::Bech32WrongLength => write!(f, "Bech32WrongLength"),
            AddressError::Bech32InvalidBase32 => write!(f, "Bech32InvalidBase32"),
            AddressError::Bech32InvalidEncoding => write!(f, "Bech32InvalidEncoding"),
            AddressError::PrefixTooLong(val) => write!(f, "Prefix too long {}", val),
            AddressError::BytesDecodeErrorWrongLength => write!(f, "BytesDecodeError Wrong Length"),
        }
    }
}

impl std::error::Error for AddressError {}

impl From<ArrayStringError> for AddressError {
    fn from(error: ArrayStringError) -> Self {
        AddressError::PrefixTooLong(error)
    }
}

impl From<bech32::Error> for AddressError {
    fn from(error: bech32::Error) -> Self {
        match error {
            bech32::Error::InvalidLength => AddressError::Bech32WrongLength,
            bech32::Error::InvalidChar(_) => AddressError::Bech32InvalidBase32,
            bech32::Error::InvalidData(_) => AddressError::Bech32InvalidEncoding,
            bech32::Error::InvalidChecksum => AddressError::Bech32InvalidEncoding,
            bech32::Error::InvalidPadding => AddressError::Bech32InvalidEncoding,
            bech32::Error::MixedCase => AddressError::Bech32InvalidEncoding,
            bech32::Error::MissingSeparator => AddressError::Bech32InvalidEncoding,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ByteDecodeError {
    DecodeError(Utf8Error),
    ParseError(ParseIntError),
    OddLength(usize),
}

impl Display for ByteDecodeError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ByteDecodeError::DecodeError(val) => write!(f, "ByteDecodeError {}", val),
            ByteDecodeError::ParseError(val) => write!(f, "ByteParseError {}", val),
            ByteDecodeError::OddLength(val) => write!(f, "Odd length hex string {}", val),
        }
    }
}

impl Error for ByteDecodeError {}

/// Failures of the amino binary codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AminoError {
    /// The leading four bytes match no registered type
    UnknownPrefix([u8; 4]),
    /// A registered type was found where another one was required
    UnexpectedType(&'static str),
    /// The input ended before a complete value was read
    UnexpectedEof,
    /// A length prefix disagrees with the bytes that follow it
    LengthMismatch { expected: usize, got: usize },
    /// A field number or wire type not present in the schema
    UnexpectedField { number: u64, wire_type: u8 },
    VarintOverflow,
    InvalidKey(String),
}

impl Display for AminoError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            AminoError::UnknownPrefix(p) => write!(f, "Amino unregistered prefix {:02x?}", p),
            AminoError::UnexpectedType(name) => write!(f, "Amino unexpected type {}", name),
            AminoError::UnexpectedEof => write!(f, "Amino unexpected end of input"),
            AminoError::LengthMismatch { expected, got } => {
                write!(f, "Amino length mismatch expected {} got {}", expected, got)
            }
            AminoError::UnexpectedField { number, wire_type } => write!(
                f,
                "Amino unexpected field {} with wire type {}",
                number, wire_type
            ),
            AminoError::VarintOverflow => write!(f, "Amino varint overflows 64 bits"),
            AminoError::InvalidKey(val) => write!(f, "Amino invalid key {}", val),
        }
    }
}

impl Error for AminoError {}

#[derive(Debug)]
pub enum PublicKeyError {
    Bech32WrongLength,
    Bech32InvalidBase32,
    Bech32InvalidEncoding,
    HexDecodeError(ByteDecodeError),
    HexDecodeErrorWrongLength,
    BytesDecodeErrorWrongLength,
    PrefixTooLong(ArrayStringError),
    AminoError(AminoError),
    CurveError(CurveError),
}

impl fmt::Display for PublicKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PublicKeyError::Bech32WrongLength => write!(f, "Bech32WrongLength"),
            PublicKeyError::Bech32InvalidBase32 => write!(f, "Bech32InvalidBase32"),
            PublicKeyError::Bech32InvalidEncoding => write!(f, "Bech32InvalidEncoding"),
            PublicKeyError::HexDecodeError(val) => write!(f, "HexDecodeError {}", val),
            PublicKeyError::BytesDecodeErrorWrongLength => {
                write!(f, "BytesDecodeError Wrong Length")
            }
            PublicKeyError::HexDecodeErrorWrongLength => write!(f, "HexDecodeError Wrong Length"),
            PublicKeyError::PrefixTooLong(val) => write!(f, "Prefix too long {}", val),
            PublicKeyError::AminoError(val) => write!(f, "{}", val),
            PublicKeyError::CurveError(val) => write!(f, "Secp256k1 Error {}", val),
        }
    }
}

impl std::error::Error for PublicKeyError {}

impl From<ArrayStringError> for PublicKeyError {
    fn from(error: ArrayStringError) -> Self {
        PublicKeyError::PrefixTooLong(error)
    }
}

impl From<AminoError> for PublicKeyError {
    fn from(error: AminoError) -> Self {
        PublicKeyError::AminoError(error)
    }
}

impl From<CurveError> for PublicKeyError {
    fn from(error: CurveError) -> Self {
        PublicKeyError::CurveError(error)
    }
}

impl From<AddressError> for PublicKeyError {
    fn from(error: AddressError) -> Self {
        match error {
            AddressError::Bech32WrongLength => PublicKeyError::Bech32WrongLength,
            AddressError::Bech32InvalidBase32 => PublicKeyError::Bech32InvalidBase32,
            AddressError::Bech32InvalidEncoding => PublicKeyError::Bech32InvalidEncoding,
            AddressError::PrefixTooLong(e) => PublicKeyError::PrefixTooLong(e),
            AddressError::BytesDecodeErrorWrongLength => {
                PublicKeyError::BytesDecodeErrorWrongLength
            }
        }
    }
}

impl From<bech32::Error> for PublicKeyError {
    fn from(error: bech32::Error) -> Self {
        match error {
            bech32::Error::InvalidLength => PublicKeyError::Bech32WrongLength,
            bech32::Error::InvalidChar(_) => PublicKeyError::Bech32InvalidBase32,
            bech32::Error::InvalidData(_) => PublicKeyError::Bech32InvalidEncoding,
            bech32::Error::InvalidChecksum => PublicKeyError::Bech32InvalidEncoding,
            bech32::Error::InvalidPadding => PublicKeyError::Bech32InvalidEncoding,
            bech32::Error::MixedCase => PublicKeyError::Bech32InvalidEncoding,
            bech32::Error::MissingSeparator => PublicKeyError::Bech32InvalidEncoding,
        }
    }
}

/// Failures while recovering a mnemonic phrase
#[derive(Debug)]
pub enum MnemonicError {
    /// Only 12 and 24 word phrases are accepted
    BadWordCount(usize),
    /// Unknown word or failed checksum
    InvalidPhrase(bip39::Error),
}

impl Display for MnemonicError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            MnemonicError::BadWordCount(c) => {
                write!(f, "mnemonic must have 12 or 24 words, got {}", c)
            }
            MnemonicError::InvalidPhrase(e) => write!(f, "invalid mnemonic {}", e),
        }
    }
}

impl Error for MnemonicError {}

impl From<bip39::Error> for MnemonicError {
    fn from(error: bip39::Error) -> Self {
        MnemonicError::InvalidPhrase(error)
    }
}

#[derive(Debug)]
pub enum HdWalletError {
    InvalidPathSpec(String),
    InvalidSeed,
    Derivation(bip32::Error),
}

impl fmt::Display for HdWalletError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result {
        match self {
            HdWalletError::InvalidPathSpec(val) => write!(f, "HDWalletError invalid path {}", val),
            HdWalletError::InvalidSeed => write!(f, "HDWalletError seed produced an invalid key"),
            HdWalletError::Derivation(val) => write!(f, "HDWalletError derivation failed {}", val),
        }
    }
}

impl std::error::Error for HdWalletError {}

impl From<bip32::Error> for HdWalletError {
    fn from(error: bip32::Error) -> Self {
        HdWalletError::Derivation(error)
    }
}

#[derive(Debug)]
pub enum KeystoreError {
    EmptyPassword,
    UnsupportedVersion(u64),
    UnsupportedKdf(String),
    UnsupportedCipher(String),
    UnsupportedPrf(String),
    InvalidKdfParams(String),
    /// The stored MAC does not match, almost always a wrong password
    MacMismatch,
    HexDecodeError(ByteDecodeError),
    JsonError(serde_json::Error),
}

impl Display for KeystoreError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            KeystoreError::EmptyPassword => write!(f, "No password given"),
            KeystoreError::UnsupportedVersion(v) => {
                write!(f, "Not a valid V3 keystore, version {}", v)
            }
            KeystoreError::UnsupportedKdf(v) => {
                write!(f, "Unsupported key derivation scheme {}", v)
            }
            KeystoreError::UnsupportedCipher(v) => write!(f, "Unsupported cipher {}", v),
            KeystoreError::UnsupportedPrf(v) => write!(f, "Unsupported parameters to PBKDF2 {}", v),
            KeystoreError::InvalidKdfParams(v) => write!(f, "Invalid kdf params {}", v),
            KeystoreError::MacMismatch => {
                write!(f, "Key derivation failed - possibly wrong password")
            }
            KeystoreError::HexDecodeError(v) => write!(f, "Keystore {}", v),
            KeystoreError::JsonError(v) => write!(f, "Keystore json {}", v),
        }
    }
}

impl Error for KeystoreError {}

impl From<ByteDecodeError> for KeystoreError {
    fn from(error: ByteDecodeError) -> Self {
        KeystoreError::HexDecodeError(error)
    }
}

impl From<serde_json::Error> for KeystoreError {
    fn from(error: serde_json::Error) -> Self {
        KeystoreError::JsonError(error)
    }
}

#[derive(Debug)]
pub enum PrivateKeyError {
    HexDecodeError(ByteDecodeError),
    HexDecodeErrorWrongLength,
    CurveError(CurveError),
    PublicKeyError(PublicKeyError),
    AddressError(AddressError),
    HdWalletError(HdWalletError),
    InvalidMnemonic(MnemonicError),
    KeystoreError(KeystoreError),
}

impl fmt::Display for PrivateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result {
        match self {
            PrivateKeyError::HexDecodeError(val) => write!(f, "PrivateKeyError {}", val),
            PrivateKeyError::HexDecodeErrorWrongLength => write!(f, "PrivateKeyError Wrong Length"),
            PrivateKeyError::CurveError(val) => write!(f, "Secp256k1 Error {}", val),
            PrivateKeyError::PublicKeyError(val) => write!(f, "{}", val),
            PrivateKeyError::AddressError(val) => write!(f, "{}", val),
            PrivateKeyError::HdWalletError(val) => write!(f, "{}", val),
            PrivateKeyError::InvalidMnemonic(val) => {
                write!(f, "Failed to process mnemonic {}", val)
            }
            PrivateKeyError::KeystoreError(val) => write!(f, "{}", val),
        }
    }
}

impl std::error::Error for PrivateKeyError {}

impl From<CurveError> for PrivateKeyError {
    fn from(error: CurveError) -> Self {
        PrivateKeyError::CurveError(error)
    }
}

impl From<HdWalletError> for PrivateKeyError {
    fn from(error: HdWalletError) -> Self {
        PrivateKeyError::HdWalletError(error)
    }
}

impl From<PublicKeyError> for PrivateKeyError {
    fn from(error: PublicKeyError) -> Self {
        PrivateKeyError::PublicKeyError(error)
    }
}

impl From<AddressError> for PrivateKeyError {
    fn from(error: AddressError) -> Self {
        PrivateKeyError::AddressError(error)
    }
}

impl From<ByteDecodeError> for PrivateKeyError {
    fn from(error: ByteDecodeError) -> Self {
        PrivateKeyError::HexDecodeError(error)
    }
}

impl From<MnemonicError> for PrivateKeyError {
    fn from(error: MnemonicError) -> Self {
        PrivateKeyError::InvalidMnemonic(error)
    }
}

impl From<KeystoreError> for PrivateKeyError {
    fn from(error: KeystoreError) -> Self {
        PrivateKeyError::KeystoreError(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    IndexOutOfRange { index: usize, size: usize },
    UnknownCosigner,
    InvalidThreshold { threshold: u32, keys: usize },
}

impl Display for MultisigError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            MultisigError::IndexOutOfRange { index, size } => {
                write!(f, "Cosigner index {} out of range for {} keys", index, size)
            }
            MultisigError::UnknownCosigner => {
                write!(f, "Signature public key is not one of the cosigners")
            }
            MultisigError::InvalidThreshold { threshold, keys } => write!(
                f,
                "Threshold {} is not satisfiable with {} keys",
                threshold, keys
            ),
        }
    }
}

impl Error for MultisigError {}

/// Errors produced while building, signing and assembling transactions
#[derive(Debug)]
pub enum TxError {
    /// A required input was absent or empty
    MissingField(&'static str),
    /// An input was present but malformed, zero amounts for example
    InvalidInput(String),
    UnregisteredMessageType(String),
    /// Signing was attempted without the state it depends on
    SignatureState(String),
    SigningError { error: PrivateKeyError },
    VerifyError(PublicKeyError),
    EncodingError(CanonicalJsonError),
    MultisigError(MultisigError),
    AminoError(AminoError),
}

impl Display for TxError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            TxError::MissingField(val) => write!(f, "{} was not set or invalid", val),
            TxError::InvalidInput(val) => write!(f, "Invalid input {}", val),
            TxError::UnregisteredMessageType(val) => {
                write!(f, "No such message type registered {}", val)
            }
            TxError::SignatureState(val) => write!(f, "Can not sign {}", val),
            TxError::SigningError { error } => {
                write!(f, "Could not sign using private key {}", error)
            }
            TxError::VerifyError(val) => write!(f, "Could not verify signature {}", val),
            TxError::EncodingError(val) => write!(f, "{}", val),
            TxError::MultisigError(val) => write!(f, "{}", val),
            TxError::AminoError(val) => write!(f, "{}", val),
        }
    }
}

impl Error for TxError {}

impl From<PrivateKeyError> for TxError {
    fn from(error: PrivateKeyError) -> Self {
        TxError::SigningError { error }
    }
}

impl From<PublicKeyError> for TxError {
    fn from(error: PublicKeyError) -> Self {
        TxError::VerifyError(error)
    }
}

impl From<CanonicalJsonError> for TxError {
    fn from(error: CanonicalJsonError) -> Self {
        TxError::EncodingError(error)
    }
}

impl From<MultisigError> for TxError {
    fn from(error: MultisigError) -> Self {
        TxError::MultisigError(error)
    }
}

impl From<AminoError> for TxError {
    fn from(error: AminoError) -> Self {
        TxError::AminoError(error)
    }
}

/// Failures creating or restoring single key and multisig accounts
#[derive(Debug)]
pub enum AccountError {
    KeyError(PrivateKeyError),
    MultisigError(MultisigError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            AccountError::KeyError(val) => write!(f, "{}", val),
            AccountError::MultisigError(val) => write!(f, "{}", val),
        }
    }
}

impl Error for AccountError {}

impl From<PrivateKeyError> for AccountError {
    fn from(error: PrivateKeyError) -> Self {
        AccountError::KeyError(error)
    }
}

impl From<MultisigError> for AccountError {
    fn from(error: MultisigError) -> Self {
        AccountError::MultisigError(error)
    }
}

impl From<PublicKeyError> for AccountError {
    fn from(error: PublicKeyError) -> Self {
        AccountError::KeyError(PrivateKeyError::PublicKeyError(error))
    }
}

impl From<AddressError> for AccountError {
    fn from(error: AddressError) -> Self {
        AccountError::KeyError(PrivateKeyError::AddressError(error))
    }
}

impl From<HdWalletError> for AccountError {
    fn from(error: HdWalletError) -> Self {
        AccountError::KeyError(PrivateKeyError::HdWalletError(error))
    }
}

impl From<KeystoreError> for AccountError {
    fn from(error: KeystoreError) -> Self {
        AccountError::KeyError(PrivateKeyError::KeystoreError(error))
    }
}

impl From<MnemonicError> for AccountError {
    fn from(error: MnemonicError) -> Self {
        AccountError::KeyError(PrivateKeyError::InvalidMnemonic(error))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPrefix(String),
    InvalidPath(HdWalletError),
    MissingDenom,
    JsonError(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ConfigError::InvalidPrefix(val) => write!(f, "Invalid bech32 prefix {:?}", val),
            ConfigError::InvalidPath(val) => write!(f, "{}", val),
            ConfigError::MissingDenom => write!(f, "Fee denom must not be empty"),
            ConfigError::JsonError(val) => write!(f, "Invalid chain config {}", val),
        }
    }
}

impl Error for ConfigError {}

impl From<HdWalletError> for ConfigError {
    fn from(error: HdWalletError) -> Self {
        ConfigError::InvalidPath(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::JsonError(error)
    }
}

#[derive(Debug)]
pub enum ArrayStringError {
    TooLong,
}

impl Display for ArrayStringError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ArrayStringError::TooLong => {
                write!(f, "This string is too long!")
            }
        }
    }
}

impl Error for ArrayStringError {}
