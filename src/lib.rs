#![warn(clippy::all)]
#![allow(clippy::pedantic)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[cfg(test)]
#[macro_use]
extern crate serde_json;

#[cfg(not(test))]
extern crate serde_json;

pub mod account;
pub mod address;
pub mod amino;
pub mod base_req;
pub mod canonical_json;
pub mod coin;
pub mod config;
pub mod error;
pub mod hd_wallet;
pub mod keystore;
pub mod mnemonic;
pub mod msg;
pub mod msg_builder;
pub mod multisig;
pub mod private_key;
pub mod public_key;
pub mod signature;
pub mod stdfee;
pub mod stdsignmsg;
pub mod stdtx;
pub mod transaction;
pub mod tx_builder;
pub mod utils;

pub use account::{Account, AccountMultisig};
pub use address::Address;
pub use amino::AminoPubKey;
pub use base_req::{BaseReq, BaseReqBody};
pub use coin::Coin;
pub use config::ChainConfig;
pub use error::{AccountError, TxError};
pub use keystore::KeystoreV3;
pub use mnemonic::Mnemonic;
pub use msg::Msg;
pub use msg_builder::{MsgInput, MsgKind, MsgRegistry};
pub use multisig::{CompactBitArray, MultisigThresholdPubKey, Multisignature};
pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::StdSignature;
pub use stdfee::StdFee;
pub use stdsignmsg::StdSignMsg;
pub use stdtx::{StdTx, TxEnvelope};
pub use transaction::{BroadcastMode, BroadcastRequest};
pub use tx_builder::{TxBuilder, TxInfo};

pub use num256::Uint256;
