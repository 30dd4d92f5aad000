//! Crate-wide error type.

use thiserror::Error;

/// Everything that can stop a transfer run.
///
/// None of these are retried; the binary prints the message and exits
/// with a non-zero status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(
        "Could not connect to Bitcoin Core. Is bitcoind running in regtest mode?\nDetails: {0}"
    )]
    Connect(#[source] bitcoincore_rpc::Error),

    #[error("loading wallet '{wallet}': {source}")]
    Wallet {
        wallet: String,
        #[source]
        source: bitcoincore_rpc::Error,
    },

    #[error("RPC call failed: {0}")]
    Rpc(#[from] bitcoincore_rpc::Error),

    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("No UTXOs available for address {address}.{hint}")]
    NoUtxos { address: String, hint: &'static str },

    #[error("Not enough funds available after fees! (available {available}, needed {needed})")]
    InsufficientFunds {
        available: bitcoincore_rpc::bitcoin::Amount,
        needed: bitcoincore_rpc::bitcoin::Amount,
    },

    #[error("Transaction signing incomplete!")]
    SigningIncomplete,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
