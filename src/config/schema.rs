//! Configuration schema definitions.

use bitcoincore_rpc::bitcoin::{Amount, Network};
use serde::Deserialize;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node connection settings.
    pub rpc: RpcConfig,

    /// Amounts, fees and confirmation bounds used by both legs.
    pub transfer: TransferConfig,

    pub logging: LoggingConfig,
}

/// Bitcoin Core RPC endpoint and wallet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,

    /// Wallet used for addresses, funding and signing.
    pub wallet: String,

    /// Network addresses are validated against ("regtest", "testnet", ...).
    pub network: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            user: "sathwik".into(),
            password: "btc18".into(),
            host: "127.0.0.1".into(),
            port: 18443,
            wallet: "default".into(),
            network: "regtest".into(),
        }
    }
}

impl RpcConfig {
    /// Node-level endpoint, e.g. `http://127.0.0.1:18443`.
    pub fn node_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Wallet-scoped endpoint, e.g. `http://127.0.0.1:18443/wallet/default`.
    pub fn wallet_url(&self) -> String {
        format!("{}/wallet/{}", self.node_url(), self.wallet)
    }

    /// Connection string for display, with the password masked.
    pub fn display_url(&self) -> String {
        format!("http://{}:***@{}:{}", self.user, self.host, self.port)
    }

    /// Parsed network. `validate_config` rejects unknown names up front.
    pub fn network(&self) -> Network {
        self.network.parse().unwrap_or(Network::Regtest)
    }
}

/// Transfer amounts in satoshis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Sent to A' before the first leg.
    pub fund_sat: u64,

    /// Paid to B' in the A'->B' leg.
    pub send_sat: u64,

    /// Upper bound paid to C' in the B'->C' leg.
    pub forward_cap_sat: u64,

    /// Flat fee left to the miner in each leg.
    pub fee_sat: u64,

    /// Blocks mined before funding so coinbase rewards are spendable.
    pub maturity_blocks: u64,

    pub min_conf: usize,
    pub max_conf: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            fund_sat: 100_000_000,
            send_sat: 50_000_000,
            forward_cap_sat: 30_000_000,
            fee_sat: 10_000,
            maturity_blocks: 101,
            min_conf: 1,
            max_conf: 9_999_999,
        }
    }
}

impl TransferConfig {
    pub fn fund_amount(&self) -> Amount {
        Amount::from_sat(self.fund_sat)
    }

    pub fn send_amount(&self) -> Amount {
        Amount::from_sat(self.send_sat)
    }

    pub fn forward_cap(&self) -> Amount {
        Amount::from_sat(self.forward_cap_sat)
    }

    pub fn fee(&self) -> Amount {
        Amount::from_sat(self.fee_sat)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's events when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
