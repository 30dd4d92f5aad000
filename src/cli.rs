use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use segwit_chain::config::{Config, load_config, validate_config};
use segwit_chain::{Error, Result};

#[derive(Parser)]
#[command(name = "segwit-chain")]
#[command(version, about = "Chained P2SH-SegWit transactions on a regtest Bitcoin Core node", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub rpc: RpcArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[rpc]` section.
#[derive(Args)]
pub struct RpcArgs {
    #[arg(long, global = true)]
    pub rpc_user: Option<String>,

    #[arg(long, global = true)]
    pub rpc_password: Option<String>,

    #[arg(long, global = true)]
    pub rpc_host: Option<String>,

    #[arg(long, global = true)]
    pub rpc_port: Option<u16>,

    #[arg(short, long, global = true, help = "Wallet to load and use")]
    pub wallet: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create A', B', C', fund A' and send A' -> B'
    AToB,

    /// Send the confirmed B' output to C'
    BToC {
        #[arg(long, help = "Address B' (sender); prompted for when omitted")]
        from: Option<String>,

        #[arg(long, help = "Address C' (receiver); prompted for when omitted")]
        to: Option<String>,
    },

    /// Run A' -> B' and then B' -> C' in one go
    Chain,
}

impl Cli {
    /// Defaults, then the config file, then command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        let rpc = &mut config.rpc;
        if let Some(user) = &self.rpc.rpc_user {
            rpc.user = user.clone();
        }
        if let Some(password) = &self.rpc.rpc_password {
            rpc.password = password.clone();
        }
        if let Some(host) = &self.rpc.rpc_host {
            rpc.host = host.clone();
        }
        if let Some(port) = self.rpc.rpc_port {
            rpc.port = port;
        }
        if let Some(wallet) = &self.rpc.wallet {
            rpc.wallet = wallet.clone();
        }

        validate_config(&config).map_err(|errors| {
            let joined: Vec<_> = errors.iter().map(ToString::to_string).collect();
            Error::Config(joined.join(", "))
        })?;
        Ok(config)
    }
}
