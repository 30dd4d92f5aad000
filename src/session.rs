//! Connecting to the node and selecting the wallet.

use std::io::Write;

use crate::config::RpcConfig;
use crate::error::{Error, Result};
use crate::rpc::{ChainInfo, NodeRpc};

/// Check the node answers before doing anything else.
pub fn connect<R: NodeRpc + ?Sized>(
    rpc: &R,
    config: &RpcConfig,
    out: &mut impl Write,
) -> Result<ChainInfo> {
    writeln!(out, "Connecting to Bitcoin Core at {}", config.display_url())?;

    let info = rpc.blockchain_info().map_err(Error::Connect)?;
    tracing::info!(
        chain = %info.chain,
        blocks = info.blocks,
        best_block = %info.best_block_hash,
        "Connected to node"
    );
    Ok(info)
}

/// Make sure `wallet` is loaded, loading it if the node has not.
pub fn open_wallet<R: NodeRpc + ?Sized>(
    rpc: &R,
    wallet: &str,
    out: &mut impl Write,
) -> Result<()> {
    let wallet_err = |source| Error::Wallet {
        wallet: wallet.to_owned(),
        source,
    };

    let loaded = rpc.list_wallets().map_err(wallet_err)?;
    if !loaded.iter().any(|name| name == wallet) {
        writeln!(out, "Wallet '{wallet}' not loaded; attempting to load it...")?;
        rpc.load_wallet(wallet).map_err(wallet_err)?;
        tracing::info!(wallet, "Loaded wallet");
    } else {
        tracing::debug!(wallet, "Wallet already loaded");
    }
    Ok(())
}
