//! Access to the Bitcoin Core node.
//!
//! [`NodeRpc`] lists the handful of RPC methods the transfer flows use.
//! [`CoreRpc`] implements it over `bitcoincore_rpc`, keeping one client for
//! node-level calls and one bound to the wallet endpoint.

use std::collections::HashMap;

use bitcoin::hex::DisplayHex;
use bitcoincore_rpc::bitcoin::address::NetworkUnchecked;
use bitcoincore_rpc::bitcoin::{Address, Amount, Network, Txid};
use bitcoincore_rpc::json::{AddressType, CreateRawTransactionInput};
use bitcoincore_rpc::{Auth, Client, RpcApi};
use serde::Deserialize;
use serde_json::json;

use crate::config::RpcConfig;
use crate::error::{Error, Result};

pub use bitcoincore_rpc::Result as RpcResult;

/// Subset of `getblockchaininfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainInfo {
    pub chain: String,
    pub blocks: u64,
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: String,
}

/// A spendable output reported by `listunspent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    pub amount: Amount,
    pub confirmations: u32,
}

/// Result of `signrawtransactionwithwallet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub hex: String,
    pub complete: bool,
}

/// The RPC methods needed to fund, build, sign and broadcast a transfer.
pub trait NodeRpc {
    fn blockchain_info(&self) -> RpcResult<ChainInfo>;

    fn list_wallets(&self) -> RpcResult<Vec<String>>;

    fn load_wallet(&self, name: &str) -> RpcResult<()>;

    /// Trusted, confirmed wallet balance.
    fn balance(&self) -> RpcResult<Amount>;

    /// New wallet address, not yet checked against any network. `kind` of
    /// `None` uses the wallet default.
    fn new_address(
        &self,
        label: &str,
        kind: Option<AddressType>,
    ) -> RpcResult<Address<NetworkUnchecked>>;

    fn generate_to_address(&self, blocks: u64, address: &Address) -> RpcResult<Vec<String>>;

    fn send_to_address(&self, address: &Address, amount: Amount) -> RpcResult<Txid>;

    fn list_unspent(
        &self,
        min_conf: usize,
        max_conf: usize,
        address: &Address,
    ) -> RpcResult<Vec<Utxo>>;

    /// Unsigned transaction hex spending `inputs` into `outputs` (address -> amount).
    fn create_raw_transaction(
        &self,
        inputs: &[CreateRawTransactionInput],
        outputs: &HashMap<String, Amount>,
    ) -> RpcResult<String>;

    fn sign_raw_transaction(&self, hex: &str) -> RpcResult<SignedTransaction>;

    fn send_raw_transaction(&self, hex: &str) -> RpcResult<Txid>;

    /// Decoded transaction, as returned by the node.
    fn decode_raw_transaction(&self, hex: &str) -> RpcResult<serde_json::Value>;
}

/// Accept `address` only if it belongs to `network`.
pub fn require_network(address: Address<NetworkUnchecked>, network: Network) -> Result<Address> {
    let text = address.clone().assume_checked().to_string();
    address.require_network(network).map_err(|e| Error::Address {
        address: text,
        reason: e.to_string(),
    })
}

/// [`NodeRpc`] backed by a live bitcoind.
pub struct CoreRpc {
    node: Client,
    wallet: Client,
}

impl CoreRpc {
    /// Build node and wallet clients. No request is sent until the first call.
    pub fn new(config: &RpcConfig) -> RpcResult<Self> {
        let auth = || Auth::UserPass(config.user.clone(), config.password.clone());
        let node = Client::new(&config.node_url(), auth())?;
        let wallet = Client::new(&config.wallet_url(), auth())?;

        Ok(Self { node, wallet })
    }
}

impl NodeRpc for CoreRpc {
    fn blockchain_info(&self) -> RpcResult<ChainInfo> {
        self.node.call::<ChainInfo>("getblockchaininfo", &[])
    }

    fn list_wallets(&self) -> RpcResult<Vec<String>> {
        self.node.list_wallets()
    }

    fn load_wallet(&self, name: &str) -> RpcResult<()> {
        self.node.load_wallet(name).map(|_| ())
    }

    fn balance(&self) -> RpcResult<Amount> {
        self.wallet.get_balance(None, None)
    }

    fn new_address(
        &self,
        label: &str,
        kind: Option<AddressType>,
    ) -> RpcResult<Address<NetworkUnchecked>> {
        self.wallet.get_new_address(Some(label), kind)
    }

    fn generate_to_address(&self, blocks: u64, address: &Address) -> RpcResult<Vec<String>> {
        let hashes = self.wallet.generate_to_address(blocks, address)?;
        Ok(hashes.iter().map(ToString::to_string).collect())
    }

    fn send_to_address(&self, address: &Address, amount: Amount) -> RpcResult<Txid> {
        self.wallet
            .send_to_address(address, amount, None, None, None, None, None, None)
    }

    fn list_unspent(
        &self,
        min_conf: usize,
        max_conf: usize,
        address: &Address,
    ) -> RpcResult<Vec<Utxo>> {
        let addresses = [address];
        let entries = self.wallet.list_unspent(
            Some(min_conf),
            Some(max_conf),
            Some(&addresses[..]),
            None,
            None,
        )?;

        Ok(entries
            .into_iter()
            .map(|entry| Utxo {
                txid: entry.txid,
                vout: entry.vout,
                amount: entry.amount,
                confirmations: entry.confirmations,
            })
            .collect())
    }

    fn create_raw_transaction(
        &self,
        inputs: &[CreateRawTransactionInput],
        outputs: &HashMap<String, Amount>,
    ) -> RpcResult<String> {
        self.wallet
            .create_raw_transaction_hex(inputs, outputs, None, None)
    }

    fn sign_raw_transaction(&self, hex: &str) -> RpcResult<SignedTransaction> {
        let signed = self
            .wallet
            .sign_raw_transaction_with_wallet(hex, None, None)?;

        Ok(SignedTransaction {
            hex: signed.hex.to_lower_hex_string(),
            complete: signed.complete,
        })
    }

    fn send_raw_transaction(&self, hex: &str) -> RpcResult<Txid> {
        self.wallet.send_raw_transaction(hex)
    }

    fn decode_raw_transaction(&self, hex: &str) -> RpcResult<serde_json::Value> {
        // The typed result drops fields we print, so take the raw JSON.
        self.wallet
            .call::<serde_json::Value>("decoderawtransaction", &[json!(hex)])
    }
}
