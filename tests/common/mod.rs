//! Scripted in-memory node for driving the transfer flows.
//!
//! Keeps just enough ledger state for the flows to make progress: coins sent
//! or broadcast to an address show up in `listunspent` for that address.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::str::FromStr;

use bitcoincore_rpc::bitcoin::address::NetworkUnchecked;
use bitcoincore_rpc::bitcoin::{Address, Amount, Network, ScriptBuf, Txid};
use bitcoincore_rpc::json::{AddressType, CreateRawTransactionInput};
use segwit_chain::config::Config;
use segwit_chain::rpc::{ChainInfo, NodeRpc, RpcResult, SignedTransaction, Utxo};
use serde_json::{Value, json};

pub fn regtest_address(tag: u8) -> Address {
    Address::p2sh(&ScriptBuf::from_bytes(vec![0x51, tag]), Network::Regtest).unwrap()
}

pub fn txid(n: u64) -> Txid {
    Txid::from_str(&format!("{n:064x}")).unwrap()
}

pub fn btc(value: f64) -> Amount {
    Amount::from_btc(value).unwrap()
}

fn rpc_error(message: &str) -> bitcoincore_rpc::Error {
    bitcoincore_rpc::Error::ReturnedError(message.to_owned())
}

pub struct RawTx {
    pub inputs: Vec<CreateRawTransactionInput>,
    pub outputs: HashMap<String, Amount>,
    pub txid: Txid,
}

/// Fake bitcoind. Every RPC method name is appended to `calls`.
pub struct FakeNode {
    pub calls: RefCell<Vec<String>>,
    pub loaded_wallets: RefCell<Vec<String>>,
    pub reachable: bool,
    pub loadable: bool,
    pub sign_complete: bool,
    /// When false, `sendtoaddress` succeeds but the coin never shows up.
    pub funding_lands: bool,
    /// Hand out mainnet addresses regardless of the node's chain.
    pub foreign_addresses: bool,
    /// Output left out of `decoderawtransaction` results.
    pub hidden_output: Option<Address>,
    pub balance: Amount,
    pub address_kinds: RefCell<Vec<(String, Option<AddressType>)>>,
    pub mined: RefCell<Vec<(u64, Address)>>,
    pub utxos: RefCell<HashMap<Address, Vec<Utxo>>>,
    pub raw: RefCell<Vec<RawTx>>,
    pub next_address: Cell<u8>,
    pub next_txid: Cell<u64>,
}

impl Default for FakeNode {
    fn default() -> Self {
        Self {
            calls: RefCell::default(),
            loaded_wallets: RefCell::new(vec!["default".into()]),
            reachable: true,
            loadable: true,
            sign_complete: true,
            funding_lands: true,
            foreign_addresses: false,
            hidden_output: None,
            balance: btc(50.0),
            address_kinds: RefCell::default(),
            mined: RefCell::default(),
            utxos: RefCell::default(),
            raw: RefCell::default(),
            next_address: Cell::new(1),
            next_txid: Cell::new(1),
        }
    }
}

impl FakeNode {
    pub fn with_utxo(self, address: &Address, amount: Amount) -> Self {
        let id = self.fresh_txid();
        self.credit(address, id, 0, amount);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, method: &str) {
        self.calls.borrow_mut().push(method.to_owned());
    }

    fn fresh_txid(&self) -> Txid {
        let n = self.next_txid.get();
        self.next_txid.set(n + 1);
        txid(n)
    }

    fn credit(&self, address: &Address, txid: Txid, vout: u32, amount: Amount) {
        self.utxos
            .borrow_mut()
            .entry(address.clone())
            .or_default()
            .push(Utxo {
                txid,
                vout,
                amount,
                confirmations: 1,
            });
    }

    fn find_raw(&self, hex: &str) -> Option<usize> {
        let index = hex.trim_start_matches("signed-").strip_prefix("raw")?;
        index.parse().ok()
    }
}

impl NodeRpc for FakeNode {
    fn blockchain_info(&self) -> RpcResult<ChainInfo> {
        self.record("getblockchaininfo");
        if !self.reachable {
            return Err(rpc_error("connection refused"));
        }
        Ok(ChainInfo {
            chain: "regtest".into(),
            blocks: 0,
            best_block_hash: "00".repeat(32),
        })
    }

    fn list_wallets(&self) -> RpcResult<Vec<String>> {
        self.record("listwallets");
        Ok(self.loaded_wallets.borrow().clone())
    }

    fn load_wallet(&self, name: &str) -> RpcResult<()> {
        self.record("loadwallet");
        if !self.loadable {
            return Err(rpc_error("Wallet file not found"));
        }
        self.loaded_wallets.borrow_mut().push(name.to_owned());
        Ok(())
    }

    fn balance(&self) -> RpcResult<Amount> {
        self.record("getbalance");
        Ok(self.balance)
    }

    fn new_address(
        &self,
        label: &str,
        kind: Option<AddressType>,
    ) -> RpcResult<Address<NetworkUnchecked>> {
        self.record("getnewaddress");
        self.address_kinds.borrow_mut().push((label.to_owned(), kind));
        let tag = self.next_address.get();
        self.next_address.set(tag + 1);

        let network = if self.foreign_addresses {
            Network::Bitcoin
        } else {
            Network::Regtest
        };
        let address = Address::p2sh(&ScriptBuf::from_bytes(vec![0x51, tag]), network).unwrap();
        Ok(address.to_string().parse().unwrap())
    }

    fn generate_to_address(&self, blocks: u64, address: &Address) -> RpcResult<Vec<String>> {
        self.record("generatetoaddress");
        self.mined.borrow_mut().push((blocks, address.clone()));
        Ok((0..blocks).map(|n| format!("{n:064x}")).collect())
    }

    fn send_to_address(&self, address: &Address, amount: Amount) -> RpcResult<Txid> {
        self.record("sendtoaddress");
        let id = self.fresh_txid();
        if self.funding_lands {
            self.credit(address, id, 0, amount);
        }
        Ok(id)
    }

    fn list_unspent(
        &self,
        _min_conf: usize,
        _max_conf: usize,
        address: &Address,
    ) -> RpcResult<Vec<Utxo>> {
        self.record("listunspent");
        Ok(self.utxos.borrow().get(address).cloned().unwrap_or_default())
    }

    fn create_raw_transaction(
        &self,
        inputs: &[CreateRawTransactionInput],
        outputs: &HashMap<String, Amount>,
    ) -> RpcResult<String> {
        self.record("createrawtransaction");
        let txid = self.fresh_txid();
        let mut raw = self.raw.borrow_mut();
        raw.push(RawTx {
            inputs: inputs.to_vec(),
            outputs: outputs.clone(),
            txid,
        });
        Ok(format!("raw{}", raw.len() - 1))
    }

    fn sign_raw_transaction(&self, hex: &str) -> RpcResult<SignedTransaction> {
        self.record("signrawtransactionwithwallet");
        Ok(SignedTransaction {
            hex: format!("signed-{hex}"),
            complete: self.sign_complete,
        })
    }

    fn send_raw_transaction(&self, hex: &str) -> RpcResult<Txid> {
        self.record("sendrawtransaction");
        let index = self.find_raw(hex).ok_or_else(|| rpc_error("TX decode failed"))?;
        let raw = self.raw.borrow();
        let tx = &raw[index];

        // Spent inputs leave the UTXO set, outputs join it
        for utxos in self.utxos.borrow_mut().values_mut() {
            utxos.retain(|u| !tx.inputs.iter().any(|i| i.txid == u.txid && i.vout == u.vout));
        }
        let mut outputs: Vec<_> = tx.outputs.iter().collect();
        outputs.sort();
        for (vout, (address, amount)) in outputs.into_iter().enumerate() {
            let address = address
                .parse::<Address<NetworkUnchecked>>()
                .map_err(|e| rpc_error(&e.to_string()))?
                .assume_checked();
            self.credit(&address, tx.txid, vout as u32, *amount);
        }
        Ok(tx.txid)
    }

    fn decode_raw_transaction(&self, hex: &str) -> RpcResult<Value> {
        self.record("decoderawtransaction");
        let index = self.find_raw(hex).ok_or_else(|| rpc_error("TX decode failed"))?;
        let raw = self.raw.borrow();
        let tx = &raw[index];

        let hidden = self.hidden_output.as_ref().map(ToString::to_string);
        let mut outputs: Vec<_> = tx
            .outputs
            .iter()
            .filter(|(address, _)| Some(*address) != hidden.as_ref())
            .collect();
        outputs.sort();
        let vout: Vec<Value> = outputs
            .into_iter()
            .enumerate()
            .map(|(n, (address, amount))| {
                json!({
                    "value": amount.to_btc(),
                    "n": n,
                    "scriptPubKey": {"hex": format!("a914{n:040x}87"), "address": address, "type": "scripthash"}
                })
            })
            .collect();
        let vin: Vec<Value> = tx
            .inputs
            .iter()
            .map(|input| {
                json!({
                    "txid": input.txid.to_string(),
                    "vout": input.vout,
                    "scriptSig": {"asm": "0014deadbeef", "hex": "160014deadbeef"},
                    "txinwitness": ["3044cafe01", "02beef"],
                })
            })
            .collect();

        Ok(json!({"txid": tx.txid.to_string(), "vin": vin, "vout": vout}))
    }
}

pub fn config() -> Config {
    Config::default()
}

pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}
