//! Output planning for a single-input spend.
//!
//! The node picks nothing for us: the flows name the input UTXO and every
//! output explicitly, so the amounts are worked out here before
//! `createrawtransaction`.

use std::collections::HashMap;

use bitcoincore_rpc::bitcoin::{Address, Amount};
use bitcoincore_rpc::json::CreateRawTransactionInput;

use crate::error::{Error, Result};
use crate::rpc::Utxo;

/// How much to pay the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendAmount {
    /// Exactly this amount; the input must cover it plus the fee.
    Fixed(Amount),
    /// At most this amount, shrunk to whatever the input holds after the fee.
    UpTo(Amount),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendPlan {
    pub input: Utxo,
    pub recipient: Address,
    pub send: Amount,
    pub fee: Amount,
    /// Change paid back to the spending address, if any is left.
    pub change: Option<(Address, Amount)>,
}

/// Split `utxo` into a payment to `recipient`, the fee, and change back to
/// `change_to`.
pub fn plan_spend(
    utxo: &Utxo,
    recipient: &Address,
    change_to: &Address,
    amount: SendAmount,
    fee: Amount,
) -> Result<SpendPlan> {
    let available = utxo.amount;

    let send = match amount {
        SendAmount::Fixed(send) => send,
        SendAmount::UpTo(cap) => match available.checked_sub(fee) {
            Some(spendable) if spendable > Amount::ZERO => cap.min(spendable),
            _ => {
                return Err(Error::InsufficientFunds {
                    available,
                    needed: fee + Amount::ONE_SAT,
                });
            }
        },
    };

    let needed = send
        .checked_add(fee)
        .ok_or(Error::InsufficientFunds { available, needed: Amount::MAX })?;
    let change = available
        .checked_sub(needed)
        .ok_or(Error::InsufficientFunds { available, needed })?;

    Ok(SpendPlan {
        input: utxo.clone(),
        recipient: recipient.clone(),
        send,
        fee,
        change: (change > Amount::ZERO).then(|| (change_to.clone(), change)),
    })
}

impl SpendPlan {
    /// The single input, as `createrawtransaction` expects it.
    pub fn inputs(&self) -> Vec<CreateRawTransactionInput> {
        vec![CreateRawTransactionInput {
            txid: self.input.txid,
            vout: self.input.vout,
            sequence: None,
        }]
    }

    /// Address to amount map, as `createrawtransaction` expects it.
    pub fn outputs(&self) -> HashMap<String, Amount> {
        let mut outputs = HashMap::with_capacity(2);
        outputs.insert(self.recipient.to_string(), self.send);
        if let Some((address, amount)) = &self.change {
            outputs.insert(address.to_string(), *amount);
        }
        outputs
    }
}
