//! Configuration validation.
//!
//! Returns every problem found, not just the first.

use bitcoincore_rpc::bitcoin::Network;

use crate::config::schema::Config;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let rpc = &config.rpc;
    let transfer = &config.transfer;

    for (field, value) in [
        ("rpc.user", &rpc.user),
        ("rpc.host", &rpc.host),
        ("rpc.wallet", &rpc.wallet),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if rpc.port == 0 {
        errors.push(ValidationError::new("rpc.port", "must be non-zero"));
    }

    if rpc.network.parse::<Network>().is_err() {
        errors.push(ValidationError::new(
            "rpc.network",
            format!("unknown network '{}'", rpc.network),
        ));
    }

    for (field, value) in [
        ("transfer.fund_sat", transfer.fund_sat),
        ("transfer.send_sat", transfer.send_sat),
        ("transfer.forward_cap_sat", transfer.forward_cap_sat),
        ("transfer.fee_sat", transfer.fee_sat),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if transfer.fee_sat >= transfer.send_sat {
        errors.push(ValidationError::new(
            "transfer.fee_sat",
            "must be smaller than transfer.send_sat",
        ));
    }

    if transfer.max_conf < transfer.min_conf {
        errors.push(ValidationError::new(
            "transfer.max_conf",
            "must not be below transfer.min_conf",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
