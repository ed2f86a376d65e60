// Path: crates/types/src/config/mod.rs
//! Top-level marketplace configuration.

use crate::app::AccountId;
use crate::service_configs::{BoardParams, DividendsParams, FactoryParams, JobParams};
use serde::{Deserialize, Serialize};

/// A native balance credited at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBalance {
    /// The funded account.
    pub account: AccountId,
    /// Amount credited.
    #[serde(with = "amount")]
    pub amount: u128,
}

/// Everything needed to bring up a marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Registry factory parameters.
    pub factory: FactoryParams,
    /// Job parameters.
    pub job: JobParams,
    /// Dividends pool parameters.
    pub dividends: DividendsParams,
    /// Board parameters.
    pub board: BoardParams,
    /// Native balances credited at genesis.
    pub genesis: Vec<GenesisBalance>,
}

impl MarketConfig {
    /// Parses a configuration from TOML. Missing sections take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Serde helper for `u128` amounts.
///
/// TOML integers are 64-bit, so amounts are written as decimal strings. Plain integers
/// are accepted on input.
pub mod amount {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Str(String),
    }

    /// Serializes an amount as a decimal string.
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserializes an amount from a decimal string or an integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(v as u128),
            Repr::Str(s) => s.replace('_', "").parse::<u128>().map_err(de::Error::custom),
        }
    }
}
