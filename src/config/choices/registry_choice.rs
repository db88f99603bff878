use anyhow::Result;
use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt::Display;
use strum::{EnumMessage, IntoEnumIterator};

/// Contract for an adjacently tagged `{"type": .., "params": ..}` registry enum.
pub trait RegistryChoice: Sized + Serialize + DeserializeOwned + JsonSchema {
    type Kind: Copy + Display + EnumMessage + IntoEnumIterator;

    /// JSON Schema for the whole tagged enum.
    fn schema() -> Schema;

    /// Default `params` JSON for a given kind.
    fn default_params(kind: Self::Kind) -> Value;

    /// Build the typed enum from kind + params.
    fn from_parts(kind: Self::Kind, params: Value) -> Result<Self> {
        let v = json!({ "type": kind.to_string(), "params": params });
        Ok(serde_json::from_value(v)?)
    }
}
