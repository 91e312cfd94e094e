//! Driver tuning options

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Low-level tuning passed through to the connection driver
///
/// Driver options are optional; when none are supplied the default (empty)
/// value is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverOptions {
    /// Schema search path applied to every session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Vec<String>>,
    /// Capitalize generated SQL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_sql: Option<bool>,
    /// Suppress driver warnings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_warnings: Option<bool>,
    /// Use the native driver bindings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg_native: Option<bool>,
    /// Driver-specific settings not modelled above
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DriverOptions {
    /// True when no option is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Set the schema search path
    pub fn with_schema<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema = Some(schemas.into_iter().map(Into::into).collect());
        self
    }

    /// Add a driver-specific setting
    pub fn with_extra<K: Into<String>>(mut self, key: K, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
