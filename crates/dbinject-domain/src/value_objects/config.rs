//! Client behavior options
//!
//! Controls which schemas, relations and functions the client loads and
//! how function results are shaped.

use serde::{Deserialize, Serialize};

/// Client-level behavior flags
///
/// The default value is empty: every field unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    /// Relative path to a scripts directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<String>,
    /// Only load tables, views, and functions from these schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_schemas: Option<Vec<String>>,
    /// Only load tables and views matching the whitelist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    /// Never load tables and views matching the blacklist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
    /// Exceptions to the blacklist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<Vec<String>>,
    /// Only load functions matching the whitelist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_whitelist: Option<Vec<String>>,
    /// Never load functions matching the blacklist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_blacklist: Option<Vec<String>>,
    /// Streamline function return values: records become objects and
    /// scalars become plain values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_functions: Option<bool>,
    /// Don't load database functions at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_functions: Option<bool>,
    /// Document table primary key type (`serial` or `uuid`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_pk_type: Option<String>,
    /// UUID version for document primary keys (`v1`, `v1mc` or `v4`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid_version: Option<String>,
}

impl ConfigOptions {
    /// True when no option is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Restrict loading to the given schemas
    pub fn with_allowed_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_schemas = Some(schemas.into_iter().map(Into::into).collect());
        self
    }

    /// Toggle streamlined function results
    pub fn with_enhanced_functions(mut self, enabled: bool) -> Self {
        self.enhanced_functions = Some(enabled);
        self
    }

    /// Toggle function loading
    pub fn with_exclude_functions(mut self, exclude: bool) -> Self {
        self.exclude_functions = Some(exclude);
        self
    }
}
