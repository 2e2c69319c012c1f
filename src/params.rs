//! Parameter resolution over a batch item
//!
//! Two lookup modes: `require*` fails with [`ClientError::MissingParameter`]
//! when a value was never supplied, `optional*` reports absence as `None`
//! instead. Optional lookups have no failure mode at all, which makes
//! omission a first-class outcome rather than swallowed control flow.

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::types::BatchItem;

/// Read-only view over one item's parameters.
pub struct ParameterResolver<'a> {
    item: &'a BatchItem,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(item: &'a BatchItem) -> Self {
        Self { item }
    }

    /// Fetch a mandatory parameter.
    pub fn require(&self, name: &str) -> Result<&'a Value> {
        self.item
            .parameter(name)
            .ok_or_else(|| ClientError::MissingParameter(name.to_string()))
    }

    /// Soft-resolve a parameter: absent (or null) yields `None`.
    pub fn optional(&self, name: &str) -> Option<&'a Value> {
        self.item.parameter(name)
    }

    /// Fetch a mandatory string parameter.
    pub fn require_str(&self, name: &str) -> Result<&'a str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| ClientError::InvalidParameter {
                name: name.to_string(),
                message: "expected a string value".to_string(),
            })
    }

    /// Fetch a mandatory boolean parameter.
    pub fn require_bool(&self, name: &str) -> Result<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| ClientError::InvalidParameter {
                name: name.to_string(),
                message: "expected a boolean value".to_string(),
            })
    }

    /// Soft-resolve a string parameter; wrong-typed values count as absent.
    pub fn optional_str(&self, name: &str) -> Option<&'a str> {
        self.optional(name).and_then(Value::as_str)
    }

    /// Soft-resolve an integer parameter.
    pub fn optional_i64(&self, name: &str) -> Option<i64> {
        self.optional(name).and_then(Value::as_i64)
    }

    /// Soft-resolve a boolean parameter.
    pub fn optional_bool(&self, name: &str) -> Option<bool> {
        self.optional(name).and_then(Value::as_bool)
    }
}
