//! Typed parameter binding
//!
//! The router only ever hands out raw strings. A [`ParamSchema`] describes
//! the fields a handler expects and coerces a matched parameter map into
//! typed [`ParamValue`]s. Field names are matched case-insensitively; fields
//! absent from the map are left unbound.
//!
//! ```
//! use switchyard::bind::{ParamKind, ParamSchema};
//! use switchyard::Router;
//!
//! let mut router = Router::new();
//! router.add("/events/{id:int}/{on:datetime}", ()).unwrap();
//! let m = router.match_path("/events/7/2023-12-25");
//!
//! let schema = ParamSchema::new()
//!     .field("Id", ParamKind::Int)
//!     .field("On", ParamKind::DateTime);
//! let bound = schema.bind(m.params()).unwrap();
//! assert_eq!(bound.get_int("id"), Some(7));
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::constraint::builtin::parse_datetime;
use crate::Params;

/// Target type of a bound field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
    Float,
    Bool,
    Guid,
    DateTime,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Str => "string",
            ParamKind::Int => "integer",
            ParamKind::Float => "float",
            ParamKind::Bool => "boolean",
            ParamKind::Guid => "guid",
            ParamKind::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Guid(Uuid),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("parameter `{field}` value `{value}` is not a valid {kind}")]
    Invalid {
        field: String,
        value: String,
        kind: ParamKind,
    },
}

/// Declared fields and their target kinds
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    fields: Vec<(String, ParamKind)>,
}

impl ParamSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    /// Coerces every declared field present in `params`
    ///
    /// Stops at the first value that fails to convert.
    pub fn bind(&self, params: &Params) -> Result<BoundParams, BindError> {
        let by_key: HashMap<String, &str> = params
            .iter()
            .map(|(name, value)| (name.to_lowercase(), value.as_str()))
            .collect();

        let mut values = HashMap::new();
        for (name, kind) in &self.fields {
            let key = name.to_lowercase();
            let Some(raw) = by_key.get(&key) else {
                continue;
            };
            let value = coerce(raw, *kind).ok_or_else(|| BindError::Invalid {
                field: name.clone(),
                value: raw.to_string(),
                kind: *kind,
            })?;
            values.insert(key, value);
        }

        Ok(BoundParams { values })
    }
}

fn coerce(raw: &str, kind: ParamKind) -> Option<ParamValue> {
    match kind {
        ParamKind::Str => Some(ParamValue::Str(raw.to_string())),
        ParamKind::Int => raw.parse().ok().map(ParamValue::Int),
        ParamKind::Float => raw.parse().ok().map(ParamValue::Float),
        ParamKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(ParamValue::Bool(true)),
            "false" | "0" | "no" | "off" => Some(ParamValue::Bool(false)),
            _ => None,
        },
        ParamKind::Guid => Uuid::try_parse(raw).ok().map(ParamValue::Guid),
        ParamKind::DateTime => parse_datetime(raw).map(ParamValue::DateTime),
    }
}

/// Typed values keyed by lowercased field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    values: HashMap<String, ParamValue>,
}

impl BoundParams {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(&name.to_lowercase())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            ParamValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ParamValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ParamValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ParamValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_guid(&self, name: &str) -> Option<Uuid> {
        match self.get(name)? {
            ParamValue::Guid(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_datetime(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name)? {
            ParamValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
