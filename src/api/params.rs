//
//  datamall
//  api/params.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Parameter Builder for DataMall Endpoints
//!
//! This module turns caller-friendly arguments into the exact query-parameter
//! set an endpoint expects: it merges defaults with caller-supplied values,
//! validates the result against the endpoint's declared schema, renames keys
//! to their wire spelling (e.g. snake_case to camelCase) and serializes
//! date-typed values into the formats the API accepts.
//!
//! # Overview
//!
//! - [`ParamValue`] - a typed scalar argument
//! - [`ParamKind`] / [`ParamField`] / [`ParamSchema`] - the declared argument
//!   shape of an endpoint
//! - [`build_params`] - the pure merge/validate/rename/serialize function
//! - [`WireParams`] - the resulting ordered map of wire name to serialized
//!   string
//!
//! # Example
//!
//! ```rust
//! use datamall::api::params::{
//!     build_params, ParamField, ParamKind, ParamSchema, ParamValue, Params,
//! };
//!
//! static SCHEMA: ParamSchema = ParamSchema {
//!     fields: &[ParamField {
//!         name: "postal_code",
//!         kind: ParamKind::Str,
//!         required: true,
//!     }],
//! };
//!
//! let mut params = Params::new();
//! params.insert("postal_code".to_string(), ParamValue::from("247964"));
//!
//! let wire = build_params(&SCHEMA, params, Params::new(), &[("postal_code", "PostalCode")])
//!     .unwrap();
//! assert_eq!(wire.get("PostalCode").map(String::as_str), Some("247964"));
//! ```
//!
//! # Notes
//!
//! - Validation happens before any network call; a violation is
//!   [`ApiError::Validation`].
//! - A datetime value is serialized by the datetime rule even though it also
//!   carries a date; the [`ParamValue`] match arms keep that precedence.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::api::ApiError;

/// Ordered mapping from local argument name to typed value, built fresh per
/// call.
pub type Params = BTreeMap<String, ParamValue>;

/// Ordered mapping from wire parameter name to serialized scalar.
///
/// This is what actually goes onto the query string, including the `$skip`
/// pagination cursor the pipeline maintains.
pub type WireParams = BTreeMap<String, String>;

/// A typed scalar argument for an endpoint.
///
/// The variants cover every value type the DataMall endpoints accept. Date
/// and datetime values are serialized specially by [`build_params`]; the
/// rest pass through via their display form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A plain string argument (codes, identifiers, layer names).
    Str(String),
    /// An integer argument.
    Int(i64),
    /// A floating-point argument (coordinates, distances).
    Float(f64),
    /// A datetime argument, serialized as `YYYY-MM-DDTHH:MM:SS`.
    DateTime(NaiveDateTime),
    /// A date argument, serialized as `YYYYMM` (the endpoints accept only
    /// year and month for date filters).
    Date(NaiveDate),
}

impl ParamValue {
    /// The [`ParamKind`] this value satisfies.
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::DateTime(_) => ParamKind::DateTime,
            ParamValue::Date(_) => ParamKind::Date,
        }
    }

    /// Serializes the value into its wire form.
    ///
    /// The `DateTime` arm must stay ahead of the `Date` arm: a datetime is
    /// also a date, and the endpoints want the full timestamp when one is
    /// available.
    fn to_wire(&self) -> String {
        match self {
            ParamValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ParamValue::Date(d) => d.format("%Y%m").to_string(),
            ParamValue::Str(s) => s.clone(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        ParamValue::Date(value)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::DateTime(value)
    }
}

/// The expected type of one endpoint argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Expects [`ParamValue::Str`].
    Str,
    /// Expects [`ParamValue::Int`].
    Int,
    /// Expects [`ParamValue::Float`].
    Float,
    /// Expects [`ParamValue::DateTime`].
    DateTime,
    /// Expects [`ParamValue::Date`].
    Date,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Str => "string",
            ParamKind::Int => "integer",
            ParamKind::Float => "float",
            ParamKind::DateTime => "datetime",
            ParamKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// One permitted argument of an endpoint: local name, expected type and
/// whether the caller must supply it.
#[derive(Debug, Clone, Copy)]
pub struct ParamField {
    /// Local (caller-facing) argument name.
    pub name: &'static str,
    /// Expected value type.
    pub kind: ParamKind,
    /// Whether the merged parameter set must contain this argument.
    pub required: bool,
}

/// The declared argument shape of an endpoint: the complete set of permitted
/// keys with their expected types.
///
/// Declared as static data per endpoint, never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct ParamSchema {
    /// Every permitted argument.
    pub fields: &'static [ParamField],
}

impl ParamSchema {
    /// A schema that permits no arguments at all.
    pub const EMPTY: ParamSchema = ParamSchema { fields: &[] };

    fn field(&self, name: &str) -> Option<&ParamField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builds the wire parameter set for an endpoint.
///
/// Merges `defaults` with `original` (keys present in both resolve in favour
/// of `original`), validates the merged set against `schema`, renames each
/// key via `key_map` and serializes the values. Pure function of its inputs;
/// no network I/O.
///
/// # Parameters
///
/// * `schema` - The endpoint's declared argument shape.
/// * `original` - Caller-supplied arguments.
/// * `defaults` - Default values, overridden by `original`.
/// * `key_map` - Local-name to wire-name renames; unmapped keys keep their
///   name.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the merged set contains a key the
/// schema does not name, a value of the wrong type, or omits a required
/// argument. This fails fast, before any network call.
pub fn build_params(
    schema: &ParamSchema,
    original: Params,
    defaults: Params,
    key_map: &[(&str, &str)],
) -> Result<WireParams, ApiError> {
    let mut joined = defaults;
    joined.extend(original);

    for (key, value) in &joined {
        let Some(field) = schema.field(key) else {
            return Err(ApiError::Validation(format!(
                "unexpected parameter \"{key}\""
            )));
        };
        if value.kind() != field.kind {
            return Err(ApiError::Validation(format!(
                "parameter \"{key}\" must be a {}, got a {}",
                field.kind,
                value.kind()
            )));
        }
    }

    for field in schema.fields {
        if field.required && !joined.contains_key(field.name) {
            return Err(ApiError::Validation(format!(
                "missing required parameter \"{}\"",
                field.name
            )));
        }
    }

    let mut params = WireParams::new();
    for (key, value) in joined {
        let wire_key = key_map
            .iter()
            .find(|(local, _)| *local == key)
            .map(|(_, wire)| (*wire).to_string())
            .unwrap_or(key);
        params.insert(wire_key, value.to_wire());
    }

    Ok(params)
}
