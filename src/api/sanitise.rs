//
//  datamall
//  api/sanitise.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Response Sanitiser
//!
//! The DataMall API returns loosely-typed payloads: timestamps, dates,
//! clock times, integers and floats all arrive as strings. This module
//! walks a decoded JSON value and opportunistically reinterprets string
//! leaves as richer types, producing a [`Value`] tree.
//!
//! # Coercion rules
//!
//! For a string leaf, in order:
//!
//! 1. `""` becomes [`Value::Null`]
//! 2. a recognised temporal format becomes [`Value::Date`],
//!    [`Value::DateTime`] or [`Value::Time`], normalised to SGT
//!    (see [`temporal_from_string`](crate::util::temporal_from_string))
//! 3. an integer-like string becomes [`Value::Integer`]
//! 4. a float-like string becomes [`Value::Float`]
//! 5. anything else stays a [`Value::String`]
//!
//! Non-string leaves (booleans, numbers, null) pass through unchanged;
//! numeric coercion only ever applies to string inputs. Sanitisation never
//! fails: an unparseable string simply degrades to the next candidate type.
//!
//! # Key paths
//!
//! Specific fields can be exempted from coercion by key path: a
//! dot-delimited location within the response, with `[]` marking a list
//! traversal. `"value_dict.date_time"` names a field of a nested object;
//! `"evLocationsData[].locationId"` names a field of every element of a
//! list. An exempted subtree is kept verbatim, blank strings included.
//!
//! # Example
//!
//! ```rust
//! use datamall::api::sanitise::{sanitise, Value};
//! use serde_json::json;
//!
//! let raw = json!({"ServiceNo": "15", "NextBus": {"Load": ""}});
//! let clean = sanitise(&raw, &[]);
//! assert_eq!(clean.get("ServiceNo"), Some(&Value::Integer(15)));
//! assert_eq!(
//!     clean.get("NextBus").and_then(|b| b.get("Load")),
//!     Some(&Value::Null)
//! );
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde_json::Value as JsonValue;

use crate::util::{temporal_from_string, Temporal};

/// A sanitised response value.
///
/// Mirrors the shape of the raw JSON payload, with string leaves
/// reinterpreted as richer types where they parse. Object keys are held in
/// a sorted map; the upstream payloads carry no meaningful key order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null, or a blank string that was coerced away.
    Null,
    /// A JSON boolean, passed through untouched.
    Bool(bool),
    /// A JSON integer, or an integer-like string.
    Integer(i64),
    /// A JSON float, or a float-like string.
    Float(f64),
    /// A string that matched none of the richer interpretations.
    String(String),
    /// A date-only string such as `"2019-07-13"`.
    Date(NaiveDate),
    /// A 4-digit clock-time string such as `"0530"`.
    Time(NaiveTime),
    /// A datetime string, normalised to SGT.
    DateTime(DateTime<FixedOffset>),
    /// A JSON array with sanitised elements.
    Array(Vec<Value>),
    /// A JSON object with sanitised member values.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the member of an object by key, or `None` for other shapes.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the members if this is an object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Sanitises a decoded JSON value.
///
/// Convenience wrapper over [`sanitise_value`] that iterates containers and
/// starts with an empty key path.
pub fn sanitise(value: &JsonValue, ignore_keys: &[&str]) -> Value {
    sanitise_value(value, true, ignore_keys, "")
}

/// Sanitises a decoded JSON value, with full control over the recursion.
///
/// # Parameters
///
/// * `value` - The decoded JSON value to sanitise.
/// * `iterate` - When `false`, arrays and objects are converted verbatim
///   instead of being walked; scalars are still coerced.
/// * `ignore_keys` - Key paths whose subtrees are kept verbatim.
/// * `key_path` - The path of `value` within the overall response; the
///   public entry point starts at `""`.
///
/// This function never fails; malformed strings degrade gracefully to less
/// specific types and finally to the original string.
pub fn sanitise_value(
    value: &JsonValue,
    iterate: bool,
    ignore_keys: &[&str],
    key_path: &str,
) -> Value {
    match value {
        JsonValue::Array(items) if iterate => {
            // per-index exemptions do not exist; lists share one [] segment
            let item_path = format!("{key_path}[]");
            Value::Array(
                items
                    .iter()
                    .map(|item| sanitise_value(item, iterate, ignore_keys, &item_path))
                    .collect(),
            )
        }
        JsonValue::Object(members) if iterate => {
            let mut sanitised = BTreeMap::new();
            for (key, member) in members {
                let current_key_path = if key_path.is_empty() {
                    key.clone()
                } else {
                    format!("{key_path}.{key}")
                };
                let member_value = if ignore_keys.contains(&current_key_path.as_str()) {
                    verbatim(member)
                } else {
                    sanitise_value(member, iterate, ignore_keys, &current_key_path)
                };
                sanitised.insert(key.clone(), member_value);
            }
            Value::Object(sanitised)
        }
        JsonValue::String(s) => sanitise_str(s),
        other => verbatim(other),
    }
}

/// Coerces a single string leaf.
fn sanitise_str(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }

    match temporal_from_string(s) {
        Some(Temporal::DateTime(dt)) => Value::DateTime(dt),
        Some(Temporal::Date(d)) => Value::Date(d),
        Some(Temporal::Time(t)) => Value::Time(t),
        None => {
            if let Ok(i) = s.parse::<i64>() {
                Value::Integer(i)
            } else if let Ok(f) = s.parse::<f64>() {
                Value::Float(f)
            } else {
                Value::String(s.to_string())
            }
        }
    }
}

/// Converts a JSON value to a [`Value`] without any string coercion.
///
/// Used for exempted subtrees and for non-string scalars, which sanitisation
/// must leave untouched.
fn verbatim(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(verbatim).collect()),
        JsonValue::Object(members) => Value::Object(
            members
                .iter()
                .map(|(k, v)| (k.clone(), verbatim(v)))
                .collect(),
        ),
    }
}
