//! Sequence type-check helpers.

use std::any::Any;
use std::str::FromStr;

#[cfg(feature = "config")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// How thoroughly a sequence is inspected.
///
/// `First` is O(1) and assumes the sequence is homogeneous; `All` is O(n) and
/// checks every element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListCheck {
    /// Only the first element is checked; an empty sequence passes.
    #[default]
    First,
    /// Every element is checked.
    All,
}

impl ListCheck {
    /// Parses a check mode, reporting unknown modes as configuration errors.
    pub fn parse(mode: &str) -> Result<Self> {
        <Self as FromStr>::from_str(mode).map_err(|error| {
            Error::configuration()
                .with_message(format!("unknown list check mode '{mode}'"))
                .with_source(error)
        })
    }

    fn holds<I, F>(self, mut items: I, matches: F) -> bool
    where
        I: Iterator,
        F: FnMut(I::Item) -> bool,
    {
        match self {
            Self::First => items.next().is_none_or(matches),
            Self::All => items.all(matches),
        }
    }
}

/// Returns whether `value` is a sequence whose elements are of type `T`.
///
/// Recognized sequences are `Vec<T>` (homogeneous by construction, so always
/// true) and the type-erased `Vec<Box<dyn Any>>` and
/// `Vec<Box<dyn Any + Send + Sync>>`, whose elements are checked by downcast
/// according to `check`. Anything else is not a sequence and yields `false`.
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
///
/// use tessera_core::{ListCheck, is_list_of};
///
/// let mixed: Vec<Box<dyn Any>> = vec![Box::new(1_i64), Box::new("x")];
/// assert!(is_list_of::<i64>(&mixed, ListCheck::First));
/// assert!(!is_list_of::<i64>(&mixed, ListCheck::All));
/// ```
pub fn is_list_of<T: Any>(value: &dyn Any, check: ListCheck) -> bool {
    if value.is::<Vec<T>>() {
        return true;
    }

    if let Some(items) = value.downcast_ref::<Vec<Box<dyn Any>>>() {
        return check.holds(items.iter(), |item| (**item).is::<T>());
    }

    if let Some(items) = value.downcast_ref::<Vec<Box<dyn Any + Send + Sync>>>() {
        return check.holds(items.iter(), |item| (**item).is::<T>());
    }

    false
}

/// Element type of a JSON value, as seen by [`is_json_list_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JsonKind {
    Null,
    Bool,
    /// A number representable as `i64` or `u64`.
    Integer,
    /// Any number, integral or not.
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Returns the most specific kind of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(number) if number.is_i64() || number.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns whether `value` is of this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            kind => Self::of(value) == kind,
        }
    }
}

/// Returns whether `value` is a JSON array whose elements are of `kind`.
///
/// Non-array values always yield `false`.
pub fn is_json_list_of(value: &Value, kind: JsonKind, check: ListCheck) -> bool {
    match value {
        Value::Array(items) => check.holds(items.iter(), |item| kind.matches(item)),
        _ => false,
    }
}
