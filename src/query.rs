//! Query-URL rendering from ordered, sparsely populated parameter sets.
//!
//! A [`ParameterSet`] keeps parameters in declaration order. [`render`]
//! substitutes the positional value into the template's `{placeholder}`,
//! then appends every retained `name=value` pair in that order, with `_`
//! stripped from names (`midnight_mode` becomes `midnightmode`).
//!
//! # Omission
//!
//! Optional entries are dropped according to an [`OmissionPolicy`]. The
//! default, [`OmissionPolicy::Falsy`], drops `0`, `0.0`, `false` and `""`
//! together with unset values, so a legitimate `adjustment=0` is never sent.
//! [`OmissionPolicy::UnsetOnly`] keeps those values.
//! Required entries are always emitted once set.

use std::fmt;

use crate::error::ClientError;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Returns true for `""`, `0`, `0.0` and `false`.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::Bool(b) => !b,
        }
    }

    /// Returns the integer value, if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the string value, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Which optional values are left out of a rendered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OmissionPolicy {
    /// Drop unset, empty, zero and `false` values.
    #[default]
    Falsy,
    /// Drop only unset values.
    UnsetOnly,
}

impl OmissionPolicy {
    /// Returns true when `value` contributes nothing to the query.
    #[must_use]
    pub fn omits(self, value: Option<&ParamValue>) -> bool {
        match (self, value) {
            (_, None) => true,
            (Self::Falsy, Some(v)) => v.is_falsy(),
            (Self::UnsetOnly, Some(_)) => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    name: &'static str,
    required: bool,
    value: Option<ParamValue>,
}

/// Ordered parameters for one request plus an optional positional value.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    entries: Vec<Entry>,
    positional: Option<ParamValue>,
}

impl ParameterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a declared parameter, unset.
    ///
    /// Declaring an existing name again is a no-op.
    pub fn declare(&mut self, name: &'static str, required: bool) {
        if self.position(name).is_none() {
            self.entries.push(Entry {
                name,
                required,
                value: None,
            });
        }
    }

    /// Appends (or overwrites) an optional parameter with a value.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.declare(name, false);
        self.set(name, Some(value.into()));
        self
    }

    /// Sets the value of a declared parameter. Returns false if `name` was
    /// never declared.
    pub fn set(&mut self, name: &str, value: Option<ParamValue>) -> bool {
        match self.position(name) {
            Some(index) => {
                self.entries[index].value = value;
                true
            }
            None => false,
        }
    }

    /// Returns the value of `name`, if declared and set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.position(name)
            .and_then(|index| self.entries[index].value.as_ref())
    }

    /// Returns true if `name` was declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn set_positional(&mut self, value: Option<ParamValue>) {
        self.positional = value;
    }

    #[must_use]
    pub fn positional(&self) -> Option<&ParamValue> {
        self.positional.as_ref()
    }

    /// Iterates `(name, required, value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool, Option<&ParamValue>)> {
        self.entries
            .iter()
            .map(|entry| (entry.name, entry.required, entry.value.as_ref()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

/// Transforms a declared parameter name into its query-string form.
#[must_use]
pub fn query_name(name: &str) -> String {
    name.replace('_', "")
}

/// Renders `template` with `params` under the default omission policy.
///
/// # Errors
///
/// See [`render_with`].
pub fn render(template: &str, params: &ParameterSet) -> Result<String, ClientError> {
    render_with(template, params, OmissionPolicy::default())
}

/// Renders `template` with `params`, omitting values per `policy`.
///
/// The template must already end with its query prefix (`?`); the first
/// pair is appended directly after it.
///
/// # Errors
///
/// Returns [`ClientError::Builder`] when the template has a placeholder but
/// no positional value was supplied, when it has more than one placeholder,
/// or when a required parameter is unset.
pub fn render_with(
    template: &str,
    params: &ParameterSet,
    policy: OmissionPolicy,
) -> Result<String, ClientError> {
    let mut url = substitute_placeholder(template, params.positional())?;

    let mut pairs = Vec::new();
    for (name, required, value) in params.iter() {
        match value {
            None if required => {
                return Err(ClientError::builder(
                    template,
                    format!("required parameter '{name}' is unset"),
                ));
            }
            Some(value) if required || !policy.omits(Some(value)) => {
                let rendered = value.to_string();
                pairs.push(format!(
                    "{}={}",
                    query_name(name),
                    urlencoding::encode(&rendered)
                ));
            }
            _ => {}
        }
    }

    url.push_str(&pairs.join("&"));
    Ok(url)
}

fn substitute_placeholder(
    template: &str,
    positional: Option<&ParamValue>,
) -> Result<String, ClientError> {
    let Some(open) = template.find('{') else {
        return Ok(template.to_string());
    };
    let Some(close) = template[open..].find('}').map(|offset| open + offset) else {
        return Err(ClientError::builder(template, "unterminated placeholder"));
    };
    if template[close + 1..].contains('{') {
        return Err(ClientError::builder(template, "more than one placeholder"));
    }
    let Some(value) = positional else {
        return Err(ClientError::builder(
            template,
            format!(
                "placeholder {} has no positional value",
                &template[open..=close]
            ),
        ));
    };

    let rendered = value.to_string();
    Ok(format!(
        "{}{}{}",
        &template[..open],
        urlencoding::encode(&rendered),
        &template[close + 1..]
    ))
}
