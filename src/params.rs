//! Route parameter values and the parameter map carried by matches.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of parameters stored inline before spilling to the heap.
/// Most REST paths carry ≤4 params (e.g. `/users/:id/posts/:post`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// A scalar route parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Build a value from text captured out of a request.
    ///
    /// Text whose canonical numeric rendering is identical to itself becomes
    /// `Int` or `Float`; everything else stays a string, so `"007"` and `"4.50"`
    /// keep their spelling. Floats render with a fractional part or exponent
    /// (`4.0`, `1e20`), so a rendered `Float` is captured back as a `Float`.
    #[must_use]
    pub fn from_captured(raw: String) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            if n.to_string() == raw {
                return ParamValue::Int(n);
            }
        }
        if raw.contains(['.', 'e']) {
            if let Ok(f) = raw.parse::<f64>() {
                if f.is_finite() && format!("{f:?}") == raw {
                    return ParamValue::Float(f);
                }
            }
        }
        ParamValue::Str(raw)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            ParamValue::Str(s) => s.parse().ok(),
            ParamValue::Float(_) => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(n) => Some(*n as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::Str(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(v) => write!(f, "{v:?}"),
            ParamValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(i64::from(n))
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(i64::from(n))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl PartialEq<str> for ParamValue {
    fn eq(&self, other: &str) -> bool {
        matches!(self, ParamValue::Str(s) if s == other)
    }
}

impl PartialEq<i64> for ParamValue {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, ParamValue::Int(n) if n == other)
    }
}

impl PartialEq<f64> for ParamValue {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, ParamValue::Float(v) if v == other)
    }
}

type ParamVec = SmallVec<[(Arc<str>, ParamValue); MAX_INLINE_PARAMS]>;

/// Ordered parameter map.
///
/// Names are `Arc<str>` because they come from route definitions built at
/// startup; cloning one on the match path is a reference-count bump. Inserting
/// an existing name overwrites it in place, so insertion order is the order
/// in which names were first seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ParamValue>",
    into = "BTreeMap<String, ParamValue>"
)]
pub struct Params {
    entries: ParamVec,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or overwrite `name`, returning the previous value.
    pub fn insert(
        &mut self,
        name: impl Into<Arc<str>>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let name = name.into();
        let value = value.into();
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == name) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.entries.push((name, value));
        None
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let pos = self.entries.iter().position(|(k, _)| k.as_ref() == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Merge `other` into `self`; values from `other` win on collision.
    pub fn merge(&mut self, other: &Params) {
        for (name, value) in &other.entries {
            self.insert(Arc::clone(name), value.clone());
        }
    }

    /// Fill names missing from `self` with values from `defaults`.
    pub fn merge_missing(&mut self, defaults: &Params) {
        for (name, value) in &defaults.entries {
            if !self.contains(name) {
                self.entries.push((Arc::clone(name), value.clone()));
            }
        }
    }

    /// Copy of `self` without any of the given names.
    #[must_use]
    pub fn without<S: AsRef<str>>(&self, names: &[S]) -> Params {
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| !names.iter().any(|n| n.as_ref() == k.as_ref()))
            .cloned()
            .collect();
        Params { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_ref())
    }

    /// Sorted owned copy, convenient for comparisons and serialisation.
    /// Note: This allocates - use [`Params::get`] on hot paths instead.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, ParamValue> {
        self.entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<Arc<str>>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<Arc<str>>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl From<BTreeMap<String, ParamValue>> for Params {
    fn from(map: BTreeMap<String, ParamValue>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Params> for BTreeMap<String, ParamValue> {
    fn from(params: Params) -> Self {
        params.to_map()
    }
}
