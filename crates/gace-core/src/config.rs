//! Configuration overrides passed through the resolver to constructors.
//!
//! [`Overrides`] is deliberately open-ended: the registry never interprets
//! it. Each concrete environment decides which keys it recognises and how
//! to validate them.

use indexmap::IndexMap;

/// A single override value.
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Free-form string.
    Str(String),
    /// Nested mapping, e.g. per-metric targets.
    Map(IndexMap<String, OverrideValue>),
}

impl OverrideValue {
    /// Short name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Map(_) => "map",
        }
    }

    /// The value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a nested mapping.
    pub fn as_map(&self) -> Option<&IndexMap<String, OverrideValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for OverrideValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for OverrideValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for OverrideValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for OverrideValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for OverrideValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for OverrideValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for OverrideValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<K: Into<String>, V: Into<OverrideValue>> FromIterator<(K, V)> for OverrideValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Insertion-ordered set of configuration overrides.
///
/// # Examples
///
/// ```
/// use gace_core::{OverrideValue, Overrides};
///
/// let overrides = Overrides::new()
///     .with("max_steps", 100)
///     .with("target", [("a0", 60.0)].into_iter().collect::<OverrideValue>());
/// assert_eq!(overrides.get("max_steps"), Some(&OverrideValue::Int(100)));
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    values: IndexMap<String, OverrideValue>,
}

impl Overrides {
    /// An empty override set (all environment defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a repeated key replaces the earlier value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OverrideValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace one override.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OverrideValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up one override.
    pub fn get(&self, key: &str) -> Option<&OverrideValue> {
        self.values.get(key)
    }

    /// Iterate overrides in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no overrides are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<OverrideValue>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (k, v) in iter {
            overrides.insert(k, v);
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_insert_replaces_value_in_place() {
        let o = Overrides::new()
            .with("max_steps", 10)
            .with("seed", 1)
            .with("max_steps", 20);
        let keys: Vec<_> = o.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["max_steps", "seed"]);
        assert_eq!(o.get("max_steps").and_then(|v| v.as_int()), Some(20));
    }

    #[test]
    fn float_accessor_widens_ints() {
        assert_eq!(OverrideValue::Int(3).as_float(), Some(3.0));
        assert_eq!(OverrideValue::Str("3".into()).as_float(), None);
    }

    #[test]
    fn nested_map_from_pairs() {
        let v: OverrideValue = [("a0", 55.0), ("ugbw", 3.5e6)].into_iter().collect();
        let m = v.as_map().unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["a0"], OverrideValue::Float(55.0));
        assert_eq!(v.type_name(), "map");
    }
}
