#[macro_use]
mod macros;
mod api;
pub mod clock;
mod engine;
mod error;
pub mod memo;


pub use api::{
    ContextStore, DEFAULT_MAX_DEPTH, HoistReport, Options, ResolveFlags, hoist, hoist_verbose_with, hoist_with,
    resolve_address, resolve_value,
};
pub use engine::ResolveMetrics;
pub use error::{HoistError, Result};

use std::fmt;
use std::sync::Arc;

/// Ordered mapping used for objects, templates and namespaces.
///
/// Insertion order is significant: it is the enumeration order used for
/// branch tie-breaking and for the key order of hoisted output.
pub type Map = indexmap::IndexMap<String, Value>;

/// Leading character of every context address and namespace key.
pub const SIGIL: char = '@';

/// Branch outcome meaning "use the value the criterion matched against".
pub const MATCHED_VALUE: &str = "@value";

// --- Probes -----------------------------------------------------------------

/// Caller-supplied behaviour embedded in a context store or template.
///
/// The engine hands a probe a single argument record and treats the result as
/// plain data. Implemented for every `Fn(&Map) -> Value + Send + Sync`.
pub trait Invocable: Send + Sync {
    fn invoke(&self, args: &Map) -> Value;
}

impl<F> Invocable for F
where
    F: Fn(&Map) -> Value + Send + Sync,
{
    fn invoke(&self, args: &Map) -> Value {
        self(args)
    }
}

/// Cheap, cloneable handle around an [`Invocable`].
#[derive(Clone)]
pub struct Probe(Arc<dyn Invocable>);

impl Probe {
    pub fn new(f: impl Invocable + 'static) -> Self {
        Probe(Arc::new(f))
    }

    pub fn invoke(&self, args: &Map) -> Value {
        self.0.invoke(args)
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<probe>")
    }
}

/// Probes are equal only when they share the same underlying handle.
impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// --- Values -----------------------------------------------------------------

/// A JSON-like value that may also carry [`Probe`]s.
///
/// "Undefined" is not a variant: lookups that can miss return `Option<&Value>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Probe(Probe),
}

impl Value {
    /// Wrap a closure as a probe value.
    pub fn probe(f: impl Fn(&Map) -> Value + Send + Sync + 'static) -> Self {
        Value::Probe(Probe::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_probe(&self) -> Option<&Probe> {
        match self {
            Value::Probe(p) => Some(p),
            _ => None,
        }
    }

    /// The address carried by this value, if it is a string starting with [`SIGIL`].
    pub fn as_address(&self) -> Option<&str> {
        self.as_str().filter(|s| s.starts_with(SIGIL))
    }

    /// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Probe(_) => true,
        }
    }

    /// Convert to plain JSON. Probes become `null` in arrays and are dropped
    /// from objects, mirroring `JSON.stringify`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Probe(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().filter(|(_, v)| !matches!(v, Value::Probe(_))).map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// String form used by criteria comparisons (JavaScript `String(x)` rules).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => fmt_number(n, f),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    // Nested nulls print as empty strings when joined.
                    if !item.is_null() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Probe(_) => f.write_str("<probe>"),
        }
    }
}

fn fmt_number(n: &serde_json::Number, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_i64() || n.is_u64() {
        return write!(f, "{n}");
    }
    match n.as_f64() {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e21 => write!(f, "{v:.0}"),
        Some(v) => write!(f, "{v}"),
        None => write!(f, "{n}"),
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Probe> for Value {
    fn from(probe: Probe) -> Self {
        Value::Probe(probe)
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_follows_js_string_conversion() {
        assert_eq!(Value::from(json!(18)).to_string(), "18");
        assert_eq!(Value::from(2.0).to_string(), "2");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(json!(["a", 1, null])).to_string(), "a,1,");
        assert_eq!(Value::from(json!({"a": 1})).to_string(), "[object Object]");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn truthiness_matches_js() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!Value::from(falsy.clone()).is_truthy(), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("0"), json!([]), json!({})] {
            assert!(Value::from(truthy.clone()).is_truthy(), "{truthy} should be truthy");
        }
    }

    #[test]
    fn to_json_drops_probe_members() {
        let mut map = Map::new();
        map.insert("a".into(), Value::from(1i64));
        map.insert("f".into(), Value::probe(|_| Value::Null));
        let v = Value::Object(map);
        assert_eq!(v.to_json(), json!({"a": 1}));
        assert_eq!(Value::Array(vec![Value::probe(|_| Value::Null)]).to_json(), json!([null]));
    }

    #[test]
    fn probes_compare_by_identity() {
        let p = Probe::new(|_: &Map| Value::Null);
        let q = Probe::new(|_: &Map| Value::Null);
        assert_eq!(p, p.clone());
        assert_ne!(p, q);
    }
}
