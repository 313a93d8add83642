use crate::engine::{self, ResolveMetrics, Resolver};
use crate::{HoistError, Map, Result, SIGIL, Value};
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Maximum recursion depth used by [`Options::default`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

bitflags::bitflags! {
    /// Behaviour switches for a resolution pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResolveFlags: u8 {
        /// Legacy behaviour: a rule outcome of `false`, `0` or `""` resolves to
        /// `null`, as if nothing had matched.
        const COLLAPSE_FALSY = 1 << 0;
    }
}

/// Options that affect resolution.
#[derive(Debug, Clone)]
pub struct Options {
    /// How deep address/rule indirection may nest before the pass fails with
    /// [`HoistError::DepthExceeded`].
    pub max_depth: usize,
    pub flags: ResolveFlags,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, flags: ResolveFlags::empty() }
    }
}

/// Namespaced state consulted while resolving criteria.
///
/// Keys are namespace names beginning with `@` (`"@auth"`, `"@date"`); a key
/// inserted without the sigil gets it prepended. Namespace values are arbitrary
/// [`Value`]s and may contain rule objects and probes.
///
/// # Example
/// ```
/// use hoist::{ContextStore, Value};
/// use serde_json::json;
///
/// let store = ContextStore::new()
///     .with_namespace("auth", Value::from(json!({"status": "loggedIn"})));
/// assert!(store.namespace("@auth").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContextStore {
    root: Value,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    pub fn new() -> Self {
        Self { root: Value::Object(Map::new()) }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_namespace(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a namespace, returning the previous value.
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        let key = namespace_key(name).into_owned();
        self.namespaces_mut().insert(key, value)
    }

    /// Look up a namespace by name, with or without the leading `@`.
    pub fn namespace(&self, name: &str) -> Option<&Value> {
        self.namespaces().get(&*namespace_key(name))
    }

    pub fn namespaces(&self) -> &Map {
        match &self.root {
            Value::Object(map) => map,
            _ => unreachable!("context store root is always an object"),
        }
    }

    fn namespaces_mut(&mut self) -> &mut Map {
        if !matches!(self.root, Value::Object(_)) {
            self.root = Value::Object(Map::new());
        }
        match &mut self.root {
            Value::Object(map) => map,
            _ => unreachable!("context store root is always an object"),
        }
    }

    /// The store as one object value (`{"@ns": ..., ...}`).
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Build a store from a JSON object of namespaces.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(namespaces) => {
                let mut store = Self::new();
                for (name, value) in namespaces {
                    store.insert(&name, Value::from(value));
                }
                Ok(store)
            }
            other => Err(HoistError::InvalidContext(format!("expected an object of namespaces, got {other}"))),
        }
    }
}

fn namespace_key(name: &str) -> Cow<'_, str> {
    if name.starts_with(SIGIL) { Cow::Borrowed(name) } else { Cow::Owned(format!("{SIGIL}{name}")) }
}

impl From<Map> for ContextStore {
    fn from(namespaces: Map) -> Self {
        let mut store = Self::new();
        for (name, value) in namespaces {
            store.insert(&name, value);
        }
        store
    }
}

/// Result of [`hoist_verbose_with`]: the hoisted tree plus pass metrics.
#[derive(Debug, Clone)]
pub struct HoistReport {
    pub hoisted: Map,
    pub metrics: ResolveMetrics,
}

impl HoistReport {
    pub fn elapsed(&self) -> Duration {
        self.metrics.elapsed
    }
}

/// Resolve every property of `template` against `store` with default [`Options`].
///
/// # Example
/// ```
/// use hoist::{ContextStore, Value, hoist};
/// use serde_json::json;
///
/// let Value::Object(template) = Value::from(json!({
///     "greeting": {"default": "Hi", "@date.meridiem:am": "Morning!"}
/// })) else { unreachable!() };
/// let store = ContextStore::new().with_namespace("@date", Value::from(json!({"meridiem": "am"})));
///
/// let out = hoist(&template, &store).unwrap();
/// assert_eq!(out["greeting"], Value::from("Morning!"));
/// ```
pub fn hoist(template: &Map, store: &ContextStore) -> Result<Map> {
    hoist_with(template, store, &Options::default())
}

/// Resolve every property of `template` against `store` with explicit options.
pub fn hoist_with(template: &Map, store: &ContextStore, options: &Options) -> Result<Map> {
    let mut resolver = Resolver::new(store.as_value(), options);
    engine::hoist_map(&mut resolver, template)
}

/// Like [`hoist_with`], also returning the metrics collected during the pass.
pub fn hoist_verbose_with(template: &Map, store: &ContextStore, options: &Options) -> Result<HoistReport> {
    let started = Instant::now();
    let mut resolver = Resolver::new(store.as_value(), options);
    let hoisted = engine::hoist_map(&mut resolver, template)?;

    let mut metrics = resolver.into_metrics();
    metrics.elapsed = started.elapsed();
    tracing::debug!(
        nodes = metrics.nodes,
        rules = metrics.rules,
        probe_calls = metrics.probe_calls,
        max_depth = metrics.max_depth,
        "hoist pass finished"
    );

    Ok(HoistReport { hoisted, metrics })
}

/// Resolve a single node (literal, address string, rule object, list or object).
pub fn resolve_value(node: &Value, store: &ContextStore) -> Result<Value> {
    Resolver::new(store.as_value(), &Options::default()).resolve_value(node)
}

/// Look up `address` in `store` and resolve what is found there.
///
/// Returns `Ok(None)` when the address does not exist.
pub fn resolve_address(store: &ContextStore, address: &str) -> Result<Option<Value>> {
    Resolver::new(store.as_value(), &Options::default()).resolve_address(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn namespaces_get_the_sigil() {
        let store = ContextStore::new().with_namespace("auth", Value::from(json!({"status": "x"})));
        assert!(store.namespace("@auth").is_some());
        assert_eq!(store.namespace("auth"), store.namespace("@auth"));
        assert!(store.namespaces().contains_key("@auth"));
        assert!(!store.namespaces().contains_key("auth"));
    }

    #[test]
    fn from_json_requires_an_object() {
        assert!(ContextStore::from_json(json!({"@a": 1})).is_ok());
        assert!(matches!(ContextStore::from_json(json!([1])), Err(HoistError::InvalidContext(_))));
    }

    #[test]
    fn resolve_address_reports_undefined() {
        let store = ContextStore::from_json(json!({"@auth": {"status": "loggedIn"}})).unwrap();
        assert_eq!(resolve_address(&store, "@auth.status").unwrap(), Some(Value::from("loggedIn")));
        assert_eq!(resolve_address(&store, "@auth.missing").unwrap(), None);
        assert_eq!(resolve_address(&store, "@nope").unwrap(), None);
    }

    #[test]
    fn verbose_pass_reports_metrics() {
        let Value::Object(template) = Value::from(json!({"a": {"default": "x", "@n.v:1": "y"}, "b": 2})) else {
            unreachable!()
        };
        let store = ContextStore::from_json(json!({"@n": {"v": 1}})).unwrap();
        let report = hoist_verbose_with(&template, &store, &Options::default()).unwrap();

        assert_eq!(report.hoisted["a"], Value::from("y"));
        assert_eq!(report.metrics.rules, 1);
        assert_eq!(report.metrics.criteria, 1);
        assert_eq!(report.metrics.matched, 1);
        assert!(report.elapsed() >= Duration::ZERO);
    }

    #[test]
    fn max_depth_is_configurable() {
        let store = ContextStore::from_json(json!({"@a": {"b": "@c.d"}, "@c": {"d": "deep"}})).unwrap();
        let mut template = Map::new();
        template.insert("v".into(), Value::from("@a.b"));

        let shallow = Options { max_depth: 1, ..Options::default() };
        assert!(matches!(hoist_with(&template, &store, &shallow), Err(HoistError::DepthExceeded { limit: 1, .. })));
        assert_eq!(hoist(&template, &store).unwrap()["v"], Value::from("deep"));
    }
}
