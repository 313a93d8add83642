//! Memoization for expensive probes.
//!
//! Probes run once per matching attempt, so a probe referenced by many rule
//! keys, or by every render, may be invoked a lot with identical arguments.
//! [`memoize`] wraps a probe in a cache keyed by the JSON form of its argument
//! record. Probe-valued arguments do not contribute to the key.

use crate::{Map, Probe, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Wrap `probe` so repeated calls with equal arguments reuse the first result.
///
/// # Example
/// ```
/// use hoist::{Map, Probe, Value, memo::memoize};
///
/// let probe = memoize(Probe::new(|args: &Map| Value::from(args.len() as i64)));
/// assert_eq!(probe.invoke(&Map::new()), Value::from(0i64));
/// ```
pub fn memoize(probe: Probe) -> Probe {
    let cache: Arc<Mutex<HashMap<String, Value>>> = Arc::default();

    Probe::new(move |args: &Map| {
        let key = cache_key(args);
        if let Some(hit) = cache.lock().ok().and_then(|cache| cache.get(&key).cloned()) {
            tracing::trace!(%key, "memoized probe hit");
            return hit;
        }

        let value = probe.invoke(args);
        if let Ok(mut cache) = cache.lock() {
            cache.insert(key, value.clone());
        }
        value
    })
}

fn cache_key(args: &Map) -> String {
    Value::Object(args.clone()).to_json().to_string()
}
