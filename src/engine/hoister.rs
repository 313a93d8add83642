//! Tree hoisting: resolve every top-level property of a template.
//!
//! Probe-valued properties are behaviour, not data. They are copied through
//! as-is and never invoked. Everything else goes through the resolver; nested
//! structure is left to the resolver's own recursion.

use super::resolver::Resolver;
use crate::{Map, Result, Value};

pub(crate) fn hoist_map(resolver: &mut Resolver<'_>, template: &Map) -> Result<Map> {
    let mut hoisted = Map::with_capacity(template.len());

    for (key, value) in template {
        let _span = tracing::debug_span!("hoist", key = %key).entered();
        let resolved = match value {
            Value::Probe(_) => value.clone(),
            other => resolver.resolve_value(other)?,
        };
        hoisted.insert(key.clone(), resolved);
    }

    Ok(hoisted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;
    use serde_json::json;

    #[test]
    fn preserves_keys_and_order() {
        let template = match Value::from(json!({"z": 1, "a": {"default": "x"}, "m": "@ns.v"})) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let store = Value::from(json!({"@ns": {"v": "found"}}));
        let options = Options::default();

        let hoisted = hoist_map(&mut Resolver::new(&store, &options), &template).unwrap();
        let keys: Vec<&str> = hoisted.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(hoisted["a"], Value::from("x"));
        assert_eq!(hoisted["m"], Value::from("found"));
    }

    #[test]
    fn probes_are_copied_not_invoked() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = calls.clone();
        let on_click = Value::probe(move |_| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Value::Null
        });

        let mut template = Map::new();
        template.insert("onClick".into(), on_click.clone());
        let store = Value::Object(Map::new());
        let options = Options::default();

        let hoisted = hoist_map(&mut Resolver::new(&store, &options), &template).unwrap();
        assert_eq!(hoisted["onClick"], on_click);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
