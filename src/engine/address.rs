//! Address path lookup.
//!
//! A path is a dot-separated list of segments. Bracketed segments (`[0]`,
//! `[key]`) are normalised to dot segments first and a single leading dot is
//! dropped, so `items[0].name`, `.items.0.name` and `items.0.name` are the same
//! path. Lookup never fails loudly: a missing segment yields `None`.

use crate::Value;
use std::borrow::Cow;

/// Follow `path` from `root`. An empty path returns `root` itself.
pub(crate) fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let normalized = normalize(path);
    let path = normalized.strip_prefix('.').unwrap_or(&normalized);
    if path.is_empty() {
        return Some(root);
    }

    path.split('.').try_fold(root, |current, segment| step(current, segment))
}

fn step<'v>(current: &'v Value, segment: &str) -> Option<&'v Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => index(segment).and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Array index segments are plain decimal digits; `+1` or ` 1` are not indexes.
fn index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn normalize(path: &str) -> Cow<'_, str> {
    regex!(r"\[([^\[\]]*)\]").replace_all(path, ".$1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Value {
        Value::from(json!({
            "@auth": {"status": "loggedIn", "roles": ["admin", "editor"]},
            "@date": {"meridiem": "am", "parts": {"hours": 9}}
        }))
    }

    #[test]
    fn follows_namespaced_dot_paths() {
        let root = store();
        assert_eq!(lookup(&root, "@auth.status"), Some(&Value::from("loggedIn")));
        assert_eq!(lookup(&root, "@date.parts.hours"), Some(&Value::from(9i64)));
    }

    #[test]
    fn brackets_and_leading_dot_are_normalized() {
        let root = store();
        assert_eq!(lookup(&root, "@auth.roles[1]"), Some(&Value::from("editor")));
        assert_eq!(lookup(&root, "@auth[roles][0]"), Some(&Value::from("admin")));

        let ret = Value::from(json!({"hours": 18}));
        assert_eq!(lookup(&ret, ".hours"), Some(&Value::from(18i64)));
    }

    #[test]
    fn missing_segments_are_undefined() {
        let root = store();
        assert_eq!(lookup(&root, "@missing.status"), None);
        assert_eq!(lookup(&root, "@auth.status.deeper"), None);
        assert_eq!(lookup(&root, "@auth.roles[7]"), None);
    }

    #[test]
    fn signed_or_padded_indexes_are_undefined() {
        let root = Value::from(json!({"@ns": {"arr": ["a", "b"]}}));
        assert_eq!(lookup(&root, "@ns.arr.1"), Some(&Value::from("b")));
        assert_eq!(lookup(&root, "@ns.arr.+1"), None);
        assert_eq!(lookup(&root, "@ns.arr[-0]"), None);
        assert_eq!(lookup(&root, "@ns.arr. 1"), None);
    }

    #[test]
    fn empty_path_is_the_root() {
        let root = store();
        assert_eq!(lookup(&root, ""), Some(&root));
        assert_eq!(lookup(&root, "."), Some(&root));
    }
}
