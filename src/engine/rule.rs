//! Resolution nodes.
//!
//! Raw values are classified once per visit into a [`Node`] so the resolver
//! matches on a tagged union instead of re-inspecting keys:
//!
//! ```text
//! "@ns.path"                         -> Address
//! [a, b, c]                          -> List      (element-wise)
//! { default/value/"@..." keys }      -> Rule      (fallback + ordered branches)
//! { other keys }                     -> Object    (member-wise)
//! anything else                      -> Literal
//! ```

use super::criteria::Criterion;
use crate::{Map, SIGIL, Value};

const DEFAULT_KEY: &str = "default";
const VALUE_KEY: &str = "value";

pub(crate) enum Node<'v> {
    Literal(&'v Value),
    Address(&'v str),
    List(&'v [Value]),
    Object(&'v Map),
    Rule(RuleObject<'v>),
}

pub(crate) struct RuleObject<'v> {
    /// Seed taken from `default`, falling back to `value`.
    pub fallback: Option<&'v Value>,
    /// Criteria branches in enumeration order.
    pub branches: Vec<Branch<'v>>,
}

pub(crate) struct Branch<'v> {
    pub key: &'v str,
    pub criterion: Criterion,
    pub outcome: &'v Value,
}

impl<'v> Node<'v> {
    pub(crate) fn classify(value: &'v Value) -> Self {
        match value {
            Value::String(s) if s.starts_with(SIGIL) => Node::Address(s),
            Value::Array(items) => Node::List(items),
            Value::Object(map) if is_rule_object(map) => Node::Rule(RuleObject::from_map(map)),
            Value::Object(map) => Node::Object(map),
            other => Node::Literal(other),
        }
    }
}

impl<'v> RuleObject<'v> {
    fn from_map(map: &'v Map) -> Self {
        let fallback = [DEFAULT_KEY, VALUE_KEY].iter().filter_map(|k| map.get(*k)).find(|v| !v.is_null());

        let branches = map
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, outcome)| Branch { key, criterion: Criterion::parse(key), outcome })
            .collect();

        RuleObject { fallback, branches }
    }
}

fn is_reserved(key: &str) -> bool {
    key == DEFAULT_KEY || key == VALUE_KEY
}

/// An object is a rule object when it offers a fallback or any criterion key.
pub(crate) fn is_rule_object(map: &Map) -> bool {
    map.keys().any(|k| is_reserved(k) || k.starts_with(SIGIL))
}
