//! Rule resolution engine and context value accessor.
//!
//! The two are mutually recursive: resolving a rule evaluates criteria, which
//! look up addresses, whose raw values are themselves resolved as rules. Both
//! live on one [`Resolver`] so they share the store, the options, the depth
//! guard and the metrics.
//!
//! ## Branch selection
//!
//! ```text
//! selected = seed(default | value)        probe seeds get {contexts: store}
//! best     = 0
//! for key in rule (enumeration order):
//!     Matched(parts, v) and parts >= best  -> best = parts, selected = outcome
//!     Tentative(v)                         -> selected = v   (bare "@addr" clause)
//!     Failed                               -> skip
//! ```
//!
//! `>=` means ties go to the last matching key while a key with more matched
//! clauses always beats a less specific one. The selected outcome is then
//! resolved again, so rules may point at addresses that point at other rules.

use super::address::lookup;
use super::call;
use super::criteria::{Clause, Criterion};
use super::metrics::ResolveMetrics;
use super::rule::{Node, RuleObject};
use crate::{HoistError, MATCHED_VALUE, Map, Options, ResolveFlags, Result, Value};

/// Result of evaluating one criterion key.
enum Outcome {
    /// Every clause matched; `value` is the last matched value.
    Matched { parts: usize, value: Value },
    /// A bare-address clause supplied a value directly.
    Tentative(Value),
    Failed,
}

pub(crate) struct Resolver<'a> {
    store: &'a Value,
    options: &'a Options,
    depth: usize,
    last_address: String,
    pub(crate) metrics: ResolveMetrics,
}

impl<'a> Resolver<'a> {
    /// `store` is the context store as an object of namespaces.
    pub(crate) fn new(store: &'a Value, options: &'a Options) -> Self {
        Resolver { store, options, depth: 0, last_address: String::new(), metrics: ResolveMetrics::default() }
    }

    pub(crate) fn root(&self) -> &'a Value {
        self.store
    }

    pub(crate) fn into_metrics(self) -> ResolveMetrics {
        self.metrics
    }

    /// Resolve a template or context node to a concrete value.
    ///
    /// Plain lists and objects are walked without touching the depth guard;
    /// only address lookups and rule outcomes nest.
    pub(crate) fn resolve_value(&mut self, value: &Value) -> Result<Value> {
        self.metrics.nodes += 1;
        self.resolve_node(value)
    }

    /// Context value accessor: raw lookup, then resolve what was found.
    /// `None` means the address does not exist in the store.
    pub(crate) fn resolve_address(&mut self, address: &str) -> Result<Option<Value>> {
        self.metrics.lookups += 1;
        self.last_address.clear();
        self.last_address.push_str(address);

        match lookup(self.store, address) {
            Some(raw) => self.descend(raw).map(Some),
            None => {
                tracing::trace!(address, "address is undefined");
                Ok(None)
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            tracing::debug!(limit = self.options.max_depth, address = %self.last_address, "depth limit reached");
            return Err(HoistError::DepthExceeded {
                limit: self.options.max_depth,
                address: self.last_address.clone(),
            });
        }
        self.depth += 1;
        self.metrics.max_depth = self.metrics.max_depth.max(self.depth);
        Ok(())
    }

    /// Resolve one level of indirection under the depth guard.
    fn descend(&mut self, value: &Value) -> Result<Value> {
        self.enter()?;
        let resolved = self.resolve_value(value);
        self.depth -= 1;
        resolved
    }

    fn resolve_node(&mut self, value: &Value) -> Result<Value> {
        match Node::classify(value) {
            Node::Literal(v) => Ok(v.clone()),
            Node::Address(address) => Ok(self.resolve_address(address)?.unwrap_or_default()),
            Node::List(items) => {
                items.iter().map(|item| self.resolve_value(item)).collect::<Result<Vec<_>>>().map(Value::Array)
            }
            Node::Object(map) => map
                .iter()
                .map(|(k, v)| self.resolve_value(v).map(|resolved| (k.clone(), resolved)))
                .collect::<Result<Map>>()
                .map(Value::Object),
            Node::Rule(rule) => self.resolve_rule(&rule),
        }
    }

    fn resolve_rule(&mut self, rule: &RuleObject<'_>) -> Result<Value> {
        self.metrics.rules += 1;

        let mut selected = rule.fallback.map(|seed| self.seed(seed));
        let mut best = 0;

        for branch in &rule.branches {
            self.metrics.criteria += 1;
            match self.evaluate(&branch.criterion)? {
                Outcome::Matched { parts, value } => {
                    self.metrics.matched += 1;
                    if parts < best {
                        tracing::trace!(key = branch.key, parts, best, "less specific match ignored");
                        continue;
                    }
                    tracing::debug!(key = branch.key, specificity = parts, "branch selected");
                    best = parts;
                    selected = Some(match branch.outcome.as_str() {
                        Some(MATCHED_VALUE) => value,
                        _ => branch.outcome.clone(),
                    });
                }
                Outcome::Tentative(value) => {
                    tracing::debug!(key = branch.key, "bare address supplied value");
                    selected = Some(value);
                }
                Outcome::Failed => tracing::trace!(key = branch.key, "criterion failed"),
            }
        }

        let Some(value) = selected else {
            return Ok(Value::Null);
        };
        if self.options.flags.contains(ResolveFlags::COLLAPSE_FALSY) && !value.is_truthy() {
            return Ok(Value::Null);
        }

        if matches!(Node::classify(&value), Node::Literal(_)) {
            return Ok(value);
        }
        self.descend(&value)
    }

    fn seed(&mut self, seed: &Value) -> Value {
        match seed {
            Value::Probe(probe) => {
                self.metrics.probe_calls += 1;
                let mut args = Map::new();
                args.insert("contexts".to_string(), self.store.clone());
                probe.invoke(&args)
            }
            other => other.clone(),
        }
    }

    /// Evaluate an AND-group, stopping at the first failing clause.
    fn evaluate(&mut self, criterion: &Criterion) -> Result<Outcome> {
        if criterion.clauses.is_empty() {
            return Ok(Outcome::Failed);
        }

        let mut parts = 0;
        let mut matched = Value::Null;

        for clause in &criterion.clauses {
            tracing::trace!(%clause, "evaluating clause");
            match clause {
                Clause::Call { target, call: spec } => match call::evaluate(self, target, spec)? {
                    Some(value) => matched = value,
                    None => return Ok(Outcome::Failed),
                },
                Clause::Malformed { target, signature } => {
                    tracing::warn!(
                        target_address = %target,
                        signature = %signature,
                        "malformed call clause, expected name[key:value,...]property:match"
                    );
                    return Ok(Outcome::Failed);
                }
                Clause::Bare { address } => {
                    return Ok(match self.resolve_address(address)? {
                        Some(value) if !value.is_null() => Outcome::Tentative(value),
                        _ => Outcome::Failed,
                    });
                }
                Clause::Match { address, alternatives } => {
                    let Some(actual) = self.resolve_address(address)?.filter(|v| !v.is_null()) else {
                        return Ok(Outcome::Failed);
                    };
                    if !contains_alternative(&actual, alternatives) {
                        return Ok(Outcome::Failed);
                    }
                    matched = actual;
                }
            }
            parts += 1;
        }

        Ok(Outcome::Matched { parts, value: matched })
    }
}

fn contains_alternative(actual: &Value, alternatives: &[String]) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| {
            let item = item.to_string();
            alternatives.iter().any(|alt| *alt == item)
        }),
        other => {
            let actual = other.to_string();
            alternatives.iter().any(|alt| *alt == actual)
        }
    }
}
