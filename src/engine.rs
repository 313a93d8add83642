//! Resolution engine.
//!
//! This module is the internal home of everything between the public API
//! (`src/api.rs`) and the raw data model (`src/lib.rs`). It is split into
//! small submodules under `src/engine/`, one per component.
//!
//! ## How the parts work together
//!
//! ```text
//! template (Map) ── hoist_map ─────────────┐   (hoister.rs)
//!                                           │  per top-level property
//!                                           v
//!                            Resolver::resolve_value (resolver.rs)
//!                              - classify node: Literal / Address /
//!                                List / Object / Rule  (rule.rs)
//!                              - rule: seed from default/value,
//!                                evaluate every criterion key,
//!                                keep the most specific match
//!                              - re-resolve the outcome
//!                                           │
//!                 ┌─────────────────────────┼──────────────────────┐
//!                 v                         v                      v
//!     Resolver::resolve_address     Criterion::parse         call::evaluate
//!     (context accessor, recurses   (criteria.rs)            (call.rs)
//!      back into resolve_value)                                   │
//!                 │                                               v
//!                 v                                        compare::matches
//!          address::lookup (address.rs)                    (compare.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `address.rs`: dot/bracket path lookup into nested values.
//! - `compare.rs`: literal and `>=`/`<=` comparisons with integer coercion.
//! - `criteria.rs`: parses a rule key into clauses (`@a.b:x||y`, bare
//!   addresses, `@ns::fn[args]path:match` calls).
//! - `call.rs`: runs a parsed call clause against a probe in the store.
//! - `rule.rs`: classifies raw values into resolution nodes.
//! - `resolver.rs`: the rule resolution engine and context accessor, with the
//!   depth guard and metrics.
//! - `hoister.rs`: applies the resolver to each property of a template.
//! - `metrics.rs`: counters collected during one resolution pass.
//!
//! ## Debugging
//!
//! The engine logs through `tracing`: clause evaluation at `trace`, branch
//! selection at `debug`, malformed call clauses at `warn`.

#[path = "engine/address.rs"]
mod address;
#[path = "engine/call.rs"]
mod call;
#[path = "engine/compare.rs"]
mod compare;
#[path = "engine/criteria.rs"]
mod criteria;
#[path = "engine/hoister.rs"]
mod hoister;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolver.rs"]
mod resolver;
#[path = "engine/rule.rs"]
mod rule;

#[cfg(test)]
pub(crate) use address::lookup;
pub(crate) use hoister::hoist_map;
pub use metrics::ResolveMetrics;
pub(crate) use resolver::Resolver;
