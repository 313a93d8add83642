//! Resolution metrics.
//!
//! Counters collected by the [`Resolver`](super::Resolver) during one pass.
//! They are cheap to maintain and are surfaced through
//! [`hoist_verbose_with`](crate::hoist_verbose_with) and the CLI report.

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolveMetrics {
    /// Values passed through the resolver (every recursion step counts).
    pub nodes: usize,
    /// Rule objects evaluated.
    pub rules: usize,
    /// Criteria keys evaluated across all rule objects.
    pub criteria: usize,
    /// Criteria whose every clause matched.
    pub matched: usize,
    /// Probe invocations (fallback probes and call clauses).
    pub probe_calls: usize,
    /// Address lookups through the context accessor.
    pub lookups: usize,
    /// Deepest recursion level reached.
    pub max_depth: usize,
    /// Wall time for the pass, filled in by the API layer.
    pub elapsed: Duration,
}
