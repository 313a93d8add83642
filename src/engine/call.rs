//! Function-call clauses.
//!
//! `@date::getTime[status:@auth.status].hours:>=17` runs in four steps:
//!
//! ```text
//! 1. locate   @date            raw lookup in the store, must hold `getTime` probe
//! 2. bind     status:@auth...  `@` values go through the context accessor
//! 3. invoke   getTime({status: "loggedIn"})
//! 4. extract  .hours  -> compare against ">=17"
//! ```
//!
//! Every failure along the way is "no match" (`Ok(None)`), including an
//! extracted value that is null or missing. Only a depth error raised while
//! resolving an argument propagates.

use super::address::lookup;
use super::compare::matches;
use super::criteria::CallSpec;
use super::resolver::Resolver;
use crate::{Map, Result, SIGIL, Value};

pub(crate) fn evaluate(resolver: &mut Resolver<'_>, address: &str, call: &CallSpec) -> Result<Option<Value>> {
    let root = resolver.root();
    let Some(probe) = lookup(root, address).and_then(|found| lookup(found, &call.name)).and_then(Value::as_probe)
    else {
        tracing::trace!(address, function = %call.name, "call target is not a probe");
        return Ok(None);
    };
    let probe = probe.clone();

    let mut args = Map::new();
    for (key, raw) in &call.args {
        let bound = if raw.starts_with(SIGIL) {
            resolver.resolve_address(raw)?.unwrap_or_default()
        } else {
            Value::String(raw.clone())
        };
        args.insert(key.clone(), bound);
    }

    resolver.metrics.probe_calls += 1;
    let returned = probe.invoke(&args);

    let extracted = match lookup(&returned, &call.property) {
        Some(v) if !v.is_null() && matches(v, &call.matcher) => v.clone(),
        _ => {
            tracing::trace!(address, %call, "call result did not match");
            return Ok(None);
        }
    };

    tracing::trace!(address, %call, value = %extracted, "call matched");
    Ok(Some(extracted))
}
