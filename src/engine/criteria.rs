//! Criteria expressions.
//!
//! Every rule-object key other than `default`/`value` is a criterion:
//!
//! ```text
//! criterion := clause (" " clause)*                      all must match
//! clause    := "@" address [ "::" call ] [ ":" matchSpec ]
//! call      := name "[" arg ("," arg)* "]" property ":" match
//! arg       := key ":" value                             value may be an address
//! matchSpec := value ("||" value)*                       any may match
//! ```
//!
//! Keys are parsed into a [`Criterion`] before evaluation so the resolver
//! never splits strings itself. Parsing is total: a call clause that does not
//! fit the grammar is kept as [`Clause::Malformed`] and simply never matches.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Criterion {
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Clause {
    /// `@ns.path`: adopt the resolved value directly.
    Bare { address: String },
    /// `@ns.path:a||b`
    Match { address: String, alternatives: Vec<String> },
    /// `@ns::fn[k:v]prop:match`
    Call { target: String, call: CallSpec },
    /// A `::` clause whose remainder did not parse.
    Malformed { target: String, signature: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CallSpec {
    pub name: String,
    pub args: Vec<(String, String)>,
    pub property: String,
    pub matcher: String,
}

impl Criterion {
    pub(crate) fn parse(key: &str) -> Self {
        Criterion { clauses: key.split_whitespace().map(Clause::parse).collect() }
    }
}

impl Clause {
    fn parse(text: &str) -> Self {
        if let Some((target, signature)) = text.split_once("::") {
            return match CallSpec::parse(signature) {
                Some(call) => Clause::Call { target: target.to_string(), call },
                None => Clause::Malformed { target: target.to_string(), signature: signature.to_string() },
            };
        }

        match text.split_once(':') {
            Some((address, spec)) => Clause::Match {
                address: address.to_string(),
                alternatives: spec.split("||").map(str::to_string).collect(),
            },
            None => Clause::Bare { address: text.to_string() },
        }
    }
}

impl CallSpec {
    fn parse(signature: &str) -> Option<Self> {
        let caps = regex!(r"^(\w+)\[([^\]]*)\]([^:]*):(.*)$").captures(signature)?;
        let args = caps[2]
            .split(',')
            .filter(|arg| !arg.is_empty())
            .map(|arg| match arg.split_once(':') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (arg.to_string(), String::new()),
            })
            .collect();

        Some(CallSpec {
            name: caps[1].to_string(),
            args,
            property: caps[3].to_string(),
            matcher: caps[4].to_string(),
        })
    }
}

impl fmt::Display for CallSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|(k, v)| format!("{k}:{v}")).collect();
        write!(f, "{}[{}]{}:{}", self.name, args.join(","), self.property, self.matcher)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Bare { address } => f.write_str(address),
            Clause::Match { address, alternatives } => write!(f, "{}:{}", address, alternatives.join("||")),
            Clause::Call { target, call } => write!(f, "{target}::{call}"),
            Clause::Malformed { target, signature } => write!(f, "{target}::{signature}"),
        }
    }
}
