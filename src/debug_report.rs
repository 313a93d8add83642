use hoist::{HoistReport, Map, Value};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print a resolution report to stderr (stdout carries the hoisted JSON).
pub fn print_run(template: &Map, report: &HoistReport, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Hoisting {} properties", template.len()), ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Properties ━━━", ansi::GRAY));
    if template.is_empty() {
        eprintln!("{}", palette.dim("  Template has no properties"));
    }
    for (key, raw) in template {
        let resolved = report.hoisted.get(key).unwrap_or(&Value::Null);
        eprintln!(
            "  {} {} {}",
            palette.paint(key, ansi::BLUE),
            palette.dim("→"),
            palette.bold(palette.paint(preview(resolved), ansi::GREEN)),
        );
        eprintln!("      {} {}", palette.dim("from:"), palette.dim(preview(raw)));
        if resolved.is_null() && !raw.is_null() {
            eprintln!("      {}", palette.paint("no branch matched and no default was given", ansi::YELLOW));
        }
    }

    let m = &report.metrics;
    eprintln!("\n{}", palette.paint("━━━ Resolution ━━━", ansi::GRAY));
    eprintln!(
        "  Rules: {}  │  Criteria: {} ({} matched)  │  Lookups: {}  │  Probe calls: {}",
        palette.paint(m.rules.to_string(), ansi::CYAN),
        palette.paint(m.criteria.to_string(), ansi::CYAN),
        palette.paint(m.matched.to_string(), ansi::GREEN),
        palette.paint(m.lookups.to_string(), ansi::CYAN),
        palette.paint(m.probe_calls.to_string(), ansi::YELLOW),
    );
    eprintln!(
        "  Nodes: {}  │  Max depth: {}  │  Total: {}",
        palette.paint(m.nodes.to_string(), ansi::CYAN),
        palette.paint(m.max_depth.to_string(), ansi::YELLOW),
        palette.paint(format!("{:?}", m.elapsed), ansi::GREEN),
    );
    eprintln!();
}

fn preview(value: &Value) -> String {
    let text = match value {
        Value::String(s) => format!("{s:?}"),
        Value::Probe(_) => "<probe>".to_string(),
        other => other.to_json().to_string(),
    };
    text.chars().take(80).collect()
}
