mod debug_report;

use chrono::{Local, NaiveDateTime};
use hoist::{ContextStore, HoistError, Options, ResolveFlags, Value, clock, hoist_verbose_with};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HOIST_LOG";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(config: &CliConfig) -> hoist::Result<()> {
    let template = match &config.template {
        Some(path) => std::fs::read_to_string(path)?,
        None => read_stdin()?,
    };
    let template = match Value::from(serde_json::from_str::<serde_json::Value>(&template)?) {
        Value::Object(map) => map,
        other => return Err(HoistError::InvalidTemplate(format!("template must be a JSON object, got {other}"))),
    };

    let mut store = match &config.context {
        Some(path) => ContextStore::from_json(serde_json::from_str(&std::fs::read_to_string(path)?)?)?,
        None => ContextStore::new(),
    };
    if store.namespace("@date").is_none() {
        store.insert("@date", clock::date_namespace(config.reference_time));
    }

    let report = hoist_verbose_with(&template, &store, &config.options)?;
    if config.verbose {
        debug_report::print_run(&template, &report, config.color);
    }

    let json = Value::Object(report.hoisted).to_json();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

struct CliConfig {
    template: Option<PathBuf>,
    context: Option<PathBuf>,
    reference_time: NaiveDateTime,
    options: Options,
    verbose: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut template: Option<PathBuf> = None;
    let mut context: Option<PathBuf> = None;
    let mut reference_time = Local::now().naive_local();
    let mut options = Options::default();
    let mut verbose = false;
    let mut color = io::stderr().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("hoist {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--collapse-falsy" => options.flags |= ResolveFlags::COLLAPSE_FALSY,
            "--template" | "-t" => {
                let value = args.next().ok_or_else(|| "error: --template expects a file".to_string())?;
                template = Some(PathBuf::from(value));
            }
            "--context" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --context expects a file".to_string())?;
                context = Some(PathBuf::from(value));
            }
            "--reference" => {
                let value = args.next().ok_or_else(|| "error: --reference expects a value".to_string())?;
                reference_time = parse_reference(&value)?;
            }
            "--max-depth" => {
                let value = args.next().ok_or_else(|| "error: --max-depth expects a value".to_string())?;
                options.max_depth = parse_depth(&value)?;
            }
            "--" => {
                if let Some(value) = args.next() {
                    if template.is_some() {
                        return Err("error: template provided multiple times".to_string());
                    }
                    template = Some(PathBuf::from(value));
                }
                break;
            }
            _ if arg.starts_with("--reference=") => {
                reference_time = parse_reference(arg.trim_start_matches("--reference="))?;
            }
            _ if arg.starts_with("--max-depth=") => {
                options.max_depth = parse_depth(arg.trim_start_matches("--max-depth="))?;
            }
            _ if arg.starts_with("--template=") => {
                template = Some(PathBuf::from(arg.trim_start_matches("--template=")));
            }
            _ if arg.starts_with("--context=") => {
                context = Some(PathBuf::from(arg.trim_start_matches("--context=")));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                if template.is_some() {
                    return Err("error: template provided multiple times".to_string());
                }
                template = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(CliConfig { template, context, reference_time, options, verbose, color })
}

fn read_stdin() -> hoist::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("error: invalid --reference '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn parse_depth(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(format!("error: invalid --max-depth '{value}' (expected a positive integer)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "hoist {version}

Resolve a JSON template of rule objects against a JSON context store.

Usage:
  hoist [OPTIONS] [--] <template.json>
  hoist [OPTIONS] < template.json

Options:
  -t, --template <file>      Template JSON object. Read from stdin when omitted.
  -c, --context <file>       Context store JSON object ({{\"@ns\": {{...}}}}).
  --reference <timestamp>    Reference time for the built-in @date namespace,
                             YYYY-MM-DDTHH:MM:SS. Default: local now.
  --max-depth <n>            Maximum indirection depth. Default: {max_depth}
  --collapse-falsy           Resolve false/0/\"\" rule outcomes to null.
  -v, --verbose              Print a resolution report to stderr.
  --color                    Force ANSI color in the report.
  --no-color                 Disable ANSI color in the report.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                  Log filter (e.g. debug, hoist=trace). Default: warn

Exit codes:
  0  Success.
  1  Resolution or input error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        max_depth = hoist::DEFAULT_MAX_DEPTH,
        log_env = LOG_ENV,
    )
}
