mod debug_report;

use phrasebook::rules::FsTree;
use phrasebook::{Attributes, CandidateStrategy, Categories, JsonRuleSource, Matcher, Options, PlaceholderRegistry};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

const DEFAULT_RULES_DIR: &str = "rules";
const RULES_ENV: &str = "PHRASEBOOK_RULES";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    let registry = if config.default_placeholders {
        PlaceholderRegistry::builtin(Categories::all())
    } else {
        PlaceholderRegistry::new()
    };

    let source = JsonRuleSource::new(FsTree::new(&config.rules_dir));
    let matcher = match Matcher::from_source(&source, registry) {
        Ok(matcher) => matcher,
        Err(err) => {
            eprintln!("error: failed to build index from {}: {err}", config.rules_dir.display());
            std::process::exit(1);
        }
    };

    let opts = Options { strategy: config.strategy };
    let res = matcher.match_verbose_with(&config.attributes, &config.input, &opts);
    debug_report::print_run(&res, &matcher, config.color);
}

struct CliConfig {
    input: String,
    rules_dir: PathBuf,
    attributes: Attributes,
    strategy: CandidateStrategy,
    default_placeholders: bool,
    color: bool,
    verbose: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut rules_dir = std::env::var_os(RULES_ENV).map(PathBuf::from).unwrap_or_else(|| DEFAULT_RULES_DIR.into());
    let mut attributes = Attributes::new();
    let mut strategy = CandidateStrategy::default();
    let mut default_placeholders = true;
    let mut color = io::stdout().is_terminal();
    let mut verbose = false;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("phrasebook {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--no-default-placeholders" => default_placeholders = false,
            "--rules" => {
                let value = args.next().ok_or_else(|| "error: --rules expects a value".to_string())?;
                rules_dir = PathBuf::from(value);
            }
            "--attr" => {
                let value = args.next().ok_or_else(|| "error: --attr expects a value".to_string())?;
                parse_attribute(&value, &mut attributes)?;
            }
            "--strategy" => {
                let value = args.next().ok_or_else(|| "error: --strategy expects a value".to_string())?;
                strategy = parse_strategy(&value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--rules=") => {
                rules_dir = PathBuf::from(arg.trim_start_matches("--rules="));
            }
            _ if arg.starts_with("--attr=") => {
                parse_attribute(arg.trim_start_matches("--attr="), &mut attributes)?;
            }
            _ if arg.starts_with("--strategy=") => {
                strategy = parse_strategy(arg.trim_start_matches("--strategy="))?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                input = Some(std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" "));
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, rules_dir, attributes, strategy, default_placeholders, color, verbose })
}

fn parse_attribute(value: &str, attributes: &mut Attributes) -> Result<(), String> {
    match value.split_once('=') {
        Some((name, v)) if !name.trim().is_empty() => {
            attributes.insert(name.trim(), v);
            Ok(())
        }
        _ => Err(format!("error: invalid --attr '{value}' (expected key=value)")),
    }
}

fn parse_strategy(value: &str) -> Result<CandidateStrategy, String> {
    match value {
        "heuristic" => Ok(CandidateStrategy::Heuristic),
        "exhaustive" => Ok(CandidateStrategy::Exhaustive),
        _ => Err(format!("error: invalid --strategy '{value}' (expected heuristic or exhaustive)")),
    }
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "phrasebook {version}

Match text against a directory of phrase/response rules.

Usage:
  phrasebook [OPTIONS] [--] <input...>
  echo <input> | phrasebook [OPTIONS]

Options:
  --rules <dir>                Rule directory (recursive, *.json).
                               Default: ${env} or ./{default_dir}
  --attr <key=value>           Context attribute, repeatable.
                               e.g. --attr player_name=Steve
  --strategy <name>            heuristic (default) or exhaustive.
  --no-default-placeholders    Do not register built-in placeholders.
  --color                      Force ANSI color output.
  --no-color                   Disable ANSI color output.
  -v, --verbose                Log candidate selection (RUST_LOG overrides).
  -h, --help                   Show this help message.
  -V, --version                Print version information.

Exit codes:
  0  Success.
  1  Index could not be built.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        env = RULES_ENV,
        default_dir = DEFAULT_RULES_DIR
    )
}
