//! Verdict CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use verdict_runtime::{DslConfig, DslService, Repl, World};
use verdict_vocabulary::Vocabulary;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    world: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-v" | "--verbose" => config.verbose = true,
            "-w" | "--world" => {
                let path = args.next().ok_or("--world requires a file")?;
                config.world = Some(PathBuf::from(path));
            }
            "-c" | "--config" => {
                let path = args.next().ok_or("--config requires a file")?;
                config.config = Some(PathBuf::from(path));
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
    }

    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("verdict {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DslConfig::default(),
    };

    let world = cli.world.as_ref().map(World::load).transpose()?;
    let vocabulary = match &world {
        Some(world) => world.vocabulary()?,
        None => Vocabulary::default(),
    };

    let service = DslService::new(vocabulary, config)?;
    let mut repl = Repl::new(service)?;
    if let Some(world) = world {
        repl = repl.with_world(world);
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mverdict\x1b[0m - natural-language condition REPL

\x1b[1mUSAGE:\x1b[0m
    verdict [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -w, --world FILE    Load a JSON world; conditions are evaluated against it
    -c, --config FILE   Load service settings from JSON
    -v, --verbose       Log cache and evaluation detail to stderr
    -h, --help          Print help information
    -V, --version       Print version information

\x1b[1mREPL COMMANDS:\x1b[0m
    :clear              Clear the expression cache
    :quit               Exit (also Ctrl+D)

\x1b[1mEXAMPLES:\x1b[0m
    verdict --world demos/cellar.json
    ?> the player's attribute strength is greater than 2 and the lamp is lit"
    );
}
