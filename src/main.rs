use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use stackcheck::config::{CONFIG_FILE_NAME, Config};
use stackcheck::{CompileError, check_source};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log checker decisions (same as RUST_LOG=debug).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify the stack effects of every word in a source file.
    Check {
        /// The input file.
        input: PathBuf,

        /// Config file. Defaults to ./stackcheck.toml when present.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Start word bodies from an empty stack instead of their parameters.
        #[arg(long, default_value_t = false)]
        no_seed_params: bool,
    },

    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Check {
            input,
            config,
            no_seed_params,
        } => {
            let mut config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::load_or_default(&PathBuf::from(CONFIG_FILE_NAME))?,
            };
            if no_seed_params {
                config.checker.seed_parameters = false;
            }
            tracing::debug!("checker config: {:?}", config.checker);

            let source = fs::read_to_string(&input)
                .map_err(|e| format!("Failed to read {}: {}", input.display(), e))?;

            match check_source(&source, config.checker) {
                Ok(program) => {
                    for (_, function) in program.functions() {
                        println!("{} {} ok", function.name(), function.effect());
                    }
                }
                Err(err) => {
                    let location = match &err {
                        CompileError::Parse(e) => format!("{}:{}", e.line, e.column),
                        CompileError::Type { line, column, .. } => format!("{}:{}", line, column),
                    };
                    eprintln!("{}:{}: error: {}", input.display(), location, describe(&err));
                    std::process::exit(1);
                }
            }
        }

        Command::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Error text without the position prefix
fn describe(err: &CompileError) -> String {
    match err {
        CompileError::Parse(e) => e.message.clone(),
        CompileError::Type { word, source, .. } => format!("in '{}': {}", word, source),
    }
}
