use clap::{Parser as ClapParser, Subcommand};
use nljq::cli::{self, AskOptions, CliError, CompileOptions, EvalOptions};
use nljq::{DocumentSource, LlmConfig, Pipeline, Strategy};
use std::io::{self, Read};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "nljq")]
#[command(about = "nljq - Ask questions about JSON documents in plain English, answered with jq")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// How questions are translated
    #[arg(long, global = true, value_enum, env = "NLJQ_STRATEGY", default_value = "rules")]
    strategy: Strategy,

    /// API key for the llm strategy
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name for the llm strategy
    #[arg(long, global = true, env = "NLJQ_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Chat-completion service base URL
    #[arg(long, global = true, env = "NLJQ_BASE_URL", default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Request timeout for the llm strategy, in seconds
    #[arg(long, global = true, env = "NLJQ_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Log filter, e.g. `debug` or `nljq=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a question and run it against a JSON document
    Ask {
        /// The question, e.g. "average age"
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the jq expression a question translates to
    Compile {
        query: String,

        /// JSON input, only needed by the llm strategy
        #[arg(short, long, conflicts_with = "explain")]
        input: Option<String>,

        /// Show each rule tier's decision (rules strategy only)
        #[arg(long)]
        explain: bool,
    },

    /// Run a jq expression directly
    Eval {
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Run the bundled sample questions against the bundled document
    Demo,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: Option<&str>) {
    let filter = level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let llm = LlmConfig {
        api_key: cli.api_key.unwrap_or_default(),
        model: cli.model,
        base_url: cli.base_url,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    match cli.command {
        Commands::Ask {
            query,
            input,
            pretty,
        } => {
            let pipeline = Pipeline::for_strategy(cli.strategy, llm)?;
            let options = AskOptions {
                query,
                input: read_input(input)?,
            };
            let value = cli::execute_ask(&pipeline, &options)?;
            println!("{}", cli::render(&value, pretty));
        }
        Commands::Compile {
            query,
            input,
            explain,
        } => {
            if explain {
                let translation = cli::explain(&query, cli.strategy)?;
                print!("{}", cli::format_translation(&translation));
                return Ok(());
            }
            let pipeline = Pipeline::for_strategy(cli.strategy, llm)?;
            let options = CompileOptions {
                query,
                input: input.map(DocumentSource::Text),
            };
            println!("{}", cli::execute_compile(&pipeline, &options)?);
        }
        Commands::Eval {
            expression,
            input,
            pretty,
        } => {
            let options = EvalOptions {
                expression,
                input: read_input(input)?,
            };
            let value = cli::execute_eval(&options)?;
            println!("{}", cli::render(&value, pretty));
        }
        Commands::Demo => {
            let pipeline = Pipeline::for_strategy(cli.strategy, llm)?;
            print!("{}", cli::run_demo(&pipeline));
        }
    }
    Ok(())
}

/// `--input` text, else raw stdin bytes when stdin is not a terminal.
fn read_input(input: Option<String>) -> Result<Option<DocumentSource>, CliError> {
    match input {
        Some(s) => Ok(Some(DocumentSource::Text(s))),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(Some(DocumentSource::Bytes(buffer)))
        }
        None => Ok(None),
    }
}
