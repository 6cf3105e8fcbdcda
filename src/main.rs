use clap::{Parser as ClapParser, Subcommand};
use fieldcheck::cli::{self, CheckOptions, CliError, EvalOptions, EvalResult};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "fieldcheck")]
#[command(about = "fieldcheck - Validate records against database check constraints before writing them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON record against every constraint in a config file
    Check {
        /// TOML file declaring the model and its constraints
        #[arg(short, long)]
        config: String,

        /// JSON record (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Skip constraints that reference this field (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Pretty-print the report
        #[arg(short, long)]
        pretty: bool,
    },

    /// Evaluate one ad-hoc constraint against a JSON record
    Eval {
        /// Field declaration as name:type (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// The constraint to evaluate
        #[arg(short = 'k', long)]
        constraint: String,

        /// JSON record (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Only parse and type-check the constraint
        #[arg(long)]
        syntax_only: bool,
    },

    /// List supported lookups
    Lookups,

    /// List documentation topics
    Docs,

    /// Show documentation for a specific topic
    Doc {
        /// Topic name (use 'fieldcheck docs' to list topics)
        topic: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FIELDCHECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            config,
            input,
            exclude,
            pretty,
        } => run_check(config, input, exclude, pretty),
        Commands::Eval {
            fields,
            constraint,
            input,
            syntax_only,
        } => run_eval(fields, constraint, input, syntax_only),
        Commands::Lookups => {
            print!("{}", cli::lookup_table());
            Ok(true)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(true)
        }
        Commands::Doc { topic } => cli::get_doc_topic(&topic).map(|content| {
            print!("{}", content);
            true
        }),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_check(
    config: String,
    input: Option<String>,
    exclude: Vec<String>,
    pretty: bool,
) -> Result<bool, CliError> {
    let options = CheckOptions {
        config,
        input: read_input(input)?,
        exclude,
    };

    let report = cli::execute_check(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }?;
    println!("{}", json);
    Ok(report.valid)
}

fn run_eval(
    fields: Vec<String>,
    constraint: String,
    input: Option<String>,
    syntax_only: bool,
) -> Result<bool, CliError> {
    let options = EvalOptions {
        fields,
        constraint,
        input: if syntax_only { None } else { read_input(input)? },
        syntax_only,
    };

    match cli::execute_eval(&options)? {
        EvalResult::Declared => {
            println!("Constraint is valid");
            Ok(true)
        }
        EvalResult::Verdict(satisfied) => {
            println!("{}", satisfied);
            Ok(satisfied)
        }
    }
}
