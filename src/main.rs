use clap::{Parser as ClapParser, Subcommand};
use lexidec::cli::{self, BatchKind, BatchOptions, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "lexidec")]
#[command(about = "Lexidec - An order-preserving text encoding for decimal numbers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode decimal numbers into sortable strings
    Encode {
        /// Values to encode (reads lines from stdin if not provided)
        values: Vec<String>,

        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Decode encoded strings back into decimal numbers
    Decode {
        /// Encoded strings to decode (reads lines from stdin if not provided)
        values: Vec<String>,

        /// Emit one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Rewrite decimal-notation patterns over the encoded form
    Normalize {
        /// Patterns to rewrite (reads lines from stdin if not provided)
        patterns: Vec<String>,

        /// Emit one JSON object per line, including the lossiness verdict
        #[arg(long)]
        json: bool,
    },

    /// Validate a pattern and print its rewrite
    Check {
        /// The pattern to check
        pattern: String,

        /// Only validate syntax, don't rewrite
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'lexidec docs' to list categories)
        category: String,
    },

    /// Interactive onboarding tutorial
    Onboard,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode { values, json } => run_batch(BatchKind::Encode, values, json),
        Commands::Decode { values, json } => run_batch(BatchKind::Decode, values, json),
        Commands::Normalize { patterns, json } => run_batch(BatchKind::Normalize, patterns, json),
        Commands::Check {
            pattern,
            syntax_only,
        } => run_check(pattern, syntax_only),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
        Commands::Onboard => {
            print!("{}", cli::get_onboarding_content());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_batch(kind: BatchKind, values: Vec<String>, json: bool) -> Result<(), CliError> {
    let values = if !values.is_empty() {
        values
    } else if !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
        buffer
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    let options = BatchOptions { kind, values, json };
    for line in cli::run_batch(&options)? {
        println!("{}", line);
    }
    Ok(())
}

fn run_check(pattern: String, syntax_only: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        pattern,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Normalized(normalized) => {
            println!("{}", normalized.pattern);
            println!("{}", if normalized.lossy { "lossy" } else { "exact" });
        }
    }
    Ok(())
}
