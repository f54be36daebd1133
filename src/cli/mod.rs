//! Command-line interface for quicknote.
//!
//! Provides commands for running the HTTP endpoint, parsing a single note
//! against the configured provider, and inspecting configuration.

use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::domain::ParseRequest;
use crate::server::{self, ParseNoteResponse};

/// quicknote - Turn free-text money notes into transactions
#[derive(Parser, Debug)]
#[command(name = "quicknote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP endpoint
    Serve {
        /// Address to bind to (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Parse one note and print the result as JSON
    Parse {
        /// Note text (reads from stdin if not provided)
        text: Option<String>,

        /// Read the note from stdin
        #[arg(long)]
        stdin: bool,

        /// Known income category (repeatable)
        #[arg(long = "income-category", value_name = "NAME")]
        income_categories: Vec<String>,

        /// Known expense category (repeatable)
        #[arg(long = "expense-category", value_name = "NAME")]
        expense_categories: Vec<String>,

        /// Known account name (repeatable)
        #[arg(short, long = "account", value_name = "NAME")]
        accounts: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Show resolved configuration (secrets masked)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve { bind } => serve(bind).await,
            Commands::Parse {
                text,
                stdin,
                income_categories,
                expense_categories,
                accounts,
                pretty,
            } => {
                let raw_text = read_note(text, stdin)?;
                let request = ParseRequest::new(raw_text)
                    .with_income_categories(income_categories)
                    .with_expense_categories(expense_categories)
                    .with_accounts(accounts);
                parse_note(request, pretty).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Note from the argument, or from stdin when asked or piped
fn read_note(text: Option<String>, use_stdin: bool) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if use_stdin || !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        return Ok(buffer);
    }

    anyhow::bail!("No note provided. Pass it as an argument or pipe to stdin")
}

async fn serve(bind: Option<String>) -> Result<()> {
    let mut resolved = config::config()?.clone();
    if let Some(bind) = bind {
        resolved.bind = bind;
    }
    server::serve(&resolved).await
}

async fn parse_note(request: ParseRequest, pretty: bool) -> Result<()> {
    let service = config::config()?.build_service()?;
    let result = service.parse(&request).await?;

    let response = ParseNoteResponse::from(result);
    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);

    Ok(())
}

fn show_config() -> Result<()> {
    let resolved = config::config()?;
    println!("{}", resolved.describe());
    Ok(())
}
