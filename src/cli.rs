use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::contract::CardType;

#[derive(Parser, Debug, Clone)]
#[command(name = "mymetrics", about = "Normalize script results into dashboard card payloads", version)]
pub struct Cli {
    /// Output machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable markdown rendering of digest cards.
    #[arg(long = "no-md", global = true)]
    pub no_md: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Tokenize or format a script argument string.
    Args {
        #[command(subcommand)]
        command: ArgsCommand,
    },

    /// Normalize a script's output into a typed card payload.
    Normalize(NormalizeArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArgsCommand {
    /// Split argument text into tokens.
    Parse {
        /// Argument text, e.g. `--name "hello world"`.
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },

    /// Join tokens into canonical argument text.
    Format {
        #[arg(value_name = "TOKEN", allow_hyphen_values = true, trailing_var_arg = true)]
        tokens: Vec<String>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Card type the output must conform to.
    #[arg(long = "card-type", value_enum)]
    pub card_type: CardType,

    /// JSON file with per-card-type `*_key` field mappings.
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// File holding the script's stdout (reads stdin when omitted).
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Exit code the script finished with.
    #[arg(long = "exit-code", default_value_t = 0, allow_negative_numbers = true)]
    pub exit_code: i32,

    /// Series mode: `auto` or a mode name (defaults to DEFAULT_SERIES_MODE).
    #[arg(long)]
    pub mode: Option<String>,

    /// Range ratio at which two series lines get separate axes.
    #[arg(long)]
    pub threshold: Option<f64>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
