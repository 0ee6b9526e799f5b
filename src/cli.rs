use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "qlisp> ";

/// A small Lisp with S-Expressions and Q-Expressions.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "qlisp", bin_name = "qlisp")]
pub struct Cli {
    /// Increase log output on stderr (-v warn, -vv info, -vvv debug, -vvvv trace).
    /// RUST_LOG takes precedence when set.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Starts the REPL when omitted.
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates an expression, or every non-empty line of a file.
    Run(RunArgs),
    /// Starts an interactive session.
    Repl(ReplArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Expression to evaluate as a single line.
    #[clap(short, long, value_name = "LISP_CODE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a file; each non-empty line is evaluated in turn.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr", required_unless_present = "expr")]
    pub file: Option<PathBuf>,

    /// Print parse tree statistics and the tree after each result.
    #[clap(long)]
    pub show_ast: bool,
}

#[derive(Args, Debug)]
pub struct ReplArgs {
    /// Prompt shown before each input line.
    #[clap(long, env = "QLISP_PROMPT", default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Print parse tree statistics and the tree after each result.
    #[clap(long)]
    pub show_ast: bool,

    /// History file. Defaults to the platform data directory when stdin is a terminal.
    #[clap(long, value_name = "PATH", env = "QLISP_HISTORY", conflicts_with = "no_history")]
    pub history: Option<PathBuf>,

    /// Neither read nor write a history file.
    #[clap(long)]
    pub no_history: bool,
}

impl Default for ReplArgs {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            show_ast: false,
            history: None,
            no_history: false,
        }
    }
}
