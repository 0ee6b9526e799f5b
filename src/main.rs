mod cli;
mod engine;
mod logging;
mod repl;

use crate::cli::{Cli, Commands, ReplArgs, RunArgs};
use crate::engine::env::Environment;
use crate::engine::eval::eval;
use crate::engine::parser::{ParseError, ParseNode, parse_program};
use crate::engine::translate::translate;
use crate::engine::value::Value;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use tracing::{debug, info};

/// Parses, translates, and evaluates one input line as a single S-Expression.
pub fn evaluate_line(source: &str, env: &mut Environment) -> Result<Value, ParseError> {
    let tree = parse_program(source)?;
    Ok(evaluate_tree(&tree, env))
}

fn evaluate_tree(tree: &ParseNode, env: &mut Environment) -> Value {
    let program = translate(tree);
    debug!(program = %program, "Translated input line");
    eval(env, program)
}

/// Evaluates a line and renders what the session prints for it.
pub fn render_line(source: &str, env: &mut Environment, show_ast: bool) -> Result<String, ParseError> {
    let tree = parse_program(source)?;
    let mut output = evaluate_tree(&tree, env).to_string();
    if show_ast {
        output.push_str(&format!(
            "\n\n=== Abstract Syntax Tree ===\nLeaves: {}, Branches: {}, Most Children: {}\n{}",
            tree.num_leaves(),
            tree.num_branches(),
            tree.most_children(),
            tree
        ));
    }
    Ok(output)
}

fn run(args: RunArgs, env: &mut Environment) -> Result<()> {
    let source = match (args.expr, args.file) {
        (Some(expr), _) => expr,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("either --expr or a file path is required"),
    };

    for (number, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let output = render_line(line, env, args.show_ast)
            .with_context(|| format!("line {} could not be parsed", number + 1))?;
        println!("{}", output);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(logging::directive_for_verbosity(cli.verbose));
    info!(?cli, "Parsed CLI arguments");

    let mut env = Environment::new_with_prelude();
    match cli.command {
        Some(Commands::Run(args)) => run(args, &mut env),
        Some(Commands::Repl(args)) => repl::start_repl(&mut env, &args),
        None => repl::start_repl(&mut env, &ReplArgs::default()),
    }
}
