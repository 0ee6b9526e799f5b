pub mod highlighter;
pub mod history;

use crate::cli::ReplArgs;
use crate::engine::env::Environment;
use crate::repl::highlighter::ReplHelper;
use crate::repl::history::HistoryFile;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::{info, warn};

/// Runs the read-eval-print loop until `.exit` or end of input.
#[tracing::instrument(skip(env))]
pub fn start_repl(env: &mut Environment, args: &ReplArgs) -> anyhow::Result<()> {
    info!("Starting REPL session with rustyline");
    println!("{} version {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Type .exit or press Ctrl-D to exit\n");

    let mut rl = Editor::<ReplHelper, DefaultHistory>::new()?;
    let mut helper = ReplHelper::new();
    helper.set_names(env.names());
    rl.set_helper(Some(helper));

    let history = HistoryFile::for_stdin(args);
    if let Some(history) = &history {
        history.load_into(&mut rl);
    }

    loop {
        match rl.readline(&args.prompt) {
            Ok(line) => {
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    continue;
                }
                if let Err(err) = rl.add_history_entry(trimmed_input) {
                    warn!("Failed to add line to history: {}", err);
                }
                if trimmed_input == ".exit" {
                    info!("Exiting REPL session via user command.");
                    break;
                }

                match crate::render_line(trimmed_input, env, args.show_ast) {
                    Ok(output) => println!("{}", output),
                    Err(e) => println!("{}", e),
                }

                if let Some(helper) = rl.helper_mut() {
                    helper.set_names(env.names());
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type .exit or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                break;
            }
            Err(err) => {
                warn!("Readline error: {:?}", err);
                return Err(err.into());
            }
        }
    }

    if let Some(history) = &history {
        history.save_from(&mut rl);
    }
    Ok(())
}
