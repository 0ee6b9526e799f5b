use crate::cli::ReplArgs;
use crate::repl::highlighter::ReplHelper;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const HISTORY_FILE_NAME: &str = "history.txt";

type LineEditor = Editor<ReplHelper, DefaultHistory>;

/// The file a session reads its line history from and writes it back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    /// Picks the history file for a session, if any.
    ///
    /// `--no-history` wins, then an explicit `--history` path. The platform default is
    /// only used for interactive sessions, so piped input never touches it.
    pub(crate) fn for_session(args: &ReplArgs, interactive: bool) -> Option<Self> {
        if args.no_history {
            debug!("History disabled by flag");
            return None;
        }
        if let Some(path) = &args.history {
            return Some(Self { path: path.clone() });
        }
        if !interactive {
            debug!("Input is not a terminal, skipping default history file");
            return None;
        }
        let path = default_path();
        if path.is_none() {
            warn!("No data directory for this platform, history will not persist");
        }
        path.map(|path| Self { path })
    }

    /// Like [`HistoryFile::for_session`], deciding interactivity from stdin.
    pub(crate) fn for_stdin(args: &ReplArgs) -> Option<Self> {
        Self::for_session(args, std::io::stdin().is_terminal())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Loads earlier entries into `rl`. A missing file just means a first session.
    pub(crate) fn load_into(&self, rl: &mut LineEditor) {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history recorded yet");
            return;
        }
        match rl.load_history(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "History loaded"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "History unreadable"),
        }
    }

    /// Writes the session's entries back, creating the parent directory on demand.
    pub(crate) fn save_from(&self, rl: &mut LineEditor) {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(dir) {
                warn!(dir = %dir.display(), error = %err, "Cannot create history directory");
                return;
            }
        }
        match rl.save_history(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "History saved"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "History not saved"),
        }
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(HISTORY_FILE_NAME))
}
