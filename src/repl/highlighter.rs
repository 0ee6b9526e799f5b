use crate::engine::builtins::Builtin;
use once_cell::sync::Lazy;
use owo_colors::OwoColorize;
use regex::Regex;
use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::Context;
use rustyline_derive::{Helper, Hinter, Validator};
use std::borrow::Cow::{self, Borrowed, Owned};

// Alternation is leftmost-first, so numbers win over symbols just like in the grammar.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<number>-?[0-9]+)|(?P<symbol>[a-zA-Z0-9_+\-*/\\=<>!&%^]+)|(?P<delim>[(){}])|(?P<space>\s+)|(?P<other>.)",
    )
    .expect("token pattern is valid")
});

static SYMBOL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9_+\-*/\\=<>!&%^]*$").expect("prefix pattern is valid"));

fn is_builtin(name: &str) -> bool {
    Builtin::ALL.iter().any(|builtin| builtin.name() == name)
}

/// Colors a line token by token.
pub fn highlight_line(line: &str) -> String {
    let mut styled = String::with_capacity(line.len() * 2);
    for caps in TOKEN_RE.captures_iter(line) {
        if let Some(m) = caps.name("number") {
            styled.push_str(&m.as_str().magenta().to_string());
        } else if let Some(m) = caps.name("symbol") {
            if is_builtin(m.as_str()) {
                styled.push_str(&m.as_str().cyan().bold().to_string());
            } else {
                styled.push_str(&m.as_str().yellow().to_string());
            }
        } else if let Some(m) = caps.name("delim") {
            styled.push_str(&m.as_str().blue().to_string());
        } else if let Some(m) = caps.name("space") {
            styled.push_str(m.as_str());
        } else if let Some(m) = caps.name("other") {
            styled.push_str(&m.as_str().red().to_string());
        }
    }
    styled
}

/// Line editor helper: syntax coloring plus completion of bound names.
#[derive(Helper, Hinter, Validator, Default)]
pub struct ReplHelper {
    names: Vec<String>,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the completion candidates, typically with the environment's bound names.
    pub fn set_names<'a>(&mut self, names: impl Iterator<Item = &'a str>) {
        self.names = names.map(str::to_string).collect();
    }

    fn candidates(&self, prefix: &str) -> Vec<String> {
        let mut matches: Vec<String> = self
            .names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        matches.sort();
        matches
    }
}

impl Completer for ReplHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let before_cursor = &line[..pos];
        let start = SYMBOL_PREFIX_RE
            .find(before_cursor)
            .map_or(pos, |m| m.start());
        let prefix = &before_cursor[start..];
        if prefix.is_empty() {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.candidates(prefix)))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Borrowed(line);
        }
        Owned(highlight_line(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        // Every edit can change how neighbouring tokens are colored.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        ansi.replace_all(s, "").into_owned()
    }

    #[test]
    fn highlighting_preserves_text() {
        let line = "(+ 1 -2 {head x}) $";
        assert_eq!(strip_ansi(&highlight_line(line)), line);
    }

    #[test]
    fn builtins_are_styled_differently_from_user_symbols() {
        let builtin = highlight_line("head");
        let user = highlight_line("heap");
        assert_ne!(strip_ansi(&builtin), builtin);
        assert_ne!(
            builtin.replace("head", ""),
            user.replace("heap", "")
        );
    }

    #[test]
    fn candidates_filter_by_prefix() {
        let mut helper = ReplHelper::new();
        helper.set_names(["head", "tail", "help", "+"].into_iter());
        assert_eq!(helper.candidates("he"), vec!["head", "help"]);
        assert!(helper.candidates("z").is_empty());
    }
}
