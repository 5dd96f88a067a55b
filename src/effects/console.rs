//! Line-oriented console over a fixed command table.

use crate::effects::status::format_utc_datetime;
use std::collections::{HashMap, VecDeque};
use std::fmt;

pub const PROMPT: &str = "guest@portfolio:~$";
pub const MAX_LOG_LINES: usize = 200;
pub const MAX_HISTORY: usize = 50;
pub const ACCESS_DENIED: &str = "Access denied: insufficient clearance.";
pub const BANNER: &str = "SYSTEM READY // ACCESS GRANTED";

/// Sections `ls` advertises and `goto` is expected to reach.
pub const SECTIONS: [&str; 4] = ["about", "projects", "experience", "contact"];

pub const HELP_TEXT: &str = concat!(
    "Available commands:\n",
    "  help            show this message\n",
    "  whoami          identify the current session\n",
    "  ls              list sections\n",
    "  date            print the current UTC time\n",
    "  goto <section>  jump to a section\n",
    "  cat <name>      read a file\n",
    "  clear           clear the terminal",
);

/// What the console asks of the page it lives in.
pub trait ConsoleHost {
    /// Smooth-scroll to the element with this id. Returns false if there is no such element.
    fn scroll_to(&mut self, section: &str) -> bool;
    fn now_unix_secs(&self) -> u64;
}

pub struct ActionContext<'a> {
    pub log: &'a mut ConsoleLog,
    pub host: &'a mut dyn ConsoleHost,
}

pub type Action = Box<dyn Fn(&mut ActionContext<'_>) -> Option<String>>;

/// A command's response: fixed text, or a callable that may act on the page and may
/// produce text.
pub enum Reply {
    Literal(String),
    Action(Action),
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Action(_) => f.write_str("Action(..)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct CommandTable {
    entries: HashMap<String, Reply>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert("help", Reply::Literal(HELP_TEXT.to_string()));
        table.insert(
            "whoami",
            Reply::Literal("guest // clearance: visitor // session: read-only".to_string()),
        );
        table.insert(
            "ls",
            Reply::Literal(
                SECTIONS
                    .iter()
                    .map(|s| format!("{s}/"))
                    .collect::<Vec<_>>()
                    .join("  "),
            ),
        );
        table.insert(
            "date",
            Reply::Action(Box::new(|ctx: &mut ActionContext<'_>| {
                Some(format_utc_datetime(ctx.host.now_unix_secs()))
            })),
        );
        table.insert(
            "clear",
            Reply::Action(Box::new(|ctx: &mut ActionContext<'_>| {
                ctx.log.clear();
                None
            })),
        );
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, reply: Reply) {
        self.entries.insert(name.into(), reply);
    }

    pub fn get(&self, name: &str) -> Option<&Reply> {
        self.entries.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    System,
    Echo,
    Output,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub kind: LineKind,
    pub text: String,
}

/// Rendered console lines, oldest first, bounded to `cap` entries.
#[derive(Clone, Debug)]
pub struct ConsoleLog {
    lines: VecDeque<LogLine>,
    cap: usize,
}

impl ConsoleLog {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            kind,
            text: text.into(),
        });
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    /// The newest `rows` lines, oldest first: a view scrolled to the end.
    pub fn visible_tail(&self, rows: usize) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().skip(self.lines.len().saturating_sub(rows))
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_LINES)
    }
}

pub struct Console {
    table: CommandTable,
    log: ConsoleLog,
}

impl Console {
    pub fn new(table: CommandTable) -> Self {
        Self {
            table,
            log: ConsoleLog::default(),
        }
    }

    pub fn with_banner(mut self) -> Self {
        self.log.push(LineKind::System, BANNER);
        self.log
            .push(LineKind::System, "Type 'help' for available commands.");
        self
    }

    pub fn log(&self) -> &ConsoleLog {
        &self.log
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Handle one submitted line. Returns false when the line was blank and nothing was logged.
    pub fn submit(&mut self, raw: &str, host: &mut dyn ConsoleHost) -> bool {
        let line = raw.trim();
        if line.is_empty() {
            return false;
        }
        self.log.push(LineKind::Echo, format!("{PROMPT} {line}"));

        let reply = match self.table.get(line) {
            Some(Reply::Literal(text)) => Some((LineKind::Output, text.clone())),
            Some(Reply::Action(action)) => {
                let mut ctx = ActionContext {
                    log: &mut self.log,
                    host: &mut *host,
                };
                action(&mut ctx).map(|text| (LineKind::Output, text))
            }
            None => Some(respond_to_prefixed(line, host)),
        };

        if let Some((kind, text)) = reply {
            for part in text.lines() {
                self.log.push(kind, part);
            }
        }
        true
    }
}

fn respond_to_prefixed(line: &str, host: &mut dyn ConsoleHost) -> (LineKind, String) {
    if let Some(section) = line.strip_prefix("goto ") {
        let section = section.trim();
        if host.scroll_to(section) {
            tracing::debug!(section, "console navigation");
            return (LineKind::Output, format!("Navigating to {section}..."));
        }
        tracing::warn!(section, "console goto target missing");
        return (LineKind::Error, format!("Section not found: {section}"));
    }
    if line.strip_prefix("cat ").is_some() {
        return (LineKind::Error, ACCESS_DENIED.to_string());
    }
    (
        LineKind::Error,
        format!("Command not found: {line}. Type 'help' for options."),
    )
}

/// Single-line input buffer with a bounded submit history.
#[derive(Clone, Debug, Default)]
pub struct LineEditor {
    buffer: String,
    history: VecDeque<String>,
    recall: Option<usize>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn insert(&mut self, ch: char) {
        if !ch.is_control() {
            self.buffer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Take the current line for submission, remembering non-blank lines.
    pub fn take(&mut self) -> String {
        let line = std::mem::take(&mut self.buffer);
        self.recall = None;
        let trimmed = line.trim();
        if !trimmed.is_empty() && self.history.back().map(String::as_str) != Some(trimmed) {
            if self.history.len() == MAX_HISTORY {
                self.history.pop_front();
            }
            self.history.push_back(trimmed.to_string());
        }
        line
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.recall {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.recall = Some(idx);
        self.buffer = self.history[idx].clone();
    }

    pub fn history_next(&mut self) {
        let Some(i) = self.recall else {
            return;
        };
        if i + 1 < self.history.len() {
            self.recall = Some(i + 1);
            self.buffer = self.history[i + 1].clone();
        } else {
            self.recall = None;
            self.buffer.clear();
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
