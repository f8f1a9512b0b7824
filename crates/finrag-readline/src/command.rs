use std::path::PathBuf;

/// Slash commands offered for completion.
pub const COMMANDS: &[&str] = &[
    "/symbol", "/docs", "/select", "/refresh", "/upload", "/cancel", "/health", "/help",
];

/// One line of REPL input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a command is a question, kept as typed.
    Ask(String),
    Symbol(Option<String>),
    Docs,
    Select(String),
    Refresh,
    Upload(Option<PathBuf>),
    Cancel,
    Health,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses a line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Some(Command::Quit);
        }
        if !trimmed.starts_with('/') {
            return Some(Command::Ask(line.to_string()));
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match name {
            "/symbol" => Command::Symbol(arg.map(|s| s.to_uppercase())),
            "/docs" => Command::Docs,
            "/select" => match arg {
                Some(id) => Command::Select(id),
                None => Command::Unknown("/select needs a document id".to_string()),
            },
            "/refresh" => Command::Refresh,
            "/upload" => Command::Upload(arg.map(PathBuf::from)),
            "/cancel" => Command::Cancel,
            "/health" => Command::Health,
            "/help" => Command::Help,
            other => Command::Unknown(format!("Unknown command: {other}")),
        };
        Some(command)
    }
}
