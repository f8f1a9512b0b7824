//! Terminal rendering of session state.
//!
//! Everything here is a pure function of a snapshot or message; printing is
//! left to the caller.

use colored::{ColoredString, Colorize};
use finrag_application::{Routing, SessionSnapshot};
use finrag_core::backend::HealthReport;
use finrag_core::message::{Message, MessageKind, RouteBadge};

pub fn welcome() -> String {
    [
        "💼 Financial RAG System".bright_magenta().bold().to_string(),
        "Ask questions about stocks or upload documents for analysis."
            .bright_black()
            .to_string(),
        "  • Without documents: get live stock data".bright_black().to_string(),
        "  • With documents: search uploaded PDFs".bright_black().to_string(),
        "Type /help for commands, or 'quit' to exit.".bright_black().to_string(),
    ]
    .join("\n")
}

pub fn help() -> String {
    [
        "  <question>          ask about the current symbol or the selected documents",
        "  /symbol [TICKER]    show or set the ticker symbol",
        "  /docs               list available documents",
        "  /select <id>        select or deselect a document",
        "  /refresh            reload the document list",
        "  /upload [path]      open the upload prompt, or upload a PDF",
        "  /cancel             close the upload prompt",
        "  /health             check the backend",
        "  quit | exit         leave",
    ]
    .join("\n")
}

fn paint(kind: MessageKind, text: &str) -> ColoredString {
    match kind {
        MessageKind::User => text.green(),
        MessageKind::Assistant => text.bright_blue(),
        MessageKind::System => text.bright_green(),
        MessageKind::Error => text.red(),
    }
}

/// Header line plus content lines for one message.
pub fn message(message: &Message) -> String {
    let mut header = format!("[{}] {}", message.timestamp, message.kind)
        .bright_black()
        .to_string();
    if let Some(badge) = message.route_badge() {
        let label = match badge {
            RouteBadge::LiveData => badge.label().blue(),
            RouteBadge::Documents => badge.label().purple(),
        };
        header.push(' ');
        header.push_str(&label.to_string());
    }

    let mut lines = vec![header];
    lines.extend(
        message
            .content
            .lines()
            .map(|line| paint(message.kind, line).to_string()),
    );
    lines.join("\n")
}

/// The query routing notice shown under the input line.
pub fn routing(snapshot: &SessionSnapshot) -> String {
    match snapshot.routing() {
        Routing::LiveData => format!("📈 Getting live financial data for {}", snapshot.symbol),
        Routing::Documents(count) => format!("🔍 Searching {count} document(s)"),
    }
}

pub fn documents(snapshot: &SessionSnapshot) -> String {
    let mut lines = vec![
        format!("Available Documents ({})", snapshot.registry.len())
            .bold()
            .to_string(),
    ];

    if snapshot.is_loading_documents() {
        lines.push("Loading documents...".bright_black().to_string());
    }

    if snapshot.registry.is_empty() {
        lines.push("No documents uploaded yet".bright_black().italic().to_string());
    }

    for doc in snapshot.registry.documents() {
        let selected = snapshot.selection.contains(&doc.document_id);
        let marker = if selected { "[x]" } else { "[ ]" };
        let line = format!("{} {}  {} chunks", marker, doc.document_id, doc.chunk_count);
        lines.push(if selected {
            line.bright_blue().to_string()
        } else {
            line
        });
    }

    let stale = snapshot.stale_selections();
    if !stale.is_empty() {
        lines.push(
            format!("Selected but no longer listed: {}", stale.join(", "))
                .yellow()
                .to_string(),
        );
    }

    if !snapshot.selection.is_empty() {
        lines.push(
            format!(
                "📄 {} document(s) selected. Questions will search these documents",
                snapshot.selection.len()
            )
            .bright_blue()
            .to_string(),
        );
    }

    lines.join("\n")
}

pub fn health(report: &HealthReport) -> String {
    let mut line = if report.is_healthy() {
        format!("Backend is {}", report.status).bright_green().to_string()
    } else {
        format!("Backend is {}", report.status).yellow().to_string()
    };
    if let Some(error) = &report.error {
        line.push_str(&format!(" ({})", error).red().to_string());
    }
    line
}
