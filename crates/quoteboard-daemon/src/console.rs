//! Plain-text rendering of board output for the terminal.

use std::fmt::Write;

use quoteboard_core::quotes::{CategoryOption, Quote};
use quoteboard_core::DisplayContent;

/// A quote as shown in the quote area: its text, then its category.
pub fn format_quote(quote: &Quote) -> String {
    format!("{}\nCategory: {}", quote.text, quote.category)
}

pub fn format_content(content: &DisplayContent) -> String {
    match content {
        DisplayContent::Blank => String::new(),
        DisplayContent::Quote { quote } => format_quote(quote),
        DisplayContent::List { quotes } => quotes
            .iter()
            .map(format_quote)
            .collect::<Vec<_>>()
            .join("\n\n"),
        DisplayContent::Message { text } => text.clone(),
    }
}

/// One option per line, the selected one marked with `*`.
pub fn format_options(options: &[CategoryOption], selected: &str) -> String {
    let mut out = String::new();
    for option in options {
        let marker = if option.value == selected { '*' } else { ' ' };
        let _ = writeln!(out, "{} {}", marker, option.label);
    }
    out
}
