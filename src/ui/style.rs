use console::style;
use std::fmt::Display;

/// Green — snapshots that are kept
pub fn keep<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Red — snapshots proposed for deletion
pub fn delete<D: Display>(text: D) -> String {
    style(text).red().to_string()
}

/// Green bold — success checkmarks, confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold — section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim — secondary text such as tier labels
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow — warnings
pub fn yellow<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}
