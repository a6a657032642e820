//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One labelled value in a detail table.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct Field {
    /// Label.
    pub field: String,
    /// Rendered value.
    pub value: String,
}

impl Field {
    /// Build a row from anything displayable.
    pub fn new(field: &str, value: impl std::fmt::Display) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Print a list of rows in the selected format.
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single value: its `Debug` form as a table, otherwise JSON.
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
