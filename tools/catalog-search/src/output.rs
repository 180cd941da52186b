//! Output formatting for the CLI.

use console::style;
use turbo_search::search::{Pagination, RankedResult};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!(r#"{{"error": "{}"}}"#, msg.replace('"', "\\\""));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, &width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print a listing as a table.
    pub fn products(&self, products: &[RankedResult]) {
        if self.json {
            return;
        }
        if products.is_empty() {
            println!("  {}", style("No products found").dim());
            return;
        }

        let widths = [10, 36, 24, 12];
        self.table_row(&["ID", "NAME", "PRICE", "SUBTITLE"], &widths);
        for product in products {
            let price = match (product.min_price, product.max_price) {
                (Some(min), Some(max)) if min != max => format!("{} - {}", min, max),
                (Some(min), _) => min.to_string(),
                (None, Some(max)) => max.to_string(),
                (None, None) => "-".to_string(),
            };
            self.table_row(
                &[
                    product.id.as_str(),
                    &product.name,
                    &price,
                    product.subtitle.as_deref().unwrap_or(""),
                ],
                &widths,
            );
        }
    }

    /// Print the page position summary.
    pub fn pagination(&self, pagination: &Pagination) {
        if self.json {
            return;
        }
        println!(
            "\n  {} {}-{} of {} (page {}/{})",
            style("Showing").dim(),
            pagination.start_item(),
            pagination.end_item(),
            pagination.total,
            pagination.page,
            pagination.total_pages
        );
    }
}
