//! Output formatting for the CLI.

use catalog_core::{product_columns, ColumnSpec, ProductRecord, SessionStatus, ViewState};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// Widest a single column may grow before its cells are cut.
const MAX_COLUMN_WIDTH: usize = 40;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stdout(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
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
            eprintln!("{}", serde_json::json!({ "error": msg }));
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

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", fit(col, *width), width = width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Print the rows of a view as a table, followed by the page summary.
    pub fn view(&self, view: &ViewState) {
        if self.json {
            self.json(view);
            return;
        }

        let props = view.table_props(product_columns());
        if props.rows.is_empty() {
            self.info("No products found");
        } else {
            let widths = column_widths(&props.columns, &props.rows, self.term_width());
            let labels: Vec<&str> = props.columns.iter().map(|c| c.label).collect();
            println!();
            self.table_row(&labels, &widths);
            for row in props.rows.iter() {
                let cells: Vec<_> = props.columns.iter().map(|c| row.display(c.field)).collect();
                let cells: Vec<&str> = cells.iter().map(|c| c.as_ref()).collect();
                self.table_row(&cells, &widths);
            }
        }

        let pagination = props.pagination;
        println!();
        self.kv(
            "Showing",
            &format!(
                "{}-{} of {}",
                pagination.start_item(),
                pagination.end_item(),
                props.total_count
            ),
        );
        self.kv(
            "Page",
            &format!("{} of {}", pagination.page, pagination.total_pages),
        );
        if view.query.is_filtered() {
            self.kv("Search", view.query.term());
        }
        self.kv("Status", &status_badge(view.status));
        if let Some(ref error) = view.error {
            self.warn(&error.to_string());
        }
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Get terminal width.
    pub fn term_width(&self) -> usize {
        self.term.size().1 as usize
    }
}

/// Status badge for session states.
pub fn status_badge(status: SessionStatus) -> String {
    match status {
        SessionStatus::Ready => style(status).green().to_string(),
        SessionStatus::Loading => style(status).yellow().to_string(),
        SessionStatus::Failed => style(status).red().to_string(),
        SessionStatus::Idle => style(status).dim().to_string(),
    }
}

/// Column widths that fit the content, shrunk to share `available` columns.
pub fn column_widths(columns: &[ColumnSpec], rows: &[ProductRecord], available: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            rows.iter()
                .map(|row| row.display(column.field).chars().count())
                .chain(std::iter::once(column.label.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    // Two spaces of indent plus two between columns.
    let budget = available.saturating_sub(2 + 2 * columns.len().saturating_sub(1));
    while widths.iter().sum::<usize>() > budget {
        let Some((widest, width)) = widths.iter().copied().enumerate().max_by_key(|(_, w)| *w) else {
            break;
        };
        if width <= columns[widest].label.chars().count().min(8) {
            break;
        }
        widths[widest] = width - 1;
    }
    widths
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("Milk", 10), "Milk");
        assert_eq!(fit("Chocolate Milk", 6), "Choco…");
        assert_eq!(fit("Milk", 0), "");
    }

    #[test]
    fn test_column_widths_fit_content() {
        let columns = product_columns();
        let mut row = ProductRecord::named("2% Milk");
        row.brand = Some("Neilson".to_string());
        let widths = column_widths(&columns, &[row], 200);

        assert_eq!(widths[0], 7);
        assert_eq!(widths[1], 7);
        assert_eq!(widths[4], "Scrape Date".len());
    }

    #[test]
    fn test_column_widths_shrink_to_terminal() {
        let columns = product_columns();
        let mut row = ProductRecord::named("x".repeat(60));
        row.url = Some(format!("http://shop.test/{}", "y".repeat(60)));
        let widths = column_widths(&columns, &[row], 100);

        assert!(widths.iter().sum::<usize>() <= 100 - 2 - 12);
        assert!(widths[0] < MAX_COLUMN_WIDTH);
    }
}
