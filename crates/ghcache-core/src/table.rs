//! Column output for dry-run listings.

use comfy_table::{ContentArrangement, Table, presets};

use crate::iostreams::IOStreams;

/// Collects rows and renders them for the current stdout.
///
/// A terminal gets aligned columns under upper-cased headers. A pipe gets one
/// tab-separated line per row and no header, so the output stays greppable.
#[derive(Debug)]
pub struct TablePrinter {
    aligned: bool,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TablePrinter {
    /// Printer for the stdout of `ios`.
    pub fn new(ios: &IOStreams) -> Self {
        Self {
            aligned: ios.is_stdout_tty(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Column headers, shown on terminals only.
    #[must_use]
    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|h| h.to_uppercase()).collect();
        self
    }

    /// Append a row.
    pub fn add_row(&mut self, fields: Vec<String>) {
        self.rows.push(fields);
    }

    /// Render every row.
    pub fn render(&self) -> String {
        if !self.aligned {
            return self
                .rows
                .iter()
                .map(|row| row.join("\t"))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.headers.is_empty() {
            table.set_header(&self.headers);
        }
        for row in &self.rows {
            table.add_row(row);
        }
        table.to_string()
    }

    /// Whether no row was added.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
