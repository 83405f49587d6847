//! Table builder wrapper around comfy-table for consistent list display.

use colored::Colorize;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
/// Respects NO_COLOR env var via comfy-table's built-in support.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Right-aligned cell for scores and counts.
pub fn numeric_cell(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Render the table to string with a count header.
pub fn render_list(entity_name: &str, table: Table, total: usize) -> String {
    if total == 0 {
        return format!("No {entity_name}s found.");
    }
    let count_line = format!(
        "{} {}:",
        total.to_string().bold(),
        if total == 1 {
            entity_name.to_string()
        } else {
            format!("{entity_name}s")
        }
    );
    format!("{count_line}\n{table}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_list_handles_empty_and_plural() {
        let table = list_table(&["name"]);
        assert_eq!(render_list("task", table, 0), "No tasks found.");

        let mut table = list_table(&["name"]);
        table.add_row(vec!["tidy"]);
        let rendered = render_list("task", table, 1);
        assert!(rendered.contains("1 task:"));
    }
}
