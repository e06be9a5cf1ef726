use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use icd_validate::ValidationReport;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn print_validation_summary(report: &ValidationReport) {
    for issue in &report.issues {
        println!("{}: {}", issue.location, issue.message);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Accepted rows"),
        header_cell("Rejected rows"),
        header_cell("Checks passed"),
        header_cell("Checks failed"),
    ]);
    apply_table_style(&mut table);
    for column in 0..4 {
        if let Some(column) = table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table.add_row(vec![
        Cell::new(report.stats.accepted_rows),
        count_cell(report.stats.rejected_rows, Color::Red),
        Cell::new(report.stats.passed_checks_at_end),
        count_cell(report.stats.failed_checks_at_end, Color::Red),
    ]);
    println!("{table}");

    if report.is_valid() {
        println!("OK");
    } else {
        println!("FAILED: {} issue(s)", report.issues.len());
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        Cell::new(count)
    }
}
