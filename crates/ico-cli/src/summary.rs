use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ico_cli::types::{RunResult, Stage, TableSummary};

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.manifest {
        println!("Manifest: {}", path.display());
    }
    if result.dry_run {
        println!("Dry run: no files written");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("File"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in &result.tables {
        table.add_row(vec![
            name_cell(summary),
            stage_cell(summary.stage),
            count_cell(summary.rows),
            Cell::new(summary.columns),
            file_cell(summary.path.as_deref()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.total_rows(Stage::Output)).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    if !result.skipped.is_empty() {
        eprintln!("Skipped:");
        for stage in &result.skipped {
            eprintln!("- {stage}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(summary: &TableSummary) -> Cell {
    match summary.stage {
        Stage::Output => Cell::new(&summary.name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Stage::Interim => Cell::new(&summary.name),
    }
}

fn stage_cell(stage: Stage) -> Cell {
    match stage {
        Stage::Output => Cell::new(stage).fg(Color::Green),
        Stage::Interim => dim_cell(stage),
    }
}

fn count_cell(rows: usize) -> Cell {
    if rows == 0 {
        Cell::new(rows).fg(Color::Yellow)
    } else {
        Cell::new(rows)
    }
}

fn file_cell(path: Option<&Path>) -> Cell {
    match path.and_then(Path::file_name) {
        Some(name) => Cell::new(name.to_string_lossy()),
        None => dim_cell("-"),
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
