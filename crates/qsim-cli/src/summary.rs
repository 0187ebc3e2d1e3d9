use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use qsim_cli::report::IndicatorRow;
use qsim_filter::{FilterMode, LoadOutcome};

pub fn print_records(outcome: &LoadOutcome) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Instruction"), header_cell("Text")]);
    apply_records_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for (index, record) in outcome.list.iter().enumerate() {
        let text = if record.mode.has_text() {
            Cell::new(record.text_value().replace('\n', "⏎"))
        } else {
            dim_cell("-")
        };
        table.add_row(vec![dim_cell(index + 1), mode_cell(record.mode), text]);
    }
    println!("{table}");

    if outcome.fully_read {
        println!("{} records, fully read", outcome.list.len());
    } else {
        println!(
            "{} records, some lines could not be read (run with -vv for details)",
            outcome.list.len()
        );
    }
}

pub fn print_indicators(rows: &[IndicatorRow]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Selector"), header_cell("Value")]);
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(vec![Cell::new(&row.selector), Cell::new(&row.value)]);
    }
    println!("{table}");
    println!("{} values", rows.len());
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Percentage(70)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
    ]);
}

fn apply_records_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Fixed(26)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn mode_cell(mode: FilterMode) -> Cell {
    let cell = Cell::new(mode.label());
    if mode.is_format_toggle() {
        cell.fg(Color::Yellow)
    } else if mode.has_text() {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
