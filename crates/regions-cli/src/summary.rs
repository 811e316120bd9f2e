use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use regions_resolve::MatchKind;

use crate::commands::{BootstrapReport, ColumnReport, FormatOutcome, Identification, ImportOutcome};

pub fn print_bootstrap(report: &BootstrapReport) {
    println!("Store: {}", report.store.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Namespace"),
        header_cell("Rows"),
        header_cell("Regions"),
        header_cell("Codes"),
        header_cell("Aliases"),
        header_cell("Skipped"),
    ]);
    apply_table_style(&mut table);
    for column in 1..6 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for summary in &report.imports {
        table.add_row(vec![
            Cell::new(&summary.namespace),
            Cell::new(summary.rows),
            count_cell(summary.regions_added, Color::Green),
            count_cell(summary.codes_added, Color::Green),
            count_cell(summary.aliases_added, Color::Green),
            count_cell(summary.skipped, Color::Yellow),
        ]);
    }
    if !report.imports.is_empty() {
        println!("{table}");
    }
    if let Some(scales) = report.scales {
        println!("Scales: {scales}");
    }
    println!("Regions: {}  Codes: {}", report.regions, report.codes);
}

pub fn print_identifications(results: &[Identification]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Region"),
        header_cell("Code"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    for result in results {
        match &result.resolution {
            Some(resolution) => table.add_row(vec![
                Cell::new(&result.input),
                Cell::new(&resolution.region_name),
                Cell::new(&resolution.region_code).add_attribute(Attribute::Bold),
                Cell::new(match_label(resolution.kind)),
            ]),
            None => table.add_row(vec![
                Cell::new(&result.input),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new("unresolved").fg(Color::Red),
            ]),
        };
    }
    println!("{table}");

    for result in results.iter().filter(|r| !r.candidates.is_empty()) {
        println!("Closest aliases for '{}':", result.input);
        for candidate in &result.candidates {
            println!("  {:>6.2}  {}", candidate.score, candidate.alias);
        }
    }
}

/// JSON lines of `{input, regionName, regionCode}`; unresolved inputs carry nulls.
pub fn identifications_json(results: &[Identification]) -> serde_json::Value {
    results
        .iter()
        .map(|result| {
            serde_json::json!({
                "input": result.input,
                "regionName": result.resolution.as_ref().map(|r| r.region_name.as_str()),
                "regionCode": result.resolution.as_ref().map(|r| r.region_code.as_str()),
            })
        })
        .collect()
}

pub fn print_columns(report: &ColumnReport) {
    println!("Table: {}", report.table.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Role"), header_cell("Source")]);
    apply_table_style(&mut table);
    for role in &report.roles {
        let source = match &role.source {
            Some(source) => Cell::new(source),
            None if report.missing.contains(&role.role) => {
                Cell::new("missing").fg(Color::Red).add_attribute(Attribute::Bold)
            }
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(role.role), source]);
    }
    println!("{table}");
    println!("Region type: {}", report.region_type);
    if report.time_columns.is_empty() {
        println!("Time columns: none");
    } else {
        let first = report.time_columns.first().map_or("", String::as_str);
        let last = report.time_columns.last().map_or("", String::as_str);
        println!(
            "Time columns: {} ({first} .. {last})",
            report.time_columns.len()
        );
    }
}

/// Import totals go to stderr so stdout can carry the dataset.
pub fn print_import(outcome: &ImportOutcome) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Region"),
        header_cell("Code"),
        header_cell("Type"),
        header_cell("Series"),
        header_cell("Values"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for region in &outcome.dataset.regions {
        let values: usize = region.series.iter().map(|s| s.values.len()).sum();
        table.add_row(vec![
            Cell::new(&region.region_name),
            Cell::new(&region.region_code),
            Cell::new(&region.region_type),
            count_cell(region.series.len(), Color::Green),
            Cell::new(values),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(outcome.dataset.series_count()).add_attribute(Attribute::Bold),
        Cell::new(outcome.dataset.value_count()).add_attribute(Attribute::Bold),
    ]);
    eprintln!("Table: {}", outcome.table.display());
    eprintln!("{table}");
    if let Some(path) = &outcome.output {
        eprintln!("Output: {}", path.display());
    }
    if let Some(registered) = &outcome.registered {
        eprintln!(
            "Registered in '{}': {} regions, {} codes ({} already known)",
            registered.namespace, registered.regions_added, registered.codes_added, registered.known
        );
    }
}

pub fn print_format(outcome: &FormatOutcome) {
    println!("Table: {}", outcome.table.display());
    println!("Output: {}", outcome.output.display());
    println!("Resolved rows: {}", outcome.resolved);
    if !outcome.unresolved.is_empty() {
        println!("Unresolved values: {}", outcome.unresolved.join(", "));
    }
}

pub fn match_label(kind: MatchKind) -> String {
    match kind {
        MatchKind::NamespaceCode => "namespace code".to_string(),
        MatchKind::Code => "code".to_string(),
        MatchKind::Name => "name".to_string(),
        MatchKind::Fuzzy { score } => format!("fuzzy ({score:.1})"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
