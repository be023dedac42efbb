use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lexlist_cli::profile::ListProfile;
use lexlist_cli::replay::{ReplayReport, describe_filters, request_query};
use lexlist_model::{Item, ListPhase, ResultPage};

/// Longest highlight fragment shown in a table cell.
const MAX_FRAGMENT: usize = 60;

pub fn print_page(page: &ResultPage) {
    let kind = page.kind.map_or("unknown", |k| k.name());
    println!("Pagination: {kind}");
    println!("Has more: {}", page.has_more);
    println!("Next cursor: {}", page.next_cursor);
    if let Some(total) = page.total {
        println!("Total: {total}");
    }
    if let Some(search) = &page.search {
        if let Some(engine) = &search.engine {
            println!("Engine: {engine}");
        }
        if let Some(score) = search.max_score {
            println!("Max score: {score:.3}");
        }
    }
    print_items(&page.items);
}

pub fn print_report(profile: &ListProfile, report: &ReplayReport) {
    let state = &report.state;
    println!("URL: {}", report.url);
    println!("Filters: {}", describe_filters(&profile.filters, &report.filters));
    println!("Phase: {}", state.phase);
    println!("Loaded: {}", state.summary());
    println!("Cursor: {}", state.cursor);
    if let Some(error) = &state.error {
        println!("Error: {}", error.message);
        if let Some(suggestion) = &error.suggestion {
            println!("  {suggestion}");
        }
    }
    if report.unused_pages > 0 {
        println!("Unused pages: {}", report.unused_pages);
    }

    let mut steps = Table::new();
    steps.set_header(vec![header_cell("Step"), header_cell("Outcome")]);
    apply_table_style(&mut steps);
    for step in &report.steps {
        steps.add_row(vec![Cell::new(&step.action), outcome_cell(&step.outcome)]);
    }
    println!("{steps}");

    let mut requests = Table::new();
    requests.set_header(vec![
        header_cell("Request"),
        header_cell("Kind"),
        header_cell("Query"),
    ]);
    apply_table_style(&mut requests);
    for request in &report.requests {
        requests.add_row(vec![
            dim_cell(request.id),
            Cell::new(format!("{:?}", request.kind)),
            Cell::new(request_query(request)),
        ]);
    }
    println!("{requests}");

    print_items(&state.items);
    if state.phase == ListPhase::ErroredMore {
        println!("Retry count: {}", state.retry_count);
    }
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No items.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Key"),
        header_cell("Title"),
        header_cell("Highlights"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, item) in items.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(item.key.as_str()),
            Cell::new(item.title()),
            highlight_cell(item),
        ]);
    }
    println!("{table}");
}

fn highlight_cell(item: &Item) -> Cell {
    let Some((field, fragments)) = item.highlights.iter().next() else {
        return dim_cell("-");
    };
    let Some(first) = fragments.first() else {
        return dim_cell("-");
    };
    let fragment: String = first.chars().take(MAX_FRAGMENT).collect();
    Cell::new(format!("{field}: {fragment}")).fg(Color::Yellow)
}

fn outcome_cell(outcome: &str) -> Cell {
    if outcome.starts_with("failed") {
        Cell::new(outcome).fg(Color::Red).add_attribute(Attribute::Bold)
    } else if outcome.starts_with("loaded") || outcome.starts_with("appended") {
        Cell::new(outcome).fg(Color::Green)
    } else {
        dim_cell(outcome)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
