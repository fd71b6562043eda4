use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lit_layout::SelectionSlot;

use crate::commands::{LayoutListing, ModuleListing, RenderReport};

pub fn print_render_report(report: &RenderReport) {
    println!("Layout: {}", report.layout);
    if report.models.is_empty() {
        println!("Models: (none)");
    } else {
        println!("Models: {}", report.models.join(", "));
    }
    if report.compare_examples {
        println!("Compare examples: on");
    }
    if let Some(tab) = &report.selected_tab {
        println!("Selected tab: {tab}");
    }
    println!("{}", render_table(report));
    println!(
        "{} tabs, {} groups, {} instances, {} hidden",
        report.summary.tabs,
        report.summary.groups,
        report.summary.instances,
        report.hidden_modules.len()
    );
    if !report.url_query.is_empty() {
        println!("URL: ?{}", report.url_query);
    }
}

pub fn render_table(report: &RenderReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tab"),
        header_cell("Key"),
        header_cell("Module"),
        header_cell("Model"),
        header_cell("Slot"),
        header_cell("Hidden"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Center);
    for tab in report.render_layout.tabs() {
        for instance in tab.groups.iter().flatten() {
            let hidden = report.is_hidden(&instance.key);
            table.add_row(vec![
                Cell::new(&tab.name)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                key_cell(&instance.key, hidden),
                Cell::new(instance.title()),
                match &instance.model_name {
                    Some(model) => Cell::new(model),
                    None => dim_cell("all"),
                },
                slot_cell(instance.selection_slot),
                if hidden {
                    Cell::new("yes").fg(Color::Yellow)
                } else {
                    dim_cell("-")
                },
            ]);
        }
    }
    table
}

pub fn layouts_table(listings: &[LayoutListing]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Layout"),
        header_cell("Tabs"),
        header_cell("Components"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for listing in listings {
        let name = if listing.is_default {
            Cell::new(format!("{} (default)", listing.name))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&listing.name)
        };
        table.add_row(vec![
            name,
            Cell::new(listing.tabs.join(", ")),
            Cell::new(listing.components),
            match &listing.description {
                Some(description) => Cell::new(description),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn modules_table(listings: &[ModuleListing]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Module"),
        header_cell("Title"),
        header_cell("Per model"),
        header_cell("Per example"),
        header_cell("Collapsed"),
    ]);
    apply_table_style(&mut table);
    for column in 2..5 {
        align_column(&mut table, column, CellAlignment::Center);
    }
    for listing in listings {
        table.add_row(vec![
            Cell::new(&listing.name),
            Cell::new(&listing.title),
            flag_cell(listing.duplicate_for_model_comparison),
            flag_cell(listing.duplicate_for_example_comparison),
            flag_cell(listing.collapse_by_default),
        ]);
    }
    table
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

fn key_cell(key: &str, hidden: bool) -> Cell {
    if hidden {
        dim_cell(key)
    } else {
        Cell::new(key)
    }
}

fn slot_cell(slot: Option<SelectionSlot>) -> Cell {
    match slot {
        Some(SelectionSlot::Primary) => Cell::new("primary"),
        Some(SelectionSlot::Reference) => Cell::new("reference").fg(Color::Magenta),
        None => dim_cell("-"),
    }
}

fn flag_cell(enabled: bool) -> Cell {
    if enabled {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
