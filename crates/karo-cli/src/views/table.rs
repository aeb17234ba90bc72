use chrono::{DateTime, Local};
use comfy_table::{Cell, Row, Table};
use karo_core::models::{Field, Tag, Task};
use karo_core::tags::{tag_color, TagColor};
use owo_colors::{AnsiColors, OwoColorize, Style};

/// Terminal color for a tag palette entry.
pub fn ansi_color(color: TagColor) -> Option<AnsiColors> {
    match color {
        TagColor::Transparent => None,
        TagColor::Red => Some(AnsiColors::Red),
        TagColor::Yellow => Some(AnsiColors::Yellow),
        TagColor::Green => Some(AnsiColors::Green),
        TagColor::Blue => Some(AnsiColors::Blue),
        TagColor::Indigo => Some(AnsiColors::BrightBlue),
        TagColor::Purple => Some(AnsiColors::Magenta),
        TagColor::Pink => Some(AnsiColors::BrightMagenta),
    }
}

pub fn tag_badge(tag: &Tag) -> String {
    match ansi_color(tag_color(&tag.name)) {
        Some(color) => tag.name.color(color).bold().to_string(),
        None => tag.name.clone(),
    }
}

/// Title line above the table, e.g. `2026, 19 October`.
pub fn format_heading(now: DateTime<Local>) -> String {
    now.format("%Y, %-d %B").to_string()
}

pub fn display_tasks(rows: &[Task]) {
    println!("{}", format_heading(Local::now()).bold());

    if rows.is_empty() {
        println!("No tasks yet. Add one with `karo add`.");
        return;
    }

    let mut table = Table::new();
    let mut header = vec!["#"];
    header.extend(Field::DISPLAY_ORDER.iter().map(|f| f.header()));
    table.set_header(header);

    for (index, task) in rows.iter().enumerate() {
        let mut row = Row::new();
        row.add_cell(Cell::new(index + 1));
        for field in Field::DISPLAY_ORDER {
            let text = match field {
                Field::Tag => task
                    .tags
                    .iter()
                    .map(tag_badge)
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => task.field_text(field),
            };
            row.add_cell(Cell::new(text));
        }
        table.add_row(row);
    }

    println!("{table}");
}

/// Prints the grid's error banner, if any.
pub fn display_error_banner(message: &str) {
    let error_style = Style::new().red().bold();
    eprintln!("{} {}", "Error:".style(error_style), message.red());
}
