//! Table output for the `forms` commands.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use form_core::{CodecRegistry, public_view};
use form_model::{Field, FieldType, Form, FormStatus, ValueShape};
use form_report::FieldSummary;

/// Listed form with its counts.
pub struct FormRow<'a> {
    pub form: &'a Form,
    pub fields: usize,
    pub responses: usize,
}

pub fn types_table(registry: &CodecRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Answer"),
        header_cell("Input"),
    ]);
    apply_table_style(&mut table);
    for name in registry.type_names() {
        let field_type = FieldType::parse(name).unwrap_or_else(|| FieldType::Other(name.into()));
        let shape = match registry.get(&field_type).map(|codec| codec.shape()) {
            Some(ValueShape::Text) => "text",
            Some(ValueShape::SingleChoice) => "one option",
            Some(ValueShape::MultiChoice) => "several options",
            Some(ValueShape::Unsupported) | None => "-",
        };
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            Cell::new(shape),
            dim_cell(field_type.input_hint()),
        ]);
    }
    table
}

pub fn forms_table(rows: &[FormRow<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Title"),
        header_cell("Status"),
        header_cell("Fields"),
        header_cell("Responses"),
        header_cell("Created"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        table.add_row(vec![
            dim_cell(row.form.id),
            Cell::new(&row.form.title),
            status_cell(row.form.status),
            Cell::new(row.fields),
            count_cell(row.responses),
            dim_cell(row.form.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    table
}

pub fn fields_table(fields: &[Field], locale: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Id"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Options"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for field in fields {
        let options = field
            .options
            .iter()
            .map(|(key, label)| {
                if key == label {
                    key.clone()
                } else {
                    format!("{key}={label}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut label = field.label_text(locale).to_string();
        let help = field.help_text.resolve(locale);
        if !help.is_empty() {
            label.push('\n');
            label.push_str(help);
        }
        table.add_row(vec![
            Cell::new(field.order),
            dim_cell(field.id),
            Cell::new(label),
            Cell::new(&field.field_type),
            if field.required {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                dim_cell("-")
            },
            if options.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(options)
            },
        ]);
    }
    table
}

pub fn answers_table(summaries: &[FieldSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Answered"),
        header_cell("Skipped"),
        header_cell("Choices"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for summary in summaries {
        let choices = summary
            .tallies
            .iter()
            .map(|tally| format!("{}: {}", tally.label, tally.count))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(&summary.label).add_attribute(Attribute::Bold),
            Cell::new(&summary.field_type),
            count_cell(summary.answered),
            dim_cell(summary.skipped),
            if choices.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(choices)
            },
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

fn status_cell(status: FormStatus) -> Cell {
    let color = match status {
        FormStatus::Draft => Color::DarkGrey,
        FormStatus::Active => Color::Green,
        FormStatus::Closed => Color::Red,
    };
    Cell::new(format!("{status} ({})", public_view(status).message())).fg(color)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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
