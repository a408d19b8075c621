use super::record::{Field, Record};

/// Renders records as an aligned plain-text table.
pub fn render_table(records: &[Record]) -> String {
    let headers: Vec<&str> = Field::all().iter().map(|f| f.display_label()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for record in records {
        for (i, cell) in record.fields().iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    output.push_str(&format_row(&headers, &widths));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    output.push('\n');

    for record in records {
        output.push_str(&format_row(&record.fields(), &widths));
        output.push('\n');
    }

    output
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
