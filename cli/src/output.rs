use std::io::Write;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Print a serializable value as pretty JSON.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("JSON encoding failed: {e}"))?;
    println!("{text}");
    Ok(())
}

/// Comment text can be long; let the table wrap it to the terminal.
pub fn print_table(columns: &[&str], rows: &[Vec<String>]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_csv(columns: &[&str], rows: &[Vec<String>]) -> Result<(), String> {
    let mut out = std::io::stdout().lock();
    let header: Vec<String> = columns.iter().map(|c| csv_cell(c)).collect();
    writeln!(out, "{}", header.join(",")).map_err(|e| e.to_string())?;
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| csv_cell(c)).collect();
        writeln!(out, "{}", cells.join(",")).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Quote a cell when it would break the row.
fn csv_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
