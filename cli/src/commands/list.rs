use std::path::{Path, PathBuf};

use serde_json::json;
use thtml2doxy::{Converter, Entity, MemberFlag, SyntaxProvider};

use crate::output::{print_csv, print_json, print_table, OutputFormat};

const COLUMNS: [&str; 5] = ["file", "lines", "kind", "owner", "text"];

/// Print the entities found in every file without touching anything but
/// the generated macro directory.
pub fn run<P: SyntaxProvider>(
    converter: &Converter<P>,
    files: &[PathBuf],
    format: &OutputFormat,
) -> Result<(), String> {
    let mut failed = 0;
    let mut found = Vec::new();

    for file in files {
        tracing::info!(file = %file.display(), "input file");
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(file = %file.display(), "cannot read: {e}");
                failed += 1;
                continue;
            }
        };
        match converter.collect(file, &source) {
            Ok(entities) => found.push((file, entities)),
            Err(e) => {
                tracing::error!(file = %file.display(), "{e}");
                failed += 1;
            }
        }
    }

    if let OutputFormat::Json = format {
        let listing: Vec<_> = found
            .iter()
            .map(|(file, entities)| json!({ "file": file.display().to_string(), "entities": entities }))
            .collect();
        print_json(&listing)?;
    } else {
        let rows: Vec<Vec<String>> = found
            .iter()
            .flat_map(|(file, entities)| entities.iter().map(move |e| entity_row(file, e)))
            .collect();
        if rows.is_empty() {
            println!("No comments found.");
        } else if let OutputFormat::Csv = format {
            print_csv(&COLUMNS, &rows)?;
        } else {
            println!("{} comment(s)", rows.len());
            print_table(&COLUMNS, &rows);
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} file(s) failed", files.len()));
    }
    Ok(())
}

fn entity_row(file: &Path, entity: &Entity) -> Vec<String> {
    let span = entity.span();
    let lines = if span.first_line == span.last_line {
        span.first_line.to_string()
    } else {
        format!("{}-{}", span.first_line, span.last_line)
    };

    let (kind, text) = match entity {
        Entity::Plain(c) => ("comment".to_string(), c.lines.join("\n")),
        Entity::Member(m) => {
            let mut kind = String::from("member");
            if m.flag != MemberFlag::None {
                kind.push_str(&format!(" {}", flag_name(m.flag)));
            }
            if let Some(size) = &m.array_size {
                kind.push_str(&format!(" [{size}]"));
            }
            (kind, m.text.clone())
        }
        Entity::Removal(_) => ("remove".to_string(), String::new()),
    };

    vec![
        file.display().to_string(),
        lines,
        kind,
        entity.owner().to_string(),
        text,
    ]
}

fn flag_name(flag: MemberFlag) -> &'static str {
    match flag {
        MemberFlag::None => "",
        MemberFlag::Transient => "transient",
        MemberFlag::DontSplit => "dontsplit",
        MemberFlag::Ptr => "ptr",
    }
}
