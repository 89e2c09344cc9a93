//! Log command - summarize a provenance table.

use std::path::PathBuf;

use codebook::{ProvenanceTable, TransformType};
use codebook::provenance::WRITE_LOG_COMMAND;
use colored::Colorize;
use indexmap::IndexMap;

pub fn run(
    file: PathBuf,
    column: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = ProvenanceTable::load(&file)?;
    let records: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| column.as_deref().is_none_or(|c| r.column == c))
        .filter(|r| r.command != WRITE_LOG_COMMAND)
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let mut by_column: IndexMap<&str, Vec<_>> = IndexMap::new();
    for record in &records {
        by_column.entry(record.column.as_str()).or_default().push(*record);
    }

    println!(
        "{} {} ({} records, {} columns)",
        "Provenance for".cyan().bold(),
        file.display().to_string().white(),
        records.len(),
        by_column.len()
    );

    for (name, records) in &by_column {
        let changes = records.iter().filter(|r| r.transform_type.is_mutation()).count();
        println!();
        println!(
            "{} {}",
            name.white().bold(),
            format!("({} changes)", changes).dimmed()
        );
        for record in records {
            let kind = match record.transform_type {
                TransformType::Error => record.transform_type.label().red(),
                TransformType::Pass => record.transform_type.label().green(),
                TransformType::Drop => record.transform_type.label().yellow(),
                _ => record.transform_type.label().normal(),
            };
            println!(
                "  {} {:<28} {} {}",
                record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                record.command,
                kind,
                record.transformation
            );
        }
    }

    Ok(())
}
