//! Validate command - check a map against its data dictionary.

use std::path::PathBuf;

use codebook::{DataDictionary, Parser, Session};
use colored::Colorize;

pub fn run(
    map_path: PathBuf,
    dictionary_path: PathBuf,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (map, source) = Parser::new().parse_file(&map_path)?;
    let dictionary = DataDictionary::load(&dictionary_path)?;
    let mut session = Session::from_dictionary(&dictionary)?;

    let outcomes = session.validate(&map);
    let failed = outcomes.iter().filter(|o| !o.passed()).count();

    if json_output {
        let columns: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|o| {
                serde_json::json!({
                    "column": o.column,
                    "type": o.kind,
                    "passed": o.passed(),
                    "error": o.result.as_ref().err().map(|e| e.to_string()),
                })
            })
            .collect();
        let report = serde_json::json!({
            "file": source.file,
            "hash": source.hash,
            "rows": source.row_count,
            "columns": columns,
            "failed": failed,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} ({} rows, {} columns)",
            "Validating".cyan().bold(),
            source.file.white(),
            source.row_count,
            source.column_count
        );
        println!();

        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => println!(
                    "  {} {} {}",
                    "✓".green(),
                    outcome.column.white().bold(),
                    format!("[{}]", outcome.kind).dimmed()
                ),
                Err(e) => {
                    println!(
                        "  {} {} {}",
                        "✗".red(),
                        outcome.column.white().bold(),
                        format!("[{}]", outcome.kind).dimmed()
                    );
                    println!("      {}", e.to_string().red());
                }
            }
        }

        let unchecked: Vec<&str> = map
            .column_names()
            .into_iter()
            .filter(|name| dictionary.entry(name).is_none())
            .collect();
        if !unchecked.is_empty() {
            println!();
            println!(
                "{} {}",
                "Not in dictionary:".yellow(),
                unchecked.join(", ")
            );
        }

        println!();
        if failed == 0 {
            println!("{} all {} columns passed", "OK".green().bold(), outcomes.len());
        } else {
            println!(
                "{} {} of {} columns failed",
                "FAILED".red().bold(),
                failed,
                outcomes.len()
            );
        }
    }

    if failed > 0 {
        return Err(format!("{} column(s) failed validation", failed).into());
    }
    Ok(())
}
