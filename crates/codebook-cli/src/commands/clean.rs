//! Clean command - run every column's steps and export the results.

use std::path::{Path, PathBuf};

use codebook::{DataDictionary, Parser, Session};
use colored::Colorize;

pub fn run(
    map_path: PathBuf,
    dictionary_path: PathBuf,
    output: Option<PathBuf>,
    log: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut map, source) = Parser::new().parse_file(&map_path)?;
    let dictionary = DataDictionary::load(&dictionary_path)?;
    let mut session = Session::from_dictionary(&dictionary)?;

    let output_path = output.unwrap_or_else(|| sibling_path(&map_path, "clean.tsv"));
    let log_path = log.unwrap_or_else(|| sibling_path(&map_path, "provenance.tsv"));

    println!(
        "{} {} with {} column contracts",
        "Cleaning".cyan().bold(),
        source.file.white(),
        dictionary.len()
    );

    let outcome = session.run(&mut map);

    // Written even when a step fails
    let provenance = session.provenance();
    provenance.save(&log_path)?;
    println!(
        "  {} {} ({} records)",
        "Provenance:".dimmed(),
        log_path.display(),
        provenance.len()
    );

    outcome?;

    map.save(&output_path)?;
    println!("  {} {}", "Cleaned map:".dimmed(), output_path.display());
    println!();
    println!(
        "{} {} rows, {} columns",
        "Done.".green().bold(),
        map.row_count(),
        map.column_count()
    );

    Ok(())
}

/// `data/hockey.tsv` + `clean.tsv` -> `data/hockey.clean.tsv`.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{}.{}", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebook::ProvenanceTable;
    use std::fs;
    use tempfile::TempDir;

    const ROSTER: &str = "player\tposition\nBitty\tStriker\nRansom\tD-man\n";

    fn write_inputs(dir: &TempDir, steps: &str) -> (PathBuf, PathBuf) {
        let map_path = dir.path().join("hockey.tsv");
        let dictionary_path = dir.path().join("hockey.dictionary.json");
        fs::write(&map_path, ROSTER).unwrap();
        fs::write(
            &dictionary_path,
            format!(
                r#"{{"columns": [{{"type": "categorical", "name": "position",
                    "description": "Position", "order": ["Striker", "D-man", "Goalie"],
                    "steps": {}}}]}}"#,
                steps
            ),
        )
        .unwrap();
        (map_path, dictionary_path)
    }

    #[test]
    fn test_run_writes_clean_map_and_log() {
        let dir = TempDir::new().unwrap();
        let (map_path, dictionary_path) = write_inputs(&dir, r#"["convert_to_numeric"]"#);

        run(map_path, dictionary_path, None, None).unwrap();

        let cleaned = fs::read_to_string(dir.path().join("hockey.clean.tsv")).unwrap();
        assert_eq!(cleaned, "player\tposition\nBitty\t0\nRansom\t1\n");
        let log = ProvenanceTable::load(dir.path().join("hockey.provenance.tsv")).unwrap();
        assert_eq!(
            log.column("command").unwrap(),
            vec!["convert to numeric", "Write Log"]
        );
    }

    #[test]
    fn test_run_writes_log_when_a_step_fails() {
        let dir = TempDir::new().unwrap();
        let (map_path, dictionary_path) = write_inputs(&dir, r#"["drop_outliers"]"#);

        assert!(run(map_path, dictionary_path, None, None).is_err());

        assert!(dir.path().join("hockey.provenance.tsv").exists());
        assert!(!dir.path().join("hockey.clean.tsv").exists());
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("data/hockey.tsv"), "clean.tsv"),
            PathBuf::from("data/hockey.clean.tsv")
        );
        assert_eq!(
            sibling_path(Path::new("hockey.csv"), "provenance.tsv"),
            PathBuf::from("hockey.provenance.tsv")
        );
    }
}
