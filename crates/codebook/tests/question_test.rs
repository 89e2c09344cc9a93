//! Integration tests for the base column contract.

use codebook::provenance::{PROVENANCE_COLUMNS, WRITE_LOG_COMMAND};
use codebook::question::DEFAULT_MISSING;
use codebook::{
    CodebookError, ColumnContract, DataType, MetadataMap, Question, QuestionOptions,
    TransformType, Value,
};

/// The Samwell men's hockey roster used throughout the tests.
fn hockey_map() -> MetadataMap {
    MetadataMap::new("player", ["Bitty", "Ransom", "Holster"])
        .with_column("years_on_team", ["2", "4", "4"])
        .unwrap()
        .with_column("team_captain", ["False", "True", "True"])
        .unwrap()
        .with_column("position", ["Striker", "D-man", "D-man"])
        .unwrap()
}

fn captain() -> Question {
    Question::new(
        "team_captain",
        "Has the player been given a C or AC?",
        DataType::Bool,
    )
    .unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_question_init_defaults() {
    let q = Question::new("player_name", "Samwell Hockey Players", DataType::Str).unwrap();

    assert_eq!(q.name(), "player_name");
    assert_eq!(q.description(), "Samwell Hockey Players");
    assert_eq!(q.dtype(), DataType::Str);
    assert_eq!(q.clean_name(), "Player Name");
    assert!(!q.free_response());
    assert!(!q.mimarks());
    assert_eq!(q.ontology(), None);
    assert!(!q.ebi_required());
    assert!(!q.qiita_required());
    assert!(q.log().is_empty());

    let expected: Vec<&str> = {
        let mut v = DEFAULT_MISSING.to_vec();
        v.sort();
        v
    };
    assert_eq!(q.missing().iter().map(String::as_str).collect::<Vec<_>>(), expected);
}

#[test]
fn test_question_init_with_options() {
    let options = QuestionOptions::new()
        .with_clean_name("Player")
        .with_free_response(true)
        .with_ontology("NCIT")
        .with_qiita_required(true)
        .with_missing("TBD");
    let q = Question::with_options("player_name", "Samwell Hockey Players", DataType::Str, options)
        .unwrap();

    assert_eq!(q.clean_name(), "Player");
    assert!(q.free_response());
    assert_eq!(q.ontology(), Some("NCIT"));
    assert!(q.qiita_required());
    assert_eq!(q.missing().len(), 1);
    assert!(q.is_missing_value(&Value::from("TBD")));
    assert!(!q.is_missing_value(&Value::from("not provided")));
}

#[test]
fn test_missing_accepts_a_list() {
    let mut q = Question::new("player_name", "Samwell Hockey Players", DataType::Str).unwrap();
    q.set_missing(vec!["TBD", "unknown", "TBD"]);
    assert_eq!(q.missing().len(), 2);
}

#[test]
fn test_unknown_dtype_name() {
    let err = "complex".parse::<DataType>().unwrap_err();
    assert!(matches!(err, CodebookError::UnknownDataType(ref s) if s == "complex"));
}

// =============================================================================
// Map checks
// =============================================================================

#[test]
fn test_check_map_present_column() {
    let map = hockey_map();
    let mut q = captain();
    q.check_map(&map).unwrap();
    assert!(q.log().is_empty());
}

#[test]
fn test_check_map_missing_column() {
    let map = hockey_map();
    let mut q = Question::new("player_name", "Samwell Hockey Players", DataType::Str).unwrap();

    match q.check_map(&map).unwrap_err() {
        CodebookError::MissingColumn { column } => assert_eq!(column, "player_name"),
        other => panic!("unexpected error: {other}"),
    }
    let record = q.log().last().unwrap();
    assert_eq!(record.command, "column check");
    assert_eq!(record.transformation, "column does not exist!");
}

// =============================================================================
// Type casting
// =============================================================================

#[test]
fn test_remap_dtype_to_bool() {
    let mut map = hockey_map();
    let mut q = captain();

    q.remap_dtype(&mut map).unwrap();

    assert_eq!(
        map.column("team_captain").unwrap(),
        &[Value::Bool(false), Value::Bool(true), Value::Bool(true)]
    );
    let record = q.log().last().unwrap();
    assert_eq!(record.column, "team_captain");
    assert_eq!(record.command, "Cast data type");
    assert_eq!(record.transform_type, TransformType::Transformation);
    assert_eq!(record.transformation, "to bool");
}

#[test]
fn test_remap_dtype_to_int_and_float() {
    let mut map = hockey_map();
    let mut years = Question::new("years_on_team", "Seasons on the team", DataType::Int).unwrap();
    years.remap_dtype(&mut map).unwrap();
    assert_eq!(
        map.column("years_on_team").unwrap(),
        &[Value::Int(2), Value::Int(4), Value::Int(4)]
    );

    let mut years = Question::new("years_on_team", "Seasons on the team", DataType::Float).unwrap();
    years.remap_dtype(&mut map).unwrap();
    assert_eq!(map.get(0, "years_on_team"), Some(&Value::Float(2.0)));
}

#[test]
fn test_remap_dtype_is_idempotent() {
    let mut map = hockey_map();
    let mut q = captain();

    q.remap_dtype(&mut map).unwrap();
    let once = map.clone();
    q.remap_dtype(&mut map).unwrap();

    assert_eq!(map, once);
    assert_eq!(q.log().len(), 2);
}

#[test]
fn test_remap_dtype_reports_every_failure() {
    let mut map = hockey_map();
    let mut q = Question::new("position", "Position on the ice", DataType::Int).unwrap();

    match q.remap_dtype(&mut map).unwrap_err() {
        CodebookError::Coercion { column, dtype, values } => {
            assert_eq!(column, "position");
            assert_eq!(dtype, "int");
            assert_eq!(values, vec!["Striker".to_string(), "D-man".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(map, hockey_map());
}

#[test]
fn test_trait_object_dispatch() {
    let mut map = hockey_map();
    let mut q = captain();
    let contract: &mut dyn ColumnContract = &mut q;

    contract.remap_dtype(&mut map).unwrap();
    assert_eq!(contract.name(), "team_captain");
    assert_eq!(contract.log().len(), 1);
}

// =============================================================================
// Provenance export
// =============================================================================

#[test]
fn test_write_providence_appends_marker() {
    let mut map = hockey_map();
    let mut q = captain();
    q.remap_dtype(&mut map).unwrap();

    let table = q.write_providence();

    assert_eq!(table.columns(), &PROVENANCE_COLUMNS);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.column("command").unwrap(),
        vec!["Cast data type", WRITE_LOG_COMMAND]
    );
    assert_eq!(
        table.column("transform_type").unwrap(),
        vec!["transformation", "recording"]
    );
    assert_eq!(table.rows()[1].transformation, "");
}

#[test]
fn test_write_providence_leaves_live_log_alone() {
    let mut map = hockey_map();
    let mut q = captain();
    q.remap_dtype(&mut map).unwrap();

    let first = q.write_providence();
    let second = q.write_providence();

    assert_eq!(q.log().len(), 1);
    assert_eq!(first.len(), second.len());
    assert!(first.rows()[0].timestamp <= second.rows()[1].timestamp);
}
