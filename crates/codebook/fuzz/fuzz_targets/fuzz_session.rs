//! Fuzz target for cleaning arbitrary cells.
//!
//! Every cell of a fixed roster is replaced with fuzzed text, then a
//! dictionary exercising every step is run over it. Steps may fail but must
//! never panic, and the order/extremes invariant must hold afterwards.

#![no_main]

use codebook::{Column, DataDictionary, MetadataMap, Session, Value};
use libfuzzer_sys::fuzz_target;

const DICTIONARY: &str = r#"{"columns": [
  {"type": "categorical", "name": "position", "description": "Position",
   "order": ["Striker", "D-man", "Goalie"], "frequency_cutoff": 1,
   "ambiguous_values": ["?"],
   "steps": ["remove_ambiguous", "remap_null", "drop_infrequent", "label_order", "convert_to_numeric"]},
  {"type": "bool", "name": "team_captain", "description": "Captain",
   "bool_format": ["True", "False"], "ambiguous_value": "TBD",
   "steps": ["remove_ambiguous", "convert_to_word"]},
  {"type": "continuous", "name": "years_on_team", "description": "Seasons",
   "limits": [0, 4], "steps": ["drop_outliers"]}
]}"#;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }
    let text = String::from_utf8_lossy(data);
    let cells: Vec<Value> = text.split('\n').map(Value::from).collect();
    let rows = cells.len();

    let Ok(dictionary) = DataDictionary::from_json(DICTIONARY) else {
        return;
    };
    let Ok(mut session) = Session::from_dictionary(&dictionary) else {
        return;
    };

    let index: Vec<String> = (0..rows).map(|i| format!("player_{}", i)).collect();
    let Ok(mut map) = MetadataMap::new("player", index)
        .with_column("position", cells.clone())
        .and_then(|m| m.with_column("team_captain", cells.clone()))
        .and_then(|m| m.with_column("years_on_team", cells))
    else {
        return;
    };

    let _ = session.validate(&map);
    let _ = session.run(&mut map);
    let _ = session.provenance();

    if let Some(Column::Categorical(position)) = session.column("position") {
        for extreme in position.extremes() {
            assert!(position.order().contains(extreme));
        }
    }
});
