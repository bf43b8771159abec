//! Config loading from files on disk.
//!
//! Run:
//!   cargo test -p plateroi-engine --features config --test config_files

use std::io::Write;

use plateroi_core::{Address, ColorIndex, LabwareLayout, SectionProvenance, Slot};
use plateroi_engine::{ConfigError, LabwareSession, NamingContext, RegionsConfig};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn toml_file_drives_labels_and_queue() {
    let file = write_temp(
        ".toml",
        r#"
        [naming]
        template = "{work_number}/{index}"
        index_width = 2

        [notifications]
        capacity = 1
        dedupe_consecutive = false
        "#,
    );
    let config = RegionsConfig::from_toml_file(file.path()).unwrap();
    let labeler = config.to_labeler().unwrap();

    let slots = ["A1", "A2"].iter().enumerate().map(|(i, l)| {
        Slot::occupied(
            l.parse::<Address>().unwrap(),
            SectionProvenance::new("B", i as u64, None),
        )
    });
    let layout = LabwareLayout::new("LW", 1, 2, slots).unwrap();
    let mut session = LabwareSession::with_labeler(NamingContext::new("run", "SGP9"), labeler);
    session.add_labware(&layout).unwrap();
    let names: Vec<String> = session
        .summaries("LW")
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["SGP9/01", "SGP9/02"]);

    let mut queue = config.to_notification_queue();
    session.arm_color("LW", ColorIndex(0)).unwrap();
    assert!(session.merge("LW", &mut queue).is_err());
    assert!(session.split("LW", &mut queue).is_err());
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.dropped(), 1);
}

#[test]
fn json_file_loads() {
    let file = write_temp(".json", r#"{"naming":{"template":"{first}"}}"#);
    let config = RegionsConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.naming.template, "{first}");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RegionsConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = RegionsConfig::from_toml_str("[naming\ntemplate = 1").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("TOML parse error"));
}
