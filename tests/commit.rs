//! Commit pipeline: buffering, formatting, fallback and validation policy.

use std::fmt::Write as _;

use tierlog::{Error, Level, Logger, MemorySink, Options, Routing, TagTable, Target};

fn logger_with(out: &MemorySink, err: &MemorySink, dir: &tempfile::TempDir) -> Logger {
    Logger::builder(dir.path().join("commit.log"))
        .without_timestamp()
        .with_stdout_sink(out.clone())
        .with_stderr_sink(err.clone())
        .build()
        .unwrap()
}

#[test]
fn formats_info_message_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = logger_with(&out, &err, &dir);

    log.append("hello");
    log.commit().unwrap();

    assert_eq!(out.lines(), vec!["info|hello"]);
}

#[test]
fn log_data_is_a_data_message() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = logger_with(&out, &err, &dir);

    log.log_data("foo", 10).unwrap();
    log.log_data("bar", 10.75f32).unwrap();
    log.log_data("ratio", 0.5f64).unwrap();
    log.log_data("ok", true).unwrap();
    log.log_data("name", "primary").unwrap();

    assert_eq!(
        out.lines(),
        vec![
            "data|foo=10",
            "data|bar=10.75",
            "data|ratio=0.5",
            "data|ok=true",
            "data|name=primary"
        ]
    );
}

#[test]
fn commit_clears_buffer_and_next_commit_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = logger_with(&out, &err, &dir);

    write!(log, "first").unwrap();
    log.commit().unwrap();
    log.commit_at(Level::Warning).unwrap();

    assert_eq!(out.lines(), vec!["info|first"]);
    assert_eq!(err.lines(), vec!["warn|"]);
}

#[test]
fn buffer_is_cleared_when_commit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = logger_with(&out, &err, &dir);
    log.set_default_targets(vec![Target::from("nowhere")]).unwrap();

    log.append("stale?");
    assert!(log.commit().is_err());
    assert_eq!(log.buffer(), "");

    log.set_default_targets(vec![Target::Stdout]).unwrap();
    log.commit().unwrap();
    assert_eq!(out.lines(), vec!["info|"]);
}

#[test]
fn level_without_tag_is_retried_once_at_info() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = Logger::builder(dir.path().join("commit.log"))
        .without_timestamp()
        .with_tags(TagTable::new(["info", "data", "warn"]))
        .with_stdout_sink(out.clone())
        .with_stderr_sink(err.clone())
        .build()
        .unwrap();

    log.append("late");
    let result = log.commit_at(Level::Error);

    assert!(matches!(result, Err(Error::Format { level: Level::Error })));
    assert!(result.as_ref().is_err_and(Error::is_format));
    assert!(log.validate().is_err_and(|err| err.is_configuration()));
    assert_eq!(out.lines(), vec!["info|late"]);
    assert!(err.lines().is_empty());
    assert_eq!(log.buffer(), "");
}

#[test]
fn fallback_does_not_recurse_when_info_has_no_tag_either() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = Logger::builder(dir.path().join("commit.log"))
        .with_tags(TagTable::new(Vec::<String>::new()))
        .with_stdout_sink(out.clone())
        .with_stderr_sink(err.clone())
        .build()
        .unwrap();

    let result = log.log_message("lost");

    assert!(matches!(result, Err(Error::Format { level: Level::Info })));
    assert!(out.lines().is_empty());
    assert!(err.lines().is_empty());
}

#[test]
fn validate_fails_only_for_unrecognized_targets() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = logger_with(&out, &err, &dir);

    assert!(log.validate().is_ok());

    log.set_error_threshold(Level::Fatal).unwrap();
    log.set_squelch_threshold(Level::Data).unwrap();
    assert!(log.validate().is_ok());

    log.set_squelch_targets(vec![Target::Squelch, Target::from("syslog")])
        .unwrap();
    let result = log.validate();
    assert!(matches!(result, Err(Error::Configuration(ref v)) if v.0.len() == 1));
}

#[test]
fn lenient_commit_proceeds_with_invalid_routing() {
    let dir = tempfile::tempdir().unwrap();
    let (out, err) = (MemorySink::new(), MemorySink::new());
    let mut log = logger_with(&out, &err, &dir);
    log.set_error_targets(vec![Target::from("pager")]).unwrap();

    log.log_message("still delivered").unwrap();

    assert_eq!(out.lines(), vec!["info|still delivered"]);
}

#[test]
fn pedantic_setters_reject_invalid_targets() {
    let dir = tempfile::tempdir().unwrap();
    let out = MemorySink::new();
    let mut log = Logger::builder(dir.path().join("commit.log"))
        .pedantic()
        .without_timestamp()
        .with_stdout_sink(out.clone())
        .build()
        .unwrap();

    let result = log.set_default_targets(vec![Target::Stdout, Target::from("pager")]);

    assert!(result.as_ref().is_err_and(Error::is_configuration));
    assert_eq!(log.routing(), &Routing::default());
    log.log_message("unchanged").unwrap();
    assert_eq!(out.lines(), vec!["info|unchanged"]);
}

#[test]
fn pedantic_build_rejects_invalid_routing() {
    let dir = tempfile::tempdir().unwrap();
    let result = Logger::builder(dir.path().join("commit.log"))
        .with_options(Options {
            pedantic: true,
            ..Options::default()
        })
        .with_routing(Routing {
            error_targets: vec![Target::from("pager")],
            ..Routing::default()
        })
        .build();

    assert!(result.is_err_and(|err| err.is_configuration()));
}

#[test]
fn pedantic_build_rejects_thresholds_without_tags() {
    let dir = tempfile::tempdir().unwrap();
    let result = Logger::builder(dir.path().join("commit.log"))
        .pedantic()
        .with_tags(TagTable::new(["info", "data"]))
        .build();

    assert!(result.is_err_and(|err| err.is_configuration()));
}

#[test]
fn pedantic_build_rejects_tag_tables_of_the_wrong_size() {
    let dir = tempfile::tempdir().unwrap();

    for tags in [
        TagTable::new(["info", "data", "warn"]),
        TagTable::new(["info", "data", "warn", "error", "fatal", "panic", "doom"]),
    ] {
        let result = Logger::builder(dir.path().join("commit.log"))
            .pedantic()
            .with_tags(tags)
            .build();

        assert!(result.is_err_and(|err| err.is_configuration()));
    }
}

#[test]
fn lenient_build_accepts_oversized_tag_table() {
    let dir = tempfile::tempdir().unwrap();
    let out = MemorySink::new();
    let mut log = Logger::builder(dir.path().join("commit.log"))
        .without_timestamp()
        .with_tags(TagTable::new(["i", "d", "w", "e", "f", "x", "y"]))
        .with_stdout_sink(out.clone())
        .build()
        .unwrap();

    assert!(log.validate().is_err());
    log.log_message("tagged").unwrap();
    assert_eq!(out.lines(), vec!["i|tagged"]);
}

#[test]
fn separator_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let out = MemorySink::new();
    let mut log = Logger::builder(dir.path().join("commit.log"))
        .without_timestamp()
        .with_separator(" ")
        .with_stdout_sink(out.clone())
        .build()
        .unwrap();

    log.log_data("k", "v").unwrap();

    assert_eq!(out.lines(), vec!["data k=v"]);
}
