//! Integration tests for the report building blocks.

use std::path::PathBuf;

use qsim_cli::report::{
    FILTER_FAILED, evaluate, indicator_rows, load_filter, load_statistics, resolve_filter,
    run_filter,
};
use qsim_filter::{FastAccessSettings, FilterFormat, FilterList, FilterRecord, FormatOptions};
use qsim_format::NumberLocale;
use tempfile::TempDir;

const STATISTICS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Statistics>
  <Model><ModelName>Hotline</ModelName></Model>
  <ClientsWaitingTimes>
    <ClientsWaitingTime Type="Calls" Mean="12.5">0;1;2;1</ClientsWaitingTime>
  </ClientsWaitingTimes>
</Statistics>
"#;

struct Fixture {
    _dir: TempDir,
    statistics: PathBuf,
    filter: PathBuf,
}

fn fixture(filter: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let statistics = dir.path().join("statistics.xml");
    let filter_path = dir.path().join("report.filter");
    std::fs::write(&statistics, STATISTICS).unwrap();
    std::fs::write(&filter_path, filter).unwrap();
    Fixture {
        _dir: dir,
        statistics,
        filter: filter_path,
    }
}

fn waiting_time_filter() -> String {
    [
        FilterRecord::text("E[W]="),
        FilterRecord::xml(r#"ClientsWaitingTimes->ClientsWaitingTime[Type="Calls"]->[Mean]"#),
    ]
    .into_iter()
    .collect::<FilterList>()
    .save()
}

#[test]
fn filter_file_produces_report() {
    let fixture = fixture(&waiting_time_filter());
    let stats = load_statistics(&fixture.statistics).unwrap();
    let outcome = load_filter(&fixture.filter).unwrap();
    let options = FormatOptions {
        locale: NumberLocale::german(),
        ..FormatOptions::default()
    };
    assert_eq!(run_filter(&outcome, &stats, &options).unwrap(), "E[W]=12,5");
}

#[test]
fn partially_read_or_empty_filters_fail() {
    let fixture = fixture("Text\nnot base64!\n");
    let stats = load_statistics(&fixture.statistics).unwrap();
    let outcome = load_filter(&fixture.filter).unwrap();
    let err = run_filter(&outcome, &stats, &FormatOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), FILTER_FAILED);

    let empty = FilterList::load("FormatPercent\n");
    assert!(empty.fully_read);
    let err = run_filter(&empty, &stats, &FormatOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), FILTER_FAILED);
}

#[test]
fn remembered_list_is_used_without_a_file() {
    let mut settings = FastAccessSettings::default();
    assert!(resolve_filter(None, &settings).is_err());

    settings.filter_list = waiting_time_filter();
    let outcome = resolve_filter(None, &settings).unwrap();
    assert!(outcome.fully_read);
    assert_eq!(outcome.list.len(), 2);
}

#[test]
fn missing_statistics_file_reports_path() {
    let err = load_statistics(&PathBuf::from("does-not-exist.xml")).unwrap_err();
    assert!(format!("{err:#}").contains("does-not-exist.xml"));
}

#[test]
fn indicators_can_be_filtered() {
    let fixture = fixture("");
    let stats = load_statistics(&fixture.statistics).unwrap();
    let rows = indicator_rows(&stats, Some("MEAN"));
    insta::assert_json_snapshot!(rows, @r#"
    [
      {
        "selector": "ClientsWaitingTimes->ClientsWaitingTime->[Mean]",
        "value": "12.5"
      }
    ]
    "#);
    assert_eq!(indicator_rows(&stats, None).len(), 4);
}

#[test]
fn expressions_are_formatted() {
    let fixture = fixture("");
    let stats = load_statistics(&fixture.statistics).unwrap();
    let options = FormatOptions::default();
    let mut format = FilterFormat::default();
    let mean = r#"xml("ClientsWaitingTimes->ClientsWaitingTime->[Mean]")"#;

    let expression = format!("{mean}*60");

    assert_eq!(evaluate(&expression, Some(&stats), &format, &options).unwrap(), "750");
    format.set_time();
    assert_eq!(evaluate(&expression, Some(&stats), &format, &options).unwrap(), "00:12:30");
    assert!(evaluate(&expression, None, &format, &options).is_err());
    assert_eq!(evaluate("90*2", None, &format, &options).unwrap(), "00:03:00");

    let err = evaluate("1+", None, &format, &options).unwrap_err();
    assert!(format!("{err:#}").contains("position 3"));
}
