//! Integration tests for the export, coverage and summary workflow.

use chrono::NaiveDate;
use darwin_output::{
    CoverageRecord, ExportFormat, PanelSummary, missing_statements, write_coverage_report,
    write_panel,
};
use polars::prelude::*;

fn finished_panel() -> DataFrame {
    let dates: Vec<NaiveDate> = [
        "2009-12-31",
        "2010-12-31",
        "2009-12-31",
        "2010-12-31",
        "2011-12-31",
    ]
    .iter()
    .map(|d| d.parse().unwrap())
    .collect();

    DataFrame::new(vec![
        Series::new("gvkey".into(), ["G1", "G1", "G2", "G2", "G2"]).into(),
        DateChunked::from_naive_date("datadate".into(), dates)
            .into_series()
            .into(),
        Series::new("fyear".into(), [2009i32, 2010, 2009, 2010, 2011]).into(),
        Series::new("sector".into(), ["Retail", "Retail", "Health", "Health", "Health"]).into(),
        Series::new("dflt_flag".into(), [0i32, 1, 0, 0, 0]).into(),
    ])
    .unwrap()
}

#[test]
fn test_export_then_summarize_roundtrip() {
    let mut panel = finished_panel();
    let path = std::env::temp_dir().join("darwin_integration_panel.csv");

    write_panel(&mut panel, &path, ExportFormat::Csv).unwrap();

    let read = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.clone()))
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(read.height(), panel.height());

    let summary = PanelSummary::from_panel(&panel).unwrap();
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.issuers, 2);
    assert_eq!(summary.defaults, 1);
    assert_eq!(summary.by_year.len(), 3);
    assert_eq!(summary.by_year[1].fiscal_year, 2010);
    assert_eq!(summary.by_year[1].defaults, 1);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_coverage_report_workflow() {
    let events = df!(
        "gvkey" => ["G1", "G2", "G3"],
        "entity_pname" => ["Alpha Corp", "Beta Inc", "Gamma Ltd"],
    )
    .unwrap();
    let statements = df!("gvkey" => ["G1", "G2"]).unwrap();

    let records = missing_statements(&events, &statements).unwrap();
    assert_eq!(
        records,
        vec![CoverageRecord {
            gvkey: "G3".to_string(),
            entity_pname: "Gamma Ltd".to_string(),
        }]
    );

    let path = std::env::temp_dir().join("darwin_integration_coverage.csv");
    write_coverage_report(&records, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("gvkey,entity_pname"));
    assert!(content.contains("G3,Gamma Ltd"));

    std::fs::remove_file(path).ok();
}
