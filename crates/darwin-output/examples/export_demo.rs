//! Demonstration of exporting and summarizing a small panel.

use chrono::NaiveDate;
use darwin_output::{ExportFormat, PanelSummary, write_panel};
use polars::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Darwin Export Demo ===\n");

    let dates: Vec<NaiveDate> = ["2009-12-31", "2010-12-31", "2010-12-31"]
        .iter()
        .map(|d| d.parse())
        .collect::<Result<_, _>>()?;

    let mut panel = DataFrame::new(vec![
        Series::new("gvkey".into(), ["001234", "001234", "005678"]).into(),
        DateChunked::from_naive_date("datadate".into(), dates)
            .into_series()
            .into(),
        Series::new("fyear".into(), [2009i32, 2010, 2010]).into(),
        Series::new("sector".into(), ["Retail", "Retail", "Health"]).into(),
        Series::new("dflt_flag".into(), [0i32, 1, 0]).into(),
    ])?;

    let summary = PanelSummary::from_panel(&panel)?;
    println!("{}", summary.to_ascii_table());

    println!("JSON Format:");
    println!("{}\n", summary.to_json()?);

    let path = std::env::temp_dir().join("darwin_demo_panel.csv");
    write_panel(&mut panel, &path, ExportFormat::Csv)?;
    println!("Panel written to {}", path.display());

    std::fs::remove_file(path).ok();
    Ok(())
}
