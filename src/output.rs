//! Report rendering and export.
//!
//! Supports a plain-text report, JSON serialization, and appending attribute
//! averages to a CSV file.

use anyhow::Result;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::analyzers::summary::SummaryOutcome;
use crate::analyzers::types::{FeedbackReport, PartitionReport, ReportOutcome};
use csv::WriterBuilder;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &FeedbackReport) {
    debug!("{:#?}", report);
}

/// Serializes the report as pretty-printed JSON.
pub fn to_json(report: &FeedbackReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders the report the way a reader would see it on screen.
pub fn render_text(report: &FeedbackReport) -> String {
    TextReport(report).to_string()
}

/// Screen layout of a report.
struct TextReport<'a>(&'a FeedbackReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let analysis = match &report.outcome {
            ReportOutcome::NoFeedback => {
                return writeln!(f, "No feedback found for {}.", report.query);
            }
            ReportOutcome::Analyzed(a) => a,
        };

        writeln!(f, "Feedback for {}:\n", report.query)?;
        write_partition(f, "Positive", &analysis.positive)?;
        writeln!(f)?;
        write_partition(f, "Negative", &analysis.negative)?;

        if analysis.unclassified_comments > 0 {
            writeln!(
                f,
                "\nNote: {} comment(s) could not be classified and are not shown above.",
                analysis.unclassified_comments
            )?;
        }

        writeln!(f, "\nPerformance Averages for {}:", report.query)?;
        for attr in &analysis.attributes {
            writeln!(f, "{}: {}", attr.name, attr.average)?;
        }
        Ok(())
    }
}

fn write_partition(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    partition: &PartitionReport,
) -> fmt::Result {
    writeln!(f, "{label} Feedback:")?;
    if partition.comments.is_empty() {
        return writeln!(f, "No {} feedback found.", label.to_lowercase());
    }

    for comment in &partition.comments {
        writeln!(f, "{comment}")?;
    }

    writeln!(f, "{label} Feedback Summary:")?;
    match &partition.summary {
        SummaryOutcome::Completed {
            text,
            failed_chunks,
        } => {
            writeln!(f, "{text}")?;
            if *failed_chunks > 0 {
                writeln!(f, "({failed_chunks} comment(s) could not be summarized)")?;
            }
        }
        SummaryOutcome::Failed { message } => writeln!(f, "{message}")?,
        SummaryOutcome::NoContent => {}
    }
    Ok(())
}

/// Appends one row of attribute averages to a CSV file.
///
/// Creates the file with headers if it does not already exist. Reports with
/// no matching feedback are skipped.
pub fn append_averages(path: &str, report: &FeedbackReport) -> Result<()> {
    let Some(analysis) = report.analysis() else {
        debug!(path, "No analysis to export");
        return Ok(());
    };

    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending averages record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    if !file_exists {
        let mut header = vec![
            "subject".to_string(),
            "year".to_string(),
            "generated_at".to_string(),
            "matched_records".to_string(),
        ];
        header.extend(analysis.attributes.iter().map(|a| a.name.clone()));
        writer.write_record(&header)?;
    }

    let mut row = vec![
        report.query.subject_filter().to_string(),
        report
            .query
            .year_filter()
            .map(|y| y.to_string())
            .unwrap_or_default(),
        report.generated_at.to_rfc3339(),
        report.matched_records.to_string(),
    ];
    row.extend(analysis.attributes.iter().map(|a| a.average.to_string()));
    writer.write_record(&row)?;
    writer.flush()?;

    Ok(())
}
