use feedback_digest::analyzers::aggregate::AttributeAverage;
use feedback_digest::analyzers::analyzer::Pipeline;
use feedback_digest::analyzers::summary::SummaryOutcome;
use feedback_digest::analyzers::types::ReportOutcome;
use feedback_digest::config::{JoinPolicy, PipelineConfig};
use feedback_digest::output::render_text;
use feedback_digest::query::Query;
use feedback_digest::services::{SentimentClassifier, Summarizer};
use feedback_digest::table::{FeedbackTable, read_table, read_table_from};
use feedback_digest::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Labels comments by their `[pos]` / `[neg]` / `[fail]` prefix.
#[derive(Default)]
struct PrefixClassifier {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl SentimentClassifier for PrefixClassifier {
    async fn classify(&self, text: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.starts_with("[pos]") {
            Ok("POSITIVE".to_string())
        } else if text.starts_with("[neg]") {
            Ok("NEGATIVE".to_string())
        } else if text.starts_with("[fail]") {
            Err(anyhow::anyhow!("503 Service Unavailable"))
        } else {
            Ok("NEUTRAL".to_string())
        }
    }
}

/// Returns the number of input lines so tests can see the join policy.
#[derive(Default)]
struct LineCountSummarizer {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Summarizer for LineCountSummarizer {
    async fn summarize(&self, text: &str, _max_length: u32, _min_length: u32) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{} line(s)", text.lines().count()))
    }
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture_table() -> FeedbackTable {
    load_fixture("feedback_sample.csv")
}

fn load_fixture(name: &str) -> FeedbackTable {
    let raw = read_table(&fixture_path(name)).expect("Failed to read fixture");
    FeedbackTable::from_raw(raw, &PipelineConfig::default().columns).expect("Fixture schema")
}

fn pipeline_with(
    config: PipelineConfig,
) -> (Pipeline, Arc<PrefixClassifier>, Arc<LineCountSummarizer>) {
    let classifier = Arc::new(PrefixClassifier::default());
    let summarizer = Arc::new(LineCountSummarizer::default());
    let pipeline = Pipeline::new(classifier.clone(), summarizer.clone(), config);
    (pipeline, classifier, summarizer)
}

fn average_of(outcome: &ReportOutcome, name: &str) -> AttributeAverage {
    match outcome {
        ReportOutcome::Analyzed(a) => {
            a.attributes
                .iter()
                .find(|s| s.name == name)
                .expect("attribute present")
                .average
        }
        ReportOutcome::NoFeedback => panic!("expected analysis"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_subject_and_year() {
    let table = fixture_table();
    let (pipeline, classifier, summarizer) = pipeline_with(PipelineConfig::default());

    let report = pipeline
        .analyze(&table, &Query::parse("vmadhasi 2024"), true)
        .await
        .unwrap();

    // Rows 1, 2, 3 (self), 4 and 6 (no comment). Row 5 is 2023, row 7 has no date.
    assert_eq!(report.matched_records, 5);
    let analysis = report.analysis().unwrap();
    assert_eq!(analysis.positive.comments.len(), 2);
    assert!(analysis.positive.comments[0].contains("ahead of schedule"));
    assert!(analysis.positive.comments[1].contains("migration"));
    assert_eq!(analysis.negative.comments.len(), 1);
    assert_eq!(analysis.neutral_comments, 1);
    assert_eq!(analysis.unclassified_comments, 0);

    assert_eq!(
        analysis.positive.summary,
        SummaryOutcome::Completed {
            text: "2 line(s)".to_string(),
            failed_chunks: 0
        }
    );

    assert_eq!(
        average_of(&report.outcome, "Drives Results"),
        AttributeAverage::Available {
            mean: 4.0,
            sample_count: 3
        }
    );
    assert_eq!(average_of(&report.outcome, "Customer Focus").to_string(), "4.00");

    assert_eq!(classifier.calls.load(Ordering::SeqCst), 4);
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_exclude_self_feedback() {
    let table = fixture_table();
    let (pipeline, _, _) = pipeline_with(PipelineConfig::default());

    let report = pipeline
        .analyze(&table, &Query::parse("vmadhasi 2024"), false)
        .await
        .unwrap();

    assert_eq!(report.matched_records, 4);
    let analysis = report.analysis().unwrap();
    assert_eq!(analysis.positive.comments.len(), 1);
    assert!(analysis.positive.comments.iter().all(|c| !c.contains("migration")));
}

#[tokio::test]
async fn test_all_years_includes_undated_rows() {
    let table = fixture_table();
    let (pipeline, _, _) = pipeline_with(PipelineConfig::default());

    let report = pipeline
        .analyze(&table, &Query::parse("VMADHASI@mycompany.com"), true)
        .await
        .unwrap();

    assert_eq!(report.matched_records, 7);
    let analysis = report.analysis().unwrap();
    assert_eq!(analysis.negative.comments.len(), 2);
    assert!(analysis.negative.comments[1].contains("scope creep"));
}

#[tokio::test]
async fn test_classifier_failure_degrades() {
    let table = fixture_table();
    let (pipeline, _, _) = pipeline_with(PipelineConfig::default());

    let report = pipeline
        .analyze(&table, &Query::parse("jdoe"), true)
        .await
        .unwrap();

    let analysis = report.analysis().unwrap();
    assert_eq!(analysis.positive.comments, vec!["[pos] Excellent analyst."]);
    assert!(analysis.negative.comments.is_empty());
    assert_eq!(analysis.negative.summary, SummaryOutcome::NoContent);
    assert_eq!(analysis.unclassified_comments, 1);

    let text = render_text(&report);
    assert!(text.contains("No negative feedback found."));
    assert!(text.contains("1 comment(s) could not be classified"));
}

#[tokio::test]
async fn test_per_comment_summaries() {
    let table = fixture_table();
    let config = PipelineConfig {
        summary_join: JoinPolicy::PerComment,
        ..Default::default()
    };
    let (pipeline, _, summarizer) = pipeline_with(config);

    let report = pipeline
        .analyze(&table, &Query::parse("vmadhasi 2024"), true)
        .await
        .unwrap();

    assert_eq!(
        report.analysis().unwrap().positive.summary,
        SummaryOutcome::Completed {
            text: "1 line(s) 1 line(s)".to_string(),
            failed_chunks: 0
        }
    );
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_no_feedback_found() {
    let table = fixture_table();
    let (pipeline, classifier, summarizer) = pipeline_with(PipelineConfig::default());

    let report = pipeline
        .analyze(&table, &Query::parse("nobody 2024"), true)
        .await
        .unwrap();

    assert_eq!(report.outcome, ReportOutcome::NoFeedback);
    assert_eq!(render_text(&report), "No feedback found for nobody (2024).\n");
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_workbook_cells_read_as_text() {
    let raw = read_table(&fixture_path("feedback_sample.xlsx")).expect("Failed to read workbook");
    let csv = read_table(&fixture_path("feedback_sample.csv")).unwrap();

    assert_eq!(raw.headers, csv.headers);
    assert_eq!(raw.rows.len(), 9);

    let ts = raw.headers.iter().position(|h| h == "CREATED_DATE_TIME").unwrap();
    let score = raw.headers.iter().position(|h| h == "Drives Results").unwrap();

    assert_eq!(raw.rows[0].get(score), Some("4"));
    assert!(raw.rows[0].get(ts).unwrap().starts_with("2024-02-14T"));
    assert_eq!(raw.rows[3].get(ts), Some("2024-09-12T00:00:00"));
    assert_eq!(raw.rows[6].get(ts), Some("not recorded"));
    // Blank cells inside the sheet come back empty, not missing.
    assert_eq!(raw.rows[2].get(score), Some(""));
}

#[tokio::test]
async fn test_workbook_matches_csv_report() {
    let table = load_fixture("feedback_sample.xlsx");
    let (pipeline, _, _) = pipeline_with(PipelineConfig::default());

    let report = pipeline
        .analyze(&table, &Query::parse("vmadhasi 2024"), true)
        .await
        .unwrap();

    assert_eq!(report.matched_records, 5);
    let analysis = report.analysis().unwrap();
    assert_eq!(analysis.positive.comments.len(), 2);
    assert_eq!(analysis.negative.comments.len(), 1);
    assert_eq!(
        average_of(&report.outcome, "Drives Results"),
        AttributeAverage::Available {
            mean: 4.0,
            sample_count: 3
        }
    );
}

#[test]
fn test_missing_columns_rejected() {
    let data = "emailid_feedback_for,Overall Feedback Comments,CREATED_DATE_TIME\n\
                a@b.com,hi,2024-01-01\n";
    let raw = read_table_from(data.as_bytes()).unwrap();
    match FeedbackTable::from_raw(raw, &PipelineConfig::default().columns) {
        Err(Error::Schema { missing }) => {
            assert_eq!(missing.len(), 12);
            assert!(missing.contains(&"self_feedback".to_string()));
            assert!(missing.contains(&"Nimble Learning".to_string()));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}
