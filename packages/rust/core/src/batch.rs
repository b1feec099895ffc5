//! Batch enrichment: CSV in, enriched CSV out.
//!
//! Companies are enriched concurrently up to `concurrency`, but records are
//! collected and written in input order.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use leadenrich_shared::{EnrichError, Result};

use crate::merge::EnrichedCompanyRecord;
use crate::pipeline::{Enricher, ProgressReporter};
use crate::table;

/// Inputs for [`run_batch`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// CSV file with a company column.
    pub input: PathBuf,
    /// Directory the processed CSV is written to; created if missing.
    pub output_dir: PathBuf,
    /// Companies enriched at the same time.
    pub concurrency: usize,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    /// Records carrying at least one error annotation.
    pub with_errors: usize,
    pub output_path: PathBuf,
    pub records: Vec<EnrichedCompanyRecord>,
}

/// `processed_<stem>.csv` inside `output_dir`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "companies".to_string());
    output_dir.join(format!("processed_{stem}.csv"))
}

/// Enrich `companies`, at most `concurrency` at a time, returning records in
/// input order.
pub async fn enrich_all(
    enricher: Arc<Enricher>,
    companies: Vec<String>,
    concurrency: usize,
    progress: &dyn ProgressReporter,
) -> Vec<EnrichedCompanyRecord> {
    let total = companies.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let mut handles = Vec::with_capacity(total);
    for company in companies {
        let enricher = Arc::clone(&enricher);
        let sem = semaphore.clone();
        let name = company.clone();

        let handle = tokio::spawn(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");
            enricher.enrich_company(&name).await
        });
        handles.push((company, handle));
    }

    let mut records = Vec::with_capacity(total);
    for (i, (company, handle)) in handles.into_iter().enumerate() {
        let record = match handle.await {
            Ok(record) => record,
            Err(e) => {
                warn!(%company, error = %e, "enrichment task failed");
                EnrichedCompanyRecord {
                    company,
                    ..EnrichedCompanyRecord::default()
                }
            }
        };
        progress.company_done(&record, i + 1, total);
        records.push(record);
    }
    records
}

/// Read companies from the input CSV, enrich them, and write the processed
/// CSV.
#[instrument(skip_all, fields(input = %options.input.display()))]
pub async fn run_batch(
    enricher: Arc<Enricher>,
    options: &BatchOptions,
    progress: &dyn ProgressReporter,
) -> Result<BatchSummary> {
    let start = Instant::now();
    let run_id = Uuid::now_v7();
    let started_at = Utc::now();

    progress.phase("Reading companies");
    let companies = table::read_companies(&options.input)?;
    if companies.is_empty() {
        return Err(EnrichError::validation("No valid data could be processed"));
    }

    info!(%run_id, companies = companies.len(), concurrency = options.concurrency, "starting batch");

    progress.phase("Enriching companies");
    let records = enrich_all(enricher, companies, options.concurrency, progress).await;

    progress.phase("Writing output");
    std::fs::create_dir_all(&options.output_dir)
        .map_err(|e| EnrichError::io(&options.output_dir, e))?;
    let output_path = output_path_for(&options.input, &options.output_dir);
    table::write_records_to_path(&output_path, &records)?;

    let summary = BatchSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        total: records.len(),
        with_errors: records.iter().filter(|r| !r.errors.is_empty()).count(),
        output_path,
        records,
    };

    info!(
        %run_id,
        total = summary.total,
        with_errors = summary.with_errors,
        output = %summary.output_path.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch complete"
    );
    progress.done(&summary);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::pipeline::SilentProgress;
    use crate::test_support::{config_for, load_fixture};
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records the company order progress is reported in.
    #[derive(Default)]
    struct RecordingProgress {
        seen: Mutex<Vec<(String, usize, usize)>>,
        finished: Mutex<bool>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, _name: &str) {}

        fn company_done(&self, record: &EnrichedCompanyRecord, current: usize, total: usize) {
            self.seen
                .lock()
                .unwrap()
                .push((record.company.clone(), current, total));
        }

        fn done(&self, _summary: &BatchSummary) {
            *self.finished.lock().unwrap() = true;
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("leadenrich-batch-{}", Uuid::now_v7()))
    }

    /// Search finds nothing, revenue pages are missing.
    async fn mount_empty_sources(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/(google|brave)/search$"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body></body></html>"),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/company/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(server)
            .await;
    }

    #[test]
    fn output_name_uses_input_stem() {
        assert_eq!(
            output_path_for(Path::new("/data/leads.csv"), Path::new("out")),
            PathBuf::from("out/processed_leads.csv")
        );
    }

    #[tokio::test]
    async fn records_come_back_in_input_order() {
        let server = MockServer::start().await;
        mount_empty_sources(&server).await;

        let enricher = Arc::new(Enricher::from_config(&config_for(&server), None).unwrap());
        let companies: Vec<String> = ["Initech", "Hooli", "Vandelay Industries", "Umbrella"]
            .into_iter()
            .map(String::from)
            .collect();
        let progress = RecordingProgress::default();

        let records = enrich_all(enricher, companies.clone(), 3, &progress).await;

        let names: Vec<&str> = records.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, companies);
        let seen = progress.seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], ("Initech".to_string(), 1, 4));
        assert_eq!(seen[3], ("Umbrella".to_string(), 4, 4));
    }

    #[tokio::test]
    async fn batch_writes_processed_csv() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(load_fixture("html/google-results.html")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/brave/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(load_fixture("html/brave-results.html")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/company/Acme(%20| )Rockets$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(load_fixture("html/growjo-company.html")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/company/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let enricher = Arc::new(Enricher::from_config(&config_for(&server), None).unwrap());
        let out = scratch_dir();
        let options = BatchOptions {
            input: PathBuf::from("../../../fixtures/csv/companies.csv"),
            output_dir: out.clone(),
            concurrency: 2,
        };
        let progress = RecordingProgress::default();

        let summary = run_batch(enricher, &options, &progress).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.output_path, out.join("processed_companies.csv"));
        assert!(*progress.finished.lock().unwrap());

        let acme = &summary.records[0];
        assert_eq!(acme.company, "Acme Rockets");
        assert_eq!(acme.website.as_deref(), Some("https://www.acmerockets.com"));
        assert_eq!(acme.estimated_revenue.as_deref(), Some("$48.2M"));

        let globex = &summary.records[1];
        assert_eq!(globex.website.as_deref(), Some("https://globex.example.com"));
        assert_eq!(globex.estimated_revenue.as_deref(), Some("<$5M"));

        let mut rdr = csv::Reader::from_path(&summary.output_path).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Acme Rockets");
        assert_eq!(&rows[1][0], "Globex Corporation");
        // No API key: every company with a website carries an annotation.
        assert_eq!(summary.with_errors, 2);

        std::fs::remove_dir_all(&out).ok();
    }

    #[tokio::test]
    async fn batch_without_companies_is_rejected() {
        let server = MockServer::start().await;
        let dir = scratch_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("blank.csv");
        std::fs::write(&input, "Company,Email\n ,a@example.com\n").unwrap();

        let enricher = Arc::new(Enricher::from_config(&config_for(&server), None).unwrap());
        let options = BatchOptions {
            input,
            output_dir: dir.join("out"),
            concurrency: 1,
        };

        let err = run_batch(enricher, &options, &SilentProgress)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No valid data could be processed"));
        assert!(!dir.join("out").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
