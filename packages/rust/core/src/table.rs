//! CSV input parsing and processed-output writing.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use leadenrich_shared::{EnrichError, Result, Source};

use crate::merge::EnrichedCompanyRecord;

/// Header of the company-name column after normalization.
pub const COMPANY_COLUMN: &str = "Company";

/// Trim a header and put it in title case. `Company Name` is an accepted
/// alias of [`COMPANY_COLUMN`].
pub fn normalize_header(raw: &str) -> String {
    let titled = title_case(raw.trim());
    if titled == "Company Name" {
        COMPANY_COLUMN.to_string()
    } else {
        titled
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Read the company names from a CSV file.
pub fn read_companies(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| EnrichError::io(path, e))?;
    parse_companies(file)
}

/// Parse company names from CSV data.
///
/// Fails when the data has no rows or no company column. Rows whose company
/// cell is blank are skipped, so the result may still be empty.
pub fn parse_companies<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let rows = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;

    if headers.iter().all(|h| h.trim().is_empty()) || rows.is_empty() {
        return Err(EnrichError::validation("The uploaded file is empty"));
    }

    let Some(column) = headers
        .iter()
        .position(|h| normalize_header(h) == COMPANY_COLUMN)
    else {
        return Err(EnrichError::validation(format!(
            "Missing required columns: {COMPANY_COLUMN}"
        )));
    };

    let companies: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get(column))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    debug!(
        rows = rows.len(),
        companies = companies.len(),
        "parsed company column"
    );
    Ok(companies)
}

/// One output CSV row. Error annotations are flattened into one column.
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    company: &'a str,
    website: Option<&'a str>,
    estimated_revenue: Option<&'a str>,
    matched_variant: Option<&'a str>,
    revenue_url: Option<&'a str>,
    revenue_source: Option<Source>,
    domain: Option<&'a str>,
    name: Option<&'a str>,
    website_url: Option<&'a str>,
    linkedin_url: Option<&'a str>,
    founded_year: Option<i64>,
    annual_revenue_printed: Option<&'a str>,
    employees_count: Option<i64>,
    industry: Option<&'a str>,
    location: Option<&'a str>,
    error: Option<String>,
}

impl<'a> From<&'a EnrichedCompanyRecord> for OutputRow<'a> {
    fn from(r: &'a EnrichedCompanyRecord) -> Self {
        Self {
            company: &r.company,
            website: r.website.as_deref(),
            estimated_revenue: r.estimated_revenue.as_deref(),
            matched_variant: r.matched_variant.as_deref(),
            revenue_url: r.revenue_url.as_deref(),
            revenue_source: r.revenue_source,
            domain: r.domain.as_deref(),
            name: r.name.as_deref(),
            website_url: r.website_url.as_deref(),
            linkedin_url: r.linkedin_url.as_deref(),
            founded_year: r.founded_year,
            annual_revenue_printed: r.annual_revenue_printed.as_deref(),
            employees_count: r.employees_count,
            industry: r.industry.as_deref(),
            location: r.location.as_deref(),
            error: r.error_summary(),
        }
    }
}

/// Write records as CSV, header first, in the given order.
pub fn write_records<W: Write>(writer: W, records: &[EnrichedCompanyRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(OutputRow::from(record))?;
    }
    wtr.flush()
        .map_err(|e| EnrichError::Csv(format!("failed to flush output: {e}")))?;
    Ok(())
}

/// Write records to a CSV file, replacing any existing file.
pub fn write_records_to_path(path: &Path, records: &[EnrichedCompanyRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| EnrichError::io(path, e))?;
    write_records(file, records)
}
