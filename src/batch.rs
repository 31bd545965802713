//! CSV batch import
//!
//! Reads prediction items from a CSV file so a whole list of IPOs can be sent
//! to `/predict` in one request. Columns are matched by header name,
//! case-insensitively: `ticker`, `issue_price`, `listing_date`, `exchange`,
//! `sector`. `exchange` and `sector` may be missing.

use crate::client::PredictItem;
use crate::views::parse_issue_price;
use std::path::Path;

/// Result of reading a batch file
#[derive(Debug, Default)]
pub struct BatchImport {
    pub items: Vec<PredictItem>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Errors that abort a batch import
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

#[derive(Debug)]
struct Columns {
    ticker: usize,
    issue_price: usize,
    listing_date: usize,
    exchange: Option<usize>,
    sector: Option<usize>,
}

impl Columns {
    fn detect(headers: &csv::StringRecord) -> Result<Self, BatchError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Ok(Self {
            ticker: find("ticker").ok_or(BatchError::MissingColumn("ticker"))?,
            issue_price: find("issue_price").ok_or(BatchError::MissingColumn("issue_price"))?,
            listing_date: find("listing_date").ok_or(BatchError::MissingColumn("listing_date"))?,
            exchange: find("exchange"),
            sector: find("sector"),
        })
    }

    fn item(&self, record: &csv::StringRecord) -> Option<PredictItem> {
        let field = |idx: usize| record.get(idx).map(|v| v.trim().to_string());
        let optional = |idx: Option<usize>| match idx {
            Some(idx) => field(idx),
            None => Some(String::new()),
        };

        Some(PredictItem {
            ticker: field(self.ticker)?,
            issue_price: parse_issue_price(&field(self.issue_price)?),
            listing_date: field(self.listing_date)?,
            exchange: optional(self.exchange)?,
            sector: optional(self.sector)?,
        })
    }

    fn required_width(&self) -> usize {
        [
            Some(self.ticker),
            Some(self.issue_price),
            Some(self.listing_date),
            self.exchange,
            self.sector,
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |idx| idx + 1)
    }
}

/// Read prediction items from a CSV file with a header row
pub fn import_csv(path: &Path) -> Result<BatchImport, BatchError> {
    let file = std::fs::File::open(path)?;
    import_reader(file)
}

/// Read prediction items from any CSV source with a header row
pub fn import_reader<R: std::io::Read>(source: R) -> Result<BatchImport, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let columns = Columns::detect(reader.headers()?)?;
    let mut result = BatchImport::default();

    for (row, record) in reader.records().enumerate() {
        result.rows_processed += 1;
        // Header is line 1
        let line = row + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                result.rows_failed += 1;
                result.errors.push(format!("Line {}: {}", line, e));
                continue;
            }
        };

        match columns.item(&record) {
            Some(item) => result.items.push(item),
            None => {
                result.rows_failed += 1;
                result.errors.push(format!(
                    "Line {}: expected at least {} fields, found {}",
                    line,
                    columns.required_width(),
                    record.len()
                ));
            }
        }
    }

    tracing::debug!(
        items = result.items.len(),
        failed = result.rows_failed,
        "Batch file read"
    );
    Ok(result)
}
