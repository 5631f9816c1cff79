use std::path::Path;

use csv::{ByteRecord, StringRecord};

use crate::error::Error;

/// Literal value of the date column on the dataset's header line.
pub const RELEASE_DATE_HEADER: &str = "release_date";

const RELEASE_DATE_FIELD: usize = 0;
const TITLE_FIELD: usize = 2;

/// A row of the movie dataset, reduced to the columns the date filter reads.
/// Fields are kept as raw bytes since dataset dumps are not always UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub release_date: Vec<u8>,
    pub title: Vec<u8>,
}

impl DatasetRow {
    pub fn from_record(record: &ByteRecord, row: u64, path: &Path) -> Result<Self, Error> {
        match (record.get(RELEASE_DATE_FIELD), record.get(TITLE_FIELD)) {
            (Some(release_date), Some(title)) => Ok(DatasetRow {
                release_date: release_date.to_vec(),
                title: title.to_vec(),
            }),
            _ => Err(Error::Schema {
                path: path.to_path_buf(),
                row,
                found: record.len(),
                expected: TITLE_FIELD + 1,
            }),
        }
    }

    pub fn is_header(&self) -> bool {
        self.release_date == RELEASE_DATE_HEADER.as_bytes()
    }
}

/// A row of the titles list fed to the enricher.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRow {
    pub title: String,
}

impl TitleRow {
    /// `None` when the title column is missing or blank.
    pub fn from_record(record: &StringRecord) -> Option<Self> {
        record
            .get(0)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| TitleRow {
                title: t.to_string(),
            })
    }
}
