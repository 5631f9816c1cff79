use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::{ErrorKind, ReaderBuilder, StringRecord};

use crate::{error::Error, model::source_row::TitleRow};

/// Reads movie titles from the first column of a header-less CSV.
pub struct TitleReader<R> {
    reader: csv::Reader<R>,
    record: StringRecord,
    path: PathBuf,
    rows_skipped: usize,
}

impl TitleReader<File> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file, path))
    }
}

impl<R: io::Read> TitleReader<R> {
    pub fn from_reader(rdr: R, path: &Path) -> Self {
        TitleReader {
            reader: ReaderBuilder::new().has_headers(false).from_reader(rdr),
            record: StringRecord::new(),
            path: path.to_path_buf(),
            rows_skipped: 0,
        }
    }

    /// Returns the next usable title, skipping rows that fail to parse or have
    /// no title. `Ok(None)` means the input is exhausted.
    pub fn next_title(&mut self) -> Result<Option<TitleRow>, Error> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(false) => return Ok(None),
                Ok(true) => match TitleRow::from_record(&self.record) {
                    Some(row) => return Ok(Some(row)),
                    None => {
                        self.rows_skipped += 1;
                        log::warn!(
                            "Skipping row {} of {}: no title",
                            self.current_line(),
                            self.path.display()
                        );
                    }
                },
                Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => {
                    return Err(Error::CsvRead {
                        path: self.path.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    self.rows_skipped += 1;
                    log::warn!("Error reading CSV {}: {}", self.path.display(), e);
                }
            }
        }
    }

    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    fn current_line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or_default()
    }
}
