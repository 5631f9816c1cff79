use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use csv::Writer;

use crate::{error::Error, model::movie::OutputRow};

/// Writes a fresh CSV file, truncating anything already at `path`.
pub struct CsvWriter<W: io::Write> {
    wrt: Writer<W>,
    path: PathBuf,
}

impl CsvWriter<File> {
    pub fn create(path: &Path, header: &[&str]) -> Result<Self, Error> {
        let file = File::create(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_writer(file, path, header)
    }
}

impl<W: io::Write> CsvWriter<W> {
    pub fn from_writer(inner: W, path: &Path, header: &[&str]) -> Result<Self, Error> {
        let mut writer = CsvWriter {
            wrt: Writer::from_writer(inner),
            path: path.to_path_buf(),
        };
        writer.write_row(header)?;
        Ok(writer)
    }

    pub fn write_row<I, T>(&mut self, row: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.wrt
            .write_record(row)
            .map_err(|source| Error::CsvWrite {
                path: self.path.clone(),
                source,
            })
    }

    pub fn finish(mut self) -> Result<W, Error> {
        self.wrt.flush().map_err(|source| Error::Flush {
            path: self.path.clone(),
            source,
        })?;
        let path = self.path;
        self.wrt.into_inner().map_err(|e| Error::Flush {
            path,
            source: e.into_error(),
        })
    }
}

/// Appends enriched movies to a CSV that survives across runs.
///
/// Whether the header still has to be written is decided once, when the writer
/// is created: a missing or empty file gets one, anything else is assumed to
/// already start with it. The file itself is only opened on the first append,
/// and every append is flushed and synced before returning.
pub struct MovieCsvWriter {
    path: PathBuf,
    wrt: Option<Writer<File>>,
    header_written: bool,
    rows_written: usize,
}

impl MovieCsvWriter {
    pub fn new(path: &Path) -> Result<Self, Error> {
        let header_written = match fs::metadata(path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => {
                return Err(Error::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(MovieCsvWriter {
            path: path.to_path_buf(),
            wrt: None,
            header_written,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn append(&mut self, row: &OutputRow) -> Result<(), Error> {
        let path = self.path.clone();
        let write_err = |source: csv::Error| Error::CsvWrite {
            path: path.clone(),
            source,
        };

        let header_pending = !self.header_written;
        let wrt = self.writer()?;

        if header_pending {
            wrt.write_record(OutputRow::csv_titles())
                .map_err(write_err)?;
        }
        wrt.write_record(row.to_csvable_array())
            .map_err(write_err)?;

        let flush_err = |source: io::Error| Error::Flush {
            path: path.clone(),
            source,
        };
        wrt.flush().map_err(flush_err)?;
        wrt.get_ref().sync_data().map_err(flush_err)?;

        self.header_written = true;
        self.rows_written += 1;
        Ok(())
    }

    fn writer(&mut self) -> Result<&mut Writer<File>, Error> {
        let wrt = match self.wrt.take() {
            Some(wrt) => wrt,
            None => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .map_err(|source| Error::Open {
                        path: self.path.clone(),
                        source,
                    })?;
                log::debug!("Opened {} for appending", self.path.display());
                Writer::from_writer(file)
            }
        };

        Ok(self.wrt.insert(wrt))
    }
}
