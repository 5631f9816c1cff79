use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use csv::{ByteRecord, ReaderBuilder};

use crate::{
    error::Error,
    extractors::release_date::{parse_release_date, YearRange},
    model::source_row::DatasetRow,
    persisters::csv_writer::CsvWriter,
};

pub const OUTPUT_HEADER: &str = "title";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub rows_read: usize,
    pub header_rows: usize,
    pub invalid_dates: usize,
    pub titles_kept: usize,
}

/// Copies the title of every dataset row released within `range` from `input`
/// to a new CSV at `output`.
pub fn filter_titles_by_release_year(
    input: &Path,
    output: &Path,
    range: YearRange,
) -> Result<FilterSummary, Error> {
    let file = File::open(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = CsvWriter::create(output, &[OUTPUT_HEADER])?;

    let (summary, _) = DateFilter::new(input, range).run(file, writer)?;
    Ok(summary)
}

pub struct DateFilter {
    input: PathBuf,
    range: YearRange,
}

impl DateFilter {
    pub fn new(input: &Path, range: YearRange) -> Self {
        DateFilter {
            input: input.to_path_buf(),
            range,
        }
    }

    /// Rows are read up front so a malformed file fails before any title is
    /// written.
    pub fn run<R: io::Read, W: io::Write>(
        &self,
        input: R,
        mut writer: CsvWriter<W>,
    ) -> Result<(FilterSummary, W), Error> {
        let rows = self.read_rows(input)?;
        let mut summary = FilterSummary {
            rows_read: rows.len(),
            ..Default::default()
        };

        for row in rows {
            if row.is_header() {
                summary.header_rows += 1;
                continue;
            }

            match parse_release_date(&row.release_date) {
                Some(date) if self.range.contains(date) => {
                    writer.write_row([&row.title])?;
                    summary.titles_kept += 1;
                }
                Some(_) => {}
                None => {
                    log::debug!(
                        "Ignoring '{}': unparseable release date '{}'",
                        String::from_utf8_lossy(&row.title),
                        String::from_utf8_lossy(&row.release_date)
                    );
                    summary.invalid_dates += 1;
                }
            }
        }

        let inner = writer.finish()?;
        Ok((summary, inner))
    }

    fn read_rows<R: io::Read>(&self, input: R) -> Result<Vec<DatasetRow>, Error> {
        let mut reader = ReaderBuilder::new().has_headers(false).from_reader(input);
        let mut record = ByteRecord::new();
        let mut rows = vec![];

        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {
                    let row_number = record.position().map(|p| p.record() + 1).unwrap_or(0);
                    rows.push(DatasetRow::from_record(&record, row_number, &self.input)?);
                }
                Ok(false) => return Ok(rows),
                Err(source) => {
                    return Err(Error::CsvRead {
                        path: self.input.clone(),
                        source,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_filter_bytes(input: &[u8]) -> Result<(FilterSummary, Vec<u8>), Error> {
        let path = Path::new("dataset.csv");
        let writer = CsvWriter::from_writer(vec![], Path::new("filtered.csv"), &[OUTPUT_HEADER])?;
        DateFilter::new(path, YearRange::default()).run(input, writer)
    }

    fn run_filter(input: &str) -> Result<(FilterSummary, String), Error> {
        let (summary, bytes) = run_filter_bytes(input.as_bytes())?;
        Ok((summary, String::from_utf8(bytes).unwrap()))
    }

    #[test]
    fn keeps_titles_inside_year_range() {
        let input = "\
release_date,lang,title
01/01/15,en,Included 2015
31/12/14,en,Excluded 2014
01/01/25,en,Excluded 2025
31/12/24,en,Included 2024
";
        let (summary, output) = run_filter(input).unwrap();

        assert_eq!(output, "title\nIncluded 2015\nIncluded 2024\n");
        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.header_rows, 1);
        assert_eq!(summary.titles_kept, 2);
    }

    #[test]
    fn header_label_is_skipped_anywhere() {
        let input = "\
01/01/20,en,First
release_date,en,Not A Movie
02/02/20,en,Second
";
        let (summary, output) = run_filter(input).unwrap();

        assert_eq!(output, "title\nFirst\nSecond\n");
        assert_eq!(summary.header_rows, 1);
    }

    #[test]
    fn malformed_dates_are_silently_excluded() {
        let input = "\
not-a-date,en,Bad One
32/13/99,en,Bad Two
,en,Empty
05/06/18,en,Good
";
        let (summary, output) = run_filter(input).unwrap();

        assert_eq!(output, "title\nGood\n");
        assert_eq!(summary.invalid_dates, 3);
    }

    #[test]
    fn header_is_written_without_matches() {
        let (summary, output) = run_filter("01/01/99,en,Too Old\n").unwrap();
        assert_eq!(output, "title\n");
        assert_eq!(summary.titles_kept, 0);

        let (_, output) = run_filter("").unwrap();
        assert_eq!(output, "title\n");
    }

    #[test]
    fn inconsistent_field_counts_are_fatal() {
        let input = "01/01/15,en,Fine\n01/01/16,en\n";

        assert!(matches!(run_filter(input), Err(Error::CsvRead { .. })));
    }

    #[test]
    fn too_few_columns_are_fatal() {
        let input = "01/01/15,en\n01/01/16,en\n";

        assert!(matches!(run_filter(input), Err(Error::Schema { row: 1, .. })));
    }

    #[test]
    fn non_utf8_titles_pass_through() {
        let input = b"release_date,lang,title\n01/01/15,en,Good\n01/01/16,fr,Am\xE9lie\n01/01/17,en,Later\n";
        let (summary, output) = run_filter_bytes(input).unwrap();

        assert_eq!(output, b"title\nGood\nAm\xE9lie\nLater\n".to_vec());
        assert_eq!(summary.titles_kept, 3);
    }

    #[test]
    fn titles_with_commas_are_quoted() {
        let (_, output) = run_filter("01/01/16,en,\"Hello, World\"\n").unwrap();

        assert_eq!(output, "title\n\"Hello, World\"\n");
    }
}
