use std::{io, time::Duration};

use crate::{
    clients::{MetadataSource, TrailerSource},
    error::{Error, LookupError},
    extractors::title_reader::TitleReader,
    model::movie::{MovieRecord, OutputRow},
    persisters::csv_writer::MovieCsvWriter,
};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// What to do when a movie was found but its trailer was not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MissingTrailerPolicy {
    /// Write the movie with an empty trailer link and carry on.
    #[default]
    Skip,
    /// Stop the whole run.
    Abort,
}

/// Where a single title ended up.
#[derive(Debug)]
pub enum TitleOutcome {
    Written { has_trailer: bool },
    Skipped(LookupError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichSummary {
    pub titles_processed: usize,
    pub rows_written: usize,
    pub rows_without_trailer: usize,
    pub titles_not_found: usize,
    pub lookup_failures: usize,
    pub input_rows_skipped: usize,
    pub elapsed: Duration,
}

/// Runs each title through metadata lookup, trailer lookup and the output
/// file, one at a time.
pub struct Enricher<M, T> {
    metadata: M,
    trailers: T,
    writer: MovieCsvWriter,
    batch_size: usize,
    on_missing_trailer: MissingTrailerPolicy,
}

impl<M: MetadataSource, T: TrailerSource> Enricher<M, T> {
    pub fn new(metadata: M, trailers: T, writer: MovieCsvWriter) -> Self {
        Enricher {
            metadata,
            trailers,
            writer,
            batch_size: DEFAULT_BATCH_SIZE,
            on_missing_trailer: MissingTrailerPolicy::default(),
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn on_missing_trailer(mut self, policy: MissingTrailerPolicy) -> Self {
        self.on_missing_trailer = policy;
        self
    }

    pub async fn run<R: io::Read>(
        &mut self,
        titles: &mut TitleReader<R>,
    ) -> Result<EnrichSummary, Error> {
        let start = std::time::Instant::now();
        let rows_before = self.writer.rows_written();
        let mut summary = EnrichSummary::default();

        while summary.titles_processed < self.batch_size {
            let Some(row) = titles.next_title()? else {
                break;
            };
            summary.titles_processed += 1;

            match self.process_title(&row.title).await? {
                TitleOutcome::Written { has_trailer: false } => {
                    summary.rows_without_trailer += 1;
                }
                TitleOutcome::Written { has_trailer: true } => {}
                TitleOutcome::Skipped(e) if e.is_not_found() => {
                    log::warn!("Skipping '{}': {}", row.title, e);
                    summary.titles_not_found += 1;
                }
                TitleOutcome::Skipped(e) => {
                    log::error!("Error fetching details for '{}': {}", row.title, e);
                    summary.lookup_failures += 1;
                }
            }
        }

        summary.rows_written = self.writer.rows_written() - rows_before;
        summary.input_rows_skipped = titles.rows_skipped();
        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    pub async fn process_title(&mut self, title: &str) -> Result<TitleOutcome, Error> {
        log::info!("Querying movie: {}", title);

        let movie = match self.metadata.fetch_movie(title).await {
            Ok(movie) => movie,
            Err(e) => return Ok(TitleOutcome::Skipped(e)),
        };
        log::debug!("Fetched metadata for '{}'", title);

        let trailer_link = self.resolve_trailer(title, &movie).await?;
        let has_trailer = trailer_link.is_some();

        self.writer.append(&OutputRow::new(movie, trailer_link))?;
        log::debug!("Wrote '{}' to {}", title, self.writer.path().display());

        Ok(TitleOutcome::Written { has_trailer })
    }

    async fn resolve_trailer(
        &self,
        title: &str,
        movie: &MovieRecord,
    ) -> Result<Option<String>, Error> {
        let resolved_title = movie.title.as_deref().unwrap_or(title);
        let year = movie.year.as_deref().unwrap_or_default();

        match self.trailers.find_trailer(resolved_title, year).await {
            Ok(link) => Ok(Some(link)),
            Err(source) => match self.on_missing_trailer {
                MissingTrailerPolicy::Skip => {
                    log::warn!(
                        "No trailer for '{}' ({}): {}. Writing it without one",
                        resolved_title,
                        year,
                        source
                    );
                    Ok(None)
                }
                MissingTrailerPolicy::Abort => Err(Error::Trailer {
                    title: resolved_title.to_string(),
                    source,
                }),
            },
        }
    }
}
