pub mod clients;
use clients::{build_http_client, omdb_client::OmdbClient, youtube_client::TrailerResolver};

pub mod config;
use config::{ApiKeys, EnrichArgs, FilterArgs};

pub mod error;
pub use error::{Error, LookupError};

pub mod extractors;
use extractors::title_reader::TitleReader;

pub mod model;

pub mod persisters;
use persisters::csv_writer::MovieCsvWriter;

pub mod pipelines;
use pipelines::{
    date_filter::{filter_titles_by_release_year, FilterSummary},
    enricher::{EnrichSummary, Enricher},
};

pub fn run_date_filter(args: &FilterArgs) -> Result<FilterSummary, Error> {
    let range = args.year_range();
    if range.after >= range.through {
        log::warn!(
            "Year range ({}, {}] is empty, no titles will be kept",
            range.after,
            range.through
        );
    }

    let summary = filter_titles_by_release_year(&args.input, &args.output, range)?;

    log::info!(
        "Kept {} of {} rows ({} header rows, {} unparseable dates). \
         Filtered titles have been saved to '{}'",
        summary.titles_kept,
        summary.rows_read,
        summary.header_rows,
        summary.invalid_dates,
        args.output.display()
    );
    Ok(summary)
}

pub async fn run_enricher(args: &EnrichArgs, keys: ApiKeys) -> Result<EnrichSummary, Error> {
    let client = build_http_client(args.timeout())?;
    let metadata = OmdbClient::new(client.clone(), keys.omdb);

    if keys.youtube.is_none() {
        log::warn!(
            "{} is not set, trailers will be looked up on the YouTube results page instead",
            config::YOUTUBE_API_KEY_VAR
        );
    }
    let trailers = TrailerResolver::new(client, keys.youtube);

    let mut titles = TitleReader::open(&args.input)?;
    let writer = MovieCsvWriter::new(&args.output)?;

    let summary = Enricher::new(metadata, trailers, writer)
        .batch_size(args.batch_size)
        .on_missing_trailer(args.on_missing_trailer)
        .run(&mut titles)
        .await?;

    log::info!(
        "Processed {} movies in {:.2} seconds: {} written to '{}' ({} without trailer), \
         {} not found, {} failed lookups, {} unreadable input rows",
        summary.titles_processed,
        summary.elapsed.as_secs_f64(),
        summary.rows_written,
        args.output.display(),
        summary.rows_without_trailer,
        summary.titles_not_found,
        summary.lookup_failures,
        summary.input_rows_skipped
    );
    Ok(summary)
}
