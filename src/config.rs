use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};

use crate::{
    error::Error,
    extractors::release_date::YearRange,
    pipelines::enricher::{MissingTrailerPolicy, DEFAULT_BATCH_SIZE},
};

pub const OMDB_API_KEY_VAR: &str = "API_KEY";
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Parser)]
#[command(name = "cinecsv", version, about = "Filter and enrich movie lists stored as CSV")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Keep the titles of dataset rows released within a range of years
    FilterDates(FilterArgs),
    /// Look up metadata and a trailer for each title and append them to a CSV
    Enrich(EnrichArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Dataset CSV with the release date (DD/MM/YY) in the first column and the
    /// title in the third
    #[arg(long, default_value = "dataMovie.csv")]
    pub input: PathBuf,

    #[arg(long, default_value = "filtered_titles.csv")]
    pub output: PathBuf,

    /// Keep movies released after this year
    #[arg(long, default_value_t = YearRange::default().after)]
    pub after_year: i32,

    /// Keep movies released up to and including this year
    #[arg(long, default_value_t = YearRange::default().through)]
    pub through_year: i32,
}

impl FilterArgs {
    pub fn year_range(&self) -> YearRange {
        YearRange {
            after: self.after_year,
            through: self.through_year,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct EnrichArgs {
    /// CSV with one movie title per row in the first column
    #[arg(long, default_value = "movies_2024.csv")]
    pub input: PathBuf,

    /// Output CSV, appended to if it already exists
    #[arg(long, default_value = "movies.csv")]
    pub output: PathBuf,

    /// Maximum number of titles to look up in this run
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = MissingTrailerPolicy::Skip)]
    pub on_missing_trailer: MissingTrailerPolicy,
}

impl EnrichArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeys {
    pub omdb: String,
    pub youtube: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("omdb", &"<redacted>")
            .field("youtube", &self.youtube.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiKeys {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(ApiKeys {
            omdb: get(OMDB_API_KEY_VAR).ok_or(Error::MissingConfig(OMDB_API_KEY_VAR))?,
            youtube: get(YOUTUBE_API_KEY_VAR),
        })
    }
}

/// Loads `.env` from the working directory when there is one.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No .env file found"),
        Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn keys_from(vars: &[(&str, &str)]) -> Result<ApiKeys, Error> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiKeys::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn omdb_key_is_required() {
        let err = keys_from(&[(YOUTUBE_API_KEY_VAR, "yt")]).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(OMDB_API_KEY_VAR)));

        let err = keys_from(&[(OMDB_API_KEY_VAR, "  ")]).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(_)));
    }

    #[test]
    fn youtube_key_is_optional() {
        let keys = keys_from(&[(OMDB_API_KEY_VAR, "omdb")]).unwrap();

        assert_eq!(keys.omdb, "omdb");
        assert_eq!(keys.youtube, None);
        assert!(!format!("{:?}", keys).contains("omdb\""));
    }

    #[test]
    fn cli_defaults_match_file_names() {
        let cli = Cli::parse_from(["cinecsv", "enrich"]);
        match cli.command {
            Command::Enrich(args) => {
                assert_eq!(args.input, PathBuf::from("movies_2024.csv"));
                assert_eq!(args.output, PathBuf::from("movies.csv"));
                assert_eq!(args.batch_size, 100);
                assert_eq!(args.timeout(), Duration::from_secs(10));
                assert_eq!(args.on_missing_trailer, MissingTrailerPolicy::Skip);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["cinecsv", "filter-dates", "--through-year", "2020"]);
        match cli.command {
            Command::FilterDates(args) => {
                assert_eq!(args.output, PathBuf::from("filtered_titles.csv"));
                assert_eq!(
                    args.year_range(),
                    YearRange {
                        after: 2014,
                        through: 2020
                    }
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn abort_policy_is_selectable() {
        let cli = Cli::parse_from(["cinecsv", "enrich", "--on-missing-trailer", "abort"]);
        match cli.command {
            Command::Enrich(args) => {
                assert_eq!(args.on_missing_trailer, MissingTrailerPolicy::Abort)
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
