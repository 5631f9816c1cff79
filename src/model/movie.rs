use serde::Deserialize;

/// A movie as described by the OMDb API. Every field is optional because OMDb
/// omits most of them for failed lookups.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Rated")]
    pub rated: Option<String>,
    #[serde(rename = "Released")]
    pub release_date: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Writer")]
    pub writer: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
}

impl MovieRecord {
    pub fn is_found(&self) -> bool {
        let truthy = self
            .response
            .as_deref()
            .map(|r| r.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        truthy && self.error.as_deref().map_or(true, str::is_empty)
    }
}

/// One line of the enriched movies CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub movie: MovieRecord,
    pub trailer_link: Option<String>,
}

impl OutputRow {
    pub fn new(movie: MovieRecord, trailer_link: Option<String>) -> Self {
        OutputRow {
            movie,
            trailer_link,
        }
    }

    pub fn to_csvable_array(&self) -> Vec<String> {
        let field = |f: &Option<String>| f.clone().unwrap_or_default();
        let m = &self.movie;

        vec![
            field(&m.title),
            field(&m.year),
            field(&m.rated),
            field(&m.release_date),
            field(&m.runtime),
            field(&m.genre),
            field(&m.director),
            field(&m.writer),
            field(&m.actors),
            field(&m.language),
            field(&m.plot),
            field(&self.trailer_link),
        ]
    }

    /// Column names of the movies CSV. Files are appended to across runs, so
    /// the order and count here must stay stable.
    pub fn csv_titles() -> Vec<&'static str> {
        vec![
            "Title",
            "Year",
            "Rated",
            "Release Date",
            "Runtime",
            "Genre",
            "Director",
            "Writer",
            "Actors",
            "Language",
            "Plot",
            "Trailer Link",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_matches_header_width() {
        let row = OutputRow::new(MovieRecord::default(), None);

        assert_eq!(row.to_csvable_array().len(), OutputRow::csv_titles().len());
        assert!(row.to_csvable_array().iter().all(String::is_empty));
    }

    #[test]
    fn trailer_link_is_last_column() {
        let movie = MovieRecord {
            title: Some("Inception".to_string()),
            year: Some("2010".to_string()),
            ..Default::default()
        };
        let row = OutputRow::new(movie, Some("https://www.youtube.com/watch?v=abc".into()));
        let fields = row.to_csvable_array();

        assert_eq!(fields[0], "Inception");
        assert_eq!(fields[1], "2010");
        assert_eq!(fields[11], "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn found_requires_truthy_response_and_no_error() {
        let found = MovieRecord {
            response: Some("True".to_string()),
            ..Default::default()
        };
        let not_found = MovieRecord {
            response: Some("False".to_string()),
            error: Some("Movie not found!".to_string()),
            ..Default::default()
        };
        let contradictory = MovieRecord {
            response: Some("True".to_string()),
            error: Some("Something odd".to_string()),
            ..Default::default()
        };

        assert!(found.is_found());
        assert!(!not_found.is_found());
        assert!(!contradictory.is_found());
        assert!(!MovieRecord::default().is_found());
    }
}
