use serde::Deserialize;
use thiserror::Error;

pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

/// Error type for OMDb requests.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OMDb error: {0}")]
    Api(String),
}

impl ApiError {
    /// Get a user-friendly error message for the status line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) if e.is_timeout() => "Network timeout".to_string(),
            ApiError::Http(e) if e.is_decode() => "Unexpected response from OMDb".to_string(),
            ApiError::Http(_) => "Something went wrong fetching movies".to_string(),
            ApiError::Api(msg) => msg.clone(),
        }
    }
}

/// Lightweight record from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// One page of search results plus the API's total match count.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total_results: usize,
}

/// Extended record fetched on demand for a single movie.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
}

impl MovieDetail {
    /// Runtime in whole minutes. OMDb sends `"148 min"`, or `"N/A"` when unknown.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.split_whitespace().next()?.parse().ok()
    }

    /// External rating as a number, `None` for `"N/A"`.
    pub fn imdb_rating_value(&self) -> Option<f64> {
        self.imdb_rating.parse().ok()
    }
}

// ── Wire envelopes ──
//
// OMDb signals failure in-band: HTTP 200 with `"Response": "False"` and an
// `Error` string. A handful of those strings mean "no match", which the UI
// treats as an empty result set rather than a failure.

const NO_MATCH_ERRORS: [&str; 2] = ["Movie not found!", "Too many results."];

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    search: Vec<SearchResult>,
    #[serde(rename = "totalResults", default)]
    total_results: Option<String>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl SearchEnvelope {
    fn into_page(self) -> Result<SearchPage, ApiError> {
        if self.response == "False" {
            let msg = self.error.unwrap_or_else(|| "unknown error".to_string());
            return if NO_MATCH_ERRORS.contains(&msg.as_str()) {
                Ok(SearchPage::default())
            } else {
                Err(ApiError::Api(msg))
            };
        }
        let total = self
            .total_results
            .and_then(|t| t.parse().ok())
            .unwrap_or(self.search.len());
        Ok(SearchPage {
            results: self.search,
            total_results: total,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(flatten)]
    detail: MovieDetail,
}

impl DetailEnvelope {
    fn into_detail(self) -> Result<MovieDetail, ApiError> {
        if self.response == "False" {
            let msg = self
                .error
                .unwrap_or_else(|| "Could not fetch movie".to_string());
            return Err(ApiError::Api(msg));
        }
        Ok(self.detail)
    }
}

/// HTTP client for the OMDb API, keyed by an access token.
#[derive(Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Search movies by title fragment.
    pub async fn search(&self, query: &str) -> Result<SearchPage, ApiError> {
        let envelope: SearchEnvelope = self
            .http
            .get(OMDB_BASE_URL)
            .query(&[("apikey", self.api_key.as_str()), ("s", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_page()
    }

    /// Fetch the full record for a single movie by identifier.
    pub async fn detail(&self, imdb_id: &str) -> Result<MovieDetail, ApiError> {
        let envelope: DetailEnvelope = self
            .http
            .get(OMDB_BASE_URL)
            .query(&[("apikey", self.api_key.as_str()), ("i", imdb_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_detail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_envelope_results() {
        let body = r#"{
            "Search": [
                {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666",
                 "Type": "movie", "Poster": "https://example.com/inception.jpg"},
                {"Title": "Inception: The Cobol Job", "Year": "2010",
                 "imdbID": "tt5295894", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "32",
            "Response": "True"
        }"#;
        let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
        let page = envelope.into_page().unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.total_results, 32);
        assert_eq!(page.results[0].imdb_id, "tt1375666");
        assert_eq!(page.results[0].title, "Inception");
        assert_eq!(page.results[0].year, "2010");
    }

    #[test]
    fn test_search_envelope_no_match_is_empty() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
        let page = envelope.into_page().unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_results, 0);

        let body = r#"{"Response": "False", "Error": "Too many results."}"#;
        let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.into_page().unwrap().results.is_empty());
    }

    #[test]
    fn test_search_envelope_api_error() {
        let body = r#"{"Response": "False", "Error": "Invalid API key!"}"#;
        let envelope: SearchEnvelope = serde_json::from_str(body).unwrap();
        match envelope.into_page() {
            Err(ApiError::Api(msg)) => assert_eq!(msg, "Invalid API key!"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_envelope() {
        let body = r#"{
            "Title": "Interstellar", "Year": "2014", "Released": "07 Nov 2014",
            "Runtime": "169 min", "Genre": "Adventure, Drama, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Matthew McConaughey, Anne Hathaway, Jessica Chastain",
            "Plot": "A team of explorers travel through a wormhole in space.",
            "Poster": "https://example.com/interstellar.jpg",
            "imdbRating": "8.7", "imdbID": "tt0816692", "Response": "True"
        }"#;
        let envelope: DetailEnvelope = serde_json::from_str(body).unwrap();
        let detail = envelope.into_detail().unwrap();
        assert_eq!(detail.imdb_id, "tt0816692");
        assert_eq!(detail.runtime_minutes(), Some(169));
        assert_eq!(detail.imdb_rating_value(), Some(8.7));
    }

    #[test]
    fn test_detail_envelope_error() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let envelope: DetailEnvelope = serde_json::from_str(body).unwrap();
        assert!(matches!(envelope.into_detail(), Err(ApiError::Api(_))));
    }

    #[test]
    fn test_runtime_and_rating_not_available() {
        let detail = MovieDetail {
            runtime: "N/A".to_string(),
            imdb_rating: "N/A".to_string(),
            ..Default::default()
        };
        assert_eq!(detail.runtime_minutes(), None);
        assert_eq!(detail.imdb_rating_value(), None);
    }
}
