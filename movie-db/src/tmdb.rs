use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::database::MovieDatabase;
use crate::error::{Error, Result};
use crate::record::{CastMember, Details, Movie, MovieId, Rating};

/// The base URL of the TMDb v3 API.
pub const DEFAULT_BASE_URL: &'static str = "https://api.themoviedb.org/3";

/// The language used for localized fields when none is given.
pub const DEFAULT_LANGUAGE: &'static str = "en-US";

/// The timeout applied to each request when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A builder for configuring a TMDb [`Client`](struct.Client.html).
///
/// An API key is the only required setting. Everything else has a sensible
/// default.
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    language: String,
    timeout: Duration,
    include_adult: bool,
}

impl ClientBuilder {
    /// Create a new builder with default settings and no API key.
    pub fn new() -> ClientBuilder {
        ClientBuilder {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            include_adult: false,
        }
    }

    /// Build a client from this configuration.
    ///
    /// If no API key was set, or if it is empty, then an error is returned.
    pub fn build(&self) -> Result<Client> {
        let key = match self.api_key {
            Some(ref key) if !key.trim().is_empty() => key.trim(),
            _ => {
                return Err(Error::config(
                    "no TMDb API key configured (use --api-key or set \
                     TMDB_API_KEY)",
                ))
            }
        };
        let agent = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .user_agent(concat!("movie-db/", env!("CARGO_PKG_VERSION")))
            .build();
        Ok(Client {
            agent,
            auth: Auth::new(key),
            base_url: self.base_url.trim_end_matches('/').to_string(),
            language: self.language.clone(),
            include_adult: self.include_adult,
        })
    }

    /// Set the credential used to authenticate with TMDb.
    ///
    /// Both v3 API keys and v4 read access tokens are accepted. Access
    /// tokens are recognized by their JWT prefix and are sent as a bearer
    /// token. API keys are sent as a query parameter.
    pub fn api_key(&mut self, key: &str) -> &mut ClientBuilder {
        self.api_key = Some(key.to_string());
        self
    }

    /// Set the base URL of the API.
    ///
    /// This is mostly useful for pointing the client at a proxy or a mock
    /// server. A trailing slash is ignored.
    pub fn base_url(&mut self, url: &str) -> &mut ClientBuilder {
        self.base_url = url.to_string();
        self
    }

    /// Set the language used for localized titles and overviews, e.g.,
    /// `en-US` or `de-DE`.
    pub fn language(&mut self, language: &str) -> &mut ClientBuilder {
        self.language = language.to_string();
        self
    }

    /// Set the overall timeout for each request.
    pub fn timeout(&mut self, timeout: Duration) -> &mut ClientBuilder {
        self.timeout = timeout;
        self
    }

    /// Whether to include adult titles in search results.
    ///
    /// This is disabled by default.
    pub fn include_adult(&mut self, yes: bool) -> &mut ClientBuilder {
        self.include_adult = yes;
        self
    }
}

impl Default for ClientBuilder {
    fn default() -> ClientBuilder {
        ClientBuilder::new()
    }
}

/// A blocking client for the TMDb v3 API.
///
/// A client owns a connection pool, so reusing one client for several
/// requests is cheaper than building a new one each time.
#[derive(Debug)]
pub struct Client {
    agent: ureq::Agent,
    auth: Auth,
    base_url: String,
    language: String,
    include_adult: bool,
}

impl Client {
    /// Fetch full details for the TMDb movie with the given identifier.
    fn fetch_details(&self, id: u64) -> Result<Movie> {
        let details: MovieDetails = self.request(
            &format!("/movie/{}", id),
            &[("append_to_response", "credits")],
        )?;
        Ok(details.into_movie())
    }

    /// Map an IMDb identifier to a TMDb movie identifier.
    fn find_imdb(&self, imdb_id: &str) -> Result<Option<u64>> {
        let found: FindResults = self.request(
            &format!("/find/{}", imdb_id),
            &[("external_source", "imdb_id")],
        )?;
        Ok(found.movie_results.first().map(|item| item.id))
    }

    /// Execute a GET request against the given API path and decode its JSON
    /// body.
    ///
    /// The language parameter and the credential are always added.
    fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {} {:?}", url, params);

        let mut req = self
            .auth
            .apply(self.agent.get(&url))
            .query("language", &self.language);
        for &(name, value) in params {
            req = req.query(name, value);
        }
        match req.call() {
            Ok(resp) => resp.into_json().map_err(Error::decode),
            Err(ureq::Error::Status(status, resp)) => {
                Err(Error::http(status, status_message(resp)))
            }
            Err(ureq::Error::Transport(err)) => Err(Error::transport(err)),
        }
    }
}

impl MovieDatabase for Client {
    fn search_movie(&self, title: &str) -> Result<Vec<Movie>> {
        let include_adult = if self.include_adult { "true" } else { "false" };
        let page: SearchPage = self.request(
            "/search/multi",
            &[
                ("query", title),
                ("include_adult", include_adult),
                ("page", "1"),
            ],
        )?;
        log::debug!(
            "search for {:?} found {} results",
            title,
            page.results.len()
        );
        Ok(page.results.into_iter().map(|item| item.into_movie()).collect())
    }

    fn get_movie(&self, id: &MovieId) -> Result<Option<Movie>> {
        let tmdb_id = match *id {
            MovieId::Tmdb(n) => n,
            MovieId::Imdb(ref imdb_id) => match self.find_imdb(imdb_id)? {
                None => return Ok(None),
                Some(n) => n,
            },
        };
        match self.fetch_details(tmdb_id) {
            Ok(movie) => Ok(Some(movie)),
            Err(ref err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn update(&self, movie: &mut Movie) -> Result<()> {
        let id = movie.id.parse::<u64>().map_err(|_| Error::unknown_id(&movie.id))?;
        let fetched = self.fetch_details(id)?;
        movie.title = fetched.title.or_else(|| movie.title.take());
        movie.year = fetched.year.or(movie.year);
        movie.details = fetched.details;
        Ok(())
    }
}

/// The credential sent with every request.
#[derive(Clone)]
enum Auth {
    ApiKey(String),
    Bearer(String),
}

impl Auth {
    fn new(key: &str) -> Auth {
        // v4 read access tokens are JWTs, whose header always encodes to
        // this prefix.
        if key.starts_with("eyJ") {
            Auth::Bearer(key.to_string())
        } else {
            Auth::ApiKey(key.to_string())
        }
    }

    fn apply(&self, req: ureq::Request) -> ureq::Request {
        match *self {
            Auth::ApiKey(ref key) => req.query("api_key", key),
            Auth::Bearer(ref token) => {
                req.set("Authorization", &format!("Bearer {}", token))
            }
        }
    }
}

// Credentials never show up in debug output.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Auth::ApiKey(_) => write!(f, "ApiKey(..)"),
            Auth::Bearer(_) => write!(f, "Bearer(..)"),
        }
    }
}

/// Extract TMDb's own description of a failed request, falling back to the
/// HTTP status text.
fn status_message(resp: ureq::Response) -> String {
    let fallback = resp.status_text().to_string();
    resp.into_json::<StatusBody>()
        .ok()
        .and_then(|body| body.status_message)
        .unwrap_or(fallback)
}

/// Map a TMDb media type to the kind of a record.
fn kind_from_media_type(media_type: &str) -> String {
    match media_type {
        "movie" => "movie".to_string(),
        "tv" => "tv series".to_string(),
        "person" => "person".to_string(),
        other => other.to_string(),
    }
}

/// Parse the year out of a TMDb date, e.g., `1999-03-30`.
///
/// TMDb uses an empty string for unknown dates.
fn year_from_date(date: Option<&str>) -> Option<u32> {
    date?.get(0..4)?.parse().ok()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct FindResults {
    #[serde(default)]
    movie_results: Vec<SearchItem>,
}

/// A single search result. Movies carry `title` and `release_date`, while
/// TV series and people carry `name` and `first_air_date`.
#[derive(Debug, Deserialize)]
struct SearchItem {
    id: u64,
    media_type: Option<String>,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

impl SearchItem {
    fn into_movie(self) -> Movie {
        let media_type = self.media_type.as_deref().unwrap_or("movie");
        let kind = kind_from_media_type(media_type);
        let year = year_from_date(
            self.release_date.as_deref().or(self.first_air_date.as_deref()),
        );
        Movie::new(self.id.to_string(), kind, self.title.or(self.name))
            .with_year(year)
    }
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    id: u64,
    title: Option<String>,
    original_title: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
    runtime: Option<u32>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    overview: Option<String>,
    imdb_id: Option<String>,
    credits: Option<Credits>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<Cast>,
    #[serde(default)]
    crew: Vec<Crew>,
}

#[derive(Debug, Deserialize)]
struct Cast {
    name: String,
    character: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Crew {
    name: String,
    job: Option<String>,
}

impl MovieDetails {
    fn into_movie(self) -> Movie {
        let credits = self.credits.unwrap_or_default();
        let rating = match (self.vote_average, self.vote_count) {
            (Some(average), Some(votes)) if votes > 0 => {
                Some(Rating { average, votes })
            }
            _ => None,
        };
        let details = Details {
            imdb_id: non_empty(self.imdb_id),
            original_title: non_empty(self.original_title),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            directors: credits
                .crew
                .into_iter()
                .filter(|c| c.job.as_deref() == Some("Director"))
                .map(|c| c.name)
                .collect(),
            cast: credits
                .cast
                .into_iter()
                .map(|c| CastMember {
                    name: c.name,
                    character: non_empty(c.character),
                })
                .collect(),
            runtime_minutes: self.runtime.filter(|&m| m > 0),
            rating,
            plot: non_empty(self.overview),
        };
        let year = year_from_date(self.release_date.as_deref());
        let mut movie = Movie::new(self.id.to_string(), "movie", self.title)
            .with_year(year);
        movie.details = Some(details);
        movie
    }
}
