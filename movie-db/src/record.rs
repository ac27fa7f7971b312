use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

/// The number of cast members shown in a summary.
const SUMMARY_CAST: usize = 5;

/// A movie database record.
///
/// A title search returns records that only carry the basic information
/// needed to tell them apart: an identifier, a kind, a title and a year.
/// Such records have no [`Details`](struct.Details.html). Fetching a record
/// by identifier, or updating a search result, attaches the details.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Movie {
    /// The database's own identifier for this record.
    ///
    /// For TMDb, this is a number rendered as a string, e.g., `603`.
    pub id: String,
    /// The kind of this record, e.g., `movie`, `tv series` or `person`.
    pub kind: String,
    /// The primary title of this record, if one is known.
    pub title: Option<String>,
    /// The release year of this record, if one is known.
    pub year: Option<u32>,
    /// Full details, present only after a fetch or an update.
    pub details: Option<Details>,
}

/// The full details of a movie.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Details {
    /// The IMDb identifier, e.g., `tt0133093`.
    pub imdb_id: Option<String>,
    /// The title in the movie's original language.
    pub original_title: Option<String>,
    /// Genre names, in the order reported by the database.
    pub genres: Vec<String>,
    /// The names of the directors.
    pub directors: Vec<String>,
    /// The cast, in billing order.
    pub cast: Vec<CastMember>,
    /// The runtime, in minutes.
    pub runtime_minutes: Option<u32>,
    /// The audience rating.
    pub rating: Option<Rating>,
    /// A short plot overview.
    pub plot: Option<String>,
}

/// A single member of a movie's cast.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CastMember {
    /// The performer's name.
    pub name: String,
    /// The character played, if known.
    pub character: Option<String>,
}

/// An audience rating.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rating {
    /// The average rating, on a scale of 0 to 10.
    pub average: f32,
    /// The number of votes involved in this rating.
    pub votes: u32,
}

impl Movie {
    /// Create a new lightweight record without details.
    pub fn new<I, K>(id: I, kind: K, title: Option<String>) -> Movie
    where
        I: Into<String>,
        K: Into<String>,
    {
        Movie {
            id: id.into(),
            kind: kind.into(),
            title,
            year: None,
            details: None,
        }
    }

    /// Set the release year of this record.
    pub fn with_year(mut self, year: Option<u32>) -> Movie {
        self.year = year;
        self
    }

    /// Return the details of this record, if they have been populated.
    pub fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }

    /// Return the IMDb identifier of this record, if it is known.
    ///
    /// This is only ever known once details have been populated.
    pub fn imdb_id(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.imdb_id.as_deref())
    }

    /// Returns true if and only if this record is a TV series.
    pub fn is_tv_series(&self) -> bool {
        self.kind == "tv series"
    }

    /// Return the title along with its year, e.g., `The Matrix (1999)`.
    ///
    /// When the year is unknown, `????` is used in its place. TV series
    /// titles are wrapped in double quotes.
    pub fn long_title(&self) -> String {
        let title = self.title.as_deref().unwrap_or("");
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "????".to_string());
        if self.is_tv_series() {
            format!("\"{}\" ({})", title, year)
        } else {
            format!("{} ({})", title, year)
        }
    }

    /// Return a short, human readable, multi-line summary of this record.
    ///
    /// Lines for details are only included when details have been
    /// populated and the corresponding information is present.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Movie".to_string(),
            "=====".to_string(),
            format!("Title: {}", self.long_title()),
        ];
        let details = match self.details {
            None => return lines.join("\n"),
            Some(ref details) => details,
        };
        if let Some(ref original) = details.original_title {
            if self.title.as_ref() != Some(original) {
                lines.push(format!("Original title: {}", original));
            }
        }
        if !details.genres.is_empty() {
            lines.push(format!("Genres: {}.", details.genres.join(", ")));
        }
        if !details.directors.is_empty() {
            lines.push(format!("Director: {}.", details.directors.join(", ")));
        }
        if !details.cast.is_empty() {
            let cast: Vec<String> = details
                .cast
                .iter()
                .take(SUMMARY_CAST)
                .map(|m| m.to_string())
                .collect();
            lines.push(format!("Cast: {}.", cast.join(", ")));
        }
        if let Some(minutes) = details.runtime_minutes {
            lines.push(format!("Runtime: {}.", minutes));
        }
        if let Some(ref rating) = details.rating {
            lines.push(format!(
                "Rating: {:.1} ({} votes).",
                rating.average, rating.votes
            ));
        }
        if let Some(ref plot) = details.plot {
            if !plot.is_empty() {
                lines.push(format!("Plot: {}", plot));
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for CastMember {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.character {
            Some(ref c) if !c.is_empty() => write!(f, "{} ({})", self.name, c),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// An identifier that can be used to fetch a single movie.
///
/// This type has a `FromStr` implementation that accepts either a numeric
/// TMDb identifier (e.g., `603`) or an IMDb identifier (e.g., `tt0133093`).
/// Parsing is case insensitive.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MovieId {
    /// A TMDb movie identifier.
    Tmdb(u64),
    /// An IMDb title identifier, always lowercase.
    Imdb(String),
}

impl FromStr for MovieId {
    type Err = Error;

    fn from_str(id: &str) -> Result<MovieId, Error> {
        lazy_static! {
            static ref RE_IMDB_ID: Regex = Regex::new(r"^tt[0-9]{7,}$").unwrap();
        }

        let id = id.trim().to_lowercase();
        if RE_IMDB_ID.is_match(&id) {
            return Ok(MovieId::Imdb(id));
        }
        match id.parse() {
            Ok(n) => Ok(MovieId::Tmdb(n)),
            Err(_) => Err(Error::unknown_id(id)),
        }
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MovieId::Tmdb(id) => write!(f, "{}", id),
            MovieId::Imdb(ref id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Movie {
        Movie::new("603", "movie", Some("The Matrix".to_string()))
            .with_year(Some(1999))
    }

    #[test]
    fn long_title() {
        assert_eq!(matrix().long_title(), "The Matrix (1999)");

        let unknown_year = Movie::new("1", "movie", Some("Untitled".into()));
        assert_eq!(unknown_year.long_title(), "Untitled (????)");

        let show = Movie::new("1399", "tv series", Some("Dark".into()))
            .with_year(Some(2017));
        assert_eq!(show.long_title(), "\"Dark\" (2017)");

        let untitled = Movie::new("2", "movie", None);
        assert_eq!(untitled.long_title(), " (????)");
    }

    #[test]
    fn summary_without_details() {
        assert_eq!(
            matrix().summary(),
            "Movie\n=====\nTitle: The Matrix (1999)"
        );
    }

    #[test]
    fn summary_with_details() {
        let mut movie = matrix();
        movie.details = Some(Details {
            imdb_id: Some("tt0133093".to_string()),
            original_title: Some("The Matrix".to_string()),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
            directors: vec![
                "Lana Wachowski".to_string(),
                "Lilly Wachowski".to_string(),
            ],
            cast: vec![
                CastMember {
                    name: "Keanu Reeves".to_string(),
                    character: Some("Thomas A. Anderson / Neo".to_string()),
                },
                CastMember { name: "Gloria Foster".to_string(), character: None },
            ],
            runtime_minutes: Some(136),
            rating: Some(Rating { average: 8.2, votes: 24000 }),
            plot: Some("Set in the 22nd century.".to_string()),
        });
        let expected = "\
Movie
=====
Title: The Matrix (1999)
Genres: Action, Science Fiction.
Director: Lana Wachowski, Lilly Wachowski.
Cast: Keanu Reeves (Thomas A. Anderson / Neo), Gloria Foster.
Runtime: 136.
Rating: 8.2 (24000 votes).
Plot: Set in the 22nd century.";
        assert_eq!(movie.summary(), expected);
        assert_eq!(movie.imdb_id(), Some("tt0133093"));
    }

    #[test]
    fn summary_original_title() {
        let mut movie =
            Movie::new("194", "movie", Some("Amelie".to_string()))
                .with_year(Some(2001));
        let original = "Le Fabuleux Destin d'Am\u{e9}lie Poulain";
        movie.details = Some(Details {
            original_title: Some(original.to_string()),
            ..Details::default()
        });
        assert_eq!(
            movie.summary(),
            "Movie\n=====\nTitle: Amelie (2001)\n\
             Original title: Le Fabuleux Destin d'Am\u{e9}lie Poulain"
        );
    }

    #[test]
    fn summary_limits_cast() {
        let mut movie = matrix();
        movie.details = Some(Details {
            cast: (1..=8)
                .map(|i| CastMember { name: format!("P{}", i), character: None })
                .collect(),
            ..Details::default()
        });
        assert!(movie.summary().ends_with("Cast: P1, P2, P3, P4, P5."));
    }

    #[test]
    fn parse_movie_id() {
        assert_eq!("603".parse::<MovieId>().unwrap(), MovieId::Tmdb(603));
        assert_eq!(
            "TT0133093".parse::<MovieId>().unwrap(),
            MovieId::Imdb("tt0133093".to_string())
        );
        assert_eq!(
            "tt10872600".parse::<MovieId>().unwrap(),
            MovieId::Imdb("tt10872600".to_string())
        );
        assert!("tt12".parse::<MovieId>().is_err());
        assert!("the matrix".parse::<MovieId>().is_err());
        assert!("".parse::<MovieId>().is_err());
        assert!("-5".parse::<MovieId>().is_err());
    }
}
