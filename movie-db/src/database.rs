use crate::error::Result;
use crate::record::{Movie, MovieId};

/// The operations a front end needs from a movie database.
///
/// Implementations are expected to be cheap to call repeatedly and to hold
/// no state between calls that affects results.
pub trait MovieDatabase {
    /// Search for records whose title matches the given text.
    ///
    /// Records are returned in the database's own relevance order. They are
    /// lightweight: only their identifier, kind, title and year are set.
    /// Records of every kind (movies, TV series, people) may be returned.
    fn search_movie(&self, title: &str) -> Result<Vec<Movie>>;

    /// Fetch a single movie, with full details, by its identifier.
    ///
    /// If the identifier does not resolve to any movie, then `None` is
    /// returned.
    fn get_movie(&self, id: &MovieId) -> Result<Option<Movie>>;

    /// Populate the given lightweight record with full details.
    fn update(&self, movie: &mut Movie) -> Result<()>;
}
