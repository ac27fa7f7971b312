/*!
This crate provides a small client for searching and fetching movie records
from [The Movie Database](https://www.themoviedb.org) (TMDb).

Callers generally program against the
[`MovieDatabase`](trait.MovieDatabase.html) trait, which describes the three
operations a front end needs: a title search that returns lightweight
records, a fetch by identifier that returns a full record, and an update
that populates a lightweight record with full details in place. The
[`Client`](struct.Client.html) type implements this trait on top of the
TMDb v3 JSON API, and is constructed with a
[`ClientBuilder`](struct.ClientBuilder.html).
*/

#![deny(missing_docs)]

pub use crate::database::MovieDatabase;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::record::{CastMember, Details, Movie, MovieId, Rating};
pub use crate::tmdb::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT,
};

mod database;
mod error;
mod record;
mod tmdb;
