use std::io::{self, Write};

use movie_db::{Movie, MovieDatabase, MovieId};
use tabwriter::TabWriter;

use crate::report::Reporter;
use crate::select::{rank_window, select_best, Ranked};

/// Printed before the error report when the database can't be queried.
const NOT_CONNECTED: &str =
    "Probably you're not connected to Internet. Complete error report:";

/// The same as `NOT_CONNECTED`, in the spacing `search-by-title` has always
/// used.
const SEARCH_NOT_CONNECTED: &str =
    "Probably you're not connected to Internet.  Complete error report:";

/// Printed before the error report when a search fails in `best-match` and
/// in the secondary search of `get-by-id`.
const SEARCH_FAILED: &str = "Error occurred while searching for the movie:";

/// The outcome of a command, which determines the process exit code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    /// A result was printed, or nothing matched.
    Success,
    /// The movie database client could not be set up.
    Unavailable,
    /// The command line arguments were invalid.
    Usage,
    /// A search or fetch against the movie database failed.
    ServiceError,
    /// A movie identifier did not resolve to any movie.
    NotFound,
    /// The optional search of `get-by-id` failed.
    SecondarySearchError,
}

impl Status {
    /// Return the process exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Unavailable => 1,
            Status::Usage => 2,
            Status::ServiceError => 3,
            Status::NotFound => 4,
            Status::SecondarySearchError => 5,
        }
    }
}

/// Search for a title, then print the identifiers and the full summary of
/// the best match.
///
/// When `show_candidates` is set, the candidates that were compared are
/// printed along with their distances before the best match.
pub fn search_by_title<D, O, E>(
    db: &D,
    report: &mut Reporter<O, E>,
    title: &str,
    show_candidates: bool,
) -> anyhow::Result<Status>
where
    D: MovieDatabase + ?Sized,
    O: Write,
    E: Write,
{
    let title = title.to_lowercase();
    let results = match db.search_movie(&title) {
        Ok(results) => results,
        Err(err) => {
            report_failure(report, SEARCH_NOT_CONNECTED, &err)?;
            return Ok(Status::ServiceError);
        }
    };
    let best = match best_or_explain(report, &title, &results)? {
        None => return Ok(Status::Success),
        Some(best) => best,
    };
    if show_candidates {
        write_window(report.out(), &rank_window(&title, &results))?;
    }

    let mut movie = best.clone();
    if let Err(err) = db.update(&mut movie) {
        report_failure(report, SEARCH_NOT_CONNECTED, &err)?;
        return Ok(Status::ServiceError);
    }
    report.info(format_args!("    Best match for \"{}\":", title))?;
    write_ids(report.out(), &movie)?;
    report.info(movie.summary())?;
    Ok(Status::Success)
}

/// Search for a title and print the full summary of the best match.
pub fn best_match<D, O, E>(
    db: &D,
    report: &mut Reporter<O, E>,
    title: &str,
) -> anyhow::Result<Status>
where
    D: MovieDatabase + ?Sized,
    O: Write,
    E: Write,
{
    let title = title.to_lowercase();
    let results = match db.search_movie(&title) {
        Ok(results) => results,
        Err(err) => {
            report_failure(report, SEARCH_FAILED, &err)?;
            return Ok(Status::ServiceError);
        }
    };
    let mut movie = match best_or_explain(report, &title, &results)? {
        None => return Ok(Status::Success),
        Some(best) => best.clone(),
    };
    report.info(format_args!("Best match for \"{}\":", title))?;
    if let Err(err) = db.update(&mut movie) {
        report_failure(report, NOT_CONNECTED, &err)?;
        return Ok(Status::ServiceError);
    }
    report.info(movie.summary())?;
    Ok(Status::Success)
}

/// Fetch a movie by its identifier and print its summary.
///
/// If a search title is given, then the best match for that title is also
/// printed. Search results are shown as returned by the search, without
/// fetching their full details.
pub fn get_by_id<D, O, E>(
    db: &D,
    report: &mut Reporter<O, E>,
    movie_id: &str,
    search_title: Option<&str>,
) -> anyhow::Result<Status>
where
    D: MovieDatabase + ?Sized,
    O: Write,
    E: Write,
{
    let movie_id = movie_id.to_lowercase();
    let found = match movie_id.parse::<MovieId>() {
        Err(err) => {
            log::debug!("{}", err);
            Ok(None)
        }
        Ok(id) => db.get_movie(&id),
    };
    let movie = match found {
        Ok(Some(movie)) => movie,
        Ok(None) => {
            report.info(format_args!(
                "It seems that there's no movie with movie_id \"{}\"",
                movie_id
            ))?;
            return Ok(Status::NotFound);
        }
        Err(err) => {
            report_failure(report, NOT_CONNECTED, &err)?;
            return Ok(Status::ServiceError);
        }
    };
    report.info(movie.summary())?;

    let search_title = match search_title {
        None => return Ok(Status::Success),
        Some(title) => title.to_lowercase(),
    };
    let results = match db.search_movie(&search_title) {
        Ok(results) => results,
        Err(err) => {
            report_failure(report, SEARCH_FAILED, &err)?;
            return Ok(Status::SecondarySearchError);
        }
    };
    if let Some(best) = best_or_explain(report, &search_title, &results)? {
        report.info(format_args!("    Best match for \"{}\":", search_title))?;
        report.info(best.summary())?;
    }
    Ok(Status::Success)
}

/// Pick the best match among search results.
///
/// When there is nothing to pick from, the reason is reported and `None` is
/// returned.
fn best_or_explain<'a, O: Write, E: Write>(
    report: &mut Reporter<O, E>,
    query: &str,
    results: &'a [Movie],
) -> io::Result<Option<&'a Movie>> {
    if results.is_empty() {
        report.info(format_args!("No matches for \"{}\", sorry.", query))?;
        return Ok(None);
    }
    match select_best(query, results) {
        None => {
            report.info(format_args!(
                "No movie matches for \"{}\", sorry.",
                query
            ))?;
            Ok(None)
        }
        Some(best) => {
            log::debug!(
                "best match for {:?} is {} at distance {}",
                query,
                best.candidate().id,
                best.distance()
            );
            Ok(Some(best.candidate()))
        }
    }
}

fn report_failure<O: Write, E: Write>(
    report: &mut Reporter<O, E>,
    preamble: &str,
    err: &movie_db::Error,
) -> io::Result<()> {
    report.error(preamble)?;
    report.error(err)
}

/// Write the database identifier, the IMDb identifier and the long title of
/// the given movie as a small table.
fn write_ids<W: io::Write>(wtr: W, movie: &Movie) -> io::Result<()> {
    let mut wtr = TabWriter::new(wtr);
    writeln!(wtr, "movieID\t: imdbID\t: title")?;
    writeln!(
        wtr,
        "{}\t: {}\t: {}",
        movie.id,
        movie.imdb_id().unwrap_or("N/A"),
        movie.long_title(),
    )?;
    wtr.flush()
}

/// Write the ranked candidates that best match selection compared.
fn write_window<W: io::Write>(
    wtr: W,
    window: &[Ranked<Movie>],
) -> io::Result<()> {
    let mut wtr = TabWriter::new(wtr).minwidth(4);
    writeln!(wtr, "#\tdistance\tmovieID\tkind\ttitle")?;
    for (i, ranked) in window.iter().enumerate() {
        let movie = ranked.candidate();
        writeln!(
            wtr,
            "{}\t{}\t{}\t{}\t{}",
            i + 1,
            ranked.distance(),
            movie.id,
            movie.kind,
            movie.long_title(),
        )?;
    }
    wtr.flush()
}
