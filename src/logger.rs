// A tiny logger for the `log` crate. Records go to stderr, so they never mix
// with the results printed on stdout, and only records from this program or
// the movie-db crate are shown. Network libraries log a lot at debug level.

use log::{self, Log};

/// Initialize the stderr logger as the global logger.
pub fn init() -> anyhow::Result<()> {
    Ok(log::set_logger(LOGGER)?)
}

/// The simplest possible logger that logs to stderr.
///
/// This logger does no level filtering. Instead, it relies on the `log`
/// crate's global max_level setting.
#[derive(Debug)]
struct Logger(());

const LOGGER: &Logger = &Logger(());

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if !should_log(record.target()) {
            return;
        }
        eprintln!("{}: {}", record.level(), record.args());
    }

    fn flush(&self) {
        // eprintln! is unbuffered.
    }
}

fn should_log(target: &str) -> bool {
    target.starts_with("movie_lookup") || target.starts_with("movie_db")
}
