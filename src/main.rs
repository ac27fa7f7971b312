use std::io::{self, Write};
use std::process;
use std::time::Duration;

use movie_db::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT,
};

use crate::commands::Status;
use crate::report::Reporter;

mod commands;
mod logger;
mod report;
mod select;

fn main() {
    match try_main() {
        Ok(status) => process::exit(status.code()),
        Err(err) => {
            // A pipe error occurs when the consumer of this process's output
            // has hung up. This is a normal event, and we should quit
            // gracefully.
            if is_pipe_error(&err) {
                process::exit(0);
            }
            eprintln!("{:?}", err);
            process::exit(1);
        }
    }
}

fn try_main() -> anyhow::Result<Status> {
    logger::init()?;
    log::set_max_level(log::LevelFilter::Info);

    let mut report = Reporter::stdout();
    let matches = match app().get_matches_safe() {
        Ok(matches) => matches,
        Err(err) => return report_clap_error(&mut report, err),
    };
    let args = Args::from_matches(&matches)?;
    if args.debug {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let db = match args.client() {
        Ok(db) => db,
        Err(err) => {
            report.error("The movie database client is not available:")?;
            report.error(&err)?;
            return Ok(Status::Unavailable);
        }
    };
    args.run(&db, &mut report)
}

#[derive(Debug)]
struct Args {
    api_key: Option<String>,
    base_url: String,
    command: Command,
    debug: bool,
    include_adult: bool,
    language: String,
    timeout: Duration,
}

#[derive(Debug, Eq, PartialEq)]
enum Command {
    SearchByTitle { title: String, show_candidates: bool },
    BestMatch { title: String },
    GetById { movie_id: String, search_title: Option<String> },
}

impl Args {
    fn from_matches(matches: &clap::ArgMatches) -> anyhow::Result<Args> {
        let (command, sub) = match matches.subcommand() {
            ("search-by-title", Some(sub)) => {
                let command = Command::SearchByTitle {
                    title: required(sub, "title")?,
                    show_candidates: sub.is_present("candidates"),
                };
                (command, sub)
            }
            ("best-match", Some(sub)) => {
                (Command::BestMatch { title: required(sub, "title")? }, sub)
            }
            ("get-by-id", Some(sub)) => {
                let command = Command::GetById {
                    movie_id: required(sub, "movie-id")?,
                    search_title: sub
                        .value_of_lossy("search-title")
                        .map(|t| t.into_owned()),
                };
                (command, sub)
            }
            (name, _) => anyhow::bail!("unrecognized command: '{}'", name),
        };
        // Global flags may be given before or after the subcommand.
        let global = |name: &str| -> Option<String> {
            sub.value_of_lossy(name)
                .or_else(|| matches.value_of_lossy(name))
                .map(|v| v.into_owned())
        };
        let flag =
            |name: &str| sub.is_present(name) || matches.is_present(name);

        let timeout = match global("timeout") {
            None => DEFAULT_TIMEOUT,
            Some(secs) => Duration::from_secs(secs.parse()?),
        };
        Ok(Args {
            api_key: global("api-key"),
            base_url: global("base-url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            command,
            debug: flag("debug"),
            include_adult: flag("include-adult"),
            language: global("language")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timeout,
        })
    }

    /// Build the movie database client. This fails when it isn't configured
    /// well enough to talk to TMDb.
    fn client(&self) -> movie_db::Result<Client> {
        let mut builder = ClientBuilder::new();
        builder
            .base_url(&self.base_url)
            .language(&self.language)
            .timeout(self.timeout)
            .include_adult(self.include_adult);
        if let Some(ref key) = self.api_key {
            builder.api_key(key);
        }
        builder.build()
    }

    fn run<O: Write, E: Write>(
        &self,
        db: &Client,
        report: &mut Reporter<O, E>,
    ) -> anyhow::Result<Status> {
        match self.command {
            Command::SearchByTitle { ref title, show_candidates } => {
                commands::search_by_title(db, report, title, show_candidates)
            }
            Command::BestMatch { ref title } => {
                commands::best_match(db, report, title)
            }
            Command::GetById { ref movie_id, ref search_title } => {
                commands::get_by_id(
                    db,
                    report,
                    movie_id,
                    search_title.as_deref(),
                )
            }
        }
    }
}

fn required(matches: &clap::ArgMatches, name: &str) -> anyhow::Result<String> {
    match matches.value_of_lossy(name) {
        Some(value) => Ok(value.into_owned()),
        None => anyhow::bail!("missing required argument: {}", name),
    }
}

/// Report a failure to parse the command line.
///
/// Requests for help or the version are not failures. Everything else is a
/// usage error.
fn report_clap_error<O: Write, E: Write>(
    report: &mut Reporter<O, E>,
    err: clap::Error,
) -> anyhow::Result<Status> {
    match err.kind {
        clap::ErrorKind::HelpDisplayed => {
            report.info(&err.message)?;
            Ok(Status::Success)
        }
        clap::ErrorKind::VersionDisplayed => {
            // clap already printed the version, but not the line ending.
            report.info("")?;
            Ok(Status::Success)
        }
        _ => {
            report.error(&err.message)?;
            Ok(Status::Usage)
        }
    }
}

fn app() -> clap::App<'static, 'static> {
    use clap::{App, AppSettings, Arg, SubCommand};

    let title = Arg::with_name("title")
        .required(true)
        .help("The title to search for. Quote titles with spaces.");

    App::new("movie-lookup")
        .version(clap::crate_version!())
        .about("Look up movies on The Movie Database by title or identifier.")
        .max_term_width(100)
        .setting(AppSettings::UnifiedHelpMessage)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::VersionlessSubcommands)
        .arg(Arg::with_name("api-key")
             .long("api-key")
             .env("TMDB_API_KEY")
             .hide_env_values(true)
             .takes_value(true)
             .global(true)
             .help("The TMDb API key or read access token."))
        .arg(Arg::with_name("base-url")
             .long("base-url")
             .env("MOVIE_LOOKUP_BASE_URL")
             .takes_value(true)
             .global(true)
             .help("The base URL of the TMDb API. \
                    When absent, the default is https://api.themoviedb.org/3."))
        .arg(Arg::with_name("language")
             .long("language")
             .env("MOVIE_LOOKUP_LANGUAGE")
             .takes_value(true)
             .global(true)
             .help("The language for titles and plots, e.g., de-DE. \
                    When absent, the default is en-US."))
        .arg(Arg::with_name("timeout")
             .long("timeout")
             .env("MOVIE_LOOKUP_TIMEOUT")
             .takes_value(true)
             .global(true)
             .validator(|v| v.parse::<u64>().map(|_| ()).map_err(|e| e.to_string()))
             .help("The timeout, in seconds, for each request to TMDb. \
                    When absent, the default is 30."))
        .arg(Arg::with_name("include-adult")
             .long("include-adult")
             .global(true)
             .help("Include adult titles in search results."))
        .arg(Arg::with_name("debug")
             .long("debug")
             .global(true)
             .help("Show debug messages. Use this when filing bugs."))
        .subcommand(SubCommand::with_name("search-by-title")
             .about("Search for a title and show the identifiers and details \
                     of the best match.")
             .arg(title.clone())
             .arg(Arg::with_name("candidates")
                  .long("candidates")
                  .help("Also show the candidates that were compared and \
                         their edit distances from the title.")))
        .subcommand(SubCommand::with_name("best-match")
             .about("Search for a title and show the details of the best \
                     match.")
             .arg(title))
        .subcommand(SubCommand::with_name("get-by-id")
             .about("Show a movie by its TMDb (603) or IMDb (tt0133093) \
                     identifier, and optionally the best match for a title.")
             .arg(Arg::with_name("movie-id")
                  .required(true)
                  .help("A TMDb movie identifier (603), or an IMDb identifier \
                         with its tt prefix (tt0133093). Plain numbers are \
                         always TMDb identifiers."))
             .arg(Arg::with_name("search-title")
                  .help("A title to search for after showing the movie.")))
}

/// Return true if and only if an I/O broken pipe error exists in the causal
/// chain of the given error.
fn is_pipe_error(err: &anyhow::Error) -> bool {
    for cause in err.chain() {
        if let Some(ioerr) = cause.downcast_ref::<io::Error>() {
            if ioerr.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}
