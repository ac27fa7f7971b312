use std::fmt;

/// A type alias for handling errors throughout movie-db.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while talking to a movie database.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Return a reference to the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Transfer ownership of the kind of this error.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Returns true if and only if this error corresponds to a request for
    /// a record that the remote service does not know about.
    pub fn is_not_found(&self) -> bool {
        match self.kind {
            ErrorKind::Http { status, .. } => status == 404,
            _ => false,
        }
    }

    pub(crate) fn config<T: AsRef<str>>(msg: T) -> Error {
        Error { kind: ErrorKind::Config(msg.as_ref().to_string()) }
    }

    pub(crate) fn unknown_id<T: AsRef<str>>(unk: T) -> Error {
        Error { kind: ErrorKind::UnknownId(unk.as_ref().to_string()) }
    }

    pub(crate) fn http<T: AsRef<str>>(status: u16, msg: T) -> Error {
        Error {
            kind: ErrorKind::Http { status, message: msg.as_ref().to_string() },
        }
    }

    pub(crate) fn transport(err: ureq::Transport) -> Error {
        Error { kind: ErrorKind::Transport(err.to_string()) }
    }

    pub(crate) fn decode(err: std::io::Error) -> Error {
        Error { kind: ErrorKind::Decode(err.to_string()) }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// The specific kind of error that can occur.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The client could not be configured. This usually means a required
    /// setting, such as the API key, is missing.
    Config(String),
    /// An identifier could not be parsed.
    ///
    /// The data provided is the unrecognized identifier.
    UnknownId(String),
    /// The remote service answered with a non-success status code.
    Http {
        /// The HTTP status code.
        status: u16,
        /// The message reported by the service, or a generic description
        /// of the status when the service did not provide one.
        message: String,
    },
    /// The remote service could not be reached. For example, DNS failed,
    /// the connection was refused or the request timed out.
    Transport(String),
    /// A response body could not be decoded into the expected shape.
    Decode(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::Config(ref msg) => write!(f, "config error: {}", msg),
            ErrorKind::UnknownId(ref unk) => {
                write!(f, "unrecognized movie identifier: '{}'", unk)
            }
            ErrorKind::Http { status, ref message } => {
                write!(f, "HTTP status {}: {}", status, message)
            }
            ErrorKind::Transport(ref msg) => {
                write!(f, "could not reach movie database: {}", msg)
            }
            ErrorKind::Decode(ref msg) => {
                write!(f, "could not decode response: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn not_found() {
        assert!(Error::http(404, "The resource could not be found.")
            .is_not_found());
        assert!(!Error::http(401, "Invalid API key").is_not_found());
        assert!(!Error::from(ErrorKind::Transport("refused".to_string()))
            .is_not_found());
    }

    #[test]
    fn display() {
        let err = Error::http(401, "Invalid API key: You must be granted a \
                                   valid key.");
        assert_eq!(
            err.to_string(),
            "HTTP status 401: Invalid API key: You must be granted a valid key."
        );
        assert_eq!(
            Error::unknown_id("xyz").to_string(),
            "unrecognized movie identifier: 'xyz'"
        );
    }
}
