use std::fmt;
use std::io::{self, Write};

/// The single place that decides where user facing messages go.
///
/// Results are written to the "out" writer and error messages to the "err"
/// writer. In normal operation both are stdout, so that a failed lookup looks
/// exactly like a successful one to anything reading the output. Tests give
/// each stream its own buffer.
#[derive(Debug)]
pub struct Reporter<O, E> {
    out: O,
    err: E,
}

impl Reporter<io::Stdout, io::Stdout> {
    /// Create a reporter that writes both results and errors to stdout.
    pub fn stdout() -> Reporter<io::Stdout, io::Stdout> {
        Reporter::new(io::stdout(), io::stdout())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    /// Create a reporter with separate result and error writers.
    pub fn new(out: O, err: E) -> Reporter<O, E> {
        Reporter { out, err }
    }

    /// Write one line of regular output.
    pub fn info<T: fmt::Display>(&mut self, msg: T) -> io::Result<()> {
        writeln!(self.out, "{}", msg)?;
        self.out.flush()
    }

    /// Write one line of error output.
    pub fn error<T: fmt::Display>(&mut self, msg: T) -> io::Result<()> {
        writeln!(self.err, "{}", msg)?;
        self.err.flush()
    }

    /// Return the writer for regular output, e.g., to write a table.
    pub fn out(&mut self) -> &mut O {
        &mut self.out
    }

    /// Consume this reporter and return its writers.
    #[cfg(test)]
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::Reporter;

    #[test]
    fn separate_streams() {
        let mut report = Reporter::new(vec![], vec![]);
        report.info("found it").unwrap();
        report.error(format_args!("lost {}", 2)).unwrap();
        report.info(42).unwrap();

        let (out, err) = report.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "found it\n42\n");
        assert_eq!(String::from_utf8(err).unwrap(), "lost 2\n");
    }
}
