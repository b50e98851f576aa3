use crate::arg::{arg_accessors, Arg, Header};
use crate::dstr::DStr;
use crate::error::{ErrorCode, ScanError};
use crate::utils::xvec;

/// One diagnostic collected during a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub code: ErrorCode,
    /// Table index of the offending slot; `None` when the error belongs to
    /// the table itself (unknown option, stray token, ...).
    pub slot: Option<usize>,
    /// The offending token, if any.
    pub argval: Option<String>,
}

/// The end-marker: terminates a table and collects up to `maxcount` errors.
#[derive(Debug)]
pub struct End {
    hdr: Header,
    count: usize,
    records: Vec<ErrorRecord>,
    dropped: usize,
}

impl End {
    pub fn new(maxerrors: usize) -> crate::Result<Self> {
        let mut hdr = Header::new(None, None, None, 0, maxerrors, None);
        hdr.terminator = true;
        Ok(End {
            records: xvec(hdr.maxcount)?,
            hdr,
            count: 0,
            dropped: 0,
        })
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Errors discarded because the end-marker was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Record an error. Once full, further errors are counted but not kept.
    pub fn push(&mut self, code: ErrorCode, slot: Option<usize>, argval: Option<&str>) -> bool {
        if self.count >= self.hdr.maxcount {
            self.dropped += 1;
            tracing::debug!(?code, dropped = self.dropped, "error capacity exhausted");
            return false;
        }
        self.records.push(ErrorRecord {
            code,
            slot,
            argval: argval.map(str::to_string),
        });
        self.count += 1;
        true
    }

    /// Render a table-level error code.
    pub fn describe(&self, ds: &mut DStr, code: ErrorCode, argval: Option<&str>, progname: &str) {
        let argval = argval.unwrap_or("");
        crate::catf!(ds, "{}: ", progname);
        match code {
            ErrorCode::Limit => ds.cat("too many errors to display"),
            ErrorCode::Malloc => ds.cat("insufficient memory"),
            ErrorCode::NoMatch => crate::catf!(ds, "unexpected argument \"{}\"", argval),
            ErrorCode::MissArg => crate::catf!(ds, "option \"{}\" requires an argument", argval),
            ErrorCode::LongOpt => crate::catf!(ds, "invalid option \"{}\"", argval),
            ErrorCode::ShortOpt(c) => crate::catf!(ds, "invalid option \"-{}\"", c),
            ErrorCode::UnwantedValue => {
                crate::catf!(ds, "option \"{}\" does not take an argument", argval)
            }
            ErrorCode::Scan(e) => crate::catf!(ds, "{}", e),
        }
        ds.cat_char('\n');
    }
}

impl Arg for End {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!("end reset");
        self.count = 0;
        self.dropped = 0;
        self.records.clear();
    }

    fn scan(&mut self, _argval: Option<&str>) -> Result<(), ScanError> {
        Ok(())
    }

    fn check(&self) -> Result<(), ScanError> {
        Ok(())
    }

    fn error(&self, ds: &mut DStr, err: ScanError, argval: Option<&str>, progname: &str) {
        self.describe(ds, ErrorCode::Scan(err), argval, progname);
    }

    fn scans(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::with_quiet_handler;

    #[test]
    fn keeps_first_errors_when_full() {
        let mut end = End::new(2).unwrap();
        assert!(end.push(ErrorCode::LongOpt, None, Some("--a")));
        assert!(end.push(ErrorCode::LongOpt, None, Some("--b")));
        assert!(!end.push(ErrorCode::LongOpt, None, Some("--c")));
        assert_eq!(end.count(), 2);
        assert_eq!(end.dropped(), 1);
        assert_eq!(end.records()[1].argval.as_deref(), Some("--b"));

        end.reset();
        assert_eq!(end.count(), 0);
        assert!(end.records().is_empty());
        assert_eq!(end.dropped(), 0);
    }

    #[test]
    fn describes_table_errors() {
        let end = End::new(4).unwrap();
        let mut ds = DStr::new();
        end.describe(&mut ds, ErrorCode::NoMatch, Some("stray"), "prog");
        end.describe(&mut ds, ErrorCode::ShortOpt('q'), Some("-q"), "prog");
        end.describe(&mut ds, ErrorCode::MissArg, Some("--out"), "prog");
        assert_eq!(
            ds.as_str(),
            "prog: unexpected argument \"stray\"\n\
             prog: invalid option \"-q\"\n\
             prog: option \"--out\" requires an argument\n"
        );
    }

    #[test]
    fn is_a_terminator() {
        let end = End::new(0).unwrap();
        assert!(end.header().terminator);
        assert!(!end.scans());
    }

    #[test]
    fn unbounded_error_capacity_is_refused() {
        let end = with_quiet_handler(|| End::new(usize::MAX));
        assert!(matches!(end, Err(crate::Error::OutOfMemory)));
    }
}
