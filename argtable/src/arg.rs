//! Slot header and the capability contract shared by every slot variant.

use std::any::Any;

use crate::dstr::DStr;
use crate::error::ScanError;
use crate::report::print_option;

/// Fields common to every slot.
#[derive(Debug, Clone, Default)]
pub struct Header {
    /// Terminates a table; only the end-marker sets it.
    pub terminator: bool,
    /// The option is followed by a value.
    pub has_value: bool,
    /// The value may be omitted (`--color` as well as `--color=auto`).
    pub optional_value: bool,
    /// Short option characters, e.g. `"vV"`.
    pub shortopts: Option<String>,
    /// Comma separated long option names, e.g. `"verbose,debug"`.
    pub longopts: Option<String>,
    /// Value placeholder shown in syntax and error text, e.g. `<file>`.
    pub datatype: Option<String>,
    pub glossary: Option<String>,
    pub mincount: usize,
    pub maxcount: usize,
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(str::to_string)
}

impl Header {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> Self {
        Header {
            terminator: false,
            has_value: false,
            optional_value: false,
            shortopts: owned(shortopts.into()),
            longopts: owned(longopts.into()),
            datatype: owned(datatype.into()),
            glossary: owned(glossary.into()),
            mincount,
            maxcount: maxcount.max(mincount),
        }
    }

    pub(crate) fn with_value(mut self) -> Self {
        self.has_value = true;
        self
    }

    /// A slot with neither short nor long options takes positional tokens.
    pub fn is_positional(&self) -> bool {
        self.shortopts.as_deref().map_or(true, str::is_empty)
            && self.longopts.as_deref().map_or(true, str::is_empty)
    }

    pub fn matches_short(&self, c: char) -> bool {
        self.shortopts.as_deref().is_some_and(|s| s.contains(c))
    }

    pub fn long_names(&self) -> impl Iterator<Item = &str> {
        self.longopts
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter(|n| !n.is_empty())
    }

    pub fn matches_long(&self, name: &str) -> bool {
        self.long_names().any(|n| n == name)
    }

    /// Shared "missing option" / "excess option" rendering.
    pub(crate) fn count_error(
        &self,
        ds: &mut DStr,
        err: ScanError,
        argval: Option<&str>,
        progname: &str,
    ) -> bool {
        let short = self.shortopts.as_deref();
        let long = self.longopts.as_deref();
        match err {
            ScanError::MinCount => {
                crate::catf!(ds, "{}: missing option ", progname);
                print_option(ds, short, long, self.datatype.as_deref(), "\n");
                true
            }
            ScanError::MaxCount => {
                crate::catf!(ds, "{}: excess option ", progname);
                print_option(ds, short, long, argval, "\n");
                true
            }
            _ => false,
        }
    }
}

/// The capability contract every slot implements.
///
/// The engine only talks to slots through this trait: `reset` before a
/// parse, `scan` once per matched token, `check` once after all tokens and
/// `error` when rendering diagnostics.
pub trait Arg: Any {
    fn header(&self) -> &Header;

    fn header_mut(&mut self) -> &mut Header;

    /// Successful matches since the last reset.
    fn count(&self) -> usize;

    fn reset(&mut self);

    /// Consume one matched token. `None` is passed for flags and for an
    /// omitted optional value. On success the value is stored at index
    /// `count` and `count` grows by one; on error nothing changes.
    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError>;

    fn check(&self) -> Result<(), ScanError> {
        if self.count() < self.header().mincount {
            Err(ScanError::MinCount)
        } else {
            Ok(())
        }
    }

    /// Render a diagnostic for `err` into `ds`.
    fn error(&self, ds: &mut DStr, err: ScanError, argval: Option<&str>, progname: &str) {
        if !self.header().count_error(ds, err, argval, progname) {
            crate::catf!(ds, "{}: {}\n", progname, err);
        }
    }

    /// Whether the slot takes part in matching at all.
    fn scans(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Let the value be omitted: `-c`, `-cVALUE`, `--name`, `--name=VALUE`.
    fn optional_value(mut self) -> Self
    where
        Self: Sized,
    {
        let hdr = self.header_mut();
        hdr.has_value = true;
        hdr.optional_value = true;
        self
    }
}

/// Implements the boilerplate accessors of [`Arg`] for a slot struct with
/// `hdr` and `count` fields.
macro_rules! arg_accessors {
    () => {
        fn header(&self) -> &$crate::arg::Header {
            &self.hdr
        }

        fn header_mut(&mut self) -> &mut $crate::arg::Header {
            &mut self.hdr
        }

        fn count(&self) -> usize {
            self.count
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

pub(crate) use arg_accessors;
