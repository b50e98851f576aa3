use regex::{Regex, RegexBuilder};

use crate::arg::{arg_accessors, Arg, Header};
use crate::dstr::DStr;
use crate::error::{Error, Result, ScanError};
use crate::report::print_option;
use crate::utils::xfilled;

/// A string option whose value must match a regular expression in full.
#[derive(Debug)]
pub struct Rex {
    hdr: Header,
    pub count: usize,
    pub sval: Vec<String>,
    regex: Regex,
}

impl Rex {
    /// Compile `pattern`; an invalid pattern is a construction error.
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        pattern: &'a str,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        icase: bool,
        glossary: impl Into<Option<&'a str>>,
    ) -> Result<Self> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .case_insensitive(icase)
            .build()
            .map_err(|source| Error::BadPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        let datatype = datatype.into().unwrap_or(pattern);
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        Ok(Rex {
            sval: xfilled(String::new(), hdr.maxcount)?,
            hdr,
            count: 0,
            regex,
        })
    }

    pub fn optional<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        pattern: &'a str,
        datatype: impl Into<Option<&'a str>>,
        icase: bool,
        glossary: impl Into<Option<&'a str>>,
    ) -> Result<Self> {
        Self::new(shortopts, longopts, pattern, datatype, 0, 1, icase, glossary)
    }

    pub fn required<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        pattern: &'a str,
        datatype: impl Into<Option<&'a str>>,
        icase: bool,
        glossary: impl Into<Option<&'a str>>,
    ) -> Result<Self> {
        Self::new(shortopts, longopts, pattern, datatype, 1, 1, icase, glossary)
    }

    pub fn values(&self) -> &[String] {
        &self.sval[..self.count]
    }
}

impl Arg for Rex {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(pattern = self.regex.as_str(), "rex reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> std::result::Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(argval) = argval {
            if !self.regex.is_match(argval) {
                return Err(ScanError::RegNoMatch);
            }
            self.sval[self.count] = argval.to_string();
        }
        self.count += 1;
        tracing::trace!(count = self.count, "rex scan");
        Ok(())
    }

    fn error(&self, ds: &mut DStr, err: ScanError, argval: Option<&str>, progname: &str) {
        if err == ScanError::RegNoMatch {
            crate::catf!(ds, "{}: illegal value ", progname);
            print_option(
                ds,
                self.hdr.shortopts.as_deref(),
                self.hdr.longopts.as_deref(),
                Some(argval.unwrap_or("")),
                "\n",
            );
        } else if !self.hdr.count_error(ds, err, argval, progname) {
            crate::catf!(ds, "{}: {}\n", progname, err);
        }
    }
}
