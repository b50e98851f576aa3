use crate::arg::{arg_accessors, Arg, Header};
use crate::dstr::DStr;
use crate::error::ScanError;
use crate::num::{scan_int, to_i32};
use crate::report::print_option;
use crate::utils::xfilled;

/// An integer option. Accepts `0x`, `0o` and `0b` prefixes and a `KB`, `MB`
/// or `GB` multiplier suffix.
#[derive(Debug)]
pub struct Int {
    hdr: Header,
    pub count: usize,
    /// One entry per permitted occurrence; pre-filled with zeros so a
    /// caller can seed defaults.
    pub ival: Vec<i32>,
}

impl Int {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        let datatype = datatype.into().unwrap_or("<int>");
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        Ok(Int {
            ival: xfilled(0, hdr.maxcount)?,
            hdr,
            count: 0,
        })
    }

    pub fn optional<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        Self::new(shortopts, longopts, datatype, 0, 1, glossary)
    }

    pub fn required<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        Self::new(shortopts, longopts, datatype, 1, 1, glossary)
    }

    /// Values matched by the last parse.
    pub fn values(&self) -> &[i32] {
        &self.ival[..self.count]
    }
}

/// Match `suffix` case-insensitively at the start of `s`, followed only by
/// whitespace.
fn detect_suffix(s: &str, suffix: &str) -> bool {
    let n = suffix.len();
    s.len() >= n
        && s.is_char_boundary(n)
        && s[..n].eq_ignore_ascii_case(suffix)
        && s[n..].trim().is_empty()
}

fn parse_int(argval: &str) -> Result<i32, ScanError> {
    let (val, rest) = scan_int(argval)?;
    let val = to_i32(val)?;

    let multiplier: i64 = if detect_suffix(rest, "KB") {
        1 << 10
    } else if detect_suffix(rest, "MB") {
        1 << 20
    } else if detect_suffix(rest, "GB") {
        1 << 30
    } else if detect_suffix(rest, "") {
        1
    } else {
        return Err(ScanError::BadInt);
    };
    to_i32(i64::from(val) * multiplier)
}

impl Arg for Int {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(slot = ?self.hdr.datatype, "int reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(argval) = argval {
            self.ival[self.count] = parse_int(argval)?;
        }
        self.count += 1;
        tracing::trace!(count = self.count, "int scan");
        Ok(())
    }

    fn error(&self, ds: &mut DStr, err: ScanError, argval: Option<&str>, progname: &str) {
        let short = self.hdr.shortopts.as_deref();
        let long = self.hdr.longopts.as_deref();
        let datatype = self.hdr.datatype.as_deref();
        let argval = argval.unwrap_or("");
        match err {
            ScanError::BadInt => {
                crate::catf!(ds, "{}: invalid argument \"{}\" to option ", progname, argval);
                print_option(ds, short, long, datatype, "\n");
            }
            ScanError::Overflow => {
                crate::catf!(ds, "{}: integer overflow at option ", progname);
                print_option(ds, short, long, datatype, " ");
                crate::catf!(ds, "({} is too large)\n", argval);
            }
            _ => {
                if !self.hdr.count_error(ds, err, Some(argval), progname) {
                    crate::catf!(ds, "{}: {}\n", progname, err);
                }
            }
        }
    }
}
