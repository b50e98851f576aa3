use crate::arg::{arg_accessors, Arg, Header};
use crate::dstr::DStr;
use crate::error::ScanError;
use crate::report::print_option;
use crate::utils::xfilled;

/// A floating point option.
#[derive(Debug)]
pub struct Dbl {
    hdr: Header,
    pub count: usize,
    pub dval: Vec<f64>,
}

impl Dbl {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        let datatype = datatype.into().unwrap_or("<double>");
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        Ok(Dbl {
            dval: xfilled(0.0, hdr.maxcount)?,
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

    pub fn values(&self) -> &[f64] {
        &self.dval[..self.count]
    }
}

impl Arg for Dbl {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(slot = ?self.hdr.datatype, "dbl reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(argval) = argval {
            self.dval[self.count] = argval
                .trim_start()
                .parse::<f64>()
                .map_err(|_| ScanError::BadDouble)?;
        }
        self.count += 1;
        tracing::trace!(count = self.count, "dbl scan");
        Ok(())
    }

    fn error(&self, ds: &mut DStr, err: ScanError, argval: Option<&str>, progname: &str) {
        if err == ScanError::BadDouble {
            crate::catf!(
                ds,
                "{}: invalid argument \"{}\" to option ",
                progname,
                argval.unwrap_or("")
            );
            print_option(
                ds,
                self.hdr.shortopts.as_deref(),
                self.hdr.longopts.as_deref(),
                self.hdr.datatype.as_deref(),
                "\n",
            );
        } else if !self.hdr.count_error(ds, err, argval, progname) {
            crate::catf!(ds, "{}: {}\n", progname, err);
        }
    }
}
