use crate::arg::{arg_accessors, Arg, Header};
use crate::dstr::DStr;
use crate::error::ScanError;
use crate::num::{scan_int, to_i32};
use crate::report::print_option;
use crate::utils::xfilled;

/// A comma separated tuple of exactly `num_vals` integers per occurrence,
/// e.g. `--rgb=0xff,0x80,0`.
#[derive(Debug)]
pub struct Csi {
    hdr: Header,
    pub count: usize,
    pub num_vals: usize,
    /// `maxcount` rows of `num_vals` values each.
    pub ival: Vec<Vec<i32>>,
}

impl Csi {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        num_vals: usize,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        let datatype = datatype.into().unwrap_or("<int>,...");
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        Ok(Csi {
            ival: xfilled(xfilled(0, num_vals)?, hdr.maxcount)?,
            hdr,
            count: 0,
            num_vals,
        })
    }

    pub fn optional<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        num_vals: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        Self::new(shortopts, longopts, datatype, num_vals, 0, 1, glossary)
    }

    pub fn required<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        num_vals: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        Self::new(shortopts, longopts, datatype, num_vals, 1, 1, glossary)
    }

    pub fn values(&self) -> &[Vec<i32>] {
        &self.ival[..self.count]
    }
}

/// Split `argval` into exactly `num_vals` integers.
///
/// Nothing is returned unless every field parses, so a failed token never
/// leaves a half-written row behind.
pub fn parse_csi(argval: &str, num_vals: usize) -> Result<Vec<i32>, ScanError> {
    let mut vals = Vec::with_capacity(num_vals);
    let mut head = Some(argval);

    for _ in 0..num_vals {
        let field = match head {
            Some(h) if !h.is_empty() => h,
            _ => return Err(ScanError::NotEnough),
        };
        let (val, rest) = scan_int(field)?;
        vals.push(to_i32(val)?);

        let rest = rest.trim_start();
        head = if let Some(next) = rest.strip_prefix(',') {
            Some(next)
        } else if rest.is_empty() {
            None
        } else {
            return Err(ScanError::BadInt);
        };
    }

    // anything left over means more fields than asked for
    if head.is_some() {
        return Err(ScanError::TooMany);
    }
    Ok(vals)
}

impl Arg for Csi {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(slot = ?self.hdr.datatype, "csi reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(argval) = argval {
            self.ival[self.count] = parse_csi(argval, self.num_vals)?;
        }
        self.count += 1;
        tracing::trace!(count = self.count, "csi scan");
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
            ScanError::NotEnough => {
                crate::catf!(ds, "{}: not enough comma separated values seen ", progname);
                print_option(ds, short, long, Some(argval), "\n");
                crate::catf!(ds, "(need {})\n", self.num_vals);
            }
            ScanError::TooMany => {
                crate::catf!(ds, "{}: too many comma separated values seen ", progname);
                print_option(ds, short, long, Some(argval), "\n");
                crate::catf!(ds, "(need {})\n", self.num_vals);
            }
            _ => {
                if !self.hdr.count_error(ds, err, Some(argval), progname) {
                    crate::catf!(ds, "{}: {}\n", progname, err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_radix_fields() {
        assert_eq!(parse_csi("0x1A,0o17,0b101,42", 4), Ok(vec![26, 15, 5, 42]));
        assert_eq!(parse_csi(" -1, +2 ,0X0f", 3), Ok(vec![-1, 2, 15]));
    }

    #[test]
    fn field_count_errors() {
        assert_eq!(parse_csi("1,2", 3), Err(ScanError::NotEnough));
        assert_eq!(parse_csi("1,2,", 3), Err(ScanError::NotEnough));
        assert_eq!(parse_csi("1,2,3,4", 3), Err(ScanError::TooMany));
        assert_eq!(parse_csi("", 1), Err(ScanError::NotEnough));
    }

    #[test]
    fn field_value_errors() {
        assert_eq!(parse_csi("1,x,3", 3), Err(ScanError::BadInt));
        assert_eq!(parse_csi("1,2z,3", 3), Err(ScanError::BadInt));
        assert_eq!(parse_csi("1,4294967296", 2), Err(ScanError::Overflow));
    }

    #[test]
    fn failed_token_leaves_state_untouched() {
        let mut csi = Csi::new("p", "point", None, 2, 0, 2, None).unwrap();
        csi.scan(Some("1,2")).unwrap();
        assert_eq!(csi.scan(Some("3,99999999999")), Err(ScanError::Overflow));
        assert_eq!(csi.count, 1);
        assert_eq!(csi.ival[1], [0, 0]);
        csi.scan(Some("3,4")).unwrap();
        assert_eq!(csi.values(), [vec![1, 2], vec![3, 4]]);
        assert_eq!(csi.scan(Some("5,6")), Err(ScanError::MaxCount));
    }

    #[test]
    fn not_enough_message() {
        let csi = Csi::optional("p", None, None, 3, None).unwrap();
        let mut ds = DStr::new();
        csi.error(&mut ds, ScanError::NotEnough, Some("1,2"), "prog");
        assert_eq!(
            ds.as_str(),
            "prog: not enough comma separated values seen -p 1,2\n(need 3)\n"
        );
    }

    #[test]
    fn oversized_rows_are_refused() {
        let csi = crate::utils::with_quiet_handler(|| {
            Csi::new("p", None, None, usize::MAX / 2, 0, 1, None)
        });
        assert!(matches!(csi, Err(crate::Error::OutOfMemory)));
    }
}
