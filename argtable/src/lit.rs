use crate::arg::{arg_accessors, Arg, Header};
use crate::error::ScanError;

/// A flag with no value; only its occurrences are counted.
#[derive(Debug)]
pub struct Lit {
    hdr: Header,
    pub count: usize,
}

impl Lit {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> Self {
        Lit {
            hdr: Header::new(shortopts, longopts, None, mincount, maxcount, glossary),
            count: 0,
        }
    }

    pub fn optional<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> Self {
        Self::new(shortopts, longopts, 0, 1, glossary)
    }

    pub fn required<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> Self {
        Self::new(shortopts, longopts, 1, 1, glossary)
    }
}

impl Arg for Lit {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(slot = ?self.hdr.shortopts, "lit reset");
        self.count = 0;
    }

    fn scan(&mut self, _argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        self.count += 1;
        tracing::trace!(count = self.count, "lit scan");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dstr::DStr;

    #[test]
    fn counts_up_to_maxcount() {
        let mut lit = Lit::new("v", "verbose", 0, 2, "more output");
        assert!(lit.scan(None).is_ok());
        assert!(lit.scan(None).is_ok());
        assert_eq!(lit.scan(None), Err(ScanError::MaxCount));
        assert_eq!(lit.count, 2);
        lit.reset();
        assert_eq!(lit.count(), 0);
    }

    #[test]
    fn required_flag_fails_check() {
        let lit = Lit::required("f", None, None);
        assert_eq!(lit.check(), Err(ScanError::MinCount));
    }

    #[test]
    fn missing_option_message() {
        let lit = Lit::required("f", "force", None);
        let mut ds = DStr::new();
        lit.error(&mut ds, ScanError::MinCount, None, "prog");
        assert_eq!(ds.as_str(), "prog: missing option -f|--force\n");
    }
}
