use crate::arg::{arg_accessors, Arg, Header};
use crate::error::ScanError;

/// A documentation-only row: shows up in syntax and glossary text but never
/// takes part in matching.
#[derive(Debug)]
pub struct Rem {
    hdr: Header,
    count: usize,
}

impl Rem {
    pub fn new<'a>(
        datatype: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> Self {
        Rem {
            hdr: Header::new(None, None, datatype, 1, 1, glossary),
            count: 0,
        }
    }
}

impl Arg for Rem {
    arg_accessors!();

    fn reset(&mut self) {}

    fn scan(&mut self, _argval: Option<&str>) -> Result<(), ScanError> {
        Ok(())
    }

    fn check(&self) -> Result<(), ScanError> {
        Ok(())
    }

    fn scans(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_scans_or_fails() {
        let rem = Rem::new("<pattern>", "a remark");
        assert!(!rem.scans());
        assert!(rem.check().is_ok());
        assert_eq!(rem.header().glossary.as_deref(), Some("a remark"));
    }
}
