use crate::arg::{arg_accessors, Arg, Header};
use crate::error::ScanError;
use crate::utils::xfilled;

/// A string option or positional argument.
#[derive(Debug)]
pub struct Str {
    hdr: Header,
    pub count: usize,
    pub sval: Vec<String>,
}

impl Str {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        let datatype = datatype.into().unwrap_or("<string>");
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        Ok(Str {
            sval: xfilled(String::new(), hdr.maxcount)?,
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

    pub fn values(&self) -> &[String] {
        &self.sval[..self.count]
    }
}

impl Arg for Str {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(slot = ?self.hdr.datatype, "str reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(argval) = argval {
            self.sval[self.count] = argval.to_string();
        }
        self.count += 1;
        tracing::trace!(count = self.count, "str scan");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dstr::DStr;
    use crate::utils::with_quiet_handler;

    #[test]
    fn stores_in_order() {
        let mut s = Str::new(None, None, None, 1, 2, None).unwrap();
        s.scan(Some("a")).unwrap();
        s.scan(Some("b")).unwrap();
        assert_eq!(s.scan(Some("c")), Err(ScanError::MaxCount));
        assert_eq!(s.values(), ["a", "b"]);
        s.reset();
        assert!(s.values().is_empty());
    }

    #[test]
    fn excess_message_names_value() {
        let s = Str::optional("o", "output", "<path>", None).unwrap();
        let mut ds = DStr::new();
        s.error(&mut ds, ScanError::MaxCount, Some("b.txt"), "prog");
        assert_eq!(ds.as_str(), "prog: excess option -o|--output=b.txt\n");
    }

    #[test]
    fn oversized_slot_is_refused() {
        let s = with_quiet_handler(|| Str::new(None, None, None, 0, usize::MAX / 2, None));
        assert!(matches!(s, Err(crate::Error::OutOfMemory)));
    }
}
