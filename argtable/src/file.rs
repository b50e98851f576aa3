use crate::arg::{arg_accessors, Arg, Header};
use crate::error::ScanError;
use crate::utils::xfilled;

/// A file path option. Each match also records the path's base name and
/// extension.
#[derive(Debug)]
pub struct File {
    hdr: Header,
    pub count: usize,
    /// Full path as given, e.g. `/home/foo.bar`.
    pub filename: Vec<String>,
    /// e.g. `foo.bar`
    pub basename: Vec<String>,
    /// e.g. `.bar`
    pub extension: Vec<String>,
}

impl File {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        let datatype = datatype.into().unwrap_or("<file>");
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        let n = hdr.maxcount;
        Ok(File {
            hdr,
            count: 0,
            filename: xfilled(String::new(), n)?,
            basename: xfilled(String::new(), n)?,
            extension: xfilled(String::new(), n)?,
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
        &self.filename[..self.count]
    }
}

/// The last path component; both `/` and `\` separate components.
pub fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// The extension of `basename` including its dot, or `""`.
///
/// A single leading dot (`.bashrc`) and a trailing dot (`foo.`) do not make
/// an extension.
pub fn extension(basename: &str) -> &str {
    match basename.rfind('.') {
        Some(0) | None => "",
        Some(pos) if pos + 1 == basename.len() => "",
        Some(pos) => &basename[pos..],
    }
}

impl Arg for File {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(slot = ?self.hdr.datatype, "file reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(path) = argval {
            let base = basename(path);
            self.extension[self.count] = extension(base).to_string();
            self.basename[self.count] = base.to_string();
            self.filename[self.count] = path.to_string();
        }
        self.count += 1;
        tracing::trace!(count = self.count, "file scan");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path() {
        assert_eq!(basename("/home/foo.bar"), "foo.bar");
        assert_eq!(basename("C:\\dir\\x.txt"), "x.txt");
        assert_eq!(basename("plain"), "plain");
        assert_eq!(basename("dir/"), "");
    }

    #[test]
    fn extension_rules() {
        assert_eq!(extension("foo.bar"), ".bar");
        assert_eq!(extension("a.tar.gz"), ".gz");
        assert_eq!(extension(".bashrc"), "");
        assert_eq!(extension("foo."), "");
        assert_eq!(extension("foo"), "");
        assert_eq!(extension(".."), "");
    }

    #[test]
    fn scan_fills_parallel_arrays() {
        let mut f = File::new(None, None, None, 1, 2, None).unwrap();
        f.scan(Some("/tmp/report.csv")).unwrap();
        f.scan(Some("notes")).unwrap();
        assert_eq!(f.values(), ["/tmp/report.csv", "notes"]);
        assert_eq!(f.basename[..2], ["report.csv", "notes"]);
        assert_eq!(f.extension[..2], [".csv", ""]);
        assert_eq!(f.scan(Some("x")), Err(ScanError::MaxCount));
    }
}
