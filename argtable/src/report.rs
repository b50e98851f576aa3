//! Text rendering of option syntax, glossaries and collected errors.
//!
//! Nothing here wraps lines; callers that want a narrower layout can post
//! process the buffer.

use crate::arg::Arg;
use crate::dstr::DStr;
use crate::error::ErrorCode;
use crate::table::ArgTable;

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Render `-a|-b|--aaa|--bbb=<type>` with the given separator. With
/// `optvalue` the datatype is bracketed: `--color=[<when>]`.
fn cat_optionv(
    ds: &mut DStr,
    shortopts: Option<&str>,
    longopts: Option<&str>,
    datatype: Option<&str>,
    optvalue: bool,
    separator: &str,
) {
    let shortopts = non_empty(shortopts);
    let longopts = non_empty(longopts);

    if let Some(short) = shortopts {
        for (i, c) in short.chars().enumerate() {
            if i > 0 {
                ds.cat(separator);
            }
            ds.cat_char('-');
            ds.cat_char(c);
        }
    }

    if shortopts.is_some() && longopts.is_some() {
        ds.cat(separator);
    }

    if let Some(long) = longopts {
        for (i, name) in long.split(',').filter(|n| !n.is_empty()).enumerate() {
            if i > 0 {
                ds.cat(separator);
            }
            ds.cat("--");
            ds.cat(name);
        }
    }

    if let Some(datatype) = non_empty(datatype) {
        if longopts.is_some() {
            ds.cat_char('=');
        } else if shortopts.is_some() {
            ds.cat_char(' ');
        }
        if optvalue {
            crate::catf!(ds, "[{}]", datatype);
        } else {
            ds.cat(datatype);
        }
    }
}

/// Append one option in `-v|--verbose=<int>` form, followed by `suffix`.
pub fn print_option(
    ds: &mut DStr,
    shortopts: Option<&str>,
    longopts: Option<&str>,
    datatype: Option<&str>,
    suffix: &str,
) {
    cat_optionv(ds, shortopts, longopts, datatype, false, "|");
    ds.cat(suffix);
}

fn slot_syntax(slot: &dyn Arg, separator: &str) -> DStr {
    let hdr = slot.header();
    let mut syntax = DStr::new();
    cat_optionv(
        &mut syntax,
        hdr.shortopts.as_deref(),
        hdr.longopts.as_deref(),
        hdr.datatype.as_deref(),
        hdr.optional_value,
        separator,
    );
    syntax
}

impl ArgTable {
    /// Append the verbose syntax line: every slot, repeated once per
    /// mandatory occurrence, with optional occurrences in brackets.
    pub fn print_syntaxv(&self, ds: &mut DStr, suffix: &str) {
        for slot in self.slots() {
            let hdr = slot.header();
            let syntax = slot_syntax(slot, "|");
            let syntax = syntax.as_str();
            if syntax.is_empty() {
                continue;
            }

            for _ in 0..hdr.mincount {
                ds.cat_char(' ');
                ds.cat(syntax);
            }
            match hdr.maxcount.saturating_sub(hdr.mincount) {
                0 => {}
                1 => crate::catf!(ds, " [{}]", syntax),
                2 => crate::catf!(ds, " [{}] [{}]", syntax, syntax),
                _ => crate::catf!(ds, " [{}]...", syntax),
            }
        }
        ds.cat(suffix);
    }

    /// Append one `syntax  glossary` row per slot that has a glossary. The
    /// syntax column is `width` wide and indented by `indent` spaces.
    pub fn print_glossary(&self, ds: &mut DStr, indent: usize, width: usize) {
        for slot in self.slots() {
            let Some(glossary) = slot.header().glossary.as_deref() else {
                continue;
            };
            let syntax = slot_syntax(slot, ", ");
            crate::catf!(
                ds,
                "{:indent$}{:<width$} {}\n",
                "",
                syntax.as_str(),
                glossary,
                indent = indent,
                width = width
            );
        }
    }

    /// Append every error recorded by the last parse, in the order found.
    pub fn print_errors(&self, ds: &mut DStr, progname: &str) {
        let end = self.end();
        for rec in end.records() {
            let argval = rec.argval.as_deref();
            match (rec.code, rec.slot.and_then(|i| self.slot(i))) {
                (ErrorCode::Scan(err), Some(slot)) => slot.error(ds, err, argval, progname),
                (code, _) => end.describe(ds, code, argval, progname),
            }
        }
        if end.dropped() > 0 {
            end.describe(ds, ErrorCode::Limit, None, progname);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::Int;
    use crate::lit::Lit;
    use crate::rem::Rem;
    use crate::str::Str;

    fn option(short: Option<&str>, long: Option<&str>, datatype: Option<&str>) -> String {
        let mut ds = DStr::new();
        print_option(&mut ds, short, long, datatype, "");
        ds.as_str().to_string()
    }

    #[test]
    fn option_forms() {
        assert_eq!(option(Some("v"), Some("verbose"), None), "-v|--verbose");
        assert_eq!(option(Some("ab"), None, Some("<n>")), "-a|-b <n>");
        assert_eq!(option(None, Some("in,input"), Some("<file>")), "--in|--input=<file>");
        assert_eq!(option(Some("o"), Some("out"), Some("<file>")), "-o|--out=<file>");
        assert_eq!(option(None, None, Some("<file>")), "<file>");
        assert_eq!(option(Some(""), None, Some("x")), "x");
    }

    #[test]
    fn syntax_line() {
        let mut table = ArgTable::new(5).unwrap();
        table.add(Lit::optional("v", "verbose", None));
        table.add(Int::new("n", None, None, 0, 3, None).unwrap());
        table.add(Str::new(None, "color", "<when>", 0, 1, None).unwrap().optional_value());
        table.add(Str::new(None, None, "<file>", 1, 2, None).unwrap());
        table.add(Rem::new("[--]", None));

        let mut ds = DStr::new();
        table.print_syntaxv(&mut ds, "\n");
        assert_eq!(
            ds.as_str(),
            " [-v|--verbose] [-n <int>]... [--color=[<when>]] <file> [<file>] [--]\n"
        );
    }

    #[test]
    fn glossary_rows() {
        let mut table = ArgTable::new(5).unwrap();
        table.add(Lit::optional("h", "help", "print this help"));
        table.add(Int::optional("n", None, "<n>", None).unwrap());
        table.add(Rem::new("<file>", "input file"));

        let mut ds = DStr::new();
        table.print_glossary(&mut ds, 2, 12);
        assert_eq!(
            ds.as_str(),
            "  -h, --help   print this help\n  <file>       input file\n"
        );
    }

    #[test]
    fn errors_render_in_order() {
        let mut table = ArgTable::new(2).unwrap();
        let n = table.add(Int::required("n", None, None, None).unwrap());
        let argv = ["prog", "-n", "12x", "--what", "-q"];
        let nerrors = table.parse_with(&argv, &Default::default());
        assert_eq!(nerrors, 4);
        assert_eq!(table[n].count, 0);

        let mut ds = DStr::new();
        table.print_errors(&mut ds, "prog");
        assert_eq!(
            ds.as_str(),
            "prog: invalid argument \"12x\" to option -n <int>\n\
             prog: invalid option \"--what\"\n\
             prog: too many errors to display\n"
        );
    }
}
