//! Declarative command-line argument tables.
//!
//! A program describes its options as an ordered table of typed slots,
//! parses `argv` against it once, then reads the matched values back out
//! of each slot:
//!
//! ```
//! use argtable::{ArgTable, Int, Lit, ParseConfig, Str};
//!
//! let mut table = ArgTable::new(20)?;
//! let verbose = table.add(Lit::new("v", "verbose", 0, 3, "more output"));
//! let level = table.add(Int::optional("l", "level", "<n>", "compression level")?);
//! let files = table.add(Str::new(None, None, "<file>", 1, 10, "input files")?);
//!
//! let argv = ["prog", "-vv", "--level=0x9", "a.txt", "b.txt"];
//! assert_eq!(table.parse_with(&argv, &ParseConfig::default()), 0);
//! assert_eq!(table[verbose].count, 2);
//! assert_eq!(table[level].values(), [9]);
//! assert_eq!(table[files].values(), ["a.txt", "b.txt"]);
//! # Ok::<(), argtable::Error>(())
//! ```
//!
//! Parse problems never abort a parse. They are collected by the table's
//! end-marker and can be rendered with [`ArgTable::print_errors`].
//! Multi-command programs layer a [`Registry`] on top.

mod arg;
mod cmd;
mod csi;
mod date;
mod dbl;
mod dstr;
mod end;
mod error;
mod file;
mod int;
mod lit;
mod num;
mod parse;
mod rem;
mod report;
mod rex;
mod sort;
mod str;
mod table;
mod utils;

pub use arg::{Arg, Header};
pub use cmd::{CmdContext, CmdFn, CmdInfo, Cursor, Invocation, Module, Registry};
pub use csi::{parse_csi, Csi};
pub use date::{parse_date, Date};
pub use dbl::Dbl;
pub use dstr::{DStr, FreeFn, Text, DSTR_SIZE};
pub use end::{End, ErrorRecord};
pub use error::{Error, ErrorCode, Result, ScanError};
pub use file::{basename, extension, File};
pub use int::Int;
pub use lit::Lit;
pub use num::{scan_int, strtol, strtol0x, to_i32};
pub use parse::ParseConfig;
pub use rem::Rem;
pub use report::print_option;
pub use rex::Rex;
pub use sort::mgsort;
pub use str::Str;
pub use table::{ArgTable, Key};
pub use utils::{reset_panic, set_panic, PanicFn};
