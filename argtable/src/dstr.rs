//! Growable append-only text sink.
//!
//! Short contents set through [`Text::Volatile`] live in an inline buffer.
//! Appending moves the contents into a separate append buffer which is
//! over-allocated (at least 200 bytes, then twice the required size) so a
//! run of small appends costs amortized O(1). An append buffer that grew
//! past 500 bytes is dropped the next time the contents are replaced, so a
//! single large message does not pin its allocation forever.

use std::fmt;

use crate::utils::xstring;

/// Capacity of the inline buffer.
pub const DSTR_SIZE: usize = 200;

const START_VSNBUFF: usize = 16;
const APPEND_FLOOR: usize = 200;
const APPEND_SHRINK: usize = 500;

/// Release function for adopted buffers.
pub type FreeFn = fn(String);

/// Content handed to [`DStr::set`], tagged with its ownership mode.
pub enum Text<'a> {
    /// Adopted by reference; never released.
    Static(&'static str),
    /// Copied into the inline buffer, or into a fresh heap buffer if it does
    /// not fit.
    Volatile(&'a str),
    /// Adopted as is. When replaced or dropped the buffer goes to the free
    /// function if one is given, otherwise it is simply deallocated.
    Dynamic(String, Option<FreeFn>),
}

#[derive(Debug)]
enum Data {
    Inline,
    Static(&'static str),
    Dynamic(String, Option<FreeFn>),
    Append,
}

#[derive(Debug)]
pub struct DStr {
    data: Data,
    sbuf: [u8; DSTR_SIZE],
    slen: usize,
    append: String,
}

fn release(data: Data) {
    if let Data::Dynamic(buf, Some(free)) = data {
        free(buf);
    }
}

impl DStr {
    pub fn new() -> Self {
        DStr {
            data: Data::Inline,
            sbuf: [0; DSTR_SIZE],
            slen: 0,
            append: String::new(),
        }
    }

    /// Current contents. Valid until the next mutating call.
    pub fn as_str(&self) -> &str {
        match &self.data {
            Data::Inline => std::str::from_utf8(&self.sbuf[..self.slen]).unwrap_or_default(),
            Data::Static(s) => s,
            Data::Dynamic(s, _) => s,
            Data::Append => &self.append,
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the contents. The previous buffer is released only after the
    /// new one is installed.
    pub fn set(&mut self, text: Text<'_>) {
        let new = match text {
            Text::Static(s) => Data::Static(s),
            Text::Volatile(s) if s.len() <= DSTR_SIZE => {
                self.sbuf[..s.len()].copy_from_slice(s.as_bytes());
                self.slen = s.len();
                Data::Inline
            }
            Text::Volatile(s) => match xstring(s.len()) {
                Ok(mut buf) => {
                    buf.push_str(s);
                    Data::Dynamic(buf, None)
                }
                Err(_) => {
                    self.slen = 0;
                    Data::Inline
                }
            },
            Text::Dynamic(s, free) => Data::Dynamic(s, free),
        };
        let old = std::mem::replace(&mut self.data, new);
        release(old);
        if self.append.capacity() > APPEND_SHRINK {
            self.append = String::new();
        }
    }

    /// Append `s`.
    pub fn cat(&mut self, s: &str) {
        self.try_cat(s);
    }

    /// Append a single character.
    pub fn cat_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.try_cat(c.encode_utf8(&mut buf));
    }

    /// Append formatted text; see also the [`catf!`](crate::catf) macro.
    ///
    /// The output is rendered into a bounded scratch buffer first. When it
    /// does not fit, the scratch buffer is doubled and formatting is retried.
    /// If a `Display` impl reports an error the contents are left unchanged.
    pub fn catf(&mut self, args: fmt::Arguments<'_>) {
        if let Some(s) = args.as_str() {
            self.try_cat(s);
            return;
        }

        let mut n = START_VSNBUFF;
        loop {
            let buf = match xstring(n) {
                Ok(buf) => buf,
                Err(_) => return,
            };
            let mut scratch = Scratch {
                buf,
                limit: n,
                truncated: false,
            };
            match fmt::write(&mut scratch, args) {
                _ if scratch.truncated => n = n.saturating_mul(2),
                Ok(()) => {
                    self.try_cat(&scratch.buf);
                    return;
                }
                // A formatting impl failed on its own; nothing is appended.
                Err(_) => return,
            }
        }
    }

    /// Truncate to empty, releasing every heap buffer.
    pub fn reset(&mut self) {
        let old = std::mem::replace(&mut self.data, Data::Inline);
        release(old);
        self.slen = 0;
        self.append = String::new();
    }

    fn try_cat(&mut self, s: &str) -> bool {
        if s.is_empty() {
            return true;
        }
        if !self.setup_append(s.len()) {
            return false;
        }
        self.append.push_str(s);
        true
    }

    /// Make the append buffer the active data with room for `new_space`
    /// more bytes.
    fn setup_append(&mut self, new_space: usize) -> bool {
        let in_append = matches!(self.data, Data::Append);
        let used = self.as_str().len();
        let total = used.saturating_add(new_space);
        if total >= self.append.capacity() {
            let cap = if total < 100 {
                APPEND_FLOOR
            } else {
                total.saturating_mul(2)
            };
            let Ok(mut buf) = xstring(cap) else {
                return false;
            };
            buf.push_str(self.as_str());
            self.append = buf;
        } else if !in_append {
            let mut buf = std::mem::take(&mut self.append);
            buf.clear();
            buf.push_str(self.as_str());
            self.append = buf;
        }

        let old = std::mem::replace(&mut self.data, Data::Append);
        release(old);
        self.slen = 0;
        true
    }
}

impl Default for DStr {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DStr {
    fn drop(&mut self) {
        let old = std::mem::replace(&mut self.data, Data::Inline);
        release(old);
    }
}

impl fmt::Write for DStr {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.try_cat(s) {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}

impl fmt::Display for DStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatting target that refuses to grow past `limit` bytes.
struct Scratch {
    buf: String,
    limit: usize,
    truncated: bool,
}

impl fmt::Write for Scratch {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.buf.len() + s.len() > self.limit {
            self.truncated = true;
            return Err(fmt::Error);
        }
        self.buf.push_str(s);
        Ok(())
    }
}

/// `catf!(ds, "{}: ", progname)` appends formatted text to a [`DStr`].
#[macro_export]
macro_rules! catf {
    ($ds:expr, $($arg:tt)*) => {
        $ds.catf(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{fail_allocation_after, with_quiet_handler};
    use std::cell::Cell;

    #[test]
    fn cat_then_reset() {
        let mut ds = DStr::new();
        ds.cat("ab");
        ds.cat("cd");
        assert_eq!(ds.as_str(), "abcd");
        ds.reset();
        assert_eq!(ds.as_str(), "");
        assert!(ds.is_empty());
    }

    #[test]
    fn many_small_appends_keep_content() {
        let mut ds = DStr::new();
        let mut expected = String::new();
        for i in 0..10_000 {
            let piece = format!("{},", i % 97);
            ds.cat(&piece);
            expected.push_str(&piece);
        }
        assert_eq!(ds.as_str(), expected);
    }

    #[test]
    fn cat_char_and_unicode() {
        let mut ds = DStr::new();
        ds.cat_char('x');
        ds.cat_char('é');
        ds.cat("!");
        assert_eq!(ds.as_str(), "xé!");
    }

    #[test]
    fn catf_retries_until_output_fits() {
        let mut ds = DStr::new();
        let long = "z".repeat(1000);
        catf!(ds, "{}: {} ({})", "prog", long, 42);
        assert_eq!(ds.as_str(), format!("prog: {} (42)", long));
        catf!(ds, "plain");
        assert!(ds.as_str().ends_with("(42)plain"));
    }

    #[test]
    fn write_macro_works() {
        use std::fmt::Write;
        let mut ds = DStr::new();
        write!(ds, "{}-{}", 1, 2).unwrap();
        assert_eq!(ds.to_string(), "1-2");
    }

    #[test]
    fn volatile_short_and_long() {
        let mut ds = DStr::new();
        ds.set(Text::Volatile("short"));
        assert_eq!(ds.as_str(), "short");

        let long = "y".repeat(DSTR_SIZE + 10);
        ds.set(Text::Volatile(&long));
        assert_eq!(ds.as_str(), long);
        ds.cat("!");
        assert_eq!(ds.len(), DSTR_SIZE + 11);
    }

    #[test]
    fn static_then_append() {
        let mut ds = DStr::new();
        ds.set(Text::Static("usage: "));
        ds.cat("prog");
        assert_eq!(ds.as_str(), "usage: prog");
    }

    thread_local! {
        static FREED: Cell<usize> = const { Cell::new(0) };
    }

    fn count_free(_: String) {
        FREED.with(|n| n.set(n.get() + 1));
    }

    fn freed() -> usize {
        FREED.with(Cell::get)
    }

    #[test]
    fn dynamic_buffer_released_once() {
        let before = freed();
        let mut ds = DStr::new();
        ds.set(Text::Dynamic("owned".to_string(), Some(count_free)));
        assert_eq!(ds.as_str(), "owned");
        ds.cat(" more");
        assert_eq!(ds.as_str(), "owned more");
        assert_eq!(freed(), before + 1);
        ds.reset();
        drop(ds);
        assert_eq!(freed(), before + 1);
    }

    #[test]
    fn dynamic_buffer_released_on_drop() {
        let before = freed();
        {
            let mut ds = DStr::new();
            ds.set(Text::Dynamic("kept".to_string(), Some(count_free)));
        }
        assert_eq!(freed(), before + 1);
    }

    #[test]
    fn small_append_buffer_is_reused() {
        let mut ds = DStr::new();
        ds.cat("first");
        let cap = ds.append.capacity();
        assert!(cap >= APPEND_FLOOR && cap <= APPEND_SHRINK);
        ds.set(Text::Static("x"));
        ds.cat("y");
        assert_eq!(ds.as_str(), "xy");
        assert_eq!(ds.append.capacity(), cap);
    }

    #[test]
    fn large_append_buffer_is_shrunk() {
        let mut ds = DStr::new();
        ds.cat(&"a".repeat(2000));
        assert!(ds.append.capacity() > APPEND_SHRINK);
        ds.set(Text::Volatile("b"));
        ds.cat("c");
        assert_eq!(ds.as_str(), "bc");
        assert!(ds.append.capacity() <= APPEND_SHRINK);
    }

    struct Failing;

    impl fmt::Display for Failing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn failing_display_appends_nothing() {
        let mut ds = DStr::new();
        ds.cat("keep");
        catf!(ds, "{} {}", 1, Failing);
        assert_eq!(ds.as_str(), "keep");
    }

    #[test]
    fn failed_growth_keeps_contents() {
        let mut ds = DStr::new();
        ds.cat("keep");
        with_quiet_handler(|| {
            fail_allocation_after(0);
            ds.cat(&"x".repeat(APPEND_FLOOR * 2));
        });
        assert_eq!(ds.as_str(), "keep");
        ds.cat("!");
        assert_eq!(ds.as_str(), "keep!");
    }
}
