//! Integer scanning with an explicit radix prefix grammar.
//!
//! A number is optional leading whitespace, an optional sign, then either
//! `0X` + hex digits, `0O` + octal digits, `0B` + binary digits (prefix
//! letters are case-insensitive) or plain decimal digits. Scanning stops at
//! the first character that is not a digit of the chosen radix and the
//! unconsumed remainder is handed back to the caller.

use crate::error::ScanError;

/// Scan a number that must carry the `0<x>` prefix, e.g. `-0x1f` for
/// `x = 'X'`, `radix = 16`.
///
/// Returns `None` when the prefix or the digits after it are missing.
pub fn strtol0x(s: &str, x: char, radix: u32) -> Option<(Result<i64, ScanError>, &str)> {
    let (negative, body) = split_sign(s);
    let mut chars = body.chars();
    if chars.next() != Some('0') {
        return None;
    }
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&x) => {}
        _ => return None,
    }
    digits(&body[2..], radix, negative)
}

/// Scan a prefix-less number in `radix`.
pub fn strtol(s: &str, radix: u32) -> Option<(Result<i64, ScanError>, &str)> {
    let (negative, body) = split_sign(s);
    digits(body, radix, negative)
}

/// Scan one integer trying hex, octal, binary and then decimal.
///
/// The first form whose prefix matches wins. On success the value and the
/// unconsumed remainder are returned; a value outside `i64` is `Overflow`.
pub fn scan_int(s: &str) -> Result<(i64, &str), ScanError> {
    let parsed = strtol0x(s, 'X', 16)
        .or_else(|| strtol0x(s, 'O', 8))
        .or_else(|| strtol0x(s, 'B', 2))
        .or_else(|| strtol(s, 10));
    match parsed {
        Some((Ok(v), rest)) => Ok((v, rest)),
        Some((Err(e), _)) => Err(e),
        None => Err(ScanError::BadInt),
    }
}

/// Narrow a scanned value to the native `int` range.
pub fn to_i32(v: i64) -> Result<i32, ScanError> {
    i32::try_from(v).map_err(|_| ScanError::Overflow)
}

fn split_sign(s: &str) -> (bool, &str) {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}

fn digits(s: &str, radix: u32, negative: bool) -> Option<(Result<i64, ScanError>, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }

    // Accumulate towards the sign so that i64::MIN is representable.
    let mut acc: Option<i64> = Some(0);
    for c in s[..end].chars() {
        let d = c.to_digit(radix).map(i64::from).unwrap_or(0);
        acc = acc.and_then(|a| a.checked_mul(i64::from(radix))).and_then(|a| {
            if negative {
                a.checked_sub(d)
            } else {
                a.checked_add(d)
            }
        });
    }
    Some((acc.ok_or(ScanError::Overflow), &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_forms() {
        assert_eq!(scan_int("0x1A").unwrap(), (26, ""));
        assert_eq!(scan_int("0o17").unwrap(), (15, ""));
        assert_eq!(scan_int("0B101").unwrap(), (5, ""));
        assert_eq!(scan_int("  -0X10,").unwrap(), (-16, ","));
        assert_eq!(scan_int("+0o7").unwrap(), (7, ""));
    }

    #[test]
    fn decimal_fallback() {
        assert_eq!(scan_int("42").unwrap(), (42, ""));
        assert_eq!(scan_int(" -7kb").unwrap(), (-7, "kb"));
        // "0x" with no hex digits falls through to decimal "0"
        assert_eq!(scan_int("0xg").unwrap(), (0, "xg"));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(scan_int("abc"), Err(ScanError::BadInt));
        assert_eq!(scan_int(""), Err(ScanError::BadInt));
        assert_eq!(scan_int("-"), Err(ScanError::BadInt));
    }

    #[test]
    fn detects_overflow() {
        assert_eq!(scan_int("99999999999999999999"), Err(ScanError::Overflow));
        assert_eq!(scan_int("-9223372036854775808").unwrap().0, i64::MIN);
        assert_eq!(to_i32(2_147_483_648), Err(ScanError::Overflow));
        assert_eq!(to_i32(-2_147_483_648), Ok(i32::MIN));
    }

    #[test]
    fn prefix_requires_zero() {
        assert!(strtol0x("x12", 'X', 16).is_none());
        assert!(strtol0x("0o12", 'X', 16).is_none());
    }
}
