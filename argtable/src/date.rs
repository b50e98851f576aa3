use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use crate::arg::{arg_accessors, Arg, Header};
use crate::dstr::DStr;
use crate::error::ScanError;
use crate::utils::xfilled;

/// A date/time option parsed with a strptime-style format.
#[derive(Debug)]
pub struct Date {
    hdr: Header,
    pub format: String,
    pub count: usize,
    pub tmval: Vec<NaiveDateTime>,
}

impl Date {
    pub fn new<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        format: &'a str,
        datatype: impl Into<Option<&'a str>>,
        mincount: usize,
        maxcount: usize,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        let datatype = datatype.into().unwrap_or(format);
        let hdr = Header::new(shortopts, longopts, datatype, mincount, maxcount, glossary).with_value();
        Ok(Date {
            format: format.to_string(),
            count: 0,
            tmval: xfilled(NaiveDateTime::default(), hdr.maxcount)?,
            hdr,
        })
    }

    pub fn optional<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        format: &'a str,
        datatype: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        Self::new(shortopts, longopts, format, datatype, 0, 1, glossary)
    }

    pub fn required<'a>(
        shortopts: impl Into<Option<&'a str>>,
        longopts: impl Into<Option<&'a str>>,
        format: &'a str,
        datatype: impl Into<Option<&'a str>>,
        glossary: impl Into<Option<&'a str>>,
    ) -> crate::Result<Self> {
        Self::new(shortopts, longopts, format, datatype, 1, 1, glossary)
    }

    pub fn values(&self) -> &[NaiveDateTime] {
        &self.tmval[..self.count]
    }
}

/// Parse `s` against `format`, which must consume all of `s`.
///
/// Fields the format leaves out are taken from 1970-01-01 00:00, so `%Y-%m`
/// yields the first of the month and `%H:%M` a time on 1970-01-01.
pub fn parse_date(format: &str, s: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, s, StrftimeItems::new(format)).ok()?;
    if let Ok(dt) = parsed.to_naive_datetime_with_offset(0) {
        return Some(dt);
    }
    let date = resolve(&parsed, DATE_FILLS, Parsed::to_naive_date)?;
    let time = resolve(&parsed, TIME_FILLS, Parsed::to_naive_time)?;
    Some(date.and_time(time))
}

#[derive(Clone, Copy)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

/// Default sets tried in order until the parsed fields resolve.
const DATE_FILLS: &[&[Field]] = &[
    &[],
    &[Field::Day],
    &[Field::Month, Field::Day],
    &[Field::Year],
    &[Field::Year, Field::Day],
    &[Field::Year, Field::Month, Field::Day],
];
const TIME_FILLS: &[&[Field]] = &[&[], &[Field::Minute], &[Field::Hour, Field::Minute]];

fn resolve<T>(
    parsed: &Parsed,
    fills: &[&[Field]],
    to: impl Fn(&Parsed) -> ParseResult<T>,
) -> Option<T> {
    fills.iter().find_map(|fields| {
        let mut p = parsed.clone();
        for field in *fields {
            // setters refuse to overwrite a field the input already set
            let _ = match field {
                Field::Year => p.set_year(1970),
                Field::Month => p.set_month(1),
                Field::Day => p.set_day(1),
                Field::Hour => p.set_hour(0),
                Field::Minute => p.set_minute(0),
            };
        }
        to(&p).ok()
    })
}

impl Arg for Date {
    arg_accessors!();

    fn reset(&mut self) {
        tracing::trace!(format = %self.format, "date reset");
        self.count = 0;
    }

    fn scan(&mut self, argval: Option<&str>) -> Result<(), ScanError> {
        if self.count >= self.hdr.maxcount {
            return Err(ScanError::MaxCount);
        }
        if let Some(argval) = argval {
            self.tmval[self.count] = parse_date(&self.format, argval).ok_or(ScanError::BadDate)?;
        }
        self.count += 1;
        tracing::trace!(count = self.count, "date scan");
        Ok(())
    }

    fn error(&self, ds: &mut DStr, err: ScanError, argval: Option<&str>, progname: &str) {
        if err == ScanError::BadDate {
            crate::catf!(
                ds,
                "{}: illegal timestamp format \"{}\"\n",
                progname,
                argval.unwrap_or("")
            );
            crate::catf!(ds, "correct format is \"{}\"\n", self.format);
        } else if !self.hdr.count_error(ds, err, argval, progname) {
            crate::catf!(ds, "{}: {}\n", progname, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn full_timestamp() {
        let mut d = Date::optional("d", None, "%Y-%m-%dT%H:%M:%S", None, None).unwrap();
        d.scan(Some("2024-02-29T13:45:10")).unwrap();
        let v = d.values()[0];
        assert_eq!((v.year(), v.month(), v.day()), (2024, 2, 29));
        assert_eq!((v.hour(), v.minute(), v.second()), (13, 45, 10));
        assert_eq!(d.header().datatype.as_deref(), Some("%Y-%m-%dT%H:%M:%S"));
    }

    #[test]
    fn partial_formats() {
        let day = parse_date("%Y-%m-%d", "1999-12-31").unwrap();
        assert_eq!((day.year(), day.hour()), (1999, 0));
        let time = parse_date("%H:%M", "07:30").unwrap();
        assert_eq!((time.year(), time.hour(), time.minute()), (1970, 7, 30));
    }

    #[test]
    fn missing_fields_default_to_epoch_start() {
        let year = parse_date("%Y", "1999").unwrap();
        assert_eq!(year.to_string(), "1999-01-01 00:00:00");
        let month = parse_date("%Y-%m", "2024-02").unwrap();
        assert_eq!(month.to_string(), "2024-02-01 00:00:00");
        let hour = parse_date("%H", "07").unwrap();
        assert_eq!(hour.to_string(), "1970-01-01 07:00:00");
        let ordinal = parse_date("%Y-%j", "2023-032").unwrap();
        assert_eq!((ordinal.month(), ordinal.day()), (2, 1));
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert!(parse_date("%Y-%m-%d", "2023-02-30").is_none());
        assert!(parse_date("%Y-%m", "2024-13").is_none());
        assert!(parse_date("%Y", "1999 ").is_none());
    }

    #[test]
    fn rejects_mismatch_and_trailing_text() {
        let mut d = Date::new(None, "when", "%Y-%m-%d", None, 0, 2, None).unwrap();
        assert_eq!(d.scan(Some("31/12/1999")), Err(ScanError::BadDate));
        assert_eq!(d.scan(Some("1999-12-31 extra")), Err(ScanError::BadDate));
        assert_eq!(d.count, 0);
    }

    #[test]
    fn bad_date_message() {
        let d = Date::optional(None, "when", "%Y", None, None).unwrap();
        let mut ds = DStr::new();
        d.error(&mut ds, ScanError::BadDate, Some("soon"), "prog");
        assert_eq!(
            ds.as_str(),
            "prog: illegal timestamp format \"soon\"\ncorrect format is \"%Y\"\n"
        );
    }
}
