use std::fmt;

/// Fatal errors: table construction, allocation policy and dispatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid regular expression {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("out of memory")]
    OutOfMemory,

    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BadPattern { .. } => 1,
            Error::OutOfMemory => 2,
            Error::UnknownCommand(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable error returned by a slot's `scan` or `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("too few occurrences")]
    MinCount,
    #[error("too many occurrences")]
    MaxCount,
    #[error("invalid integer")]
    BadInt,
    #[error("integer overflow")]
    Overflow,
    #[error("invalid floating point value")]
    BadDouble,
    #[error("invalid date")]
    BadDate,
    #[error("value does not match pattern")]
    RegNoMatch,
    #[error("not enough comma separated values")]
    NotEnough,
    #[error("too many comma separated values")]
    TooMany,
}

/// Error code recorded by the end-marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// More errors than the end-marker can hold.
    Limit,
    /// The parser could not allocate its working storage.
    Malloc,
    /// A positional token that no slot accepted.
    NoMatch,
    /// Unknown or ambiguous long option.
    LongOpt,
    /// An option that requires a value had none.
    MissArg,
    /// Unknown short option character.
    ShortOpt(char),
    /// `--name=value` given to an option that takes no value.
    UnwantedValue,
    Scan(ScanError),
}

impl From<ScanError> for ErrorCode {
    fn from(e: ScanError) -> Self {
        ErrorCode::Scan(e)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Limit => write!(f, "too many errors"),
            ErrorCode::Malloc => write!(f, "insufficient memory"),
            ErrorCode::NoMatch => write!(f, "unexpected argument"),
            ErrorCode::LongOpt => write!(f, "invalid option"),
            ErrorCode::MissArg => write!(f, "missing argument"),
            ErrorCode::ShortOpt(c) => write!(f, "invalid option -{}", c),
            ErrorCode::UnwantedValue => write!(f, "option takes no argument"),
            ErrorCode::Scan(e) => write!(f, "{}", e),
        }
    }
}
