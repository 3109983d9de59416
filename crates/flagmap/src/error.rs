/// Failures reported by parsing and lookups.
///
/// Names and raw values are carried as UTF-8 regardless of the parser's text
/// representation so the error type stays the same for every parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// None of the requested spellings were seen on the command line.
    #[error("argument not found: {}", .candidates.join(", "))]
    ArgumentNotFound { candidates: Vec<String> },

    /// A registered required flag was absent. Carries the flag's long name.
    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),

    /// A raw value was present but could not be converted to the requested type.
    #[error("invalid value '{raw}' for '{flag}': expected {target} ({message})")]
    ParseFailure {
        flag: String,
        raw: String,
        target: &'static str,
        message: String,
    },
}

impl ParseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArgumentNotFound { .. })
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Non-throwing lookups.
///
/// Every accessor returns a `ParseResult`; these adapters let a call site turn
/// a miss into a sentinel while still surfacing the other failures.
pub trait LookupExt<T> {
    /// Map `ArgumentNotFound` to `T::default()`.
    fn or_default_if_missing(self) -> ParseResult<T>
    where
        T: Default;

    /// Map `ArgumentNotFound` to `None`.
    fn found(self) -> ParseResult<Option<T>>;
}

impl<T> LookupExt<T> for ParseResult<T> {
    fn or_default_if_missing(self) -> ParseResult<T>
    where
        T: Default,
    {
        match self {
            Err(err) if err.is_not_found() => Ok(T::default()),
            other => other,
        }
    }

    fn found(self) -> ParseResult<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
