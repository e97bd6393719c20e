use std::error;
use std::fmt::{self, Display, Formatter};

/// Error type for the plotexpr crate
///
/// Compilation runs two short-circuited phases: a lexical scan and a grammar
/// check. Each phase reports its own classification; an expression that
/// passes both phases cannot fail later, the evaluator maps runtime domain
/// problems to IEEE-754 `inf`/`NaN` instead of returning errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Error while scanning the expression into tokens
    Lexical(String),
    /// Error while checking the token sequence against the grammar
    Grammar(String),
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match *self {
            Self::Lexical(ref message) => write!(fmt, "LexicalError: {}", message),
            Self::Grammar(ref message) => write!(fmt, "GrammarError: {}", message),
        }
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        match *self {
            Self::Lexical(ref message) | Self::Grammar(ref message) => message,
        }
    }

    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            Self::Lexical(_) | Self::Grammar(_) => None,
        }
    }
}
