use thiserror::Error;

/// errors raised while defining, tokenizing, parsing, or resolving C
/// declarations. all of these are terminal for the call that raised them -
/// parsing is deterministic, so retrying with the same input is pointless.
#[derive(Debug, Error)]
pub enum Error {
    /// a type spelling referenced a name the registry has never seen and
    /// that cannot be derived by stripping trailing `*`
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// the grammar required a literal token that was not there
    #[error("expected `{expected}`, found `{found}` parsing - {input}")]
    Malformed {
        expected: &'static str,
        found: String,
        input: String,
    },

    /// ran out of tokens mid-grammar
    #[error("no more tokens found parsing - {0}")]
    Exhausted(String),

    /// tokens remained after a complete declaration
    #[error("unexpected tokens at end of declaration in - {0}")]
    TrailingTokens(String),

    /// cursor rewound past the start of the token stream. indicates a
    /// parser bug rather than bad input
    #[error("pushed back too far parsing - {0}")]
    Rewind(String),

    /// the declared name is not present as a symbol in the loaded library
    #[error("symbol `{symbol}` not found in library")]
    SymbolNotFound {
        symbol: String,
        #[source]
        source: libloading::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
