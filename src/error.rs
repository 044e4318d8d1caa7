//! Error types for the Urna cryptographic core

/// Error types for the Urna cryptographic core
#[derive(Debug, thiserror::Error)]
pub enum UrnaCryptoError {
    /// A byte tree or marshalled object was structurally malformed
    #[error("Malformed byte tree: {0}")]
    MalformedTree(String),

    /// A declared length exceeded the hard cap configured for its type
    #[error("Length cap exceeded: {what} is {got} (max {max})")]
    LengthCapExceeded {
        what: &'static str,
        got: usize,
        max: usize,
    },

    /// A marshalled object carried a class id that is not registered
    #[error("Unknown class id: {0}")]
    UnknownClassId(String),

    /// An algorithm was named but is not one of the supported variants
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A parameter failed a (possibly probabilistic) sanity check
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A modulus failed the safe-prime test
    #[error("Modulus is not a safe prime")]
    NotSafePrime,

    /// A width parameter fell outside its permitted range
    #[error("Width {width} out of range [{min}, {max}]")]
    WidthOutOfRange {
        width: usize,
        min: usize,
        max: usize,
    },

    /// A PRG seed was shorter than the generator requires
    #[error("Seed too short: got {got} bytes, need at least {need}")]
    SeedTooShort { got: usize, need: usize },

    /// Reading from a random device failed
    #[error("Random device error: {0}")]
    Io(#[from] std::io::Error),

    /// A fatal configuration bug, e.g. an algorithm known by name but
    /// missing from the runtime crypto library
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type for Urna core operations
pub type Result<T> = std::result::Result<T, UrnaCryptoError>;
