use thiserror::Error;

pub type Result<T> = std::result::Result<T, FuzzyError>;

#[derive(Debug, Error)]
pub enum FuzzyError {
    #[error("invalid membership parameters for term '{term}': {reason}")]
    InvalidParameter { term: String, reason: String },
    #[error("invalid universe for variable '{variable}': {reason}")]
    InvalidUniverse { variable: String, reason: String },
    #[error("term '{term}' declared twice on variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },
    #[error("variable '{variable}' declared twice")]
    DuplicateVariable { variable: String },
    #[error("unknown variable '{variable}'")]
    UnknownVariable { variable: String },
    #[error("variable '{variable}' has no term '{term}'")]
    UnknownTerm { variable: String, term: String },
    #[error("AND/OR connective without operands")]
    EmptyConnective,
    #[error("engine declares no rules")]
    NoRules,
    #[error("no input supplied for variable '{variable}'")]
    MissingInput { variable: String },
    #[error("input for variable '{variable}' is not finite: {value}")]
    NonFiniteInput { variable: String, value: f64 },
    /// No rule fired anywhere on the consequent universe, so there is no
    /// area to defuzzify.
    #[error("aggregated fuzzy set of '{variable}' is empty; inputs fall outside rule coverage")]
    EmptyAggregate { variable: String },
    #[error("{field} out of domain: {value}")]
    OutOfDomainInput { field: &'static str, value: f64 },
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
