use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Custom error type for tableau operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error for invalid qubit index.
    #[error("Qubit index {0} is out of bounds for {1} qubits.")]
    QubitIndexOutOfBounds(usize, usize),

    /// Error for operators or tableaux of mismatched width.
    #[error("Operator acts on {0} qubits, but {1} qubits were expected.")]
    DimensionMismatch(usize, usize),

    /// Fatal error for an operation the data structure cannot support.
    #[error(
        "{caller} cannot run on a {structure} holding {rank} stabilizer rows on {nqubits} qubits; use a mixed-rank tableau instead."
    )]
    BadDataStructure {
        caller: &'static str,
        structure: &'static str,
        rank: usize,
        nqubits: usize,
    },

    /// Error for rows that violate the commutation structure of the target
    /// tableau kind.
    #[error("Invalid tableau: {0}")]
    InvalidTableau(String),

    /// Error while parsing a Pauli operator or a tableau from a string.
    #[error("Pauli parsing error: {0}")]
    PauliParsing(String),
}
