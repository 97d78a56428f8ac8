pub mod pauli;
mod phase_factor;

pub use pauli::PauliOperator;
pub use phase_factor::PhaseFactor;
