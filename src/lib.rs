//! # Stabilizer Tableau Engine
//!
//! A Rust library for manipulating stabilizer states in the tableau
//! representation, based on the formalism of arXiv:quant-ph/0406196.
//!
//! The crate provides four tableau data structures ([`Stabilizer`],
//! [`Destabilizer`], [`MixedStabilizer`], and [`MixedDestabilizer`]) and the
//! operations that project them on an eigenspace of a Pauli operator, trace
//! out qubits, and reset qubits to a chosen state, all implemented as
//! in-place GF(2) row manipulations on bit-packed storage.

pub mod error;
pub mod state;
pub mod tableau;
pub mod types;

pub use state::{Destabilizer, MixedDestabilizer, MixedStabilizer, Stabilizer};

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::state::{
        Destabilizer, MixedDestabilizer, MixedStabilizer, ProjectOpts, Projection, Projective,
        Stabilizer,
    };
    pub use crate::tableau::Tableau;
    pub use crate::types::{PauliOperator, PhaseFactor};
}
