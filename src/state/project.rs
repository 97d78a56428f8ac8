use crate::error::{Error, Result};
use crate::state::canonical::{self, StabRows};
use crate::state::decompose;
use crate::state::{Destabilizer, MixedDestabilizer, MixedStabilizer, Stabilizer};
use crate::tableau::Tableau;
use crate::types::{PauliOperator, PhaseFactor};
use std::ops::Range;

/// Options for eigenspace projection.
///
/// `keep_result` asks for the eigen-sign of an operator already in the
/// group (on a plain [`Stabilizer`] it costs a canonicalization); `phases`
/// switches phase tracking in the row updates.
#[derive(Debug, Clone, Copy)]
pub struct ProjectOpts {
    pub keep_result: bool,
    pub phases: bool,
}

impl Default for ProjectOpts {
    fn default() -> Self {
        Self {
            keep_result: true,
            phases: true,
        }
    }
}

/// Outcome of projecting a state on an eigenspace of a Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    /// Stabilizer-local index of the row that anticommuted with the
    /// projected operator, if one was found.
    pub anticommutes: Option<usize>,
    /// Eigen-sign of the operator when it is already in the stabilizer
    /// group; `None` is the not-in-group signal.
    pub result: Option<PhaseFactor>,
}

/// Eigenspace projection over the tableau variants.
pub trait Projective {
    fn n_qubits(&self) -> usize;

    /// Projects the state on an eigenspace of `pauli`, mutating the tableau
    /// in place.
    ///
    /// When a stabilizer row anticommutes with `pauli`, that row is replaced
    /// by `pauli` itself and its phase is deliberately NOT randomized even
    /// though a faithful measurement would randomize it; the caller supplies
    /// the measurement outcome.
    fn project_with(&mut self, pauli: &PauliOperator, opts: ProjectOpts) -> Result<Projection>;

    fn project(&mut self, pauli: &PauliOperator) -> Result<Projection> {
        self.project_with(pauli, ProjectOpts::default())
    }

    /// Projects on an eigenspace of X on one qubit.
    fn project_x(&mut self, qubit: usize) -> Result<Projection> {
        let pauli = PauliOperator::single_x(self.n_qubits(), qubit)?;
        self.project(&pauli)
    }

    /// Projects on an eigenspace of Y on one qubit.
    fn project_y(&mut self, qubit: usize) -> Result<Projection> {
        let pauli = PauliOperator::single_y(self.n_qubits(), qubit)?;
        self.project(&pauli)
    }

    /// Projects on an eigenspace of Z on one qubit.
    fn project_z(&mut self, qubit: usize) -> Result<Projection> {
        let pauli = PauliOperator::single_z(self.n_qubits(), qubit)?;
        self.project(&pauli)
    }
}

fn ensure_width(pauli: &PauliOperator, nqubits: usize) -> Result<()> {
    if pauli.n_qubits() != nqubits {
        return Err(Error::DimensionMismatch(pauli.n_qubits(), nqubits));
    }
    Ok(())
}

/// First row of `tab` in `range` that anticommutes with `pauli`.
fn first_anticommuting(
    tab: &Tableau,
    range: Range<usize>,
    pauli: &PauliOperator,
) -> Option<usize> {
    range.into_iter().find(|&i| tab.anticommutes(i, pauli))
}

/// Projection over the first `rows` rows of a plain stabilizer block.
///
/// With an anticommuting pivot the offending rows are merged into the pivot
/// and the pivot is overwritten with `pauli`; otherwise membership is
/// settled by canonicalizing and reducing a copy of `pauli`.
fn project_generators(
    tab: &mut Tableau,
    rows: usize,
    pauli: &PauliOperator,
    opts: ProjectOpts,
) -> Projection {
    match first_anticommuting(tab, 0..rows, pauli) {
        None => {
            let result = if opts.keep_result {
                canonical::canonicalize(
                    &mut StabRows {
                        tab: &mut *tab,
                        rows,
                    },
                    opts.phases,
                );
                let mut reduced = pauli.clone();
                decompose::decompose_prefix(tab, rows, &mut reduced, opts.phases, false)
                    .map(|_| reduced.phase())
            } else {
                None
            };
            Projection {
                anticommutes: None,
                result,
            }
        }
        Some(pivot) => {
            for i in pivot + 1..rows {
                if tab.anticommutes(i, pauli) {
                    tab.mul_left(i, pivot, opts.phases);
                }
            }
            tab.set_row(pivot, pauli);
            Projection {
                anticommutes: Some(pivot),
                result: None,
            }
        }
    }
}

/// Phase of `pauli` as an element of the stabilizer group, read off the
/// destabilizer expansion: whenever destabilizer row i anticommutes with
/// `pauli`, stabilizer row i is multiplied into an identity accumulator
/// seeded with `pauli`'s phase. O(n²), since the destabilizer supplies the
/// expansion coefficients directly.
fn destab_expansion_phase(
    tab: &Tableau,
    rank: usize,
    stab_offset: usize,
    pauli: &PauliOperator,
    phases: bool,
) -> PhaseFactor {
    let mut accumulator = PauliOperator::zero(pauli.n_qubits());
    accumulator.set_phase(pauli.phase());
    for i in 0..rank {
        if tab.anticommutes(i, pauli) {
            tab.mul_row_into(stab_offset + i, &mut accumulator, phases);
        }
    }
    accumulator.phase()
}

/// Left-multiplies the pivot stabilizer row (tableau row `n + pivot`) into
/// every `pauli`-anticommuting row of the logical blocks, the stabilizer
/// rows past the pivot, and the destabilizer block. Destabilizer rows are
/// updated without phase tracking: their phases are not physical.
fn anticomm_update_rows(
    tab: &mut Tableau,
    pauli: &PauliOperator,
    rank: usize,
    nqubits: usize,
    pivot: usize,
    phases: bool,
) {
    let pivot_row = nqubits + pivot;
    for i in rank..nqubits {
        if tab.anticommutes(i, pauli) {
            tab.mul_left(i, pivot_row, phases);
        }
    }
    for i in pivot_row + 1..2 * nqubits {
        if tab.anticommutes(i, pauli) {
            tab.mul_left(i, pivot_row, phases);
        }
    }
    for i in 0..rank {
        if i != pivot && tab.anticommutes(i, pauli) {
            tab.mul_left(i, pivot_row, false);
        }
    }
}

impl Projective for Stabilizer {
    fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// O(n³) when the operator commutes with every row and `keep_result` is
    /// set (a canonicalization runs), O(n²) otherwise.
    fn project_with(&mut self, pauli: &PauliOperator, opts: ProjectOpts) -> Result<Projection> {
        ensure_width(pauli, self.n_qubits())?;
        let rows = self.tab.len();
        Ok(project_generators(&mut self.tab, rows, pauli, opts))
    }
}

impl Projective for Destabilizer {
    fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// O(n²): the destabilizer block replaces the canonicalization that the
    /// plain stabilizer path needs for membership results.
    ///
    /// Fails with [`Error::BadDataStructure`] when the operator commutes
    /// with every stabilizer row but the pair set is underdetermined
    /// (rank < n): such a tableau cannot distinguish "in group" from
    /// "logical" in sub-cubic time.
    fn project_with(&mut self, pauli: &PauliOperator, opts: ProjectOpts) -> Result<Projection> {
        ensure_width(pauli, self.n_qubits())?;
        let rank = self.rank();
        let nqubits = self.n_qubits();
        match first_anticommuting(&self.tab, rank..2 * rank, pauli) {
            None => {
                if rank != nqubits {
                    return Err(Error::BadDataStructure {
                        caller: "project_with",
                        structure: "Destabilizer",
                        rank,
                        nqubits,
                    });
                }
                let result = opts
                    .keep_result
                    .then(|| destab_expansion_phase(&self.tab, rank, rank, pauli, opts.phases));
                Ok(Projection {
                    anticommutes: None,
                    result,
                })
            }
            Some(pivot) => {
                let local = pivot - rank;
                for i in pivot + 1..2 * rank {
                    if self.tab.anticommutes(i, pauli) {
                        self.tab.mul_left(i, pivot, opts.phases);
                    }
                }
                for i in 0..rank {
                    if i != local && self.tab.anticommutes(i, pauli) {
                        self.tab.mul_left(i, pivot, false);
                    }
                }
                self.tab.copy_row_within(local, pivot);
                self.tab.set_row(pivot, pauli);
                Ok(Projection {
                    anticommutes: Some(local),
                    result: None,
                })
            }
        }
    }
}

impl Projective for MixedStabilizer {
    fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// Delegates to the plain stabilizer projection on the active prefix,
    /// then grows the rank when the operator turns out to be a new
    /// independent generator.
    fn project_with(&mut self, pauli: &PauliOperator, opts: ProjectOpts) -> Result<Projection> {
        ensure_width(pauli, self.n_qubits())?;
        let outcome = project_generators(&mut self.tab, self.rank, pauli, opts);
        // a full-rank group already contains every commuting operator
        if outcome.anticommutes.is_none()
            && outcome.result.is_none()
            && self.rank < self.n_qubits()
        {
            self.tab.set_row(self.rank, pauli);
            if opts.keep_result {
                self.rank += 1;
            } else {
                // membership was never settled; the appended row survives
                // canonicalization exactly when it was independent
                canonical::canonicalize(
                    &mut StabRows {
                        tab: &mut self.tab,
                        rows: self.rank + 1,
                    },
                    opts.phases,
                );
                if !self.tab.row_is_identity(self.rank) {
                    self.rank += 1;
                }
            }
        }
        Ok(outcome)
    }
}

impl Projective for MixedDestabilizer {
    fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// Three disjoint cases: an anticommuting stabilizer row (replace it),
    /// an anticommuting logical operator (grow the rank by promoting the
    /// pair across the partition boundary), or full membership (read the
    /// eigen-sign off the destabilizer expansion).
    fn project_with(&mut self, pauli: &PauliOperator, opts: ProjectOpts) -> Result<Projection> {
        ensure_width(pauli, self.n_qubits())?;
        let nqubits = self.n_qubits();
        let rank = self.rank;
        match first_anticommuting(&self.tab, nqubits..nqubits + rank, pauli) {
            Some(pivot) => {
                let local = pivot - nqubits;
                anticomm_update_rows(&mut self.tab, pauli, rank, nqubits, local, opts.phases);
                self.tab.copy_row_within(local, pivot);
                self.tab.set_row(pivot, pauli);
                Ok(Projection {
                    anticommutes: Some(local),
                    result: None,
                })
            }
            None => {
                let anticomlog = first_anticommuting(&self.tab, rank..nqubits, pauli)
                    .or_else(|| {
                        first_anticommuting(&self.tab, nqubits + rank..2 * nqubits, pauli)
                    });
                match anticomlog {
                    Some(found) => {
                        // stage the anticommuting logical at the incoming
                        // stabilizer slot; it pivots the re-orthogonalization
                        // and then drops into the new destabilizer slot
                        if found < nqubits {
                            self.tab.row_swap(rank + nqubits, found);
                            if nqubits != rank + 1 && found != rank {
                                self.tab.row_swap(rank, found + nqubits);
                            }
                        } else {
                            self.tab.row_swap(rank, found - nqubits);
                            self.tab.row_swap(rank + nqubits, found);
                        }
                        anticomm_update_rows(
                            &mut self.tab,
                            pauli,
                            rank + 1,
                            nqubits,
                            rank,
                            opts.phases,
                        );
                        self.rank += 1;
                        self.tab.copy_row_within(rank, nqubits + rank);
                        self.tab.set_row(nqubits + rank, pauli);
                        Ok(Projection {
                            anticommutes: None,
                            result: None,
                        })
                    }
                    None => {
                        let result = opts.keep_result.then(|| {
                            destab_expansion_phase(&self.tab, rank, nqubits, pauli, opts.phases)
                        });
                        Ok(Projection {
                            anticommutes: None,
                            result,
                        })
                    }
                }
            }
        }
    }
}
