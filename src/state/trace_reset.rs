use crate::error::{Error, Result};
use crate::state::canonical::{self, DualRows, StabRows};
use crate::state::project::{ProjectOpts, Projective};
use crate::state::{MixedDestabilizer, MixedStabilizer, Stabilizer, ensure_qubits};
use crate::types::PhaseFactor;

impl Stabilizer {
    /// Traces out the given qubits: every generator with support there is
    /// rotated to the bottom by a restricted rref pass and overwritten with
    /// the identity. Returns the number of retained rows.
    ///
    /// Tracing out more qubits than the state has rank to lose is not
    /// detected; the caller must keep |qubits| within the current rank.
    pub fn trace_out(&mut self, qubits: &[usize], phases: bool) -> Result<usize> {
        ensure_qubits(self.n_qubits(), qubits)?;
        let rows = self.tab.len();
        let boundary = canonical::canonicalize_rref(
            &mut StabRows {
                tab: &mut self.tab,
                rows,
            },
            qubits,
            phases,
        );
        for row in boundary..rows {
            self.tab.zero_row(row);
        }
        Ok(boundary)
    }

    /// Replaces the reduced state on the given qubits with `newstate`,
    /// expanded so that its k-th qubit lands on `qubits[k]` (phases copied).
    ///
    /// Identity rows (for instance from an earlier [`Stabilizer::trace_out`])
    /// are compacted to the bottom, then the restricted rref pass frees the
    /// rows supported on `qubits`; the expanded rows of `newstate` are
    /// written there and any remaining freed rows become identities.
    pub fn reset_qubits(
        &mut self,
        newstate: &Stabilizer,
        qubits: &[usize],
        phases: bool,
    ) -> Result<()> {
        if newstate.n_qubits() != qubits.len() {
            return Err(Error::DimensionMismatch(newstate.n_qubits(), qubits.len()));
        }
        ensure_qubits(self.n_qubits(), qubits)?;
        let rows = self.tab.len();
        let mut active = 0;
        for row in 0..rows {
            if !self.tab.row_is_identity(row) {
                self.tab.row_swap(row, active);
                active += 1;
            }
        }
        let boundary = canonical::canonicalize_rref(
            &mut StabRows {
                tab: &mut self.tab,
                rows: active,
            },
            qubits,
            phases,
        );
        if boundary + newstate.len() > rows {
            return Err(Error::InvalidTableau(format!(
                "no room for {} reset rows past boundary {boundary}",
                newstate.len()
            )));
        }
        for k in 0..newstate.len() {
            let expanded = newstate.row(k).expand(qubits, self.n_qubits())?;
            self.tab.set_row(boundary + k, &expanded);
        }
        for row in boundary + newstate.len()..active {
            self.tab.zero_row(row);
        }
        Ok(())
    }
}

impl MixedStabilizer {
    /// Traces out the given qubits and sets the rank to the number of
    /// generators without support on them; the tail rows become scratch.
    ///
    /// Tracing out more qubits than the state has rank to lose is not
    /// detected; the caller must keep |qubits| within the current rank.
    pub fn trace_out(&mut self, qubits: &[usize], phases: bool) -> Result<usize> {
        ensure_qubits(self.n_qubits(), qubits)?;
        let boundary = canonical::canonicalize_rref(
            &mut StabRows {
                tab: &mut self.tab,
                rows: self.rank,
            },
            qubits,
            phases,
        );
        self.rank = boundary;
        Ok(boundary)
    }

    /// Replaces the reduced state on the given qubits with `newstate` and
    /// sets the rank to cover the retained and written rows.
    pub fn reset_qubits(
        &mut self,
        newstate: &Stabilizer,
        qubits: &[usize],
        phases: bool,
    ) -> Result<()> {
        if newstate.n_qubits() != qubits.len() {
            return Err(Error::DimensionMismatch(newstate.n_qubits(), qubits.len()));
        }
        ensure_qubits(self.n_qubits(), qubits)?;
        let boundary = canonical::canonicalize_rref(
            &mut StabRows {
                tab: &mut self.tab,
                rows: self.rank,
            },
            qubits,
            phases,
        );
        if boundary + newstate.len() > self.n_qubits() {
            return Err(Error::InvalidTableau(format!(
                "no room for {} reset rows past boundary {boundary}",
                newstate.len()
            )));
        }
        for k in 0..newstate.len() {
            let expanded = newstate.row(k).expand(qubits, self.n_qubits())?;
            self.tab.set_row(boundary + k, &expanded);
        }
        self.rank = boundary + newstate.len();
        Ok(())
    }
}

impl MixedDestabilizer {
    /// Traces out the given qubits. The restricted rref runs on the
    /// stabilizer block with the destabilizer block kept in lockstep; the
    /// demoted stabilizer/destabilizer pairs become logical pairs simply by
    /// lowering the rank.
    ///
    /// Tracing out more qubits than the state has rank to lose is not
    /// detected; the caller must keep |qubits| within the current rank.
    pub fn trace_out(&mut self, qubits: &[usize], phases: bool) -> Result<usize> {
        ensure_qubits(self.n_qubits(), qubits)?;
        let offset = self.n_qubits();
        let boundary = canonical::canonicalize_rref(
            &mut DualRows {
                tab: &mut self.tab,
                rows: self.rank,
                offset,
            },
            qubits,
            phases,
        );
        self.rank = boundary;
        Ok(boundary)
    }

    /// Replaces the reduced state on the given qubits with `newstate` by
    /// projecting each expanded row and then forcing its phase.
    pub fn reset_qubits(
        &mut self,
        newstate: &Stabilizer,
        qubits: &[usize],
        phases: bool,
    ) -> Result<()> {
        if newstate.n_qubits() != qubits.len() {
            return Err(Error::DimensionMismatch(newstate.n_qubits(), qubits.len()));
        }
        ensure_qubits(self.n_qubits(), qubits)?;
        let nqubits = self.n_qubits();
        for k in 0..newstate.len() {
            let expanded = newstate.row(k).expand(qubits, nqubits)?;
            let outcome = self.project_with(
                &expanded,
                ProjectOpts {
                    keep_result: true,
                    phases,
                },
            )?;
            match (outcome.anticommutes, outcome.result) {
                (Some(row), _) => {
                    // the projection wrote `expanded` into this stabilizer
                    // row but left its phase to the caller
                    self.tab.set_phase(nqubits + row, expanded.phase());
                }
                (None, None) => {
                    // the projection appended `expanded` as the newest
                    // stabilizer row
                    self.tab.set_phase(nqubits + self.rank - 1, expanded.phase());
                }
                (None, Some(sign)) => {
                    // already in the group; when the recorded sign disagrees,
                    // swap the witnessed generator for `expanded` itself
                    if phases && sign != PhaseFactor::PLUS_ONE {
                        let witness =
                            (0..self.rank).find(|&i| self.tab.anticommutes(i, &expanded));
                        if let Some(witness) = witness {
                            for i in witness + 1..self.rank {
                                if self.tab.anticommutes(i, &expanded) {
                                    self.tab.mul_left(i, witness, false);
                                }
                            }
                            self.tab.set_row(nqubits + witness, &expanded);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
