use crate::state::Stabilizer;
use crate::tableau::Tableau;
use crate::types::PauliOperator;

/// Two-pass reduction of `pauli` by the first `rows` rows of a canonicalized
/// tableau: the X pass clears X components lowest qubit first, the Z pass
/// then clears Z components, each searching only past the last row used.
pub(crate) fn decompose_prefix(
    tab: &Tableau,
    rows: usize,
    pauli: &mut PauliOperator,
    phases: bool,
    save_indices: bool,
) -> Option<Vec<usize>> {
    let mut used = 0;
    let mut indices = Vec::new();
    while let Some(bit) = pauli.first_x_set() {
        let row = (used..rows).find(|&k| tab.x_bit(k, bit))?;
        tab.mul_row_into(row, pauli, phases);
        used = row + 1;
        if save_indices {
            indices.push(row);
        }
    }
    while let Some(bit) = pauli.first_z_set() {
        let row = (used..rows).find(|&k| tab.z_bit(k, bit))?;
        tab.mul_row_into(row, pauli, phases);
        used = row + 1;
        if save_indices {
            indices.push(row);
        }
    }
    Some(indices)
}

impl Stabilizer {
    /// Rewrites `pauli` as a product of rows of this stabilizer, multiplying
    /// those rows into it in place. On success `pauli` is reduced to the
    /// identity up to phase and the indices of the used rows are returned in
    /// application order (left empty when `save_indices` is false). `None`
    /// means `pauli` is not in the group generated by the rows.
    ///
    /// The tableau must be in canonical form (see
    /// [`Stabilizer::canonicalize`]): the canonical ordering makes the row
    /// holding each leading bit unique and strictly advancing, so each pass
    /// walks the rows once.
    ///
    /// Panics if the widths differ.
    pub fn decompose(
        &self,
        pauli: &mut PauliOperator,
        phases: bool,
        save_indices: bool,
    ) -> Option<Vec<usize>> {
        assert_eq!(
            pauli.n_qubits(),
            self.n_qubits(),
            "width mismatch in decomposition"
        );
        decompose_prefix(&self.tab, self.tab.len(), pauli, phases, save_indices)
    }
}
