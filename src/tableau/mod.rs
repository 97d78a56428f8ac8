use crate::error::{Error, Result};
use crate::types::PhaseFactor;
use crate::types::pauli::{
    PauliOperator, WORD_BITS, anticommute_words, mul_words, words_per_axis,
};
use ndarray::{Array1, Array2, Axis, Zip, s};
use std::fmt;

/// An ordered sequence of Pauli rows over a fixed number of qubits.
///
/// All rows live in one `rows × 2w` word matrix (each row stores its X words
/// followed by its Z words) so that row operations act on whole words. Rows
/// are mutable in place and the row ordering is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tableau {
    nqubits: usize,
    xzs: Array2<u64>,
    phases: Array1<PhaseFactor>,
}

impl Tableau {
    /// A tableau of `rows` identity rows.
    pub fn new(nqubits: usize, rows: usize) -> Self {
        Self {
            nqubits,
            xzs: Array2::zeros((rows, 2 * words_per_axis(nqubits))),
            phases: Array1::from_elem(rows, PhaseFactor::PLUS_ONE),
        }
    }

    pub fn from_rows(nqubits: usize, rows: &[PauliOperator]) -> Result<Self> {
        let mut tableau = Self::new(nqubits, rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.n_qubits() != nqubits {
                return Err(Error::DimensionMismatch(row.n_qubits(), nqubits));
            }
            tableau.set_row(i, row);
        }
        Ok(tableau)
    }

    pub fn n_qubits(&self) -> usize {
        self.nqubits
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.xzs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies row `i` out as a standalone operator.
    pub fn row(&self, i: usize) -> PauliOperator {
        PauliOperator {
            nqubits: self.nqubits,
            phase: self.phases[i],
            xz: self.xzs.row(i).to_owned(),
        }
    }

    /// Iterates over copies of the rows.
    pub fn rows(&self) -> impl Iterator<Item = PauliOperator> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    /// Overwrites row `i` with `pauli` (bits and phase).
    ///
    /// Panics if the widths differ.
    pub fn set_row(&mut self, i: usize, pauli: &PauliOperator) {
        assert_eq!(
            pauli.n_qubits(),
            self.nqubits,
            "width mismatch in row assignment"
        );
        self.xzs.row_mut(i).assign(&pauli.xz);
        self.phases[i] = pauli.phase();
    }

    /// Copies row `src` (bits and phase) over row `dst`.
    pub fn copy_row_within(&mut self, dst: usize, src: usize) {
        if dst == src {
            return;
        }
        let (mut target, source) = self.xzs.multi_slice_mut((s![dst, ..], s![src, ..]));
        target.assign(&source);
        self.phases[dst] = self.phases[src];
    }

    /// Overwrites row `i` with the identity operator at phase +1.
    pub fn zero_row(&mut self, i: usize) {
        self.xzs.row_mut(i).fill(0);
        self.phases[i] = PhaseFactor::PLUS_ONE;
    }

    /// True when row `i` has no X or Z support; its phase is ignored.
    pub fn row_is_identity(&self, i: usize) -> bool {
        self.xzs.row(i).iter().all(|&word| word == 0)
    }

    pub fn phase(&self, i: usize) -> PhaseFactor {
        self.phases[i]
    }

    pub fn set_phase(&mut self, i: usize, phase: PhaseFactor) {
        self.phases[i] = phase;
    }

    pub fn x_bit(&self, row: usize, qubit: usize) -> bool {
        self.xzs[[row, qubit / WORD_BITS]] >> (qubit % WORD_BITS) & 1 == 1
    }

    pub fn z_bit(&self, row: usize, qubit: usize) -> bool {
        let words = words_per_axis(self.nqubits);
        self.xzs[[row, words + qubit / WORD_BITS]] >> (qubit % WORD_BITS) & 1 == 1
    }

    /// Swaps rows `i` and `j` including their phases.
    pub fn row_swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (mut a, mut b) = self.xzs.multi_slice_mut((s![i, ..], s![j, ..]));
        Zip::from(&mut a).and(&mut b).for_each(std::mem::swap);
        self.phases.swap(i, j);
    }

    /// Replaces row `i` with `row j * row i`; the phase of row `i` is
    /// updated by the Pauli product phase table when `phases` is true, else
    /// left untouched.
    ///
    /// Panics if `i == j`.
    pub fn mul_left(&mut self, i: usize, j: usize, phases: bool) {
        assert_ne!(i, j, "cannot multiply a row into itself");
        let words = words_per_axis(self.nqubits);
        let extra = {
            let (target, source) = self.xzs.multi_slice_mut((s![i, ..], s![j, ..]));
            let (rx, rz) = target.split_at(Axis(0), words);
            let (lx, lz) = source.split_at(Axis(0), words);
            mul_words(lx.view(), lz.view(), rx, rz, phases)
        };
        if phases {
            self.phases[i] =
                PhaseFactor::new(self.phases[j].exponent() + self.phases[i].exponent() + extra);
        }
    }

    /// Replaces `pauli` with `row j * pauli`.
    ///
    /// Panics if the widths differ.
    pub fn mul_row_into(&self, j: usize, pauli: &mut PauliOperator, phases: bool) {
        assert_eq!(
            pauli.n_qubits(),
            self.nqubits,
            "width mismatch in row multiplication"
        );
        let words = words_per_axis(self.nqubits);
        let row = self.xzs.row(j);
        let (lx, lz) = row.split_at(Axis(0), words);
        let extra = {
            let (rx, rz) = pauli.xz.view_mut().split_at(Axis(0), words);
            mul_words(lx, lz, rx, rz, phases)
        };
        if phases {
            pauli.set_phase(PhaseFactor::new(
                self.phases[j].exponent() + pauli.phase().exponent() + extra,
            ));
        }
    }

    /// True iff `pauli` anticommutes with row `i` (symplectic inner product
    /// 1 over GF(2)).
    pub fn anticommutes(&self, i: usize, pauli: &PauliOperator) -> bool {
        let words = words_per_axis(self.nqubits);
        let row = self.xzs.row(i);
        let (ax, az) = row.split_at(Axis(0), words);
        let (bx, bz) = pauli.xz_views();
        anticommute_words(ax, az, bx, bz)
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.row(i))?;
        }
        Ok(())
    }
}
