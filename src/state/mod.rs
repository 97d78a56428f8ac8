mod canonical;
mod decompose;
mod project;
mod trace_reset;

pub use project::{ProjectOpts, Projection, Projective};

use crate::error::{Error, Result};
use crate::tableau::Tableau;
use crate::types::PauliOperator;
use std::fmt;
use std::str::FromStr;

/// A stabilizer tableau: up to n pairwise-commuting generator rows on n
/// qubits. A full, independent set of n rows fixes a pure state up to global
/// phase; fewer meaningful rows (for instance identity rows left behind by
/// [`Stabilizer::trace_out`]) describe a mixed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stabilizer {
    pub(crate) tab: Tableau,
}

impl Stabilizer {
    /// Builds a stabilizer from generator rows, checking that the rows
    /// pairwise commute and carry real phases. GF(2) independence of the
    /// rows is the caller's responsibility.
    pub fn new(rows: Vec<PauliOperator>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::InvalidTableau(
                "a stabilizer needs at least one row".into(),
            ));
        };
        let nqubits = first.n_qubits();
        if rows.len() > nqubits {
            return Err(Error::InvalidTableau(format!(
                "{} generator rows cannot be independent on {} qubits",
                rows.len(),
                nqubits
            )));
        }
        let stabilizer = Self {
            tab: Tableau::from_rows(nqubits, &rows)?,
        };
        stabilizer.validate()?;
        Ok(stabilizer)
    }

    /// Re-checks the stabilizer invariants on the current rows.
    pub fn validate(&self) -> Result<()> {
        ensure_real_phases(&self.tab, 0, self.tab.len())?;
        ensure_commuting(&self.tab, 0, self.tab.len())
    }

    pub fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// Number of rows, including any identity rows.
    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    pub fn row(&self, i: usize) -> PauliOperator {
        self.tab.row(i)
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tab
    }

    /// Brings the rows to canonical form: X-led rows first, then Z-led rows,
    /// leading bits strictly increasing within each block. Returns the
    /// boundaries of the X-led and Z-led blocks.
    pub fn canonicalize(&mut self, phases: bool) -> (usize, usize) {
        let rows = self.tab.len();
        canonical::canonicalize(
            &mut canonical::StabRows {
                tab: &mut self.tab,
                rows,
            },
            phases,
        )
    }

    /// Canonicalization restricted to the given qubit columns: rows with
    /// support there capture pivots and are collected at the bottom. Returns
    /// the boundary index below which rows have no support on `qubits`.
    pub fn canonicalize_rref(&mut self, qubits: &[usize], phases: bool) -> Result<usize> {
        ensure_qubits(self.n_qubits(), qubits)?;
        let rows = self.tab.len();
        Ok(canonical::canonicalize_rref(
            &mut canonical::StabRows {
                tab: &mut self.tab,
                rows,
            },
            qubits,
            phases,
        ))
    }
}

impl fmt::Display for Stabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tab)
    }
}

impl FromStr for Stabilizer {
    type Err = Error;

    /// Parses one Pauli row per whitespace- or `;`-separated token.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let rows = s
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<PauliOperator>>>()?;
        Stabilizer::new(rows)
    }
}

/// A destabilizer-augmented tableau: r destabilizer rows followed by r
/// stabilizer rows forming symplectic pairs, `{d_i, s_j} = δ_ij`.
///
/// Only a full-rank pair set (r = n) supports the fast projection path;
/// projecting an underdetermined `Destabilizer` is a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destabilizer {
    pub(crate) tab: Tableau,
}

impl Destabilizer {
    pub fn from_parts(
        destab: Vec<PauliOperator>,
        stab: Vec<PauliOperator>,
    ) -> Result<Self> {
        if destab.len() != stab.len() {
            return Err(Error::InvalidTableau(format!(
                "{} destabilizer rows cannot pair with {} stabilizer rows",
                destab.len(),
                stab.len()
            )));
        }
        let Some(first) = stab.first() else {
            return Err(Error::InvalidTableau(
                "a destabilizer needs at least one row pair".into(),
            ));
        };
        let nqubits = first.n_qubits();
        if stab.len() > nqubits {
            return Err(Error::InvalidTableau(format!(
                "{} row pairs cannot be independent on {} qubits",
                stab.len(),
                nqubits
            )));
        }
        let mut rows = destab;
        rows.extend(stab);
        let destabilizer = Self {
            tab: Tableau::from_rows(nqubits, &rows)?,
        };
        destabilizer.validate()?;
        Ok(destabilizer)
    }

    /// Re-checks the duality invariants on the current rows.
    pub fn validate(&self) -> Result<()> {
        let rank = self.rank();
        ensure_real_phases(&self.tab, rank, 2 * rank)?;
        ensure_symplectic(&self.tab, rank)
    }

    /// Number of stabilizer/destabilizer row pairs.
    pub fn rank(&self) -> usize {
        self.tab.len() / 2
    }

    pub fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// Copies the stabilizer block.
    pub fn stabilizer(&self) -> Tableau {
        copy_rows(&self.tab, self.rank(), 2 * self.rank())
    }

    /// Copies the destabilizer block.
    pub fn destabilizer(&self) -> Tableau {
        copy_rows(&self.tab, 0, self.rank())
    }
}

impl fmt::Display for Destabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tab)
    }
}

/// A stabilizer tableau with physical capacity n rows and an explicit rank;
/// rows at or past the rank are scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedStabilizer {
    pub(crate) tab: Tableau,
    pub(crate) rank: usize,
}

impl MixedStabilizer {
    /// Builds a rank-`rows.len()` tableau with capacity `nqubits`.
    pub fn new(nqubits: usize, rows: Vec<PauliOperator>) -> Result<Self> {
        if rows.len() > nqubits {
            return Err(Error::InvalidTableau(format!(
                "{} generator rows cannot be independent on {} qubits",
                rows.len(),
                nqubits
            )));
        }
        let mut tab = Tableau::new(nqubits, nqubits);
        for (i, row) in rows.iter().enumerate() {
            if row.n_qubits() != nqubits {
                return Err(Error::DimensionMismatch(row.n_qubits(), nqubits));
            }
            tab.set_row(i, row);
        }
        let mixed = Self {
            tab,
            rank: rows.len(),
        };
        mixed.validate()?;
        Ok(mixed)
    }

    /// Re-checks the stabilizer invariants on the active rows.
    pub fn validate(&self) -> Result<()> {
        ensure_real_phases(&self.tab, 0, self.rank)?;
        ensure_commuting(&self.tab, 0, self.rank)
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    pub fn row(&self, i: usize) -> PauliOperator {
        self.tab.row(i)
    }

    /// Copies the active rows.
    pub fn stabilizer(&self) -> Tableau {
        copy_rows(&self.tab, 0, self.rank)
    }

    /// Canonical form of the active prefix; see [`Stabilizer::canonicalize`].
    pub fn canonicalize(&mut self, phases: bool) -> (usize, usize) {
        canonical::canonicalize(
            &mut canonical::StabRows {
                tab: &mut self.tab,
                rows: self.rank,
            },
            phases,
        )
    }
}

impl fmt::Display for MixedStabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stabilizer())
    }
}

/// A 2n-row tableau partitioned `[destabilizers | logical-X | stabilizers |
/// logical-Z]` with blocks of sizes r, n-r, r, n-r. Row i and row i+n are
/// symplectic partners; every other pair of rows commutes. Rank changes
/// reinterpret the partition boundaries in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedDestabilizer {
    pub(crate) tab: Tableau,
    pub(crate) rank: usize,
}

impl MixedDestabilizer {
    pub fn from_parts(
        destab: Vec<PauliOperator>,
        logical_x: Vec<PauliOperator>,
        stab: Vec<PauliOperator>,
        logical_z: Vec<PauliOperator>,
    ) -> Result<Self> {
        if destab.len() != stab.len() || logical_x.len() != logical_z.len() {
            return Err(Error::InvalidTableau(
                "destabilizer/stabilizer and logical-X/logical-Z blocks must pair up".into(),
            ));
        }
        let rank = stab.len();
        let nqubits = rank + logical_x.len();
        if nqubits == 0 {
            return Err(Error::InvalidTableau(
                "a mixed destabilizer needs at least one row pair".into(),
            ));
        }
        let mut rows = destab;
        rows.extend(logical_x);
        rows.extend(stab);
        rows.extend(logical_z);
        let mixed = Self {
            tab: Tableau::from_rows(nqubits, &rows)?,
            rank,
        };
        mixed.validate()?;
        Ok(mixed)
    }

    /// Re-checks the full symplectic-basis invariants on the current rows.
    pub fn validate(&self) -> Result<()> {
        let nqubits = self.n_qubits();
        ensure_real_phases(&self.tab, nqubits, nqubits + self.rank)?;
        ensure_symplectic(&self.tab, nqubits)
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn n_qubits(&self) -> usize {
        self.tab.n_qubits()
    }

    /// Copies the stabilizer block (rows n..n+r).
    pub fn stabilizer(&self) -> Tableau {
        let n = self.n_qubits();
        copy_rows(&self.tab, n, n + self.rank)
    }

    /// Copies the destabilizer block (rows 0..r).
    pub fn destabilizer(&self) -> Tableau {
        copy_rows(&self.tab, 0, self.rank)
    }

    /// Copies the logical-X block (rows r..n).
    pub fn logical_x(&self) -> Tableau {
        copy_rows(&self.tab, self.rank, self.n_qubits())
    }

    /// Copies the logical-Z block (rows n+r..2n).
    pub fn logical_z(&self) -> Tableau {
        let n = self.n_qubits();
        copy_rows(&self.tab, n + self.rank, 2 * n)
    }
}

impl fmt::Display for MixedDestabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tab)
    }
}

fn copy_rows(tab: &Tableau, start: usize, end: usize) -> Tableau {
    let mut out = Tableau::new(tab.n_qubits(), end - start);
    for (k, i) in (start..end).enumerate() {
        out.set_row(k, &tab.row(i));
    }
    out
}

fn ensure_commuting(tab: &Tableau, start: usize, end: usize) -> Result<()> {
    for i in start..end {
        let row = tab.row(i);
        for j in i + 1..end {
            if tab.anticommutes(j, &row) {
                return Err(Error::InvalidTableau(format!(
                    "rows {i} and {j} anticommute"
                )));
            }
        }
    }
    Ok(())
}

fn ensure_real_phases(tab: &Tableau, start: usize, end: usize) -> Result<()> {
    for i in start..end {
        if !tab.phase(i).is_real() {
            return Err(Error::InvalidTableau(format!(
                "row {i} carries an imaginary phase"
            )));
        }
    }
    Ok(())
}

/// Checks the symplectic-pair rule: rows i and i + `offset` anticommute,
/// every other pair of rows commutes.
fn ensure_symplectic(tab: &Tableau, offset: usize) -> Result<()> {
    let total = tab.len();
    for i in 0..total {
        let row = tab.row(i);
        for j in i + 1..total {
            let partnered = j == i + offset;
            if tab.anticommutes(j, &row) != partnered {
                return Err(Error::InvalidTableau(format!(
                    "rows {i} and {j} {}",
                    if partnered {
                        "must anticommute"
                    } else {
                        "must commute"
                    }
                )));
            }
        }
    }
    Ok(())
}

pub(crate) fn ensure_qubits(nqubits: usize, qubits: &[usize]) -> Result<()> {
    for &qubit in qubits {
        if qubit >= nqubits {
            return Err(Error::QubitIndexOutOfBounds(qubit, nqubits));
        }
    }
    Ok(())
}
