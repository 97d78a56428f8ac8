use crate::error::{Error, Result};
use crate::types::PhaseFactor;
use lazy_static::lazy_static;
use ndarray::{Array1, ArrayView1, ArrayViewMut1, Axis, Zip};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

pub(crate) const WORD_BITS: usize = u64::BITS as usize;

/// Number of machine words holding one axis (X or Z) of an n-qubit operator.
pub(crate) fn words_per_axis(nqubits: usize) -> usize {
    nqubits.div_ceil(WORD_BITS)
}

/// A multi-qubit Pauli operator, `i^phase * ⊗_k σ(x_k, z_k)` with
/// σ(0,0)=I, σ(1,0)=X, σ(0,1)=Z, σ(1,1)=Y.
///
/// The X and Z bit-vectors are packed into a single word buffer, X words
/// first, so that row operations run word-parallel.
///
/// In the dense string form the k-th character names the Pauli on qubit k;
/// `_` and `I` both denote the identity, and an optional `+`, `-`, `i`,
/// `+i`, or `-i` prefix carries the phase.
///
/// ## Examples
/// ```rust
/// use stabilizer_tableau_rust::types::PauliOperator;
///
/// let p: PauliOperator = "-XZ_".parse().unwrap();
/// assert_eq!(p.to_string(), "-XZ_");
/// assert!(p.x_bit(0) && p.z_bit(1) && !p.x_bit(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauliOperator {
    pub(crate) nqubits: usize,
    pub(crate) phase: PhaseFactor,
    /// X words followed by Z words, `ceil(n/64)` each.
    pub(crate) xz: Array1<u64>,
}

/// Multiplies the Pauli bits `(lx, lz)` into `(rx, rz)` from the left and
/// returns the exponent of i contributed by the per-qubit products, mod 4.
///
/// Lanes where the product is one of XY, YZ, ZX contribute +i each; the
/// remaining anticommuting lanes contribute -i each.
pub(crate) fn mul_words(
    lx: ArrayView1<u64>,
    lz: ArrayView1<u64>,
    mut rx: ArrayViewMut1<u64>,
    mut rz: ArrayViewMut1<u64>,
    phases: bool,
) -> u8 {
    let mut plus = 0u64;
    let mut minus = 0u64;
    Zip::from(&mut rx)
        .and(&mut rz)
        .and(&lx)
        .and(&lz)
        .for_each(|x2, z2, &x1, &z1| {
            if phases {
                let pos =
                    (x1 & !z1 & *x2 & *z2) | (x1 & z1 & !*x2 & *z2) | (!x1 & z1 & *x2 & !*z2);
                let anti = (x1 & *z2) ^ (z1 & *x2);
                plus += u64::from(pos.count_ones());
                minus += u64::from((anti & !pos).count_ones());
            }
            *x2 ^= x1;
            *z2 ^= z1;
        });
    (((plus & 3) + 3 * (minus & 3)) & 3) as u8
}

/// Symplectic inner product over GF(2): true iff the operators anticommute.
pub(crate) fn anticommute_words(
    ax: ArrayView1<u64>,
    az: ArrayView1<u64>,
    bx: ArrayView1<u64>,
    bz: ArrayView1<u64>,
) -> bool {
    let mut acc = 0u64;
    Zip::from(&ax)
        .and(&az)
        .and(&bx)
        .and(&bz)
        .for_each(|&ax, &az, &bx, &bz| {
            acc ^= (ax & bz) ^ (az & bx);
        });
    acc.count_ones() & 1 == 1
}

impl PauliOperator {
    /// The n-qubit identity operator with phase +1.
    pub fn zero(nqubits: usize) -> Self {
        Self {
            nqubits,
            phase: PhaseFactor::PLUS_ONE,
            xz: Array1::zeros(2 * words_per_axis(nqubits)),
        }
    }

    /// A single X on the given qubit.
    pub fn single_x(nqubits: usize, qubit: usize) -> Result<Self> {
        if qubit >= nqubits {
            return Err(Error::QubitIndexOutOfBounds(qubit, nqubits));
        }
        let mut pauli = Self::zero(nqubits);
        pauli.set_x_bit(qubit, true);
        Ok(pauli)
    }

    /// A single Y on the given qubit.
    pub fn single_y(nqubits: usize, qubit: usize) -> Result<Self> {
        if qubit >= nqubits {
            return Err(Error::QubitIndexOutOfBounds(qubit, nqubits));
        }
        let mut pauli = Self::zero(nqubits);
        pauli.set_x_bit(qubit, true);
        pauli.set_z_bit(qubit, true);
        Ok(pauli)
    }

    /// A single Z on the given qubit.
    pub fn single_z(nqubits: usize, qubit: usize) -> Result<Self> {
        if qubit >= nqubits {
            return Err(Error::QubitIndexOutOfBounds(qubit, nqubits));
        }
        let mut pauli = Self::zero(nqubits);
        pauli.set_z_bit(qubit, true);
        Ok(pauli)
    }

    pub fn n_qubits(&self) -> usize {
        self.nqubits
    }

    pub fn phase(&self) -> PhaseFactor {
        self.phase
    }

    pub fn set_phase(&mut self, phase: PhaseFactor) {
        self.phase = phase;
    }

    /// True when every site is the identity; the phase may still be nontrivial.
    pub fn is_identity(&self) -> bool {
        self.xz.iter().all(|&word| word == 0)
    }

    pub fn x_bit(&self, qubit: usize) -> bool {
        self.xz[qubit / WORD_BITS] >> (qubit % WORD_BITS) & 1 == 1
    }

    pub fn z_bit(&self, qubit: usize) -> bool {
        let words = words_per_axis(self.nqubits);
        self.xz[words + qubit / WORD_BITS] >> (qubit % WORD_BITS) & 1 == 1
    }

    pub fn set_x_bit(&mut self, qubit: usize, value: bool) {
        let mask = 1u64 << (qubit % WORD_BITS);
        let word = &mut self.xz[qubit / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    pub fn set_z_bit(&mut self, qubit: usize, value: bool) {
        let words = words_per_axis(self.nqubits);
        let mask = 1u64 << (qubit % WORD_BITS);
        let word = &mut self.xz[words + qubit / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Lowest qubit index carrying an X (or Y) component.
    pub(crate) fn first_x_set(&self) -> Option<usize> {
        let words = words_per_axis(self.nqubits);
        Self::first_set(self.xz.iter().take(words))
    }

    /// Lowest qubit index carrying a Z (or Y) component.
    pub(crate) fn first_z_set(&self) -> Option<usize> {
        let words = words_per_axis(self.nqubits);
        Self::first_set(self.xz.iter().skip(words))
    }

    fn first_set<'a>(words: impl Iterator<Item = &'a u64>) -> Option<usize> {
        for (index, &word) in words.enumerate() {
            if word != 0 {
                return Some(index * WORD_BITS + word.trailing_zeros() as usize);
            }
        }
        None
    }

    pub(crate) fn xz_views(&self) -> (ArrayView1<'_, u64>, ArrayView1<'_, u64>) {
        self.xz.view().split_at(Axis(0), words_per_axis(self.nqubits))
    }

    /// Replaces `self` with `lhs * self`, updating the phase by the Pauli
    /// product phase table when `phases` is true.
    ///
    /// Panics if the operators act on different numbers of qubits.
    pub fn mul_left(&mut self, lhs: &PauliOperator, phases: bool) {
        assert_eq!(
            self.nqubits, lhs.nqubits,
            "width mismatch in Pauli multiplication"
        );
        let words = words_per_axis(self.nqubits);
        let (lx, lz) = lhs.xz_views();
        let (rx, rz) = self.xz.view_mut().split_at(Axis(0), words);
        let extra = mul_words(lx, lz, rx, rz, phases);
        if phases {
            self.phase =
                PhaseFactor::new(lhs.phase.exponent() + self.phase.exponent() + extra);
        }
    }

    /// True iff the two operators anticommute (symplectic inner product 1).
    ///
    /// Panics if the operators act on different numbers of qubits.
    pub fn anticommutes_with(&self, other: &PauliOperator) -> bool {
        assert_eq!(self.nqubits, other.nqubits, "width mismatch in commutator");
        let (ax, az) = self.xz_views();
        let (bx, bz) = other.xz_views();
        anticommute_words(ax, az, bx, bz)
    }

    /// Embeds this operator into `nqubits` qubits, placing its k-th Pauli on
    /// qubit `qubits[k]` and copying the phase.
    pub fn expand(&self, qubits: &[usize], nqubits: usize) -> Result<PauliOperator> {
        if qubits.len() != self.nqubits {
            return Err(Error::DimensionMismatch(self.nqubits, qubits.len()));
        }
        let mut expanded = PauliOperator::zero(nqubits);
        for (k, &qubit) in qubits.iter().enumerate() {
            if qubit >= nqubits {
                return Err(Error::QubitIndexOutOfBounds(qubit, nqubits));
            }
            expanded.set_x_bit(qubit, self.x_bit(k));
            expanded.set_z_bit(qubit, self.z_bit(k));
        }
        expanded.phase = self.phase;
        Ok(expanded)
    }
}

impl fmt::Display for PauliOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phase)?;
        for qubit in 0..self.nqubits {
            let symbol = match (self.x_bit(qubit), self.z_bit(qubit)) {
                (false, false) => '_',
                (true, false) => 'X',
                (false, true) => 'Z',
                (true, true) => 'Y',
            };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

lazy_static! {
    static ref PAULI_RE: Regex = Regex::new(r"^([+-]?i?)([IXYZ_]+)$").unwrap();
}

impl FromStr for PauliOperator {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let captures = PAULI_RE
            .captures(trimmed)
            .ok_or_else(|| Error::PauliParsing(format!("invalid Pauli literal: '{}'", s)))?;
        let phase = match &captures[1] {
            "" | "+" => PhaseFactor::PLUS_ONE,
            "i" | "+i" => PhaseFactor::PLUS_I,
            "-" => PhaseFactor::MINUS_ONE,
            "-i" => PhaseFactor::MINUS_I,
            _ => unreachable!(), // Regex ensures this
        };
        let sites = &captures[2];
        let mut pauli = PauliOperator::zero(sites.len());
        for (qubit, symbol) in sites.chars().enumerate() {
            match symbol {
                'I' | '_' => {}
                'X' => pauli.set_x_bit(qubit, true),
                'Z' => pauli.set_z_bit(qubit, true),
                'Y' => {
                    pauli.set_x_bit(qubit, true);
                    pauli.set_z_bit(qubit, true);
                }
                _ => unreachable!(), // Regex ensures this
            }
        }
        pauli.phase = phase;
        Ok(pauli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mul(lhs: &str, rhs: &str) -> String {
        let mut product: PauliOperator = rhs.parse().unwrap();
        product.mul_left(&lhs.parse().unwrap(), true);
        product.to_string()
    }

    #[test]
    fn test_single_qubit_product_table() {
        assert_eq!(mul("X", "X"), "+_");
        assert_eq!(mul("Y", "Y"), "+_");
        assert_eq!(mul("Z", "Z"), "+_");
        assert_eq!(mul("X", "Y"), "+iZ");
        assert_eq!(mul("Y", "X"), "-iZ");
        assert_eq!(mul("Y", "Z"), "+iX");
        assert_eq!(mul("Z", "Y"), "-iX");
        assert_eq!(mul("Z", "X"), "+iY");
        assert_eq!(mul("X", "Z"), "-iY");
    }

    #[test]
    fn test_multi_qubit_product_accumulates_phase() {
        assert_eq!(mul("XX", "ZZ"), "-YY");
        assert_eq!(mul("-X_", "Z_"), "+iY_");
        assert_eq!(mul("XYZ", "XYZ"), "+___");
    }

    #[test]
    fn test_mul_left_without_phase_tracking() {
        let mut p: PauliOperator = "Z".parse().unwrap();
        p.mul_left(&"X".parse().unwrap(), false);
        assert_eq!(p.to_string(), "+Y");
    }

    #[test]
    fn test_anticommutation() {
        let x: PauliOperator = "X_".parse().unwrap();
        let z: PauliOperator = "Z_".parse().unwrap();
        let zz: PauliOperator = "ZZ".parse().unwrap();
        let xx: PauliOperator = "XX".parse().unwrap();
        assert!(x.anticommutes_with(&z));
        assert!(!xx.anticommutes_with(&zz));
        assert!(!x.anticommutes_with(&x));
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        for literal in ["+X_Z", "-YYY", "+iZ_", "-i_X"] {
            let pauli: PauliOperator = literal.parse().unwrap();
            assert_eq!(pauli.to_string(), literal);
        }
        let dense: PauliOperator = "IXYZ".parse().unwrap();
        assert_eq!(dense.to_string(), "+_XYZ");
        assert!("XQ".parse::<PauliOperator>().is_err());
        assert!("".parse::<PauliOperator>().is_err());
    }

    #[test]
    fn test_expand() {
        let pauli: PauliOperator = "-XZ".parse().unwrap();
        let expanded = pauli.expand(&[2, 0], 3).unwrap();
        assert_eq!(expanded.to_string(), "-Z_X");
        assert!(pauli.expand(&[0], 3).is_err());
        assert!(pauli.expand(&[0, 5], 3).is_err());
    }

    #[test]
    fn test_packing_past_one_word() {
        let pauli = PauliOperator::single_x(70, 65).unwrap();
        assert!(pauli.x_bit(65));
        assert!(!pauli.x_bit(1));
        assert_eq!(pauli.first_x_set(), Some(65));
        assert_eq!(pauli.first_z_set(), None);
        let z = PauliOperator::single_z(70, 69).unwrap();
        assert!(z.anticommutes_with(&PauliOperator::single_x(70, 69).unwrap()));
        assert!(!z.anticommutes_with(&pauli));
    }
}
