use num_complex::Complex64;
use std::fmt;
use std::ops::{Mul, MulAssign};

/// Represents a phase of the form i^k for k in {0, 1, 2, 3}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseFactor(u8);

impl PhaseFactor {
    pub const PLUS_ONE: Self = Self(0); // k=0
    pub const PLUS_I: Self = Self(1); // k=1
    pub const MINUS_ONE: Self = Self(2); // k=2
    pub const MINUS_I: Self = Self(3); // k=3

    pub fn new(exponent: u8) -> Self {
        Self(exponent & 3)
    }

    /// The exponent k of i^k.
    pub fn exponent(self) -> u8 {
        self.0
    }

    /// Returns true for the real phases +1 and -1.
    pub fn is_real(self) -> bool {
        self.0 & 1 == 0
    }

    /// Converts the phase factor to a complex number.
    pub fn to_complex(self) -> Complex64 {
        match self.0 {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        }
    }

    /// Returns the inverse of the phase factor (complex conjugate).
    pub fn conjugated(self) -> Self {
        Self((4 - self.0) & 3)
    }

    /// Multiplies the phase by -1.
    pub fn flipped(self) -> Self {
        Self((self.0 + 2) & 3)
    }
}

impl Mul for PhaseFactor {
    type Output = Self;

    /// Phase multiplication corresponds to adding the internal `k` values modulo 4.
    fn mul(self, rhs: Self) -> Self::Output {
        Self((self.0 + rhs.0) & 3)
    }
}

impl MulAssign for PhaseFactor {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl fmt::Display for PhaseFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => write!(f, "+"),
            1 => write!(f, "+i"),
            2 => write!(f, "-"),
            _ => write!(f, "-i"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_multiplication_wraps_mod_4() {
        assert_eq!(PhaseFactor::PLUS_I * PhaseFactor::PLUS_I, PhaseFactor::MINUS_ONE);
        assert_eq!(PhaseFactor::MINUS_I * PhaseFactor::PLUS_I, PhaseFactor::PLUS_ONE);
        assert_eq!(PhaseFactor::MINUS_ONE.flipped(), PhaseFactor::PLUS_ONE);
        assert_eq!(PhaseFactor::PLUS_I.conjugated(), PhaseFactor::MINUS_I);
    }

    #[test]
    fn test_to_complex() {
        let i = PhaseFactor::PLUS_I.to_complex();
        assert_abs_diff_eq!(i.re, 0.0);
        assert_abs_diff_eq!(i.im, 1.0);
        let minus_one = PhaseFactor::MINUS_ONE.to_complex();
        assert_abs_diff_eq!(minus_one.re, -1.0);
        assert_abs_diff_eq!(minus_one.im, 0.0);
    }
}
