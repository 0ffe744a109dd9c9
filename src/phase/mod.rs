//! Fermionic phases accompanying excitations between Slater determinants.

use std::fmt;
use std::ops::{Mul, MulAssign, Neg};

use serde::{Deserialize, Serialize};

use crate::determinant::{Determinant, DeterminantError, SpinDeterminant};


// ================
// Enum definitions
// ================

/// Enumerated type for the sign picked up when creation and annihilation operators are
/// reordered past occupied orbitals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The $`+1`$ phase.
    #[default]
    Positive,

    /// The $`-1`$ phase.
    Negative,
}

impl Phase {
    /// Returns the phase $`(-1)^n`$ for a number of transpositions $`n`$.
    pub fn from_parity(n: usize) -> Self {
        if n % 2 == 0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Returns the phase as `+1` or `-1`.
    pub fn value(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    /// Returns the opposite phase if `flip` is `true`, otherwise this phase.
    fn flipped_if(self, flip: bool) -> Self {
        if flip {
            -self
        } else {
            self
        }
    }
}

impl From<Phase> for i8 {
    fn from(phase: Phase) -> Self {
        phase.value()
    }
}

impl From<Phase> for i32 {
    fn from(phase: Phase) -> Self {
        i32::from(phase.value())
    }
}

impl From<Phase> for f64 {
    fn from(phase: Phase) -> Self {
        f64::from(phase.value())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "+1"),
            Self::Negative => write!(f, "-1"),
        }
    }
}

// ---
// Neg
// ---
impl Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Self::Output {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

// ---
// Mul
// ---
impl Mul for Phase {
    type Output = Phase;

    fn mul(self, rhs: Phase) -> Self::Output {
        if self == rhs {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl MulAssign for Phase {
    fn mul_assign(&mut self, rhs: Phase) {
        *self = *self * rhs;
    }
}

// =========
// Functions
// =========

/// Computes the phase of the single excitation `h → p` out of a spin determinant.
///
/// The phase is $`(-1)^n`$ where $`n`$ is the number of orbitals occupied in `sdet` strictly
/// between $`\min(h, p)`$ and $`\max(h, p)`$.
///
/// # Arguments
///
/// * `sdet` - The spin determinant before the excitation.
/// * `h` - The hole orbital.
/// * `p` - The particle orbital.
///
/// # Errors
///
/// Errors with [`DeterminantError::InvalidOrbitalIndex`] if either index is out of range.
pub fn phase_single_excitation(
    sdet: &SpinDeterminant,
    h: usize,
    p: usize,
) -> Result<Phase, DeterminantError> {
    sdet.check_index(h)?;
    sdet.check_index(p)?;
    let (i, j) = if h < p { (h, p) } else { (p, h) };
    let mut hpmask = SpinDeterminant::new(sdet.n_mos());
    hpmask.set_range(i + 1, j, true)?;
    Ok(Phase::from_parity(hpmask.bitwise_and(sdet)?.popcount()))
}

/// Computes the phase of the double excitation `h1 h2 → p1 p2` within one spin channel.
///
/// Both single-excitation phases are evaluated against the source determinant, and the
/// product is flipped once for `h2 < p1` and once more for `p2 < h1`.
///
/// # Arguments
///
/// * `sdet` - The spin determinant before the excitation.
/// * `h1`, `h2` - The hole orbitals.
/// * `p1`, `p2` - The particle orbitals.
pub fn phase_same_spin_double_excitation(
    sdet: &SpinDeterminant,
    h1: usize,
    h2: usize,
    p1: usize,
    p2: usize,
) -> Result<Phase, DeterminantError> {
    let phase = phase_single_excitation(sdet, h1, p1)? * phase_single_excitation(sdet, h2, p2)?;
    Ok(phase.flipped_if(h2 < p1).flipped_if(p2 < h1))
}

/// Computes the phase of the double excitation with `h_alpha → p_alpha` in the $`\alpha`$ channel
/// and `h_beta → p_beta` in the $`\beta`$ channel.
///
/// Operators acting on different spin channels commute, so no crossing correction applies.
pub fn phase_opposite_spin_double_excitation(
    det: &Determinant,
    h_alpha: usize,
    p_alpha: usize,
    h_beta: usize,
    p_beta: usize,
) -> Result<Phase, DeterminantError> {
    Ok(phase_single_excitation(det.alpha(), h_alpha, p_alpha)?
        * phase_single_excitation(det.beta(), h_beta, p_beta)?)
}

/// Returns the per-channel symmetric difference of two determinants, marking exactly the
/// orbitals whose occupations differ.
pub fn exc_det(a: &Determinant, b: &Determinant) -> Result<Determinant, DeterminantError> {
    Determinant::from_spin_determinants(
        a.alpha().bitwise_xor(b.alpha())?,
        a.beta().bitwise_xor(b.beta())?,
    )
}
