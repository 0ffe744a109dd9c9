//! Occupation-number representations of Slater determinants.

use std::error::Error;
use std::fmt;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::phase::{
    phase_opposite_spin_double_excitation, phase_same_spin_double_excitation,
    phase_single_excitation, Phase,
};


// ======
// Errors
// ======

/// Enumerated type for errors arising from invalid manipulations of determinants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeterminantError {
    /// An orbital index lies outside `[0, n_mos)`, or an orbital bound exceeds `n_mos`.
    InvalidOrbitalIndex {
        /// The offending index.
        index: usize,

        /// The number of orbitals of the determinant the index was supplied to.
        n_mos: usize,
    },

    /// Two objects with different numbers of orbitals were combined.
    DimensionMismatch {
        /// The number of orbitals of the left-hand operand.
        lhs: usize,

        /// The number of orbitals of the right-hand operand.
        rhs: usize,
    },

    /// An excitation constraint contains duplicate or out-of-range orbital indices.
    MalformedConstraint(String),

    /// A slot outside a determinant array was addressed.
    InvalidArrayIndex {
        /// The offending slot index.
        index: usize,

        /// The number of determinants in the array.
        len: usize,
    },
}

impl fmt::Display for DeterminantError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidOrbitalIndex { index, n_mos } => write!(
                f,
                "Invalid orbital index: {index} is not valid for {n_mos} molecular orbitals."
            ),
            Self::DimensionMismatch { lhs, rhs } => write!(
                f,
                "Dimension mismatch: {lhs} molecular orbitals versus {rhs} molecular orbitals."
            ),
            Self::MalformedConstraint(msg) => write!(f, "Malformed constraint: {msg}"),
            Self::InvalidArrayIndex { index, len } => write!(
                f,
                "Invalid array index: {index} is out of bounds for an array of {len} determinants."
            ),
        }
    }
}

impl Error for DeterminantError {}

// ================
// Enum definitions
// ================

/// Enumerated type for the two spin channels of a determinant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinChannel {
    /// The $`\alpha`$ spin channel.
    Alpha,

    /// The $`\beta`$ spin channel.
    Beta,
}

impl SpinChannel {
    /// Both spin channels, $`\alpha`$ first.
    pub const ALL: [SpinChannel; 2] = [SpinChannel::Alpha, SpinChannel::Beta];
}

impl fmt::Display for SpinChannel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Alpha => write!(f, "α"),
            Self::Beta => write!(f, "β"),
        }
    }
}

// ===============
// SpinDeterminant
// ===============

/// Structure to manage the orbital occupation of one spin channel.
///
/// The number of molecular orbitals is fixed at construction and equals the length of the
/// underlying bit vector, so no bit beyond `n_mos` is ever observable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpinDeterminant {
    /// Occupation bits, one per molecular orbital, in ascending orbital order.
    bits: BitVec<usize, Lsb0>,
}

impl SpinDeterminant {
    /// Constructs an empty spin determinant.
    ///
    /// # Arguments
    ///
    /// * `n_mos` - The number of molecular orbitals.
    pub fn new(n_mos: usize) -> Self {
        Self {
            bits: bitvec![usize, Lsb0; 0; n_mos],
        }
    }

    /// Constructs a spin determinant with orbitals `0..max_orb` occupied.
    ///
    /// # Arguments
    ///
    /// * `n_mos` - The number of molecular orbitals.
    /// * `max_orb` - The number of lowest orbitals to fill. Must not exceed `n_mos`.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::InvalidOrbitalIndex`] if `max_orb > n_mos`.
    pub fn filled(n_mos: usize, max_orb: usize) -> Result<Self, DeterminantError> {
        let mut sdet = Self::new(n_mos);
        sdet.set_range(0, max_orb, true)?;
        Ok(sdet)
    }

    /// Constructs a spin determinant from a list of occupied orbital indices.
    ///
    /// # Arguments
    ///
    /// * `n_mos` - The number of molecular orbitals.
    /// * `orbitals` - Indices of the occupied orbitals, in any order.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::InvalidOrbitalIndex`] if any index is out of range.
    pub fn from_orbitals(n_mos: usize, orbitals: &[usize]) -> Result<Self, DeterminantError> {
        let mut sdet = Self::new(n_mos);
        orbitals
            .iter()
            .try_for_each(|&orb| sdet.set(orb, true))?;
        Ok(sdet)
    }

    /// Returns the number of molecular orbitals.
    pub fn n_mos(&self) -> usize {
        self.bits.len()
    }

    pub(crate) fn check_index(&self, i: usize) -> Result<(), DeterminantError> {
        if i < self.n_mos() {
            Ok(())
        } else {
            Err(DeterminantError::InvalidOrbitalIndex {
                index: i,
                n_mos: self.n_mos(),
            })
        }
    }

    pub(crate) fn check_dimension(&self, other: &Self) -> Result<(), DeterminantError> {
        if self.n_mos() == other.n_mos() {
            Ok(())
        } else {
            Err(DeterminantError::DimensionMismatch {
                lhs: self.n_mos(),
                rhs: other.n_mos(),
            })
        }
    }

    /// Exclusive access to the occupation bits for generation routines that have already
    /// validated their indices.
    pub(crate) fn bits_mut(&mut self) -> &mut BitSlice<usize, Lsb0> {
        self.bits.as_mut_bitslice()
    }

    /// Returns the occupation of orbital `i`.
    pub fn get(&self, i: usize) -> Result<bool, DeterminantError> {
        self.check_index(i)?;
        Ok(self.bits[i])
    }

    /// Sets the occupation of orbital `i` to `val`.
    pub fn set(&mut self, i: usize, val: bool) -> Result<(), DeterminantError> {
        self.check_index(i)?;
        self.bits.set(i, val);
        Ok(())
    }

    /// Sets the occupations of all orbitals in the half-open range `lo..hi` to `val`.
    ///
    /// An empty range (`lo >= hi`) leaves the determinant untouched.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::InvalidOrbitalIndex`] if `hi > n_mos`, or if `lo > n_mos`
    /// for an empty range.
    pub fn set_range(&mut self, lo: usize, hi: usize, val: bool) -> Result<(), DeterminantError> {
        let n_mos = self.n_mos();
        if hi > n_mos {
            return Err(DeterminantError::InvalidOrbitalIndex { index: hi, n_mos });
        }
        if lo > n_mos {
            return Err(DeterminantError::InvalidOrbitalIndex { index: lo, n_mos });
        }
        if lo < hi {
            self.bits[lo..hi].fill(val);
        }
        Ok(())
    }

    /// Returns a new spin determinant with every orbital occupation flipped.
    ///
    /// Only the `n_mos` live bits are flipped; storage padding never leaks into the result.
    pub fn complement(&self) -> Self {
        let mut bits = self.bits.clone();
        bits.iter_mut().for_each(|mut bit| *bit = !*bit);
        Self { bits }
    }

    /// Returns the orbital-wise conjunction of two spin determinants.
    pub fn bitwise_and(&self, other: &Self) -> Result<Self, DeterminantError> {
        self.check_dimension(other)?;
        let mut bits = self.bits.clone();
        bits &= other.bits.as_bitslice();
        Ok(Self { bits })
    }

    /// Returns the orbital-wise exclusive disjunction of two spin determinants.
    pub fn bitwise_xor(&self, other: &Self) -> Result<Self, DeterminantError> {
        self.check_dimension(other)?;
        let mut bits = self.bits.clone();
        bits ^= other.bits.as_bitslice();
        Ok(Self { bits })
    }

    /// Returns the number of occupied orbitals.
    pub fn popcount(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns `true` if no orbital is occupied.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// An iterator over the indices of the occupied orbitals in ascending order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// An iterator over the indices of the unoccupied orbitals in ascending order.
    pub fn iter_unoccupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_zeros()
    }

    /// Returns the indices of the occupied orbitals in ascending order.
    pub fn occupied_orbitals(&self) -> Vec<usize> {
        self.iter_occupied().collect()
    }

    /// Returns the indices of the unoccupied orbitals in ascending order.
    pub fn unoccupied_orbitals(&self) -> Vec<usize> {
        self.iter_unoccupied().collect()
    }

    /// Returns the occupations of the orbitals in the half-open range `lo..hi`.
    pub fn to_bit_tuple(&self, lo: usize, hi: usize) -> Result<Vec<bool>, DeterminantError> {
        let n_mos = self.n_mos();
        if hi > n_mos {
            return Err(DeterminantError::InvalidOrbitalIndex { index: hi, n_mos });
        }
        if lo >= hi {
            return Ok(vec![]);
        }
        Ok(self.bits[lo..hi].iter().by_vals().collect())
    }

    /// Returns the number of electrons that must be moved to turn `self` into `other`.
    pub fn excitation_degree(&self, other: &Self) -> Result<usize, DeterminantError> {
        Ok(self.bitwise_xor(other)?.popcount() / 2)
    }

    /// Returns a new spin determinant in which orbital `h` is emptied and orbital `p` filled.
    ///
    /// The occupations of `h` and `p` are not checked.
    pub fn apply_single_excitation(&self, h: usize, p: usize) -> Result<Self, DeterminantError> {
        self.check_index(h)?;
        self.check_index(p)?;
        let mut sdet = self.clone();
        sdet.bits.set(h, false);
        sdet.bits.set(p, true);
        Ok(sdet)
    }

    /// Returns a new spin determinant in which orbitals `h1` and `h2` are emptied and orbitals
    /// `p1` and `p2` filled.
    pub fn apply_double_excitation(
        &self,
        h1: usize,
        h2: usize,
        p1: usize,
        p2: usize,
    ) -> Result<Self, DeterminantError> {
        [h1, h2, p1, p2]
            .iter()
            .try_for_each(|&i| self.check_index(i))?;
        let mut sdet = self.clone();
        sdet.bits.set(h1, false);
        sdet.bits.set(h2, false);
        sdet.bits.set(p1, true);
        sdet.bits.set(p2, true);
        Ok(sdet)
    }

    /// Returns the phase accompanying the single excitation `h → p` out of this determinant.
    pub fn phase_single_excitation(&self, h: usize, p: usize) -> Result<Phase, DeterminantError> {
        phase_single_excitation(self, h, p)
    }

    /// Returns the phase accompanying the same-spin double excitation `h1 h2 → p1 p2` out of
    /// this determinant.
    pub fn phase_double_excitation(
        &self,
        h1: usize,
        h2: usize,
        p1: usize,
        p2: usize,
    ) -> Result<Phase, DeterminantError> {
        phase_same_spin_double_excitation(self, h1, h2, p1, p2)
    }
}

impl fmt::Display for SpinDeterminant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.bits
            .iter()
            .by_vals()
            .try_for_each(|bit| write!(f, "{}", u8::from(bit)))
    }
}

// ===========
// Determinant
// ===========

/// Structure to manage a full electronic configuration as a pair of spin determinants.
///
/// Both spin channels always span the same number of orbitals, including after
/// deserialisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDeterminant")]
pub struct Determinant {
    /// The occupation of the $`\alpha`$ spin channel.
    alpha: SpinDeterminant,

    /// The occupation of the $`\beta`$ spin channel.
    beta: SpinDeterminant,
}

/// Unchecked wire form of [`Determinant`].
#[derive(Deserialize)]
struct RawDeterminant {
    alpha: SpinDeterminant,
    beta: SpinDeterminant,
}

impl TryFrom<RawDeterminant> for Determinant {
    type Error = DeterminantError;

    fn try_from(raw: RawDeterminant) -> Result<Self, Self::Error> {
        Self::from_spin_determinants(raw.alpha, raw.beta)
    }
}

impl Determinant {
    /// Constructs a determinant with both spin channels empty.
    pub fn new(n_mos: usize) -> Self {
        Self {
            alpha: SpinDeterminant::new(n_mos),
            beta: SpinDeterminant::new(n_mos),
        }
    }

    /// Constructs a determinant from its two spin channels.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::DimensionMismatch`] if the two channels span different
    /// numbers of orbitals.
    pub fn from_spin_determinants(
        alpha: SpinDeterminant,
        beta: SpinDeterminant,
    ) -> Result<Self, DeterminantError> {
        alpha.check_dimension(&beta)?;
        Ok(Self { alpha, beta })
    }

    /// Constructs a determinant from the occupied orbital indices of each spin channel.
    pub fn from_orbitals(
        n_mos: usize,
        alpha: &[usize],
        beta: &[usize],
    ) -> Result<Self, DeterminantError> {
        Ok(Self {
            alpha: SpinDeterminant::from_orbitals(n_mos, alpha)?,
            beta: SpinDeterminant::from_orbitals(n_mos, beta)?,
        })
    }

    /// Returns the number of molecular orbitals per spin channel.
    pub fn n_mos(&self) -> usize {
        self.alpha.n_mos()
    }

    /// Returns the $`\alpha`$ spin channel.
    pub fn alpha(&self) -> &SpinDeterminant {
        &self.alpha
    }

    /// Returns the $`\beta`$ spin channel.
    pub fn beta(&self) -> &SpinDeterminant {
        &self.beta
    }

    /// Returns the requested spin channel.
    pub fn channel(&self, spin: SpinChannel) -> &SpinDeterminant {
        match spin {
            SpinChannel::Alpha => &self.alpha,
            SpinChannel::Beta => &self.beta,
        }
    }

    /// Exclusive access to a spin channel. Callers must keep its length at `n_mos`.
    pub(crate) fn channel_mut(&mut self, spin: SpinChannel) -> &mut SpinDeterminant {
        match spin {
            SpinChannel::Alpha => &mut self.alpha,
            SpinChannel::Beta => &mut self.beta,
        }
    }

    /// Replaces the requested spin channel.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::DimensionMismatch`] if `sdet` does not span the same
    /// number of orbitals as this determinant. The determinant is left unchanged.
    pub fn set_channel(
        &mut self,
        spin: SpinChannel,
        sdet: SpinDeterminant,
    ) -> Result<(), DeterminantError> {
        self.channel(spin).check_dimension(&sdet)?;
        *self.channel_mut(spin) = sdet;
        Ok(())
    }

    /// Splits the determinant into its $`\alpha`$ and $`\beta`$ spin channels.
    pub fn into_spin_determinants(self) -> (SpinDeterminant, SpinDeterminant) {
        (self.alpha, self.beta)
    }

    pub(crate) fn check_dimension(&self, other: &Self) -> Result<(), DeterminantError> {
        self.alpha.check_dimension(&other.alpha)
    }

    /// Returns the total number of electrons.
    pub fn popcount(&self) -> usize {
        self.alpha.popcount() + self.beta.popcount()
    }

    /// Returns the per-channel excitation degrees `(alpha, beta)` separating `self` and `other`.
    pub fn excitation_degree(&self, other: &Self) -> Result<(usize, usize), DeterminantError> {
        Ok((
            self.alpha.excitation_degree(&other.alpha)?,
            self.beta.excitation_degree(&other.beta)?,
        ))
    }

    /// Returns the per-channel symmetric difference of two determinants.
    pub fn exc_det(&self, other: &Self) -> Result<Self, DeterminantError> {
        crate::phase::exc_det(self, other)
    }

    /// Returns a new determinant with the single excitation `h → p` applied in channel `spin`.
    pub fn apply_single_excitation(
        &self,
        spin: SpinChannel,
        h: usize,
        p: usize,
    ) -> Result<Self, DeterminantError> {
        let mut det = self.clone();
        *det.channel_mut(spin) = self.channel(spin).apply_single_excitation(h, p)?;
        Ok(det)
    }

    /// Returns a new determinant with the double excitation `h1 → p1` in channel `spin_1` and
    /// `h2 → p2` in channel `spin_2` applied. The two channels may coincide.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_double_excitation(
        &self,
        spin_1: SpinChannel,
        spin_2: SpinChannel,
        h1: usize,
        h2: usize,
        p1: usize,
        p2: usize,
    ) -> Result<Self, DeterminantError> {
        [(spin_1, h1), (spin_2, h2), (spin_1, p1), (spin_2, p2)]
            .iter()
            .try_for_each(|&(spin, i)| self.channel(spin).check_index(i))?;
        let mut det = self.clone();
        det.channel_mut(spin_1).bits.set(h1, false);
        det.channel_mut(spin_2).bits.set(h2, false);
        det.channel_mut(spin_1).bits.set(p1, true);
        det.channel_mut(spin_2).bits.set(p2, true);
        Ok(det)
    }

    /// Returns the phase of the single excitation `h → p` in channel `spin`.
    pub fn phase_single_excitation(
        &self,
        spin: SpinChannel,
        h: usize,
        p: usize,
    ) -> Result<Phase, DeterminantError> {
        phase_single_excitation(self.channel(spin), h, p)
    }

    /// Returns the phase of the same-spin double excitation `h1 h2 → p1 p2` in channel `spin`.
    pub fn phase_same_spin_double_excitation(
        &self,
        spin: SpinChannel,
        h1: usize,
        h2: usize,
        p1: usize,
        p2: usize,
    ) -> Result<Phase, DeterminantError> {
        phase_same_spin_double_excitation(self.channel(spin), h1, h2, p1, p2)
    }

    /// Returns the phase of the opposite-spin double excitation with `h_alpha → p_alpha` in the
    /// $`\alpha`$ channel and `h_beta → p_beta` in the $`\beta`$ channel.
    pub fn phase_opposite_spin_double_excitation(
        &self,
        h_alpha: usize,
        p_alpha: usize,
        h_beta: usize,
        p_beta: usize,
    ) -> Result<Phase, DeterminantError> {
        phase_opposite_spin_double_excitation(self, h_alpha, p_alpha, h_beta, p_beta)
    }
}

impl fmt::Display for Determinant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}|{}", self.alpha, self.beta)
    }
}
