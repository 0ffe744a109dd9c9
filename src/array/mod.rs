//! Fixed-size owned collections of determinants.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::determinant::{Determinant, DeterminantError};

#[cfg(test)]
#[path = "array_tests.rs"]
mod array_tests;

/// Structure owning a fixed number of determinants over a common number of orbitals.
///
/// The number of determinants is fixed at construction. Determinants are copied in by
/// [`Self::set`] and handed out by reference or by consuming the array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeterminantArray")]
pub struct DeterminantArray {
    /// The number of molecular orbitals shared by every determinant.
    n_mos: usize,

    /// The determinants.
    dets: Vec<Determinant>,
}

/// Unchecked wire form of [`DeterminantArray`].
#[derive(Deserialize)]
struct RawDeterminantArray {
    n_mos: usize,
    dets: Vec<Determinant>,
}

impl TryFrom<RawDeterminantArray> for DeterminantArray {
    type Error = DeterminantError;

    fn try_from(raw: RawDeterminantArray) -> Result<Self, Self::Error> {
        Self::from_determinants(raw.n_mos, raw.dets)
    }
}

impl DeterminantArray {
    /// Creates an array of `n_dets` empty determinants over `n_mos` orbitals.
    pub fn new(n_dets: usize, n_mos: usize) -> Self {
        Self {
            n_mos,
            dets: vec![Determinant::new(n_mos); n_dets],
        }
    }

    /// Creates an array from existing determinants.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::DimensionMismatch`] if any determinant does not span
    /// `n_mos` orbitals.
    pub fn from_determinants(
        n_mos: usize,
        dets: Vec<Determinant>,
    ) -> Result<Self, DeterminantError> {
        if let Some(det) = dets.iter().find(|det| det.n_mos() != n_mos) {
            return Err(DeterminantError::DimensionMismatch {
                lhs: n_mos,
                rhs: det.n_mos(),
            });
        }
        Ok(Self { n_mos, dets })
    }

    /// Wraps the output of a generation routine, all of which share the source's orbital count.
    pub(crate) fn from_generated(n_mos: usize, dets: Vec<Determinant>) -> Self {
        Self { n_mos, dets }
    }

    /// Returns the number of determinants.
    pub fn len(&self) -> usize {
        self.dets.len()
    }

    /// Returns `true` if the array holds no determinants.
    pub fn is_empty(&self) -> bool {
        self.dets.is_empty()
    }

    /// Returns the number of molecular orbitals of every determinant.
    pub fn n_mos(&self) -> usize {
        self.n_mos
    }

    /// Returns the determinant in slot `i`, or `None` if `i` is out of bounds.
    pub fn get(&self, i: usize) -> Option<&Determinant> {
        self.dets.get(i)
    }

    /// Overwrites slot `i` with a copy of `det`.
    ///
    /// # Errors
    ///
    /// Errors if `i` is out of bounds or if `det` spans a different number of orbitals.
    pub fn set(&mut self, i: usize, det: &Determinant) -> Result<(), DeterminantError> {
        if det.n_mos() != self.n_mos {
            return Err(DeterminantError::DimensionMismatch {
                lhs: self.n_mos,
                rhs: det.n_mos(),
            });
        }
        let len = self.dets.len();
        let slot = self
            .dets
            .get_mut(i)
            .ok_or(DeterminantError::InvalidArrayIndex { index: i, len })?;
        *slot = det.clone();
        Ok(())
    }

    /// An iterator over the determinants.
    pub fn iter(&self) -> std::slice::Iter<'_, Determinant> {
        self.dets.iter()
    }

    /// Returns the determinants as a slice.
    pub fn as_slice(&self) -> &[Determinant] {
        &self.dets
    }

    /// Consumes the array and returns its determinants.
    pub fn into_vec(self) -> Vec<Determinant> {
        self.dets
    }
}

impl Index<usize> for DeterminantArray {
    type Output = Determinant;

    fn index(&self, i: usize) -> &Self::Output {
        &self.dets[i]
    }
}

impl IntoIterator for DeterminantArray {
    type Item = Determinant;
    type IntoIter = std::vec::IntoIter<Determinant>;

    fn into_iter(self) -> Self::IntoIter {
        self.dets.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeterminantArray {
    type Item = &'a Determinant;
    type IntoIter = std::slice::Iter<'a, Determinant>;

    fn into_iter(self) -> Self::IntoIter {
        self.dets.iter()
    }
}

impl fmt::Display for DeterminantArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self.dets.len().to_string().len();
        self.dets
            .iter()
            .enumerate()
            .try_for_each(|(i, det)| writeln!(f, "{i:>width$}  {det}"))
    }
}
