//! Resolution of excitation masks and enumeration of excited determinants.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;
use log;
use serde::{Deserialize, Serialize};

use crate::array::DeterminantArray;
use crate::determinant::{Determinant, DeterminantError, SpinChannel, SpinDeterminant};
use crate::phase::Phase;

mod excitation_connected;

pub use excitation_connected::connected_determinants_of;

#[cfg(test)]
#[path = "excitation_tests.rs"]
mod excitation_tests;

// ==========
// Constraint
// ==========

/// Structure restricting the orbitals in which holes and particles may be created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcitationConstraint {
    /// Orbitals from which electrons may be removed.
    pub holes: Vec<usize>,

    /// Orbitals into which electrons may be placed.
    pub particles: Vec<usize>,
}

impl ExcitationConstraint {
    /// Creates a new excitation constraint from hole and particle allow-lists.
    pub fn new(holes: &[usize], particles: &[usize]) -> Self {
        Self {
            holes: holes.to_vec(),
            particles: particles.to_vec(),
        }
    }

    /// Converts one allow-list into a mask over `n_mos` orbitals.
    fn allow_mask(
        allowed: &[usize],
        n_mos: usize,
        kind: &str,
    ) -> Result<SpinDeterminant, DeterminantError> {
        let mut seen = HashSet::with_capacity(allowed.len());
        let mut mask = SpinDeterminant::new(n_mos);
        for &orb in allowed {
            if orb >= n_mos {
                return Err(DeterminantError::MalformedConstraint(format!(
                    "{kind} orbital {orb} is out of range for {n_mos} molecular orbitals."
                )));
            }
            if !seen.insert(orb) {
                return Err(DeterminantError::MalformedConstraint(format!(
                    "{kind} orbital {orb} is listed more than once."
                )));
            }
            mask.set(orb, true)?;
        }
        Ok(mask)
    }

    /// Validates the constraint against `n_mos` orbitals and returns its hole and particle masks.
    ///
    /// # Errors
    ///
    /// Errors with [`DeterminantError::MalformedConstraint`] if either allow-list contains an
    /// out-of-range or duplicate index.
    pub fn to_masks(
        &self,
        n_mos: usize,
    ) -> Result<(SpinDeterminant, SpinDeterminant), DeterminantError> {
        Ok((
            Self::allow_mask(&self.holes, n_mos, "Hole")?,
            Self::allow_mask(&self.particles, n_mos, "Particle")?,
        ))
    }
}

impl fmt::Display for ExcitationConstraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "holes {:?} → particles {:?}",
            self.holes, self.particles
        )
    }
}

// =====
// Masks
// =====

/// Structure containing the candidate holes and particles of one spin channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelMasks {
    /// Occupied orbitals that may be vacated.
    holes: SpinDeterminant,

    /// Unoccupied orbitals that may be filled.
    particles: SpinDeterminant,
}

impl ChannelMasks {
    /// Returns the hole mask.
    pub fn holes(&self) -> &SpinDeterminant {
        &self.holes
    }

    /// Returns the particle mask.
    pub fn particles(&self) -> &SpinDeterminant {
        &self.particles
    }

    /// Returns the candidate hole orbitals in ascending order.
    pub fn hole_indices(&self) -> Vec<usize> {
        self.holes.occupied_orbitals()
    }

    /// Returns the candidate particle orbitals in ascending order.
    pub fn particle_indices(&self) -> Vec<usize> {
        self.particles.occupied_orbitals()
    }
}

/// Structure containing the candidate holes and particles of both spin channels of a source
/// determinant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExcitationMasks {
    alpha: ChannelMasks,
    beta: ChannelMasks,
}

impl ExcitationMasks {
    /// Resolves the excitation masks of a determinant.
    ///
    /// In each spin channel, holes are the occupied orbitals allowed as holes and below the
    /// cut-off, and particles are the unoccupied orbitals allowed as particles and below the
    /// cut-off. Holes and particles are therefore always disjoint.
    ///
    /// # Arguments
    ///
    /// * `det` - The source determinant.
    /// * `constraint` - Optional allow-lists for holes and particles. `None` allows every orbital.
    /// * `max_orb` - Optional cut-off; only orbitals below `max_orb` take part. `None` applies
    /// no cut-off.
    ///
    /// # Errors
    ///
    /// Errors if the constraint is malformed or if `max_orb` exceeds the number of orbitals.
    pub fn resolve(
        det: &Determinant,
        constraint: Option<&ExcitationConstraint>,
        max_orb: Option<usize>,
    ) -> Result<Self, DeterminantError> {
        let n_mos = det.n_mos();
        let (hole_mask, particle_mask) = match constraint {
            Some(cons) => cons.to_masks(n_mos)?,
            None => (
                SpinDeterminant::filled(n_mos, n_mos)?,
                SpinDeterminant::filled(n_mos, n_mos)?,
            ),
        };
        let cutoff_mask = SpinDeterminant::filled(n_mos, max_orb.unwrap_or(n_mos))?;

        let resolve_channel = |occ: &SpinDeterminant| -> Result<ChannelMasks, DeterminantError> {
            let holes = occ.bitwise_and(&hole_mask)?.bitwise_and(&cutoff_mask)?;
            let particles = occ
                .complement()
                .bitwise_and(&particle_mask)?
                .bitwise_and(&cutoff_mask)?;
            Ok(ChannelMasks { holes, particles })
        };

        let masks = Self {
            alpha: resolve_channel(det.alpha())?,
            beta: resolve_channel(det.beta())?,
        };
        log::debug!(
            "Resolved excitation masks for {det}: α {} holes × {} particles, β {} holes × {} particles.",
            masks.alpha.holes.popcount(),
            masks.alpha.particles.popcount(),
            masks.beta.holes.popcount(),
            masks.beta.particles.popcount(),
        );
        Ok(masks)
    }

    /// Resolves the excitation masks of a determinant with every orbital allowed.
    pub fn unconstrained(det: &Determinant) -> Self {
        let channel = |occ: &SpinDeterminant| ChannelMasks {
            holes: occ.clone(),
            particles: occ.complement(),
        };
        Self {
            alpha: channel(det.alpha()),
            beta: channel(det.beta()),
        }
    }

    /// Returns the masks of the requested spin channel.
    pub fn channel(&self, spin: SpinChannel) -> &ChannelMasks {
        match spin {
            SpinChannel::Alpha => &self.alpha,
            SpinChannel::Beta => &self.beta,
        }
    }
}

// ==========
// Generation
// ==========

/// Enumerated type for the families of excited determinants that can be generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExcitationKind {
    /// All single excitations, $`\alpha`$ before $`\beta`$.
    Singles,

    /// All double excitations within one spin channel, $`\alpha`$ before $`\beta`$.
    SameSpinDoubles,

    /// All double excitations with one electron moved in each spin channel.
    OppositeSpinDoubles,

    /// Singles, then same-spin doubles, then opposite-spin doubles.
    #[default]
    Connected,
}

impl fmt::Display for ExcitationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Singles => write!(f, "Single excitations"),
            Self::SameSpinDoubles => write!(f, "Same-spin double excitations"),
            Self::OppositeSpinDoubles => write!(f, "Opposite-spin double excitations"),
            Self::Connected => write!(f, "All connected determinants"),
        }
    }
}

/// Enumerates the single excitations of one spin channel, holes outer and particles inner.
fn spin_singles(sdet: &SpinDeterminant, masks: &ChannelMasks) -> Vec<SpinDeterminant> {
    let particles = masks.particle_indices();
    masks
        .holes
        .iter_occupied()
        .cartesian_product(particles.iter().copied())
        .map(|(h, p)| {
            let mut excited = sdet.clone();
            excited.bits_mut().set(h, false);
            excited.bits_mut().set(p, true);
            excited
        })
        .collect()
}

/// Enumerates the double excitations of one spin channel in lexicographic `(h1, h2, p1, p2)`
/// order with `h1 < h2` and `p1 < p2`.
fn spin_doubles(sdet: &SpinDeterminant, masks: &ChannelMasks) -> Vec<SpinDeterminant> {
    let hole_pairs = masks.hole_indices().into_iter().tuple_combinations::<(_, _)>();
    let particle_pairs = masks
        .particle_indices()
        .into_iter()
        .tuple_combinations::<(_, _)>()
        .collect_vec();
    hole_pairs
        .cartesian_product(particle_pairs.into_iter())
        .map(|((h1, h2), (p1, p2))| {
            let mut excited = sdet.clone();
            let bits = excited.bits_mut();
            bits.set(h1, false);
            bits.set(h2, false);
            bits.set(p1, true);
            bits.set(p2, true);
            excited
        })
        .collect()
}

/// Rebuilds a full determinant from a replaced spin channel.
fn with_channel(det: &Determinant, spin: SpinChannel, sdet: SpinDeterminant) -> Determinant {
    let mut excited = det.clone();
    *excited.channel_mut(spin) = sdet;
    excited
}

/// Enumerates the single excitations of `det` permitted by `masks`.
pub fn singles_by_masks(det: &Determinant, masks: &ExcitationMasks) -> Vec<Determinant> {
    SpinChannel::ALL
        .iter()
        .flat_map(|&spin| {
            spin_singles(det.channel(spin), masks.channel(spin))
                .into_iter()
                .map(move |sdet| with_channel(det, spin, sdet))
        })
        .collect()
}

/// Enumerates the same-spin double excitations of `det` permitted by `masks`.
pub fn same_spin_doubles_by_masks(det: &Determinant, masks: &ExcitationMasks) -> Vec<Determinant> {
    SpinChannel::ALL
        .iter()
        .flat_map(|&spin| {
            spin_doubles(det.channel(spin), masks.channel(spin))
                .into_iter()
                .map(move |sdet| with_channel(det, spin, sdet))
        })
        .collect()
}

/// Enumerates the opposite-spin double excitations of `det` permitted by `masks` as the
/// Cartesian product of the $`\alpha`$ singles (outer) and the $`\beta`$ singles (inner).
pub fn opposite_spin_doubles_by_masks(
    det: &Determinant,
    masks: &ExcitationMasks,
) -> Vec<Determinant> {
    let alpha_singles = spin_singles(det.alpha(), masks.channel(SpinChannel::Alpha));
    let beta_singles = spin_singles(det.beta(), masks.channel(SpinChannel::Beta));
    alpha_singles
        .into_iter()
        .cartesian_product(beta_singles.into_iter())
        .map(|(alpha, beta)| {
            let mut excited = with_channel(det, SpinChannel::Alpha, alpha);
            *excited.channel_mut(SpinChannel::Beta) = beta;
            excited
        })
        .collect()
}

/// Enumerates the excitations of `kind` out of `det` permitted by `masks`.
pub fn generate_by_masks(
    det: &Determinant,
    masks: &ExcitationMasks,
    kind: ExcitationKind,
) -> Vec<Determinant> {
    let dets = match kind {
        ExcitationKind::Singles => singles_by_masks(det, masks),
        ExcitationKind::SameSpinDoubles => same_spin_doubles_by_masks(det, masks),
        ExcitationKind::OppositeSpinDoubles => opposite_spin_doubles_by_masks(det, masks),
        ExcitationKind::Connected => {
            let mut dets = singles_by_masks(det, masks);
            dets.extend(same_spin_doubles_by_masks(det, masks));
            dets.extend(opposite_spin_doubles_by_masks(det, masks));
            dets
        }
    };
    log::debug!("{kind} of {det}: {} determinants generated.", dets.len());
    dets
}

/// Generates the excitations of `kind` out of `det` without constraints.
pub fn generate(det: &Determinant, kind: ExcitationKind) -> DeterminantArray {
    let masks = ExcitationMasks::unconstrained(det);
    DeterminantArray::from_generated(det.n_mos(), generate_by_masks(det, &masks, kind))
}

/// Generates the excitations of `kind` out of `det` under an optional constraint and cut-off.
pub fn generate_constrained(
    det: &Determinant,
    kind: ExcitationKind,
    constraint: Option<&ExcitationConstraint>,
    max_orb: Option<usize>,
) -> Result<DeterminantArray, DeterminantError> {
    let masks = ExcitationMasks::resolve(det, constraint, max_orb)?;
    Ok(DeterminantArray::from_generated(
        det.n_mos(),
        generate_by_masks(det, &masks, kind),
    ))
}

/// Generates all single excitations of `det`.
pub fn all_singles(det: &Determinant) -> DeterminantArray {
    generate(det, ExcitationKind::Singles)
}

/// Generates all same-spin double excitations of `det`.
pub fn same_spin_doubles(det: &Determinant) -> DeterminantArray {
    generate(det, ExcitationKind::SameSpinDoubles)
}

/// Generates all opposite-spin double excitations of `det`.
pub fn opposite_spin_doubles(det: &Determinant) -> DeterminantArray {
    generate(det, ExcitationKind::OppositeSpinDoubles)
}

/// Generates all determinants connected to `det` by a single or double excitation.
pub fn connected_determinants(det: &Determinant) -> DeterminantArray {
    generate(det, ExcitationKind::Connected)
}

/// Generates the constrained single excitations of `det`.
pub fn constrained_singles(
    det: &Determinant,
    constraint: Option<&ExcitationConstraint>,
    max_orb: Option<usize>,
) -> Result<DeterminantArray, DeterminantError> {
    generate_constrained(det, ExcitationKind::Singles, constraint, max_orb)
}

/// Generates the constrained same-spin double excitations of `det`.
pub fn constrained_same_spin_doubles(
    det: &Determinant,
    constraint: Option<&ExcitationConstraint>,
    max_orb: Option<usize>,
) -> Result<DeterminantArray, DeterminantError> {
    generate_constrained(det, ExcitationKind::SameSpinDoubles, constraint, max_orb)
}

/// Generates the constrained opposite-spin double excitations of `det`.
pub fn constrained_opposite_spin_doubles(
    det: &Determinant,
    constraint: Option<&ExcitationConstraint>,
    max_orb: Option<usize>,
) -> Result<DeterminantArray, DeterminantError> {
    generate_constrained(det, ExcitationKind::OppositeSpinDoubles, constraint, max_orb)
}

/// Generates the constrained connected determinants of `det`.
pub fn constrained_connected_determinants(
    det: &Determinant,
    constraint: Option<&ExcitationConstraint>,
    max_orb: Option<usize>,
) -> Result<DeterminantArray, DeterminantError> {
    generate_constrained(det, ExcitationKind::Connected, constraint, max_orb)
}

// ==============
// Identification
// ==============

/// Enumerated type describing the excitation that turns one determinant into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Excitation {
    /// One electron moved from `h` to `p` within `spin`.
    Single { spin: SpinChannel, h: usize, p: usize },

    /// Two electrons moved from `h1`, `h2` to `p1`, `p2` within `spin`, with `h1 < h2` and
    /// `p1 < p2`.
    SameSpinDouble {
        spin: SpinChannel,
        h1: usize,
        h2: usize,
        p1: usize,
        p2: usize,
    },

    /// One electron moved in each spin channel.
    OppositeSpinDouble {
        h_alpha: usize,
        p_alpha: usize,
        h_beta: usize,
        p_beta: usize,
    },
}

impl Excitation {
    /// Identifies the excitation that turns `source` into `target`.
    ///
    /// # Returns
    ///
    /// `Some` excitation if the two determinants are connected by a single or double excitation,
    /// and `None` if they are identical, differ in electron count in some channel, or are more
    /// than doubly excited with respect to each other.
    pub fn between(
        source: &Determinant,
        target: &Determinant,
    ) -> Result<Option<Self>, DeterminantError> {
        source.check_dimension(target)?;
        let diff = source.exc_det(target)?;
        let holes_particles = |spin: SpinChannel| -> Option<(Vec<usize>, Vec<usize>)> {
            let (holes, particles): (Vec<usize>, Vec<usize>) = diff
                .channel(spin)
                .iter_occupied()
                .partition(|&i| matches!(source.channel(spin).get(i), Ok(true)));
            (holes.len() == particles.len()).then_some((holes, particles))
        };
        let (Some((ha, pa)), Some((hb, pb))) = (
            holes_particles(SpinChannel::Alpha),
            holes_particles(SpinChannel::Beta),
        ) else {
            return Ok(None);
        };

        let exc = match (ha.as_slice(), pa.as_slice(), hb.as_slice(), pb.as_slice()) {
            ([h], [p], [], []) => Some(Self::Single {
                spin: SpinChannel::Alpha,
                h: *h,
                p: *p,
            }),
            ([], [], [h], [p]) => Some(Self::Single {
                spin: SpinChannel::Beta,
                h: *h,
                p: *p,
            }),
            ([h1, h2], [p1, p2], [], []) => Some(Self::SameSpinDouble {
                spin: SpinChannel::Alpha,
                h1: *h1,
                h2: *h2,
                p1: *p1,
                p2: *p2,
            }),
            ([], [], [h1, h2], [p1, p2]) => Some(Self::SameSpinDouble {
                spin: SpinChannel::Beta,
                h1: *h1,
                h2: *h2,
                p1: *p1,
                p2: *p2,
            }),
            ([ha], [pa], [hb], [pb]) => Some(Self::OppositeSpinDouble {
                h_alpha: *ha,
                p_alpha: *pa,
                h_beta: *hb,
                p_beta: *pb,
            }),
            _ => None,
        };
        Ok(exc)
    }

    /// Returns the number of electrons moved by this excitation.
    pub fn degree(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::SameSpinDouble { .. } | Self::OppositeSpinDouble { .. } => 2,
        }
    }

    /// Applies this excitation to `source`.
    pub fn apply(&self, source: &Determinant) -> Result<Determinant, DeterminantError> {
        match *self {
            Self::Single { spin, h, p } => source.apply_single_excitation(spin, h, p),
            Self::SameSpinDouble {
                spin,
                h1,
                h2,
                p1,
                p2,
            } => source.apply_double_excitation(spin, spin, h1, h2, p1, p2),
            Self::OppositeSpinDouble {
                h_alpha,
                p_alpha,
                h_beta,
                p_beta,
            } => source.apply_double_excitation(
                SpinChannel::Alpha,
                SpinChannel::Beta,
                h_alpha,
                h_beta,
                p_alpha,
                p_beta,
            ),
        }
    }

    /// Returns the phase accompanying this excitation out of `source`.
    pub fn phase(&self, source: &Determinant) -> Result<Phase, DeterminantError> {
        match *self {
            Self::Single { spin, h, p } => source.phase_single_excitation(spin, h, p),
            Self::SameSpinDouble {
                spin,
                h1,
                h2,
                p1,
                p2,
            } => source.phase_same_spin_double_excitation(spin, h1, h2, p1, p2),
            Self::OppositeSpinDouble {
                h_alpha,
                p_alpha,
                h_beta,
                p_beta,
            } => source.phase_opposite_spin_double_excitation(h_alpha, p_alpha, h_beta, p_beta),
        }
    }
}

impl fmt::Display for Excitation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Single { spin, h, p } => write!(f, "{h}{spin} → {p}{spin}"),
            Self::SameSpinDouble {
                spin,
                h1,
                h2,
                p1,
                p2,
            } => write!(f, "{h1}{spin} {h2}{spin} → {p1}{spin} {p2}{spin}"),
            Self::OppositeSpinDouble {
                h_alpha,
                p_alpha,
                h_beta,
                p_beta,
            } => write!(f, "{h_alpha}α {h_beta}β → {p_alpha}α {p_beta}β"),
        }
    }
}
