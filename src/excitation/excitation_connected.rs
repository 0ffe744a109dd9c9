//! Connected spaces of multi-determinant wavefunctions.

use indexmap::IndexSet;
use log;
use rayon::prelude::*;

use crate::array::DeterminantArray;
use crate::determinant::{Determinant, DeterminantError};

use super::{generate_by_masks, ExcitationConstraint, ExcitationKind, ExcitationMasks};

/// Generates the determinants connected to any of a set of source determinants.
///
/// Each source is expanded independently and in parallel. The per-source lists are concatenated
/// in source order, and only the first occurrence of every determinant is kept.
///
/// # Arguments
///
/// * `sources` - The source determinants, all spanning the same number of orbitals.
/// * `kind` - The family of excitations to generate out of every source.
/// * `constraint` - Optional hole/particle allow-lists applied to every source.
/// * `max_orb` - Optional orbital cut-off applied to every source.
/// * `exclude_sources` - If `true`, determinants that are themselves sources are dropped.
///
/// # Returns
///
/// The deduplicated connected determinants. An empty `sources` slice gives an empty array over
/// zero orbitals.
pub fn connected_determinants_of(
    sources: &[Determinant],
    kind: ExcitationKind,
    constraint: Option<&ExcitationConstraint>,
    max_orb: Option<usize>,
    exclude_sources: bool,
) -> Result<DeterminantArray, DeterminantError> {
    let Some(first) = sources.first() else {
        return Ok(DeterminantArray::from_generated(0, vec![]));
    };
    let n_mos = first.n_mos();
    sources
        .iter()
        .try_for_each(|source| first.check_dimension(source))?;

    let per_source = sources
        .par_iter()
        .map(|source| {
            let masks = ExcitationMasks::resolve(source, constraint, max_orb)?;
            Ok(generate_by_masks(source, &masks, kind))
        })
        .collect::<Result<Vec<_>, DeterminantError>>()?;
    let n_generated: usize = per_source.iter().map(Vec::len).sum();

    let source_set = if exclude_sources {
        sources.iter().collect::<IndexSet<_>>()
    } else {
        IndexSet::new()
    };
    let connected = per_source
        .into_iter()
        .flatten()
        .filter(|det| !source_set.contains(det))
        .collect::<IndexSet<Determinant>>();
    log::debug!(
        "{} source determinants gave {n_generated} excited determinants, {} of which are distinct and retained.",
        sources.len(),
        connected.len()
    );
    Ok(DeterminantArray::from_generated(
        n_mos,
        connected.into_iter().collect(),
    ))
}
