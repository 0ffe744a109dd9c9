//! # cidets: Excited Determinants for Configuration Interaction
//!
//! `cidets` generates the excited Slater determinants needed to build configuration-interaction
//! spaces out of one or more reference determinants, with the following capabilities:
//! - compact occupation-number representations of determinants, one bit per spin orbital,
//! - generation of all single, same-spin double and opposite-spin double excitations,
//! - restriction of excitations by hole/particle allow-lists and by an orbital cut-off,
//! - fermionic phases accompanying every excitation,
//! - identification of the excitation connecting two determinants, and
//! - the connected space of a multi-determinantal wavefunction.
//!
//! ## Getting started
//!
//! Determinants are built from the occupied orbitals of each spin channel, and excitations are
//! generated from them by the routines in [`excitation`]:
//!
//! ```
//! use cidets::determinant::Determinant;
//! use cidets::excitation::all_singles;
//!
//! let det = Determinant::from_orbitals(4, &[0, 1], &[0, 1]).unwrap();
//! let singles = all_singles(&det);
//! assert_eq!(singles.len(), 8);
//! ```
//!
//! ## Binary usage
//!
//! The `cidets` binary reads a YAML configuration file:
//!
//! ```yaml
//! reference:
//!   n_mos: 6
//!   determinants:
//!     - alpha: [0, 1]
//!       beta: [0, 1]
//! excitation_generation:
//!   excitation_kind: Connected
//!   constraint:
//!     holes: [1]
//!     particles: [2, 3]
//!   max_orb: 5
//!   write_determinants: true
//! ```
//!
//! and is run as `cidets --config input.yml --output result`, the main output then being written
//! to `result.out`.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod array;
pub mod determinant;
pub mod drivers;
pub mod excitation;
pub mod interfaces;
pub mod io;
pub mod phase;
