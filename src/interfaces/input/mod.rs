//! The YAML input schema of the `cidets` binary.

use anyhow::{self, ensure, format_err};
use serde::{Deserialize, Serialize};

use crate::determinant::Determinant;
use crate::drivers::excitation_generation::{
    ExcitationGenerationDriver, ExcitationGenerationParams,
};
use crate::drivers::CidetsDriver;
use crate::interfaces::InputHandle;
use crate::io::format::{cidets_error, log_macsec_begin, log_macsec_end};


/// A structure specifying one source determinant by the occupied orbitals of each spin channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterminantSpec {
    /// Indices of the occupied $`\alpha`$ orbitals.
    #[serde(default)]
    pub alpha: Vec<usize>,

    /// Indices of the occupied $`\beta`$ orbitals.
    #[serde(default)]
    pub beta: Vec<usize>,
}

/// A structure specifying the reference wavefunction out of which excitations are generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceInput {
    /// The number of molecular orbitals per spin channel.
    pub n_mos: usize,

    /// The source determinants.
    pub determinants: Vec<DeterminantSpec>,
}

impl ReferenceInput {
    /// Builds the source determinants described by this reference.
    ///
    /// # Returns
    ///
    /// The source determinants in the order given, or an error if the reference has no
    /// determinants or any orbital index is out of range.
    pub fn to_determinants(&self) -> Result<Vec<Determinant>, anyhow::Error> {
        ensure!(
            !self.determinants.is_empty(),
            "The reference must contain at least one determinant."
        );
        self.determinants
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Determinant::from_orbitals(self.n_mos, &spec.alpha, &spec.beta)
                    .map_err(|err| format_err!("Reference determinant {i}: {err}"))
            })
            .collect()
    }
}

/// A structure containing `cidets` input parameters which can be serialised into and
/// deserialised from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// The reference wavefunction.
    pub reference: ReferenceInput,

    /// Parameters for excited determinant generation.
    ///
    /// # Default
    ///
    /// If not specified, [`ExcitationGenerationParams::default`] is used.
    #[serde(default)]
    pub excitation_generation: ExcitationGenerationParams,
}

impl InputHandle for Input {
    /// Handles the `cidets` input.
    fn handle(&self) -> Result<(), anyhow::Error> {
        let sources = self.reference.to_determinants()?;
        let params = &self.excitation_generation;

        log_macsec_begin("Excited determinant generation");
        let mut driver = ExcitationGenerationDriver::builder()
            .parameters(params)
            .sources(&sources)
            .build()
            .map_err(|err| format_err!(err))?;
        let res = driver.run();
        log_macsec_end("Excited determinant generation");
        res.map_err(|err| {
            cidets_error!("Excited determinant generation failed: {err}");
            err
        })?;
        driver.result().map(|_| ())
    }
}
