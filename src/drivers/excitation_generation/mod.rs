//! Driver for the generation of excited determinants out of one or more source determinants.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::array::DeterminantArray;
use crate::determinant::{Determinant, SpinChannel};
use crate::drivers::CidetsDriver;
use crate::excitation::{
    connected_determinants_of, Excitation, ExcitationConstraint, ExcitationKind,
};
use crate::io::format::{
    cidets_output, cidets_warn, log_subtitle, log_title, nice_bool, write_subtitle, write_title,
    CidetsOutput,
};
use crate::io::{write_cidets_binary, CidetsFileType};


// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

fn default_true() -> bool {
    true
}

/// A structure containing control parameters for the generation of excited determinants.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ExcitationGenerationParams {
    /// The family of excited determinants to generate.
    #[builder(default = "ExcitationKind::Connected")]
    #[serde(default)]
    pub excitation_kind: ExcitationKind,

    /// Optional allow-lists restricting where holes and particles may be created.
    #[builder(default = "None")]
    #[serde(default)]
    pub constraint: Option<ExcitationConstraint>,

    /// Optional cut-off: only orbitals with indices below this value take part in excitations.
    #[builder(default = "None")]
    #[serde(default)]
    pub max_orb: Option<usize>,

    /// Boolean indicating if determinants that coincide with a source determinant are dropped.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub exclude_sources: bool,

    /// Boolean indicating if every generated determinant is written to the output.
    #[builder(default = "false")]
    #[serde(default)]
    pub write_determinants: bool,

    /// Optional name for the binary files to which the generated determinants
    /// ([`CidetsFileType::Det`]) and the full generation result ([`CidetsFileType::Exc`]) are
    /// saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl ExcitationGenerationParams {
    /// Returns a builder to construct a [`ExcitationGenerationParams`] structure.
    pub fn builder() -> ExcitationGenerationParamsBuilder {
        ExcitationGenerationParamsBuilder::default()
    }
}

impl Default for ExcitationGenerationParams {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("Unable to construct a default `ExcitationGenerationParams`.")
    }
}

impl fmt::Display for ExcitationGenerationParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_title(f, "Excited Determinant Generation")?;
        writeln!(f)?;
        writeln!(f, "Excitation kind: {}", self.excitation_kind)?;
        writeln!(
            f,
            "Excitation constraint: {}",
            self.constraint
                .as_ref()
                .map(|cons| cons.to_string())
                .unwrap_or_else(|| "none".to_string())
        )?;
        writeln!(
            f,
            "Orbital cut-off: {}",
            self.max_orb
                .map(|max_orb| max_orb.to_string())
                .unwrap_or_else(|| "none".to_string())
        )?;
        writeln!(
            f,
            "Exclude source determinants: {}",
            nice_bool(self.exclude_sources)
        )?;
        writeln!(
            f,
            "Write generated determinants: {}",
            nice_bool(self.write_determinants)
        )?;
        if let Some(name) = self.result_save_name.as_ref() {
            writeln!(f, "Save generated determinants to: {}", name.display())?;
        }
        writeln!(f)?;

        Ok(())
    }
}

// ------
// Result
// ------

/// A structure to contain the results of excited determinant generation.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ExcitationGenerationResult {
    /// The control parameters used to obtain this set of results.
    parameters: ExcitationGenerationParams,

    /// The source determinants.
    sources: Vec<Determinant>,

    /// The generated determinants.
    determinants: DeterminantArray,
}

impl ExcitationGenerationResult {
    fn builder() -> ExcitationGenerationResultBuilder {
        ExcitationGenerationResultBuilder::default()
    }

    /// Returns the control parameters used to obtain this set of results.
    pub fn parameters(&self) -> &ExcitationGenerationParams {
        &self.parameters
    }

    /// Returns the source determinants.
    pub fn sources(&self) -> &[Determinant] {
        &self.sources
    }

    /// Returns the generated determinants.
    pub fn determinants(&self) -> &DeterminantArray {
        &self.determinants
    }

    /// Consumes the result and returns the generated determinants.
    pub fn into_determinants(self) -> DeterminantArray {
        self.determinants
    }

    /// Tallies the generated determinants by the excitation connecting them to the first
    /// source, as `(singles α, singles β, doubles αα, doubles ββ, doubles αβ, other)`.
    fn tally(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        let Some(source) = self.sources.first() else {
            return counts;
        };
        self.determinants.iter().for_each(|det| {
            let slot = match Excitation::between(source, det) {
                Ok(Some(Excitation::Single { spin: SpinChannel::Alpha, .. })) => 0,
                Ok(Some(Excitation::Single { spin: SpinChannel::Beta, .. })) => 1,
                Ok(Some(Excitation::SameSpinDouble { spin: SpinChannel::Alpha, .. })) => 2,
                Ok(Some(Excitation::SameSpinDouble { spin: SpinChannel::Beta, .. })) => 3,
                Ok(Some(Excitation::OppositeSpinDouble { .. })) => 4,
                Ok(None) | Err(_) => 5,
            };
            counts[slot] += 1;
        });
        counts
    }
}

impl fmt::Display for ExcitationGenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtitle(f, "Generated determinants")?;
        writeln!(f, "Number of molecular orbitals: {}", self.determinants.n_mos())?;
        writeln!(f, "Number of source determinants: {}", self.sources.len())?;
        writeln!(
            f,
            "Number of generated determinants: {}",
            self.determinants.len()
        )?;
        writeln!(f)?;

        let [sa, sb, daa, dbb, dab, other] = self.tally();
        let first = if self.sources.len() > 1 {
            " (relative to the first source)"
        } else {
            ""
        };
        writeln!(f, "Breakdown by excitation{first}:")?;
        writeln!(f, "  Singles α         : {sa:>10}")?;
        writeln!(f, "  Singles β         : {sb:>10}")?;
        writeln!(f, "  Doubles αα        : {daa:>10}")?;
        writeln!(f, "  Doubles ββ        : {dbb:>10}")?;
        writeln!(f, "  Doubles αβ        : {dab:>10}")?;
        if other > 0 {
            writeln!(f, "  Higher/unrelated  : {other:>10}")?;
        }
        writeln!(f)?;
        Ok(())
    }
}

// ------
// Driver
// ------

/// A driver for the generation of excited determinants.
#[derive(Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ExcitationGenerationDriver<'a> {
    /// The control parameters for excited determinant generation.
    parameters: &'a ExcitationGenerationParams,

    /// The source determinants.
    sources: &'a [Determinant],

    /// The result of the generation.
    #[builder(setter(skip), default = "None")]
    result: Option<ExcitationGenerationResult>,
}

impl<'a> ExcitationGenerationDriverBuilder<'a> {
    fn validate(&self) -> Result<(), String> {
        let params = self
            .parameters
            .ok_or("No excited determinant generation parameters found.".to_string())?;
        let sources = self
            .sources
            .ok_or("No source determinants found.".to_string())?;
        let first = sources
            .first()
            .ok_or("At least one source determinant is required.".to_string())?;
        let n_mos = first.n_mos();
        if sources.iter().any(|det| det.n_mos() != n_mos) {
            log::error!("Source determinants span different numbers of molecular orbitals.");
            return Err("Inconsistent source determinants.".to_string());
        }
        if let Some(max_orb) = params.max_orb {
            if max_orb > n_mos {
                return Err(format!(
                    "The orbital cut-off {max_orb} exceeds the number of molecular orbitals {n_mos}."
                ));
            }
        }
        Ok(())
    }
}

impl<'a> ExcitationGenerationDriver<'a> {
    /// Returns a builder to construct a [`ExcitationGenerationDriver`] structure.
    pub fn builder() -> ExcitationGenerationDriverBuilder<'a> {
        ExcitationGenerationDriverBuilder::default()
    }

    fn generate(&mut self) -> Result<(), anyhow::Error> {
        let params = self.parameters;
        params.log_output_display();

        log_subtitle("Source determinants");
        self.sources
            .iter()
            .enumerate()
            .for_each(|(i, det)| {
                cidets_output!("{i:>4}  {det}");
            });
        cidets_output!("");

        let determinants = connected_determinants_of(
            self.sources,
            params.excitation_kind,
            params.constraint.as_ref(),
            params.max_orb,
            params.exclude_sources,
        )?;
        if determinants.is_empty() {
            cidets_warn!("No excited determinants satisfy the requested excitation criteria.");
        }

        let result = ExcitationGenerationResult::builder()
            .parameters(params.clone())
            .sources(self.sources.to_vec())
            .determinants(determinants)
            .build()?;
        result.log_output_display();

        if params.write_determinants {
            log_subtitle("Determinant listing (α|β)");
            result.determinants().log_output_display();
            cidets_output!("");
        }

        if let Some(name) = params.result_save_name.as_ref() {
            write_cidets_binary(name, CidetsFileType::Det, result.determinants())?;
            write_cidets_binary(name, CidetsFileType::Exc, &result)?;
            cidets_output!(
                "Generated determinants saved as {}.",
                CidetsFileType::Det.path(name).display()
            );
            cidets_output!(
                "Full generation results saved as {}.",
                CidetsFileType::Exc.path(name).display()
            );
            cidets_output!("");
        }

        self.result = Some(result);
        Ok(())
    }
}

impl<'a> CidetsDriver for ExcitationGenerationDriver<'a> {
    type Params = ExcitationGenerationParams;

    type Outcome = ExcitationGenerationResult;

    fn run(&mut self) -> Result<(), anyhow::Error> {
        log_title("Excited Determinant Generation");
        self.generate()
    }

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No excited determinant generation results found."))
    }
}
