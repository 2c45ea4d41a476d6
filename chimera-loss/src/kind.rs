//! Selection of a loss formulation by the training driver.

use std::str::FromStr;

use burn::config::Config;

use crate::error::ChimeraLossError;

/// The available loss formulations.
#[derive(Config, Debug, PartialEq, Eq)]
pub enum LossKind {
    /// Deep clustering + magnitude spectrum approximation, two speakers.
    Msa,
    /// Deep clustering + phase-sensitive approximation, two speakers.
    ChimeraPsa,
    /// Single-mask phase-sensitive approximation.
    MaskPsa,
    /// Direct regression of the clean magnitude.
    MaskMsa,
}

impl LossKind {
    /// Every formulation, in declaration order.
    pub const ALL: [Self; 4] = [Self::Msa, Self::ChimeraPsa, Self::MaskPsa, Self::MaskMsa];

    /// Name of the matching free function.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Msa => "loss_msa",
            Self::ChimeraPsa => "loss_chimera_psa",
            Self::MaskPsa => "loss_mask_psa",
            Self::MaskMsa => "loss_mask_msa",
        }
    }

    /// Whether the formulation has a deep clustering term.
    #[must_use]
    pub const fn uses_embedding(&self) -> bool {
        matches!(self, Self::Msa | Self::ChimeraPsa)
    }

    /// Whether targets are truncated with the phase-difference cosine.
    #[must_use]
    pub const fn is_phase_sensitive(&self) -> bool {
        matches!(self, Self::ChimeraPsa | Self::MaskPsa)
    }

    /// Number of separated sources the formulation expects.
    #[must_use]
    pub const fn speakers(&self) -> usize {
        if self.uses_embedding() {
            2
        } else {
            1
        }
    }
}

impl FromStr for LossKind {
    type Err = ChimeraLossError;

    /// Accepts the function name (`loss_chimera_psa`) or its kebab-case short form
    /// (`chimera-psa`).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let short = name.strip_prefix("loss_").unwrap_or(name).replace('_', "-");
        match short.as_str() {
            "msa" => Ok(Self::Msa),
            "chimera-psa" => Ok(Self::ChimeraPsa),
            "mask-psa" => Ok(Self::MaskPsa),
            "mask-msa" => Ok(Self::MaskMsa),
            _ => Err(ChimeraLossError::UnknownLoss {
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_function_names_and_short_forms() {
        for kind in LossKind::ALL {
            assert_eq!(kind.name().parse::<LossKind>(), Ok(kind.clone()));
        }
        assert_eq!("chimera-psa".parse::<LossKind>(), Ok(LossKind::ChimeraPsa));
        assert_eq!("mask_msa".parse::<LossKind>(), Ok(LossKind::MaskMsa));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "loss_si_snr".parse::<LossKind>(),
            Err(ChimeraLossError::UnknownLoss {
                name: "loss_si_snr".to_owned()
            })
        );
    }

    #[test]
    fn embedding_formulations_separate_two_speakers() {
        assert!(LossKind::Msa.uses_embedding());
        assert!(!LossKind::Msa.is_phase_sensitive());
        assert_eq!(LossKind::ChimeraPsa.speakers(), 2);
        assert!(LossKind::MaskPsa.is_phase_sensitive());
        assert_eq!(LossKind::MaskMsa.speakers(), 1);
    }
}
