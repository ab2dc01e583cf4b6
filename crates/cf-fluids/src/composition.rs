//! Fluid composition by mass fractions.

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use crate::state::MassFraction;
use cf_core::numeric::{Tolerances, nearly_equal};

/// Fluid composition as mass fractions over an ordered species list.
///
/// Compositions built through the checked constructors are normalized. The
/// solver may write raw fractions during iteration (see [`Composition::set`]);
/// property functions treat fractions as independent and never renormalize,
/// which keeps their derivatives consistent with the values.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    items: Vec<(Species, MassFraction)>,
}

impl Composition {
    /// Create a pure-species composition.
    pub fn pure(species: Species) -> Self {
        Self {
            items: vec![(species, 1.0)],
        }
    }

    /// All-zero composition over `species`, used as a placeholder for
    /// solver-free fluid vectors.
    pub fn zeros(species: &[Species]) -> Self {
        Self {
            items: species.iter().map(|&s| (s, 0.0)).collect(),
        }
    }

    /// Create a composition from mass fractions.
    ///
    /// Validates that fractions are finite, non-negative, unique per species
    /// and have a positive sum, then normalizes to sum=1. Zero entries are
    /// kept so the species order stays fixed.
    pub fn new_mass_fractions(fractions: Vec<(Species, MassFraction)>) -> FluidResult<Self> {
        if fractions.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut sum = 0.0;
        for (i, (species, frac)) in fractions.iter().enumerate() {
            if !frac.is_finite() {
                return Err(FluidError::NonPhysical {
                    what: "non-finite mass fraction",
                });
            }
            if *frac < 0.0 {
                return Err(FluidError::NonPhysical {
                    what: "negative mass fraction",
                });
            }
            if fractions[..i].iter().any(|(s, _)| s == species) {
                return Err(FluidError::InvalidArg {
                    what: "duplicate species in composition",
                });
            }
            sum += frac;
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "mass fractions sum to zero or non-finite",
            });
        }

        Ok(Self {
            items: fractions.into_iter().map(|(s, f)| (s, f / sum)).collect(),
        })
    }

    /// Re-express this composition over an ordered species list.
    ///
    /// Species missing from `self` get a zero fraction. A species of `self`
    /// with a non-zero fraction that is absent from `species` is an error.
    pub fn expand_to(&self, species: &[Species]) -> FluidResult<Self> {
        for (s, f) in &self.items {
            if *f > 0.0 && !species.contains(s) {
                return Err(FluidError::NotSupported {
                    what: format!("species {s} is not part of the fluid list"),
                });
            }
        }
        Ok(Self {
            items: species
                .iter()
                .map(|&s| (s, self.mass_fraction(s)))
                .collect(),
        })
    }

    /// Mass fraction of a species (0.0 if not present).
    pub fn mass_fraction(&self, species: Species) -> MassFraction {
        self.items
            .iter()
            .find(|(s, _)| *s == species)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Position of a species in the ordered list.
    pub fn index_of(&self, species: Species) -> Option<usize> {
        self.items.iter().position(|(s, _)| *s == species)
    }

    /// Fraction at list position `i`.
    pub fn get(&self, i: usize) -> MassFraction {
        self.items[i].1
    }

    /// Overwrite the raw fraction at list position `i` (no renormalization).
    pub fn set(&mut self, i: usize, value: MassFraction) {
        self.items[i].1 = value;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ordered species list.
    pub fn species(&self) -> impl Iterator<Item = Species> + '_ {
        self.items.iter().map(|(s, _)| *s)
    }

    /// Iterate over `(species, mass fraction)` in list order.
    pub fn iter(&self) -> impl Iterator<Item = (Species, MassFraction)> + '_ {
        self.items.iter().copied()
    }

    /// Sum of raw fractions.
    pub fn sum(&self) -> f64 {
        self.items.iter().map(|(_, f)| f).sum()
    }

    /// Check if this is a single-species composition.
    pub fn is_pure(&self) -> Option<Species> {
        let tol = Tolerances::new(1e-10, 1e-10);
        self.items
            .iter()
            .find(|(_, f)| nearly_equal(*f, 1.0, tol))
            .map(|(s, _)| *s)
    }

    /// Mixture molar mass [kg/kmol]: `1 / Σ (w_i / M_i)`.
    pub fn molar_mass(&self) -> FluidResult<f64> {
        let inv: f64 = self
            .items
            .iter()
            .map(|(s, w)| w.max(0.0) / s.molar_mass())
            .sum();
        if inv <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "composition without positive fractions",
            });
        }
        Ok(1.0 / inv)
    }

    /// Mole fraction of a species.
    pub fn mole_fraction(&self, species: Species) -> FluidResult<f64> {
        let m_mix = self.molar_mass()?;
        Ok(self.mass_fraction(species).max(0.0) * m_mix / species.molar_mass())
    }
}
