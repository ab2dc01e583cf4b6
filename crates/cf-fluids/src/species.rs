//! Chemical species definitions.

/// Chemical species of air, gaseous fuels and their combustion products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Oxygen (O₂)
    O2,
    /// Nitrogen (N₂)
    N2,
    /// Argon (Ar)
    Ar,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Carbon monoxide (CO)
    CO,
    /// Water (H₂O)
    H2O,
    /// Hydrogen (H₂)
    H2,
    /// Methane (CH₄)
    CH4,
    /// Ethane (C₂H₆)
    Ethane,
    /// Propane (C₃H₈)
    Propane,
    /// n-Butane (C₄H₁₀)
    Butane,
}

// Standard atomic weights [kg/kmol]
const C: f64 = 12.0107;
const H: f64 = 1.00794;
const O: f64 = 15.9994;
const N: f64 = 14.0067;
const AR: f64 = 39.948;

impl Species {
    pub const ALL: [Species; 11] = [
        Species::O2,
        Species::N2,
        Species::Ar,
        Species::CO2,
        Species::CO,
        Species::H2O,
        Species::H2,
        Species::CH4,
        Species::Ethane,
        Species::Propane,
        Species::Butane,
    ];

    /// Canonical short key, used in case files and reports.
    pub fn key(&self) -> &'static str {
        match self {
            Species::O2 => "O2",
            Species::N2 => "N2",
            Species::Ar => "Ar",
            Species::CO2 => "CO2",
            Species::CO => "CO",
            Species::H2O => "H2O",
            Species::H2 => "H2",
            Species::CH4 => "CH4",
            Species::Ethane => "C2H6",
            Species::Propane => "C3H8",
            Species::Butane => "C4H10",
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Species::O2 => "Oxygen",
            Species::N2 => "Nitrogen",
            Species::Ar => "Argon",
            Species::CO2 => "Carbon Dioxide",
            Species::CO => "Carbon Monoxide",
            Species::H2O => "Water",
            Species::H2 => "Hydrogen",
            Species::CH4 => "Methane",
            Species::Ethane => "Ethane",
            Species::Propane => "Propane",
            Species::Butane => "Butane",
        }
    }

    /// Molar mass [kg/kmol], summed from atomic weights so that reactions
    /// conserve mass exactly.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::O2 => 2.0 * O,
            Species::N2 => 2.0 * N,
            Species::Ar => AR,
            Species::CO2 => C + 2.0 * O,
            Species::CO => C + O,
            Species::H2O => 2.0 * H + O,
            Species::H2 => 2.0 * H,
            Species::CH4 => C + 4.0 * H,
            Species::Ethane => 2.0 * C + 6.0 * H,
            Species::Propane => 3.0 * C + 8.0 * H,
            Species::Butane => 4.0 * C + 10.0 * H,
        }
    }

    /// Number of carbon atoms per molecule.
    pub fn carbon_atoms(&self) -> u32 {
        match self {
            Species::CO2 | Species::CO | Species::CH4 => 1,
            Species::Ethane => 2,
            Species::Propane => 3,
            Species::Butane => 4,
            _ => 0,
        }
    }

    /// Number of hydrogen atoms per molecule.
    pub fn hydrogen_atoms(&self) -> u32 {
        match self {
            Species::H2O | Species::H2 => 2,
            Species::CH4 => 4,
            Species::Ethane => 6,
            Species::Propane => 8,
            Species::Butane => 10,
            _ => 0,
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "O2" | "OXYGEN" => Ok(Species::O2),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "AR" | "ARGON" => Ok(Species::Ar),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "CO" | "CARBONMONOXIDE" | "CARBON MONOXIDE" => Ok(Species::CO),
            "H2O" | "WATER" => Ok(Species::H2O),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "CH4" | "METHANE" => Ok(Species::CH4),
            "C2H6" | "ETHANE" => Ok(Species::Ethane),
            "C3H8" | "PROPANE" => Ok(Species::Propane),
            "C4H10" | "BUTANE" | "N-BUTANE" => Ok(Species::Butane),
            _ => Err("unknown species"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("methane".parse::<Species>().unwrap(), Species::CH4);
        assert_eq!("C3H8".parse::<Species>().unwrap(), Species::Propane);
        assert_eq!("n-butane".parse::<Species>().unwrap(), Species::Butane);
        assert_eq!(" Carbon Dioxide ".parse::<Species>().unwrap(), Species::CO2);
        assert!("He".parse::<Species>().is_err());
    }

    #[test]
    fn canonical_key_roundtrip() {
        for species in Species::ALL {
            assert_eq!(species.key().parse::<Species>().unwrap(), species);
        }
    }

    #[test]
    fn atom_counts_of_fuels() {
        assert_eq!(
            (Species::CH4.carbon_atoms(), Species::CH4.hydrogen_atoms()),
            (1, 4)
        );
        assert_eq!(
            (Species::Propane.carbon_atoms(), Species::Propane.hydrogen_atoms()),
            (3, 8)
        );
        assert_eq!(
            (Species::Butane.carbon_atoms(), Species::Butane.hydrogen_atoms()),
            (4, 10)
        );
        assert_eq!(Species::N2.carbon_atoms() + Species::N2.hydrogen_atoms(), 0);
    }

    #[test]
    fn molar_masses() {
        assert!((Species::CH4.molar_mass() - 16.04246).abs() < 1e-12);
        assert!((Species::Butane.molar_mass() - 58.1222).abs() < 1e-12);
        assert!((Species::CO2.molar_mass() - 44.0095).abs() < 1e-12);
        assert!((Species::H2O.molar_mass() - 18.01528).abs() < 1e-12);
    }

    #[test]
    fn methane_combustion_conserves_mass() {
        // CH4 + 2 O2 -> CO2 + 2 H2O
        let reactants = Species::CH4.molar_mass() + 2.0 * Species::O2.molar_mass();
        let products = Species::CO2.molar_mass() + 2.0 * Species::H2O.molar_mass();
        assert!((reactants - products).abs() < 1e-9 * reactants);
    }
}
