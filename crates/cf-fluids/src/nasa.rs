//! NASA 7-coefficient ideal-gas polynomials (GRI-Mech 3.0 data set; n-butane
//! fitted to TRC ideal-gas heat capacities with hf = -125.6 kJ/mol).
//!
//! `cp/R = a1 + a2 T + a3 T² + a4 T³ + a5 T⁴`
//! `h/(R T) = a1 + a2 T/2 + a3 T²/3 + a4 T³/4 + a5 T⁴/5 + a6/T`
//!
//! Enthalpies include the enthalpy of formation at 298.15 K, so a single
//! scale serves both sensible heat and reaction heat.

use crate::species::Species;
use cf_core::units::constants::R_UNIVERSAL;

/// Two-range polynomial set for one species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nasa7 {
    /// Switch temperature between the low and high range [K].
    pub t_mid: f64,
    pub low: [f64; 7],
    pub high: [f64; 7],
}

impl Nasa7 {
    fn coeffs(&self, t: f64) -> &[f64; 7] {
        if t < self.t_mid { &self.low } else { &self.high }
    }

    /// Dimensionless heat capacity `cp / R`.
    pub fn cp_r(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Dimensionless enthalpy `h / (R T)`.
    pub fn h_rt(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0)))
            + a[5] / t
    }
}

/// Specific enthalpy of the ideal-gas species [J/kg].
pub fn specific_enthalpy(species: Species, t: f64) -> f64 {
    R_UNIVERSAL / species.molar_mass() * t * polynomial(species).h_rt(t)
}

/// Specific isobaric heat capacity of the ideal-gas species [J/(kg·K)].
pub fn specific_cp(species: Species, t: f64) -> f64 {
    R_UNIVERSAL / species.molar_mass() * polynomial(species).cp_r(t)
}

pub fn polynomial(species: Species) -> &'static Nasa7 {
    match species {
        Species::O2 => &O2,
        Species::N2 => &N2,
        Species::Ar => &AR,
        Species::CO2 => &CO2,
        Species::CO => &CO,
        Species::H2O => &H2O,
        Species::H2 => &H2,
        Species::CH4 => &CH4,
        Species::Ethane => &C2H6,
        Species::Propane => &C3H8,
        Species::Butane => &C4H10,
    }
}

const O2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        3.782_456_36,
        -2.996_734_16e-3,
        9.847_302_01e-6,
        -9.681_295_09e-9,
        3.243_728_37e-12,
        -1.063_943_56e3,
        3.657_675_73,
    ],
    high: [
        3.282_537_84,
        1.483_087_54e-3,
        -7.579_666_69e-7,
        2.094_705_55e-10,
        -2.167_177_94e-14,
        -1.088_457_72e3,
        5.453_231_29,
    ],
};

const N2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        3.298_677,
        1.408_240_4e-3,
        -3.963_222e-6,
        5.641_515e-9,
        -2.444_854e-12,
        -1.020_899_9e3,
        3.950_372,
    ],
    high: [
        2.926_64,
        1.487_976_8e-3,
        -5.684_76e-7,
        1.009_703_8e-10,
        -6.753_351e-15,
        -9.227_977e2,
        5.980_528,
    ],
};

const AR: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [2.5, 0.0, 0.0, 0.0, 0.0, -7.453_75e2, 4.366],
    high: [2.5, 0.0, 0.0, 0.0, 0.0, -7.453_75e2, 4.366],
};

const CO2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        2.356_773_52,
        8.984_596_77e-3,
        -7.123_562_69e-6,
        2.459_190_22e-9,
        -1.436_995_48e-13,
        -4.837_196_97e4,
        9.901_052_22,
    ],
    high: [
        3.857_460_29,
        4.414_370_26e-3,
        -2.214_814_04e-6,
        5.234_901_88e-10,
        -4.720_841_64e-14,
        -4.875_916_60e4,
        2.271_638_06,
    ],
};

const CO: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        3.579_533_47,
        -6.103_536_80e-4,
        1.016_814_33e-6,
        9.070_058_84e-10,
        -9.044_244_99e-13,
        -1.434_408_60e4,
        3.508_409_28,
    ],
    high: [
        2.715_185_61,
        2.062_527_43e-3,
        -9.988_257_71e-7,
        2.300_530_08e-10,
        -2.036_477_16e-14,
        -1.415_187_24e4,
        7.818_687_72,
    ],
};

const H2O: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        4.198_640_56,
        -2.036_434_10e-3,
        6.520_402_11e-6,
        -5.487_970_62e-9,
        1.771_978_17e-12,
        -3.029_372_67e4,
        -8.490_322_08e-1,
    ],
    high: [
        3.033_992_49,
        2.176_918_04e-3,
        -1.640_725_18e-7,
        -9.704_198_70e-11,
        1.682_009_92e-14,
        -3.000_429_71e4,
        4.966_770_10,
    ],
};

const H2: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        2.344_331_12,
        7.980_520_75e-3,
        -1.947_815_10e-5,
        2.015_720_94e-8,
        -7.376_117_61e-12,
        -9.179_351_73e2,
        6.830_102_38e-1,
    ],
    high: [
        3.337_279_20,
        -4.940_247_31e-5,
        4.994_567_78e-7,
        -1.795_663_94e-10,
        2.002_553_76e-14,
        -9.501_589_22e2,
        -3.205_023_31,
    ],
};

const CH4: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        5.149_876_13,
        -1.367_097_88e-2,
        4.918_005_99e-5,
        -4.847_430_26e-8,
        1.666_939_56e-11,
        -1.024_664_76e4,
        -4.641_303_76,
    ],
    high: [
        7.485_149_50e-2,
        1.339_094_67e-2,
        -5.732_858_09e-6,
        1.222_925_35e-9,
        -1.018_152_30e-13,
        -9.468_344_59e3,
        1.843_731_80e1,
    ],
};

const C2H6: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        4.291_424_92,
        -5.501_542_70e-3,
        5.994_382_88e-5,
        -7.084_662_85e-8,
        2.686_857_71e-11,
        -1.152_220_55e4,
        2.666_823_16,
    ],
    high: [
        1.071_881_50,
        2.168_526_77e-2,
        -1.002_560_67e-5,
        2.214_120_01e-9,
        -1.900_028_90e-13,
        -1.142_639_32e4,
        1.511_561_07e1,
    ],
};

const C3H8: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        9.335_538_1e-1,
        2.642_457_9e-2,
        6.105_972_7e-6,
        -2.197_749_9e-8,
        9.514_925_3e-12,
        -1.395_852_0e4,
        1.920_169_1e1,
    ],
    high: [
        7.534_136_8,
        1.887_223_9e-2,
        -6.271_849_1e-6,
        9.147_564_9e-10,
        -4.783_806_9e-14,
        -1.646_751_6e4,
        -1.789_234_9e1,
    ],
};

const C4H10: Nasa7 = Nasa7 {
    t_mid: 1000.0,
    low: [
        4.064_154_40,
        1.806_001_97e-2,
        4.435_016_02e-5,
        -6.295_999_37e-8,
        2.376_280_58e-11,
        -1.739_927_54e4,
        7.309_644_26,
    ],
    high: [
        1.002_281_58e1,
        2.433_060_91e-2,
        -8.308_928_44e-6,
        1.310_288_81e-9,
        -7.763_882_85e-14,
        -2.023_968_37e4,
        -2.925_569_19e1,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn molar_enthalpy_kj(species: Species, t: f64) -> f64 {
        specific_enthalpy(species, t) * species.molar_mass() / 1.0e6
    }

    #[test]
    fn formation_enthalpies_at_reference() {
        let cases = [
            (Species::O2, 0.0),
            (Species::N2, 0.0),
            (Species::H2, 0.0),
            (Species::CO2, -393.51),
            (Species::H2O, -241.83),
            (Species::CH4, -74.6),
            (Species::Butane, -125.6),
        ];
        for (species, hf) in cases {
            let h = molar_enthalpy_kj(species, 298.15);
            assert!((h - hf).abs() < 0.1, "{species}: {h} vs {hf}");
        }
    }

    #[test]
    fn ranges_join_continuously() {
        for species in Species::ALL {
            let poly = polynomial(species);
            let below = poly.h_rt(poly.t_mid - 1e-9);
            let above = poly.h_rt(poly.t_mid);
            assert!((below - above).abs() < 1e-4, "{species} h jump");
            let cp_below = poly.cp_r(poly.t_mid - 1e-9);
            let cp_above = poly.cp_r(poly.t_mid);
            assert!((cp_below - cp_above).abs() < 1e-3, "{species} cp jump");
        }
    }

    #[test]
    fn sensible_heat_of_nitrogen() {
        // JANAF: H(1500 K) - H(298.15 K) = 38.40 kJ/mol
        let dh = molar_enthalpy_kj(Species::N2, 1500.0) - molar_enthalpy_kj(Species::N2, 298.15);
        assert!((dh - 38.40).abs() < 0.05, "dh = {dh}");
    }

    #[test]
    fn butane_heat_capacity() {
        // TRC ideal-gas values [J/(mol K)]
        for (t, expected) in [(298.15, 98.49), (600.0, 169.28), (1000.0, 227.36)] {
            let cp = specific_cp(Species::Butane, t) * Species::Butane.molar_mass() / 1.0e3;
            assert!((cp - expected).abs() < 0.01 * expected, "{t} K: {cp}");
        }
    }

    #[test]
    fn cp_is_derivative_of_h() {
        for species in [Species::CO2, Species::H2O, Species::CH4] {
            let t = 700.0;
            let dt = 1e-3;
            let fd = (specific_enthalpy(species, t + dt) - specific_enthalpy(species, t - dt))
                / (2.0 * dt);
            let cp = specific_cp(species, t);
            assert!((fd - cp).abs() < 1e-3 * cp, "{species}: {fd} vs {cp}");
        }
    }
}
