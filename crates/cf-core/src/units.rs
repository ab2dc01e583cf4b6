// cf-core/src/units.rs

use uom::si::f64::{
    MassRate as UomMassRate, Power as UomPower, Pressure as UomPressure, Ratio as UomRatio,
    TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    use super::*;

    /// Universal gas constant [J/(kmol·K)].
    pub const R_UNIVERSAL: f64 = 8_314.462_618;

    /// Reference temperature of the lower heating value convention [K].
    pub const T_REF_K: f64 = 298.15;

    /// Reference pressure of the lower heating value convention [Pa].
    pub const P_REF_PA: f64 = 1.0e5;

    #[inline]
    pub fn t_ref() -> Temperature {
        k(T_REF_K)
    }

    #[inline]
    pub fn p_ref() -> Pressure {
        pa(P_REF_PA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_are_si() {
        assert_eq!(pa(101_325.0).value, 101_325.0);
        assert!((bar(1.2).value - 1.2e5).abs() < 1e-9);
        assert!((celsius(25.0).value - 298.15).abs() < 1e-9);
        assert_eq!(kgps(1.5).value, 1.5);
        assert_eq!(w(5e5).value, 5e5);
        assert_eq!(unitless(0.95).value, 0.95);
    }

    #[test]
    fn reference_state() {
        assert_eq!(constants::t_ref().value, constants::T_REF_K);
        assert_eq!(constants::p_ref().value, constants::P_REF_PA);
    }
}
