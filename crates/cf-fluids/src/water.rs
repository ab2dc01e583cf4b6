//! Water saturation line and latent heat.
//!
//! Used only to decide whether the water in a mixture condenses at the given
//! state. Vapour pressure follows the Wagner-Pruss short form, latent heat
//! the Watson correlation anchored at the normal boiling point.

use crate::error::{FluidError, FluidResult};

/// Critical temperature of water [K].
pub const T_CRIT: f64 = 647.096;

/// Critical pressure of water [Pa].
pub const P_CRIT: f64 = 22.064e6;

/// Triple-point temperature of water [K].
pub const T_TRIPLE: f64 = 273.16;

const T_BOIL: f64 = 373.15;
const H_FG_BOIL: f64 = 2.2565e6;
const WATSON_EXPONENT: f64 = 0.38;

const WAGNER: [f64; 6] = [
    -7.859_517_83,
    1.844_082_59,
    -11.786_649_7,
    22.680_741_1,
    -15.961_871_9,
    1.801_225_02,
];

/// Saturation pressure [Pa] at temperature `t` [K].
///
/// Valid from the triple point to the critical point; below the triple point
/// the liquid branch is extrapolated.
pub fn saturation_pressure(t: f64) -> FluidResult<f64> {
    if !t.is_finite() || t <= 0.0 {
        return Err(FluidError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    if t > T_CRIT {
        return Err(FluidError::OutOfRange {
            what: "saturation temperature above critical point",
            value: t,
        });
    }
    let theta = 1.0 - t / T_CRIT;
    let sum = WAGNER[0] * theta
        + WAGNER[1] * theta.powf(1.5)
        + WAGNER[2] * theta.powi(3)
        + WAGNER[3] * theta.powf(3.5)
        + WAGNER[4] * theta.powi(4)
        + WAGNER[5] * theta.powf(7.5);
    Ok(P_CRIT * (T_CRIT / t * sum).exp())
}

/// Latent heat of vaporisation [J/kg]; zero at and above the critical point.
pub fn latent_heat(t: f64) -> f64 {
    if t >= T_CRIT {
        return 0.0;
    }
    H_FG_BOIL * ((1.0 - t / T_CRIT) / (1.0 - T_BOIL / T_CRIT)).powf(WATSON_EXPONENT)
}

/// Temperature derivative of [`latent_heat`] [J/(kg·K)].
pub fn latent_heat_dt(t: f64) -> f64 {
    if t >= T_CRIT {
        return 0.0;
    }
    -WATSON_EXPONENT * latent_heat(t) / (T_CRIT - t)
}

/// Whether water at partial pressure `p_w` [Pa] and temperature `t` [K] is
/// liquid. Supercritical water is always vapour.
pub fn condenses(p_w: f64, t: f64) -> FluidResult<bool> {
    if t >= T_CRIT || p_w <= 0.0 {
        return Ok(false);
    }
    Ok(p_w >= saturation_pressure(t)?)
}
