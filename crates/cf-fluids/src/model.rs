//! Fluid property model trait and validation helpers.

use crate::composition::Composition;
use crate::error::{FluidError, FluidResult};
use crate::state::{SpecEnthalpy, SpecHeatCapacity};
use cf_core::numeric::fd_step;
use cf_core::units::{Pressure, Temperature, k};

/// Lowest temperature accepted by property evaluations [K].
pub const T_MIN: f64 = 100.0;

/// Highest temperature accepted by property evaluations [K].
pub const T_MAX: f64 = 6000.0;

/// Trait for fluid property models.
///
/// Implementations must be thread-safe (Send + Sync). All methods validate
/// their inputs. Enthalpies share one absolute scale (formation enthalpy
/// included), so differences across compositions are meaningful.
pub trait FluidModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this model supports the given composition.
    fn supports_composition(&self, comp: &Composition) -> bool;

    /// Mixture specific enthalpy [J/kg] at pressure and temperature.
    ///
    /// With `force_gas` set, water is evaluated as vapour even where its
    /// partial pressure exceeds saturation.
    fn h_mix_pt(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<SpecEnthalpy>;

    /// Partial derivatives of [`FluidModel::h_mix_pt`] with respect to each
    /// mass fraction of `comp`, holding the others fixed.
    ///
    /// The default perturbs each fraction by central differences.
    fn dh_mix_dx_pt(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<Vec<f64>> {
        dh_dx_by_difference(self, p, t, comp, force_gas)
    }

    /// Mixture isobaric heat capacity [J/(kg·K)].
    fn cp_mix_pt(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<SpecHeatCapacity> {
        cp_by_difference(self, p, t, comp, force_gas)
    }

    /// Temperature at which the mixture has enthalpy `h` at pressure `p`.
    ///
    /// Safeguarded Newton iteration inside `[T_MIN, T_MAX]`: a Newton step
    /// leaving the current bracket is replaced by bisection, which keeps the
    /// solve robust across the condensation kink.
    fn t_mix_ph(
        &self,
        p: Pressure,
        h: SpecEnthalpy,
        comp: &Composition,
        guess: Option<Temperature>,
    ) -> FluidResult<Temperature> {
        validation::validate_pressure(p)?;
        validation::validate_enthalpy(h)?;

        let f = |t: f64| -> FluidResult<f64> { Ok(self.h_mix_pt(p, k(t), comp, false)? - h) };

        let mut lo = T_MIN;
        let mut hi = T_MAX;
        if f(lo)? > 0.0 {
            return Err(FluidError::OutOfRange {
                what: "enthalpy below lowest supported temperature",
                value: h,
            });
        }
        if f(hi)? < 0.0 {
            return Err(FluidError::OutOfRange {
                what: "enthalpy above highest supported temperature",
                value: h,
            });
        }

        let mut t = guess.map(|g| g.value).unwrap_or(1000.0).clamp(lo, hi);
        let tol_h = 1e-9 * h.abs().max(1.0e3);

        for _ in 0..100 {
            let r = f(t)?;
            if r.abs() <= tol_h {
                return Ok(k(t));
            }
            if r > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            let cp = self.cp_mix_pt(p, k(t), comp, false)?;
            let newton = t - r / cp;
            let next = if cp > 0.0 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
            if (next - t).abs() <= 1e-10 * t {
                return Ok(k(next));
            }
            t = next;
        }

        Err(FluidError::ConvergenceFailed {
            what: "temperature from pressure and enthalpy",
        })
    }
}

/// Central-difference composition derivative of the mixture enthalpy.
///
/// Fractions are perturbed without renormalisation, matching the partial
/// derivative the solver needs.
pub fn dh_dx_by_difference<M: FluidModel + ?Sized>(
    model: &M,
    p: Pressure,
    t: Temperature,
    comp: &Composition,
    force_gas: bool,
) -> FluidResult<Vec<f64>> {
    let mut work = comp.clone();
    let mut out = Vec::with_capacity(comp.len());
    for i in 0..comp.len() {
        let x = comp.get(i);
        let step = fd_step(x, 1e-6);
        // one-sided at zero so fractions stay non-negative
        let lo = if x - step < 0.0 { x } else { x - step };
        work.set(i, x + step);
        let up = model.h_mix_pt(p, t, &work, force_gas)?;
        work.set(i, lo);
        let down = model.h_mix_pt(p, t, &work, force_gas)?;
        work.set(i, x);
        out.push((up - down) / (x + step - lo));
    }
    Ok(out)
}

/// Central-difference heat capacity in temperature.
pub fn cp_by_difference<M: FluidModel + ?Sized>(
    model: &M,
    p: Pressure,
    t: Temperature,
    comp: &Composition,
    force_gas: bool,
) -> FluidResult<SpecHeatCapacity> {
    let dt = fd_step(t.value, 1e-6);
    let up = model.h_mix_pt(p, k(t.value + dt), comp, force_gas)?;
    let down = model.h_mix_pt(p, k(t.value - dt), comp, force_gas)?;
    let cp = (up - down) / (2.0 * dt);
    validation::validate_cp(cp)?;
    Ok(cp)
}

/// Validation helpers for fluid properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is finite and inside the supported range.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if t.value < T_MIN || t.value > T_MAX {
            return Err(FluidError::OutOfRange {
                what: "temperature",
                value: t.value,
            });
        }
        Ok(())
    }

    /// Ensure specific heat capacity is positive and finite.
    pub fn validate_cp(cp: f64) -> FluidResult<()> {
        if !cp.is_finite() || cp <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "cp must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure enthalpy is finite (can be negative).
    pub fn validate_enthalpy(h: f64) -> FluidResult<()> {
        if !h.is_finite() {
            return Err(FluidError::NonPhysical {
                what: "enthalpy must be finite",
            });
        }
        Ok(())
    }

    /// Ensure every mass fraction is finite and non-negative.
    pub fn validate_fractions(comp: &Composition) -> FluidResult<()> {
        if comp.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "composition has no species",
            });
        }
        if comp.iter().any(|(_, w)| !w.is_finite() || w < 0.0) {
            return Err(FluidError::NonPhysical {
                what: "mass fractions must be non-negative and finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;
    use crate::species::Species;
    use cf_core::units::pa;

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(pa(101325.0)).is_ok());
        assert!(validate_pressure(pa(-100.0)).is_err());
        assert!(validate_pressure(pa(0.0)).is_err());
        assert!(validate_pressure(pa(f64::NAN)).is_err());
    }

    #[test]
    fn validate_temperature_range() {
        assert!(validate_temperature(k(300.0)).is_ok());
        assert!(validate_temperature(k(-10.0)).is_err());
        assert!(matches!(
            validate_temperature(k(T_MAX + 1.0)),
            Err(FluidError::OutOfRange { .. })
        ));
    }

    #[test]
    fn validate_cp_positive() {
        assert!(validate_cp(1000.0).is_ok());
        assert!(validate_cp(-100.0).is_err());
        assert!(validate_cp(0.0).is_err());
    }

    /// Linear toy model: h = cp * T per species, no composition coupling.
    struct Linear;

    impl FluidModel for Linear {
        fn name(&self) -> &str {
            "linear"
        }

        fn supports_composition(&self, _comp: &Composition) -> bool {
            true
        }

        fn h_mix_pt(
            &self,
            _p: Pressure,
            t: Temperature,
            comp: &Composition,
            _force_gas: bool,
        ) -> FluidResult<SpecEnthalpy> {
            Ok(comp
                .iter()
                .map(|(s, w)| w * s.molar_mass() * 10.0 * t.value)
                .sum())
        }
    }

    #[test]
    fn default_derivatives_follow_definition() {
        let comp =
            Composition::new_mass_fractions(vec![(Species::N2, 0.7), (Species::O2, 0.3)]).unwrap();
        let dx = Linear.dh_mix_dx_pt(pa(1e5), k(500.0), &comp, false).unwrap();
        assert!((dx[0] - Species::N2.molar_mass() * 10.0 * 500.0).abs() < 1e-3);
        assert!((dx[1] - Species::O2.molar_mass() * 10.0 * 500.0).abs() < 1e-3);

        let cp = Linear.cp_mix_pt(pa(1e5), k(500.0), &comp, false).unwrap();
        let expected = 10.0 * (0.7 * Species::N2.molar_mass() + 0.3 * Species::O2.molar_mass());
        assert!((cp - expected).abs() < 1e-6 * expected);
    }

    #[test]
    fn default_inversion_recovers_temperature() {
        let comp = Composition::pure(Species::N2);
        let h = Linear.h_mix_pt(pa(1e5), k(812.5), &comp, false).unwrap();
        let t = Linear.t_mix_ph(pa(1e5), h, &comp, None).unwrap();
        assert!((t.value - 812.5).abs() < 1e-6);
    }

    #[test]
    fn inversion_rejects_unreachable_enthalpy() {
        let comp = Composition::pure(Species::N2);
        let err = Linear.t_mix_ph(pa(1e5), -1.0, &comp, None).unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { .. }));
    }
}
