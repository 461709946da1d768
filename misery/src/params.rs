use crate::{math::arange, MiseryError};
use serde::{Deserialize, Serialize};

/// Seconds per hour over meters per kilometer.
const KMH_PER_MS: f64 = 3.6;

/// A power (W) over speed (km/h) curve given by control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    pub speeds: Vec<f64>,
    pub power: Vec<f64>,
}

impl PowerCurve {
    pub fn new(speeds: Vec<f64>, power: Vec<f64>) -> Self {
        Self { speeds, power }
    }

    /// Returns the lowest speed of this curve.
    pub fn min_speed(&self) -> f64 {
        self.speeds.first().copied().unwrap_or(0.0)
    }

    /// Returns the highest speed of this curve.
    pub fn max_speed(&self) -> f64 {
        self.speeds.last().copied().unwrap_or(0.0)
    }

    fn validate(&self, name: &'static str) -> Result<(), MiseryError> {
        let increasing = self.speeds.windows(2).all(|w| w[0] < w[1]);
        if self.speeds.is_empty() || self.speeds.len() != self.power.len() || !increasing {
            return Err(MiseryError::Param(name));
        }
        Ok(())
    }
}

/// Physical constants and sampling parameters of the model.
///
/// The defaults are calibrated values; the resulting table is a pure
/// function of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Rider and bike (kg).
    pub mass_kg: f64,

    /// Gravitational acceleration (m/s²).
    pub gravity: f64,

    /// Rolling resistance coefficient.
    pub rolling_resistance: f64,

    /// ½ ρ Cd A².
    pub half_rho_cd_a2: f64,

    /// Extra power (W) per km/h when walking the bike.
    pub walk_penalty: f64,

    /// Sustainable power when walking the bike.
    pub walk: PowerCurve,

    /// Sustainable power when riding. The lowest speed of this curve
    /// is the threshold below which the rider dismounts.
    pub ride: PowerCurve,

    /// Highest riding speed considered (km/h).
    pub max_speed: f64,

    /// Speed resolution of the equilibrium search (km/h).
    pub speed_step: f64,

    /// Wind samples (km/h, positive is headwind).
    pub winds: Vec<f64>,

    /// Largest slope in generated tables.
    pub max_slope: f64,

    /// Slope increment in generated tables.
    pub slope_step: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mass_kg: 85.0,
            gravity: 9.81,
            rolling_resistance: 0.005,
            half_rho_cd_a2: 0.35,
            walk_penalty: 10.0,
            walk: PowerCurve::new(vec![2.0, 6.0], vec![140.0, 10.0]),
            ride: PowerCurve::new(vec![6.5, 10.0, 30.0, 30.1], vec![160.0, 80.0, 20.0, -0.01]),
            max_speed: 30.0,
            speed_step: 0.1,
            winds: arange(-25.0, 25.1, 5.0).collect(),
            max_slope: 0.25,
            slope_step: 0.005,
        }
    }
}

impl Params {
    /// Returns the power (W) needed to ride at `speed` (km/h) up
    /// `slope` (negative is downhill) against `wind` (km/h, positive
    /// is headwind).
    ///
    /// Never negative: on steep descents the rider simply stops
    /// pedaling.
    pub fn power(&self, speed: f64, slope: f64, wind: f64) -> f64 {
        let v = speed / KMH_PER_MS;
        let v_rel = (speed + wind) / KMH_PER_MS;
        let p = self.mass_kg * self.gravity * (self.rolling_resistance + slope) * v
            + self.half_rho_cd_a2 * v_rel * v_rel.abs() * v;
        p.max(0.0)
    }

    /// Returns the speed below which the rider walks.
    pub fn ride_min_speed(&self) -> f64 {
        self.ride.min_speed()
    }

    /// Upper bound (exclusive) of the sampled speed axis.
    pub(crate) fn speed_stop(&self) -> f64 {
        self.max_speed + self.speed_step * 1.01
    }

    pub(crate) fn validate(&self) -> Result<(), MiseryError> {
        let positive = |v: f64, name| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(MiseryError::Param(name))
            }
        };
        positive(self.mass_kg, "mass_kg")?;
        positive(self.speed_step, "speed_step")?;
        positive(self.max_speed, "max_speed")?;
        positive(self.slope_step, "slope_step")?;
        if !(self.max_slope.is_finite() && self.max_slope >= 0.0) {
            return Err(MiseryError::Param("max_slope"));
        }
        if self.winds.is_empty() {
            return Err(MiseryError::Param("winds"));
        }
        self.walk.validate("walk")?;
        self.ride.validate("ride")?;
        Ok(())
    }
}
