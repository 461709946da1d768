use crate::{
    math::{arange, interp, sign},
    MiseryError, MiseryTable, Params, PowerCurve, TableEntry,
};
use log::debug;
use serde::Serialize;

/// Which way a slope is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Descending,
    Climbing,
}

/// The operating point of a rider for one slope and wind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equilibrium {
    /// Wind (km/h, positive is headwind).
    pub wind: f64,

    pub direction: Direction,

    /// Highest sustainable speed (km/h).
    pub speed: f64,

    /// Power spent at `speed` (W), including the walking penalty.
    pub power: f64,

    /// Energy per distance (Wh/km).
    pub energy: f64,
}

/// Cycling effort model.
///
/// Holds the sampled speed axis and the available power envelope,
/// both of which only depend on [Params].
#[derive(Debug, Clone)]
pub struct MiseryModel {
    params: Params,

    /// Candidate speeds (km/h).
    speeds: Vec<f64>,

    /// Available power at each of `speeds` (W).
    envelope: Vec<f64>,
}

impl MiseryModel {
    pub fn new(params: Params) -> Result<Self, MiseryError> {
        params.validate()?;

        let step = params.speed_step;
        let stop = params.speed_stop();
        let speeds: Vec<f64> = arange(step, stop, step).collect();

        // Both reference curves are sampled on the speed grid and
        // count as 0 outside of their own domain.
        let sampled = |start: f64, stop: f64, curve: &PowerCurve| {
            let xs: Vec<f64> = arange(start, stop, step).collect();
            let ys: Vec<f64> = xs
                .iter()
                .map(|&x| {
                    interp(
                        x,
                        &curve.speeds,
                        &curve.power,
                        curve.power[0],
                        curve.power[curve.power.len() - 1],
                    )
                })
                .collect();
            (xs, ys)
        };
        let (walk_v, walk_p) = sampled(
            params.walk.min_speed(),
            params.walk.max_speed(),
            &params.walk,
        );
        let (ride_v, ride_p) = sampled(params.ride.min_speed(), stop, &params.ride);

        let envelope = speeds
            .iter()
            .map(|&v| {
                let ride = interp(v, &ride_v, &ride_p, 0.0, 0.0);
                let walk = interp(v, &walk_v, &walk_p, 0.0, 0.0);
                ride.max(walk)
            })
            .collect();

        Ok(Self {
            params,
            speeds,
            envelope,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the candidate speeds (km/h).
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Returns the available power at each of [Self::speeds].
    pub fn envelope(&self) -> &[f64] {
        &self.envelope
    }

    /// Returns the required power at each of [Self::speeds].
    pub fn required(&self, slope: f64, wind: f64) -> Vec<f64> {
        self.speeds
            .iter()
            .map(|&v| self.params.power(v, slope, wind))
            .collect()
    }

    /// Returns the operating point for a signed `slope` and `wind`.
    ///
    /// The rider settles at the highest speed where the required power
    /// drops below the available power, i.e. the last sign change of
    /// `envelope - required` with increasing speed.
    pub fn equilibrium(&self, slope: f64, wind: f64) -> Result<Equilibrium, MiseryError> {
        let required = self.required(slope, wind);
        let signs: Vec<i8> = self
            .envelope
            .iter()
            .zip(&required)
            .map(|(available, required)| sign(available - required))
            .collect();
        let j = signs
            .windows(2)
            .rposition(|w| w[0] != w[1])
            .ok_or(MiseryError::NoEquilibrium { slope, wind })?;

        let speed = self.speeds[j];
        let mut power = required[j];
        if speed < self.params.ride_min_speed() {
            power += self.params.walk_penalty * speed;
        }

        Ok(Equilibrium {
            wind,
            direction: if slope < 0.0 {
                Direction::Descending
            } else {
                Direction::Climbing
            },
            speed,
            power,
            energy: power / speed,
        })
    }

    /// Returns the operating points for `slope` traversed in both
    /// directions, for each of `winds`.
    pub fn breakdown(&self, slope: f64, winds: &[f64]) -> Result<Vec<Equilibrium>, MiseryError> {
        let slope = slope.abs();
        [-slope, slope]
            .iter()
            .flat_map(|&s| winds.iter().map(move |&w| (s, w)))
            .map(|(s, w)| self.equilibrium(s, w))
            .collect()
    }

    /// Returns the average energy per distance (Wh/km) for `slope`,
    /// over both directions and all configured winds.
    pub fn energy(&self, slope: f64) -> Result<f64, MiseryError> {
        let points = self.breakdown(slope, &self.params.winds)?;
        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        Ok(points.iter().map(|p| p.energy).sum::<f64>() / n)
    }

    /// Returns the extra energy needed for `slope`, relative to flat
    /// ground.
    pub fn misery_index(&self, slope: f64) -> Result<f64, MiseryError> {
        Ok(self.energy(slope)? / self.energy(0.0)? - 1.0)
    }

    /// Returns the misery index for slopes from 0 up to the configured
    /// maximum.
    pub fn table(&self) -> Result<MiseryTable, MiseryError> {
        self.table_with(|_| ())
    }

    /// Like [Self::table], calling `progress` after each slope.
    pub fn table_with<F>(&self, mut progress: F) -> Result<MiseryTable, MiseryError>
    where
        F: FnMut(&TableEntry),
    {
        let now = std::time::Instant::now();
        let baseline = self.energy(0.0)?;
        let stop = self.params.max_slope + self.params.slope_step * 0.002;
        let entries = arange(0.0, stop, self.params.slope_step)
            .map(|slope| {
                let energy = if slope == 0.0 {
                    baseline
                } else {
                    self.energy(slope)?
                };
                let entry = TableEntry {
                    slope,
                    mi: energy / baseline - 1.0,
                    energy,
                };
                progress(&entry);
                Ok(entry)
            })
            .collect::<Result<Vec<_>, MiseryError>>()?;
        debug!(
            "misery table; len: {}, baseline: {baseline:.3} Wh/km, exec: {:?}",
            entries.len(),
            now.elapsed()
        );
        MiseryTable::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, MiseryModel};
    use crate::Params;
    use approx::assert_abs_diff_eq;

    fn model() -> MiseryModel {
        MiseryModel::new(Params::default()).unwrap()
    }

    #[test]
    fn test_envelope() {
        let model = model();
        assert_eq!(model.speeds().len(), 301);
        let at = |speed: f64| {
            let idx = model
                .speeds()
                .iter()
                .position(|v| (v - speed).abs() < 1e-6)
                .unwrap();
            model.envelope()[idx]
        };
        assert_abs_diff_eq!(at(1.0), 0.0);
        assert_abs_diff_eq!(at(2.0), 140.0, epsilon = 1e-6);
        assert_abs_diff_eq!(at(4.0), 75.0, epsilon = 1e-6);
        // Gap between walking and riding.
        assert_abs_diff_eq!(at(6.2), 0.0);
        assert_abs_diff_eq!(at(6.5), 160.0, epsilon = 1e-6);
        assert_abs_diff_eq!(at(20.0), 50.0, epsilon = 1e-6);
        // The riding curve dips below zero past the top speed, the
        // walking curve's zero extension wins.
        assert_abs_diff_eq!(at(30.1), 0.0);
    }

    #[test]
    fn test_flat_equilibrium() {
        let eq = model().equilibrium(0.0, 0.0).unwrap();
        assert_eq!(eq.direction, Direction::Climbing);
        assert_abs_diff_eq!(eq.speed, 17.2, epsilon = 1e-9);
        assert_abs_diff_eq!(eq.energy, eq.power / eq.speed);
    }

    #[test]
    fn test_steep_descent_coasts_at_max_speed() {
        let eq = model().equilibrium(-0.2, 0.0).unwrap();
        assert_eq!(eq.direction, Direction::Descending);
        assert_abs_diff_eq!(eq.speed, 30.0, epsilon = 1e-9);
        assert_eq!(eq.power, 0.0);
        assert_eq!(eq.energy, 0.0);
    }

    #[test]
    fn test_steep_climb_walks() {
        let model = model();
        let eq = model.equilibrium(0.2, 0.0).unwrap();
        assert!(eq.speed < model.params().ride_min_speed());
        let pedaling = model.params().power(eq.speed, 0.2, 0.0);
        assert_abs_diff_eq!(eq.power, pedaling + 10.0 * eq.speed, epsilon = 1e-9);
    }

    #[test]
    fn test_breakdown_covers_both_directions() {
        let points = model().breakdown(-0.05, &[-10.0, 0.0, 10.0]).unwrap();
        assert_eq!(points.len(), 6);
        assert!(points[..3]
            .iter()
            .all(|p| p.direction == Direction::Descending));
        assert!(points[3..].iter().all(|p| p.direction == Direction::Climbing));
        assert_eq!(points[0].wind, -10.0);
        assert_eq!(points[5].wind, 10.0);
    }

    #[test]
    fn test_baseline_energy() {
        assert_abs_diff_eq!(model().energy(0.0).unwrap(), 4.2028, epsilon = 1e-3);
    }

    #[test]
    fn test_misery_index() {
        let model = model();
        assert_eq!(model.misery_index(0.0).unwrap(), 0.0);
        assert_abs_diff_eq!(model.misery_index(0.05).unwrap(), 0.798, epsilon = 0.01);
        assert_abs_diff_eq!(model.misery_index(0.25).unwrap(), 7.27, epsilon = 0.01);
    }

    #[test]
    fn test_table_is_monotonic() {
        let table = model().table().unwrap();
        let entries = table.entries();
        assert_eq!(entries.len(), 51);
        assert_eq!(entries[0].slope, 0.0);
        assert_eq!(entries[0].mi, 0.0);
        assert_abs_diff_eq!(entries[50].slope, 0.25, epsilon = 1e-9);
        for w in entries.windows(2) {
            assert!(w[1].mi >= w[0].mi, "{:?} > {:?}", w[0], w[1]);
        }
    }
}
