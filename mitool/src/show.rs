use crate::options::Show;
use anyhow::Result;
use misery::{Direction, Equilibrium, MiseryModel};
use std::io::Write;
use textplots::{Chart, Plot, Shape};

/// Plotted values above this are clipped (W or Wh/km).
const POWER_CEILING: f64 = 300.0;
const ENERGY_CEILING: f64 = 30.0;

impl Show {
    pub fn run(&self) -> Result<()> {
        let model = MiseryModel::new(self.model.params())?;
        let slope = self.slope * 0.01;
        let points = model.breakdown(slope, &self.winds)?;

        if self.json {
            println!("{}", serde_json::to_string(&points)?);
            return Ok(());
        }

        print_breakdown(&points)?;
        if self.plot {
            self.plot_curves(&model, slope);
        }
        Ok(())
    }

    /// Plots the available power envelope and the required power for
    /// each wind, climbing and descending.
    #[allow(clippy::cast_possible_truncation)]
    fn plot_curves(&self, model: &MiseryModel, slope: f64) {
        let ceiling = if self.power {
            POWER_CEILING
        } else {
            ENERGY_CEILING
        };
        let to_points = |values: &[f64]| -> Vec<(f32, f32)> {
            model
                .speeds()
                .iter()
                .zip(values)
                .map(|(&v, &p)| (v, if self.power { p } else { p / v }))
                .filter(|&(_, y)| y.is_finite() && y <= ceiling)
                .map(|(x, y)| (x as f32, y as f32))
                .collect()
        };

        let envelope = to_points(model.envelope());
        let required: Vec<Vec<(f32, f32)>> = [-slope.abs(), slope.abs()]
            .iter()
            .flat_map(|&s| self.winds.iter().map(move |&w| (s, w)))
            .map(|(s, w)| to_points(&model.required(s, w)))
            .collect();

        let envelope = Shape::Lines(&envelope);
        let required: Vec<Shape> = required.iter().map(|pts| Shape::Lines(pts)).collect();

        let max_speed = model.params().max_speed as f32;
        let mut plot = Chart::new(200, 100, 0.0, max_speed);
        let mut chart = plot.lineplot(&envelope);
        for shape in &required {
            chart = chart.lineplot(shape);
        }
        chart.display();
    }
}

fn print_breakdown(points: &[Equilibrium]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for point in points {
        let direction = match point.direction {
            Direction::Descending => "down",
            Direction::Climbing => "up",
        };
        writeln!(
            stdout,
            "{direction:>4} wind: {:3.0}km/h | {:4.1}km/h  {:5.1}W  {:5.2}Wh/km",
            point.wind, point.speed, point.power, point.energy
        )?;
    }
    #[allow(clippy::cast_precision_loss)]
    let average = points.iter().map(|p| p.energy).sum::<f64>() / points.len() as f64;
    writeln!(stdout)?;
    writeln!(stdout, "Average: {average:5.2}Wh/km")?;
    Ok(())
}
