use clap::{Args, Parser};
use misery::Params;
use std::path::PathBuf;

/// Compute and inspect the cycling misery index of road slopes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Compute the slope to misery index table and save it as JSON.
    Table(Table),

    /// Print the rider's operating points for a single slope.
    Show(Show),
}

/// Physical tunables of the model.
#[derive(Debug, Clone, Args)]
pub struct Model {
    /// Rider and bike mass, in kg.
    #[arg(long, default_value_t = 85.0)]
    pub mass: f64,

    /// Rolling resistance coefficient.
    #[arg(long, default_value_t = 0.005)]
    pub crr: f64,

    /// Aerodynamic drag term (½ ρ Cd A²).
    #[arg(long, default_value_t = 0.35)]
    pub drag: f64,

    /// Extra power, in W per km/h, spent walking the bike.
    #[arg(long, default_value_t = 10.0)]
    pub walk_penalty: f64,

    /// Highest riding speed, in km/h.
    #[arg(long, default_value_t = 30.0)]
    pub max_speed: f64,

    /// Speed resolution of the equilibrium search, in km/h.
    #[arg(long, default_value_t = 0.1)]
    pub speed_step: f64,
}

impl Model {
    pub fn params(&self) -> Params {
        Params {
            mass_kg: self.mass,
            rolling_resistance: self.crr,
            half_rho_cd_a2: self.drag,
            walk_penalty: self.walk_penalty,
            max_speed: self.max_speed,
            speed_step: self.speed_step,
            ..Params::default()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct Table {
    #[command(flatten)]
    pub model: Model,

    /// Largest slope in the table, e.g. 0.25 for 25%.
    #[arg(long, default_value_t = 0.25)]
    pub max_slope: f64,

    /// Slope increment.
    #[arg(long, default_value_t = 0.005)]
    pub slope_step: f64,

    /// Output file.
    #[arg(short, long, default_value = "misery-index.json")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct Show {
    #[command(flatten)]
    pub model: Model,

    /// Plot power (W) instead of energy per distance (Wh/km).
    #[arg(long)]
    pub power: bool,

    /// Plot the power curves in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Print operating points as JSON.
    #[arg(long, conflicts_with = "plot")]
    pub json: bool,

    /// Winds to evaluate, in km/h (positive is headwind).
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = [-20.0, -10.0, 0.0, 10.0, 20.0]
    )]
    pub winds: Vec<f64>,

    /// Slope, in percent.
    #[arg(allow_negative_numbers = true)]
    pub slope: f64,
}
