use crate::{options::Table, progress};
use anyhow::Result;
use log::info;
use misery::{MiseryModel, Params};
use std::io::Write;

impl Table {
    pub fn run(&self) -> Result<()> {
        let params = Params {
            max_slope: self.max_slope,
            slope_step: self.slope_step,
            ..self.model.params()
        };
        let model = MiseryModel::new(params)?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_slopes = (self.max_slope / self.slope_step).round() as u64 + 1;
        let pb = progress::bar("misery index".to_string(), n_slopes);
        let table = model.table_with(|entry| {
            pb.set_message(format!("{:4.1}%", entry.slope * 100.0));
            pb.inc(1);
        })?;
        pb.finish_and_clear();

        let mut stdout = std::io::stdout().lock();
        for entry in table.entries() {
            writeln!(
                stdout,
                "misery index for {:4.1}%: {:4.1}  ({:.2} Wh/km)",
                entry.slope * 100.0,
                entry.mi,
                entry.energy
            )?;
        }

        table.save(&self.output)?;
        info!("wrote {}", self.output.display());
        Ok(())
    }
}
