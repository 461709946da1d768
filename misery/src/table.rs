use crate::{math::interp, MiseryError};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

/// One row of a [MiseryTable].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Unsigned slope, e.g. `0.02` for 2%.
    pub slope: f64,

    /// Misery index.
    pub mi: f64,

    /// Average energy per distance (Wh/km).
    #[serde(rename = "p", default)]
    pub energy: f64,
}

/// Slope to misery index lookup table.
///
/// Persisted as a JSON array of `{"slope", "mi", "p"}` records so it
/// can be reused without re-running the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TableEntry>", into = "Vec<TableEntry>")]
pub struct MiseryTable {
    slopes: Vec<f64>,
    mis: Vec<f64>,
    entries: Vec<TableEntry>,
}

impl MiseryTable {
    /// Returns a table from entries sorted by increasing slope.
    pub fn new(entries: Vec<TableEntry>) -> Result<Self, MiseryError> {
        if entries.is_empty() {
            return Err(MiseryError::EmptyTable);
        }
        if !entries.windows(2).all(|w| w[0].slope < w[1].slope) {
            return Err(MiseryError::Unsorted);
        }
        let slopes = entries.iter().map(|e| e.slope).collect();
        let mis = entries.iter().map(|e| e.mi).collect();
        Ok(Self {
            slopes,
            mis,
            entries,
        })
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Returns the misery index for `slope`.
    ///
    /// Linear between entries, clamped to the first and last entry
    /// outside of the table.
    pub fn interpolate(&self, slope: f64) -> f64 {
        interp(
            slope,
            &self.slopes,
            &self.mis,
            self.mis[0],
            self.mis[self.mis.len() - 1],
        )
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, MiseryError> {
        Ok(serde_json::from_reader(rdr)?)
    }

    pub fn to_writer<W: Write>(&self, wtr: W) -> Result<(), MiseryError> {
        serde_json::to_writer(wtr, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MiseryError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MiseryError> {
        let mut wtr = BufWriter::new(File::create(path)?);
        self.to_writer(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }
}

impl TryFrom<Vec<TableEntry>> for MiseryTable {
    type Error = MiseryError;

    fn try_from(entries: Vec<TableEntry>) -> Result<Self, MiseryError> {
        Self::new(entries)
    }
}

impl From<MiseryTable> for Vec<TableEntry> {
    fn from(table: MiseryTable) -> Self {
        table.entries
    }
}
