//! Update observers
use crate::{
    constellation::ConstellationTable,
    error::Error,
    info::SatelliteInfo,
    prelude::{Constellation, Epoch, Vector3},
};

use log::warn;

use std::{
    fs::File,
    io::{BufWriter, Write},
    ops::Range,
    path::Path,
};

/// [UpdateObserver]s are notified after each update of the
/// [GnssSatellites](crate::prelude::GnssSatellites), in registration order.
pub trait UpdateObserver {
    /// Called once both product sets have been updated to `t`.
    fn on_update(&mut self, t: Epoch, truth: &SatelliteInfo, estimate: &SatelliteInfo);
}

/// [CsvObserver] dumps the GPS constellation state after each update:
/// reference values, estimated values and estimation errors,
/// into three distinct sinks. One row per update, `x,y,z,clock,` per satellite.
pub struct CsvObserver<W: Write> {
    satellites: Range<usize>,
    truth: W,
    estimate: W,
    error: W,
}

impl CsvObserver<BufWriter<File>> {
    /// Creates `true.csv`, `estimation.csv` and `sa.csv` within this directory.
    pub fn create<P: AsRef<Path>>(table: &ConstellationTable, directory: P) -> Result<Self, Error> {
        let directory = directory.as_ref();
        let truth = BufWriter::new(File::create(directory.join("true.csv"))?);
        let estimate = BufWriter::new(File::create(directory.join("estimation.csv"))?);
        let error = BufWriter::new(File::create(directory.join("sa.csv"))?);
        Ok(Self::new(table, truth, estimate, error))
    }
}

impl<W: Write> CsvObserver<W> {
    /// Builds a [CsvObserver] writing into these sinks
    pub fn new(table: &ConstellationTable, truth: W, estimate: W, error: W) -> Self {
        Self {
            satellites: table.constellation_indexes(Constellation::GPS).unwrap_or(0..0),
            truth,
            estimate,
            error,
        }
    }

    /// Returns the (truth, estimate, error) sinks
    pub fn into_inner(self) -> (W, W, W) {
        (self.truth, self.estimate, self.error)
    }

    fn write_rows(&mut self, truth: &SatelliteInfo, estimate: &SatelliteInfo) -> std::io::Result<()> {
        for index in self.satellites.clone() {
            let (truth_valid, estimate_valid) = (truth.is_valid(index), estimate.is_valid(index));

            let true_state = (truth.position_ecef_m(index), truth.clock_bias_m(index));
            let estimated_state = (estimate.position_ecef_m(index), estimate.clock_bias_m(index));

            if truth_valid {
                write_state(&mut self.truth, true_state.0, true_state.1)?;
            } else {
                write_state(&mut self.truth, Vector3::zeros(), 0.0)?;
            }

            if estimate_valid {
                write_state(&mut self.estimate, estimated_state.0, estimated_state.1)?;
            } else {
                write_state(&mut self.estimate, Vector3::zeros(), 0.0)?;
            }

            if truth_valid && estimate_valid {
                write_state(
                    &mut self.error,
                    estimated_state.0 - true_state.0,
                    estimated_state.1 - true_state.1,
                )?;
            } else {
                write_state(&mut self.error, Vector3::zeros(), 0.0)?;
            }
        }

        for sink in [&mut self.truth, &mut self.estimate, &mut self.error] {
            writeln!(sink)?;
        }
        Ok(())
    }
}

fn write_state<W: Write>(w: &mut W, position: Vector3<f64>, clock: f64) -> std::io::Result<()> {
    write!(
        w,
        "{:.10},{:.10},{:.10},{:.10},",
        position[0], position[1], position[2], clock
    )
}

impl<W: Write> UpdateObserver for CsvObserver<W> {
    fn on_update(&mut self, t: Epoch, truth: &SatelliteInfo, estimate: &SatelliteInfo) {
        if let Err(e) = self.write_rows(truth, estimate) {
            warn!("{} - failed to dump constellation state: {}", t, e);
        }
    }
}
