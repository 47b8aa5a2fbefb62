//! Satellite information: positions and clocks of one product set
use crate::{
    cfg::{ClockSettings, PositionSettings},
    clock::ClockStore,
    error::Error,
    position::PositionStore,
    prelude::{Epoch, Vector3},
    records::{IngestContext, Page},
    satellites::ReferenceFrame,
};

use log::error;

/// [PositionStore] and [ClockStore] of one product set
/// (either reference or estimated products).
#[derive(Debug, Clone, Default)]
pub struct SatelliteInfo {
    pub(crate) position: PositionStore,
    pub(crate) clock: ClockStore,
}

impl SatelliteInfo {
    /// Builds both stores, then ingests positions and clocks.
    /// The position time frame bounds the clock streams.
    pub fn initialize(
        ctx: &IngestContext,
        position_pages: &[Page],
        position_settings: PositionSettings,
        clock_pages: &[Page],
        clock_settings: ClockSettings,
    ) -> Result<Self, Error> {
        let mut position = PositionStore::new(ctx.table, position_settings)?;
        let span = position.ingest(ctx, position_pages)?;

        let mut clock = ClockStore::new(ctx.table, clock_settings)?;
        clock.ingest(ctx, clock_pages, span)?;

        Ok(Self { position, clock })
    }

    pub fn set_up(&mut self, t: Epoch) {
        self.position.set_up(t);
        self.clock.set_up(t);
    }

    pub fn update(&mut self, t: Epoch) {
        self.position.update(t);
        self.clock.update(t);
    }

    /// True when both position and clock are available
    pub fn is_valid(&self, index: usize) -> bool {
        self.position.is_valid(index) && self.clock.is_valid(index)
    }

    pub fn position_ecef_m(&self, index: usize) -> Vector3<f64> {
        self.position.position_ecef_m(index)
    }

    pub fn position_eci_m(&self, index: usize) -> Vector3<f64> {
        self.position.position_eci_m(index)
    }

    /// Position in the desired [ReferenceFrame]
    pub fn position_m(&self, index: usize, frame: ReferenceFrame) -> Vector3<f64> {
        match frame {
            ReferenceFrame::Ecef => self.position_ecef_m(index),
            ReferenceFrame::Eci => self.position_eci_m(index),
        }
    }

    pub fn clock_bias_m(&self, index: usize) -> f64 {
        self.clock.clock_bias_m(index)
    }

    /// Number of satellites. Both stores are expected to agree: 0 otherwise.
    pub fn number_of_satellites(&self) -> usize {
        let (num_pos, num_clk) = (
            self.position.number_of_satellites(),
            self.clock.number_of_satellites(),
        );
        if num_pos != num_clk {
            error!(
                "satellite count mismatch: {} positions, {} clocks",
                num_pos, num_clk
            );
            return 0;
        }
        num_pos
    }

    /// Position store
    pub fn position(&self) -> &PositionStore {
        &self.position
    }

    /// Clock store
    pub fn clock(&self) -> &ClockStore {
        &self.clock
    }
}
