//! Satellite position time series
use crate::{
    cfg::{InterpolationMethod, PositionSettings},
    constellation::ConstellationTable,
    error::Error,
    interp,
    prelude::{Epoch, Vector3},
    records::{parse_epoch_line, IngestContext, Page, SatelliteRecord, Sp3Layout, EPOCH_MARKER},
    time::ecef_to_eci,
    window::{relative_times, Evaluation, RollingWindow, TimeSeries, WindowSettings},
};

use itertools::{Itertools, MinMaxResult};
use log::{debug, warn};

/// Position samples closer than this are coalesced (s)
const POSITION_COALESCING_S: f64 = 1.0;

/// Number of missing samples tolerated within a position window
const POSITION_ALLOWED_GAPS: usize = 3;

/// One position sample, expressed in both frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PositionSample {
    pub ecef: Vector3<f64>,
    pub eci: Vector3<f64>,
}

/// Interpolated state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PositionState {
    ecef: Vector3<f64>,
    eci: Vector3<f64>,
}

/// Position time series of every satellite, with their rolling
/// interpolation windows.
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    settings: PositionSettings,
    /// Nominal sampling interval (s)
    interval_s: f64,
    series: Vec<TimeSeries<PositionSample>>,
    windows: Vec<RollingWindow>,
    states: Vec<PositionState>,
}

impl PositionStore {
    /// Creates an empty [PositionStore] covering the whole [ConstellationTable]
    pub fn new(table: &ConstellationTable, settings: PositionSettings) -> Result<Self, Error> {
        if settings.window_size == 0 {
            return Err(Error::InvalidWindowSize);
        }
        Ok(Self {
            settings,
            interval_s: 0.0,
            series: vec![TimeSeries::default(); table.len()],
            windows: vec![RollingWindow::default(); table.len()],
            states: vec![PositionState::default(); table.len()],
        })
    }

    /// Ingests SP3 like pages. Returns the first and last epochs
    /// encountered, None when no epoch was read.
    pub fn ingest(
        &mut self,
        ctx: &IngestContext,
        pages: &[Page],
    ) -> Result<Option<(Epoch, Epoch)>, Error> {
        let mut epochs = Vec::<Epoch>::new();

        for page in pages {
            let layout = Sp3Layout::parse(page)?;
            self.interval_s = layout.interval_s;

            let mut current = None;
            let mut num_samples = 0;
            let first_epoch = epochs.len();

            for line in layout.data_lines(page, ctx.ultra_rapid)? {
                if line.starts_with(EPOCH_MARKER) {
                    let t = parse_epoch_line(line, ctx.timescale)?;
                    current = Some((t, ecef_to_eci(t)));
                    epochs.push(t);
                    continue;
                }

                let Some((t, rotation)) = current else {
                    warn!("{}: record prior to any epoch: \"{}\"", page.name, line);
                    continue;
                };

                let record = SatelliteRecord::parse(line, ctx.table)?;
                if record.missing_position() {
                    continue;
                }

                let (x_km, y_km, z_km) = record.position_km;
                let ecef = Vector3::new(x_km, y_km, z_km) * 1.0E3;
                let sample = PositionSample {
                    ecef,
                    eci: rotation * ecef,
                };

                let series = self
                    .series
                    .get_mut(record.index)
                    .ok_or_else(|| Error::UnknownSatellite(line.to_string()))?;

                series.push(t, sample, POSITION_COALESCING_S);
                num_samples += 1;
            }

            debug!(
                "{}: {} epochs, {} position samples (interval: {}s)",
                page.name,
                epochs.len() - first_epoch,
                num_samples,
                layout.interval_s
            );
        }

        let span = match epochs.iter().minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(t) => Some((*t, *t)),
            MinMaxResult::MinMax(start, end) => Some((*start, *end)),
        };

        if span.is_none() {
            warn!("position products: no epoch");
        }

        Ok(span)
    }

    fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            size: self.settings.window_size,
            interval_s: self.interval_s,
            allowed_gaps: POSITION_ALLOWED_GAPS,
        }
    }

    /// Locates every satellite's window at `t`, and evaluates the positions.
    pub fn set_up(&mut self, t: Epoch) {
        let settings = self.window_settings();
        for index in 0..self.series.len() {
            let was_valid = self.windows[index].is_valid();
            let eval = self.windows[index].set_up(&self.series[index].epochs, t, &settings);
            self.evaluate(index, eval, t, was_valid);
        }
    }

    /// Rolls every satellite's window forward to `t`, and evaluates the positions.
    pub fn update(&mut self, t: Epoch) {
        let settings = self.window_settings();
        for index in 0..self.series.len() {
            let was_valid = self.windows[index].is_valid();
            let eval = self.windows[index].update(&self.series[index].epochs, t, &settings);
            self.evaluate(index, eval, t, was_valid);
        }
    }

    fn evaluate(&mut self, index: usize, eval: Evaluation, t: Epoch, was_valid: bool) {
        let series = &self.series[index];

        let state = match eval {
            Evaluation::Invalid => PositionState::default(),
            Evaluation::Exact(nearest) => {
                let sample = series.values[nearest];
                PositionState {
                    ecef: sample.ecef,
                    eci: sample.eci,
                }
            },
            Evaluation::Interpolate => {
                let range = self.windows[index].range();
                let times = relative_times(&series.epochs[range.clone()], t);
                let samples = &series.values[range];

                let ecef = samples.iter().map(|s| s.ecef).collect::<Vec<_>>();
                let eci = samples.iter().map(|s| s.eci).collect::<Vec<_>>();

                PositionState {
                    ecef: interpolate(self.settings.method, &times, &ecef),
                    eci: interpolate(self.settings.method, &times, &eci),
                }
            },
        };

        let is_valid = self.windows[index].is_valid();
        if is_valid != was_valid {
            debug!(
                "{} - satellite #{} position window {}",
                t,
                index,
                if is_valid { "valid" } else { "invalid" }
            );
        }

        self.states[index] = state;
    }

    /// True if position of this satellite could be evaluated
    pub fn is_valid(&self, index: usize) -> bool {
        self.windows
            .get(index)
            .map(|window| window.is_valid())
            .unwrap_or(false)
    }

    /// Latest ECEF position (m), null vector when not available.
    pub fn position_ecef_m(&self, index: usize) -> Vector3<f64> {
        self.states
            .get(index)
            .map(|state| state.ecef)
            .unwrap_or_default()
    }

    /// Latest ECI position (m), null vector when not available.
    pub fn position_eci_m(&self, index: usize) -> Vector3<f64> {
        self.states
            .get(index)
            .map(|state| state.eci)
            .unwrap_or_default()
    }

    pub fn number_of_satellites(&self) -> usize {
        self.series.len()
    }

    /// Nominal sampling interval (s)
    pub fn interval_s(&self) -> f64 {
        self.interval_s
    }

    /// Number of stored samples for this satellite
    pub fn num_samples(&self, index: usize) -> usize {
        self.series.get(index).map(|series| series.len()).unwrap_or(0)
    }
}

/// Evaluates the window at `t = 0`
fn interpolate(method: InterpolationMethod, times: &[f64], values: &[Vector3<f64>]) -> Vector3<f64> {
    match method {
        InterpolationMethod::Trigonometric => interp::trigonometric(times, values, 0.0),
        InterpolationMethod::Lagrange => interp::lagrange(times, values, 0.0),
    }
}
