//! Satellite clock time series
use crate::{
    cfg::{ClockFormat, ClockSettings, UltraRapidMode},
    constants::{EPOCH_TOLERANCE_S, SPEED_OF_LIGHT_M_S},
    constellation::ConstellationTable,
    error::Error,
    interp,
    prelude::Epoch,
    records::{
        is_no_data, parse_epoch_line, ClockRecord, IngestContext, Page, SatelliteRecord,
        Sp3Layout, EPOCH_MARKER,
    },
    window::{relative_times, Evaluation, RollingWindow, TimeSeries, WindowSettings},
};

use hifitime::Unit;
use log::{debug, warn};

/// SP3 clock samples closer than this are coalesced (s)
const SP3_COALESCING_S: f64 = 1.0;

/// Clock stream samples closer than this are coalesced (s)
const CLK_COALESCING_S: f64 = EPOCH_TOLERANCE_S;

/// Clock stream interval prior to any measurement (s)
const CLK_INITIAL_INTERVAL_S: f64 = 1.0E9;

/// Clock streams are kept a little past the last position epoch
const CLK_MARGIN_S: f64 = 30.0;

/// Clock bias time series of every satellite, with their rolling
/// (Lagrange) interpolation windows.
#[derive(Debug, Clone, Default)]
pub struct ClockStore {
    settings: ClockSettings,
    /// Nominal sampling interval (s)
    interval_s: f64,
    series: Vec<TimeSeries<f64>>,
    windows: Vec<RollingWindow>,
    biases_m: Vec<f64>,
}

impl ClockStore {
    /// Creates an empty [ClockStore] covering the whole [ConstellationTable]
    pub fn new(table: &ConstellationTable, settings: ClockSettings) -> Result<Self, Error> {
        if settings.window_size == 0 {
            return Err(Error::InvalidWindowSize);
        }
        let interval_s = match settings.format {
            ClockFormat::Sp3 => 0.0,
            ClockFormat::Clk => CLK_INITIAL_INTERVAL_S,
        };
        Ok(Self {
            settings,
            interval_s,
            series: vec![TimeSeries::default(); table.len()],
            windows: vec![RollingWindow::default(); table.len()],
            biases_m: vec![0.0; table.len()],
        })
    }

    /// Ingests clock pages. `span` is the time frame covered by the position
    /// products, which bounds the clock streams.
    pub fn ingest(
        &mut self,
        ctx: &IngestContext,
        pages: &[Page],
        span: Option<(Epoch, Epoch)>,
    ) -> Result<(), Error> {
        match self.settings.format {
            ClockFormat::Sp3 => self.ingest_sp3(ctx, pages),
            ClockFormat::Clk => self.ingest_clk(ctx, pages, span),
        }
    }

    fn ingest_sp3(&mut self, ctx: &IngestContext, pages: &[Page]) -> Result<(), Error> {
        for page in pages {
            let layout = Sp3Layout::parse(page)?;
            self.interval_s = layout.interval_s;

            let mut current = None;
            let mut num_samples = 0;

            for line in layout.data_lines(page, ctx.ultra_rapid)? {
                if line.starts_with(EPOCH_MARKER) {
                    current = Some(parse_epoch_line(line, ctx.timescale)?);
                    continue;
                }

                let Some(t) = current else {
                    warn!("{}: record prior to any epoch: \"{}\"", page.name, line);
                    continue;
                };

                let record = SatelliteRecord::parse(line, ctx.table)?;

                let Some(clock_us) = record.clock_us.filter(|clock_us| !is_no_data(*clock_us))
                else {
                    continue;
                };

                let series = self
                    .series
                    .get_mut(record.index)
                    .ok_or_else(|| Error::UnknownSatellite(line.to_string()))?;

                series.push(t, clock_us * SPEED_OF_LIGHT_M_S * 1.0E-6, SP3_COALESCING_S);
                num_samples += 1;
            }

            debug!(
                "{}: {} clock samples (interval: {}s)",
                page.name, num_samples, layout.interval_s
            );
        }
        Ok(())
    }

    fn ingest_clk(
        &mut self,
        ctx: &IngestContext,
        pages: &[Page],
        span: Option<(Epoch, Epoch)>,
    ) -> Result<(), Error> {
        ctx.ultra_rapid.validate()?;

        let segment = match ctx.ultra_rapid {
            UltraRapidMode::Predicted(_) => return Err(Error::PredictedClockStream),
            mode => mode.segment(),
        };

        let span = match (segment, span) {
            (Some(_), _) => None,
            (None, Some((start, end))) => Some((start, end + CLK_MARGIN_S * Unit::Second)),
            (None, None) => {
                warn!("clock streams: no position span, nothing to retain");
                return Ok(());
            },
        };

        for page in pages {
            let mut bounds = span;
            let mut num_samples = 0;

            for line in &page.lines {
                let Some(record) = ClockRecord::parse(line, ctx.table, ctx.timescale)? else {
                    continue;
                };

                // ultra rapid: segments are relative to the first record
                let (start, end) = *bounds.get_or_insert_with(|| {
                    let k = segment.unwrap_or_default() as f64;
                    (
                        record.epoch + k * UltraRapidMode::SEGMENT_DURATION_S * Unit::Second,
                        record.epoch + (k + 1.0) * UltraRapidMode::SEGMENT_DURATION_S * Unit::Second,
                    )
                });

                if (start - record.epoch).to_seconds() > EPOCH_TOLERANCE_S {
                    continue;
                }
                if (end - record.epoch).to_seconds() < EPOCH_TOLERANCE_S {
                    break;
                }

                let series = self
                    .series
                    .get_mut(record.index)
                    .ok_or_else(|| Error::UnknownSatellite(line.to_string()))?;

                let previous = series.last_epoch();

                if series.push(record.epoch, record.bias_s * SPEED_OF_LIGHT_M_S, CLK_COALESCING_S)
                {
                    num_samples += 1;
                    if let Some(previous) = previous {
                        let dt_s = (record.epoch - previous).to_seconds();
                        if dt_s > 0.0 && dt_s < self.interval_s {
                            self.interval_s = dt_s;
                        }
                    }
                }
            }

            debug!(
                "{}: {} clock samples (interval: {}s)",
                page.name, num_samples, self.interval_s
            );
        }
        Ok(())
    }

    fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            size: self.settings.window_size,
            interval_s: self.interval_s,
            allowed_gaps: 0,
        }
    }

    /// Locates every satellite's window at `t`, and evaluates the clock biases.
    pub fn set_up(&mut self, t: Epoch) {
        let settings = self.window_settings();
        for index in 0..self.series.len() {
            let eval = self.windows[index].set_up(&self.series[index].epochs, t, &settings);
            self.evaluate(index, eval, t);
        }
    }

    /// Rolls every satellite's window forward to `t`, and evaluates the clock biases.
    pub fn update(&mut self, t: Epoch) {
        let settings = self.window_settings();
        for index in 0..self.series.len() {
            let eval = self.windows[index].update(&self.series[index].epochs, t, &settings);
            self.evaluate(index, eval, t);
        }
    }

    fn evaluate(&mut self, index: usize, eval: Evaluation, t: Epoch) {
        let series = &self.series[index];
        self.biases_m[index] = match eval {
            Evaluation::Invalid => 0.0,
            Evaluation::Exact(nearest) => series.values[nearest],
            Evaluation::Interpolate => {
                let range = self.windows[index].range();
                let times = relative_times(&series.epochs[range.clone()], t);
                interp::lagrange(&times, &series.values[range], 0.0)
            },
        };
    }

    /// True if clock bias of this satellite could be evaluated
    pub fn is_valid(&self, index: usize) -> bool {
        self.windows
            .get(index)
            .map(|window| window.is_valid())
            .unwrap_or(false)
    }

    /// Latest clock bias (m), 0 when not available
    pub fn clock_bias_m(&self, index: usize) -> f64 {
        self.biases_m.get(index).copied().unwrap_or(0.0)
    }

    pub fn number_of_satellites(&self) -> usize {
        self.series.len()
    }

    /// Nominal sampling interval (s)
    pub fn interval_s(&self) -> f64 {
        self.interval_s
    }

    /// Source format
    pub fn format(&self) -> ClockFormat {
        self.settings.format
    }

    /// Number of stored samples for this satellite
    pub fn num_samples(&self, index: usize) -> usize {
        self.series.get(index).map(|series| series.len()).unwrap_or(0)
    }
}
