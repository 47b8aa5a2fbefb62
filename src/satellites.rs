//! GNSS constellation engine
use crate::{
    bias::{BiasRuntime, IonosphereBias, SingleLayerIonosphere},
    cfg::{ClockSettings, Config, PositionSettings, UltraRapidMode},
    constants::SPEED_OF_LIGHT_M_S,
    constellation::ConstellationTable,
    error::Error,
    info::SatelliteInfo,
    loader,
    observer::UpdateObserver,
    prelude::{Epoch, TimeScale, Vector3},
    records::{IngestContext, Page},
    report,
    time::Calendar,
};

use hifitime::Unit;
use log::info;

/// Frame in which receiver and satellite positions are expressed
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum ReferenceFrame {
    /// Earth centered Earth fixed
    #[default]
    Ecef,
    /// Earth centered inertial
    Eci,
}

/// Simulation clock, driving the [GnssSatellites]
pub trait SimulationClock {
    /// Simulation start date
    fn start_calendar(&self) -> Calendar;
    /// Simulation step (s)
    fn step_width_s(&self) -> f64;
    /// Time elapsed since simulation start (s)
    fn elapsed_s(&self) -> f64;
}

/// Basic [SimulationClock], moving forward by fixed steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteppedClock {
    /// Simulation start date
    pub start: Calendar,
    /// Step (s)
    pub step_width_s: f64,
    /// Elapsed time (s)
    pub elapsed_s: f64,
}

impl SteppedClock {
    pub fn new(start: Calendar, step_width_s: f64) -> Self {
        Self {
            start,
            step_width_s,
            elapsed_s: 0.0,
        }
    }

    /// Moves forward by one step
    pub fn step(&mut self) {
        self.elapsed_s += self.step_width_s;
    }
}

impl SimulationClock for SteppedClock {
    fn start_calendar(&self) -> Calendar {
        self.start
    }
    fn step_width_s(&self) -> f64 {
        self.step_width_s
    }
    fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }
}

/// Carrier phase observation, in cycles
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CarrierPhase {
    /// Fractional part, within [0, 1)
    pub fraction: f64,
    /// Integer number of cycles
    pub ambiguity: f64,
}

impl CarrierPhase {
    /// Splits a cycle count into its integer and fractional parts,
    /// the fraction remaining within [0, 1).
    pub fn from_cycles(cycles: f64) -> Self {
        let ambiguity = cycles.floor();
        let fraction = cycles - ambiguity;
        // tiny negative counts round up to a full cycle
        if fraction >= 1.0 {
            Self {
                fraction: 0.0,
                ambiguity: ambiguity + 1.0,
            }
        } else {
            Self {
                fraction,
                ambiguity,
            }
        }
    }

    /// Total number of cycles
    pub fn cycles(&self) -> f64 {
        self.ambiguity + self.fraction
    }
}

/// Pages and settings of one product set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPages {
    /// SP3 like position pages
    pub position: Vec<Page>,
    pub position_settings: PositionSettings,
    /// Clock pages, in the format described by the settings
    pub clock: Vec<Page>,
    pub clock_settings: ClockSettings,
    /// Ultra rapid segment, for both positions and clocks
    pub ultra_rapid: UltraRapidMode,
}

/// [GnssSatellites] tracks the GNSS constellations, from two independent
/// product sets: the reference ("true") products, that synthesize the
/// observables, and the estimated products, exposed to navigation.
pub struct GnssSatellites {
    enabled: bool,
    table: ConstellationTable,
    timescale: TimeScale,
    truth: SatelliteInfo,
    estimate: SatelliteInfo,
    start: Option<Epoch>,
    ionosphere: Box<dyn IonosphereBias>,
    observers: Vec<Box<dyn UpdateObserver>>,
}

impl std::fmt::Debug for GnssSatellites {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("GnssSatellites")
            .field("enabled", &self.enabled)
            .field("timescale", &self.timescale)
            .field("satellites", &self.table.len())
            .field("start", &self.start)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl GnssSatellites {
    /// Creates a new engine, with default [ConstellationTable],
    /// [SingleLayerIonosphere] and UTC timescale.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            table: ConstellationTable::default(),
            timescale: TimeScale::UTC,
            truth: SatelliteInfo::default(),
            estimate: SatelliteInfo::default(),
            start: None,
            ionosphere: Box::new(SingleLayerIonosphere::default()),
            observers: Vec::new(),
        }
    }

    /// Copies and returns [GnssSatellites] with custom [ConstellationTable].
    /// Should be called prior [Self::initialize].
    pub fn with_table(mut self, table: ConstellationTable) -> Self {
        self.table = table;
        self
    }

    /// Copies and returns [GnssSatellites] with custom [IonosphereBias] model.
    pub fn with_ionosphere<M: IonosphereBias + 'static>(mut self, model: M) -> Self {
        self.ionosphere = Box::new(model);
        self
    }

    /// Copies and returns [GnssSatellites] with the [TimeScale] in which
    /// products and simulation start are expressed.
    pub fn with_timescale(mut self, timescale: TimeScale) -> Self {
        self.timescale = timescale;
        self
    }

    /// Builds and initializes a [GnssSatellites] from a [Config],
    /// loading all products from the file system.
    pub fn from_config(cfg: &Config) -> Result<Self, Error> {
        let mut engine = Self::new(cfg.calculation)
            .with_ionosphere(cfg.ionosphere)
            .with_timescale(cfg.timescale);

        if !engine.enabled {
            return Ok(engine);
        }

        let truth = loader::load_product_pages(&cfg.directory, &cfg.truth)?;
        let estimate = loader::load_product_pages(&cfg.directory, &cfg.estimate)?;
        engine.initialize(&truth, &estimate)?;
        Ok(engine)
    }

    /// Ingests both product sets.
    pub fn initialize(&mut self, truth: &ProductPages, estimate: &ProductPages) -> Result<(), Error> {
        if !self.enabled {
            return Ok(());
        }
        self.truth = self.initialize_info(truth)?;
        self.estimate = self.initialize_info(estimate)?;
        Ok(())
    }

    fn initialize_info(&self, pages: &ProductPages) -> Result<SatelliteInfo, Error> {
        let ctx = IngestContext {
            table: &self.table,
            timescale: self.timescale,
            ultra_rapid: pages.ultra_rapid,
        };
        SatelliteInfo::initialize(
            &ctx,
            &pages.position,
            pages.position_settings,
            &pages.clock,
            pages.clock_settings,
        )
    }

    /// Registers a new [UpdateObserver]
    pub fn register_observer(&mut self, observer: Box<dyn UpdateObserver>) {
        self.observers.push(observer);
    }

    /// True if this engine is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Simulation start
    pub fn start(&self) -> Option<Epoch> {
        self.start
    }

    /// Prepares the engine for this simulation.
    pub fn set_up<C: SimulationClock>(&mut self, clock: &C) -> Result<(), Error> {
        if !self.enabled {
            return Ok(());
        }

        let t = clock.start_calendar().to_epoch(self.timescale)?;

        info!(
            "{} - gnss constellation set up (step: {}s)",
            t,
            clock.step_width_s()
        );

        self.truth.set_up(t);
        self.estimate.set_up(t);
        self.start = Some(t);
        Ok(())
    }

    /// Moves the engine forward, to the current simulation time.
    /// Does nothing prior [Self::set_up].
    pub fn update<C: SimulationClock>(&mut self, clock: &C) {
        if !self.enabled {
            return;
        }
        let Some(start) = self.start else {
            return;
        };

        let t = start + clock.elapsed_s() * Unit::Second;

        self.truth.update(t);
        self.estimate.update(t);

        for observer in self.observers.iter_mut() {
            observer.on_update(t, &self.truth, &self.estimate);
        }
    }

    /// Reference products
    pub fn truth(&self) -> &SatelliteInfo {
        &self.truth
    }

    /// Estimated products
    pub fn estimate(&self) -> &SatelliteInfo {
        &self.estimate
    }

    /// [ConstellationTable] in use
    pub fn table(&self) -> &ConstellationTable {
        &self.table
    }

    pub fn index_from_id(&self, id: &str) -> Option<usize> {
        self.table.index_from_id(id)
    }

    pub fn id_from_index(&self, index: usize) -> Option<String> {
        self.table.id_from_index(index)
    }

    pub fn number_of_satellites(&self) -> usize {
        self.estimate.number_of_satellites()
    }

    /// True when this satellite is available in both product sets
    pub fn is_valid(&self, index: usize) -> bool {
        index < self.number_of_satellites()
            && self.truth.is_valid(index)
            && self.estimate.is_valid(index)
    }

    /// Estimated ECEF position (m)
    pub fn position_ecef_m(&self, index: usize) -> Vector3<f64> {
        if !self.is_valid(index) {
            return Vector3::zeros();
        }
        self.estimate.position_ecef_m(index)
    }

    /// Estimated ECI position (m)
    pub fn position_eci_m(&self, index: usize) -> Vector3<f64> {
        if !self.is_valid(index) {
            return Vector3::zeros();
        }
        self.estimate.position_eci_m(index)
    }

    /// Estimated clock bias (m)
    pub fn clock_bias_m(&self, index: usize) -> f64 {
        if !self.is_valid(index) {
            return 0.0;
        }
        self.estimate.clock_bias_m(index)
    }

    /// Ionospheric delay (m) between this receiver and the reference satellite position.
    pub fn ionospheric_delay_m(
        &self,
        index: usize,
        rx_position_m: Vector3<f64>,
        frequency_mhz: f64,
        frame: ReferenceFrame,
    ) -> f64 {
        if !self.is_valid(index) {
            return 0.0;
        }
        let rtm = BiasRuntime {
            rx_position_m,
            sv_position_m: self.truth.position_m(index, frame),
            frequency_mhz,
        };
        self.ionosphere.ionosphere_bias_m(&rtm)
    }

    /// Geometric range plus clock offsets (m), from reference products
    fn clocked_range_m(
        &self,
        index: usize,
        rx_position_m: Vector3<f64>,
        rx_clock_m: f64,
        frame: ReferenceFrame,
    ) -> f64 {
        let sv_position_m = self.truth.position_m(index, frame);
        (rx_position_m - sv_position_m).norm() + rx_clock_m - self.truth.clock_bias_m(index)
    }

    /// Pseudo range (m) observed by this receiver, 0 when not available.
    pub fn pseudo_range_m(
        &self,
        index: usize,
        rx_position_m: Vector3<f64>,
        rx_clock_m: f64,
        frequency_mhz: f64,
        frame: ReferenceFrame,
    ) -> f64 {
        if !self.is_valid(index) {
            return 0.0;
        }
        self.clocked_range_m(index, rx_position_m, rx_clock_m, frame)
            + self.ionospheric_delay_m(index, rx_position_m, frequency_mhz, frame)
    }

    /// [CarrierPhase] observed by this receiver, null when not available.
    pub fn carrier_phase(
        &self,
        index: usize,
        rx_position_m: Vector3<f64>,
        rx_clock_m: f64,
        frequency_mhz: f64,
        frame: ReferenceFrame,
    ) -> CarrierPhase {
        if !self.is_valid(index) {
            return CarrierPhase::default();
        }

        let range_m = self.clocked_range_m(index, rx_position_m, rx_clock_m, frame)
            - self.ionospheric_delay_m(index, rx_position_m, frequency_mhz, frame);

        let wavelength_m = SPEED_OF_LIGHT_M_S * 1.0E-6 / frequency_mhz;
        CarrierPhase::from_cycles(range_m / wavelength_m)
    }

    /// Log header: reference state of the GPS constellation
    pub fn log_header(&self) -> String {
        report::log_header(&self.table)
    }

    /// Log values, matching [Self::log_header]
    pub fn log_value(&self) -> String {
        report::log_value(&self.table, &self.truth)
    }
}
