use crate::{
    bias::BiasRuntime,
    constants::SPEED_OF_LIGHT_M_S,
    prelude::{
        CarrierPhase, Epoch, GnssSatellites, IonosphereBias, ReferenceFrame, SatelliteInfo,
        SimulationClock, UpdateObserver, Vector3,
    },
    tests::{
        init_logger, test_clock, test_engine, EARTH_EQUATORIAL_RADIUS_M, ESTIMATE_CLOCK_SHIFT_US,
        ESTIMATE_RADIAL_SHIFT_M,
    },
    time::ecef_to_eci,
};

use rstest::*;

use std::{cell::RefCell, rc::Rc};

const L1_MHZ: f64 = 1575.42;

#[fixture]
fn engine() -> GnssSatellites {
    init_logger();
    let mut engine = test_engine();
    engine.set_up(&test_clock()).unwrap();
    engine
}

/// Receiver at given altitude, right below this satellite
fn receiver_below(engine: &GnssSatellites, index: usize, altitude_km: f64) -> Vector3<f64> {
    let sv = engine.truth().position_ecef_m(index);
    sv.normalize() * (EARTH_EQUATORIAL_RADIUS_M + altitude_km * 1.0E3)
}

#[test]
fn disabled_engine() {
    let mut engine = GnssSatellites::new(false);
    let clock = test_clock();

    engine.set_up(&clock).unwrap();
    engine.update(&clock);

    assert!(!engine.is_enabled());
    assert_eq!(engine.start(), None);
    assert_eq!(engine.number_of_satellites(), 0);

    let g01 = engine.index_from_id("G01").unwrap();
    let rx = Vector3::new(7000.0E3, 0.0, 0.0);

    assert!(!engine.is_valid(g01));
    assert_eq!(engine.position_ecef_m(g01), Vector3::zeros());
    assert_eq!(engine.clock_bias_m(g01), 0.0);
    assert_eq!(
        engine.pseudo_range_m(g01, rx, 0.0, L1_MHZ, ReferenceFrame::Ecef),
        0.0
    );
    assert_eq!(
        engine.carrier_phase(g01, rx, 0.0, L1_MHZ, ReferenceFrame::Ecef),
        CarrierPhase::default()
    );
}

#[rstest]
fn estimated_values(mut engine: GnssSatellites) {
    let mut clock = test_clock();

    assert_eq!(engine.number_of_satellites(), 117);
    assert_eq!(
        engine.start(),
        Some(Epoch::from_gregorian_utc(2020, 1, 1, 2, 0, 0, 0))
    );

    for _ in 0..360 {
        clock.step();
        engine.update(&clock);

        for id in ["G01", "G02", "E05"] {
            let index = engine.index_from_id(id).unwrap();
            assert!(engine.is_valid(index), "{} should be valid", id);

            let truth = engine.truth().position_ecef_m(index);
            let estimate = engine.position_ecef_m(index);
            assert_eq!(estimate, engine.estimate().position_ecef_m(index));

            let radial_m = estimate.norm() - truth.norm();
            assert!((radial_m - ESTIMATE_RADIAL_SHIFT_M).abs() < 1.0E-2);

            let clock_m = engine.clock_bias_m(index) - engine.truth().clock_bias_m(index);
            let expected_m = ESTIMATE_CLOCK_SHIFT_US * 1.0E-6 * SPEED_OF_LIGHT_M_S;
            assert!((clock_m - expected_m).abs() < 1.0E-6);

            let eci = engine.position_eci_m(index);
            assert!((eci.norm() - estimate.norm()).abs() < 1.0E-2);
        }
    }

    // not in the products
    let g03 = engine.index_from_id("G03").unwrap();
    assert!(!engine.is_valid(g03));
    assert_eq!(engine.position_eci_m(g03), Vector3::zeros());

    // out of range
    assert!(!engine.is_valid(117));
    assert_eq!(engine.position_ecef_m(117), Vector3::zeros());
    assert_eq!(engine.clock_bias_m(117), 0.0);

    assert_eq!(engine.id_from_index(1), Some("G02".to_string()));
    assert_eq!(engine.id_from_index(117), None);
}

#[rstest]
fn pseudo_range(engine: GnssSatellites) {
    let g01 = engine.index_from_id("G01").unwrap();
    let sv = engine.truth().position_ecef_m(g01);
    let sv_clock_m = engine.truth().clock_bias_m(g01);

    // above the ionosphere
    let rx = receiver_below(&engine, g01, 2000.0);
    let rx_clock_m = 123.456;

    assert_eq!(
        engine.ionospheric_delay_m(g01, rx, L1_MHZ, ReferenceFrame::Ecef),
        0.0
    );

    let pr = engine.pseudo_range_m(g01, rx, rx_clock_m, L1_MHZ, ReferenceFrame::Ecef);
    let expected = (sv - rx).norm() + rx_clock_m - sv_clock_m;
    assert!((pr - expected).abs() < 1.0E-6);

    // moving away from the satellite
    let mut previous = pr;
    for km in 1..10 {
        let rx = rx - sv.normalize() * (km as f64 * 1.0E3);
        let pr = engine.pseudo_range_m(g01, rx, rx_clock_m, L1_MHZ, ReferenceFrame::Ecef);
        assert!(pr > previous);
        previous = pr;
    }

    // receiver clock
    let pr_late = engine.pseudo_range_m(g01, rx, rx_clock_m + 1.0, L1_MHZ, ReferenceFrame::Ecef);
    assert!((pr_late - pr - 1.0).abs() < 1.0E-6);

    // same observation, in the inertial frame
    let t = engine.start().unwrap();
    let rx_eci = ecef_to_eci(t) * rx;
    let pr_eci = engine.pseudo_range_m(g01, rx_eci, rx_clock_m, L1_MHZ, ReferenceFrame::Eci);
    assert!((pr_eci - pr).abs() < 1.0E-2, "ecef: {} eci: {}", pr, pr_eci);
}

#[rstest]
fn carrier_phase(engine: GnssSatellites) {
    let g01 = engine.index_from_id("G01").unwrap();
    let sv = engine.truth().position_ecef_m(g01);
    let sv_clock_m = engine.truth().clock_bias_m(g01);

    // 500 km LEO, right below the satellite
    let rx = receiver_below(&engine, g01, 500.0);
    let rx_clock_m = -42.0;

    let iono_m = engine.ionospheric_delay_m(g01, rx, L1_MHZ, ReferenceFrame::Ecef);
    let expected_iono_m = 20.0 * 0.5 * (1500.0 / L1_MHZ).powi(2);
    assert!((iono_m - expected_iono_m).abs() < 1.0E-6, "iono: {}", iono_m);

    let phase = engine.carrier_phase(g01, rx, rx_clock_m, L1_MHZ, ReferenceFrame::Ecef);
    assert!(phase.fraction >= 0.0 && phase.fraction < 1.0);
    assert_eq!(phase.ambiguity, phase.ambiguity.floor());

    let wavelength_m = SPEED_OF_LIGHT_M_S * 1.0E-6 / L1_MHZ;
    let expected_m = (sv - rx).norm() + rx_clock_m - sv_clock_m - iono_m;
    assert!((phase.cycles() * wavelength_m - expected_m).abs() < 1.0E-6);

    // code and phase ionospheric delays have opposite signs
    let pr = engine.pseudo_range_m(g01, rx, rx_clock_m, L1_MHZ, ReferenceFrame::Ecef);
    assert!((pr - phase.cycles() * wavelength_m - 2.0 * iono_m).abs() < 1.0E-6);
}

#[rstest]
#[case(0.0, 0.0, 0.0)]
#[case(12.25, 0.25, 12.0)]
#[case(-0.25, 0.75, -1.0)]
#[case(-1.0E-17, 0.0, 0.0)]
#[case(-1.0E-20, 0.0, 0.0)]
#[case(-3.0, 0.0, -3.0)]
fn cycle_split(#[case] cycles: f64, #[case] fraction: f64, #[case] ambiguity: f64) {
    let phase = CarrierPhase::from_cycles(cycles);
    assert!(phase.fraction >= 0.0 && phase.fraction < 1.0);
    assert_eq!(phase.fraction, fraction);
    assert_eq!(phase.ambiguity, ambiguity);
}

#[rstest]
fn ionosphere(engine: GnssSatellites) {
    let g01 = engine.index_from_id("G01").unwrap();

    let mut previous = f64::MAX;
    for altitude_km in [0.0, 100.0, 250.0, 500.0, 750.0, 999.0] {
        let rx = receiver_below(&engine, g01, altitude_km);
        let delay = engine.ionospheric_delay_m(g01, rx, L1_MHZ, ReferenceFrame::Ecef);
        assert!(delay > 0.0);
        assert!(delay < previous, "{}km: {}m", altitude_km, delay);
        previous = delay;

        // higher frequencies are less delayed
        let l5 = engine.ionospheric_delay_m(g01, rx, 1176.45, ReferenceFrame::Ecef);
        assert!(l5 > delay);
    }

    for altitude_km in [1000.001, 1500.0, 20_000.0] {
        let rx = receiver_below(&engine, g01, altitude_km);
        let delay = engine.ionospheric_delay_m(g01, rx, L1_MHZ, ReferenceFrame::Ecef);
        assert_eq!(delay, 0.0);
    }

    // same geometry, inertial frame
    let t = engine.start().unwrap();
    for altitude_km in [0.0, 500.0] {
        let rx = receiver_below(&engine, g01, altitude_km);
        let ecef = engine.ionospheric_delay_m(g01, rx, L1_MHZ, ReferenceFrame::Ecef);
        let eci =
            engine.ionospheric_delay_m(g01, ecef_to_eci(t) * rx, L1_MHZ, ReferenceFrame::Eci);
        assert!((eci - ecef).abs() < 1.0E-6, "ecef: {} eci: {}", ecef, eci);
    }

    // not available
    let g03 = engine.index_from_id("G03").unwrap();
    let rx = receiver_below(&engine, g01, 0.0);
    assert_eq!(
        engine.ionospheric_delay_m(g03, rx, L1_MHZ, ReferenceFrame::Ecef),
        0.0
    );
}

struct ConstantIonosphere {}

impl IonosphereBias for ConstantIonosphere {
    fn ionosphere_bias_m(&self, _: &BiasRuntime) -> f64 {
        5.0
    }
}

#[test]
fn custom_ionosphere() {
    let mut engine = test_engine().with_ionosphere(ConstantIonosphere {});
    let clock = test_clock();
    engine.set_up(&clock).unwrap();

    let g01 = engine.index_from_id("G01").unwrap();
    let rx = receiver_below(&engine, g01, 20_000.0);
    assert_eq!(
        engine.ionospheric_delay_m(g01, rx, L1_MHZ, ReferenceFrame::Eci),
        5.0
    );
}

struct Recorder {
    id: usize,
    events: Rc<RefCell<Vec<(usize, Epoch, bool)>>>,
}

impl UpdateObserver for Recorder {
    fn on_update(&mut self, t: Epoch, truth: &SatelliteInfo, estimate: &SatelliteInfo) {
        let valid = truth.is_valid(0) && estimate.is_valid(0);
        self.events.borrow_mut().push((self.id, t, valid));
    }
}

#[test]
fn observers() {
    init_logger();
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut engine = test_engine();
    for id in 0..2 {
        engine.register_observer(Box::new(Recorder {
            id,
            events: Rc::clone(&events),
        }));
    }

    let mut clock = test_clock();

    // not set up: nothing happens
    engine.update(&clock);
    assert!(events.borrow().is_empty());

    engine.set_up(&clock).unwrap();
    assert!(events.borrow().is_empty());

    for _ in 0..3 {
        clock.step();
        engine.update(&clock);
    }

    let t0 = engine.start().unwrap();
    let events = events.borrow();
    assert_eq!(events.len(), 6);
    for (nth, (id, t, valid)) in events.iter().enumerate() {
        assert_eq!(*id, nth % 2);
        let elapsed_s = ((nth / 2) + 1) as f64 * clock.step_width_s();
        assert_eq!((*t - t0).to_seconds(), elapsed_s);
        assert!(valid);
    }
}

#[rstest]
fn log_lines(engine: GnssSatellites) {
    let header = engine.log_header();
    let value = engine.log_value();

    assert_eq!(header.matches(',').count(), 32 * 4);
    assert_eq!(value.matches(',').count(), 32 * 4);

    let fields = value.split(',').collect::<Vec<_>>();

    // G01
    let position = engine.truth().position_ecef_m(0);
    for i in 0..3 {
        let logged = fields[i].parse::<f64>().unwrap();
        assert!((logged - position[i]).abs() < 1.0E-6);
    }
    let clock = fields[3].parse::<f64>().unwrap();
    assert!((clock - engine.truth().clock_bias_m(0)).abs() < 1.0E-9);

    // G03: no data
    for field in &fields[8..12] {
        assert_eq!(*field, "0");
    }
}
