use crate::{
    prelude::{GnssSatellites, ProductPages, SteppedClock},
    tests::{reference_calendar, ProductBuilder, SyntheticOrbit},
};

/// Satellites of the synthetic products
pub const TEST_SATELLITES: [(&str, usize); 3] = [("G01", 1), ("G02", 2), ("E05", 5)];

/// Estimated orbits are shifted by this amount, radially (m)
pub const ESTIMATE_RADIAL_SHIFT_M: f64 = 10.0;

/// Estimated clocks are shifted by this amount (µs)
pub const ESTIMATE_CLOCK_SHIFT_US: f64 = 1.0;

/// One day of products, every 15', positions and clocks
pub fn product_pages(radial_shift_m: f64, clock_shift_us: f64) -> ProductPages {
    let builder = TEST_SATELLITES.iter().fold(
        ProductBuilder::new(900.0, 97),
        |builder, (id, slot)| {
            builder.with_satellite(
                id,
                SyntheticOrbit::gps(*slot).shifted(radial_shift_m, clock_shift_us),
            )
        },
    );
    let page = builder.build("igs20863.sp3");
    ProductPages {
        position: vec![page.clone()],
        clock: vec![page],
        ..Default::default()
    }
}

/// Initialized engine, not set up yet
pub fn test_engine() -> GnssSatellites {
    let mut engine = GnssSatellites::new(true);
    engine
        .initialize(
            &product_pages(0.0, 0.0),
            &product_pages(ESTIMATE_RADIAL_SHIFT_M, ESTIMATE_CLOCK_SHIFT_US),
        )
        .unwrap();
    engine
}

/// Simulation clock starting 2 hours past the first product epoch
pub fn test_clock() -> SteppedClock {
    SteppedClock::new(reference_calendar(2), 10.0)
}
