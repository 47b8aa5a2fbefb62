use crate::{
    prelude::{Epoch, Page},
    tests::{reference_epoch, SyntheticOrbit},
};

use hifitime::Unit;

fn epoch_fields(t: Epoch) -> String {
    let (y, m, d, hh, mm, ss, ns) = t.to_gregorian_utc();
    format!(
        "{:4} {:2} {:2} {:2} {:2} {:11.8}",
        y,
        m,
        d,
        hh,
        mm,
        ss as f64 + ns as f64 * 1.0E-9
    )
}

/// Synthetic SP3 products
#[derive(Debug, Clone)]
pub struct ProductBuilder {
    pub t0: Epoch,
    pub interval_s: f64,
    pub num_epochs: usize,
    pub satellites: Vec<(String, SyntheticOrbit)>,
    /// (satellite, epoch) samples published as "no data"
    pub missing: Vec<(String, usize)>,
}

impl ProductBuilder {
    pub fn new(interval_s: f64, num_epochs: usize) -> Self {
        Self {
            t0: reference_epoch(),
            interval_s,
            num_epochs,
            satellites: Vec::new(),
            missing: Vec::new(),
        }
    }

    pub fn starting_at(mut self, t0: Epoch) -> Self {
        self.t0 = t0;
        self
    }

    pub fn with_satellite(mut self, id: &str, orbit: SyntheticOrbit) -> Self {
        self.satellites.push((id.to_string(), orbit));
        self
    }

    pub fn with_missing_sample(mut self, id: &str, epoch: usize) -> Self {
        self.missing.push((id.to_string(), epoch));
        self
    }

    /// Sampling instant of this epoch
    pub fn epoch(&self, nth: usize) -> Epoch {
        self.t0 + nth as f64 * self.interval_s * Unit::Second
    }

    /// Builds the SP3 page
    pub fn build(&self, name: &str) -> Page {
        let mut lines = vec![
            format!(
                "#cP{} {} ORBIT IGS14 HLM  IGS",
                epoch_fields(self.t0),
                self.num_epochs
            ),
            format!(
                "## 2086 259200.00000000 {:14.8} 58849 0.0000000000000",
                self.interval_s
            ),
            format!("+   {}   G01G02", self.satellites.len()),
            "%c G  cc GPS ccc cccc cccc cccc cccc ccccc ccccc ccccc ccccc".to_string(),
            "/* synthetic products".to_string(),
        ];

        for nth in 0..self.num_epochs {
            let t = self.epoch(nth);
            let dt_s = (t - reference_epoch()).to_seconds();

            lines.push(format!("*  {}", epoch_fields(t)));

            for (id, orbit) in self.satellites.iter() {
                if self.missing.iter().any(|(sv, n)| sv == id && *n == nth) {
                    lines.push(format!(
                        "P{} {:14.6} {:14.6} {:14.6} {:14.6}",
                        id, 999999.999999, 999999.999999, 999999.999999, 999999.999999
                    ));
                    continue;
                }
                let position_km = orbit.position_m(dt_s) / 1.0E3;
                lines.push(format!(
                    "P{} {:14.6} {:14.6} {:14.6} {:14.12}",
                    id,
                    position_km[0],
                    position_km[1],
                    position_km[2],
                    orbit.clock_us(dt_s)
                ));
            }
        }

        lines.push("EOF".to_string());
        Page::new(name, lines)
    }
}

/// Synthetic clock stream: `num_records` per satellite, every `interval_s`.
pub fn clk_page(
    name: &str,
    t0: Epoch,
    interval_s: f64,
    num_records: usize,
    satellites: &[(&str, SyntheticOrbit)],
) -> Page {
    let mut lines = vec![
        "     3.00           C                                       RINEX VERSION / TYPE"
            .to_string(),
        "                                                            END OF HEADER".to_string(),
    ];
    for nth in 0..num_records {
        let t = t0 + nth as f64 * interval_s * Unit::Second;
        let dt_s = (t - reference_epoch()).to_seconds();
        lines.push(format!("AR ABMF {}  1    1.0E-09", epoch_fields(t)));
        for (id, orbit) in satellites {
            lines.push(format!(
                "AS {}  {}  2    {:.12E}  1.0E-11",
                id,
                epoch_fields(t),
                orbit.clock_us(dt_s) * 1.0E-6
            ));
        }
    }
    Page::new(name, lines)
}
