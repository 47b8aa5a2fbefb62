//! Log lines handed over to the simulation logger
use crate::{
    constellation::ConstellationTable,
    info::SatelliteInfo,
    prelude::Constellation,
};

/// Significant digits of the logged values
const LOG_SIGNIFICANT_DIGITS: usize = 16;

const AXES: [char; 3] = ['x', 'y', 'z'];

/// Formats `value` with the given number of significant digits, like `%g`:
/// scientific notation when the exponent is below -4 or reaches `digits`,
/// fixed notation otherwise. Trailing zeros are removed.
fn significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let digits = digits.max(1);

    // exponent after rounding to `digits`
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Removes trailing zeros of the fractional part, and the dot if nothing remains
fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// CSV header: ECEF position and clock bias of each GPS satellite,
/// named `GPS<index>`.
pub fn log_header(table: &ConstellationTable) -> String {
    let mut header = String::new();
    for index in table.constellation_indexes(Constellation::GPS).unwrap_or(0..0) {
        for axis in AXES {
            header.push_str(&format!("GPS{}_position_{}(ecef)[m],", index, axis));
        }
        header.push_str(&format!("GPS{}_clock_offset[m],", index));
    }
    header
}

/// CSV values matching [log_header], from the reference products.
pub fn log_value(table: &ConstellationTable, truth: &SatelliteInfo) -> String {
    let mut value = String::new();
    for index in table.constellation_indexes(Constellation::GPS).unwrap_or(0..0) {
        let position = truth.position_ecef_m(index);
        for coordinate in position.iter() {
            value.push_str(&significant(*coordinate, LOG_SIGNIFICANT_DIGITS));
            value.push(',');
        }
        value.push_str(&significant(truth.clock_bias_m(index), LOG_SIGNIFICANT_DIGITS));
        value.push(',');
    }
    value
}
