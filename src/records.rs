//! Line oriented product records.
//!
//! Precise products are handed to us as [Page]s: one per source file,
//! already split into lines. Fields are whitespace separated.
use crate::{
    cfg::UltraRapidMode,
    constants::{NO_DATA_SENTINEL, NO_DATA_TOLERANCE},
    constellation::ConstellationTable,
    error::Error,
    prelude::{Epoch, TimeScale},
    time::epoch_from_calendar,
};

use std::str::FromStr;

/// Marker of high rate clock stream records we are interested in
/// (clock bias of one satellite).
pub(crate) const CLOCK_RECORD_MARKER: &str = "AS ";

/// Marker of epoch lines, in SP3 like products
pub(crate) const EPOCH_MARKER: char = '*';

/// One source file, as a list of lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Source name, used in error reports
    pub name: String,
    /// Content
    pub lines: Vec<String>,
}

impl Page {
    /// Builds a new [Page] from any line iterator
    pub fn new<I, S>(name: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ingestion context, shared by all pages of a product
#[derive(Debug, Clone, Copy)]
pub struct IngestContext<'a> {
    /// Satellite index space
    pub table: &'a ConstellationTable,
    /// [TimeScale] in which epochs are expressed
    pub timescale: TimeScale,
    /// Ultra rapid segment selection
    pub ultra_rapid: UltraRapidMode,
}

/// Returns nth whitespace separated field of this line
fn field<T: FromStr>(line: &str, nth: usize) -> Option<T> {
    line.split_whitespace().nth(nth)?.parse::<T>().ok()
}

/// True if this value is the "no data" marker
pub(crate) fn is_no_data(value: f64) -> bool {
    (value - NO_DATA_SENTINEL).abs() < NO_DATA_TOLERANCE
}

/// Header of SP3 like pages and location of the data block
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sp3Layout {
    /// Number of epochs in this page
    pub num_epochs: usize,
    /// Nominal sampling interval (s)
    pub interval_s: f64,
    /// Number of satellites per epoch
    pub num_sv: usize,
    /// First epoch line
    pub first_line: usize,
}

impl Sp3Layout {
    pub fn parse(page: &Page) -> Result<Self, Error> {
        if page.lines.len() < 3 {
            return Err(Error::MissingHeader(page.name.clone()));
        }

        let num_epochs = field::<usize>(&page.lines[0], 6)
            .ok_or_else(|| Error::MalformedHeader(page.name.clone(), 0))?;

        let interval_s = field::<f64>(&page.lines[1], 3)
            .ok_or_else(|| Error::MalformedHeader(page.name.clone(), 1))?;

        let num_sv = field::<usize>(&page.lines[2], 1)
            .ok_or_else(|| Error::MalformedHeader(page.name.clone(), 2))?;

        let first_line = page
            .lines
            .iter()
            .enumerate()
            .skip(3)
            .find(|(_, line)| line.starts_with(EPOCH_MARKER))
            .map(|(nth, _)| nth)
            .ok_or_else(|| Error::MissingEpochRecord(page.name.clone()))?;

        Ok(Self {
            num_epochs,
            interval_s,
            num_sv,
            first_line,
        })
    }

    /// Returns the data lines of this page, possibly restricted
    /// to one eighth of the data block (ultra rapid products).
    pub fn data_lines<'a>(
        &self,
        page: &'a Page,
        ultra_rapid: UltraRapidMode,
    ) -> Result<&'a [String], Error> {
        ultra_rapid.validate()?;

        let malformed = || Error::MalformedHeader(page.name.clone(), 0);

        let block = self
            .num_sv
            .checked_add(1)
            .and_then(|lines| lines.checked_mul(self.num_epochs))
            .ok_or_else(malformed)?;

        let (offset, len) = match ultra_rapid.segment() {
            Some(segment) => (block / 8 * segment, block / 8),
            None => (0, block),
        };

        let start = self.first_line.checked_add(offset).ok_or_else(malformed)?;
        let end = start.checked_add(len).ok_or_else(malformed)?;
        if end > page.lines.len() {
            return Err(Error::TruncatedPage(
                page.name.clone(),
                end,
                page.lines.len(),
            ));
        }
        Ok(&page.lines[start..end])
    }
}

/// Decodes an epoch line: `* yyyy mm dd hh mm ss.ssss`
pub(crate) fn parse_epoch_line(line: &str, timescale: TimeScale) -> Result<Epoch, Error> {
    let malformed = || Error::MalformedEpoch(line.to_string());
    let year = field::<i32>(line, 1).ok_or_else(malformed)?;
    let month = field::<u8>(line, 2).ok_or_else(malformed)?;
    let day = field::<u8>(line, 3).ok_or_else(malformed)?;
    let hour = field::<u8>(line, 4).ok_or_else(malformed)?;
    let minute = field::<u8>(line, 5).ok_or_else(malformed)?;
    let seconds = field::<f64>(line, 6).ok_or_else(malformed)?;
    epoch_from_calendar(year, month, day, hour, minute, seconds, timescale)
}

/// Satellite line of SP3 like pages: `<id> x y z clock`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SatelliteRecord {
    /// Flat satellite index
    pub index: usize,
    /// ECEF position (km)
    pub position_km: (f64, f64, f64),
    /// Clock bias (µs)
    pub clock_us: Option<f64>,
}

impl SatelliteRecord {
    pub fn parse(line: &str, table: &ConstellationTable) -> Result<Self, Error> {
        let id = line
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::MalformedRecord(line.to_string()))?;

        let index = table
            .index_from_id(id)
            .ok_or_else(|| Error::UnknownSatellite(id.to_string()))?;

        let coordinate = |nth: usize| {
            field::<f64>(line, nth).ok_or_else(|| Error::MalformedRecord(line.to_string()))
        };

        Ok(Self {
            index,
            position_km: (coordinate(1)?, coordinate(2)?, coordinate(3)?),
            clock_us: field::<f64>(line, 4),
        })
    }

    /// True if any of the coordinates is missing
    pub fn missing_position(&self) -> bool {
        let (x, y, z) = self.position_km;
        is_no_data(x) || is_no_data(y) || is_no_data(z)
    }
}

/// High rate clock stream record:
/// `AS <id> yyyy mm dd hh mm ss.ssss <n> <bias_s> [<sigma_s>]`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClockRecord {
    /// Flat satellite index
    pub index: usize,
    /// Sampling instant
    pub epoch: Epoch,
    /// Clock bias (s)
    pub bias_s: f64,
}

impl ClockRecord {
    /// Decodes this line, returns None when this is not a satellite clock record.
    pub fn parse(
        line: &str,
        table: &ConstellationTable,
        timescale: TimeScale,
    ) -> Result<Option<Self>, Error> {
        if !line.starts_with(CLOCK_RECORD_MARKER) {
            return Ok(None);
        }

        let malformed = || Error::MalformedRecord(line.to_string());

        let id = line.split_whitespace().nth(1).ok_or_else(malformed)?;

        let index = table
            .index_from_id(id)
            .ok_or_else(|| Error::UnknownSatellite(id.to_string()))?;

        let year = field::<i32>(line, 2).ok_or_else(malformed)?;
        let month = field::<u8>(line, 3).ok_or_else(malformed)?;
        let day = field::<u8>(line, 4).ok_or_else(malformed)?;
        let hour = field::<u8>(line, 5).ok_or_else(malformed)?;
        let minute = field::<u8>(line, 6).ok_or_else(malformed)?;
        let seconds = field::<f64>(line, 7).ok_or_else(malformed)?;
        let bias_s = field::<f64>(line, 9).ok_or_else(malformed)?;

        let epoch = epoch_from_calendar(year, month, day, hour, minute, seconds, timescale)?;

        Ok(Some(Self {
            index,
            epoch,
            bias_s,
        }))
    }
}
