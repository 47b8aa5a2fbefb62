//! Flat satellite index space
use gnss::prelude::{Constellation, SV};

/// One contiguous range of the flat satellite index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationRange {
    /// [Constellation] covered by this range
    pub constellation: Constellation,
    /// Identifier letter ('G', 'R', ..)
    pub letter: char,
    /// Maximal number of satellites (highest slot number)
    pub size: usize,
}

/// [ConstellationTable] describes how the flat satellite index space
/// is partitioned between constellations. Slot `n` (starting at 1) of a
/// constellation maps to `offset + n - 1`.
///
/// The table is immutable once built: construct it once and pass it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationTable {
    ranges: Vec<ConstellationRange>,
    offsets: Vec<usize>,
    total: usize,
}

impl Default for ConstellationTable {
    /// GPS (32), GLONASS (26), Galileo (36), BeiDou (16) and QZSS (7)
    fn default() -> Self {
        Self::new(vec![
            ConstellationRange {
                constellation: Constellation::GPS,
                letter: 'G',
                size: 32,
            },
            ConstellationRange {
                constellation: Constellation::Glonass,
                letter: 'R',
                size: 26,
            },
            ConstellationRange {
                constellation: Constellation::Galileo,
                letter: 'E',
                size: 36,
            },
            ConstellationRange {
                constellation: Constellation::BeiDou,
                letter: 'C',
                size: 16,
            },
            ConstellationRange {
                constellation: Constellation::QZSS,
                letter: 'J',
                size: 7,
            },
        ])
    }
}

impl ConstellationTable {
    /// Builds a new [ConstellationTable], ranges being laid out in the given order.
    pub fn new(ranges: Vec<ConstellationRange>) -> Self {
        let mut offsets = Vec::with_capacity(ranges.len());
        let mut total = 0;
        for range in ranges.iter() {
            offsets.push(total);
            total += range.size;
        }
        Self {
            ranges,
            offsets,
            total,
        }
    }

    /// Total number of satellites.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterates over (first index, [ConstellationRange]).
    pub fn ranges(&self) -> impl Iterator<Item = (usize, &ConstellationRange)> + '_ {
        self.offsets.iter().copied().zip(self.ranges.iter())
    }

    /// Index range covered by given [Constellation], if tracked.
    pub fn constellation_indexes(&self, constellation: Constellation) -> Option<std::ops::Range<usize>> {
        self.ranges()
            .find(|(_, range)| range.constellation == constellation)
            .map(|(offset, range)| offset..offset + range.size)
    }

    fn index(&self, position: usize, slot: usize) -> Option<usize> {
        let range = self.ranges.get(position)?;
        if slot == 0 || slot > range.size {
            return None;
        }
        Some(self.offsets[position] + slot - 1)
    }

    /// Converts a satellite identifier like "G01", "E12" or "PG01"
    /// into its flat index. Returns None for unknown constellations or
    /// slots that do not fit in the constellation range.
    pub fn index_from_id(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        let id = match id.len() > 2 && id.starts_with('P') {
            true => &id[1..],
            false => id,
        };
        let mut chars = id.chars();
        let letter = chars.next()?;
        let slot = chars.as_str().trim().parse::<usize>().ok()?;
        let position = self.ranges.iter().position(|range| range.letter == letter)?;
        self.index(position, slot)
    }

    /// Converts a flat index into a satellite identifier, slot number
    /// being zero padded to two digits.
    pub fn id_from_index(&self, index: usize) -> Option<String> {
        let (offset, range) = self.locate(index)?;
        Some(format!("{}{:02}", range.letter, index - offset + 1))
    }

    /// Converts a [SV] to its flat index.
    pub fn index_from_sv(&self, sv: SV) -> Option<usize> {
        let position = self
            .ranges
            .iter()
            .position(|range| range.constellation == sv.constellation)?;
        self.index(position, sv.prn as usize)
    }

    /// Converts a flat index to [SV].
    pub fn sv_from_index(&self, index: usize) -> Option<SV> {
        let (offset, range) = self.locate(index)?;
        Some(SV {
            constellation: range.constellation,
            prn: (index - offset + 1) as u8,
        })
    }

    fn locate(&self, index: usize) -> Option<(usize, &ConstellationRange)> {
        self.ranges()
            .find(|(offset, range)| index >= *offset && index < offset + range.size)
    }
}
