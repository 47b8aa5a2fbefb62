//! Product files discovery and loading
use crate::{
    cfg::{ClockFormat, ProductConfig, ProductFiles},
    error::Error,
    records::Page,
    satellites::ProductPages,
};

use log::{debug, info, warn};

use std::path::{Path, PathBuf};

/// Upper bound of any file sequence, protects against unreachable `last` files
const MAX_SEQUENCE_LENGTH: usize = 10_000;

/// CODE multi GNSS daily products naming convention
const CODE_MGEX_PREFIX: &str = "COD0MGXFIN_";
const CODE_MGEX_SUFFIX: &str = "0000_01D_05M_ORB.SP3";

/// Trailing line of some products
const END_OF_FILE: &str = "EOF";

/// Sub directory of this product sort, relative to the products root
pub fn product_directory(sort: &str) -> Result<PathBuf, Error> {
    let unknown = || Error::UnknownProductSort(sort.to_string());

    if let Some(kind) = sort.strip_prefix("IG") {
        let sub = match kind.chars().next() {
            Some('S') => "igs",
            Some('R') => "igr",
            Some('U') => "igu",
            _ => return Err(unknown()),
        };
        return Ok(Path::new("IGS").join(sub));
    }

    if sort.starts_with("ma") {
        return Ok(Path::new("JAXA").join("madoca"));
    }

    let (agency, kind) = sort.split_once('_').ok_or_else(unknown)?;
    let sub = match kind.chars().next() {
        Some('F') => "final",
        Some('R') => "rapid",
        Some('U') => "ultra_rapid",
        _ => return Err(unknown()),
    };
    Ok(Path::new(agency).join(sub))
}

/// True for ultra rapid products, released every 6 hours
pub fn is_ultra_rapid(sort: &str) -> bool {
    sort.starts_with("IGU") || sort.contains("Ultra")
}

/// GPS week / day of week file name: `<prefix><wwww><d>[_<hh>]<suffix>`
#[derive(Debug, Clone, PartialEq)]
struct WeekFileName {
    prefix: String,
    week: u32,
    day: u32,
    hour: Option<u32>,
    suffix: String,
}

impl WeekFileName {
    fn parse(name: &str, ultra_rapid: bool) -> Result<Self, Error> {
        let invalid = || Error::InvalidFileName(name.to_string());

        let start = name.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let digits = |range: std::ops::Range<usize>| {
            name.get(range)
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(invalid)
        };

        let week = digits(start..start + 4)?;
        let day = digits(start + 4..start + 5)?;

        let (hour, suffix_start) = if ultra_rapid {
            (Some(digits(start + 6..start + 8)?), start + 8)
        } else {
            (None, start + 5)
        };

        Ok(Self {
            prefix: name[..start].to_string(),
            week,
            day,
            hour,
            suffix: name.get(suffix_start..).ok_or_else(invalid)?.to_string(),
        })
    }

    /// Moves to the next product: 6 hours later for ultra rapid products,
    /// next day otherwise.
    fn advance(&mut self) {
        match self.hour.as_mut() {
            Some(hour) => {
                *hour += 6;
                if *hour >= 24 {
                    *hour = 0;
                    self.day += 1;
                }
            },
            None => self.day += 1,
        }
        if self.day >= 7 {
            self.day = 0;
            self.week += 1;
        }
    }
}

impl std::fmt::Display for WeekFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.week, self.day)?;
        if let Some(hour) = self.hour {
            write!(f, "_{:02}", hour)?;
        }
        write!(f, "{}", self.suffix)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// CODE daily file name: `COD0MGXFIN_<yyyy><ddd>0000_01D_05M_ORB.SP3`
#[derive(Debug, Clone, Copy, PartialEq)]
struct DayOfYearFileName {
    year: i32,
    day_of_year: u32,
}

impl DayOfYearFileName {
    fn parse(name: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidFileName(name.to_string());
        let date = name.strip_prefix(CODE_MGEX_PREFIX).ok_or_else(invalid)?;
        let year = date
            .get(0..4)
            .and_then(|s| s.parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let day_of_year = date
            .get(4..7)
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        Ok(Self { year, day_of_year })
    }

    fn advance(&mut self) {
        let year_length = if is_leap_year(self.year) { 366 } else { 365 };
        self.day_of_year += 1;
        if self.day_of_year > year_length {
            self.day_of_year = 1;
            self.year += 1;
        }
    }
}

impl std::fmt::Display for DayOfYearFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}{}{:03}{}",
            CODE_MGEX_PREFIX, self.year, self.day_of_year, CODE_MGEX_SUFFIX
        )
    }
}

/// Enumerates `first` then subsequent names, until `last` is generated.
fn enumerate<T, F>(mut name: T, last: &str, advance: F) -> Result<Vec<String>, Error>
where
    T: std::fmt::Display,
    F: Fn(&mut T),
{
    let mut names = Vec::new();
    while names.len() < MAX_SEQUENCE_LENGTH {
        let current = name.to_string();
        let done = current == last;
        names.push(current);
        if done {
            return Ok(names);
        }
        advance(&mut name);
    }
    Err(Error::InvalidFileName(last.to_string()))
}

/// File names of this product sequence, `first` and `last` included.
pub fn file_sequence(files: &ProductFiles) -> Result<Vec<String>, Error> {
    if files.first.starts_with("COD") {
        let first = DayOfYearFileName::parse(&files.first)?;
        return enumerate(first, &files.last, DayOfYearFileName::advance);
    }
    let first = WeekFileName::parse(&files.first, is_ultra_rapid(&files.sort))?;
    enumerate(first, &files.last, WeekFileName::advance)
}

/// Reads one file into a [Page]. A trailing "EOF" line is dropped.
pub fn read_page<P: AsRef<Path>>(path: P) -> Result<Page, Error> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let mut lines = content.lines().map(str::to_string).collect::<Vec<_>>();
    if lines.last().map(|line| line.trim_end() == END_OF_FILE).unwrap_or(false) {
        lines.pop();
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    debug!("{}: {} lines", name, lines.len());
    Ok(Page { name, lines })
}

/// Reads every file of this product sequence.
/// `subdirectory` is appended to the product directory (clock streams).
pub fn load_pages<P: AsRef<Path>>(
    root: P,
    files: &ProductFiles,
    subdirectory: Option<&str>,
) -> Result<Vec<Page>, Error> {
    let mut directory = root.as_ref().join(product_directory(&files.sort)?);
    if let Some(subdirectory) = subdirectory {
        directory.push(subdirectory);
    }

    file_sequence(files)?
        .iter()
        .map(|name| read_page(directory.join(name)))
        .collect()
}

/// Clock streams live in a sub directory: either configured,
/// or named after the file extension ("clk_30s" for "igs20863.clk_30s").
pub fn clock_subdirectory(files: &ProductFiles) -> Option<String> {
    if files.subdirectory.is_some() {
        return files.subdirectory.clone();
    }
    let (_, extension) = files.first.rsplit_once('.')?;
    Some(extension.to_string()).filter(|extension| !extension.is_empty())
}

/// Loads both position and clock pages of this product set.
pub fn load_product_pages<P: AsRef<Path>>(
    root: P,
    product: &ProductConfig,
) -> Result<ProductPages, Error> {
    let root = root.as_ref();

    if is_ultra_rapid(&product.position_files.sort) && product.ultra_rapid.segment().is_none() {
        warn!(
            "{}: ultra rapid products without segment selection",
            product.position_files.sort
        );
    }

    let position = load_pages(root, &product.position_files, None)?;

    let clock = match product.clock.format {
        ClockFormat::Sp3 => load_pages(root, &product.clock_files, None)?,
        ClockFormat::Clk => {
            let subdirectory = clock_subdirectory(&product.clock_files);
            load_pages(root, &product.clock_files, subdirectory.as_deref())?
        },
    };

    info!(
        "{}: {} position pages, {}: {} clock pages ({})",
        product.position_files.sort,
        position.len(),
        product.clock_files.sort,
        clock.len(),
        product.clock.format,
    );

    Ok(ProductPages {
        position,
        position_settings: product.position,
        clock,
        clock_settings: product.clock,
        ultra_rapid: product.ultra_rapid,
    })
}
