use crate::Result;
use rust_decimal::Decimal;
use scoring::services::vets_handicap::{MAX_VETS_BUCKET, MIN_VETS_BUCKET, StandardsCatalog, VetsStandards};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Age of the youngest veteran; bucket 1 is this age.
const FIRST_VETS_AGE: i64 = 50;

#[derive(Debug, Clone, Copy)]
struct StandardColumn {
    index: usize,
    is_female: bool,
    distance_miles: Decimal,
}

/// Loads VTTA age standards from CSV files.
///
/// The header row is `Age,m10,m25,...,f10,f25,...`: a column per gender and
/// distance in miles. Rows are ages; only veteran ages map to a bucket.
pub struct StandardsLoader;

impl StandardsLoader {
    /// `h:mm:ss` or `mm:ss` to seconds. Anything else reads as zero.
    pub fn parse_time(value: &str) -> Decimal {
        let parts: Vec<&str> = value.trim().split(':').collect();
        let numbers: Option<Vec<i64>> = parts.iter().map(|p| p.trim().parse::<i64>().ok()).collect();

        match numbers.as_deref() {
            Some([h, m, s]) => Decimal::from(h * 3600 + m * 60 + s),
            Some([m, s]) => Decimal::from(m * 60 + s),
            _ => Decimal::ZERO,
        }
    }

    /// Standards year encoded at the end of a file stem, e.g. `standards-2025.csv`.
    pub fn year_from_file_name(path: &Path) -> Option<i32> {
        if path.extension().is_none_or(|ext| !ext.eq_ignore_ascii_case("csv")) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let split = stem.len().checked_sub(4)?;
        let (prefix, year) = (stem.get(..split)?, stem.get(split..)?);
        if !prefix.ends_with(['-', '.']) || !year.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        year.parse().ok()
    }

    pub fn from_reader<R: Read>(year: i32, reader: R) -> Result<VetsStandards> {
        let mut csv = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<StandardColumn> = csv
            .headers()?
            .iter()
            .enumerate()
            .filter_map(|(index, header)| {
                let header = header.to_lowercase();
                let (is_female, distance) = match header.split_at_checked(1)? {
                    ("m", distance) => (false, distance),
                    ("f", distance) => (true, distance),
                    _ => return None,
                };
                Decimal::from_str(distance).ok().map(|distance_miles| StandardColumn {
                    index,
                    is_female,
                    distance_miles,
                })
            })
            .collect();

        let mut standards = VetsStandards::new(year);
        for record in csv.records() {
            let record = record?;
            let Some(age) = record.get(0).and_then(|a| a.parse::<i64>().ok()) else {
                continue;
            };
            let bucket = age - FIRST_VETS_AGE + 1;
            if bucket < i64::from(MIN_VETS_BUCKET) || bucket > i64::from(MAX_VETS_BUCKET) {
                continue;
            }

            for column in &columns {
                let seconds = Self::parse_time(record.get(column.index).unwrap_or_default());
                standards.insert(column.distance_miles, column.is_female, bucket as u8, seconds);
            }
        }

        debug!(
            "Standards {}: male distances {:?}, female distances {:?}",
            year,
            standards.supported_distances(false),
            standards.supported_distances(true)
        );
        Ok(standards)
    }

    /// Loads every `*-YYYY.csv` (or `*.YYYY.csv`) file in `directory`.
    pub async fn load_directory(directory: &Path) -> Result<StandardsCatalog> {
        let mut catalog = StandardsCatalog::new();
        let mut entries = tokio::fs::read_dir(directory).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(year) = Self::year_from_file_name(&path) else {
                continue;
            };
            let content = tokio::fs::read_to_string(&path).await?;
            let standards = Self::from_reader(year, content.as_bytes())?;
            if standards.is_empty() {
                warn!("Standards file {} has no veteran rows", path.display());
                continue;
            }
            info!("Loaded VTTA standards for {} from {}", year, path.display());
            catalog.add(standards);
        }

        Ok(catalog)
    }
}
