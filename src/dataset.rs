//! Loading the tower table from CSV.
//!
//! The expected layout is one tower per line with at least an `Operateur`, `Latitude` and `Longitude` column plus
//! one 0/1 column per network. Any other column is ignored.

use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use log::info;

use crate::{
    error::{ConfigurationError, Error, Result},
    model::{OperatorCode, TowerDataset, TowerRecord},
    network::NetworkSet,
};

pub const OPERATOR_COLUMN: &str = "Operateur";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";

pub const DEFAULT_DELIMITER: u8 = b';';

pub fn load(path: &Path, delimiter: u8, networks: &NetworkSet) -> Result<TowerDataset> {
    let file = File::open(path).map_err(csv::Error::from)?;
    let dataset = from_reader(file, delimiter, networks)?;
    info!("loaded {} towers from {}", dataset.len(), path.display());
    Ok(dataset)
}

pub fn from_reader<R: Read>(rdr: R, delimiter: u8, networks: &NetworkSet) -> Result<TowerDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|x| x == name);

    let mut missing = Vec::new();
    let mut required = |name: &str| {
        let position = column(name);
        if position.is_none() {
            missing.push(name.to_owned());
        }
        position.unwrap_or_default()
    };
    let operator = required(OPERATOR_COLUMN);
    let latitude = required(LATITUDE_COLUMN);
    let longitude = required(LONGITUDE_COLUMN);
    let flags: Vec<(String, usize)> = networks
        .iter()
        .map(|x| (x.to_owned(), required(x)))
        .collect();
    if !missing.is_empty() {
        return Err(ConfigurationError::MissingColumns(missing).into());
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map_or(0, |x| x.line());
        let field = |i: usize| row.get(i).unwrap_or_default();
        let fail = |reason: String| Error::Parse { line, reason };

        let code = field(operator);
        let code = code
            .parse::<u32>()
            .map_err(|_| fail(format!("invalid operator {code:?}")))?;
        let lat = parse_coordinate(field(latitude))
            .ok_or_else(|| fail("invalid latitude".to_owned()))?;
        let lon = parse_coordinate(field(longitude))
            .ok_or_else(|| fail("invalid longitude".to_owned()))?;

        let mut coverage = BTreeMap::new();
        for (network, i) in &flags {
            let value = field(*i);
            let flag = parse_flag(value)
                .ok_or_else(|| fail(format!("invalid {network} flag {value:?}")))?;
            coverage.insert(network.clone(), flag);
        }

        records.push(TowerRecord {
            operator: OperatorCode(code),
            latitude: lat,
            longitude: lon,
            coverage,
        });
    }

    TowerDataset::new(networks.clone(), records)
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        x if x.eq_ignore_ascii_case("true") => Some(true),
        x if x.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
