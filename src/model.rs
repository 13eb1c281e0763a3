use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    location::QueryPoint,
    network::NetworkSet,
};

/// Operator identifier as it appears in the dataset (MCC followed by MNC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OperatorCode(pub u32);

impl fmt::Display for OperatorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable position of a record inside its [`TowerDataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TowerRecord {
    pub operator: OperatorCode,
    pub latitude: f64,
    pub longitude: f64,
    pub coverage: BTreeMap<String, bool>,
}

impl TowerRecord {
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Coverage flag for `network`, `None` if the record has no such column
    pub fn covers(&self, network: &str) -> Option<bool> {
        self.coverage.get(network).copied()
    }
}

/// Read-only tower table. Row ids are assigned in insertion order and never change.
#[derive(Debug, Clone)]
pub struct TowerDataset {
    records: Vec<TowerRecord>,
    networks: NetworkSet,
    operators: BTreeSet<OperatorCode>,
}

impl TowerDataset {
    /// Every record must sit at a valid latitude/longitude and carry a flag for each of `networks`.
    pub fn new(networks: NetworkSet, records: Vec<TowerRecord>) -> Result<Self> {
        for (i, record) in records.iter().enumerate() {
            if let Err(e) = QueryPoint::new(record.latitude, record.longitude) {
                return Err(Error::MalformedRecord {
                    row: RowId(i),
                    reason: e.to_string(),
                });
            }
            if let Some(missing) = networks.iter().find(|x| record.covers(x).is_none()) {
                return Err(Error::MalformedRecord {
                    row: RowId(i),
                    reason: format!("no value for network {missing}"),
                });
            }
        }

        let operators = records.iter().map(|x| x.operator).collect();
        Ok(Self {
            records,
            networks,
            operators,
        })
    }

    pub fn get(&self, row: RowId) -> Option<&TowerRecord> {
        self.records.get(row.0)
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowId, &TowerRecord)> {
        self.records.iter().enumerate().map(|(i, x)| (RowId(i), x))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Network columns loaded for every record
    pub fn networks(&self) -> &NetworkSet {
        &self.networks
    }

    /// Distinct operators across the whole table
    pub fn operators(&self) -> &BTreeSet<OperatorCode> {
        &self.operators
    }
}

#[cfg(test)]
pub(crate) fn fixture(towers: &[(u32, f64, f64, [bool; 3])]) -> TowerDataset {
    let networks = NetworkSet::default();
    let records = towers
        .iter()
        .map(|&(operator, latitude, longitude, flags)| TowerRecord {
            operator: OperatorCode(operator),
            latitude,
            longitude,
            coverage: networks.iter().map(str::to_owned).zip(flags).collect(),
        })
        .collect();
    TowerDataset::new(networks, records).unwrap()
}
