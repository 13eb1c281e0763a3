use std::collections::BTreeMap;

use geo::{Distance, Euclidean};

use crate::{
    location::QueryPoint,
    model::{OperatorCode, RowId, TowerRecord},
    region::Region,
};

/// Closest tower found for one operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub row: RowId,
    pub distance: f64,
}

pub type NearestIndex = BTreeMap<OperatorCode, Nearest>;

/// Planar distance in degrees. Only meaningful over small windows.
pub fn distance(query: QueryPoint, record: &TowerRecord) -> f64 {
    Euclidean::distance(query.point(), record.point())
}

/// Closest tower of every operator present in `region`.
///
/// Rows are scanned in dataset order and a candidate only replaces the current best when it is strictly closer,
/// so on a tie the row with the lowest id wins.
pub fn locate(region: &Region, query: QueryPoint) -> NearestIndex {
    let mut index = NearestIndex::new();
    for (row, record) in region.rows() {
        let distance = distance(query, record);
        let best = index
            .get(&record.operator)
            .map_or(f64::INFINITY, |x| x.distance);
        if distance < best {
            index.insert(record.operator, Nearest { row, distance });
        }
    }
    index
}
