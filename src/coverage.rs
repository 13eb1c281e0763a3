use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    model::TowerDataset,
    nearest::NearestIndex,
    network::NetworkSet,
    operator::OperatorTable,
};

/// Per-operator, per-network coverage of the closest towers.
///
/// Serializes as `{"Orange": {"2G": true, "3G": false, ...}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CoverageReport(BTreeMap<String, BTreeMap<String, bool>>);

#[cfg(test)]
impl CoverageReport {
    pub(crate) fn get(&self, operator: &str) -> Option<&BTreeMap<String, bool>> {
        self.0.get(operator)
    }

    pub(crate) fn covers(&self, operator: &str, network: &str) -> Option<bool> {
        self.get(operator)?.get(network).copied()
    }

    pub(crate) fn operators(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Reads the `networks` flags of each winning tower and files them under the operator's label.
pub fn coverage(
    index: &NearestIndex,
    dataset: &TowerDataset,
    networks: &NetworkSet,
    operators: &OperatorTable,
) -> Result<CoverageReport> {
    let mut report = CoverageReport::default();
    for (&operator, nearest) in index {
        let inconsistent = || Error::InternalConsistency {
            operator,
            row: nearest.row,
        };
        let record = dataset
            .get(nearest.row)
            .filter(|x| x.operator == operator)
            .ok_or_else(inconsistent)?;

        let mut flags = BTreeMap::new();
        for network in networks.iter() {
            let flag = record.covers(network).ok_or_else(inconsistent)?;
            flags.insert(network.to_owned(), flag);
        }
        report
            .0
            .insert(operators.label(operator).into_owned(), flags);
    }

    Ok(report)
}
