use log::{debug, info};

use crate::{
    coverage::{coverage, CoverageReport},
    error::Result,
    location::Geolocation,
    model::TowerDataset,
    nearest::{locate, NearestIndex},
    network::NetworkSet,
    operator::OperatorTable,
    region::{reduce, Reduction},
};

/// Everything a [`TowerManager`] needs besides the towers themselves. Fixed once the manager is built.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub networks: NetworkSet,
    pub operators: OperatorTable,
    pub reduction: Reduction,
}

/// Answers coverage queries against a read-only tower table.
///
/// Queries take `&self` and build their own region and index, so one manager can serve any number of them.
#[derive(Debug)]
pub struct TowerManager {
    dataset: TowerDataset,
    settings: Settings,
}

impl TowerManager {
    pub fn new(dataset: TowerDataset, settings: Settings) -> Result<Self> {
        settings.networks.check(&dataset)?;
        settings.reduction.check()?;
        info!(
            "managing {} towers from {} operators",
            dataset.len(),
            dataset.operators().len()
        );
        Ok(Self { dataset, settings })
    }

    pub fn dataset(&self) -> &TowerDataset {
        &self.dataset
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Closest tower of each operator around `location`.
    pub fn nearest_towers(&self, location: &impl Geolocation) -> Result<NearestIndex> {
        let query = location.query_point()?;
        let region = reduce(&self.dataset, query, &self.settings.reduction)?;
        let index = locate(&region, query);
        for (operator, nearest) in &index {
            debug!(
                "operator {operator}: tower {} at {:.5}",
                nearest.row, nearest.distance
            );
        }
        Ok(index)
    }

    /// Which networks the closest tower of each operator covers.
    pub fn location_coverage(&self, location: &impl Geolocation) -> Result<CoverageReport> {
        let index = self.nearest_towers(location)?;
        coverage(
            &index,
            &self.dataset,
            &self.settings.networks,
            &self.settings.operators,
        )
    }
}
