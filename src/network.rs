use std::collections::BTreeSet;

use crate::{error::ConfigurationError, model::TowerDataset};

/// Networks reported when none are configured
pub const DEFAULT_NETWORKS: [&str; 3] = ["2G", "3G", "4G"];

/// Network column names, kept sorted and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSet(BTreeSet<String>);

impl NetworkSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, network: &str) -> bool {
        self.0.contains(network)
    }

    /// Fails with every requested network that the dataset has no column for.
    pub fn check(&self, dataset: &TowerDataset) -> Result<(), ConfigurationError> {
        let missing: Vec<_> = self
            .iter()
            .filter(|x| !dataset.networks().contains(x))
            .map(str::to_owned)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownNetworks(missing))
        }
    }
}

impl Default for NetworkSet {
    fn default() -> Self {
        Self::new(DEFAULT_NETWORKS)
    }
}

impl<S: Into<String>> FromIterator<S> for NetworkSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
