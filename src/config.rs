use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::{
    dataset::{self, DEFAULT_DELIMITER},
    manager::Settings,
    model::{OperatorCode, TowerDataset},
    network::NetworkSet,
    operator::OperatorTable,
    region::Reduction,
};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Networks to report, defaults to 2G/3G/4G
    pub networks: Option<Vec<String>>,
    #[serde(default)]
    pub search: Reduction,
    /// Operator code to display label, defaults to the French operators
    pub operators: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub delimiter: Option<char>,
    /// Columns that must be present and are loaded for every tower, defaults to 2G/3G/4G
    pub network_columns: Option<Vec<String>>,
}

fn default_http_port() -> u16 {
    8080
}

impl Config {
    pub fn settings(&self) -> Result<Settings> {
        let networks = self
            .networks
            .as_ref()
            .map(NetworkSet::new)
            .unwrap_or_default();

        let operators = match &self.operators {
            Some(table) => {
                let mut labels = BTreeMap::new();
                for (code, label) in table {
                    let code: u32 = code
                        .parse()
                        .with_context(|| format!("Invalid operator code {code:?}"))?;
                    labels.insert(OperatorCode(code), label.clone());
                }
                OperatorTable::new(labels)?
            }
            None => OperatorTable::default(),
        };

        Ok(Settings {
            networks,
            operators,
            reduction: self.search,
        })
    }

    pub fn load_dataset(&self) -> Result<TowerDataset> {
        let delimiter = match self.dataset.delimiter {
            None => DEFAULT_DELIMITER,
            Some(x) if x.is_ascii() => x as u8,
            Some(x) => bail!("Dataset delimiter {x:?} is not ASCII"),
        };
        let columns = self
            .dataset
            .network_columns
            .as_ref()
            .map(NetworkSet::new)
            .unwrap_or_default();

        dataset::load(&self.dataset.path, delimiter, &columns)
            .with_context(|| format!("Failed to load {}", self.dataset.path.display()))
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    parse(&data)
}

fn parse(data: &str) -> Result<Config> {
    let config = toml::from_str(data).context("Failed to parse config")?;
    Ok(config)
}
