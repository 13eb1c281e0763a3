use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
};

use log::warn;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{error::ConfigurationError, model::OperatorCode};

/// Mobile operators of metropolitan France
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum KnownOperator {
    Orange,
    #[strum(serialize = "SFR")]
    Sfr,
    Free,
    Bouygues,
}

impl KnownOperator {
    pub fn code(self) -> OperatorCode {
        match self {
            KnownOperator::Orange => OperatorCode(20801),
            KnownOperator::Sfr => OperatorCode(20810),
            KnownOperator::Free => OperatorCode(20815),
            KnownOperator::Bouygues => OperatorCode(20820),
        }
    }
}

/// Display labels for operator codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTable(BTreeMap<OperatorCode, String>);

impl OperatorTable {
    /// Labels must be non-empty and unique, since they become keys of the coverage report. A label may not spell
    /// out another operator's code either, as unlabelled operators are reported under their code.
    pub fn new(labels: BTreeMap<OperatorCode, String>) -> Result<Self, ConfigurationError> {
        let mut seen = BTreeSet::new();
        for (code, label) in &labels {
            if label.trim().is_empty() {
                return Err(ConfigurationError::InvalidOperators(format!(
                    "operator {code} has an empty label"
                )));
            }
            if label.parse::<u32>().is_ok_and(|x| x != code.0) {
                return Err(ConfigurationError::InvalidOperators(format!(
                    "label {label:?} of operator {code} is another operator's code"
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(ConfigurationError::InvalidOperators(format!(
                    "label {label:?} is used by more than one operator"
                )));
            }
        }
        Ok(Self(labels))
    }

    /// Falls back to the numeric code for operators without a label.
    pub fn label(&self, code: OperatorCode) -> Cow<'_, str> {
        match self.0.get(&code) {
            Some(x) => Cow::Borrowed(x),
            None => {
                warn!("no label for operator {code}");
                Cow::Owned(code.to_string())
            }
        }
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self(
            KnownOperator::iter()
                .map(|x| (x.code(), x.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known() {
        let table = OperatorTable::default();
        assert_eq!(table.label(OperatorCode(20801)), "Orange");
        assert_eq!(table.label(OperatorCode(20810)), "SFR");
        assert_eq!(table.label(OperatorCode(20815)), "Free");
        assert_eq!(table.label(OperatorCode(20820)), "Bouygues");
    }

    #[test]
    fn fallback() {
        let table = OperatorTable::default();
        assert_eq!(table.label(OperatorCode(20888)), "20888");
    }

    #[test]
    fn rejects() {
        let duplicate = BTreeMap::from([
            (OperatorCode(1), "Orange".to_owned()),
            (OperatorCode(2), "Orange".to_owned()),
        ]);
        assert!(OperatorTable::new(duplicate).is_err());

        let empty = BTreeMap::from([(OperatorCode(1), " ".to_owned())]);
        assert!(OperatorTable::new(empty).is_err());

        let code_of_other = BTreeMap::from([(OperatorCode(1), "20888".to_owned())]);
        assert!(OperatorTable::new(code_of_other).is_err());

        let own_code = BTreeMap::from([(OperatorCode(20888), "20888".to_owned())]);
        assert!(OperatorTable::new(own_code).is_ok());

        let ok = BTreeMap::from([(OperatorCode(1), "A".to_owned())]);
        assert_eq!(OperatorTable::new(ok).unwrap().label(OperatorCode(1)), "A");
    }
}
