//! Narrowing the tower table down to a window around the query point.
//!
//! The window starts at `initial_radius` degrees and grows one degree at a time until it holds at least one tower
//! for every operator the table is expected to cover. Each attempt filters the full table again; nothing is
//! written back to the dataset, so repeated queries never see each other's windows.

use std::collections::BTreeSet;

use log::{debug, trace};
use serde::Deserialize;

use crate::{
    bounds::Bounds,
    error::{ConfigurationError, Error, Result},
    location::QueryPoint,
    model::{OperatorCode, RowId, TowerDataset, TowerRecord},
};

pub const DEFAULT_INITIAL_RADIUS: f64 = 1.0;

/// Valid coordinates are never more than 360 degrees apart, so a window this wide holds every tower.
pub const DEFAULT_MAX_RADIUS: f64 = 361.0;

/// Growth step between two attempts, in degrees
const STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Reduction {
    pub initial_radius: f64,
    pub max_radius: f64,
    /// Distinct operators a window must hold. Defaults to every operator in the table.
    pub required_operators: Option<usize>,
}

impl Default for Reduction {
    fn default() -> Self {
        Self {
            initial_radius: DEFAULT_INITIAL_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            required_operators: None,
        }
    }
}

impl Reduction {
    pub fn check(&self) -> Result<(), ConfigurationError> {
        if !self.initial_radius.is_finite() || self.initial_radius <= 0.0 {
            return Err(ConfigurationError::InvalidRadius(format!(
                "initial radius must be positive, got {}",
                self.initial_radius
            )));
        }
        if !self.max_radius.is_finite() || self.max_radius < self.initial_radius {
            return Err(ConfigurationError::InvalidRadius(format!(
                "max radius {} is below initial radius {}",
                self.max_radius, self.initial_radius
            )));
        }
        Ok(())
    }

    fn required(&self, dataset: &TowerDataset) -> usize {
        self.required_operators
            .unwrap_or_else(|| dataset.operators().len())
    }
}

/// Rows of a dataset that fall inside a window, in dataset order.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    dataset: &'a TowerDataset,
    rows: Vec<RowId>,
    bounds: Bounds,
}

impl<'a> Region<'a> {
    pub fn filter(dataset: &'a TowerDataset, bounds: Bounds) -> Self {
        let rows = dataset
            .rows()
            .filter(|(_, x)| bounds.contains(x.point()))
            .map(|(row, _)| row)
            .collect();
        Self {
            dataset,
            rows,
            bounds,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowId, &'a TowerRecord)> + '_ {
        let dataset = self.dataset;
        self.rows
            .iter()
            .filter_map(move |&row| dataset.get(row).map(|x| (row, x)))
    }

    pub fn operators(&self) -> BTreeSet<OperatorCode> {
        self.rows().map(|(_, x)| x.operator).collect()
    }

    pub fn radius(&self) -> f64 {
        self.bounds.radius()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Smallest window around `query` holding the required number of distinct operators.
pub fn reduce<'a>(
    dataset: &'a TowerDataset,
    query: QueryPoint,
    settings: &Reduction,
) -> Result<Region<'a>> {
    let required = settings.required(dataset);
    let mut bounds = Bounds::new(query.point(), settings.initial_radius);
    let mut found = 0;

    while bounds.radius() <= settings.max_radius {
        let region = Region::filter(dataset, bounds);
        found = region.operators().len();
        trace!(
            "radius {}: {} towers, {found}/{required} operators",
            bounds.radius(),
            region.len()
        );
        if found >= required {
            debug!(
                "reduced {} towers to {} at radius {}",
                dataset.len(),
                region.len(),
                region.radius()
            );
            return Ok(region);
        }
        bounds = bounds.expand(STEP);
    }

    Err(Error::UnboundedExpansion {
        required,
        found,
        max_radius: settings.max_radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixture;

    fn query(latitude: f64, longitude: f64) -> QueryPoint {
        QueryPoint::new(latitude, longitude).unwrap()
    }

    fn row_ids(region: &Region) -> Vec<RowId> {
        region.rows().map(|(row, _)| row).collect()
    }

    fn dataset() -> TowerDataset {
        fixture(&[
            (20801, 48.5, 2.5, [true, true, true]),
            (20810, 48.2, 2.1, [true, true, false]),
            (20815, 46.0, 2.0, [false, true, true]),
            (20820, 43.0, 5.0, [true, false, false]),
            (20801, 43.1, 5.1, [true, true, true]),
        ])
    }

    #[test]
    fn all_operators() {
        let dataset = dataset();
        let region = reduce(&dataset, query(48.0, 2.0), &Reduction::default()).unwrap();
        assert_eq!(&region.operators(), dataset.operators());
        // 20820 is 5 degrees south, 3 east
        assert_eq!(region.radius(), 6.0);
        assert_eq!(region.len(), 5);
    }

    #[test]
    fn smallest_window() {
        let dataset = fixture(&[
            (1, 0.5, 0.5, [true; 3]),
            (2, -0.5, 0.5, [true; 3]),
            (3, 1.5, 0.0, [true; 3]),
            (4, 0.0, -2.5, [true; 3]),
            (1, 10.0, 10.0, [true; 3]),
        ]);
        let region = reduce(&dataset, query(0.0, 0.0), &Reduction::default()).unwrap();
        assert_eq!(region.radius(), 3.0);
        assert_eq!(row_ids(&region), vec![RowId(0), RowId(1), RowId(2), RowId(3)]);
    }

    #[test]
    fn initial_radius() {
        let dataset = dataset();
        let settings = Reduction {
            initial_radius: 10.0,
            ..Default::default()
        };
        let region = reduce(&dataset, query(48.0, 2.0), &settings).unwrap();
        assert_eq!(region.radius(), 10.0);
    }

    #[test]
    fn boundary_excluded() {
        // operator 2 sits exactly on the northern edge of the first window
        let dataset = fixture(&[(1, 48.0, 2.0, [true; 3]), (2, 49.0, 2.0, [true; 3])]);
        let region = Region::filter(&dataset, Bounds::new(query(48.0, 2.0).point(), 1.0));
        assert_eq!(row_ids(&region), vec![RowId(0)]);

        let region = reduce(&dataset, query(48.0, 2.0), &Reduction::default()).unwrap();
        assert_eq!(region.radius(), 2.0);
        assert_eq!(region.len(), 2);
    }

    #[test]
    fn monotonic() {
        let dataset = dataset();
        let q = query(47.0, 3.0);
        let mut previous: BTreeSet<RowId> = BTreeSet::new();
        for radius in 1..=8 {
            let region = Region::filter(&dataset, Bounds::new(q.point(), radius as f64));
            let rows: BTreeSet<_> = row_ids(&region).into_iter().collect();
            assert!(previous.is_subset(&rows), "radius {radius} lost a tower");
            previous = rows;
        }
        assert_eq!(previous.len(), dataset.len());
    }

    #[test]
    fn unbounded() {
        let dataset = dataset();
        let settings = Reduction {
            required_operators: Some(5),
            max_radius: 20.0,
            ..Default::default()
        };
        match reduce(&dataset, query(48.0, 2.0), &settings) {
            Err(Error::UnboundedExpansion {
                required,
                found,
                max_radius,
            }) => {
                assert_eq!(required, 5);
                assert_eq!(found, 4);
                assert_eq!(max_radius, 20.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn default_cap_covers_globe() {
        let dataset = fixture(&[(1, -89.9, -179.9, [true; 3]), (2, 89.9, 179.9, [true; 3])]);
        let region = reduce(&dataset, query(89.9, 179.9), &Reduction::default()).unwrap();
        assert_eq!(region.len(), 2);
    }

    #[test]
    fn empty() {
        let dataset = fixture(&[]);
        let region = reduce(&dataset, query(0.0, 0.0), &Reduction::default()).unwrap();
        assert_eq!(region.len(), 0);
    }

    #[test]
    fn dataset_untouched() {
        let dataset = dataset();
        let near = reduce(&dataset, query(48.0, 2.0), &Reduction::default()).unwrap();
        let far = reduce(&dataset, query(43.0, 5.0), &Reduction::default()).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(near.operators(), far.operators());
    }

    #[test]
    fn check() {
        assert!(Reduction::default().check().is_ok());
        let bad = Reduction {
            initial_radius: 0.0,
            ..Default::default()
        };
        assert!(bad.check().is_err());
        let bad = Reduction {
            initial_radius: 5.0,
            max_radius: 2.0,
            ..Default::default()
        };
        assert!(bad.check().is_err());
    }
}
