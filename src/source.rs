//! Data sources feeding the engine.
//!
//! The engine never talks to storage; a [`CommissionDataSource`] hands it
//! fully materialised collections instead.  [`InMemoryDataSource`] serves
//! them from a [`Dataset`] loaded from a JSON document, which is how the
//! binary runs without a database.

use crate::error::SourceError;
use crate::models::{CarModel, ReportPeriod, Sale, Salesman};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Supplies salesmen, sales and the car-model catalog.
///
/// Data sources must be thread-safe (`Send + Sync`) because the HTTP
/// layer shares one instance across requests.
pub trait CommissionDataSource: Send + Sync {
    /// Every salesman, in report order.
    fn salesmen(&self) -> Result<Vec<Salesman>, SourceError>;
    /// The sales made within `period`.
    fn sales_in(&self, period: ReportPeriod) -> Result<Vec<Sale>, SourceError>;
    /// The whole car-model catalog, active or not.
    fn car_models(&self) -> Result<Vec<CarModel>, SourceError>;
}

/// A complete snapshot of the dealership's report data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub salesmen: Vec<Salesman>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub car_models: Vec<CarModel>,
}

/// Serves a [`Dataset`] held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    dataset: Dataset,
}

impl InMemoryDataSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Loads a dataset from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self, SourceError> {
        let data = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset: Dataset = serde_json::from_str(&data).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            salesmen = dataset.salesmen.len(),
            sales = dataset.sales.len(),
            car_models = dataset.car_models.len(),
            "loaded dataset"
        );
        Ok(Self::new(dataset))
    }
}

impl CommissionDataSource for InMemoryDataSource {
    fn salesmen(&self) -> Result<Vec<Salesman>, SourceError> {
        Ok(self.dataset.salesmen.clone())
    }

    /// Sales without a date belong to no period.
    fn sales_in(&self, period: ReportPeriod) -> Result<Vec<Sale>, SourceError> {
        Ok(self
            .dataset
            .sales
            .iter()
            .filter(|sale| sale.sale_date.is_some_and(|date| period.contains(date)))
            .cloned()
            .collect())
    }

    fn car_models(&self) -> Result<Vec<CarModel>, SourceError> {
        Ok(self.dataset.car_models.clone())
    }
}
