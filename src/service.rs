//! Commission report service.
//!
//! Glues a [`CommissionDataSource`] to the engine: validates the requested
//! month, pulls the three collections and runs
//! [`generate_commission_reports`] over them.

use crate::engine::generate_commission_reports;
use crate::error::ReportError;
use crate::models::{CommissionReport, ReportPeriod};
use crate::source::CommissionDataSource;
use tracing::{error, info};

#[derive(Debug)]
pub struct ReportService<S> {
    source: S,
}

impl<S: CommissionDataSource> ReportService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The data source the reports are built from.  The HTTP layer also
    /// serves the car-model catalog out of it.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Generates the commission reports for `month`/`year`, one per
    /// salesman in data-source order.
    pub fn commission_reports(
        &self,
        month: i64,
        year: i64,
    ) -> Result<Vec<CommissionReport>, ReportError> {
        let period = ReportPeriod::new(month, year)?;
        let reports = self.load_and_generate(period).map_err(|err| {
            error!(
                month = period.month(),
                year = period.year(),
                error = %err,
                "failed to generate commission reports"
            );
            err
        })?;
        info!(
            month = period.month(),
            year = period.year(),
            reports = reports.len(),
            "commission reports ready"
        );
        Ok(reports)
    }

    fn load_and_generate(
        &self,
        period: ReportPeriod,
    ) -> Result<Vec<CommissionReport>, ReportError> {
        let salesmen = self.source.salesmen()?;
        let sales = self.source.sales_in(period)?;
        let car_models = self.source.car_models()?;
        Ok(generate_commission_reports(&salesmen, &sales, &car_models))
    }
}
