//! Commission computation engine.
//!
//! The `engine` module turns the salesmen, the sales of a reporting month
//! and the car-model catalog into one [`CommissionReport`] per salesman.
//! Each report is folded from that salesman's sales alone, so the
//! per-salesman work runs in parallel with [`rayon`] while the output keeps
//! the order of the `salesmen` input.  Individual sales are rated by the
//! [`RateTable`].

use crate::models::{
    Brand, BrandCommission, CarModel, CommissionReport, Sale, Salesman, SalesmanId,
};
use crate::rates::{RateTable, SaleCommission};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// Generates the commission reports for one reporting period.
///
/// `sales` must already be restricted to the period.  A sale is rated only
/// when `car_models` holds an entry with the same brand and class; sales
/// without one, and sales of salesmen missing from `salesmen`, contribute
/// nothing.  Every report lists all brands of [`Brand::ALL`].
pub fn generate_commission_reports(
    salesmen: &[Salesman],
    sales: &[Sale],
    car_models: &[CarModel],
) -> Vec<CommissionReport> {
    let catalog = Catalog::new(car_models);
    let sales_by_salesman = group_by_salesman(sales);

    let orphaned = sales_by_salesman
        .keys()
        .filter(|id| !salesmen.iter().any(|salesman| salesman.id == **id))
        .count();
    if orphaned > 0 {
        debug!(orphaned, "ignoring sales of unknown salesmen");
    }

    let rates = RateTable;
    let reports: Vec<CommissionReport> = salesmen
        .par_iter()
        .map(|salesman| {
            let own_sales = sales_by_salesman
                .get(&salesman.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            own_sales
                .iter()
                .filter(|sale| catalog.lists(sale))
                .map(|sale| rates.rate(sale, salesman))
                .fold(ReportBuilder::new(salesman), ReportBuilder::record)
                .finish()
        })
        .collect();

    info!(
        salesmen = salesmen.len(),
        sales = sales.len(),
        catalog = car_models.len(),
        "generated commission reports"
    );
    reports
}

fn group_by_salesman(sales: &[Sale]) -> HashMap<SalesmanId, Vec<&Sale>> {
    let mut grouped: HashMap<SalesmanId, Vec<&Sale>> = HashMap::new();
    for sale in sales {
        grouped.entry(sale.salesman_id).or_default().push(sale);
    }
    grouped
}

/// Brand/class pairs present in the car-model catalog.
///
/// The catalog only gates which sales are rated; its prices are not used.
struct Catalog<'a> {
    entries: HashSet<(&'a str, &'a str)>,
}

impl<'a> Catalog<'a> {
    fn new(car_models: &'a [CarModel]) -> Self {
        Self {
            entries: car_models
                .iter()
                .map(|model| (model.brand.as_str(), model.class.as_str()))
                .collect(),
        }
    }

    fn lists(&self, sale: &Sale) -> bool {
        let listed = self
            .entries
            .contains(&(sale.brand.as_str(), sale.car_class.as_str()));
        if !listed {
            debug!(
                sale_id = sale.id,
                brand = %sale.brand,
                car_class = %sale.car_class,
                "no catalog entry for sale, skipping"
            );
        }
        listed
    }
}

/// Accumulates one salesman's rated sales into a [`CommissionReport`].
///
/// Starts with a zeroed [`BrandCommission`] for every brand so the
/// finished report lists all of them even without sales.
#[derive(Debug, Clone)]
pub struct ReportBuilder<'a> {
    salesman: &'a Salesman,
    fixed: Decimal,
    class: Decimal,
    additional: Decimal,
    total: Decimal,
    brands: BTreeMap<Brand, BrandCommission>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(salesman: &'a Salesman) -> Self {
        Self {
            salesman,
            fixed: Decimal::ZERO,
            class: Decimal::ZERO,
            additional: Decimal::ZERO,
            total: Decimal::ZERO,
            brands: Brand::ALL
                .into_iter()
                .map(|brand| (brand, BrandCommission::new(brand)))
                .collect(),
        }
    }

    /// Adds one rated sale.  The salesman totals take every sale once; the
    /// brand breakdown only takes sales of a known brand.
    pub fn record(mut self, sale: SaleCommission) -> Self {
        match sale.brand {
            Some(brand) => {
                let entry = self
                    .brands
                    .remove(&brand)
                    .unwrap_or_else(|| BrandCommission::new(brand));
                self.brands.insert(brand, entry.record(&sale));
            }
            None => debug!(
                salesman = %self.salesman.name,
                amount = %sale.total(),
                "commission on a brand outside the fixed set has no brand entry"
            ),
        }

        self.fixed += sale.fixed;
        self.class += sale.class_commission;
        self.additional += sale.additional;
        self.total += sale.total();
        self
    }

    pub fn finish(self) -> CommissionReport {
        CommissionReport {
            salesman_name: self.salesman.name.clone(),
            fixed_commission: self.fixed,
            class_commission: self.class,
            additional_commission: self.additional,
            total_commission: self.total,
            brand_commissions: self.brands,
        }
    }
}
