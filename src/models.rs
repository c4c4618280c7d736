//! Data models for the Commission Engine.
//!
//! The `models` module defines the records handed to the engine by the
//! surrounding back office (salesmen, sales and the car-model catalog)
//! and the records it hands back (one [`CommissionReport`] per salesman,
//! broken down into a [`BrandCommission`] per brand).  Inputs derive
//! `Serialize` and `Deserialize` so they can be loaded from JSON; the
//! output records only serialise, since their totals are derived and must
//! never be supplied from outside.

use crate::error::ReportError;
use crate::rates::SaleCommission;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a salesman as assigned by the upstream store.
pub type SalesmanId = i64;

/// A salesman whose sales are being rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salesman {
    pub id: SalesmanId,
    /// Display name, copied verbatim into the report.
    pub name: String,
    /// Total sales of the previous year.  Only used to gate the A-Class
    /// additional incentive.
    pub last_year_sales: Decimal,
}

/// A single sale line: `number_of_cars` units of one brand and class sold
/// by one salesman at one unit price.
///
/// `brand` and `car_class` are kept as the strings the store hands over so
/// that values outside the fixed sets stay representable; the rate table
/// parses them into [`Brand`] and [`CarClass`] and zero-rates the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub salesman_id: SalesmanId,
    pub brand: String,
    pub car_class: String,
    pub number_of_cars: u32,
    /// Unit price at the time of sale.  All commission arithmetic uses
    /// this price, never the current catalog price.
    pub car_price: Decimal,
    /// Date of the sale.  Only the data source looks at it, to select the
    /// sales of a reporting month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<NaiveDate>,
}

impl Sale {
    /// The sale's brand, if it is one of the fixed brands.
    pub fn known_brand(&self) -> Option<Brand> {
        self.brand.parse().ok()
    }

    /// The sale's class, if it is one of the fixed classes.
    pub fn known_class(&self) -> Option<CarClass> {
        self.car_class.parse().ok()
    }
}

/// An entry of the car-model catalog.
///
/// The engine only uses `brand` and `class`: a sale is rated only when the
/// catalog holds at least one model with the same brand and class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModel {
    pub id: i64,
    pub brand: String,
    pub class: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub model_code: String,
    /// Current catalog price.
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_manufacturing: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Manual position used when listing the catalog by sort order.
    #[serde(default)]
    pub sort_order: i32,
}

fn default_active() -> bool {
    true
}

/// Error returned when a brand or class string is outside its fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// The fixed set of brands sold by the dealership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Brand {
    Audi,
    Jaguar,
    #[serde(rename = "Land Rover")]
    LandRover,
    Renault,
}

impl Brand {
    /// Every brand, in report order.
    pub const ALL: [Brand; 4] = [Brand::Audi, Brand::Jaguar, Brand::LandRover, Brand::Renault];

    pub const fn as_str(self) -> &'static str {
        match self {
            Brand::Audi => "Audi",
            Brand::Jaguar => "Jaguar",
            Brand::LandRover => "Land Rover",
            Brand::Renault => "Renault",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Brand {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Brand::ALL
            .into_iter()
            .find(|brand| brand.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "brand",
                value: value.to_string(),
            })
    }
}

/// The fixed set of car classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CarClass {
    #[serde(rename = "A-Class")]
    A,
    #[serde(rename = "B-Class")]
    B,
    #[serde(rename = "C-Class")]
    C,
}

impl CarClass {
    pub const ALL: [CarClass; 3] = [CarClass::A, CarClass::B, CarClass::C];

    pub const fn as_str(self) -> &'static str {
        match self {
            CarClass::A => "A-Class",
            CarClass::B => "B-Class",
            CarClass::C => "C-Class",
        }
    }
}

impl fmt::Display for CarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarClass {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CarClass::ALL
            .into_iter()
            .find(|class| class.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "car class",
                value: value.to_string(),
            })
    }
}

/// The calendar month a commission report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    month: u32,
    year: i32,
}

impl ReportPeriod {
    pub const YEARS: std::ops::RangeInclusive<i32> = 2000..=2050;

    /// Validates and builds a period.  Months run 1..=12 and years are
    /// restricted to [`ReportPeriod::YEARS`].
    pub fn new(month: i64, year: i64) -> Result<Self, ReportError> {
        let month = u32::try_from(month)
            .ok()
            .filter(|month| (1..=12).contains(month))
            .ok_or(ReportError::InvalidMonth(month))?;
        let year = i32::try_from(year)
            .ok()
            .filter(|year| Self::YEARS.contains(year))
            .ok_or(ReportError::InvalidYear(year))?;
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month() && date.year() == self.year()
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month(), self.year())
    }
}

/// Commission earned on one brand within a salesman's report.
///
/// Fields can only change through [`BrandCommission::record`], which
/// recomputes `total_commission` from the five components every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCommission {
    brand: Brand,
    fixed_commission: Decimal,
    class_a_commission: Decimal,
    class_b_commission: Decimal,
    class_c_commission: Decimal,
    additional_commission: Decimal,
    total_commission: Decimal,
}

impl BrandCommission {
    /// A zeroed entry for `brand`.
    pub fn new(brand: Brand) -> Self {
        Self {
            brand,
            fixed_commission: Decimal::ZERO,
            class_a_commission: Decimal::ZERO,
            class_b_commission: Decimal::ZERO,
            class_c_commission: Decimal::ZERO,
            additional_commission: Decimal::ZERO,
            total_commission: Decimal::ZERO,
        }
    }

    /// Folds one rated sale into this entry.  The percentage commission
    /// lands in the bucket of the sale's class; a sale without a known
    /// class only contributes its fixed and additional parts.
    pub fn record(self, sale: &SaleCommission) -> Self {
        let mut next = Self {
            fixed_commission: self.fixed_commission + sale.fixed,
            additional_commission: self.additional_commission + sale.additional,
            ..self
        };
        match sale.class {
            Some(CarClass::A) => next.class_a_commission += sale.class_commission,
            Some(CarClass::B) => next.class_b_commission += sale.class_commission,
            Some(CarClass::C) => next.class_c_commission += sale.class_commission,
            None => {}
        }
        next.total_commission = next.fixed_commission
            + next.class_a_commission
            + next.class_b_commission
            + next.class_c_commission
            + next.additional_commission;
        next
    }

    pub fn brand(&self) -> Brand {
        self.brand
    }

    pub fn fixed_commission(&self) -> Decimal {
        self.fixed_commission
    }

    pub fn class_a_commission(&self) -> Decimal {
        self.class_a_commission
    }

    pub fn class_b_commission(&self) -> Decimal {
        self.class_b_commission
    }

    pub fn class_c_commission(&self) -> Decimal {
        self.class_c_commission
    }

    pub fn additional_commission(&self) -> Decimal {
        self.additional_commission
    }

    pub fn total_commission(&self) -> Decimal {
        self.total_commission
    }
}

/// The commission a salesman earned in a reporting period.
///
/// Built by [`crate::engine::ReportBuilder`]; `brand_commissions` always
/// holds exactly one entry per [`Brand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionReport {
    pub(crate) salesman_name: String,
    pub(crate) fixed_commission: Decimal,
    pub(crate) class_commission: Decimal,
    pub(crate) additional_commission: Decimal,
    pub(crate) total_commission: Decimal,
    pub(crate) brand_commissions: BTreeMap<Brand, BrandCommission>,
}

impl CommissionReport {
    pub fn salesman_name(&self) -> &str {
        &self.salesman_name
    }

    pub fn fixed_commission(&self) -> Decimal {
        self.fixed_commission
    }

    pub fn class_commission(&self) -> Decimal {
        self.class_commission
    }

    pub fn additional_commission(&self) -> Decimal {
        self.additional_commission
    }

    pub fn total_commission(&self) -> Decimal {
        self.total_commission
    }

    pub fn brand_commissions(&self) -> &BTreeMap<Brand, BrandCommission> {
        &self.brand_commissions
    }

    pub fn brand(&self, brand: Brand) -> Option<&BrandCommission> {
        self.brand_commissions.get(&brand)
    }
}
