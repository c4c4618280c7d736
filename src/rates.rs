//! Commission rate table.
//!
//! The `rates` module holds the dealership's commission rules as static
//! tables: a per-brand fixed bonus paid on every car whose unit price
//! clears the brand's floor, a class×brand percentage grid, and the
//! A-Class additional incentive for salesmen with a strong previous year.
//! [`RateTable::rate`] applies all three to a single sale line and returns
//! a [`SaleCommission`].  Nothing in here has state or performs I/O.

use crate::models::{Brand, CarClass, Sale, Salesman};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixed bonus paid per car when the unit price is strictly above `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBonus {
    pub floor: Decimal,
    pub per_unit: Decimal,
}

/// Fixed bonus rule per brand, in [`Brand::ALL`] order.
pub const FIXED_BONUSES: [(Brand, FixedBonus); 4] = [
    (
        Brand::Audi,
        FixedBonus {
            floor: dec!(25000),
            per_unit: dec!(800),
        },
    ),
    (
        Brand::Jaguar,
        FixedBonus {
            floor: dec!(35000),
            per_unit: dec!(750),
        },
    ),
    (
        Brand::LandRover,
        FixedBonus {
            floor: dec!(30000),
            per_unit: dec!(850),
        },
    ),
    (
        Brand::Renault,
        FixedBonus {
            floor: dec!(20000),
            per_unit: dec!(400),
        },
    ),
];

/// Percentage commission per class; each row is in [`Brand::ALL`] order
/// (Audi, Jaguar, Land Rover, Renault).
pub const CLASS_RATES: [(CarClass, [Decimal; 4]); 3] = [
    (CarClass::A, [dec!(0.08), dec!(0.06), dec!(0.07), dec!(0.05)]),
    (CarClass::B, [dec!(0.06), dec!(0.05), dec!(0.05), dec!(0.03)]),
    (CarClass::C, [dec!(0.04), dec!(0.03), dec!(0.04), dec!(0.02)]),
];

/// Previous-year sales a salesman must strictly exceed to earn the
/// additional incentive.
pub const ADDITIONAL_INCENTIVE_THRESHOLD: Decimal = dec!(500000);

/// Additional incentive rate on A-Class sale value.
pub const ADDITIONAL_INCENTIVE_RATE: Decimal = dec!(0.02);

/// The commission earned on one sale line.
///
/// `brand` and `class` are the sale's values parsed against the fixed
/// sets; `None` means the sale carried a value outside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleCommission {
    pub brand: Option<Brand>,
    pub class: Option<CarClass>,
    /// Fixed bonus for the whole line (per-unit bonus × cars).
    pub fixed: Decimal,
    /// Percentage commission for the whole line.
    pub class_commission: Decimal,
    pub additional: Decimal,
}

impl SaleCommission {
    pub fn total(&self) -> Decimal {
        self.fixed + self.class_commission + self.additional
    }
}

/// Lookup over the static commission tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateTable;

impl RateTable {
    /// Fixed bonus for one car of `brand` sold at `unit_price`.  Zero for
    /// brands outside the fixed set and for prices at or below the floor.
    pub fn fixed_bonus_per_unit(&self, brand: Option<Brand>, unit_price: Decimal) -> Decimal {
        let Some(brand) = brand else {
            return Decimal::ZERO;
        };
        FIXED_BONUSES
            .iter()
            .find(|(candidate, _)| *candidate == brand)
            .filter(|(_, rule)| unit_price > rule.floor)
            .map(|(_, rule)| rule.per_unit)
            .unwrap_or(Decimal::ZERO)
    }

    /// Percentage rate for a class×brand pair.  Zero when either side is
    /// outside its fixed set.
    pub fn class_rate(&self, brand: Option<Brand>, class: Option<CarClass>) -> Decimal {
        let (Some(brand), Some(class)) = (brand, class) else {
            return Decimal::ZERO;
        };
        let column = Brand::ALL.iter().position(|candidate| *candidate == brand);
        CLASS_RATES
            .iter()
            .find(|(candidate, _)| *candidate == class)
            .zip(column)
            .and_then(|((_, row), column)| row.get(column).copied())
            .unwrap_or(Decimal::ZERO)
    }

    /// Additional incentive for a whole line.  Only A-Class sales by a
    /// salesman whose previous-year sales exceed
    /// [`ADDITIONAL_INCENTIVE_THRESHOLD`] earn it, whatever the brand.
    pub fn additional_incentive(
        &self,
        class: Option<CarClass>,
        last_year_sales: Decimal,
        number_of_cars: u32,
        unit_price: Decimal,
    ) -> Decimal {
        if class == Some(CarClass::A) && last_year_sales > ADDITIONAL_INCENTIVE_THRESHOLD {
            Decimal::from(number_of_cars) * unit_price * ADDITIONAL_INCENTIVE_RATE
        } else {
            Decimal::ZERO
        }
    }

    /// Rates one sale line for the salesman who made it, using the sale's
    /// own unit price.
    pub fn rate(&self, sale: &Sale, salesman: &Salesman) -> SaleCommission {
        let brand = sale.known_brand();
        let class = sale.known_class();
        let cars = Decimal::from(sale.number_of_cars);
        let unit_price = sale.car_price;

        SaleCommission {
            brand,
            class,
            fixed: self.fixed_bonus_per_unit(brand, unit_price) * cars,
            class_commission: self.class_rate(brand, class) * cars * unit_price,
            additional: self.additional_incentive(
                class,
                salesman.last_year_sales,
                sale.number_of_cars,
                unit_price,
            ),
        }
    }
}
