//! Sale records produced from listing fragments.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use super::PropertyType;

/// Month and year of a sale, as printed by the site ("Jan 2021").
///
/// Orders chronologically and displays as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SellDate {
    year: i32,
    month: u32,
}

impl SellDate {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the sale month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl FromStr for SellDate {
    type Err = chrono::ParseError;

    /// Parses the site's `"Mon YYYY"` form. Month abbreviations are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("1 {}", s.trim()), "%d %b %Y")?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

impl std::fmt::Display for SellDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for SellDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One sale event for one property.
///
/// A listing yields its current sale and, when the site also reports one,
/// the sale before it. Both share every field except the three sale fields.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub address: String,
    pub suburb: String,
    /// Upper-case state code.
    pub state: String,
    pub property_type: Option<PropertyType>,
    /// Sale price in whole dollars.
    pub sell_price: Option<u64>,
    pub sell_date: Option<SellDate>,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub car_ports: Option<u8>,
    /// Land size in square metres.
    pub land_size: Option<u32>,
    /// Building size in square metres.
    pub building_size: Option<u32>,
    pub is_previous_sale: bool,
}

impl SaleRecord {
    /// A record with only the location filled in.
    pub fn new(address: &str, suburb: &str, state: &str) -> Self {
        Self {
            address: address.to_string(),
            suburb: suburb.to_string(),
            state: state.to_string(),
            property_type: None,
            sell_price: None,
            sell_date: None,
            bedrooms: None,
            bathrooms: None,
            car_ports: None,
            land_size: None,
            building_size: None,
            is_previous_sale: false,
        }
    }

    /// Copy of this record describing an earlier sale of the same property.
    pub fn previous_sale(&self, sell_price: u64, sell_date: SellDate) -> Self {
        Self {
            sell_price: Some(sell_price),
            sell_date: Some(sell_date),
            is_previous_sale: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_date_parses_site_format() {
        let date: SellDate = "Jan 2021".parse().unwrap();
        assert_eq!(date.year(), 2021);
        assert_eq!(date.month(), 1);
        assert_eq!(date.to_string(), "2021-01");
    }

    #[test]
    fn sell_date_month_is_case_insensitive() {
        assert_eq!("dec 1999".parse::<SellDate>().unwrap(), SellDate::new(1999, 12).unwrap());
        assert_eq!("SEP 2010".parse::<SellDate>().unwrap(), SellDate::new(2010, 9).unwrap());
    }

    #[test]
    fn sell_date_rejects_unknown_month() {
        assert!("Foo 2020".parse::<SellDate>().is_err());
        assert!("2020".parse::<SellDate>().is_err());
        assert!(SellDate::new(2020, 13).is_none());
    }

    #[test]
    fn sell_date_orders_chronologically() {
        let a = SellDate::new(2019, 12).unwrap();
        let b = SellDate::new(2020, 1).unwrap();
        let c = SellDate::new(2020, 11).unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn sell_date_serializes_as_string() {
        let date = SellDate::new(2021, 3).unwrap();
        assert_eq!(serde_json::to_value(date).unwrap(), "2021-03");
        assert_eq!(date.first_day(), NaiveDate::from_ymd_opt(2021, 3, 1));
    }

    #[test]
    fn previous_sale_keeps_property_fields() {
        let mut current = SaleRecord::new("1 Test St", "Testville", "XX");
        current.property_type = Some(PropertyType::House);
        current.bedrooms = Some(3);
        current.sell_price = Some(500_000);
        current.sell_date = SellDate::new(2022, 5);

        let previous = current.previous_sale(300_000, SellDate::new(2015, 2).unwrap());
        assert!(previous.is_previous_sale);
        assert_eq!(previous.sell_price, Some(300_000));
        assert_eq!(previous.sell_date, SellDate::new(2015, 2));
        assert_eq!(previous.address, current.address);
        assert_eq!(previous.property_type, Some(PropertyType::House));
        assert_eq!(previous.bedrooms, Some(3));
        assert!(!current.is_previous_sale);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = SaleRecord::new("1 Test St", "Testville", "XX");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["address"], "1 Test St");
        assert_eq!(json["isPreviousSale"], false);
        assert!(json["sellPrice"].is_null());
    }
}
