mod property;
pub use self::property::PropertyType;

mod sale;
pub use self::sale::{SaleRecord, SellDate};
