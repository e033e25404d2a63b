//! HTML extraction for sold-history result pages.
//!
//! A results page holds one `<table>` per property. Each property table nests
//! a data table with two rows: the address, then a details table whose cells
//! carry free text such as "Sold $450,000 in Jan 2020", "House: 3 2 1" and
//! "Land size: 612 sqm".

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use soldhistory_api::types::{PropertyType, SaleRecord, SellDate};

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("listing is not in the expected format: {0}")]
    Format(String),
}

// Anchored: the first details cell carries the current sale, and the anchor
// keeps "Last Sold ..." from matching here.
static RE_SOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Sold \$([0-9,]+) in ([a-zA-Z]{3} [0-9]{4})").expect("invalid regex: sold")
});

static RE_LAST_SOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Last Sold \$([0-9,]+) in ([a-zA-Z]{3} [0-9]{4})")
        .expect("invalid regex: last sold")
});

static RE_LAND_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Land size: ([0-9,]+) sqm").expect("invalid regex: land size")
});

static RE_BUILDING_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Building size: ([0-9,]+) sqm").expect("invalid regex: building size")
});

// html5ever inserts the implicit tbody, so accept both shapes.
static SEL_RESULTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "#mainT > tr > td:nth-of-type(2) > div, #mainT > tbody > tr > td:nth-of-type(2) > div",
    )
    .expect("invalid selector: results")
});

static SEL_DATA_TABLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr > td:nth-of-type(2) > table").expect("invalid selector: data table")
});

static SEL_ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.addr").expect("invalid selector: address"));

static SEL_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("invalid selector: table"));

static SEL_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("invalid selector: cell"));

/// A parsed listing: its current sale plus the sale before it, if reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyListing {
    pub current: SaleRecord,
    pub last_sale: Option<(u64, SellDate)>,
}

impl PropertyListing {
    pub fn address(&self) -> &str {
        &self.current.address
    }

    /// Flattens the listing into its sale records: the current sale first,
    /// then the previous sale when one was found.
    pub fn into_sales(self) -> Vec<SaleRecord> {
        let previous = self
            .last_sale
            .map(|(price, date)| self.current.previous_sale(price, date));
        let mut sales = vec![self.current];
        sales.extend(previous);
        sales
    }
}

/// Records pulled from one results page.
#[derive(Debug, Default)]
pub struct PageSales {
    pub records: Vec<SaleRecord>,
    /// Listings parsed successfully.
    pub listings: usize,
    /// Listings dropped because they were not in the expected format.
    pub skipped: usize,
}

/// Turns listing fragments into sale records.
///
/// Owns the property-type keywords it recognises; the default recognises
/// every [`PropertyType`].
#[derive(Debug, Clone)]
pub struct ListingParser {
    property_types: Vec<PropertyType>,
}

impl Default for ListingParser {
    fn default() -> Self {
        Self {
            property_types: PropertyType::ALL.to_vec(),
        }
    }
}

impl ListingParser {
    /// A parser that only recognises the given property types.
    pub fn with_property_types(property_types: &[PropertyType]) -> Self {
        Self {
            property_types: property_types.to_vec(),
        }
    }

    /// Parses every listing on a results page.
    ///
    /// A page without a results container yields nothing. Listings that are
    /// not in the expected format are logged and counted, not returned.
    pub fn parse_page(&self, html: &str, suburb: &str, state: &str) -> PageSales {
        let document = Html::parse_document(html);
        let mut page = PageSales::default();
        for fragment in listing_fragments(&document) {
            match self.parse_listing(fragment, suburb, state) {
                Ok(listing) => {
                    page.listings += 1;
                    page.records.extend(listing.into_sales());
                }
                Err(e) => {
                    tracing::warn!(suburb, state, "Skipping listing: {}", e);
                    page.skipped += 1;
                }
            }
        }
        page
    }

    /// Parses a single listing fragment.
    ///
    /// Only a missing data table (or one without its address and details
    /// rows) is an error. Every other field is optional and left unset when
    /// its text is absent.
    pub fn parse_listing(
        &self,
        fragment: ElementRef<'_>,
        suburb: &str,
        state: &str,
    ) -> Result<PropertyListing, ScrapeError> {
        let data = fragment
            .select(&SEL_DATA_TABLE)
            .next()
            .ok_or_else(|| ScrapeError::Format("missing listing data table".into()))?;

        let rows = direct_rows(data);
        let [address_row, details_row] = rows.as_slice() else {
            return Err(ScrapeError::Format(format!(
                "expected address and details rows, found {} rows",
                rows.len()
            )));
        };

        let address = address_row
            .select(&SEL_ADDRESS)
            .next()
            .map(element_text)
            .unwrap_or_default();
        if address.is_empty() {
            tracing::debug!(suburb, "Listing has no address");
        }

        let cells: Vec<String> = details_row
            .select(&SEL_TABLE)
            .next()
            .map(|table| table.select(&SEL_CELL).map(element_text).collect())
            .unwrap_or_default();
        let details = cells.join("\n");

        let mut current = SaleRecord::new(&address, suburb, state);

        if let Some(caps) = RE_SOLD.captures(&details) {
            current.sell_price = parse_int(&caps[1]);
            current.sell_date = parse_sell_date(&caps[2]);
        }

        let last_sale = RE_LAST_SOLD.captures(&details).and_then(|caps| {
            let price = parse_int(&caps[1])?;
            let date = parse_sell_date(&caps[2])?;
            Some((price, date))
        });

        self.apply_property_stats(&cells, &mut current);

        current.land_size = RE_LAND_SIZE
            .captures(&details)
            .and_then(|caps| parse_int(&caps[1]));
        current.building_size = RE_BUILDING_SIZE
            .captures(&details)
            .and_then(|caps| parse_int(&caps[1]));

        Ok(PropertyListing { current, last_sale })
    }

    /// Fills type and bedroom/bathroom/car-port counts from the first cell
    /// that starts with a property-type keyword, e.g. "House: 3 2 1".
    fn apply_property_stats(&self, cells: &[String], record: &mut SaleRecord) {
        let Some(cell) = cells.iter().find(|cell| {
            self.property_types
                .iter()
                .any(|t| cell.starts_with(t.keyword()))
        }) else {
            return;
        };

        // "Land size: ..." also starts with the "Land" keyword. The type is
        // unknown in that case.
        if cell.to_lowercase().contains("land size") {
            return;
        }

        let (kind, counts) = cell.split_once(':').unwrap_or((cell.as_str(), ""));
        record.property_type = kind
            .split_whitespace()
            .next()
            .and_then(|word| word.parse().ok());

        let mut counts = counts.split_whitespace().map(parse_int::<u8>);
        record.bedrooms = counts.next().flatten();
        record.bathrooms = counts.next().flatten();
        record.car_ports = counts.next().flatten();
    }
}

/// The property tables on a results page, in page order.
///
/// Skips the search filter table that shares the results container.
pub fn listing_fragments(document: &Html) -> Vec<ElementRef<'_>> {
    let Some(results) = document.select(&SEL_RESULTS).next() else {
        tracing::debug!("No results container on page");
        return Vec::new();
    };
    results
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "table" && el.value().attr("id") != Some("filter"))
        .collect()
}

/// Rows that belong to `table` itself, looking through any row-group element.
fn direct_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses an integer that may carry thousands separators ("450,000").
pub fn parse_int<T: FromStr>(raw: &str) -> Option<T> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn parse_sell_date(raw: &str) -> Option<SellDate> {
    match raw.parse() {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!("Unparseable sale date {:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_html(details: &[&str]) -> String {
        let cells: String = details
            .iter()
            .map(|d| format!("<tr><td>{}</td></tr>", d))
            .collect();
        format!(
            r#"<table>
                <tr>
                  <td><img src="thumb.jpg"></td>
                  <td>
                    <table>
                      <tr><td><span class="addr"><a href="/x">12 Sample St, Testville</a></span></td></tr>
                      <tr><td><table>{}</table></td></tr>
                    </table>
                  </td>
                </tr>
              </table>"#,
            cells
        )
    }

    fn parse(html: &str) -> Result<PropertyListing, ScrapeError> {
        let fragment = Html::parse_fragment(html);
        let table = fragment.select(&SEL_TABLE).next().unwrap();
        ListingParser::default().parse_listing(table, "Testville", "XX")
    }

    #[test]
    fn parse_int_strips_thousands_separators() {
        assert_eq!(parse_int::<u64>("450,000"), Some(450_000));
        assert_eq!(parse_int::<u64>("1,250,000"), Some(1_250_000));
        assert_eq!(parse_int::<u32>("612"), Some(612));
        assert_eq!(parse_int::<u64>(","), None);
        assert_eq!(parse_int::<u8>("x"), None);
    }

    #[test]
    fn parses_current_sale_only() {
        let html = listing_html(&["Sold $300,000 in Jan 2021", "House: 3 2 1"]);
        let listing = parse(&html).unwrap();
        assert_eq!(listing.address(), "12 Sample St, Testville");
        assert_eq!(listing.current.sell_price, Some(300_000));
        assert_eq!(listing.current.sell_date, SellDate::new(2021, 1));
        assert_eq!(listing.current.suburb, "Testville");
        assert_eq!(listing.current.state, "XX");
        assert!(listing.last_sale.is_none());

        let sales = listing.into_sales();
        assert_eq!(sales.len(), 1);
        assert!(!sales[0].is_previous_sale);
    }

    #[test]
    fn sold_and_last_sold_yield_two_records() {
        let html = listing_html(&[
            "Sold $450,000 in Jan 2020",
            "Last Sold $320,500 in Mar 2012",
            "Townhouse: 2 1 1",
        ]);
        let sales = parse(&html).unwrap().into_sales();
        assert_eq!(sales.len(), 2);

        assert!(!sales[0].is_previous_sale);
        assert_eq!(sales[0].sell_price, Some(450_000));
        assert_eq!(sales[0].sell_date, SellDate::new(2020, 1));

        assert!(sales[1].is_previous_sale);
        assert_eq!(sales[1].sell_price, Some(320_500));
        assert_eq!(sales[1].sell_date, SellDate::new(2012, 3));

        assert_eq!(sales[0].address, sales[1].address);
        assert_eq!(sales[1].property_type, Some(PropertyType::Townhouse));
        assert_eq!(sales[1].bedrooms, Some(2));
    }

    #[test]
    fn last_sold_is_not_mistaken_for_current_sale() {
        let html = listing_html(&["Last Sold $200,000 in Feb 2010", "Unit: 1 1 0"]);
        let listing = parse(&html).unwrap();
        assert_eq!(listing.current.sell_price, None);
        assert_eq!(listing.current.sell_date, None);
        assert_eq!(
            listing.last_sale,
            Some((200_000, SellDate::new(2010, 2).unwrap()))
        );
        assert_eq!(listing.into_sales().len(), 2);
    }

    #[test]
    fn last_sold_with_bad_month_is_dropped() {
        let html = listing_html(&["Sold $500,000 in Jun 2022", "Last Sold $1 in Xyz 2001"]);
        let listing = parse(&html).unwrap();
        assert!(listing.last_sale.is_none());
        assert_eq!(listing.into_sales().len(), 1);
    }

    #[test]
    fn parses_type_and_room_counts() {
        let html = listing_html(&["Sold $610,000 in Nov 2019", "Apartment: 2 1 1"]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.property_type, Some(PropertyType::Apartment));
        assert_eq!(current.bedrooms, Some(2));
        assert_eq!(current.bathrooms, Some(1));
        assert_eq!(current.car_ports, Some(1));
    }

    #[test]
    fn partial_room_counts() {
        let html = listing_html(&["Villa: 2"]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.property_type, Some(PropertyType::Villa));
        assert_eq!(current.bedrooms, Some(2));
        assert_eq!(current.bathrooms, None);
        assert_eq!(current.car_ports, None);
    }

    #[test]
    fn type_cell_without_colon() {
        let html = listing_html(&["Duplex"]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.property_type, Some(PropertyType::Duplex));
        assert_eq!(current.bedrooms, None);
    }

    #[test]
    fn land_size_line_is_not_a_land_type() {
        let html = listing_html(&["Sold $250,000 in May 2018", "Land size: 612 sqm"]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.property_type, None);
        assert_eq!(current.bedrooms, None);
        assert_eq!(current.bathrooms, None);
        assert_eq!(current.car_ports, None);
        assert_eq!(current.land_size, Some(612));
    }

    #[test]
    fn land_type_is_recognised() {
        let html = listing_html(&["Land: ", "Land size: 1,012 sqm"]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.property_type, Some(PropertyType::Land));
        assert_eq!(current.land_size, Some(1_012));
    }

    #[test]
    fn parses_land_and_building_size() {
        let html = listing_html(&[
            "Sold $780,000 in Aug 2021",
            "House: 4 2 2",
            "Land size: 700 sqm | Building size: 245 sqm",
        ]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.land_size, Some(700));
        assert_eq!(current.building_size, Some(245));
    }

    #[test]
    fn missing_fields_are_absent_not_errors() {
        let html = listing_html(&["Agent: Someone Realty"]);
        let current = parse(&html).unwrap().current;
        assert_eq!(current.address, "12 Sample St, Testville");
        assert_eq!(current.property_type, None);
        assert_eq!(current.sell_price, None);
        assert_eq!(current.land_size, None);
        assert_eq!(current.building_size, None);
    }

    #[test]
    fn missing_data_table_is_format_error() {
        let html = "<table><tr><td>Advertisement</td></tr></table>";
        assert!(matches!(parse(html), Err(ScrapeError::Format(_))));
    }

    #[test]
    fn data_table_without_details_row_is_format_error() {
        let html = r#"<table><tr><td></td><td>
            <table><tr><td><span class="addr">1 Lone St</span></td></tr></table>
        </td></tr></table>"#;
        assert!(matches!(parse(html), Err(ScrapeError::Format(_))));
    }

    #[test]
    fn restricted_parser_ignores_other_types() {
        let html = listing_html(&["House: 3 2 1"]);
        let fragment = Html::parse_fragment(&html);
        let table = fragment.select(&SEL_TABLE).next().unwrap();
        let parser = ListingParser::with_property_types(&[PropertyType::Unit]);
        let current = parser.parse_listing(table, "Testville", "XX").unwrap().current;
        assert_eq!(current.property_type, None);
        assert_eq!(current.bedrooms, None);
    }

    #[test]
    fn page_without_results_container_is_empty() {
        let page = ListingParser::default().parse_page(
            "<html><body><p>No results</p></body></html>",
            "Testville",
            "XX",
        );
        assert!(page.records.is_empty());
        assert_eq!(page.listings, 0);
        assert_eq!(page.skipped, 0);
    }
}
