//! The sorted sales dataset.

use std::cmp::Reverse;

use serde::Serialize;
use soldhistory_api::types::SaleRecord;

/// Sale records ordered by sell date, newest first.
///
/// Records without a sell date sort after every dated record. Records with
/// equal dates keep the order they were given in.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SalesTable {
    records: Vec<SaleRecord>,
}

impl SalesTable {
    pub fn new(mut records: Vec<SaleRecord>) -> Self {
        // Reverse(None) is greater than any Reverse(Some(_)), so undated rows go last.
        records.sort_by_key(|r| Reverse(r.sell_date));
        Self { records }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SaleRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SaleRecord;
    type IntoIter = std::slice::Iter<'a, SaleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
