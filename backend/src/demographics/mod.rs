//! Static per-ZIP-code demographic reference data.
//!
//! The table is loaded once at startup (see [`loader`]) and never mutated, so
//! it is shared across request handlers behind a plain `Arc` without locking.

pub mod loader;

use std::collections::HashMap;

use crate::error::{ServiceError, ServiceResult};
use crate::models::ZipCode;

pub use loader::{dataframe_to_lookup, read_demographics_csv};

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicRow {
    pub zipcode: ZipCode,
    /// Attribute values in table column order; CSV nulls stay `None`
    pub attributes: Vec<(String, Option<f64>)>,
}

impl DemographicRow {
    pub fn new(zipcode: ZipCode, attributes: Vec<(String, Option<f64>)>) -> Self {
        Self {
            zipcode,
            attributes,
        }
    }

    /// `Some(value)` when the column exists, whatever its value.
    pub fn column(&self, name: &str) -> Option<Option<f64>> {
        self.attributes
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| *value)
    }
}

/// ZIP-code keyed lookup over the reference table.
#[derive(Debug, Clone, Default)]
pub struct DemographicLookup {
    columns: Vec<String>,
    rows: HashMap<ZipCode, DemographicRow>,
}

impl DemographicLookup {
    /// Build a lookup from rows sharing the given attribute columns.
    ///
    /// Duplicate ZIP codes are rejected: the join must produce a single row.
    pub fn from_rows(columns: Vec<String>, rows: Vec<DemographicRow>) -> ServiceResult<Self> {
        let mut by_zip = HashMap::with_capacity(rows.len());
        for row in rows {
            let zipcode = row.zipcode.clone();
            if by_zip.insert(zipcode.clone(), row).is_some() {
                return Err(ServiceError::configuration(format!(
                    "demographic table lists ZIP code {} more than once",
                    zipcode
                )));
            }
        }
        Ok(Self {
            columns,
            rows: by_zip,
        })
    }

    /// Row for `zipcode`, or [`ServiceError::DemographicData`] when absent.
    pub fn lookup(&self, zipcode: &ZipCode) -> ServiceResult<&DemographicRow> {
        self.rows
            .get(zipcode)
            .ok_or_else(|| ServiceError::DemographicData {
                zipcode: zipcode.to_string(),
            })
    }

    pub fn contains(&self, zipcode: &ZipCode) -> bool {
        self.rows.contains_key(zipcode)
    }

    /// Attribute column names, excluding the ZIP column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zip(s: &str) -> ZipCode {
        ZipCode::parse_str(s).unwrap()
    }

    fn row(z: &str, population: Option<f64>) -> DemographicRow {
        DemographicRow::new(zip(z), vec![("ppltn_qty".to_string(), population)])
    }

    #[test]
    fn test_lookup_found_and_missing() {
        let lookup = DemographicLookup::from_rows(
            vec!["ppltn_qty".to_string()],
            vec![row("98001", Some(25495.0)), row("98002", None)],
        )
        .unwrap();

        assert_eq!(lookup.len(), 2);
        let found = lookup.lookup(&zip("98001")).unwrap();
        assert_eq!(found.column("ppltn_qty"), Some(Some(25495.0)));
        assert_eq!(lookup.lookup(&zip("98002")).unwrap().column("ppltn_qty"), Some(None));

        let err = lookup.lookup(&zip("00000")).unwrap_err();
        assert_eq!(
            err,
            ServiceError::DemographicData {
                zipcode: "00000".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_zipcodes_rejected() {
        let result = DemographicLookup::from_rows(
            vec!["ppltn_qty".to_string()],
            vec![row("98001", Some(1.0)), row("98001", Some(2.0))],
        );
        assert!(matches!(result, Err(ServiceError::Configuration { .. })));
    }

    #[test]
    fn test_column_absent_vs_null() {
        let r = row("98001", None);
        assert_eq!(r.column("ppltn_qty"), Some(None));
        assert_eq!(r.column("hous_val_amt"), None);
    }
}
