use polars::prelude::*;
use std::path::Path;

use super::{DemographicLookup, DemographicRow};
use crate::error::{ServiceError, ServiceResult};
use crate::models::ZipCode;

/// Parse the demographic reference CSV into a lookup keyed by `zip_column`.
pub fn read_demographics_csv(csv_path: &Path, zip_column: &str) -> ServiceResult<DemographicLookup> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))
        .and_then(|reader| reader.finish())
        .map_err(|e| {
            ServiceError::configuration(format!(
                "failed to read demographic table {}: {}",
                csv_path.display(),
                e
            ))
        })?;

    let lookup = dataframe_to_lookup(&df, zip_column)?;
    tracing::info!(
        path = %csv_path.display(),
        rows = lookup.len(),
        columns = lookup.columns().len(),
        "Loaded demographic reference table"
    );
    Ok(lookup)
}

/// Convert a Polars DataFrame into a [`DemographicLookup`].
///
/// The ZIP column is cast to text and normalized; every other column is cast
/// to Float64, with unparseable cells becoming `None`.
pub fn dataframe_to_lookup(df: &DataFrame, zip_column: &str) -> ServiceResult<DemographicLookup> {
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !column_names.iter().any(|c| c == zip_column) {
        return Err(ServiceError::configuration(format!(
            "demographic table has no '{}' column",
            zip_column
        )));
    }

    let zip_series = df
        .column(zip_column)
        .and_then(|c| c.cast(&DataType::String))
        .map_err(polars_error)?;
    let zips = zip_series.str().map_err(polars_error)?;

    let attribute_names: Vec<String> = column_names
        .into_iter()
        .filter(|c| c != zip_column)
        .collect();

    let mut attribute_values: Vec<Vec<Option<f64>>> = Vec::with_capacity(attribute_names.len());
    for name in &attribute_names {
        let casted = df
            .column(name)
            .and_then(|c| c.cast(&DataType::Float64))
            .map_err(polars_error)?;
        let values = casted.f64().map_err(polars_error)?;
        attribute_values.push(values.into_iter().collect());
    }

    let mut rows = Vec::with_capacity(df.height());
    for (idx, raw_zip) in zips.into_iter().enumerate() {
        let raw_zip = raw_zip.ok_or_else(|| {
            ServiceError::configuration(format!("demographic table row {} has no ZIP code", idx + 1))
        })?;
        let zipcode = ZipCode::parse_str(raw_zip).map_err(|e| {
            ServiceError::configuration(format!("demographic table row {}: {}", idx + 1, e))
        })?;

        let attributes = attribute_names
            .iter()
            .zip(attribute_values.iter())
            .map(|(name, values)| (name.clone(), values[idx]))
            .collect();
        rows.push(DemographicRow::new(zipcode, attributes));
    }

    DemographicLookup::from_rows(attribute_names, rows)
}

fn polars_error(e: PolarsError) -> ServiceError {
    ServiceError::configuration(format!("demographic table: {}", e))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod loader_tests;
