use std::io::Read;

use anyhow::{Context, Result};
use log::debug;
use thiserror::Error;

use super::model::GalaxyRecord;

/// Columns the input table must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = ["objid", "specz", "ra", "dec", "proj_sep"];

/// Typed loader failure, so callers can distinguish a schema problem from a
/// malformed-value problem (the latter surfaces as a plain contextual error).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Read a member catalog from comma-separated text.
///
/// The header row must contain at least `objid`, `specz`, `ra`, `dec` and
/// `proj_sep`; when any are absent, the error lists all of them at once.
/// Values are parsed as-is with no range validation.
pub fn read_catalog<R: Read>(input: R) -> Result<Vec<GalaxyRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|col| headers.iter().position(|h| h == *col))
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(col, _)| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumns(missing).into());
    }
    let [objid_idx, specz_idx, ra_idx, dec_idx, proj_sep_idx] =
        [0, 1, 2, 3, 4].map(|i| positions[i].unwrap_or(usize::MAX));

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        records.push(GalaxyRecord {
            objid: parse_field(&record, objid_idx, row_no, "objid")?,
            specz: parse_field(&record, specz_idx, row_no, "specz")?,
            ra: parse_field(&record, ra_idx, row_no, "ra")?,
            dec: parse_field(&record, dec_idx, row_no, "dec")?,
            proj_sep: parse_field(&record, proj_sep_idx, row_no, "proj_sep")?,
        });
    }

    debug!("loaded {} catalog rows", records.len());
    Ok(records)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
    col: &str,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = record.get(idx).unwrap_or("");
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Row {row}, column '{col}': '{raw}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "objid,specz,ra,dec,proj_sep";

    #[test]
    fn parses_valid_rows() {
        let csv = format!("{HEADER}\n1,0.05,150.0,2.2,1.0\n2,0.051,150.1,2.3,1.5\n");
        let rows = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].objid, 1);
        assert_eq!(rows[1].specz, 0.051);
    }

    #[test]
    fn extra_columns_ignored() {
        let csv = "plate,objid,specz,ra,dec,proj_sep,mjd\n42,7,0.03,10.0,1.0,0.5,58000\n";
        let rows = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].objid, 7);
        assert_eq!(rows[0].ra, 10.0);
    }

    #[test]
    fn missing_columns_all_listed() {
        let csv = "objid,ra\n1,150.0\n";
        let err = read_catalog(csv.as_bytes()).unwrap_err();
        match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::MissingColumns(cols)) => {
                assert_eq!(cols, &["specz", "dec", "proj_sep"]);
            }
            _ => panic!("expected MissingColumns, got {err:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("specz") && msg.contains("dec") && msg.contains("proj_sep"));
    }

    #[test]
    fn malformed_value_reports_row_and_column() {
        let csv = format!("{HEADER}\n1,not-a-number,150.0,2.2,1.0\n");
        let err = read_catalog(csv.as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("specz"), "message was: {msg}");
        assert!(msg.contains("Row 0"), "message was: {msg}");
    }

    #[test]
    fn empty_body_is_ok_at_load_time() {
        let rows = read_catalog(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
