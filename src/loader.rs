//! Portal CSV loading
//!
//! Thin boundary collaborator for the search core: reads
//! `latitude,longitude,name` rows (with headers) and assigns sequential ids.
//! Input is assumed deduplicated by the producer; rows with non-finite
//! coordinates are skipped with a warning.

use crate::{Portal, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PortalRecord {
    latitude: f64,
    longitude: f64,
    name: String,
}

/// Load portals from a CSV file with `latitude,longitude,name` columns
pub fn load_portals_from_csv(path: impl AsRef<Path>) -> Result<Vec<Portal>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut portals = Vec::new();

    for record in reader.deserialize() {
        let record: PortalRecord = record?;
        if !record.latitude.is_finite() || !record.longitude.is_finite() {
            tracing::warn!(
                name = %record.name,
                "skipping portal with non-finite coordinates"
            );
            continue;
        }
        portals.push(Portal::new(
            portals.len() as u32,
            record.name,
            record.latitude,
            record.longitude,
        ));
    }

    tracing::info!(portals = portals.len(), path = %path.as_ref().display(), "portals loaded");
    Ok(portals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_basic_csv() {
        let file = write_csv(
            "latitude,longitude,name\n\
             51.5007,-0.1246,Big Ben\n\
             51.5033,-0.1195,London Eye\n\
             51.5081,-0.0759,Tower of London\n",
        );

        let portals = load_portals_from_csv(file.path()).unwrap();
        assert_eq!(portals.len(), 3);
        assert_eq!(portals[0].id, 0);
        assert_eq!(portals[0].name, "Big Ben");
        assert_eq!(portals[2].id, 2);
        assert!((portals[1].latitude - 51.5033).abs() < 1e-9);
        assert!((portals[1].longitude - -0.1195).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_portals_from_csv("/definitely/not/here.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let file = write_csv(
            "latitude,longitude,name\n\
             51.5,not-a-number,Broken\n",
        );
        assert!(load_portals_from_csv(file.path()).is_err());
    }

    #[test]
    fn test_empty_file_yields_no_portals() {
        let file = write_csv("latitude,longitude,name\n");
        let portals = load_portals_from_csv(file.path()).unwrap();
        assert!(portals.is_empty());
    }
}
