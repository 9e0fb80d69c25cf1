//! Werkleitung entity model and upsert DTO.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use werkleitung_core::error::CoreError;
use werkleitung_core::geometry::LineGeometry;
use werkleitung_core::record::ValidatedSegment;
use werkleitung_core::types::Timestamp;

/// A row from the `werkleitungen` table, geometry read back as WKT.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Werkleitung {
    pub leitung_id: String,
    pub material: Option<String>,
    pub durchmesser: i32,
    pub verlegedatum: NaiveDate,
    pub bemerkung: Option<String>,
    pub geom_wkt: String,
    pub import_datum: Timestamp,
}

impl Werkleitung {
    /// Parse the stored geometry back into a line.
    pub fn geometry(&self) -> Result<LineGeometry, CoreError> {
        LineGeometry::from_wkt(&self.geom_wkt)
    }
}

/// Bind values for one upsert, borrowed from a validated segment.
#[derive(Debug, Clone)]
pub struct UpsertWerkleitung<'a> {
    pub leitung_id: &'a str,
    pub material: Option<&'a str>,
    pub durchmesser: i32,
    pub verlegedatum: NaiveDate,
    pub bemerkung: &'a str,
    /// Canonical WKT; the SRID is bound separately.
    pub geom_wkt: String,
    pub import_datum: Timestamp,
}

impl<'a> From<&'a ValidatedSegment> for UpsertWerkleitung<'a> {
    fn from(segment: &'a ValidatedSegment) -> Self {
        Self {
            leitung_id: &segment.leitung_id,
            material: segment.material.as_deref(),
            durchmesser: segment.durchmesser_mm,
            verlegedatum: segment.verlegedatum,
            bemerkung: &segment.bemerkung,
            geom_wkt: segment.geometry.to_wkt(),
            import_datum: segment.imported_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn segment() -> ValidatedSegment {
        ValidatedSegment {
            leitung_id: "L_SPECIAL_03".to_string(),
            material: None,
            durchmesser_mm: 100,
            verlegedatum: NaiveDate::from_ymd_opt(2015, 12, 31).unwrap(),
            bemerkung: "Leitung mit Spezialzeichen: äöü ÄÖÜ & < >".to_string(),
            geometry: LineGeometry::from_xy((2_684_000.0, 1_249_000.0), (2_684_150.0, 1_249_150.0)),
            imported_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn upsert_dto_carries_canonical_wkt() {
        let segment = segment();
        let dto = UpsertWerkleitung::from(&segment);
        assert_eq!(dto.geom_wkt, "LINESTRING (2684000 1249000, 2684150 1249150)");
        assert_eq!(dto.leitung_id, "L_SPECIAL_03");
        assert_eq!(dto.material, None);
        assert_eq!(dto.bemerkung, segment.bemerkung);
    }

    #[test]
    fn stored_row_geometry_parses_back() {
        let segment = segment();
        let row = Werkleitung {
            leitung_id: segment.leitung_id.clone(),
            material: None,
            durchmesser: 100,
            verlegedatum: segment.verlegedatum,
            bemerkung: Some(segment.bemerkung.clone()),
            // PostGIS ST_AsText omits the space after the keyword.
            geom_wkt: "LINESTRING(2684000 1249000,2684150 1249150)".to_string(),
            import_datum: segment.imported_at,
        };
        assert_eq!(row.geometry().unwrap(), segment.geometry);
    }
}
