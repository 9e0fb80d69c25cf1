//! Repository for the `werkleitungen` table.
//!
//! Geometry goes in as canonical WKT plus the LV95 SRID and comes back out
//! through `ST_AsText`.

use sqlx::PgPool;
use werkleitung_core::record::ValidatedSegment;
use werkleitung_core::types::LV95_SRID;

use crate::models::werkleitung::{UpsertWerkleitung, Werkleitung};

/// Column list for `werkleitungen` reads.
const COLUMNS: &str = "leitung_id, material, durchmesser, verlegedatum, bemerkung, \
                       ST_AsText(geom) AS geom_wkt, import_datum";

/// Insert-or-overwrite keyed on `leitung_id`. Every non-key column is
/// replaced when the identifier already exists.
const UPSERT_SQL: &str = "INSERT INTO werkleitungen \
        (leitung_id, material, durchmesser, verlegedatum, bemerkung, geom, import_datum) \
     VALUES ($1, $2, $3, $4, $5, ST_GeomFromText($6, $7), $8) \
     ON CONFLICT (leitung_id) \
     DO UPDATE SET \
        material = EXCLUDED.material, \
        durchmesser = EXCLUDED.durchmesser, \
        verlegedatum = EXCLUDED.verlegedatum, \
        bemerkung = EXCLUDED.bemerkung, \
        geom = EXCLUDED.geom, \
        import_datum = EXCLUDED.import_datum";

/// Provides data access for imported utility line segments.
pub struct WerkleitungRepo;

impl WerkleitungRepo {
    /// Upsert every segment inside a single transaction.
    ///
    /// Either all rows are committed or, on the first failure, none are: the
    /// transaction rolls back when it is dropped without a commit. Returns
    /// the number of rows written.
    pub async fn upsert_batch(
        pool: &PgPool,
        segments: &[ValidatedSegment],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        tracing::info!(count = segments.len(), "Database transaction started");

        let mut written = 0u64;
        for segment in segments {
            let row = UpsertWerkleitung::from(segment);
            let result = sqlx::query(UPSERT_SQL)
                .bind(row.leitung_id)
                .bind(row.material)
                .bind(row.durchmesser)
                .bind(row.verlegedatum)
                .bind(row.bemerkung)
                .bind(&row.geom_wkt)
                .bind(LV95_SRID)
                .bind(row.import_datum)
                .execute(&mut *tx)
                .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Find a segment by its business identifier.
    pub async fn find_by_id(
        pool: &PgPool,
        leitung_id: &str,
    ) -> Result<Option<Werkleitung>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM werkleitungen WHERE leitung_id = $1");
        sqlx::query_as::<_, Werkleitung>(&query)
            .bind(leitung_id)
            .fetch_optional(pool)
            .await
    }

    /// Count all stored segments.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM werkleitungen")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_overwrites_every_non_key_column() {
        for column in [
            "material",
            "durchmesser",
            "verlegedatum",
            "bemerkung",
            "geom",
            "import_datum",
        ] {
            assert!(
                UPSERT_SQL.contains(&format!("{column} = EXCLUDED.{column}")),
                "{column} is not overwritten on conflict"
            );
        }
        assert!(!UPSERT_SQL.contains("leitung_id = EXCLUDED"));
    }

    #[test]
    fn upsert_keys_on_identifier_and_tags_srid() {
        assert!(UPSERT_SQL.contains("ON CONFLICT (leitung_id)"));
        assert!(UPSERT_SQL.contains("ST_GeomFromText($6, $7)"));
        assert_eq!(LV95_SRID, 2056);
    }
}
