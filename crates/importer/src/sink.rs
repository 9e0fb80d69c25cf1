//! Persistence seam for accepted segments.
//!
//! The run logic only needs "write this batch atomically", so it talks to a
//! [`SegmentSink`]. Production uses [`PgSegmentSink`]; tests substitute an
//! in-memory implementation.

use async_trait::async_trait;
use werkleitung_core::record::ValidatedSegment;
use werkleitung_db::repositories::WerkleitungRepo;
use werkleitung_db::DbPool;

use crate::config::DbConfig;
use crate::error::ImportError;

/// Destination for a batch of validated segments.
#[async_trait]
pub trait SegmentSink: Send {
    /// Upsert every segment in one transaction. Returns the rows written.
    async fn upsert_batch(&mut self, segments: &[ValidatedSegment]) -> Result<u64, sqlx::Error>;
}

/// PostGIS-backed sink.
pub struct PgSegmentSink {
    pool: DbPool,
}

impl PgSegmentSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open a pool and verify the server answers.
    pub async fn connect(config: &DbConfig) -> Result<Self, ImportError> {
        let options = config.connect_options()?;
        tracing::info!(target_db = %config.target(), "Connecting to database");

        let pool = werkleitung_db::create_pool(options)
            .await
            .map_err(ImportError::Connection)?;
        werkleitung_db::health_check(&pool)
            .await
            .map_err(ImportError::Connection)?;

        tracing::info!("Database connection established");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SegmentSink for PgSegmentSink {
    async fn upsert_batch(&mut self, segments: &[ValidatedSegment]) -> Result<u64, sqlx::Error> {
        WerkleitungRepo::upsert_batch(&self.pool, segments).await
    }
}
