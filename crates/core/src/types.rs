/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Spatial reference identifier of the Swiss LV95 projected system.
///
/// Travels alongside every geometry written to storage; it is never embedded
/// in the WKT text itself.
pub const LV95_SRID: i32 = 2056;
