//! Row structs for the `werkleitungen` table.

pub mod werkleitung;
