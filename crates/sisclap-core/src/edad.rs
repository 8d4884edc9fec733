//! Shared whole-years age calculation.
//!
//! Every card, detail view, and report computes age through this one
//! routine so the birthday boundary behaves identically at every call site.

use chrono::NaiveDate;

/// Age in whole years at `hoy`.
///
/// The year count drops by one while the birthday has not yet occurred in
/// the current year, and counts the birthday the day it happens. A birth
/// date later than `hoy` yields 0.
pub fn edad(nacimiento: NaiveDate, hoy: NaiveDate) -> u32 {
  hoy.years_since(nacimiento).unwrap_or(0)
}
