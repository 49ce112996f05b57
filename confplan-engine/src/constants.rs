//! Centralized limits for the planner's cart rules.
//!
//! Catalog JSON may override a venue item's cap, but the defaults below apply
//! whenever a field is absent.

// Venue limits -------------------------------------------------------------
/// Catalog id of the large auditorium whose remaining capacity is tracked.
pub const AUDITORIUM_ID: &str = "auditorium";
/// Booking ceiling for the auditorium.
pub const AUDITORIUM_CAP: u32 = 3;
/// Booking ceiling for every other venue room.
pub const VENUE_ROOM_CAP: u32 = 10;

// Attendees ----------------------------------------------------------------
pub const MIN_PEOPLE: u32 = 1;
pub const DEFAULT_PEOPLE: u32 = 1;

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_STORE: &str = "confplan::store";
pub(crate) const LOG_TARGET_CATALOG: &str = "confplan::catalog";
