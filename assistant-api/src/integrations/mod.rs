pub mod gmail;
pub mod google_calendar;
pub mod inference;
