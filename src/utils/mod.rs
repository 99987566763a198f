/// Tehran time, Persian calendar and digits
pub mod datetime;
/// Announcement and alarm message text
pub mod format;
/// Consistent log line helpers
pub mod logging;
/// Operator input parsing
pub mod validation;
