/// All primary keys are SQLite `INTEGER PRIMARY KEY` row ids.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Rental start and end days carry no time component.
pub type RentalDate = chrono::NaiveDate;
