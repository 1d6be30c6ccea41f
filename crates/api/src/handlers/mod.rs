pub mod applications;
pub mod documents;
pub mod services;
pub mod validation;

use chrono::NaiveDate;

/// Today's date in the server's local calendar.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
