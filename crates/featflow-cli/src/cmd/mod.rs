pub mod config;
pub mod dashboard;
pub mod feature;
pub mod hook;
pub mod ship;
pub mod statusline;

/// Today's date in local time, used for dashboard and shipped.md stamps.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
