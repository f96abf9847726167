pub mod dashboard;
pub mod ui;
