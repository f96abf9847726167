mod leads_filters;
mod listing_edit_form;
mod notification_settings;
mod shell;

pub use leads_filters::*;
pub use listing_edit_form::*;
pub use notification_settings::*;
pub use shell::*;
