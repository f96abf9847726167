mod export;
mod filter;

pub(crate) use export::{run_export, ExportState, EXPORT_MIME};
pub(crate) use filter::{
    filter_change, FilterKey, LeadsFilterState, LeadsPeriod, ALL_VALUE,
};
