mod form;

pub(crate) use form::{
    FormBanner, ListingField, ListingFormModel, ListingUpdateRequest, SUCCESS_BANNER_MS,
};
