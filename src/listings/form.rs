use crate::models::Listing;
use serde::Serialize;

/// Success banner lifetime after a save.
pub(crate) const SUCCESS_BANNER_MS: i64 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ListingField {
    Name,
    Address,
    Phone,
    Website,
    Description,
}

impl ListingField {
    pub const ALL: [ListingField; 5] = [
        ListingField::Name,
        ListingField::Address,
        ListingField::Phone,
        ListingField::Website,
        ListingField::Description,
    ];

    /// Character limit, same as the input's `maxlength`.
    pub fn max_len(self) -> usize {
        match self {
            ListingField::Name => 255,
            ListingField::Address => 500,
            ListingField::Phone => 50,
            ListingField::Website => 500,
            ListingField::Description => 2000,
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            ListingField::Phone => "tel",
            ListingField::Website => "url",
            _ => "text",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            ListingField::Name => "listing-name",
            ListingField::Address => "listing-address",
            ListingField::Phone => "listing-phone",
            ListingField::Website => "listing-website",
            ListingField::Description => "listing-description",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingField::Name => "Business name",
            ListingField::Address => "Address",
            ListingField::Phone => "Phone",
            ListingField::Website => "Website",
            ListingField::Description => "Description",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ListingValidationError {
    #[error("Business name is required")]
    NameRequired,
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("Website must be a full URL, e.g. https://example.com")]
    InvalidWebsite,
}

/// The five editable listing fields.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub(crate) struct ListingEditable {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub description: String,
}

impl From<&Listing> for ListingEditable {
    fn from(l: &Listing) -> Self {
        Self {
            name: l.name.clone(),
            address: l.address.clone().unwrap_or_default(),
            phone: l.phone.clone().unwrap_or_default(),
            website: l.website.clone().unwrap_or_default(),
            description: l.description.clone().unwrap_or_default(),
        }
    }
}

impl ListingEditable {
    pub fn get(&self, field: ListingField) -> &str {
        match field {
            ListingField::Name => &self.name,
            ListingField::Address => &self.address,
            ListingField::Phone => &self.phone,
            ListingField::Website => &self.website,
            ListingField::Description => &self.description,
        }
    }

    fn slot(&mut self, field: ListingField) -> &mut String {
        match field {
            ListingField::Name => &mut self.name,
            ListingField::Address => &mut self.address,
            ListingField::Phone => &mut self.phone,
            ListingField::Website => &mut self.website,
            ListingField::Description => &mut self.description,
        }
    }

    pub fn validate(&self) -> Result<(), ListingValidationError> {
        if self.name.trim().is_empty() {
            return Err(ListingValidationError::NameRequired);
        }
        for field in ListingField::ALL {
            if self.get(field).chars().count() > field.max_len() {
                return Err(ListingValidationError::TooLong {
                    field: field.label(),
                    max: field.max_len(),
                });
            }
        }
        let website = self.website.trim();
        if !website.is_empty() && !looks_like_url(website) {
            return Err(ListingValidationError::InvalidWebsite);
        }
        Ok(())
    }
}

/// An `http://` or `https://` URL with a host.
fn looks_like_url(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };
    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        && !rest.is_empty()
        && !rest.starts_with('/')
        && !rest.contains(char::is_whitespace)
}

/// Body of `PUT /api/dashboard/listings`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingUpdateRequest {
    pub listing_id: String,
    pub name: String,
    pub address: String,
    pub website: String,
    pub phone: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormBanner {
    None,
    Error(String),
    Success { until_ms: i64 },
}

/// Local state of the listing edit form.
#[derive(Clone, Debug)]
pub(crate) struct ListingFormModel {
    listing_id: String,
    fields: ListingEditable,
    banner: FormBanner,
    submitting: bool,
}

impl ListingFormModel {
    pub fn new(listing: &Listing) -> Self {
        Self {
            listing_id: listing.id.clone(),
            fields: ListingEditable::from(listing),
            banner: FormBanner::None,
            submitting: false,
        }
    }

    pub fn fields(&self) -> &ListingEditable {
        &self.fields
    }

    pub fn banner(&self) -> &FormBanner {
        &self.banner
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn success_visible(&self, now_ms: i64) -> bool {
        matches!(self.banner, FormBanner::Success { until_ms } if now_ms < until_ms)
    }

    /// Input beyond the field limit is cut off, like `maxlength`. Clears any banner.
    pub fn set_field(&mut self, field: ListingField, value: &str) {
        *self.fields.slot(field) = value.chars().take(field.max_len()).collect();
        self.banner = FormBanner::None;
    }

    /// Validate and build the request. Nothing is sent when this fails.
    pub fn begin_submit(&mut self) -> Result<ListingUpdateRequest, ListingValidationError> {
        if let Err(e) = self.fields.validate() {
            self.banner = FormBanner::Error(e.to_string());
            return Err(e);
        }

        self.submitting = true;
        self.banner = FormBanner::None;

        let f = &self.fields;
        Ok(ListingUpdateRequest {
            listing_id: self.listing_id.clone(),
            name: f.name.trim().to_string(),
            address: f.address.clone(),
            website: f.website.trim().to_string(),
            phone: f.phone.clone(),
            description: f.description.clone(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<(), String>, now_ms: i64) {
        self.submitting = false;
        self.banner = match result {
            Ok(()) => FormBanner::Success {
                until_ms: now_ms + SUCCESS_BANNER_MS,
            },
            Err(msg) => FormBanner::Error(msg),
        };
    }

    pub fn expire_banner(&mut self, now_ms: i64) {
        if let FormBanner::Success { until_ms } = self.banner {
            if now_ms >= until_ms {
                self.banner = FormBanner::None;
            }
        }
    }
}
