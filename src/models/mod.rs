use serde::{Deserialize, Serialize};

/// Backend account info object.
///
/// Returned under the `account` field on login. We keep it flexible so new
/// backend fields don't break deserialization; only a few keys are read.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl AccountInfo {
    pub fn business_name(&self) -> String {
        self.extra
            .get("businessName")
            .or_else(|| self.extra.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    pub fn locale(&self) -> Option<String> {
        self.extra
            .get("locale")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string())
    }
}

/// Listing as shown in selects and the listings overview.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListingSummary {
    /// Numeric in practice, but the backend sends it as a string.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
}

/// Full listing record returned by `GET /api/dashboard/listings/:id` and the PUT.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Lead {
    pub id: String,
    pub listing_id: String,
    #[serde(default)]
    pub listing_name: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: String,
}

/// One page of the server-side filtered leads list.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct LeadsPage {
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_info_reads_business_name_and_locale() {
        let a = AccountInfo {
            extra: serde_json::json!({"id": 7, "businessName": "Happy Paws", "locale": "es"}),
        };
        assert_eq!(a.business_name(), "Happy Paws");
        assert_eq!(a.locale().as_deref(), Some("es"));

        let bare = AccountInfo {
            extra: serde_json::json!({"id": 7, "locale": "  "}),
        };
        assert_eq!(bare.business_name(), "");
        assert!(bare.locale().is_none());
    }

    #[test]
    fn test_leads_page_contract_deserialize() {
        let json = r#"{
            "leads": [{
                "id": "91",
                "listingId": "12",
                "listingName": "Happy Paws Grooming",
                "name": "Dana",
                "email": "dana@example.com",
                "phone": null,
                "message": "Do you groom cats?",
                "createdAt": "2026-10-01T09:30:00Z"
            }],
            "total": 1
        }"#;
        let page: LeadsPage = serde_json::from_str(json).expect("leads page should parse");
        assert_eq!(page.total, 1);
        assert_eq!(page.leads[0].listing_id, "12");
        assert!(page.leads[0].phone.is_none());
    }

    #[test]
    fn test_listing_missing_optional_fields() {
        let l: Listing =
            serde_json::from_str(r#"{"id": "12", "name": "Vet Clinic"}"#).expect("should parse");
        assert_eq!(l.name, "Vet Clinic");
        assert!(l.website.is_none());
    }
}
