//! Structured output records produced by the extraction model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Contact details of a supplier. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContactDetails {
    /// Email address of the supplier
    #[serde(default)]
    pub email: Option<String>,

    /// Phone number of the supplier
    #[serde(default)]
    pub phone: Option<String>,

    /// Website of the supplier (original website or directory listing page)
    #[serde(default)]
    pub website: Option<String>,

    /// Postal address of the supplier
    #[serde(default)]
    pub address: Option<String>,
}

impl ContactDetails {
    /// True when no usable email is present. Blank strings count as missing.
    pub fn email_missing(&self) -> bool {
        self.email
            .as_deref()
            .map(|e| e.trim().is_empty())
            .unwrap_or(true)
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// One candidate vendor with compliance and contact metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Supplier {
    /// Supplier company name
    pub name: String,

    /// Brief description of what the supplier does
    pub description: String,

    /// Industry standards or regulations the supplier complies with
    pub standards_compliance: String,

    /// Certifications or quality marks the supplier holds
    pub certifications: String,

    /// Contact details of the supplier
    #[serde(default)]
    pub contact_details: ContactDetails,
}

impl Supplier {
    /// Create a supplier with empty compliance fields and no contact details.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            standards_compliance: String::new(),
            certifications: String::new(),
            contact_details: ContactDetails::default(),
        }
    }

    pub fn with_standards_compliance(mut self, value: impl Into<String>) -> Self {
        self.standards_compliance = value.into();
        self
    }

    pub fn with_certifications(mut self, value: impl Into<String>) -> Self {
        self.certifications = value.into();
        self
    }

    pub fn with_contact_details(mut self, contact_details: ContactDetails) -> Self {
        self.contact_details = contact_details;
        self
    }

    /// Check the record invariants: `name` and `description` are non-empty.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("supplier name is empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("supplier description is empty".to_string());
        }
        Ok(())
    }
}

/// Model output shape for the query planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Queries {
    /// Web search queries that would surface relevant suppliers
    pub queries: Vec<String>,
}
