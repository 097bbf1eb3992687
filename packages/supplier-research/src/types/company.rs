//! Run input: who is buying and what they need.

use serde::{Deserialize, Serialize};

/// The company a discovery run is performed for.
///
/// Created once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Company name
    pub company_name: String,

    /// Free-text description (industry, size, location, revenue...)
    pub company_info: String,

    /// Free-text description of what needs to be sourced
    pub procurement_requirement: String,
}

impl CompanyProfile {
    /// Create a new profile.
    pub fn new(
        company_name: impl Into<String>,
        company_info: impl Into<String>,
        procurement_requirement: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_info: company_info.into(),
            procurement_requirement: procurement_requirement.into(),
        }
    }
}
