//! Business website vs. supplier directory classification.

use serde::{Deserialize, Serialize};

/// What kind of site a candidate URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteType {
    /// A single supplier's own site
    BusinessWebsite,
    /// A listing site with many suppliers (IndiaMART, TradeIndia, ...)
    SupplierDirectory,
}

/// Classify a URL by case-insensitive substring match against `directories`.
pub fn classify_url<S: AsRef<str>>(url: &str, directories: &[S]) -> WebsiteType {
    match directory_name(url, directories) {
        Some(_) => WebsiteType::SupplierDirectory,
        None => WebsiteType::BusinessWebsite,
    }
}

/// The first directory whose name appears in the URL.
pub fn directory_name<'a, S: AsRef<str>>(url: &str, directories: &'a [S]) -> Option<&'a str> {
    let url = url.to_lowercase();
    directories
        .iter()
        .map(|d| AsRef::<str>::as_ref(d))
        .find(|d| !d.is_empty() && url.contains(&d.to_lowercase()))
}
