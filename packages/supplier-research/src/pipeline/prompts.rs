//! LLM prompts for query planning and supplier extraction.

use crate::schema::StructuredOutput;
use crate::types::company::CompanyProfile;
use crate::types::supplier::Supplier;

/// Prompt for turning a company profile into web search queries.
pub const PLANNER_PROMPT: &str = r#"You are a procurement specialist agent. Given the company name, company information, and procurement requirement, you will generate a list of search queries to find relevant suppliers.

Here is the information you have about the topic you are researching:

Company Name: {company_name}
Company Information: {company_info}
Procurement Requirement: {procurement_requirement}

Generate a list of web search queries that will surface suppliers able to meet this requirement."#;

/// Prompt for extracting one supplier from a scraped page (direct tool path).
pub const SUPPLIER_PROMPT: &str = r#"You are doing web research on behalf of a user. You are trying to find out this information:

<info>
{info}
</info>

You just scraped the following website: {url}

Based on the website content below, extract the supplier information including:
1. Name: The supplier's company name
2. Description: Brief description of what the supplier does
3. Standards Compliance: Any industry standards or regulations they comply with
4. Certifications: Any certifications or quality marks they have
5. Contact Details: Including email, phone, website, and address if available

<Website content>
{content}
</Website content>

Format the contact details as a structured object with email, phone, website, and address fields."#;

/// Format the planner prompt for a profile.
pub fn format_planner_prompt(profile: &CompanyProfile) -> String {
    fill_template(
        PLANNER_PROMPT,
        &[
            ("company_name", profile.company_name.as_str()),
            ("company_info", profile.company_info.as_str()),
            ("procurement_requirement", profile.procurement_requirement.as_str()),
        ],
    )
}

/// Format the supplier extraction prompt for a scraped page.
pub fn format_supplier_prompt(url: &str, content: &str) -> String {
    let info = serde_json::to_string_pretty(&Supplier::strict_schema()).unwrap_or_default();

    fill_template(
        SUPPLIER_PROMPT,
        &[("info", info.as_str()), ("url", url), ("content", content)],
    )
}

/// Substitute `{key}` placeholders in one pass over the template.
///
/// Inserted values are never rescanned, so braces inside them stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let hit = values.iter().find_map(|(key, value)| {
            let placeholder_len = key.len() + 2;
            let matches = tail.len() >= placeholder_len
                && tail[1..].starts_with(key)
                && tail[1 + key.len()..].starts_with('}');
            matches.then_some((placeholder_len, *value))
        });

        match hit {
            Some((len, value)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_planner_prompt() {
        let profile = CompanyProfile::new("Acme", "Pune, 65 employees", "steel bolts");
        let formatted = format_planner_prompt(&profile);
        assert!(formatted.contains("Company Name: Acme"));
        assert!(formatted.contains("Pune, 65 employees"));
        assert!(formatted.contains("Procurement Requirement: steel bolts"));
        assert!(!formatted.contains("{company_name}"));
    }

    #[test]
    fn test_format_supplier_prompt() {
        let formatted = format_supplier_prompt("https://acmesteel.com", "We make bolts");
        assert!(formatted.contains("https://acmesteel.com"));
        assert!(formatted.contains("We make bolts"));
        assert!(formatted.contains("standards_compliance"));
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let profile = CompanyProfile::new(
            "Acme {procurement_requirement}",
            "Pune",
            "steel bolts",
        );
        let formatted = format_planner_prompt(&profile);
        assert!(formatted.contains("Company Name: Acme {procurement_requirement}\n"));

        let formatted = format_supplier_prompt("https://acmesteel.com/{content}", "We make bolts");
        assert!(formatted.contains("website: https://acmesteel.com/{content}\n"));
        assert_eq!(formatted.matches("We make bolts").count(), 1);
    }

    #[test]
    fn test_fill_template_leaves_unknown_braces() {
        assert_eq!(
            fill_template("{a} {b} {", &[("a", "x{b}")]),
            "x{b} {b} {"
        );
    }
}
