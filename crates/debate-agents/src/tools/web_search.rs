//! Offline web-search stand-in backed by a small built-in knowledge table.

use async_trait::async_trait;
use coordination::{Capability, CapabilityError};

pub const DESCRIPTION: &str = "Search the internet for information. Useful for finding \
     current information, research, and real-time data.";

/// (key phrase, canned result). Checked in order.
const KNOWLEDGE: &[(&str, &str)] = &[
    (
        "current US tax rates 2024",
        "The 2024 federal income tax rates range from 10% to 37% across seven tax brackets. \
         Standard deduction for single filers is $14,600, married filing jointly is $29,200.",
    ),
    (
        "tax deductions 2024",
        "For 2024, common deductions include state and local taxes (SALT) up to $10,000, \
         mortgage interest, charitable contributions, and medical expenses exceeding 7.5% of AGI.",
    ),
    (
        "IRA contribution limits 2024",
        "For 2024, traditional and Roth IRA contribution limits are $7,000 ($8,000 if age 50 \
         or older). 401(k) limits are $23,000 ($30,500 if age 50 or older).",
    ),
];

const FALLBACK: &str = "Based on current tax information, please refer to official IRS \
     publications or consult with a tax professional for the most up-to-date information on \
     this specific query.";

#[derive(Debug, Default, Clone)]
pub struct WebSearchTool;

impl WebSearchTool {
    pub fn new() -> Self {
        Self
    }

    /// First table entry with any key word contained in the lower-cased
    /// query, or the generic advisory text.
    pub fn search(&self, query: &str) -> String {
        let lower = query.to_lowercase();
        let result = KNOWLEDGE
            .iter()
            .find(|(key, _)| key.split(' ').any(|word| lower.contains(word)))
            .map(|(_, text)| *text)
            .unwrap_or(FALLBACK);
        format!("Web Search Result for \"{query}\": {result}")
    }
}

#[async_trait]
impl Capability for WebSearchTool {
    async fn invoke(&self, argument: &str) -> Result<String, CapabilityError> {
        Ok(self.search(argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_topic() {
        let out = WebSearchTool::new().search("Federal tax brackets");
        assert!(out.starts_with("Web Search Result for \"Federal tax brackets\": "));
        assert!(out.contains("10% to 37%"));
    }

    #[test]
    fn test_later_entry() {
        let out = WebSearchTool::new().search("contribution caps");
        assert!(out.contains("$7,000"));
    }

    #[test]
    fn test_unknown_topic_falls_back() {
        let out = WebSearchTool::new().search("capital of Colombia");
        assert!(out.contains("official IRS publications"));
    }
}
