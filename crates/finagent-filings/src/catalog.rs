//! Static registry of 10-K filing sections
//!
//! `ItemCode` is a closed sum type over the legal section identifiers, so a
//! code that exists in the type system is always legal. String inputs
//! (tool parameters, model output) go through `ItemCatalog::parse`, which
//! is where `UnknownItem` is produced.

use crate::error::{FilingsError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a 10-K filing section, e.g. `ITEM 1A`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum ItemCode {
    Item1,
    Item1A,
    Item1B,
    Item1C,
    Item2,
    Item3,
    Item4,
    Item5,
    Item6,
    Item7,
    Item7A,
    Item8,
    Item9,
    Item9A,
    Item9B,
    Item9C,
    Item10,
    Item11,
    Item12,
    Item13,
    Item14,
    Item15,
    Item16,
}

impl ItemCode {
    /// All legal item codes in filing order
    pub const ALL: [ItemCode; 23] = [
        ItemCode::Item1,
        ItemCode::Item1A,
        ItemCode::Item1B,
        ItemCode::Item1C,
        ItemCode::Item2,
        ItemCode::Item3,
        ItemCode::Item4,
        ItemCode::Item5,
        ItemCode::Item6,
        ItemCode::Item7,
        ItemCode::Item7A,
        ItemCode::Item8,
        ItemCode::Item9,
        ItemCode::Item9A,
        ItemCode::Item9B,
        ItemCode::Item9C,
        ItemCode::Item10,
        ItemCode::Item11,
        ItemCode::Item12,
        ItemCode::Item13,
        ItemCode::Item14,
        ItemCode::Item15,
        ItemCode::Item16,
    ];

    /// Canonical string form, e.g. `"ITEM 1A"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCode::Item1 => "ITEM 1",
            ItemCode::Item1A => "ITEM 1A",
            ItemCode::Item1B => "ITEM 1B",
            ItemCode::Item1C => "ITEM 1C",
            ItemCode::Item2 => "ITEM 2",
            ItemCode::Item3 => "ITEM 3",
            ItemCode::Item4 => "ITEM 4",
            ItemCode::Item5 => "ITEM 5",
            ItemCode::Item6 => "ITEM 6",
            ItemCode::Item7 => "ITEM 7",
            ItemCode::Item7A => "ITEM 7A",
            ItemCode::Item8 => "ITEM 8",
            ItemCode::Item9 => "ITEM 9",
            ItemCode::Item9A => "ITEM 9A",
            ItemCode::Item9B => "ITEM 9B",
            ItemCode::Item9C => "ITEM 9C",
            ItemCode::Item10 => "ITEM 10",
            ItemCode::Item11 => "ITEM 11",
            ItemCode::Item12 => "ITEM 12",
            ItemCode::Item13 => "ITEM 13",
            ItemCode::Item14 => "ITEM 14",
            ItemCode::Item15 => "ITEM 15",
            ItemCode::Item16 => "ITEM 16",
        }
    }

    /// Comma-separated legal set, used in validation error messages
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(ItemCode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCode {
    type Err = FilingsError;

    /// Parse the canonical form, tolerating case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ALL
            .iter()
            .find(|code| code.as_str() == normalized)
            .copied()
            .ok_or_else(|| FilingsError::UnknownItem {
                code: s.trim().to_string(),
                allowed: Self::allowed_list(),
            })
    }
}

impl Serialize for ItemCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Metadata for one filing section
#[derive(Debug, Clone, Serialize)]
pub struct ItemMetadata {
    /// Section identifier
    pub code: ItemCode,
    /// Filing part the section belongs to, e.g. `PART I`
    pub part: &'static str,
    /// Section title, e.g. `Risk Factors`
    pub title: &'static str,
    /// What the section covers, used as an extraction schema hint
    pub description: &'static str,
}

/// Static table backing the catalog: (code, part, title, description)
const TEN_K_STRUCTURE: [(ItemCode, &str, &str, &str); 23] = [
    (
        ItemCode::Item1,
        "PART I",
        "Business",
        "Overview of the company's main operations, including its products and services.",
    ),
    (
        ItemCode::Item1A,
        "PART I",
        "Risk Factors",
        "Discussion of the material risks the company faces.",
    ),
    (
        ItemCode::Item1B,
        "PART I",
        "Unresolved Staff Comments",
        "Any comments from the SEC staff on previous filings that remain unresolved.",
    ),
    (
        ItemCode::Item1C,
        "PART I",
        "Cybersecurity",
        "Cybersecurity risk management, strategy, and governance.",
    ),
    (
        ItemCode::Item2,
        "PART I",
        "Properties",
        "Description of the company's significant physical properties.",
    ),
    (
        ItemCode::Item3,
        "PART I",
        "Legal Proceedings",
        "Material pending legal proceedings other than routine litigation.",
    ),
    (
        ItemCode::Item4,
        "PART I",
        "Mine Safety Disclosures",
        "Mine safety information required of mine operators.",
    ),
    (
        ItemCode::Item5,
        "PART II",
        "Market for Registrant's Common Equity",
        "Market information for the company's stock, holders, dividends, and share repurchases.",
    ),
    (
        ItemCode::Item6,
        "PART II",
        "Selected Financial Data (Reserved)",
        "Reserved item; previously selected historical financial data.",
    ),
    (
        ItemCode::Item7,
        "PART II",
        "Management's Discussion and Analysis",
        "Management's narrative on financial condition, changes, and results of operations.",
    ),
    (
        ItemCode::Item7A,
        "PART II",
        "Quantitative and Qualitative Disclosures About Market Risk",
        "Exposure to market risk such as interest rate, foreign exchange, and commodity risk.",
    ),
    (
        ItemCode::Item8,
        "PART II",
        "Financial Statements and Supplementary Data",
        "Audited financial statements and supplementary financial information.",
    ),
    (
        ItemCode::Item9,
        "PART II",
        "Changes in and Disagreements with Accountants",
        "Changes in or disagreements with accountants on accounting and financial disclosure.",
    ),
    (
        ItemCode::Item9A,
        "PART II",
        "Controls and Procedures",
        "Evaluation of disclosure controls and internal control over financial reporting.",
    ),
    (
        ItemCode::Item9B,
        "PART II",
        "Other Information",
        "Other material information not reported elsewhere in the filing.",
    ),
    (
        ItemCode::Item9C,
        "PART II",
        "Disclosure Regarding Foreign Jurisdictions that Prevent Inspections",
        "Disclosures about auditors in foreign jurisdictions that prevent PCAOB inspections.",
    ),
    (
        ItemCode::Item10,
        "PART III",
        "Directors, Executive Officers and Corporate Governance",
        "Information about directors, executive officers, and corporate governance.",
    ),
    (
        ItemCode::Item11,
        "PART III",
        "Executive Compensation",
        "Compensation of directors and executive officers.",
    ),
    (
        ItemCode::Item12,
        "PART III",
        "Security Ownership of Certain Beneficial Owners and Management",
        "Stock ownership of large shareholders, directors, and management.",
    ),
    (
        ItemCode::Item13,
        "PART III",
        "Certain Relationships and Related Transactions",
        "Related-party transactions and director independence.",
    ),
    (
        ItemCode::Item14,
        "PART III",
        "Principal Accountant Fees and Services",
        "Fees paid to and services provided by the principal accountant.",
    ),
    (
        ItemCode::Item15,
        "PART IV",
        "Exhibits and Financial Statement Schedules",
        "Exhibits and financial statement schedules filed with the report.",
    ),
    (
        ItemCode::Item16,
        "PART IV",
        "Form 10-K Summary",
        "Optional summary of the Form 10-K.",
    ),
];

/// Key-value names the structured extractor should populate per section
///
/// Sections without an entry get no extraction steer beyond the catalog
/// description.
pub fn extraction_hints(code: ItemCode) -> &'static [&'static str] {
    match code {
        ItemCode::Item1 => &[
            "Number of Employees",
            "Countries of Operation",
            "Main Products",
            "Revenue Segments",
        ],
        ItemCode::Item1A => &[
            "FX Hedging Notional",
            "Geopolitical Risk",
            "Interest Rate Risk",
            "Supply Chain Risk",
        ],
        ItemCode::Item7A => &[
            "FX Hedging Notional",
            "Interest Rate Swap Notional",
            "Commodity Exposure",
            "Sensitivity to Rate Movements",
        ],
        _ => &[],
    }
}

/// Read-only registry mapping item codes to section metadata
///
/// Built once from the static 10-K structure; no locking needed.
pub struct ItemCatalog {
    items: BTreeMap<ItemCode, ItemMetadata>,
}

impl ItemCatalog {
    /// Build the 10-K catalog
    pub fn ten_k() -> Self {
        let items = TEN_K_STRUCTURE
            .iter()
            .map(|&(code, part, title, description)| {
                (
                    code,
                    ItemMetadata {
                        code,
                        part,
                        title,
                        description,
                    },
                )
            })
            .collect();
        Self { items }
    }

    /// Look up metadata for an item code
    ///
    /// Total over the closed `ItemCode` type: every constructible code is
    /// in the catalog.
    pub fn get(&self, code: ItemCode) -> &ItemMetadata {
        &self.items[&code]
    }

    /// Validate a string identifier against the catalog
    pub fn parse(&self, s: &str) -> Result<ItemCode> {
        s.parse()
    }

    /// All item codes, in filing order
    pub fn all_codes(&self) -> impl Iterator<Item = ItemCode> + '_ {
        self.items.keys().copied()
    }

    /// `code -> "title: description"` map used to build resolver prompts
    pub fn descriptions(&self) -> BTreeMap<ItemCode, String> {
        self.items
            .iter()
            .map(|(code, meta)| (*code, format!("{}: {}", meta.title, meta.description)))
            .collect()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::ten_k()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_lenient_forms() {
        assert_eq!("ITEM 1A".parse::<ItemCode>().unwrap(), ItemCode::Item1A);
        assert_eq!("item 7a".parse::<ItemCode>().unwrap(), ItemCode::Item7A);
        assert_eq!("  ITEM  16 ".parse::<ItemCode>().unwrap(), ItemCode::Item16);
    }

    #[test]
    fn test_parse_unknown_code_names_offender_and_legal_set() {
        let err = "ITEM 42".parse::<ItemCode>().unwrap_err();
        match err {
            FilingsError::UnknownItem { code, allowed } => {
                assert_eq!(code, "ITEM 42");
                assert!(allowed.contains("ITEM 1A"));
                assert!(allowed.contains("ITEM 16"));
            }
            other => panic!("expected UnknownItem, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&ItemCode::Item7A).unwrap();
        assert_eq!(json, "\"ITEM 7A\"");
        let back: ItemCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemCode::Item7A);

        assert!(serde_json::from_str::<ItemCode>("\"ITEM 99\"").is_err());
    }

    #[test]
    fn test_catalog_covers_every_code() {
        let catalog = ItemCatalog::ten_k();
        assert_eq!(catalog.all_codes().count(), ItemCode::ALL.len());
        for code in ItemCode::ALL {
            let meta = catalog.get(code);
            assert_eq!(meta.code, code);
            assert!(!meta.title.is_empty());
            assert!(!meta.description.is_empty());
        }
    }

    #[test]
    fn test_descriptions_format() {
        let catalog = ItemCatalog::ten_k();
        let descriptions = catalog.descriptions();
        assert_eq!(
            descriptions[&ItemCode::Item1A],
            "Risk Factors: Discussion of the material risks the company faces."
        );
    }

    #[test]
    fn test_extraction_hints() {
        assert!(extraction_hints(ItemCode::Item1).contains(&"Number of Employees"));
        assert!(extraction_hints(ItemCode::Item8).is_empty());
    }

    #[test]
    fn test_ordering_follows_filing_order() {
        assert!(ItemCode::Item1A < ItemCode::Item2);
        assert!(ItemCode::Item9C < ItemCode::Item10);
    }
}
