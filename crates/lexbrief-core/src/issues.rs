//! Lexical issue tagging.
//!
//! Maps free text to a closed vocabulary of legal-issue tags by
//! case-insensitive substring match against fixed trigger phrases. A tag is
//! present when any of its triggers occurs in the lower-cased input.
//!
//! Phrasing that misses every trigger yields no tag. That is the contract:
//! the tagger is explainable, not semantic.

use std::fmt;
use std::str::FromStr;

/// A legal-issue tag.
///
/// Variants are declared alphabetically so the derived `Ord` matches the
/// lexical order of [`Issue::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Issue {
    Assembly,
    Biometric,
    Equality,
    Expression,
    Internet,
    Legality,
    Localization,
    Privacy,
    Proportionality,
    Religion,
    Safeguards,
    Surveillance,
    Trade,
}

impl Issue {
    pub const ALL: [Issue; 13] = [
        Issue::Assembly,
        Issue::Biometric,
        Issue::Equality,
        Issue::Expression,
        Issue::Internet,
        Issue::Legality,
        Issue::Localization,
        Issue::Privacy,
        Issue::Proportionality,
        Issue::Religion,
        Issue::Safeguards,
        Issue::Surveillance,
        Issue::Trade,
    ];

    /// Display priority for [`issue_labels`].
    const PRIORITY: [Issue; 13] = [
        Issue::Legality,
        Issue::Privacy,
        Issue::Proportionality,
        Issue::Religion,
        Issue::Expression,
        Issue::Trade,
        Issue::Equality,
        Issue::Assembly,
        Issue::Biometric,
        Issue::Surveillance,
        Issue::Internet,
        Issue::Localization,
        Issue::Safeguards,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assembly => "assembly",
            Self::Biometric => "biometric",
            Self::Equality => "equality",
            Self::Expression => "expression",
            Self::Internet => "internet",
            Self::Legality => "legality",
            Self::Localization => "localization",
            Self::Privacy => "privacy",
            Self::Proportionality => "proportionality",
            Self::Religion => "religion",
            Self::Safeguards => "safeguards",
            Self::Surveillance => "surveillance",
            Self::Trade => "trade",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Assembly => "Article 19(1)(b) assembly",
            Self::Biometric => "Biometric intrusion",
            Self::Equality => "Article 14 equality / arbitrariness",
            Self::Expression => "Article 19(1)(a) expression",
            Self::Internet => "Internet access / shutdowns",
            Self::Legality => "Legality / enabling law",
            Self::Localization => "Data localization",
            Self::Privacy => "Article 21 privacy",
            Self::Proportionality => "Proportionality test",
            Self::Religion => "Article 25 religion",
            Self::Safeguards => "Procedural safeguards",
            Self::Surveillance => "State surveillance / public safety",
            Self::Trade => "Article 19(1)(g) trade/business",
        }
    }

    /// Lower-case trigger phrases.
    pub fn triggers(&self) -> &'static [&'static str] {
        match self {
            Self::Privacy => &[
                "privacy",
                "article 21",
                "fundamental right",
                "data protection",
                "personal data",
            ],
            Self::Proportionality => &[
                "proportionality",
                "least restrictive",
                "necessity",
                "balancing",
            ],
            Self::Biometric => &[
                "biometric",
                "aadhaar",
                "fingerprint",
                "iris",
                "face recognition",
                "facial recognition",
            ],
            Self::Safeguards => &["safeguards", "oversight", "data protection", "audit", "breach"],
            Self::Legality => &["statute", "law", "legality", "ultra vires", "backed by law"],
            Self::Religion => &[
                "article 25",
                "religion",
                "religious",
                "hijab",
                "turban",
                "kirpan",
                "faith",
                "worship",
            ],
            Self::Expression => &[
                "article 19(1)(a)",
                "freedom of speech",
                "expression",
                "symbolic",
                "dress",
                "slogan",
            ],
            Self::Equality => &["article 14", "equality", "equal", "discrimination", "arbitrary"],
            Self::Trade => &["article 19(1)(g)", "trade", "business", "commerce", "e-commerce"],
            Self::Assembly => &["article 19(1)(b)", "protest", "assembly", "demonstration"],
            Self::Internet => &["internet", "shutdown", "broadband", "telecom"],
            Self::Localization => &[
                "localization",
                "data localization",
                "cross-border",
                "data transfer",
            ],
            Self::Surveillance => &["surveillance", "cctv", "public safety", "tracking"],
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown issue tag: {0}")]
pub struct UnknownIssue(pub String);

impl FromStr for Issue {
    type Err = UnknownIssue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Issue::ALL
            .into_iter()
            .find(|issue| issue.as_str() == s)
            .ok_or_else(|| UnknownIssue(s.to_string()))
    }
}

/// Detect issue tags in `text`.
///
/// Returns a sorted, de-duplicated list. Never yields a tag outside
/// [`Issue::ALL`].
pub fn tag(text: &str) -> Vec<Issue> {
    let lowered = text.to_lowercase();
    // ALL is already sorted, so filtering preserves order.
    Issue::ALL
        .into_iter()
        .filter(|issue| issue.triggers().iter().any(|t| lowered.contains(t)))
        .collect()
}

/// Display labels for detected issues, in priority order, at most five.
pub fn issue_labels(issues: &[Issue]) -> Vec<&'static str> {
    Issue::PRIORITY
        .into_iter()
        .filter(|p| issues.contains(p))
        .map(|p| p.label())
        .take(5)
        .collect()
}
