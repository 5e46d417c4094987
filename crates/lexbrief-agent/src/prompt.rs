//! Drafting prompt construction.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use lexbrief_core::{CaseFile, RankedResult};
use lexbrief_store::StyleFlags;
use serde::{Deserialize, Serialize};

/// Precedents quoted in the prompt; also the length of `used_doc_ids`.
pub const MAX_PROMPT_PRECEDENTS: usize = 4;

pub const SYSTEM_PROMPT: &str = "You are a concise Indian constitutional law analyst. \
Do not reveal chain-of-thought or internal reasoning. \
Never output <think> blocks or similar. \
Avoid boilerplate, disclaimers, and repetition. \
Use only the requested section headings. \
Prefer 1-3 tight bullets per list; keep each bullet under ~25 words. \
Cite only the provided titles and years; no footnotes or URLs. \
Output plain text only: no Markdown, no code fences, no formatting syntax.";

const SECTIONS: &str = "WRITE THE BRIEF WITH THESE EXACT SECTIONS:
1) Core Issues - tailored to these facts.
2) Petitioner Arguments - with citations to titles/years above.
3) State Arguments - with citations to titles/years above.
4) Proportionality - bullets for Legality, Aim, Suitability, Necessity (alternatives), Safeguards/Balancing.
5) Verdict - a single sentence and a numeric confidence in [0,1].
Be specific; avoid boilerplate and repetition. Do not include any hidden reasoning or meta commentary.";

/// Per-request layout override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreference {
    Bullets,
    Prose,
}

impl StylePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            StylePreference::Bullets => "bullets",
            StylePreference::Prose => "prose",
        }
    }
}

impl fmt::Display for StylePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown style {0:?}; expected \"bullets\" or \"prose\"")]
pub struct UnknownStyle(String);

impl FromStr for StylePreference {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullets" => Ok(StylePreference::Bullets),
            "prose" => Ok(StylePreference::Prose),
            other => Err(UnknownStyle(other.to_string())),
        }
    }
}

/// Style instructions from learned feedback and the request's preference.
///
/// An explicit preference replaces the learned bullet habit; citation and
/// proportionality emphasis apply either way.
pub fn style_prefix(flags: StyleFlags, preference: Option<StylePreference>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    match preference {
        Some(StylePreference::Bullets) => {
            parts.push("Use compact bullet points across sections where appropriate.")
        }
        Some(StylePreference::Prose) => {
            parts.push("Write in tight prose paragraphs; use bullets sparingly.")
        }
        None if flags.style_bullets >= 1 => parts.push("Use compact bullet points where helpful."),
        None => {}
    }
    if flags.style_citations >= 1 {
        parts.push("Cite sources by title and year.");
    }
    if flags.emphasis_proportionality >= 1 {
        parts.push("Emphasize proportionality steps explicitly.");
    }
    if parts.is_empty() {
        return "Be concise.".to_string();
    }
    parts.join(" ")
}

/// User prompt: style prefix, the case, up to four precedents, and the
/// required brief sections.
pub fn build_prompt(case: &CaseFile, precedents: &[RankedResult], prefix: &str) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{prefix}");
    let _ = writeln!(prompt, "CASE");
    let _ = writeln!(prompt, "Title: {}", case.title);
    let _ = writeln!(prompt, "Facts: {}", case.facts);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "PRECEDENTS (cite by title and year only)");
    for ranked in precedents.iter().take(MAX_PROMPT_PRECEDENTS) {
        let doc = &ranked.document;
        let _ = writeln!(prompt, "- {}: {}", doc.citation(), doc.text);
    }
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "{SECTIONS}");
    prompt
}
