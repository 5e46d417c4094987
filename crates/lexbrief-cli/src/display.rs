//! Console rendering for agent responses, rankings and feedback state.
//!
//! Everything is written to a `Write` so the same layout can be captured
//! in tests; `main` passes a locked stdout.

use std::io::{self, Write};

use lexbrief_agent::{AgentResponse, MAX_PROMPT_PRECEDENTS};
use lexbrief_core::RankedResult;
use lexbrief_store::FeedbackState;

const NONE: &str = "-";

// ── Agent response ──

/// Console view of one brief: issues, plan, top precedents, grounding,
/// snippets, draft and confidence.
pub fn write_response(out: &mut impl Write, resp: &AgentResponse) -> io::Result<()> {
    let issues = if resp.issues.is_empty() {
        NONE.to_string()
    } else {
        resp.issues.join(", ")
    };
    writeln!(out, "Issues: {issues}")?;

    writeln!(out, "\nPlan:")?;
    for (i, step) in resp.plan.iter().enumerate() {
        writeln!(out, "{}. {step}", i + 1)?;
    }

    writeln!(out, "\nTop Precedents (scored):")?;
    for r in resp.retrieved.iter().take(MAX_PROMPT_PRECEDENTS) {
        writeln!(out, "- {}: score={:.2}", r.document.citation(), r.score)?;
    }

    writeln!(out, "\nGrounding (claims -> citations):")?;
    for (claim, cites) in &resp.grounding {
        let cites = if cites.is_empty() {
            NONE.to_string()
        } else {
            cites.join(", ")
        };
        writeln!(out, "- {claim}\n  cites: {cites}")?;
    }

    if resp.grounding_snippets.iter().any(|g| !g.evidence.is_empty()) {
        writeln!(out, "\nGrounding snippets:")?;
        for item in &resp.grounding_snippets {
            writeln!(out, "- Claim: {}", item.claim)?;
            for ev in &item.evidence {
                writeln!(out, "  • {}: {}", ev.source, ev.snippet)?;
            }
        }
    }

    writeln!(out, "\nDraft:\n")?;
    writeln!(out, "{}", resp.draft)?;

    writeln!(out, "\nSuggested verdict confidence: {:.2}", resp.confidence)?;
    Ok(())
}

// ── Rankings and issues ──

pub fn write_ranking(out: &mut impl Write, ranked: &[RankedResult]) -> io::Result<()> {
    if ranked.is_empty() {
        writeln!(out, "(no precedents)")?;
        return Ok(());
    }
    for (i, r) in ranked.iter().enumerate() {
        let doc = &r.document;
        writeln!(out, "{:>2}. {:.4}  {}  [{}]", i + 1, r.score, doc.citation(), doc.id)?;
        writeln!(out, "    {}  tags: {}", doc.court, doc.tags.join(", "))?;
    }
    Ok(())
}

pub fn write_issues(
    out: &mut impl Write,
    tags: &[&str],
    labels: &[&str],
    plan: &[String],
) -> io::Result<()> {
    writeln!(out, "{:<8} {}", "Tags:", join_or_none(tags))?;
    writeln!(out, "{:<8} {}", "Labels:", join_or_none(labels))?;
    writeln!(out, "\nPlan:")?;
    for (i, step) in plan.iter().enumerate() {
        writeln!(out, "{}. {step}", i + 1)?;
    }
    Ok(())
}

// ── Feedback ──

pub fn write_boosts(out: &mut impl Write, state: &FeedbackState) -> io::Result<()> {
    let flags = state.style_flags();
    writeln!(out, "Style")?;
    writeln!(out, "  {:<26} {}", "style_bullets", flags.style_bullets)?;
    writeln!(out, "  {:<26} {}", "style_citations", flags.style_citations)?;
    writeln!(
        out,
        "  {:<26} {}",
        "emphasis_proportionality", flags.emphasis_proportionality
    )?;
    if !state.last_notes.is_empty() {
        writeln!(out, "  {:<26} {}", "last_notes", state.last_notes)?;
    }

    writeln!(out, "\nDocument boosts")?;
    if state.doc_boosts.is_empty() {
        writeln!(out, "  {NONE}")?;
    }
    for (id, boost) in &state.doc_boosts {
        writeln!(out, "  {id:<26} {boost:+.4}")?;
    }
    Ok(())
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}
