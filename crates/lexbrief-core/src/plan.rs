//! Deterministic analysis plan built from detected issues.

use crate::Issue;

pub const LEGALITY_STEP: &str = "Confirm enabling law (legality) and legitimate aim.";
pub const SUITABILITY_STEP: &str = "Assess suitability to the aim.";
pub const NECESSITY_STEP: &str = "Assess necessity (less intrusive means).";
pub const BALANCING_STEP: &str = "Assess balancing and safeguards (purpose, storage, oversight).";
pub const RELIGION_STEP: &str = "Consider Article 25 scope and any 25(2) justifications.";
pub const EXPRESSION_STEP: &str =
    "If Article 19(1)(a) is implicated, analyze reasonableness and proportionality.";
pub const TRADE_STEP: &str =
    "If Article 19(1)(g) is implicated, test reasonableness of restrictions.";
pub const EQUALITY_STEP: &str = "Check Article 14 arbitrariness and equal protection concerns.";
pub const OUTCOME_STEP: &str = "Draft positions and propose outcome.";

/// Issues that pull in the proportionality sub-steps.
const PROPORTIONALITY_TRIGGERS: [Issue; 4] = [
    Issue::Proportionality,
    Issue::Privacy,
    Issue::Biometric,
    Issue::Surveillance,
];

/// Build the ordered plan for a set of issue tags.
///
/// Always opens with the legality step and closes with the outcome step.
/// Duplicates are dropped, keeping the first occurrence.
pub fn plan_steps(issues: &[Issue]) -> Vec<String> {
    let mut steps = vec![LEGALITY_STEP];

    if PROPORTIONALITY_TRIGGERS.iter().any(|t| issues.contains(t)) {
        steps.extend([SUITABILITY_STEP, NECESSITY_STEP, BALANCING_STEP]);
    }
    for (issue, step) in [
        (Issue::Religion, RELIGION_STEP),
        (Issue::Expression, EXPRESSION_STEP),
        (Issue::Trade, TRADE_STEP),
        (Issue::Equality, EQUALITY_STEP),
    ] {
        if issues.contains(&issue) {
            steps.push(step);
        }
    }
    steps.push(OUTCOME_STEP);

    let mut unique: Vec<String> = Vec::with_capacity(steps.len());
    for step in steps {
        if !unique.iter().any(|s| s == step) {
            unique.push(step.to_string());
        }
    }
    unique
}
