use std::fmt;

/// Stages of one orchestration, in the only order they may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    IssuesDetected,
    PlanBuilt,
    Retrieved,
    Grounded,
    Drafted,
    Scored,
    Done,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::IssuesDetected,
        Stage::PlanBuilt,
        Stage::Retrieved,
        Stage::Grounded,
        Stage::Drafted,
        Stage::Scored,
        Stage::Done,
    ];

    /// The stage that must follow this one; `None` once done.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::IssuesDetected => Some(Stage::PlanBuilt),
            Stage::PlanBuilt => Some(Stage::Retrieved),
            Stage::Retrieved => Some(Stage::Grounded),
            Stage::Grounded => Some(Stage::Drafted),
            Stage::Drafted => Some(Stage::Scored),
            Stage::Scored => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::IssuesDetected => "issues_detected",
            Stage::PlanBuilt => "plan_built",
            Stage::Retrieved => "retrieved",
            Stage::Grounded => "grounded",
            Stage::Drafted => "drafted",
            Stage::Scored => "scored",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records progress through the stages of one request.
///
/// Entering any stage other than the successor of the current one is a
/// programming error and panics in debug builds.
#[derive(Debug)]
pub(crate) struct StageTracker {
    current: Option<Stage>,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self { current: None }
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        let expected = match self.current {
            None => Some(Stage::IssuesDetected),
            Some(s) => s.next(),
        };
        debug_assert_eq!(Some(stage), expected, "stage skipped or repeated");
        tracing::debug!(stage = %stage, "entered stage");
        self.current = Some(stage);
    }

    pub(crate) fn current(&self) -> Option<Stage> {
        self.current
    }
}
