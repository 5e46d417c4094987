//! Request orchestrator.
//!
//! One [`Agent::run`] walks a case through fixed stages (see [`Stage`]):
//! issue detection, planning, retrieval, grounding, drafting and
//! confidence scoring. Feedback is a separate call that only touches the
//! feedback store.

mod agent;
pub use agent::{
    Agent, AgentError, AgentRequest, AgentResponse, ClaimEvidence, DraftParams, RETRIEVAL_K,
};

mod prompt;
pub use prompt::{
    MAX_PROMPT_PRECEDENTS, SYSTEM_PROMPT, StylePreference, UnknownStyle, build_prompt,
    style_prefix,
};

mod stage;
pub use stage::Stage;
