use std::sync::Arc;
use std::time::Instant;

use lexbrief_ai::PrecedentRanker;
use lexbrief_core::confidence::round2;
use lexbrief_core::grounding::PROBE_CLAIMS;
use lexbrief_core::{CaseFile, Evidence, RankedResult};
use lexbrief_llm::{DraftError, DraftRequest, Drafter, sanitize_output};
use lexbrief_store::{FeedbackState, FeedbackStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::prompt::{
    MAX_PROMPT_PRECEDENTS, SYSTEM_PROMPT, StylePreference, build_prompt, style_prefix,
};
use crate::stage::{Stage, StageTracker};

/// Documents retrieved per request.
pub const RETRIEVAL_K: usize = 5;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("retrieval failed: {0}")]
    Retrieval(anyhow::Error),
    #[error("drafting failed: {0}")]
    Draft(#[from] DraftError),
}

/// Sampling defaults applied when a request leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for DraftParams {
    fn default() -> Self {
        Self {
            temperature: 0.35,
            max_tokens: 1700,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRequest {
    pub case: CaseFile,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub style_preference: Option<StylePreference>,
}

/// Evidence gathered for one probe claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEvidence {
    pub claim: String,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Display labels for the detected issues.
    pub issues: Vec<String>,
    pub plan: Vec<String>,
    pub retrieved: Vec<RankedResult>,
    /// `(claim, citations)` pairs, one per probe claim.
    pub grounding: Vec<(String, Vec<String>)>,
    pub grounding_snippets: Vec<ClaimEvidence>,
    pub draft: String,
    pub confidence: f64,
    pub used_doc_ids: Vec<String>,
}

/// Runs one case through tagging, planning, retrieval, grounding, drafting
/// and scoring.
///
/// Holds no per-request state; one agent serves any number of requests.
pub struct Agent {
    ranker: PrecedentRanker,
    drafter: Arc<dyn Drafter>,
    defaults: DraftParams,
}

impl Agent {
    pub fn new(ranker: PrecedentRanker, drafter: Arc<dyn Drafter>) -> Self {
        Self {
            ranker,
            drafter,
            defaults: DraftParams::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: DraftParams) -> Self {
        self.defaults = defaults;
        self
    }

    fn feedback(&self) -> &Arc<dyn FeedbackStore> {
        self.ranker.feedback()
    }

    /// Produce a grounded brief for the case.
    ///
    /// A drafting failure ends the request with an error; nothing computed
    /// before it is returned.
    pub async fn run(&self, request: &AgentRequest) -> Result<AgentResponse, AgentError> {
        let start = Instant::now();
        let case = &request.case;
        let query = case.query();
        let mut stages = StageTracker::new();

        let tags = lexbrief_core::tag(&query);
        let issues: Vec<String> = lexbrief_core::issue_labels(&tags)
            .into_iter()
            .map(String::from)
            .collect();
        stages.enter(Stage::IssuesDetected);

        let plan = lexbrief_core::plan_steps(&tags);
        stages.enter(Stage::PlanBuilt);

        let retrieved = self
            .ranker
            .rank(&query, RETRIEVAL_K)
            .map_err(AgentError::Retrieval)?;
        stages.enter(Stage::Retrieved);

        let records = lexbrief_core::ground(PROBE_CLAIMS, &retrieved);
        let mut grounding = Vec::with_capacity(records.len());
        let mut grounding_snippets = Vec::with_capacity(records.len());
        for record in records {
            grounding.push((record.claim.clone(), record.citations));
            grounding_snippets.push(ClaimEvidence {
                claim: record.claim,
                evidence: record.evidence,
            });
        }
        stages.enter(Stage::Grounded);

        let prefix = style_prefix(self.feedback().style_flags(), request.style_preference);
        let draft_request = DraftRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt(case, &retrieved, &prefix),
            temperature: request.temperature.unwrap_or(self.defaults.temperature),
            max_tokens: request.max_tokens.unwrap_or(self.defaults.max_tokens),
        };
        let draft = sanitize_output(&self.drafter.draft(&draft_request).await?);
        stages.enter(Stage::Drafted);

        let confidence = round2(lexbrief_core::confidence(&query, &retrieved));
        stages.enter(Stage::Scored);

        let used_doc_ids = retrieved
            .iter()
            .take(MAX_PROMPT_PRECEDENTS)
            .map(|r| r.document.id.clone())
            .collect();
        stages.enter(Stage::Done);

        info!(
            title = %case.title,
            issues = issues.len(),
            retrieved = retrieved.len(),
            confidence,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "agent run complete"
        );
        Ok(AgentResponse {
            issues,
            plan,
            retrieved,
            grounding,
            grounding_snippets,
            draft,
            confidence,
            used_doc_ids,
        })
    }

    /// Record a rating for the documents a previous response used.
    ///
    /// Independent of any request in flight. Persistence failures are
    /// logged by the store and do not surface here.
    pub fn submit_feedback(
        &self,
        thumbs_up: bool,
        used_doc_ids: &[String],
        notes: &str,
    ) -> FeedbackState {
        self.feedback().record(thumbs_up, used_doc_ids, notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lexbrief_ai::{EmbeddingIndex, HashEncoder, RankerConfig};
    use lexbrief_core::Document;
    use lexbrief_store::MemoryFeedbackStore;
    use std::sync::Mutex;

    /// Returns a canned reply and remembers every request.
    struct ScriptedDrafter {
        reply: String,
        seen: Mutex<Vec<DraftRequest>>,
    }

    impl ScriptedDrafter {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<DraftRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Drafter for ScriptedDrafter {
        async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct FailingDrafter;

    #[async_trait]
    impl Drafter for FailingDrafter {
        async fn draft(&self, _request: &DraftRequest) -> Result<String, DraftError> {
            Err(DraftError::Server {
                status: 503,
                body: "overloaded".into(),
            })
        }
    }

    fn document(id: &str, year: i32, weight: f64, tags: &[&str], text: &str) -> Document {
        Document {
            id: id.into(),
            title: id.replace('-', " "),
            year,
            court: "Supreme Court of India".into(),
            level_weight: weight,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            text: text.into(),
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            document(
                "puttaswamy",
                2017,
                1.0,
                &["privacy", "proportionality"],
                "Privacy is a fundamental right under Article 21; any intrusion must meet legality, necessity and proportionality.",
            ),
            document(
                "aadhaar",
                2018,
                1.0,
                &["biometric", "privacy", "safeguards"],
                "Biometric authentication for welfare upheld with safeguards on data retention and oversight.",
            ),
            document(
                "bhasin",
                2020,
                1.0,
                &["internet", "expression"],
                "Indefinite internet shutdowns are impermissible; orders must be published and reviewed.",
            ),
            document(
                "dental",
                2016,
                0.9,
                &["trade"],
                "Regulation of admissions is a reasonable restriction on the freedom of trade.",
            ),
            document(
                "singhal",
                2015,
                1.0,
                &["expression"],
                "Vague speech offences chill expression and are struck down.",
            ),
            document(
                "iamai",
                2020,
                1.0,
                &["trade"],
                "A circular barring banks from crypto exchanges fails the test of least intrusive means.",
            ),
        ]
    }

    fn agent_with(drafter: Arc<dyn Drafter>, store: Arc<dyn FeedbackStore>) -> Agent {
        let index = EmbeddingIndex::build(corpus(), Arc::new(HashEncoder::default())).unwrap();
        let ranker = PrecedentRanker::new(
            index,
            store,
            RankerConfig {
                current_year: 2025,
                ..Default::default()
            },
        );
        Agent::new(ranker, drafter)
    }

    fn biometric_case() -> AgentRequest {
        AgentRequest {
            case: CaseFile {
                title: "2025 Policy: Mandatory Biometrics for Public Services".into(),
                facts: "Government policy requires all citizens to submit biometric data to access public services. \
                        A petitioner argues this violates privacy under Article 21."
                    .into(),
                issues_hint: vec!["Is privacy (Art. 21) infringed?".into()],
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn run_produces_complete_response() {
        let drafter = ScriptedDrafter::new("<think>weighing</think>\n1) Core Issues\n- privacy");
        let agent = agent_with(drafter.clone(), Arc::new(MemoryFeedbackStore::new()));

        let resp = agent.run(&biometric_case()).await.unwrap();

        assert!(resp.issues.contains(&"Article 21 privacy".to_string()));
        assert!(resp.issues.contains(&"Biometric intrusion".to_string()));
        assert!(resp.issues.len() <= 5);
        assert_eq!(
            resp.plan.first().map(String::as_str),
            Some("Confirm enabling law (legality) and legitimate aim.")
        );
        assert!(resp.plan.contains(&"Assess necessity (less intrusive means).".to_string()));
        assert_eq!(resp.retrieved.len(), RETRIEVAL_K);
        assert!(resp.retrieved.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(resp.used_doc_ids.len(), MAX_PROMPT_PRECEDENTS);
        assert_eq!(resp.used_doc_ids[0], resp.retrieved[0].document.id);
        assert_eq!(resp.draft, "1) Core Issues\n- privacy");
        assert!((0.5..=0.9).contains(&resp.confidence));
        assert_eq!(resp.confidence, round2(resp.confidence));
    }

    #[tokio::test]
    async fn grounding_covers_every_probe_claim() {
        let agent = agent_with(
            ScriptedDrafter::new("brief"),
            Arc::new(MemoryFeedbackStore::new()),
        );
        let resp = agent.run(&biometric_case()).await.unwrap();

        assert_eq!(resp.grounding.len(), PROBE_CLAIMS.len());
        assert_eq!(resp.grounding_snippets.len(), PROBE_CLAIMS.len());
        let (privacy_claim, cites) = &resp.grounding[0];
        assert_eq!(privacy_claim, PROBE_CLAIMS[0]);
        assert!(cites.contains(&"puttaswamy (2017)".to_string()));
        assert!(cites.windows(2).all(|w| w[0] <= w[1]));
        // The legality claim carries no key term.
        assert!(resp.grounding[3].1.is_empty());
        assert!(resp.grounding_snippets[3].evidence.is_empty());
        assert!(resp.grounding_snippets.iter().all(|g| g.evidence.len() <= 3));
    }

    #[tokio::test]
    async fn drafter_receives_defaults_and_prompt() {
        let drafter = ScriptedDrafter::new("brief");
        let agent = agent_with(drafter.clone(), Arc::new(MemoryFeedbackStore::new()));
        agent.run(&biometric_case()).await.unwrap();

        let seen = drafter.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, 0.35);
        assert_eq!(seen[0].max_tokens, 1700);
        assert_eq!(seen[0].system, SYSTEM_PROMPT);
        assert!(seen[0].prompt.starts_with(
            "Cite sources by title and year. Emphasize proportionality steps explicitly.\nCASE"
        ));
        assert_eq!(seen[0].prompt.matches("\n- ").count(), MAX_PROMPT_PRECEDENTS);
    }

    #[tokio::test]
    async fn request_overrides_sampling_and_style() {
        let drafter = ScriptedDrafter::new("brief");
        let agent = agent_with(drafter.clone(), Arc::new(MemoryFeedbackStore::new()));
        let request = AgentRequest {
            temperature: Some(0.7),
            max_tokens: Some(900),
            style_preference: Some(StylePreference::Prose),
            ..biometric_case()
        };
        agent.run(&request).await.unwrap();

        let seen = drafter.requests();
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].max_tokens, 900);
        assert!(
            seen[0]
                .prompt
                .starts_with("Write in tight prose paragraphs; use bullets sparingly.")
        );
    }

    #[tokio::test]
    async fn draft_failure_is_terminal() {
        let agent = agent_with(Arc::new(FailingDrafter), Arc::new(MemoryFeedbackStore::new()));
        let err = agent.run(&biometric_case()).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::Draft(DraftError::Server { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn empty_case_still_answers() {
        let agent = agent_with(
            ScriptedDrafter::new("brief"),
            Arc::new(MemoryFeedbackStore::new()),
        );
        let resp = agent.run(&AgentRequest::default()).await.unwrap();
        assert!(resp.issues.is_empty());
        assert_eq!(resp.plan.len(), 2);
        assert_eq!(resp.retrieved.len(), RETRIEVAL_K);
    }

    #[tokio::test]
    async fn feedback_shifts_style_and_ranking() {
        let store: Arc<dyn FeedbackStore> = Arc::new(MemoryFeedbackStore::new());
        let drafter = ScriptedDrafter::new("brief");
        let agent = agent_with(drafter.clone(), store.clone());

        let first = agent.run(&biometric_case()).await.unwrap();
        let top_id = first.retrieved[0].document.id.clone();
        let before = first.retrieved[0].score;

        let state = agent.submit_feedback(false, std::slice::from_ref(&top_id), "shorter please");
        assert_eq!(state.style_bullets, 1);
        assert_eq!(state.boost(&top_id), -0.02);
        assert_eq!(store.load().last_notes, "shorter please");

        let second = agent.run(&biometric_case()).await.unwrap();
        let after = second
            .retrieved
            .iter()
            .find(|r| r.document.id == top_id)
            .map(|r| r.score)
            .expect("down-voted document still retrieved");
        assert!((before - 0.02 - after).abs() < 1e-9);
        assert!(
            drafter.requests()[1]
                .prompt
                .starts_with("Use compact bullet points where helpful.")
        );
    }

    #[tokio::test]
    async fn response_serializes_with_flat_documents() {
        let agent = agent_with(
            ScriptedDrafter::new("brief"),
            Arc::new(MemoryFeedbackStore::new()),
        );
        let resp = agent.run(&biometric_case()).await.unwrap();
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["retrieved"][0]["score"].is_number());
        assert!(json["retrieved"][0]["title"].is_string());
        assert!(json["grounding"][0][0].is_string());
        assert!(json["grounding"][0][1].is_array());
        assert_eq!(json["draft"], "brief");
    }

    #[test]
    fn request_parses_style_preference() {
        let request: AgentRequest = serde_json::from_str(
            r#"{"case": {"title": "T", "facts": "F"}, "style_preference": "bullets"}"#,
        )
        .unwrap();
        assert_eq!(request.style_preference, Some(StylePreference::Bullets));
        assert!(request.temperature.is_none());
    }
}
