//! Application state and the generation pipeline.
//!
//! This module owns:
//!   - the immutable content catalog
//!   - the TOML tuning config (prompts, probabilities, completion options)
//!   - the optional OpenAI client
//!   - the repeat-suppression cache of recently served topics
//!
//! The pipeline per request: select content, build the prompt, call the
//! completion endpoint, validate the reply. Every failure along the way
//! degrades to a canned problem with `success:false`; nothing here ever
//! surfaces a 5xx.

use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::ContentCatalog;
use crate::config::{load_agent_config_from_env, AgentConfig};
use crate::domain::{GeneratedProblem, LengthClass, Selection};
use crate::openai::OpenAI;
use crate::prompt::{build_custom_prompt, build_prompt};
use crate::protocol::{GenerateRequest, GenerateResponse, GenerationMeta};
use crate::seeds::fallback_problem;
use crate::selection::{RecentCache, SelectionEngine, TOP_LEVEL};
use crate::util::trunc_for_log;
use crate::validate::{check_suitability, parse_problem, validate_length};

const DEFAULT_LENGTH_KEY: &str = "medium";
const DEFAULT_QUESTION_COUNT: u32 = 3;

pub struct AppState {
    pub catalog: ContentCatalog,
    pub config: AgentConfig,
    pub openai: Option<OpenAI>,
    pub recent: Mutex<RecentCache>,
}

/// The slice of a Selection that survives into response metadata.
struct SelectionSummary {
    level: String,
    length_key: String,
    topic: String,
    genre: String,
    subtype: Option<String>,
    speaker: Option<String>,
    trap: Option<String>,
    question_count: u32,
}

impl SelectionSummary {
    fn from_selection(sel: &Selection) -> Self {
        Self {
            level: sel.level.clone(),
            length_key: sel.length.key.clone(),
            topic: sel.topic.name.clone(),
            genre: sel.genre.label.clone(),
            subtype: sel.subtype.as_ref().map(|st| st.label.clone()),
            speaker: sel.speaker.as_ref().map(|sp| sp.label.clone()),
            trap: sel.trap.clone(),
            question_count: sel.question_count,
        }
    }
}

impl AppState {
    /// Build state from env: load config and catalog, init OpenAI, log the
    /// startup inventory.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_agent_config_from_env().unwrap_or_default();
        let catalog = ContentCatalog::from_env();

        for (category, topics) in &catalog.topics {
            info!(target: "generator", %category, topics = topics.len(), "Startup topic inventory");
        }
        info!(
            target: "generator",
            genres = catalog.genres.len(),
            length_classes = catalog.length_classes.len(),
            speakers = catalog.speakers.len(),
            traps = catalog.traps.all().len(),
            "Startup catalog inventory"
        );

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "dokkai_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "dokkai_backend", "OpenAI disabled (no OPENAI_API_KEY). Serving canned fallbacks.");
        }

        let recent = Mutex::new(RecentCache::from_config(&config.recent_cache));
        Self { catalog, config, openai, recent }
    }

    /// Resolve the requested length class, degrading to the default.
    fn resolve_length_class(&self, key: Option<&str>) -> LengthClass {
        let key = key.unwrap_or(DEFAULT_LENGTH_KEY);
        if let Some(lc) = self.catalog.length_class(key) {
            return lc.clone();
        }
        warn!(target: "generator", %key, "Unknown length key; using default");
        self.catalog
            .length_class(DEFAULT_LENGTH_KEY)
            .or_else(|| self.catalog.length_classes.first())
            .cloned()
            .unwrap_or_else(|| {
                crate::seeds::builtin_catalog()
                    .length_class(DEFAULT_LENGTH_KEY)
                    .expect("builtin catalog has the default length class")
                    .clone()
            })
    }

    /// Run the full pipeline for one request.
    #[instrument(level = "info", skip(self, req), fields(length = req.length_key.as_deref().unwrap_or(DEFAULT_LENGTH_KEY), custom = req.is_custom()))]
    pub async fn generate(&self, req: &GenerateRequest) -> GenerateResponse {
        let length = self.resolve_length_class(req.length_key.as_deref());
        let levels: Vec<String> = req
            .levels
            .clone()
            .filter(|ls| !ls.is_empty())
            .unwrap_or_else(|| vec![TOP_LEVEL.to_string()]);

        let (prompt_text, summary) = if req.is_custom() {
            // Handler guarantees a non-empty prompt on this path.
            let user_prompt = req.prompt.as_deref().unwrap_or("");
            let question_count = {
                let engine = SelectionEngine::new(&self.catalog, self.config.probabilities);
                let mut rng = rand::thread_rng();
                engine.question_count(&mut rng, None, &length, DEFAULT_QUESTION_COUNT)
            };
            let text = build_custom_prompt(
                user_prompt,
                &length.character_range,
                question_count,
                length.passage_kind,
                &self.config.prompts,
            );
            let summary = SelectionSummary {
                level: levels[0].clone(),
                length_key: length.key.clone(),
                topic: "(custom)".into(),
                genre: "(custom)".into(),
                subtype: None,
                speaker: None,
                trap: None,
                question_count,
            };
            (text, summary)
        } else {
            let sel = {
                let recent = self.recent.lock().await;
                let engine = SelectionEngine::new(&self.catalog, self.config.probabilities);
                let mut rng = rand::thread_rng();
                engine.select(
                    &mut rng,
                    &levels,
                    &length,
                    req.preferred_category.as_deref(),
                    &recent,
                    DEFAULT_QUESTION_COUNT,
                )
            };
            self.recent.lock().await.note(&sel.topic.name);
            info!(
                target: "generator",
                topic = %sel.topic.name,
                genre = %sel.genre.label,
                subtype = sel.subtype.as_ref().map(|st| st.label.as_str()).unwrap_or("-"),
                speaker = sel.speaker.as_ref().map(|sp| sp.label.as_str()).unwrap_or("-"),
                trap = sel.trap.is_some(),
                question_count = sel.question_count,
                "Selection drawn"
            );
            let text = build_prompt(&sel, &self.config.prompts);
            (text, SelectionSummary::from_selection(&sel))
        };

        let Some(oa) = &self.openai else {
            return self.fallback(&length, "generation unavailable: OPENAI_API_KEY is not set");
        };

        let raw = match oa
            .complete(&prompt_text, &self.config.prompts.system_instruction, &self.config.completion)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!(target: "generator", error = %e, kind = e.kind(), "Completion call failed; using canned fallback");
                return self.fallback(&length, &format!("completion failed ({})", e.kind()));
            }
        };

        let problem = match parse_problem(&raw) {
            Ok(p) => p,
            Err(e) => {
                error!(
                    target: "generator",
                    error = %e,
                    kind = e.kind(),
                    reply_preview = %trunc_for_log(&raw, 120),
                    "Model reply rejected; using canned fallback"
                );
                return self.fallback(&length, &format!("model reply rejected ({})", e.kind()));
            }
        };

        self.success_response(problem, summary, &length)
    }

    /// Wrap a validated problem with its advisory metadata.
    fn success_response(
        &self,
        problem: GeneratedProblem,
        summary: SelectionSummary,
        length: &LengthClass,
    ) -> GenerateResponse {
        let length_check = validate_length(&problem, &length.character_range);
        if !length_check.within_range {
            warn!(
                target: "generator",
                actual = length_check.actual_chars,
                expected = %length_check.expected_range,
                "Passage length out of range (serving anyway)"
            );
        }

        let suitability = (summary.level == TOP_LEVEL).then(|| check_suitability(&problem));
        if let Some(s) = &suitability {
            if !s.warnings.is_empty() {
                warn!(target: "generator", score = s.score, warnings = ?s.warnings, "Suitability heuristics flagged the passage");
            }
        }

        let question_count_mismatch = problem.questions.len() as u32 != summary.question_count;
        if question_count_mismatch {
            warn!(
                target: "generator",
                requested = summary.question_count,
                got = problem.questions.len(),
                "Question count mismatch (serving anyway)"
            );
        }

        let metadata = GenerationMeta {
            problem_id: Uuid::new_v4().to_string(),
            length_key: summary.length_key,
            level: summary.level,
            topic: summary.topic,
            genre: summary.genre,
            subtype: summary.subtype,
            speaker: summary.speaker,
            trap: summary.trap,
            requested_question_count: summary.question_count,
            question_count_mismatch,
            length_check,
            suitability,
        };

        GenerateResponse {
            success: true,
            problem: Some(problem),
            metadata: Some(metadata),
            message: None,
            error: None,
        }
    }

    /// Degraded success: HTTP 200, `success:false`, canned problem.
    fn fallback(&self, length: &LengthClass, message: &str) -> GenerateResponse {
        warn!(target: "generator", length = %length.key, %message, "Serving canned fallback problem");
        GenerateResponse {
            success: false,
            problem: Some(fallback_problem(&length.key, length.passage_kind)),
            metadata: None,
            message: Some(message.to_string()),
            error: None,
        }
    }
}
