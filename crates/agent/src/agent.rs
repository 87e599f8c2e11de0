//! Car advisor agent
//!
//! Main pipeline implementation combining all components.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use car_advisor_config::{Settings, FALLBACK_CURRENCY};
use car_advisor_core::{CatalogStore, SessionStore, Turn};
use car_advisor_llm::{GenerateRequest, GenerationParams, InlineImage, LlmBackend};
use car_advisor_retrieval::{CatalogRetrievalEngine, SemanticSearcher};
use car_advisor_text::{classify_intent, detect_region, QueryIntent};

use crate::context::ContextAssembler;
use crate::postprocess::{build_message_id, extract_referenced_ids};
use crate::AgentError;

/// Image payloads larger than this are rejected before any retrieval work
const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;
const ALLOWED_IMAGE_MIME: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// One conversational request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub query: String,
    /// Caller session; a fresh id is minted when absent
    pub session_id: Option<String>,
    /// Caller-supplied history; wins over the stored session when non-empty
    pub history: Vec<Turn>,
    pub image: Option<InlineImage>,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Pipeline result payload
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub intent: QueryIntent,
    /// Catalog ids the reply talks about, a subset of what was retrieved
    pub referenced_ids: Vec<i64>,
    pub message_id: String,
    pub session_id: String,
}

/// Conversational retrieval pipeline over the vehicle catalog
pub struct CarAdvisor {
    settings: Settings,
    sessions: Arc<dyn SessionStore>,
    llm: Arc<dyn LlmBackend>,
    engine: CatalogRetrievalEngine,
    assembler: ContextAssembler,
}

impl CarAdvisor {
    /// Advisor without a semantic index; the keyword tier covers fallback.
    pub fn new(
        settings: Settings,
        store: Arc<dyn CatalogStore>,
        sessions: Arc<dyn SessionStore>,
        llm: Arc<dyn LlmBackend>,
    ) -> Self {
        let semantic = SemanticSearcher::new(Arc::clone(&store));
        Self::with_semantic(settings, store, sessions, llm, semantic)
    }

    /// Advisor with a custom semantic searcher (preloaded or lazy index).
    pub fn with_semantic(
        settings: Settings,
        store: Arc<dyn CatalogStore>,
        sessions: Arc<dyn SessionStore>,
        llm: Arc<dyn LlmBackend>,
        semantic: SemanticSearcher,
    ) -> Self {
        let engine = CatalogRetrievalEngine::new(store, semantic, settings.retrieval.clone());
        let assembler = ContextAssembler::new(
            settings.context.max_entries,
            settings.session.history_window,
        );
        Self {
            settings,
            sessions,
            llm,
            engine,
            assembler,
        }
    }

    /// Run one query through the full pipeline.
    ///
    /// Degraded retrieval is invisible to the caller; input errors and
    /// gateway failures surface as typed `AgentError`s. A failed gateway
    /// call persists nothing to the session.
    #[instrument(skip_all, fields(session_id))]
    pub async fn converse(&self, request: ChatRequest) -> Result<ChatResponse, AgentError> {
        validate(&request)?;
        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        tracing::Span::current().record("session_id", session_id.as_str());

        let query = request.query.trim();

        // Independent analysis passes; they share no state.
        let intent = classify_intent(query);
        let region = detect_region(query);
        let currency_hint = region.as_ref().map(|hint| hint.currency.as_str());
        let currency = currency_hint.unwrap_or(FALLBACK_CURRENCY);
        debug!(%intent, currency, "query analyzed");

        let candidates = self
            .engine
            .retrieve(query, intent, currency_hint)
            .await
            .map_err(|e| AgentError::Retrieval(e.to_string()))?;
        debug!(candidates = candidates.len(), "retrieval complete");

        let history = if request.history.is_empty() {
            self.sessions
                .read(&session_id)
                .await
                .map_err(|e| AgentError::Session(e.to_string()))?
        } else {
            request.history.clone()
        };

        let context = self.assembler.build_context(&candidates, currency, intent);
        let mut turns = self.assembler.build_turns(&history, query);
        if let Some(image) = request.image {
            if let Some(last) = turns.last_mut() {
                *last = last.clone().with_image(image);
            }
        }

        let gen_request = GenerateRequest::new(context)
            .with_messages(turns)
            .with_params(GenerationParams {
                temperature: self.settings.gateway.temperature,
                top_p: self.settings.gateway.top_p,
                top_k: self.settings.gateway.top_k,
                max_output_tokens: self.settings.gateway.max_output_tokens,
            });
        let response = self.llm.generate(&gen_request).await?;

        let referenced_ids = extract_referenced_ids(&response.text, &candidates);
        let message_id = build_message_id(&response.text);
        info!(
            %intent,
            referenced = referenced_ids.len(),
            %message_id,
            "reply generated"
        );

        // Persist the exchange only after a successful generation.
        let user_turn = Turn::user(query);
        let assistant_turn = Turn::assistant(&response.text).with_message_id(&message_id);
        if let Err(err) = self
            .sessions
            .append(&session_id, vec![user_turn, assistant_turn])
            .await
        {
            warn!(error = %err, "session append failed, continuing without history update");
        }

        Ok(ChatResponse {
            text: response.text,
            intent,
            referenced_ids,
            message_id,
            session_id,
        })
    }
}

/// Input checks run before any retrieval work.
fn validate(request: &ChatRequest) -> Result<(), AgentError> {
    if request.query.trim().is_empty() {
        return Err(AgentError::InvalidInput(
            "query must not be empty".to_string(),
        ));
    }
    if let Some(image) = &request.image {
        if image.data.is_empty() {
            return Err(AgentError::InvalidInput(
                "image payload is empty".to_string(),
            ));
        }
        if image.data.len() > MAX_IMAGE_BYTES {
            return Err(AgentError::InvalidInput(
                "image exceeds the 4 MiB limit".to_string(),
            ));
        }
        if !ALLOWED_IMAGE_MIME.contains(&image.mime_type.as_str()) {
            return Err(AgentError::InvalidInput(format!(
                "unsupported image type: {}",
                image.mime_type
            )));
        }
    }
    Ok(())
}
