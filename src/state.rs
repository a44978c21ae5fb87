//! Application state: the shared rule catalog, quiz tuning, and the store of
//! live HTTP quiz sessions.
//!
//! The catalog is assembled once at startup (built-in rules first, then any
//! extra rules from TOML) and is read-only afterwards. Each quiz session is
//! owned by exactly one store entry (HTTP) or one WebSocket connection.
//!
//! HTTP clients may leave without a `DELETE`; entries idle past the timeout
//! are swept when a new session is created, and a full store gives up its
//! least recently used entry.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{builtin_rules, Catalog};
use crate::config::{load_config_from_env, QuizCfg, TrainerConfig};
use crate::domain::{CategoryFilter, QuizMode, RuleRecord};
use crate::error::{ApiError, CatalogError};
use crate::session::QuizSession;

// Fewer than two options would leave nothing to choose between.
const MIN_OPTION_COUNT: usize = 2;

/// A stored HTTP session and the last time a request touched it.
pub struct StoredSession {
    session: QuizSession,
    last_used: Instant,
}

impl StoredSession {
    fn new(session: QuizSession, now: Instant) -> Self {
        Self { session, last_used: now }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub option_count: usize,
    pub max_sessions: usize,
    pub idle_timeout: Duration,
    pub sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
}

impl AppState {
    /// Build state from env: load config, assemble the catalog.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, CatalogError> {
        let cfg = load_config_from_env();
        let catalog = assemble_catalog(cfg.as_ref())?;
        let quiz = cfg.map(|c| c.quiz).unwrap_or_default();
        Ok(Self::from_parts(catalog, &quiz))
    }

    pub fn from_parts(catalog: Catalog, quiz: &QuizCfg) -> Self {
        let option_count = quiz.option_count.max(MIN_OPTION_COUNT);
        if option_count != quiz.option_count {
            warn!(target: "checkstyle_trainer", configured = quiz.option_count, used = option_count, "option_count raised to minimum");
        }
        for c in catalog.categories() {
            info!(target: "checkstyle_trainer", category = %c.id, rules = c.count, "Startup rule inventory");
        }
        Self {
            catalog: Arc::new(catalog),
            option_count,
            max_sessions: quiz.max_sessions,
            idle_timeout: Duration::from_secs(quiz.idle_timeout_secs),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A started session over a fresh deck. Not stored; the caller owns it.
    pub fn new_session(&self, mode: QuizMode, filter: CategoryFilter) -> QuizSession {
        let mut session = QuizSession::new(mode, self.catalog.clone(), filter, self.option_count);
        session.begin();
        session
    }

    /// Start a session and keep it in the HTTP store. Idle entries are swept
    /// first; if the store is still full the least recently used one goes.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self, mode: QuizMode, filter: CategoryFilter) -> Result<Uuid, ApiError> {
        if self.max_sessions == 0 {
            error!(target: "quiz", "Session store disabled (max_sessions = 0)");
            return Err(ApiError::SessionLimit(0));
        }
        let session = self.new_session(mode, filter);
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let swept = evict_idle(&mut sessions, now, self.idle_timeout);
        if swept > 0 {
            info!(target: "quiz", swept, "Idle sessions dropped");
        }
        if sessions.len() >= self.max_sessions {
            if let Some(old) = evict_least_recent(&mut sessions) {
                warn!(target: "quiz", id = %old, limit = self.max_sessions, "Session store full; dropped least recently used");
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(id, StoredSession::new(session, now));
        info!(target: "quiz", %id, live = sessions.len(), "Session created");
        Ok(id)
    }

    /// Run `f` against a stored session under the store's write lock.
    #[instrument(level = "debug", skip(self, f))]
    pub async fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut QuizSession) -> T) -> Result<T, ApiError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id).ok_or(ApiError::UnknownSession(id))?;
        stored.last_used = Instant::now();
        Ok(f(&mut stored.session))
    }

    /// Drop a stored session (the user left the quiz).
    #[instrument(level = "info", skip(self))]
    pub async fn remove_session(&self, id: Uuid) -> Result<(), ApiError> {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(_) => {
                info!(target: "quiz", %id, "Session closed");
                Ok(())
            }
            None => Err(ApiError::UnknownSession(id)),
        }
    }
}

fn evict_idle(sessions: &mut HashMap<Uuid, StoredSession>, now: Instant, idle: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| now.saturating_duration_since(s.last_used) < idle);
    before - sessions.len()
}

fn evict_least_recent(sessions: &mut HashMap<Uuid, StoredSession>) -> Option<Uuid> {
    let oldest = sessions.iter().min_by_key(|(_, s)| s.last_used).map(|(id, _)| *id)?;
    sessions.remove(&oldest);
    Some(oldest)
}

/// Built-in rules first; extra rules from config are appended in order.
/// A config rule never replaces an existing name; collisions are skipped.
pub fn assemble_catalog(cfg: Option<&TrainerConfig>) -> Result<Catalog, CatalogError> {
    let mut rules = builtin_rules();
    if let Some(cfg) = cfg {
        for rc in &cfg.rules {
            let name = rc.name.trim();
            if name.is_empty() {
                error!(target: "checkstyle_trainer", "Skipping config rule: missing name.");
                continue;
            }
            if rules.iter().any(|r| r.name == name) {
                error!(target: "checkstyle_trainer", %name, "Skipping config rule: name already in catalog.");
                continue;
            }
            let mut rule: RuleRecord = rc.clone().into();
            rule.name = name.to_string();
            rules.push(rule);
        }
    }
    Catalog::new(rules)
}
