//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CategoryCount;
use crate::domain::{Category, CategoryFilter, QuizMode, RuleRecord};
use crate::session::{Ignored, Outcome, QuizSession, ScoreBand, SessionStatus};

/// User actions on a running quiz. Shared by HTTP (`action` tag) and the
/// engine dispatch in `logic`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuizAction {
    Reveal,
    Know,
    DontKnow,
    Select { option: String },
    Next,
    Prev,
    Restart,
    ChangeCategory {
        #[serde(default)]
        category: CategoryFilter,
    },
}

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Start {
        #[serde(default)]
        mode: QuizMode,
        #[serde(default)]
        category: CategoryFilter,
    },
    Reveal,
    Know,
    DontKnow,
    Select {
        option: String,
    },
    Next,
    Prev,
    Restart,
    ChangeCategory {
        #[serde(default)]
        category: CategoryFilter,
    },
    Exit,
}

impl ClientWsMessage {
    /// The engine action this message carries, if any.
    pub fn into_action(self) -> Option<QuizAction> {
        match self {
            ClientWsMessage::Reveal => Some(QuizAction::Reveal),
            ClientWsMessage::Know => Some(QuizAction::Know),
            ClientWsMessage::DontKnow => Some(QuizAction::DontKnow),
            ClientWsMessage::Select { option } => Some(QuizAction::Select { option }),
            ClientWsMessage::Next => Some(QuizAction::Next),
            ClientWsMessage::Prev => Some(QuizAction::Prev),
            ClientWsMessage::Restart => Some(QuizAction::Restart),
            ClientWsMessage::ChangeCategory { category } => Some(QuizAction::ChangeCategory { category }),
            ClientWsMessage::Ping | ClientWsMessage::Start { .. } | ClientWsMessage::Exit => None,
        }
    }
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionOut,
        outcome: OutcomeOut,
    },
    Closed,
    Error {
        message: String,
    },
}

/// Whether the last action changed anything, and if not, why.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OutcomeOut {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<Ignored>,
}

impl From<Outcome> for OutcomeOut {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::Applied => OutcomeOut { applied: true, ignored: None },
            Outcome::Ignored(reason) => OutcomeOut { applied: false, ignored: Some(reason) },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreOut {
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    pub band: ScoreBand,
}

/// The current question as the user may see it. Fields that would give the
/// answer away stay `None` until the question is revealed.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub category: Category,
    pub name: Option<String>,
    pub where_used: Option<String>,
    pub what_it_checks: Option<String>,
    pub why_it_matters: Option<String>,
    pub common_violation: Option<String>,
    pub correct_usage: Option<String>,
}

/// Read-only snapshot of a quiz session for the presentation layer.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub mode: QuizMode,
    pub category: CategoryFilter,
    pub status: SessionStatus,
    pub position: usize,
    pub deck_len: usize,
    pub score: ScoreOut,
    pub revealed: bool,
    pub question: Option<QuestionOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

fn question_out(mode: QuizMode, revealed: bool, r: &RuleRecord) -> QuestionOut {
    let show = |s: &String| Some(s.clone());
    let full = QuestionOut {
        category: r.category,
        name: show(&r.name),
        where_used: show(&r.where_used),
        what_it_checks: show(&r.what_it_checks),
        why_it_matters: show(&r.why_it_matters),
        common_violation: show(&r.common_violation),
        correct_usage: show(&r.correct_usage),
    };
    if revealed {
        return full;
    }
    match mode {
        QuizMode::Recall => QuestionOut {
            category: r.category,
            name: full.name,
            where_used: None,
            what_it_checks: None,
            why_it_matters: None,
            common_violation: None,
            correct_usage: None,
        },
        QuizMode::Choice => QuestionOut {
            category: r.category,
            name: None,
            where_used: None,
            what_it_checks: full.what_it_checks,
            why_it_matters: full.why_it_matters,
            common_violation: None,
            correct_usage: None,
        },
    }
}

/// Convert the live session (internal) to the public snapshot.
pub fn to_out(id: Option<Uuid>, s: &QuizSession) -> SessionOut {
    let score = s.score();
    let question = match s.status() {
        SessionStatus::InProgress => s.current().map(|r| question_out(s.mode(), s.revealed(), r)),
        SessionStatus::NotStarted | SessionStatus::Finished | SessionStatus::Empty => None,
    };
    SessionOut {
        id,
        mode: s.mode(),
        category: s.filter().clone(),
        status: s.status(),
        position: s.position(),
        deck_len: s.deck_len(),
        score: ScoreOut {
            correct: score.correct,
            total: score.total,
            percent: score.percent(),
            band: score.band(),
        },
        revealed: s.revealed(),
        question,
        options: s.options().map(|o| o.labels().to_vec()),
        selected: s.selected().map(str::to_string),
        correct: s.answered_correctly(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct RulesQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct RulesOut {
    pub count: usize,
    pub rules: Vec<RuleRecord>,
}

#[derive(Serialize)]
pub struct CategoriesOut {
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Deserialize)]
pub struct StartIn {
    #[serde(default)]
    pub mode: QuizMode,
    #[serde(default)]
    pub category: CategoryFilter,
}

#[derive(Serialize)]
pub struct ActionOut {
    pub session: SessionOut,
    pub outcome: OutcomeOut,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn started(mode: QuizMode) -> QuizSession {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let mut s = QuizSession::new(mode, catalog, CategoryFilter::All, 4).with_rng(StdRng::seed_from_u64(77));
        s.begin();
        s
    }

    #[test]
    fn recall_question_hides_details_until_revealed() {
        let mut s = started(QuizMode::Recall);
        let out = to_out(None, &s);
        let q = out.question.unwrap();
        assert!(q.name.is_some());
        assert!(q.what_it_checks.is_none() && q.correct_usage.is_none());
        assert!(out.options.is_none());

        s.reveal();
        let q = to_out(None, &s).question.unwrap();
        assert!(q.what_it_checks.is_some() && q.common_violation.is_some());
    }

    #[test]
    fn choice_question_hides_name_until_answered() {
        let mut s = started(QuizMode::Choice);
        let out = to_out(None, &s);
        let q = out.question.unwrap();
        assert!(q.name.is_none());
        assert!(q.what_it_checks.is_some() && q.why_it_matters.is_some());
        assert_eq!(out.options.as_ref().map(Vec::len), Some(4));

        let correct = s.options().unwrap().correct().to_string();
        s.select_option(&correct);
        let out = to_out(None, &s);
        assert_eq!(out.question.unwrap().name.as_deref(), Some(correct.as_str()));
        assert_eq!(out.correct, Some(true));
        assert_eq!(out.selected.as_deref(), Some(correct.as_str()));
    }

    #[test]
    fn ws_messages_parse_from_tagged_json() {
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"start","mode":"choice","category":"Java-Specific"}"#).unwrap();
        match m {
            ClientWsMessage::Start { mode, category } => {
                assert_eq!(mode, QuizMode::Choice);
                assert_eq!(category, CategoryFilter::Only(Category::JavaSpecific));
            }
            other => panic!("unexpected {other:?}"),
        }
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"select","option":"NeedBraces"}"#).unwrap();
        assert!(matches!(m.into_action(), Some(QuizAction::Select { option }) if option == "NeedBraces"));

        let a: QuizAction = serde_json::from_str(r#"{"action":"dont_know"}"#).unwrap();
        assert!(matches!(a, QuizAction::DontKnow));
    }

    #[test]
    fn outcome_serializes_reason_only_when_ignored() {
        let applied = serde_json::to_value(OutcomeOut::from(Outcome::Applied)).unwrap();
        assert_eq!(applied, serde_json::json!({ "applied": true }));
        let ignored = serde_json::to_value(OutcomeOut::from(Outcome::Ignored(Ignored::AlreadyAnswered))).unwrap();
        assert_eq!(ignored, serde_json::json!({ "applied": false, "ignored": "already_answered" }));
    }
}
