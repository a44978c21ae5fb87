//! WebSocket upgrade + message loop. Each connection owns at most one quiz
//! session; it lives as long as the socket. Every client message is parsed as
//! JSON and answered with a single JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic::apply_action;
use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::session::{Outcome, QuizSession};
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "checkstyle_trainer", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "checkstyle_trainer", "WebSocket connected");
  let mut session: Option<QuizSession> = None;

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let out = reply_text(&txt, &state, &mut session);
        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "checkstyle_trainer", error = %e, "WS send error");
          break;
        }
      }
      // Pings are answered by axum itself.
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "checkstyle_trainer", had_session = session.is_some(), "WebSocket disconnected");
}

/// Parse one text frame, dispatch it and serialize the single reply.
fn reply_text(txt: &str, state: &AppState, session: &mut Option<QuizSession>) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "checkstyle_trainer", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state, session)
    }
    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

/// Synchronous dispatch; the session never crosses an await point.
pub fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut Option<QuizSession>) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Start { mode, category } => {
      let s = state.new_session(mode, category);
      info!(target: "quiz", ?mode, filter = %s.filter(), deck_len = s.deck_len(), "WS session started");
      let reply = ServerWsMessage::Session { session: to_out(None, &s), outcome: Outcome::Applied.into() };
      *session = Some(s);
      reply
    }

    ClientWsMessage::Exit => {
      if session.take().is_some() {
        info!(target: "quiz", "WS session closed");
      }
      ServerWsMessage::Closed
    }

    other => {
      let Some(action) = other.into_action() else {
        return ServerWsMessage::Error { message: "Unsupported message.".into() };
      };
      match session.as_mut() {
        Some(s) => {
          let outcome = apply_action(s, action);
          ServerWsMessage::Session { session: to_out(None, s), outcome: outcome.into() }
        }
        None => ServerWsMessage::Error { message: "No quiz in progress; send a start message first.".into() },
      }
    }
  }
}
