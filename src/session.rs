use std::{collections::VecDeque, path::Path, sync::Arc};

use chrono::NaiveDate;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info, warn};

use crate::{
    backend::{ChatBackend, ChatRequest, ChatResponse},
    history::{self, ExportOutcome},
    preferences::{ChangeEffect, PreferenceChange},
    storage::{self, StateStore},
    types::{ChatRole, ChatState, Choice, ConversationEntry, Preferences},
    view::MessageView,
};

pub const OFFLINE_REPLIES: [&str; 4] = [
    "That's an interesting question! 🤔",
    "Good question! I always enjoy talking about Python, JavaScript or ML! 💻",
    "I need a moment to think about that... a bit more detail would help! 📚",
    "Great question! Is there a specific topic you'd like to ask about? 🚀",
];

pub const REFUSAL_REPLY: &str = "Sorry, something went wrong! 😅";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// The service answered with a response.
    Answer,
    /// The service answered but reported `success: false`.
    Refused,
    /// The service was unreachable or its reply could not be read.
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub kind: ReplyKind,
    pub text: String,
    pub notify: bool,
    /// A queued message that is now in flight and must be sent next.
    pub next: Option<ChatRequest>,
}

/// Owns the conversation state, the rendered view and the in-flight bookkeeping.
pub struct ChatSession {
    state: ChatState,
    view: MessageView,
    store: Arc<dyn StateStore>,
    rng: StdRng,
    awaiting_reply: bool,
    queued: VecDeque<String>,
    /// The in-flight reply belongs to a conversation that was cleared.
    stale_reply: bool,
    save_error: Option<String>,
}

impl ChatSession {
    pub async fn open(store: Arc<dyn StateStore>, hour: u32) -> Self {
        let state = match storage::load_state(store.as_ref()).await {
            Ok(state) => state,
            Err(error) => {
                warn!(?error, "failed to load persisted state; using defaults");
                ChatState::default()
            }
        };
        info!(
            history = state.conversation_history.len(),
            tone = state.preferences.current_tone.as_str(),
            dark_mode = state.preferences.dark_mode,
            "session opened"
        );

        let mut view = MessageView::default();
        view.push(ChatRole::Bot, &history::greeting(hour));

        Self {
            state,
            view,
            store,
            rng: StdRng::from_entropy(),
            awaiting_reply: false,
            queued: VecDeque::new(),
            stale_reply: false,
            save_error: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.state.preferences
    }

    pub fn history(&self) -> &[ConversationEntry] {
        &self.state.conversation_history
    }

    pub fn view(&self) -> &MessageView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MessageView {
        &mut self.view
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn take_save_error(&mut self) -> Option<String> {
        self.save_error.take()
    }

    /// Renders and records the user's message. Returns the request to send
    /// now, or `None` when the input was blank or a reply is still pending
    /// (in which case the message is queued).
    pub fn submit(&mut self, input: &str) -> Option<ChatRequest> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        self.view.push(ChatRole::User, text);
        if self.state.preferences.auto_save {
            self.state
                .conversation_history
                .push(ConversationEntry::user(text));
        }

        if self.awaiting_reply {
            debug!(queued = self.queued.len() + 1, "reply pending; queueing message");
            self.queued.push_back(text.to_owned());
            return None;
        }

        Some(self.dispatch(text.to_owned()))
    }

    pub async fn complete(&mut self, result: anyhow::Result<ChatResponse>) -> Completion {
        self.view.remove_typing();
        let stale = std::mem::take(&mut self.stale_reply);

        let (kind, text, timestamp) = match result {
            Ok(ChatResponse {
                success: true,
                response: Some(text),
                timestamp,
            }) => (ReplyKind::Answer, text, timestamp),
            Ok(ChatResponse { success: false, .. }) => {
                warn!("chat service refused the message");
                (ReplyKind::Refused, REFUSAL_REPLY.to_owned(), None)
            }
            Ok(_) => {
                warn!("chat service reported success without a response");
                (ReplyKind::Offline, self.offline_reply(), None)
            }
            Err(error) => {
                warn!(?error, "chat service unreachable; using offline reply");
                (ReplyKind::Offline, self.offline_reply(), None)
            }
        };

        self.view.push(ChatRole::Bot, &text);

        let answered = kind == ReplyKind::Answer;
        if answered && !stale && self.state.preferences.auto_save {
            self.state
                .conversation_history
                .push(ConversationEntry::bot(text.clone(), timestamp));
            self.persist().await;
        }

        let next = match self.queued.pop_front() {
            Some(queued) => Some(self.dispatch(queued)),
            None => {
                self.awaiting_reply = false;
                None
            }
        };

        Completion {
            kind,
            text,
            notify: answered && self.state.preferences.sound_enabled,
            next,
        }
    }

    /// Submits `input` and drives it, plus anything queued behind it, to completion.
    pub async fn send_message(
        &mut self,
        backend: &dyn ChatBackend,
        input: &str,
    ) -> Vec<Completion> {
        let mut completions = Vec::new();
        let mut pending = self.submit(input);
        while let Some(request) = pending {
            let result = backend.send(request).await;
            let completion = self.complete(result).await;
            pending = completion.next.clone();
            completions.push(completion);
        }
        completions
    }

    pub async fn change_preference(&mut self, change: PreferenceChange) -> ChangeEffect {
        let effect = self.state.preferences.apply(change);
        debug!(?change, "preference changed");
        self.persist().await;
        effect
    }

    /// Empties the history and the view. Queued messages are dropped, and a
    /// reply still in flight is shown when it lands but not recorded.
    pub async fn clear_history(&mut self, hour: u32) {
        let removed = self.state.conversation_history.len();
        let dropped = self.queued.len();
        self.state.conversation_history.clear();
        self.queued.clear();
        self.view.clear();
        self.view.push(ChatRole::Bot, &history::greeting(hour));
        if self.awaiting_reply {
            self.stale_reply = true;
            self.view.show_typing();
        }
        self.persist().await;
        info!(removed, dropped, "conversation history cleared");
    }

    pub async fn export(&self, dir: &Path, date: NaiveDate) -> anyhow::Result<ExportOutcome> {
        history::export_history(&self.state.conversation_history, dir, date).await
    }

    fn dispatch(&mut self, message: String) -> ChatRequest {
        self.awaiting_reply = true;
        self.view.show_typing();
        ChatRequest {
            message,
            personality: self.state.preferences.current_tone.as_str().to_owned(),
        }
    }

    fn offline_reply(&mut self) -> String {
        OFFLINE_REPLIES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(OFFLINE_REPLIES[0])
            .to_owned()
    }

    async fn persist(&mut self) {
        match storage::save_state(self.store.as_ref(), &self.state).await {
            Ok(()) => self.save_error = None,
            Err(error) => {
                warn!(?error, "failed to save state");
                self.save_error = Some(error.to_string());
            }
        }
    }
}
