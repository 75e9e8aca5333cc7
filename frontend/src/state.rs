use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::models::{Accent, ChatTurn, FontSize, Settings, WireTurn};
use crate::storage;

pub const CONNECTION_ERROR: &str = "⚠️ **Connection Error**\n\nUnable to reach the server. Please check your connection and try again.";
pub const REACTIONS: [&str; 8] = ["❤️", "😂", "😮", "😢", "👏", "🔥", "⭐", "👍"];
const TOAST_MILLIS: u32 = 3_000;
const COPIED_MILLIS: u32 = 2_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Everything the UI renders. Only [`reduce`] mutates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    pub turns: Vec<ChatTurn>,
    pub settings: Settings,
    pub editing: Option<usize>,
    pub is_streaming: bool,
    pub toast: Option<Toast>,
    /// Turn whose content was just copied to the clipboard.
    pub copied: Option<u64>,
    toast_seq: u64,
}

impl ChatState {
    pub fn new(turns: Vec<ChatTurn>, settings: Settings) -> Self {
        Self { turns, settings, ..Self::default() }
    }
}

/// Wall-clock reading supplied by the caller so the reducer stays pure.
#[derive(Clone, Debug, PartialEq)]
pub struct Clock {
    pub now_ms: u64,
    pub iso: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatAction {
    Submit { text: String, clock: Clock },
    AppendFragment(String),
    StreamFinished,
    StreamFailed,
    StartEdit(usize),
    CancelEdit,
    SaveEdit { index: usize, content: String },
    Resend { index: usize, clock: Clock },
    ToggleReaction { index: usize, emoji: String },
    Copied(u64),
    ClearCopied(u64),
    Clear,
    ToggleTheme,
    SetAccent(Accent),
    SetFontSize(FontSize),
    Notify { kind: ToastKind, message: String },
    DismissToast(u64),
}

/// Work the reducer asks the outside world to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// POST these turns to the relay and stream the reply into the last turn.
    StreamReply(Vec<WireTurn>),
    DismissToastLater(u64),
    ClearCopiedLater(u64),
}

pub fn reduce(state: &mut ChatState, action: ChatAction) -> Vec<Command> {
    let mut commands = Vec::new();

    match action {
        ChatAction::Submit { text, clock } => {
            if let Some(command) = begin_exchange(state, &text, &clock) {
                commands.push(command);
            }
        }
        ChatAction::AppendFragment(fragment) => {
            if state.is_streaming {
                if let Some(last) = state.turns.last_mut() {
                    last.content.push_str(&fragment);
                }
            }
        }
        ChatAction::StreamFinished => state.is_streaming = false,
        ChatAction::StreamFailed => {
            if state.is_streaming {
                if let Some(last) = state.turns.last_mut() {
                    last.content = CONNECTION_ERROR.to_string();
                }
                state.is_streaming = false;
            }
            show_toast(state, ToastKind::Error, "Failed to send message", &mut commands);
        }
        ChatAction::StartEdit(index) => {
            if index < state.turns.len() && !state.is_streaming {
                state.editing = Some(index);
            }
        }
        ChatAction::CancelEdit => state.editing = None,
        ChatAction::SaveEdit { index, content } => {
            if state.is_streaming {
                return commands;
            }
            if let Some(turn) = state.turns.get_mut(index) {
                turn.content = content;
                state.editing = None;
                show_toast(state, ToastKind::Success, "Message updated", &mut commands);
            }
        }
        ChatAction::Resend { index, clock } => {
            let content = state
                .turns
                .get(index)
                .filter(|t| t.is_user())
                .map(|t| t.content.clone());
            if let Some(content) = content {
                if let Some(command) = begin_exchange(state, &content, &clock) {
                    commands.push(command);
                }
            }
        }
        ChatAction::ToggleReaction { index, emoji } => {
            if state.is_streaming {
                return commands;
            }
            if let Some(turn) = state.turns.get_mut(index) {
                if let Some(pos) = turn.reactions.iter().position(|r| *r == emoji) {
                    turn.reactions.remove(pos);
                } else {
                    turn.reactions.push(emoji);
                }
            }
        }
        ChatAction::Copied(id) => {
            state.copied = Some(id);
            show_toast(state, ToastKind::Success, "Message copied to clipboard", &mut commands);
            commands.push(Command::ClearCopiedLater(id));
        }
        ChatAction::ClearCopied(id) => {
            if state.copied == Some(id) {
                state.copied = None;
            }
        }
        ChatAction::Clear => {
            if !state.is_streaming {
                state.turns.clear();
                state.editing = None;
                show_toast(state, ToastKind::Success, "Chat cleared successfully", &mut commands);
            }
        }
        ChatAction::ToggleTheme => state.settings.theme = state.settings.theme.toggled(),
        ChatAction::SetAccent(accent) => state.settings.accent = accent,
        ChatAction::SetFontSize(size) => state.settings.font_size = size,
        ChatAction::Notify { kind, message } => show_toast(state, kind, &message, &mut commands),
        ChatAction::DismissToast(id) => {
            if state.toast.as_ref().is_some_and(|t| t.id == id) {
                state.toast = None;
            }
        }
    }

    commands
}

/// Appends a user turn and an empty assistant turn, returning the request for
/// everything up to and including the user turn.
fn begin_exchange(state: &mut ChatState, text: &str, clock: &Clock) -> Option<Command> {
    let content = text.trim();
    if content.is_empty() || state.is_streaming {
        return None;
    }

    let user_id = next_id(state, clock.now_ms);
    state.turns.push(ChatTurn {
        id: user_id,
        role: "user".to_string(),
        content: content.to_string(),
        created_at: clock.iso.clone(),
        reactions: Vec::new(),
    });
    let outgoing = state.turns.iter().map(ChatTurn::to_wire).collect();

    let assistant_id = next_id(state, clock.now_ms);
    state.turns.push(ChatTurn {
        id: assistant_id,
        role: "assistant".to_string(),
        content: String::new(),
        created_at: clock.iso.clone(),
        reactions: Vec::new(),
    });
    state.is_streaming = true;
    state.editing = None;

    Some(Command::StreamReply(outgoing))
}

fn next_id(state: &ChatState, now_ms: u64) -> u64 {
    let last = state.turns.iter().map(|t| t.id).max().unwrap_or(0);
    now_ms.max(last + 1)
}

fn show_toast(state: &mut ChatState, kind: ToastKind, message: &str, commands: &mut Vec<Command>) {
    state.toast_seq += 1;
    state.toast = Some(Toast {
        id: state.toast_seq,
        kind,
        message: message.to_string(),
    });
    commands.push(Command::DismissToastLater(state.toast_seq));
}

// ── Leptos binding ────────────────────────────────────────────────────────────

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    pub chat: RwSignal<ChatState>,
}

impl AppState {
    /// Create a new `AppState` from local storage and provide it in the
    /// current Leptos context. Every later change is written back.
    pub fn provide() -> Self {
        let chat = RwSignal::new(storage::load());
        let state = Self { chat };

        Effect::new(move |_| {
            chat.with(|s| storage::save(&s.turns, &s.settings));
        });

        provide_context(state);
        state
    }

    pub fn dispatch(&self, action: ChatAction) {
        let mut commands = Vec::new();
        self.chat.update(|s| commands = reduce(s, action));
        for command in commands {
            self.run(command);
        }
    }

    fn run(&self, command: Command) {
        let state = *self;
        match command {
            Command::StreamReply(messages) => spawn_local(async move {
                let result = api::stream_chat(messages, |fragment| {
                    state.dispatch(ChatAction::AppendFragment(fragment));
                })
                .await;
                match result {
                    Ok(()) => state.dispatch(ChatAction::StreamFinished),
                    Err(e) => {
                        log::error!("Chat request failed: {e}");
                        state.dispatch(ChatAction::StreamFailed);
                    }
                }
            }),
            Command::DismissToastLater(id) => {
                gloo_timers::callback::Timeout::new(TOAST_MILLIS, move || {
                    state.dispatch(ChatAction::DismissToast(id));
                })
                .forget();
            }
            Command::ClearCopiedLater(id) => {
                gloo_timers::callback::Timeout::new(COPIED_MILLIS, move || {
                    state.dispatch(ChatAction::ClearCopied(id));
                })
                .forget();
            }
        }
    }
}

/// Current time for [`ChatAction::Submit`] and [`ChatAction::Resend`].
pub fn clock_now() -> Clock {
    let date = js_sys::Date::new_0();
    Clock {
        now_ms: date.get_time() as u64,
        iso: date.to_iso_string().into(),
    }
}
