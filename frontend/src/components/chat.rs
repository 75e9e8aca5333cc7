use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::clipboard;
use crate::markdown;
use crate::state::{clock_now, AppState, ChatAction, ToastKind, REACTIONS};

/// Main chat area with message history, typing indicator, and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();

    let keyed_turns = move || {
        state.chat.with(|s| {
            s.turns
                .iter()
                .enumerate()
                .map(|(index, t)| (index, t.id))
                .collect::<Vec<_>>()
        })
    };
    let waiting_for_first_fragment = move || {
        state.chat.with(|s| {
            s.is_streaming && s.turns.last().is_some_and(|t| t.content.is_empty())
        })
    };

    view! {
        <main class="chat-area">
            <div class="messages-container">
                {move || {
                    if state.chat.with(|s| s.turns.is_empty()) {
                        view! {
                            <div class="empty-state">
                                <p class="empty-title">"Start a conversation"</p>
                                <p>"Ask anything and I'll help you out!"</p>
                            </div>
                        }.into_any()
                    } else {
                        view! {
                            <For
                                each=keyed_turns
                                key=|(_, id)| *id
                                let:entry
                            >
                                <MessageBubble index=entry.0 />
                            </For>
                        }.into_any()
                    }
                }}
                {move || {
                    waiting_for_first_fragment().then(|| view! {
                        <div class="typing-indicator">
                            <span></span><span></span><span></span>
                        </div>
                    })
                }}
            </div>

            <ChatInput />
        </main>
    }
}

/// A single chat message with its copy, edit, resend and reaction controls.
#[component]
fn MessageBubble(index: usize) -> impl IntoView {
    let state = expect_context::<AppState>();
    let turn = Memo::new(move |_| state.chat.with(|s| s.turns.get(index).cloned()));
    let is_editing = move || state.chat.with(|s| s.editing == Some(index));
    let locked = move || state.chat.with(|s| s.is_streaming);
    let (picker_open, set_picker_open) = signal(false);

    move || {
        let Some(turn) = turn.get() else {
            return ().into_any();
        };
        let css_class = if turn.is_user() { "message user" } else { "message assistant" };
        let is_user = turn.is_user();
        let id = turn.id;
        let content = turn.content.clone();

        let body = if is_editing() {
            view! { <EditBox index=index initial=content.clone() /> }.into_any()
        } else {
            let html = markdown::render(&content);
            view! { <div class="message-content" inner_html=html></div> }.into_any()
        };
        let is_copied = move || state.chat.with(|s| s.copied == Some(id));

        let reactions = turn
            .reactions
            .iter()
            .cloned()
            .map(|emoji| {
                let toggled = emoji.clone();
                view! {
                    <button
                        class="reaction"
                        on:click=move |_| state.dispatch(ChatAction::ToggleReaction {
                            index,
                            emoji: toggled.clone(),
                        })
                    >
                        {emoji}
                    </button>
                }
            })
            .collect_view();

        view! {
            <div class=css_class>
                <div class="role-label">{turn.role.clone()}</div>
                {body}
                <div class="reactions">{reactions}</div>
                <div class="message-actions">
                    <button title="Copy" on:click=move |_| copy_turn(state, id, content.clone())>
                        {move || if is_copied() { "Copied" } else { "Copy" }}
                    </button>
                    <button
                        disabled=locked
                        on:click=move |_| state.dispatch(ChatAction::StartEdit(index))
                    >
                        "Edit"
                    </button>
                    {is_user.then(|| view! {
                        <button
                            disabled=locked
                            on:click=move |_| state.dispatch(ChatAction::Resend {
                                index,
                                clock: clock_now(),
                            })
                        >
                            "Resend"
                        </button>
                    })}
                    <button on:click=move |_| set_picker_open.update(|open| *open = !*open)>
                        "React"
                    </button>
                </div>
                {move || picker_open.get().then(|| view! {
                    <div class="emoji-picker">
                        {REACTIONS.iter().map(|emoji| {
                            let emoji = emoji.to_string();
                            let picked = emoji.clone();
                            view! {
                                <button on:click=move |_| {
                                    state.dispatch(ChatAction::ToggleReaction {
                                        index,
                                        emoji: picked.clone(),
                                    });
                                    set_picker_open.set(false);
                                }>
                                    {emoji}
                                </button>
                            }
                        }).collect_view()}
                    </div>
                })}
            </div>
        }
        .into_any()
    }
}

fn copy_turn(state: AppState, id: u64, text: String) {
    spawn_local(async move {
        match clipboard::write_text(&text).await {
            Ok(()) => state.dispatch(ChatAction::Copied(id)),
            Err(e) => {
                log::error!("{e}");
                state.dispatch(ChatAction::Notify {
                    kind: ToastKind::Error,
                    message: "Failed to copy message".to_string(),
                });
            }
        }
    });
}

/// Inline editor replacing a message's content in place.
#[component]
fn EditBox(index: usize, initial: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (draft, set_draft) = signal(initial);

    view! {
        <div class="edit-box">
            <textarea
                prop:value=draft
                on:input=move |ev| set_draft.set(event_target_value(&ev))
            />
            <div class="edit-actions">
                <button on:click=move |_| state.dispatch(ChatAction::CancelEdit)>"Cancel"</button>
                <button
                    class="save-btn"
                    on:click=move |_| state.dispatch(ChatAction::SaveEdit {
                        index,
                        content: draft.get_untracked(),
                    })
                >
                    "Save"
                </button>
            </div>
        </div>
    }
}

/// Chat input form with textarea and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let is_sending = move || state.chat.with(|s| s.is_streaming);

    let send = move || {
        let text = input.get_untracked();
        if text.trim().is_empty() || is_sending() {
            return;
        }
        set_input.set(String::new());
        state.dispatch(ChatAction::Submit { text, clock: clock_now() });
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    rows="1"
                    placeholder="Type your message… (Enter to send, Shift+Enter for newline)"
                    prop:value=input
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=is_sending
                />
                <button
                    class="send-btn"
                    on:click=move |_| send()
                    disabled=move || is_sending() || input.get().trim().is_empty()
                >
                    {move || if is_sending() { "Sending…" } else { "Send" }}
                </button>
            </div>
        </div>
    }
}
