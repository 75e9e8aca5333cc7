use leptos::prelude::*;

use crate::export::{self, ExportFormat};
use crate::models::{Accent, FontSize, Theme};
use crate::state::{clock_now, AppState, ChatAction, ToastKind};

/// Header with title, theme toggle, clear and export actions, and the
/// accent / font size pickers.
#[component]
pub fn Toolbar() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (confirm_clear, set_confirm_clear) = signal(false);
    let settings = move || state.chat.with(|s| s.settings);

    let export_as = move |format: ExportFormat| {
        let iso_now = clock_now().iso;
        let result = state
            .chat
            .with_untracked(|s| export::download(&s.turns, format, &iso_now));
        match result {
            Ok(()) => state.dispatch(ChatAction::Notify {
                kind: ToastKind::Success,
                message: format!("Chat exported as {}", format.extension().to_uppercase()),
            }),
            Err(e) => {
                log::error!("{e}");
                state.dispatch(ChatAction::Notify {
                    kind: ToastKind::Error,
                    message: "Export failed".to_string(),
                });
            }
        }
    };

    view! {
        <header class="toolbar">
            <h1 class="title">"Relay Chat"</h1>
            <div class="toolbar-actions">
                <button
                    title="Toggle theme"
                    on:click=move |_| state.dispatch(ChatAction::ToggleTheme)
                >
                    {move || if settings().theme == Theme::Dark { "☀" } else { "☾" }}
                </button>
                <button title="Export as text" on:click=move |_| export_as(ExportFormat::Text)>
                    "TXT"
                </button>
                <button title="Export as JSON" on:click=move |_| export_as(ExportFormat::Json)>
                    "JSON"
                </button>
                <button
                    title="Clear chat"
                    disabled=move || state.chat.with(|s| s.is_streaming)
                    on:click=move |_| set_confirm_clear.set(true)
                >
                    "Clear"
                </button>
            </div>
        </header>

        <div class="customization-panel">
            <label>
                "Accent "
                <select
                    prop:value=move || settings().accent.as_str()
                    on:change=move |ev| {
                        if let Some(accent) = Accent::parse(&event_target_value(&ev)) {
                            state.dispatch(ChatAction::SetAccent(accent));
                        }
                    }
                >
                    {Accent::ALL
                        .into_iter()
                        .map(|a| view! { <option value=a.as_str()>{a.label()}</option> })
                        .collect_view()}
                </select>
            </label>
            <label>
                "Font size "
                <select
                    prop:value=move || settings().font_size.as_str()
                    on:change=move |ev| {
                        if let Some(size) = FontSize::parse(&event_target_value(&ev)) {
                            state.dispatch(ChatAction::SetFontSize(size));
                        }
                    }
                >
                    {FontSize::ALL
                        .into_iter()
                        .map(|f| view! { <option value=f.as_str()>{f.label()}</option> })
                        .collect_view()}
                </select>
            </label>
        </div>

        {move || confirm_clear.get().then(|| view! {
            <div class="dialog-backdrop">
                <div class="dialog">
                    <h3>"Clear Chat History"</h3>
                    <p>"Are you sure you want to clear all messages? This action cannot be undone."</p>
                    <div class="dialog-actions">
                        <button on:click=move |_| set_confirm_clear.set(false)>"Cancel"</button>
                        <button
                            class="danger"
                            on:click=move |_| {
                                state.dispatch(ChatAction::Clear);
                                set_confirm_clear.set(false);
                            }
                        >
                            "Clear Chat"
                        </button>
                    </div>
                </div>
            </div>
        })}
    }
}

/// Transient notice in the corner; dismissal is scheduled by the reducer.
#[component]
pub fn ToastView() -> impl IntoView {
    let state = expect_context::<AppState>();

    move || {
        state.chat.with(|s| s.toast.clone()).map(|toast| {
            let class = match toast.kind {
                ToastKind::Success => "toast success",
                ToastKind::Error => "toast error",
            };
            let id = toast.id;
            view! {
                <div class=class on:click=move |_| state.dispatch(ChatAction::DismissToast(id))>
                    {toast.message}
                </div>
            }
        })
    }
}
