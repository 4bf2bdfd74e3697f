use chat_client_core::{Alignment, Message, MessageView};
use gloo_timers::callback::Timeout;
use leptos::ev;
use leptos::prelude::*;

use crate::state::AppState;

/// Delay before a freshly mounted bubble fades in.
const FADE_IN_MS: u32 = 100;

/// Main chat area with message history, typing indicator, and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();

    // Memos keep input edits from re-rendering the message list.
    let header = Memo::new(move |_| {
        state.chat.with(|s| match s.session_id() {
            Some(id) => format!("Session {}", id.as_str().chars().take(8).collect::<String>()),
            None => "Connecting…".to_string(),
        })
    });
    let messages = Memo::new(move |_| state.chat.with(|s| s.messages().to_vec()));
    let loading = Memo::new(move |_| state.chat.with(|s| s.is_loading()));
    let idle = Memo::new(move |_| messages.with(Vec::is_empty) && !loading.get());

    view! {
        <main class="chat-area">
            // Chat header
            <div class="chat-header">{move || header.get()}</div>

            // Messages
            <div class="messages-container">
                {move || {
                    if idle.get() {
                        view! { <EmptyState /> }.into_any()
                    } else {
                        view! {
                            <For
                                each=move || messages.get().into_iter().enumerate()
                                key=|(index, message)| (*index, message.clone())
                                let:entry
                            >
                                <MessageBubble message=entry.1 />
                            </For>
                            <Show when=move || loading.get()>
                                <TypingIndicator />
                            </Show>
                        }.into_any()
                    }
                }}
            </div>

            // Input area
            <ChatInput />
        </main>
    }
}

#[component]
fn EmptyState() -> impl IntoView {
    view! {
        <div class="empty-state">
            <div class="empty-icon">"🤖"</div>
            <h2>"How can I help you today?"</h2>
            <p>"Ask me anything about the news or start a conversation."</p>
        </div>
    }
}

/// A single chat message bubble, styled by role and theme.
#[component]
pub fn MessageBubble(message: Message) -> impl IntoView {
    let state = expect_context::<AppState>();
    let visible = RwSignal::new(false);
    Timeout::new(FADE_IN_MS, move || visible.set(true)).forget();

    let rendered = Memo::new(move |_| MessageView::render(&message, state.theme.get()));
    let row_class = move || {
        let view = rendered.get();
        let align = match view.align {
            Alignment::Start => "align-start",
            Alignment::End => "align-end",
        };
        let fade = if visible.get() { "visible" } else { "fading-in" };
        format!("{} {align} {fade}", view.row_class)
    };

    view! {
        <div class=row_class>
            <div class="avatar">{move || rendered.get().avatar}</div>
            <div class=move || rendered.get().bubble_class>
                <p class="message-text">{move || rendered.get().text}</p>
            </div>
        </div>
    }
}

/// Placeholder bubble shown while a reply is pending.
#[component]
fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="message bot align-start">
            <div class="avatar">"A"</div>
            <div class="typing-indicator">
                <span class="dot"></span>
                <span class="dot"></span>
                <span class="dot"></span>
            </div>
        </div>
    }
}

/// Chat input form with textarea and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();

    let is_sending = move || state.chat.with(|s| s.is_loading());

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            state.send_message();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    rows="1"
                    placeholder="Type your message..."
                    prop:value=move || state.chat.with(|s| s.input().to_string())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        state.chat.update(|s| s.set_input(text));
                    }
                    on:keydown=on_keydown
                    disabled=is_sending
                />
                <button
                    class="send-btn"
                    on:click=move |_| state.send_message()
                    disabled=move || !state.chat.with(|s| s.can_send())
                >
                    {move || if is_sending() { "Sending…" } else { "Send" }}
                </button>
            </div>
            <div class="input-hint">"Press Enter to send, Shift+Enter for new line"</div>
        </div>
    }
}
