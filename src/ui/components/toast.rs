use std::time::Duration;

use dioxus::prelude::*;

use crate::util::generate_id;

const DISMISS_AFTER: Duration = Duration::from_secs(6);
const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn palette(self) -> &'static str {
        match self {
            ToastKind::Info => "border-sky-500/40 bg-sky-500/10 text-sky-100",
            ToastKind::Success => "border-lime-400/40 bg-lime-400/10 text-lime-100",
            ToastKind::Warning => "border-amber-500/40 bg-amber-500/10 text-amber-100",
            ToastKind::Error => "border-rose-500/40 bg-rose-500/10 text-rose-100",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ToastKind::Info => "Info",
            ToastKind::Success => "Done",
            ToastKind::Warning => "Heads up",
            ToastKind::Error => "Error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
    /// How many identical messages arrived back to back.
    pub repeats: u32,
}

/// Queues a toast; warnings and errors are also written to the log.
pub fn push_toast(
    mut toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    let text = message.into();
    match kind {
        ToastKind::Warning => tracing::warn!(toast = %text),
        ToastKind::Error => tracing::error!(toast = %text),
        ToastKind::Info | ToastKind::Success => tracing::debug!(toast = %text),
    }
    toasts.with_mut(|entries| enqueue(entries, kind, text));
}

/// A repeat of the newest toast bumps its counter and gets a fresh id, which
/// restarts its dismiss timer. The oldest toast is dropped past `MAX_VISIBLE`.
fn enqueue(entries: &mut Vec<ToastMessage>, kind: ToastKind, text: String) {
    if let Some(last) = entries.last_mut() {
        if last.kind == kind && last.text == text {
            last.repeats += 1;
            last.id = generate_id("toast");
            return;
        }
    }
    if entries.len() >= MAX_VISIBLE {
        entries.remove(0);
    }
    entries.push(ToastMessage {
        id: generate_id("toast"),
        kind,
        text,
        repeats: 1,
    });
}

fn dismiss(mut toasts: Signal<Vec<ToastMessage>>, id: &str) {
    toasts.with_mut(|entries| entries.retain(|toast| toast.id != id));
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let entries = toasts();

    if entries.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        ul {
            class: "pointer-events-none fixed bottom-4 right-4 flex w-96 flex-col gap-3",
            for message in entries {
                ToastCard { key: "{message.id}", message, toasts }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let timer_id = message.id.clone();
    let _dismiss_timer = use_future(move || {
        let id = timer_id.clone();
        async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            dismiss(toasts, &id);
        }
    });

    let close_id = message.id.clone();
    let repeat_label = (message.repeats > 1).then(|| format!("×{}", message.repeats));

    rsx! {
        li {
            class: "fade-in pointer-events-auto flex items-start gap-3 rounded-xl border px-4 py-3 shadow-lg backdrop-blur {message.kind.palette()}",
            span { class: "mt-0.5 text-[10px] font-bold uppercase tracking-wide", "{message.kind.tag()}" }
            p { class: "flex-1 text-sm font-medium", "{message.text}" }
            if let Some(label) = repeat_label {
                span { class: "text-xs opacity-70", "{label}" }
            }
            button {
                class: "text-xs uppercase tracking-wide text-slate-300 hover:text-white",
                onclick: move |_| dismiss(toasts, &close_id),
                "Close"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_message_folds_into_one_toast() {
        let mut entries = Vec::new();
        enqueue(&mut entries, ToastKind::Error, "Failed to load parcels".to_string());
        let first_id = entries[0].id.clone();
        enqueue(&mut entries, ToastKind::Error, "Failed to load parcels".to_string());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].repeats, 2);
        assert_ne!(entries[0].id, first_id);

        enqueue(&mut entries, ToastKind::Warning, "Failed to load parcels".to_string());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn oldest_toast_makes_room() {
        let mut entries = Vec::new();
        for n in 0..=MAX_VISIBLE {
            enqueue(&mut entries, ToastKind::Info, format!("message {n}"));
        }
        assert_eq!(entries.len(), MAX_VISIBLE);
        assert_eq!(entries[0].text, "message 1");
    }
}
