use std::time::SystemTime;

use dioxus::prelude::*;

use crate::{
    app::{persist_user_state, rebuild_api_client, request_parcel_refresh, ApiHandle, ParcelRequest},
    domain::{AppState, CacheResource},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        pages::parcels::humanize_secs,
        theme,
    },
    util::config::normalize_base_url,
};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let parcel_request = use_context::<ParcelRequest>();

    let initial = state.with(|st| st.settings.clone());

    let mut url_input = use_signal(|| initial.api_base_url.clone());
    let mut email_input = use_signal(|| initial.user_email.clone());
    let mut token_input = use_signal(|| initial.access_token.clone().unwrap_or_default());

    let cache_entries = state.with(|st| {
        let mut entries = st
            .cache
            .iter()
            .map(|(resource, time)| {
                let age = SystemTime::now()
                    .duration_since(*time)
                    .unwrap_or_default()
                    .as_secs();
                (cache_label(resource), humanize_secs(age))
            })
            .collect::<Vec<_>>();
        entries.sort();
        entries
    });

    let on_save = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let base_url = match normalize_base_url(&url_input()) {
                Ok(url) => url,
                Err(err) => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Error,
                        format!("Service URL is not valid: {err}"),
                    );
                    return;
                }
            };
            let email = email_input().trim().to_string();
            let token = Some(token_input().trim().to_string()).filter(|token| !token.is_empty());

            let previous = state.with(|st| st.settings.clone());
            state.with_mut(|st| {
                st.settings.api_base_url = base_url.clone();
                st.settings.user_email = email.clone();
                st.settings.access_token = token;
            });
            url_input.set(base_url);

            let settings = state.with(|st| st.settings.clone());
            if settings == previous {
                push_toast(toasts.clone(), ToastKind::Info, "Nothing changed.");
                return;
            }

            persist_user_state(&state);
            rebuild_api_client(api, &settings, toasts.clone());
            if settings.user_email != previous.user_email
                || settings.api_base_url != previous.api_base_url
            {
                state.with_mut(|st| st.forget_parcels());
            }
            request_parcel_refresh(state, parcel_request, true);
            push_toast(toasts.clone(), ToastKind::Success, "Settings saved.");
        }
    };

    let on_clear_cache = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_: MouseEvent| {
            state.with_mut(|st| st.cache.clear());
            if let Some(client) = api.client() {
                spawn(async move { client.clear_cache().await });
            }
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Cleared cached parcels. They will reload on the next visit.",
            );
        }
    };

    rsx! {
        div { class: "space-y-8",
            form {
                class: "{theme::PANEL}",
                onsubmit: on_save,
                h2 { class: "{theme::SECTION_TITLE}", "Account & service" }
                div { class: "mt-4 grid gap-4 sm:grid-cols-2",
                    div { class: "sm:col-span-2",
                        label { class: "{theme::LABEL}", "Service URL" }
                        input {
                            class: "{theme::INPUT}",
                            value: url_input(),
                            placeholder: "http://localhost:3000/",
                            oninput: move |evt| url_input.set(evt.value()),
                        }
                    }
                    div {
                        label { class: "{theme::LABEL}", "Account email" }
                        input {
                            class: "{theme::INPUT}",
                            r#type: "email",
                            value: email_input(),
                            placeholder: "you@example.com",
                            oninput: move |evt| email_input.set(evt.value()),
                        }
                    }
                    div {
                        label { class: "{theme::LABEL}", "Access token" }
                        input {
                            class: "{theme::INPUT}",
                            r#type: "password",
                            value: token_input(),
                            placeholder: "optional",
                            oninput: move |evt| token_input.set(evt.value()),
                        }
                    }
                }
                p { class: "mt-3 text-xs {theme::TEXT_MUTED}",
                    "Bookings are filed under the account email. The token is sent as a bearer credential when present."
                }
                div { class: "mt-4 flex gap-3",
                    button { class: "{theme::BTN_PRIMARY}", r#type: "submit", "Save" }
                }
            }

            section {
                class: "{theme::PANEL}",
                h2 { class: "{theme::SECTION_TITLE}", "Cache status" }
                if cache_entries.is_empty() {
                    p { class: "mt-3 text-sm text-slate-400", "No cached fetches yet." }
                } else {
                    ul {
                        class: "mt-3 space-y-2 text-sm text-slate-300",
                        for (label, age) in cache_entries {
                            li { class: "flex items-center justify-between rounded-lg border border-slate-800 bg-slate-900/60 px-3 py-2",
                                span { "{label}" }
                                span { class: "text-xs text-slate-500", "{age}" }
                            }
                        }
                    }
                }
                button {
                    class: "mt-4 rounded-lg border border-amber-500/40 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-amber-200 hover:bg-amber-500/10",
                    onclick: on_clear_cache,
                    "Clear cache"
                }
            }

            p { class: "text-center text-xs {theme::TEXT_MUTED}",
                "Parcel Desk v{APP_VERSION}"
            }
        }
    }
}

fn cache_label(resource: &CacheResource) -> String {
    match resource {
        CacheResource::Parcels(email) => format!("Parcels ({email})"),
    }
}
