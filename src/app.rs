use std::time::Duration;

use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, CacheResource, ClientSettings},
    infra::parcel_api::{CacheStatus, ParcelApiClient},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{BookPage, ParcelsPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        config::{apply_env_overrides, normalize_saved_url},
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// How long a fetched parcel list is shown before the dashboard refetches it.
pub const PARCELS_TTL: Duration = Duration::from_secs(5 * 60);

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Email whose parcel list should be (re)loaded; `None` when nothing is queued.
#[derive(Clone, Copy)]
pub struct ParcelRequest(pub Signal<Option<String>>);

/// Backend client shared by every page; `None` while the configured URL is unusable.
#[derive(Clone, Copy)]
pub struct ApiHandle(pub Signal<Option<ParcelApiClient>>);

impl ApiHandle {
    pub fn client(&self) -> Option<ParcelApiClient> {
        self.0.with(|client| client.clone())
    }
}

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/book")]
    Book {},
    #[route("/parcels")]
    Parcels {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    let toasts = use_signal(Vec::<ToastMessage>::new);
    let api = ApiHandle(use_signal(|| None::<ParcelApiClient>));
    let parcel_request = ParcelRequest(use_signal(|| None::<String>));

    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| {
                    st.apply_persisted(saved);
                    normalize_saved_url(&mut st.settings);
                });
            }
            state.with_mut(|st| apply_env_overrides(&mut st.settings));
            let settings = state.with(|st| st.settings.clone());
            rebuild_api_client(api, &settings, toasts);
        }
    });

    use_context_provider(|| state.clone());
    use_context_provider(|| toasts.clone());
    use_context_provider(|| api);
    use_context_provider(|| parcel_request);

    let _parcels = use_resource(move || async move {
        fetch_parcels(state.clone(), toasts.clone(), api, parcel_request).await
    });

    rsx! {
        document::Script { src: TAILWIND_CDN }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        tracing::warn!(%err, "failed to persist user state");
    }
}

pub fn rebuild_api_client(
    mut api: ApiHandle,
    settings: &ClientSettings,
    toasts: Signal<Vec<ToastMessage>>,
) {
    match ParcelApiClient::new(settings).map(|client| client.with_ttl(PARCELS_TTL)) {
        Ok(client) => {
            tracing::info!(base_url = %client.base_url(), "parcel backend configured");
            api.0.set(Some(client));
        }
        Err(err) => {
            api.0.set(None);
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Cannot reach the parcel service: {err}"),
            );
        }
    }
}

/// Queues a parcel-list refresh when the cached list is missing or older than the TTL.
pub fn request_parcel_refresh(state: Signal<AppState>, request: ParcelRequest, force: bool) {
    let mut pending = request.0;
    let email = state.with(|st| st.settings.user_email.trim().to_string());
    if email.is_empty() {
        tracing::debug!("no customer email configured; skipping parcel refresh");
        return;
    }

    let stale = state.with(|st| st.is_stale(&CacheResource::Parcels(email.clone()), PARCELS_TTL));
    if force || stale {
        tracing::debug!(%email, force, stale, "queueing parcel refresh");
        pending.set(Some(email));
    }
}

async fn fetch_parcels(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    request: ParcelRequest,
) -> Option<CacheStatus> {
    let mut pending = request.0;
    let email = pending()?;

    let Some(client) = api.client() else {
        pending.set(None);
        push_toast(
            toasts.clone(),
            ToastKind::Error,
            "Set a valid service URL in Settings first.",
        );
        return None;
    };

    match client.list_parcels(&email).await {
        Ok(payload) => {
            pending.set(None);
            tracing::info!(
                count = payload.data.len(),
                status = ?payload.status,
                "loaded parcels"
            );
            state.with_mut(|st| {
                st.parcels = payload.data.clone();
                st.cache
                    .record_fetch(CacheResource::Parcels(email.clone()), payload.fetched_at);
            });
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Showing your last known parcels; the service is not answering.",
                );
            }
            Some(payload.status)
        }
        Err(err) => {
            pending.set(None);
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load parcels: {err}"),
            );
            None
        }
    }
}

#[component]
pub fn Book() -> Element {
    rsx! { Shell { BookPage {} } }
}

#[component]
pub fn Parcels() -> Element {
    rsx! { Shell { ParcelsPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
