use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::{request_parcel_refresh, ApiHandle, ParcelRequest},
    domain::{summarize_parcels, AppState, Parcel},
    infra::parcel_api::ApiClientError,
    ui::{
        components::{
            kpi_card::KpiCard,
            parcel_table::{ParcelRow, ParcelTable},
            status_badge::{DeliveryBadge, PaymentBadge},
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::format_taka,
};

#[component]
pub fn ParcelsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let parcel_request = use_context::<ParcelRequest>();

    let mut selected = use_signal(|| None::<String>);
    let mut pending_delete = use_signal(|| None::<String>);

    use_hook(move || request_parcel_refresh(state, parcel_request, false));

    let detail = use_resource(move || async move {
        let id = selected()?;
        let client = api.client()?;
        match client.get_parcel(&id).await {
            Ok(parcel) => Some(parcel),
            Err(err) => {
                tracing::warn!(%id, %err, "could not refresh parcel details");
                None
            }
        }
    });

    let (parcels, has_identity) =
        state.with(|st| (st.parcels.clone(), st.settings.has_identity()));
    let loading = parcel_request.0.with(|pending| pending.is_some());
    let summary = summarize_parcels(&parcels);
    let now = OffsetDateTime::now_utc();

    let rows: Vec<ParcelRow> = parcels
        .iter()
        .map(|parcel| ParcelRow {
            id: parcel.id.clone(),
            title: parcel.title.clone(),
            type_label: parcel.type_label(),
            route: parcel.route_label(),
            price_label: format_taka(parcel.total_price),
            payment_status: parcel.payment_status,
            delivery_status: parcel.delivery_status,
            tracking_id: parcel.tracking_id.clone(),
            age_label: parcel
                .created_at()
                .map(|created| humanize_age(created, now))
                .unwrap_or_else(|| "unknown".to_string()),
        })
        .collect();

    let selected_id = selected();
    let local_copy = selected_id
        .as_ref()
        .and_then(|id| parcels.iter().find(|parcel| &parcel.id == id).cloned());
    let fresh_copy = (*detail.read()).clone().flatten();
    let selected_parcel = fresh_copy
        .filter(|parcel| Some(&parcel.id) == selected_id.as_ref())
        .or(local_copy);

    let pending_title = pending_delete().and_then(|id| {
        parcels
            .iter()
            .find(|parcel| parcel.id == id)
            .map(|parcel| parcel.title.clone())
    });

    let on_refresh = move |_: MouseEvent| {
        if !state.with(|st| st.settings.has_identity()) {
            push_toast(
                toasts,
                ToastKind::Warning,
                "Add your account email in Settings to see your parcels.",
            );
            return;
        }
        request_parcel_refresh(state, parcel_request, true);
    };

    let on_confirm_delete = move |_: MouseEvent| {
        let Some(id) = pending_delete() else {
            return;
        };
        pending_delete.set(None);

        let Some(client) = api.client() else {
            push_toast(
                toasts,
                ToastKind::Error,
                "Set a valid service URL in Settings first.",
            );
            return;
        };
        let email = state.with(|st| st.settings.user_email.trim().to_string());

        let mut state = state;
        spawn(async move {
            match client.delete_parcel(&id, &email).await {
                Ok(()) => {
                    state.with_mut(|st| st.parcels.retain(|parcel| parcel.id != id));
                    if selected().as_ref() == Some(&id) {
                        selected.set(None);
                    }
                    push_toast(toasts, ToastKind::Success, "Booking cancelled.");
                }
                Err(ApiClientError::NotFound(_)) => {
                    state.with_mut(|st| st.parcels.retain(|parcel| parcel.id != id));
                    push_toast(
                        toasts,
                        ToastKind::Warning,
                        "That parcel no longer exists on the server.",
                    );
                }
                Err(err) => {
                    push_toast(toasts, ToastKind::Error, format!("Delete failed: {err}"));
                }
            }
        });
    };

    rsx! {
        div { class: "space-y-8",
            div { class: "flex flex-wrap items-end justify-between gap-4",
                div {
                    h2 { class: "text-2xl font-semibold text-slate-100", "My parcels" }
                    p { class: "mt-1 text-sm {theme::TEXT_MUTED}",
                        "Bookings filed under your account, newest first."
                    }
                }
                button {
                    class: "{theme::BTN_SECONDARY}",
                    disabled: loading,
                    onclick: on_refresh,
                    if loading { "Refreshing…" } else { "Refresh" }
                }
            }

            if !has_identity {
                div { class: "{theme::PANEL} text-sm {theme::TEXT_MUTED}",
                    "No account email is set. Add one in Settings to load your bookings."
                }
            }

            div { class: "grid gap-4 sm:grid-cols-3",
                KpiCard {
                    title: "Parcels".to_string(),
                    value: summary.count.to_string(),
                    description: Some("Booked under this account".to_string()),
                }
                KpiCard {
                    title: "Awaiting payment".to_string(),
                    value: format_taka(summary.unpaid_total),
                    description: Some(format!("{} unpaid booking(s)", summary.unpaid_count)),
                }
                KpiCard {
                    title: "Delivered".to_string(),
                    value: summary.delivered_count.to_string(),
                    description: None,
                }
            }

            if let Some(title) = pending_title {
                div { class: "fade-in flex flex-wrap items-center justify-between gap-3 rounded-xl border border-rose-500/40 bg-rose-500/10 px-4 py-3 text-sm text-rose-100",
                    span { "Cancel the booking for \"{title}\"? This cannot be undone." }
                    div { class: "flex gap-2",
                        button { class: "{theme::BTN_DANGER}", onclick: on_confirm_delete, "Yes, cancel it" }
                        button {
                            class: "{theme::BTN_LINK}",
                            onclick: move |_| pending_delete.set(None),
                            "Keep"
                        }
                    }
                }
            }

            ParcelTable {
                rows,
                selected_id: selected_id.clone(),
                on_select: move |id: String| selected.set(Some(id)),
                on_delete: move |id: String| pending_delete.set(Some(id)),
            }

            if let Some(parcel) = selected_parcel {
                ParcelDetail { parcel }
            }
        }
    }
}

#[component]
fn ParcelDetail(parcel: Parcel) -> Element {
    let weight = parcel
        .parcel_weight
        .map(|kg| format!("{kg} kg"))
        .unwrap_or_else(|| "n/a".to_string());
    let booked = parcel
        .created_at()
        .map(|created| created.date().to_string())
        .unwrap_or_else(|| parcel.creation_date.clone());

    rsx! {
        section { class: "{theme::PANEL} fade-in space-y-4",
            div { class: "flex flex-wrap items-center justify-between gap-3",
                div {
                    h3 { class: "text-lg font-semibold {theme::TEXT_PRIMARY}", "{parcel.title}" }
                    p { class: "text-xs {theme::TEXT_MUTED}", "{parcel.tracking_id} · booked {booked}" }
                }
                div { class: "flex gap-2",
                    PaymentBadge { status: parcel.payment_status }
                    DeliveryBadge { status: parcel.delivery_status }
                }
            }
            dl { class: "grid gap-4 text-sm sm:grid-cols-3",
                DetailItem { label: "Type", value: parcel.type_label().to_string() }
                DetailItem { label: "Weight", value: weight }
                DetailItem { label: "Charge", value: format_taka(parcel.total_price) }
            }
            div { class: "grid gap-6 sm:grid-cols-2",
                div { class: "space-y-1 text-sm",
                    p { class: "{theme::SECTION_TITLE}", "From" }
                    p { class: "{theme::TEXT_PRIMARY}", "{parcel.sender_name} · {parcel.sender_contact}" }
                    p { class: "{theme::TEXT_MUTED}", "{parcel.pickup_address}, {parcel.sender_district}, {parcel.sender_region}" }
                    if !parcel.pickup_instruction.is_empty() {
                        p { class: "text-xs italic {theme::TEXT_MUTED}", "{parcel.pickup_instruction}" }
                    }
                }
                div { class: "space-y-1 text-sm",
                    p { class: "{theme::SECTION_TITLE}", "To" }
                    p { class: "{theme::TEXT_PRIMARY}", "{parcel.receiver_name} · {parcel.receiver_contact}" }
                    p { class: "{theme::TEXT_MUTED}", "{parcel.delivery_address}, {parcel.receiver_district}, {parcel.receiver_region}" }
                    if !parcel.delivery_instruction.is_empty() {
                        p { class: "text-xs italic {theme::TEXT_MUTED}", "{parcel.delivery_instruction}" }
                    }
                }
            }
        }
    }
}

#[component]
fn DetailItem(label: &'static str, value: String) -> Element {
    rsx! {
        div {
            dt { class: "{theme::LABEL}", "{label}" }
            dd { class: "mt-1 {theme::TEXT_PRIMARY}", "{value}" }
        }
    }
}

pub fn humanize_age(then: OffsetDateTime, now: OffsetDateTime) -> String {
    humanize_secs((now - then).whole_seconds().max(0) as u64)
}

pub fn humanize_secs(age: u64) -> String {
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}
