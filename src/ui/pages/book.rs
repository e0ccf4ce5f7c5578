use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::{persist_user_state, request_parcel_refresh, ApiHandle, ParcelRequest},
    domain::{calculate_price, AppState, BookingForm, ParcelType, Party, ServiceAreas},
    ui::{
        components::{
            district_picker::DistrictPicker,
            price_estimate::PriceEstimate,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
    util::format_taka,
};

#[component]
pub fn BookPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let parcel_request = use_context::<ParcelRequest>();

    let submitting = use_signal(|| false);

    let form = state.with(|st| st.booking.clone());
    let estimate = form.estimate();
    let same_district = match (&form.sender.district, &form.receiver.district) {
        (Some(sender), Some(receiver)) => Some(sender == receiver),
        _ => None,
    };
    let weighted = form.parcel_type.is_weighted();
    let weight_placeholder = if weighted {
        "0.1 – 100"
    } else {
        "Not needed for documents"
    };

    let on_submit = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let mut submitting = submitting.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            if submitting() {
                return;
            }

            let (form, settings) = state.with(|st| (st.booking.clone(), st.settings.clone()));
            if !settings.has_identity() {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Add your account email in Settings before booking.",
                );
                return;
            }

            let payload = match form.prepare_submission(
                &settings.user_email,
                OffsetDateTime::now_utc(),
                ServiceAreas::embedded(),
            ) {
                Ok(payload) => payload,
                Err(err) => {
                    push_toast(toasts.clone(), ToastKind::Error, format!("Cannot book yet: {err}"));
                    return;
                }
            };

            let Some(client) = api.client() else {
                push_toast(
                    toasts.clone(),
                    ToastKind::Error,
                    "Set a valid service URL in Settings first.",
                );
                return;
            };

            submitting.set(true);
            spawn(async move {
                match client.create_parcel(&payload).await {
                    Ok(_) => {
                        let cleared = state.with_mut(|st| st.booking.reset_if_unchanged(&form));
                        if !cleared {
                            tracing::debug!("draft edited while booking; keeping it");
                        }
                        persist_user_state(&state);
                        request_parcel_refresh(state, parcel_request, true);
                        push_toast(
                            toasts.clone(),
                            ToastKind::Success,
                            format!(
                                "Booked! Tracking ID {} · charge {}",
                                payload.tracking_id,
                                format_taka(payload.total_price as f64)
                            ),
                        );
                    }
                    Err(err) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Error,
                            format!("Booking failed: {err}"),
                        );
                    }
                }
                submitting.set(false);
            });
        }
    };

    let on_save_draft = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |_: MouseEvent| {
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Draft saved.");
        }
    };

    let on_clear = {
        let mut state = state.clone();
        move |_: MouseEvent| {
            state.with_mut(|st| st.booking.reset());
            persist_user_state(&state);
        }
    };

    rsx! {
        div { class: "space-y-8",
            div {
                h2 { class: "text-2xl font-semibold text-slate-100", "Book a parcel" }
                p { class: "mt-1 text-sm {theme::TEXT_MUTED}",
                    "Door-to-door delivery across every district. The charge updates as you fill in the form."
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[2fr,1fr]",
                form {
                    class: "space-y-6",
                    onsubmit: on_submit,

                    div { class: "{theme::PANEL} space-y-4",
                        h3 { class: "{theme::SECTION_TITLE}", "Parcel" }
                        div { class: "flex gap-3",
                            ParcelTypeChoice { current: form.parcel_type, choice: ParcelType::Document }
                            ParcelTypeChoice { current: form.parcel_type, choice: ParcelType::NotDocument }
                        }
                        div { class: "grid gap-4 sm:grid-cols-2",
                            TextField {
                                label: "Parcel name",
                                value: form.title.clone(),
                                placeholder: "e.g. Winter clothes",
                                on_input: move |value: String| update_form(state, |form| form.title = value),
                            }
                            div {
                                label { class: "{theme::LABEL}", "Weight (kg)" }
                                input {
                                    class: "{theme::INPUT}",
                                    inputmode: "decimal",
                                    disabled: !weighted,
                                    value: "{form.weight_input}",
                                    placeholder: weight_placeholder,
                                    oninput: move |evt| {
                                        let value = evt.value();
                                        update_form(state, |form| form.weight_input = value);
                                    },
                                }
                            }
                        }
                    }

                    PartySection { party: Party::Sender, form: form.clone() }
                    PartySection { party: Party::Receiver, form: form.clone() }

                    div { class: "flex flex-wrap items-center gap-3",
                        button {
                            class: "{theme::BTN_PRIMARY}",
                            r#type: "submit",
                            disabled: submitting(),
                            if submitting() { "Booking…" } else { "Proceed to confirm booking" }
                        }
                        button {
                            class: "{theme::BTN_SECONDARY}",
                            r#type: "button",
                            onclick: on_save_draft,
                            "Save draft"
                        }
                        button {
                            class: "{theme::BTN_LINK}",
                            r#type: "button",
                            onclick: on_clear,
                            "Clear form"
                        }
                    }
                }

                aside { class: "space-y-4",
                    PriceEstimate { breakdown: estimate, same_district }
                    div { class: "rounded-xl border border-slate-800 bg-slate-900/40 p-4 text-xs {theme::TEXT_MUTED}",
                        p { class: "font-semibold uppercase tracking-wide", "Rates" }
                        ul { class: "mt-2 space-y-1",
                            for line in rate_card() {
                                li { "{line}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn rate_card() -> Vec<String> {
    let rate = |parcel_type, weight_kg, same_district| {
        format_taka(calculate_price(parcel_type, weight_kg, same_district) as f64)
    };
    vec![
        format!(
            "Document: {} within district, {} outside.",
            rate(ParcelType::Document, 0.0, true),
            rate(ParcelType::Document, 0.0, false)
        ),
        format!(
            "Non-document up to 3 kg: {} within district, {} outside.",
            rate(ParcelType::NotDocument, 1.0, true),
            rate(ParcelType::NotDocument, 1.0, false)
        ),
        format!(
            "A 5 kg parcel costs {} within district, {} outside.",
            rate(ParcelType::NotDocument, 5.0, true),
            rate(ParcelType::NotDocument, 5.0, false)
        ),
    ]
}

/// Applies an edit to the draft held in app state.
fn update_form(mut state: Signal<AppState>, edit: impl FnOnce(&mut BookingForm)) {
    state.with_mut(|st| edit(&mut st.booking));
}

#[component]
fn ParcelTypeChoice(current: ParcelType, choice: ParcelType) -> Element {
    let state = use_context::<Signal<AppState>>();
    rsx! {
        button {
            class: "{theme::choice_button(current == choice)}",
            r#type: "button",
            onclick: move |_| update_form(state, |form| form.parcel_type = choice),
            "{choice.label()}"
        }
    }
}

#[component]
fn PartySection(party: Party, form: BookingForm) -> Element {
    let state = use_context::<Signal<AppState>>();
    let details = form.party(party).clone();
    let (title, prefix, address_label, instruction_label) = match party {
        Party::Sender => ("Sender", "Sender", "Pickup address", "Pickup instruction"),
        Party::Receiver => (
            "Receiver",
            "Receiver",
            "Delivery address",
            "Delivery instruction",
        ),
    };

    rsx! {
        div { class: "{theme::PANEL} space-y-4",
            h3 { class: "{theme::SECTION_TITLE}", "{title} details" }
            div { class: "grid gap-4 sm:grid-cols-2",
                TextField {
                    label: "{prefix} name",
                    value: details.name.clone(),
                    on_input: move |value: String| {
                        update_form(state, |form| form.party_mut(party).name = value)
                    },
                }
                TextField {
                    label: "{prefix} contact",
                    value: details.contact.clone(),
                    placeholder: "01XXXXXXXXX",
                    on_input: move |value: String| {
                        update_form(state, |form| form.party_mut(party).contact = value)
                    },
                }
            }
            DistrictPicker {
                label: prefix,
                region: details.region.clone(),
                district: details.district.clone(),
                on_region: move |region: Option<String>| {
                    update_form(state, |form| form.set_region(party, region, ServiceAreas::embedded()))
                },
                on_district: move |district: Option<String>| {
                    update_form(state, |form| {
                        form.set_district(party, district, ServiceAreas::embedded())
                    })
                },
            }
            TextField {
                label: "{address_label}",
                value: details.address.clone(),
                on_input: move |value: String| {
                    update_form(state, |form| form.party_mut(party).address = value)
                },
            }
            div {
                label { class: "{theme::LABEL}", "{instruction_label}" }
                textarea {
                    class: "{theme::INPUT}",
                    rows: "2",
                    value: "{details.instruction}",
                    oninput: move |evt| {
                        let value = evt.value();
                        update_form(state, |form| form.party_mut(party).instruction = value);
                    },
                }
            }
        }
    }
}

#[component]
fn TextField(
    label: String,
    value: String,
    #[props(default)] placeholder: String,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            label { class: "{theme::LABEL}", "{label}" }
            input {
                class: "{theme::INPUT}",
                value: "{value}",
                placeholder: "{placeholder}",
                oninput: move |evt| on_input.call(evt.value()),
            }
        }
    }
}
