use dioxus::prelude::*;

use super::status_badge::{DeliveryBadge, PaymentBadge};
use crate::domain::{DeliveryStatus, PaymentStatus};
use crate::ui::theme;

#[derive(Clone, PartialEq)]
pub struct ParcelRow {
    pub id: String,
    pub title: String,
    pub type_label: &'static str,
    pub route: String,
    pub price_label: String,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub tracking_id: String,
    pub age_label: String,
}

#[component]
pub fn ParcelTable(
    rows: Vec<ParcelRow>,
    selected_id: Option<String>,
    on_select: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let is_empty = rows.is_empty();
    let rendered_rows = rows
        .into_iter()
        .map(|row| {
            let selected = selected_id.as_ref().is_some_and(|id| id == &row.id);
            (row, selected)
        })
        .collect::<Vec<_>>();
    rsx! {
        div {
            class: "{theme::TABLE_CONTAINER}",
            table {
                class: "min-w-full {theme::TABLE_DIVIDER} text-sm",
                thead {
                    class: "{theme::TABLE_HEADER} text-left tracking-wide",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Parcel" }
                        th { class: "px-4 py-3 font-medium", "Type" }
                        th { class: "px-4 py-3 font-medium", "Route" }
                        th { class: "px-4 py-3 font-medium", "Charge" }
                        th { class: "px-4 py-3 font-medium", "Payment" }
                        th { class: "px-4 py-3 font-medium", "Delivery" }
                        th { class: "px-4 py-3 font-medium", "Booked" }
                        th { class: "px-4 py-3" }
                    }
                }
                tbody {
                    class: "{theme::TABLE_DIVIDER}",
                    for (row, selected) in rendered_rows {
                        ParcelRowView {
                            row,
                            selected,
                            on_select: on_select.clone(),
                            on_delete: on_delete.clone(),
                        }
                    }
                    if is_empty {
                        tr {
                            td {
                                class: "px-4 py-6 text-center text-sm {theme::TEXT_MUTED}",
                                colspan: "8",
                                "No parcels booked yet."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct ParcelRowViewProps {
    row: ParcelRow,
    selected: bool,
    on_select: EventHandler<String>,
    on_delete: EventHandler<String>,
}

#[component]
fn ParcelRowView(props: ParcelRowViewProps) -> Element {
    let row = props.row;
    let row_class = format!(
        "cursor-pointer transition-colors {}",
        if props.selected {
            "bg-lime-400/10"
        } else {
            "hover:bg-slate-800/40"
        }
    );
    let select_id = row.id.clone();
    let delete_id = row.id.clone();
    let can_delete = row.delivery_status.allows_cancellation();
    let delete_hint = if can_delete {
        "Cancel this booking"
    } else {
        "Already picked up"
    };
    rsx! {
        tr {
            class: row_class,
            onclick: move |_| props.on_select.call(select_id.clone()),
            td {
                class: "px-4 py-3 font-medium {theme::TEXT_PRIMARY}",
                "{row.title}"
                p { class: "text-[10px] {theme::TEXT_MUTED}", "{row.tracking_id}" }
            }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{row.type_label}" }
            td { class: "px-4 py-3 {theme::TEXT_PRIMARY}", "{row.route}" }
            td { class: "px-4 py-3 {theme::TEXT_PRIMARY}", "{row.price_label}" }
            td { class: "px-4 py-3", PaymentBadge { status: row.payment_status } }
            td { class: "px-4 py-3", DeliveryBadge { status: row.delivery_status } }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{row.age_label}" }
            td {
                class: "px-4 py-3 text-right",
                button {
                    class: "{theme::BTN_DANGER}",
                    disabled: !can_delete,
                    title: delete_hint,
                    onclick: move |evt| {
                        evt.stop_propagation();
                        props.on_delete.call(delete_id.clone());
                    },
                    "Delete"
                }
            }
        }
    }
}
