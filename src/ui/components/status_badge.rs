use dioxus::prelude::*;

use crate::domain::{DeliveryStatus, PaymentStatus};

#[component]
pub fn PaymentBadge(status: PaymentStatus) -> Element {
    let color = match status {
        PaymentStatus::Paid => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
        PaymentStatus::Unpaid => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        PaymentStatus::Unknown => "bg-slate-700/40 text-slate-300 border-slate-600/60",
    };

    rsx! {
        span {
            class: "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{status.label()}"
        }
    }
}

#[component]
pub fn DeliveryBadge(status: DeliveryStatus) -> Element {
    let color = match status {
        DeliveryStatus::Delivered => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
        DeliveryStatus::InTransit | DeliveryStatus::RiderAssigned => {
            "bg-sky-500/10 text-sky-300 border-sky-500/40"
        }
        DeliveryStatus::NotCollected => "bg-slate-700/40 text-slate-200 border-slate-600/60",
        DeliveryStatus::Unknown => "bg-rose-500/10 text-rose-300 border-rose-500/40",
    };

    rsx! {
        span {
            class: "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{status.label()}"
        }
    }
}
