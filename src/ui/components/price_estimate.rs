use dioxus::prelude::*;

use crate::domain::PriceBreakdown;
use crate::util::format_taka;

/// Live price panel next to the booking form.
#[component]
pub fn PriceEstimate(breakdown: Option<PriceBreakdown>, same_district: Option<bool>) -> Element {
    let Some(breakdown) = breakdown else {
        return rsx! {
            div {
                class: "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-3 text-slate-400",
                span { class: "text-xs font-semibold uppercase tracking-wide", "Delivery charge" }
                p { class: "mt-2 text-sm", "Pick the parcel type, districts and weight to see the price." }
            }
        };
    };

    let route = match same_district {
        Some(true) => "Within district",
        Some(false) => "Outside district",
        None => "",
    };
    let total = format_taka(breakdown.total as f64);
    let base = format_taka(breakdown.base_charge as f64);
    let extra_weight = format!("{:.2}", breakdown.extra_weight_kg);
    let extra_charge = format_taka(breakdown.extra_weight_charge as f64);
    let surcharge = format_taka(breakdown.cross_district_surcharge as f64);

    rsx! {
        div {
            class: "estimate-glow fade-in rounded-xl border border-lime-400/40 bg-lime-400/10 px-4 py-3 text-lime-100",
            div {
                class: "flex items-center justify-between",
                span { class: "text-xs font-semibold uppercase tracking-wide", "Delivery charge" }
                span { class: "text-xs font-semibold uppercase", "{route}" }
            }
            p { class: "mt-2 text-3xl font-semibold", "{total}" }
            ul {
                class: "mt-2 space-y-1 text-xs opacity-80",
                li { "Base charge: {base}" }
                if breakdown.extra_weight_charge > 0 {
                    li { "Extra {extra_weight} kg: {extra_charge}" }
                }
                if breakdown.cross_district_surcharge > 0 {
                    li { "Outside-district heavy parcel fee: {surcharge}" }
                }
            }
        }
    }
}
