use dioxus::prelude::*;

use crate::domain::ServiceAreas;
use crate::ui::theme;

/// Region and district selects; an empty choice means "not selected yet".
#[component]
pub fn DistrictPicker(
    label: &'static str,
    region: Option<String>,
    district: Option<String>,
    on_region: EventHandler<Option<String>>,
    on_district: EventHandler<Option<String>>,
) -> Element {
    let areas = ServiceAreas::embedded();
    let regions: Vec<String> = areas.regions().map(str::to_string).collect();
    let districts: Vec<String> = region
        .as_deref()
        .map(|name| areas.districts_in(name).to_vec())
        .unwrap_or_default();
    let current_region = region.clone().unwrap_or_default();
    let current_district = district.clone().unwrap_or_default();
    let districts_disabled = region.is_none();

    rsx! {
        div { class: "grid gap-4 sm:grid-cols-2",
            div {
                label { class: "{theme::LABEL}", "{label} region" }
                select {
                    class: "{theme::INPUT}",
                    value: "{current_region}",
                    onchange: move |evt| on_region.call(non_empty(evt.value())),
                    option { value: "", selected: region.is_none(), "Select region" }
                    for name in regions {
                        option {
                            value: "{name}",
                            selected: name == current_region,
                            "{name}"
                        }
                    }
                }
            }
            div {
                label { class: "{theme::LABEL}", "{label} district" }
                select {
                    class: "{theme::INPUT}",
                    disabled: districts_disabled,
                    value: "{current_district}",
                    onchange: move |evt| on_district.call(non_empty(evt.value())),
                    option { value: "", selected: district.is_none(), "Select district" }
                    for name in districts {
                        option {
                            value: "{name}",
                            selected: name == current_district,
                            "{name}"
                        }
                    }
                }
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
