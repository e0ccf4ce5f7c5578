use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::AppState;
use crate::ui::theme;

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let account = state.with(|st| {
        let email = st.settings.user_email.trim();
        if email.is_empty() {
            "No account set".to_string()
        } else {
            email.to_string()
        }
    });

    rsx! {
        div { class: "min-h-screen bg-slate-950 text-slate-100 font-sans",
            header {
                class: "border-b border-slate-900/60 bg-slate-950/90 backdrop-blur px-6 py-4",
                div { class: "mx-auto flex max-w-6xl flex-wrap items-center justify-between gap-4",
                    div {
                        h1 { class: "text-xl font-semibold tracking-tight text-lime-300", "Parcel Desk" }
                        p { class: "text-xs text-slate-500", "{account}" }
                    }
                    nav { class: "flex gap-2 text-sm",
                        NavButton {
                            active: matches!(current_route, Route::Book {}),
                            onclick: move |_| { nav.push(Route::Book {}); },
                            label: "Book",
                        }
                        NavButton {
                            active: matches!(current_route, Route::Parcels {}),
                            onclick: move |_| { nav.push(Route::Parcels {}); },
                            label: "My parcels",
                        }
                        NavButton {
                            active: matches!(current_route, Route::Settings {}),
                            onclick: move |_| { nav.push(Route::Settings {}); },
                            label: "Settings",
                        }
                    }
                }
            }
            main { class: "mx-auto max-w-6xl px-6 py-10",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: "{theme::nav_button(active)}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
