// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Forms page — the four onboarding forms, with a badge on every field that
// was filled from a document.

use dioxus::prelude::*;

use fretdoc_core::form::{FieldOrigin, FormDomain};

use crate::state::AppState;

#[component]
pub fn Forms() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let mut domain = use_signal(|| FormDomain::Vehicle);
    let accent = state.read().config.user_type.accent_color();

    let current = *domain.read();
    let schema = current.schema();

    rsx! {
        div {
            h1 { "Onboarding" }

            // Domain tabs
            div { style: "display: flex; gap: 4px; margin: 12px 0; overflow-x: auto;",
                for d in FormDomain::ALL {
                    button {
                        key: "{d.label()}",
                        style: tab_style(d == current, accent),
                        onclick: move |_| domain.set(d),
                        {d.label()}
                    }
                }
            }

            for spec in schema.fields.iter() {
                {
                    let form = state.read();
                    let value = form.form(current).value(spec.name).to_owned();
                    let extracted = form.form(current).origin(spec.name) == Some(FieldOrigin::Extracted);
                    let name = spec.name;
                    rsx! {
                        div { key: "{name}", style: "margin: 10px 0;",
                            label { style: "display: flex; justify-content: space-between; font-size: 13px; color: #555;",
                                span { {spec.label} }
                                if extracted {
                                    span { style: "color: {accent}; font-size: 11px;", "from document" }
                                }
                            }
                            input {
                                style: "width: 100%; padding: 10px; border: 1px solid #ccc; border-radius: 8px; box-sizing: border-box;",
                                value: "{value}",
                                oninput: move |evt| {
                                    state.write().edit(current, name, evt.value());
                                },
                            }
                        }
                    }
                }
            }
        }
    }
}

fn tab_style(active: bool, accent: &str) -> String {
    if active {
        format!("padding: 8px 12px; border-radius: 16px; border: none; background: {accent}; color: white;")
    } else {
        "padding: 8px 12px; border-radius: 16px; border: 1px solid #ccc; background: white;".to_owned()
    }
}
