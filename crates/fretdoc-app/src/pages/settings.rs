// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use dioxus::prelude::*;

use fretdoc_core::config::{Language, UserType};
use fretdoc_core::types::FacingMode;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let config = state.read().config.clone();
    let max_mb = config.capture.max_bytes / (1024 * 1024);
    let accent = config.user_type.accent_color();
    let version = env!("CARGO_PKG_VERSION");
    let language = match config.language {
        Language::Fr => "fr",
        Language::En => "en",
    };
    let user_type = match config.user_type {
        UserType::Transporter => "transporter",
        UserType::Shipper => "shipper",
    };
    let facing = match config.camera_facing {
        FacingMode::Environment => "environment",
        FacingMode::User => "user",
    };

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Profile" }
                ChoiceRow {
                    label: "Language",
                    value: language,
                    options: vec![("fr", "Français"), ("en", "English")],
                    on_change: move |v: String| {
                        state.write().config.language = if v == "en" { Language::En } else { Language::Fr };
                    },
                }
                ChoiceRow {
                    label: "I am a",
                    value: user_type,
                    options: vec![("transporter", "Transporter"), ("shipper", "Shipper")],
                    on_change: move |v: String| {
                        state.write().config.user_type =
                            if v == "shipper" { UserType::Shipper } else { UserType::Transporter };
                    },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Capture" }
                ChoiceRow {
                    label: "Camera",
                    value: facing,
                    options: vec![("environment", "Back camera"), ("user", "Front camera")],
                    on_change: move |v: String| {
                        state.write().config.camera_facing =
                            if v == "user" { FacingMode::User } else { FacingMode::Environment };
                    },
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Photo quality" }
                    input {
                        r#type: "number",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.jpeg_quality}",
                        onchange: move |evt| {
                            if let Ok(q) = evt.value().parse::<u8>()
                                && (1..=100).contains(&q)
                            {
                                state.write().config.jpeg_quality = q;
                            }
                        },
                    }
                }
                p { style: "color: #888; font-size: 13px;",
                    "Photos up to {max_mb} MB in JPEG, PNG or WebP."
                }
            }

            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: {accent}; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                tracing::info!("settings saved");
                                save_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Fretdoc v{version}"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn ChoiceRow(
    label: &'static str,
    value: &'static str,
    options: Vec<(&'static str, &'static str)>,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            select {
                style: "padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                value: value,
                onchange: move |evt| on_change.call(evt.value()),
                for (key, text) in options {
                    option { value: key, selected: key == value, {text} }
                }
            }
        }
    }
}
