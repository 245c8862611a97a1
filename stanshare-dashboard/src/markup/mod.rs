//! Dashboard markup
//!
//! Static page chrome for the StanShareAI dashboard.
//! Separated into HTML and CSS submodules for maintainability.
//!
//! # Architecture
//! - `html.rs`: sidebar, header, modals and the inline error panel
//! - `css.rs`: styling with CSS custom properties
//!
//! Page bodies come from the view registry; this module only wraps them.

mod css;
mod html;

use crate::session::UserInfo;

pub use html::error_panel;

/// Shell state needed to render the full document
pub struct ShellParts<'a> {
    pub page_title: &'a str,
    pub active_nav: &'a str,
    pub user: &'a UserInfo,
    pub sidebar_open: bool,
    pub open_modals: &'a [String],
    pub content: &'a str,
}

/// Generate the complete dashboard HTML page
pub fn render_shell(parts: &ShellParts<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>StanShareAI - {title}</title>
    <style>
{css}
    </style>
</head>
<body>
{sidebar}
    <main class="main-content">
{header}
        <div class="content-frame" id="contentFrame">
{content}
        </div>
    </main>
{settings}
</body>
</html>"#,
        title = escape_html(parts.page_title),
        css = css::STYLES,
        sidebar = html::sidebar(parts.user, parts.active_nav, parts.sidebar_open),
        header = html::header(parts.page_title, parts.user),
        content = parts.content,
        settings = html::settings_modal(parts.open_modals.iter().any(|m| m == html::SETTINGS_MODAL)),
    )
}

/// Escape text for interpolation into HTML
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub use html::SETTINGS_MODAL;
