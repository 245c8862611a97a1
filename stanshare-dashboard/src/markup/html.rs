//! Dashboard HTML templates
//!
//! Contains the page chrome:
//! - Sidebar with navigation and user card
//! - Header with page title and avatar
//! - Settings modal
//! - Inline error panel shown when a page fails to load

use std::fmt::Write as _;

use super::escape_html;
use crate::session::UserInfo;
use crate::views::PageId;

pub const SETTINGS_MODAL: &str = "settingsModal";

pub(super) fn sidebar(user: &UserInfo, active_nav: &str, open: bool) -> String {
    let mut nav = String::new();
    for page in PageId::ALL {
        let class = if page.nav_key() == active_nav {
            "nav-item active"
        } else {
            "nav-item"
        };
        let _ = writeln!(
            nav,
            r#"                <a class="{class}" data-page="{file}">{label}</a>"#,
            file = page.file_name(),
            label = page.title(),
        );
    }

    format!(
        r#"    <aside class="{class}">
        <div class="sidebar-brand">StanShareAI</div>
        <nav class="sidebar-nav">
{nav}        </nav>
        <div class="user-card">
            <div class="avatar" id="userAvatar">{avatar}</div>
            <div>
                <div class="user-name" id="userName">{name}</div>
                <div class="user-email" id="userEmail">{email}</div>
            </div>
        </div>
        <a class="nav-item logout" data-action="logout">Logout</a>
    </aside>"#,
        class = if open { "sidebar active" } else { "sidebar" },
        avatar = escape_html(&user.avatar.to_string()),
        name = escape_html(&user.name),
        email = escape_html(&user.email),
    )
}

pub(super) fn header(title: &str, user: &UserInfo) -> String {
    format!(
        r#"        <header class="top-bar">
            <button class="menu-toggle" data-action="toggle-sidebar">&#9776;</button>
            <h2 id="pageTitle">{title}</h2>
            <div class="header-controls">
                <button class="btn btn-secondary" data-action="notifications">Notifications</button>
                <button class="btn btn-secondary" data-action="settings">Settings</button>
                <div class="avatar small" id="avatarSmall" data-action="profile">{avatar}</div>
            </div>
        </header>"#,
        title = escape_html(title),
        avatar = escape_html(&user.avatar.to_string()),
    )
}

pub(super) fn settings_modal(open: bool) -> String {
    format!(
        r#"    <div class="{class}" id="{SETTINGS_MODAL}">
        <div class="modal-content">
            <h3>Settings</h3>
            <p>API connection and display preferences are read from the session and configuration.</p>
            <button class="btn btn-secondary" data-action="close-modal" data-modal="{SETTINGS_MODAL}">Close</button>
        </div>
    </div>"#,
        class = if open { "modal active" } else { "modal" },
    )
}

/// Generic inline fallback shown in place of a page that failed to load
pub fn error_panel(message: &str) -> String {
    format!(
        r#"<div class="error-panel">
    <h3>Error loading page</h3>
    <p>{}</p>
</div>"#,
        escape_html(message)
    )
}
