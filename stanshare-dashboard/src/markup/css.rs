//! Dashboard CSS styles
//!
//! Styling for the dashboard shell and the built-in pages.
//! Uses CSS custom properties (variables) for theming; the status and score
//! colour classes match the names produced by `stanshare_client::format`.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0f172a;
    --panel: #1e293b;
    --border: #334155;
    --text: #e2e8f0;
    --text-dim: #94a3b8;
    --green: #4ade80;
    --yellow: #facc15;
    --orange: #fb923c;
    --red: #f87171;
    --blue: #60a5fa;
    --sidebar-width: 240px;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    min-height: 100vh;
    display: flex;
}

/* Sidebar */
.sidebar {
    width: var(--sidebar-width);
    background: var(--panel);
    border-right: 1px solid var(--border);
    display: flex;
    flex-direction: column;
    padding: 20px 12px;
    min-height: 100vh;
}

.sidebar-brand { font-size: 20px; font-weight: 700; padding: 0 8px 20px; }
.sidebar-nav { display: flex; flex-direction: column; gap: 4px; flex: 1; }

.nav-item {
    display: block;
    padding: 10px 12px;
    border-radius: 6px;
    color: var(--text-dim);
    text-decoration: none;
    cursor: pointer;
}

.nav-item:hover { background: rgba(255, 255, 255, 0.05); color: var(--text); }
.nav-item.active { background: rgba(96, 165, 250, 0.15); color: var(--blue); }
.nav-item.logout { margin-top: 8px; color: var(--red); }

/* User card */
.user-card {
    display: flex;
    align-items: center;
    gap: 10px;
    padding: 12px 8px;
    border-top: 1px solid var(--border);
}

.avatar {
    width: 36px;
    height: 36px;
    border-radius: 50%;
    background: var(--blue);
    color: #fff;
    display: flex;
    align-items: center;
    justify-content: center;
    font-weight: 600;
}

.avatar.small { width: 28px; height: 28px; font-size: 13px; cursor: pointer; }
.user-name { font-weight: 600; font-size: 14px; }
.user-email { font-size: 12px; color: var(--text-dim); }

/* Main area */
.main-content { flex: 1; display: flex; flex-direction: column; min-width: 0; }

.top-bar {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 16px 24px;
    border-bottom: 1px solid var(--border);
}

.top-bar h2 { font-size: 20px; font-weight: 600; }
.menu-toggle { display: none; background: none; border: none; color: var(--text); font-size: 20px; }

.header-controls {
    display: flex;
    align-items: center;
    gap: 12px;
}

.content-frame { padding: 24px; }

/* Buttons */
.btn {
    padding: 8px 16px;
    border-radius: 6px;
    border: none;
    font-size: 13px;
    font-weight: 500;
    cursor: pointer;
}

.btn-primary { background: var(--blue); color: #fff; }
.btn-secondary { background: var(--border); color: var(--text); }

/* Cards */
.dashboard-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
    gap: 16px;
    margin-top: 16px;
}

.card {
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 20px;
}

.card-title {
    font-size: 13px;
    color: var(--text-dim);
    text-transform: uppercase;
    letter-spacing: 0.5px;
    margin-bottom: 8px;
}

.card-value { font-size: 28px; font-weight: 700; }

/* Forms */
.form-row { display: flex; flex-direction: column; gap: 6px; margin-bottom: 14px; }
.form-row label { font-size: 13px; color: var(--text-dim); }

.form-row input,
.form-row select {
    background: var(--bg);
    border: 1px solid var(--border);
    border-radius: 6px;
    color: var(--text);
    padding: 8px 10px;
}

/* Tables */
.data-table { width: 100%; border-collapse: collapse; margin-top: 12px; }

.data-table th,
.data-table td {
    text-align: left;
    padding: 10px 8px;
    border-bottom: 1px solid var(--border);
}

.data-table th {
    color: var(--text-dim);
    font-weight: 500;
    font-size: 12px;
    text-transform: uppercase;
}

.table-footer { font-size: 12px; color: var(--text-dim); margin-top: 8px; }
.empty-state { color: var(--text-dim); padding: 24px 0; text-align: center; }

/* Status and score colours */
.status-badge {
    padding: 4px 10px;
    border-radius: 20px;
    font-size: 12px;
    font-weight: 600;
    text-transform: uppercase;
}

.text-green-400 { color: var(--green); }
.text-yellow-400 { color: var(--yellow); }
.text-orange-400 { color: var(--orange); }
.text-red-400 { color: var(--red); }
.text-slate-400 { color: var(--text-dim); }
.bg-green-400\/10 { background: rgba(74, 222, 128, 0.1); }
.bg-yellow-400\/10 { background: rgba(250, 204, 21, 0.1); }
.bg-orange-400\/10 { background: rgba(251, 146, 60, 0.1); }
.bg-red-400\/10 { background: rgba(248, 113, 113, 0.1); }

.score-pill { padding: 2px 8px; border-radius: 4px; font-weight: 600; }

/* Modal */
.modal {
    display: none;
    position: fixed;
    inset: 0;
    background: rgba(0, 0, 0, 0.6);
    align-items: center;
    justify-content: center;
}

.modal.active { display: flex; }

.modal-content {
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 24px;
    max-width: 420px;
}

.modal-content p { margin: 12px 0 16px; color: var(--text-dim); }

/* Error panel */
.error-panel {
    border: 1px solid var(--red);
    background: rgba(248, 113, 113, 0.08);
    border-radius: 8px;
    padding: 16px;
}

.error-panel h3 { color: var(--red); margin-bottom: 6px; }

/* Responsive */
@media (max-width: 768px) {
    .sidebar { display: none; position: fixed; z-index: 10; }
    .sidebar.active { display: flex; }
    .menu-toggle { display: block; }
}
";
