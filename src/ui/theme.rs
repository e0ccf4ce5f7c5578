//! Shared class strings so pages stay visually consistent.

// ============================================
// BUTTON STYLES
// ============================================

pub const BTN_PRIMARY: &str =
    "rounded-lg bg-lime-400 px-4 py-2 text-sm font-semibold text-slate-950 hover:bg-lime-300 disabled:cursor-not-allowed disabled:opacity-50";

pub const BTN_SECONDARY: &str =
    "rounded-lg border border-slate-600 px-4 py-2 text-xs font-semibold uppercase tracking-wide text-slate-200 hover:bg-slate-800";

pub const BTN_DANGER: &str =
    "rounded-md border border-rose-500/40 px-2 py-1 text-[10px] font-semibold uppercase tracking-wide text-rose-200 hover:bg-rose-500/10 disabled:cursor-not-allowed disabled:opacity-40";

pub const BTN_LINK: &str =
    "text-xs font-semibold uppercase tracking-wide text-lime-300 hover:text-lime-100";

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "min-w-[5.5rem] rounded-lg border border-lime-400/60 bg-lime-400/15 px-4 py-2 font-semibold text-lime-300"
    } else {
        "min-w-[5.5rem] rounded-lg border border-slate-700 px-4 py-2 text-slate-400 transition hover:border-lime-700 hover:bg-lime-900/20 hover:text-lime-300"
    }
}

pub fn choice_button(active: bool) -> &'static str {
    if active {
        "rounded-lg px-5 py-2.5 text-sm font-semibold bg-lime-400/20 text-lime-300 border border-lime-400/40"
    } else {
        "rounded-lg px-5 py-2.5 text-sm text-slate-400 border border-slate-700 hover:border-lime-600 hover:text-lime-300"
    }
}

// ============================================
// FORM STYLES
// ============================================

pub const LABEL: &str = "block text-xs font-semibold uppercase text-slate-500";

pub const INPUT: &str =
    "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-lime-400 focus:outline-none";

pub const PANEL: &str = "rounded-xl border border-slate-800 bg-slate-900/40 p-6";

pub const SECTION_TITLE: &str = "text-sm font-semibold uppercase tracking-wide text-slate-500";

// ============================================
// TABLE STYLES
// ============================================

pub const TABLE_CONTAINER: &str = "overflow-hidden rounded-xl border border-slate-800 bg-slate-900/40";

pub const TABLE_HEADER: &str = "bg-slate-900/80 text-xs uppercase text-slate-500";

pub const TABLE_DIVIDER: &str = "divide-y divide-slate-800";

pub const TEXT_PRIMARY: &str = "text-slate-100";

pub const TEXT_MUTED: &str = "text-slate-500";
