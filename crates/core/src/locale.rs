//! User-facing message sets.
//!
//! A closed set of supported locales mapping to a fully-typed message
//! struct. Adding a language means adding one enum variant and one static,
//! so a missing translation is a compile error rather than a runtime hole.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ko,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::En
    }
}

/// Every user-facing string the session and notes views need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub start_work: &'static str,
    pub start_break: &'static str,
    pub resume_work: &'static str,
    pub finish: &'static str,
    pub work_label: &'static str,
    pub break_label: &'static str,
    pub active_session_exists: &'static str,
    pub session_finished: &'static str,
    pub notes_board: &'static str,
    pub add_note: &'static str,
    pub stats_title: &'static str,
    pub busiest_day_label: &'static str,
}

static EN: Messages = Messages {
    start_work: "Start working",
    start_break: "Take a break",
    resume_work: "Back to work",
    finish: "Finish session",
    work_label: "Work",
    break_label: "Break",
    active_session_exists: "You already have an active session. Finish it first.",
    session_finished: "Session finished",
    notes_board: "Notes",
    add_note: "Add note",
    stats_title: "Statistics",
    busiest_day_label: "Busiest day",
};

static KO: Messages = Messages {
    start_work: "작업 시작",
    start_break: "휴식하기",
    resume_work: "작업 재개",
    finish: "세션 종료",
    work_label: "작업",
    break_label: "휴식",
    active_session_exists: "이미 진행 중인 세션이 있습니다. 먼저 종료해 주세요.",
    session_finished: "세션이 종료되었습니다",
    notes_board: "메모",
    add_note: "메모 추가",
    stats_title: "통계",
    busiest_day_label: "가장 바빴던 날",
};

impl Locale {
    /// The message set for this locale.
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
        }
    }

    /// Parse a locale tag, falling back to English for unknown tags.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ko" | "ko-KR" => Locale::Ko,
            _ => Locale::En,
        }
    }
}
