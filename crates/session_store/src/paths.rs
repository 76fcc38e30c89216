use std::path::{Path, PathBuf};

use time::{Date, OffsetDateTime};

/// Directory under the console's base dir holding session state and logs.
pub const SESSIONS_DIR: &str = "sessions";

/// File name of the active session document.
pub const ACTIVE_SESSION_FILE: &str = "active_session.json";

#[must_use]
pub fn sessions_root(base: &Path) -> PathBuf {
    base.join(SESSIONS_DIR)
}

#[must_use]
pub fn active_session_path(sessions_root: &Path) -> PathBuf {
    sessions_root.join(ACTIVE_SESSION_FILE)
}

/// `log_YYYY-MM-DD.txt`, one file per calendar date.
#[must_use]
pub fn daily_log_file_name(date: Date) -> String {
    format!(
        "log_{:04}-{:02}-{:02}.txt",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// The date keying today's log: server-local when the platform can report
/// its offset, UTC otherwise.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use super::daily_log_file_name;

    #[test]
    fn log_file_name_is_date_keyed_and_zero_padded() {
        let date = Date::from_calendar_date(2026, Month::March, 7).expect("valid date");
        assert_eq!(daily_log_file_name(date), "log_2026-03-07.txt");
    }
}
