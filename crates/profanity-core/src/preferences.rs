// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

/// Auto-away trigger mode, mirrored from `prefs_get_string("away")`-style toggles in the
/// original configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoAwayMode {
    #[default]
    Off,
    Idle,
    Away,
}

/// Runtime-tunable knobs threaded into the session orchestrator and chat-state engine.
/// `PAUSED_TIMEOUT`/`INACTIVE_TIMEOUT` are deliberately not here: the original fixes them as
/// constants (see `chat_session` module), not user preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub states_enabled: bool,
    pub auto_away_mode: AutoAwayMode,
    pub away_time_secs: u64,
    pub xa_time_secs: u64,
    pub check_on_activity: bool,
    pub autoping_seconds: u64,
    pub autoping_timeout_secs: u64,
    pub reconnect_seconds: u64,
    pub gone_minutes: u64,
    pub carbons_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            states_enabled: true,
            auto_away_mode: AutoAwayMode::Off,
            away_time_secs: 15 * 60,
            xa_time_secs: 0,
            check_on_activity: true,
            autoping_seconds: 60,
            autoping_timeout_secs: 10,
            reconnect_seconds: 30,
            gone_minutes: 10,
            carbons_enabled: true,
        }
    }
}
