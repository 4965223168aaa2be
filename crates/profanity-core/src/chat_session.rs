// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use jid::BareJid;
use xmpp_parsers::chatstates::ChatState;

/// XEP-0085 timer constants. Fixed at compile time per the original implementation;
/// `gone_minutes` (in `Preferences`) is the only one of the three actually configurable.
pub const PAUSED_TIMEOUT_SECS: u64 = 10;
pub const INACTIVE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encryption {
    None,
    Otr,
    Pgp,
    Omemo,
}

/// The OTR/PGP/OMEMO collaborator contract. The core never inspects key material; it only
/// hands text across this boundary.
pub trait EncryptionProvider: Send + Sync {
    fn encrypt(&self, peer: &BareJid, plaintext: &str) -> Result<(String, Vec<(String, String)>), String>;
    fn decrypt(&self, peer: &BareJid, body: &str) -> Result<(String, bool), String>;
    fn is_secure(&self, peer: &BareJid) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub barejid: BareJid,
    pub resource_override: Option<String>,
    pub chat_state: ChatState,
    pub last_activity_ts: u64,
    pub peer_supports_states: bool,
    pub encryption: Encryption,
    pub encryption_trusted: bool,
}

impl ChatSession {
    fn new(barejid: BareJid, now: u64) -> Self {
        ChatSession {
            barejid,
            resource_override: None,
            chat_state: ChatState::Active,
            last_activity_ts: now,
            peer_supports_states: false,
            encryption: Encryption::None,
            encryption_trusted: false,
        }
    }
}

/// Side effect a caller should act on after a transition: send this chat-state to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Composing,
    Paused,
    Inactive,
    Gone,
}

impl Transition {
    pub fn as_chat_state(&self) -> ChatState {
        match self {
            Transition::Composing => ChatState::Composing,
            Transition::Paused => ChatState::Paused,
            Transition::Inactive => ChatState::Inactive,
            Transition::Gone => ChatState::Gone,
        }
    }
}

/// Per-peer chat-state timers, resource pinning, and encryption mode for 1:1 chats.
#[derive(Debug, Default)]
pub struct ChatSessionTable {
    sessions: HashMap<BareJid, ChatSession>,
}

impl ChatSessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, barejid: &BareJid) -> Option<&ChatSession> {
        self.sessions.get(barejid)
    }

    fn get_or_create(&mut self, barejid: &BareJid, now: u64) -> &mut ChatSession {
        self.sessions
            .entry(barejid.clone())
            .or_insert_with(|| ChatSession::new(barejid.clone(), now))
    }

    /// The peer sent a chat-state of its own; from now on we negotiate states with it.
    pub fn record_peer_chat_state(&mut self, barejid: &BareJid, now: u64) {
        self.get_or_create(barejid, now).peer_supports_states = true;
    }

    /// Records that the user typed a printable character. Returns `Some(Composing)` if the
    /// state actually changed and the caller should send `<composing/>`, gated by
    /// `states_enabled` and the peer's advertised support.
    pub fn notify_user_activity(
        &mut self,
        barejid: &BareJid,
        now: u64,
        states_enabled: bool,
    ) -> Option<Transition> {
        let session = self.get_or_create(barejid, now);
        session.last_activity_ts = now;

        if session.chat_state == ChatState::Composing {
            return None;
        }

        session.chat_state = ChatState::Composing;

        if states_enabled && session.peer_supports_states {
            Some(Transition::Composing)
        } else {
            None
        }
    }

    pub fn set_resource_override(&mut self, barejid: &BareJid, resource: Option<String>, now: u64) {
        self.get_or_create(barejid, now).resource_override = resource;
    }

    pub fn set_encryption(&mut self, barejid: &BareJid, encryption: Encryption, now: u64) {
        self.get_or_create(barejid, now).encryption = encryption;
    }

    /// Advances every session's timer. Intended to be called once per second, per the
    /// single-threaded cooperative tick. Sessions that transition to `gone` are removed and
    /// reported in the returned vector alongside every other transition that fired.
    pub fn tick(&mut self, now: u64, gone_minutes: u64, states_enabled: bool) -> Vec<(BareJid, Transition)> {
        let mut fired = Vec::new();
        let mut to_remove = Vec::new();

        for (barejid, session) in self.sessions.iter_mut() {
            let elapsed = now.saturating_sub(session.last_activity_ts);

            let transition = match session.chat_state {
                ChatState::Composing if elapsed >= PAUSED_TIMEOUT_SECS => Some(Transition::Paused),
                ChatState::Active | ChatState::Paused if elapsed >= INACTIVE_TIMEOUT_SECS => {
                    Some(Transition::Inactive)
                }
                ChatState::Inactive if elapsed >= gone_minutes * 60 => Some(Transition::Gone),
                _ => None,
            };

            let Some(transition) = transition else {
                continue;
            };

            session.chat_state = transition.as_chat_state();

            if transition == Transition::Gone {
                session.resource_override = None;
                to_remove.push(barejid.clone());
            }

            if states_enabled && session.peer_supports_states {
                fired.push((barejid.clone(), transition));
            }
        }

        for barejid in to_remove {
            self.sessions.remove(&barejid);
        }

        fired
    }

    /// Window closed or we disconnected: every live session goes straight to `gone`.
    pub fn close_all(&mut self, states_enabled: bool) -> Vec<(BareJid, Transition)> {
        let fired: Vec<(BareJid, Transition)> = self
            .sessions
            .keys()
            .filter(|k| states_enabled && self.sessions[*k].peer_supports_states)
            .map(|k| (k.clone(), Transition::Gone))
            .collect();
        self.sessions.clear();
        fired
    }

    pub fn close(&mut self, barejid: &BareJid) {
        self.sessions.remove(barejid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn composing_cascades_through_paused_inactive_gone() {
        let peer = BareJid::from_str("a@x").unwrap();
        let mut table = ChatSessionTable::new();
        table.record_peer_chat_state(&peer, 0);

        let composing = table.notify_user_activity(&peer, 0, true);
        assert_eq!(composing, Some(Transition::Composing));

        // No further typing; drive the tick every second, as the real loop would.
        let mut seen = Vec::new();
        for t in 1..=100 {
            seen.extend(table.tick(t, 1, true));
        }

        assert_eq!(
            seen,
            vec![
                (peer.clone(), Transition::Paused),
                (peer.clone(), Transition::Inactive),
                (peer.clone(), Transition::Gone),
            ]
        );
        assert!(table.get(&peer).is_none());
    }

    #[test]
    fn active_session_skips_paused_and_goes_straight_to_inactive() {
        let peer = BareJid::from_str("a@x").unwrap();
        let mut table = ChatSessionTable::new();
        table.record_peer_chat_state(&peer, 0);
        // Touch the session without typing (e.g. receiving a message).
        table.set_resource_override(&peer, None, 0);

        let mut seen = Vec::new();
        for t in 1..=35 {
            seen.extend(table.tick(t, 10, true));
        }

        assert_eq!(seen, vec![(peer, Transition::Inactive)]);
    }

    #[test]
    fn no_transition_events_fire_when_peer_does_not_support_states() {
        let peer = BareJid::from_str("a@x").unwrap();
        let mut table = ChatSessionTable::new();
        table.notify_user_activity(&peer, 0, true);

        let mut seen = Vec::new();
        for t in 1..=100 {
            seen.extend(table.tick(t, 1, true));
        }
        assert!(seen.is_empty());
        // The state machine still advances even though nothing is sent.
        assert!(table.get(&peer).is_none());
    }
}
