// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use jid::{BareJid, FullJid};
use xmpp_parsers::muc::user::{Affiliation, Role};

use crate::muc::LeaveReason;
use crate::roster::Presence;

/// Language-neutral description of *what happened*, for the TUI collaborator to turn into
/// window/title/status-bar updates. The core never decides how something is rendered; it only
/// describes the event.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoginSuccess { account: String, secured: bool },
    LoginFailed { account: String },
    LostConnection,
    Disconnected,
    RosterLoaded,
    ContactPresence {
        barejid: BareJid,
        resource: Option<String>,
        show: Option<Presence>,
        status: Option<String>,
    },
    SubscriptionRequest {
        barejid: BareJid,
    },
    Message {
        from_full: FullJid,
        to_bare: BareJid,
        body: String,
        delay: Option<String>,
        id: Option<String>,
        replace_id: Option<String>,
        encrypted: bool,
    },
    MucMessage {
        room: BareJid,
        nick: String,
        body: String,
        delay: Option<String>,
    },
    MucJoin {
        room: BareJid,
    },
    MucLeave {
        room: BareJid,
        nick: String,
        reason: Option<LeaveReason>,
    },
    MucSubject {
        room: BareJid,
        nick: Option<String>,
        subject: Option<String>,
    },
    MucOccupantChange {
        room: BareJid,
        nick: String,
        role: Role,
        affiliation: Affiliation,
    },
    BookmarkAutojoin {
        room: BareJid,
        nick: Option<String>,
        password: Option<String>,
    },
    Error {
        context: String,
        text: String,
    },
}

/// The collaborator contract consumed by the TUI (or, for smoke-testing, `profanity-cli`'s
/// println sink). `Session` calls into this synchronously, from the thread that owns it, as
/// the single-threaded cooperative model in §5 requires.
pub trait EventSink: Send + Sync {
    fn handle(&self, event: SessionEvent);
}

/// An `EventSink` that records every event it receives, for assertions in orchestrator tests.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: parking_lot::Mutex<Vec<SessionEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn handle(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}
