// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use jid::{BareJid, FullJid};
use xmpp_parsers::muc::user::{Affiliation, MucUser, Role, Status as MucStatus};
use xmpp_parsers::ns;
use xmpp_parsers::presence::{Presence as PresenceStanza, Type as PresenceType};

use crate::roster::Presence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anonymity {
    NonAnon,
    SemiAnon,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Pending,
    Joined,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Occupant {
    pub nick: String,
    pub jid: Option<FullJid>,
    pub role: Role,
    pub affiliation: Affiliation,
    pub presence: Presence,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub roomjid: BareJid,
    pub my_nick: String,
    pub requested_nick: Option<String>,
    pub room_name: Option<String>,
    pub subject: Option<String>,
    pub anonymity: Anonymity,
    pub autojoin: bool,
    pub password: Option<String>,
    pub roster_received: bool,
    pub pending_nick_change: Option<String>,
    pub occupants: HashMap<String, Occupant>,
    pub invites_sent: Vec<BareJid>,
    pub state: RoomState,
}

impl Room {
    fn new(roomjid: BareJid, nick: String, password: Option<String>) -> Self {
        Room {
            roomjid,
            my_nick: nick.clone(),
            requested_nick: Some(nick),
            room_name: None,
            subject: None,
            anonymity: Anonymity::Unknown,
            autojoin: false,
            password,
            roster_received: false,
            pending_nick_change: None,
            occupants: HashMap::new(),
            invites_sent: Vec::new(),
            state: RoomState::Pending,
        }
    }
}

/// Outcome of feeding a presence stanza to the registry, for the caller to turn into
/// event-sink calls.
#[derive(Debug, Clone, PartialEq)]
pub enum MucEvent {
    Joined { roomjid: BareJid },
    OccupantChanged { roomjid: BareJid, nick: String },
    OccupantLeft { roomjid: BareJid, nick: String, reason: LeaveReason },
    NickChanged { roomjid: BareJid, old: String, new: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    Normal,
    Kicked,
    Banned,
}

#[derive(Debug, Default)]
pub struct MucRegistry {
    rooms: HashMap<BareJid, Room>,
}

impl MucRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending join; the caller is still responsible for sending the actual
    /// `<presence/>` to `roomjid/nick` (via `profanity_xmpp::mods::MUC`).
    pub fn record_join_request(&mut self, roomjid: BareJid, nick: String, password: Option<String>) {
        self.rooms.insert(roomjid.clone(), Room::new(roomjid, nick, password));
    }

    pub fn room(&self, roomjid: &BareJid) -> Option<&Room> {
        self.rooms.get(roomjid)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn is_room(&self, barejid: &BareJid) -> bool {
        self.rooms.contains_key(barejid)
    }

    /// Marks a room `left` but keeps its record around until the caller explicitly closes the
    /// window (the record stays so history/state can still be inspected).
    pub fn leave(&mut self, roomjid: &BareJid) {
        if let Some(room) = self.rooms.get_mut(roomjid) {
            room.state = RoomState::Left;
            room.occupants.clear();
        }
    }

    pub fn request_nick_change(&mut self, roomjid: &BareJid, new_nick: String) {
        if let Some(room) = self.rooms.get_mut(roomjid) {
            room.pending_nick_change = Some(new_nick);
        }
    }

    /// Classifies a presence stanza whose bare `from` is a known room. Returns `None` if the
    /// stanza doesn't belong to any tracked room.
    pub fn handle_presence(&mut self, stanza: &PresenceStanza) -> Option<MucEvent> {
        let from = stanza.from.as_ref()?.try_as_full().ok()?.clone();
        let roomjid = from.to_bare();
        let nick = from.resource().to_string();

        let muc_user = stanza
            .payloads
            .iter()
            .find(|p| p.is("x", ns::MUC_USER))
            .and_then(|p| MucUser::try_from(p.clone()).ok());

        let room = self.rooms.get_mut(&roomjid)?;

        if stanza.type_ == PresenceType::Unavailable {
            return Self::handle_unavailable(room, &roomjid, &nick, muc_user.as_ref());
        }

        Self::handle_available(room, &roomjid, &nick, stanza, muc_user.as_ref())
    }

    fn handle_unavailable(
        room: &mut Room,
        roomjid: &BareJid,
        nick: &str,
        muc_user: Option<&MucUser>,
    ) -> Option<MucEvent> {
        let statuses: Vec<&MucStatus> = muc_user.map(|u| u.status.iter().collect()).unwrap_or_default();

        if statuses.contains(&&MucStatus::NewNick) {
            // The item's `nick` carries the new nickname per XEP-0045 §7.6.
            let new_nick = muc_user
                .and_then(|u| u.items.first())
                .and_then(|item| item.nick.clone());
            room.occupants.remove(nick);
            if let Some(new_nick) = new_nick.or(room.pending_nick_change.clone()) {
                room.pending_nick_change = Some(new_nick);
            }
            return None;
        }

        let reason = if statuses.contains(&&MucStatus::Banned) {
            LeaveReason::Banned
        } else if statuses.contains(&&MucStatus::Kicked) {
            LeaveReason::Kicked
        } else {
            LeaveReason::Normal
        };

        room.occupants.remove(nick);

        if nick == room.my_nick {
            room.state = RoomState::Left;
        }

        Some(MucEvent::OccupantLeft {
            roomjid: roomjid.clone(),
            nick: nick.to_string(),
            reason,
        })
    }

    fn handle_available(
        room: &mut Room,
        roomjid: &BareJid,
        nick: &str,
        stanza: &PresenceStanza,
        muc_user: Option<&MucUser>,
    ) -> Option<MucEvent> {
        let statuses: Vec<&MucStatus> = muc_user.map(|u| u.status.iter().collect()).unwrap_or_default();
        let item = muc_user.and_then(|u| u.items.first());

        let is_self_presence = statuses.contains(&&MucStatus::SelfPresence)
            || room.requested_nick.as_deref() == Some(nick);

        let occupant = Occupant {
            nick: nick.to_string(),
            jid: item.and_then(|i| i.jid.clone()),
            role: item.map(|i| i.role.clone()).unwrap_or(Role::None),
            affiliation: item.map(|i| i.affiliation.clone()).unwrap_or(Affiliation::None),
            presence: Presence::from_show(stanza.show.clone()),
            status: stanza.statuses.values().next().cloned(),
        };

        room.occupants.insert(nick.to_string(), occupant);

        if let Some(pending) = room.pending_nick_change.take() {
            if pending == nick {
                let old = room.my_nick.clone();
                room.my_nick = nick.to_string();
                room.requested_nick = None;
                return Some(MucEvent::NickChanged {
                    roomjid: roomjid.clone(),
                    old,
                    new: nick.to_string(),
                });
            }
            room.pending_nick_change = Some(pending);
        }

        if is_self_presence && room.state == RoomState::Pending {
            room.my_nick = nick.to_string();
            room.requested_nick = None;
            room.state = RoomState::Joined;
            return Some(MucEvent::Joined {
                roomjid: roomjid.clone(),
            });
        }

        Some(MucEvent::OccupantChanged {
            roomjid: roomjid.clone(),
            nick: nick.to_string(),
        })
    }

    pub fn set_subject(&mut self, roomjid: &BareJid, subject: Option<String>) {
        if let Some(room) = self.rooms.get_mut(roomjid) {
            room.subject = subject;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use xmpp_parsers::muc::user::Item;
    use xmpp_parsers::Element;

    fn presence_with_status(from: &str, unavailable: bool, codes: &[&str], item_nick: Option<&str>) -> PresenceStanza {
        let type_attr = if unavailable { " type='unavailable'" } else { "" };
        let item = if let Some(n) = item_nick {
            format!("<item affiliation='member' role='participant' nick='{n}'/>")
        } else {
            "<item affiliation='member' role='participant'/>".to_string()
        };
        let statuses: String = codes.iter().map(|c| format!("<status code='{c}'/>")).collect();
        let xml = format!(
            "<presence from='{from}'{type_attr} xmlns='jabber:client'><x xmlns='http://jabber.org/protocol/muc#user'>{statuses}{item}</x></presence>"
        );
        let elem: Element = xml.parse().unwrap();
        PresenceStanza::try_from(elem).unwrap()
    }

    #[test]
    fn join_commits_on_self_presence_status_110() {
        let mut registry = MucRegistry::new();
        let room = BareJid::from_str("room@svc").unwrap();
        registry.record_join_request(room.clone(), "alice".to_string(), None);

        let presence = presence_with_status("room@svc/alice", false, &["110"], None);
        let event = registry.handle_presence(&presence);

        assert_eq!(event, Some(MucEvent::Joined { roomjid: room.clone() }));
        assert_eq!(registry.room(&room).unwrap().state, RoomState::Joined);
        assert_eq!(registry.room(&room).unwrap().my_nick, "alice");
    }

    #[test]
    fn nick_change_fires_once() {
        let mut registry = MucRegistry::new();
        let room = BareJid::from_str("room@svc").unwrap();
        registry.record_join_request(room.clone(), "alice".to_string(), None);
        registry.handle_presence(&presence_with_status("room@svc/alice", false, &["110"], None));
        registry.request_nick_change(&room, "bob".to_string());

        let left = registry.handle_presence(&presence_with_status(
            "room@svc/alice",
            true,
            &["303", "110"],
            Some("bob"),
        ));
        assert_eq!(left, None);

        let joined = registry.handle_presence(&presence_with_status("room@svc/bob", false, &["110"], None));
        assert_eq!(
            joined,
            Some(MucEvent::NickChanged {
                roomjid: room.clone(),
                old: "alice".to_string(),
                new: "bob".to_string(),
            })
        );
        assert_eq!(registry.room(&room).unwrap().my_nick, "bob");
    }
}
