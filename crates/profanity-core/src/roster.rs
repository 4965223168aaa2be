// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use jid::{BareJid, FullJid};
use xmpp_parsers::presence;
use xmpp_parsers::roster;

/// Availability as shown in the roster, collapsing XMPP's `show`/absence-of-presence pair into
/// one ordered enum (`online` ranks below every `show` value, matching how most clients sort
/// contacts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Chat,
    Away,
    Xa,
    Dnd,
}

impl Presence {
    pub fn from_show(show: Option<presence::Show>) -> Self {
        match show {
            None => Presence::Online,
            Some(presence::Show::Chat) => Presence::Chat,
            Some(presence::Show::Away) => Presence::Away,
            Some(presence::Show::Xa) => Presence::Xa,
            Some(presence::Show::Dnd) => Presence::Dnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    None,
    To,
    From,
    Both,
    Remove,
}

impl From<roster::Subscription> for Subscription {
    fn from(value: roster::Subscription) -> Self {
        match value {
            roster::Subscription::None => Subscription::None,
            roster::Subscription::To => Subscription::To,
            roster::Subscription::From => Subscription::From,
            roster::Subscription::Both => Subscription::Both,
            roster::Subscription::Remove => Subscription::Remove,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub presence: Presence,
    pub status: Option<String>,
    pub priority: i8,
    pub caps_key: Option<String>,
    /// Bumped on every update so ties in `priority` resolve to "most recently updated",
    /// per the effective-presence rule.
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub barejid: BareJid,
    pub name: Option<String>,
    pub subscription: Subscription,
    pub pending_out: bool,
    pub groups: Vec<String>,
    pub resources: HashMap<String, Resource>,
}

impl Contact {
    fn new(barejid: BareJid) -> Self {
        Contact {
            barejid,
            name: None,
            subscription: Subscription::None,
            pending_out: false,
            groups: Vec::new(),
            resources: HashMap::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.resources.is_empty()
    }

    /// The resource with the highest priority; ties broken by most recently updated.
    pub fn effective_presence(&self) -> Option<Presence> {
        self.resources
            .values()
            .max_by_key(|r| (r.priority, r.sequence))
            .map(|r| r.presence)
    }
}

/// Outcome of applying a presence stanza, for the caller to turn into event-sink calls. Contacts
/// are always auto-created (see `apply_presence`), so there's no "unknown contact" case here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub effective: Option<Presence>,
}

/// Mirror of the server roster: contacts, subscriptions, and their online resources.
#[derive(Debug, Default)]
pub struct Roster {
    contacts: HashMap<BareJid, Contact>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears and repopulates from an initial roster result (`iq type='result'` to the startup
    /// roster `get`).
    pub fn load_from_push(&mut self, items: Vec<roster::Item>) {
        self.contacts.clear();
        for item in items {
            self.upsert(item);
        }
    }

    /// Applies a single roster-push item (`iq type='set'`). Returns `true` if the item changed
    /// the name or group membership of an existing contact.
    pub fn apply_set(&mut self, item: roster::Item) -> bool {
        if item.subscription == roster::Subscription::Remove {
            self.contacts.remove(&item.jid);
            return false;
        }

        let changed = self
            .contacts
            .get(&item.jid)
            .map(|existing| existing.name != item.name || existing.groups != item.groups)
            .unwrap_or(true);

        self.upsert(item);
        changed
    }

    fn upsert(&mut self, item: roster::Item) {
        let contact = self
            .contacts
            .entry(item.jid.clone())
            .or_insert_with(|| Contact::new(item.jid.clone()));
        contact.name = item.name;
        contact.subscription = item.subscription.into();
        contact.pending_out = item.ask == roster::Ask::Subscribe;
        contact.groups = item.groups.into_iter().map(|g| g.to_string()).collect();
    }

    /// Applies an incoming presence from a full JID. Auto-adds a bare-contact stub for JIDs not
    /// yet in the roster (e.g. MUC-unaware directed presences), so resource bookkeeping never
    /// silently drops data; callers that care about roster membership should check
    /// `contact(barejid)` separately.
    pub fn apply_presence(
        &mut self,
        from: &FullJid,
        available: bool,
        show: Option<presence::Show>,
        status: Option<String>,
        priority: i8,
        caps_key: Option<String>,
        sequence: u64,
    ) -> PresenceUpdate {
        let bare = from.to_bare();
        let contact = self
            .contacts
            .entry(bare)
            .or_insert_with(|| Contact::new(from.to_bare()));

        if available {
            contact.resources.insert(
                from.resource().to_string(),
                Resource {
                    name: from.resource().to_string(),
                    presence: Presence::from_show(show),
                    status,
                    priority,
                    caps_key,
                    sequence,
                },
            );
        } else {
            contact.resources.remove(from.resource());
        }

        PresenceUpdate {
            effective: contact.effective_presence(),
        }
    }

    pub fn contact(&self, barejid: &BareJid) -> Option<&Contact> {
        self.contacts.get(barejid)
    }

    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self
            .contacts
            .values()
            .flat_map(|c| c.groups.iter().cloned())
            .collect();
        groups.sort();
        groups.dedup();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(jid: &str, subscription: roster::Subscription) -> roster::Item {
        roster::Item {
            jid: BareJid::from_str(jid).unwrap(),
            name: None,
            subscription,
            ask: roster::Ask::None,
            groups: vec![],
        }
    }

    #[test]
    fn presence_effective_prefers_highest_priority() {
        let mut roster = Roster::new();
        roster.load_from_push(vec![item("a@x", roster::Subscription::Both)]);

        let pc = FullJid::from_str("a@x/pc").unwrap();
        let phone = FullJid::from_str("a@x/phone").unwrap();

        roster.apply_presence(&pc, true, None, None, 5, None, 1);
        roster.apply_presence(
            &phone,
            true,
            Some(presence::Show::Away),
            None,
            10,
            None,
            2,
        );

        let contact = roster.contact(&BareJid::from_str("a@x").unwrap()).unwrap();
        assert_eq!(contact.effective_presence(), Some(Presence::Away));
    }

    #[test]
    fn contact_goes_offline_when_last_resource_leaves() {
        let mut roster = Roster::new();
        roster.load_from_push(vec![item("a@x", roster::Subscription::Both)]);

        let pc = FullJid::from_str("a@x/pc").unwrap();
        roster.apply_presence(&pc, true, None, None, 0, None, 1);
        roster.apply_presence(&pc, false, None, None, 0, None, 2);

        let contact = roster.contact(&BareJid::from_str("a@x").unwrap()).unwrap();
        assert!(!contact.is_available());
        assert_eq!(contact.effective_presence(), None);
    }

    #[test]
    fn apply_set_remove_drops_contact() {
        let mut roster = Roster::new();
        roster.load_from_push(vec![item("a@x", roster::Subscription::Both)]);
        roster.apply_set(item("a@x", roster::Subscription::Remove));
        assert!(roster.contact(&BareJid::from_str("a@x").unwrap()).is_none());
    }
}
