// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use xmpp_parsers::ns::*;

// See all at: https://xmpp.org/registrar/namespaces.html

/// XEP-0333: Chat Markers
pub const CHAT_MARKERS: &str = "urn:xmpp:chat-markers:0";

/// XEP-0203: Delayed Delivery
pub const DELAY: &str = "urn:xmpp:delay";

/// XEP-0428: Fallback Indication
pub const FALLBACK: &str = "urn:xmpp:fallback:0";

/// XEP-0334: Message Processing Hints
pub const HINTS: &str = "urn:xmpp:hints";

/// XEP-0012: Last Activity
pub const LAST_ACTIVITY: &str = "jabber:iq:last";

/// XEP-0045: Multi-User Chat
pub const MUC_OWNER: &str = "http://jabber.org/protocol/muc#owner";

/// XEP-0045: Multi-User Chat
pub const MUC_ADMIN: &str = "http://jabber.org/protocol/muc#admin";

/// XEP-0045: Multi-User Chat
pub const MUC_ROOMCONFIG: &str = "http://jabber.org/protocol/muc#roomconfig";

/// XEP-0045: Multi-User Chat
pub const MUC_ROOMINFO: &str = "http://jabber.org/protocol/muc#roominfo";

/// XEP-0249: Direct MUC Invitations
pub const DIRECT_MUC_INVITATIONS: &str = "jabber:x:conference";

/// XEP-0421: Anonymous unique occupant identifiers for MUCs
pub const OCCUPANT_ID: &str = "urn:xmpp:occupant-id:0";

pub const MAM0: &str = "urn:xmpp:mam:0";
pub const MAM1: &str = "urn:xmpp:mam:1";
pub const MAM2: &str = "urn:xmpp:mam:2";
pub const MAM2_EXTENDED: &str = "urn:xmpp:mam:2#extended";

/// XEP-0481: Content Types in Messages
pub const CONTENT: &str = "urn:xmpp:content";
