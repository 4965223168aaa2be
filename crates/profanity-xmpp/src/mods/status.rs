// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use xmpp_parsers::presence::Presence;
use xmpp_parsers::presence;

use crate::client::ModuleContext;
use crate::mods::Module;
use crate::Event as ClientEvent;

#[derive(Default, Clone)]
pub struct Status {
    ctx: ModuleContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Presence(Presence),
}

impl Module for Status {
    fn register_with(&mut self, context: ModuleContext) {
        self.ctx = context;
    }

    fn handle_presence_stanza(&self, stanza: &Presence) -> Result<()> {
        self.ctx
            .schedule_event(ClientEvent::Status(Event::Presence(stanza.clone())));
        Ok(())
    }
}

impl Status {
    /// XMPP: Instant Messaging and Presence
    /// https://xmpp.org/rfcs/rfc6121.html#presence
    pub fn send_presence(
        &self,
        show: Option<presence::Show>,
        status: Option<&str>,
        caps: Option<xmpp_parsers::caps::Caps>,
        priority: Option<i8>,
    ) -> Result<()> {
        let mut presence = Presence::new(presence::Type::None);
        presence.show = show;
        if let Some(status) = status {
            presence.set_status("", status);
        }
        if let Some(caps) = caps {
            presence.add_payload(caps)
        }
        if let Some(priority) = priority {
            presence.priority = priority
        }
        self.ctx.send_stanza(presence)?;
        Ok(())
    }
}
