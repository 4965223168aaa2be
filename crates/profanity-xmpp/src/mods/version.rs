// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::{bail, Result};
use jid::Jid;
use xmpp_parsers::iq::{Iq, IqType};
use xmpp_parsers::ns;
use xmpp_parsers::version::VersionResult;

use crate::client::ModuleContext;
use crate::event::Event as ClientEvent;
use crate::mods::Module;
use crate::util::RequestError;

/// XEP-0092: Software Version
/// https://xmpp.org/extensions/xep-0092.html
#[derive(Default, Clone)]
pub struct Version {
    ctx: ModuleContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A remote entity asked what client/version/OS we're running. The caller answers via
    /// `send_version_response`, since the reported name/version/OS are app-level details this
    /// module doesn't know about.
    Query { from: Jid, id: String },
}

impl Module for Version {
    fn register_with(&mut self, context: ModuleContext) {
        self.ctx = context
    }

    fn handle_iq_stanza(&self, stanza: &Iq) -> Result<()> {
        let IqType::Get(payload) = &stanza.payload else {
            return Ok(());
        };

        if !payload.is("query", ns::VERSION) {
            return Ok(());
        }

        let Some(from) = &stanza.from else {
            bail!("Missing 'from' in version request.")
        };

        self.ctx.schedule_event(ClientEvent::Version(Event::Query {
            from: from.clone(),
            id: stanza.id.clone(),
        }));

        Ok(())
    }
}

impl Version {
    pub async fn send_version_response(
        &self,
        to: impl Into<Jid>,
        id: String,
        version: VersionResult,
    ) -> Result<(), RequestError> {
        self.ctx
            .send_stanza(Iq::from_result(id, Some(version)).with_to(to.into()))?;
        Ok(())
    }
}
