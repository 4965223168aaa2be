// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;
use xmpp_parsers::iq::{Iq, IqType};
use xmpp_parsers::ping::Ping as PingPayload;

use crate::client::ModuleContext;
use crate::mods::Module;
use crate::ns;
use crate::util::RequestError;

/// XEP-0199: XMPP Ping
/// https://xmpp.org/extensions/xep-0199.html
#[derive(Default, Clone)]
pub struct Ping {
    ctx: ModuleContext,
}

impl Module for Ping {
    fn register_with(&mut self, context: ModuleContext) {
        self.ctx = context
    }

    fn handle_iq_stanza(&self, stanza: &Iq) -> Result<()> {
        let IqType::Get(payload) = &stanza.payload else {
            return Ok(());
        };

        if !payload.is("ping", ns::PING) {
            return Ok(());
        }

        self.ctx.send_stanza(Iq::from_result(
            stanza.id.clone(),
            None::<xmpp_parsers::roster::Roster>,
        ))?;

        Ok(())
    }
}

impl Ping {
    pub async fn send_ping_to_server(&self) -> Result<(), RequestError> {
        self.ctx
            .send_iq(Iq::from_get(self.ctx.generate_id(), PingPayload).with_to(
                self.ctx.server_jid().into(),
            ))
            .await?;
        Ok(())
    }

    pub async fn send_ping(&self, to: impl Into<jid::Jid>) -> Result<(), RequestError> {
        self.ctx
            .send_iq(Iq::from_get(self.ctx.generate_id(), PingPayload).with_to(to.into()))
            .await?;
        Ok(())
    }
}
