// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use jid::BareJid;

pub use connected_client::{ClientTestAdditions, ConnectedClient};
pub use connector::{Connection, Connector};
pub use constant_id_provider::ConstantIDProvider;
pub use incrementing_id_provider::IncrementingIDProvider;

mod connected_client;
mod connector;
mod constant_id_provider;
mod element_ext;
mod incrementing_id_provider;

pub trait BareJidTestAdditions {
    fn ours() -> BareJid;
    fn theirs() -> BareJid;
}

impl BareJidTestAdditions for BareJid {
    fn ours() -> BareJid {
        BareJid::from_parts(Some(&"test".parse().unwrap()), &"profanity.chat".parse().unwrap())
    }

    fn theirs() -> BareJid {
        BareJid::from_parts(Some(&"them".parse().unwrap()), &"profanity.chat".parse().unwrap())
    }
}

pub trait StrExt {
    fn to_xml_result_string(&self) -> String;
}

impl StrExt for &str {
    fn to_xml_result_string(&self) -> String {
        let mut result = self.to_string();
        result.retain(|c| c != '\n' && c != '\t');
        result.replace("  ", "")
    }
}
