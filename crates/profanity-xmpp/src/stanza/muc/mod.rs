// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use direct_invite::DirectInvite;
pub use mediated_invite::{Continue, Invite, MediatedInvite};
pub use query::Query;

pub mod direct_invite;
pub mod mediated_invite;
pub mod ns;
pub mod query;
