// prose-core-client
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::{client, mods};

#[derive(Debug, Clone)]
pub enum Event {
    Client(client::Event),
    Caps(mods::caps::Event),
    Chat(mods::chat::Event),
    Status(mods::status::Event),
    MUC(mods::muc::Event),
    Bookmark(mods::bookmark::Event),
    BlockList(mods::block_list::Event),
    Roster(mods::roster::Event),
    Version(mods::version::Event),
}
