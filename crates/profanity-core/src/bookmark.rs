// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use jid::BareJid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GajimMinimize {
    Unset,
    True,
    False,
}

/// A saved MUC room with optional auto-join, as populated from XEP-0048 bookmark storage
/// (private-storage or PEP, per §4.7's bookmarks `result` handling).
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub barejid: BareJid,
    pub nick: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub autojoin: bool,
    pub gajim_minimize: GajimMinimize,
}

/// Mirror of the account's bookmarked rooms.
#[derive(Debug, Default)]
pub struct BookmarkTable {
    bookmarks: HashMap<BareJid, Bookmark>,
}

impl BookmarkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole table from a freshly-loaded bookmarks result. Returns the bookmarks
    /// marked `autojoin`, for the caller to turn into `on_bookmark_autojoin` events.
    pub fn load(&mut self, bookmarks: Vec<Bookmark>) -> Vec<Bookmark> {
        self.bookmarks.clear();
        let mut autojoins = Vec::new();
        for bookmark in bookmarks {
            if bookmark.autojoin {
                autojoins.push(bookmark.clone());
            }
            self.bookmarks.insert(bookmark.barejid.clone(), bookmark);
        }
        autojoins
    }

    pub fn upsert(&mut self, bookmark: Bookmark) {
        self.bookmarks.insert(bookmark.barejid.clone(), bookmark);
    }

    pub fn remove(&mut self, barejid: &BareJid) {
        self.bookmarks.remove(barejid);
    }

    pub fn get(&self, barejid: &BareJid) -> Option<&Bookmark> {
        self.bookmarks.get(barejid)
    }

    pub fn all(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn bookmark(jid: &str, autojoin: bool) -> Bookmark {
        Bookmark {
            barejid: BareJid::from_str(jid).unwrap(),
            nick: None,
            password: None,
            name: None,
            autojoin,
            gajim_minimize: GajimMinimize::Unset,
        }
    }

    #[test]
    fn load_reports_only_autojoin_entries() {
        let mut table = BookmarkTable::new();
        let autojoins = table.load(vec![
            bookmark("a@conf.x", true),
            bookmark("b@conf.x", false),
        ]);
        assert_eq!(autojoins.len(), 1);
        assert_eq!(autojoins[0].barejid, BareJid::from_str("a@conf.x").unwrap());
        assert_eq!(table.all().count(), 2);
    }

    #[test]
    fn remove_drops_the_bookmark() {
        let mut table = BookmarkTable::new();
        table.load(vec![bookmark("a@conf.x", false)]);
        table.remove(&BareJid::from_str("a@conf.x").unwrap());
        assert!(table.get(&BareJid::from_str("a@conf.x").unwrap()).is_none());
    }
}
