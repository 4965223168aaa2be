// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use jid::BareJid;
use rand::Rng;
use secrecy::SecretString;

use crate::roster::Presence;

/// A grouped key/value text file, one group per account name (GLib `GKeyFile`-style). Groups
/// and their keys keep insertion order so that `set`/`clear` on one account never reshuffles
/// another; unknown keys are carried through untouched, matching `original_source`'s
/// group-preserving `_accounts_save`.
#[derive(Debug, Clone, Default)]
struct KeyFile {
    groups: Vec<Group>,
}

#[derive(Debug, Clone)]
struct Group {
    name: String,
    entries: Vec<(String, String)>,
}

impl KeyFile {
    fn parse(text: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                groups.push(Group {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let key = key.trim().to_string();
            let value = value.trim().to_string();

            if let Some(group) = groups.last_mut() {
                if let Some(existing) = group.entries.iter_mut().find(|(k, _)| *k == key) {
                    existing.1 = value;
                } else {
                    group.entries.push((key, value));
                }
            }
        }

        KeyFile { groups }
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            out.push('[');
            out.push_str(&group.name);
            out.push_str("]\n");
            for (key, value) in &group.entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }

    fn group_mut_or_insert(&mut self, name: &str) -> &mut Group {
        if !self.groups.iter().any(|g| g.name == name) {
            self.groups.push(Group {
                name: name.to_string(),
                entries: Vec::new(),
            });
        }
        self.groups.iter_mut().find(|g| g.name == name).unwrap()
    }

    fn remove_group(&mut self, name: &str) {
        self.groups.retain(|g| g.name != name);
    }

    fn rename_group(&mut self, old: &str, new: &str) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.name == old) {
            group.name = new.to_string();
        }
    }
}

impl Group {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    fn clear(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account '{0}' already exists")]
    Duplicate(String),
    #[error("Account '{0}' not found")]
    NotFound(String),
    #[error("Invalid JID: {0}")]
    InvalidJid(#[from] jid::Error),
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField { field: String, value: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPresence {
    Online,
    Chat,
    Away,
    Xa,
    Dnd,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    Force,
    Allow,
    Trust,
    Disable,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    Default,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtrPolicy {
    Manual,
    Opportunistic,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmemoPolicy {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priorities {
    pub online: i8,
    pub chat: i8,
    pub away: i8,
    pub xa: i8,
    pub dnd: i8,
}

impl Default for Priorities {
    fn default() -> Self {
        Priorities {
            online: 0,
            chat: 0,
            away: 0,
            xa: 0,
            dnd: 0,
        }
    }
}

/// A named credential+policy record, materialized from its `KeyFile` group with defaults filled
/// in and values validated/clamped per §4.6.
///
/// Deliberately not `PartialEq`: it holds an `Option<SecretString>`, and `secrecy` withholds
/// `PartialEq` on purpose so secrets are never compared or logged by accident.
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub jid: BareJid,
    pub password: Option<SecretString>,
    pub eval_password: Option<String>,
    pub enabled: bool,
    pub server: Option<String>,
    pub port: Option<u16>,
    pub resource: Option<String>,
    pub last_presence: Presence,
    pub login_presence: LoginPresence,
    pub priorities: Priorities,
    pub muc_service: Option<String>,
    pub muc_nick: String,
    pub otr_policy: Option<OtrPolicy>,
    pub omemo_policy: Option<OmemoPolicy>,
    pub pgp_keyid: Option<String>,
    pub tls_policy: TlsPolicy,
    pub auth_policy: AuthPolicy,
    pub theme: Option<String>,
    pub startscript: Option<String>,
    pub client_name: Option<String>,
    pub last_activity: Option<String>,
    pub max_sessions: Option<u32>,
}

fn parse_presence(value: &str, default: Presence) -> Presence {
    match value {
        "online" => Presence::Online,
        "chat" => Presence::Chat,
        "away" => Presence::Away,
        "xa" => Presence::Xa,
        "dnd" => Presence::Dnd,
        _ => default,
    }
}

fn presence_str(p: Presence) -> &'static str {
    match p {
        Presence::Online => "online",
        Presence::Chat => "chat",
        Presence::Away => "away",
        Presence::Xa => "xa",
        Presence::Dnd => "dnd",
    }
}

fn parse_tls_policy(value: &str) -> TlsPolicy {
    match value {
        "force" => TlsPolicy::Force,
        "trust" => TlsPolicy::Trust,
        "disable" => TlsPolicy::Disable,
        "legacy" => TlsPolicy::Legacy,
        _ => TlsPolicy::Allow,
    }
}

fn tls_policy_str(p: TlsPolicy) -> &'static str {
    match p {
        TlsPolicy::Force => "force",
        TlsPolicy::Allow => "allow",
        TlsPolicy::Trust => "trust",
        TlsPolicy::Disable => "disable",
        TlsPolicy::Legacy => "legacy",
    }
}

fn parse_auth_policy(value: &str) -> AuthPolicy {
    match value {
        "legacy" => AuthPolicy::Legacy,
        _ => AuthPolicy::Default,
    }
}

fn auth_policy_str(p: AuthPolicy) -> &'static str {
    match p {
        AuthPolicy::Default => "default",
        AuthPolicy::Legacy => "legacy",
    }
}

fn clamp_priority(value: &str) -> i8 {
    value.parse::<i32>().unwrap_or(0).clamp(-128, 127) as i8
}

fn default_muc_nick(jid: &BareJid) -> String {
    jid.node_str()
        .map(str::to_string)
        .unwrap_or_else(|| jid.domain().to_string())
}

fn random_resource() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("profanity.{suffix}")
}

/// Loads/updates/saves named account records, the core's view onto the external-contract
/// account file (§6). Holds the whole file in memory and rewrites only the touched group on
/// save, preserving every other group (and every key this core doesn't understand) byte-for-
/// byte in content, if not in incidental whitespace.
pub struct AccountStore {
    path: PathBuf,
    file: KeyFile,
}

impl AccountStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AccountError> {
        let path = path.as_ref().to_path_buf();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(AccountStore {
            path,
            file: KeyFile::parse(&text),
        })
    }

    /// All account names in the file, in on-disk order.
    pub fn names(&self) -> Vec<String> {
        self.file.group_names()
    }

    pub fn enabled_names(&self) -> Vec<String> {
        self.names()
            .into_iter()
            .filter(|name| {
                self.file
                    .group(name)
                    .and_then(|g| g.get("enabled"))
                    .map(|v| v != "false")
                    .unwrap_or(true)
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Result<Account, AccountError> {
        let group = self
            .file
            .group(name)
            .ok_or_else(|| AccountError::NotFound(name.to_string()))?;

        let jid_str = group.get("jid").unwrap_or(name);
        let jid = BareJid::from_str(jid_str)?;

        let priorities = Priorities {
            online: group.get("priority.online").map(clamp_priority).unwrap_or(0),
            chat: group.get("priority.chat").map(clamp_priority).unwrap_or(0),
            away: group.get("priority.away").map(clamp_priority).unwrap_or(0),
            xa: group.get("priority.xa").map(clamp_priority).unwrap_or(0),
            dnd: group.get("priority.dnd").map(clamp_priority).unwrap_or(0),
        };

        let login_presence = match group.get("presence.login") {
            Some("last") => LoginPresence::Last,
            Some(other) => match parse_presence(other, Presence::Online) {
                Presence::Online => LoginPresence::Online,
                Presence::Chat => LoginPresence::Chat,
                Presence::Away => LoginPresence::Away,
                Presence::Xa => LoginPresence::Xa,
                Presence::Dnd => LoginPresence::Dnd,
            },
            None => LoginPresence::Last,
        };

        let muc_nick = group
            .get("muc.nick")
            .map(str::to_string)
            .unwrap_or_else(|| default_muc_nick(&jid));

        Ok(Account {
            name: name.to_string(),
            jid,
            password: group.get("password").map(|v| SecretString::from(v.to_string())),
            eval_password: group.get("eval_password").map(str::to_string),
            enabled: group.get("enabled").map(|v| v != "false").unwrap_or(true),
            server: group.get("server").map(str::to_string),
            port: group.get("port").and_then(|v| v.parse().ok()),
            resource: group.get("resource").map(str::to_string),
            last_presence: group
                .get("presence.last")
                .map(|v| parse_presence(v, Presence::Online))
                .unwrap_or(Presence::Online),
            login_presence,
            priorities,
            muc_service: group.get("muc.service").map(str::to_string),
            muc_nick,
            otr_policy: group.get("otr.policy").map(|v| match v {
                "opportunistic" => OtrPolicy::Opportunistic,
                "always" => OtrPolicy::Always,
                _ => OtrPolicy::Manual,
            }),
            omemo_policy: group.get("omemo.policy").map(|v| match v {
                "disabled" => OmemoPolicy::Disabled,
                _ => OmemoPolicy::Enabled,
            }),
            pgp_keyid: group.get("pgp.keyid").map(str::to_string),
            tls_policy: group.get("tls.policy").map(parse_tls_policy).unwrap_or(TlsPolicy::Allow),
            auth_policy: group.get("auth.policy").map(parse_auth_policy).unwrap_or(AuthPolicy::Default),
            theme: group.get("theme").map(str::to_string),
            startscript: group.get("script.start").map(str::to_string),
            client_name: group.get("client.name").map(str::to_string),
            last_activity: group.get("last.activity").map(str::to_string),
            max_sessions: group.get("max.sessions").and_then(|v| v.parse().ok()),
        })
    }

    /// Creates a new account, auto-adding it (e.g. from a bare-JID login) or via explicit add.
    /// Seeds default priorities to 0, the MUC nick from the local-part (or domain if the JID has
    /// none), and a random resource.
    pub fn add(
        &mut self,
        name: &str,
        jid: &BareJid,
        altdomain: Option<&str>,
        port: Option<u16>,
        tls_policy: Option<TlsPolicy>,
        auth_policy: Option<AuthPolicy>,
    ) -> Result<(), AccountError> {
        if self.file.group(name).is_some() {
            return Err(AccountError::Duplicate(name.to_string()));
        }

        let muc_nick = default_muc_nick(jid);

        let group = self.file.group_mut_or_insert(name);
        group.set("jid", jid.to_string());
        group.set("enabled", "true");
        group.set("resource", random_resource());
        group.set("muc.nick", muc_nick);
        for field in ["online", "chat", "away", "xa", "dnd"] {
            group.set(&format!("priority.{field}"), "0");
        }
        if let Some(altdomain) = altdomain {
            group.set("server", altdomain);
        }
        if let Some(port) = port {
            group.set("port", port.to_string());
        }
        group.set("tls.policy", tls_policy_str(tls_policy.unwrap_or(TlsPolicy::Allow)));
        group.set("auth.policy", auth_policy_str(auth_policy.unwrap_or(AuthPolicy::Default)));

        self.persist()
    }

    /// Sets a single raw key on the account's group (e.g. `"priority.online"`, `"7"`) and
    /// persists the change.
    pub fn set(&mut self, name: &str, field: &str, value: &str) -> Result<(), AccountError> {
        if self.file.group(name).is_none() {
            return Err(AccountError::NotFound(name.to_string()));
        }
        self.file.group_mut_or_insert(name).set(field, value);
        self.persist()
    }

    pub fn clear(&mut self, name: &str, field: &str) -> Result<(), AccountError> {
        let group = self
            .file
            .groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| AccountError::NotFound(name.to_string()))?;
        group.clear(field);
        self.persist()
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), AccountError> {
        if self.file.group(old).is_none() {
            return Err(AccountError::NotFound(old.to_string()));
        }
        if self.file.group(new).is_some() {
            return Err(AccountError::Duplicate(new.to_string()));
        }
        self.file.rename_group(old, new);
        self.persist()
    }

    pub fn remove(&mut self, name: &str) -> Result<(), AccountError> {
        if self.file.group(name).is_none() {
            return Err(AccountError::NotFound(name.to_string()));
        }
        self.file.remove_group(name);
        self.persist()
    }

    /// Records the presence the account was last seen with, so a future `login_presence =
    /// last` resumes it. Called by the session orchestrator on disconnect/presence change.
    pub fn set_last_presence(&mut self, name: &str, presence: Presence) -> Result<(), AccountError> {
        self.set(name, "presence.last", presence_str(presence))
    }

    /// Reloads the on-disk file, re-applies this in-memory copy's groups on top of it (so a
    /// concurrent edit to a group we never touched survives), and writes back atomically via a
    /// create-then-rename.
    fn persist(&mut self) -> Result<(), AccountError> {
        let disk_text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        let mut on_disk = KeyFile::parse(&disk_text);

        for name in self.file.group_names() {
            on_disk.remove_group(&name);
        }
        for name in &on_disk.group_names() {
            if self.file.group(name).is_none() {
                if let Some(group) = on_disk.group(name) {
                    self.file.groups.push(group.clone());
                }
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, self.file.serialize())?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn add_then_get_fills_in_defaults() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = AccountStore::load(tmp.path()).unwrap();
        let jid = BareJid::from_str("alice@x").unwrap();
        store.add("alice", &jid, None, None, None, None).unwrap();

        let account = store.get("alice").unwrap();
        assert_eq!(account.jid, jid);
        assert_eq!(account.muc_nick, "alice");
        assert_eq!(account.priorities, Priorities::default());
        assert!(account.resource.unwrap().starts_with("profanity."));
    }

    #[test]
    fn add_rejects_duplicate() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = AccountStore::load(tmp.path()).unwrap();
        let jid = BareJid::from_str("alice@x").unwrap();
        store.add("alice", &jid, None, None, None, None).unwrap();
        let err = store.add("alice", &jid, None, None, None, None).unwrap_err();
        assert!(matches!(err, AccountError::Duplicate(_)));
    }

    #[test]
    fn unknown_keys_survive_unrelated_mutation() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(
            tmp.path(),
            "[a]\njid = a@x\n\n[b]\njid = b@x\ncustom.x = 42\n\n",
        )
        .unwrap();

        let mut store = AccountStore::load(tmp.path()).unwrap();
        store.set("a", "priority.online", "7").unwrap();

        let reloaded = AccountStore::load(tmp.path()).unwrap();
        assert_eq!(reloaded.get("a").unwrap().priorities.online, 7);
        let b_group = reloaded.file.group("b").unwrap();
        assert_eq!(b_group.get("custom.x"), Some("42"));
    }

    #[test]
    fn priority_is_clamped_to_i8_range() {
        let tmp = NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "[a]\njid = a@x\npriority.online = 999\n\n").unwrap();
        let store = AccountStore::load(tmp.path()).unwrap();
        assert_eq!(store.get("a").unwrap().priorities.online, 127);
    }

    #[test]
    fn remove_drops_the_group() {
        let tmp = NamedTempFile::new().unwrap();
        let mut store = AccountStore::load(tmp.path()).unwrap();
        let jid = BareJid::from_str("alice@x").unwrap();
        store.add("alice", &jid, None, None, None, None).unwrap();
        store.remove("alice").unwrap();
        assert!(store.get("alice").is_err());
    }
}
