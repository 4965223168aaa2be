// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::path::Path;
use std::sync::Arc;

use jid::{BareJid, FullJid, Jid};
use secrecy::ExposeSecret;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::warn;
use xmpp_parsers::message::MessageType;
use xmpp_parsers::muc::Muc as MucJoinPayload;
use xmpp_parsers::presence::{self, Presence as PresenceStanza, Type as PresenceType};
use xmpp_parsers::version::VersionResult;

use profanity_xmpp::connector::xmpp_rs;
use profanity_xmpp::{mods, Client, Event as XmppEvent, JidExt, JidParser};

use crate::account::{Account, AccountStore};
use crate::bookmark::{Bookmark, BookmarkTable};
use crate::caps::CapsCache;
use crate::chat_session::{ChatSessionTable, EncryptionProvider, Transition};
use crate::error::CoreError;
use crate::event_sink::{EventSink, SessionEvent};
use crate::muc::{MucEvent, MucRegistry};
use crate::preferences::{AutoAwayMode, Preferences};
use crate::roster::Roster;

const CLIENT_NAME: &str = "Profanity";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where the orchestrator currently stands relative to the server, mirroring the presence
/// lifecycle a TUI status line would show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Drives one logged-in account: owns the `profanity_xmpp::Client`, every piece of mirrored
/// server state (roster, MUC rooms, chat-state timers, caps cache, bookmarks), and the
/// activity-driven auto-away state machine. Built to be driven from a single thread per §5: all
/// mutation happens either in response to `process_events`/`tick`, both called synchronously by
/// the owner, never concurrently.
pub struct Session<S: EventSink> {
    event_sink: Arc<S>,
    account_store: AccountStore,
    account_name: Option<String>,
    full_jid: Option<FullJid>,
    client: Option<Client>,
    event_rx: Option<UnboundedReceiver<XmppEvent>>,
    status: ConnectionStatus,
    prefs: Preferences,
    roster: Roster,
    muc: MucRegistry,
    chats: ChatSessionTable,
    caps: CapsCache,
    bookmarks: BookmarkTable,
    encryption: Option<Arc<dyn EncryptionProvider>>,
    idle_secs: u64,
    auto_away_fired: AutoAwayStage,
    reconnect_account: Option<String>,
    reconnect_elapsed_secs: u64,
    presence_sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoAwayStage {
    Active,
    Idle,
    Away,
    Xa,
}

impl<S: EventSink> Session<S> {
    pub fn new(accounts_path: impl AsRef<Path>, event_sink: S) -> Result<Self, CoreError> {
        Ok(Session {
            event_sink: Arc::new(event_sink),
            account_store: AccountStore::load(accounts_path)?,
            account_name: None,
            full_jid: None,
            client: None,
            event_rx: None,
            status: ConnectionStatus::Disconnected,
            prefs: Preferences::default(),
            roster: Roster::new(),
            muc: MucRegistry::new(),
            chats: ChatSessionTable::new(),
            caps: CapsCache::new(),
            bookmarks: BookmarkTable::new(),
            encryption: None,
            idle_secs: 0,
            auto_away_fired: AutoAwayStage::Active,
            reconnect_account: None,
            reconnect_elapsed_secs: 0,
            presence_sequence: 0,
        })
    }

    pub fn set_encryption_provider(&mut self, provider: Arc<dyn EncryptionProvider>) {
        self.encryption = Some(provider);
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.prefs
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.account_store
    }

    pub fn accounts_mut(&mut self) -> &mut AccountStore {
        &mut self.account_store
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rooms(&self) -> &MucRegistry {
        &self.muc
    }

    pub fn bookmarks(&self) -> &BookmarkTable {
        &self.bookmarks
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn account_name(&self) -> Option<&str> {
        self.account_name.as_deref()
    }

    /// Connects and authenticates the named account, loads its roster and bookmarks, and
    /// publishes initial presence. The single entry point for §4.9's startup sequence.
    pub async fn login(&mut self, name: &str) -> Result<(), CoreError> {
        let account = self.account_store.get(name)?;

        let Some(password) = account.password.as_ref() else {
            return Err(CoreError::AuthFailed);
        };
        let password = password.expose_secret().to_string();

        let resource = account.resource.clone().unwrap_or_else(|| "profanity".to_string());
        let full_jid = JidParser::compose(&account.jid, &resource)?;

        let (tx, rx): (UnboundedSender<XmppEvent>, UnboundedReceiver<XmppEvent>) =
            unbounded_channel();
        let client = Client::builder()
            .set_connector_provider(xmpp_rs::Connector::provider())
            .set_event_handler(move |_, event| {
                let tx = tx.clone();
                Box::pin(async move {
                    let _ = tx.send(event);
                })
            })
            .build();

        self.status = ConnectionStatus::Connecting;

        if let Err(err) = client.connect(&full_jid, password.into()).await {
            self.status = ConnectionStatus::Disconnected;
            if self.reconnect_account.as_deref() == Some(name) {
                // This attempt was driven by the reconnect timer (§4.8); restart it rather
                // than surfacing a fresh login failure for every retry.
                self.reconnect_elapsed_secs = 0;
            } else {
                self.reconnect_account = None;
                self.event_sink.handle(SessionEvent::LoginFailed {
                    account: name.to_string(),
                });
                let _ = self.account_store.clear(name, "password");
            }
            return Err(err.into());
        }

        self.client = Some(client);
        self.event_rx = Some(rx);
        self.full_jid = Some(full_jid);
        self.account_name = Some(name.to_string());
        self.status = ConnectionStatus::Connected;
        self.reconnect_account = None;
        self.reconnect_elapsed_secs = 0;

        self.finish_login(&account).await?;

        Ok(())
    }

    /// The account name the reconnect timer is waiting to retry, once `reconnect_seconds` has
    /// elapsed since an involuntary disconnect. `tick` advances the timer; the event loop should
    /// poll this after each tick and call `login` again when it returns `Some`.
    pub fn reconnect_due(&mut self) -> Option<String> {
        if self.client.is_some() {
            return None;
        }
        let name = self.reconnect_account.clone()?;
        if self.prefs.reconnect_seconds == 0 {
            return None;
        }
        if self.reconnect_elapsed_secs >= self.prefs.reconnect_seconds {
            Some(name)
        } else {
            None
        }
    }

    async fn finish_login(&mut self, account: &Account) -> Result<(), CoreError> {
        let client = self.client.as_ref().expect("connected client");

        client
            .get_mod::<mods::Chat>()
            .set_message_carbons_enabled(self.prefs.carbons_enabled)
            .map_err(|_| CoreError::Disconnected)?;

        let roster = client.get_mod::<mods::Roster>().load_roster().await?;
        self.roster.load_from_push(roster.items);
        self.event_sink.handle(SessionEvent::RosterLoaded);

        let bookmark_mod = client.get_mod::<mods::Bookmark>();
        if let Ok(bookmarks) = bookmark_mod.load_bookmarks().await {
            let loaded: Vec<Bookmark> = bookmarks
                .into_iter()
                .map(|b| Bookmark {
                    barejid: b.jid.to_bare(),
                    nick: b.conference.nick,
                    password: b.conference.password,
                    name: b.conference.name,
                    autojoin: b.conference.autojoin,
                    gajim_minimize: crate::bookmark::GajimMinimize::Unset,
                })
                .collect();
            for autojoin in self.bookmarks.load(loaded) {
                self.event_sink.handle(SessionEvent::BookmarkAutojoin {
                    room: autojoin.barejid,
                    nick: autojoin.nick,
                    password: autojoin.password,
                });
            }
        }

        // Best-effort per §4.9's login sequence: a server that doesn't support blocking or
        // disco still leaves the session usable, so neither failure is fatal to login.
        if let Err(err) = client.get_mod::<mods::BlockList>().load_block_list().await {
            warn!("Failed to load blocking list. {}", err);
        }
        if let Err(err) = client.get_mod::<mods::Caps>().query_server_disco_info(None).await {
            warn!("Failed to disco server domain. {}", err);
        }

        client
            .get_mod::<mods::Status>()
            .send_presence(
                None,
                None,
                None,
                Some(account.priorities.online),
            )
            .map_err(|_| CoreError::Disconnected)?;

        self.event_sink.handle(SessionEvent::LoginSuccess {
            account: account.name.clone(),
            secured: true,
        });

        Ok(())
    }

    pub fn disconnect(&mut self) {
        // An explicit disconnect disarms the reconnect timer per §4.8: "only armed while the
        // user has not issued an explicit disconnect".
        self.reconnect_account = None;
        if let Some(client) = &self.client {
            client.disconnect();
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        for (barejid, _transition) in self.chats.close_all(self.prefs.states_enabled) {
            let _ = barejid;
        }
        self.client = None;
        self.event_rx = None;
        self.full_jid = None;
        self.status = ConnectionStatus::Disconnected;
        self.event_sink.handle(SessionEvent::Disconnected);
    }

    /// Drains every XMPP event queued since the last call and folds it into local state,
    /// dispatching the resulting `SessionEvent`s. Intended to be called once per iteration of
    /// the owner's event loop, never from more than one thread.
    pub fn process_events(&mut self) -> Result<(), CoreError> {
        let Some(rx) = self.event_rx.take() else {
            return Ok(());
        };

        let mut pending = Vec::new();
        while let Ok(event) = rx.try_recv() {
            pending.push(event);
        }
        self.event_rx = Some(rx);

        for event in pending {
            self.handle_xmpp_event(event);
        }

        Ok(())
    }

    fn handle_xmpp_event(&mut self, event: XmppEvent) {
        match event {
            XmppEvent::Client(client_event) => self.handle_client_event(client_event),
            XmppEvent::Chat(chat_event) => self.handle_chat_event(chat_event),
            XmppEvent::Status(mods::status::Event::Presence(presence)) => {
                self.handle_presence(presence)
            }
            XmppEvent::Caps(caps_event) => self.handle_caps_event(caps_event),
            XmppEvent::Roster(mods::roster::Event::Push(item)) => {
                self.roster.apply_set(item);
            }
            XmppEvent::Bookmark(mods::bookmark::Event::BookmarksChanged { bookmarks }) => {
                let loaded: Vec<Bookmark> = bookmarks
                    .into_iter()
                    .map(|b| Bookmark {
                        barejid: b.jid.to_bare(),
                        nick: b.conference.nick,
                        password: b.conference.password,
                        name: b.conference.name,
                        autojoin: b.conference.autojoin,
                        gajim_minimize: crate::bookmark::GajimMinimize::Unset,
                    })
                    .collect();
                self.bookmarks.load(loaded);
            }
            XmppEvent::BlockList(_) => {}
            XmppEvent::MUC(_) => {}
            XmppEvent::Version(mods::version::Event::Query { from, id }) => {
                self.reply_version(from, id);
            }
        }
    }

    fn handle_client_event(&mut self, event: profanity_xmpp::client::Event) {
        match event {
            profanity_xmpp::client::Event::Connected => {}
            profanity_xmpp::client::Event::Disconnected { error } => {
                let lost_connection = error.is_some();
                let was_connected = self.status == ConnectionStatus::Connected;
                let account = self.account_name.clone();
                self.teardown();
                if lost_connection {
                    if was_connected {
                        self.reconnect_account = account;
                        self.reconnect_elapsed_secs = 0;
                    }
                    self.event_sink.handle(SessionEvent::LostConnection);
                }
            }
            profanity_xmpp::client::Event::PingTimer => {}
        }
    }

    fn handle_chat_event(&mut self, event: mods::chat::Event) {
        match event {
            mods::chat::Event::Message(message) => self.handle_incoming_message(message),
            mods::chat::Event::Carbon(_) => {}
            mods::chat::Event::Sent(_) => {}
            mods::chat::Event::ChatStateChanged {
                from,
                message_type,
                ..
            } => {
                if message_type == MessageType::Chat {
                    if let Ok(full) = from.try_as_full() {
                        self.chats.record_peer_chat_state(&full.to_bare(), self.now());
                    }
                }
            }
        }
    }

    fn handle_incoming_message(&mut self, message: profanity_xmpp::stanza::Message) {
        let Some(from) = message.from.clone() else {
            return;
        };
        let Ok(from_full) = from.try_as_full() else {
            return;
        };

        if self.muc.is_room(&from_full.to_bare()) {
            if let Some(subject) = message.subject.clone() {
                let room = from_full.to_bare();
                let nick = from_full.resource().to_string();
                self.muc.set_subject(&room, Some(subject.clone()));
                self.event_sink.handle(SessionEvent::MucSubject {
                    room,
                    nick: Some(nick),
                    subject: Some(subject),
                });
                return;
            }

            let Some(body) = message.body.clone() else {
                return;
            };
            self.event_sink.handle(SessionEvent::MucMessage {
                room: from_full.to_bare(),
                nick: from_full.resource().to_string(),
                body,
                delay: message.delay.as_ref().map(|d| d.stamp.0.to_string()),
            });
            return;
        }

        let Some(body) = message.body.clone() else {
            return;
        };

        let (body, encrypted) = match &self.encryption {
            Some(provider) if provider.is_secure(&from_full.to_bare()) => {
                match provider.decrypt(&from_full.to_bare(), &body) {
                    Ok((plain, secure)) => (plain, secure),
                    Err(err) => {
                        self.event_sink.handle(SessionEvent::Error {
                            context: "decrypt".to_string(),
                            text: err,
                        });
                        return;
                    }
                }
            }
            _ => (body, false),
        };

        self.chats.set_resource_override(
            &from_full.to_bare(),
            Some(from_full.resource().to_string()),
            self.now(),
        );

        self.event_sink.handle(SessionEvent::Message {
            from_full: from_full.clone(),
            to_bare: self.bare_jid().unwrap_or_else(|| from_full.to_bare()),
            body,
            delay: message.delay.as_ref().map(|d| d.stamp.0.to_string()),
            id: message.id.as_ref().map(|id| id.to_string()),
            replace_id: message.replace.as_ref().map(|id| id.to_string()),
            encrypted,
        });
    }

    fn handle_presence(&mut self, presence: PresenceStanza) {
        let Some(from) = presence.from.clone() else {
            return;
        };

        if let Ok(from_full) = from.try_as_full() {
            if self.muc.is_room(&from_full.to_bare()) {
                if let Some(muc_event) = self.muc.handle_presence(&presence) {
                    self.dispatch_muc_event(muc_event);
                }
                return;
            }
        }

        let Ok(from_full) = from.try_as_full() else {
            if let (Jid::Bare(bare), presence::Type::Subscribe) = (&from, &presence.type_) {
                self.event_sink.handle(SessionEvent::SubscriptionRequest {
                    barejid: bare.clone(),
                });
            }
            return;
        };

        if presence.type_ == presence::Type::Subscribe {
            self.event_sink.handle(SessionEvent::SubscriptionRequest {
                barejid: from_full.to_bare(),
            });
            return;
        }

        let available = presence.type_ == presence::Type::None;
        let status = presence.statuses.values().next().cloned();
        let show = presence.show.clone();

        self.roster.apply_presence(
            from_full,
            available,
            show.clone(),
            status.clone(),
            presence.priority,
            None,
            self.next_sequence(),
        );

        self.event_sink.handle(SessionEvent::ContactPresence {
            barejid: from_full.to_bare(),
            resource: Some(from_full.resource().to_string()),
            show: available.then(|| crate::roster::Presence::from_show(show)),
            status,
        });
    }

    fn handle_caps_event(&mut self, event: mods::caps::Event) {
        match event {
            mods::caps::Event::Caps { from, caps } => {
                self.caps.record_presence_caps(&from, &caps);
            }
            mods::caps::Event::DiscoInfoQuery { from, id, .. } => {
                if let Some(client) = self.client.clone() {
                    let caps_mod = client.get_mod::<mods::Caps>();
                    let disco = self.own_disco_info();
                    profanity_utils::spawn(Box::pin(async move {
                        if let Err(err) = caps_mod.send_disco_info_query_response(from, id, disco).await {
                            warn!("Failed to answer disco#info query. {}", err);
                        }
                    }));
                }
            }
        }
    }

    fn dispatch_muc_event(&mut self, event: MucEvent) {
        match event {
            MucEvent::Joined { roomjid } => {
                self.event_sink.handle(SessionEvent::MucJoin { room: roomjid });
            }
            MucEvent::OccupantChanged { roomjid, nick } => {
                let Some(room) = self.muc.room(&roomjid) else {
                    return;
                };
                let Some(occupant) = room.occupants.get(&nick) else {
                    return;
                };
                self.event_sink.handle(SessionEvent::MucOccupantChange {
                    room: roomjid,
                    nick,
                    role: occupant.role.clone(),
                    affiliation: occupant.affiliation.clone(),
                });
            }
            MucEvent::OccupantLeft { roomjid, nick, reason } => {
                self.event_sink.handle(SessionEvent::MucLeave {
                    room: roomjid,
                    nick,
                    reason: Some(reason),
                });
            }
            MucEvent::NickChanged { roomjid, new, .. } => {
                self.event_sink.handle(SessionEvent::MucJoin { room: roomjid });
                let _ = new;
            }
        }
    }

    fn reply_version(&mut self, from: Jid, id: String) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let version = VersionResult {
            name: CLIENT_NAME.to_string(),
            version: CLIENT_VERSION.to_string(),
            os: Some(std::env::consts::OS.to_string()),
        };
        profanity_utils::spawn(Box::pin(async move {
            if let Err(err) = client
                .get_mod::<mods::Version>()
                .send_version_response(from, id, version)
                .await
            {
                warn!("Failed to answer version query. {}", err);
            }
        }));
    }

    fn own_disco_info(&self) -> xmpp_parsers::disco::DiscoInfoResult {
        xmpp_parsers::disco::DiscoInfoResult {
            node: None,
            identities: vec![xmpp_parsers::disco::Identity::new(
                "client",
                "console",
                "en",
                CLIENT_NAME,
            )],
            features: vec![
                xmpp_parsers::disco::Feature::new("http://jabber.org/protocol/muc"),
                xmpp_parsers::disco::Feature::new("http://jabber.org/protocol/caps"),
                xmpp_parsers::disco::Feature::new("http://jabber.org/protocol/chatstates"),
                xmpp_parsers::disco::Feature::new("urn:xmpp:ping"),
            ],
            extensions: vec![],
        }
    }

    pub fn send_message(&mut self, to: &BareJid, body: &str) -> Result<(), CoreError> {
        let client = self.client.as_ref().ok_or(CoreError::Disconnected)?;

        let (body, transition) = match &self.encryption {
            Some(provider) if provider.is_secure(to) => {
                let (cipher, _extra) = provider
                    .encrypt(to, body)
                    .map_err(CoreError::EncryptionFailed)?;
                (cipher, self.chats.notify_user_activity(to, self.now(), self.prefs.states_enabled))
            }
            _ => (
                body.to_string(),
                self.chats.notify_user_activity(to, self.now(), self.prefs.states_enabled),
            ),
        };

        let chat_state = transition.map(Transition::as_chat_state);

        client
            .get_mod::<mods::Chat>()
            .send_message(Jid::from(to.clone()), body, &MessageType::Chat, chat_state)
            .map_err(|_| CoreError::Disconnected)?;

        Ok(())
    }

    /// Advances chat-state timers, the activity-driven auto-away machine, and (while
    /// disconnected) the reconnect backoff. Call once per second, as the owner's event loop
    /// idles; per §5 this is the only place `ConnectionStatus::Disconnected` advances toward a
    /// retry.
    pub fn tick(&mut self, now: u64) {
        if self.client.is_none() {
            if self.reconnect_account.is_some() {
                self.reconnect_elapsed_secs += 1;
            }
            return;
        }

        for (barejid, transition) in self.chats.tick(now, self.prefs.gone_minutes, self.prefs.states_enabled) {
            if let Some(client) = &self.client {
                let _ = client.get_mod::<mods::Chat>().send_chat_state(
                    Jid::from(barejid),
                    transition.as_chat_state(),
                    &MessageType::Chat,
                );
            }
        }

        self.advance_auto_away(now);
    }

    /// Records that the user did something (typed, switched windows, …), resetting the idle
    /// clock the auto-away machine reads and, per `check_on_activity`, restoring the presence
    /// that was in place before auto-away took over (§4.9: `idle|away|xa → active`).
    pub fn notify_activity(&mut self) {
        self.idle_secs = 0;
        if self.auto_away_fired != AutoAwayStage::Active && self.prefs.check_on_activity {
            self.auto_away_fired = AutoAwayStage::Active;
            if let Some(client) = &self.client {
                let _ = client.get_mod::<mods::Status>().send_presence(None, None, None, None);
            }
        }
    }

    /// §4.9's auto-away machine. `mode = idle` only ever announces the user's continued
    /// presence (no show change); `mode = away` moves to `away` and, once `xa_time_secs`
    /// elapses on top of that, to `xa`.
    fn advance_auto_away(&mut self, _now: u64) {
        self.idle_secs += 1;

        let Some(client) = self.client.clone() else {
            return;
        };

        match self.prefs.auto_away_mode {
            AutoAwayMode::Off => {}
            AutoAwayMode::Idle => {
                if self.auto_away_fired == AutoAwayStage::Active
                    && self.idle_secs >= self.prefs.away_time_secs
                {
                    self.auto_away_fired = AutoAwayStage::Idle;
                    let _ = client.get_mod::<mods::Status>().send_presence(None, None, None, None);
                }
            }
            AutoAwayMode::Away => {
                if self.auto_away_fired == AutoAwayStage::Active
                    && self.idle_secs >= self.prefs.away_time_secs
                {
                    self.auto_away_fired = AutoAwayStage::Away;
                    let _ = client.get_mod::<mods::Status>().send_presence(
                        Some(presence::Show::Away),
                        None,
                        None,
                        None,
                    );
                } else if self.auto_away_fired == AutoAwayStage::Away
                    && self.prefs.xa_time_secs > 0
                    && self.idle_secs >= self.prefs.xa_time_secs
                {
                    self.auto_away_fired = AutoAwayStage::Xa;
                    let _ = client.get_mod::<mods::Status>().send_presence(
                        Some(presence::Show::Xa),
                        None,
                        None,
                        None,
                    );
                }
            }
        }
    }

    pub async fn join_room(
        &mut self,
        room: &BareJid,
        nick: &str,
        password: Option<String>,
    ) -> Result<(), CoreError> {
        let client = self.client.as_ref().ok_or(CoreError::Disconnected)?;

        self.muc.record_join_request(room.clone(), nick.to_string(), password.clone());

        let occupant_jid = JidParser::compose(room, nick)?;
        let mut presence = PresenceStanza::new(PresenceType::None).with_to(occupant_jid);
        let join = match password {
            Some(password) => MucJoinPayload::new().with_password(password),
            None => MucJoinPayload::new(),
        };
        presence.add_payload(join);

        client
            .send_raw_stanza(presence)
            .map_err(|_| CoreError::Disconnected)?;

        Ok(())
    }

    pub fn leave_room(&mut self, room: &BareJid) -> Result<(), CoreError> {
        let client = self.client.as_ref().ok_or(CoreError::Disconnected)?;

        let nick = self
            .muc
            .room(room)
            .map(|r| r.my_nick.clone())
            .ok_or_else(|| CoreError::RoomNotJoined(room.to_string()))?;

        let occupant_jid = JidParser::compose(room, &nick)?;
        let presence = PresenceStanza::new(PresenceType::Unavailable).with_to(occupant_jid);

        client
            .send_raw_stanza(presence)
            .map_err(|_| CoreError::Disconnected)?;

        self.muc.leave(room);

        Ok(())
    }

    pub fn change_nick(&mut self, room: &BareJid, new_nick: &str) -> Result<(), CoreError> {
        let client = self.client.as_ref().ok_or(CoreError::Disconnected)?;

        if !self.muc.is_room(room) {
            return Err(CoreError::RoomNotJoined(room.to_string()));
        }

        self.muc.request_nick_change(room, new_nick.to_string());

        let occupant_jid = JidParser::compose(room, new_nick)?;
        let presence = PresenceStanza::new(PresenceType::None).with_to(occupant_jid);

        client
            .send_raw_stanza(presence)
            .map_err(|_| CoreError::Disconnected)?;

        Ok(())
    }

    pub fn send_muc_message(&mut self, room: &BareJid, body: &str) -> Result<(), CoreError> {
        let client = self.client.as_ref().ok_or(CoreError::Disconnected)?;

        client
            .get_mod::<mods::Chat>()
            .send_message(Jid::from(room.clone()), body, &MessageType::Groupchat, None)
            .map_err(|_| CoreError::Disconnected)?;

        Ok(())
    }

    fn bare_jid(&self) -> Option<BareJid> {
        self.full_jid.as_ref().map(|j| j.to_bare())
    }

    /// Monotonic counter breaking priority ties toward "most recently updated" (§4.3).
    fn next_sequence(&mut self) -> u64 {
        self.presence_sequence += 1;
        self.presence_sequence
    }

    fn now(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl<S: EventSink> Drop for Session<S> {
    fn drop(&mut self) {
        if let Some(client) = &self.client {
            client.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn new_session_starts_disconnected() {
        let tmp = NamedTempFile::new().unwrap();
        let session = Session::new(tmp.path(), crate::event_sink::RecordingEventSink::new()).unwrap();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
        assert!(session.account_name().is_none());
    }

    #[test]
    fn preferences_are_mutable_through_the_session() {
        let tmp = NamedTempFile::new().unwrap();
        let mut session =
            Session::new(tmp.path(), crate::event_sink::RecordingEventSink::new()).unwrap();
        session.preferences_mut().states_enabled = false;
        assert!(!session.preferences().states_enabled);
    }

    #[test]
    fn reconnect_fires_once_reconnect_seconds_have_elapsed() {
        let tmp = NamedTempFile::new().unwrap();
        let mut session =
            Session::new(tmp.path(), crate::event_sink::RecordingEventSink::new()).unwrap();
        session.preferences_mut().reconnect_seconds = 5;

        // Simulate an involuntary disconnect while previously connected, per §4.8.
        session.account_name = Some("alice@x".to_string());
        session.status = ConnectionStatus::Connected;
        session.reconnect_account = Some("alice@x".to_string());
        session.reconnect_elapsed_secs = 0;
        session.status = ConnectionStatus::Disconnected;

        for t in 1..=4 {
            session.tick(t);
            assert_eq!(session.reconnect_due(), None, "no attempt before t=5");
        }

        session.tick(5);
        assert_eq!(session.reconnect_due(), Some("alice@x".to_string()));
    }

    #[test]
    fn explicit_disconnect_disarms_reconnect() {
        let tmp = NamedTempFile::new().unwrap();
        let mut session =
            Session::new(tmp.path(), crate::event_sink::RecordingEventSink::new()).unwrap();
        session.reconnect_account = Some("alice@x".to_string());
        session.disconnect();
        assert_eq!(session.reconnect_due(), None);
    }
}
