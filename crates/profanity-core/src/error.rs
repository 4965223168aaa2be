// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use profanity_xmpp::{ConnectionError, JidError, RequestError};

use crate::account::AccountError;
use crate::caps::CapsError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Malformed stanza: {0}")]
    MalformedStanza(String),
    #[error("No handler registered for id {0}")]
    UnknownId(String),
    #[error("Authentication failed")]
    AuthFailed,
    #[error("TLS negotiation failed")]
    TlsFailed,
    #[error("Not connected")]
    Disconnected,
    #[error(transparent)]
    InvalidJid(#[from] JidError),
    #[error("Account '{0}' already exists")]
    DuplicateAccount(String),
    #[error("Account '{0}' not found")]
    AccountNotFound(String),
    #[error("Room '{0}' is not joined")]
    RoomNotJoined(String),
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("I/O error: {0}")]
    IoFailed(#[from] std::io::Error),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Caps(#[from] CapsError),
    #[error(transparent)]
    Xmpp(#[from] anyhow::Error),
}
