// prose-core-client/prose-xmpp
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use jid::{BareJid, FullJid, Jid, NodePart, ResourcePart};

/// Splits/validates `local@domain/resource` strings and lowercases bare JIDs, leaning on the
/// `jid` crate for the underlying RFC 7622 parsing and layering the convenience operations the
/// rest of the workspace expects on top of it.
pub trait JidExt: Sized {
    fn parse_jid(raw: &str) -> Result<Jid, JidError>;
    fn compose(bare: &BareJid, resource: &str) -> Result<FullJid, JidError>;
    fn equal_bare(a: &Jid, b: &Jid) -> bool;
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum JidError {
    #[error("JID string is empty")]
    Empty,
    #[error("JID string cannot start with '/'")]
    LeadingSlash,
    #[error("JID string cannot start with '@'")]
    LeadingAt,
    #[error("Failed to parse JID: {0}")]
    Invalid(String),
}

pub struct JidParser {}

impl JidExt for JidParser {
    fn parse_jid(raw: &str) -> Result<Jid, JidError> {
        if raw.is_empty() {
            return Err(JidError::Empty);
        }
        if raw.starts_with('/') {
            return Err(JidError::LeadingSlash);
        }
        if raw.starts_with('@') {
            return Err(JidError::LeadingAt);
        }
        raw.parse::<Jid>()
            .map_err(|err| JidError::Invalid(err.to_string()))
    }

    fn compose(bare: &BareJid, resource: &str) -> Result<FullJid, JidError> {
        let node = bare
            .node_str()
            .map(NodePart::new)
            .transpose()
            .map_err(|_| JidError::Invalid(bare.to_string()))?;
        let resource_part = ResourcePart::new(resource)
            .map_err(|_| JidError::Invalid(format!("{bare}/{resource}")))?;
        Ok(FullJid::from_parts(
            node.as_ref(),
            &bare.domain(),
            &resource_part,
        ))
    }

    fn equal_bare(a: &Jid, b: &Jid) -> bool {
        a.to_bare().to_string().to_lowercase() == b.to_bare().to_string().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn rejects_empty_string() {
        assert_eq!(JidParser::parse_jid(""), Err(JidError::Empty));
    }

    #[test]
    fn rejects_leading_slash() {
        assert_eq!(
            JidParser::parse_jid("/resource"),
            Err(JidError::LeadingSlash)
        );
    }

    #[test]
    fn rejects_leading_at() {
        assert_eq!(JidParser::parse_jid("@domain"), Err(JidError::LeadingAt));
    }

    #[test]
    fn parse_round_trips_bare_jid() {
        let jid = JidParser::parse_jid("a@x").unwrap();
        assert_eq!(JidParser::parse_jid(jid.to_string().as_str()).unwrap().to_bare(), jid.to_bare());
    }

    #[test]
    fn compose_then_parse_yields_bare_and_resource() {
        let bare = BareJid::from_str("a@x").unwrap();
        let full = JidParser::compose(&bare, "phone").unwrap();
        let parsed = JidParser::parse_jid(&full.to_string()).unwrap();
        assert_eq!(parsed.to_bare(), bare);
        assert_eq!(
            parsed.try_as_full().map(|f| f.resource().to_string()).ok(),
            Some("phone".to_string())
        );
    }

    #[test]
    fn equal_bare_is_case_insensitive_for_local_and_domain_but_not_resource() {
        let a = Jid::from_str("Romeo@Montague.lit/Orchard").unwrap();
        let b = Jid::from_str("romeo@montague.lit/Orchard").unwrap();
        let c = Jid::from_str("romeo@montague.lit/orchard").unwrap();
        assert!(JidExt::equal_bare(&a, &b));
        // Resources are compared verbatim elsewhere; `equal_bare` only normalizes local+domain.
        assert!(JidExt::equal_bare(&a, &c));
    }
}
