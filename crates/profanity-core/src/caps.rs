// prose-core-client/profanity-core
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashMap;

use base64::{engine::general_purpose, Engine as _};
use jid::Jid;
use sha1::{Digest, Sha1};
use xmpp_parsers::data_forms::DataForm;
use xmpp_parsers::disco::DiscoInfoResult;

/// XEP-0115: Entity Capabilities.
///
/// Maintains the `ver` -> capability-set map and the peer-JID -> `ver` map that lets a cached
/// disco#info result be reused for every resource that advertises the same hash.
#[derive(Debug, Default)]
pub struct CapsCache {
    by_ver: HashMap<String, CapsEntry>,
    jid_to_ver: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapsError {
    #[error("Caps verification failed: expected ver {expected}, computed {computed}")]
    VerMismatch { expected: String, computed: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub category: String,
    pub r#type: String,
    pub lang: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapsEntry {
    pub ver: String,
    pub identity: Identity,
    pub features: Vec<String>,
    pub extended_forms: HashMap<String, DataForm>,
}

impl CapsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the XEP-0115 §5 ver-string for a disco#info result.
    pub fn ver_string(result: &DiscoInfoResult) -> String {
        let mut identities: Vec<&xmpp_parsers::disco::Identity> = result.identities.iter().collect();
        identities.sort_by(|a, b| {
            (&a.category, &a.type_, &a.lang, &a.name).cmp(&(&b.category, &b.type_, &b.lang, &b.name))
        });

        let mut s = String::new();
        for identity in identities {
            s.push_str(&identity.category);
            s.push('/');
            s.push_str(&identity.type_);
            s.push('/');
            s.push_str(identity.lang.as_deref().unwrap_or(""));
            s.push('/');
            s.push_str(identity.name.as_deref().unwrap_or(""));
            s.push('<');
        }

        let mut features: Vec<&str> = result.features.iter().map(|f| f.var.as_str()).collect();
        features.sort_unstable();
        for feature in features {
            s.push_str(feature);
            s.push('<');
        }

        if !result.extensions.is_empty() {
            let mut forms: Vec<&DataForm> = result.extensions.iter().collect();
            forms.sort_by(|a, b| a.form_type.cmp(&b.form_type));

            for form in forms {
                s.push_str(form.form_type.as_deref().unwrap_or(""));
                s.push('<');

                let mut fields = form.fields.clone();
                fields.sort_by(|a, b| a.var.cmp(&b.var));

                for field in fields {
                    s.push_str(&field.var);
                    s.push('<');
                    let mut values = field.values.clone();
                    values.sort();
                    for value in values {
                        s.push_str(&value);
                        s.push('<');
                    }
                }
            }
        }

        s
    }

    /// Computes the base64-encoded SHA-1 digest of the ver-string, i.e. the `ver` attribute
    /// value that a `<c/>` caps element should carry for this disco#info result.
    pub fn compute_ver(result: &DiscoInfoResult) -> String {
        let ver_string = Self::ver_string(result);
        let digest = Sha1::digest(ver_string.as_bytes());
        general_purpose::STANDARD.encode(digest)
    }

    /// Verifies a disco#info result against the `ver` advertised by its peer and, on success,
    /// caches it under that key. On mismatch the entry is discarded per XEP-0115 §5.4.
    pub fn verify_and_insert(
        &mut self,
        expected_ver: &str,
        result: DiscoInfoResult,
    ) -> Result<(), CapsError> {
        let computed = Self::compute_ver(&result);
        if computed != expected_ver {
            return Err(CapsError::VerMismatch {
                expected: expected_ver.to_string(),
                computed,
            });
        }

        let identity = result
            .identities
            .first()
            .map(|i| Identity {
                category: i.category.clone(),
                r#type: i.type_.clone(),
                lang: i.lang.clone(),
                name: i.name.clone(),
            })
            .unwrap_or(Identity {
                category: String::new(),
                r#type: String::new(),
                lang: None,
                name: None,
            });

        let extended_forms = result
            .extensions
            .iter()
            .filter_map(|form| form.form_type.clone().map(|t| (t, form.clone())))
            .collect();

        self.by_ver.insert(
            expected_ver.to_string(),
            CapsEntry {
                ver: expected_ver.to_string(),
                identity,
                features: result.features.into_iter().map(|f| f.var).collect(),
                extended_forms,
            },
        );

        Ok(())
    }

    /// Records which `ver` a full-JID is currently advertising, as seen in a presence's `<c/>`
    /// element. Does not itself trigger a disco#info lookup; the caller decides whether the
    /// `ver` is already cached or needs to be queried.
    pub fn record_presence_caps(&mut self, from: &Jid, caps: &xmpp_parsers::caps::Caps) {
        let ver = general_purpose::STANDARD.encode(&caps.hash.hash);
        self.jid_to_ver.insert(from.to_string(), ver);
    }

    pub fn entry(&self, ver: &str) -> Option<&CapsEntry> {
        self.by_ver.get(ver)
    }

    pub fn entry_for_jid(&self, jid: &Jid) -> Option<&CapsEntry> {
        self.jid_to_ver
            .get(&jid.to_string())
            .and_then(|ver| self.by_ver.get(ver))
    }

    pub fn is_ver_cached(&self, ver: &str) -> bool {
        self.by_ver.contains_key(ver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmpp_parsers::disco::{Feature, Identity as DiscoIdentity};

    fn sample_result() -> DiscoInfoResult {
        DiscoInfoResult {
            node: None,
            identities: vec![DiscoIdentity::new("client", "pc", "en", "Prof")],
            features: vec![
                Feature::new("http://jabber.org/protocol/muc"),
                Feature::new("urn:xmpp:ping"),
            ],
            extensions: vec![],
        }
    }

    #[test]
    fn ver_string_matches_xep_0115_example() {
        let result = sample_result();
        assert_eq!(
            CapsCache::ver_string(&result),
            "client/pc/en/Prof<http://jabber.org/protocol/muc<urn:xmpp:ping<"
        );
    }

    #[test]
    fn verify_and_insert_accepts_matching_ver() {
        let result = sample_result();
        let ver = CapsCache::compute_ver(&result);

        let mut cache = CapsCache::new();
        cache.verify_and_insert(&ver, result).unwrap();
        assert!(cache.is_ver_cached(&ver));
    }

    #[test]
    fn verify_and_insert_rejects_mismatched_ver() {
        let result = sample_result();
        let mut cache = CapsCache::new();
        let err = cache.verify_and_insert("bogus==", result).unwrap_err();
        assert!(matches!(err, CapsError::VerMismatch { .. }));
        assert!(!cache.is_ver_cached("bogus=="));
    }
}
