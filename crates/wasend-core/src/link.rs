use crate::domain::{looks_like_phone, normalize_for_dialing, Contact};
use crate::error::CoreError;
use crate::matching::{resolve_by_name, Resolution};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use url::Url;

pub const DEFAULT_LINK_BASE: &str = "https://wa.me";

// Everything except the characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialing {
    pub default_country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub phone_digits: String,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefill {
    pub query: Option<String>,
    pub text: Option<String>,
}

/// Builds `<base>/<digits>?text=<message>`. Only the base goes through
/// `Url`, so the message keeps exactly the `encodeURIComponent` escaping.
pub fn build_chat_link(base: &str, phone_digits: &str, message: &str) -> Result<String, CoreError> {
    if phone_digits.is_empty() || !phone_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidPhone(phone_digits.to_string()));
    }
    let base = base.trim().trim_end_matches('/');
    let parsed = Url::parse(base).map_err(|_| CoreError::InvalidLinkBase(base.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https")
        || parsed.host_str().is_none()
        || parsed.query().is_some()
        || parsed.fragment().is_some()
    {
        return Err(CoreError::InvalidLinkBase(base.to_string()));
    }
    Ok(format!(
        "{}/{}?text={}",
        parsed.as_str().trim_end_matches('/'),
        phone_digits,
        utf8_percent_encode(message, COMPONENT)
    ))
}

/// Works out who a message goes to: a raw phone number typed by the user, or
/// a uniquely matching saved contact.
pub fn resolve_recipient(
    query: &str,
    message: &str,
    contacts: &[Contact],
    dialing: &Dialing,
) -> Result<Recipient, CoreError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CoreError::EmptyQuery);
    }
    if message.trim().is_empty() {
        return Err(CoreError::EmptyMessage);
    }
    let country = dialing.default_country_code.as_deref();

    if looks_like_phone(query).is_some() {
        let phone_digits = normalize_for_dialing(query, country)
            .ok_or_else(|| CoreError::InvalidPhone(query.to_string()))?;
        return Ok(Recipient {
            phone_digits,
            contact: None,
        });
    }

    let contact = match resolve_by_name(query, contacts) {
        Resolution::Unique(contact) => contact,
        Resolution::Ambiguous(found) => {
            return Err(CoreError::NoUniqueMatch {
                query: query.to_string(),
                candidates: found.into_iter().map(|contact| contact.name).collect(),
            })
        }
        Resolution::NotFound => {
            return Err(CoreError::NoUniqueMatch {
                query: query.to_string(),
                candidates: Vec::new(),
            })
        }
    };

    let phone_digits = normalize_for_dialing(&contact.phone, country)
        .ok_or_else(|| CoreError::InvalidContactPhone(contact.name.clone()))?;
    Ok(Recipient {
        phone_digits,
        contact: Some(contact),
    })
}

/// Reads `q` and `text` from a shared link such as
/// `https://example.test/?q=Alice&text=hi`.
pub fn parse_prefill(url: &Url) -> Prefill {
    let mut prefill = Prefill::default();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "q" if prefill.query.is_none() => prefill.query = Some(value.into_owned()),
            "text" if prefill.text.is_none() => prefill.text = Some(value.into_owned()),
            _ => {}
        }
    }
    prefill
}

#[cfg(test)]
mod tests {
    use super::{build_chat_link, parse_prefill, resolve_recipient, Dialing, DEFAULT_LINK_BASE};
    use crate::domain::Contact;
    use crate::error::CoreError;
    use url::Url;

    fn contacts() -> Vec<Contact> {
        vec![
            Contact::new("Alice Martin", "+1 (415) 555-0123").unwrap(),
            Contact::new("Alicia Keys", "+1 212 555 0100").unwrap(),
            Contact::new("Bruno", "ask later").unwrap(),
        ]
    }

    #[test]
    fn link_encodes_like_uri_components() {
        let link =
            build_chat_link(DEFAULT_LINK_BASE, "14155550123", "Hi there & bye? 100%").unwrap();
        assert_eq!(
            link,
            "https://wa.me/14155550123?text=Hi%20there%20%26%20bye%3F%20100%25"
        );
    }

    #[test]
    fn link_keeps_unreserved_marks_and_encodes_utf8() {
        let link = build_chat_link("https://wa.me/", "1", "it's ok! (fine) ~café*").unwrap();
        assert_eq!(link, "https://wa.me/1?text=it's%20ok!%20(fine)%20~caf%C3%A9*");
    }

    #[test]
    fn link_rejects_non_digit_phone_and_bad_base() {
        assert!(matches!(
            build_chat_link(DEFAULT_LINK_BASE, "+1", "hi"),
            Err(CoreError::InvalidPhone(_))
        ));
        assert!(matches!(
            build_chat_link("ftp://example.com", "1", "hi"),
            Err(CoreError::InvalidLinkBase(_))
        ));
        assert!(matches!(
            build_chat_link("https://wa.me/?x=1", "1", "hi"),
            Err(CoreError::InvalidLinkBase(_))
        ));
    }

    #[test]
    fn raw_phone_is_dialed_directly() {
        let recipient =
            resolve_recipient("+49 30 1234567", "hi", &[], &Dialing::default()).unwrap();
        assert_eq!(recipient.phone_digits, "49301234567");
        assert!(recipient.contact.is_none());
    }

    #[test]
    fn raw_phone_with_international_prefix_ignores_country_code() {
        let dialing = Dialing {
            default_country_code: Some("49".to_string()),
        };
        let recipient = resolve_recipient("0044 20 7946 0958", "hi", &[], &dialing).unwrap();
        assert_eq!(recipient.phone_digits, "442079460958");
        assert!(recipient.contact.is_none());

        let trunk = resolve_recipient("030 1234567", "hi", &[], &dialing).unwrap();
        assert_eq!(trunk.phone_digits, "49301234567");
    }

    #[test]
    fn short_digit_query_is_looked_up_by_phone() {
        let recipient =
            resolve_recipient("555-0123", "hi", &contacts(), &Dialing::default()).unwrap();
        assert_eq!(recipient.contact.unwrap().name, "Alice Martin");
        assert_eq!(recipient.phone_digits, "14155550123");

        let err =
            resolve_recipient("555 0199", "hi", &contacts(), &Dialing::default()).unwrap_err();
        assert!(matches!(err, CoreError::NoUniqueMatch { .. }));
    }

    #[test]
    fn name_resolves_to_contact_phone() {
        let recipient =
            resolve_recipient("alice martin", "hi", &contacts(), &Dialing::default()).unwrap();
        assert_eq!(recipient.phone_digits, "14155550123");
        assert_eq!(recipient.contact.unwrap().name, "Alice Martin");
    }

    #[test]
    fn ambiguous_name_lists_candidates() {
        let err = resolve_recipient("ali", "hi", &contacts(), &Dialing::default()).unwrap_err();
        match err {
            CoreError::NoUniqueMatch { candidates, .. } => {
                assert_eq!(candidates, vec!["Alice Martin", "Alicia Keys"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn contact_without_digits_is_rejected() {
        let err = resolve_recipient("Bruno", "hi", &contacts(), &Dialing::default()).unwrap_err();
        assert_eq!(err, CoreError::InvalidContactPhone("Bruno".to_string()));
    }

    #[test]
    fn blank_inputs_are_rejected() {
        let dialing = Dialing::default();
        assert_eq!(
            resolve_recipient(" ", "hi", &contacts(), &dialing).unwrap_err(),
            CoreError::EmptyQuery
        );
        assert_eq!(
            resolve_recipient("Bruno", "  ", &contacts(), &dialing).unwrap_err(),
            CoreError::EmptyMessage
        );
    }

    #[test]
    fn prefill_reads_query_parameters() {
        let url = Url::parse("https://example.test/?q=Alice%20Martin&text=see+you&x=1").unwrap();
        let prefill = parse_prefill(&url);
        assert_eq!(prefill.query.as_deref(), Some("Alice Martin"));
        assert_eq!(prefill.text.as_deref(), Some("see you"));
    }
}
