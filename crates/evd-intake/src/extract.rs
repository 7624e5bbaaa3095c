use anyhow::{bail, Result};
use evd_schemas::IncomingContact;
use serde_json::Value;
use std::collections::BTreeMap;

/// Question title -> contact field name ("name", "email", "phone",
/// "category", "status", "role", "notes"). Merged over the defaults, so
/// a venue can rename "Email" to "Your email address" in config.
pub type TitleOverrides = BTreeMap<String, String>;

/// Default question titles. "Email Address" is accepted alongside
/// "Email" because the forms host labels the collected-email question
/// that way.
const DEFAULT_TITLES: &[(&str, &str)] = &[
    ("Name", "name"),
    ("Email", "email"),
    ("Email Address", "email"),
    ("Phone", "phone"),
    ("Category", "category"),
    ("Status", "status"),
    ("Role", "role"),
    ("Notes", "notes"),
];

/// Build an `IncomingContact` from a named-values payload.
///
/// The payload must be a JSON object; each answer is a string or a
/// one-element string array (both shapes occur depending on the host).
/// Unknown titles are ignored. Whitespace-only answers count as absent.
pub fn contact_from_named_values(
    named_values: &Value,
    overrides: &TitleOverrides,
) -> Result<IncomingContact> {
    let map = match named_values {
        Value::Object(m) => m,
        other => bail!("submission payload must be a JSON object, got {other}"),
    };

    let mut contact = IncomingContact::default();

    for (title, answer) in map {
        let field = overrides
            .get(title)
            .map(|s| s.as_str())
            .or_else(|| lookup_default(title));
        let Some(field) = field else { continue };

        let Some(text) = answer_text(answer)? else {
            continue;
        };

        let slot = match field {
            "name" => &mut contact.name,
            "email" => &mut contact.email,
            "phone" => &mut contact.phone,
            "category" => &mut contact.category,
            "status" => &mut contact.status,
            "role" => &mut contact.role,
            "notes" => &mut contact.notes,
            other => bail!("title override maps to unknown contact field: {other}"),
        };
        *slot = Some(text);
    }

    Ok(contact)
}

fn lookup_default(title: &str) -> Option<&'static str> {
    DEFAULT_TITLES
        .iter()
        .find(|(t, _)| *t == title)
        .map(|(_, f)| *f)
}

/// First non-empty answer text, trimmed. None for blank answers.
fn answer_text(answer: &Value) -> Result<Option<String>> {
    let raw = match answer {
        Value::String(s) => s.as_str(),
        Value::Array(items) => match items.first() {
            Some(Value::String(s)) => s.as_str(),
            Some(other) => bail!("array answer must contain strings, got {other}"),
            None => return Ok(None),
        },
        Value::Null => return Ok(None),
        other => bail!("answer must be a string or string array, got {other}"),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_and_array_answers_both_extract() {
        let v = json!({
            "Name": ["Ana Lee"],
            "Email Address": "ana@x.com",
            "Phone": ["  111 "],
            "Notes": [""],
        });
        let c = contact_from_named_values(&v, &TitleOverrides::new()).unwrap();
        assert_eq!(c.name.as_deref(), Some("Ana Lee"));
        assert_eq!(c.email.as_deref(), Some("ana@x.com"));
        assert_eq!(c.phone.as_deref(), Some("111"));
        assert_eq!(c.notes, None);
    }

    #[test]
    fn overrides_win_over_defaults_and_unknown_titles_are_ignored() {
        let mut over = TitleOverrides::new();
        over.insert("Your email address".to_string(), "email".to_string());

        let v = json!({
            "Your email address": "ben@x.com",
            "Favourite colour": "green",
        });
        let c = contact_from_named_values(&v, &over).unwrap();
        assert_eq!(c.email.as_deref(), Some("ben@x.com"));
        assert_eq!(c.name, None);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(contact_from_named_values(&json!([1, 2]), &TitleOverrides::new()).is_err());
        assert!(contact_from_named_values(&json!({"Email": 42}), &TitleOverrides::new()).is_err());
    }
}
