// Player identity shared by all games. The server reads it from the `player_id` cookie on every
// socket connection, so it must exist before the first game page is opened.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;


pub const PLAYER_ID_COOKIE: &str = "player_id";
pub const PLAYER_NAME_COOKIE: &str = "player_name";

// ~91 days.
pub const PLAYER_ID_MAX_AGE: Duration = Duration::from_secs(7_890_000);


#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn generate() -> Self { PlayerId(Uuid::new_v4().hyphenated().to_string()) }

    // Accepts anything UUID-shaped: five groups of 8-4-4-4-12 hex digits.
    pub fn parse(s: &str) -> Option<Self> {
        let groups: Vec<&str> = s.split('-').collect();
        let well_formed = groups.len() == 5
            && groups.iter().zip([8, 4, 4, 4, 12]).all(|(group, len)| {
                group.len() == len && group.chars().all(|ch| ch.is_ascii_hexdigit())
            });
        well_formed.then(|| PlayerId(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    // Value for `document.cookie = ...`.
    pub fn to_cookie_assignment(&self) -> String {
        format!("{}={}; max-age={}; path=/", PLAYER_ID_COOKIE, self.0, PLAYER_ID_MAX_AGE.as_secs())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// Finds a cookie in a `document.cookie`-style string ("a=1; b=2").
pub fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|entry| {
        let (key, value) = entry.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

pub fn player_id_from_cookies(cookies: &str) -> Option<PlayerId> {
    find_cookie(cookies, PLAYER_ID_COOKIE).and_then(PlayerId::parse)
}

// Returns the existing id, or a fresh one together with the cookie assignment that stores it.
pub fn ensure_player_id(cookies: &str) -> (PlayerId, Option<String>) {
    match player_id_from_cookies(cookies) {
        Some(id) => {
            log::info!("Detected player ID: {id}");
            (id, None)
        }
        None => {
            let id = PlayerId::generate();
            log::info!("Set player ID to: {id}");
            let assignment = id.to_cookie_assignment();
            (id, Some(assignment))
        }
    }
}

// Header for the websocket handshake: the server identifies players by these cookies.
pub fn cookie_header(player_id: &PlayerId, player_name: &str) -> String {
    format!(
        "{}={}; {}={}",
        PLAYER_ID_COOKIE,
        player_id,
        PLAYER_NAME_COOKIE,
        quote_cookie_value(player_name)
    )
}

// Quotes a cookie value the way Werkzeug's `dump_cookie` does, so the server's cookie parser
// reads back the original text. Separators and non-ASCII bytes become octal escapes, which also
// keeps the header plain ASCII.
pub fn quote_cookie_value(value: &str) -> String {
    const PLAIN_PUNCTUATION: &[u8] = b"!#$%&'()*+-./:<=>?@[]^_`{|}~";
    let plain = value.bytes().all(|b| b.is_ascii_alphanumeric() || PLAIN_PUNCTUATION.contains(&b));
    if plain {
        return value.to_owned();
    }
    let mut quoted = String::from("\"");
    for b in value.bytes() {
        match b {
            b'"' => quoted.push_str("\\\""),
            b'\\' => quoted.push_str("\\\\"),
            0x00..=0x19 | b',' | b';' | 0x7f..=0xff => quoted.push_str(&format!("\\{b:03o}")),
            _ => quoted.push(char::from(b)),
        }
    }
    quoted.push('"');
    quoted
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_is_uuid_shaped() {
        let id = PlayerId::generate();
        assert_eq!(PlayerId::parse(id.as_str()), Some(id.clone()));
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(PlayerId::parse("").is_none());
        assert!(PlayerId::parse("not-a-uuid").is_none());
        assert!(PlayerId::parse("0123456z-89ab-cdef-0123-456789abcdef").is_none());
        assert!(PlayerId::parse("01234567-89ab-cdef-0123-456789abcdef").is_some());
    }

    #[test]
    fn cookie_lookup() {
        let cookies = "theme=dark; player_id=01234567-89ab-cdef-0123-456789abcdef; x=y";
        assert_eq!(find_cookie(cookies, "x"), Some("y"));
        assert_eq!(find_cookie(cookies, "player"), None);
        assert_eq!(
            player_id_from_cookies(cookies).unwrap().as_str(),
            "01234567-89ab-cdef-0123-456789abcdef"
        );
    }

    #[test]
    fn ensure_reuses_existing_cookie() {
        let (id, assignment) = ensure_player_id("player_id=01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(id.as_str(), "01234567-89ab-cdef-0123-456789abcdef");
        assert!(assignment.is_none());
    }

    #[test]
    fn ensure_creates_cookie_with_max_age() {
        let (id, assignment) = ensure_player_id("theme=dark");
        let assignment = assignment.unwrap();
        assert!(assignment.starts_with(&format!("player_id={id};")));
        assert!(assignment.contains("max-age=7890000"));
    }

    #[test]
    fn plain_name_is_not_quoted() {
        let id = PlayerId::parse("01234567-89ab-cdef-0123-456789abcdef").unwrap();
        assert_eq!(
            cookie_header(&id, "ann_42"),
            "player_id=01234567-89ab-cdef-0123-456789abcdef; player_name=ann_42"
        );
    }

    #[test]
    fn name_cannot_inject_cookies() {
        let id = PlayerId::parse("01234567-89ab-cdef-0123-456789abcdef").unwrap();
        let header = cookie_header(&id, "Eve; player_id=ffffffff-ffff-ffff-ffff-ffffffffffff");
        assert_eq!(header.split(';').count(), 2, "{header}");
        assert_eq!(player_id_from_cookies(&header), Some(id));
        assert_eq!(
            find_cookie(&header, "player_name"),
            Some(r#""Eve\073 player_id=ffffffff-ffff-ffff-ffff-ffffffffffff""#)
        );
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_cookie_value("Ann Lee"), r#""Ann Lee""#);
        assert_eq!(quote_cookie_value("Zoë"), r#""Zo\303\253""#);
        assert_eq!(quote_cookie_value(r#"a"b\c,d"#), r#""a\"b\\c\054d""#);
        assert!(quote_cookie_value("名前").is_ascii());
    }
}
