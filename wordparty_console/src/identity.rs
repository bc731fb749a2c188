// Terminal counterpart of the `player_id` and `player_name` browser cookies. The identity lives in
// a YAML file and expires like the cookie does unless it is used again in time.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use wordparty::player_id::{PLAYER_ID_MAX_AGE, PlayerId, cookie_header};


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub player_id: PlayerId,
    pub player_name: String,
    // Unix timestamp, seconds.
    pub expires_at: i64,
}

impl Identity {
    pub fn new(player_name: String, now: OffsetDateTime) -> Self {
        Identity {
            player_id: PlayerId::generate(),
            player_name,
            expires_at: expiry_from(now),
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool { now.unix_timestamp() >= self.expires_at }

    pub fn renew(&mut self, now: OffsetDateTime) { self.expires_at = expiry_from(now); }

    pub fn cookie_header(&self) -> String { cookie_header(&self.player_id, &self.player_name) }
}

fn expiry_from(now: OffsetDateTime) -> i64 {
    now.unix_timestamp() + PLAYER_ID_MAX_AGE.as_secs() as i64
}

// Reads the identity file, replacing a missing or expired identity with a fresh one, and writes
// the result back with a renewed expiry.
pub fn load_or_create(
    path: &Path, player_name: Option<&str>, now: OffsetDateTime,
) -> anyhow::Result<Identity> {
    let existing = if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Reading identity file {}", path.display()))?;
        let identity: Identity = serde_yaml::from_str(&contents)
            .with_context(|| format!("Parsing identity file {}", path.display()))?;
        Some(identity)
    } else {
        None
    };
    let mut identity = match existing {
        Some(identity) if !identity.is_expired(now) => identity,
        Some(expired) => {
            log::info!("Identity in {} has expired, creating a new player id", path.display());
            Identity::new(expired.player_name, now)
        }
        None => Identity::new(String::new(), now),
    };
    if let Some(name) = player_name {
        identity.player_name = name.trim().to_owned();
    }
    identity.renew(now);
    let serialized = serde_yaml::to_string(&identity)?;
    fs::write(path, serialized)
        .with_context(|| format!("Writing identity file {}", path.display()))?;
    Ok(identity)
}
