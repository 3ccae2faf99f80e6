//! C1: Relay Directory — an immutable, deduplicated list of relays parsed
//! once at startup, plus URI composition for the four canonical endpoints.
use ethereum_consensus::primitives::BlsPublicKey;
use std::{collections::HashSet, fmt, str::FromStr};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RelayUrlError {
    #[error("{0}")]
    Bls(#[from] ethereum_consensus::crypto::Error),
    #[error("{0}")]
    Hex(#[from] hex::FromHexError),
    #[error("could not parse `{0}` as a URL: {1}")]
    Parse(String, url::ParseError),
    #[error("public key `{0}` is missing the '0x' hex prefix")]
    Missing0xPrefix(String),
    #[error("URL `{0}` is missing the public key username component")]
    MissingPublicKey(String),
}

/// One configured relay: its base URL and the long-lived public key its bid
/// and payload signatures must verify against. Identity is the public key —
/// two entries with the same key are duplicates regardless of URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Relay {
    base_url: Url,
    public_key: BlsPublicKey,
}

impl Relay {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn public_key(&self) -> &BlsPublicKey {
        &self.public_key
    }

    /// Compose the full URL for one of the four canonical builder API paths,
    /// with route parameters already substituted by the caller.
    pub fn uri(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.public_key, self.base_url)
    }
}

impl TryFrom<Url> for Relay {
    type Error = RelayUrlError;

    fn try_from(mut url: Url) -> Result<Self, Self::Error> {
        let username = url.username();
        if username.is_empty() {
            return Err(RelayUrlError::MissingPublicKey(url.to_string()));
        }
        let hex_key = username.strip_prefix("0x").ok_or_else(|| {
            RelayUrlError::Missing0xPrefix(username.to_string())
        })?;
        let bytes = hex::decode(hex_key)?;
        let public_key = BlsPublicKey::try_from(bytes.as_slice())?;
        let _ = url.set_username("");
        Ok(Self { base_url: url, public_key })
    }
}

impl FromStr for Relay {
    type Err = RelayUrlError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input).map_err(|err| RelayUrlError::Parse(input.to_string(), err))?;
        Relay::try_from(url)
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{0}")]
    Url(#[from] RelayUrlError),
    #[error("duplicate relay public key {0}: relays must be uniquely keyed")]
    Duplicate(BlsPublicKey),
    #[error("no relays configured")]
    Empty,
}

/// The ordered, deduplicated list of relays parsed at startup. Immutable
/// after construction, so it is safe for unsynchronized concurrent read.
#[derive(Clone, Debug)]
pub struct RelayDirectory {
    relays: Vec<Relay>,
}

impl RelayDirectory {
    pub fn new(urls: impl IntoIterator<Item = String>) -> Result<Self, DirectoryError> {
        let mut relays = Vec::new();
        let mut seen = HashSet::new();
        for url in urls {
            let relay = Relay::from_str(&url)?;
            if !seen.insert(relay.public_key().clone()) {
                return Err(DirectoryError::Duplicate(relay.public_key().clone()));
            }
            relays.push(relay);
        }
        if relays.is_empty() {
            return Err(DirectoryError::Empty);
        }
        Ok(Self { relays })
    }

    pub fn relays(&self) -> &[Relay] {
        &self.relays
    }

    pub fn len(&self) -> usize {
        self.relays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_public_key_hex() -> String {
        use ethereum_consensus::crypto::SecretKey;
        let mut rng = rand::thread_rng();
        let sk = SecretKey::random(&mut rng).unwrap();
        format!("{:#x}", sk.public_key())
    }

    #[test]
    fn parses_relay_with_embedded_public_key() {
        let key_hex = random_public_key_hex();
        let url = format!("http://{key_hex}@relay.example.com:9000");
        let relay = Relay::from_str(&url).unwrap();
        assert_eq!(relay.uri("/eth/v1/builder/status"), "http://relay.example.com:9000/eth/v1/builder/status");
    }

    #[test]
    fn rejects_missing_public_key() {
        let err = Relay::from_str("http://relay.example.com:9000").unwrap_err();
        assert!(matches!(err, RelayUrlError::MissingPublicKey(..)));
    }

    #[test]
    fn rejects_missing_0x_prefix() {
        let key_hex = random_public_key_hex();
        let bare = key_hex.trim_start_matches("0x");
        let url = format!("http://{bare}@relay.example.com:9000");
        let err = Relay::from_str(&url).unwrap_err();
        assert!(matches!(err, RelayUrlError::Missing0xPrefix(..)));
    }

    #[test]
    fn directory_rejects_duplicate_public_keys() {
        let key_hex = random_public_key_hex();
        let urls = vec![
            format!("http://{key_hex}@relay-a.example.com"),
            format!("http://{key_hex}@relay-b.example.com"),
        ];
        let err = RelayDirectory::new(urls).unwrap_err();
        assert!(matches!(err, DirectoryError::Duplicate(..)));
    }

    #[test]
    fn directory_rejects_empty_configuration() {
        let err = RelayDirectory::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, DirectoryError::Empty));
    }
}
