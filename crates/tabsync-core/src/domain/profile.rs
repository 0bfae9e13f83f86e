//! Deployment profiles: the three observed host-bootstrap variants.
//!
//! The deployed bootstrap scripts are near-duplicates but not equivalent.
//! They disagree on which storage key holds the session, which key the
//! change listener watches, and whether the construction payload includes
//! the current date.  Rather than guessing at a common denominator, each
//! variant is modelled explicitly and selected by configuration.
//!
//! | Profile           | Persist key    | Watch key | Payload        |
//! |-------------------|----------------|-----------|----------------|
//! | `Token`           | `sessionToken` | `session` | token only     |
//! | `Session`         | `session`      | `session` | token only     |
//! | `SessionWithDate` | `session`      | `session` | token + date   |
//!
//! Note the asymmetry in the `Token` profile: it persists under
//! `sessionToken` but its listener watches `session`.  That asymmetry exists
//! in the deployed script and is preserved here; the two keys are not
//! interchangeable.

use serde::{Deserialize, Serialize};

use crate::domain::session::FlagPayload;
use crate::domain::storage::StorageKey;

/// Storage key name used by the `Token` profile's read/write path.
pub const SESSION_TOKEN_KEY: &str = "sessionToken";

/// Storage key name used by the `Session*` profiles and by every profile's
/// change listener.
pub const SESSION_KEY: &str = "session";

/// One of the three deployed bootstrap variants.
///
/// The profile pins everything that differs between the variants: which key
/// is read at bootstrap and overwritten by the outbound port, which key the
/// inbound listener filters on, and the shape of the construction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentProfile {
    /// Persists under `sessionToken`, watches `session`, token-only payload.
    Token,
    /// Persists and watches `session`, token-only payload.
    Session,
    /// Persists and watches `session`, payload includes the current date.
    SessionWithDate,
}

impl DeploymentProfile {
    /// The key read at bootstrap and overwritten by every outbound emission.
    pub fn persist_key(&self) -> StorageKey {
        match self {
            Self::Token => StorageKey::new(SESSION_TOKEN_KEY),
            Self::Session | Self::SessionWithDate => StorageKey::new(SESSION_KEY),
        }
    }

    /// The key the inbound change listener filters on.
    pub fn watch_key(&self) -> StorageKey {
        StorageKey::new(SESSION_KEY)
    }

    /// The shape of the construction-time flag payload.
    pub fn payload(&self) -> FlagPayload {
        match self {
            Self::Token | Self::Session => FlagPayload::TokenOnly,
            Self::SessionWithDate => FlagPayload::TokenWithDate,
        }
    }
}

impl Default for DeploymentProfile {
    /// `Token` is the default: it matches the longest-deployed variant.
    fn default() -> Self {
        Self::Token
    }
}

impl std::str::FromStr for DeploymentProfile {
    type Err = String;

    /// Parses the kebab-case profile names used in configuration files and on
    /// the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(Self::Token),
            "session" => Ok(Self::Session),
            "session-with-date" => Ok(Self::SessionWithDate),
            other => Err(format!(
                "unknown deployment profile '{other}' (expected 'token', 'session', or 'session-with-date')"
            )),
        }
    }
}

impl std::fmt::Display for DeploymentProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Token => "token",
            Self::Session => "session",
            Self::SessionWithDate => "session-with-date",
        };
        f.write_str(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_profile_persists_and_watches_different_keys() {
        // The deployed Token variant writes `sessionToken` but listens on
        // `session`.  The asymmetry is intentional and must survive.
        let p = DeploymentProfile::Token;
        assert_eq!(p.persist_key().as_str(), "sessionToken");
        assert_eq!(p.watch_key().as_str(), "session");
        assert_ne!(p.persist_key(), p.watch_key());
    }

    #[test]
    fn test_session_profile_uses_one_key_for_both_paths() {
        let p = DeploymentProfile::Session;
        assert_eq!(p.persist_key().as_str(), "session");
        assert_eq!(p.watch_key().as_str(), "session");
    }

    #[test]
    fn test_only_the_date_profile_requests_a_date() {
        assert_eq!(DeploymentProfile::Token.payload(), FlagPayload::TokenOnly);
        assert_eq!(DeploymentProfile::Session.payload(), FlagPayload::TokenOnly);
        assert_eq!(
            DeploymentProfile::SessionWithDate.payload(),
            FlagPayload::TokenWithDate
        );
    }

    #[test]
    fn test_from_str_accepts_kebab_case_names() {
        assert_eq!("token".parse(), Ok(DeploymentProfile::Token));
        assert_eq!("session".parse(), Ok(DeploymentProfile::Session));
        assert_eq!(
            "session-with-date".parse(),
            Ok(DeploymentProfile::SessionWithDate)
        );
    }

    #[test]
    fn test_from_str_rejects_unknown_names() {
        let result: Result<DeploymentProfile, _> = "tokens".parse();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("tokens"));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for p in [
            DeploymentProfile::Token,
            DeploymentProfile::Session,
            DeploymentProfile::SessionWithDate,
        ] {
            let parsed: DeploymentProfile = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&DeploymentProfile::SessionWithDate).unwrap();
        assert_eq!(json, "\"session-with-date\"");
    }
}
