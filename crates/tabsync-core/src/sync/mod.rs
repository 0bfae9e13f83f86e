//! The pure change filter at the heart of cross-context session sync.
//!
//! Every storage mutation made in another browsing context reaches the host
//! as a [`StorageChange`].  Almost none of them matter: the host cares about
//! exactly one key in exactly one storage area.  [`session_notice`] is the
//! two-part filter that decides whether an event is forwarded to the
//! embedded application's inbound port.
//!
//! ```text
//! StorageChange ──▶ area matches? ──▶ key matches? ──▶ Some(SessionNotice)
//!                       │ no              │ no
//!                       ▼                 ▼
//!                     None              None          (dropped, intentionally)
//! ```
//!
//! The function has no I/O side effects and no dependency on channels or
//! async runtimes, which keeps the host's one piece of decision logic
//! trivially unit-testable.

use crate::domain::session::SessionNotice;
use crate::domain::storage::{StorageAreaId, StorageChange, StorageKey};

/// Applies the two-part session-change filter.
///
/// Returns `Some(notice)` when the event originated from `area` AND the
/// changed key equals `watch_key` exactly.  Everything else returns `None`:
/// unrelated storage mechanisms and unrelated keys are dropped without
/// further processing.  Dropping is the specified outcome, not an error.
///
/// The notice carries the event's new value verbatim, including `None` when
/// the other context removed the entry.
pub fn session_notice(
    change: &StorageChange,
    area: StorageAreaId,
    watch_key: &StorageKey,
) -> Option<SessionNotice> {
    if change.area != area {
        return None;
    }
    if change.key != *watch_key {
        return None;
    }
    Some(SessionNotice {
        new_value: change.new_value.clone(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::SessionValue;

    fn change(
        area: StorageAreaId,
        key: &str,
        new_value: Option<&str>,
    ) -> StorageChange {
        StorageChange {
            area,
            key: StorageKey::new(key),
            old_value: None,
            new_value: new_value.map(SessionValue::new),
        }
    }

    #[test]
    fn test_matching_area_and_key_yields_the_new_value() {
        // Arrange
        let area = StorageAreaId::new();
        let watch = StorageKey::new("session");
        let event = change(area, "session", Some("new1"));

        // Act
        let notice = session_notice(&event, area, &watch);

        // Assert
        assert_eq!(
            notice,
            Some(SessionNotice {
                new_value: Some(SessionValue::new("new1"))
            })
        );
    }

    #[test]
    fn test_wrong_key_is_dropped() {
        // Arrange
        let area = StorageAreaId::new();
        let watch = StorageKey::new("session");
        let event = change(area, "other", Some("x"));

        // Act / Assert
        assert_eq!(session_notice(&event, area, &watch), None);
    }

    #[test]
    fn test_wrong_area_is_dropped_even_with_matching_key() {
        // An event from a different storage mechanism must not get through
        // just because the key name collides.
        let host_area = StorageAreaId::new();
        let other_area = StorageAreaId::new();
        let watch = StorageKey::new("session");
        let event = change(other_area, "session", Some("x"));

        assert_eq!(session_notice(&event, host_area, &watch), None);
    }

    #[test]
    fn test_key_comparison_is_exact() {
        let area = StorageAreaId::new();
        let watch = StorageKey::new("session");

        // Near-miss keys: all dropped.
        for key in ["Session", "session ", " session", "sessionToken"] {
            let event = change(area, key, Some("x"));
            assert_eq!(session_notice(&event, area, &watch), None, "key {key:?}");
        }
    }

    #[test]
    fn test_removed_entry_forwards_none() {
        // The other context removed the entry: the application is told the
        // session is gone, not silently left stale.
        let area = StorageAreaId::new();
        let watch = StorageKey::new("session");
        let event = change(area, "session", None);

        let notice = session_notice(&event, area, &watch).unwrap();
        assert_eq!(notice.new_value, None);
    }

    #[test]
    fn test_new_value_passes_through_verbatim() {
        let area = StorageAreaId::new();
        let watch = StorageKey::new("session");
        let event = change(area, "session", Some("  spaced öut  "));

        let notice = session_notice(&event, area, &watch).unwrap();
        assert_eq!(
            notice.new_value,
            Some(SessionValue::new("  spaced öut  "))
        );
    }
}
