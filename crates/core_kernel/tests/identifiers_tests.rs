//! Unit tests for the identifier types
//!
//! Covers creation, parsing, ordering, and serialization of the identifiers
//! stamped onto persisted decisions and audit events.

use core_kernel::{AuditEventId, DecisionId};
use uuid::Uuid;

mod decision_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = DecisionId::new();
        let id2 = DecisionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = DecisionId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = DecisionId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(DecisionId::prefix(), "DEC");
        assert_eq!(AuditEventId::prefix(), "AUD");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("DEC-not-a-uuid".parse::<DecisionId>().is_err());
        assert!("".parse::<DecisionId>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = DecisionId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));

        let back: DecisionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod audit_event_id_tests {
    use super::*;

    #[test]
    fn test_display_uses_prefix() {
        let id = AuditEventId::new();
        assert!(id.to_string().starts_with("AUD-"));
    }

    #[test]
    fn test_as_uuid() {
        let uuid = Uuid::new_v4();
        let id = AuditEventId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }
}
