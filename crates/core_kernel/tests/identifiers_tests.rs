//! Unit tests for the Identifiers module

use core_kernel::{ItemId, SettlementId};
use uuid::Uuid;

mod item_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ItemId::new();
        let id2 = ItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_ids_created_a_millisecond_apart_are_ordered() {
        let id1 = ItemId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = ItemId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(ItemId::prefix(), "ITM");
    }

    #[test]
    fn test_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = ItemId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_invalid_string_fails_to_parse() {
        assert!("ITM-not-a-uuid".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&ItemId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}

mod settlement_id_tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let id = SettlementId::new();
        assert!(id.to_string().starts_with("STL-"));
    }
}
