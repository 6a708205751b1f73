//! Property-based tests for NoteId

use notes_collab::shared::note::MAX_NOTE_ID_LEN;
use notes_collab::shared::NoteId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_parse_is_idempotent(raw in "\\PC{0,160}") {
        if let Ok(id) = NoteId::parse(&raw) {
            let again = NoteId::parse(id.as_str()).unwrap();
            prop_assert_eq!(&again, &id);
            prop_assert!(id.validate().is_ok());
        }
    }

    #[test]
    fn test_parsed_ids_respect_limits(raw in ".{0,200}") {
        if let Ok(id) = NoteId::parse(&raw) {
            prop_assert!(!id.as_str().is_empty());
            prop_assert!(id.as_str().len() <= MAX_NOTE_ID_LEN);
            prop_assert!(!id.as_str().chars().any(char::is_control));
            prop_assert_eq!(id.as_str(), id.as_str().trim());
        }
    }

    #[test]
    fn test_object_ids_are_accepted(raw in "[0-9a-f]{24}") {
        let id = NoteId::parse(&raw).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }
}
