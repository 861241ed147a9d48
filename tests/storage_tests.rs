use physiohealth_bot::storage::{append_record, load_records, LocalStore, MemoryStore, StorageKey};
use serde_json::json;
use teloxide::types::ChatId;

#[cfg(test)]
mod storage_key_tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(StorageKey::Bookings.as_str(), "physioBookings");
        assert_eq!(StorageKey::Messages.as_str(), "physioMessages");
        assert_eq!(StorageKey::ChatHistory.to_string(), "chatHistory");
    }
}

#[cfg(test)]
mod memory_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_list_is_empty() {
        let store = MemoryStore::new();
        assert!(store.load(ChatId(1), StorageKey::Bookings).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_keeps_order() {
        let store = MemoryStore::new();
        store.append(ChatId(1), StorageKey::Messages, json!({"id": "a"})).await.unwrap();
        store.append(ChatId(1), StorageKey::Messages, json!({"id": "b"})).await.unwrap();

        let entries = store.load(ChatId(1), StorageKey::Messages).await.unwrap();
        assert_eq!(entries, vec![json!({"id": "a"}), json!({"id": "b"})]);
    }

    #[tokio::test]
    async fn test_lists_are_scoped_per_chat_and_key() {
        let store = MemoryStore::new();
        store.append(ChatId(1), StorageKey::Bookings, json!(1)).await.unwrap();

        assert!(store.load(ChatId(2), StorageKey::Bookings).await.unwrap().is_empty());
        assert!(store.load(ChatId(1), StorageKey::ChatHistory).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_array_entry_stays_one_item() {
        let store = MemoryStore::new();
        store.append(ChatId(1), StorageKey::ChatHistory, json!(["x", "y"])).await.unwrap();
        assert_eq!(store.load(ChatId(1), StorageKey::ChatHistory).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = MemoryStore::new();
        append_record(&store, ChatId(3), StorageKey::Bookings, &vec![1, 2]).await.unwrap();
        append_record(&store, ChatId(3), StorageKey::Bookings, &vec![3]).await.unwrap();

        let records: Vec<Vec<u32>> = load_records(&store, ChatId(3), StorageKey::Bookings).await.unwrap();
        assert_eq!(records, vec![vec![1, 2], vec![3]]);
    }

    #[tokio::test]
    async fn test_typed_load_rejects_wrong_shape() {
        let store = MemoryStore::new();
        store.append(ChatId(4), StorageKey::Bookings, json!("text")).await.unwrap();

        let result: Result<Vec<u32>, _> = load_records(&store, ChatId(4), StorageKey::Bookings).await;
        assert!(result.is_err());
    }
}
