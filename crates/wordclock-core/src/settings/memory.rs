use heapless::{String, Vec};

use super::KeyValueStore;

pub(super) const KEY_BYTES: usize = 16;
pub(super) const MAX_ENTRIES: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum StoredValue {
    Int(i32),
    Bool(bool),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryStoreError {
    KeyTooLong,
    Full,
    /// Key exists with a different value type.
    TypeMismatch,
}

/// RAM-only key-value store for host builds and bring-up.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub(super) entries: Vec<(String<KEY_BYTES>, StoredValue), MAX_ENTRIES>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful put operations.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries
            .iter()
            .find(|(stored, _)| stored.as_str() == key)
            .map(|(_, value)| *value)
    }

    fn put(&mut self, key: &str, value: StoredValue) -> Result<(), MemoryStoreError> {
        if let Some((_, slot)) = self
            .entries
            .iter_mut()
            .find(|(stored, _)| stored.as_str() == key)
        {
            *slot = value;
        } else {
            let mut owned = String::new();
            owned
                .push_str(key)
                .map_err(|()| MemoryStoreError::KeyTooLong)?;
            self.entries
                .push((owned, value))
                .map_err(|_| MemoryStoreError::Full)?;
        }
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get_int(&mut self, key: &str) -> Result<Option<i32>, Self::Error> {
        match self.get(key) {
            None => Ok(None),
            Some(StoredValue::Int(value)) => Ok(Some(value)),
            Some(StoredValue::Bool(_)) => Err(MemoryStoreError::TypeMismatch),
        }
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        self.put(key, StoredValue::Int(value))
    }

    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, Self::Error> {
        match self.get(key) {
            None => Ok(None),
            Some(StoredValue::Bool(value)) => Ok(Some(value)),
            Some(StoredValue::Int(_)) => Err(MemoryStoreError::TypeMismatch),
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error> {
        self.put(key, StoredValue::Bool(value))
    }
}
