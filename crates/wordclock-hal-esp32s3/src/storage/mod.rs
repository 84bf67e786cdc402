pub mod flash_kv;

use log::{info, warn};
use wordclock_core::settings::{KeyValueStore, MemoryStore};

use flash_kv::{FlashKvError, FlashKvStore};

/// Flash-backed namespace, or a RAM store when no settings partition exists.
#[derive(Debug)]
pub enum BoardKvStore {
    Flash(FlashKvStore),
    Volatile(MemoryStore),
}

impl BoardKvStore {
    pub fn open(namespace: &'static str) -> Self {
        match FlashKvStore::open(namespace) {
            Ok(store) => Self::Flash(store),
            Err(err) => {
                warn!("flash-kv: unavailable err={:?}", err);
                info!("settings: storage volatile, defaults will not persist");
                Self::Volatile(MemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Flash(_))
    }
}

impl KeyValueStore for BoardKvStore {
    type Error = FlashKvError;

    fn get_int(&mut self, key: &str) -> Result<Option<i32>, Self::Error> {
        match self {
            Self::Flash(store) => store.get_int(key),
            Self::Volatile(store) => store.get_int(key).map_err(FlashKvError::Entry),
        }
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        match self {
            Self::Flash(store) => store.put_int(key, value),
            Self::Volatile(store) => store.put_int(key, value).map_err(FlashKvError::Entry),
        }
    }

    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, Self::Error> {
        match self {
            Self::Flash(store) => store.get_bool(key),
            Self::Volatile(store) => store.get_bool(key).map_err(FlashKvError::Entry),
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error> {
        match self {
            Self::Flash(store) => store.put_bool(key, value),
            Self::Volatile(store) => store.put_bool(key, value).map_err(FlashKvError::Entry),
        }
    }
}
