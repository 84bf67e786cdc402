//! Fixed-size binary snapshot of a key-value namespace, sized for one flash sector.
//!
//! Layout (little endian):
//! - `0..4` magic, `4` version, `5` entry count, `6..8` zero
//! - `8..12` checksum of the namespace name
//! - `12..204` eight entries of 24 bytes: key length, value kind, two zero bytes,
//!   key padded with zeros to 16 bytes, `i32` value
//! - `204..208` checksum over bytes `0..204`

use heapless::String;

use super::memory::{KEY_BYTES, MAX_ENTRIES, MemoryStore, StoredValue};

pub const RECORD_MAGIC: u32 = 0x314B_4357; // "WCK1"
pub const RECORD_VERSION: u8 = 1;

const HEADER_LEN: usize = 12;
const ENTRY_LEN: usize = 24;
const BODY_LEN: usize = HEADER_LEN + ENTRY_LEN * MAX_ENTRIES;
pub const RECORD_LEN: usize = BODY_LEN + 4;

const KIND_INT: u8 = 1;
const KIND_BOOL: u8 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordError {
    Corrupted,
}

pub fn encode_record(namespace: &str, store: &MemoryStore) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    buf[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    buf[4] = RECORD_VERSION;
    buf[5] = store.entries.len() as u8;
    buf[8..12].copy_from_slice(&checksum32(namespace.as_bytes()).to_le_bytes());

    for (i, (key, value)) in store.entries.iter().enumerate() {
        let entry = &mut buf[HEADER_LEN + i * ENTRY_LEN..HEADER_LEN + (i + 1) * ENTRY_LEN];
        let (kind, raw) = match *value {
            StoredValue::Int(v) => (KIND_INT, v),
            StoredValue::Bool(v) => (KIND_BOOL, v as i32),
        };
        entry[0] = key.len() as u8;
        entry[1] = kind;
        entry[4..4 + key.len()].copy_from_slice(key.as_bytes());
        entry[20..24].copy_from_slice(&raw.to_le_bytes());
    }

    let checksum = checksum32(&buf[..BODY_LEN]);
    buf[BODY_LEN..].copy_from_slice(&checksum.to_le_bytes());
    buf
}

/// `Ok(None)` for erased flash, a foreign record, or another namespace.
pub fn decode_record(namespace: &str, buf: &[u8]) -> Result<Option<MemoryStore>, RecordError> {
    if buf.len() < RECORD_LEN {
        return Err(RecordError::Corrupted);
    }
    let buf = &buf[..RECORD_LEN];

    if buf.iter().all(|b| *b == 0xFF) {
        return Ok(None);
    }
    if read_u32(buf, 0) != RECORD_MAGIC || buf[4] != RECORD_VERSION {
        return Ok(None);
    }
    if checksum32(&buf[..BODY_LEN]) != read_u32(buf, BODY_LEN) {
        return Err(RecordError::Corrupted);
    }
    if read_u32(buf, 8) != checksum32(namespace.as_bytes()) {
        return Ok(None);
    }

    let count = buf[5] as usize;
    if count > MAX_ENTRIES {
        return Err(RecordError::Corrupted);
    }

    let mut store = MemoryStore::new();
    for i in 0..count {
        let entry = &buf[HEADER_LEN + i * ENTRY_LEN..HEADER_LEN + (i + 1) * ENTRY_LEN];
        let key_len = entry[0] as usize;
        if key_len == 0 || key_len > KEY_BYTES {
            return Err(RecordError::Corrupted);
        }
        let key_text =
            core::str::from_utf8(&entry[4..4 + key_len]).map_err(|_| RecordError::Corrupted)?;
        let raw = read_i32(entry, 20);
        let value = match entry[1] {
            KIND_INT => StoredValue::Int(raw),
            KIND_BOOL => StoredValue::Bool(raw != 0),
            _ => return Err(RecordError::Corrupted),
        };

        let mut key = String::new();
        key.push_str(key_text)
            .map_err(|()| RecordError::Corrupted)?;
        store
            .entries
            .push((key, value))
            .map_err(|_| RecordError::Corrupted)?;
    }

    Ok(Some(store))
}

/// FNV-1a.
pub fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn read_i32(buf: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
