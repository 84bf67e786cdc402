use embedded_storage::{ReadStorage, Storage};
use esp_bootloader_esp_idf::partitions::{
    DataPartitionSubType, PARTITION_TABLE_MAX_LEN, PartitionType, read_partition_table,
};
use esp_rom_sys::rom::spiflash::{
    ESP_ROM_SPIFLASH_RESULT_OK, esp_rom_spiflash_erase_sector, esp_rom_spiflash_read,
    esp_rom_spiflash_unlock, esp_rom_spiflash_write,
};
use log::{info, warn};
use wordclock_core::settings::{
    KeyValueStore, MemoryStore, MemoryStoreError,
    record::{RECORD_LEN, RecordError, decode_record, encode_record},
};

const FLASH_SECTOR_SIZE: u32 = 4096;
const DEFAULT_FLASH_CAPACITY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashKvError {
    PartitionTable,
    PartitionMissing,
    PartitionTooSmall,
    FlashOpFailed(i32),
    Unsupported,
    Entry(MemoryStoreError),
}

#[derive(Debug)]
struct RawFlash;

impl RawFlash {
    fn new() -> Result<Self, FlashKvError> {
        let rc = unsafe { esp_rom_spiflash_unlock() };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashKvError::FlashOpFailed(rc));
        }
        Ok(Self)
    }

    fn erase_sector(&mut self, sector_addr: u32) -> Result<(), FlashKvError> {
        if !sector_addr.is_multiple_of(FLASH_SECTOR_SIZE) {
            return Err(FlashKvError::Unsupported);
        }

        let rc = unsafe { esp_rom_spiflash_erase_sector(sector_addr / FLASH_SECTOR_SIZE) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashKvError::FlashOpFailed(rc));
        }
        Ok(())
    }

    fn read_word(&mut self, addr: u32) -> Result<u32, FlashKvError> {
        let mut word = 0u32;
        let rc = unsafe { esp_rom_spiflash_read(addr, &mut word as *mut u32 as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashKvError::FlashOpFailed(rc));
        }
        Ok(word)
    }

    fn write_word(&mut self, addr: u32, word: u32) -> Result<(), FlashKvError> {
        let rc = unsafe { esp_rom_spiflash_write(addr, &word as *const u32, 4) };
        if rc != ESP_ROM_SPIFLASH_RESULT_OK {
            return Err(FlashKvError::FlashOpFailed(rc));
        }
        Ok(())
    }

    /// Unaligned reads are widened to whole words.
    fn read_bytes(&mut self, addr: u32, out: &mut [u8]) -> Result<(), FlashKvError> {
        let start = addr & !0b11;
        let end = (addr + out.len() as u32 + 3) & !0b11;

        for word_addr in (start..end).step_by(4) {
            let bytes = self.read_word(word_addr)?.to_le_bytes();
            for (i, b) in bytes.iter().enumerate() {
                let at = word_addr + i as u32;
                if at < addr {
                    continue;
                }
                match out.get_mut((at - addr) as usize) {
                    Some(slot) => *slot = *b,
                    None => break,
                }
            }
        }
        Ok(())
    }

    /// Writes into an erased, word-aligned region; padding bytes stay erased.
    fn write_erased_bytes(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashKvError> {
        if !addr.is_multiple_of(4) {
            return Err(FlashKvError::Unsupported);
        }

        for (i, chunk) in data.chunks(4).enumerate() {
            let mut bytes = [0xFFu8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            self.write_word(addr + (i as u32) * 4, u32::from_le_bytes(bytes))?;
        }
        Ok(())
    }
}

impl ReadStorage for RawFlash {
    type Error = FlashKvError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.read_bytes(offset, bytes)
    }

    fn capacity(&self) -> usize {
        DEFAULT_FLASH_CAPACITY_BYTES
    }
}

impl Storage for RawFlash {
    fn write(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), Self::Error> {
        Err(FlashKvError::Unsupported)
    }
}

/// One namespace persisted in the last sector of the first writable data partition.
///
/// Entries are cached in RAM; every changed put rewrites the whole record.
#[derive(Debug)]
pub struct FlashKvStore {
    flash: RawFlash,
    sector_addr: u32,
    namespace: &'static str,
    cache: MemoryStore,
}

impl FlashKvStore {
    pub fn open(namespace: &'static str) -> Result<Self, FlashKvError> {
        let mut flash = RawFlash::new()?;
        let sector_addr = find_settings_sector(&mut flash)?;

        let mut buf = [0u8; RECORD_LEN];
        flash.read_bytes(sector_addr, &mut buf)?;
        let cache = match decode_record(namespace, &buf) {
            Ok(Some(cache)) => {
                info!("flash-kv: restored namespace={} sector=0x{:x}", namespace, sector_addr);
                cache
            }
            Ok(None) => {
                info!("flash-kv: no record for namespace={}", namespace);
                MemoryStore::new()
            }
            Err(RecordError::Corrupted) => {
                warn!("flash-kv: record corrupted, starting empty namespace={}", namespace);
                MemoryStore::new()
            }
        };

        Ok(Self {
            flash,
            sector_addr,
            namespace,
            cache,
        })
    }

    fn flush(&mut self) -> Result<(), FlashKvError> {
        let buf = encode_record(self.namespace, &self.cache);
        self.flash.erase_sector(self.sector_addr)?;
        self.flash.write_erased_bytes(self.sector_addr, &buf)
    }
}

impl KeyValueStore for FlashKvStore {
    type Error = FlashKvError;

    fn get_int(&mut self, key: &str) -> Result<Option<i32>, Self::Error> {
        self.cache.get_int(key).map_err(FlashKvError::Entry)
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error> {
        if self.get_int(key) == Ok(Some(value)) {
            return Ok(());
        }
        self.cache.put_int(key, value).map_err(FlashKvError::Entry)?;
        self.flush()
    }

    fn get_bool(&mut self, key: &str) -> Result<Option<bool>, Self::Error> {
        self.cache.get_bool(key).map_err(FlashKvError::Entry)
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error> {
        if self.get_bool(key) == Ok(Some(value)) {
            return Ok(());
        }
        self.cache.put_bool(key, value).map_err(FlashKvError::Entry)?;
        self.flush()
    }
}

fn find_settings_sector(flash: &mut RawFlash) -> Result<u32, FlashKvError> {
    let mut table_buf = [0u8; PARTITION_TABLE_MAX_LEN];
    let table =
        read_partition_table(flash, &mut table_buf).map_err(|_| FlashKvError::PartitionTable)?;

    let mut data_undefined: Option<(u32, u32)> = None;
    let mut fallback_nvs: Option<(u32, u32)> = None;

    for entry in table.iter() {
        if entry.is_read_only() || entry.len() < FLASH_SECTOR_SIZE {
            continue;
        }

        match entry.partition_type() {
            PartitionType::Data(DataPartitionSubType::Undefined) => {
                data_undefined = Some((entry.offset(), entry.len()));
                break;
            }
            PartitionType::Data(DataPartitionSubType::Nvs) if fallback_nvs.is_none() => {
                fallback_nvs = Some((entry.offset(), entry.len()));
            }
            _ => {}
        }
    }

    let (offset, len) = data_undefined
        .or(fallback_nvs)
        .ok_or(FlashKvError::PartitionMissing)?;
    if len < FLASH_SECTOR_SIZE {
        return Err(FlashKvError::PartitionTooSmall);
    }
    Ok(offset + len - FLASH_SECTOR_SIZE)
}
