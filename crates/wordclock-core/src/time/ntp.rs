//! SNTP client packet handling.

pub const NTP_PORT: u16 = 123;
pub const NTP_PACKET_LEN: usize = 48;
/// Seconds between 1900-01-01 and 1970-01-01.
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

const TRANSMIT_SECONDS_AT: usize = 40;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NtpReplyError {
    Short { len: usize },
    /// Leap indicator 3: server clock not synchronized.
    Unsynchronized,
    BeforeUnixEpoch { seconds: u32 },
}

/// Client request: LI 0, version 3, mode 3.
pub const fn client_request() -> [u8; NTP_PACKET_LEN] {
    let mut packet = [0u8; NTP_PACKET_LEN];
    packet[0] = 0x1B;
    packet
}

/// Unix seconds from the transmit timestamp of a server reply.
pub fn parse_reply(reply: &[u8]) -> Result<u64, NtpReplyError> {
    if reply.len() < NTP_PACKET_LEN {
        return Err(NtpReplyError::Short { len: reply.len() });
    }
    if reply[0] >> 6 == 3 {
        return Err(NtpReplyError::Unsynchronized);
    }

    let seconds = u32::from_be_bytes([
        reply[TRANSMIT_SECONDS_AT],
        reply[TRANSMIT_SECONDS_AT + 1],
        reply[TRANSMIT_SECONDS_AT + 2],
        reply[TRANSMIT_SECONDS_AT + 3],
    ]);
    (seconds as u64)
        .checked_sub(NTP_UNIX_OFFSET)
        .ok_or(NtpReplyError::BeforeUnixEpoch { seconds })
}
