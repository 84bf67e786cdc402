use embassy_net::{
    Stack,
    dns::DnsQueryType,
    udp::{PacketMetadata, UdpSocket},
};
use embassy_time::{Duration, WithTimeout};
use log::{info, warn};
use wordclock_core::time::{
    ClockSource,
    ntp::{NTP_PACKET_LEN, NTP_PORT, NtpReplyError, client_request, parse_reply},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SntpError {
    Dns,
    NoAddress,
    Bind,
    Send,
    Receive,
    Reply(NtpReplyError),
}

/// One-shot SNTP queries over the station stack.
pub struct SntpClient<'d> {
    stack: Stack<'d>,
    server: &'static str,
}

impl<'d> SntpClient<'d> {
    pub fn new(stack: Stack<'d>, server: &'static str) -> Self {
        Self { stack, server }
    }

    async fn query(&mut self) -> Result<u64, SntpError> {
        let addresses = self
            .stack
            .dns_query(self.server, DnsQueryType::A)
            .await
            .map_err(|_| SntpError::Dns)?;
        let server_addr = *addresses.first().ok_or(SntpError::NoAddress)?;

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; 128];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; 128];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| SntpError::Bind)?;

        socket
            .send_to(&client_request(), (server_addr, NTP_PORT))
            .await
            .map_err(|_| SntpError::Send)?;

        let mut reply = [0u8; NTP_PACKET_LEN];
        let (len, _) = socket
            .recv_from(&mut reply)
            .await
            .map_err(|_| SntpError::Receive)?;
        parse_reply(&reply[..len]).map_err(SntpError::Reply)
    }
}

impl ClockSource for SntpClient<'_> {
    async fn request_time(&mut self, timeout_ms: u32) -> Option<u64> {
        if !self.stack.is_config_up() {
            warn!("sntp: stack has no address, skipping query");
            return None;
        }

        match self
            .query()
            .with_timeout(Duration::from_millis(timeout_ms as u64))
            .await
        {
            Ok(Ok(epoch)) => {
                info!("sntp: server={} epoch={}", self.server, epoch);
                Some(epoch)
            }
            Ok(Err(err)) => {
                warn!("sntp: query failed server={} err={:?}", self.server, err);
                None
            }
            Err(_) => {
                warn!("sntp: no reply from {} within {}ms", self.server, timeout_ms);
                None
            }
        }
    }
}
