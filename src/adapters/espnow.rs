//! ESP-NOW broadcast radio: implements [`RadioPort`] and feeds inbound
//! frames into the event queue.
//!
//! ## Air format
//!
//! ESP-NOW carries no application id or sequence byte of its own, so every
//! frame starts with a small link header:
//!
//! ```text
//! ┌──────────────┬─────┬───────────────────────────┐
//! │ app_id (BE)  │ seq │ payload                   │
//! │ 4 B          │ 1 B │ report (28 B) or command  │
//! └──────────────┴─────┴───────────────────────────┘
//! ```
//!
//! Frames with a foreign `app_id`, or too short to hold the header, are
//! dropped here and never reach the core.  The sender is identified by the
//! source MAC reported by the driver.
//!
//! ## Retry policy
//!
//! Broadcasts are never acknowledged.  A refused enqueue is retried
//! immediately, at most `frame.retries` extra times; the final result goes
//! back to the core.

use log::{debug, info};

use crate::app::ports::{OutboundFrame, RadioError, RadioPort};
use crate::events::{InboundFrame, Origin};

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::espnow::{EspNow, PeerInfo, ReceiveInfo, SendStatus, BROADCAST};

/// Link header length: 4-byte app id + 1-byte sequence.
pub const LINK_HEADER_LEN: usize = 5;

/// ESP-NOW payload limit.
pub const MAX_AIR_FRAME: usize = 250;

/// Encoded over-the-air frame.
pub type AirFrame = heapless::Vec<u8, MAX_AIR_FRAME>;

/// Frames kept by the host simulation; the oldest is evicted first.
#[cfg(not(target_os = "espidf"))]
pub const AIR_LOG_CAP: usize = 64;

/// Prefix `payload` with the link header.
pub fn encode_air_frame(app_id: u32, seq: u8, payload: &[u8]) -> Result<AirFrame, RadioError> {
    let mut air = AirFrame::new();
    air.extend_from_slice(&app_id.to_be_bytes())
        .map_err(|()| RadioError::PayloadTooLarge)?;
    air.push(seq).map_err(|_| RadioError::PayloadTooLarge)?;
    air.extend_from_slice(payload)
        .map_err(|()| RadioError::PayloadTooLarge)?;
    Ok(air)
}

/// Strip and check the link header of a received frame.
pub fn parse_air_frame(app_id: u32, src_mac: &[u8; 6], data: &[u8]) -> Option<InboundFrame> {
    if data.len() < LINK_HEADER_LEN {
        return None;
    }
    let (header, payload) = data.split_at(LINK_HEADER_LEN);
    let id = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if id != app_id {
        return None;
    }
    Some(InboundFrame::new(Origin::from_mac(src_mac), header[4], payload))
}

/// Broadcast radio adapter.
pub struct EspNowRadio {
    app_id: u32,
    #[cfg(target_os = "espidf")]
    espnow: EspNow<'static>,
    #[cfg(not(target_os = "espidf"))]
    air_log: Vec<AirFrame>,
    /// Upcoming enqueues the simulation refuses with `QueueFull`.
    #[cfg(not(target_os = "espidf"))]
    fail_next: u8,
}

#[cfg(target_os = "espidf")]
impl EspNowRadio {
    /// Bring up ESP-NOW on an already started Wi-Fi station, pin the
    /// channel, register the broadcast peer and hook both callbacks into
    /// the event queue.
    pub fn start(app_id: u32, channel: u8) -> Result<Self, crate::error::Error> {
        use esp_idf_svc::sys::{esp, esp_wifi_set_channel, wifi_interface_t_WIFI_IF_STA, wifi_second_chan_t_WIFI_SECOND_CHAN_NONE};

        esp!(unsafe { esp_wifi_set_channel(channel, wifi_second_chan_t_WIFI_SECOND_CHAN_NONE) })
            .map_err(|e| RadioError::Driver(e.code()))?;

        let espnow = EspNow::take().map_err(|e| RadioError::Driver(e.code()))?;

        espnow
            .add_peer(PeerInfo {
                peer_addr: BROADCAST,
                channel,
                ifidx: wifi_interface_t_WIFI_IF_STA,
                encrypt: false,
                ..Default::default()
            })
            .map_err(|e| RadioError::Driver(e.code()))?;

        espnow
            .register_recv_cb(move |info: &ReceiveInfo, data: &[u8]| {
                match parse_air_frame(app_id, info.src_addr, data) {
                    Some(frame) => {
                        if !push_event(Event::Receive(frame)) {
                            debug!("espnow: queue full, inbound frame dropped");
                        }
                    }
                    None => debug!("espnow: foreign or short frame ({} B) ignored", data.len()),
                }
            })
            .map_err(|e| RadioError::Driver(e.code()))?;

        espnow
            .register_send_cb(|_mac: &[u8], status: SendStatus| {
                let ok = matches!(status, SendStatus::SUCCESS);
                if !push_event(Event::TransmitComplete { ok }) {
                    debug!("espnow: queue full, tx status dropped");
                }
            })
            .map_err(|e| RadioError::Driver(e.code()))?;

        info!("espnow: broadcast link up (channel {}, app_id {:#010X})", channel, app_id);
        Ok(Self { app_id, espnow })
    }

    fn send_once(&mut self, air: &[u8]) -> Result<(), RadioError> {
        use esp_idf_svc::sys::{ESP_ERR_ESPNOW_NOT_INIT, ESP_ERR_ESPNOW_NO_MEM};

        self.espnow.send(BROADCAST, air).map_err(|e| match e.code() {
            c if c == ESP_ERR_ESPNOW_NO_MEM as i32 => RadioError::QueueFull,
            c if c == ESP_ERR_ESPNOW_NOT_INIT as i32 => RadioError::NotStarted,
            c => RadioError::Driver(c),
        })
    }
}

#[cfg(not(target_os = "espidf"))]
impl EspNowRadio {
    /// Simulation: enqueues succeed unless refused via
    /// [`fail_next`](Self::fail_next); accepted frames go to a bounded air
    /// log for tests and bench runs.
    pub fn start(app_id: u32, channel: u8) -> Result<Self, crate::error::Error> {
        info!("espnow(sim): channel {}, app_id {:#010X}", channel, app_id);
        Ok(Self {
            app_id,
            air_log: Vec::new(),
            fail_next: 0,
        })
    }

    fn send_once(&mut self, air: &[u8]) -> Result<(), RadioError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(RadioError::QueueFull);
        }
        let mut frame = AirFrame::new();
        frame
            .extend_from_slice(air)
            .map_err(|()| RadioError::PayloadTooLarge)?;
        if self.air_log.len() == AIR_LOG_CAP {
            self.air_log.remove(0);
        }
        self.air_log.push(frame);
        Ok(())
    }

    /// Refuse the next `n` enqueues, as a full driver queue would.
    pub fn fail_next(&mut self, n: u8) {
        self.fail_next = n;
    }

    /// The most recent frames "transmitted", oldest first, at most
    /// [`AIR_LOG_CAP`].
    pub fn air_log(&self) -> &[AirFrame] {
        &self.air_log
    }
}

impl EspNowRadio {
    pub fn app_id(&self) -> u32 {
        self.app_id
    }
}

impl RadioPort for EspNowRadio {
    fn broadcast(&mut self, frame: &OutboundFrame) -> Result<(), RadioError> {
        let air = encode_air_frame(self.app_id, frame.seq, frame.payload.as_bytes())?;
        send_with_retry(frame.retries, || self.send_once(&air)).map_err(|e| {
            debug!("espnow: seq={} dropped after {} retries ({})", frame.seq, frame.retries, e);
            e
        })
    }
}

/// Run `send` once, then again after each failure up to `retries` more
/// times.  Returns the result of the last attempt.
pub fn send_with_retry(
    retries: u8,
    mut send: impl FnMut() -> Result<(), RadioError>,
) -> Result<(), RadioError> {
    let mut attempt = 0u8;
    loop {
        match send() {
            Ok(()) => return Ok(()),
            Err(e) if attempt < retries => {
                attempt += 1;
                debug!("espnow: enqueue failed ({}), retry {}", e, attempt);
            }
            Err(e) => return Err(e),
        }
    }
}
