//! LineCounter firmware entry point
//!
//! Hexagonal architecture with event-driven, run-to-completion execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  LineSource        EspNowRadio      StatusLed    LogEventSink  │
//! │  (InputPort)       (RadioPort)      (Indicator)  (EventSink)   │
//! │  NvsConfigStore (ConfigPort)        hw_timer (tick sources)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              CounterService (pure logic)               │    │
//! │  │  sampler · codec · dedup · commands · send trigger     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pin map (ESP32 DevKit):
//!
//! | GPIO | Use                                   |
//! |------|---------------------------------------|
//! | 4    | Line A sensor (active-low, pull-up)   |
//! | 5    | Line B sensor (active-low, pull-up)   |
//! | 2    | Activity LED (active-high)            |
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};

use linecounter::adapters::device_id;
use linecounter::adapters::espnow::EspNowRadio;
use linecounter::adapters::input::{LineSource, PinLines, SimulatedLines};
use linecounter::adapters::log_sink::LogEventSink;
use linecounter::adapters::node::NodeHardware;
use linecounter::adapters::nvs::NvsConfigStore;
use linecounter::app::ports::ConfigPort;
use linecounter::app::service::CounterService;
use linecounter::config::CounterConfig;
use linecounter::drivers::hw_timer;
use linecounter::drivers::status_led::StatusLed;
use linecounter::events::{self, Event};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("LineCounter v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsConfigStore::new(nvs_partition.clone()).and_then(|store| store.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            CounterConfig::default()
        }
    };
    info!(
        "Config: sample={}ms retries={} channel={} sim={}",
        config.sample_interval_ms, config.tx_retries, config.radio_channel, config.simulate_inputs
    );

    // ── Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    info!("Device ID: {}", device_id::device_id(&mac));

    // ── 3. Radio: Wi-Fi station (not associated) + ESP-NOW ────
    let mut wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs_partition))?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;
    let radio = EspNowRadio::start(config.app_id, config.radio_channel)?;

    // ── 4. Inputs + indicator ─────────────────────────────────
    let input = if config.simulate_inputs {
        info!("Inputs: simulated pattern");
        LineSource::Simulated(SimulatedLines::new())
    } else {
        let mut a = PinDriver::input(peripherals.pins.gpio4)?;
        a.set_pull(Pull::Up)?;
        let mut b = PinDriver::input(peripherals.pins.gpio5)?;
        b.set_pull(Pull::Up)?;
        LineSource::Pins(PinLines::new(a, b))
    };
    let led = StatusLed::new(PinDriver::output(peripherals.pins.gpio2)?, false);

    let mut node = NodeHardware::new(input, radio, led);
    let mut sink = LogEventSink::new();
    let mut app = CounterService::new(&config);

    // ── 5. Startup report, then tick sources ──────────────────
    hw_timer::start_event_sources(config.sample_interval_ms)?;

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    loop {
        let event = events::wait_event();
        if matches!(event, Event::SecondElapsed) {
            node.input.on_second();
        }
        app.dispatch(event, &mut node, &mut sink);
    }
}
