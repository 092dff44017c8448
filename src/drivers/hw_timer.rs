//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates the two periodic timers that drive the counting core:
//!
//! - sampling tick at `sample_interval_ms` → [`Event::Tick`](crate::events::Event::Tick)
//! - 1 Hz wall-clock tick → [`Event::SecondElapsed`](crate::events::Event::SecondElapsed)
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call [`push_event`](crate::events::push_event).

use crate::events::{push_event, Event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut SAMPLE_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut SECOND_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Period of the wall-clock timer.
pub const SECOND_PERIOD_US: u64 = 1_000_000;

/// Errors while arming the periodic timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    CreateFailed(i32),
    StartFailed(i32),
}

impl core::fmt::Display for TimerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CreateFailed(rc) => write!(f, "esp_timer_create failed (rc={})", rc),
            Self::StartFailed(rc) => write!(f, "esp_timer_start_periodic failed (rc={})", rc),
        }
    }
}

impl std::error::Error for TimerError {}

/// Queue-facing body of the sampling callback.
#[cfg(target_os = "espidf")]
fn on_sample_tick() {
    if !push_event(Event::Tick) {
        log::debug!("hw_timer: queue full, tick dropped");
    }
}

/// Queue-facing body of the wall-clock callback.
#[cfg(target_os = "espidf")]
fn on_second_tick() {
    if !push_event(Event::SecondElapsed) {
        log::debug!("hw_timer: queue full, second dropped");
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn sample_tick_cb(_arg: *mut core::ffi::c_void) {
    on_sample_tick();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn second_tick_cb(_arg: *mut core::ffi::c_void) {
    on_second_tick();
}

/// Create and start one periodic timer, storing its handle in `slot`.
///
/// SAFETY: `slot` must point at one of this module's static handles and
/// this must run on the main task before any callback can fire.
#[cfg(target_os = "espidf")]
unsafe fn arm(
    slot: *mut esp_timer_handle_t,
    name: &'static [u8],
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    period_us: u64,
) -> Result<(), TimerError> {
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: true,
    };
    let ret = unsafe { esp_timer_create(&args, slot) };
    if ret != ESP_OK {
        return Err(TimerError::CreateFailed(ret));
    }
    let ret = unsafe { esp_timer_start_periodic(*slot, period_us) };
    if ret != ESP_OK {
        return Err(TimerError::StartFailed(ret));
    }
    Ok(())
}

/// Start the sampling and wall-clock timers.
#[cfg(target_os = "espidf")]
pub fn start_timers(sample_interval_ms: u32) -> Result<(), TimerError> {
    // SAFETY: both handles are written here once at boot from the single
    // main-task context; the callbacks only call push_event().
    unsafe {
        arm(
            &raw mut SAMPLE_TIMER,
            b"sample\0",
            sample_tick_cb,
            u64::from(sample_interval_ms) * 1000,
        )?;
        arm(&raw mut SECOND_TIMER, b"second\0", second_tick_cb, SECOND_PERIOD_US)?;
    }
    info!("hw_timer: sample@{}ms + second@1Hz started", sample_interval_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(sample_interval_ms: u32) -> Result<(), TimerError> {
    log::info!(
        "hw_timer(sim): timers not started (sample@{}ms)",
        sample_interval_ms
    );
    Ok(())
}

/// Queue the one-shot [`Event::Startup`], then start both timers, so the
/// boot report always precedes the first tick.
pub fn start_event_sources(sample_interval_ms: u32) -> Result<(), TimerError> {
    if !push_event(Event::Startup) {
        log::warn!("hw_timer: event queue full at boot, startup report skipped");
    }
    start_timers(sample_interval_ms)
}
