//! Peripheral drivers: periodic tick timers and the activity LED.

pub mod hw_timer;
pub mod status_led;
