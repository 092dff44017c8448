//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                    |
//! |-------------|----------------|--------------------------------|
//! | `espnow`    | RadioPort      | ESP-NOW broadcast + callbacks  |
//! | `input`     | InputPort      | Two GPIO lines / simulator     |
//! | `log_sink`  | EventSink      | Serial log output              |
//! | `node`      | all hardware   | Bundles input, radio, LED      |
//! | `nvs`       | ConfigPort     | NVS / in-memory store          |
//! | `device_id` |:              | eFuse factory MAC              |

pub mod device_id;
pub mod espnow;
pub mod input;
pub mod log_sink;
pub mod node;
pub mod nvs;
