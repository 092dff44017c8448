//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`].  The configuration is stored as one
//! `postcard` blob; counts are never persisted.
//!
//! - Config validation: every field is range-checked before persistence.
//! - Atomic writes: ESP-IDF NVS commits are atomic per `set_raw`.

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::CounterConfig;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &str = "linecounter";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &str = "cfg";

/// Upper bound for the encoded config blob.
const MAX_BLOB_SIZE: usize = 64;

pub struct NvsConfigStore {
    #[cfg(target_os = "espidf")]
    nvs: EspNvs<NvsDefault>,
    #[cfg(not(target_os = "espidf"))]
    blob: Option<Vec<u8>>,
}

#[cfg(target_os = "espidf")]
impl NvsConfigStore {
    /// Open the config namespace on the default NVS partition.
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, ConfigError> {
        let nvs = EspNvs::new(partition, CONFIG_NAMESPACE, true).map_err(|e| {
            log::warn!("NvsConfigStore: open failed ({})", e);
            ConfigError::IoError
        })?;
        info!("NvsConfigStore: ESP-IDF NVS namespace '{}' open", CONFIG_NAMESPACE);
        Ok(Self { nvs })
    }

    fn read_blob<'b>(&self, buf: &'b mut [u8]) -> Result<Option<&'b [u8]>, ConfigError> {
        self.nvs
            .get_raw(CONFIG_KEY, buf)
            .map_err(|_| ConfigError::IoError)
    }

    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        self.nvs
            .set_raw(CONFIG_KEY, bytes)
            .map(|_| ())
            .map_err(|_| ConfigError::IoError)
    }
}

#[cfg(not(target_os = "espidf"))]
impl NvsConfigStore {
    pub fn new() -> Result<Self, ConfigError> {
        info!("NvsConfigStore: simulation backend");
        Ok(Self { blob: None })
    }

    fn read_blob<'b>(&self, buf: &'b mut [u8]) -> Result<Option<&'b [u8]>, ConfigError> {
        match &self.blob {
            Some(bytes) if bytes.len() <= buf.len() => {
                buf[..bytes.len()].copy_from_slice(bytes);
                Ok(Some(&buf[..bytes.len()]))
            }
            Some(_) => Err(ConfigError::Corrupted),
            None => Ok(None),
        }
    }

    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        self.blob = Some(bytes.to_vec());
        Ok(())
    }

    /// Overwrite the stored blob with raw bytes (corruption tests).
    pub fn put_raw(&mut self, bytes: &[u8]) {
        self.blob = Some(bytes.to_vec());
    }
}

impl ConfigPort for NvsConfigStore {
    fn load(&self) -> Result<CounterConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match self.read_blob(&mut buf)? {
            Some(bytes) => {
                let cfg: CounterConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                cfg.validate()?;
                info!("NvsConfigStore: loaded config from store");
                Ok(cfg)
            }
            None => {
                info!("NvsConfigStore: no stored config, using defaults");
                Ok(CounterConfig::default())
            }
        }
    }

    fn save(&mut self, config: &CounterConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::IoError);
        }
        self.write_blob(&bytes)?;
        info!("NvsConfigStore: config saved ({} B)", bytes.len());
        Ok(())
    }
}
