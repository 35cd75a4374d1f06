use esp_wifi_sys::include::{
    ESP_ERR_ESPNOW_ARG, ESP_ERR_ESPNOW_EXIST, ESP_ERR_ESPNOW_FULL, ESP_ERR_ESPNOW_IF,
    ESP_ERR_ESPNOW_INTERNAL, ESP_ERR_ESPNOW_NOT_FOUND, ESP_ERR_ESPNOW_NOT_INIT,
    ESP_ERR_ESPNOW_NO_MEM,
};
use thiserror::Error;

/// Errors surfaced by the driver.
///
/// The `ESP_ERR_ESPNOW_*` status codes map onto the named variants; anything
/// the native layer reports outside that table lands in `Other` with the raw
/// code preserved.
#[derive(Error, Debug)]
pub enum EspNowError {
    #[error("driver already instantiated")]
    AlreadyTaken,
    #[error("wifi bring-up failed: {0:?}")]
    Wifi(esp_wifi::wifi::WifiError),
    #[error("esp-now is not initialized")]
    NotInitialized,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("out of memory")]
    OutOfMemory,
    #[error("peer list is full")]
    PeerListFull,
    #[error("peer not found")]
    PeerNotFound,
    #[error("internal failure")]
    Internal,
    #[error("peer already exists")]
    PeerExists,
    #[error("wifi interface mismatch")]
    Interface,
    #[error("unexpected status code {0}")]
    Other(i32),
}

impl EspNowError {
    pub(crate) fn from_code(code: i32) -> Self {
        match code as u32 {
            ESP_ERR_ESPNOW_NOT_INIT => Self::NotInitialized,
            ESP_ERR_ESPNOW_ARG => Self::InvalidArgument,
            ESP_ERR_ESPNOW_NO_MEM => Self::OutOfMemory,
            ESP_ERR_ESPNOW_FULL => Self::PeerListFull,
            ESP_ERR_ESPNOW_NOT_FOUND => Self::PeerNotFound,
            ESP_ERR_ESPNOW_INTERNAL => Self::Internal,
            ESP_ERR_ESPNOW_EXIST => Self::PeerExists,
            ESP_ERR_ESPNOW_IF => Self::Interface,
            _ => Self::Other(code),
        }
    }
}

/// Maps a native status code to a `Result`.
pub(crate) fn check(code: i32) -> Result<(), EspNowError> {
    if code == 0 {
        return Ok(());
    }
    Err(EspNowError::from_code(code))
}

/// The peer did not acknowledge a frame handed to [`crate::EspNow::send`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("peer did not acknowledge the frame")]
pub struct SendError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_status_is_ok() {
        assert!(check(0).is_ok());
    }

    #[test]
    fn espnow_codes_map_to_named_variants() {
        assert!(matches!(
            EspNowError::from_code(ESP_ERR_ESPNOW_NOT_INIT as i32),
            EspNowError::NotInitialized
        ));
        assert!(matches!(
            EspNowError::from_code(ESP_ERR_ESPNOW_ARG as i32),
            EspNowError::InvalidArgument
        ));
        assert!(matches!(
            EspNowError::from_code(ESP_ERR_ESPNOW_FULL as i32),
            EspNowError::PeerListFull
        ));
        assert!(matches!(
            EspNowError::from_code(ESP_ERR_ESPNOW_EXIST as i32),
            EspNowError::PeerExists
        ));
    }

    #[test]
    fn unknown_codes_keep_the_raw_value() {
        assert!(matches!(
            EspNowError::from_code(0x5005),
            EspNowError::Other(0x5005)
        ));
    }
}
