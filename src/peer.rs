use esp_wifi_sys::include::{esp_now_peer_info_t, wifi_interface_t_WIFI_IF_STA};

use crate::error::EspNowError;
use crate::ESP_NOW_KEY_LEN;

/// A peer entry in the native peer list.
///
/// Registration happens on the station interface. `channel: None` follows the
/// channel the station is currently on; encrypted traffic needs `lmk` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeerInfo {
    pub peer_address: [u8; 6],
    pub lmk: Option<[u8; ESP_NOW_KEY_LEN]>,
    pub channel: Option<u8>,
    pub encrypt: bool,
}

/// Sizes reported by the native peer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerCount {
    pub total: usize,
    pub encrypted: usize,
}

pub(crate) fn raw_peer(peer: &PeerInfo) -> esp_now_peer_info_t {
    esp_now_peer_info_t {
        peer_addr: peer.peer_address,
        lmk: peer.lmk.unwrap_or([0u8; ESP_NOW_KEY_LEN]),
        channel: peer.channel.unwrap_or(0),
        ifidx: wifi_interface_t_WIFI_IF_STA,
        encrypt: peer.encrypt,
        priv_: core::ptr::null_mut(),
    }
}

pub(crate) fn from_raw_peer(raw: &esp_now_peer_info_t) -> PeerInfo {
    PeerInfo {
        peer_address: raw.peer_addr,
        // The native entry always carries a key buffer; only an encrypting
        // peer actually has one.
        lmk: if raw.encrypt { Some(raw.lmk) } else { None },
        channel: if raw.channel == 0 {
            None
        } else {
            Some(raw.channel)
        },
        encrypt: raw.encrypt,
    }
}

/// Parses a `"aa:bb:cc:dd:ee:ff"` style MAC address.
pub fn parse_mac(s: &str) -> Result<[u8; 6], EspNowError> {
    let mut mac = [0u8; 6];
    let mut parts = s.split(':');
    for slot in mac.iter_mut() {
        let part = parts.next().ok_or(EspNowError::InvalidArgument)?;
        *slot = u8::from_str_radix(part, 16).map_err(|_| EspNowError::InvalidArgument)?;
    }
    if parts.next().is_some() {
        return Err(EspNowError::InvalidArgument);
    }
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mac_accepts_colon_notation() {
        assert_eq!(
            parse_mac("aa:BB:0c:00:ee:1f").unwrap(),
            [0xaa, 0xbb, 0x0c, 0x00, 0xee, 0x1f]
        );
    }

    #[test]
    fn parse_mac_rejects_malformed_input() {
        assert!(parse_mac("").is_err());
        assert!(parse_mac("aa:bb:cc:dd:ee").is_err());
        assert!(parse_mac("aa:bb:cc:dd:ee:ff:00").is_err());
        assert!(parse_mac("aa:bb:cc:dd:ee:zz").is_err());
    }

    #[test]
    fn raw_conversion_round_trips() {
        let peer = PeerInfo {
            peer_address: [1, 2, 3, 4, 5, 6],
            lmk: Some([7u8; ESP_NOW_KEY_LEN]),
            channel: Some(6),
            encrypt: true,
        };
        assert_eq!(from_raw_peer(&raw_peer(&peer)), peer);
    }

    #[test]
    fn unset_fields_map_to_native_defaults() {
        let raw = raw_peer(&PeerInfo {
            peer_address: [1, 2, 3, 4, 5, 6],
            ..Default::default()
        });
        assert_eq!(raw.channel, 0);
        assert_eq!(raw.lmk, [0u8; ESP_NOW_KEY_LEN]);
        assert!(!raw.encrypt);

        let back = from_raw_peer(&raw);
        assert_eq!(back.channel, None);
        assert_eq!(back.lmk, None);
    }
}
