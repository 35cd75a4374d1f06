use crate::ESP_NOW_MAX_DATA_LEN;

/// Outcome the native send callback reported for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The peer acknowledged the frame (for broadcast: the frame went out).
    Delivered,
    /// No acknowledgement arrived.
    Failed,
}

impl DeliveryStatus {
    // esp_now_send_status_t: 0 is success, everything else reads as failure.
    pub(crate) fn from_raw(raw: u32) -> Self {
        if raw == 0 {
            return Self::Delivered;
        }
        Self::Failed
    }
}

/// Addressing and reception metadata attached to a received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// MAC address the frame was sent from.
    pub src_address: [u8; 6],
    /// MAC address the frame was sent to, either this station or broadcast.
    pub dst_address: [u8; 6],
    /// Signal strength at reception, when the native layer provided it.
    pub rssi: Option<i32>,
}

/// An owned frame handed out by the receive queue or the receive hook.
#[derive(Debug, Clone)]
pub struct ReceivedFrame {
    pub info: FrameInfo,
    /// Number of valid bytes at the front of `data`.
    pub len: u8,
    pub data: [u8; ESP_NOW_MAX_DATA_LEN],
}

impl ReceivedFrame {
    /// Copies a callback payload into an owned frame. Payloads over the
    /// native maximum are rejected.
    pub(crate) fn from_parts(info: FrameInfo, payload: &[u8]) -> Option<Self> {
        if payload.len() > ESP_NOW_MAX_DATA_LEN {
            return None;
        }
        let mut data = [0u8; ESP_NOW_MAX_DATA_LEN];
        data[..payload.len()].copy_from_slice(payload);
        Some(Self {
            info,
            len: payload.len() as u8,
            data,
        })
    }

    /// The valid payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

/// Completion notice for a frame previously handed to the native send call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentFrame {
    /// MAC address the frame was addressed to.
    pub peer_address: [u8; 6],
    pub status: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> FrameInfo {
        FrameInfo {
            src_address: [2, 4, 6, 8, 10, 12],
            dst_address: [0xff; 6],
            rssi: Some(-42),
        }
    }

    #[test]
    fn frame_keeps_only_the_valid_prefix() {
        let frame = ReceivedFrame::from_parts(info(), &[1, 2, 3]).unwrap();
        assert_eq!(frame.len, 3);
        assert_eq!(frame.data(), &[1, 2, 3]);
    }

    #[test]
    fn empty_payloads_are_tolerated() {
        let frame = ReceivedFrame::from_parts(info(), &[]).unwrap();
        assert!(frame.data().is_empty());
    }

    #[test]
    fn maximum_payload_fits_exactly() {
        let payload = [0xaa; ESP_NOW_MAX_DATA_LEN];
        let frame = ReceivedFrame::from_parts(info(), &payload).unwrap();
        assert_eq!(frame.data().len(), ESP_NOW_MAX_DATA_LEN);
    }

    #[test]
    fn oversized_payloads_are_rejected() {
        let payload = [0u8; ESP_NOW_MAX_DATA_LEN + 1];
        assert!(ReceivedFrame::from_parts(info(), &payload).is_none());
    }

    #[test]
    fn status_decodes_zero_as_delivered() {
        assert_eq!(DeliveryStatus::from_raw(0), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::from_raw(1), DeliveryStatus::Failed);
        // Out-of-range values normalize to a failure.
        assert_eq!(DeliveryStatus::from_raw(7), DeliveryStatus::Failed);
    }
}
