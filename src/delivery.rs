//! Notification plumbing between the native callbacks and application code.
//!
//! The radio blob invokes the registered callbacks from its own task. Frames
//! either land in the bounded queue drained by `EspNow::receive`, or go
//! straight to an installed hook. The send-result slot is always written so
//! the send token resolves in both modes.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use alloc::boxed::Box;
use critical_section::Mutex;
use esp_wifi_sys::include::{esp_now_recv_info_t, esp_now_send_status_t};
use heapless::Deque;

use crate::event::{DeliveryStatus, FrameInfo, ReceivedFrame, SentFrame};

/// Frames buffered for `EspNow::receive` before the oldest is discarded.
const RX_QUEUE_DEPTH: usize = 16;

pub(crate) type ReceiveHook = Box<dyn FnMut(ReceivedFrame) + Send>;
pub(crate) type SentHook = Box<dyn FnMut(SentFrame) + Send>;

static RX_QUEUE: Mutex<RefCell<Deque<ReceivedFrame, RX_QUEUE_DEPTH>>> =
    Mutex::new(RefCell::new(Deque::new()));
static RECEIVE_HOOK: Mutex<RefCell<Option<ReceiveHook>>> = Mutex::new(RefCell::new(None));
static SENT_HOOK: Mutex<RefCell<Option<SentHook>>> = Mutex::new(RefCell::new(None));

pub(crate) const SEND_IDLE: u8 = 0;
pub(crate) const SEND_PENDING: u8 = 1;
pub(crate) const SEND_DELIVERED: u8 = 2;
pub(crate) const SEND_FAILED: u8 = 3;

/// Result slot for the single in-flight send.
pub(crate) static SEND_RESULT: AtomicU8 = AtomicU8::new(SEND_IDLE);

pub(crate) unsafe extern "C" fn recv_trampoline(
    info: *const esp_now_recv_info_t,
    data: *const u8,
    data_len: i32,
) {
    if info.is_null() || data.is_null() || data_len < 0 {
        return;
    }
    let info = &*info;

    let mut src_address = [0u8; 6];
    let mut dst_address = [0u8; 6];
    if !info.src_addr.is_null() {
        src_address.copy_from_slice(core::slice::from_raw_parts(info.src_addr, 6));
    }
    if !info.des_addr.is_null() {
        dst_address.copy_from_slice(core::slice::from_raw_parts(info.des_addr, 6));
    }
    let rssi = if info.rx_ctrl.is_null() {
        None
    } else {
        Some((*info.rx_ctrl).rssi() as i32)
    };

    let payload = core::slice::from_raw_parts(data, data_len as usize);
    let frame = match ReceivedFrame::from_parts(
        FrameInfo {
            src_address,
            dst_address,
            rssi,
        },
        payload,
    ) {
        Some(frame) => frame,
        None => {
            log::warn!("dropping oversized frame ({} bytes)", payload.len());
            return;
        }
    };

    critical_section::with(|cs| {
        if let Some(hook) = RECEIVE_HOOK.borrow_ref_mut(cs).as_mut() {
            hook(frame);
            return;
        }
        let mut queue = RX_QUEUE.borrow_ref_mut(cs);
        if queue.is_full() {
            // Keep the freshest traffic.
            queue.pop_front();
        }
        let _ = queue.push_back(frame);
    });
}

pub(crate) unsafe extern "C" fn sent_trampoline(mac_addr: *const u8, status: esp_now_send_status_t) {
    let mut peer_address = [0u8; 6];
    if !mac_addr.is_null() {
        peer_address.copy_from_slice(core::slice::from_raw_parts(mac_addr, 6));
    }
    let status = DeliveryStatus::from_raw(status as u32);

    SEND_RESULT.store(
        match status {
            DeliveryStatus::Delivered => SEND_DELIVERED,
            DeliveryStatus::Failed => SEND_FAILED,
        },
        Ordering::Release,
    );

    critical_section::with(|cs| {
        if let Some(hook) = SENT_HOOK.borrow_ref_mut(cs).as_mut() {
            hook(SentFrame {
                peer_address,
                status,
            });
        }
    });
}

pub(crate) fn dequeue_received() -> Option<ReceivedFrame> {
    critical_section::with(|cs| RX_QUEUE.borrow_ref_mut(cs).pop_front())
}

pub(crate) fn install_receive_hook(hook: Option<ReceiveHook>) {
    critical_section::with(|cs| *RECEIVE_HOOK.borrow_ref_mut(cs) = hook);
}

pub(crate) fn install_sent_hook(hook: Option<SentHook>) {
    critical_section::with(|cs| *SENT_HOOK.borrow_ref_mut(cs) = hook);
}

/// Discards queued frames, both hooks and any stale send result.
pub(crate) fn reset() {
    critical_section::with(|cs| {
        RX_QUEUE.borrow_ref_mut(cs).clear();
        *RECEIVE_HOOK.borrow_ref_mut(cs) = None;
        *SENT_HOOK.borrow_ref_mut(cs) = None;
    });
    SEND_RESULT.store(SEND_IDLE, Ordering::Release);
}
