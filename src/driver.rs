//! The ESP-NOW driver surface.
//!
//! Every operation is a thin forward to the matching `esp_now_*` entry point
//! with its status code checked. The driver owns the station interface for as
//! long as it lives; dropping it unregisters both native callbacks and
//! deinitializes the native module.

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};

use alloc::boxed::Box;
use esp_hal::peripheral::Peripheral;
use esp_hal::peripherals::WIFI;
use esp_wifi::wifi::{WifiController, WifiDevice, WifiStaDevice};
use esp_wifi::EspWifiInitialization;
use esp_wifi_sys::include as sys;

use crate::delivery;
use crate::error::{check, EspNowError, SendError};
use crate::event::{ReceivedFrame, SentFrame};
use crate::peer::{from_raw_peer, raw_peer, PeerCount, PeerInfo};
use crate::ESP_NOW_KEY_LEN;

static DRIVER_TAKEN: AtomicBool = AtomicBool::new(false);

/// The ESP-NOW driver. At most one instance exists at a time.
pub struct EspNow<'d> {
    _interface: WifiDevice<'d, WifiStaDevice>,
    _controller: WifiController<'d>,
}

impl<'d> EspNow<'d> {
    /// Brings the station interface up and initializes the native ESP-NOW
    /// module with queue delivery: frames arrive through [`Self::receive`]
    /// and send completion through the token returned by [`Self::send`].
    pub fn new(
        inited: &EspWifiInitialization,
        device: impl Peripheral<P = WIFI> + 'd,
    ) -> Result<Self, EspNowError> {
        if DRIVER_TAKEN.swap(true, Ordering::Acquire) {
            return Err(EspNowError::AlreadyTaken);
        }
        match Self::init(inited, device) {
            Ok(driver) => Ok(driver),
            Err(err) => {
                DRIVER_TAKEN.store(false, Ordering::Release);
                Err(err)
            }
        }
    }

    fn init(
        inited: &EspWifiInitialization,
        device: impl Peripheral<P = WIFI> + 'd,
    ) -> Result<Self, EspNowError> {
        let (interface, mut controller) =
            esp_wifi::wifi::new_with_mode(inited, device, WifiStaDevice)
                .map_err(EspNowError::Wifi)?;
        controller.start().map_err(EspNowError::Wifi)?;

        unsafe {
            // Frames are lost while the station sleeps between beacons.
            check(sys::esp_wifi_set_ps(sys::wifi_ps_type_t_WIFI_PS_NONE))?;

            check(sys::esp_now_init())?;
            check(sys::esp_now_register_recv_cb(Some(
                delivery::recv_trampoline,
            )))?;
            check(sys::esp_now_register_send_cb(Some(
                delivery::sent_trampoline,
            )))?;
        }
        log::debug!("esp-now initialized");

        Ok(Self {
            _interface: interface,
            _controller: controller,
        })
    }

    /// Version of the native ESP-NOW module.
    pub fn version(&self) -> Result<u32, EspNowError> {
        let mut version = 0u32;
        check(unsafe { sys::esp_now_get_version(&mut version) })?;
        Ok(version)
    }

    /// Registers a peer. Required before sending to its address, including
    /// the broadcast address.
    pub fn add_peer(&mut self, peer: PeerInfo) -> Result<(), EspNowError> {
        let raw = raw_peer(&peer);
        check(unsafe { sys::esp_now_add_peer(&raw) })
    }

    /// Removes a registered peer.
    pub fn remove_peer(&mut self, peer_address: &[u8; 6]) -> Result<(), EspNowError> {
        check(unsafe { sys::esp_now_del_peer(peer_address.as_ptr()) })
    }

    /// Updates a registered peer in place.
    pub fn modify_peer(&mut self, peer: PeerInfo) -> Result<(), EspNowError> {
        let raw = raw_peer(&peer);
        check(unsafe { sys::esp_now_mod_peer(&raw) })
    }

    /// Looks up a registered peer by address.
    pub fn peer(&self, peer_address: &[u8; 6]) -> Result<PeerInfo, EspNowError> {
        let mut raw = raw_peer(&PeerInfo::default());
        check(unsafe { sys::esp_now_get_peer(peer_address.as_ptr(), &mut raw) })?;
        Ok(from_raw_peer(&raw))
    }

    /// Walks the native peer list: `from_head` restarts the walk, `false`
    /// continues from the previous entry.
    pub fn fetch_peer(&mut self, from_head: bool) -> Result<PeerInfo, EspNowError> {
        let mut raw = raw_peer(&PeerInfo::default());
        check(unsafe { sys::esp_now_fetch_peer(from_head, &mut raw) })?;
        Ok(from_raw_peer(&raw))
    }

    pub fn peer_exists(&self, peer_address: &[u8; 6]) -> bool {
        unsafe { sys::esp_now_is_peer_exist(peer_address.as_ptr()) }
    }

    pub fn peer_count(&self) -> Result<PeerCount, EspNowError> {
        let mut raw = sys::esp_now_peer_num_t {
            total_num: 0,
            encrypt_num: 0,
        };
        check(unsafe { sys::esp_now_get_peer_num(&mut raw) })?;
        Ok(PeerCount {
            total: raw.total_num as usize,
            encrypted: raw.encrypt_num as usize,
        })
    }

    /// Sets the primary master key used to derive per-peer keys.
    pub fn set_pmk(&mut self, pmk: &[u8; ESP_NOW_KEY_LEN]) -> Result<(), EspNowError> {
        check(unsafe { sys::esp_now_set_pmk(pmk.as_ptr()) })
    }

    /// Configures the wake window for connectionless power saving.
    pub fn set_wake_window(&mut self, window: u16) -> Result<(), EspNowError> {
        check(unsafe { sys::esp_now_set_wake_window(window) })
    }

    /// Hands a payload to the native driver. The returned token resolves once
    /// the send callback reports the delivery status; it borrows the driver,
    /// so only one send is in flight at a time.
    pub fn send<'s>(
        &'s mut self,
        peer_address: &[u8; 6],
        data: &[u8],
    ) -> Result<SendToken<'s, 'd>, EspNowError> {
        delivery::SEND_RESULT.store(delivery::SEND_PENDING, Ordering::Release);
        let code = unsafe { sys::esp_now_send(peer_address.as_ptr(), data.as_ptr(), data.len()) };
        if let Err(err) = check(code) {
            delivery::SEND_RESULT.store(delivery::SEND_IDLE, Ordering::Release);
            return Err(err);
        }
        Ok(SendToken {
            _driver: PhantomData,
        })
    }

    /// Takes the oldest queued frame, if any. Returns `None` whenever a
    /// receive hook is installed, since frames are routed to it instead.
    pub fn receive(&self) -> Option<ReceivedFrame> {
        delivery::dequeue_received()
    }

    /// Routes received frames to `hook` instead of the queue.
    ///
    /// The hook runs in the Wi-Fi driver task with a critical section held;
    /// keep it short and non-blocking.
    pub fn set_receive_hook(&mut self, hook: impl FnMut(ReceivedFrame) + Send + 'static) {
        delivery::install_receive_hook(Some(Box::new(hook)));
    }

    /// Restores queue delivery for received frames.
    pub fn clear_receive_hook(&mut self) {
        delivery::install_receive_hook(None);
    }

    /// Observes every send completion in addition to the send token. Same
    /// execution context caveats as [`Self::set_receive_hook`].
    pub fn set_sent_hook(&mut self, hook: impl FnMut(SentFrame) + Send + 'static) {
        delivery::install_sent_hook(Some(Box::new(hook)));
    }

    pub fn clear_sent_hook(&mut self) {
        delivery::install_sent_hook(None);
    }
}

impl Drop for EspNow<'_> {
    fn drop(&mut self) {
        unsafe {
            if let Err(err) = check(sys::esp_now_unregister_recv_cb()) {
                log::warn!("failed to unregister receive callback: {err}");
            }
            if let Err(err) = check(sys::esp_now_unregister_send_cb()) {
                log::warn!("failed to unregister send callback: {err}");
            }
            if let Err(err) = check(sys::esp_now_deinit()) {
                log::warn!("failed to deinitialize esp-now: {err}");
            }
        }
        delivery::reset();
        DRIVER_TAKEN.store(false, Ordering::Release);
        log::debug!("esp-now deinitialized");
    }
}

/// Resolves to the delivery status of the send it was returned from.
#[must_use = "the delivery status is lost unless the token is waited on"]
pub struct SendToken<'s, 'd> {
    _driver: PhantomData<&'s mut EspNow<'d>>,
}

impl SendToken<'_, '_> {
    /// Blocks until the native send callback fires. The callback arrives
    /// within the ESP-NOW ack timeout, so the wait is short.
    pub fn wait(self) -> Result<(), SendError> {
        loop {
            match delivery::SEND_RESULT.load(Ordering::Acquire) {
                delivery::SEND_DELIVERED => {
                    delivery::SEND_RESULT.store(delivery::SEND_IDLE, Ordering::Release);
                    return Ok(());
                }
                delivery::SEND_FAILED => {
                    delivery::SEND_RESULT.store(delivery::SEND_IDLE, Ordering::Release);
                    return Err(SendError);
                }
                _ => {}
            }
        }
    }
}
