//! Broadcasts a counter frame every half second and reports each delivery
//! status through the send token.

#![no_std]
#![no_main]

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{delay::Delay, prelude::*, rng::Rng, timer::timg::TimerGroup};
use esp_println::println;
use esp_wifi::{init, EspWifiInitFor};
use espnow::{EspNow, PeerInfo, BROADCAST_ADDRESS};

#[entry]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init({
        let mut config = esp_hal::Config::default();
        config.cpu_clock = CpuClock::max();
        config
    });

    esp_alloc::heap_allocator!(72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);

    let init = init(
        EspWifiInitFor::Wifi,
        timg0.timer0,
        Rng::new(peripherals.RNG),
        peripherals.RADIO_CLK,
    )
    .unwrap();

    let wifi = peripherals.WIFI;
    let mut esp_now = EspNow::new(&init, wifi).unwrap();

    println!("esp-now version {}", esp_now.version().unwrap());

    esp_now
        .add_peer(PeerInfo {
            peer_address: BROADCAST_ADDRESS,
            ..Default::default()
        })
        .unwrap();

    let delay = Delay::new();
    let mut seq: u32 = 0;
    loop {
        let mut frame = [0u8; 10];
        frame[..4].copy_from_slice(&seq.to_be_bytes());
        frame[4..].copy_from_slice(b"beacon");

        match esp_now.send(&BROADCAST_ADDRESS, &frame) {
            Ok(token) => println!("broadcast {} status: {:?}", seq, token.wait()),
            Err(err) => println!("broadcast {} rejected: {}", seq, err),
        }

        seq = seq.wrapping_add(1);
        delay.delay_millis(500);
    }
}
