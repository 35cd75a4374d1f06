//! Polls the receive queue, prints every frame and answers broadcasts with a
//! unicast reply, registering the sender as a peer on first contact.

#![no_std]
#![no_main]

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{prelude::*, rng::Rng, timer::timg::TimerGroup};
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

    loop {
        let Some(frame) = esp_now.receive() else {
            continue;
        };
        println!(
            "frame from {:02x?}: {} bytes, rssi {:?}",
            frame.info.src_address,
            frame.data().len(),
            frame.info.rssi
        );

        if frame.info.dst_address != BROADCAST_ADDRESS {
            continue;
        }
        if !esp_now.peer_exists(&frame.info.src_address) {
            if let Err(err) = esp_now.add_peer(PeerInfo {
                peer_address: frame.info.src_address,
                ..Default::default()
            }) {
                println!("failed to register peer: {}", err);
                continue;
            }
            println!("registered {} peers", esp_now.peer_count().unwrap().total);
        }
        match esp_now.send(&frame.info.src_address, b"ack") {
            Ok(token) => println!("reply status: {:?}", token.wait()),
            Err(err) => println!("reply rejected: {}", err),
        }
    }
}
