//! Passive monitor using hook delivery: both notifications print straight
//! from the Wi-Fi driver task while the main loop idles.

#![no_std]
#![no_main]

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{delay::Delay, prelude::*, rng::Rng, timer::timg::TimerGroup};
use esp_println::println;
use esp_wifi::{init, EspWifiInitFor};
use espnow::EspNow;

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

    esp_now.set_receive_hook(|frame| {
        println!(
            "rx {:02x?} -> {:02x?}: {:02x?}",
            frame.info.src_address,
            frame.info.dst_address,
            frame.data()
        );
    });
    esp_now.set_sent_hook(|sent| {
        println!("tx to {:02x?}: {:?}", sent.peer_address, sent.status);
    });

    let delay = Delay::new();
    loop {
        delay.delay_millis(1_000);
    }
}
