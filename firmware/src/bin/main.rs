#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_smartled::SmartLedsAdapter;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sand_hourglass::hal::ActiveLowButton;
use sand_hourglass::panels::LedPanels;
use sand_hourglass::qmi8658::{AxisMapping, Qmi8658};
use sand_hourglass::{Config, Hourglass};
use sand_hourglass_firmware::{seed_from_noise, PinBuzzer, BUFFER_SIZE};
use smart_leds::RGB8;

// --- CONFIGURATION CONSTANTS ---
const COLOR_SAND: RGB8 = RGB8 { r: 40, g: 24, b: 0 };
// Sensor axes relative to the panels on this board.
const IMU_AXES: AxisMapping = AxisMapping {
    swap_xy: false,
    invert_x: false,
    invert_y: false,
};
const SEED_SAMPLES: usize = 8;

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // System Init
    // Set CPU to 80MHz to save power
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::_80MHz);
    let peripherals = esp_hal::init(config);

    // Runtime Init
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Hardware Init
    // LEDs: the on-board panel is matrix A, the chained one is B.
    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80)).expect("Failed to initialize RMT0");
    let mut rmt_buffer = [PulseCode::default(); BUFFER_SIZE];
    let led_strip = SmartLedsAdapter::new(rmt.channel0, peripherals.GPIO14, &mut rmt_buffer);
    let panels = LedPanels::new(led_strip, COLOR_SAND);

    // IMU
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .expect("Failed to create I2c")
    .with_sda(peripherals.GPIO11)
    .with_scl(peripherals.GPIO12);
    let mut imu = Qmi8658::new(i2c).with_axes(IMU_AXES);
    if let Err(e) = imu.init() {
        panic!("Failed to initialize QMI8658: {:?}", e);
    } else {
        info!("QMI8658 initialized successfully");
    }

    // BOOT button, pulled up, pressed pulls it low.
    let button = ActiveLowButton::new(Input::new(
        peripherals.GPIO0,
        InputConfig::default().with_pull(Pull::Up),
    ));

    let buzzer = PinBuzzer::new(Output::new(
        peripherals.GPIO7,
        Level::Low,
        OutputConfig::default(),
    ));

    // The low bits of a resting accelerometer are noisy enough to seed the sand.
    let mut samples = [(0i16, 0i16); SEED_SAMPLES];
    for sample in samples.iter_mut() {
        match imu.read_accel_xy() {
            Ok(xy) => *sample = xy,
            Err(e) => warn!("seed sample failed: {:?}", e),
        }
        Timer::after(Duration::from_millis(5)).await;
    }
    let rng = SmallRng::seed_from_u64(seed_from_noise(samples, Instant::now()));

    let mut hourglass = Hourglass::new(
        Config::default(),
        imu,
        panels,
        button,
        buzzer,
        rng,
        Instant::now(),
    )
    .expect("Invalid hourglass config");
    hourglass.start(Instant::now());

    let _ = spawner;

    loop {
        Timer::after(hourglass.period()).await;
        hourglass.tick(Instant::now());
    }
}
