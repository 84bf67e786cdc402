#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::Timer;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    spi::{
        Mode,
        master::{Config as SpiConfig, Spi},
    },
    time::Rate,
    timer::timg::TimerGroup,
};
use log::{LevelFilter, info, warn};
use mipidsi::{
    Builder as DisplayBuilder,
    interface::SpiInterface,
    models::ST7789,
    options::{ColorInversion, Orientation, Rotation},
};
use static_cell::StaticCell;
use wordclock_core::{
    app::{APP_TITLE, ClockApp},
    config::ClockConfig,
    input::ButtonId,
    settings::SETTINGS_NAMESPACE,
};
use wordclock_hal_esp32s3::{
    input::buttons::{ButtonConfig, ButtonTrio},
    render::{
        BoardRenderer,
        matrix::{ChainLayout, LedMatrix},
        status::{HEIGHT, StatusDisplay, WIDTH},
    },
    storage::BoardKvStore,
};
use ws2812_spi::Ws2812;

use clock::BootClock;
use sntp::SntpClient;
use wifi::StationRadio;

#[path = "main/clock.rs"]
mod clock;
#[path = "main/sntp.rs"]
mod sntp;
#[path = "main/wifi.rs"]
mod wifi;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NTP_SERVER: &str = match option_env!("WORDCLOCK_NTP_SERVER") {
    Some(server) => server,
    None => "pool.ntp.org",
};

const POLL_PERIOD_MS: u64 = 50;
const DISPLAY_SPI_HZ: u32 = 40_000_000;
// 3.8 MHz gives the 0/1 symbol timing the WS2812 SPI encoder expects.
const MATRIX_SPI_KHZ: u32 = 3_800;
const TFT_OFFSET_X: u16 = 52;
const TFT_OFFSET_Y: u16 = 40;

static NET_RESOURCES: StaticCell<embassy_net::StackResources<4>> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

async fn halt(reason: &str) -> ! {
    warn!("boot: halted reason={}", reason);
    loop {
        Timer::after_secs(1).await;
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: wordclock {} starting", VERSION);

    // esp-radio requires an allocator.
    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // TFT wiring: SCK=GPIO36 MOSI=GPIO35 CS=GPIO42 DC=GPIO40 RST=GPIO41 BL=GPIO45 PWR=GPIO7
    let _tft_power = Output::new(peripherals.GPIO7, Level::High, OutputConfig::default());
    let _backlight = Output::new(peripherals.GPIO45, Level::High, OutputConfig::default());
    let tft_cs = Output::new(peripherals.GPIO42, Level::High, OutputConfig::default());
    let tft_dc = Output::new(peripherals.GPIO40, Level::Low, OutputConfig::default());
    let tft_rst = Output::new(peripherals.GPIO41, Level::High, OutputConfig::default());

    let display_spi_config = SpiConfig::default()
        .with_frequency(Rate::from_hz(DISPLAY_SPI_HZ))
        .with_mode(Mode::_0);
    let display_spi = match Spi::new(peripherals.SPI2, display_spi_config) {
        Ok(spi) => spi
            .with_sck(peripherals.GPIO36)
            .with_mosi(peripherals.GPIO35),
        Err(err) => {
            warn!("display: spi config failed err={:?}", err);
            halt("display spi").await
        }
    };
    let display_device = match ExclusiveDevice::new(display_spi, tft_cs, NoDelay) {
        Ok(device) => device,
        Err(err) => {
            warn!("display: chip select failed err={:?}", err);
            halt("display cs").await
        }
    };

    let mut display_buf = [0u8; 512];
    let display_interface = SpiInterface::new(display_device, tft_dc, &mut display_buf);
    let mut delay = Delay::new();
    let tft = match DisplayBuilder::new(ST7789, display_interface)
        .display_size(HEIGHT as u16, WIDTH as u16)
        .display_offset(TFT_OFFSET_X, TFT_OFFSET_Y)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(tft_rst)
        .init(&mut delay)
    {
        Ok(tft) => tft,
        Err(err) => {
            warn!("display: init failed err={:?}", err);
            halt("display init").await
        }
    };
    info!("display: st7789 ready {}x{}", WIDTH, HEIGHT);

    // LED matrix data on GPIO6, driven as SPI MOSI.
    let matrix_spi_config = SpiConfig::default()
        .with_frequency(Rate::from_khz(MATRIX_SPI_KHZ))
        .with_mode(Mode::_0);
    let matrix_spi = match Spi::new(peripherals.SPI3, matrix_spi_config) {
        Ok(spi) => spi.with_mosi(peripherals.GPIO6),
        Err(err) => {
            warn!("matrix: spi config failed err={:?}", err);
            halt("matrix spi").await
        }
    };
    let matrix = LedMatrix::new(Ws2812::new(matrix_spi), ChainLayout::Progressive);
    let renderer = BoardRenderer::new(StatusDisplay::new(tft), matrix);

    // Buttons: D0=GPIO0 (pull-up, active low), D1=GPIO1 and D2=GPIO2 (pull-down, active high).
    let button_a = Input::new(peripherals.GPIO0, InputConfig::default().with_pull(Pull::Up));
    let button_b = Input::new(peripherals.GPIO1, InputConfig::default().with_pull(Pull::Down));
    let button_c = Input::new(peripherals.GPIO2, InputConfig::default().with_pull(Pull::Down));
    let input = ButtonTrio::new(
        button_a,
        button_b,
        button_c,
        ButtonConfig::default()
            .with_active_low(ButtonId::B, false)
            .with_active_low(ButtonId::C, false),
    );

    let kv = BoardKvStore::open(SETTINGS_NAMESPACE);
    info!(
        "settings: namespace={} persistent={}",
        SETTINGS_NAMESPACE,
        kv.is_persistent()
    );

    let radio = match esp_radio::init() {
        Ok(radio) => radio,
        Err(err) => {
            warn!("wifi: esp-radio init failed err={:?}", err);
            halt("radio init").await
        }
    };
    let (wifi_controller, interfaces) =
        match esp_radio::wifi::new(&radio, peripherals.WIFI, esp_radio::wifi::Config::default()) {
            Ok(parts) => parts,
            Err(err) => {
                warn!("wifi: peripheral init failed err={:?}", err);
                halt("wifi init").await
            }
        };

    let stack_config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, mut net_runner) = embassy_net::new(
        interfaces.sta,
        stack_config,
        NET_RESOURCES.init(embassy_net::StackResources::<4>::new()),
        0x3C17_9A02_55D1_E84B,
    );

    let mut app = ClockApp::new(
        input,
        StationRadio::new(wifi_controller, stack),
        SntpClient::new(stack, NTP_SERVER),
        kv,
        renderer,
        ClockConfig::default(),
        VERSION,
    );

    info!(
        "{} started: version={} ntp_server={} poll_ms={}",
        APP_TITLE, VERSION, NTP_SERVER, POLL_PERIOD_MS
    );
    info!("Button pins: A=GPIO0 B=GPIO1 C=GPIO2, matrix data=GPIO6");

    let clock = BootClock::new();
    let net_future = net_runner.run();
    let app_future = async {
        loop {
            app.tick(clock.now_ms()).await;
            Timer::after_millis(POLL_PERIOD_MS).await;
        }
    };

    let _ = embassy_futures::join::join(net_future, app_future).await;
    unreachable!()
}
