//! WSPR / CW Beacon Main Application
//!
//! Entry point for the ESP32 beacon firmware.
//! Initializes hardware and spawns the beacon and console tasks.

#![no_std]
#![no_main]

esp_bootloader_esp_idf::esp_app_desc!();

use core::cell::Cell;

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Ticker;
use esp_backtrace as _;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart, UartRx, UartTx};
use esp_hal::Async;
use esp_println as _;
use static_cell::StaticCell;

use wspr_beacon::clock::{SyncedClock, TimeSource};
use wspr_beacon::config::{
    pins, CALLSIGN, CONSOLE_BAUD, CONSOLE_BUFFER_SIZE, GRID_LOCATOR, POLL_INTERVAL_MS,
    STATUS_INTERVAL, TX_POWER_DBM,
};
use wspr_beacon::encoding::wspr;
use wspr_beacon::hal::{Apll, Esp32Oscillator, RfPin};
use wspr_beacon::protocol::{Command, CommandParser, Response};
use wspr_beacon::radio::BeaconState;
use wspr_beacon::status::{StatusSink, StatusSnapshot, StatusTicker};
use wspr_beacon::synth::{FrequencySynthesizer, OscillatorDriver};
use wspr_beacon::types::Instant;

type Synthesizer = FrequencySynthesizer<Esp32Oscillator<'static>>;

/// Static executor for embassy
static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

/// UTC epoch seconds received from the console
static TIME_SIGNAL: Signal<CriticalSectionRawMutex, u64> = Signal::new();

/// Latest beacon status, read by the console
static LATEST_STATUS: Mutex<CriticalSectionRawMutex, Cell<StatusSnapshot>> =
    Mutex::new(Cell::new(StatusSnapshot {
        mode: wspr_beacon::types::Mode::Idle,
        time: None,
        progress: None,
    }));

/// Monotonic time in the library's representation
fn now() -> Instant {
    Instant::from_micros(embassy_time::Instant::now().as_micros())
}

/// Status sink writing to the defmt log
struct LogSink;

impl StatusSink for LogSink {
    fn publish(&mut self, snapshot: &StatusSnapshot) {
        info!("{}", snapshot);
    }
}

#[esp_hal::main]
fn main() -> ! {
    info!("WSPR beacon firmware v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Initialise the RTOS scheduler with timer - before any async operations
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let symbols = match wspr::encode(CALLSIGN, GRID_LOCATOR, TX_POWER_DBM) {
        Ok(symbols) => symbols,
        Err(e) => defmt::panic!("cannot encode {=str} {=str}: {}", CALLSIGN, GRID_LOCATOR, e),
    };
    info!("Encoded WSPR frame for {=str} {=str} {}dBm", CALLSIGN, GRID_LOCATOR, TX_POWER_DBM);

    let rf = Output::new(peripherals.GPIO27, Level::Low, OutputConfig::default());
    let oscillator = Esp32Oscillator::new(Apll::new(), RfPin::new(rf, pins::RF_OUT));
    let mut synth = FrequencySynthesizer::new(oscillator);
    // Carrier off until the first slot
    synth.disable();

    let uart = Uart::new(
        peripherals.UART2,
        UartConfig::default().with_baudrate(CONSOLE_BAUD),
    )
    .map(|uart| {
        uart.with_rx(peripherals.GPIO16)
            .with_tx(peripherals.GPIO17)
            .into_async()
            .split()
    });

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(beacon_task(BeaconState::new(symbols), synth));
        match uart {
            Ok((rx, tx)) => spawner.must_spawn(console_task(rx, tx)),
            Err(_) => warn!("Console UART unavailable"),
        }
    })
}

/// Control loop: advances the transmission state machines every poll
#[embassy_executor::task]
async fn beacon_task(mut beacon: BeaconState, mut synth: Synthesizer) {
    let mut clock = SyncedClock::new();
    let mut ticker = StatusTicker::new(STATUS_INTERVAL);
    let mut sink = LogSink;
    let mut poll = Ticker::every(embassy_time::Duration::from_millis(POLL_INTERVAL_MS));

    info!("Beacon running, carrier {}", beacon.carrier());

    loop {
        let now = now();
        if let Some(epoch) = TIME_SIGNAL.try_take() {
            clock.sync(epoch, now);
            info!("UTC set to {}", epoch);
        }

        let utc = clock.utc_at(now);
        if let Some(event) = beacon.tick(now, utc, &mut synth) {
            info!("{}", event);
        }

        let snapshot = beacon.snapshot(utc);
        LATEST_STATUS.lock(|s| s.set(snapshot));
        ticker.publish_if_due(now, &snapshot, &mut sink);

        poll.next().await;
    }
}

/// Serial console: time setting and status queries
#[embassy_executor::task]
async fn console_task(mut rx: UartRx<'static, Async>, mut tx: UartTx<'static, Async>) {
    let mut parser = CommandParser::new();
    let mut response = Response::new();
    let mut buf = [0u8; CONSOLE_BUFFER_SIZE];

    loop {
        let n = match embedded_io_async::Read::read(&mut rx, &mut buf).await {
            Ok(n) => n,
            Err(_) => {
                warn!("Console read error");
                parser.clear();
                continue;
            }
        };

        for &byte in &buf[..n] {
            let Some(cmd) = parser.feed(byte) else {
                continue;
            };
            if let Command::SetTime(epoch) = cmd {
                TIME_SIGNAL.signal(epoch);
            }

            let snapshot = LATEST_STATUS.lock(Cell::get);
            response.reply(cmd, &snapshot);
            if embedded_io_async::Write::write_all(&mut tx, response.as_bytes())
                .await
                .is_err()
            {
                warn!("Console write failed");
            }
        }
    }
}
