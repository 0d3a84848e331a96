use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GPIO_PIN: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// Print "LED ON" / "LED OFF" under the clock
    #[default]
    Console,
    /// Drive a Raspberry Pi GPIO pin
    Gpio,
    /// No LED output
    Off,
}

/// Something that can display the LED state once per tick.
pub trait Indicator {
    fn show(&mut self, on: bool, out: &mut dyn Write) -> Result<()>;
}

pub struct ConsoleIndicator;

impl Indicator for ConsoleIndicator {
    fn show(&mut self, on: bool, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", if on { "LED ON" } else { "LED OFF" })?;
        Ok(())
    }
}

pub struct NullIndicator;

impl Indicator for NullIndicator {
    fn show(&mut self, _on: bool, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

#[cfg(target_os = "linux")]
pub use gpio::GpioIndicator;

#[cfg(target_os = "linux")]
mod gpio {
    use std::io::Write;

    use anyhow::{Context, Result};
    use rppal::gpio::{Gpio, OutputPin};

    use super::Indicator;

    /// An LED wired to a BCM-numbered output pin. The pin starts low and is
    /// reset when dropped.
    pub struct GpioIndicator {
        pin: OutputPin,
    }

    impl GpioIndicator {
        pub fn open(bcm_pin: u8) -> Result<Self> {
            let gpio = Gpio::new().context("failed to open GPIO peripheral")?;
            let pin = gpio
                .get(bcm_pin)
                .with_context(|| format!("failed to acquire GPIO pin {bcm_pin}"))?
                .into_output_low();
            log::info!("driving LED on GPIO pin {bcm_pin}");
            Ok(Self { pin })
        }
    }

    impl Indicator for GpioIndicator {
        fn show(&mut self, on: bool, _out: &mut dyn Write) -> Result<()> {
            if on {
                self.pin.set_high();
            } else {
                self.pin.set_low();
            }
            log::debug!("GPIO pin {} -> {}", self.pin.pin(), if on { "high" } else { "low" });
            Ok(())
        }
    }
}

/// Pick the indicator for `kind`. An unavailable GPIO falls back to the console.
pub fn open(kind: IndicatorKind, bcm_pin: u8) -> Box<dyn Indicator> {
    match kind {
        IndicatorKind::Console => Box::new(ConsoleIndicator),
        IndicatorKind::Off => Box::new(NullIndicator),
        IndicatorKind::Gpio => open_gpio(bcm_pin),
    }
}

#[cfg(target_os = "linux")]
fn open_gpio(bcm_pin: u8) -> Box<dyn Indicator> {
    match GpioIndicator::open(bcm_pin) {
        Ok(led) => Box::new(led),
        Err(e) => {
            log::warn!("{e:#}; falling back to console LED");
            Box::new(ConsoleIndicator)
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn open_gpio(bcm_pin: u8) -> Box<dyn Indicator> {
    log::warn!("GPIO pin {bcm_pin} requested but GPIO is only supported on Linux; falling back to console LED");
    Box::new(ConsoleIndicator)
}

/// Owns the LED on/off state and flips it once per tick. Starts off.
pub struct Blinker {
    on: bool,
    indicator: Box<dyn Indicator>,
}

impl Blinker {
    pub fn new(indicator: Box<dyn Indicator>) -> Self {
        Self {
            on: false,
            indicator,
        }
    }

    /// Show the current state, then flip it. Returns the state that was shown.
    pub fn tick(&mut self, out: &mut dyn Write) -> Result<bool> {
        let shown = self.on;
        self.indicator.show(shown, out)?;
        self.on = !shown;
        Ok(shown)
    }
}
