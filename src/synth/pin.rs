//! RF Pin Routing
//!
//! The carrier leaves the chip through the GPIO matrix: the I2S0 clock
//! output signal is selected for the RF pin while transmitting, and the
//! pin's output driver is switched off otherwise.
//!
//! Other code can rewrite the matrix behind this driver's back, so every
//! request writes the registers again. The tracked [`PinState`] is for
//! reporting only and never suppresses a write.

/// GPIO_ENABLE_W1TS_REG
pub const GPIO_ENABLE_W1TS: usize = 0x3FF4_4024;
/// GPIO_ENABLE_W1TC_REG
pub const GPIO_ENABLE_W1TC: usize = 0x3FF4_4028;
/// GPIO_FUNC0_OUT_SEL_CFG_REG
pub const GPIO_FUNC_OUT_SEL_BASE: usize = 0x3FF4_4530;

/// Matrix signal index of I2S0 master clock output
pub const SIG_I2S0_CLK_OUT: u32 = 224;
/// Matrix value meaning "plain GPIO output"
pub const SIG_GPIO_OUT: u32 = 256;

/// Write access to 32-bit peripheral registers
pub trait RegisterBus {
    /// Write `value` to the register at `addr`
    fn write(&mut self, addr: usize, value: u32);
}

/// Pin state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PinState {
    /// Output driver off
    #[default]
    Floating,
    /// Carrying the APLL clock
    Clock,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PinState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Floating => defmt::write!(f, "FLOAT"),
            Self::Clock => defmt::write!(f, "CLOCK"),
        }
    }
}

/// GPIO matrix routing for one pin
pub struct ClockPin<B> {
    bus: B,
    number: u8,
    state: PinState,
}

impl<B: RegisterBus> ClockPin<B> {
    /// Take pin `number` and float it
    pub fn new(bus: B, number: u8) -> Self {
        let mut pin = Self {
            bus,
            number,
            state: PinState::Floating,
        };
        pin.float();
        pin
    }

    /// FUNCn_OUT_SEL_CFG for this pin
    #[must_use]
    pub fn out_sel_addr(&self) -> usize {
        GPIO_FUNC_OUT_SEL_BASE + 4 * usize::from(self.number)
    }

    fn enable_mask(&self) -> u32 {
        // GPIO32 and up live in the ENABLE1 bank, which the RF pin never uses
        1u32.checked_shl(u32::from(self.number)).unwrap_or(0)
    }

    /// Select the I2S0 clock for the pin and enable its driver
    pub fn route_clock(&mut self) {
        let out_sel = self.out_sel_addr();
        self.bus.write(out_sel, SIG_I2S0_CLK_OUT);
        self.bus.write(GPIO_ENABLE_W1TS, self.enable_mask());
        self.state = PinState::Clock;
    }

    /// Disable the driver and release the matrix selection
    pub fn float(&mut self) {
        let out_sel = self.out_sel_addr();
        self.bus.write(GPIO_ENABLE_W1TC, self.enable_mask());
        self.bus.write(out_sel, SIG_GPIO_OUT);
        self.state = PinState::Floating;
    }

    /// Last requested state
    #[must_use]
    pub const fn state(&self) -> PinState {
        self.state
    }

    /// GPIO number
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// Borrow the register bus
    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the register bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}
