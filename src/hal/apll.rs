//! Audio PLL
//!
//! Powers the ESP32 APLL up and down and programs its sigma-delta
//! dividers through the ROM analog-I2C routines. The APLL is then
//! selected as the I2S0 master clock, which is what the GPIO matrix
//! forwards to the RF pin.

#![allow(unsafe_code)]

use core::ptr;

use crate::config::APLL_CAL_TIMEOUT_POLLS;
use crate::synth::DividerParameters;

/// RTC_CNTL_OPTIONS0_REG
const RTC_CNTL_OPTIONS0: usize = 0x3FF4_8000;
/// RTC_CNTL_ANA_CONF_REG
const RTC_CNTL_ANA_CONF: usize = 0x3FF4_8030;
/// I2S_CLKM_CONF_REG for I2S0
const I2S0_CLKM_CONF: usize = 0x3FF4_F0AC;
/// DPORT_PERIP_CLK_EN_REG
const DPORT_PERIP_CLK_EN: usize = 0x3FF0_00C0;
/// DPORT_PERIP_RST_EN_REG
const DPORT_PERIP_RST_EN: usize = 0x3FF0_00C4;

const BIAS_I2C_FORCE_PD: u32 = 1 << 18;
const PLLA_FORCE_PD: u32 = 1 << 23;
const PLLA_FORCE_PU: u32 = 1 << 24;
const I2S0_CLK_EN: u32 = 1 << 4;

/// clkm_div_num = 1, div_a = 1, div_b = 0, APLL as source
const I2S0_CLKM_APLL: u32 = 1 | (1 << 14) | (1 << 21);

/// Analog-I2C addresses of the APLL block
mod regi2c {
    pub const BLOCK: u8 = 0x6D;
    pub const HOST_ID: u8 = 1;

    pub const IR_CAL_DELAY: u8 = 0;
    pub const OR_CAL_END: u8 = 3;
    pub const OR_OUTPUT_DIV: u8 = 4;
    pub const SDM_STOP: u8 = 5;
    pub const DSDM2: u8 = 7;
    pub const DSDM1: u8 = 8;
    pub const DSDM0: u8 = 9;

    pub const SDM_STOP_VAL_1: u8 = 0x09;
    pub const SDM_STOP_VAL_2_REV1: u8 = 0x49;
    pub const CAL_DELAY: [u8; 3] = [0x0F, 0x3F, 0x1F];
}

extern "C" {
    fn rom_i2c_writeReg(block: u8, host_id: u8, reg_add: u8, data: u8);
    fn rom_i2c_writeReg_Mask(block: u8, host_id: u8, reg_add: u8, msb: u8, lsb: u8, data: u8);
    fn rom_i2c_readReg_Mask(block: u8, host_id: u8, reg_add: u8, msb: u8, lsb: u8) -> u8;
}

fn modify(addr: usize, set: u32, clear: u32) {
    // SAFETY: fixed, word-aligned peripheral register addresses on the ESP32
    unsafe {
        let reg = addr as *mut u32;
        let value = ptr::read_volatile(reg);
        ptr::write_volatile(reg, (value & !clear) | set);
    }
}

fn write(addr: usize, value: u32) {
    // SAFETY: as above
    unsafe { ptr::write_volatile(addr as *mut u32, value) }
}

fn write_reg(reg: u8, data: u8) {
    // SAFETY: ROM routine; arguments address the APLL block only
    unsafe { rom_i2c_writeReg(regi2c::BLOCK, regi2c::HOST_ID, reg, data) }
}

fn write_reg_mask(reg: u8, msb: u8, lsb: u8, data: u8) {
    // SAFETY: as above
    unsafe { rom_i2c_writeReg_Mask(regi2c::BLOCK, regi2c::HOST_ID, reg, msb, lsb, data) }
}

fn read_reg_mask(reg: u8, msb: u8, lsb: u8) -> u8 {
    // SAFETY: as above
    unsafe { rom_i2c_readReg_Mask(regi2c::BLOCK, regi2c::HOST_ID, reg, msb, lsb) }
}

/// Handle to the audio PLL
///
/// Only one may exist; the firmware creates it once at boot.
pub struct Apll {
    _private: (),
}

impl Apll {
    /// Take the APLL and select it as the I2S0 clock source
    ///
    /// The PLL itself stays powered down until [`Apll::enable`].
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        modify(DPORT_PERIP_CLK_EN, I2S0_CLK_EN, 0);
        modify(DPORT_PERIP_RST_EN, 0, I2S0_CLK_EN);
        write(I2S0_CLKM_CONF, I2S0_CLKM_APLL);

        let mut apll = Self { _private: () };
        apll.power_down();
        apll
    }

    /// Power up and program the dividers
    ///
    /// Returns `false` if calibration did not report completion in time;
    /// the output usually still runs, just unverified.
    pub fn enable(&mut self, params: &DividerParameters) -> bool {
        modify(RTC_CNTL_ANA_CONF, PLLA_FORCE_PU, PLLA_FORCE_PD);
        modify(RTC_CNTL_OPTIONS0, 0, BIAS_I2C_FORCE_PD);

        write_reg_mask(regi2c::DSDM2, 5, 0, params.integer_part);
        write_reg_mask(regi2c::DSDM0, 7, 0, params.frac_low_register());
        write_reg_mask(regi2c::DSDM1, 7, 0, params.frac_high);
        write_reg(regi2c::SDM_STOP, regi2c::SDM_STOP_VAL_1);
        write_reg(regi2c::SDM_STOP, regi2c::SDM_STOP_VAL_2_REV1);
        write_reg_mask(regi2c::OR_OUTPUT_DIV, 4, 0, params.output_divider);

        for delay in regi2c::CAL_DELAY {
            write_reg(regi2c::IR_CAL_DELAY, delay);
        }
        self.wait_calibrated()
    }

    fn wait_calibrated(&self) -> bool {
        for _ in 0..APLL_CAL_TIMEOUT_POLLS {
            if read_reg_mask(regi2c::OR_CAL_END, 7, 7) != 0 {
                return true;
            }
        }
        // Timeout, but continue anyway
        false
    }

    /// Stop the PLL
    pub fn power_down(&mut self) {
        modify(RTC_CNTL_ANA_CONF, PLLA_FORCE_PD, PLLA_FORCE_PU);
    }
}
