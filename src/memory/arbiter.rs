//! Ownership of the sound CPU's bus.
//!
//! The main CPU halts the sound CPU through the bus request register
//! (0xA11100) and holds it in reset through 0xA11200. The two are
//! independent: a halted core keeps its state, a reset one loses it when
//! reset is released. The sound CPU's view of main memory goes through a
//! 32KB window whose base is shifted in one bit at a time.

use crate::config::{Error, Result};
use crate::debugger::Debuggable;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCpuState {
    Running,
    /// Bus granted to the main CPU.
    Halted,
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusArbiter {
    halted: bool,
    reset_asserted: bool,
    /// Set when reset is released, cleared by the scheduler after it has
    /// reset the sound core.
    reset_released: bool,

    bank_shift: u16,
    bank_bits: u8,
    bank_base: u32,

    halted_cycles: u64,
    pub log_refused: bool,
}

impl Default for BusArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl BusArbiter {
    pub fn new() -> Self {
        Self {
            halted: false,
            reset_asserted: true, // sound CPU starts in reset
            reset_released: false,
            bank_shift: 0,
            bank_bits: 0,
            bank_base: 0,
            halted_cycles: 0,
            log_refused: true,
        }
    }

    pub fn state(&self) -> SoundCpuState {
        if self.reset_asserted {
            SoundCpuState::Reset
        } else if self.halted {
            SoundCpuState::Halted
        } else {
            SoundCpuState::Running
        }
    }

    pub fn request_bus(&mut self) {
        if !self.halted {
            log::trace!("Sound CPU bus requested");
            self.halted = true;
        }
    }

    pub fn release_bus(&mut self) {
        if self.halted {
            log::trace!("Sound CPU bus released");
            self.halted = false;
        }
    }

    pub fn assert_reset(&mut self) {
        self.reset_asserted = true;
        self.bank_shift = 0;
        self.bank_bits = 0;
    }

    pub fn release_reset(&mut self) {
        if self.reset_asserted {
            self.reset_asserted = false;
            self.reset_released = true;
        }
    }

    /// Bit 0 of a write to 0xA11100: 1 requests the bus, 0 releases it.
    pub fn write_bus_request(&mut self, value: u8) {
        if value & 0x01 != 0 {
            self.request_bus();
        } else {
            self.release_bus();
        }
    }

    /// Bit 0 of a write to 0xA11200: 0 holds the sound CPU in reset.
    pub fn write_reset(&mut self, value: u8) {
        if value & 0x01 == 0 {
            self.assert_reset();
        } else {
            self.release_reset();
        }
    }

    /// 0 once the bus has been handed over, 1 while the sound CPU owns it.
    pub fn bus_request_status(&self) -> u8 {
        if self.halted && !self.reset_asserted {
            0x00
        } else {
            0x01
        }
    }

    pub fn reset_status(&self) -> u8 {
        if self.reset_asserted {
            0x00
        } else {
            0x01
        }
    }

    /// The main CPU may touch sound RAM.
    pub fn main_cpu_has_bus(&self) -> bool {
        self.halted
    }

    pub fn sound_cpu_running(&self) -> bool {
        self.state() == SoundCpuState::Running
    }

    /// Consume the pending reset release, if any.
    pub fn take_reset_release(&mut self) -> bool {
        std::mem::take(&mut self.reset_released)
    }

    /// Shift one bit (LSB first) into the bank register.
    ///
    /// The ninth bit completes the value, which becomes A23-A15 of the window.
    pub fn write_bank_bit(&mut self, value: u8) {
        self.bank_shift |= u16::from(value & 0x01) << self.bank_bits;
        self.bank_bits += 1;
        if self.bank_bits == 9 {
            self.bank_base = u32::from(self.bank_shift) << 15;
            log::debug!("Sound CPU bank window at {:#08x}", self.bank_base);
            self.bank_shift = 0;
            self.bank_bits = 0;
        }
    }

    pub fn bank_base(&self) -> u32 {
        self.bank_base
    }

    /// Main-bus address for a sound CPU access in 0x8000-0xFFFF.
    pub fn window_address(&self, addr: u16) -> u32 {
        self.bank_base | u32::from(addr & 0x7FFF)
    }

    /// Account for a slice of sound CPU time in which it could not run.
    pub fn record_halt(&mut self, cycles: u64) {
        if self.state() == SoundCpuState::Halted {
            self.halted_cycles += cycles;
        }
    }

    /// Sound CPU cycles spent halted by a bus request.
    pub fn halted_cycles(&self) -> u64 {
        self.halted_cycles
    }
}

impl Debuggable for BusArbiter {
    fn read_state(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn write_state(&mut self, state: &Value) -> Result<()> {
        let arbiter: BusArbiter = serde_json::from_value(state.clone())?;
        if arbiter.bank_bits >= 9 || arbiter.bank_shift >= 1 << arbiter.bank_bits {
            return Err(Error::InvalidState(format!(
                "bank register holds {} bits ({:#x})",
                arbiter.bank_bits, arbiter.bank_shift
            )));
        }
        *self = arbiter;
        Ok(())
    }
}
