//! Two-CPU scheduler.
//!
//! The main CPU and the sound CPU run in strict alternation by elapsed
//! master clock. The VDP advances one scanline at a time between their
//! slices, and all state lives in the single owned [`Bus`].

use crate::config::Config;
use crate::memory::{Bus, MemoryInterface, SoundCpuState, Z80Bus};
use crate::vdp::{InterruptSink, VideoSink};

pub const MASTER_CLOCKS_PER_LINE: u64 = 3420;
pub const MAIN_CPU_DIVIDER: u64 = 7;
pub const SOUND_CPU_DIVIDER: u64 = 15;

/// An instruction-stepped CPU.
pub trait CpuCore {
    /// Execute one instruction and return the cycles it took.
    fn step(&mut self, bus: &mut dyn MemoryInterface) -> u32;
    fn reset(&mut self);
    /// Raise an interrupt. The sound CPU ignores `level`.
    fn interrupt(&mut self, level: u8);
}

/// Interrupts raised by the VDP during one scanline.
#[derive(Debug, Default, Clone, Copy)]
struct PendingInterrupts {
    main_level: u8,
    sound: bool,
}

impl InterruptSink for PendingInterrupts {
    fn line_interrupt(&mut self) {
        self.main_level = self.main_level.max(4);
    }

    fn frame_interrupt(&mut self) {
        self.main_level = 6;
    }

    fn sound_interrupt(&mut self) {
        self.sound = true;
    }
}

pub struct System<M: CpuCore, S: CpuCore> {
    pub bus: Bus,
    pub main_cpu: M,
    pub sound_cpu: S,
    main_clock: u64,
    sound_clock: u64,
    line_start: u64,
}

impl<M: CpuCore, S: CpuCore> System<M, S> {
    pub fn new(config: &Config, main_cpu: M, sound_cpu: S) -> Self {
        Self {
            bus: Bus::with_config(config),
            main_cpu,
            sound_cpu,
            main_clock: 0,
            sound_clock: 0,
            line_start: 0,
        }
    }

    pub fn reset(&mut self) {
        self.main_cpu.reset();
        self.sound_cpu.reset();
        self.bus.vdp.reset();
    }

    /// Master clocks elapsed since power-on.
    pub fn master_clock(&self) -> u64 {
        self.line_start
    }

    /// Run both CPUs for one scanline, then let the VDP finish the line.
    pub fn run_scanline(&mut self, video: &mut dyn VideoSink) {
        let line_end = self.line_start + MASTER_CLOCKS_PER_LINE;

        while self.main_clock < line_end || self.sound_clock < line_end {
            if self.main_clock <= self.sound_clock && self.main_clock < line_end {
                let pos = (self.main_clock - self.line_start) / MAIN_CPU_DIVIDER;
                self.bus.vdp.set_h_counter(pos as u16);
                let cycles = self.main_cpu.step(&mut self.bus).max(1);
                self.main_clock += u64::from(cycles) * MAIN_CPU_DIVIDER;

                if self.bus.arbiter.take_reset_release() {
                    log::debug!("Sound CPU reset released");
                    self.sound_cpu.reset();
                }
                continue;
            }

            match self.bus.arbiter.state() {
                SoundCpuState::Running => {
                    let cycles = self.sound_cpu.step(&mut Z80Bus::new(&mut self.bus)).max(1);
                    self.sound_clock += u64::from(cycles) * SOUND_CPU_DIVIDER;
                }
                SoundCpuState::Halted | SoundCpuState::Reset => {
                    // Idle until the main CPU catches up
                    let target = self.main_clock.min(line_end);
                    let idle = target - self.sound_clock;
                    self.bus.arbiter.record_halt(idle / SOUND_CPU_DIVIDER);
                    self.sound_clock = target;
                }
            }
        }

        let mut irq = PendingInterrupts::default();
        self.bus.vdp.run_scanline(video, &mut irq);
        if irq.main_level > 0 {
            self.main_cpu.interrupt(irq.main_level);
        }
        if irq.sound && self.bus.arbiter.sound_cpu_running() {
            self.sound_cpu.interrupt(0);
        }

        self.line_start = line_end;
    }

    pub fn run_frame(&mut self, video: &mut dyn VideoSink) {
        loop {
            self.run_scanline(video);
            if self.bus.vdp.timing.line == 0 {
                break;
            }
        }
    }
}
