//! Genteel VDP - Sega Mega Drive/Genesis video and bus core
//!
//! The Video Display Processor (ports, DMA, plane/window/sprite rendering,
//! timing) together with the main memory bus and the arbiter that hands the
//! sound CPU's bus to the main CPU. CPU cores and sound chips plug in from
//! outside through [`system::CpuCore`] and [`memory::SoundSink`].

pub mod config;
pub mod debugger;
pub mod memory;
pub mod system;
pub mod vdp;

pub use config::{Config, Error, Region, Result};
pub use memory::Bus;
pub use system::{CpuCore, System};
pub use vdp::Vdp;
