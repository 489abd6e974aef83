//! Top-level NES machine.
//!
//! Glue between the CPU and the bus, driven one frame at a time: a CPU
//! slice bounded by the mode's cycles-per-frame budget, then a PPU frame,
//! then NMI delivery for the next slice.

use b1_6502::{Cpu6502, CpuState};
use b1_core::{Observable, Value};

use crate::backend::RenderingBackend;
use crate::bus::NesBus;
use crate::cartridge::Cartridge;
use crate::config::{NesConfig, OutputMode};
use crate::error::Result;

/// The NES.
pub struct Nes {
    cpu: Cpu6502,
    bus: NesBus,
    /// Completed frame counter.
    frame_count: u64,
}

impl Nes {
    /// Create a machine from a configuration.
    ///
    /// # Errors
    ///
    /// Propagates iNES parse errors.
    pub fn new(config: &NesConfig) -> Result<Self> {
        let cartridge = Cartridge::from_ines(&config.rom_data)?;
        Ok(Self::with_cartridge(cartridge, config.mode))
    }

    /// Create a machine from a pre-built cartridge.
    #[must_use]
    pub fn with_cartridge(cartridge: Cartridge, mode: OutputMode) -> Self {
        let mut bus = NesBus::with_cartridge(cartridge, mode);
        let mut cpu = Cpu6502::new();
        cpu.reset(&mut bus);
        Self {
            cpu,
            bus,
            frame_count: 0,
        }
    }

    /// Reset the CPU through the cartridge's reset vector.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
    }

    /// Replace the cartridge and reset.
    ///
    /// # Errors
    ///
    /// Propagates iNES parse errors; the running cartridge stays bound on
    /// failure.
    pub fn load_rom(&mut self, data: &[u8]) -> Result<()> {
        let cartridge = Cartridge::from_ines(data)?;
        self.bus.inject_cartridge(cartridge);
        self.reset();
        Ok(())
    }

    /// Run one frame: a CPU slice within the frame's cycle budget, then
    /// the PPU frame, then NMI delivery toward the next slice.
    ///
    /// Returns CPU cycles spent, at most the mode's cycles-per-frame.
    pub fn run_frame(&mut self, backend: &mut dyn RenderingBackend) -> u32 {
        let budget = self.bus.mode().cycles_per_frame();
        let spent = self.cpu.run(&mut self.bus, budget);

        self.bus.render_frame(backend);
        if self.bus.take_nmi() {
            self.cpu.nmi();
        }

        self.frame_count += 1;
        spent
    }

    /// Whether the CPU is still executing (not halted or errored).
    #[must_use]
    pub fn running(&self) -> bool {
        self.cpu.state() == CpuState::Run
    }

    /// Reference to the CPU.
    #[must_use]
    pub fn cpu(&self) -> &Cpu6502 {
        &self.cpu
    }

    /// Mutable reference to the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu6502 {
        &mut self.cpu
    }

    /// Reference to the bus.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable reference to the bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            match rest {
                "active_page" => Some(self.bus.ppu.active_page().into()),
                "bg_pattern_base" => Some(self.bus.ppu.bg_pattern_base().into()),
                "sprite_pattern_base" => Some(self.bus.ppu.sprite_pattern_base().into()),
                "scroll_h" => Some(self.bus.ppu.scroll().0.into()),
                "scroll_v" => Some(self.bus.ppu.scroll().1.into()),
                "bg_visible" => Some(self.bus.ppu.background_visible().into()),
                "sprites_visible" => Some(self.bus.ppu.sprites_visible().into()),
                "full_bg_visible" => Some(self.bus.ppu.full_background_visible().into()),
                "all_sprites_visible" => Some(self.bus.ppu.all_sprites_visible().into()),
                "big_sprites" => Some(self.bus.ppu.big_sprites().into()),
                "nmi_enabled" => Some(self.bus.ppu.nmi_enabled().into()),
                "vblank" => Some(self.bus.ppu.vblank().into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let addr = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"))
            {
                u16::from_str_radix(hex, 16).ok()
            } else if let Some(hex) = rest.strip_prefix('$') {
                u16::from_str_radix(hex, 16).ok()
            } else {
                rest.parse().ok()
            };
            addr.map(|a| Value::U8(self.bus.peek_ram(a)))
        } else if path == "frame_count" {
            Some(self.frame_count.into())
        } else {
            None
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.a",
            "cpu.x",
            "cpu.y",
            "cpu.s",
            "cpu.pc",
            "cpu.p",
            "cpu.state",
            "cpu.nmi_count",
            "cpu.rti_count",
            "ppu.active_page",
            "ppu.bg_pattern_base",
            "ppu.sprite_pattern_base",
            "ppu.scroll_h",
            "ppu.scroll_v",
            "ppu.bg_visible",
            "ppu.sprites_visible",
            "ppu.full_bg_visible",
            "ppu.all_sprites_visible",
            "ppu.big_sprites",
            "ppu.nmi_enabled",
            "ppu.vblank",
            "memory.<address>",
            "frame_count",
        ]
    }
}
