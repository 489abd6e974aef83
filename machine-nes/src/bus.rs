//! NES bus: CPU address routing.
//!
//! The bus is the owning hub of the machine: it holds CPU RAM, the PPU
//! (which owns the video memories), and the bound cartridge, and decodes
//! every CPU-visible address:
//!
//! - `$0000-$1FFF`: 2 KiB internal RAM, mirrored every `$0800`
//! - `$2000-$3FFF`: PPU registers, mirrored every 8 bytes
//! - `$4000-$401F`: APU / I/O — absent from this core, reads 0
//! - `$4020-$5FFF`: expansion — unused
//! - `$6000-$7FFF`: cartridge RAM (none on NROM)
//! - `$8000-$FFFF`: cartridge ROM through the mapper

use b1_core::Bus;

use crate::backend::RenderingBackend;
use crate::cartridge::Cartridge;
use crate::config::OutputMode;
use crate::memory::MemoryBank;
use crate::ppu::Ppu;

/// Internal RAM size.
const RAM_SIZE: usize = 2048;

/// The NES bus.
pub struct NesBus {
    ram: MemoryBank<RAM_SIZE>,
    /// PPU, owning nametable/palette/OAM memory.
    pub ppu: Ppu,
    cartridge: Option<Cartridge>,
    mode: OutputMode,
    /// NMI latch toward the CPU, raised by the PPU at VBlank.
    nmi_pending: bool,
}

impl NesBus {
    #[must_use]
    pub fn new(mode: OutputMode) -> Self {
        Self {
            ram: MemoryBank::new(),
            ppu: Ppu::new(),
            cartridge: None,
            mode,
            nmi_pending: false,
        }
    }

    #[must_use]
    pub fn with_cartridge(cartridge: Cartridge, mode: OutputMode) -> Self {
        let mut bus = Self::new(mode);
        bus.inject_cartridge(cartridge);
        bus
    }

    /// Bind a cartridge, dropping PPU latches that depended on the old one.
    pub fn inject_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
        self.ppu.clear_latches();
        self.nmi_pending = false;
    }

    /// The bound cartridge, if any.
    #[must_use]
    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Video output mode.
    #[must_use]
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Read the PPU address space (pattern tables, nametables, palette).
    #[must_use]
    pub fn read_video_mem(&self, addr: u16) -> u8 {
        self.ppu.mem_read(addr, self.cartridge.as_ref())
    }

    /// Write the PPU address space.
    pub fn write_video_mem(&mut self, addr: u16, value: u8) {
        let NesBus { ppu, cartridge, .. } = self;
        ppu.mem_write(addr, value, cartridge.as_mut());
    }

    /// Read sprite OAM (index wraps mod 256).
    #[must_use]
    pub fn read_sprite_mem(&self, index: u8) -> u8 {
        self.ppu.sprite_read(index)
    }

    /// Write sprite OAM (index wraps mod 256).
    pub fn write_sprite_mem(&mut self, index: u8, value: u8) {
        self.ppu.sprite_write(index, value);
    }

    /// Render one frame through the PPU and latch NMI if it requested one.
    pub fn render_frame(&mut self, backend: &mut dyn RenderingBackend) {
        let nmi = {
            let mode = self.mode;
            let NesBus { ppu, cartridge, .. } = self;
            ppu.update(cartridge.as_ref(), mode, backend)
        };
        if nmi {
            self.generate_nmi();
        }
    }

    /// Raise the NMI latch toward the CPU.
    pub fn generate_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Take the NMI latch; the caller forwards it to the CPU.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    /// Peek RAM without bus side effects (for observation).
    #[must_use]
    pub fn peek_ram(&self, addr: u16) -> u8 {
        self.ram.read(usize::from(addr) & (RAM_SIZE - 1))
    }
}

impl Bus for NesBus {
    fn read_mem(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(usize::from(addr) & (RAM_SIZE - 1)),
            0x2000..=0x3FFF => {
                let NesBus { ppu, cartridge, .. } = self;
                ppu.read_register(addr & 0x0007, cartridge.as_ref())
            }
            // APU / I/O and expansion: absent from this core.
            0x4000..=0x5FFF => 0,
            // NROM has no cartridge RAM; reads fall through to 0.
            0x6000..=0x7FFF => self
                .cartridge
                .as_ref()
                .and_then(|c| c.read_ram(addr).ok())
                .unwrap_or(0),
            0x8000..=0xFFFF => self
                .cartridge
                .as_ref()
                .and_then(|c| c.read_rom(addr).ok())
                .unwrap_or(0),
        }
    }

    fn write_mem(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram.write(usize::from(addr) & (RAM_SIZE - 1), value),
            0x2000..=0x3FFF => {
                let NesBus { ppu, cartridge, .. } = self;
                ppu.write_register(addr & 0x0007, value, cartridge.as_mut());
            }
            0x4000..=0x5FFF => {}
            0x6000..=0x7FFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    // Dropped on NROM.
                    let _ = cart.write_ram(addr, value);
                }
            }
            0x8000..=0xFFFF => {
                if let Some(cart) = self.cartridge.as_mut() {
                    cart.write_rom(addr, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::reg;

    fn make_ines(prg_banks: u8, chr_banks: u8, flags6: u8) -> Vec<u8> {
        let prg_size = usize::from(prg_banks) * 16384;
        let chr_size = usize::from(chr_banks) * 8192;
        let mut data = vec![0u8; 16 + prg_size + chr_size];
        data[0..4].copy_from_slice(b"NES\x1a");
        data[4] = prg_banks;
        data[5] = chr_banks;
        data[6] = flags6;
        for i in 0..prg_size {
            data[16 + i] = (i & 0xFF) as u8;
        }
        data
    }

    fn make_bus() -> NesBus {
        let cart = Cartridge::from_ines(&make_ines(2, 1, 0x00)).expect("parse failed");
        NesBus::with_cartridge(cart, OutputMode::Ntsc)
    }

    #[test]
    fn ram_mirrors_every_2k() {
        let mut bus = make_bus();
        bus.write_mem(0x0000, 0xAB);
        for k in 0..4u16 {
            assert_eq!(bus.read_mem(k * 0x0800), 0xAB);
        }
        bus.write_mem(0x1FFF, 0xCD);
        assert_eq!(bus.read_mem(0x07FF), 0xCD);
    }

    #[test]
    fn ppu_registers_mirror_every_8() {
        let mut bus = make_bus();
        // Build a VRAM address through a mirrored VIDMEM_ADDR register.
        bus.write_mem(0x2000 + reg::VIDMEM_ADDR, 0x21);
        bus.write_mem(0x2000 + 8 * 100 + reg::VIDMEM_ADDR, 0x08);
        assert_eq!(bus.ppu.video_addr(), 0x2108);

        // STATE mirrors identically for reads.
        let a = bus.read_mem(0x2002);
        let b = bus.read_mem(0x2002 + 8 * 511);
        assert_eq!(a, b);
    }

    #[test]
    fn rom_reads_reach_the_mapper() {
        let mut bus = make_bus();
        assert_eq!(bus.read_mem(0x8001), 0x01);
        // Second bank behind $C000.
        assert_eq!(bus.read_mem(0xC001), 0x01);
    }

    #[test]
    fn apu_region_reads_zero_and_ignores_writes() {
        let mut bus = make_bus();
        bus.write_mem(0x4000, 0xFF);
        bus.write_mem(0x4017, 0xFF);
        assert_eq!(bus.read_mem(0x4000), 0);
        assert_eq!(bus.read_mem(0x401F), 0);
    }

    #[test]
    fn nrom_cart_ram_reads_zero() {
        let mut bus = make_bus();
        bus.write_mem(0x6000, 0x55);
        assert_eq!(bus.read_mem(0x6000), 0);
    }

    #[test]
    fn palette_alias_through_video_mem() {
        let mut bus = make_bus();
        bus.write_video_mem(0x3F10, 0x3F);
        assert_eq!(bus.read_video_mem(0x3F00), 0x3F);
    }

    #[test]
    fn sprite_mem_wraps() {
        let mut bus = make_bus();
        bus.write_sprite_mem(0xFF, 0x77);
        assert_eq!(bus.read_sprite_mem(0xFF), 0x77);
    }

    #[test]
    fn nmi_latch_round_trip() {
        let mut bus = make_bus();
        assert!(!bus.take_nmi());
        bus.generate_nmi();
        assert!(bus.take_nmi());
        assert!(!bus.take_nmi());
    }

    #[test]
    fn render_frame_latches_nmi_when_enabled() {
        let mut bus = make_bus();
        let mut backend = crate::backend::NullBackend;
        bus.render_frame(&mut backend);
        assert!(!bus.take_nmi());

        bus.write_mem(0x2000 + reg::CONTROL1, 0x80);
        bus.render_frame(&mut backend);
        assert!(bus.take_nmi());
    }
}
