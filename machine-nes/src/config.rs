//! NES machine configuration.

/// Video output mode — determines frame timing and edge-row blanking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// NTSC: 60 Hz, ~29,780 CPU cycles per frame.
    #[default]
    Ntsc,
    /// PAL: 50 Hz, ~33,247 CPU cycles per frame.
    Pal,
}

impl OutputMode {
    /// CPU cycles in one frame.
    #[must_use]
    pub const fn cycles_per_frame(self) -> u32 {
        match self {
            Self::Ntsc => 29_780,
            Self::Pal => 33_247,
        }
    }

    /// Frames per second.
    #[must_use]
    pub const fn frame_rate(self) -> u32 {
        match self {
            Self::Ntsc => 60,
            Self::Pal => 50,
        }
    }

    /// Whether the top and bottom tile rows are blanked (NTSC overscan).
    #[must_use]
    pub const fn skip_edge_rows(self) -> bool {
        matches!(self, Self::Ntsc)
    }
}

/// NES configuration.
pub struct NesConfig {
    /// iNES file contents.
    pub rom_data: Vec<u8>,
    /// Video output mode. Defaults to NTSC.
    pub mode: OutputMode,
}
