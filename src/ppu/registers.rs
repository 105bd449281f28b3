use bitflags::bitflags;

bitflags! {
    /// $2000 PPUCTRL. Names and accessor style grounded on the teacher's
    /// `ppu/ppu_state.rs` `PpuControl` bitflags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuCtrl: u8 {
        const NAMETABLE_LO       = 0b0000_0001;
        const NAMETABLE_HI       = 0b0000_0010;
        const VRAM_ADD_INCREMENT = 0b0000_0100;
        const SPRITE_PATTERN_ADDR = 0b0000_1000;
        const BACKGROUND_PATTERN_ADDR = 0b0001_0000;
        const SPRITE_SIZE        = 0b0010_0000;
        const MASTER_SLAVE       = 0b0100_0000;
        const GENERATE_NMI       = 0b1000_0000;
    }
}

impl PpuCtrl {
    pub fn vram_addr_increment(self) -> u16 {
        if self.contains(PpuCtrl::VRAM_ADD_INCREMENT) {
            32
        } else {
            1
        }
    }

    pub fn sprite_pattern_table(self) -> u16 {
        if self.contains(PpuCtrl::SPRITE_PATTERN_ADDR) {
            0x1000
        } else {
            0
        }
    }

    pub fn background_pattern_table(self) -> u16 {
        if self.contains(PpuCtrl::BACKGROUND_PATTERN_ADDR) {
            0x1000
        } else {
            0
        }
    }

    pub fn sprite_height(self) -> u8 {
        if self.contains(PpuCtrl::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }
}

bitflags! {
    /// $2001 PPUMASK.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuMask: u8 {
        const GREYSCALE            = 0b0000_0001;
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        const SHOW_SPRITES_LEFT    = 0b0000_0100;
        const SHOW_BACKGROUND      = 0b0000_1000;
        const SHOW_SPRITES         = 0b0001_0000;
        const EMPHASIZE_RED        = 0b0010_0000;
        const EMPHASIZE_GREEN      = 0b0100_0000;
        const EMPHASIZE_BLUE       = 0b1000_0000;
    }
}

impl PpuMask {
    pub fn rendering_enabled(self) -> bool {
        self.intersects(PpuMask::SHOW_BACKGROUND | PpuMask::SHOW_SPRITES)
    }
}

bitflags! {
    /// $2002 PPUSTATUS.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK_STARTED  = 0b1000_0000;
    }
}
