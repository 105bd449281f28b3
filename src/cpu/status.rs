use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuStatus: u8 {
        const CARRY        = 0b0000_0001;
        const ZERO         = 0b0000_0010;
        const INT_DISABLE  = 0b0000_0100;
        const DECIMAL      = 0b0000_1000;
        const BRK          = 0b0001_0000;
        const ALWAYS       = 0b0010_0000;
        const OVERFLOW     = 0b0100_0000;
        const NEGATIVE     = 0b1000_0000;
    }
}

impl CpuStatus {
    pub fn set_zero_and_negative(&mut self, value: u8) {
        self.set(CpuStatus::ZERO, value == 0);
        self.set(CpuStatus::NEGATIVE, value & 0x80 != 0);
    }
}
