//! https://www.nesdev.org/wiki/CPU_interrupts
//! https://www.nesdev.org/wiki/Status_flags

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptKind {
    Nmi,
    Reset,
    Irq,
    Brk,
}

#[derive(Debug, Clone, Copy)]
pub struct Interrupt {
    pub kind: InterruptKind,
    pub vector: u16,
    pub is_set_b_flag: bool,
    pub is_hardware_interrupt: bool,
}

pub const NMI_INTERRUPT: Interrupt = Interrupt {
    kind: InterruptKind::Nmi,
    vector: 0xFFFA,
    is_set_b_flag: false,
    is_hardware_interrupt: true,
};

pub const RESET_INTERRUPT: Interrupt = Interrupt {
    kind: InterruptKind::Reset,
    vector: 0xFFFC,
    is_set_b_flag: false,
    is_hardware_interrupt: true,
};

pub const IRQ_INTERRUPT: Interrupt = Interrupt {
    kind: InterruptKind::Irq,
    vector: 0xFFFE,
    is_set_b_flag: false,
    is_hardware_interrupt: true,
};

pub const BRK_INTERRUPT: Interrupt = Interrupt {
    kind: InterruptKind::Brk,
    vector: 0xFFFE,
    is_set_b_flag: true,
    is_hardware_interrupt: false,
};
