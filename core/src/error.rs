use thiserror::Error;

/// Structural violations that stop the machine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    #[error("stack overflow")]
    StackOverflow,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("address {0:#06X} is out of range")]
    AddressOutOfRange(u16),
}

/// A fault along with the instruction that raised it.
///
/// `pc` is the address the faulting opcode was fetched from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} executing {opcode:04X} at pc {pc:04X}")]
pub struct Fault {
    pub kind: FaultKind,
    pub pc: u16,
    pub opcode: u16,
}

#[derive(Debug, Error)]
pub enum RomError {
    #[error("image is {size} bytes but only {capacity} fit above the load address")]
    ImageTooLarge { size: usize, capacity: usize },
    #[error("unable to read image: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_message_names_instruction_and_pc() {
        let fault = Fault {
            kind: FaultKind::StackUnderflow,
            pc: 0x0204,
            opcode: 0x00EE,
        };
        assert_eq!(
            fault.to_string(),
            "stack underflow executing 00EE at pc 0204"
        );
    }

    #[test]
    fn test_out_of_range_message() {
        assert_eq!(
            FaultKind::AddressOutOfRange(0x1000).to_string(),
            "address 0x1000 is out of range"
        );
    }
}
