use crate::constants::STACK_DEPTH;
use crate::error::FaultKind;

/// # Call Stack
/// Return addresses pushed by CALL and popped by RET.
///
/// `sp` counts the addresses currently held, so `stack[sp - 1]` is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stack {
    addresses: [u16; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, address: u16) -> Result<(), FaultKind> {
        if self.sp == STACK_DEPTH {
            return Err(FaultKind::StackOverflow);
        }
        self.addresses[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, FaultKind> {
        if self.sp == 0 {
            return Err(FaultKind::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// The most recently pushed address, if any
    pub fn peek(&self) -> Option<u16> {
        self.sp.checked_sub(1).map(|top| self.addresses[top])
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
