//! Floating-point exception state for posit arithmetic.
//!
//! Posit operations are carried out in software, so exceptional conditions are
//! recorded in a per-thread flag word instead of the hardware status register.
//! Loops on different threads never observe each other's flags.

use std::{
    cell::Cell,
    ops::{BitOr, BitOrAssign},
};

use crate::error::ArithmeticError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FpExceptions(u8);

impl FpExceptions {
    pub const NONE: Self = FpExceptions(0);
    pub const INVALID: Self = FpExceptions(1 << 0);
    pub const DIVIDE_BY_ZERO: Self = FpExceptions(1 << 1);
    pub const OVERFLOW: Self = FpExceptions(1 << 2);
    pub const UNDERFLOW: Self = FpExceptions(1 << 3);
    pub const ALL: Self = FpExceptions(0b1111);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The single flag a batch reports: invalid > divide-by-zero > overflow > underflow.
    pub fn highest_priority(self) -> Option<ArithmeticError> {
        if self.intersects(Self::INVALID) {
            Some(ArithmeticError::Invalid)
        } else if self.intersects(Self::DIVIDE_BY_ZERO) {
            Some(ArithmeticError::DivideByZero)
        } else if self.intersects(Self::OVERFLOW) {
            Some(ArithmeticError::Overflow)
        } else if self.intersects(Self::UNDERFLOW) {
            Some(ArithmeticError::Underflow)
        } else {
            None
        }
    }
}

impl BitOr for FpExceptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        FpExceptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for FpExceptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

thread_local! {
    static RAISED: Cell<FpExceptions> = const { Cell::new(FpExceptions::NONE) };
}

pub fn raise(flags: FpExceptions) {
    RAISED.with(|raised| raised.set(raised.get() | flags));
}

/// Flags in `mask` that are currently raised on this thread.
pub fn test(mask: FpExceptions) -> FpExceptions {
    RAISED.with(|raised| FpExceptions(raised.get().0 & mask.0))
}

pub fn clear(mask: FpExceptions) {
    RAISED.with(|raised| raised.set(FpExceptions(raised.get().0 & !mask.0)));
}

/// Saved exception state of the current thread.
///
/// `hold` saves and clears the flags; dropping the guard puts the saved flags
/// back, discarding whatever was raised in between. The restore happens on
/// every exit path, including unwinding.
#[derive(Debug)]
pub struct FpEnv {
    saved: FpExceptions,
}

impl FpEnv {
    pub fn hold() -> Self {
        let saved = RAISED.with(|raised| raised.replace(FpExceptions::NONE));
        FpEnv { saved }
    }

    /// Flags raised since `hold`.
    pub fn raised(&self) -> FpExceptions {
        test(FpExceptions::ALL)
    }

    /// Consumes the guard, restoring the saved state, and reports the most
    /// severe condition raised while it was held.
    pub fn finish(self) -> Result<(), ArithmeticError> {
        match self.raised().highest_priority() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for FpEnv {
    fn drop(&mut self) {
        let saved = self.saved;
        RAISED.with(|raised| raised.set(saved));
    }
}
