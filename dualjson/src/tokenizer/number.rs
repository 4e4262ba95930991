// SPDX-License-Identifier: Apache-2.0

/// Position within a number run.
///
/// Follows the JSON number shape with two relaxations: leading zeros are
/// allowed and a `.` may be followed directly by the exponent (`1.e5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Num {
    /// Start of the run, possibly right after a leading sign
    Sign,
    /// Digits before any `.`
    BeforeDecimalPoint,
    /// Just read `.`; `digits` says whether the mantissa already has one
    DecimalPoint { digits: bool },
    /// Digits after the `.`
    AfterDecimalPoint,
    /// Just read `e` or `E`
    Exponent,
    /// Just read the sign directly after the exponent marker
    ExponentSign,
    /// Digits of the exponent
    AfterExponent,
}

/// Result of offering one byte to the number state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The byte belongs to the number
    Continue(Num),
    /// The byte cannot appear in a number
    Reject,
}

impl Num {
    pub const fn step(self, byte: u8) -> Step {
        let next = match (self, byte) {
            (Num::Sign | Num::BeforeDecimalPoint, b'0'..=b'9') => Num::BeforeDecimalPoint,
            (Num::Sign, b'.') => Num::DecimalPoint { digits: false },
            (Num::BeforeDecimalPoint, b'.') => Num::DecimalPoint { digits: true },
            (Num::BeforeDecimalPoint, b'e' | b'E') => Num::Exponent,
            (Num::DecimalPoint { .. } | Num::AfterDecimalPoint, b'0'..=b'9') => {
                Num::AfterDecimalPoint
            }
            (Num::DecimalPoint { digits: true } | Num::AfterDecimalPoint, b'e' | b'E') => {
                Num::Exponent
            }
            (Num::Exponent, b'+' | b'-') => Num::ExponentSign,
            (Num::Exponent | Num::ExponentSign | Num::AfterExponent, b'0'..=b'9') => {
                Num::AfterExponent
            }
            _ => return Step::Reject,
        };
        Step::Continue(next)
    }

    /// Whether a run stopping in this state spells a complete number.
    pub const fn is_complete(self) -> bool {
        matches!(
            self,
            Num::BeforeDecimalPoint
                | Num::DecimalPoint { digits: true }
                | Num::AfterDecimalPoint
                | Num::AfterExponent
        )
    }
}
