//! Explicit rounding direction for arithmetic operations.

/// Rounding direction for division.
///
/// Every division that produces a user-visible quantity names its
/// direction. Outputs paid by the pool round [`Down`](Self::Down); shares
/// burned for an exact withdrawal round [`Up`](Self::Up).
///
/// # Examples
///
/// ```
/// use tripool_amm::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(!Rounding::Down.is_up());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
