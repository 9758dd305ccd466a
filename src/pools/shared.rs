//! Thread-safe handle to one pool.

use std::sync::Arc;

use parking_lot::Mutex;
use primitive_types::U256;

use super::StableSwapPool;
use crate::error::AmmError;

/// A cloneable, lock-guarded [`StableSwapPool`].
///
/// Each closure passed to [`with`](Self::with) runs with the pool locked
/// for its whole duration, so operations against one pool never
/// interleave. Handles to different pools never contend.
///
/// # Examples
///
/// ```
/// # use tripool_amm::config::{AssetConfig, PoolConfig};
/// # use tripool_amm::domain::{Decimals, FeeRate, Token, TokenAddress};
/// use tripool_amm::pools::{SharedPool, StableSwapPool};
///
/// # let tok = |b: u8| Token::new(TokenAddress::from_bytes([b; 32]), Decimals::new(18).expect("valid"));
/// # let config = PoolConfig::new(
/// #     [AssetConfig::reference(tok(1)), AssetConfig::reference(tok(2)), AssetConfig::reference(tok(3))],
/// #     100,
/// #     FeeRate::from_bps(4).expect("valid"),
/// # ).expect("valid");
/// let shared = SharedPool::new(StableSwapPool::new(config).expect("valid"));
/// let other = shared.clone();
/// assert!(other.with(|pool| pool.total_shares().is_zero()));
/// ```
#[derive(Debug, Clone)]
pub struct SharedPool {
    inner: Arc<Mutex<StableSwapPool>>,
}

impl SharedPool {
    /// Wraps `pool` for shared use.
    #[must_use]
    pub fn new(pool: StableSwapPool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// Runs `f` with exclusive access to the pool.
    pub fn with<R>(&self, f: impl FnOnce(&mut StableSwapPool) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Current virtual price; see [`StableSwapPool::virtual_price`].
    ///
    /// # Errors
    ///
    /// Any error from [`StableSwapPool::virtual_price`].
    pub fn virtual_price(&self) -> Result<U256, AmmError> {
        self.inner.lock().virtual_price()
    }

    /// Returns a copy of the pool as it is now.
    #[must_use]
    pub fn snapshot(&self) -> StableSwapPool {
        self.inner.lock().clone()
    }
}
