//! Rotating identifier allocation.
//!
//! Asynchronous request/response pairs are correlated by small integer
//! ids. Ids are minted sequentially inside a configured `[lower, upper)`
//! range and wrap back to the lower bound when the range is exhausted,
//! so a long-lived producer never collides with reserved low values.
//!
//! # Thread Safety
//!
//! [`RotatingIdAllocator`] is a plain mutable counter with no internal
//! locking. Concurrent producers must serialize access externally —
//! [`SharedIdAllocator`] is the cloneable, mutex-guarded handle for
//! that case.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;

// ============================================================================
// RotatingId Trait
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer types usable as rotating identifiers.
///
/// Sealed: implemented for `u8`, `u16`, `u32`, `u64` and `usize`.
pub trait RotatingId: Copy + PartialEq + PartialOrd + sealed::Sealed {
    /// Returns the next sequential value.
    ///
    /// Wrapping at the type's natural limit is tolerated but never
    /// reached in practice: the allocator resets at its configured
    /// upper bound first.
    fn advance(self) -> Self;
}

macro_rules! impl_rotating_id {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl RotatingId for $ty {
                #[inline]
                fn advance(self) -> Self {
                    self.wrapping_add(1)
                }
            }
        )*
    };
}

impl_rotating_id!(u8, u16, u32, u64, usize);

// ============================================================================
// RotatingIdAllocator
// ============================================================================

/// Mints sequential identifiers in a bounded range, wrapping around.
///
/// `get()` returns the current value and advances; when the next value
/// would equal the (exclusive) upper bound, the counter resets to the
/// lower bound instead. For bounds `(0, 3)` the sequence is
/// `0, 1, 2, 0, 1, 2, …`.
///
/// Wraparound is governed by the configured bound, never by the
/// integer's natural overflow. Minting is a pure total function with
/// no error conditions.
#[derive(Debug, Clone)]
pub struct RotatingIdAllocator<T: RotatingId> {
    current: T,
    lower_bound: T,
    upper_bound: T,
}

impl<T: RotatingId> RotatingIdAllocator<T> {
    /// Creates an allocator minting ids in `[lower_bound, upper_bound)`.
    ///
    /// The range must be non-empty: `lower_bound < upper_bound`. A
    /// degenerate range would never hit the reset condition and the
    /// counter would drift past the configured bounds.
    #[inline]
    #[must_use]
    pub fn new(lower_bound: T, upper_bound: T) -> Self {
        debug_assert!(
            lower_bound < upper_bound,
            "id range must be non-empty (lower_bound < upper_bound)"
        );
        Self {
            current: lower_bound,
            lower_bound,
            upper_bound,
        }
    }

    /// Returns the current id and advances the counter.
    #[inline]
    pub fn get(&mut self) -> T {
        let id = self.current;
        let next = self.current.advance();
        self.current = if next == self.upper_bound {
            self.lower_bound
        } else {
            next
        };
        id
    }

    /// Returns the id the next call to [`get()`](Self::get) will mint.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> T {
        self.current
    }

    /// Returns the inclusive lower bound of the range.
    #[inline]
    #[must_use]
    pub fn lower_bound(&self) -> T {
        self.lower_bound
    }

    /// Returns the exclusive upper bound of the range.
    #[inline]
    #[must_use]
    pub fn upper_bound(&self) -> T {
        self.upper_bound
    }
}

// ============================================================================
// SharedIdAllocator
// ============================================================================

/// Ids below this value are reserved for sentinel event ids.
const EVENT_ID_LOWER_BOUND: u32 = 0x10;

/// Cloneable, mutex-guarded handle to a shared [`RotatingIdAllocator`].
///
/// The allocator itself provides no locking; this handle is the
/// explicit serialization point for subsystems that mint ids from
/// multiple threads. Pass it by clone to every producer that needs
/// correlated ids — never through ambient global state.
#[derive(Debug, Clone)]
pub struct SharedIdAllocator {
    inner: Arc<Mutex<RotatingIdAllocator<u32>>>,
}

impl SharedIdAllocator {
    /// Creates a shared allocator minting ids in `[lower_bound, upper_bound)`.
    #[inline]
    #[must_use]
    pub fn new(lower_bound: u32, upper_bound: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RotatingIdAllocator::new(
                lower_bound,
                upper_bound,
            ))),
        }
    }

    /// Creates the allocator used for native event ids.
    ///
    /// Event ids start at `0x10`; values below are reserved.
    #[inline]
    #[must_use]
    pub fn for_events() -> Self {
        Self::new(EVENT_ID_LOWER_BOUND, u32::MAX)
    }

    /// Mints the next id.
    #[inline]
    pub fn mint(&self) -> u32 {
        self.inner.lock().get()
    }
}

impl Default for SharedIdAllocator {
    fn default() -> Self {
        Self::for_events()
    }
}

// ============================================================================
// Tests
// ============================================================================
