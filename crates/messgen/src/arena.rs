//! Bump arena for arena-mode decoding.

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use thiserror::Error;

/// The arena cannot satisfy a request within its capacity.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
pub struct AllocError {
    pub requested: usize,
    pub remaining: usize,
}

/// Fixed-capacity bump arena.
///
/// Every allocation aligns the cursor to the element alignment, checks the
/// request fits the remaining capacity and advances; nothing is freed
/// individually. [`Arena::reset`] rewinds the whole region and needs
/// `&mut self`, so the borrow checker rejects any decoded value that would
/// outlive it.
///
/// Values placed in the arena are never dropped. Arena-mode types only hold
/// borrowed data, so there is nothing to drop.
///
/// ```
/// use messgen::Arena;
///
/// let arena = Arena::with_capacity(16);
/// let mut v = arena.alloc::<u32>(3).unwrap();
/// v.extend([1, 2, 3]);
/// assert_eq!(arena.used(), 12);
/// assert!(arena.alloc::<u64>(1).is_err());
/// assert!(arena.alloc::<u64>(0).is_ok());
/// ```
pub struct Arena {
    bump: Bump,
    capacity: usize,
    cursor: Cell<usize>,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
            capacity,
            cursor: Cell::new(0),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed, alignment padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor.get()
    }

    /// Charges `layout` against the capacity. Zero-sized requests always
    /// succeed and do not move the cursor.
    fn reserve(&self, layout: Layout) -> Result<(), AllocError> {
        if layout.size() == 0 {
            return Ok(());
        }
        let cursor = self.cursor.get();
        let mask = layout.align() - 1;
        let fail = AllocError {
            requested: layout.size(),
            remaining: self.capacity - cursor,
        };
        let start = cursor.checked_add(mask).ok_or(fail)? & !mask;
        let end = start.checked_add(layout.size()).ok_or(fail)?;
        if end > self.capacity {
            return Err(fail);
        }
        self.cursor.set(end);
        Ok(())
    }

    /// Storage for `count` values of `T`, empty and ready to be filled.
    ///
    /// `count == 0` never fails.
    pub fn alloc<T>(&self, count: usize) -> Result<BumpVec<'_, T>, AllocError> {
        let layout = Layout::array::<T>(count).map_err(|_| AllocError {
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.reserve(layout)?;
        Ok(BumpVec::with_capacity_in(count, &self.bump))
    }

    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> Result<&[T], AllocError> {
        self.reserve(Layout::for_value(src))?;
        Ok(self.bump.alloc_slice_copy(src))
    }

    pub fn alloc_str(&self, src: &str) -> Result<&str, AllocError> {
        self.reserve(Layout::for_value(src.as_bytes()))?;
        Ok(self.bump.alloc_str(src))
    }

    /// Rewinds the arena, keeping its backing memory for reuse.
    pub fn reset(&mut self) {
        self.bump.reset();
        self.cursor.set(0);
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("used", &self.cursor.get())
            .finish()
    }
}
