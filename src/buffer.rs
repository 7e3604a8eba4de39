// buffer.rs — 32-byte aligned, zero-initialised f32 storage.
//
// The magnitude kernel streams three large f32 arrays. Keeping every array
// aligned to 32 bytes lets the auto-vectoriser use aligned 256-bit loads
// and stores without a scalar peel at the start of the loop.
//
// Vec<f32> only guarantees 4-byte alignment. Instead of a hand-rolled
// allocator we store a Vec of 32-byte aligned blocks of 8 lanes and view
// it as a flat [f32] with bytemuck:
//
//   blocks:  [ b0: f32×8 ][ b1: f32×8 ][ b2: f32×8 ] ...
//   slice:   [ 0 1 2 3 4 5 6 7 | 8 9 ... ]
//                                          ^ len (tail lanes hidden)
//
// The tail lanes past `len` stay zero and are never exposed.

use std::fmt;
use std::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};

use crate::error::{GradMagError, Result};

/// Byte alignment of the first element of every `AlignedBuffer`.
pub const BUFFER_ALIGN: usize = 32;

/// f32 lanes per aligned block.
const LANES: usize = BUFFER_ALIGN / std::mem::size_of::<f32>();

#[derive(Clone, Copy)]
#[repr(C, align(32))]
struct Block([f32; LANES]);

// SAFETY: Block is repr(C) around [f32; 8]. Its size (32) equals its
// alignment, so there are no padding bytes, and the all-zero bit pattern
// is a valid f32 array.
unsafe impl Zeroable for Block {}
unsafe impl Pod for Block {}

/// Owned f32 buffer whose first element is 32-byte aligned.
///
/// Derefs to `[f32]`, so it can be passed anywhere a slice is expected.
/// Always zero-initialised on construction.
#[derive(Clone)]
pub struct AlignedBuffer {
    blocks: Vec<Block>,
    len: usize,
}

impl AlignedBuffer {
    /// Allocate `len` zeroed elements.
    pub fn zeroed(len: usize) -> Self {
        let n_blocks = len.div_ceil(LANES);
        AlignedBuffer {
            blocks: vec![Block::zeroed(); n_blocks],
            len,
        }
    }

    /// Fallible form of [`AlignedBuffer::zeroed`] for sizes that come from
    /// user input.
    ///
    /// Fails with `InvalidArgument` if the byte size exceeds `isize::MAX`
    /// or the allocator cannot provide the memory.
    pub fn try_zeroed(len: usize) -> Result<Self> {
        let n_blocks = len.div_ceil(LANES);
        let too_large = || {
            GradMagError::invalid(format!(
                "{len} f32 elements exceed the addressable buffer size"
            ))
        };
        let bytes = n_blocks
            .checked_mul(std::mem::size_of::<Block>())
            .ok_or_else(too_large)?;
        if bytes > isize::MAX as usize {
            return Err(too_large());
        }
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(n_blocks).map_err(|e| {
            GradMagError::invalid(format!(
                "cannot allocate {bytes} bytes for {len} elements: {e}"
            ))
        })?;
        blocks.resize(n_blocks, Block::zeroed());
        Ok(AlignedBuffer { blocks, len })
    }

    /// Allocate a buffer holding a copy of `values`.
    pub fn from_slice(values: &[f32]) -> Self {
        let mut buf = Self::zeroed(values.len());
        buf.copy_from_slice(values);
        buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        let lanes: &[f32] = bytemuck::cast_slice(&self.blocks);
        &lanes[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        let lanes: &mut [f32] = bytemuck::cast_slice_mut(&mut self.blocks);
        &mut lanes[..self.len]
    }

    /// Reset every element to zero.
    pub fn fill_zero(&mut self) {
        self.blocks.fill(Block::zeroed());
    }

    /// Copy the contents out into a plain `Vec<f32>`.
    pub fn to_vec(&self) -> Vec<f32> {
        self.as_slice().to_vec()
    }
}

impl Deref for AlignedBuffer {
    type Target = [f32];

    #[inline]
    fn deref(&self) -> &[f32] {
        self.as_slice()
    }
}

impl DerefMut for AlignedBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = &self.as_slice()[..self.len.min(8)];
        write!(f, "AlignedBuffer {{ len: {}, head: {:?}", self.len, head)?;
        if self.len > 8 {
            write!(f, " ...")?;
        }
        write!(f, " }}")
    }
}
