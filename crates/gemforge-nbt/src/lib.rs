//! NBT (Named Binary Tag) records for block-entity state.
//!
//! Two binary flavors share one tag model:
//! - **Little-endian**: save data. Ints are `i32_le`, string lengths `u16_le`.
//! - **Network**: update packets. Ints and lengths are ZigZag VarInts, string
//!   lengths VarUInt32.

mod codec;
pub mod error;
mod le;
mod network;
pub mod tag;
mod varint;

pub use error::NbtError;
pub use tag::{NbtCompound, NbtRoot, NbtTag};

use bytes::{Buf, BufMut};

/// Read a little-endian root compound.
pub fn read_nbt_le(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    codec::decode_root::<le::LittleEndian>(buf)
}

/// Write a little-endian root compound.
///
/// Fails on strings longer than `u16::MAX` bytes and on lists mixing tag
/// types; `buf` may hold a partial record afterwards.
pub fn write_nbt_le(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    codec::encode_root::<le::LittleEndian>(buf, root)
}

/// Read a network-flavored root compound.
pub fn read_nbt_network(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    codec::decode_root::<network::Network>(buf)
}

/// Write a network-flavored root compound.
pub fn write_nbt_network(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    codec::encode_root::<network::Network>(buf, root)
}
