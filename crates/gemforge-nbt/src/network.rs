//! Network flavor: ZigZag VarInt ints and lengths, VarUInt32 string lengths.

use bytes::{Buf, BufMut};

use crate::codec::Flavor;
use crate::error::NbtError;
use crate::varint::{read_var_i32, read_var_u32, write_var_i32, write_var_u32};

pub(crate) struct Network;

impl Flavor for Network {
    fn put_int(buf: &mut impl BufMut, value: i32) {
        write_var_i32(buf, value);
    }

    fn get_int(buf: &mut impl Buf) -> Result<i32, NbtError> {
        read_var_i32(buf)
    }

    fn put_len(buf: &mut impl BufMut, len: i32) {
        write_var_i32(buf, len);
    }

    fn get_len(buf: &mut impl Buf) -> Result<i32, NbtError> {
        read_var_i32(buf)
    }

    fn put_str_len(buf: &mut impl BufMut, len: usize) -> Result<(), NbtError> {
        let len = u32::try_from(len).map_err(|_| NbtError::StringTooLong {
            len,
            max: u32::MAX as usize,
        })?;
        write_var_u32(buf, len);
        Ok(())
    }

    fn get_str_len(buf: &mut impl Buf) -> Result<usize, NbtError> {
        read_var_u32(buf).map(|len| len as usize)
    }
}
