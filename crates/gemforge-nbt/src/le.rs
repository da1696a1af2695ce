//! Little-endian flavor, used for save data.

use bytes::{Buf, BufMut};

use crate::codec::{need, Flavor};
use crate::error::NbtError;

pub(crate) struct LittleEndian;

impl Flavor for LittleEndian {
    fn put_int(buf: &mut impl BufMut, value: i32) {
        buf.put_i32_le(value);
    }

    fn get_int(buf: &mut impl Buf) -> Result<i32, NbtError> {
        need(buf, 4)?;
        Ok(buf.get_i32_le())
    }

    fn put_len(buf: &mut impl BufMut, len: i32) {
        buf.put_i32_le(len);
    }

    fn get_len(buf: &mut impl Buf) -> Result<i32, NbtError> {
        need(buf, 4)?;
        Ok(buf.get_i32_le())
    }

    fn put_str_len(buf: &mut impl BufMut, len: usize) -> Result<(), NbtError> {
        let len = u16::try_from(len).map_err(|_| NbtError::StringTooLong {
            len,
            max: usize::from(u16::MAX),
        })?;
        buf.put_u16_le(len);
        Ok(())
    }

    fn get_str_len(buf: &mut impl Buf) -> Result<usize, NbtError> {
        need(buf, 2)?;
        Ok(usize::from(buf.get_u16_le()))
    }
}
