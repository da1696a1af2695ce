//! LEB128 VarInts as used by the network flavor.

use bytes::{Buf, BufMut};

use crate::error::NbtError;

const MAX_VARINT32_BYTES: usize = 5;

pub(crate) fn write_var_u32(buf: &mut impl BufMut, mut value: u32) {
    while value & !0x7F != 0 {
        buf.put_u8((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub(crate) fn read_var_u32(buf: &mut impl Buf) -> Result<u32, NbtError> {
    let mut result = 0u32;
    for i in 0..MAX_VARINT32_BYTES {
        if !buf.has_remaining() {
            return Err(NbtError::UnexpectedEof);
        }
        let byte = buf.get_u8();
        result |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(NbtError::VarIntTooLong {
        max_bytes: MAX_VARINT32_BYTES,
    })
}

/// ZigZag + LEB128.
pub(crate) fn write_var_i32(buf: &mut impl BufMut, value: i32) {
    write_var_u32(buf, ((value << 1) ^ (value >> 31)) as u32);
}

pub(crate) fn read_var_i32(buf: &mut impl Buf) -> Result<i32, NbtError> {
    let raw = read_var_u32(buf)?;
    Ok((raw >> 1) as i32 ^ -((raw & 1) as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_small_values_fit_one_byte() {
        let mut buf = Vec::new();
        write_var_i32(&mut buf, -1);
        write_var_i32(&mut buf, 1);
        assert_eq!(buf, [0x01, 0x02]);

        let mut slice = &buf[..];
        assert_eq!(read_var_i32(&mut slice).unwrap(), -1);
        assert_eq!(read_var_i32(&mut slice).unwrap(), 1);
    }

    #[test]
    fn extremes_survive() {
        for v in [i32::MIN, i32::MAX, 0, 300, -300] {
            let mut buf = Vec::new();
            write_var_i32(&mut buf, v);
            assert!(buf.len() <= MAX_VARINT32_BYTES);
            assert_eq!(read_var_i32(&mut &buf[..]).unwrap(), v);
        }
    }

    #[test]
    fn overlong_is_rejected() {
        let data = [0xFFu8; 6];
        assert!(matches!(
            read_var_u32(&mut &data[..]),
            Err(NbtError::VarIntTooLong { max_bytes: 5 })
        ));
    }

    #[test]
    fn truncated_is_eof() {
        let data = [0x80u8];
        assert!(matches!(
            read_var_u32(&mut &data[..]),
            Err(NbtError::UnexpectedEof)
        ));
    }
}
