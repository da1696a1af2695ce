//! Binary encode/decode shared by both flavors.
//!
//! The flavors only disagree on how `TAG_Int` payloads and lengths are laid
//! out; everything else (type ids, shorts, longs, floats, `TAG_End`
//! terminators) is little-endian in both.

use bytes::{Buf, BufMut};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtRoot, NbtTag};

const MAX_DEPTH: usize = 512;

const TAG_END: u8 = 0;
const TAG_COMPOUND: u8 = 10;

pub(crate) trait Flavor {
    fn put_int(buf: &mut impl BufMut, value: i32);
    fn get_int(buf: &mut impl Buf) -> Result<i32, NbtError>;

    fn put_len(buf: &mut impl BufMut, len: i32);
    fn get_len(buf: &mut impl Buf) -> Result<i32, NbtError>;

    fn put_str_len(buf: &mut impl BufMut, len: usize) -> Result<(), NbtError>;
    fn get_str_len(buf: &mut impl Buf) -> Result<usize, NbtError>;
}

pub(crate) fn need(buf: &impl Buf, bytes: usize) -> Result<(), NbtError> {
    if buf.remaining() < bytes {
        return Err(NbtError::UnexpectedEof);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

pub(crate) fn decode_root<F: Flavor>(buf: &mut impl Buf) -> Result<NbtRoot, NbtError> {
    need(buf, 1)?;
    let kind = buf.get_u8();
    if kind != TAG_COMPOUND {
        return Err(NbtError::ExpectedCompound { got: kind });
    }
    let name = decode_str::<F>(buf)?;
    let compound = decode_compound::<F>(buf, 0)?;
    Ok(NbtRoot { name, compound })
}

fn decode_len<F: Flavor>(buf: &mut impl Buf) -> Result<usize, NbtError> {
    let len = F::get_len(buf)?;
    usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))
}

fn decode_str<F: Flavor>(buf: &mut impl Buf) -> Result<String, NbtError> {
    let len = F::get_str_len(buf)?;
    need(buf, len)?;
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec()).map_err(|_| NbtError::InvalidUtf8)
}

fn decode_compound<F: Flavor>(buf: &mut impl Buf, depth: usize) -> Result<NbtCompound, NbtError> {
    check_depth(depth)?;
    let mut compound = NbtCompound::new();
    loop {
        need(buf, 1)?;
        let kind = buf.get_u8();
        if kind == TAG_END {
            return Ok(compound);
        }
        let name = decode_str::<F>(buf)?;
        let tag = decode_payload::<F>(buf, kind, depth + 1)?;
        compound.put(name, tag);
    }
}

fn decode_payload<F: Flavor>(buf: &mut impl Buf, kind: u8, depth: usize) -> Result<NbtTag, NbtError> {
    check_depth(depth)?;
    let tag = match kind {
        1 => {
            need(buf, 1)?;
            NbtTag::Byte(buf.get_i8())
        }
        2 => {
            need(buf, 2)?;
            NbtTag::Short(buf.get_i16_le())
        }
        3 => NbtTag::Int(F::get_int(buf)?),
        4 => {
            need(buf, 8)?;
            NbtTag::Long(buf.get_i64_le())
        }
        5 => {
            need(buf, 4)?;
            NbtTag::Float(buf.get_f32_le())
        }
        6 => {
            need(buf, 8)?;
            NbtTag::Double(buf.get_f64_le())
        }
        7 => {
            let len = decode_len::<F>(buf)?;
            need(buf, len)?;
            NbtTag::ByteArray((0..len).map(|_| buf.get_i8()).collect())
        }
        8 => NbtTag::String(decode_str::<F>(buf)?),
        9 => {
            need(buf, 1)?;
            let element = buf.get_u8();
            let len = decode_len::<F>(buf)?;
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(decode_payload::<F>(buf, element, depth + 1)?);
            }
            NbtTag::List(items)
        }
        10 => NbtTag::Compound(decode_compound::<F>(buf, depth)?),
        11 => {
            let len = decode_len::<F>(buf)?;
            let mut ints = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                ints.push(F::get_int(buf)?);
            }
            NbtTag::IntArray(ints)
        }
        12 => {
            let len = decode_len::<F>(buf)?;
            need(buf, len.saturating_mul(8))?;
            NbtTag::LongArray((0..len).map(|_| buf.get_i64_le()).collect())
        }
        other => return Err(NbtError::UnknownTagType(other)),
    };
    Ok(tag)
}

fn check_depth(depth: usize) -> Result<(), NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

pub(crate) fn encode_root<F: Flavor>(buf: &mut impl BufMut, root: &NbtRoot) -> Result<(), NbtError> {
    buf.put_u8(TAG_COMPOUND);
    encode_str::<F>(buf, &root.name)?;
    encode_compound::<F>(buf, &root.compound)
}

fn encode_len<F: Flavor>(buf: &mut impl BufMut, len: usize) -> Result<(), NbtError> {
    let len = i32::try_from(len).map_err(|_| NbtError::LengthOverflow(len))?;
    F::put_len(buf, len);
    Ok(())
}

fn encode_str<F: Flavor>(buf: &mut impl BufMut, s: &str) -> Result<(), NbtError> {
    F::put_str_len(buf, s.len())?;
    buf.put_slice(s.as_bytes());
    Ok(())
}

fn encode_compound<F: Flavor>(buf: &mut impl BufMut, compound: &NbtCompound) -> Result<(), NbtError> {
    for (name, tag) in compound {
        buf.put_u8(tag.type_id());
        encode_str::<F>(buf, name)?;
        encode_payload::<F>(buf, tag)?;
    }
    buf.put_u8(TAG_END);
    Ok(())
}

fn encode_payload<F: Flavor>(buf: &mut impl BufMut, tag: &NbtTag) -> Result<(), NbtError> {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16_le(*v),
        NbtTag::Int(v) => F::put_int(buf, *v),
        NbtTag::Long(v) => buf.put_i64_le(*v),
        NbtTag::Float(v) => buf.put_f32_le(*v),
        NbtTag::Double(v) => buf.put_f64_le(*v),
        NbtTag::ByteArray(bytes) => {
            encode_len::<F>(buf, bytes.len())?;
            bytes.iter().for_each(|b| buf.put_i8(*b));
        }
        NbtTag::String(s) => encode_str::<F>(buf, s)?,
        NbtTag::List(items) => {
            // An empty list is written with element type TAG_End.
            let element = items.first().map_or(TAG_END, NbtTag::type_id);
            if let Some(odd) = items.iter().find(|item| item.type_id() != element) {
                return Err(NbtError::MixedList {
                    expected: element,
                    got: odd.type_id(),
                });
            }
            buf.put_u8(element);
            encode_len::<F>(buf, items.len())?;
            for item in items {
                encode_payload::<F>(buf, item)?;
            }
        }
        NbtTag::Compound(compound) => encode_compound::<F>(buf, compound)?,
        NbtTag::IntArray(ints) => {
            encode_len::<F>(buf, ints.len())?;
            ints.iter().for_each(|v| F::put_int(buf, *v));
        }
        NbtTag::LongArray(longs) => {
            encode_len::<F>(buf, longs.len())?;
            longs.iter().for_each(|v| buf.put_i64_le(*v));
        }
    }
    Ok(())
}
