//! Tag model: the typed values a save record or update packet is built from.

use std::collections::hash_map::{self, HashMap};

/// Any NBT value. `TAG_End` (0) only appears on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<NbtTag>),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// Wire type id of this tag (1-12).
    pub fn type_id(&self) -> u8 {
        match self {
            NbtTag::Byte(_) => 1,
            NbtTag::Short(_) => 2,
            NbtTag::Int(_) => 3,
            NbtTag::Long(_) => 4,
            NbtTag::Float(_) => 5,
            NbtTag::Double(_) => 6,
            NbtTag::ByteArray(_) => 7,
            NbtTag::String(_) => 8,
            NbtTag::List(_) => 9,
            NbtTag::Compound(_) => 10,
            NbtTag::IntArray(_) => 11,
            NbtTag::LongArray(_) => 12,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NbtTag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[NbtTag]> {
        match self {
            NbtTag::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&NbtCompound> {
        match self {
            NbtTag::Compound(v) => Some(v),
            _ => None,
        }
    }

    /// Any integral tag widened to `i32`, the way vanilla `getInt` reads
    /// Byte/Short/Int interchangeably.
    pub fn as_i32_lossy(&self) -> Option<i32> {
        match self {
            NbtTag::Byte(v) => Some(i32::from(*v)),
            NbtTag::Short(v) => Some(i32::from(*v)),
            NbtTag::Int(v) => Some(*v),
            NbtTag::Long(v) => Some(*v as i32),
            _ => None,
        }
    }
}

impl From<NbtCompound> for NbtTag {
    fn from(value: NbtCompound) -> Self {
        NbtTag::Compound(value)
    }
}

impl From<String> for NbtTag {
    fn from(value: String) -> Self {
        NbtTag::String(value)
    }
}

impl From<&str> for NbtTag {
    fn from(value: &str) -> Self {
        NbtTag::String(value.to_owned())
    }
}

impl From<i32> for NbtTag {
    fn from(value: i32) -> Self {
        NbtTag::Int(value)
    }
}

/// Named children of a compound tag.
///
/// Lookups are typed: `get_int("CookTime")` returns `None` both when the key is
/// missing and when it holds some other tag type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NbtCompound {
    entries: HashMap<String, NbtTag>,
}

impl NbtCompound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a child, returning the previous value.
    pub fn put(&mut self, key: impl Into<String>, tag: impl Into<NbtTag>) -> Option<NbtTag> {
        self.entries.insert(key.into(), tag.into())
    }

    pub fn put_byte(&mut self, key: impl Into<String>, value: i8) {
        self.entries.insert(key.into(), NbtTag::Byte(value));
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i32) {
        self.entries.insert(key.into(), NbtTag::Int(value));
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), NbtTag::String(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&NbtTag> {
        self.entries.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(NbtTag::as_i32_lossy)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(NbtTag::as_str)
    }

    pub fn get_list(&self, key: &str) -> Option<&[NbtTag]> {
        self.get(key).and_then(NbtTag::as_list)
    }

    pub fn get_compound(&self, key: &str) -> Option<&NbtCompound> {
        self.get(key).and_then(NbtTag::as_compound)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, NbtTag> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type Item = (&'a String, &'a NbtTag);
    type IntoIter = hash_map::Iter<'a, String, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A root compound together with its (usually empty) name.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    pub name: String,
    pub compound: NbtCompound,
}

impl NbtRoot {
    pub fn new(name: impl Into<String>, compound: NbtCompound) -> Self {
        Self {
            name: name.into(),
            compound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_reject_other_types() {
        let mut c = NbtCompound::new();
        c.put_int("CookTime", 40);
        c.put_string("id", "miningmaster:gem_forge");

        assert_eq!(c.get_int("CookTime"), Some(40));
        assert_eq!(c.get_str("CookTime"), None);
        assert_eq!(c.get_str("id"), Some("miningmaster:gem_forge"));
        assert!(c.get_compound("id").is_none());
        assert!(c.get_int("missing").is_none());
    }

    #[test]
    fn get_int_widens_small_integers() {
        let mut c = NbtCompound::new();
        c.put_byte("Count", 3);
        c.put("Damage", NbtTag::Short(-2));
        assert_eq!(c.get_int("Count"), Some(3));
        assert_eq!(c.get_int("Damage"), Some(-2));
    }

    #[test]
    fn put_overwrites() {
        let mut c = NbtCompound::new();
        assert!(c.put("a", 1).is_none());
        assert_eq!(c.put("a", 2), Some(NbtTag::Int(1)));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn type_ids_match_wire_ids() {
        assert_eq!(NbtTag::Byte(0).type_id(), 1);
        assert_eq!(NbtTag::String(String::new()).type_id(), 8);
        assert_eq!(NbtTag::List(vec![]).type_id(), 9);
        assert_eq!(NbtTag::Compound(NbtCompound::new()).type_id(), 10);
        assert_eq!(NbtTag::LongArray(vec![]).type_id(), 12);
    }
}
