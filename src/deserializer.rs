//! Serde deserializer implementation for configobj documents
//!
//! Sections deserialize as maps (or structs), entries as strings. Values are
//! only coerced when the target type asks for it: a `u16` field parses its
//! string, a `bool` field accepts `true/false/yes/no/on/off/1/0`. Lists are
//! not decomposed, so sequence targets are a type mismatch.

use crate::document::ConfigObj;
use crate::error::{ConfigObjError, SerdeError};
use crate::section::Section;
use indexmap::map::Iter;
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    self, Deserialize, DeserializeOwned, DeserializeSeed, Deserializer, IntoDeserializer, Visitor,
};
use std::io::Read;
use std::str::FromStr;

/// Deserializer over one section and everything below it
pub struct SectionDeserializer<'de> {
    section: Section<'de>,
}

impl<'de> SectionDeserializer<'de> {
    pub fn new(section: Section<'de>) -> Self {
        Self { section }
    }
}

impl<'de> Deserializer<'de> for SectionDeserializer<'de> {
    type Error = ConfigObjError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(SectionMapAccess::new(self.section))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Yields entries first, then child sections
struct SectionMapAccess<'de> {
    section: Section<'de>,
    entries: Iter<'de, String, String>,
    children: Box<dyn Iterator<Item = (&'de str, Section<'de>)> + 'de>,
    remaining_sections: usize,
    pending: Option<Pending<'de>>,
}

enum Pending<'de> {
    Value { key: &'de str, value: &'de str },
    Section(Section<'de>),
}

impl<'de> SectionMapAccess<'de> {
    fn new(section: Section<'de>) -> Self {
        Self {
            section,
            entries: section.all_values().iter(),
            children: Box::new(section.sections()),
            remaining_sections: section.sections().count(),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for SectionMapAccess<'de> {
    type Error = ConfigObjError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let key = if let Some((key, value)) = self.entries.next() {
            self.pending = Some(Pending::Value {
                key: key.as_str(),
                value: value.as_str(),
            });
            key.as_str()
        } else if let Some((name, child)) = self.children.next() {
            if self.section.contains_key(name) {
                return Err(SerdeError::NameCollision {
                    name: name.to_string(),
                    path: self.section.dotted_path(),
                }
                .into());
            }
            self.remaining_sections -= 1;
            self.pending = Some(Pending::Section(child));
            name
        } else {
            return Ok(None);
        };
        seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some(Pending::Value { key, value }) => seed.deserialize(ValueDeserializer {
                section: self.section,
                key,
                value,
            }),
            Some(Pending::Section(child)) => seed.deserialize(SectionDeserializer::new(child)),
            None => Err(de::Error::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len() + self.remaining_sections)
    }
}

/// Deserializer for a single string entry
struct ValueDeserializer<'de> {
    section: Section<'de>,
    key: &'de str,
    value: &'de str,
}

impl<'de> ValueDeserializer<'de> {
    fn mismatch(&self, expected: &str) -> ConfigObjError {
        let mut path = self.section.dotted_path();
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(self.key);
        ConfigObjError::Serde(SerdeError::TypeMismatch {
            expected: expected.to_string(),
            found: self.value.to_string(),
            path,
        })
    }

    fn parse<T: FromStr>(&self, expected: &str) -> Result<T, ConfigObjError> {
        self.value.trim().parse().map_err(|_| self.mismatch(expected))
    }

    fn parse_bool(&self) -> Result<bool, ConfigObjError> {
        match self.value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.mismatch("boolean")),
        }
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                let parsed: $ty = self.parse(stringify!($ty))?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = ConfigObjError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(self.parse_bool()?)
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.mismatch("single character")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_bytes(self.value.as_bytes())
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // a present key is always Some, even when empty
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.mismatch("empty value"))
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(self.mismatch("sequence (list values are not decomposed)"))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        Err(self.mismatch("section"))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let variant: de::value::StrDeserializer<'_, ConfigObjError> =
            self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Deserializes a section (and its subtree) into a Rust type
pub fn from_section<'de, T>(section: Section<'de>) -> Result<T, ConfigObjError>
where
    T: Deserialize<'de>,
{
    T::deserialize(SectionDeserializer::new(section))
}

/// Parses configobj text and deserializes the whole document
pub fn from_str<T>(s: &str) -> Result<T, ConfigObjError>
where
    T: DeserializeOwned,
{
    let document = ConfigObj::parse_str(s);
    from_section(document.root())
}

/// Reads, parses and deserializes a whole stream
pub fn from_reader<R, T>(reader: R) -> Result<T, ConfigObjError>
where
    R: Read,
    T: DeserializeOwned,
{
    let document = ConfigObj::from_reader(reader)?;
    from_section(document.root())
}

impl ConfigObj {
    /// Deserializes one top-level section by name
    pub fn section_as<'de, T>(&'de self, name: &str) -> Result<T, ConfigObjError>
    where
        T: Deserialize<'de>,
    {
        let section = self.section(name).ok_or_else(|| SerdeError::MissingSection {
            name: name.to_string(),
            path: String::new(),
        })?;
        from_section(section)
    }
}
