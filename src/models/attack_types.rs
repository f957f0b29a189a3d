// Category -> count mapping, kept in the order the backend emitted it.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Attack category counts. Decoding keeps JSON object order; `null` decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackTypes(Vec<(String, u64)>);

impl AttackTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a category. A new category goes to the end; an existing one keeps its slot.
    pub fn insert(&mut self, category: impl Into<String>, count: u64) {
        let category = category.into();
        match self.0.iter_mut().find(|(name, _)| *name == category) {
            Some((_, c)) => *c = count,
            None => self.0.push((category, count)),
        }
    }

    pub fn get(&self, category: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, c)| (name.as_str(), *c))
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, c)| *c).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for AttackTypes {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut out = AttackTypes::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

impl Serialize for AttackTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

struct AttackTypesVisitor;

impl<'de> Visitor<'de> for AttackTypesVisitor {
    type Value = AttackTypes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of attack category to count")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = AttackTypes(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            out.insert(name, count);
        }
        Ok(out)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(AttackTypes::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(AttackTypes::new())
    }
}

impl<'de> Deserialize<'de> for AttackTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AttackTypesVisitor)
    }
}
