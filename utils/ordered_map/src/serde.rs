use serde::de::{SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::OrderedMap;

impl<K, V> Serialize for OrderedMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.entries.serialize(serializer)
    }
}

struct OrderedMapVisitor<K, V>(core::marker::PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str("a sequence of entries for OrderedMap")
    }

    // Entries go through `put`, so unsorted or repeated keys still produce a
    // strictly ascending map. Later duplicates win.
    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut map = OrderedMap::with_capacity(seq.size_hint().unwrap_or(0));

        while let Some(entry) = seq.next_element::<Entry<K, V>>()? {
            let (key, value) = entry.into_pair();
            map.put(key, value);
        }

        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedMapVisitor(core::marker::PhantomData))
    }
}
