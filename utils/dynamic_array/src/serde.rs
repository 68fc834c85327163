use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize};

use crate::DynamicArray;

impl<T: Serialize> Serialize for DynamicArray<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self.iter() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

struct DynamicArrayVisitor<T>(core::marker::PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for DynamicArrayVisitor<T> {
    type Value = DynamicArray<T>;

    fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
        formatter.write_str("a sequence of items for DynamicArray")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut array = DynamicArray::with_capacity(seq.size_hint().unwrap_or(0));

        while let Some(item) = seq.next_element::<T>()? {
            array.push(item);
        }

        Ok(array)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DynamicArray<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(DynamicArrayVisitor(core::marker::PhantomData))
    }
}
