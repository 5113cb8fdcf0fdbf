//! Serde helpers for types whose natural Rust representation does not map
//! cleanly onto BSON.

/// De/serialise a `BTreeMap` with integer keys as a BSON map with
/// stringified keys. BSON map keys must be strings; a `BTreeMap` keeps the
/// entries in key order either way.
pub mod serde_string_map {
    use std::{collections::BTreeMap, fmt, marker::PhantomData, str::FromStr};

    use serde::{
        de::{MapAccess, Visitor},
        ser::SerializeMap,
        Deserialize, Deserializer, Serialize, Serializer,
    };

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: fmt::Display,
        V: Serialize,
        S: Serializer,
    {
        let mut serializer = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in map {
            serializer.serialize_entry(&key.to_string(), value)?;
        }
        serializer.end()
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: FromStr + Ord,
        K::Err: fmt::Display,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        struct StringMapVisitor<K, V> {
            marker: PhantomData<(K, V)>,
        }

        impl<'de, K, V> Visitor<'de> for StringMapVisitor<K, V>
        where
            K: FromStr + Ord,
            K::Err: fmt::Display,
            V: Deserialize<'de>,
        {
            type Value = BTreeMap<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map with stringified keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = BTreeMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    let key = key.parse().map_err(serde::de::Error::custom)?;
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(StringMapVisitor {
            marker: PhantomData,
        })
    }
}

/// De/serialise an `Option<chrono::DateTime<Utc>>` as an optional native
/// BSON datetime rather than serde's default representation.
pub mod serde_option_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.map(bson::DateTime::from_chrono).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bson::DateTime>::deserialize(deserializer)?.map(bson::DateTime::to_chrono))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{DateTime, TimeZone, Utc};
    use mongodb::bson::{self, doc, Bson};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct StringMapDoc {
        #[serde(with = "super::serde_string_map")]
        entries: BTreeMap<u32, String>,
    }

    #[test]
    fn integer_keys_become_strings() {
        let value = StringMapDoc {
            entries: BTreeMap::from([(1, "one".to_string()), (12, "twelve".to_string())]),
        };
        let document = bson::to_document(&value).unwrap();
        let entries = document.get_document("entries").unwrap();
        assert_eq!(entries.get_str("1").unwrap(), "one");
        assert_eq!(entries.get_str("12").unwrap(), "twelve");

        let restored: StringMapDoc = bson::from_document(document).unwrap();
        assert_eq!(restored, value);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct StampDoc {
        #[serde(with = "super::serde_option_datetime")]
        stamp: Option<DateTime<Utc>>,
    }

    #[test]
    fn optional_datetimes_use_native_bson() {
        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let document = bson::to_document(&StampDoc { stamp: Some(stamp) }).unwrap();
        assert!(matches!(document.get("stamp"), Some(Bson::DateTime(_))));

        let document = bson::to_document(&StampDoc { stamp: None }).unwrap();
        assert_eq!(document.get("stamp"), Some(&Bson::Null));

        let restored: StampDoc = bson::from_document(doc! {"stamp": Bson::Null}).unwrap();
        assert_eq!(restored, StampDoc { stamp: None });
    }
}
