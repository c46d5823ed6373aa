// used for `#[serde(skip_serializing_if = "is_false")]` attrs
#[inline]
pub fn is_false(b: &bool) -> bool {
    !*b
}

/// Serde helpers for the REST API's int64 encoding.
///
/// Integers are written as JSON strings, and read back from either strings or
/// plain JSON numbers, since the API isn't consistent about which it returns.
pub mod int64 {
    use std::fmt;
    use std::marker::PhantomData;
    use std::str::FromStr;

    use serde::de::{self, Unexpected};

    pub trait Int64: itoa::Integer + FromStr + TryFrom<i64> + TryFrom<u64> + Copy {}

    impl<T> Int64 for T where T: itoa::Integer + FromStr + TryFrom<i64> + TryFrom<u64> + Copy {}

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Int64,
        S: serde::Serializer,
    {
        let mut buf = itoa::Buffer::new();
        serializer.serialize_str(buf.format(*value))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Int64,
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(Int64Visitor(PhantomData))
    }

    struct Int64Visitor<T>(PhantomData<fn() -> T>);

    impl<'de, T: Int64> de::Visitor<'de> for Int64Visitor<T> {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer, or a string containing an integer")
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            T::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            T::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    pub mod optional {
        use std::fmt;
        use std::marker::PhantomData;

        use serde::de;

        use super::{Int64, Int64Visitor};

        pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
        where
            T: Int64,
            S: serde::Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
        where
            T: Int64,
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_option(OptionalVisitor(PhantomData))
        }

        struct OptionalVisitor<T>(PhantomData<fn() -> T>);

        impl<'de, T: Int64> de::Visitor<'de> for OptionalVisitor<T> {
            type Value = Option<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional integer, or a string containing an integer")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer
                    .deserialize_any(Int64Visitor(PhantomData))
                    .map(Some)
            }
        }
    }
}
