//! Golden encodings for stored text.
//!
//! Store files outlive the program that wrote them, so the text for a given
//! value must not drift between versions. Each vector pins one value to the
//! exact text found in the `value` column.

use std::collections::BTreeMap;

use vise_prefs_core::{decode, encode, Value};

/// A golden encoding.
#[derive(Debug, Clone)]
pub struct GoldenEncoding {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Builds the value.
    pub value: fn() -> Value,
    /// Exact stored text.
    pub expected: &'static str,
}

/// Get all golden encodings.
pub fn all_vectors() -> Vec<GoldenEncoding> {
    vec![
        GoldenEncoding {
            name: "integer zoom level",
            value: || Value::Int(150),
            expected: "150",
        },
        GoldenEncoding {
            name: "negative float",
            value: || Value::Float(-0.25),
            expected: "-0.25",
        },
        GoldenEncoding {
            name: "null",
            value: || Value::Null,
            expected: "null",
        },
        GoldenEncoding {
            name: "non-ascii text is not escaped",
            value: || Value::from("Größe ✓"),
            expected: "\"Größe ✓\"",
        },
        GoldenEncoding {
            name: "blob with nul and high bytes",
            value: || Value::from(&b"\x00\x01\xffdata"[..]),
            expected: "{\n  \"__class__\": \"bytearray\",\n  \"__value__\": \"AAH/ZGF0YQ==\"\n}",
        },
        GoldenEncoding {
            name: "empty blob",
            value: || Value::from(Vec::<u8>::new()),
            expected: "{\n  \"__class__\": \"bytearray\",\n  \"__value__\": \"\"\n}",
        },
        GoldenEncoding {
            name: "list of scalars",
            value: || Value::List(vec![Value::Int(1), Value::Bool(true), Value::from("x")]),
            expected: "[\n  1,\n  true,\n  \"x\"\n]",
        },
        GoldenEncoding {
            name: "map keys sorted",
            value: || {
                let mut map = BTreeMap::new();
                map.insert("width".to_string(), Value::Int(1280));
                map.insert("height".to_string(), Value::Int(800));
                Value::Map(map)
            },
            expected: "{\n  \"height\": 800,\n  \"width\": 1280\n}",
        },
        GoldenEncoding {
            name: "empty containers",
            value: || Value::List(vec![Value::List(vec![]), Value::Map(BTreeMap::new())]),
            expected: "[\n  [],\n  {}\n]",
        },
    ]
}

/// Check every vector in both directions. Returns the names that failed.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .into_iter()
        .filter(|v| {
            let value = (v.value)();
            let encoded = encode(&value).ok();
            let decoded = decode(v.expected).ok();
            encoded.as_deref() != Some(v.expected) || decoded.as_ref() != Some(&value)
        })
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_hold() {
        assert_eq!(verify_all_vectors(), Vec::<&str>::new());
    }

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }
}
