//! Lenient deserializers for fields the dashboard API types inconsistently.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Uint(u64),
}

/// Ids arrive as `"123"` or `123`; both become `"123"`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Uint(n) => n.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Tags {
    Joined(String),
    List(Vec<String>),
}

/// Tags arrive as a space separated string or as a list; `null` is empty.
pub(crate) fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::Joined(joined)) => joined.split_whitespace().map(str::to_string).collect(),
        Some(Tags::List(list)) => list,
        None => Vec::new(),
    })
}

/// `null` and a missing field both become an empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
