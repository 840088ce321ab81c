use serde::{Deserialize, Deserializer};

pub mod financial;
pub mod oauth;
pub mod users;

/// Distinguishes "field absent" from "field present but null": absent stays
/// `None`, an explicit null becomes `Some(None)`. Lets PUT payloads clear a
/// nullable column.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
