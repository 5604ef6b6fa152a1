use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Accept an identifier sent either as a JSON string or a JSON number.
///
/// Vocabulary items use string keys while suggestions and translations
/// are numbered by the backend; the client treats them all as opaque strings.
pub fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::de_id;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "de_id")]
        id: String,
    }

    #[test]
    fn numbers_and_strings_decode_to_the_same_id() {
        let numeric: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let text: Holder = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.id, text.id);
    }
}
