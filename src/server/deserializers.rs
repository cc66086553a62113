use serde::{Deserialize, Deserializer};

// `?page=abc` falls back to the default page instead of failing the request
pub fn deserialize_lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

// the front end keys categories by their id as object keys, so it sends the
// ids back as strings; numbers are accepted as well
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawId")]
pub struct LenientId(pub i64);

impl TryFrom<RawId> for LenientId {
    type Error = String;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        match value {
            RawId::Int(v) => Ok(LenientId(v)),
            RawId::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(LenientId(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}
