//! RFC 3339 timestamps for response payloads, including cached ones.

use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn serialize<S>(stamp: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	stamp
		.format(&Rfc3339)
		.map_err(S::Error::custom)
		.and_then(|text| serializer.serialize_str(&text))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let text = String::deserialize(deserializer)?;

	OffsetDateTime::parse(&text, &Rfc3339).map_err(D::Error::custom)
}

pub mod option {
	use super::*;

	pub fn serialize<S>(stamp: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match stamp {
			Some(stamp) =>
				stamp
					.format(&Rfc3339)
					.map_err(S::Error::custom)
					.and_then(|text| serializer.serialize_some(&text)),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<String>::deserialize(deserializer)?
			.map(|text| OffsetDateTime::parse(&text, &Rfc3339))
			.transpose()
			.map_err(D::Error::custom)
	}
}
