// SPDX-License-Identifier: CC0-1.0

use std::collections::HashSet;
use std::fmt;

use log::debug;
use num_bigint::BigInt;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};

use crate::recovery::{Error, Share, ShareSet};

const KEYS_FIELD: &str = "keys";

/// Threshold parameters under the `keys` member
#[derive(Debug, serde::Deserialize)]
struct Keys {
    n: usize,
    k: usize,
}

/// A share as written in the document, before radix decoding
#[derive(Debug, serde::Deserialize)]
struct RawShare {
    base: String,
    value: String,
}

/// Top-level document with share members kept in document order
#[derive(Debug)]
struct Document {
    keys: Option<Keys>,
    shares: Vec<(i64, RawShare)>,
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with a \"keys\" member and integer-named shares")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Document, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut keys = None;
        let mut shares = Vec::new();
        let mut seen = HashSet::new();

        while let Some(name) = map.next_key::<String>()? {
            if name == KEYS_FIELD {
                if keys.is_some() {
                    return Err(de::Error::duplicate_field(KEYS_FIELD));
                }
                keys = Some(map.next_value()?);
            } else if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                let key: i64 = name
                    .parse()
                    .map_err(|_| {
                        <A::Error as de::Error>::custom(format!("share key {name} out of range"))
                    })?;
                if !seen.insert(key) {
                    return Err(de::Error::custom(format!("duplicate share key {key}")));
                }
                shares.push((key, map.next_value()?));
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(Document { keys, shares })
    }
}

// Decodes `value` written in `base`, ignoring case and surrounding whitespace.
fn decode_value(key: i64, raw: &RawShare) -> Result<BigInt, Error> {
    let base: u32 = raw
        .base
        .trim()
        .parse()
        .map_err(|_| Error::MalformedInput(format!("share {key}: invalid base {:?}", raw.base)))?;
    if !(2..=36).contains(&base) {
        return Err(Error::MalformedInput(format!(
            "share {key}: base {base} outside 2..=36"
        )));
    }

    let value = raw.value.trim();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(Error::MalformedInput(format!(
            "share {key}: {:?} is not a base-{base} number",
            raw.value
        )));
    }

    BigInt::parse_bytes(value.as_bytes(), base).ok_or_else(|| {
        Error::MalformedInput(format!(
            "share {key}: {:?} is not a base-{base} number",
            raw.value
        ))
    })
}

/// Decodes a JSON share document.
///
/// The document holds a `keys` object with the threshold parameters `n` and `k`,
/// and one member per share named by its integer key:
///
/// ```json
/// {
///   "keys": { "n": 4, "k": 3 },
///   "1": { "base": "10", "value": "4" },
///   "2": { "base": "2", "value": "111" }
/// }
/// ```
///
/// Each share's x-coordinate is its key. Shares keep document order; other
/// members are ignored.
pub fn decode(input: &str) -> Result<ShareSet, Error> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let document: Document =
        serde_json::from_str(input).map_err(|e| Error::MalformedInput(e.to_string()))?;
    let keys = document
        .keys
        .ok_or_else(|| Error::MalformedInput("missing \"keys\" object".to_string()))?;

    let mut shares = Vec::with_capacity(document.shares.len());
    for (key, raw) in &document.shares {
        shares.push(Share::new(*key, decode_value(*key, raw)?));
    }

    debug!(
        "decoded {} share(s) with n = {}, k = {}",
        shares.len(),
        keys.n,
        keys.k
    );

    Ok(ShareSet {
        n: keys.n,
        k: keys.k,
        shares,
    })
}
