//! Deterministic cache key derivation.
//!
//! A key is three segments joined by [`SEGMENT_DELIMITER`]:
//!
//! 1. image references, each cut to its trailing
//!    [`IMAGE_FINGERPRINT_CHARS`] characters, sorted, joined by `,`
//! 2. symptoms, sorted, joined by `|`
//! 3. the first [`DESCRIPTION_PREFIX_CHARS`] characters of the description
//!
//! Sorting makes the key independent of input order. The image fingerprint
//! is positional, not a content hash: two references sharing a 20-character
//! suffix collide. Lengths count `char`s, never bytes, so multi-byte text
//! is never split.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::InferenceRequest;

pub const SEGMENT_DELIMITER: &str = "::";
pub const IMAGE_FINGERPRINT_CHARS: usize = 20;
pub const DESCRIPTION_PREFIX_CHARS: usize = 50;

/// Derived cache key. Not stored as its own entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&InferenceRequest> for CacheKey {
    fn from(request: &InferenceRequest) -> Self {
        build_key(&request.images, &request.symptoms, &request.description)
    }
}

/// Build the cache key for a set of inputs. Total; never fails.
pub fn build_key<I, S>(images: &[I], symptoms: &[S], description: &str) -> CacheKey
where
    I: AsRef<str>,
    S: AsRef<str>,
{
    let mut fingerprints: Vec<&str> = images
        .iter()
        .map(|image| trailing_chars(image.as_ref(), IMAGE_FINGERPRINT_CHARS))
        .collect();
    fingerprints.sort_unstable();

    let mut sorted_symptoms: Vec<&str> = symptoms.iter().map(AsRef::as_ref).collect();
    sorted_symptoms.sort_unstable();

    CacheKey(format!(
        "{}{SEGMENT_DELIMITER}{}{SEGMENT_DELIMITER}{}",
        fingerprints.join(","),
        sorted_symptoms.join("|"),
        leading_chars(description, DESCRIPTION_PREFIX_CHARS),
    ))
}

fn trailing_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

fn leading_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
