//! AWS adapters: S3-backed content store and score source.

pub mod s3;

pub use s3::{S3ContentStore, S3ScoreSource};

/// Split `s3://bucket/some/key` into `("bucket", "some/key")`.
/// The key may be empty for a bucket-level URL.
pub fn parse_s3_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("s3://")?;
    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return None;
    }
    Some((bucket, key))
}
