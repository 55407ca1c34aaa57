use super::parse_s3_url;
use crate::domain::jobs::ScoreEntry;
use crate::ports::scores::ScoreSource;
use crate::ports::storage::ContentStore;
use crate::ports::PortError;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// S3ContentStore implements ContentStore for `s3://bucket/key` URLs.
#[derive(Clone)]
pub struct S3ContentStore {
    client: Client,
}

impl S3ContentStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentStore for S3ContentStore {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PortError> {
        let (bucket, key) = parse_s3_url(url).ok_or_else(|| format!("not an s3 url: {}", url))?;
        debug!(bucket, key, "downloading from S3");

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        let body = resp.body.collect().await?;
        Ok(body.into_bytes().to_vec())
    }
}

/// S3ScoreSource reads VMAF result files stored under an S3 prefix.
#[derive(Clone)]
pub struct S3ScoreSource {
    client: Client,
}

impl S3ScoreSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, PortError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await?;

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| key.ends_with(".json"))
                    .map(str::to_owned),
            );

            match resp.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }
        Ok(keys)
    }
}

#[async_trait]
impl ScoreSource for S3ScoreSource {
    async fn scores(&self, location: &str) -> Result<Vec<ScoreEntry>, PortError> {
        let (bucket, prefix) =
            parse_s3_url(location).ok_or_else(|| format!("not an s3 url: {}", location))?;

        let mut entries = Vec::new();
        for key in self.list_keys(bucket, prefix).await? {
            let resp = self.client.get_object().bucket(bucket).key(&key).send().await?;
            let body = resp.body.collect().await?.into_bytes();

            match parse_vmaf_score(&body) {
                Ok(score) => entries.push(ScoreEntry {
                    filename: rendition_name(&key),
                    score,
                }),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable VMAF file"),
            }
        }
        debug!(location, count = entries.len(), "scores loaded");
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
struct VmafOutput {
    pooled_metrics: PooledMetrics,
}

#[derive(Debug, Deserialize)]
struct PooledMetrics {
    vmaf: PooledScore,
}

#[derive(Debug, Deserialize)]
struct PooledScore {
    mean: f64,
}

/// Pooled mean VMAF from a libvmaf JSON log.
pub fn parse_vmaf_score(body: &[u8]) -> Result<f64, serde_json::Error> {
    let output: VmafOutput = serde_json::from_slice(body)?;
    Ok(output.pooled_metrics.vmaf.mean)
}

/// `results/job1/HD/1920x1080_6000_vmaf.json` -> `1920x1080_6000`
pub fn rendition_name(key: &str) -> String {
    let stem = Path::new(key)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| key.to_string());
    stem.strip_suffix("_vmaf").map(str::to_owned).unwrap_or(stem)
}
