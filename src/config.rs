//! Configuration loaded from the environment.

use std::env;

/// Configuration for the AutoABR service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// AWS region for the S3 clients
    pub aws_region: String,
    /// Bucket holding VMAF result files
    pub score_bucket: String,
    /// Key prefix of the result files inside `score_bucket`
    pub score_prefix: String,
    /// Endpoint jobs are submitted to
    pub engine_url: String,
    /// Redis connection URL; the worker-state mirror is disabled when unset
    pub redis_url: Option<String>,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("127.0.0.1")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("3000")),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| String::from("eu-north-1")),
            score_bucket: env::var("SCORE_BUCKET").unwrap_or_else(|_| String::from("vmaf-files")),
            score_prefix: env::var("SCORE_PREFIX")
                .unwrap_or_else(|_| String::from("results/encoded-files")),
            engine_url: env::var("ENGINE_URL")
                .unwrap_or_else(|_| String::from("http://127.0.0.1:8080/jobs")),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            json_logs: env::var("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Root under which per-folder, per-model score locations live.
    pub fn score_root(&self) -> String {
        let prefix = self.score_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("s3://{}", self.score_bucket)
        } else {
            format!("s3://{}/{}", self.score_bucket, prefix)
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}
