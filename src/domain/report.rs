//! Flattening of VMAF results into delimited text.

use super::jobs::JobResult;
use std::borrow::Cow;
use std::str::FromStr;
use thiserror::Error;

pub const REPORT_HEADER: [&str; 6] = ["jobname", "model", "width", "height", "bitrate", "score"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed rendition key '{0}', expected WIDTHxHEIGHT_BITRATE")]
pub struct MalformedRenditionKey(pub String);

/// Tabular output flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Tsv,
}

impl ReportFormat {
    pub fn delimiter(&self) -> char {
        match self {
            ReportFormat::Csv => ',',
            ReportFormat::Tsv => '\t',
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Tsv => "text/tab-separated-values; charset=utf-8",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "tsv" => Ok(ReportFormat::Tsv),
            other => Err(format!("unsupported format '{}', expected csv or tsv", other)),
        }
    }
}

/// Resolution and bitrate encoded in a rendition key such as `1920x1080_6000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendition {
    pub width: u32,
    pub height: u32,
    pub bitrate: u64,
}

impl FromStr for Rendition {
    type Err = MalformedRenditionKey;

    /// Anything after the bitrate (`_vmaf`, an extension) is ignored.
    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedRenditionKey(key.to_string());

        let (width, rest) = key.split_once('x').ok_or_else(malformed)?;
        let mut parts = rest.split('_');
        let height = parts.next().ok_or_else(malformed)?;
        let bitrate = parts.next().ok_or_else(malformed)?;

        Ok(Rendition {
            width: width.parse().map_err(|_| malformed())?,
            height: height.parse().map_err(|_| malformed())?,
            bitrate: bitrate.parse().map_err(|_| malformed())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub jobname: String,
    pub model: String,
    pub rendition: Rendition,
    pub score: f64,
}

impl ReportRow {
    fn join(&self, delimiter: char) -> String {
        [
            quote_field(&self.jobname, delimiter).into_owned(),
            quote_field(&self.model, delimiter).into_owned(),
            self.rendition.width.to_string(),
            self.rendition.height.to_string(),
            self.rendition.bitrate.to_string(),
            self.score.to_string(),
        ]
        .join(&delimiter.to_string())
    }
}

/// Wraps `field` in double quotes, doubling inner quotes, when it holds the
/// delimiter, a quote or a line break.
fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    if field.contains([delimiter, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Rows for `job_name`, optionally restricted to one model,
/// sorted by height descending then bitrate ascending.
pub fn report_rows(
    result: &JobResult,
    job_name: &str,
    model: Option<&str>,
) -> Result<Vec<ReportRow>, MalformedRenditionKey> {
    let Some(models) = result.get(job_name) else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for (model_name, scores) in models {
        if model.is_some_and(|wanted| wanted != model_name.as_str()) {
            continue;
        }
        for (key, score) in scores {
            rows.push(ReportRow {
                jobname: job_name.to_string(),
                model: model_name.clone(),
                rendition: key.parse()?,
                score: *score,
            });
        }
    }

    rows.sort_by(|a, b| {
        b.rendition
            .height
            .cmp(&a.rendition.height)
            .then(a.rendition.bitrate.cmp(&b.rendition.bitrate))
    });
    Ok(rows)
}

/// Header line plus one line per row, joined with `delimiter`.
pub fn format_report(
    result: &JobResult,
    job_name: &str,
    model: Option<&str>,
    delimiter: char,
) -> Result<String, MalformedRenditionKey> {
    let rows = report_rows(result, job_name, model)?;

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(REPORT_HEADER.join(&delimiter.to_string()));
    lines.extend(rows.iter().map(|row| row.join(delimiter)));
    Ok(lines.join("\n"))
}
