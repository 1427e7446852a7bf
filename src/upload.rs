//! Publishing analysis reports to S3.

use std::io::Write;

use anyhow::Result;
use aws_sdk_s3::primitives::ByteStream;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::info;

/// Default object key for a report generated on `date`.
pub fn report_key(date: chrono::NaiveDate, gzip: bool) -> String {
    let key = format!("reports/date={}/report.json", date.format("%Y-%m-%d"));
    if gzip { format!("{key}.gz") } else { key }
}

/// Serializes `value` to JSON, optionally gzip-compressed.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(value)?;
    if !gzip {
        return Ok(body);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    Ok(encoder.finish()?)
}

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
#[tracing::instrument(skip(client, value))]
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> Result<()> {
    let body = encode_json(value, gzip)?;
    let bytes = body.len();

    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type("application/json");
    if gzip {
        req = req.content_encoding("gzip");
    }
    req.send().await?;

    info!(bytes, "Report uploaded to S3");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_report_key() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(report_key(date, false), "reports/date=2024-03-04/report.json");
        assert_eq!(report_key(date, true), "reports/date=2024-03-04/report.json.gz");
    }

    #[test]
    fn test_encode_json_gzip() {
        let value = serde_json::json!({ "system_ontime_pct": 82.5 });

        let plain = encode_json(&value, false).unwrap();
        assert_eq!(plain, br#"{"system_ontime_pct":82.5}"#);

        let compressed = encode_json(&value, true).unwrap();
        let mut decoded = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, plain);
    }
}
