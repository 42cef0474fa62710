//! Output file generation.
//!
//! The default output is a spreadsheet-friendly CSV (UTF-8 with BOM, CRLF
//! rows, Chinese headers). A JSON report carrying run metadata and the
//! summary is available as an alternative.

use crate::models::{BatchReport, QueryRecord, FIELD_NAMES};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Byte order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Generate the CSV table for a set of records.
pub fn generate_csv_report(records: &[QueryRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        bail!("无结果可保存");
    }

    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(&mut buffer);

        writer.write_record(FIELD_NAMES)?;
        for record in records {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;
    }

    Ok(buffer)
}

/// Write the CSV table to a file.
pub fn write_csv_report(records: &[QueryRecord], path: &Path) -> Result<()> {
    let content = generate_csv_report(records)?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &BatchReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &BatchReport, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchMetadata, QueryStatus, QuerySummary};
    use chrono::Utc;

    fn create_test_records() -> Vec<QueryRecord> {
        vec![
            QueryRecord {
                domain: "baidu.com".to_string(),
                main_licence: "京ICP证030173号".to_string(),
                service_licence: "京ICP证030173号-1".to_string(),
                unit_name: "北京百度网讯科技有限公司".to_string(),
                nature_name: "企业".to_string(),
                service_name: "百度, 搜索".to_string(),
                verify_time: "2023-06-13".to_string(),
                unit_address: "北京市海淀区".to_string(),
                leader_name: "梁志祥".to_string(),
                status: QueryStatus::Success,
            },
            QueryRecord::placeholder("nothing.cn", "未备案", QueryStatus::NotRegistered),
            QueryRecord::placeholder(
                "broken.cn",
                "查询失败(999)",
                QueryStatus::Failed {
                    code: 999,
                    message: "空响应".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_csv_has_bom_and_headers() {
        let bytes = generate_csv_report(&create_test_records()).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let header = text.split("\r\n").next().unwrap();
        assert_eq!(
            header,
            "域名,主体备案号,服务备案号,主办单位,单位性质,服务名称,审核时间,备案地址,负责人,查询状态"
        );
    }

    #[test]
    fn test_csv_one_row_per_record() {
        let records = create_test_records();
        let bytes = generate_csv_report(&records).unwrap();

        let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), records.len());
        assert_eq!(&rows[0][0], "baidu.com");
        assert_eq!(&rows[0][5], "百度, 搜索");
        assert_eq!(&rows[0][9], "成功");
        assert_eq!(&rows[1][1], "未备案");
        assert_eq!(&rows[2][9], "失败: 空响应");
    }

    #[test]
    fn test_csv_empty_is_error() {
        let err = generate_csv_report(&[]).unwrap_err();
        assert_eq!(err.to_string(), "无结果可保存");
    }

    #[test]
    fn test_write_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icp_results.csv");

        write_csv_report(&create_test_records(), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(UTF8_BOM));
    }

    #[test]
    fn test_generate_json_report() {
        let records = create_test_records();
        let report = BatchReport {
            metadata: BatchMetadata {
                api_url: "http://localhost/app/licence/query".to_string(),
                query_date: Utc::now(),
                domains_queried: records.len(),
                duration_seconds: 1.5,
            },
            summary: QuerySummary::from_records(&records),
            records,
        };

        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"api_url\""));
        assert!(json.contains("\"records\""));
        assert!(json.contains("\"not_registered\": 1"));
        assert!(json.contains("北京百度网讯科技有限公司"));
    }
}
