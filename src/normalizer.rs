//! Response normalization.
//!
//! Maps a raw licence API response (or the client's synthetic error object)
//! onto the fixed [`QueryRecord`] shape.

use crate::models::{QueryRecord, QueryStatus, NOT_AVAILABLE};
use serde_json::Value;

/// API code meaning "no filing found for this keyword".
pub const CODE_NOT_REGISTERED: i64 = 201;

/// Code used when the response carries no usable code.
pub const CODE_UNKNOWN: i64 = 999;

const NOT_REGISTERED_FILL: &str = "未备案";
const NO_DATA_FILL: &str = "无备案数据";
const UNKNOWN_MESSAGE: &str = "未知错误";

/// Normalize one API response for `domain`.
pub fn normalize(result: &Value, domain: &str) -> QueryRecord {
    if !is_truthy(result.get("success")) {
        let code = response_code(result);
        let message = result
            .get("msg")
            .map(value_to_text)
            .unwrap_or_else(|| UNKNOWN_MESSAGE.to_string());

        if code == CODE_NOT_REGISTERED {
            return QueryRecord::placeholder(domain, NOT_REGISTERED_FILL, QueryStatus::NotRegistered);
        }

        let fill = format!("查询失败({})", code);
        return QueryRecord::placeholder(domain, &fill, QueryStatus::Failed { code, message });
    }

    let first = result
        .get("data")
        .and_then(|data| data.get("list"))
        .and_then(Value::as_array)
        .and_then(|list| list.first());

    let Some(entry) = first else {
        return QueryRecord::placeholder(domain, NO_DATA_FILL, QueryStatus::NoData);
    };

    QueryRecord {
        domain: domain.to_string(),
        main_licence: field(entry, "mainLicence"),
        service_licence: field(entry, "serviceLicence"),
        unit_name: field(entry, "unitName"),
        nature_name: field(entry, "natureName"),
        service_name: field(entry, "serviceName"),
        verify_time: field(entry, "verifyTime"),
        unit_address: field(entry, "mainUnitAddress"),
        leader_name: field(entry, "leaderName"),
        status: QueryStatus::Success,
    }
}

/// Read the response code, accepting numbers and numeric strings.
fn response_code(result: &Value) -> i64 {
    match result.get("code") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(CODE_UNKNOWN),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(CODE_UNKNOWN),
        _ => CODE_UNKNOWN,
    }
}

fn field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .map(value_to_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Render a JSON scalar as cell text. Null becomes an empty cell.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture(name: &str) -> Value {
        let raw = match name {
            "success" => include_str!("../fixtures/success.json"),
            "not_registered" => include_str!("../fixtures/not_registered.json"),
            "empty_list" => include_str!("../fixtures/empty_list.json"),
            other => panic!("unknown fixture {}", other),
        };
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_success_uses_first_entry() {
        let record = normalize(&fixture("success"), "baidu.com");

        assert_eq!(record.status, QueryStatus::Success);
        assert_eq!(record.domain, "baidu.com");
        assert_eq!(record.main_licence, "京ICP证030173号");
        assert_eq!(record.service_licence, "京ICP证030173号-1");
        assert_eq!(record.unit_name, "北京百度网讯科技有限公司");
        assert_eq!(record.service_name, "百度");
        assert_eq!(record.unit_address, "北京市海淀区上地十街10号百度大厦");
        assert_eq!(record.leader_name, "梁志祥");
    }

    #[test]
    fn test_not_registered() {
        let record = normalize(&fixture("not_registered"), "nothing.cn");

        assert_eq!(record.status, QueryStatus::NotRegistered);
        assert_eq!(record.main_licence, "未备案");
        assert_eq!(record.nature_name, "未备案");
        assert_eq!(record.verify_time, "N/A");
        assert_eq!(record.status.to_string(), "未备案");
    }

    #[test]
    fn test_empty_list_is_no_data() {
        let record = normalize(&fixture("empty_list"), "example.cn");

        assert_eq!(record.status, QueryStatus::NoData);
        assert_eq!(record.unit_name, "无备案数据");
        assert_eq!(record.leader_name, "N/A");
    }

    #[test]
    fn test_success_without_data_is_no_data() {
        let record = normalize(&json!({"success": true}), "example.cn");
        assert_eq!(record.status, QueryStatus::NoData);

        let record = normalize(&json!({"success": true, "data": {"list": "oops"}}), "example.cn");
        assert_eq!(record.status, QueryStatus::NoData);
    }

    #[test]
    fn test_api_error_is_failed() {
        let record = normalize(
            &json!({"success": false, "code": 403, "msg": "Unauthorized AppCode"}),
            "example.cn",
        );

        assert_eq!(
            record.status,
            QueryStatus::Failed {
                code: 403,
                message: "Unauthorized AppCode".to_string()
            }
        );
        assert_eq!(record.main_licence, "查询失败(403)");
        assert_eq!(record.service_name, "查询失败(403)");
        assert_eq!(record.unit_address, "N/A");
        assert_eq!(record.status.to_string(), "失败: Unauthorized AppCode");
    }

    #[test]
    fn test_malformed_response_is_failed() {
        // No success flag, no code, no message.
        let record = normalize(&json!({"unexpected": [1, 2, 3]}), "example.cn");
        assert_eq!(
            record.status,
            QueryStatus::Failed {
                code: 999,
                message: "未知错误".to_string()
            }
        );

        let record = normalize(&json!("not an object"), "example.cn");
        assert_eq!(record.main_licence, "查询失败(999)");
    }

    #[test]
    fn test_string_code_is_parsed() {
        let record = normalize(&json!({"success": false, "code": "201"}), "example.cn");
        assert_eq!(record.status, QueryStatus::NotRegistered);
    }

    #[test]
    fn test_missing_and_null_fields() {
        let response = json!({
            "success": true,
            "data": {"list": [{"mainLicence": "沪ICP备12345678号", "leaderName": null, "verifyTime": 20240101}]}
        });
        let record = normalize(&response, "example.cn");

        assert_eq!(record.main_licence, "沪ICP备12345678号");
        assert_eq!(record.unit_name, "N/A");
        assert_eq!(record.leader_name, "");
        assert_eq!(record.verify_time, "20240101");
    }
}
