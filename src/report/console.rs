//! Console progress and summary lines.

use crate::models::{QueryRecord, QueryStatus, QuerySummary};

/// Line announcing the query for the `index`-th (1-based) domain.
pub fn query_line(index: usize, total: usize, domain: &str) -> String {
    format!("[{:03}/{:03}] 正在查询: {}", index, total, domain)
}

/// Line describing the outcome of one query.
pub fn status_line(record: &QueryRecord) -> String {
    match &record.status {
        QueryStatus::Success => format!(
            "     状态: {} 成功 | 备案号: {} | 主办单位: {}",
            record.status.emoji(),
            record.main_licence,
            record.unit_name
        ),
        QueryStatus::NotRegistered => format!("     状态: {} 未备案", record.status.emoji()),
        status => format!("     状态: {}  {}", status.emoji(), status),
    }
}

/// Print the end-of-run statistics.
pub fn print_summary(summary: &QuerySummary) {
    println!("\n📊 查询统计:");
    println!("   成功查询: {}", summary.success);
    println!("   未备案: {}", summary.not_registered);
    println!("   查询失败: {}", summary.failed);
    println!("   总计: {}", summary.total);
}

/// Print one record field by field, for single-domain debugging.
pub fn print_record(record: &QueryRecord) {
    for (name, value) in crate::models::FIELD_NAMES.iter().zip(record.to_row()) {
        println!("  {}: {}", name, value);
    }
}
