//! Errors raised inside the licence query client.
//!
//! These never leave the client: [`crate::client::IcpClient::query`] turns
//! them into the API's own error shape so each domain still gets a record.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("请求异常: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("空响应")]
    EmptyResponse,

    #[error("空响应 (HTTP {status}{})", suffix(.gateway_message))]
    Gateway {
        status: u16,
        gateway_message: Option<String>,
    },
}

fn suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}
