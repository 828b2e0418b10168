//! Backend 公共工具函数

use std::time::Duration;

use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::types::APEX_MARKER;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// 将完整域名转换为相对名称
/// 如: "www.example.com" + "example.com" -> "www"
/// 如: "example.com" + "example.com" -> "@"
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone || full.is_empty() {
        APEX_MARKER.to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// 将相对名称转换为完整域名
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "@" + "example.com" -> "example.com"
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == APEX_MARKER || relative_name.is_empty() {
        zone
    } else {
        format!("{}.{zone}", relative_name.to_ascii_lowercase())
    }
}

// ============ 记录 ID ============

/// 为没有原生记录 ID 的 Backend 生成确定性 ID。
///
/// 取 (hostname, type, destination) 的 SHA-256 前 16 个十六进制字符。
/// 同一条记录在多次列举之间 ID 稳定。
pub fn synthetic_record_id(hostname: &str, record_type: &str, destination: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(hostname.as_bytes());
    hasher.update(b"|");
    hasher.update(record_type.as_bytes());
    hasher.update(b"|");
    hasher.update(destination.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}
