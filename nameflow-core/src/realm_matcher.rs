//! Realm 作用域匹配
//!
//! 判断一个字面 DNS 主机名是否落在 Realm 声明的作用域内。
//! 所有比较大小写不敏感，末尾的点会被去掉。

use nameflow_backend::{APEX_MARKER, Record};

use crate::types::{Realm, RealmType};

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Realm 的完整限定名：`value.domain`，value 为空时即 `domain`
#[must_use]
pub fn realm_fqdn(realm: &Realm) -> String {
    let domain = normalize(&realm.domain);
    if realm.value.is_empty() {
        domain
    } else {
        format!("{}.{domain}", normalize(&realm.value))
    }
}

/// 主机名是否落在 Realm 的作用域内
///
/// - `host`：仅与 fqdn 精确相等。
/// - `subdomain`：与 fqdn 相等，或以 `.fqdn` 结尾。
/// - `subdomain_only`：以 `.fqdn` 结尾且不等于 fqdn 本身。
///   value 为空时要排除的「apex」就是裸域名。
#[must_use]
pub fn matches(realm: &Realm, hostname: &str) -> bool {
    let hostname = normalize(hostname);
    let fqdn = realm_fqdn(realm);
    let suffix = format!(".{fqdn}");

    match realm.realm_type {
        RealmType::Host => hostname == fqdn,
        RealmType::Subdomain => hostname == fqdn || hostname.ends_with(&suffix),
        RealmType::SubdomainOnly => hostname != fqdn && hostname.ends_with(&suffix),
    }
}

/// 将相对主机名（`@` = apex）展开成完整主机名后做匹配
#[must_use]
pub fn matches_relative(realm: &Realm, relative_hostname: &str) -> bool {
    matches(realm, &to_full_hostname(realm, relative_hostname))
}

/// 批量过滤：只保留落在 Realm 作用域内的记录
///
/// 记录的主机名是相对区域的（`@` 表示裸区域名）。
#[must_use]
pub fn filter_records(realm: &Realm, records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| matches_relative(realm, &record.hostname))
        .collect()
}

fn to_full_hostname(realm: &Realm, relative: &str) -> String {
    let domain = normalize(&realm.domain);
    if relative == APEX_MARKER || relative.is_empty() {
        domain
    } else {
        format!("{}.{domain}", normalize(relative))
    }
}
