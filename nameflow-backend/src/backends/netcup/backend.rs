//! netcup `DnsBackend` 实现
//!
//! 所有变更走同一条路径：取回整个记录集 → 在内存中计算新集合 →
//! `updateDnsRecords` 整体提交。集合计算抽成纯函数便于单测。

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::json;

use crate::backends::common::normalize_domain_name;
use crate::error::{BackendError, Result};
use crate::traits::{BackendErrorMapper, DnsBackend, ErrorContext};
use crate::types::{
    APEX_MARKER, BackendKind, BackendMetadata, CredentialField, FieldType, MutationStrategy,
    NewRecord, Record, RecordType, Zone, ZoneInfo,
};

use super::types::{NetcupDnsRecord, NetcupRecordsData, NetcupZoneData};
use super::{NETCUP_DEFAULT_TTL, NetcupBackend};

// ============ 集合计算（纯函数） ============

/// 追加一条新记录，其余记录原样保留
fn set_with_created(records: &[NetcupDnsRecord], new: NetcupDnsRecord) -> Vec<NetcupDnsRecord> {
    let mut set = records.to_vec();
    set.push(new);
    set
}

/// 以 `replacement` 替换指定 id 的记录（保留原 id 与位置），id 不存在时返回 `None`
fn set_with_replaced(
    records: &[NetcupDnsRecord],
    record_id: &str,
    mut replacement: NetcupDnsRecord,
) -> Option<Vec<NetcupDnsRecord>> {
    let index = records
        .iter()
        .position(|r| r.id.as_deref() == Some(record_id))?;
    replacement.id = Some(record_id.to_string());
    let mut set = records.to_vec();
    set[index] = replacement;
    Some(set)
}

/// 将指定 id 的记录置 `deleterecord`，其余记录原样保留（顺序、内容不变），
/// id 不存在时返回 `None`
fn set_without(records: &[NetcupDnsRecord], record_id: &str) -> Option<Vec<NetcupDnsRecord>> {
    let index = records
        .iter()
        .position(|r| r.id.as_deref() == Some(record_id))?;
    let mut set = records.to_vec();
    set[index].deleterecord = Some(true);
    Some(set)
}

// ============ 记录转换 ============

/// netcup 的 priority 为字符串，非 MX/SRV 记录固定上报 `"0"`
fn parse_priority(raw: Option<&str>, record_type: RecordType) -> Option<u16> {
    match record_type {
        RecordType::Mx | RecordType::Srv => raw.and_then(|p| p.parse().ok()),
        _ => None,
    }
}

/// 原生记录转规范形状，记录类型无法识别时返回 `None`
fn to_canonical(record: &NetcupDnsRecord, zone_ttl: u32) -> Option<Record> {
    let record_type = RecordType::from_str(&record.record_type).ok()?;
    let hostname = if record.hostname.is_empty() {
        APEX_MARKER.to_string()
    } else {
        record.hostname.to_ascii_lowercase()
    };
    Some(Record {
        id: record.id.clone().unwrap_or_default(),
        hostname,
        record_type,
        destination: record.destination.clone(),
        priority: parse_priority(record.priority.as_deref(), record_type),
        ttl: zone_ttl,
    })
}

/// 规范 payload 转原生记录（无 id，由 netcup 在提交后分配）
fn to_native(record: &NewRecord) -> NetcupDnsRecord {
    NetcupDnsRecord {
        id: None,
        hostname: record.hostname.clone(),
        record_type: record.record_type.as_str().to_string(),
        priority: Some(record.priority.unwrap_or(0).to_string()),
        destination: record.destination.clone(),
        deleterecord: None,
    }
}

/// 按 (hostname, type, destination) 判断集合中是否已有等价记录
fn contains_equivalent(records: &[NetcupDnsRecord], candidate: &NetcupDnsRecord) -> bool {
    records.iter().any(|r| {
        r.deleterecord != Some(true)
            && r.hostname.eq_ignore_ascii_case(&candidate.hostname)
            && r.record_type.eq_ignore_ascii_case(&candidate.record_type)
            && r.destination == candidate.destination
    })
}

// ============ API 调用封装 ============

impl NetcupBackend {
    fn zone_context(zone: &str) -> ErrorContext {
        ErrorContext {
            zone: Some(zone.to_string()),
            ..Default::default()
        }
    }

    async fn fetch_zone_data(&self, zone: &str) -> Result<NetcupZoneData> {
        self.request(
            "infoDnsZone",
            json!({ "domainname": zone }),
            Self::zone_context(zone),
        )
        .await
    }

    async fn fetch_record_set(&self, zone: &str) -> Result<Vec<NetcupDnsRecord>> {
        let data: NetcupRecordsData = self
            .request(
                "infoDnsRecords",
                json!({ "domainname": zone }),
                Self::zone_context(zone),
            )
            .await?;
        Ok(data.dnsrecords)
    }

    /// 整体提交记录集，返回提交后的集合（含新分配的 id）
    async fn submit_record_set(
        &self,
        zone: &str,
        records: Vec<NetcupDnsRecord>,
    ) -> Result<Vec<NetcupDnsRecord>> {
        let data: NetcupRecordsData = self
            .request(
                "updateDnsRecords",
                json!({
                    "domainname": zone,
                    "dnsrecordset": { "dnsrecords": records },
                }),
                Self::zone_context(zone),
            )
            .await?;
        Ok(data.dnsrecords)
    }

    async fn zone_default_ttl(&self, zone: &str) -> Result<u32> {
        let data = self.fetch_zone_data(zone).await?;
        Ok(data
            .ttl
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(NETCUP_DEFAULT_TTL))
    }
}

#[async_trait]
impl DnsBackend for NetcupBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Netcup
    }

    fn mutation_strategy(&self) -> MutationStrategy {
        MutationStrategy::FullReplace
    }

    fn metadata() -> BackendMetadata {
        BackendMetadata {
            id: BackendKind::Netcup,
            name: "netcup".to_string(),
            description: "netcup CCP DNS API (zone-level record sets)".to_string(),
            mutation_strategy: MutationStrategy::FullReplace,
            required_fields: vec![
                CredentialField {
                    key: "customerNumber".to_string(),
                    label: "Customer Number".to_string(),
                    field_type: FieldType::Text,
                    help_text: Some("netcup customer control panel number".to_string()),
                },
                CredentialField {
                    key: "apiKey".to_string(),
                    label: "API Key".to_string(),
                    field_type: FieldType::Text,
                    help_text: None,
                },
                CredentialField {
                    key: "apiPassword".to_string(),
                    label: "API Password".to_string(),
                    field_type: FieldType::Password,
                    help_text: None,
                },
            ],
            default_ttl: NETCUP_DEFAULT_TTL,
        }
    }

    async fn test_connection(&self) -> Result<()> {
        // 登录本身即是凭证校验
        self.session_id().await?;
        Ok(())
    }

    /// netcup 的 DNS webservice 不提供域名枚举，返回空列表。
    /// 区域归属通过 `validate_zone_access` 逐域验证。
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        log::warn!("[netcup] Zone enumeration not supported by the CCP DNS API");
        Ok(Vec::new())
    }

    async fn validate_zone_access(&self, zone: &str) -> Result<bool> {
        let zone = normalize_domain_name(zone);
        match self.fetch_zone_data(&zone).await {
            Ok(_) => Ok(true),
            Err(BackendError::ZoneNotFound { .. } | BackendError::PermissionDenied { .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<Record>> {
        let zone = normalize_domain_name(zone);
        let ttl = self.zone_default_ttl(&zone).await?;
        let records = self.fetch_record_set(&zone).await?;
        Ok(records
            .iter()
            .filter_map(|r| to_canonical(r, ttl))
            .collect())
    }

    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<Record> {
        let zone = normalize_domain_name(zone);
        let native = to_native(record);

        let existing = self.fetch_record_set(&zone).await?;
        if contains_equivalent(&existing, &native) {
            return Err(BackendError::RecordExists {
                backend: "netcup".to_string(),
                hostname: record.hostname.clone(),
                raw_message: None,
            });
        }

        let submitted = self
            .submit_record_set(&zone, set_with_created(&existing, native.clone()))
            .await?;

        let ttl = self.zone_default_ttl(&zone).await?;
        submitted
            .iter()
            .find(|r| {
                r.hostname.eq_ignore_ascii_case(&native.hostname)
                    && r.record_type.eq_ignore_ascii_case(&native.record_type)
                    && r.destination == native.destination
            })
            .and_then(|r| to_canonical(r, record.ttl.unwrap_or(ttl)))
            .ok_or_else(|| self.parse_error("created record missing from submitted set"))
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &NewRecord,
    ) -> Result<Record> {
        let zone = normalize_domain_name(zone);
        let existing = self.fetch_record_set(&zone).await?;

        let Some(new_set) = set_with_replaced(&existing, record_id, to_native(record)) else {
            return Err(BackendError::RecordNotFound {
                backend: "netcup".to_string(),
                record_id: record_id.to_string(),
                raw_message: None,
            });
        };

        let submitted = self.submit_record_set(&zone, new_set).await?;
        let ttl = self.zone_default_ttl(&zone).await?;
        submitted
            .iter()
            .find(|r| r.id.as_deref() == Some(record_id))
            .and_then(|r| to_canonical(r, record.ttl.unwrap_or(ttl)))
            .ok_or_else(|| self.parse_error("updated record missing from submitted set"))
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<bool> {
        let zone = normalize_domain_name(zone);
        let existing = self.fetch_record_set(&zone).await?;

        let Some(new_set) = set_without(&existing, record_id) else {
            return Ok(false);
        };

        self.submit_record_set(&zone, new_set).await?;
        Ok(true)
    }

    async fn get_zone_info(&self, zone: &str) -> Result<ZoneInfo> {
        let zone = normalize_domain_name(zone);
        let data = self.fetch_zone_data(&zone).await?;
        Ok(ZoneInfo {
            name: normalize_domain_name(&data.name),
            // infoDnsZone 不返回 NS，留空
            name_servers: Vec::new(),
            default_ttl: data.ttl.as_deref().and_then(|t| t.parse().ok()),
            serial: data.serial,
            dnssec: data.dnssecstatus,
        })
    }
}
