//! deSEC `DnsBackend` 实现
//!
//! deSEC 没有按记录的原生 ID。规范记录 ID 是 (hostname, type, 原始内容)
//! 的确定性摘要，同一条记录在多次列举之间 ID 稳定。

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Method;

use crate::backends::common::{normalize_domain_name, synthetic_record_id};
use crate::error::{BackendError, Result};
use crate::traits::{BackendErrorMapper, DnsBackend, ErrorContext};
use crate::types::{
    APEX_MARKER, BackendKind, BackendMetadata, CredentialField, FieldType, MutationStrategy,
    NewRecord, Record, RecordType, Zone, ZoneInfo, ZoneStatus,
};

use super::types::{DesecDomain, DesecRrset, DesecRrsetWrite};
use super::{DESEC_DEFAULT_TTL, DesecBackend};

// ============ RRset 内容转换（纯函数） ============

/// deSEC 的 MX/SRV 优先级编码在内容字符串开头（如 `"10 mx.example.net."`）
fn split_priority(content: &str, record_type: RecordType) -> (Option<u16>, String) {
    if !matches!(record_type, RecordType::Mx | RecordType::Srv) {
        return (None, content.to_string());
    }
    match content.split_once(' ') {
        Some((head, rest)) => match head.parse::<u16>() {
            Ok(p) => (Some(p), rest.trim_start().to_string()),
            Err(_) => (None, content.to_string()),
        },
        None => (None, content.to_string()),
    }
}

/// 规范 payload 拼回 deSEC 内容字符串
fn join_content(record: &NewRecord) -> String {
    match record.record_type {
        RecordType::Mx | RecordType::Srv => {
            format!("{} {}", record.priority.unwrap_or(0), record.destination)
        }
        _ => record.destination.clone(),
    }
}

/// deSEC 的 subname 为空字符串表示 apex
fn subname_of(hostname: &str) -> String {
    if hostname == APEX_MARKER || hostname.is_empty() {
        String::new()
    } else {
        hostname.to_ascii_lowercase()
    }
}

fn hostname_of(subname: &str) -> String {
    if subname.is_empty() {
        APEX_MARKER.to_string()
    } else {
        subname.to_ascii_lowercase()
    }
}

/// 将一个 RRset 摊平为规范记录，记录类型无法识别时返回空
fn flatten_rrset(rrset: &DesecRrset) -> Vec<Record> {
    let Ok(record_type) = RecordType::from_str(&rrset.rrset_type) else {
        return Vec::new();
    };
    let hostname = hostname_of(&rrset.subname);
    rrset
        .records
        .iter()
        .map(|content| {
            let (priority, destination) = split_priority(content, record_type);
            Record {
                // ID 对原始内容取摘要，优先级变化也会产生新 ID
                id: synthetic_record_id(&hostname, &rrset.rrset_type, content),
                hostname: hostname.clone(),
                record_type,
                destination,
                priority,
                ttl: rrset.ttl,
            }
        })
        .collect()
}

/// 在 RRset 列表中按合成 ID 定位记录，返回 (所属 RRset, 原始内容)
fn find_by_id<'a>(rrsets: &'a [DesecRrset], record_id: &str) -> Option<(&'a DesecRrset, &'a str)> {
    rrsets.iter().find_map(|rrset| {
        let hostname = hostname_of(&rrset.subname);
        rrset
            .records
            .iter()
            .find(|content| {
                synthetic_record_id(&hostname, &rrset.rrset_type, content) == record_id
            })
            .map(|content| (rrset, content.as_str()))
    })
}

// ============ API 调用封装 ============

impl DesecBackend {
    fn zone_context(zone: &str) -> ErrorContext {
        ErrorContext {
            zone: Some(zone.to_string()),
            ..Default::default()
        }
    }

    async fn fetch_rrsets(&self, zone: &str) -> Result<Vec<DesecRrset>> {
        self.get_json(
            &format!("/domains/{zone}/rrsets/"),
            Self::zone_context(zone),
        )
        .await
    }

    /// 取指定 (subname, type) 的 RRset，不存在时返回 `None`
    async fn fetch_rrset(
        &self,
        zone: &str,
        subname: &str,
        record_type: &str,
    ) -> Result<Option<DesecRrset>> {
        let path = Self::rrset_path(zone, subname, record_type);
        match self
            .get_json::<DesecRrset>(&path, Self::zone_context(zone))
            .await
        {
            Ok(rrset) => Ok(Some(rrset)),
            Err(BackendError::ZoneNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `PUT` 替换整个 RRset；空 `records` 即删除该 RRset
    async fn put_rrset(
        &self,
        zone: &str,
        subname: &str,
        record_type: &str,
        ttl: u32,
        records: Vec<String>,
        context: ErrorContext,
    ) -> Result<()> {
        let write = DesecRrsetWrite {
            subname,
            rrset_type: record_type,
            ttl,
            records,
        };
        let body = serde_json::to_value(&write).map_err(|e| BackendError::SerializationError {
            backend: self.backend_name().to_string(),
            detail: e.to_string(),
        })?;
        let path = Self::rrset_path(zone, subname, record_type);
        self.send(Method::PUT, &path, Some(&body), context).await?;
        Ok(())
    }
}

#[async_trait]
impl DnsBackend for DesecBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Desec
    }

    fn mutation_strategy(&self) -> MutationStrategy {
        MutationStrategy::Patch
    }

    fn metadata() -> BackendMetadata {
        BackendMetadata {
            id: BackendKind::Desec,
            name: "deSEC".to_string(),
            description: "deSEC DNS API (token-authenticated RRsets)".to_string(),
            mutation_strategy: MutationStrategy::Patch,
            required_fields: vec![CredentialField {
                key: "apiToken".to_string(),
                label: "API Token".to_string(),
                field_type: FieldType::Password,
                help_text: Some("Token from the deSEC token management page".to_string()),
            }],
            default_ttl: DESEC_DEFAULT_TTL,
        }
    }

    async fn test_connection(&self) -> Result<()> {
        self.send(
            Method::GET,
            "/auth/account/",
            None,
            ErrorContext::default(),
        )
        .await?;
        Ok(())
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let domains: Vec<DesecDomain> = self
            .get_json("/domains/", ErrorContext::default())
            .await?;
        Ok(domains
            .into_iter()
            .map(|d| Zone {
                id: d.name.clone(),
                status: if d.published.is_some() {
                    ZoneStatus::Active
                } else {
                    ZoneStatus::Pending
                },
                name: d.name,
            })
            .collect())
    }

    async fn validate_zone_access(&self, zone: &str) -> Result<bool> {
        let zone = normalize_domain_name(zone);
        let result: Result<DesecDomain> = self
            .get_json(&format!("/domains/{zone}/"), Self::zone_context(&zone))
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(BackendError::ZoneNotFound { .. } | BackendError::PermissionDenied { .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<Record>> {
        let zone = normalize_domain_name(zone);
        let rrsets = self.fetch_rrsets(&zone).await?;
        Ok(rrsets.iter().flat_map(flatten_rrset).collect())
    }

    async fn create_record(&self, zone: &str, record: &NewRecord) -> Result<Record> {
        let zone = normalize_domain_name(zone);
        let subname = subname_of(&record.hostname);
        let type_str = record.record_type.as_str();
        let content = join_content(record);

        let existing = self.fetch_rrset(&zone, &subname, type_str).await?;
        let (ttl, mut records) = match existing {
            Some(rrset) => {
                if rrset.records.contains(&content) {
                    return Err(BackendError::RecordExists {
                        backend: self.backend_name().to_string(),
                        hostname: record.hostname.clone(),
                        raw_message: None,
                    });
                }
                (record.ttl.unwrap_or(rrset.ttl), rrset.records)
            }
            None => (record.ttl.unwrap_or(DESEC_DEFAULT_TTL), Vec::new()),
        };
        records.push(content.clone());

        self.put_rrset(
            &zone,
            &subname,
            type_str,
            ttl,
            records,
            Self::zone_context(&zone),
        )
        .await?;

        let hostname = hostname_of(&subname);
        Ok(Record {
            id: synthetic_record_id(&hostname, type_str, &content),
            hostname,
            record_type: record.record_type,
            destination: record.destination.clone(),
            priority: record.priority,
            ttl,
        })
    }

    async fn update_record(
        &self,
        zone: &str,
        record_id: &str,
        record: &NewRecord,
    ) -> Result<Record> {
        let zone = normalize_domain_name(zone);
        let rrsets = self.fetch_rrsets(&zone).await?;

        let Some((old_rrset, old_content)) = find_by_id(&rrsets, record_id) else {
            return Err(BackendError::RecordNotFound {
                backend: self.backend_name().to_string(),
                record_id: record_id.to_string(),
                raw_message: None,
            });
        };

        let new_subname = subname_of(&record.hostname);
        let type_str = record.record_type.as_str();
        let context = ErrorContext {
            record_id: Some(record_id.to_string()),
            zone: Some(zone.clone()),
        };

        if new_subname == old_rrset.subname && type_str == old_rrset.rrset_type {
            // 同一 RRset 内替换，一次 PUT 完成
            let content = join_content(record);
            let ttl = record.ttl.unwrap_or(old_rrset.ttl);
            let records: Vec<String> = old_rrset
                .records
                .iter()
                .map(|c| {
                    if c == old_content {
                        content.clone()
                    } else {
                        c.clone()
                    }
                })
                .collect();
            self.put_rrset(&zone, &new_subname, type_str, ttl, records, context)
                .await?;

            let hostname = hostname_of(&new_subname);
            return Ok(Record {
                id: synthetic_record_id(&hostname, type_str, &content),
                hostname,
                record_type: record.record_type,
                destination: record.destination.clone(),
                priority: record.priority,
                ttl,
            });
        }

        // 跨 RRset 移动：先写入目标再从原处移除，避免失败时丢记录
        let old_content = old_content.to_string();
        let old_subname = old_rrset.subname.clone();
        let old_type = old_rrset.rrset_type.clone();
        let old_ttl = old_rrset.ttl;
        let remaining: Vec<String> = old_rrset
            .records
            .iter()
            .filter(|c| **c != old_content)
            .cloned()
            .collect();

        let created = self.create_record(&zone, record).await?;
        self.put_rrset(&zone, &old_subname, &old_type, old_ttl, remaining, context)
            .await?;
        Ok(created)
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<bool> {
        let zone = normalize_domain_name(zone);
        let rrsets = self.fetch_rrsets(&zone).await?;

        let Some((rrset, content)) = find_by_id(&rrsets, record_id) else {
            return Ok(false);
        };

        let remaining: Vec<String> = rrset
            .records
            .iter()
            .filter(|c| c.as_str() != content)
            .cloned()
            .collect();
        self.put_rrset(
            &zone,
            &rrset.subname,
            &rrset.rrset_type,
            rrset.ttl,
            remaining,
            ErrorContext {
                record_id: Some(record_id.to_string()),
                zone: Some(zone.clone()),
            },
        )
        .await?;
        Ok(true)
    }

    async fn get_zone_info(&self, zone: &str) -> Result<ZoneInfo> {
        let zone = normalize_domain_name(zone);
        let domain: DesecDomain = self
            .get_json(&format!("/domains/{zone}/"), Self::zone_context(&zone))
            .await?;
        Ok(ZoneInfo {
            name: normalize_domain_name(&domain.name),
            name_servers: Vec::new(),
            default_ttl: domain.minimum_ttl,
            serial: None,
            // deSEC 全量签名
            dnssec: Some(true),
        })
    }
}
