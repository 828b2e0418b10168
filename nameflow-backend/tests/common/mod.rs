//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use nameflow_backend::{
    BackendCredentials, DnsBackend, NewRecord, Record, RecordType, create_backend,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 测试上下文：一个已配置的 Backend 加测试区域
pub struct TestContext {
    pub backend: Arc<dyn DnsBackend>,
    pub zone: String,
}

impl TestContext {
    /// 从环境变量构建 deSEC 上下文
    pub fn desec() -> Option<Self> {
        let api_token = env::var("DESEC_API_TOKEN").ok()?;
        let zone = env::var("TEST_ZONE").ok()?;
        Some(Self {
            backend: create_backend(BackendCredentials::Desec { api_token }),
            zone,
        })
    }

    /// 从环境变量构建 netcup 上下文
    pub fn netcup() -> Option<Self> {
        let customer_number = env::var("NETCUP_CUSTOMER_NUMBER").ok()?;
        let api_key = env::var("NETCUP_API_KEY").ok()?;
        let api_password = env::var("NETCUP_API_PASSWORD").ok()?;
        let zone = env::var("TEST_ZONE").ok()?;
        Some(Self {
            backend: create_backend(BackendCredentials::Netcup {
                customer_number,
                api_key,
                api_password,
            }),
            zone,
        })
    }

    /// 按主机名找记录
    pub async fn find_record(&self, hostname: &str) -> Option<Record> {
        self.backend
            .list_records(&self.zone)
            .await
            .ok()?
            .into_iter()
            .find(|r| r.hostname == hostname)
    }
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// A 记录测试载荷（创建值和更新值）
pub fn a_record_payload(hostname: &str) -> (NewRecord, NewRecord) {
    (
        NewRecord {
            hostname: hostname.to_string(),
            record_type: RecordType::A,
            destination: "192.0.2.1".to_string(),
            priority: None,
            ttl: Some(3600),
        },
        NewRecord {
            hostname: hostname.to_string(),
            record_type: RecordType::A,
            destination: "192.0.2.2".to_string(),
            priority: None,
            ttl: Some(3600),
        },
    )
}

/// MX 记录测试载荷（带优先级）
pub fn mx_record_payload(hostname: &str) -> NewRecord {
    NewRecord {
        hostname: hostname.to_string(),
        record_type: RecordType::Mx,
        destination: "mail.example.net.".to_string(),
        priority: Some(10),
        ttl: Some(3600),
    }
}
