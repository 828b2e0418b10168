//! 凭证散列模块
//!
//! Token secret 的存储散列与校验。secret 长度（64 字符）超出 bcrypt 系
//! 算法的输入上限，先用 SHA-256 定长预压缩（hex 编码），再做带随机盐的
//! Argon2id 慢散列；存储与校验两侧使用完全相同的预压缩。

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};

/// SHA-256 定长预压缩，hex 输出（64 字节 ASCII）
fn condense(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// 散列一个 token secret，返回 PHC 格式字符串
pub fn hash_secret(secret: &str) -> CoreResult<String> {
    let condensed = condense(secret);
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(condensed.as_bytes(), &salt)
        .map_err(|e| CoreError::Crypto(format!("Failed to hash secret: {e}")))?;
    Ok(hash.to_string())
}

/// 校验 secret 与存储的 PHC 散列是否匹配
///
/// 存储散列不可解析时返回 `false`（视作不匹配，不报错）。
#[must_use]
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    let condensed = condense(secret);
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(condensed.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
