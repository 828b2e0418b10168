//! Bearer Token 编解码
//!
//! 线格式：`naf_<handle>_<secret>`
//! - `handle`：3–32 个字符，小写字母/数字/连字符，首字符为字母，
//!   末字符为字母或数字。handle 中不含下划线，因此分隔符无歧义。
//! - `secret`：恰好 64 个 `[A-Za-z0-9]` 字符（约 381 bit 熵）。
//!
//! `decode` 是纯语法检查，不触达存储；格式不符是与「查无此 Token」
//! 不同的失败信号。

use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

/// Token 固定前缀
pub const TOKEN_PREFIX: &str = "naf_";
/// secret 段长度
pub const SECRET_LEN: usize = 64;
/// 存储查询用的 secret 前缀长度（不是安全边界）
pub const LOOKUP_PREFIX_LEN: usize = 12;

const HANDLE_MIN_LEN: usize = 3;
const HANDLE_MAX_LEN: usize = 32;

/// Token 语法错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenFormatError {
    /// 缺少 `naf_` 前缀
    #[error("missing token prefix")]
    MissingPrefix,
    /// handle 与 secret 之间没有分隔符
    #[error("missing separator")]
    MissingSeparator,
    /// handle 不符合语法
    #[error("malformed handle")]
    MalformedHandle,
    /// secret 不是恰好 64 个字母数字字符
    #[error("malformed secret")]
    MalformedSecret,
}

/// 解码后的 Token 两段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub handle: String,
    pub secret: String,
}

/// handle 语法：3–32 字符，`[a-z0-9-]`，首字符字母，末字符字母或数字
#[must_use]
pub fn is_valid_handle(handle: &str) -> bool {
    let len = handle.len();
    if !(HANDLE_MIN_LEN..=HANDLE_MAX_LEN).contains(&len) {
        return false;
    }
    let bytes = handle.as_bytes();
    if !bytes[0].is_ascii_lowercase() {
        return false;
    }
    if !bytes[len - 1].is_ascii_lowercase() && !bytes[len - 1].is_ascii_digit() {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

fn is_valid_secret(secret: &str) -> bool {
    secret.len() == SECRET_LEN && secret.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// 为 handle 生成一个新 Token
///
/// 返回 (完整 token 字符串, secret 段)。secret 来自 CSPRNG
/// （`rand::rng()`，操作系统熵源）。
///
/// # Errors
///
/// handle 不符合语法时返回 [`TokenFormatError::MalformedHandle`]。
pub fn encode(handle: &str) -> Result<(String, String), TokenFormatError> {
    if !is_valid_handle(handle) {
        return Err(TokenFormatError::MalformedHandle);
    }
    let secret: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect();
    let token = format!("{TOKEN_PREFIX}{handle}_{secret}");
    Ok((token, secret))
}

/// 按固定语法解码 Token 字符串，不做任何部分匹配
///
/// # Errors
///
/// 任何不精确符合 `naf_<handle>_<secret>` 语法的输入都会被拒绝。
pub fn decode(token: &str) -> Result<DecodedToken, TokenFormatError> {
    let rest = token
        .strip_prefix(TOKEN_PREFIX)
        .ok_or(TokenFormatError::MissingPrefix)?;

    // handle 不含下划线，第一个下划线即分隔符
    let (handle, secret) = rest
        .split_once('_')
        .ok_or(TokenFormatError::MissingSeparator)?;

    if !is_valid_handle(handle) {
        return Err(TokenFormatError::MalformedHandle);
    }
    if !is_valid_secret(secret) {
        return Err(TokenFormatError::MalformedSecret);
    }

    Ok(DecodedToken {
        handle: handle.to_string(),
        secret: secret.to_string(),
    })
}

/// secret 的存储查询前缀（前 12 个字符）
///
/// 只用于在慢散列比对前缩小候选集，不构成安全边界。
#[must_use]
pub fn lookup_prefix(secret: &str) -> &str {
    let end = LOOKUP_PREFIX_LEN.min(secret.len());
    &secret[..end]
}
