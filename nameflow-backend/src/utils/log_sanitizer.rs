//! 日志截断
//!
//! Backend 的原始响应体会进调试日志（netcup 的 longmessage、deSEC 的
//! 错误 detail 都可能带回整组记录内容），超出上限的部分一律截断，
//! TXT 载荷、会话 id 之类的敏感内容不完整落盘。

/// 截断后保留的最大字节数
const MAX_LOGGED_BYTES: usize = 256;

/// 为日志输出截断一段文本
///
/// 不超限时原样返回；超限时保留前缀并标注原始字节数。
/// 截断点回退到最近的字符边界，多字节字符不会被切开。
pub fn truncate_for_log(text: &str) -> String {
    if text.len() <= MAX_LOGGED_BYTES {
        return text.to_string();
    }
    let mut cut = MAX_LOGGED_BYTES;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{} ..({} bytes total)", &text[..cut], text.len())
}
