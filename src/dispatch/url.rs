//! URL 启发式与协议补全
//!
//! `looks_like_url` 只是提示性判断：文本中出现常见顶级域后缀即视为链接。
//! 未列出的后缀会漏判，恰好包含这些子串的普通文本会误判。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const SECURE_SCHEME: &str = "https://";

/// 常见顶级域后缀，大小写不敏感。
static URL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(com|net|io|me|crypto|ai)\b").unwrap());

/// 形如 `scheme://` 的前缀。
static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

/// 判断文本是否已带协议的策略。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemeCheck {
    /// 文本以任意 `scheme://` 开头即视为已带协议。
    #[default]
    Prefix,
    /// 旧行为：仅当整段文本恰好等于 `https://` 时才视为已带协议，
    /// 实际效果是几乎总会补全前缀。
    ExactMatch,
}

pub fn looks_like_url(text: &str) -> bool {
    URL_SUFFIX.is_match(text)
}

pub fn has_scheme(text: &str, check: SchemeCheck) -> bool {
    match check {
        SchemeCheck::Prefix => SCHEME_PREFIX.is_match(text),
        SchemeCheck::ExactMatch => [SECURE_SCHEME].contains(&text),
    }
}

/// 文本未带协议时补上 `https://`。
pub fn with_secure_scheme(text: &str, check: SchemeCheck) -> String {
    if has_scheme(text, check) {
        text.to_string()
    } else {
        format!("{}{}", SECURE_SCHEME, text)
    }
}
