//! 語音指令的句型樣式
//!
//! 樣式由空白分隔的片段組成：
//! - 文字 (`zoom in`)，不分大小寫
//! - `*name`：一個以上的字，綁定到 `name` (非貪婪，後面的文字仍可定位)
//! - `:name`：剛好一個字，綁定到 `name`
//! - `(words)`：可選段落，內部也可以有擷取
//!
//! 必須整句相符，前後空白忽略。

use crate::utils::error::{Result, VoiceMapError};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct CommandPattern {
    source: String,
    regex: Regex,
    params: Vec<String>,
}

/// 依樣式順序擷取到的具名值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captures(Vec<(String, String)>);

impl Captures {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl CommandPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut params = Vec::new();
        let body = compile_segment(pattern, pattern, &mut params)?;
        if body.is_empty() {
            return Err(pattern_error(pattern, "pattern is empty"));
        }

        let regex = Regex::new(&format!("(?i)^{}$", body))
            .map_err(|e| pattern_error(pattern, &e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            params,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn matches(&self, phrase: &str) -> Option<Captures> {
        let caps = self.regex.captures(phrase.trim())?;
        let values = self
            .params
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.clone(), m.as_str().trim().to_string()))
            })
            .collect();
        Some(Captures(values))
    }
}

enum Piece {
    Required(String),
    Optional(String),
}

fn compile_segment(segment: &str, pattern: &str, params: &mut Vec<String>) -> Result<String> {
    let mut pieces = Vec::new();
    let mut rest = segment.trim();

    while !rest.is_empty() {
        if let Some(inner_start) = rest.strip_prefix('(') {
            let close = inner_start
                .find(')')
                .ok_or_else(|| pattern_error(pattern, "unclosed '('"))?;
            let inner = compile_segment(&inner_start[..close], pattern, params)?;
            if !inner.is_empty() {
                pieces.push(Piece::Optional(inner));
            }
            rest = inner_start[close + 1..].trim_start();
            continue;
        }

        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len());
        let token = &rest[..end];
        rest = rest[end..].trim_start();

        let fragment = if let Some(name) = token.strip_prefix('*') {
            format!("(?P<{}>.+?)", register_param(name, pattern, params)?)
        } else if let Some(name) = token.strip_prefix(':') {
            format!("(?P<{}>\\S+)", register_param(name, pattern, params)?)
        } else if token.contains(')') {
            return Err(pattern_error(pattern, "unmatched ')'"));
        } else {
            regex::escape(token)
        };
        pieces.push(Piece::Required(fragment));
    }

    let mut out = String::new();
    for (index, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Required(fragment) if index == 0 => out.push_str(fragment),
            Piece::Required(fragment) => {
                out.push_str("\\s+");
                out.push_str(fragment);
            }
            Piece::Optional(fragment) if index == 0 && pieces.len() == 1 => {
                out.push_str(&format!("(?:{})?", fragment));
            }
            // 開頭的可選段落後面必須有空白，避免 "pleasezoom" 被接受
            Piece::Optional(fragment) if index == 0 => {
                out.push_str(&format!("(?:{}\\s+)?", fragment));
            }
            Piece::Optional(fragment) => out.push_str(&format!("(?:\\s+{})?", fragment)),
        }
    }
    Ok(out)
}

fn register_param(name: &str, pattern: &str, params: &mut Vec<String>) -> Result<String> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(pattern_error(
            pattern,
            &format!("invalid capture name '{}'", name),
        ));
    }
    if params.iter().any(|existing| existing == name) {
        return Err(pattern_error(
            pattern,
            &format!("duplicate capture name '{}'", name),
        ));
    }
    params.push(name.to_string());
    Ok(name.to_string())
}

fn pattern_error(pattern: &str, message: &str) -> VoiceMapError {
    VoiceMapError::PatternError {
        pattern: pattern.to_string(),
        message: message.to_string(),
    }
}
