//! # JSON Path Module / JSON 路径模块
//!
//! Minimal path lookup over `serde_json::Value` for response assertions.
//! Paths are dot-separated keys with optional bracket segments:
//! `data.id`, `data['CPU model']`, `items[0].name`. When a key segment meets
//! an array, the lookup fans out over its elements (`id` on a list of objects
//! yields every element's `id`).
//!
//! 用于响应断言的 `serde_json::Value` 最小路径查找。路径由点分隔的键和可选的方括号段组成。
//! 当键段遇到数组时，查找会展开到数组的每个元素。

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Parses a path expression. Returns `None` for unbalanced brackets or
/// unterminated quotes.
fn parse(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                match chars.peek().copied() {
                    Some(quote @ ('\'' | '"')) => {
                        chars.next();
                        let mut key = String::new();
                        loop {
                            match chars.next()? {
                                ch if ch == quote => break,
                                ch => key.push(ch),
                            }
                        }
                        if chars.next()? != ']' {
                            return None;
                        }
                        segments.push(Segment::Key(key));
                    }
                    _ => {
                        let mut digits = String::new();
                        loop {
                            match chars.next()? {
                                ']' => break,
                                ch => digits.push(ch),
                            }
                        }
                        segments.push(Segment::Index(digits.trim().parse().ok()?));
                    }
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }
    Some(segments)
}

/// Every value reachable through `path`, fanning out across arrays met by a
/// key segment.
/// 通过 `path` 可到达的所有值，键段遇到数组时展开。
pub fn collect<'a>(root: &'a Value, path: &str) -> Vec<&'a Value> {
    let Some(segments) = parse(path) else {
        return Vec::new();
    };

    let mut current = vec![root];
    for segment in &segments {
        let mut next = Vec::new();
        for value in current {
            match (segment, value) {
                (Segment::Key(key), Value::Object(map)) => next.extend(map.get(key)),
                (Segment::Key(key), Value::Array(items)) => next.extend(
                    items
                        .iter()
                        .filter_map(|item| item.as_object().and_then(|map| map.get(key))),
                ),
                (Segment::Index(i), Value::Array(items)) => next.extend(items.get(*i)),
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// The single value at `path`, without fanning out over arrays. Use
/// [`collect`] for list lookups.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse(path)?;
    segments.iter().try_fold(root, |value, segment| match (segment, value) {
        (Segment::Key(key), Value::Object(map)) => map.get(key),
        (Segment::Index(i), Value::Array(items)) => items.get(*i),
        _ => None,
    })
}

/// Renders the value at `path` as a string: strings verbatim, numbers and
/// booleans in their JSON form, containers as compact JSON. `null` and missing
/// values yield `None`.
///
/// 将 `path` 处的值渲染为字符串：字符串原样返回，数字和布尔值使用 JSON 形式，
/// 容器使用紧凑 JSON。`null` 和缺失值返回 `None`。
pub fn get_string(root: &Value, path: &str) -> Option<String> {
    match lookup(root, path)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
