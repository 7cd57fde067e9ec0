//! Query String Helpers
//!
//! Converts caller-supplied key/value mappings into an insertion-ordered map
//! and serializes it into a deterministic query string. Also reads single
//! values back out of a `?a=b&c=d` search string.

use serde_json::{Map, Value};

/// Insertion-ordered query parameter map
pub type QueryMap = Map<String, Value>;

/// Convert a JSON object into an ordered map.
///
/// Keys keep the order they were inserted in. Anything other than an object
/// produces an empty map.
pub fn to_ordered_map(value: &Value) -> QueryMap {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => QueryMap::new(),
    }
}

/// Serialize a query map into `key=value&key=value`
///
/// Strings are encoded verbatim, objects/arrays/null are JSON encoded first.
pub fn encode_query(params: &QueryMap) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&value_to_text(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append an encoded query to a URL, leaving the URL untouched when empty
pub fn compose_url(url: &str, params: &QueryMap) -> String {
    if params.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, encode_query(params))
    }
}

/// Parse a search string into decoded key/value pairs
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Return the first value for `name` in a search string
pub fn get_query_param(search: &str, name: &str) -> Option<String> {
    parse_query(search)
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // null, arrays and objects are all "object" typed in the browser
        other => other.to_string(),
    }
}

/// Percent-encode like `encodeURIComponent`: `!'()*` stay literal
fn encode_component(text: &str) -> String {
    let encoded = urlencoding::encode(text);
    if !text.contains(['!', '\'', '(', ')', '*']) {
        return encoded.into_owned();
    }
    encoded
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ordered_map_keeps_insertion_order() {
        let map = to_ordered_map(&json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_ordered_map_non_object() {
        assert!(to_ordered_map(&json!([1, 2])).is_empty());
        assert!(to_ordered_map(&Value::Null).is_empty());
    }

    #[test]
    fn test_encode_scalars() {
        let map = to_ordered_map(&json!({"x": 1, "y": "z", "ok": true}));
        assert_eq!(encode_query(&map), "x=1&y=z&ok=true");
    }

    #[test]
    fn test_encode_object_value_as_json() {
        let map = to_ordered_map(&json!({"x": {"nested": 1}}));
        assert_eq!(encode_query(&map), "x=%7B%22nested%22%3A1%7D");
    }

    #[test]
    fn test_encode_special_characters() {
        let map = to_ordered_map(&json!({"a b": "c&d", "n": null}));
        assert_eq!(encode_query(&map), "a%20b=c%26d&n=null");
    }

    #[test]
    fn test_encode_keeps_component_marks() {
        let map = to_ordered_map(&json!({"q": "hi!", "expr": "(a*b)'s", "raw": "%21"}));
        assert_eq!(encode_query(&map), "q=hi!&expr=(a*b)'s&raw=%2521");
        assert_eq!(get_query_param(&encode_query(&map), "raw"), Some("%21".to_string()));
    }

    #[test]
    fn test_compose_url() {
        assert_eq!(compose_url("/a", &QueryMap::new()), "/a");
        let map = to_ordered_map(&json!({"page": 2}));
        assert_eq!(compose_url("/a", &map), "/a?page=2");
    }

    #[test]
    fn test_get_query_param() {
        let search = "?x=5&name=John+Doe&x=6&empty&enc=%7B%7D";
        assert_eq!(get_query_param(search, "x"), Some("5".to_string()));
        assert_eq!(get_query_param(search, "name"), Some("John Doe".to_string()));
        assert_eq!(get_query_param(search, "empty"), Some(String::new()));
        assert_eq!(get_query_param(search, "enc"), Some("{}".to_string()));
        assert_eq!(get_query_param(search, "missing"), None);
        assert_eq!(get_query_param("", "x"), None);
    }
}
