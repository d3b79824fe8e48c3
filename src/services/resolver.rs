use serde_json::Value;
use tracing::error;

use crate::core::models::{GenerationJob, MEDIA_URL_FIELDS};
use crate::error::ResolveError;

/// 从任务结果中取出最终媒体地址
///
/// 数组取第一个元素；字段优先级 `mediaUrl` > `video` > `image`，
/// 只认非空字符串，其余字段和后续元素不做校验。
pub fn resolve(job: &GenerationJob) -> Result<String, ResolveError> {
    job.result_item().and_then(media_url_of).ok_or_else(|| {
        let payload = serde_json::to_value(job).unwrap_or_default();
        error!("结果中没有媒体地址，响应: {}", payload);
        ResolveError::ResultMissing { payload }
    })
}

fn media_url_of(item: &Value) -> Option<String> {
    MEDIA_URL_FIELDS
        .iter()
        .filter_map(|field| item.get(*field).and_then(Value::as_str))
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::completed;
    use serde_json::json;

    fn resolve_json(result: Value) -> Result<String, ResolveError> {
        resolve(&completed(result))
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            resolve_json(json!({ "mediaUrl": "a", "image": "b" })).unwrap(),
            "a"
        );
        assert_eq!(resolve_json(json!({ "video": "c" })).unwrap(), "c");
        assert_eq!(
            resolve_json(json!({ "video": "v", "image": "i", "extra": { "k": 1 } })).unwrap(),
            "v"
        );
    }

    #[test]
    fn test_empty_item_is_missing() {
        let err = resolve_json(json!({})).unwrap_err();
        let ResolveError::ResultMissing { payload } = err;
        assert_eq!(payload["status"], json!("completed"));
    }

    #[test]
    fn test_empty_string_falls_through() {
        assert_eq!(
            resolve_json(json!({ "mediaUrl": "", "image": "b" })).unwrap(),
            "b"
        );
    }

    #[test]
    fn test_sequence_matches_first_element() {
        let items = [
            json!({ "mediaUrl": "a", "image": "b" }),
            json!({ "video": "c" }),
            json!({}),
            json!({ "image": 5 }),
            json!({ "mediaUrl": "a", "video": 7 }),
            json!(null),
        ];
        let tails = [json!({ "image": "second" }), json!(null), json!("x"), json!({ "image": 5 })];
        for item in items {
            let single = resolve_json(item.clone()).ok();
            for tail in &tails {
                let seq = resolve_json(json!([item, tail])).ok();
                assert_eq!(single, seq, "item: {}, tail: {}", item, tail);
            }
        }
    }

    #[test]
    fn test_malformed_tail_is_ignored() {
        assert_eq!(resolve_json(json!([{ "mediaUrl": "a" }, null])).unwrap(), "a");
        assert_eq!(resolve_json(json!([{ "video": "v" }, "x", { "image": 5 }])).unwrap(), "v");
    }

    #[test]
    fn test_non_string_field_is_skipped() {
        assert_eq!(resolve_json(json!({ "mediaUrl": "a", "video": 7 })).unwrap(), "a");
        assert_eq!(resolve_json(json!({ "mediaUrl": 7, "image": "i" })).unwrap(), "i");
    }

    #[test]
    fn test_missing_or_odd_result() {
        assert!(resolve_json(json!([])).is_err());
        assert!(resolve_json(json!("https://cdn/a.png")).is_err());
        let mut job = completed(json!({}));
        job.result = None;
        assert!(resolve(&job).is_err());
    }
}
