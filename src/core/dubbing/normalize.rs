//! Extraction rules for loosely-typed provider documents.
//!
//! The dubbing provider is inconsistent about where it puts things: a result URL
//! may sit at the top level or under `data`, `result` or both, and a task id may
//! be called `task_id` or `id`. Every such lookup lives here as an ordered list
//! of paths applied to a `serde_json::Value`, so schema drift stays in one file.

use serde_json::Value;

type JsonPath = &'static [&'static str];

/// Locations of the final media URL, in priority order.
pub const RESULT_URL_PATHS: &[JsonPath] = &[
    &["dubbed_video_url"],
    &["data", "dubbed_video_url"],
    &["result", "dubbed_video_url"],
    &["data", "result", "dubbed_video_url"],
];

/// Locations of the job status string.
pub const STATUS_PATHS: &[JsonPath] = &[&["status"], &["data", "status"]];

/// Locations of the run id used to fetch a finished job's result.
pub const RUN_ID_PATHS: &[JsonPath] = &[&["run_id"], &["data", "run_id"], &["result", "run_id"]];

/// Locations of the task id in a job creation response.
pub const TASK_ID_PATHS: &[JsonPath] = &[&["task_id"], &["id"]];

/// Locations of a human readable error message.
pub const MESSAGE_PATHS: &[JsonPath] = &[&["message"], &["error"]];

/// Status values that mean the job finished successfully.
pub const SUCCESS_STATUSES: &[&str] = &["success", "completed", "complete", "done", "finished"];

/// Status values that mean the job will never produce a result.
pub const FAILURE_STATUSES: &[&str] = &["failed", "error", "canceled", "cancelled"];

/// Walk `path` through nested objects.
pub fn lookup<'a>(document: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |current, key| current.as_object()?.get(*key))
}

/// First non-empty string found at any of `paths`.
pub fn first_string(document: &Value, paths: &[JsonPath]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(document, path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// First identifier found at any of `paths`; integers are accepted and stringified.
pub fn first_identifier(document: &Value, paths: &[JsonPath]) -> Option<String> {
    paths.iter().find_map(|path| match lookup(document, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    })
}

pub fn extract_result_url(document: &Value) -> Option<String> {
    first_string(document, RESULT_URL_PATHS)
}

pub fn extract_status(document: &Value) -> Option<String> {
    first_string(document, STATUS_PATHS)
}

pub fn extract_run_id(document: &Value) -> Option<String> {
    first_identifier(document, RUN_ID_PATHS)
}

pub fn extract_task_id(document: &Value) -> Option<String> {
    first_identifier(document, TASK_ID_PATHS)
}

pub fn extract_message(document: &Value) -> Option<String> {
    first_string(document, MESSAGE_PATHS)
}

pub fn is_success_status(status: &str) -> bool {
    let status = status.to_lowercase();
    SUCCESS_STATUSES.contains(&status.as_str())
}

pub fn is_failure_status(status: &str) -> bool {
    let status = status.to_lowercase();
    FAILURE_STATUSES.contains(&status.as_str())
}

/// Copy of `document` carrying `url` under the top-level `dubbed_video_url` key.
///
/// Non-object documents are wrapped so the caller always gets an object back.
pub fn with_result_url(document: Value, url: &str) -> Value {
    let mut object = match document {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    object.insert("dubbed_video_url".to_string(), Value::String(url.to_string()));
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_url_from_each_location() {
        let top = json!({"dubbed_video_url": "https://x/top.mp4"});
        let data = json!({"data": {"dubbed_video_url": "https://x/data.mp4"}});
        let result = json!({"result": {"dubbed_video_url": "https://x/result.mp4"}});
        let nested = json!({"data": {"result": {"dubbed_video_url": "https://x/y.mp4"}}});

        assert_eq!(extract_result_url(&top).as_deref(), Some("https://x/top.mp4"));
        assert_eq!(extract_result_url(&data).as_deref(), Some("https://x/data.mp4"));
        assert_eq!(
            extract_result_url(&result).as_deref(),
            Some("https://x/result.mp4")
        );
        assert_eq!(extract_result_url(&nested).as_deref(), Some("https://x/y.mp4"));
    }

    #[test]
    fn test_result_url_priority_order() {
        let doc = json!({
            "result": {"dubbed_video_url": "https://x/result.mp4"},
            "data": {
                "dubbed_video_url": "https://x/data.mp4",
                "result": {"dubbed_video_url": "https://x/nested.mp4"}
            }
        });
        assert_eq!(extract_result_url(&doc).as_deref(), Some("https://x/data.mp4"));
    }

    #[test]
    fn test_result_url_skips_empty_and_non_strings() {
        let doc = json!({
            "dubbed_video_url": "",
            "data": {"dubbed_video_url": null},
            "result": {"dubbed_video_url": 42},
            "data_result_missing": true
        });
        assert_eq!(extract_result_url(&doc), None);

        let fallthrough = json!({
            "dubbed_video_url": "",
            "data": {"result": {"dubbed_video_url": "https://x/late.mp4"}}
        });
        assert_eq!(
            extract_result_url(&fallthrough).as_deref(),
            Some("https://x/late.mp4")
        );
    }

    #[test]
    fn test_lookup_through_non_objects() {
        let doc = json!({"data": "flat"});
        assert!(lookup(&doc, &["data", "status"]).is_none());
        assert!(lookup(&json!([1, 2]), &["data"]).is_none());
        assert_eq!(lookup(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_task_id_field_names() {
        assert_eq!(
            extract_task_id(&json!({"task_id": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(extract_task_id(&json!({"id": "def"})).as_deref(), Some("def"));
        assert_eq!(
            extract_task_id(&json!({"task_id": "abc", "id": "def"})).as_deref(),
            Some("abc")
        );
        assert_eq!(extract_task_id(&json!({"task_id": 991})).as_deref(), Some("991"));
        assert_eq!(extract_task_id(&json!({"task_id": ""})), None);
        assert_eq!(extract_task_id(&json!({"status": "queued"})), None);
    }

    #[test]
    fn test_status_and_run_id_locations() {
        let doc = json!({"data": {"status": "SUCCESS"}, "result": {"run_id": 77}});
        assert_eq!(extract_status(&doc).as_deref(), Some("SUCCESS"));
        assert_eq!(extract_run_id(&doc).as_deref(), Some("77"));

        let top = json!({"status": "PENDING", "run_id": "r-1", "data": {"run_id": "r-2"}});
        assert_eq!(extract_status(&top).as_deref(), Some("PENDING"));
        assert_eq!(extract_run_id(&top).as_deref(), Some("r-1"));
    }

    #[test]
    fn test_message_fallback() {
        assert_eq!(
            extract_message(&json!({"message": "quota", "error": "other"})).as_deref(),
            Some("quota")
        );
        assert_eq!(
            extract_message(&json!({"error": "bad key"})).as_deref(),
            Some("bad key")
        );
        assert_eq!(extract_message(&json!({"error": {"code": 1}})), None);
    }

    #[test]
    fn test_status_vocabulary_is_case_insensitive() {
        for status in ["COMPLETED", "Success", "done", "Finished", "complete"] {
            assert!(is_success_status(status), "{status}");
        }
        for status in ["Cancelled", "CANCELED", "failed", "Error"] {
            assert!(is_failure_status(status), "{status}");
        }
        assert!(!is_success_status("PROCESSING"));
        assert!(!is_failure_status("PENDING"));
    }

    #[test]
    fn test_with_result_url() {
        let doc = with_result_url(json!({"status": "SUCCESS"}), "https://x/y.mp4");
        assert_eq!(doc["dubbed_video_url"], "https://x/y.mp4");
        assert_eq!(doc["status"], "SUCCESS");

        let wrapped = with_result_url(json!("odd"), "https://x/y.mp4");
        assert_eq!(wrapped, json!({"dubbed_video_url": "https://x/y.mp4"}));
    }
}
