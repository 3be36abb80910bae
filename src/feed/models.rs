/// Post and comment records as stored in the feed
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Longest author name kept on a post, in characters
pub const MAX_AUTHOR_CHARS: usize = 64;

/// Longest caption kept on a post, in characters
pub const MAX_CAPTION_CHARS: usize = 512;

/// A post, serialized verbatim as one sorted-set member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub caption: String,
    pub media_url: String,
    pub media_type: String,
    /// ISO-8601 creation time; its millisecond value is the member's score
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    /// Fields this service does not know about, carried through updates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// Fields supplied by a client when creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: String,
    pub caption: String,
    pub media_url: String,
    pub media_type: String,
}

impl Post {
    /// Build a fresh post created at `now`
    pub fn create(id: String, new_post: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author: truncate_chars(&new_post.author, MAX_AUTHOR_CHARS),
            caption: truncate_chars(&new_post.caption, MAX_CAPTION_CHARS),
            media_url: new_post.media_url,
            media_type: new_post.media_type,
            created_at: format_timestamp(now),
            likes_count: 0,
            comments: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Comment {
    pub fn new(author: String, text: String, now: DateTime<Utc>) -> Self {
        Self {
            author,
            text,
            created_at: format_timestamp(now),
        }
    }
}

/// `2024-05-01T12:00:00.123Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the epoch for an ISO-8601 timestamp
pub fn timestamp_millis(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.timestamp_millis())
}

/// Keep at most `max` characters, never splitting one
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((end, _)) => value[..end].to_string(),
        None => value.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_new_post() -> NewPost {
        NewPost {
            author: "ada".to_string(),
            caption: "first light".to_string(),
            media_url: "https://blobs.example/photo-x1.png".to_string(),
            media_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 3), "hi");
        assert_eq!(truncate_chars("", 3), "");
        // multi-byte characters count once each
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_create_truncates_author_and_caption() {
        let mut new_post = sample_new_post();
        new_post.author = "a".repeat(100);
        new_post.caption = "c".repeat(1000);

        let post = Post::create("id-1".to_string(), new_post, Utc::now());
        assert_eq!(post.author.chars().count(), MAX_AUTHOR_CHARS);
        assert_eq!(post.caption.chars().count(), MAX_CAPTION_CHARS);
        assert_eq!(post.likes_count, 0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_timestamp_format_and_score_agree() {
        let at = Utc.timestamp_millis_opt(1_714_564_800_123).unwrap();
        let formatted = format_timestamp(at);
        assert_eq!(formatted, "2024-05-01T12:00:00.123Z");
        assert_eq!(timestamp_millis(&formatted), Some(1_714_564_800_123));
        assert_eq!(timestamp_millis("yesterday"), None);
    }

    #[test]
    fn test_serialized_field_order() {
        let at = Utc.timestamp_millis_opt(0).unwrap();
        let post = Post::create("p1".to_string(), sample_new_post(), at);
        let json = serde_json::to_string(&post).unwrap();
        assert_eq!(
            json,
            "{\"id\":\"p1\",\"author\":\"ada\",\"caption\":\"first light\",\
             \"media_url\":\"https://blobs.example/photo-x1.png\",\"media_type\":\"image/png\",\
             \"created_at\":\"1970-01-01T00:00:00.000Z\",\"likes_count\":0,\"comments\":[]}"
        );
    }

    #[test]
    fn test_missing_or_null_counters_default() {
        let raw = r#"{"id":"p1","author":"a","caption":"c","media_url":"u","media_type":"t",
                      "created_at":"2024-01-01T00:00:00.000Z","likes_count":null}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.likes_count, 0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{"id":"p1","author":"a","caption":"c","media_url":"u","media_type":"t",
                      "created_at":"2024-01-01T00:00:00.000Z","likes_count":2,"comments":[],
                      "pinned":true}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.extra.get("pinned"), Some(&Value::Bool(true)));

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["pinned"], Value::Bool(true));
        assert_eq!(json["likes_count"], 2);
    }
}
