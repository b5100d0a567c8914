//! Record transformer
//!
//! Turns a raw platform payload into a normalized [`ProfileData`] or
//! [`VideoData`] using the registry's field mappings.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::coerce::now_iso;
use super::extractor::{extract_field, is_found};
use super::result::TransformResult;
use crate::api::logs::log_error_with;
use crate::error::TransformError;
use crate::models::{ProfileData, RecordKind, VideoData};
use crate::registry::MappingRegistry;

/// Transformer over the built-in registry, shared process-wide.
pub static DEFAULT_TRANSFORMER: Lazy<DataTransformer> = Lazy::new(DataTransformer::default);

/// Transform a profile payload with the built-in mappings
pub fn transform_profile(
    platform: &str,
    raw: &Value,
    username: &str,
    profile_url: &str,
) -> TransformResult<ProfileData> {
    DEFAULT_TRANSFORMER.transform_profile(platform, raw, username, profile_url)
}

/// Transform a video payload with the built-in mappings
pub fn transform_video(platform: &str, raw: &Value) -> TransformResult<VideoData> {
    DEFAULT_TRANSFORMER.transform_video(platform, raw)
}

/// Applies platform mappings from a registry.
///
/// Holds no state besides the registry, which is never modified after
/// construction, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DataTransformer {
    registry: MappingRegistry,
}

impl Default for DataTransformer {
    fn default() -> Self {
        Self::new(MappingRegistry::builtin())
    }
}

impl DataTransformer {
    pub fn new(registry: MappingRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MappingRegistry {
        &self.registry
    }

    /// Normalize a profile payload.
    ///
    /// `username` and `profile_url` come from the caller; a username found in
    /// the payload replaces the caller's.
    pub fn transform_profile(
        &self,
        platform: &str,
        raw: &Value,
        username: &str,
        profile_url: &str,
    ) -> TransformResult<ProfileData> {
        let mut seed = Map::new();
        seed.insert("username".to_string(), Value::String(username.to_string()));
        seed.insert("profileUrl".to_string(), Value::String(profile_url.to_string()));
        self.transform_record(RecordKind::Profile, platform, raw, seed)
    }

    /// Normalize a video payload.
    pub fn transform_video(&self, platform: &str, raw: &Value) -> TransformResult<VideoData> {
        let mut seed = Map::new();
        seed.insert("lastUpdatedAt".to_string(), Value::String(now_iso()));
        self.transform_record(RecordKind::Video, platform, raw, seed)
    }

    fn transform_record<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        platform: &str,
        raw: &Value,
        seed: Map<String, Value>,
    ) -> TransformResult<T> {
        let (Some(mapping), Some(fields)) = (
            self.registry.get(platform),
            self.registry.get_mapping(platform, kind),
        ) else {
            return TransformResult::Failure(vec![TransformError::unsupported_platform(
                platform,
                kind.as_str(),
            )]);
        };

        let mut record = seed;
        record.insert("platform".to_string(), Value::String(mapping.platform.clone()));

        let mut errors = Vec::new();
        for (field, rules) in fields {
            let extraction = extract_field(raw, field, rules);
            if let Some(value) = extraction.value {
                record.insert(field.clone(), value);
            }
            errors.extend(extraction.errors);
        }

        // the payload's own id stands in when no rule produced one
        if kind == RecordKind::Video && !record.contains_key("videoId") {
            if let Some(id) = raw.get("id").and_then(id_string) {
                record.insert("videoId".to_string(), Value::String(id));
            }
        }

        errors.extend(missing_required_fields(&record, kind));

        if !errors.is_empty() {
            return TransformResult::Failure(errors);
        }

        match serde_json::from_value::<T>(Value::Object(record)) {
            Ok(data) => TransformResult::Success(data),
            Err(e) => {
                log_error_with(
                    "Transformation failed",
                    json!({
                        "platform": mapping.platform,
                        "kind": kind.as_str(),
                        "error": e.to_string(),
                    }),
                );
                TransformResult::Failure(vec![TransformError::transformation(format!(
                    "Failed to build {} record for {}: {}",
                    kind, mapping.platform, e
                ))])
            }
        }
    }
}

/// Errors for fields of the fixed required list that are absent, `null` or
/// `""`. A caller-seeded empty username counts as absent.
fn missing_required_fields(record: &Map<String, Value>, kind: RecordKind) -> Vec<TransformError> {
    kind.required_fields()
        .iter()
        .filter(|field| !record.get(**field).is_some_and(is_found))
        .map(|field| TransformError::validation_missing(field))
        .collect()
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mapping::{MappingRule, PlatformMapping, Transform};

    fn tiktok_profile() -> Value {
        json!({
            "user": {
                "id": "6789",
                "uniqueId": "dancequeen",
                "nickname": "Dance Queen",
                "verified": true,
                "signature": "dance daily",
                "avatarLarger": "https://p16.tiktokcdn.com/a.jpg"
            },
            "stats": {
                "followerCount": 1200000,
                "followingCount": 150,
                "heartCount": 98000000,
                "videoCount": 412
            }
        })
    }

    fn tiktok_video() -> Value {
        json!({
            "id": "7301234567890",
            "desc": "new routine #dance #fyp",
            "createTime": 1700000000,
            "video": { "cover": "https://p16.tiktokcdn.com/c.jpg", "duration": 31 },
            "webVideoUrl": "https://www.tiktok.com/@dancequeen/video/7301234567890",
            "challenges": [{ "title": "dance" }, { "title": "fyp" }],
            "stats": {
                "playCount": 52000,
                "diggCount": 4100,
                "commentCount": 88,
                "shareCount": 12,
                "collectCount": 300
            }
        })
    }

    fn youtube_profile() -> Value {
        json!({
            "id": "UCuAXFkgsw1L7xaCfnd5JJOw",
            "snippet": {
                "title": "Rick Astley",
                "customUrl": "@rickastleyyt",
                "description": "Official channel",
                "thumbnails": { "high": { "url": "https://yt3.ggpht.com/h.jpg" } }
            },
            "statistics": {
                "subscriberCount": "4100000",
                "videoCount": "316",
                "viewCount": "2500000000"
            }
        })
    }

    fn youtube_video() -> Value {
        json!({
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "publishedAt": "2009-10-25T06:57:33Z",
                "title": "Never Gonna Give You Up",
                "description": "Classic #music",
                "tags": ["rick", "80s"],
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg" },
                    "high": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg" }
                }
            },
            "statistics": {
                "viewCount": "1500000000",
                "likeCount": "16000000",
                "commentCount": "2300000",
                "favoriteCount": "0"
            },
            "contentDetails": { "duration": "PT3M33S" }
        })
    }

    fn instagram_profile() -> Value {
        json!({
            "id": "25025320",
            "username": "instagram",
            "full_name": "Instagram",
            "biography": "Discover what's new",
            "is_verified": true,
            "profile_pic_url_hd": "https://scontent.cdninstagram.com/p.jpg",
            "edge_followed_by": { "count": 672000000 },
            "edge_follow": { "count": 80 },
            "edge_owner_to_timeline_media": { "count": 7600 }
        })
    }

    fn instagram_video() -> Value {
        json!({
            "id": "3210987654321",
            "shortcode": "C1a2b3c4",
            "display_url": "https://scontent.cdninstagram.com/d.jpg",
            "taken_at_timestamp": 1700000000,
            "video_view_count": 900000,
            "video_duration": 14.5,
            "edge_media_to_caption": { "edges": [{ "node": { "text": "Behind the scenes #reels #bts" } }] },
            "edge_media_preview_like": { "count": 45000 },
            "edge_media_to_comment": { "count": 1200 }
        })
    }

    /// Video mapping reading every required field from a same-named key.
    fn flat_video_mapping(platform: &str) -> PlatformMapping {
        PlatformMapping::new(platform)
            .video_field("videoUrl", vec![MappingRule::from_path("videoUrl").required()])
            .video_field("thumbnailUrl", vec![MappingRule::from_path("thumbnailUrl")])
            .video_field(
                "publishedAt",
                vec![MappingRule::from_path("publishedAt").with_transform(Transform::ParseTimestamp)],
            )
            .video_field("title", vec![MappingRule::from_path("title")])
            .video_field(
                "tags",
                vec![MappingRule::from_path("tags").with_default(json!([]))],
            )
            .video_field(
                "viewCount",
                vec![MappingRule::from_path("views").with_transform(Transform::ToNumber)],
            )
            .video_field(
                "likeCount",
                vec![MappingRule::from_path("likes").with_transform(Transform::ToNumber)],
            )
            .video_field(
                "commentCount",
                vec![MappingRule::from_path("comments").with_transform(Transform::ToNumber)],
            )
            .video_field(
                "shareCount",
                vec![MappingRule::from_path("shares").with_transform(Transform::ToNumber)],
            )
    }

    fn flat_video() -> Value {
        json!({
            "id": "v123",
            "videoUrl": "https://example.com/v123",
            "thumbnailUrl": "https://example.com/v123.jpg",
            "publishedAt": 1700000000,
            "title": "Flat",
            "views": "1,234 views",
            "likes": 5,
            "comments": 0,
            "shares": 1
        })
    }

    fn transformer_with(mapping: PlatformMapping) -> DataTransformer {
        let mut registry = MappingRegistry::builtin();
        registry.insert(mapping);
        DataTransformer::new(registry)
    }

    #[test]
    fn test_tiktok_profile() {
        let result = transform_profile(
            "tiktok",
            &tiktok_profile(),
            "DanceQueen",
            "https://www.tiktok.com/@dancequeen",
        );
        let profile = result.into_result().unwrap();
        assert_eq!(profile.platform, "tiktok");
        assert_eq!(profile.username, "dancequeen");
        assert_eq!(profile.display_name, "Dance Queen");
        assert_eq!(profile.follower_count, 1_200_000);
        assert_eq!(profile.total_videos, 412);
        assert!(profile.is_verified);
        assert_eq!(profile.external_id, "6789");
        assert_eq!(profile.profile_url, "https://www.tiktok.com/@dancequeen");
        assert_eq!(profile.following_count, Some(150));
        assert_eq!(profile.total_likes, Some(98_000_000));
        assert_eq!(profile.bio.as_deref(), Some("dance daily"));
    }

    #[test]
    fn test_tiktok_video() {
        let video = transform_video("tiktok", &tiktok_video()).into_result().unwrap();
        assert_eq!(video.video_id.as_deref(), Some("7301234567890"));
        assert_eq!(video.thumbnail_url, "https://p16.tiktokcdn.com/c.jpg");
        assert_eq!(video.published_at, "2023-11-14T22:13:20.000Z");
        assert_eq!(video.title, "new routine #dance #fyp");
        assert_eq!(video.tags, vec!["dance", "fyp"]);
        assert_eq!(video.view_count, 52_000);
        assert_eq!(video.share_count, 12);
        assert_eq!(video.save_count, Some(300));
        assert_eq!(video.duration, Some(31));
    }

    #[test]
    fn test_youtube_profile() {
        let profile = transform_profile("youtube", &youtube_profile(), "rick", "https://www.youtube.com/@rickastleyyt")
            .into_result()
            .unwrap();
        assert_eq!(profile.username, "rickastleyyt");
        assert_eq!(profile.display_name, "Rick Astley");
        assert_eq!(profile.follower_count, 4_100_000);
        assert_eq!(profile.total_views, Some(2_500_000_000));
        assert!(!profile.is_verified);
        assert_eq!(profile.avatar_url.as_deref(), Some("https://yt3.ggpht.com/h.jpg"));
    }

    #[test]
    fn test_youtube_video() {
        let video = transform_video("youtube", &youtube_video()).into_result().unwrap();
        assert_eq!(video.video_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(video.thumbnail_url, "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
        assert_eq!(video.published_at, "2009-10-25T06:57:33.000Z");
        assert_eq!(video.tags, vec!["rick", "80s"]);
        assert_eq!(video.view_count, 1_500_000_000);
        assert_eq!(video.share_count, 0);
        assert_eq!(video.duration, Some(213));
    }

    #[test]
    fn test_youtube_search_result_id() {
        let mut raw = youtube_video();
        raw["id"] = json!({ "kind": "youtube#video", "videoId": "dQw4w9WgXcQ" });
        let video = transform_video("youtube", &raw).into_result().unwrap();
        assert_eq!(video.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(video.video_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_instagram_profile_and_video() {
        let profile = transform_profile("instagram", &instagram_profile(), "instagram", "https://www.instagram.com/instagram/")
            .into_result()
            .unwrap();
        assert_eq!(profile.follower_count, 672_000_000);
        assert_eq!(profile.total_videos, 7600);
        assert_eq!(profile.external_id, "25025320");

        let video = transform_video("instagram", &instagram_video()).into_result().unwrap();
        assert_eq!(video.video_url, "https://www.instagram.com/p/C1a2b3c4/");
        assert_eq!(video.title, "Behind the scenes #reels #bts");
        assert_eq!(video.tags, vec!["reels", "bts"]);
        assert_eq!(video.view_count, 900_000);
        assert_eq!(video.duration, Some(14));
        assert_eq!(video.share_count, 0);
    }

    #[test]
    fn test_missing_required_source_fails() {
        let mut raw = tiktok_profile();
        raw["stats"].as_object_mut().unwrap().remove("followerCount");

        let result = transform_profile("tiktok", &raw, "dancequeen", "url");
        assert!(!result.is_success());
        let kinds: Vec<ErrorKind> = result
            .errors()
            .iter()
            .filter(|e| e.field == "followerCount")
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, vec![ErrorKind::RequiredMissing, ErrorKind::ValidationMissing]);
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let result = transform_video("tiktok", &json!({ "id": "1" }));
        let fields: Vec<&str> = result.errors().iter().map(|e| e.field.as_str()).collect();
        for field in ["thumbnailUrl", "publishedAt", "viewCount", "likeCount", "commentCount", "shareCount"] {
            assert!(fields.contains(&field), "no error for {}", field);
        }
    }

    #[test]
    fn test_unsupported_platform() {
        let result = transform_profile("myspace", &json!({}), "u", "url");
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::UnsupportedPlatform);
        assert_eq!(errors[0].actual_value, json!("myspace"));
    }

    #[test]
    fn test_video_id_falls_back_to_payload_id() {
        let transformer = transformer_with(flat_video_mapping("flat"));
        let video = transformer.transform_video("flat", &flat_video()).into_result().unwrap();
        assert_eq!(video.video_id.as_deref(), Some("v123"));
        assert_eq!(video.view_count, 1234);
        assert_eq!(video.tags, Vec::<String>::new());

        let mut raw = flat_video();
        raw["id"] = json!(991);
        let video = transformer.transform_video("flat", &raw).into_result().unwrap();
        assert_eq!(video.video_id.as_deref(), Some("991"));
    }

    #[test]
    fn test_fallback_after_failing_transform_still_fails_record() {
        let mapping = flat_video_mapping("flat").video_field(
            "duration",
            vec![
                MappingRule::from_path("length").with_transform(Transform::ParseDuration),
                MappingRule::from_path("seconds").with_transform(Transform::ToNumber),
            ],
        );
        let transformer = transformer_with(mapping);
        let mut raw = flat_video();
        raw["length"] = json!(90);
        raw["seconds"] = json!(90);

        let result = transformer.transform_video("flat", &raw);
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "duration");
        assert_eq!(errors[0].kind, ErrorKind::TransformError);
    }

    #[test]
    fn test_validation_list_is_independent_of_rule_flags() {
        // no rule marks shareCount required, the fixed list still does
        let mut raw = flat_video();
        raw.as_object_mut().unwrap().remove("shares");
        let transformer = transformer_with(flat_video_mapping("flat"));

        let errors = transformer.transform_video("flat", &raw).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "shareCount");
        assert_eq!(errors[0].kind, ErrorKind::ValidationMissing);
    }

    #[test]
    fn test_required_with_default_reports_error() {
        let mapping = flat_video_mapping("flat").video_field(
            "title",
            vec![MappingRule::from_path("title").required().with_default(json!("untitled"))],
        );
        let transformer = transformer_with(mapping);
        let mut raw = flat_video();
        raw.as_object_mut().unwrap().remove("title");

        let errors = transformer.transform_video("flat", &raw).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::RequiredMissing);
    }

    #[test]
    fn test_ill_typed_value_becomes_transformation_error() {
        let mapping = flat_video_mapping("flat")
            .video_field("viewCount", vec![MappingRule::from_path("views")]);
        let transformer = transformer_with(mapping);

        let errors = transformer.transform_video("flat", &flat_video()).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Transformation);
    }

    #[test]
    fn test_non_object_payload() {
        let result = transform_video("youtube", &json!(["not", "an", "object"]));
        assert!(!result.is_success());
        assert!(result.errors().iter().all(|e| e.kind != ErrorKind::Transformation));
    }

    #[test]
    fn test_kind_without_fields_is_unsupported() {
        let mapping = PlatformMapping::new("vimeo")
            .video_field("videoUrl", vec![MappingRule::from_path("link").required()]);
        let transformer = transformer_with(mapping);

        let errors = transformer
            .transform_profile("vimeo", &json!({}), "u", "url")
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::UnsupportedPlatform);

        // the video side is registered and runs extraction
        let errors = transformer.transform_video("vimeo", &json!({})).into_result().unwrap_err();
        assert!(errors.iter().all(|e| e.kind != ErrorKind::UnsupportedPlatform));
    }

    #[test]
    fn test_empty_seeded_username_is_missing() {
        let mut raw = tiktok_profile();
        raw["user"].as_object_mut().unwrap().remove("uniqueId");

        let errors = transform_profile("tiktok", &raw, "", "https://www.tiktok.com/@")
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "username");
        assert_eq!(errors[0].kind, ErrorKind::ValidationMissing);

        let profile = transform_profile("tiktok", &raw, "dancequeen", "https://www.tiktok.com/@dancequeen")
            .into_result()
            .unwrap();
        assert_eq!(profile.username, "dancequeen");
    }

    #[test]
    fn test_oversized_duration_does_not_panic() {
        let mut raw = youtube_video();
        raw["contentDetails"]["duration"] = json!("PT9999999999999999H");
        let video = transform_video("youtube", &raw).into_result().unwrap();
        assert_eq!(video.duration, Some(0));
    }

    #[test]
    fn test_tiktok_video_url_uses_author_handle() {
        let mut raw = tiktok_video();
        raw.as_object_mut().unwrap().remove("webVideoUrl");
        raw["author"] = json!({ "uniqueId": "dancequeen" });
        let video = transform_video("tiktok", &raw).into_result().unwrap();
        assert_eq!(video.video_url, "https://www.tiktok.com/@dancequeen/video/7301234567890");

        raw.as_object_mut().unwrap().remove("author");
        let video = transform_video("tiktok", &raw).into_result().unwrap();
        assert_eq!(video.video_url, "https://www.tiktok.com/@/video/7301234567890");
    }

    #[test]
    fn test_concurrent_transforms_agree() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataTransformer>();
        assert_send_sync::<MappingRegistry>();

        let raw = tiktok_profile();
        let expected = transform_profile("tiktok", &raw, "u", "url").into_result().unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..25)
                            .map(|_| DEFAULT_TRANSFORMER.transform_profile("tiktok", &raw, "u", "url"))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                for result in handle.join().unwrap() {
                    assert_eq!(result.into_result().unwrap(), expected);
                }
            }
        });
    }

    #[test]
    fn test_idempotent_except_last_updated() {
        let raw = youtube_video();
        let mut first = transform_video("youtube", &raw).into_result().unwrap();
        let mut second = transform_video("youtube", &raw).into_result().unwrap();
        first.last_updated_at.clear();
        second.last_updated_at.clear();
        assert_eq!(first, second);

        let a = transform_profile("tiktok", &tiktok_profile(), "u", "url");
        let b = transform_profile("tiktok", &tiktok_profile(), "u", "url");
        assert_eq!(a, b);
    }
}
