//! Built-in platform mappings.
//!
//! Field paths follow the payloads returned by the scraping APIs the dashboard
//! uses: TikTok web `userInfo` / `itemStruct`, Instagram `web_profile_info`
//! user and timeline media nodes, YouTube Data API v3 channel and video
//! resources. Alternative paths cover the mobile/legacy shapes of the same APIs.

use serde_json::json;

use super::operations::Transform;
use super::rule::{MappingRule, PlatformMapping};
use crate::models::{INSTAGRAM, TIKTOK, YOUTUBE};

fn path(p: &str) -> MappingRule {
    MappingRule::from_path(p)
}

fn count(p: &str) -> MappingRule {
    path(p).with_transform(Transform::ToNumber)
}

fn text(p: &str) -> MappingRule {
    path(p).with_transform(Transform::ToString)
}

fn timestamp(p: &str) -> MappingRule {
    path(p).with_transform(Transform::ParseTimestamp)
}

fn flag(p: &str) -> MappingRule {
    path(p).with_transform(Transform::ToBoolean)
}

fn hashtags(p: &str) -> MappingRule {
    path(p).with_transform(Transform::ExtractHashtags)
}

fn url(p: &str, template: &str) -> MappingRule {
    path(p).with_transform(Transform::Template {
        template: template.to_string(),
    })
}

/// All built-in platform mappings
pub fn builtin_mappings() -> Vec<PlatformMapping> {
    vec![tiktok(), instagram(), youtube()]
}

pub fn tiktok() -> PlatformMapping {
    let mut mapping = PlatformMapping::new(TIKTOK)
        // Profile
        .profile_field("username", vec![path("user.uniqueId"), path("unique_id")])
        .profile_field(
            "displayName",
            vec![path("user.nickname").required(), path("nickname")],
        )
        .profile_field(
            "followerCount",
            vec![
                count("stats.followerCount").required(),
                count("statsV2.followerCount"),
                count("follower_count"),
            ],
        )
        .profile_field(
            "followingCount",
            vec![
                count("stats.followingCount"),
                count("following_count").with_default(json!(0)),
            ],
        )
        .profile_field(
            "totalVideos",
            vec![count("stats.videoCount").required(), count("aweme_count")],
        )
        .profile_field(
            "totalLikes",
            vec![count("stats.heartCount"), count("stats.heart"), count("total_favorited")],
        )
        .profile_field(
            "isVerified",
            vec![flag("user.verified"), flag("verified").with_default(json!(false))],
        )
        .profile_field(
            "externalId",
            vec![text("user.id").required(), text("uid"), text("user.secUid")],
        )
        .profile_field("bio", vec![path("user.signature"), path("signature")])
        .profile_field(
            "avatarUrl",
            vec![
                path("user.avatarLarger"),
                path("user.avatarMedium"),
                path("avatar_larger.url_list.0"),
            ],
        )
        // Video
        .video_field("videoId", vec![text("id"), text("aweme_id")])
        .video_field(
            "videoUrl",
            vec![
                path("webVideoUrl"),
                path("share_url"),
                url("id", "https://www.tiktok.com/@{author.uniqueId}/video/{}"),
                url("id", "https://www.tiktok.com/@{author}/video/{}"),
                url("aweme_id", "https://www.tiktok.com/@{author.unique_id}/video/{}"),
                url("id", "https://www.tiktok.com/@/video/{}"),
            ],
        )
        .video_field(
            "thumbnailUrl",
            // mobile payloads nest the cover under url_list, web ones are plain strings
            vec![
                path("video.cover.url_list.0"),
                path("video.cover").required(),
                path("video.originCover"),
            ],
        )
        .video_field(
            "publishedAt",
            vec![timestamp("createTime").required(), timestamp("create_time")],
        )
        .video_field("title", vec![path("desc"), path("title").with_default(json!(""))])
        .video_field("description", vec![path("desc")])
        .video_field(
            "tags",
            vec![
                path("challenges").with_transform(Transform::PluckList {
                    key: "title".to_string(),
                }),
                path("cha_list").with_transform(Transform::PluckList {
                    key: "cha_name".to_string(),
                }),
                hashtags("desc").with_default(json!([])),
            ],
        )
        .video_field(
            "viewCount",
            vec![count("stats.playCount").required(), count("statistics.play_count")],
        )
        .video_field(
            "likeCount",
            vec![count("stats.diggCount").required(), count("statistics.digg_count")],
        )
        .video_field(
            "commentCount",
            vec![count("stats.commentCount").required(), count("statistics.comment_count")],
        )
        .video_field(
            "shareCount",
            vec![count("stats.shareCount").required(), count("statistics.share_count")],
        )
        .video_field(
            "saveCount",
            vec![count("stats.collectCount"), count("statistics.collect_count")],
        )
        .video_field("duration", vec![count("video.duration")]);
    mapping.description = "TikTok web and mobile API payloads".to_string();
    mapping
}

pub fn instagram() -> PlatformMapping {
    let mut mapping = PlatformMapping::new(INSTAGRAM)
        // Profile
        .profile_field("username", vec![path("username"), path("data.user.username")])
        .profile_field(
            "displayName",
            vec![
                path("full_name"),
                path("data.user.full_name"),
                path("username").required(),
            ],
        )
        .profile_field(
            "followerCount",
            vec![
                count("edge_followed_by.count").required(),
                count("follower_count"),
                count("data.user.edge_followed_by.count"),
            ],
        )
        .profile_field(
            "followingCount",
            vec![count("edge_follow.count"), count("following_count")],
        )
        .profile_field(
            "totalVideos",
            vec![
                count("edge_owner_to_timeline_media.count").required(),
                count("media_count"),
            ],
        )
        .profile_field("isVerified", vec![flag("is_verified").with_default(json!(false))])
        .profile_field("externalId", vec![text("id").required(), text("pk")])
        .profile_field("bio", vec![path("biography")])
        .profile_field(
            "avatarUrl",
            vec![path("profile_pic_url_hd"), path("profile_pic_url")],
        )
        // Video
        .video_field("videoId", vec![text("id"), text("pk")])
        .video_field(
            "videoUrl",
            vec![
                url("shortcode", "https://www.instagram.com/p/{}/").required(),
                url("code", "https://www.instagram.com/p/{}/"),
            ],
        )
        .video_field(
            "thumbnailUrl",
            vec![
                path("display_url").required(),
                path("thumbnail_src"),
                path("image_versions2.candidates.0.url"),
            ],
        )
        .video_field(
            "publishedAt",
            vec![timestamp("taken_at_timestamp").required(), timestamp("taken_at")],
        )
        .video_field(
            "title",
            vec![
                path("edge_media_to_caption.edges.0.node.text"),
                path("caption.text").with_default(json!("")),
            ],
        )
        .video_field(
            "description",
            vec![path("edge_media_to_caption.edges.0.node.text"), path("caption.text")],
        )
        .video_field(
            "tags",
            vec![
                hashtags("edge_media_to_caption.edges.0.node.text"),
                hashtags("caption.text").with_default(json!([])),
            ],
        )
        .video_field(
            "viewCount",
            vec![
                count("video_view_count"),
                count("play_count"),
                count("view_count").with_default(json!(0)),
            ],
        )
        .video_field(
            "likeCount",
            vec![
                count("edge_media_preview_like.count").required(),
                count("edge_liked_by.count"),
                count("like_count"),
            ],
        )
        .video_field(
            "commentCount",
            vec![count("edge_media_to_comment.count").required(), count("comment_count")],
        )
        .video_field("shareCount", vec![count("share_count").with_default(json!(0))])
        .video_field("saveCount", vec![count("save_count")])
        .video_field("duration", vec![count("video_duration")]);
    mapping.description = "Instagram web_profile_info and media node payloads".to_string();
    mapping
}

pub fn youtube() -> PlatformMapping {
    let mut mapping = PlatformMapping::new(YOUTUBE)
        // Profile
        .profile_field(
            "username",
            vec![path("snippet.customUrl").with_transform(Transform::StripPrefix {
                prefix: "@".to_string(),
            })],
        )
        .profile_field("displayName", vec![path("snippet.title").required(), path("title")])
        .profile_field(
            "followerCount",
            vec![
                count("statistics.subscriberCount").required(),
                count("subscriberCount"),
            ],
        )
        .profile_field(
            "totalVideos",
            vec![count("statistics.videoCount").required(), count("videoCount")],
        )
        .profile_field(
            "totalViews",
            vec![count("statistics.viewCount"), count("viewCount")],
        )
        .profile_field(
            "isVerified",
            vec![flag("verified"), flag("snippet.isVerified").with_default(json!(false))],
        )
        .profile_field("externalId", vec![text("id").required(), text("channelId")])
        .profile_field("bio", vec![path("snippet.description"), path("description")])
        .profile_field(
            "avatarUrl",
            vec![
                path("snippet.thumbnails.high.url"),
                path("snippet.thumbnails.medium.url"),
                path("snippet.thumbnails.default.url"),
            ],
        )
        // Video
        .video_field("videoId", vec![text("id.videoId"), text("id")])
        .video_field(
            "videoUrl",
            vec![
                url("id.videoId", "https://www.youtube.com/watch?v={}"),
                url("id", "https://www.youtube.com/watch?v={}").required(),
            ],
        )
        .video_field(
            "thumbnailUrl",
            vec![
                path("snippet.thumbnails.maxres.url"),
                path("snippet.thumbnails.high.url"),
                path("snippet.thumbnails.medium.url"),
                path("snippet.thumbnails.default.url").required(),
            ],
        )
        .video_field("publishedAt", vec![timestamp("snippet.publishedAt").required()])
        .video_field("title", vec![path("snippet.title").required()])
        .video_field("description", vec![path("snippet.description")])
        .video_field(
            "tags",
            vec![
                path("snippet.tags").with_transform(Transform::StringList),
                hashtags("snippet.description").with_default(json!([])),
            ],
        )
        .video_field("viewCount", vec![count("statistics.viewCount").required()])
        // likes and comments can be hidden by the channel owner
        .video_field(
            "likeCount",
            vec![count("statistics.likeCount").with_default(json!(0))],
        )
        .video_field(
            "commentCount",
            vec![count("statistics.commentCount").with_default(json!(0))],
        )
        .video_field(
            "shareCount",
            vec![count("statistics.shareCount").with_default(json!(0))],
        )
        .video_field("saveCount", vec![count("statistics.favoriteCount")])
        .video_field(
            "duration",
            vec![path("contentDetails.duration").with_transform(Transform::ParseDuration)],
        );
    mapping.description = "YouTube Data API v3 channel and video resources".to_string();
    mapping
}
