//! Domain models for normalized creator analytics records.
//!
//! - [`RecordKind`] - Which record shape a mapping produces
//! - [`ProfileData`] - Normalized creator profile
//! - [`VideoData`] - Normalized video / post
//!
//! Records serialize with camelCase keys, the same keys used as target fields
//! in platform mappings.

use serde::{Deserialize, Serialize};

// =============================================================================
// Platforms
// =============================================================================

pub const TIKTOK: &str = "tiktok";
pub const INSTAGRAM: &str = "instagram";
pub const YOUTUBE: &str = "youtube";

/// Platforms shipped with the built-in registry.
pub const BUILTIN_PLATFORMS: [&str; 3] = [TIKTOK, INSTAGRAM, YOUTUBE];

// =============================================================================
// Record Kind
// =============================================================================

/// Record shape produced by a field mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Profile,
    Video,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Video => "video",
        }
    }

    /// Fields that must be present in an assembled record.
    ///
    /// Independent of the `required` flags on mapping rules.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Profile => PROFILE_REQUIRED_FIELDS,
            Self::Video => VIDEO_REQUIRED_FIELDS,
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PROFILE_REQUIRED_FIELDS: &[&str] = &[
    "username",
    "displayName",
    "followerCount",
    "totalVideos",
    "isVerified",
    "externalId",
];

pub const VIDEO_REQUIRED_FIELDS: &[&str] = &[
    "videoUrl",
    "thumbnailUrl",
    "publishedAt",
    "title",
    "tags",
    "viewCount",
    "likeCount",
    "commentCount",
    "shareCount",
];

// =============================================================================
// Profile
// =============================================================================

/// Normalized creator profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub platform: String,
    pub username: String,
    pub display_name: String,
    pub follower_count: u64,
    pub total_videos: u64,
    pub is_verified: bool,
    pub external_id: String,
    pub profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_count: Option<u64>,
    /// Lifetime likes (TikTok hearts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_likes: Option<u64>,
    /// Lifetime channel views (YouTube).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_views: Option<u64>,
}

// =============================================================================
// Video
// =============================================================================

/// Normalized video or post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub video_url: String,
    pub thumbnail_url: String,
    /// ISO-8601 UTC.
    pub published_at: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_count: Option<u64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// ISO-8601 UTC time the record was produced.
    pub last_updated_at: String,
}
