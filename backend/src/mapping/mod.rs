//! Declarative field mappings from platform payloads to normalized records.
//!
//! - `rule`: mapping rules, field mappings and per-platform mapping files
//! - `operations`: the closed set of transforms a rule may apply
//! - `builtin`: mappings shipped for TikTok, Instagram and YouTube
//!
//! ## Example mapping file
//!
//! ```json
//! {
//!   "platform": "vimeo",
//!   "video": {
//!     "viewCount": [
//!       { "source": "stats.plays", "required": true, "transform": { "type": "to_number" } }
//!     ]
//!   }
//! }
//! ```

pub mod builtin;
pub mod operations;
pub mod rule;

pub use builtin::builtin_mappings;
pub use operations::{transforms_description, Transform};
pub use rule::{FieldMapping, MappingRule, PlatformMapping};
