//! Emoji that read well at the start of alert text.

pub const RED_DOWN_ARROW: &str = "🔻";
pub const RED_EXCLAMATION: &str = "❗";
pub const RED_X: &str = "❌";
pub const HOLLOW_RED_CIRCLE: &str = "⭕";
pub const RED_CIRCLE: &str = "🔴";
pub const YELLOW_CIRCLE: &str = "🟡";
pub const BLUE_CIRCLE: &str = "🔵";
pub const PURPLE_CIRCLE: &str = "🟣";
pub const BROWN_CIRCLE: &str = "🟤";
pub const GREEN_CIRCLE: &str = "🟢";
pub const GREEN_CHECK: &str = "✅";
pub const WARNING: &str = "⚠️";
pub const ROCKET: &str = "🚀";
pub const FIRE: &str = "🔥";
pub const TURTLE: &str = "🐢";
