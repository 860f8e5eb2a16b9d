pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const JOIN: &str = "🟢";
    pub const LEAVE: &str = "🔴";
    pub const CALENDAR: &str = "📅";
    pub const UPLOAD: &str = "📤";
    pub const TABLE: &str = "📋";
    pub const TASK: &str = "📌";
    pub const GEAR: &str = "⚙️";
    pub const SEED: &str = "🌱";
}
