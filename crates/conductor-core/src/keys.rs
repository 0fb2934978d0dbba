//! Well-known capability-provider keys and action names.
//!
//! Subtasks are bound to providers through these constants so resolution
//! against the registry happens once, by typed name, rather than through
//! scattered string literals.

/// Messaging backend: history search, collection, and the analytics cascade.
pub const MESSAGING: &str = "messaging";
/// Mail backend: history search, collection, and drafting.
pub const MAIL: &str = "mail";
/// File storage backend.
pub const FILES: &str = "files";
/// Issue-tracker backend.
pub const ISSUES: &str = "issues";
/// Generic conversational capability; also the fallback for generic
/// creation and analysis over collected history.
pub const CHAT: &str = "chat";
/// Outbound notification capability.
pub const NOTIFICATIONS: &str = "notifications";

/// Action names understood across providers.
pub mod actions {
    /// Search a data source.
    pub const SEARCH: &str = "search";
    /// Collect raw history for later analysis.
    pub const COLLECT_HISTORY: &str = "collect_history";
    /// Analyze previously collected history.
    pub const ANALYZE: &str = "analyze";
    /// Merge the results of sibling search subtasks.
    pub const MERGE_RESULTS: &str = "merge_results";
    /// Create a generic artifact.
    pub const CREATE: &str = "create";
    /// Create an issue in the tracker.
    pub const CREATE_ISSUE: &str = "create_issue";
    /// Draft an email.
    pub const DRAFT_EMAIL: &str = "draft_email";
    /// Send a notification.
    pub const NOTIFY: &str = "notify";
    /// Answer conversationally.
    pub const CHAT: &str = "chat";
    /// Run the messaging-analytics cascade.
    pub const ANALYZE_CONVERSATIONS: &str = "analyze_conversations";
}
