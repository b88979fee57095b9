//! Data models
//!
//! Plain records held by the entity store.
//! All models use ULID for IDs and chrono for timestamps.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
///
/// Seed records use short literal ids ("1", "p1", "s1", "n1") which can
/// never be produced by this generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Generate a new ULID behind a fixed prefix (e.g. "u_", "manual_")
    pub fn prefixed(prefix: &str) -> Self {
        Self(format!("{}{}", prefix, ulid::Ulid::new()))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// Role of a community member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Resident,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered community member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Display name (e.g., "Pak Budi (Ketua RT)")
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Avatar image URL
    pub avatar: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// First word of the display name, used in greetings
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Kind of incident being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    /// Suspicious person or activity
    Suspicious,
    /// Overnight guest registration
    Guest,
    Theft,
    Other,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 4] = [Self::Suspicious, Self::Guest, Self::Theft, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suspicious => "suspicious",
            Self::Guest => "guest",
            Self::Theft => "theft",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report lifecycle status
///
/// Moves forward only: `pending -> processed -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Processed,
    Completed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Completed => "completed",
        }
    }

    /// Statuses an administrator may move a report to from here
    ///
    /// This is the full set of actions the admin path offers: exactly one
    /// step forward, nothing once completed.
    pub fn available_transitions(&self) -> &'static [ReportStatus] {
        match self {
            Self::Pending => &[Self::Processed],
            Self::Processed => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        self.available_transitions().contains(&next)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incident report filed by a resident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub kind: IncidentKind,
    pub description: String,
    pub location: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    /// Display name of the reporter at submission time
    pub reporter_name: String,
    /// Reference to an attached photo
    pub image_url: Option<String>,
    /// Safety advice produced by the AI collaborator
    pub ai_analysis: Option<String>,
}

// =============================================================================
// Patrol Shift
// =============================================================================

/// Patrol shift lifecycle status
///
/// Unlike reports, any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Scheduled,
    Active,
    Completed,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A night-patrol (ronda) assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    /// Assignee identifier ("manual_*" for names typed in by an admin)
    pub user_id: String,
    pub user_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ShiftStatus,
}

impl Shift {
    /// True when the shift ends on the following day (e.g. 22:00 - 02:00)
    pub fn crosses_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

// =============================================================================
// Forum
// =============================================================================

/// Forum post category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    Security,
    Announcement,
    General,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Announcement => "announcement",
            Self::General => "general",
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reply on a forum post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A forum discussion
///
/// `likes` and `liked_by` move together: every id in `liked_by`
/// contributes exactly one to `likes`. The counter may also carry
/// likes from before the session started (seed data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub category: PostCategory,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    /// User ids that currently like this post
    pub liked_by: BTreeSet<String>,
    pub is_reported: bool,
    pub comments: Vec<Comment>,
}

impl ForumPost {
    /// Whether the given viewer has liked this post
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.contains(user_id)
    }
}

// =============================================================================
// Contacts
// =============================================================================

/// Directory entry (police, fire brigade, neighborhood officials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    /// Role label (e.g., "Ketua RT 05")
    pub role: String,
    pub phone: String,
    pub is_emergency: bool,
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification severity, also used for toasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    Info,
    Success,
    Alert,
}

impl NotificationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Alert => "alert",
        }
    }
}

impl fmt::Display for NotificationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-lifetime notification log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub severity: NotificationSeverity,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}
