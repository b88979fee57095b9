//! Demo dataset
//!
//! The records a fresh session starts from when `seed.enabled` is set.
//! Timestamps are relative to the `now` passed in so the data always
//! looks recent.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::models::*;

const ADMIN_AVATAR: &str = "https://ui-avatars.com/api/?name=Pak+Budi&background=0D8ABC&color=fff";
const RESIDENT_AVATAR: &str = "https://ui-avatars.com/api/?name=Ibu+Siti&background=random";

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Seed user accounts
pub fn users() -> Vec<User> {
    vec![
        User {
            id: "u_admin".to_string(),
            name: "Pak Budi (Ketua RT)".to_string(),
            email: "admin@siskamling.id".to_string(),
            role: UserRole::Admin,
            avatar: ADMIN_AVATAR.to_string(),
        },
        User {
            id: "u_resident".to_string(),
            name: "Ibu Siti (Warga)".to_string(),
            email: "warga@siskamling.id".to_string(),
            role: UserRole::Resident,
            avatar: RESIDENT_AVATAR.to_string(),
        },
    ]
}

/// Seed reports, newest first
pub fn reports(now: DateTime<Utc>) -> Vec<Report> {
    vec![
        Report {
            id: "1".to_string(),
            kind: IncidentKind::Suspicious,
            description: "Unknown person pacing back and forth in front of the RT head's house."
                .to_string(),
            location: "Jl. Merpati No. 1".to_string(),
            status: ReportStatus::Processed,
            created_at: now - Duration::hours(1),
            reporter_name: "Budi".to_string(),
            image_url: None,
            ai_analysis: None,
        },
        Report {
            id: "2".to_string(),
            kind: IncidentKind::Guest,
            description: "Three overnight guests at rental house No. 12.".to_string(),
            location: "Gg. Kutilang".to_string(),
            status: ReportStatus::Pending,
            created_at: now - Duration::hours(2),
            reporter_name: "Siti".to_string(),
            image_url: None,
            ai_analysis: None,
        },
    ]
}

/// Seed patrol shifts: two active tonight, one scheduled tomorrow
pub fn shifts(now: DateTime<Utc>) -> Vec<Shift> {
    let today = now.date_naive();
    let tomorrow = today + Duration::days(1);
    let shift = |id: &str, user_id: &str, user_name: &str, date, status| Shift {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        date,
        start_time: hm(22, 0),
        end_time: hm(2, 0),
        status,
    };

    vec![
        shift("s1", "u1", "Pak Joko", today, ShiftStatus::Active),
        shift("s2", "u2", "Pak Asep", today, ShiftStatus::Active),
        shift("s3", "u3", "Pak Budi", tomorrow, ShiftStatus::Scheduled),
    ]
}

/// Seed forum posts, newest first
pub fn posts(now: DateTime<Utc>) -> Vec<ForumPost> {
    vec![
        ForumPost {
            id: "p1".to_string(),
            author_id: "a1".to_string(),
            author_name: "Ketua RW 02".to_string(),
            author_avatar: String::new(),
            category: PostCategory::Announcement,
            title: "Community clean-up this week".to_string(),
            content: "All residents are asked to help clear the main drain this Sunday at 07:00."
                .to_string(),
            created_at: now - Duration::days(1),
            likes: 12,
            liked_by: BTreeSet::new(),
            is_reported: false,
            comments: vec![
                Comment {
                    id: "c1".to_string(),
                    author_name: "Pak RT".to_string(),
                    author_avatar:
                        "https://ui-avatars.com/api/?name=Pak+RT&background=random".to_string(),
                    content: "Ready, I will rally the residents of RT 05.".to_string(),
                    created_at: now - Duration::seconds(82_000),
                },
                Comment {
                    id: "c2".to_string(),
                    author_name: "Ibu Ani".to_string(),
                    author_avatar:
                        "https://ui-avatars.com/api/?name=Ibu+Ani&background=random".to_string(),
                    content: "Do we need to bring our own tools?".to_string(),
                    created_at: now - Duration::seconds(80_000),
                },
            ],
        },
        ForumPost {
            id: "p2".to_string(),
            author_id: "a2".to_string(),
            author_name: "Andi".to_string(),
            author_avatar: String::new(),
            category: PostCategory::Security,
            title: "Street light out".to_string(),
            content: "The street light at the end of alley 3 is completely out; it is very dark at night."
                .to_string(),
            created_at: now - Duration::days(2),
            likes: 5,
            liked_by: BTreeSet::from(["u_resident".to_string()]),
            is_reported: false,
            comments: vec![Comment {
                id: "c3".to_string(),
                author_name: "Kang Ujang".to_string(),
                author_avatar:
                    "https://ui-avatars.com/api/?name=Kang+Ujang&background=22c55e&color=fff"
                        .to_string(),
                content: "I will check it tonight during patrol.".to_string(),
                created_at: now - Duration::seconds(170_000),
            }],
        },
    ]
}

/// Emergency numbers and neighborhood officials
pub fn contacts() -> Vec<Contact> {
    let contact = |id: &str, name: &str, role: &str, phone: &str, is_emergency| Contact {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        phone: phone.to_string(),
        is_emergency,
    };

    vec![
        contact("c1", "Nearest Police Station", "Police", "110", true),
        contact("c2", "Fire Post", "Fire Brigade", "113", true),
        contact("c3", "Ambulance", "Medical", "118", true),
        contact("c4", "Bpk. Hartono", "Ketua RT 05", "081234567890", false),
        contact("c5", "Bpk. Wijaya", "Ketua RW 02", "081298765432", false),
        contact("c6", "Kang Ujang", "Linmas Coordinator", "081311223344", false),
    ]
}

/// Seed notifications, newest first
pub fn notifications(now: DateTime<Utc>) -> Vec<AppNotification> {
    vec![
        AppNotification {
            id: "n1".to_string(),
            title: "Welcome".to_string(),
            message: "Welcome to Siskamling Online. Let's keep the neighborhood safe together."
                .to_string(),
            severity: NotificationSeverity::Info,
            created_at: now,
            is_read: false,
        },
        AppNotification {
            id: "n2".to_string(),
            title: "Patrol schedule".to_string(),
            message: "This week's patrol schedule has been updated by the admin.".to_string(),
            severity: NotificationSeverity::Success,
            created_at: now - Duration::hours(1),
            is_read: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liked_seed_post_counts_its_liker() {
        let posts = posts(Utc::now());
        let p2 = posts.iter().find(|p| p.id == "p2").unwrap();
        assert!(p2.is_liked_by("u_resident"));
        assert!(p2.likes as usize >= p2.liked_by.len());
    }

    #[test]
    fn seed_ids_cannot_collide_with_generated_ids() {
        let now = Utc::now();
        let generated = EntityId::new().0;
        let seed_ids = reports(now)
            .into_iter()
            .map(|r| r.id)
            .chain(posts(now).into_iter().map(|p| p.id))
            .chain(shifts(now).into_iter().map(|s| s.id))
            .chain(notifications(now).into_iter().map(|n| n.id));
        for id in seed_ids {
            assert!(id.len() < generated.len());
        }
    }

    #[test]
    fn contacts_split_into_emergency_and_directory() {
        let contacts = contacts();
        assert_eq!(contacts.iter().filter(|c| c.is_emergency).count(), 3);
        assert_eq!(contacts.iter().filter(|c| !c.is_emergency).count(), 3);
    }
}
