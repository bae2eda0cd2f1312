//! Fixed demo records shown for any entity type the backing store has no
//! rows for.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::{
    Asset, AssetKind, Brand, ChecklistItem, Client, DocStatus, EventKind, Invoice, LeadIntake,
    LeadPlatform, LeadStatus, Message, PackageType, Payment, Platform, Project, ProjectStatus,
    Sender, TimelineEvent,
};

/// Seed lists for every collection the loader fetches.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub projects: Vec<Project>,
    pub clients: Vec<Client>,
    pub leads: Vec<LeadIntake>,
    pub assets: Vec<Asset>,
    pub invoices: Vec<Invoice>,
    pub payments: Vec<Payment>,
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            projects: projects(),
            clients: clients(),
            leads: leads(),
            assets: assets(),
            invoices: invoices(),
            payments: Vec::new(),
        }
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, hour, min, 0).single()
}

fn message(id: &str, sender: Sender, text: &str, timestamp: Option<DateTime<Utc>>, platform: Platform) -> Message {
    Message {
        id: id.to_string(),
        client_id: "c1".to_string(),
        sender,
        text: text.to_string(),
        timestamp: timestamp.unwrap_or_default(),
        platform,
    }
}

fn event(id: &str, kind: EventKind, title: &str, description: &str, date: NaiveDate, icon: &str) -> TimelineEvent {
    TimelineEvent {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        date,
        icon: icon.to_string(),
    }
}

pub fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "c1".to_string(),
            name: "Lil Echo".to_string(),
            alias: Some("Echo".to_string()),
            email: "echo@neonrecords.com".to_string(),
            phone: "+1234567890".to_string(),
            instagram: Some("@lil_echo_official".to_string()),
            tiktok: Some("@echo_sounds".to_string()),
            bio: Some(
                "Emerging trap artist from South London. Focused on heavy sub-basses and melodic hooks."
                    .to_string(),
            ),
            whatsapp_link: "https://wa.me/1234567890".to_string(),
            source: "Meta Ads".to_string(),
            brand: Brand::CantiRecords,
            genre_tags: vec!["Hip-Hop".to_string(), "Trap".to_string()],
            status: ProjectStatus::Active,
            last_contact_date: day(2023, 8, 15),
            avatar_url: "https://picsum.photos/seed/echo/200".to_string(),
            conversations: vec![
                message(
                    "m1",
                    Sender::Client,
                    "Yo, I saw the ad for Combo 2. I need that for my next EP.",
                    at(2023, 8, 10, 10, 0),
                    Platform::WhatsApp,
                ),
                message(
                    "m2",
                    Sender::Operator,
                    "Safe Echo! Yeah, we can definitely make it happen. What genre are we looking at?",
                    at(2023, 8, 10, 10, 5),
                    Platform::WhatsApp,
                ),
                message(
                    "m3",
                    Sender::Client,
                    "Dark trap vibes. Hard sub bass. Check this demo link: [SoundCloud Link]",
                    at(2023, 8, 10, 10, 15),
                    Platform::WhatsApp,
                ),
                message(
                    "m4",
                    Sender::Operator,
                    "Dope. This fits the Canti Records sound perfectly. Let's get the lyrics started.",
                    at(2023, 8, 10, 11, 0),
                    Platform::WhatsApp,
                ),
                message(
                    "m5",
                    Sender::Client,
                    "When can we hit the studio?",
                    at(2023, 8, 12, 14, 0),
                    Platform::Instagram,
                ),
            ],
            timeline: vec![
                event(
                    "e1",
                    EventKind::Message,
                    "Initial Outreach",
                    "Lead converted from Instagram Ad to WhatsApp.",
                    day(2023, 8, 10),
                    "campaign",
                ),
                event(
                    "e2",
                    EventKind::Milestone,
                    "Contract Locked",
                    "Combo 2 Project structure agreed upon.",
                    day(2023, 8, 12),
                    "gavel",
                ),
                event(
                    "e3",
                    EventKind::Payment,
                    "Deposit Received",
                    "First 50% payment for Neon Nights EP.",
                    day(2023, 8, 13),
                    "payments",
                ),
                event(
                    "e4",
                    EventKind::Asset,
                    "V1 Instrumental Sent",
                    "Final HQ wav uploaded to vault.",
                    day(2023, 8, 14),
                    "audio_file",
                ),
            ],
        },
        Client {
            id: "c2".to_string(),
            name: "Yung Wave".to_string(),
            alias: None,
            email: "wavey@canti.media".to_string(),
            phone: "+0987654321".to_string(),
            instagram: Some("@yungwave_prod".to_string()),
            tiktok: None,
            bio: Some("Experimental R&B producer and vocalist. High aesthetic focus.".to_string()),
            whatsapp_link: "https://wa.me/0987654321".to_string(),
            source: "Referral".to_string(),
            brand: Brand::CantiMedia,
            genre_tags: vec!["R&B".to_string(), "Soul".to_string()],
            status: ProjectStatus::Active,
            last_contact_date: day(2023, 8, 14),
            avatar_url: "https://picsum.photos/seed/wave/200".to_string(),
            conversations: Vec::new(),
            timeline: Vec::new(),
        },
    ]
}

pub fn projects() -> Vec<Project> {
    vec![Project {
        id: "p1".to_string(),
        client_id: "c1".to_string(),
        title: "Neon Nights EP".to_string(),
        package: PackageType::Combo2,
        status: ProjectStatus::Active,
        progress: 45,
        value: 2500.0,
        payments: Vec::new(),
        checklist: vec![
            ChecklistItem::new("1", "Lyrics Writing", true),
            ChecklistItem::new("2", "Instrumental Creation", true),
            ChecklistItem::new("3", "Practice Period", true),
            ChecklistItem::new("4", "Studio Vocal Recording", false),
            ChecklistItem::new("5", "Mixing & Mastering", false),
        ],
        start_date: day(2023, 8, 12),
        target_date: day(2023, 9, 30),
        genre: "Hip-Hop".to_string(),
    }]
}

pub fn leads() -> Vec<LeadIntake> {
    vec![
        LeadIntake {
            id: "l1".to_string(),
            name: "Z-Diddy".to_string(),
            source: "Meta Ads (Insta)".to_string(),
            date: day(2023, 8, 20),
            platform: LeadPlatform::WhatsApp,
            status: LeadStatus::Warm,
            initial_budget: Some(1500.0),
        },
        LeadIntake {
            id: "l2".to_string(),
            name: "The Void".to_string(),
            source: "Referral".to_string(),
            date: day(2023, 8, 19),
            platform: LeadPlatform::Messenger,
            status: LeadStatus::Converted,
            initial_budget: None,
        },
        LeadIntake {
            id: "l3".to_string(),
            name: "Sara X".to_string(),
            source: "Meta Ads (FB)".to_string(),
            date: day(2023, 8, 18),
            platform: LeadPlatform::WhatsApp,
            status: LeadStatus::Cold,
            initial_budget: Some(2500.0),
        },
    ]
}

pub fn invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: "INV-001".to_string(),
            client_id: "c1".to_string(),
            amount: 1500.0,
            status: DocStatus::Sent,
            due_date: day(2023, 9, 1),
            items: vec!["Combo 2 Deposit".to_string()],
            sent_at: at(2023, 8, 10, 14, 0),
            viewed_at: None,
        },
        Invoice {
            id: "INV-002".to_string(),
            client_id: "c2".to_string(),
            amount: 600.0,
            status: DocStatus::Paid,
            due_date: day(2023, 8, 15),
            items: vec!["Combo 1 Partial".to_string()],
            sent_at: None,
            viewed_at: at(2023, 8, 11, 9, 30),
        },
        Invoice {
            id: "INV-003".to_string(),
            client_id: "c1".to_string(),
            amount: 500.0,
            status: DocStatus::Viewed,
            due_date: day(2023, 8, 10),
            items: vec!["Weekly Payment".to_string()],
            sent_at: None,
            viewed_at: at(2023, 8, 14, 18, 22),
        },
    ]
}

pub fn assets() -> Vec<Asset> {
    vec![
        Asset {
            id: "a1".to_string(),
            project_id: "p1".to_string(),
            name: "Neon_Nights_V1.mp3".to_string(),
            kind: AssetKind::Demo,
            url: "#".to_string(),
            uploaded_at: day(2023, 8, 16),
            size: "8.4 MB".to_string(),
        },
        Asset {
            id: "a2".to_string(),
            project_id: "p1".to_string(),
            name: "Final_Instrumental_HQ.wav".to_string(),
            kind: AssetKind::Instrumental,
            url: "#".to_string(),
            uploaded_at: day(2023, 8, 14),
            size: "42.1 MB".to_string(),
        },
    ]
}
