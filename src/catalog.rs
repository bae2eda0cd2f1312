//! Static studio catalog: the services menu, app plans, legal templates and
//! split sheets on file.

use chrono::NaiveDate;

use crate::models::{AppPlan, LegalTemplate, Service, SplitParticipant, SplitSheet, SplitStatus};

/// Id of the split sheet template in [`legal_templates`].
pub const SPLIT_SHEET_TEMPLATE: &str = "t1";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn services() -> Vec<Service> {
    vec![
        Service {
            id: "s1".to_string(),
            name: "Combo 1: The Foundation".to_string(),
            price: 1200.0,
            description: "Full audio production package from lyrics to master.".to_string(),
            includes: strings(&[
                "Lyrics Writing",
                "Instrumental Creation",
                "Practice Period",
                "Vocal Recording",
                "Mixing & Mastering",
            ]),
        },
        Service {
            id: "s2".to_string(),
            name: "Combo 2: The Rollout".to_string(),
            price: 2500.0,
            description: "Everything in Combo 1 plus visual production and distribution support."
                .to_string(),
            includes: strings(&[
                "Everything in Combo 1",
                "Music Video Production",
                "Distribution Support",
                "Social Media Rollout Plan",
            ]),
        },
    ]
}

pub fn plans() -> Vec<AppPlan> {
    vec![
        AppPlan {
            id: "p-free".to_string(),
            name: "Standard Operator".to_string(),
            price: "$0".to_string(),
            features: strings(&[
                "Up to 5 Active Projects",
                "Manual WhatsApp Logging",
                "Standard Legal Templates",
                "Basic Dashboard",
            ]),
            is_popular: false,
        },
        AppPlan {
            id: "p-pro".to_string(),
            name: "Studio Pro".to_string(),
            price: "$49".to_string(),
            features: strings(&[
                "Unlimited Projects",
                "AI Conversation Summaries",
                "Auto-Syncing CRM",
                "Custom Invoicing Branding",
                "Advanced Marketing Insights",
            ]),
            is_popular: true,
        },
        AppPlan {
            id: "p-agency".to_string(),
            name: "Agency Elite".to_string(),
            price: "$129".to_string(),
            features: strings(&[
                "Multi-Operator Access",
                "White-label Client Portal",
                "Priority AI Processing",
                "Direct Meta Ads Integration",
                "Full Cloud Asset Hosting",
            ]),
            is_popular: false,
        },
    ]
}

pub fn legal_templates() -> Vec<LegalTemplate> {
    let template = |id: &str, title: &str, description: &str, icon: &str| LegalTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    };

    vec![
        template(
            SPLIT_SHEET_TEMPLATE,
            "Split Sheet Agreement",
            "Define song ownership and publishing shares between collaborators.",
            "gavel",
        ),
        template(
            "t2",
            "Master Recording License",
            "Grant rights to use a finished master for specific media.",
            "description",
        ),
        template(
            "t3",
            "Work For Hire",
            "Agreement for session musicians or videographers where user owns the result.",
            "work",
        ),
        template(
            "t4",
            "Marketing Agency Agreement",
            "Retainer contract for Canti Media marketing services.",
            "campaign",
        ),
    ]
}

pub fn split_sheets() -> Vec<SplitSheet> {
    vec![SplitSheet {
        id: "split-1".to_string(),
        project_id: "p1".to_string(),
        track_title: "Neon Nights".to_string(),
        status: SplitStatus::Sent,
        participants: vec![
            SplitParticipant {
                name: "Lil Echo".to_string(),
                role: "Artist".to_string(),
                share: 50.0,
            },
            SplitParticipant {
                name: "Canti Records".to_string(),
                role: "Producer".to_string(),
                share: 50.0,
            },
        ],
        sent_at: NaiveDate::from_ymd_opt(2023, 8, 14),
        viewed_at: NaiveDate::from_ymd_opt(2023, 8, 15),
    }]
}

pub fn split_sheets_for_project(project_id: &str) -> Vec<SplitSheet> {
    split_sheets()
        .into_iter()
        .filter(|s| s.project_id == project_id)
        .collect()
}
