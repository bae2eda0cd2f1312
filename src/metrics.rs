//! Figures derived from the loaded collections. Everything here is a pure
//! function of its inputs and is recomputed on every draw.

use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use crate::models::{Brand, ChecklistItem, Client, DocStatus, Invoice, Project, ProjectStatus};

/// Sum of the value of every project the client has, whatever its status.
pub fn lifetime_value(client_id: &str, projects: &[Project]) -> f64 {
    projects
        .iter()
        .filter(|p| p.client_id == client_id)
        .map(|p| p.value)
        .sum()
}

/// Clients with their lifetime value, highest first. Ties keep input order.
pub fn ltv_ranking<'a>(clients: &'a [Client], projects: &[Project]) -> Vec<(&'a Client, f64)> {
    let mut ranked: Vec<(&Client, f64)> = clients
        .iter()
        .map(|c| (c, lifetime_value(&c.id, projects)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

pub fn total_revenue(projects: &[Project]) -> f64 {
    projects.iter().map(|p| p.value).sum()
}

pub fn total_received(projects: &[Project]) -> f64 {
    projects.iter().map(project_received).sum()
}

/// Revenue not yet received. Overpayment makes this negative.
pub fn total_pending(projects: &[Project]) -> f64 {
    total_revenue(projects) - total_received(projects)
}

pub fn project_received(project: &Project) -> f64 {
    project.payments.iter().map(|p| p.amount).sum()
}

pub fn project_pending(project: &Project) -> f64 {
    project.value - project_received(project)
}

/// Received as a percentage of value; a zero value divides by one.
pub fn percent_paid(project: &Project) -> f64 {
    project_received(project) / nonzero(project.value) * 100.0
}

/// Paid share across all of a client's projects, as shown in the finance
/// ranking.
pub fn client_paid_percent(client_id: &str, projects: &[Project]) -> f64 {
    let (total, paid) = projects
        .iter()
        .filter(|p| p.client_id == client_id)
        .fold((0.0, 0.0), |(total, paid), p| {
            (total + p.value, paid + project_received(p))
        });
    paid / nonzero(total) * 100.0
}

fn nonzero(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

/// Overdue by status, or viewed with a due date (taken as midnight UTC)
/// already behind `now`.
pub fn is_effectively_overdue(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    match invoice.status {
        DocStatus::Overdue => true,
        DocStatus::Viewed => {
            let due = Utc.from_utc_datetime(&invoice.due_date.and_time(NaiveTime::MIN));
            due < now
        }
        _ => false,
    }
}

pub fn overdue_invoices(invoices: &[Invoice], now: DateTime<Utc>) -> Vec<&Invoice> {
    invoices
        .iter()
        .filter(|i| is_effectively_overdue(i, now))
        .collect()
}

/// Completed items as a whole percentage. An empty checklist is 0.
pub fn checklist_completion(checklist: &[ChecklistItem]) -> u32 {
    let done = checklist.iter().filter(|i| i.is_completed).count();
    let total = checklist.len().max(1);
    (done as f64 / total as f64 * 100.0).round() as u32
}

pub fn active_projects(projects: &[Project]) -> Vec<&Project> {
    projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active)
        .collect()
}

/// Total project value in thousands, e.g. `$2.5K`.
pub fn revenue_pulse(projects: &[Project]) -> String {
    format!("${:.1}K", total_revenue(projects) / 1000.0)
}

/// Overdue invoices plus the two draft contracts awaiting signature.
pub fn pending_docs(invoices: &[Invoice], now: DateTime<Utc>) -> usize {
    overdue_invoices(invoices, now).len() + 2
}

/// Directory filter; `None` means "All".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub status: Option<ProjectStatus>,
    pub brand: Option<Brand>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        self.status.is_none_or(|s| client.status == s) && self.brand.is_none_or(|b| client.brand == b)
    }

    pub fn apply<'a>(&self, clients: &'a [Client]) -> Vec<&'a Client> {
        clients.iter().filter(|c| self.matches(c)).collect()
    }
}

/// An amount without trailing zeros: `1250`, `99.5`.
pub fn plain_amount(amount: f64) -> String {
    let text = format!("{amount:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// A dollar amount with thousands separators: `$12,500`, `$1,250.5`.
pub fn money(amount: f64) -> String {
    let plain = plain_amount(amount.abs());
    let (whole, fraction) = match plain.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Payment;
    use crate::sync::seed;

    fn payment(project_id: &str, amount: f64) -> Payment {
        Payment {
            id: format!("{project_id}-{amount}"),
            project_id: project_id.to_string(),
            amount,
            description: "Deposit".to_string(),
            date: Utc::now(),
        }
    }

    fn project(id: &str, client_id: &str, value: f64, paid: &[f64]) -> Project {
        let mut project = seed::projects()[0].clone();
        project.id = id.to_string();
        project.client_id = client_id.to_string();
        project.value = value;
        project.payments = paid.iter().map(|a| payment(id, *a)).collect();
        project
    }

    fn invoice(status: DocStatus, due: NaiveDate) -> Invoice {
        Invoice {
            status,
            due_date: due,
            ..seed::invoices()[0].clone()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn half_paid_project() {
        let p = project("p1", "c1", 2500.0, &[1250.0]);

        assert_eq!(project_received(&p), 1250.0);
        assert_eq!(project_pending(&p), 1250.0);
        assert_eq!(percent_paid(&p), 50.0);
    }

    #[test]
    fn pending_sums_to_revenue_minus_received() {
        let projects = vec![
            project("p1", "c1", 2500.0, &[1250.0]),
            project("p2", "c1", 1200.0, &[]),
            project("p3", "c2", 600.0, &[400.0, 400.0]),
        ];

        let summed: f64 = projects.iter().map(project_pending).sum();
        assert_eq!(summed, total_revenue(&projects) - total_received(&projects));
        assert_eq!(total_pending(&projects), 2250.0);
    }

    #[test]
    fn overpayment_goes_negative() {
        let projects = vec![project("p1", "c1", 500.0, &[800.0])];
        assert_eq!(total_pending(&projects), -300.0);
    }

    #[test]
    fn zero_value_divides_by_one() {
        let p = project("p1", "c1", 0.0, &[0.5]);
        assert_eq!(percent_paid(&p), 50.0);
        assert_eq!(client_paid_percent("nobody", &[p]), 0.0);
    }

    #[test]
    fn lifetime_value_ignores_status() {
        let mut done = project("p2", "c1", 1200.0, &[]);
        done.status = ProjectStatus::Completed;
        let projects = vec![project("p1", "c1", 2500.0, &[]), done];

        assert_eq!(lifetime_value("c1", &projects), 3700.0);
        assert_eq!(lifetime_value("c2", &projects), 0.0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let clients = seed::clients();
        let projects = vec![project("p1", "c2", 900.0, &[])];
        let ranked: Vec<&str> = ltv_ranking(&clients, &projects)
            .iter()
            .map(|(c, _)| c.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["c2", "c1"]);

        let ranked: Vec<&str> = ltv_ranking(&clients, &[])
            .iter()
            .map(|(c, _)| c.id.as_str())
            .collect();
        assert_eq!(ranked, vec!["c1", "c2"]);
    }

    #[test]
    fn overdue_rules() {
        let past = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        assert!(is_effectively_overdue(&invoice(DocStatus::Viewed, past), now()));
        assert!(!is_effectively_overdue(&invoice(DocStatus::Viewed, future), now()));
        assert!(!is_effectively_overdue(&invoice(DocStatus::Paid, past), now()));
        assert!(is_effectively_overdue(&invoice(DocStatus::Overdue, future), now()));
        assert!(!is_effectively_overdue(&invoice(DocStatus::Sent, past), now()));
    }

    #[test]
    fn due_today_counts_from_midnight_utc() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(is_effectively_overdue(&invoice(DocStatus::Viewed, today), now()));
    }

    #[test]
    fn seed_invoices_give_three_pending_docs() {
        // INV-003 is viewed and long past due.
        assert_eq!(pending_docs(&seed::invoices(), now()), 3);
    }

    #[test]
    fn checklist_completion_rounds() {
        assert_eq!(checklist_completion(&[]), 0);
        assert_eq!(checklist_completion(&seed::projects()[0].checklist), 60);

        let third = vec![
            ChecklistItem::new("1", "a", true),
            ChecklistItem::new("2", "b", false),
            ChecklistItem::new("3", "c", false),
        ];
        assert_eq!(checklist_completion(&third), 33);
    }

    #[test]
    fn hud_figures_for_seed_data() {
        let projects = seed::projects();
        assert_eq!(revenue_pulse(&projects), "$2.5K");
        assert_eq!(active_projects(&projects).len(), 1);
    }

    #[test]
    fn client_filter_combines_status_and_brand() {
        let clients = seed::clients();

        assert_eq!(ClientFilter::default().apply(&clients).len(), 2);

        let media = ClientFilter {
            status: Some(ProjectStatus::Active),
            brand: Some(Brand::CantiMedia),
        };
        let names: Vec<&str> = media.apply(&clients).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Yung Wave"]);

        let leads = ClientFilter {
            status: Some(ProjectStatus::Lead),
            brand: None,
        };
        assert!(leads.apply(&clients).is_empty());
    }

    #[test]
    fn amounts_format_like_the_dashboard() {
        assert_eq!(plain_amount(1250.0), "1250");
        assert_eq!(plain_amount(99.5), "99.5");
        assert_eq!(money(12500.0), "$12,500");
        assert_eq!(money(1250.5), "$1,250.5");
        assert_eq!(money(999.0), "$999");
        assert_eq!(money(-300.0), "-$300");
        assert_eq!(money(1_000_000.0), "$1,000,000");
    }
}
