use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::NaiveDate;
use thiserror::Error;

use crate::catalog::{split_sheets_for_project, SPLIT_SHEET_TEMPLATE};
use crate::metrics::money;
use crate::models::{Client, LegalTemplate, Project, SplitSheet};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("No split sheet on file for {0}")]
    NoSplitSheet(String),

    #[error("Shares for {track} total {total}%, not 100%")]
    SharesDoNotTotal { track: String, total: f64 },
}

/// Paths of one generated document. `pdf` is only set when pandoc ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub markdown: PathBuf,
    pub pdf: Option<PathBuf>,
}

/// Writes legal documents as Markdown and converts them to PDF with pandoc
/// when it is installed.
pub struct DocumentGenerator {
    output_dir: PathBuf,
}

/// Reject a split sheet whose shares do not add up to 100%.
pub fn validate_shares(sheet: &SplitSheet) -> Result<(), TemplateError> {
    let total = sheet.total_share();
    if (total - 100.0).abs() > 0.01 {
        return Err(TemplateError::SharesDoNotTotal {
            track: sheet.track_title.clone(),
            total,
        });
    }
    Ok(())
}

fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

impl DocumentGenerator {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = output_dir.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    /// Render `template` for `project` and write it out.
    pub fn generate(
        &self,
        template: &LegalTemplate,
        client: &Client,
        project: &Project,
        today: NaiveDate,
    ) -> Result<GeneratedDocument, TemplateError> {
        let markdown = if template.id == SPLIT_SHEET_TEMPLATE {
            let sheet = split_sheets_for_project(&project.id)
                .into_iter()
                .next()
                .ok_or_else(|| TemplateError::NoSplitSheet(project.title.clone()))?;
            validate_shares(&sheet)?;
            self.split_sheet_markdown(&sheet, client, project, today)
        } else {
            self.agreement_markdown(template, client, project, today)
        };

        let stem = format!("{}_{}", slug(&template.title), slug(&project.title));
        let md_path = self.output_dir.join(format!("{stem}.md"));
        let pdf_path = self.output_dir.join(format!("{stem}.pdf"));

        let mut file = File::create(&md_path)?;
        file.write_all(markdown.as_bytes())?;
        tracing::info!(path = %md_path.display(), template = %template.title, "document written");

        let pdf = match Command::new("pandoc").arg(&md_path).arg("-o").arg(&pdf_path).output() {
            Ok(output) if output.status.success() => Some(pdf_path),
            Ok(output) => {
                let error = String::from_utf8_lossy(&output.stderr);
                tracing::warn!(error = %error, "pandoc failed, keeping Markdown only");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "pandoc not available, keeping Markdown only");
                None
            }
        };

        Ok(GeneratedDocument {
            markdown: md_path,
            pdf,
        })
    }

    fn split_sheet_markdown(&self, sheet: &SplitSheet, client: &Client, project: &Project, today: NaiveDate) -> String {
        let mut content = String::new();

        content.push_str("# Split Sheet Agreement\n\n");
        content.push_str(&format!("**Track:** {}\n\n", sheet.track_title));
        content.push_str(&format!("**Project:** {} ({})\n\n", project.title, project.package));
        content.push_str(&format!("**Artist:** {}\n\n", client.name));
        content.push_str(&format!("**Date:** {}\n\n", today.format("%m/%d/%Y")));

        content.push_str("| Participant | Role | Share |\n");
        content.push_str("|---|---|---:|\n");
        for participant in &sheet.participants {
            content.push_str(&format!(
                "| {} | {} | {}% |\n",
                participant.name, participant.role, participant.share
            ));
        }
        content.push_str(&format!("| **Total** | | **{}%** |\n\n", sheet.total_share()));

        content.push_str(
            "Each participant agrees that the shares above represent their ownership of the \
             composition and its publishing.\n\n",
        );
        for participant in &sheet.participants {
            content.push_str(&format!("Signed: ______________________ ({})\n\n", participant.name));
        }

        content
    }

    fn agreement_markdown(&self, template: &LegalTemplate, client: &Client, project: &Project, today: NaiveDate) -> String {
        let mut content = String::new();

        content.push_str(&format!("# {}\n\n", template.title));
        content.push_str(&format!("_{}_\n\n", template.description));
        content.push_str(&format!("**Date:** {}\n\n", today.format("%m/%d/%Y")));

        content.push_str("## Parties\n\n");
        content.push_str(&format!("- **Studio:** {}\n", client.brand));
        content.push_str(&format!("- **Client:** {} <{}>\n\n", client.name, client.email));

        content.push_str("## Project\n\n");
        content.push_str(&format!("- **Title:** {}\n", project.title));
        content.push_str(&format!("- **Package:** {}\n", project.package));
        content.push_str(&format!("- **Value:** {}\n", money(project.value)));
        content.push_str(&format!(
            "- **Term:** {} to {}\n\n",
            project.start_date.format("%m/%d/%Y"),
            project.target_date.format("%m/%d/%Y")
        ));

        content.push_str("Signed: ______________________ (Studio)\n\n");
        content.push_str(&format!("Signed: ______________________ ({})\n", client.name));

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{legal_templates, split_sheets};
    use crate::models::SplitParticipant;
    use crate::sync::seed;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("studio_desk_docs_{}", uuid::Uuid::new_v4()))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn split_sheet_lists_participants() {
        let dir = scratch_dir();
        let generator = DocumentGenerator::new(&dir).unwrap();
        let template = &legal_templates()[0];

        let doc = generator
            .generate(template, &seed::clients()[0], &seed::projects()[0], today())
            .unwrap();

        assert_eq!(doc.markdown, dir.join("split_sheet_agreement_neon_nights_ep.md"));
        let text = fs::read_to_string(&doc.markdown).unwrap();
        assert!(text.contains("**Track:** Neon Nights"));
        assert!(text.contains("| Lil Echo | Artist | 50% |"));
        assert!(text.contains("| **Total** | | **100%** |"));
        if let Some(pdf) = &doc.pdf {
            assert!(pdf.exists());
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn other_templates_render_the_agreement() {
        let dir = scratch_dir();
        let generator = DocumentGenerator::new(&dir).unwrap();
        let template = &legal_templates()[3];

        let doc = generator
            .generate(template, &seed::clients()[0], &seed::projects()[0], today())
            .unwrap();

        let text = fs::read_to_string(&doc.markdown).unwrap();
        assert!(text.starts_with("# Marketing Agency Agreement"));
        assert!(text.contains("- **Value:** $2,500"));
        assert!(text.contains("- **Studio:** Canti Records"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn split_sheet_needs_one_on_file() {
        let dir = scratch_dir();
        let generator = DocumentGenerator::new(&dir).unwrap();
        let mut project = seed::projects()[0].clone();
        project.id = "p9".to_string();

        let err = generator
            .generate(&legal_templates()[0], &seed::clients()[0], &project, today())
            .unwrap_err();
        assert_eq!(err.to_string(), "No split sheet on file for Neon Nights EP");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn shares_must_total_one_hundred() {
        let mut sheet = split_sheets()[0].clone();
        assert!(validate_shares(&sheet).is_ok());

        sheet.participants.push(SplitParticipant {
            name: "Feature".to_string(),
            role: "Vocalist".to_string(),
            share: 10.0,
        });
        let err = validate_shares(&sheet).unwrap_err();
        assert_eq!(err.to_string(), "Shares for Neon Nights total 110%, not 100%");
    }

    #[test]
    fn slug_keeps_words() {
        assert_eq!(slug("Work For Hire"), "work_for_hire");
        assert_eq!(slug("Neon Nights EP!"), "neon_nights_ep");
    }
}
