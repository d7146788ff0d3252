use crate::models::resume::OptimizedResumePayload;

/// Renders the payload as a Markdown résumé. Empty sections are omitted.
pub fn render_markdown(payload: &OptimizedResumePayload) -> String {
    let info = &payload.personal_info;
    let name = info.full_name.as_deref().unwrap_or("Resume");
    let mut md = format!("# {name}\n\n");

    let location = [info.city.as_deref(), info.state_code.as_deref(), info.country_code.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let contact = [
        info.email.as_deref(),
        info.phone.as_deref(),
        Some(location.as_str()),
        info.linkedin.as_deref(),
        info.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>();
    if !contact.is_empty() {
        md.push_str(&contact.join(" | "));
        md.push_str("\n\n");
    }

    if !payload.summary.trim().is_empty() {
        md.push_str("## Summary\n\n");
        md.push_str(payload.summary.trim());
        md.push_str("\n\n");
    }

    if !payload.work_experience.is_empty() {
        md.push_str("## Work Experience\n\n");
        for exp in &payload.work_experience {
            let title = exp.job_title.as_deref().unwrap_or("Role");
            match exp.company.as_deref() {
                Some(company) => md.push_str(&format!("### {title} at {company}\n")),
                None => md.push_str(&format!("### {title}\n")),
            }
            let end = if exp.currently_working {
                "Present"
            } else {
                exp.end_date.as_deref().unwrap_or("Present")
            };
            if let Some(start) = exp.start_date.as_deref() {
                md.push_str(&format!("*{start} – {end}*\n\n"));
            }
            if let Some(resp) = exp.responsibilities.as_deref() {
                md.push_str(resp.trim());
                md.push_str("\n\n");
            }
            if let Some(story) = exp.project_story.as_deref() {
                md.push_str(story.trim());
                md.push_str("\n\n");
            }
            push_list(&mut md, "Skills", &exp.core_role_skills);
            push_list(&mut md, "Tech", &exp.tech_stack);
            push_list(&mut md, "Tools", &exp.tools);
            md.push('\n');
        }
    }

    if !payload.education.is_empty() {
        md.push_str("## Education\n\n");
        for edu in &payload.education {
            let degree = edu.degree.as_deref().unwrap_or("Degree");
            match edu.specialization.as_deref() {
                Some(field) => md.push_str(&format!("### {degree} in {field}\n")),
                None => md.push_str(&format!("### {degree}\n")),
            }
            if let Some(university) = edu.university.as_deref() {
                md.push_str(&format!("{university}\n"));
            }
            if let (Some(start), Some(end)) = (edu.start_date.as_deref(), edu.end_date.as_deref()) {
                md.push_str(&format!("*{start} – {end}*\n"));
            }
            if let Some(cgpa) = edu.percentage_cgpa.as_deref() {
                md.push_str(&format!("- **CGPA:** {cgpa}\n"));
            }
            md.push('\n');
        }
    }

    if !payload.certifications.is_empty() {
        md.push_str("## Certifications\n\n");
        for cert in &payload.certifications {
            let title = cert.title.as_deref().unwrap_or("Certification");
            match cert.provider.as_deref() {
                Some(provider) => md.push_str(&format!("- **{title}** — {provider}")),
                None => md.push_str(&format!("- **{title}**")),
            }
            if let Some(url) = cert.certificate_url.as_deref() {
                md.push_str(&format!(" ({url})"));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if !payload.projects.is_empty() {
        md.push_str("## Projects\n\n");
        for project in &payload.projects {
            let name = project.project_name.as_deref().unwrap_or("Project");
            md.push_str(&format!("### {name}\n"));
            if let Some(desc) = project.description.as_deref() {
                md.push_str(desc.trim());
                md.push('\n');
            }
            if let Some(stack) = project.tech_stack.as_deref() {
                md.push_str(&format!("- **Tech:** {stack}\n"));
            }
            for link in [project.github_link.as_deref(), project.project_link.as_deref()]
                .into_iter()
                .flatten()
            {
                md.push_str(&format!("- {link}\n"));
            }
            md.push('\n');
        }
    }

    if !payload.languages.is_empty() {
        md.push_str("## Languages\n\n");
        for lang in &payload.languages {
            let language = lang.language.as_deref().unwrap_or_default();
            match lang.proficiency.as_deref() {
                Some(level) => md.push_str(&format!("- {language} ({level})\n")),
                None => md.push_str(&format!("- {language}\n")),
            }
        }
        md.push('\n');
    }

    md
}

fn push_list(md: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        md.push_str(&format!("- **{label}:** {}\n", items.join(", ")));
    }
}
