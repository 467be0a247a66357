use crate::agent::types::{ProfileMetadata, ProfileResponse, ProfileResult};

const NO_DATA: &str = "No data available";

fn badges(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("[{s}]"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_date(ts: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(ts)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

/// Map a profile payload to display lines. Pure; a missing optional field
/// renders an explicit placeholder, never a crash.
pub fn profile_lines(resp: &ProfileResponse) -> Vec<String> {
    let mut out = Vec::new();
    let profile = &resp.result;

    out.push("Developer Profile".to_string());
    out.push(format!(
        "  {}",
        profile
            .developer_summary
            .as_deref()
            .unwrap_or("Analyzing developer profile...")
    ));
    out.push(String::new());

    // In-band analysis error reported inside an otherwise successful payload.
    if resp.status.as_deref() == Some("error") {
        out.push("! Analysis Error".to_string());
        out.push(format!(
            "!   {}",
            resp.message.as_deref().unwrap_or("Unable to analyze profile")
        ));
        out.push(String::new());
    }

    quick_stats_lines(profile, resp.metadata.as_ref(), &mut out);
    skills_lines(profile, &mut out);
    working_style_lines(profile, &mut out);
    insights_lines(profile, &mut out);
    recommendations_lines(profile, &mut out);

    if let Some(meta) = &resp.metadata {
        metadata_footer_lines(meta, &mut out);
    }

    out
}

fn quick_stats_lines(profile: &ProfileResult, meta: Option<&ProfileMetadata>, out: &mut Vec<String>) {
    out.push("== Quick Stats ==".to_string());
    out.push(format!(
        "Repositories analyzed: {}",
        meta.and_then(|m| m.repositories_analyzed).unwrap_or(0)
    ));

    let skills = profile.technical_skills.as_ref();
    let langs = skills.map(|s| s.primary_languages.as_slice()).unwrap_or(&[]);
    if langs.is_empty() {
        out.push(format!("Primary languages: {NO_DATA}"));
    } else {
        out.push(format!("Primary languages: {}", badges(langs)));
    }

    let domains = skills.map(|s| s.domain_expertise.as_slice()).unwrap_or(&[]);
    if domains.is_empty() {
        out.push(format!("Domain expertise: {NO_DATA}"));
    } else {
        out.push("Domain expertise:".to_string());
        for d in domains {
            out.push(format!("  - {d}"));
        }
    }

    let patterns = profile.working_patterns.as_ref();
    let frequency = patterns
        .and_then(|p| p.commit_frequency.as_deref())
        .unwrap_or("No data");
    match patterns.and_then(|p| p.consistency.as_deref()) {
        Some(consistency) => out.push(format!("Activity pattern: {frequency} ({consistency})")),
        None => out.push(format!("Activity pattern: {frequency}")),
    }
    out.push(String::new());
}

fn skills_lines(profile: &ProfileResult, out: &mut Vec<String>) {
    let Some(skills) = profile.technical_skills.as_ref() else {
        return;
    };
    out.push("== Technical Skills Breakdown ==".to_string());
    if let Some(level) = &skills.proficiency_level {
        out.push(format!("Proficiency level: {level}"));
    }
    if skills.primary_languages.is_empty() {
        out.push("Primary languages: No languages identified".to_string());
    } else {
        out.push(format!(
            "Primary languages: {}",
            badges(&skills.primary_languages)
        ));
    }
    if skills.frameworks_tools.is_empty() {
        out.push("Frameworks & tools: No frameworks identified".to_string());
    } else {
        out.push(format!(
            "Frameworks & tools: {}",
            badges(&skills.frameworks_tools)
        ));
    }
    if skills.domain_expertise.is_empty() {
        out.push("Domain expertise: No domain expertise identified".to_string());
    } else {
        out.push("Domain expertise:".to_string());
        for d in &skills.domain_expertise {
            out.push(format!("  - {d}"));
        }
    }
    out.push(String::new());
}

fn working_style_lines(profile: &ProfileResult, out: &mut Vec<String>) {
    let problem_solving = profile.problem_solving.as_ref();
    let collaboration = profile.collaboration_style.as_ref();
    let patterns = profile.working_patterns.as_ref();
    if problem_solving.is_none() && collaboration.is_none() && patterns.is_none() {
        return;
    }

    out.push("== Working Style & Insights ==".to_string());
    out.push("Problem-solving approach:".to_string());
    out.push(format!(
        "  {}",
        problem_solving
            .and_then(|p| p.approach.as_deref())
            .unwrap_or("No approach data available")
    ));
    let strengths = problem_solving.map(|p| p.strengths.as_slice()).unwrap_or(&[]);
    if !strengths.is_empty() {
        out.push("Key strengths:".to_string());
        for s in strengths {
            out.push(format!("  * {s}"));
        }
    }

    out.push("Collaboration style:".to_string());
    let mut any_collab = false;
    if let Some(c) = collaboration {
        if let Some(v) = &c.communication_quality {
            out.push(format!("  Communication: {v}"));
            any_collab = true;
        }
        if let Some(v) = &c.team_interaction {
            out.push(format!("  Team interaction: {v}"));
            any_collab = true;
        }
        if let Some(v) = &c.review_participation {
            out.push(format!("  Code reviews: {v}"));
            any_collab = true;
        }
    }
    if !any_collab {
        out.push("  No collaboration data available".to_string());
    }

    let focus = patterns.map(|p| p.focus_areas.as_slice()).unwrap_or(&[]);
    if !focus.is_empty() {
        out.push(format!("Focus areas: {}", badges(focus)));
    }

    let indicators = problem_solving
        .map(|p| p.code_quality_indicators.as_slice())
        .unwrap_or(&[]);
    if !indicators.is_empty() {
        out.push("Code quality indicators:".to_string());
        for i in indicators {
            out.push(format!("  * {i}"));
        }
    }
    out.push(String::new());
}

fn insights_lines(profile: &ProfileResult, out: &mut Vec<String>) {
    if profile.unique_insights.is_empty() {
        return;
    }
    out.push("== Notable Insights ==".to_string());
    for insight in &profile.unique_insights {
        out.push(format!("  * {insight}"));
    }
    out.push(String::new());
}

fn recommendations_lines(profile: &ProfileResult, out: &mut Vec<String>) {
    let Some(rec) = profile.recommendations.as_ref() else {
        return;
    };
    let has_data = !rec.ideal_projects.is_empty()
        || rec.team_fit.is_some()
        || !rec.growth_opportunities.is_empty();
    if !has_data {
        return;
    }

    out.push("== Recommendations ==".to_string());
    if !rec.ideal_projects.is_empty() {
        out.push("Ideal projects:".to_string());
        for p in &rec.ideal_projects {
            out.push(format!("  - {p}"));
        }
    }
    if let Some(fit) = &rec.team_fit {
        out.push(format!("Team fit: {fit}"));
    }
    if !rec.growth_opportunities.is_empty() {
        out.push("Growth opportunities:".to_string());
        for g in &rec.growth_opportunities {
            out.push(format!("  - {g}"));
        }
    }
    out.push(String::new());
}

fn metadata_footer_lines(meta: &ProfileMetadata, out: &mut Vec<String>) {
    let mut parts = Vec::new();
    if let Some(ts) = &meta.timestamp {
        parts.push(format!("Analyzed on {}", format_date(ts)));
    }
    parts.push(format!(
        "{} data points collected",
        meta.data_points_collected.unwrap_or(0)
    ));
    out.push(parts.join(" • "));
}
