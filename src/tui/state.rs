use unicode_width::UnicodeWidthChar;

use crate::controller::{LOADING_STEPS, ProfileRequestController, RequestState, SAMPLE_PROFILES};
use crate::tui::profile_view::profile_lines;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub header_lines: Vec<String>,
    pub body_lines: Vec<String>,
    pub input_line: String,
}

pub fn truncate_display(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut width = 0usize;
    let mut out = String::new();
    for ch in s.chars() {
        let ch_w = ch.width().unwrap_or(0);
        if ch_w == 0 {
            out.push(ch);
            continue;
        }
        if width + ch_w > max {
            break;
        }
        out.push(ch);
        width += ch_w;
    }
    out
}

/// Pure view model: one of the three screens mapped to plain lines, clipped
/// to the terminal size. Drawing and coloring happen in the view layer.
pub fn build_render_plan(
    title: &str,
    ctl: &ProfileRequestController,
    w: u16,
    h: u16,
) -> RenderPlan {
    let w_usize = w as usize;
    let status_str = match ctl.state {
        RequestState::Idle => "Idle",
        RequestState::Loading => "Analyzing",
        RequestState::Results => "Results",
    };
    let title_full = format!("{title} — [{status_str}]");
    let title_trim = truncate_display(&title_full, w_usize);
    let sep = "-".repeat(w_usize);
    let header_lines = vec![title_trim, sep];

    let body = match ctl.state {
        RequestState::Idle => search_body(ctl),
        RequestState::Loading => loading_body(ctl),
        RequestState::Results => results_body(ctl),
    };
    let max_body_rows = h.saturating_sub(3) as usize;
    let body_lines = body
        .into_iter()
        .take(max_body_rows)
        .map(|line| truncate_display(&line, w_usize))
        .collect();

    let input_line = truncate_display(&format!("> {}", ctl.username), w_usize);

    RenderPlan {
        header_lines,
        body_lines,
        input_line,
    }
}

fn search_body(ctl: &ProfileRequestController) -> Vec<String> {
    let mut body = vec![
        String::new(),
        "Understand developers beyond their code. Analyze GitHub profiles to".to_string(),
        "discover working styles, collaboration patterns, and technical strengths.".to_string(),
        String::new(),
    ];
    if let Some(err) = &ctl.error {
        body.push(format!("! {err}"));
        body.push(String::new());
    }
    body.push("Try a sample profile:".to_string());
    for (username, name, skill) in SAMPLE_PROFILES {
        body.push(format!("  {username} — {name} ({skill})"));
    }
    body.push(String::new());
    body.push("How it works: enter a GitHub username, the agent analyzes the".to_string());
    body.push("account, and you review skills, working style, and recommendations.".to_string());
    body.push(String::new());
    body.push("Enter — analyze · Esc — clear · Ctrl+C twice or /quit — exit".to_string());
    body
}

fn loading_body(ctl: &ProfileRequestController) -> Vec<String> {
    let mut body = vec![
        String::new(),
        "Analyzing GitHub Profile".to_string(),
        format!("  {}", ctl.current_step()),
        String::new(),
    ];
    for (i, step) in LOADING_STEPS.iter().enumerate() {
        let marker = if i < ctl.progress_step {
            "[x]"
        } else if i == ctl.progress_step {
            "[>]"
        } else {
            "[ ]"
        };
        body.push(format!("  {marker} {step}"));
    }
    body
}

fn results_body(ctl: &ProfileRequestController) -> Vec<String> {
    let mut body = match &ctl.profile {
        Some(profile) => profile_lines(profile),
        // Results without a payload is unreachable through the controller;
        // render something sane anyway.
        None => vec!["No profile data".to_string()],
    };
    body.push("Esc — analyze another profile".to_string());
    body
}
