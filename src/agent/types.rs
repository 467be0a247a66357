use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub agent_id: String,
    pub message: String,
}

/// Normalized envelope returned by the orchestrator for every agent call.
/// `response` is only meaningful when `success` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ProfileResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub result: ProfileResult,
    pub metadata: Option<ProfileMetadata>,
    // The agent may report an in-band analysis error alongside partial results.
    pub status: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub developer_summary: Option<String>,
    pub technical_skills: Option<TechnicalSkills>,
    pub problem_solving: Option<ProblemSolving>,
    pub collaboration_style: Option<CollaborationStyle>,
    pub working_patterns: Option<WorkingPatterns>,
    #[serde(default)]
    pub unique_insights: Vec<String>,
    pub recommendations: Option<Recommendations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSkills {
    #[serde(default)]
    pub primary_languages: Vec<String>,
    #[serde(default)]
    pub frameworks_tools: Vec<String>,
    #[serde(default)]
    pub domain_expertise: Vec<String>,
    pub proficiency_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemSolving {
    pub approach: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub code_quality_indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationStyle {
    pub communication_quality: Option<String>,
    pub team_interaction: Option<String>,
    pub review_participation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingPatterns {
    pub commit_frequency: Option<String>,
    pub consistency: Option<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub ideal_projects: Vec<String>,
    pub team_fit: Option<String>,
    #[serde(default)]
    pub growth_opportunities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub agent_name: Option<String>,
    pub timestamp: Option<String>,
    pub repositories_analyzed: Option<u32>,
    pub data_points_collected: Option<u32>,
}
