use crate::domain::models::{AgentsConfig, TaskCategory};

/// Static description of the agent that handles a task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    pub category: TaskCategory,
    pub name: &'static str,
    pub capabilities: &'static [&'static str],
}

impl AgentProfile {
    /// Key tasks use in `assigned_agent`.
    pub fn key(&self) -> &'static str {
        self.category.as_str()
    }

    pub fn for_category(category: TaskCategory) -> Self {
        let (name, capabilities): (&'static str, &'static [&'static str]) = match category {
            TaskCategory::Research => (
                "Research Agent",
                &["market_analysis", "technology_research", "competitor_analysis"],
            ),
            TaskCategory::Frontend => (
                "Frontend Development Agent",
                &["react_development", "ui_components", "responsive_design"],
            ),
            TaskCategory::Backend => (
                "Backend Development Agent",
                &["api_development", "database_design", "business_logic"],
            ),
            TaskCategory::Database => (
                "Database Agent",
                &["schema_design", "optimization", "migrations"],
            ),
            TaskCategory::Testing => (
                "Testing Agent",
                &["unit_testing", "integration_testing", "e2e_testing"],
            ),
            TaskCategory::Deployment => (
                "Deployment Agent",
                &["ci_cd", "infrastructure", "monitoring"],
            ),
            TaskCategory::Uiux => (
                "UI/UX Design Agent",
                &["wireframing", "prototyping", "user_research"],
            ),
            TaskCategory::Portal => (
                "Portal Management Agent",
                &["user_management", "role_based_access", "dashboard_creation"],
            ),
            TaskCategory::Api => (
                "API Integration Agent",
                &["api_design", "integration", "documentation"],
            ),
            TaskCategory::Security => (
                "Security & Compliance Agent",
                &["security_audit", "compliance_check", "vulnerability_scan"],
            ),
        };
        Self {
            category,
            name,
            capabilities,
        }
    }
}

/// Which agents are enabled. A category without an enabled agent accepts
/// no new tasks.
#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    enabled: AgentsConfig,
}

impl AgentRoster {
    pub fn new(enabled: AgentsConfig) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self, category: TaskCategory) -> bool {
        self.enabled.is_enabled(category)
    }

    pub fn enabled_profiles(&self) -> Vec<AgentProfile> {
        TaskCategory::ALL
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .map(AgentProfile::for_category)
            .collect()
    }

    /// Keys reported as `active_agents` while the orchestrator runs.
    pub fn active_keys(&self) -> Vec<String> {
        self.enabled_profiles()
            .iter()
            .map(|p| p.key().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_enabled_by_default() {
        let roster = AgentRoster::default();
        assert_eq!(roster.enabled_profiles().len(), TaskCategory::ALL.len());
        assert_eq!(roster.active_keys()[0], "research");
    }

    #[test]
    fn test_disabled_category_is_excluded() {
        let mut config = AgentsConfig::default();
        config.set_enabled(TaskCategory::Portal, false);
        let roster = AgentRoster::new(config);

        assert!(!roster.is_enabled(TaskCategory::Portal));
        assert!(!roster.active_keys().contains(&"portal".to_string()));
        assert_eq!(roster.active_keys().len(), 9);
    }

    #[test]
    fn test_profile_lookup() {
        let profile = AgentProfile::for_category(TaskCategory::Security);
        assert_eq!(profile.name, "Security & Compliance Agent");
        assert_eq!(profile.key(), "security");
        assert!(profile.capabilities.contains(&"vulnerability_scan"));
    }
}
