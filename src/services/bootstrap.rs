//! Initial development plan seeded into an empty store.
//!
//! Dependencies are declared by category and resolved to the ids of the
//! tasks seeded earlier in the same plan.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::domain::errors::DomainResult;
use crate::domain::models::{TaskCategory, TaskDraft, TaskId, TaskOrigin, TaskPriority};
use crate::services::scheduler::Scheduler;

/// One entry of the seed plan.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub description: &'static str,
    pub requirements: Value,
    pub estimated_duration_hours: f64,
    pub depends_on: &'static [TaskCategory],
}

/// The ten seed tasks, in seeding order. Every `depends_on` category
/// appears earlier in the list.
pub fn initial_plan() -> Vec<PlanEntry> {
    use TaskCategory::{
        Api, Backend, Database, Deployment, Frontend, Portal, Research, Security, Testing, Uiux,
    };
    use TaskPriority::{Critical, High, Medium};

    vec![
        entry(
            Research,
            High,
            "Research latest TMS technologies and market trends",
            json!({ "scope": "market_analysis", "timeframe": "1_week" }),
            168.0,
            &[],
        ),
        entry(
            Database,
            Critical,
            "Design comprehensive TMS database schema",
            json!({ "entities": ["users", "shipments", "carriers", "customers", "financials"] }),
            48.0,
            &[],
        ),
        entry(
            Backend,
            High,
            "Develop core TMS API endpoints",
            json!({ "endpoints": ["shipments", "users", "carriers", "analytics"] }),
            72.0,
            &[Database],
        ),
        entry(
            Frontend,
            High,
            "Build responsive TMS dashboard",
            json!({ "framework": "react", "features": ["dashboard", "shipment_tracking", "analytics"] }),
            96.0,
            &[Backend],
        ),
        entry(
            Uiux,
            Medium,
            "Design user-friendly TMS interface",
            json!({ "design_system": true, "accessibility": true, "mobile_first": true }),
            60.0,
            &[],
        ),
        entry(
            Portal,
            Medium,
            "Implement portal management system",
            json!({
                "roles": ["admin", "manager", "operator", "driver"],
                "features": ["user_management", "permissions"]
            }),
            84.0,
            &[Backend, Frontend],
        ),
        entry(
            Api,
            Medium,
            "Create API integration hub",
            json!({ "integrations": ["carriers", "tracking", "payment", "notification"] }),
            72.0,
            &[Backend],
        ),
        entry(
            Security,
            Critical,
            "Implement security and compliance measures",
            json!({
                "standards": ["GDPR", "SOC2", "PCI"],
                "features": ["encryption", "audit_logs", "access_control"]
            }),
            96.0,
            &[Backend, Database],
        ),
        entry(
            Testing,
            High,
            "Comprehensive testing suite",
            json!({ "coverage": 90, "types": ["unit", "integration", "e2e", "performance"] }),
            60.0,
            &[Frontend, Backend],
        ),
        entry(
            Deployment,
            High,
            "Automated deployment pipeline",
            json!({ "environments": ["dev", "staging", "prod"], "ci_cd": true, "monitoring": true }),
            48.0,
            &[Testing],
        ),
    ]
}

fn entry(
    category: TaskCategory,
    priority: TaskPriority,
    description: &'static str,
    requirements: Value,
    estimated_duration_hours: f64,
    depends_on: &'static [TaskCategory],
) -> PlanEntry {
    PlanEntry {
        category,
        priority,
        description,
        requirements,
        estimated_duration_hours,
        depends_on,
    }
}

/// Seed the plan into `scheduler`, returning the ids created.
///
/// Entries whose category is disabled are skipped, and so is everything
/// that depends on a skipped entry.
pub fn seed(scheduler: &mut Scheduler, now: DateTime<Utc>) -> DomainResult<Vec<TaskId>> {
    let mut seeded: HashMap<TaskCategory, TaskId> = HashMap::new();
    let mut ids = Vec::new();

    for entry in initial_plan() {
        if !scheduler.roster().is_enabled(entry.category) {
            tracing::info!(category = %entry.category, "bootstrap task skipped, agent disabled");
            continue;
        }
        let dependencies: Option<Vec<TaskId>> = entry
            .depends_on
            .iter()
            .map(|category| seeded.get(category).cloned())
            .collect();
        let Some(dependencies) = dependencies else {
            tracing::info!(
                category = %entry.category,
                "bootstrap task skipped, a prerequisite was not seeded"
            );
            continue;
        };

        let draft = TaskDraft::new(entry.category, entry.description, entry.estimated_duration_hours)
            .with_priority(entry.priority)
            .with_requirements(entry.requirements)
            .with_dependencies(dependencies)
            .with_origin(TaskOrigin::Bootstrap);
        let id = scheduler.add_task(draft, now)?;
        seeded.insert(entry.category, id.clone());
        ids.push(id);
    }

    tracing::info!(count = ids.len(), "bootstrap plan seeded");
    Ok(ids)
}
