use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::auth::Claims;

/// One headline number on a dashboard card
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub change: String,
}

/// One row in the recent-activity feed
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub kind: String,
    pub message: String,
    pub time: String,
    pub status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub stats: Vec<StatCard>,
    pub recent_activities: Vec<ActivityItem>,
}

fn card(title: &str, value: &str, change: &str) -> StatCard {
    StatCard {
        title: title.to_string(),
        value: value.to_string(),
        change: change.to_string(),
    }
}

fn activity(kind: &str, message: &str, time: &str, status: &str) -> ActivityItem {
    ActivityItem {
        kind: kind.to_string(),
        message: message.to_string(),
        time: time.to_string(),
        status: status.to_string(),
    }
}

/// Pre-computed panel numbers for the role's landing dashboard. These are
/// static display values; nothing here feeds back into the pipeline.
#[utoipa::path(
    get,
    path = "/stats/overview",
    responses(
        (status = 200, description = "Role-appropriate dashboard panels", body = OverviewResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "stats"
)]
pub async fn overview(Extension(claims): Extension<Claims>) -> Json<OverviewResponse> {
    let response = if claims.role == "admin" {
        OverviewResponse {
            stats: vec![
                card("Total Datasets", "24", "+3 this month"),
                card("Active Users", "12", "+2 new users"),
                card("Processing Jobs", "3", "2 completed today"),
                card("System Status", "Healthy", "99.9% uptime"),
            ],
            recent_activities: vec![
                activity(
                    "upload",
                    "New dataset uploaded: Mobile_Usage_Q4_2024.csv",
                    "2 hours ago",
                    "completed",
                ),
                activity(
                    "processing",
                    "Analytics computation completed for Financial_Inclusion_Survey",
                    "4 hours ago",
                    "completed",
                ),
                activity(
                    "user",
                    "New user registered: jane.analyst@company.com",
                    "6 hours ago",
                    "pending",
                ),
                activity(
                    "system",
                    "System maintenance scheduled for tomorrow 2:00 AM",
                    "1 day ago",
                    "scheduled",
                ),
            ],
        }
    } else {
        OverviewResponse {
            stats: vec![
                card("Financial Inclusion Rate", "73.2%", "+5.3%"),
                card("Mobile Money Users", "2.4M", "+12.1%"),
                card("Rural Coverage", "67%", "+3.2%"),
                card("Active Accounts", "1.8M", "+8.7%"),
            ],
            recent_activities: vec![
                activity(
                    "report",
                    "Q4 2024 Financial Inclusion Report",
                    "2024-12-15",
                    "Completed",
                ),
                activity(
                    "report",
                    "Mobile Banking Usage Analysis",
                    "2024-12-10",
                    "Completed",
                ),
                activity(
                    "report",
                    "Rural Demographics Study",
                    "2024-12-08",
                    "In Progress",
                ),
            ],
        }
    };

    Json(response)
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetric {
    pub id: String,
    pub label: String,
    pub value: String,
    pub change: String,
    pub trend: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDescriptor {
    pub title: String,
    pub kind: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormat {
    pub format: String,
    pub description: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub metrics: Vec<AnalyticsMetric>,
    pub charts: Vec<ChartDescriptor>,
    pub export_formats: Vec<ExportFormat>,
}

fn metric(id: &str, label: &str, value: &str, change: &str) -> AnalyticsMetric {
    AnalyticsMetric {
        id: id.to_string(),
        label: label.to_string(),
        value: value.to_string(),
        change: change.to_string(),
        trend: "up".to_string(),
    }
}

fn chart(title: &str, kind: &str) -> ChartDescriptor {
    ChartDescriptor {
        title: title.to_string(),
        kind: kind.to_string(),
    }
}

fn export(format: &str, description: &str) -> ExportFormat {
    ExportFormat {
        format: format.to_string(),
        description: description.to_string(),
    }
}

/// Static analytics panels for the exploration page
#[utoipa::path(
    get,
    path = "/stats/analytics",
    responses(
        (status = 200, description = "Analytics metrics, charts and export options", body = AnalyticsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Analyst role required")
    ),
    security(("jwt" = [])),
    tag = "stats"
)]
pub async fn analytics() -> Json<AnalyticsResponse> {
    Json(AnalyticsResponse {
        metrics: vec![
            metric("inclusion", "Financial Inclusion Rate", "73.2%", "+5.3%"),
            metric("mobile", "Mobile Money Adoption", "68.5%", "+12.1%"),
            metric("rural", "Rural Access Rate", "45.8%", "+3.2%"),
            metric("accounts", "Active Accounts", "1.8M", "+8.7%"),
        ],
        charts: vec![
            chart("Financial Inclusion by Region", "bar"),
            chart("Service Usage Distribution", "pie"),
            chart("Adoption Trends Over Time", "line"),
            chart("Demographics Analysis", "bar"),
        ],
        export_formats: vec![
            export("PNG", "High-resolution image"),
            export("PDF", "Print-ready document"),
            export("CSV", "Raw data export"),
            export("Excel", "Formatted spreadsheet"),
        ],
    })
}
