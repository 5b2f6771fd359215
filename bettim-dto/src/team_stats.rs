//! NCAA team statistics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRecord {
    pub wins: u32,
    pub losses: u32,
}

/// Team statistics document as stored by the platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub team_id: String,
    #[serde(default)]
    pub league_id: i64,
    pub team_name: String,
    #[serde(default)]
    pub record: TeamRecord,
    #[serde(default)]
    pub avg_points_scored: f64,
    #[serde(default)]
    pub avg_points_allowed: f64,
    #[serde(default)]
    pub form: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// `GET /admin/ncaa-team-stats` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub league_id: i64,
    #[serde(default)]
    pub data: Vec<TeamStats>,
}

/// `PATCH /admin/ncaa-team-stats` body; absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatsUpdate {
    pub team_stats_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<TeamRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_points_scored: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_points_allowed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

impl TeamStatsUpdate {
    /// Apply this patch to a document with a matching id
    pub fn apply_to(&self, stats: &mut TeamStats) {
        if let Some(record) = self.record {
            stats.record = record;
        }
        if let Some(v) = self.avg_points_scored {
            stats.avg_points_scored = v;
        }
        if let Some(v) = self.avg_points_allowed {
            stats.avg_points_allowed = v;
        }
        if let Some(form) = &self.form {
            stats.form = form.clone();
        }
    }
}
