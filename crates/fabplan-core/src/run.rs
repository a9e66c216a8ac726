//! MRP 運行記錄
//!
//! 每次計劃引擎調用產生一筆稽核記錄。狀態機：
//! running → completed | failed | cancelled，終態後不可再變。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PlanError, Result};

/// 運行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MrpRunStatus {
    /// 運行中
    Running,
    /// 已完成
    Completed,
    /// 已失敗
    Failed,
    /// 已取消
    Cancelled,
}

impl MrpRunStatus {
    /// 檢查是否為終態
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MrpRunStatus::Running)
    }
}

impl std::fmt::Display for MrpRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MrpRunStatus::Running => "running",
            MrpRunStatus::Completed => "completed",
            MrpRunStatus::Failed => "failed",
            MrpRunStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// MRP 運行稽核記錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrpRun {
    /// 運行ID
    pub id: Uuid,

    /// 運行基準日
    pub run_date: NaiveDate,

    /// 計劃時界（天）
    pub planning_horizon_days: u32,

    /// 處理的單據數
    pub orders_processed: u32,

    /// 分析的物料數
    pub components_analyzed: u32,

    /// 發現的短缺數
    pub shortages_found: u32,

    /// 產生的計劃訂單數
    pub planned_orders_created: u32,

    /// 警告數（被跳過的壞單據等）
    pub warnings: u32,

    /// 狀態
    pub status: MrpRunStatus,

    /// 失敗訊息
    pub error_message: Option<String>,

    /// 開始時間
    pub started_at: DateTime<Utc>,

    /// 結束時間
    pub finished_at: Option<DateTime<Utc>>,
}

impl MrpRun {
    /// 創建新的運行記錄（初始為 running）
    pub fn new(run_date: NaiveDate, planning_horizon_days: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_date,
            planning_horizon_days,
            orders_processed: 0,
            components_analyzed: 0,
            shortages_found: 0,
            planned_orders_created: 0,
            warnings: 0,
            status: MrpRunStatus::Running,
            error_message: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// 完成運行（寫入統計）
    pub fn complete(&mut self) -> Result<()> {
        self.transition(MrpRunStatus::Completed)
    }

    /// 標記失敗
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.error_message = Some(message.into());
        self.transition(MrpRunStatus::Failed)
    }

    /// 標記取消（外部中止）
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(MrpRunStatus::Cancelled)
    }

    fn transition(&mut self, to: MrpRunStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(PlanError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.finished_at = Some(Utc::now());
        Ok(())
    }
}
