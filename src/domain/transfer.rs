// ==========================================
// 多仓库存分析系统 - 调拨建议结构
// ==========================================
// 职责: 承载跨仓调拨测算结果
// 红线: 建议性输出,不回写任何库存
// ==========================================

use crate::domain::types::Classification;
use serde::Serialize;

// ==========================================
// 断货补给建议
// ==========================================

/// 单个捐出仓的分摊明细
#[derive(Debug, Clone, Serialize)]
pub struct DonorAllocation {
    pub warehouse: String,
    pub classification: Classification,
    /// 捐出仓现存件数 (测算快照,未扣减)
    pub inventory: f64,
    /// 建议调出件数
    pub allocated: f64,
}

/// 某 SKU 在目标仓的补给机会
#[derive(Debug, Clone, Serialize)]
pub struct BreakOpportunity {
    pub code: String,
    pub description: String,
    /// 目标仓
    pub warehouse: String,
    pub classification: Classification,
    pub inventory: f64,
    pub monthly_avg_sale: f64,
    pub day_coverage: f64,
    /// 是否命中需补给状态 (风险带或断货)
    pub needs_relief: bool,
    /// 目标库存 = 日销速率 × 风险阈值天数
    pub required: f64,
    /// 缺口 = max(0, 目标库存 - 现存)
    pub deficit: f64,
    /// 建议合计 = 缺口 - 未能覆盖的余量
    pub suggested: f64,
    /// 分摊明细 (按捐出仓库存降序)
    pub donors: Vec<DonorAllocation>,
}

// ==========================================
// 超储泄压建议
// ==========================================

/// 单个接收仓的分摊明细
#[derive(Debug, Clone, Serialize)]
pub struct ReceiverAllocation {
    pub warehouse: String,
    pub classification: Classification,
    /// 接收仓现存件数 (测算快照)
    pub inventory: f64,
    /// 接收仓自身的缺口 (补到风险阈值用量,下限 0)
    pub need: f64,
    /// 建议调入件数
    pub allocated: f64,
}

/// 某 SKU 在目标仓的泄压机会
#[derive(Debug, Clone, Serialize)]
pub struct OverOpportunity {
    pub code: String,
    pub description: String,
    /// 目标仓 (被泄压方)
    pub warehouse: String,
    pub classification: Classification,
    pub inventory: f64,
    pub monthly_avg_sale: f64,
    pub day_coverage: f64,
    /// 是否命中超储带
    pub flagged_over: bool,
    /// 冗余量; 零销速物料为全部库存
    pub excess: f64,
    /// 建议合计; 未分出的余量留在目标仓
    pub suggested: f64,
    /// 分摊明细 (按接收仓缺口降序)
    pub receivers: Vec<ReceiverAllocation>,
}
