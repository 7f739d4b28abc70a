// ==========================================
// 多仓库存分析系统 - 统计指标结构
// ==========================================
// 职责: 承载单仓/全局汇总的纯数据快照
// ==========================================

use serde::Serialize;

// ==========================================
// WarehouseSummary - 单仓汇总快照
// ==========================================

/// 单仓 (或单仓视图) 的汇总指标
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseSummary {
    pub warehouse: String,
    /// 行数口径: 一行一个 SKU,也是占比的分母
    pub sku_count: usize,
    pub count_a: usize,
    pub count_b: usize,
    pub count_c: usize,
    pub count_sin_mov: usize,
    /// 件数合计
    pub inventory_total: f64,
    /// 月均销量合计
    pub monthly_avg_total: f64,
    /// 覆盖天数中位数 (仅取 > 0 的格子; 空集为 None,绝不为 0)
    pub coverage_median_days: Option<f64>,
    /// 断货风险 SKU 数
    pub risk_count: usize,
    /// 超储 SKU 数
    pub over_count: usize,
    /// Sin Mov 且仍压着库存的 SKU 数 (资金占用信号)
    pub dead_stock_count: usize,
    /// 风险带内的件数合计
    pub risk_inventory: f64,
    /// 超储带内的件数合计
    pub over_inventory: f64,
}

impl WarehouseSummary {
    pub fn risk_pct(&self) -> f64 {
        if self.sku_count == 0 {
            0.0
        } else {
            self.risk_count as f64 / self.sku_count as f64
        }
    }

    pub fn over_pct(&self) -> f64 {
        if self.sku_count == 0 {
            0.0
        } else {
            self.over_count as f64 / self.sku_count as f64
        }
    }

    pub fn sin_mov_pct(&self) -> f64 {
        if self.sku_count == 0 {
            0.0
        } else {
            self.count_sin_mov as f64 / self.sku_count as f64
        }
    }
}

// ==========================================
// GlobalSummary - 全局汇总快照
// ==========================================

/// 未选定仓库时的全局视角
///
/// 风险/超储占比取各仓占比的算术平均 (管理层速览口径,非合并池口径);
/// 全局覆盖天数取合并池比值 总件数 / (总月均销量/30)
#[derive(Debug, Clone, Serialize)]
pub struct GlobalSummary {
    pub months_used: Option<i32>,
    pub sku_count: usize,
    pub warehouse_count: usize,
    pub inventory_total: f64,
    pub monthly_avg_total: f64,
    /// 合并池覆盖天数估计; 总月均销量为 0 时为 None
    pub day_coverage: Option<f64>,
    pub risk_pct: f64,
    pub over_pct: f64,
    /// Sin Mov 且有库存的 SKU-仓库对数 (跨仓求和)
    pub dead_stock_pairs: usize,
}

// ==========================================
// 视图派生结构
// ==========================================

/// 覆盖天数直方图桶
#[derive(Debug, Clone, Serialize)]
pub struct CoverageBucket {
    pub label: String,
    pub from_days: f64,
    pub to_days: f64,
    pub count: usize,
}

/// 榜单条目 (超储榜/风险榜)
#[derive(Debug, Clone, Serialize)]
pub struct TopItem {
    pub code: String,
    pub description: String,
    pub inventory: f64,
    pub day_coverage: f64,
}

/// 仓库排名条目
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseRank {
    pub warehouse: String,
    pub risk_pct: f64,
    pub over_pct: f64,
    pub risk_inventory: f64,
    pub over_inventory: f64,
}

/// 某仓库在某指标上的量值
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseShare {
    pub warehouse: String,
    pub value: f64,
}

/// 速览要点: 各极值仓库
#[derive(Debug, Clone, Serialize)]
pub struct SummaryHighlights {
    /// Sin Mov 占比最高的仓库
    pub most_dead_stock: Option<WarehouseShare>,
    /// 断货风险占比最高的仓库
    pub most_risk: Option<WarehouseShare>,
    /// 超储占比最高的仓库
    pub most_over: Option<WarehouseShare>,
    /// 件数存量最大的仓库
    pub largest_inventory: Option<WarehouseShare>,
}
