// ==========================================
// 多仓库存分析系统 - 跨仓调拨引擎
// ==========================================
// 职责: 断货补给与超储泄压的机会测算
// 输入: 主档记录集 + 目标仓 + 过滤开关
// 输出: 调拨建议列表 (按缺口/冗余量降序)
// 红线: 建议性输出,不扣减任何仓的库存;
//       逐 SKU 独立测算,贪心分摊,不做全局最优
// ==========================================

use crate::domain::sku::{MasterData, SkuRecord, WarehouseCell};
use crate::domain::transfer::{
    BreakOpportunity, DonorAllocation, OverOpportunity, ReceiverAllocation,
};
use crate::{OVER_THRESHOLD_DAYS, RISK_THRESHOLD_DAYS};
use std::cmp::Ordering;
use tracing::instrument;

// ==========================================
// RebalanceEngine - 跨仓调拨引擎
// ==========================================
pub struct RebalanceEngine {
    // 无状态引擎,不需要注入依赖
}

impl RebalanceEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 断货补给测算
    // ==========================================

    /// 断货补给机会: 为目标仓的高流速物料找低流速仓的富余库存
    ///
    /// 规则 (逐 SKU 顺序执行):
    /// 1) 目标格子须为 A/B (值得保供的高流速层)
    /// 2) only_risk 开启时,跳过未命中需补给状态的格子
    /// 3) 日销速率为 0 时无法测算,整个 SKU 跳过
    /// 4) 目标库存 = 日销速率 × 风险阈值天数; 缺口为 0 跳过
    /// 5) 候选捐出仓: 该 SKU 分级为 C/Sin Mov 且有库存的其他仓
    /// 6) 捐出仓按库存降序贪心分摊,直到缺口补平或捐完
    ///
    /// 结果按缺口降序排列 (最大缺口在前,驱动默认展示顺序)
    #[instrument(skip(self, master), fields(target = %target, only_risk, sku_count = master.len()))]
    pub fn break_opportunities(
        &self,
        master: &MasterData,
        target: &str,
        only_risk: bool,
    ) -> Vec<BreakOpportunity> {
        let mut opportunities = Vec::new();

        for record in master.records() {
            let Some(cell) = record.cell(target) else {
                continue;
            };

            // 1) 只保护高流速物料
            if !cell.classification.is_fast_mover() {
                continue;
            }

            // 2) 需补给状态: 风险带,或库存已归零
            let needs_relief = cell.needs_relief();
            if only_risk && !needs_relief {
                continue;
            }

            // 3) 无销速则无法给调拨量定尺
            let daily_rate = cell.daily_sale_rate();
            if daily_rate <= 0.0 {
                continue;
            }

            // 4) 缺口 = 补到风险阈值覆盖所需的件数
            let required = daily_rate * RISK_THRESHOLD_DAYS;
            let deficit = (required - cell.inventory).max(0.0);
            if deficit <= 0.0 {
                continue;
            }

            // 5) 候选捐出仓
            let mut donors = self.donor_candidates(master, record, target);
            if donors.is_empty() {
                continue;
            }

            // 6) 库存大者优先 (并列保持仓库检测顺序)
            donors.sort_by(|a, b| {
                b.1.inventory
                    .partial_cmp(&a.1.inventory)
                    .unwrap_or(Ordering::Equal)
            });

            // 7) 贪心分摊; 只做建议,不扣减捐出仓库存
            let mut remaining = deficit;
            let mut allocations = Vec::with_capacity(donors.len());
            for (warehouse, donor_cell) in donors {
                let allocated = remaining.min(donor_cell.inventory);
                remaining -= allocated;
                allocations.push(DonorAllocation {
                    warehouse,
                    classification: donor_cell.classification.clone(),
                    inventory: donor_cell.inventory,
                    allocated,
                });
            }

            opportunities.push(BreakOpportunity {
                code: record.code.clone(),
                description: record.description.clone(),
                warehouse: target.to_string(),
                classification: cell.classification.clone(),
                inventory: cell.inventory,
                monthly_avg_sale: cell.monthly_avg_sale,
                day_coverage: cell.day_coverage,
                needs_relief,
                required,
                deficit,
                suggested: deficit - remaining,
                donors: allocations,
            });
        }

        opportunities.sort_by(|a, b| b.deficit.partial_cmp(&a.deficit).unwrap_or(Ordering::Equal));
        opportunities
    }

    // ==========================================
    // 超储泄压测算
    // ==========================================

    /// 超储泄压机会: 把目标仓低流速物料的冗余分给缺货的高流速仓
    ///
    /// 规则 (与补给测算互为镜像):
    /// 1) 目标格子须为 C/Sin Mov 且有库存
    /// 2) only_over 开启时,跳过未命中超储带的格子
    /// 3) 冗余 = max(0, 库存 - 日销速率 × 冗余阈值天数);
    ///    零销速物料的全部库存都算冗余
    /// 4) 候选接收仓: 该 SKU 分级为 A/B 的其他仓,
    ///    各自缺口 = max(0, 自身日销速率 × 风险阈值天数 - 自身库存)
    /// 5) 接收仓按缺口降序贪心分摊; 分不完的冗余留在目标仓
    ///
    /// 结果按冗余量降序排列
    #[instrument(skip(self, master), fields(target = %target, only_over, sku_count = master.len()))]
    pub fn over_opportunities(
        &self,
        master: &MasterData,
        target: &str,
        only_over: bool,
    ) -> Vec<OverOpportunity> {
        let mut opportunities = Vec::new();

        for record in master.records() {
            let Some(cell) = record.cell(target) else {
                continue;
            };

            // 1) 低流速且有库存
            if !cell.classification.is_slow_mover() || cell.inventory <= 0.0 {
                continue;
            }

            // 2) 超储过滤
            let flagged_over = cell.is_over();
            if only_over && !flagged_over {
                continue;
            }

            // 3) 冗余量
            let daily_rate = cell.daily_sale_rate();
            let excess = if daily_rate > 0.0 {
                (cell.inventory - daily_rate * OVER_THRESHOLD_DAYS).max(0.0)
            } else {
                // 零销速物料: 留多少都卖不动,全部视为冗余
                cell.inventory
            };
            if excess <= 0.0 {
                continue;
            }

            // 4) 候选接收仓
            let mut receivers = self.receiver_candidates(master, record, target);
            if receivers.is_empty() {
                continue;
            }

            // 5) 缺口大者优先 (并列保持仓库检测顺序)
            receivers.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

            let mut remaining = excess;
            let mut allocations = Vec::with_capacity(receivers.len());
            for ((warehouse, receiver_cell), need) in receivers {
                let allocated = remaining.min(need);
                remaining -= allocated;
                allocations.push(ReceiverAllocation {
                    warehouse,
                    classification: receiver_cell.classification.clone(),
                    inventory: receiver_cell.inventory,
                    need,
                    allocated,
                });
            }

            opportunities.push(OverOpportunity {
                code: record.code.clone(),
                description: record.description.clone(),
                warehouse: target.to_string(),
                classification: cell.classification.clone(),
                inventory: cell.inventory,
                monthly_avg_sale: cell.monthly_avg_sale,
                day_coverage: cell.day_coverage,
                flagged_over,
                excess,
                suggested: excess - remaining,
                receivers: allocations,
            });
        }

        opportunities.sort_by(|a, b| b.excess.partial_cmp(&a.excess).unwrap_or(Ordering::Equal));
        opportunities
    }

    // ==========================================
    // 候选集构造
    // ==========================================

    /// 捐出仓候选: 低流速且有库存的其他仓
    fn donor_candidates<'a>(
        &self,
        master: &'a MasterData,
        record: &'a SkuRecord,
        target: &str,
    ) -> Vec<(String, &'a WarehouseCell)> {
        master
            .warehouses()
            .iter()
            .filter(|wh| wh.as_str() != target)
            .filter_map(|wh| {
                let cell = record.cell(wh)?;
                (cell.classification.is_slow_mover() && cell.inventory > 0.0)
                    .then(|| (wh.clone(), cell))
            })
            .collect()
    }

    /// 接收仓候选: 高流速的其他仓,带各自缺口
    fn receiver_candidates<'a>(
        &self,
        master: &'a MasterData,
        record: &'a SkuRecord,
        target: &str,
    ) -> Vec<((String, &'a WarehouseCell), f64)> {
        master
            .warehouses()
            .iter()
            .filter(|wh| wh.as_str() != target)
            .filter_map(|wh| {
                let cell = record.cell(wh)?;
                if !cell.classification.is_fast_mover() {
                    return None;
                }
                let need = (cell.daily_sale_rate() * RISK_THRESHOLD_DAYS - cell.inventory).max(0.0);
                Some(((wh.clone(), cell), need))
            })
            .collect()
    }
}

impl Default for RebalanceEngine {
    fn default() -> Self {
        Self::new()
    }
}
