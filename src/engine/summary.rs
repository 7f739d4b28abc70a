// ==========================================
// 多仓库存分析系统 - 汇总统计引擎
// ==========================================
// 职责: 驾驶舱指标生成
// 输入: 主档记录集 (全量或筛选后的视图)
// 输出: 单仓汇总 + 全局汇总 + 直方图/榜单/排名
// ==========================================

use crate::domain::sku::{MasterData, SkuRecord};
use crate::domain::summary::{
    CoverageBucket, GlobalSummary, SummaryHighlights, TopItem, WarehouseRank, WarehouseShare,
    WarehouseSummary,
};
use crate::domain::types::Classification;
use std::cmp::Ordering;
use tracing::instrument;

/// 榜单默认条数
pub const TOP_LIST_LIMIT: usize = 15;

// ==========================================
// SummaryEngine - 汇总统计引擎
// ==========================================
pub struct SummaryEngine {
    // 无状态引擎,不需要注入依赖
}

impl SummaryEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单仓汇总 (全量记录)
    #[instrument(skip(self, master), fields(warehouse = %warehouse, sku_count = master.len()))]
    pub fn summarize_warehouse(&self, master: &MasterData, warehouse: &str) -> WarehouseSummary {
        let rows: Vec<&SkuRecord> = master.records().iter().collect();
        self.summarize_rows(&rows, warehouse)
    }

    /// 所有仓库的汇总 (按检测顺序)
    pub fn summarize_all(&self, master: &MasterData) -> Vec<WarehouseSummary> {
        master
            .warehouses()
            .iter()
            .map(|wh| self.summarize_warehouse(master, wh))
            .collect()
    }

    /// 行集汇总 (供筛选后的明细视图复用,口径与单仓汇总一致)
    pub fn summarize_rows(&self, rows: &[&SkuRecord], warehouse: &str) -> WarehouseSummary {
        let mut summary = WarehouseSummary {
            warehouse: warehouse.to_string(),
            sku_count: rows.len(),
            count_a: 0,
            count_b: 0,
            count_c: 0,
            count_sin_mov: 0,
            inventory_total: 0.0,
            monthly_avg_total: 0.0,
            coverage_median_days: None,
            risk_count: 0,
            over_count: 0,
            dead_stock_count: 0,
            risk_inventory: 0.0,
            over_inventory: 0.0,
        };

        let mut coverages = Vec::new();

        for record in rows {
            let Some(cell) = record.cell(warehouse) else {
                continue;
            };

            match &cell.classification {
                Classification::A => summary.count_a += 1,
                Classification::B => summary.count_b += 1,
                Classification::C => summary.count_c += 1,
                Classification::SinMov => summary.count_sin_mov += 1,
                Classification::Other(_) => {}
            }

            summary.inventory_total += cell.inventory;
            summary.monthly_avg_total += cell.monthly_avg_sale;

            if cell.is_risk() {
                summary.risk_count += 1;
                summary.risk_inventory += cell.inventory;
            }
            if cell.is_over() {
                summary.over_count += 1;
                summary.over_inventory += cell.inventory;
            }
            if cell.classification == Classification::SinMov && cell.inventory > 0.0 {
                summary.dead_stock_count += 1;
            }

            // 中位数只统计有销速支撑的格子
            if cell.day_coverage > 0.0 {
                coverages.push(cell.day_coverage);
            }
        }

        summary.coverage_median_days = median(&coverages);
        summary
    }

    /// 全局汇总
    ///
    /// 占比口径: 各仓占比的算术平均 (管理层速览,不是合并池占比);
    /// 覆盖天数口径: 合并池比值 总件数 / (总月均销量 / 30)
    #[instrument(skip(self, master, summaries))]
    pub fn global_summary(
        &self,
        master: &MasterData,
        summaries: &[WarehouseSummary],
    ) -> GlobalSummary {
        let inventory_total: f64 = summaries.iter().map(|s| s.inventory_total).sum();
        let monthly_avg_total: f64 = summaries.iter().map(|s| s.monthly_avg_total).sum();

        let day_coverage = if monthly_avg_total > 0.0 {
            Some(inventory_total / (monthly_avg_total / 30.0))
        } else {
            None
        };

        let n = summaries.len();
        let (risk_pct, over_pct) = if n == 0 {
            (0.0, 0.0)
        } else {
            (
                summaries.iter().map(|s| s.risk_pct()).sum::<f64>() / n as f64,
                summaries.iter().map(|s| s.over_pct()).sum::<f64>() / n as f64,
            )
        };

        GlobalSummary {
            months_used: master.months_used(),
            sku_count: master.len(),
            warehouse_count: n,
            inventory_total,
            monthly_avg_total,
            day_coverage,
            risk_pct,
            over_pct,
            dead_stock_pairs: summaries.iter().map(|s| s.dead_stock_count).sum(),
        }
    }

    // ==========================================
    // 视图派生指标
    // ==========================================

    /// 覆盖天数直方图
    ///
    /// 桶: 0-15 / 16-30 / 31-60 / 61-120 / >120 (右边界含; 15 天落在首桶)
    pub fn coverage_histogram(&self, rows: &[&SkuRecord], warehouse: &str) -> Vec<CoverageBucket> {
        let edges: [(&str, f64, f64); 5] = [
            ("0-15", 0.0, 15.0),
            ("16-30", 15.0, 30.0),
            ("31-60", 30.0, 60.0),
            ("61-120", 60.0, 120.0),
            (">120", 120.0, f64::INFINITY),
        ];

        let mut buckets: Vec<CoverageBucket> = edges
            .iter()
            .map(|(label, from, to)| CoverageBucket {
                label: (*label).to_string(),
                from_days: *from,
                to_days: *to,
                count: 0,
            })
            .collect();

        for record in rows {
            let Some(cell) = record.cell(warehouse) else {
                continue;
            };
            let d = cell.day_coverage;
            if d < 0.0 {
                continue;
            }
            for bucket in buckets.iter_mut() {
                if d <= bucket.to_days {
                    bucket.count += 1;
                    break;
                }
            }
        }

        buckets
    }

    /// 超储榜: 有库存、覆盖天数降序
    pub fn top_overstock(
        &self,
        rows: &[&SkuRecord],
        warehouse: &str,
        limit: usize,
    ) -> Vec<TopItem> {
        let mut items: Vec<TopItem> = rows
            .iter()
            .filter_map(|r| {
                let cell = r.cell(warehouse)?;
                (cell.inventory > 0.0).then(|| TopItem {
                    code: r.code.clone(),
                    description: r.description.clone(),
                    inventory: cell.inventory,
                    day_coverage: cell.day_coverage,
                })
            })
            .collect();

        items.sort_by(|a, b| cmp_f64_desc(a.day_coverage, b.day_coverage));
        items.truncate(limit);
        items
    }

    /// 风险榜: 覆盖天数升序 (零库存也列入,暴露已断货的编码)
    pub fn top_risk(&self, rows: &[&SkuRecord], warehouse: &str, limit: usize) -> Vec<TopItem> {
        let mut items: Vec<TopItem> = rows
            .iter()
            .filter_map(|r| {
                let cell = r.cell(warehouse)?;
                Some(TopItem {
                    code: r.code.clone(),
                    description: r.description.clone(),
                    inventory: cell.inventory,
                    day_coverage: cell.day_coverage,
                })
            })
            .collect();

        items.sort_by(|a, b| {
            a.day_coverage
                .partial_cmp(&b.day_coverage)
                .unwrap_or(Ordering::Equal)
        });
        items.truncate(limit);
        items
    }

    /// 仓库排名: 风险占比降序
    pub fn rank_by_risk(&self, summaries: &[WarehouseSummary]) -> Vec<WarehouseRank> {
        let mut ranks = to_ranks(summaries);
        ranks.sort_by(|a, b| cmp_f64_desc(a.risk_pct, b.risk_pct));
        ranks
    }

    /// 仓库排名: 超储占比降序
    pub fn rank_by_over(&self, summaries: &[WarehouseSummary]) -> Vec<WarehouseRank> {
        let mut ranks = to_ranks(summaries);
        ranks.sort_by(|a, b| cmp_f64_desc(a.over_pct, b.over_pct));
        ranks
    }

    /// 速览要点: 各维度极值仓库
    pub fn highlights(&self, summaries: &[WarehouseSummary]) -> SummaryHighlights {
        SummaryHighlights {
            most_dead_stock: max_share(summaries, |s| s.sin_mov_pct()),
            most_risk: max_share(summaries, |s| s.risk_pct()),
            most_over: max_share(summaries, |s| s.over_pct()),
            largest_inventory: max_share(summaries, |s| s.inventory_total),
        }
    }
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 中位数; 空集 → None (绝不折叠为 0)
///
/// 偶数长度取中间两值的平均
pub fn median(values: &[f64]) -> Option<f64> {
    let mut arr: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if arr.is_empty() {
        return None;
    }
    arr.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = arr.len() / 2;
    Some(if arr.len() % 2 == 1 {
        arr[mid]
    } else {
        (arr[mid - 1] + arr[mid]) / 2.0
    })
}

fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn to_ranks(summaries: &[WarehouseSummary]) -> Vec<WarehouseRank> {
    summaries
        .iter()
        .map(|s| WarehouseRank {
            warehouse: s.warehouse.clone(),
            risk_pct: s.risk_pct(),
            over_pct: s.over_pct(),
            risk_inventory: s.risk_inventory,
            over_inventory: s.over_inventory,
        })
        .collect()
}

fn max_share<F: Fn(&WarehouseSummary) -> f64>(
    summaries: &[WarehouseSummary],
    metric: F,
) -> Option<WarehouseShare> {
    // 并列取先出现的仓库
    let mut best: Option<&WarehouseSummary> = None;
    for s in summaries {
        if best.map_or(true, |b| metric(s) > metric(b)) {
            best = Some(s);
        }
    }
    best.map(|s| WarehouseShare {
        warehouse: s.warehouse.clone(),
        value: metric(s),
    })
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_median_ignores_non_finite() {
        assert_eq!(median(&[f64::NAN, 5.0]), Some(5.0));
        assert_eq!(median(&[f64::INFINITY]), None);
    }
}
