// ==========================================
// 汇总统计引擎集成测试
// ==========================================
// 测试目标: 单仓/全局汇总与派生指标
// 覆盖范围: 阈值边界、中位数口径、全局平均口径、直方图、榜单
// ==========================================

use maestro_inventarios::{
    Classification, MasterData, SkuRecord, SummaryEngine, WarehouseCell,
};
use std::collections::HashMap;

// ==========================================
// 测试辅助函数
// ==========================================

fn cell(cls: &str, inventory: f64, prom: f64, day_coverage: f64) -> WarehouseCell {
    WarehouseCell {
        inventory,
        classification: Classification::parse(cls),
        monthly_avg_sale: prom,
        monthly_coverage: day_coverage / 30.0,
        day_coverage,
    }
}

fn record(code: &str, cells: Vec<(&str, WarehouseCell)>) -> SkuRecord {
    let mut per_warehouse = HashMap::new();
    for (wh, c) in cells {
        per_warehouse.insert(wh.to_string(), c);
    }
    SkuRecord {
        code: code.to_string(),
        description: format!("producto {}", code),
        per_warehouse,
    }
}

fn master(warehouses: &[&str], records: Vec<SkuRecord>) -> MasterData {
    let mut m = MasterData::new(warehouses.iter().map(|w| w.to_string()).collect(), None);
    for r in records {
        m.upsert(r);
    }
    m
}

// ==========================================
// 测试用例: 阈值边界
// ==========================================

#[test]
fn test_risk_and_over_boundaries() {
    let m = master(
        &["w1"],
        vec![
            record("R10", vec![("w1", cell("A", 10.0, 30.0, 10.0))]), // 风险
            record("R15", vec![("w1", cell("A", 15.0, 30.0, 15.0))]), // 边界: 非风险
            record("O60", vec![("w1", cell("C", 60.0, 30.0, 60.0))]), // 边界: 非超储
            record("O61", vec![("w1", cell("C", 61.0, 30.0, 61.0))]), // 超储
            record("S0", vec![("w1", cell("A", 0.0, 30.0, 0.0))]),    // 断货: 不计入风险
        ],
    );

    let s = SummaryEngine::new().summarize_warehouse(&m, "w1");
    assert_eq!(s.risk_count, 1); // 只有 R10
    assert_eq!(s.over_count, 1); // 只有 O61
    assert_eq!(s.risk_inventory, 10.0);
    assert_eq!(s.over_inventory, 61.0);
}

// ==========================================
// 测试用例: 分级计数与压库信号
// ==========================================

#[test]
fn test_classification_counts() {
    let m = master(
        &["w1"],
        vec![
            record("1", vec![("w1", cell("A", 1.0, 1.0, 30.0))]),
            record("2", vec![("w1", cell("A", 1.0, 1.0, 30.0))]),
            record("3", vec![("w1", cell("B", 1.0, 1.0, 30.0))]),
            record("4", vec![("w1", cell("C", 1.0, 1.0, 30.0))]),
            record("5", vec![("w1", cell("Sin Mov", 5.0, 0.0, 0.0))]),
            record("6", vec![("w1", cell("Sin Mov", 0.0, 0.0, 0.0))]),
            record("7", vec![("w1", cell("D+", 1.0, 1.0, 30.0))]), // 透传文字不入四档
        ],
    );

    let s = SummaryEngine::new().summarize_warehouse(&m, "w1");
    assert_eq!(s.sku_count, 7);
    assert_eq!(s.count_a, 2);
    assert_eq!(s.count_b, 1);
    assert_eq!(s.count_c, 1);
    assert_eq!(s.count_sin_mov, 2);
    // Sin Mov 且有库存: 只有编码 5
    assert_eq!(s.dead_stock_count, 1);
}

// ==========================================
// 测试用例: 中位数口径
// ==========================================

#[test]
fn test_median_ignores_zero_coverage() {
    let m = master(
        &["w1"],
        vec![
            record("1", vec![("w1", cell("A", 0.0, 0.0, 0.0))]),
            record("2", vec![("w1", cell("A", 1.0, 1.0, 10.0))]),
            record("3", vec![("w1", cell("A", 1.0, 1.0, 20.0))]),
        ],
    );

    let s = SummaryEngine::new().summarize_warehouse(&m, "w1");
    // 0 天的格子不入样本: 中位数取 10 与 20 的平均
    assert_eq!(s.coverage_median_days, Some(15.0));
}

#[test]
fn test_median_all_zero_is_none_not_zero() {
    let m = master(
        &["w1"],
        vec![
            record("1", vec![("w1", cell("Sin Mov", 0.0, 0.0, 0.0))]),
            record("2", vec![("w1", cell("Sin Mov", 0.0, 0.0, 0.0))]),
        ],
    );

    let s = SummaryEngine::new().summarize_warehouse(&m, "w1");
    assert_eq!(s.coverage_median_days, None); // 占位,绝不是 Some(0.0)
}

#[test]
fn test_median_empty_view_is_none() {
    let m = master(&["w1"], vec![]);
    let s = SummaryEngine::new().summarize_warehouse(&m, "w1");
    assert_eq!(s.coverage_median_days, None);
}

// ==========================================
// 测试用例: 全局汇总口径
// ==========================================

#[test]
fn test_global_summary_averages_warehouse_percentages() {
    // w1: 2 个 SKU 里 1 个风险 (50%); w2: 0 个风险 (0%)
    let m = master(
        &["w1", "w2"],
        vec![
            record(
                "1",
                vec![
                    ("w1", cell("A", 5.0, 30.0, 5.0)),
                    ("w2", cell("A", 90.0, 30.0, 90.0)),
                ],
            ),
            record(
                "2",
                vec![
                    ("w1", cell("B", 30.0, 30.0, 30.0)),
                    ("w2", cell("B", 30.0, 30.0, 30.0)),
                ],
            ),
        ],
    );

    let engine = SummaryEngine::new();
    let summaries = engine.summarize_all(&m);
    let global = engine.global_summary(&m, &summaries);

    // 风险: (50% + 0%) / 2 = 25%
    assert!((global.risk_pct - 0.25).abs() < 1e-9);
    // 超储: w2 的 90 天 1/2,w1 0/2 → (0% + 50%) / 2 = 25%
    assert!((global.over_pct - 0.25).abs() < 1e-9);

    // 合并池覆盖天数: 件数合计 155 / (月均合计 120 / 30) = 38.75
    assert_eq!(global.inventory_total, 155.0);
    assert_eq!(global.monthly_avg_total, 120.0);
    assert!((global.day_coverage.unwrap() - 38.75).abs() < 1e-9);

    assert_eq!(global.sku_count, 2);
    assert_eq!(global.warehouse_count, 2);
}

#[test]
fn test_global_day_coverage_none_when_no_sales() {
    let m = master(
        &["w1"],
        vec![record("1", vec![("w1", cell("Sin Mov", 40.0, 0.0, 0.0))])],
    );

    let engine = SummaryEngine::new();
    let summaries = engine.summarize_all(&m);
    let global = engine.global_summary(&m, &summaries);

    assert_eq!(global.day_coverage, None); // 无销速,合并池比值无定义
    assert_eq!(global.dead_stock_pairs, 1);
}

// ==========================================
// 测试用例: 直方图与榜单
// ==========================================

#[test]
fn test_coverage_histogram_bucket_edges() {
    let m = master(
        &["w1"],
        vec![
            record("a", vec![("w1", cell("A", 1.0, 1.0, 0.0))]),
            record("b", vec![("w1", cell("A", 1.0, 1.0, 15.0))]), // 15 落首桶
            record("c", vec![("w1", cell("A", 1.0, 1.0, 15.5))]),
            record("d", vec![("w1", cell("A", 1.0, 1.0, 60.0))]),
            record("e", vec![("w1", cell("A", 1.0, 1.0, 61.0))]),
            record("f", vec![("w1", cell("A", 1.0, 1.0, 500.0))]),
        ],
    );

    let rows: Vec<&SkuRecord> = m.records().iter().collect();
    let buckets = SummaryEngine::new().coverage_histogram(&rows, "w1");

    let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 1, 1, 1, 1]); // [0,15] (15,30] (30,60] (60,120] >120
    assert_eq!(buckets[0].label, "0-15");
    assert_eq!(buckets[4].label, ">120");
}

#[test]
fn test_top_lists() {
    let m = master(
        &["w1"],
        vec![
            record("agotado", vec![("w1", cell("A", 0.0, 30.0, 0.0))]),
            record("poco", vec![("w1", cell("A", 5.0, 30.0, 5.0))]),
            record("mucho", vec![("w1", cell("C", 900.0, 3.0, 9000.0))]),
            record("normal", vec![("w1", cell("B", 30.0, 30.0, 30.0))]),
        ],
    );

    let engine = SummaryEngine::new();
    let rows: Vec<&SkuRecord> = m.records().iter().collect();

    // 超储榜: 只看有库存的行,覆盖天数降序
    let over = engine.top_overstock(&rows, "w1", 2);
    assert_eq!(over.len(), 2);
    assert_eq!(over[0].code, "mucho");
    assert_eq!(over[1].code, "normal");

    // 风险榜: 升序,零库存 (断货) 也列入
    let risk = engine.top_risk(&rows, "w1", 2);
    assert_eq!(risk[0].code, "agotado");
    assert_eq!(risk[1].code, "poco");
}

#[test]
fn test_rankings_and_highlights() {
    let m = master(
        &["w1", "w2"],
        vec![
            record(
                "1",
                vec![
                    ("w1", cell("A", 5.0, 30.0, 5.0)),     // w1 风险
                    ("w2", cell("Sin Mov", 70.0, 1.0, 2100.0)), // w2 超储+压库
                ],
            ),
            record(
                "2",
                vec![
                    ("w1", cell("B", 30.0, 30.0, 30.0)),
                    ("w2", cell("B", 30.0, 30.0, 30.0)),
                ],
            ),
        ],
    );

    let engine = SummaryEngine::new();
    let summaries = engine.summarize_all(&m);

    let by_risk = engine.rank_by_risk(&summaries);
    assert_eq!(by_risk[0].warehouse, "w1");
    assert_eq!(by_risk[0].risk_inventory, 5.0);

    let by_over = engine.rank_by_over(&summaries);
    assert_eq!(by_over[0].warehouse, "w2");
    assert_eq!(by_over[0].over_inventory, 70.0);

    let highlights = engine.highlights(&summaries);
    assert_eq!(highlights.most_risk.unwrap().warehouse, "w1");
    assert_eq!(highlights.most_over.unwrap().warehouse, "w2");
    assert_eq!(highlights.most_dead_stock.unwrap().warehouse, "w2");
    assert_eq!(highlights.largest_inventory.unwrap().warehouse, "w2");
}
