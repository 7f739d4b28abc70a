// ==========================================
// 多仓库存分析系统 - 明细视图引擎
// ==========================================
// 职责: 筛选 + 排序 + 视图列定义
// 红线: 筛选条件整体传入,整体重算; 不做增量修改
// ==========================================

use crate::domain::sku::{MasterData, SkuRecord};
use crate::domain::types::Classification;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// 筛选条件
// ==========================================

/// 明细视图筛选条件 (条件之间取与)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewFilter {
    /// 按分级过滤 (None = 全部)
    pub classification: Option<Classification>,
    /// 编码/描述子串搜索 (不区分大小写)
    pub search: Option<String>,
    /// 仅有库存的行
    pub only_with_inventory: bool,
    /// 覆盖天数下限
    pub coverage_min: Option<f64>,
    /// 覆盖天数上限
    pub coverage_max: Option<f64>,
    /// 仅 Sin Mov 且有库存 (压资金信号)
    pub only_dead_stock: bool,
    /// 仅 A/B 且零库存 (已断货的高流速物料)
    pub only_fast_movers_empty: bool,
}

/// 按筛选条件过滤主档,返回目标仓视图的行集 (保持文件行序)
pub fn apply_filter<'a>(
    master: &'a MasterData,
    warehouse: &str,
    filter: &ViewFilter,
) -> Vec<&'a SkuRecord> {
    let search = filter
        .search
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    master
        .records()
        .iter()
        .filter(|record| {
            let Some(cell) = record.cell(warehouse) else {
                return false;
            };

            if let Some(cls) = &filter.classification {
                if cell.classification != *cls {
                    return false;
                }
            }

            if let Some(q) = &search {
                let hit = record.code.to_lowercase().contains(q)
                    || record.description.to_lowercase().contains(q);
                if !hit {
                    return false;
                }
            }

            if filter.only_with_inventory && cell.inventory <= 0.0 {
                return false;
            }

            let d = cell.day_coverage;
            if let Some(min) = filter.coverage_min {
                if d < min {
                    return false;
                }
            }
            if let Some(max) = filter.coverage_max {
                if d > max {
                    return false;
                }
            }

            if filter.only_dead_stock
                && !(cell.classification == Classification::SinMov && cell.inventory > 0.0)
            {
                return false;
            }

            if filter.only_fast_movers_empty
                && !(cell.classification.is_fast_mover() && cell.inventory == 0.0)
            {
                return false;
            }

            true
        })
        .collect()
}

// ==========================================
// 视图列与排序
// ==========================================

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDir {
    Asc,
    Desc,
}

/// 视图列键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    Code,
    Description,
    Inventory,
    Classification,
    MonthlyAvgSale,
    MonthlyCoverage,
    DayCoverage,
}

/// 视图列定义 (标签即导出表头)
#[derive(Debug, Clone, Serialize)]
pub struct ViewColumn {
    pub key: SortKey,
    pub label: String,
    pub numeric: bool,
    pub decimals: u8,
}

/// 目标仓的视图列清单,标签与输入表头写法一致
pub fn view_columns(warehouse: &str) -> Vec<ViewColumn> {
    vec![
        ViewColumn {
            key: SortKey::Code,
            label: "Codigo".to_string(),
            numeric: false,
            decimals: 0,
        },
        ViewColumn {
            key: SortKey::Description,
            label: "desc_prod".to_string(),
            numeric: false,
            decimals: 0,
        },
        ViewColumn {
            key: SortKey::Inventory,
            label: format!("Inv-{}", warehouse),
            numeric: true,
            decimals: 0,
        },
        ViewColumn {
            key: SortKey::Classification,
            label: format!("Clasificacion-{}", warehouse),
            numeric: false,
            decimals: 0,
        },
        ViewColumn {
            key: SortKey::MonthlyAvgSale,
            label: format!("Promedio Vta Mes-{}", warehouse),
            numeric: true,
            decimals: 2,
        },
        ViewColumn {
            key: SortKey::MonthlyCoverage,
            label: format!("Cobertura (Mes)-{}", warehouse),
            numeric: true,
            decimals: 2,
        },
        ViewColumn {
            key: SortKey::DayCoverage,
            // 规范写法在 "(30)" 与连字符之间带一个空格
            label: format!("Cobertura Dias (30) -{}", warehouse),
            numeric: true,
            decimals: 2,
        },
    ]
}

/// 按列键稳定排序 (数值列按值,文字列不区分大小写)
pub fn sort_rows<'a>(
    mut rows: Vec<&'a SkuRecord>,
    warehouse: &str,
    key: SortKey,
    dir: SortDir,
) -> Vec<&'a SkuRecord> {
    rows.sort_by(|a, b| {
        let ord = match key {
            SortKey::Code => cmp_text(&a.code, &b.code),
            SortKey::Description => cmp_text(&a.description, &b.description),
            SortKey::Classification => cmp_text(
                cell_text(a, warehouse, key).as_str(),
                cell_text(b, warehouse, key).as_str(),
            ),
            _ => {
                let va = numeric_value(a, warehouse, key);
                let vb = numeric_value(b, warehouse, key);
                va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
            }
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    rows
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// 数值列取值 (格子缺失按 0 处理)
pub fn numeric_value(record: &SkuRecord, warehouse: &str, key: SortKey) -> f64 {
    let Some(cell) = record.cell(warehouse) else {
        return 0.0;
    };
    match key {
        SortKey::Inventory => cell.inventory,
        SortKey::MonthlyAvgSale => cell.monthly_avg_sale,
        SortKey::MonthlyCoverage => cell.monthly_coverage,
        SortKey::DayCoverage => cell.day_coverage,
        _ => 0.0,
    }
}

/// 文字列取值
pub fn cell_text(record: &SkuRecord, warehouse: &str, key: SortKey) -> String {
    match key {
        SortKey::Code => record.code.clone(),
        SortKey::Description => record.description.clone(),
        SortKey::Classification => record
            .cell(warehouse)
            .map(|c| c.classification.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
