// ==========================================
// 多仓库存分析系统 - 行归一化器
// ==========================================
// 职责: 原始文字 → 类型化字段
// 红线: 单元格级问题绝不报错,一律安全降级
// ==========================================

use crate::domain::sku::{SkuRecord, WarehouseCell};
use crate::domain::types::Classification;
use crate::importer::columns::ResolvedColumns;
use std::collections::HashMap;

// ==========================================
// 安全数值转换
// ==========================================

/// 安全数值转换: 去掉货币符号/千分位/空格后解析
///
/// 解析失败、为空或非有限值 → 0,绝不报错。
/// 不做负值截断
pub fn safe_num(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | ',' | ' ' | '\u{a0}'))
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

// ==========================================
// 行归一化
// ==========================================

/// 把一行原始映射归一化为一条 SKU 记录
///
/// 编码为空的行跳过 (返回 None,不算错误)
pub fn normalize_row(
    row: &HashMap<String, String>,
    columns: &ResolvedColumns,
) -> Option<SkuRecord> {
    let code = row
        .get(&columns.code)
        .map(|s| s.trim())
        .unwrap_or("");
    if code.is_empty() {
        return None;
    }

    let description = row
        .get(&columns.description)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let mut per_warehouse = HashMap::with_capacity(columns.warehouses.len());
    for wc in &columns.warehouses {
        let raw = |col: &str| row.get(col).map(|s| s.as_str()).unwrap_or("");

        per_warehouse.insert(
            wc.warehouse.clone(),
            WarehouseCell {
                inventory: safe_num(raw(&wc.inv)),
                classification: Classification::parse(raw(&wc.cls)),
                monthly_avg_sale: safe_num(raw(&wc.prom)),
                monthly_coverage: safe_num(raw(&wc.cov_mes)),
                day_coverage: safe_num(raw(&wc.cov_dias)),
            },
        );
    }

    Some(SkuRecord {
        code: code.to_string(),
        description,
        per_warehouse,
    })
}

/// 读取历史窗口月数 (仅首行的 MesesUsados 单元格)
///
/// 缺省、非数值或为 0 → None
pub fn read_months_used(
    first_row: &HashMap<String, String>,
    columns: &ResolvedColumns,
) -> Option<i32> {
    let col = columns.months_used.as_ref()?;
    let n = safe_num(first_row.get(col).map(|s| s.as_str()).unwrap_or(""));
    if n == 0.0 {
        None
    } else {
        Some(n as i32)
    }
}
