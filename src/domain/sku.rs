// ==========================================
// 多仓库存分析系统 - SKU 主档实体
// ==========================================
// 职责: 每次加载整体重建的不可变记录集
// 红线: 会话期间不做增量修改,新加载整体替换
// ==========================================

use crate::domain::types::Classification;
use crate::{OVER_THRESHOLD_DAYS, RISK_THRESHOLD_DAYS};
use serde::Serialize;
use std::collections::HashMap;

// ==========================================
// WarehouseCell - 单仓单品格子
// ==========================================

/// 某 SKU 在某仓库的库存切面
///
/// 数值字段均经过安全转换 (无法解析 → 0),不做负值截断
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseCell {
    /// 现存件数
    pub inventory: f64,
    /// ABC 流速分级
    pub classification: Classification,
    /// 月均销量 (件/月)
    pub monthly_avg_sale: f64,
    /// 覆盖月数 (信息性)
    pub monthly_coverage: f64,
    /// 覆盖天数 (按当前销速可支撑的天数)
    pub day_coverage: f64,
}

impl WarehouseCell {
    /// 断货风险: 0 < 覆盖天数 < 风险阈值 (严格小于)
    ///
    /// 覆盖天数为 0 的断货格子不计入风险占比,
    /// 但在调拨测算里等同风险处理 (见 needs_relief)
    pub fn is_risk(&self) -> bool {
        self.day_coverage > 0.0 && self.day_coverage < RISK_THRESHOLD_DAYS
    }

    /// 超储: 覆盖天数 > 冗余阈值 (严格大于)
    pub fn is_over(&self) -> bool {
        self.day_coverage > OVER_THRESHOLD_DAYS
    }

    /// 需要补给: 命中风险带,或库存已归零
    pub fn needs_relief(&self) -> bool {
        self.is_risk() || self.inventory == 0.0
    }

    /// 日销速率 = 月均销量 / 30
    pub fn daily_sale_rate(&self) -> f64 {
        self.monthly_avg_sale / 30.0
    }
}

// ==========================================
// SkuRecord - SKU 记录
// ==========================================

/// 一个商品编码对应一条记录,带全部已检测仓库的格子
#[derive(Debug, Clone, Serialize)]
pub struct SkuRecord {
    /// 商品编码 (非空,去空白,唯一键)
    pub code: String,
    /// 商品描述
    pub description: String,
    /// 仓库键 → 格子
    pub per_warehouse: HashMap<String, WarehouseCell>,
}

impl SkuRecord {
    pub fn cell(&self, warehouse: &str) -> Option<&WarehouseCell> {
        self.per_warehouse.get(warehouse)
    }
}

// ==========================================
// MasterData - 主档记录集
// ==========================================

/// 一次加载产出的完整记录集
///
/// 记录顺序保持文件行序; 重复编码后写覆盖,但保留首次出现的位置
#[derive(Debug, Clone, Serialize)]
pub struct MasterData {
    /// 检测到的仓库键 (按列出现顺序)
    warehouses: Vec<String>,
    /// 历史窗口月数 (MesesUsados,仅首行,可缺省)
    months_used: Option<i32>,
    /// SKU 记录 (文件行序)
    records: Vec<SkuRecord>,
    /// 编码 → 记录下标
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl MasterData {
    pub fn new(warehouses: Vec<String>, months_used: Option<i32>) -> Self {
        Self {
            warehouses,
            months_used,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 插入或覆盖一条记录
    ///
    /// 重复编码采用后写覆盖: 新值替换旧值,位置保持首次出现处。
    /// 返回是否发生了覆盖
    pub fn upsert(&mut self, record: SkuRecord) -> bool {
        match self.index.get(&record.code) {
            Some(&i) => {
                self.records[i] = record;
                true
            }
            None => {
                self.index.insert(record.code.clone(), self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&SkuRecord> {
        self.index.get(code).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[SkuRecord] {
        &self.records
    }

    pub fn warehouses(&self) -> &[String] {
        &self.warehouses
    }

    pub fn months_used(&self) -> Option<i32> {
        self.months_used
    }

    /// SKU 数 (一行一个 SKU)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn cell(inventory: f64, day_coverage: f64) -> WarehouseCell {
        WarehouseCell {
            inventory,
            classification: Classification::A,
            monthly_avg_sale: 30.0,
            monthly_coverage: 1.0,
            day_coverage,
        }
    }

    fn record(code: &str, description: &str) -> SkuRecord {
        let mut per_warehouse = HashMap::new();
        per_warehouse.insert("centro".to_string(), cell(10.0, 20.0));
        SkuRecord {
            code: code.to_string(),
            description: description.to_string(),
            per_warehouse,
        }
    }

    #[test]
    fn test_risk_boundary_is_strict() {
        assert!(cell(10.0, 10.0).is_risk());
        assert!(!cell(10.0, 15.0).is_risk()); // 阈值上不算风险
        assert!(!cell(0.0, 0.0).is_risk()); // 断货不计入风险占比
    }

    #[test]
    fn test_over_boundary_is_strict() {
        assert!(!cell(10.0, 60.0).is_over()); // 阈值上不算超储
        assert!(cell(10.0, 61.0).is_over());
        assert!(!cell(10.0, 10.0).is_over());
    }

    #[test]
    fn test_needs_relief_covers_stockout() {
        // 风险带
        assert!(cell(5.0, 10.0).needs_relief());
        // 断货 (覆盖天数 0 不算风险,但需要补给)
        assert!(cell(0.0, 0.0).needs_relief());
        // 健康
        assert!(!cell(50.0, 30.0).needs_relief());
    }

    #[test]
    fn test_upsert_last_write_wins_keeps_position() {
        let mut master = MasterData::new(vec!["centro".to_string()], None);
        assert!(!master.upsert(record("X1", "primero")));
        assert!(!master.upsert(record("X2", "otro")));
        // 重复编码: 覆盖值,保留位置
        assert!(master.upsert(record("X1", "segundo")));

        assert_eq!(master.len(), 2);
        assert_eq!(master.records()[0].code, "X1");
        assert_eq!(master.records()[0].description, "segundo");
        assert_eq!(master.get("X1").unwrap().description, "segundo");
    }
}
