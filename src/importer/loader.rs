// ==========================================
// 多仓库存分析系统 - 主档装配器
// ==========================================
// 职责: 原始表格 → 校验 → 归一化 → 主档记录集
// 流程: 空表检查 → 仓库检测 → 列映射 → 逐行归一化
// 红线: 校验先于状态产出; 失败不产生半成品主档
// ==========================================

use crate::domain::sku::MasterData;
use crate::importer::columns::{detect_warehouses, resolve_columns};
use crate::importer::error::{LoadError, LoadResult};
use crate::importer::normalizer::{normalize_row, read_months_used};
use crate::importer::reader::{read_table, RawTable};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// LoadReport - 加载批次报告
// ==========================================

/// 一次加载的批次信息与行数统计
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub load_id: String,
    pub loaded_at: DateTime<Utc>,
    /// 来源文件名 (直接喂表格时为 None)
    pub source: Option<String>,
    pub total_rows: usize,
    /// 装入的 SKU 数 (去重后)
    pub loaded_skus: usize,
    /// 因编码为空被跳过的行数
    pub skipped_rows: usize,
    /// 重复编码次数 (后写覆盖)
    pub duplicate_codes: usize,
    pub warehouses: Vec<String>,
}

/// 加载产出: 主档 + 批次报告
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub master: MasterData,
    pub report: LoadReport,
}

// ==========================================
// MasterLoader - 主档装配器
// ==========================================
pub struct MasterLoader {
    // 无状态,每次加载整体重算
}

impl MasterLoader {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 从文件加载主档 (主入口)
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> LoadResult<LoadOutcome> {
        let path = path.as_ref();
        let table = read_table(path)?;

        let mut outcome = self.load_from_table(table)?;
        outcome.report.source = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string());

        info!(
            load_id = %outcome.report.load_id,
            skus = outcome.report.loaded_skus,
            warehouses = ?outcome.report.warehouses,
            skipped = outcome.report.skipped_rows,
            duplicates = outcome.report.duplicate_codes,
            "主档加载完成"
        );

        Ok(outcome)
    }

    /// 从原始表格加载主档
    ///
    /// 调用方可以绕开文件层,直接喂已解码的行集
    pub fn load_from_table(&self, table: RawTable) -> LoadResult<LoadOutcome> {
        // === 步骤 1: 空表检查 ===
        if table.rows.is_empty() {
            return Err(LoadError::EmptyFile);
        }

        // === 步骤 2: 仓库检测 ===
        let warehouses = detect_warehouses(&table.headers);
        if warehouses.is_empty() {
            return Err(LoadError::NoWarehousesDetected);
        }

        // === 步骤 3: 列映射 (缺列在这里整体失败) ===
        let columns = resolve_columns(&table.headers, &warehouses)?;

        // === 步骤 4: 历史窗口月数仅读首行 ===
        let months_used = read_months_used(&table.rows[0], &columns);

        // === 步骤 5: 逐行归一化,重复编码后写覆盖 ===
        let mut master = MasterData::new(warehouses.clone(), months_used);
        let mut skipped_rows = 0;
        let mut duplicate_codes = 0;

        for row in &table.rows {
            match normalize_row(row, &columns) {
                Some(record) => {
                    if master.upsert(record) {
                        duplicate_codes += 1;
                    }
                }
                None => skipped_rows += 1,
            }
        }

        let report = LoadReport {
            load_id: Uuid::new_v4().to_string(),
            loaded_at: Utc::now(),
            source: None,
            total_rows: table.rows.len(),
            loaded_skus: master.len(),
            skipped_rows,
            duplicate_codes,
            warehouses,
        };

        Ok(LoadOutcome { master, report })
    }
}

impl Default for MasterLoader {
    fn default() -> Self {
        Self::new()
    }
}
