// ==========================================
// 多仓库存分析系统 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv
// 系统定位: 库存分级与跨仓调拨决策支持
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 业务规则
pub mod engine;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::Classification;

// 领域实体
pub use domain::sku::{MasterData, SkuRecord, WarehouseCell};
pub use domain::summary::{
    CoverageBucket, GlobalSummary, SummaryHighlights, TopItem, WarehouseRank, WarehouseShare,
    WarehouseSummary,
};
pub use domain::transfer::{
    BreakOpportunity, DonorAllocation, OverOpportunity, ReceiverAllocation,
};

// 导入层
pub use importer::{
    read_table, LoadError, LoadOutcome, LoadReport, LoadResult, MasterLoader, RawTable,
};

// 引擎
pub use engine::export::export_view_csv;
pub use engine::view::{
    apply_filter, sort_rows, view_columns, SortDir, SortKey, ViewColumn, ViewFilter,
};
pub use engine::{RebalanceEngine, SummaryEngine};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "多仓库存分析系统";

/// 断货风险阈值: 覆盖天数 0 < d < 15 视为断货风险
pub const RISK_THRESHOLD_DAYS: f64 = 15.0;

/// 超储阈值: 覆盖天数 d > 60 视为超储
pub const OVER_THRESHOLD_DAYS: f64 = 60.0;

// 调拨测算的目标覆盖天数与上述两个阈值一致:
// 补给补到风险阈值用量,泄压泄到冗余阈值用量

// ==========================================
// 预编译检查
// ==========================================
