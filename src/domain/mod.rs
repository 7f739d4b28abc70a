// ==========================================
// 多仓库存分析系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型与派生指标结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod sku;
pub mod summary;
pub mod transfer;
pub mod types;

// 重导出核心类型
pub use sku::{MasterData, SkuRecord, WarehouseCell};
pub use summary::{
    CoverageBucket, GlobalSummary, SummaryHighlights, TopItem, WarehouseRank, WarehouseShare,
    WarehouseSummary,
};
pub use transfer::{BreakOpportunity, DonorAllocation, OverOpportunity, ReceiverAllocation};
pub use types::Classification;
