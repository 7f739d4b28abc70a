// ==========================================
// 多仓库存分析系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// 只有结构性问题会出现在这里; 单元格级别的数据质量问题
/// 一律安全降级 (0 / "Sin Mov" / 跳行),不产生错误
#[derive(Error, Debug)]
pub enum LoadError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileRead(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParse(String),

    #[error("CSV 解析失败: {0}")]
    CsvParse(String),

    // ===== 结构校验错误 =====
    #[error("文件为空,没有数据行")]
    EmptyFile,

    #[error("缺少必需列: {0}")]
    MissingColumn(String),

    #[error("仓库 '{warehouse}' 缺少必需列: {column}")]
    MissingWarehouseColumn { warehouse: String, column: String },

    #[error("未检测到 'Inv-<仓库>' 形式的库存列")]
    NoWarehousesDetected,
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::FileRead(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::CsvParse(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::ExcelParse(err.to_string())
    }
}

/// Result 类型别名
pub type LoadResult<T> = Result<T, LoadError>;
