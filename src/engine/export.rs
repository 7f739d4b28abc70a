// ==========================================
// 多仓库存分析系统 - 视图导出
// ==========================================
// 职责: 筛选/排序后的视图 → CSV 文本
// 契约: 表头即视图列标签; 含逗号/引号/换行的字段加引号,
//       内嵌引号成对转义; 整数值不带小数尾巴
// ==========================================

use crate::domain::sku::SkuRecord;
use crate::engine::view::{cell_text, numeric_value, view_columns};

/// 把视图行集序列化为 CSV 文本
///
/// 这是系统唯一的落盘/传输格式,必须与再次导入兼容
pub fn export_view_csv(rows: &[&SkuRecord], warehouse: &str) -> String {
    let columns = view_columns(warehouse);

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    // 表头
    let labels: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
    // Vec<u8> 做底座时写入不会失败
    writer.write_record(&labels).expect("CSV 表头写入失败");

    for record in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|col| {
                if col.numeric {
                    format_number(numeric_value(record, warehouse, col.key))
                } else {
                    cell_text(record, warehouse, col.key)
                }
            })
            .collect();
        writer.write_record(&fields).expect("CSV 行写入失败");
    }

    let bytes = writer.into_inner().expect("CSV 缓冲回收失败");
    let mut text = String::from_utf8(bytes).expect("CSV 输出应为 UTF-8");

    // 去掉末尾换行,行数与记录数一致
    while text.ends_with('\n') || text.ends_with('\r') {
        text.pop();
    }
    text
}

/// 数值格式化: 整数值不带 ".0" 尾巴,小数原样输出
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
