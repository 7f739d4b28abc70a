// ==========================================
// 多仓库存分析系统 - 列映射解析器
// ==========================================
// 职责: 把写法不一的表头映射到规范字段
// 输入: 首行表头 + 仓库键
// 输出: 规范字段 × 仓库 → 实际列名
// 红线: 必需列缺失属结构性错误,必须整体失败
// ==========================================

use crate::importer::error::{LoadError, LoadResult};

// ==========================================
// 规范字段与别名清单
// ==========================================

/// 规范字段标识 (每仓五列)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    /// 现存件数
    Inv,
    /// ABC 流速分级
    Cls,
    /// 月均销量
    Prom,
    /// 覆盖月数
    CovMes,
    /// 覆盖天数
    CovDias,
}

impl FieldId {
    /// 可接受的表头模板清单; "{}" 为仓库键占位符
    ///
    /// 新别名写法通过扩充清单接入,不新增匹配代码路径。
    /// 首个模板为规范写法,报错时按它提示
    fn templates(self) -> &'static [&'static str] {
        match self {
            FieldId::Inv => &["Inv-{}"],
            FieldId::Cls => &["Clasificacion-{}", "Clasificación-{}"],
            FieldId::Prom => &["Promedio Vta Mes-{}"],
            FieldId::CovMes => &["Cobertura (Mes)-{}"],
            // 注意规范写法在 "(30)" 与连字符之间带一个空格
            FieldId::CovDias => &[
                "Cobertura Dias (30) -{}",
                "Cobertura Dias (30)-{}",
                "Cobertura Días (30) -{}",
            ],
        }
    }

    fn render(self, warehouse: &str) -> Vec<String> {
        self.templates()
            .iter()
            .map(|t| t.replace("{}", warehouse))
            .collect()
    }

    /// 规范写法 (用于报错提示)
    pub fn canonical(self, warehouse: &str) -> String {
        self.templates()[0].replace("{}", warehouse)
    }
}

/// 商品编码列的可接受写法
const CODE_ALIASES: &[&str] = &["Codigo", "Código"];

/// 商品描述列的可接受写法
const DESC_ALIASES: &[&str] = &["desc_prod", "Descripcion", "Descripción"];

/// 历史窗口月数列 (可缺省)
const MONTHS_ALIASES: &[&str] = &["MesesUsados"];

/// 已知仓库键提示清单
///
/// 仅作归一化兜底: 当某仓的库存列以变体写法出现、前缀扫描漏掉时,
/// 通过归一化等价仍能识别。绝不作为唯一来源 —— 未知仓库照常
/// 由前缀扫描发现
pub const WAREHOUSE_HINTS: &[&str] = &["adelitas", "express", "matriz"];

// ==========================================
// 表头归一化
// ==========================================

/// 归一化列名键: 折叠重音、去掉非字母数字、统一小写
///
/// "Cobertura Días (30) -Centro" 与 "cobertura dias (30)-centro"
/// 归一化后等价
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .map(fold_accent)
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'a',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'u',
        'ñ' | 'Ñ' => 'n',
        _ => c,
    }
}

// ==========================================
// 仓库检测
// ==========================================

/// 从表头检测仓库键集合
///
/// 主来源: 扫描 "Inv-<仓库>" 前缀列并取后缀。
/// 提示清单仅用于兜底识别变体写法的库存列
pub fn detect_warehouses(headers: &[String]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for header in headers {
        if let Some(rest) = header.strip_prefix("Inv-") {
            let key = rest.trim();
            if !key.is_empty() && !found.iter().any(|w| w == key) {
                found.push(key.to_string());
            }
        }
    }

    for hint in WAREHOUSE_HINTS {
        if found.iter().any(|w| normalize_key(w) == normalize_key(hint)) {
            continue;
        }
        let wanted = normalize_key(&format!("Inv-{}", hint));
        if headers.iter().any(|h| normalize_key(h) == wanted) {
            found.push((*hint).to_string());
        }
    }

    found
}

// ==========================================
// 列映射结果
// ==========================================

/// 某仓库五个规范字段对应的实际列名
#[derive(Debug, Clone)]
pub struct WarehouseColumns {
    pub warehouse: String,
    pub inv: String,
    pub cls: String,
    pub prom: String,
    pub cov_mes: String,
    pub cov_dias: String,
}

impl WarehouseColumns {
    pub fn column(&self, field: FieldId) -> &str {
        match field {
            FieldId::Inv => &self.inv,
            FieldId::Cls => &self.cls,
            FieldId::Prom => &self.prom,
            FieldId::CovMes => &self.cov_mes,
            FieldId::CovDias => &self.cov_dias,
        }
    }
}

/// 整表列映射: 公共列 + 每仓五列
#[derive(Debug, Clone)]
pub struct ResolvedColumns {
    pub code: String,
    pub description: String,
    pub months_used: Option<String>,
    pub warehouses: Vec<WarehouseColumns>,
}

// ==========================================
// 解析入口
// ==========================================

/// 解析整表列映射
///
/// 匹配顺序: 先精确 (表头已去空白),后归一化等价。
/// 任一仓库缺任一必需列即失败
pub fn resolve_columns(
    headers: &[String],
    warehouses: &[String],
) -> LoadResult<ResolvedColumns> {
    let code = find_column(headers, CODE_ALIASES)
        .ok_or_else(|| LoadError::MissingColumn(CODE_ALIASES[0].to_string()))?;
    let description = find_column(headers, DESC_ALIASES)
        .ok_or_else(|| LoadError::MissingColumn(DESC_ALIASES[0].to_string()))?;
    let months_used = find_column(headers, MONTHS_ALIASES);

    let mut resolved = Vec::with_capacity(warehouses.len());
    for warehouse in warehouses {
        let find_field = |field: FieldId| -> LoadResult<String> {
            let aliases = field.render(warehouse);
            let alias_refs: Vec<&str> = aliases.iter().map(|s| s.as_str()).collect();
            find_column(headers, &alias_refs).ok_or_else(|| LoadError::MissingWarehouseColumn {
                warehouse: warehouse.clone(),
                column: field.canonical(warehouse),
            })
        };

        resolved.push(WarehouseColumns {
            warehouse: warehouse.clone(),
            inv: find_field(FieldId::Inv)?,
            cls: find_field(FieldId::Cls)?,
            prom: find_field(FieldId::Prom)?,
            cov_mes: find_field(FieldId::CovMes)?,
            cov_dias: find_field(FieldId::CovDias)?,
        });
    }

    Ok(ResolvedColumns {
        code,
        description,
        months_used,
        warehouses: resolved,
    })
}

/// 在表头中找别名清单的首个命中列
fn find_column(headers: &[String], aliases: &[&str]) -> Option<String> {
    // 精确命中优先
    for alias in aliases {
        if let Some(h) = headers.iter().find(|h| h.as_str() == *alias) {
            return Some(h.clone());
        }
    }

    // 归一化等价兜底
    for alias in aliases {
        let wanted = normalize_key(alias);
        if let Some(h) = headers.iter().find(|h| normalize_key(h) == wanted) {
            return Some(h.clone());
        }
    }

    None
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn full_headers(wh: &str) -> Vec<String> {
        headers(&[
            "Codigo",
            "desc_prod",
            &format!("Inv-{}", wh),
            &format!("Clasificacion-{}", wh),
            &format!("Promedio Vta Mes-{}", wh),
            &format!("Cobertura (Mes)-{}", wh),
            &format!("Cobertura Dias (30) -{}", wh),
        ])
    }

    #[test]
    fn test_normalize_key_folds_accents_and_punctuation() {
        assert_eq!(
            normalize_key("Cobertura Días (30) -Centro"),
            normalize_key("cobertura dias (30)-centro")
        );
        assert_eq!(normalize_key("Código"), "codigo");
        assert_eq!(normalize_key("Inv-  Norte "), "invnorte");
    }

    #[test]
    fn test_detect_warehouses_from_prefix_scan() {
        let h = headers(&["Codigo", "Inv-centro", "Inv-Norte", "Promedio Vta Mes-centro"]);
        let detected = detect_warehouses(&h);
        // 提示清单之外的仓库 (Norte) 照常被发现
        assert_eq!(detected, vec!["centro".to_string(), "Norte".to_string()]);
    }

    #[test]
    fn test_detect_warehouses_hint_fallback() {
        // 库存列写法跑偏 (重音 + 空格),前缀扫描失效,提示清单兜底
        let h = headers(&["Codigo", "Inv - Matriz"]);
        let detected = detect_warehouses(&h);
        assert_eq!(detected, vec!["matriz".to_string()]);
    }

    #[test]
    fn test_resolve_exact_headers() {
        let h = full_headers("centro");
        let cols = resolve_columns(&h, &["centro".to_string()]).unwrap();
        assert_eq!(cols.code, "Codigo");
        assert_eq!(cols.warehouses[0].cov_dias, "Cobertura Dias (30) -centro");
    }

    #[test]
    fn test_resolve_fuzzy_headers() {
        // 重音、大小写、标点全部跑偏,仍按归一化等价命中
        let h = headers(&[
            "Código",
            "Descripción",
            "INV-centro",
            "clasificación-centro",
            "promedio vta mes-centro",
            "cobertura (mes)-centro",
            "Cobertura Días (30)-centro",
        ]);
        let cols = resolve_columns(&h, &["centro".to_string()]).unwrap();
        assert_eq!(cols.code, "Código");
        assert_eq!(cols.warehouses[0].inv, "INV-centro");
        assert_eq!(cols.warehouses[0].cov_dias, "Cobertura Días (30)-centro");
    }

    #[test]
    fn test_resolve_missing_warehouse_column_fails() {
        let mut h = full_headers("centro");
        h.retain(|c| c != "Clasificacion-centro");

        let err = resolve_columns(&h, &["centro".to_string()]).unwrap_err();
        match err {
            LoadError::MissingWarehouseColumn { warehouse, column } => {
                assert_eq!(warehouse, "centro");
                assert_eq!(column, "Clasificacion-centro");
            }
            other => panic!("错误类型不符: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_code_column_fails() {
        let mut h = full_headers("centro");
        h.retain(|c| c != "Codigo");
        let err = resolve_columns(&h, &["centro".to_string()]).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "Codigo"));
    }
}
