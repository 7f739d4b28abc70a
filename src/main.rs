// ==========================================
// 多仓库存分析系统 - 命令行入口
// ==========================================
// 用法: maestro-inventarios <archivo> [almacén]
//       [--export <salida.csv>] [--solo-riesgo] [--json]
// 职责: 加载文件 → 输出汇总与调拨建议 → 可选导出视图
// ==========================================

use anyhow::{bail, Context, Result};
use maestro_inventarios::{
    apply_filter, export_view_csv, logging, BreakOpportunity, GlobalSummary, MasterLoader,
    OverOpportunity, RebalanceEngine, SummaryEngine, ViewFilter, WarehouseSummary,
};

fn main() -> Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!(
        "{} v{}",
        maestro_inventarios::APP_NAME,
        maestro_inventarios::VERSION
    );
    tracing::info!("==================================================");

    // ===== 参数解析 (手工,不引入 CLI 框架) =====
    let mut file: Option<String> = None;
    let mut warehouse_arg: Option<String> = None;
    let mut export_path: Option<String> = None;
    let mut only_flagged = false;
    let mut json_output = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => {
                export_path = Some(args.next().context("--export 需要输出文件路径")?);
            }
            "--solo-riesgo" => only_flagged = true,
            "--json" => json_output = true,
            _ if file.is_none() => file = Some(arg),
            _ if warehouse_arg.is_none() => warehouse_arg = Some(arg),
            _ => bail!("多余的参数: {}", arg),
        }
    }

    let Some(file) = file else {
        eprintln!(
            "用法: maestro-inventarios <archivo.xlsx|csv> [almacén] \
             [--export <salida.csv>] [--solo-riesgo] [--json]"
        );
        bail!("缺少输入文件");
    };

    // ===== 加载 =====
    let loader = MasterLoader::new();
    let outcome = loader
        .load_from_file(&file)
        .with_context(|| format!("无法加载文件 {}", file))?;
    let master = &outcome.master;

    // ===== 汇总与调拨测算 =====
    let summary_engine = SummaryEngine::new();
    let summaries = summary_engine.summarize_all(master);
    let global = summary_engine.global_summary(master, &summaries);

    let target = warehouse_arg
        .or_else(|| master.warehouses().first().cloned())
        .context("未检测到任何仓库")?;

    let rebalance = RebalanceEngine::new();
    let breaks = rebalance.break_opportunities(master, &target, only_flagged);
    let overs = rebalance.over_opportunities(master, &target, only_flagged);

    // ===== 输出 =====
    if json_output {
        let payload = serde_json::json!({
            "report": outcome.report,
            "global": global,
            "warehouses": summaries,
            "target": target,
            "break_opportunities": breaks,
            "over_opportunities": overs,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_report(&outcome.report, master.warehouses());
        print_global(&global);
        print_warehouses(&summaries);
        print_opportunities(&target, &breaks, &overs);
    }

    // ===== 可选导出 =====
    if let Some(path) = export_path {
        let rows = apply_filter(master, &target, &ViewFilter::default());
        let csv = export_view_csv(&rows, &target);
        std::fs::write(&path, csv).with_context(|| format!("无法写出 {}", path))?;
        if !json_output {
            println!();
            println!("已导出 {} 行到 {}", rows.len(), path);
        }
    }

    Ok(())
}

// ==========================================
// 人读输出
// ==========================================

fn print_report(report: &maestro_inventarios::LoadReport, warehouses: &[String]) {
    println!(
        "已加载 {} 个 SKU,检测到仓库: {}",
        report.loaded_skus,
        warehouses.join(", ")
    );
    if report.skipped_rows > 0 || report.duplicate_codes > 0 {
        println!(
            "  (跳过空编码行 {},重复编码覆盖 {})",
            report.skipped_rows, report.duplicate_codes
        );
    }
}

fn print_global(global: &GlobalSummary) {
    println!();
    println!("=== 全局汇总 ===");
    if let Some(months) = global.months_used {
        println!("历史窗口: {} 个月", months);
    }
    println!("SKU 总数: {}", global.sku_count);
    println!("件数合计: {:.0}", global.inventory_total);
    println!("月均销量合计: {:.2}", global.monthly_avg_total);
    match global.day_coverage {
        Some(d) => println!("全局覆盖天数 (合并池): {:.1}", d),
        None => println!("全局覆盖天数 (合并池): —"),
    }
    println!(
        "风险占比 {:.1}% | 超储占比 {:.1}% | Sin Mov 压库对数 {}",
        global.risk_pct * 100.0,
        global.over_pct * 100.0,
        global.dead_stock_pairs
    );
}

fn print_warehouses(summaries: &[WarehouseSummary]) {
    println!();
    println!("=== 单仓汇总 ===");
    for s in summaries {
        let median = s
            .coverage_median_days
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| "—".to_string());
        println!(
            "{:<12} A:{:<4} B:{:<4} C:{:<4} SinMov:{:<4} 件数 {:>8.0} 覆盖中位 {:>6} 风险 {:>5.1}% 超储 {:>5.1}%",
            s.warehouse,
            s.count_a,
            s.count_b,
            s.count_c,
            s.count_sin_mov,
            s.inventory_total,
            median,
            s.risk_pct() * 100.0,
            s.over_pct() * 100.0,
        );
    }
}

fn print_opportunities(target: &str, breaks: &[BreakOpportunity], overs: &[OverOpportunity]) {
    println!();
    println!("=== 调拨建议 (目标仓: {}) ===", target);

    println!("补给机会 {} 条:", breaks.len());
    for op in breaks.iter().take(10) {
        let donors: Vec<String> = op
            .donors
            .iter()
            .filter(|d| d.allocated > 0.0)
            .map(|d| format!("{}→{:.0}", d.warehouse, d.allocated))
            .collect();
        println!(
            "  {:<14} {} 缺口 {:.0} 建议 {:.0} [{}]",
            op.code,
            op.classification,
            op.deficit,
            op.suggested,
            donors.join(", ")
        );
    }

    println!("泄压机会 {} 条:", overs.len());
    for op in overs.iter().take(10) {
        let receivers: Vec<String> = op
            .receivers
            .iter()
            .filter(|r| r.allocated > 0.0)
            .map(|r| format!("{}←{:.0}", r.warehouse, r.allocated))
            .collect();
        println!(
            "  {:<14} {} 冗余 {:.0} 建议 {:.0} [{}]",
            op.code,
            op.classification,
            op.excess,
            op.suggested,
            receivers.join(", ")
        );
    }
}
