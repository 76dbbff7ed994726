use tabled::{settings::Style, Table, Tabled};

use crate::models::analytics::{
    PerformanceReport, PortfolioOverview, RankedChange, YieldSummary,
};
use crate::models::portfolio::PortfolioRef;

use super::ToolName;

/// Placeholder for a percentage whose denominator was zero.
pub const UNDEFINED: &str = "n/a";

/// Renders engine output as plain text for the calling agent or terminal.
pub struct Formatter;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Asset type")]
    asset_type: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "Asset")]
    name: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Supplied")]
    supplied: String,
    #[tabled(rename = "Borrowed")]
    borrowed: String,
    #[tabled(rename = "Net yield/yr")]
    net_yield: String,
}

#[derive(Tabled)]
struct LegRow {
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Asset")]
    symbol: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "APY")]
    apy: String,
    #[tabled(rename = "Annual")]
    annual: String,
}

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Name")]
    label: String,
    #[tabled(rename = "Previous")]
    prev: String,
    #[tabled(rename = "Current")]
    curr: String,
    #[tabled(rename = "Change")]
    diff: String,
    #[tabled(rename = "%")]
    percent: String,
}

/// Asset-type row: the last column is the plain `prev / curr` ratio.
#[derive(Tabled)]
struct TypeChangeRow {
    #[tabled(rename = "Asset type")]
    label: String,
    #[tabled(rename = "Previous")]
    prev: String,
    #[tabled(rename = "Current")]
    curr: String,
    #[tabled(rename = "Change")]
    diff: String,
    #[tabled(rename = "Prev/Curr")]
    ratio: String,
}

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "Tool")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl Formatter {
    /// Names and one-line descriptions of the given tools.
    pub fn tool_list(tools: &[ToolName]) -> String {
        table(tools.iter().map(|t| ToolRow {
            name: t.as_str(),
            description: t.description(),
        }))
    }

    pub fn portfolio_list(portfolios: &[PortfolioRef]) -> String {
        if portfolios.is_empty() {
            return "No portfolios found.".to_string();
        }
        let mut out = format!("Portfolios ({}):\n", portfolios.len());
        for p in portfolios {
            out.push_str(&format!("- {p}\n"));
        }
        out.trim_end().to_string()
    }

    pub fn overview(overview: &PortfolioOverview, threshold: f64) -> String {
        let mut out = format!("Portfolio: {}\n", overview.portfolio);
        out.push_str(&format!("Total value: {}\n", usd(overview.total_usd)));
        out.push_str(&format!(
            "Accounts: {} | Positions: {}\n\n",
            overview.account_count, overview.position_count
        ));

        out.push_str("Breakdown by asset type\n");
        if overview.breakdown.is_empty() {
            out.push_str("No assets found.\n");
        } else {
            let rows = overview.breakdown.iter().map(|b| BreakdownRow {
                asset_type: b.asset_type.clone(),
                value: usd(b.value),
                share: pct(b.percentage),
            });
            out.push_str(&table(rows));
            out.push('\n');
        }

        out.push_str(&format!("\nMajor holdings (>= {})\n", usd(threshold)));
        if overview.major_holdings.is_empty() {
            out.push_str(&format!("No holdings at or above {}.", usd(threshold)));
        } else {
            let rows = overview.major_holdings.iter().map(|h| HoldingRow {
                name: h.name.clone(),
                symbol: h.symbol.clone(),
                amount: amount(h.amount),
                value: usd(h.value),
            });
            out.push_str(&table(rows));
        }
        out
    }

    pub fn yield_summary(summary: &YieldSummary) -> String {
        let totals = &summary.totals;
        let mut out = format!("Yield summary: {}\n", summary.portfolio);
        out.push_str(&format!("Total supplied: {}\n", usd(totals.total_supply_usd)));
        out.push_str(&format!("Total borrowed: {}\n", usd(totals.total_borrow_usd)));
        out.push_str(&format!("Net annual yield: {}\n", usd(totals.total_yield_usd)));
        out.push_str(&format!("Average APY: {}\n", pct(totals.avg_apy)));

        if summary.pools.is_empty() {
            out.push_str("\nNo yield positions found.");
            return out;
        }

        let pools = summary.pools.iter().map(|p| PoolRow {
            platform: p.platform.clone(),
            network: p.network.clone(),
            supplied: usd(p.supply_usd),
            borrowed: usd(p.borrow_usd),
            net_yield: usd(p.net_yield_usd),
        });
        out.push('\n');
        out.push_str(&table(pools));

        let legs = summary.pools.iter().flat_map(|p| {
            let supply = p.supply.iter().map(move |l| (p, "supply", l));
            let borrow = p.borrow.iter().map(move |l| (p, "borrow", l));
            supply.chain(borrow)
        });
        let rows: Vec<LegRow> = legs
            .map(|(pool, side, leg)| LegRow {
                platform: pool.platform.clone(),
                side,
                symbol: leg.symbol.clone(),
                amount: amount(leg.amount),
                value: usd(leg.usd_value),
                apy: pct(Some(leg.apy)),
                annual: usd(leg.annual_usd),
            })
            .collect();
        if !rows.is_empty() {
            out.push_str("\n\nLegs\n");
            out.push_str(&table(rows));
        }
        out
    }

    pub fn performance(report: &PerformanceReport) -> String {
        let mut out = format!("Performance: {}\n", report.portfolio);
        if let (Some(start), Some(end)) = (&report.starts_at, &report.ends_at) {
            out.push_str(&format!("Window: {start} to {end}\n"));
        }
        out.push_str(&format!(
            "Change: {} ({})\n",
            signed_usd(report.period_return.absolute),
            pct(report.period_return.percent)
        ));

        out.push_str("\nChange by asset type\n");
        out.push_str(&type_change_table(&report.change_by_type));
        out.push_str("\n\nTop gainers\n");
        out.push_str(&change_table(&report.top_gainers, "No gainers."));
        out.push_str("\n\nTop losers\n");
        out.push_str(&change_table(&report.top_losers, "No losers."));
        out
    }
}

fn type_change_table(rows: &[RankedChange]) -> String {
    if rows.is_empty() {
        return "No asset type changes.".to_string();
    }
    table(rows.iter().map(|r| TypeChangeRow {
        label: r.label.clone(),
        prev: usd(r.prev_usd_value),
        curr: usd(r.curr_usd_value),
        diff: signed_usd(r.diff_usd_value),
        ratio: plain_ratio(r.percent),
    }))
}

fn change_table(rows: &[RankedChange], empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    table(rows.iter().map(|r| ChangeRow {
        label: r.label.clone(),
        prev: usd(r.prev_usd_value),
        curr: usd(r.curr_usd_value),
        diff: signed_usd(r.diff_usd_value),
        percent: pct(r.percent),
    }))
}

fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).with(Style::markdown()).to_string()
}

/// `$12,345.67`, `-$1.00`.
pub fn usd(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    let sign = if value < 0.0 && format!("{:.2}", value.abs()) != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&format!("{:.2}", value.abs())))
}

/// Like [`usd`] but always signed: `+$5.00`.
pub fn signed_usd(value: f64) -> String {
    let formatted = usd(value);
    if value.is_finite() && value > 0.0 && formatted != "$0.00" {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// `60.00%`, or `n/a` for an undefined percentage.
pub fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}%"),
        _ => UNDEFINED.to_string(),
    }
}

/// `0.85`, or `n/a` for an undefined ratio.
pub fn plain_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => UNDEFINED.to_string(),
    }
}

/// Token amounts: up to six decimals, trailing zeros dropped.
pub fn amount(value: f64) -> String {
    let s = format!("{value:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed, ""));
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    }
}
