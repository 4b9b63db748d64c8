use chrono::NaiveDate;
use std::fmt::{self, Write};
use tax_engine::format::{format_inr, format_inr_compact, format_inr_signed};
use tax_engine::{EnrichedHolding, HarvestPlan, PortfolioSummary, TaxScenario};

/// Plain-text report: holdings table, liability and the harvest plan.
pub fn render(
    holdings: &[EnrichedHolding],
    plan: &HarvestPlan,
    as_of: NaiveDate,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, holdings, plan, as_of)?;
    Ok(out)
}

fn write_report(
    out: &mut String,
    holdings: &[EnrichedHolding],
    plan: &HarvestPlan,
    as_of: NaiveDate,
) -> fmt::Result {
    let summary = PortfolioSummary::from_holdings(holdings);

    writeln!(out, "Portfolio as of {}", as_of.format("%d %b %Y"))?;
    writeln!(
        out,
        "  {} holdings | invested {} | current {} | P&L {} ({:.2}%)",
        summary.number_of_holdings,
        format_inr_compact(summary.total_invested),
        format_inr_compact(summary.total_current),
        format_inr_signed(summary.total_gain_loss),
        summary.total_gain_loss_percentage
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<12} {:>6} {:>16} {:>9} {:>7} {:>5} {:>10}",
        "Ticker", "Qty", "Gain/Loss", "%", "Days", "Type", "To LTCG"
    )?;
    for h in holdings {
        let to_long_term = h
            .days_until_long_term
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<12} {:>6} {:>16} {:>8.2}% {:>7} {:>5} {:>10}",
            h.holding.ticker,
            h.holding.quantity,
            format_inr_signed(h.gain_loss),
            h.gain_loss_percentage,
            h.holding_period_days,
            h.tax_category.to_string(),
            to_long_term
        )?;
    }
    writeln!(out)?;

    let current = &plan.before.liability;
    writeln!(out, "Capital gains")?;
    writeln!(
        out,
        "  STCG: gains {} | losses {} | net {}",
        format_inr(current.short_term_gains),
        format_inr(current.short_term_losses),
        format_inr(current.net_short_term)
    )?;
    writeln!(
        out,
        "  LTCG: gains {} | losses {} | net {} | taxable {}",
        format_inr(current.long_term_gains),
        format_inr(current.long_term_losses),
        format_inr(current.net_long_term),
        format_inr(current.taxable_long_term)
    )?;
    writeln!(out)?;

    if plan.recommendations.is_empty() {
        writeln!(out, "No holdings at a loss; nothing to harvest.")?;
    } else {
        writeln!(out, "Harvesting recommendations")?;
        for (rank, rec) in plan.recommendations.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} ({}) - loss {}, saves {}",
                rank + 1,
                rec.holding.holding.name,
                rec.holding.tax_category,
                format_inr(rec.loss_amount),
                format_inr(rec.tax_saving)
            )?;
            writeln!(out, "     {}. {}.", rec.action, rec.rebuy_suggestion)?;
        }
    }
    writeln!(out)?;

    write_scenario(out, &plan.before)?;
    write_scenario(out, &plan.after)?;
    writeln!(
        out,
        "Loss harvested {} | tax saved {}",
        format_inr(plan.total_loss_harvested),
        format_inr(plan.total_tax_saving)
    )?;

    Ok(())
}

fn write_scenario(out: &mut String, scenario: &TaxScenario) -> fmt::Result {
    writeln!(
        out,
        "{:<24} STCG {} + LTCG {} = {}",
        scenario.label,
        format_inr(scenario.short_term_tax),
        format_inr(scenario.long_term_tax),
        format_inr(scenario.total_tax)
    )
}
