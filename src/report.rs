//! Plain-text rendering of a [`MonthReport`] for terminals.

use std::fmt::Write as _;

use colored::Colorize;
use hearth_core::{CategoryBudget, CurrencyBudget, SourceSummary};
use hearth_domain::CurrencyCode;

use crate::{
    currency::{format_amount, NumberStyle},
    engine::MonthReport,
};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub color: bool,
    pub number_style: NumberStyle,
}

#[derive(Clone, Copy)]
enum Tone {
    Heading,
    Good,
    Warn,
    Bad,
    Dim,
}

struct Painter<'a> {
    options: &'a RenderOptions,
}

impl Painter<'_> {
    fn paint(&self, tone: Tone, text: impl Into<String>) -> String {
        let text = text.into();
        if !self.options.color {
            return text;
        }
        match tone {
            Tone::Heading => text.bold().to_string(),
            Tone::Good => text.green().to_string(),
            Tone::Warn => text.yellow().to_string(),
            Tone::Bad => text.red().bold().to_string(),
            Tone::Dim => text.dimmed().to_string(),
        }
    }

    fn money(&self, amount: f64, code: &CurrencyCode) -> String {
        format_amount(amount, code, &self.options.number_style)
    }
}

pub fn render_text(report: &MonthReport, options: &RenderOptions) -> String {
    let painter = Painter { options };
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        painter.paint(
            Tone::Heading,
            format!("Budget for {} ({})", report.period, report.currency)
        )
    );
    for (code, totals) in &report.totals {
        let _ = writeln!(
            out,
            "  {}: income {}, allocated {}, spent {}, remaining {}",
            code,
            painter.money(totals.income, code),
            painter.money(totals.allocated, code),
            painter.money(totals.spent, code),
            painter.money(totals.remaining, code),
        );
    }

    out.push('\n');
    let _ = writeln!(out, "{}", painter.paint(Tone::Heading, "Categories"));
    if report.categories.is_empty() {
        let _ = writeln!(out, "  {}", painter.paint(Tone::Dim, "(none)"));
    }
    for budget in &report.categories {
        render_category(&mut out, &painter, budget);
    }

    out.push('\n');
    let _ = writeln!(out, "{}", painter.paint(Tone::Heading, "Income sources"));
    if report.sources.is_empty() {
        let _ = writeln!(out, "  {}", painter.paint(Tone::Dim, "(none)"));
    }
    for summary in &report.sources {
        render_source(&mut out, &painter, summary);
    }

    let validation = &report.validation;
    if !validation.errors.is_empty() || !validation.warnings.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", painter.paint(Tone::Heading, "Allocation check"));
        for error in &validation.errors {
            let _ = writeln!(out, "  {} {}", painter.paint(Tone::Bad, "error:"), error);
        }
        for warning in &validation.warnings {
            let _ = writeln!(out, "  {} {}", painter.paint(Tone::Warn, "warning:"), warning);
        }
    }

    let diagnostics = &report.diagnostics;
    if diagnostics.has_issues() || diagnostics.balance_corrections > 0 {
        out.push('\n');
        let _ = writeln!(out, "{}", painter.paint(Tone::Heading, "Diagnostics"));
        if !diagnostics.orphaned_allocations.is_empty() {
            let _ = writeln!(
                out,
                "  {} allocation(s) reference a deleted income source",
                diagnostics.orphaned_allocations.len()
            );
        }
        if !diagnostics.orphaned_incomes.is_empty() {
            let _ = writeln!(
                out,
                "  {} income(s) reference a deleted income source",
                diagnostics.orphaned_incomes.len()
            );
        }
        if !diagnostics.orphaned_expenses.is_empty() {
            let _ = writeln!(
                out,
                "  {} expense(s) reference a deleted category",
                diagnostics.orphaned_expenses.len()
            );
        }
        if diagnostics.balance_corrections > 0 {
            let _ = writeln!(
                out,
                "  {} balance correction(s) excluded from categories",
                diagnostics.balance_corrections
            );
        }
    }

    out
}

fn render_category(out: &mut String, painter: &Painter<'_>, budget: &CategoryBudget) {
    let mut flags = Vec::new();
    if budget.is_over_budget() {
        flags.push(painter.paint(Tone::Bad, "OVER"));
    }
    if budget.has_debt() {
        flags.push(painter.paint(Tone::Warn, "DEBT"));
    }
    if budget.is_orphaned() {
        flags.push(painter.paint(Tone::Warn, "ORPHANED"));
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    let _ = writeln!(out, "  {}{}", budget.name, flags);

    for (code, bucket) in &budget.currencies {
        let _ = writeln!(out, "    {}", currency_line(painter, code, bucket));
    }
}

fn currency_line(painter: &Painter<'_>, code: &CurrencyCode, bucket: &CurrencyBudget) -> String {
    let remaining_tone = if bucket.remaining < 0.0 {
        Tone::Bad
    } else {
        Tone::Good
    };
    let mut line = format!(
        "{} allocated {}, spent {}, remaining {}",
        code,
        painter.money(bucket.allocated, code),
        painter.money(bucket.spent, code),
        painter.paint(remaining_tone, painter.money(bucket.remaining, code)),
    );
    if bucket.carry_over > 0.0 {
        let _ = write!(line, ", carried in {}", painter.money(bucket.carry_over, code));
    }
    if bucket.debt > 0.0 {
        let _ = write!(line, ", debt {}", painter.money(bucket.debt, code));
    }
    if bucket.is_over_budget() {
        let _ = write!(line, ", over by {}", painter.money(bucket.overage(), code));
    }
    line
}

fn render_source(out: &mut String, painter: &Painter<'_>, summary: &SourceSummary) {
    let _ = writeln!(out, "  {}", summary.name);
    if summary.currencies.is_empty() {
        let _ = writeln!(out, "    {}", painter.paint(Tone::Dim, "no activity"));
        return;
    }
    for (code, bucket) in &summary.currencies {
        let balance = if bucket.debt > 0.0 {
            painter.paint(
                Tone::Bad,
                format!("overcommitted by {}", painter.money(bucket.debt, code)),
            )
        } else {
            format!("unallocated {}", painter.money(bucket.remaining, code))
        };
        let _ = writeln!(
            out,
            "    {} received {}, allocated {}, spent {}, {}",
            code,
            painter.money(bucket.total_income, code),
            painter.money(bucket.allocated, code),
            painter.money(bucket.total_spent, code),
            balance,
        );
    }
}
