//! Built-in SOP metric table.

use rust_decimal::Decimal;

use crate::models::metric::{Derivation, DerivedMetric, MetricDefinition};
use crate::models::sop::ResolvedMetrics;
use crate::models::statement::StatementKind;

const PROFIT_OR_LOSS: &str = StatementKind::ProfitOrLoss.name();
const FINANCIAL_POSITION: &str = StatementKind::FinancialPosition.name();
const CHANGES_IN_EQUITY: &str = StatementKind::ChangesInEquity.name();
const CASH_FLOWS: &str = StatementKind::CashFlows.name();

pub const OPERATING_CASH_FLOW: &str = "OCF Qtrly";
pub const CAPITAL_EXPENDITURE: &str = "Capital Exp Qtrly";
pub const FREE_CASH_FLOW: &str = "FCF Qtrly";

/// Summary order of every SOP metric, base and derived.
pub const SUMMARY_ORDER: [&str; 29] = [
    "Revenues",
    "Gross profit",
    "Operating Profits",
    "Interest Expense",
    "Interest Income",
    "Profit Before Tax",
    "Taxation",
    "Net Profit",
    "Fixed Assets",
    "Inventory",
    "Trade Receivables",
    "Cash",
    "Current Assets",
    "Total Assets",
    "Total Equity",
    "Trade Payables",
    "Current Liabilities",
    "Total Liabilities",
    "Total Debt",
    "Book Value",
    OPERATING_CASH_FLOW,
    "Depreciation Qtrly",
    "Amortization Qtrly",
    "ICF Qtrly",
    CAPITAL_EXPENDITURE,
    FREE_CASH_FLOW,
    "Net Borrowings Qrtly",
    "Share Price Quaterly",
    "Tot. No. of Shares",
];

/// (metric, statements, aliases, excludes)
type BaseRow = (&'static str, &'static [&'static str], &'static [&'static str], &'static [&'static str]);

const BASE_TABLE: &[BaseRow] = &[
    (
        "Revenues",
        &[PROFIT_OR_LOSS],
        &[
            "revenue",
            "revenues",
            "total revenue",
            "total revenues",
            "turnover",
            "total income",
            "gross revenue",
        ],
        &[],
    ),
    ("Gross profit", &[PROFIT_OR_LOSS], &["gross profit"], &[]),
    (
        "Operating Profits",
        &[PROFIT_OR_LOSS],
        &[
            "operating profit",
            "operating profits",
            "profit from operations",
            "operating income",
            "profit before finance income and costs",
        ],
        &[],
    ),
    (
        "Interest Expense",
        &[PROFIT_OR_LOSS],
        &[
            "interest expense",
            "interest expenses",
            "finance cost",
            "finance costs",
            "finance expense",
            "finance expenses",
            "interest and finance costs",
        ],
        &[],
    ),
    (
        "Interest Income",
        &[PROFIT_OR_LOSS],
        &["interest income", "finance income", "investment income"],
        &[],
    ),
    (
        "Profit Before Tax",
        &[PROFIT_OR_LOSS],
        &[
            "profit before tax",
            "profit before taxation",
            "profit before income tax",
            "earnings before tax",
            "profit before tax expense",
        ],
        &[],
    ),
    (
        "Taxation",
        &[PROFIT_OR_LOSS],
        &[
            "taxation",
            "income tax expense",
            "income tax",
            "tax expense",
            "corporation tax",
        ],
        &[],
    ),
    (
        "Net Profit",
        &[PROFIT_OR_LOSS],
        &[
            "net profit",
            "profit after tax",
            "profit for the period",
            "profit for the quarter",
            "profit for the year",
            "profit attributable to equity holders",
            "profit attributable to owners of the company",
            "profit attributable to owners of the parent",
        ],
        &[],
    ),
    (
        "Fixed Assets",
        &[FINANCIAL_POSITION],
        &[
            "fixed assets",
            "property plant and equipment",
            "property, plant and equipment",
            "property plant & equipment",
            "property, plant & equipment",
        ],
        &[],
    ),
    (
        "Inventory",
        &[FINANCIAL_POSITION],
        &["inventory", "inventories", "stock in trade"],
        &[],
    ),
    (
        "Trade Receivables",
        &[FINANCIAL_POSITION],
        &[
            "trade receivables",
            "trade and other receivables",
            "accounts receivable",
            "trade debtors",
        ],
        &[],
    ),
    (
        "Cash",
        &[FINANCIAL_POSITION, CASH_FLOWS],
        &[
            "cash and cash equivalents",
            "cash & cash equivalents",
            "cash at bank and in hand",
            "cash in hand and at bank",
            "cash balances",
        ],
        &[],
    ),
    (
        "Current Assets",
        &[FINANCIAL_POSITION],
        &["total current assets", "current assets"],
        &[],
    ),
    (
        "Total Assets",
        &[FINANCIAL_POSITION],
        &["total assets", "total assets employed"],
        &[],
    ),
    (
        "Total Equity",
        &[FINANCIAL_POSITION, CHANGES_IN_EQUITY],
        &[
            "total equity",
            "total shareholders equity",
            "total equity attributable to owners of the parent",
            "equity attributable to owners of the company",
            "equity attributable to equity holders of the parent",
        ],
        &[],
    ),
    (
        "Trade Payables",
        &[FINANCIAL_POSITION],
        &[
            "trade payables",
            "trade and other payables",
            "accounts payable",
            "trade creditors",
        ],
        &[],
    ),
    (
        "Current Liabilities",
        &[FINANCIAL_POSITION],
        &["total current liabilities", "current liabilities"],
        &[],
    ),
    (
        "Total Liabilities",
        &[FINANCIAL_POSITION],
        &["total liabilities"],
        &["equity"],
    ),
    (
        "Total Debt",
        &[FINANCIAL_POSITION, CASH_FLOWS],
        &[
            "total debt",
            "interest bearing borrowings",
            "interest-bearing borrowings",
            "total borrowings",
            "total interest bearing liabilities",
            "borrowings - total",
        ],
        &[],
    ),
    (
        "Book Value",
        &[FINANCIAL_POSITION, CHANGES_IN_EQUITY],
        &[
            "net asset value per share",
            "net assets per share",
            "book value per share",
            "net assets value per share",
        ],
        &[],
    ),
    (
        OPERATING_CASH_FLOW,
        &[CASH_FLOWS],
        &[
            "net cash generated from operating activities",
            "net cash from operating activities",
            "net cash provided by operating activities",
            "cash flows from operating activities",
            "net cash flow from operating activities",
        ],
        &[],
    ),
    (
        "Depreciation Qtrly",
        &[PROFIT_OR_LOSS, CASH_FLOWS],
        &[
            "depreciation",
            "depreciation of property plant and equipment",
            "depreciation expense",
        ],
        &[],
    ),
    (
        "Amortization Qtrly",
        &[PROFIT_OR_LOSS, CASH_FLOWS],
        &[
            "amortisation",
            "amortisation expenses",
            "amortization",
            "amortization expense",
        ],
        &[],
    ),
    (
        "ICF Qtrly",
        &[CASH_FLOWS],
        &[
            "net cash used in investing activities",
            "net cash from investing activities",
            "cash flows from investing activities",
            "net cash flow from investing activities",
        ],
        &[],
    ),
    (
        CAPITAL_EXPENDITURE,
        &[CASH_FLOWS],
        &[
            "purchase of property plant and equipment",
            "purchase of property, plant and equipment",
            "acquisition of property plant and equipment",
            "capital expenditure",
            "additions to property plant and equipment",
        ],
        &[],
    ),
    (
        "Net Borrowings Qrtly",
        &[CASH_FLOWS],
        &[
            "net borrowings",
            "net increase in borrowings",
            "net (repayment)/drawdown of borrowings",
            "net repayment of borrowings",
            "net increase/(decrease) in borrowings",
            "net increase/decrease in borrowings",
        ],
        &[],
    ),
    (
        "Share Price Quaterly",
        &[CHANGES_IN_EQUITY, FINANCIAL_POSITION],
        &["share price", "market price per share", "market value per share"],
        &[],
    ),
    (
        "Tot. No. of Shares",
        &[CHANGES_IN_EQUITY, FINANCIAL_POSITION],
        &[
            "number of shares in issue",
            "total number of shares",
            "stated capital number of shares",
            "total shares in issue",
            "number of ordinary shares",
        ],
        &[],
    ),
];

/// Base metric definitions matched directly against statement rows.
pub fn base_definitions() -> Vec<MetricDefinition> {
    BASE_TABLE
        .iter()
        .map(|(metric, statements, aliases, excludes)| {
            MetricDefinition::new(*metric, statements, aliases).with_excludes(excludes)
        })
        .collect()
}

/// Derived metrics computed from base results.
pub fn derived_definitions() -> Vec<DerivedMetric> {
    vec![DerivedMetric::new(FREE_CASH_FLOW, free_cash_flow)]
}

/// Operating cash flow less capital expenditure.
///
/// Capex already stored as an outflow (negative) is added, a positive capex
/// is subtracted, so both sign conventions give the same result.
pub fn free_cash_flow(resolved: &ResolvedMetrics) -> Option<Derivation> {
    let ocf = resolved.get(OPERATING_CASH_FLOW)?;
    let capex = resolved.get(CAPITAL_EXPENDITURE)?;
    let ocf_value = ocf.numeric_value?;
    let capex_value = capex.numeric_value?;

    let value = if capex_value < Decimal::ZERO {
        ocf_value + capex_value
    } else {
        ocf_value - capex_value
    };

    let column = if ocf.column.is_empty() {
        capex.column.clone()
    } else {
        ocf.column.clone()
    };

    Some(Derivation {
        value,
        statement: format!("Derived ({})", CASH_FLOWS),
        column,
        source_line: format!("{} minus {}", OPERATING_CASH_FLOW, CAPITAL_EXPENDITURE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_summary_covers_every_metric_once() {
        let base = base_definitions();
        let derived = derived_definitions();
        assert_eq!(base.len() + derived.len(), SUMMARY_ORDER.len());

        let names: HashSet<&str> = base
            .iter()
            .map(|d| d.metric.as_str())
            .chain(derived.iter().map(|d| d.metric.as_str()))
            .collect();
        assert_eq!(names.len(), SUMMARY_ORDER.len());
        assert!(SUMMARY_ORDER.iter().all(|m| names.contains(m)));
    }

    #[test]
    fn test_statements_are_canonical() {
        for definition in base_definitions() {
            assert!(!definition.aliases.is_empty(), "{}", definition.metric);
            for statement in &definition.statements {
                assert!(StatementKind::from_name(statement).is_some(), "{}", statement);
            }
        }
    }

    #[test]
    fn test_total_liabilities_excludes_equity() {
        let definition = base_definitions()
            .into_iter()
            .find(|d| d.metric == "Total Liabilities")
            .unwrap();
        assert_eq!(definition.excludes, vec!["equity"]);
    }
}
