//! Financial statement categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five statement categories requested per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Statement of profit or loss (income statement).
    ProfitOrLoss,
    /// Statement of comprehensive income.
    ComprehensiveIncome,
    /// Statement of financial position (balance sheet).
    FinancialPosition,
    /// Statement of changes in equity.
    ChangesInEquity,
    /// Statement of cash flows.
    CashFlows,
}

impl StatementKind {
    /// All statement kinds in extraction order.
    pub const ALL: [StatementKind; 5] = [
        StatementKind::ProfitOrLoss,
        StatementKind::ComprehensiveIncome,
        StatementKind::FinancialPosition,
        StatementKind::ChangesInEquity,
        StatementKind::CashFlows,
    ];

    /// Display name, also used as the key of the statement's frame.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProfitOrLoss => "Profit or Loss",
            Self::ComprehensiveIncome => "Comprehensive Income",
            Self::FinancialPosition => "Financial Position",
            Self::ChangesInEquity => "Changes in Equity",
            Self::CashFlows => "Cash Flows",
        }
    }

    /// Headings under which the statement is usually published.
    pub fn titles(&self) -> &'static [&'static str] {
        match self {
            Self::ProfitOrLoss => &[
                "STATEMENT OF PROFIT OR LOSS",
                "STATEMENT OF PROFIT OR LOSS AND OTHER COMPREHENSIVE INCOME",
                "INCOME STATEMENT",
                "STATEMENT OF INCOME",
            ],
            Self::ComprehensiveIncome => &[
                "STATEMENT OF COMPREHENSIVE INCOME",
                "STATEMENT OF PROFIT OR LOSS AND OTHER COMPREHENSIVE INCOME",
                "STATEMENT OF OTHER COMPREHENSIVE INCOME",
            ],
            Self::FinancialPosition => &[
                "STATEMENT OF FINANCIAL POSITION",
                "BALANCE SHEET",
                "STATEMENT OF ASSETS AND LIABILITIES",
            ],
            Self::ChangesInEquity => &[
                "STATEMENT OF CHANGES IN EQUITY",
                "STATEMENT OF CHANGES IN SHAREHOLDERS' EQUITY",
                "STATEMENT OF SHAREHOLDERS' EQUITY",
                "STATEMENT OF STOCKHOLDERS' EQUITY",
                "STATEMENT OF OWNERS' EQUITY",
                "STATEMENT OF CHANGES IN OWNERS' EQUITY",
            ],
            Self::CashFlows => &[
                "STATEMENT OF CASH FLOWS",
                "CASH FLOW STATEMENT",
                "CONSOLIDATED CASH FLOW STATEMENT",
                "STATEMENT OF CASH FLOW",
            ],
        }
    }

    /// Look up a statement kind by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
