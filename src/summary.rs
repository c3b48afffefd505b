//! Aggregate financial figures derived from a client's transaction list.
//! Pure functions with no caching: transaction lists are append-only, so
//! the summary is recomputed on every call.

use serde::Serialize;

use crate::storage::{Transaction, TransactionKind};

/// Flat income-tax rate applied to total income.
pub const INCOME_TAX_RATE: f64 = 0.20;

/// Expense category singled out in the summary breakdown.
pub const SALARY_CATEGORY: &str = "salary";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub income_tax: f64,
    pub salary_expenses: f64,
    pub other_expenses: f64,
}

pub fn summarize(transactions: &[Transaction]) -> Summary {
    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .map(|t| t.amount)
        .sum();
    let total_expenses: f64 = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .map(|t| t.amount)
        .sum();
    let salary_expenses: f64 = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && t.category == SALARY_CATEGORY)
        .map(|t| t.amount)
        .sum();
    Summary {
        total_income,
        total_expenses,
        income_tax: total_income * INCOME_TAX_RATE,
        salary_expenses,
        other_expenses: total_expenses - salary_expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(id: u64, kind: TransactionKind, amount: f64, category: &str) -> Transaction {
        Transaction {
            id,
            kind,
            amount,
            category: category.to_string(),
            date: Utc::now().date_naive(),
        }
    }

    #[test]
    fn summary_arithmetic() {
        let txs = vec![
            tx(1, TransactionKind::Income, 1000.0, "sales"),
            tx(2, TransactionKind::Expense, 300.0, "salary"),
            tx(3, TransactionKind::Expense, 200.0, "office"),
        ];
        let s = summarize(&txs);
        assert_eq!(s.total_income, 1000.0);
        assert_eq!(s.total_expenses, 500.0);
        assert_eq!(s.salary_expenses, 300.0);
        assert_eq!(s.other_expenses, 200.0);
        assert_eq!(s.income_tax, 200.0);
    }

    #[test]
    fn empty_transaction_list_is_all_zero() {
        let s = summarize(&[]);
        assert_eq!(s.total_income, 0.0);
        assert_eq!(s.total_expenses, 0.0);
        assert_eq!(s.income_tax, 0.0);
        assert_eq!(s.salary_expenses, 0.0);
        assert_eq!(s.other_expenses, 0.0);
    }
}
