pub use balances::{BalanceSheet, MemberBalances, balances_for_group};
pub use currency::Currency;
pub use error::LedgerError;
pub use expenses::{ExactShare, Expense, ExpenseId, GroupId, PercentShare, SplitSpec, WeightShare};
pub use members::{Member, MemberId};
pub use money::Money;
pub use percent::Percent;
pub use settlement::{Debt, simplify_debts};
pub use splits::resolve_splits;
pub use summary::{CurrencySettlement, GroupSummary, summarize_group};

mod balances;
mod currency;
mod error;
mod expenses;
mod members;
mod money;
mod percent;
mod settlement;
mod splits;
mod summary;
mod util;

type ResultLedger<T> = Result<T, LedgerError>;
