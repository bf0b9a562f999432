use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod debts {
    use super::*;

    /// Money on the wire: a minor-unit integer paired with its currency
    /// code. Never a float, never a pre-formatted string.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MoneyView {
        pub amount_minor: i64,
        /// ISO-like currency code, e.g. `"EUR"`.
        pub currency: String,
    }

    impl From<engine::Money> for MoneyView {
        fn from(money: engine::Money) -> Self {
            Self {
                amount_minor: money.minor(),
                currency: money.currency().code().to_string(),
            }
        }
    }

    /// A suggested settle-up payment.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DebtView {
        pub from_member: Uuid,
        pub to_member: Uuid,
        pub amount: MoneyView,
    }

    impl From<&engine::Debt> for DebtView {
        fn from(debt: &engine::Debt) -> Self {
            Self {
                from_member: debt.from.0,
                to_member: debt.to.0,
                amount: debt.amount.into(),
            }
        }
    }

    /// A member's net balance within one currency.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MemberBalanceView {
        pub member: Uuid,
        /// Positive = the group owes the member; negative = the member owes.
        pub balance: MoneyView,
    }

    /// Balances and suggested transactions for one currency.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CurrencySection {
        pub currency: String,
        pub balances: Vec<MemberBalanceView>,
        pub transactions: Vec<DebtView>,
    }

    /// Response body for the group debt summary.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GroupDebtSummary {
        pub group_id: Uuid,
        pub currencies: Vec<CurrencySection>,
    }

    impl From<&engine::GroupSummary> for GroupDebtSummary {
        fn from(summary: &engine::GroupSummary) -> Self {
            let currencies = summary
                .currencies
                .iter()
                .map(|(currency, settlement)| CurrencySection {
                    currency: currency.code().to_string(),
                    balances: settlement
                        .balances
                        .iter()
                        .map(|(member, balance)| MemberBalanceView {
                            member: member.0,
                            balance: (*balance).into(),
                        })
                        .collect(),
                    transactions: settlement.suggested.iter().map(DebtView::from).collect(),
                })
                .collect();
            Self {
                group_id: summary.group_id.0,
                currencies,
            }
        }
    }
}
