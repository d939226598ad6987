use crate::text_table::{Alignment, TextTableBuilder};
use std::borrow::Cow;
use tabsplit_application::{PersonBalance, PersonDirectory, SplitResult};
use tabsplit_domain::{Money, MoneyContext, Payment, PersonId};

const PERSON: &str = "Person";
const BALANCE: &str = "Balance";
const FROM: &str = "From";
const TO: &str = "To";
const AMOUNT: &str = "Amount";
const SETTLED: &str = "Everyone is settled up.";

pub struct SettlementPresenter;

impl SettlementPresenter {
    /// Balance table, a blank line, then either the payment table or a settled-up notice.
    pub fn render(
        result: &SplitResult,
        directory: &dyn PersonDirectory,
        money: MoneyContext,
    ) -> String {
        let mut output = Self::build_balance_table(&result.balances, directory, money);
        output.push('\n');
        if result.payments.is_empty() {
            output.push_str(SETTLED);
            output.push('\n');
        } else {
            output.push_str(&Self::build_payment_table(
                &result.payments,
                directory,
                money,
            ));
        }
        output
    }

    pub fn build_balance_table(
        balances: &[PersonBalance],
        directory: &dyn PersonDirectory,
        money: MoneyContext,
    ) -> String {
        let headers = [Cow::Borrowed(PERSON), Cow::Borrowed(BALANCE)];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(balances.iter().map(|person| {
                let sign = if person.balance.is_negative() { "" } else { "+" };
                [
                    person_label(person.id, directory),
                    Cow::Owned(format!("{sign}{}", format_money(person.balance, money))),
                ]
            }))
            .build()
    }

    pub fn build_payment_table(
        payments: &[Payment],
        directory: &dyn PersonDirectory,
        money: MoneyContext,
    ) -> String {
        let headers = [
            Cow::Borrowed(FROM),
            Cow::Borrowed(TO),
            Cow::Borrowed(AMOUNT),
        ];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(payments.iter().map(|payment| {
                [
                    person_label(payment.debtor, directory),
                    person_label(payment.creditor, directory),
                    Cow::Owned(format_money(payment.value, money)),
                ]
            }))
            .build()
    }
}

pub(crate) fn person_label(
    person: PersonId,
    directory: &dyn PersonDirectory,
) -> Cow<'static, str> {
    match directory.display_name(person) {
        Some(name) => Cow::Owned(format!("{name} ({person})")),
        None => Cow::Owned(person.to_string()),
    }
}

pub(crate) fn format_money(amount: Money, money: MoneyContext) -> String {
    format!("{:.*}", money.scale() as usize, amount.as_decimal())
}
