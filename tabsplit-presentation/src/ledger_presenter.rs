use crate::{
    settlement_presenter::{format_money, person_label},
    text_table::{Alignment, TextTableBuilder},
};
use std::borrow::Cow;
use tabsplit_application::PersonDirectory;
use tabsplit_domain::{MoneyContext, Person, Purchase};

const NO_PERSONS: &str = "No persons yet.";
const NO_PURCHASES: &str = "No purchases yet.";

pub struct LedgerPresenter;

impl LedgerPresenter {
    pub fn render_persons(persons: &[Person]) -> String {
        if persons.is_empty() {
            return format!("{NO_PERSONS}\n");
        }

        let headers = [Cow::Borrowed("ID"), Cow::Borrowed("Name")];
        TextTableBuilder::new()
            .alignments(&[Alignment::Right, Alignment::Left])
            .headers(&headers)
            .rows(persons.iter().map(|person| {
                [
                    Cow::Owned(person.id.0.to_string()),
                    Cow::Borrowed(person.name.as_str()),
                ]
            }))
            .build()
    }

    /// Participants are listed after the buyer, who always takes a share.
    pub fn render_purchases(
        purchases: &[Purchase],
        directory: &dyn PersonDirectory,
        money: MoneyContext,
    ) -> String {
        if purchases.is_empty() {
            return format!("{NO_PURCHASES}\n");
        }

        let headers = [
            Cow::Borrowed("ID"),
            Cow::Borrowed("Item"),
            Cow::Borrowed("Price"),
            Cow::Borrowed("Buyer"),
            Cow::Borrowed("Participants"),
        ];
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Right,
                Alignment::Left,
                Alignment::Right,
                Alignment::Left,
                Alignment::Left,
            ])
            .headers(&headers)
            .rows(purchases.iter().map(|purchase| {
                let participants = purchase
                    .participants()
                    .map(|person| person_label(person, directory))
                    .collect::<Vec<_>>()
                    .join(", ");
                [
                    Cow::Owned(purchase.id().0.to_string()),
                    Cow::Borrowed(purchase.item()),
                    Cow::Owned(format_money(purchase.price(), money)),
                    person_label(purchase.buyer(), directory),
                    Cow::Owned(participants),
                ]
            }))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;
    use tabsplit_domain::{Money, PersonId, PurchaseId};

    #[test]
    fn persons_table_lists_ids_and_names() {
        let persons = [
            Person::new(PersonId(1), "Ana"),
            Person::new(PersonId(12), "Bruno"),
        ];

        assert_eq!(
            LedgerPresenter::render_persons(&persons),
            "ID  Name\n\
             --  -----\n\
             \x201  Ana\n\
             12  Bruno\n"
        );
    }

    #[test]
    fn purchases_table_resolves_names() {
        let directory = HashMap::from([
            (PersonId(1), "Ana".to_string()),
            (PersonId(2), "Bruno".to_string()),
        ]);
        let purchases = [Purchase::try_new(
            PurchaseId(4),
            "pizza",
            Money::new(4550, 2),
            PersonId(1),
            [PersonId(2), PersonId(9)],
        )
        .expect("valid purchase")];

        let table =
            LedgerPresenter::render_purchases(&purchases, &directory, MoneyContext::cents());

        let row = table.lines().nth(2).expect("one row");
        assert_eq!(row, " 4  pizza  45.50  Ana (#1)  Bruno (#2), #9");
    }

    #[rstest]
    #[case::persons(LedgerPresenter::render_persons(&[]), "No persons yet.\n")]
    #[case::purchases(
        LedgerPresenter::render_purchases(&[], &HashMap::<PersonId, String>::new(), MoneyContext::cents()),
        "No purchases yet.\n"
    )]
    fn empty_ledger_prints_a_notice(#[case] rendered: String, #[case] expected: &str) {
        assert_eq!(rendered, expected);
    }
}
