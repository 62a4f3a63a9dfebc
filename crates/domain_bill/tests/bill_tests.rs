//! Tests for domain_bill

use core_kernel::{Currency, Money, EPSILON};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_bill::{
    allocate_costs, Bill, BillError, BillValidator, Involvement, InvalidItemReason, Item,
    ParticipantName, Roster, Weight,
};

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn name(s: &str) -> ParticipantName {
    ParticipantName::new(s).unwrap()
}

// ============================================================================
// Roster Tests
// ============================================================================

mod roster_tests {
    use super::*;

    #[test]
    fn test_add_participant_trims_name() {
        let mut bill = Bill::new(Currency::USD);
        let added = bill.add_participant("  Maya  ").unwrap();

        assert_eq!(added.as_str(), "Maya");
        assert!(bill.roster().contains("Maya"));
    }

    #[test]
    fn test_add_duplicate_participant() {
        let mut bill = Bill::new(Currency::USD);
        bill.add_participant("Maya").unwrap();

        let result = bill.add_participant("Maya");
        assert!(matches!(result, Err(BillError::DuplicateParticipant(_))));
        assert_eq!(bill.roster().len(), 1);
    }

    #[test]
    fn test_add_blank_participant() {
        let mut bill = Bill::new(Currency::USD);
        assert!(matches!(
            bill.add_participant(""),
            Err(BillError::InvalidParticipantName(_))
        ));
    }

    #[test]
    fn test_remove_missing_participant() {
        let mut bill = Bill::new(Currency::USD);
        assert!(matches!(
            bill.remove_participant("Nobody"),
            Err(BillError::ParticipantNotFound(_))
        ));
    }
}

// ============================================================================
// Item Tests
// ============================================================================

mod item_tests {
    use super::*;

    #[test]
    fn test_item_name_is_trimmed() {
        let item = Item::new(" Pizza ", usd(dec!(12)), vec![Involvement::new(name("A"))]).unwrap();
        assert_eq!(item.name, "Pizza");
    }

    #[test]
    fn test_blank_item_name_rejected() {
        let result = Item::new("  ", usd(dec!(12)), vec![Involvement::new(name("A"))]);
        assert!(matches!(
            result,
            Err(BillError::InvalidItem { reason: InvalidItemReason::BlankName, .. })
        ));
    }

    #[test]
    fn test_total_weight() {
        let item = Item::new(
            "Wine",
            usd(dec!(40)),
            vec![
                Involvement::new(name("A")),
                Involvement::weighted(name("B"), Weight::new(dec!(2.5)).unwrap()),
            ],
        )
        .unwrap();

        assert_eq!(item.total_weight().unwrap(), dec!(3.5));
    }

    #[test]
    fn test_remove_item() {
        let mut bill = Bill::new(Currency::USD);
        bill.add_participant("A").unwrap();
        let item = Item::equal_split("Tea", usd(dec!(3)), bill.roster().iter()).unwrap();
        let id = bill.add_item(item).unwrap();

        let removed = bill.remove_item(&id).unwrap();

        assert_eq!(removed.name, "Tea");
        assert!(bill.items().is_empty());
        assert!(bill.total().is_zero());
    }

    #[test]
    fn test_item_json_shape() {
        let json = r#"{
            "id": "01890a5d-ac96-774b-bcce-b302099a8057",
            "name": "Nachos",
            "price": { "amount": "18.00", "currency": "USD" },
            "involved": [
                { "participant": "A" },
                { "participant": "B", "weight": "2" }
            ]
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.involved.len(), 2);
        assert_eq!(item.involved[0].weight, Weight::default());
        assert_eq!(item.total_weight().unwrap(), dec!(3));
    }
}

// ============================================================================
// Allocation Tests
// ============================================================================

mod allocation_tests {
    use super::*;

    #[test]
    fn test_multiple_items_accumulate() {
        let roster = Roster::from_names(["A", "B", "C"]).unwrap();
        let items = vec![
            Item::equal_split("Mains", usd(dec!(90.00)), roster.iter()).unwrap(),
            Item::equal_split("Dessert", usd(dec!(20.00)), &[name("A"), name("B")]).unwrap(),
        ];

        let allocation = allocate_costs(roster.as_slice(), &items, Currency::USD);

        assert_eq!(allocation.total.amount(), dec!(110.00));
        assert_eq!(allocation.shares.owed("A").amount(), dec!(40.00));
        assert_eq!(allocation.shares.owed("B").amount(), dec!(40.00));
        assert_eq!(allocation.shares.owed("C").amount(), dec!(30.00));
    }

    #[test]
    fn test_thirds_conserve_within_tolerance() {
        let roster = Roster::from_names(["A", "B", "C"]).unwrap();
        let items: Vec<Item> = (0..25)
            .map(|_| Item::equal_split("Round", usd(dec!(10.00)), roster.iter()).unwrap())
            .collect();

        let allocation = allocate_costs(roster.as_slice(), &items, Currency::USD);

        let diff = (allocation.shares.total().unwrap().amount() - allocation.total.amount()).abs();
        assert!(diff <= EPSILON);
        assert_eq!(allocation.shares.owed("A").amount(), dec!(83.3333));
    }

    #[test]
    fn test_other_currency_item_is_skipped() {
        let roster = Roster::from_names(["A"]).unwrap();
        let items = vec![
            Item::equal_split("Local", usd(dec!(10)), roster.iter()).unwrap(),
            Item::equal_split("Abroad", Money::new(dec!(10), Currency::EUR), roster.iter()).unwrap(),
        ];

        let allocation = allocate_costs(roster.as_slice(), &items, Currency::USD);

        assert_eq!(allocation.total.amount(), dec!(10));
        assert_eq!(allocation.skipped_items.len(), 1);
        assert_eq!(allocation.skipped_items[0].item_name, "Abroad");
    }

    #[test]
    fn test_removed_participant_does_not_crash_allocation() {
        let mut bill = Bill::new(Currency::USD);
        for n in ["A", "B", "C"] {
            bill.add_participant(n).unwrap();
        }
        let item = Item::equal_split("Pizza", usd(dec!(30)), bill.roster().iter()).unwrap();
        bill.add_item(item).unwrap();

        bill.remove_participant("C").unwrap();
        let allocation = bill.allocate();

        assert_eq!(allocation.shares.owed("A").amount(), dec!(15));
        assert_eq!(allocation.shares.owed("B").amount(), dec!(15));
        assert!(!allocation.shares.contains("C"));
    }

    #[test]
    fn test_sole_participant_removed_leaves_item_skipped() {
        let mut bill = Bill::new(Currency::USD);
        bill.add_participant("A").unwrap();
        bill.add_participant("B").unwrap();
        let item = Item::new("Solo", usd(dec!(8)), vec![Involvement::new(name("A"))]).unwrap();
        bill.add_item(item).unwrap();

        bill.remove_participant("A").unwrap();
        let allocation = bill.allocate();

        assert!(allocation.total.is_zero());
        assert_eq!(allocation.skipped_items.len(), 1);
        assert_eq!(bill.items().len(), 1);
    }

    #[test]
    fn test_validator_flags_what_allocator_skips() {
        let mut bill = Bill::new(Currency::USD);
        bill.add_participant("A").unwrap();
        let item = Item::new("Solo", usd(dec!(8)), vec![Involvement::new(name("A"))]).unwrap();
        bill.add_item(item).unwrap();
        bill.remove_participant("A").unwrap();

        let report = BillValidator::validate(&bill);

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }
}
