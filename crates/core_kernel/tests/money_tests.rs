//! Unit tests for the Money module
//!
//! Tests cover money creation, tolerance checks, arithmetic, weighted
//! allocation and display formatting.

use core_kernel::{Money, Currency, MoneyError, EPSILON};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(33.333333333), Currency::USD);
        assert_eq!(m.amount(), dec!(33.3333));
    }

    #[test]
    fn test_from_minor_handles_jpy_no_decimals() {
        let m = Money::from_minor(10000, Currency::JPY);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_checked_sum_of_same_currency() {
        let values = vec![
            Money::new(dec!(10.00), Currency::USD),
            Money::new(dec!(20.50), Currency::USD),
        ];
        let total = Money::checked_sum(&values, Currency::USD).unwrap();
        assert_eq!(total.amount(), dec!(30.50));
    }

    #[test]
    fn test_checked_sum_rejects_mixed_currency() {
        let values = vec![
            Money::new(dec!(10.00), Currency::USD),
            Money::new(dec!(20.50), Currency::EUR),
        ];
        let result = Money::checked_sum(&values, Currency::USD);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }
}

mod tolerance {
    use super::*;

    #[test]
    fn test_epsilon_is_one_cent() {
        assert_eq!(EPSILON, dec!(0.01));
    }

    #[test]
    fn test_approx_eq_within_a_cent() {
        let a = Money::new(dec!(99.9999), Currency::USD);
        let b = Money::new(dec!(100.00), Currency::USD);
        assert!(a.approx_eq(&b));
    }

    #[test]
    fn test_approx_eq_outside_a_cent() {
        let a = Money::new(dec!(99.98), Currency::USD);
        let b = Money::new(dec!(100.00), Currency::USD);
        assert!(!a.approx_eq(&b));
    }

    #[test]
    fn test_approx_eq_requires_same_currency() {
        let a = Money::new(dec!(100.00), Currency::USD);
        let b = Money::new(dec!(100.00), Currency::EUR);
        assert!(!a.approx_eq(&b));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_sub_can_go_negative() {
        let a = Money::new(dec!(20.00), Currency::USD);
        let b = Money::new(dec!(30.00), Currency::USD);
        let result = a.checked_sub(&b).unwrap();
        assert_eq!(result.amount(), dec!(-10.00));
        assert!(result.is_negative());
    }

    #[test]
    fn test_negation() {
        let m = -Money::new(dec!(12.34), Currency::USD);
        assert_eq!(m.amount(), dec!(-12.34));
    }

    #[test]
    fn test_checked_sum_overflow() {
        let values = vec![
            Money::new(Decimal::MAX, Currency::USD),
            Money::new(dec!(1), Currency::USD),
        ];
        assert_eq!(Money::checked_sum(&values, Currency::USD), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_round_to_currency_usd() {
        let m = Money::new(dec!(33.3333), Currency::USD);
        assert_eq!(m.round_to_currency().amount(), dec!(33.33));
    }
}

mod weighted_allocation {
    use super::*;

    #[test]
    fn test_one_to_three_weights() {
        let m = Money::new(dec!(100.00), Currency::USD);
        let parts = m.allocate_by_weights(&[dec!(1), dec!(3)]).unwrap();
        assert_eq!(parts[0].amount(), dec!(25.00));
        assert_eq!(parts[1].amount(), dec!(75.00));
    }

    #[test]
    fn test_remainder_goes_to_largest_fraction() {
        // 10.00 split 1:2 -> 3.333.. and 6.666..; the extra cent goes to the second part
        let m = Money::new(dec!(10.00), Currency::USD);
        let parts = m.allocate_by_weights(&[dec!(1), dec!(2)]).unwrap();
        assert_eq!(parts[0].amount(), dec!(3.33));
        assert_eq!(parts[1].amount(), dec!(6.67));
    }

    #[test]
    fn test_empty_weights_error() {
        let m = Money::new(dec!(10.00), Currency::USD);
        assert!(matches!(
            m.allocate_by_weights(&[]),
            Err(MoneyError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_non_positive_weight_error() {
        let m = Money::new(dec!(10.00), Currency::USD);
        assert!(matches!(
            m.allocate_by_weights(&[dec!(1), dec!(0)]),
            Err(MoneyError::InvalidWeights(_))
        ));
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(Currency::from_code("eur").unwrap(), Currency::EUR);
        assert_eq!(Currency::from_code(" GBP ").unwrap(), Currency::GBP);
    }

    #[test]
    fn test_from_code_unknown() {
        assert!(matches!(
            Currency::from_code("XYZ"),
            Err(MoneyError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_default_currency_is_usd() {
        assert_eq!(Currency::default(), Currency::USD);
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&Currency::CHF).unwrap();
        assert_eq!(json, "\"CHF\"");
    }
}

mod display {
    use super::*;

    #[test]
    fn test_money_display_usd() {
        let m = Money::new(dec!(25), Currency::USD);
        assert_eq!(m.to_string(), "$25.00");
    }

    #[test]
    fn test_money_display_eur() {
        let m = Money::new(dec!(1234.5), Currency::EUR);
        assert_eq!(m.to_string(), "€1234.50");
    }
}
