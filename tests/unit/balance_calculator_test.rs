/// Unit and property-based tests for the balance calculator
///
/// Validates:
/// - outstanding = max(total_fees - confirmed_paid, 0), never negative
/// - exactly one of "À jour" / "Partiel" / "En retard" per (fee, paid) pair
/// - pending and cancelled payments never move the paid total
/// - identical inputs always produce identical output

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use ecolage::modules::fees::FeePlan;
use ecolage::modules::ledger::models::TuitionStatus;
use ecolage::modules::ledger::services::BalanceCalculator;
use ecolage::modules::payments::models::{
    PaymentMethod, PaymentRecord, PaymentStatus, PaymentType,
};

fn plan(annual_fee: Decimal) -> FeePlan {
    FeePlan::new("CE1".to_string(), annual_fee).expect("valid fee plan")
}

fn payment(amount: Decimal, status: PaymentStatus) -> PaymentRecord {
    PaymentRecord {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: "stu-1".to_string(),
        amount,
        method: PaymentMethod::Cash,
        payment_type: PaymentType::Tuition,
        payment_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        period_description: None,
        reference_number: None,
        status,
        mobile_number: None,
        bank_details: None,
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_partial_payment_scenario() {
    // 400 000 annual fee, 250 000 confirmed, 50 000 still pending
    let payments = vec![
        payment(dec!(250000), PaymentStatus::Confirmed),
        payment(dec!(50000), PaymentStatus::Pending),
    ];

    let balance = BalanceCalculator::compute_balance("stu-1", &plan(dec!(400000)), &payments);

    assert_eq!(balance.paid_amount, dec!(250000));
    assert_eq!(balance.outstanding_amount, dec!(150000));
    assert_eq!(balance.payment_status, TuitionStatus::Partial);
}

#[test]
fn test_fully_paid_scenario() {
    let payments = vec![
        payment(dec!(200000), PaymentStatus::Confirmed),
        payment(dec!(250000), PaymentStatus::Confirmed),
    ];

    let balance = BalanceCalculator::compute_balance("stu-1", &plan(dec!(450000)), &payments);

    assert_eq!(balance.paid_amount, dec!(450000));
    assert_eq!(balance.outstanding_amount, dec!(0));
    assert_eq!(balance.payment_status, TuitionStatus::UpToDate);
}

#[test]
fn test_no_payments_scenario() {
    let balance = BalanceCalculator::compute_balance("stu-1", &plan(dec!(350000)), &[]);

    assert_eq!(balance.paid_amount, dec!(0));
    assert_eq!(balance.outstanding_amount, dec!(350000));
    assert_eq!(balance.payment_status, TuitionStatus::Late);
}

#[test]
fn test_overpayment_scenario() {
    // 320 000 confirmed against a 300 000 fee: outstanding clamps at zero
    // and no negative value leaks into downstream sums
    let payments = vec![
        payment(dec!(300000), PaymentStatus::Confirmed),
        payment(dec!(20000), PaymentStatus::Confirmed),
    ];

    let balance = BalanceCalculator::compute_balance("stu-1", &plan(dec!(300000)), &payments);

    assert_eq!(balance.paid_amount, dec!(320000));
    assert_eq!(balance.outstanding_amount, dec!(0));
    assert!(balance.outstanding_amount >= Decimal::ZERO);
    assert_eq!(balance.payment_status, TuitionStatus::UpToDate);

    // Summing the outstanding amount downstream must not subtract anything
    let total: Decimal = [balance.outstanding_amount, dec!(150000)].iter().sum();
    assert_eq!(total, dec!(150000));
}

#[test]
fn test_zero_fee_plan_counts_as_up_to_date() {
    let balance = BalanceCalculator::compute_balance("stu-1", &plan(dec!(0)), &[]);
    assert_eq!(balance.outstanding_amount, dec!(0));
    assert_eq!(balance.payment_status, TuitionStatus::UpToDate);
}

proptest! {
    /// Property: outstanding = max(fee - paid, 0) and is never negative
    #[test]
    fn prop_outstanding_never_negative(
        fee in 0u64..10_000_000u64,
        paid in 0u64..10_000_000u64,
    ) {
        let fee = Decimal::from(fee);
        let paid = Decimal::from(paid);

        let (outstanding, _) = BalanceCalculator::derive_position(fee, paid);

        prop_assert!(outstanding >= Decimal::ZERO, "Outstanding must never be negative");
        prop_assert_eq!(outstanding, (fee - paid).max(Decimal::ZERO));
    }

    /// Property: exactly one status per (fee, paid) pair, matching the
    /// partition: paid == 0 and fee > 0 means late; 0 < paid < fee means
    /// partial; paid >= fee means up to date
    #[test]
    fn prop_status_partition(
        fee in 0u64..10_000_000u64,
        paid in 0u64..10_000_000u64,
    ) {
        let fee_d = Decimal::from(fee);
        let paid_d = Decimal::from(paid);

        let (_, status) = BalanceCalculator::derive_position(fee_d, paid_d);

        let expected = if paid >= fee {
            TuitionStatus::UpToDate
        } else if paid == 0 {
            TuitionStatus::Late
        } else {
            TuitionStatus::Partial
        };

        prop_assert_eq!(status, expected);
    }

    /// Property: adding pending or cancelled payments of any amount changes
    /// neither the paid total nor the outstanding amount
    #[test]
    fn prop_non_confirmed_payments_are_inert(
        fee in 1u64..1_000_000u64,
        confirmed in proptest::collection::vec(1u64..500_000u64, 0..6),
        noise in proptest::collection::vec(1u64..500_000u64, 1..6),
    ) {
        let fee_plan = plan(Decimal::from(fee));

        let mut payments: Vec<PaymentRecord> = confirmed
            .iter()
            .map(|&a| payment(Decimal::from(a), PaymentStatus::Confirmed))
            .collect();

        let baseline = BalanceCalculator::compute_balance("stu-1", &fee_plan, &payments);

        for (i, &a) in noise.iter().enumerate() {
            let status = if i % 2 == 0 {
                PaymentStatus::Pending
            } else {
                PaymentStatus::Cancelled
            };
            payments.push(payment(Decimal::from(a), status));
        }

        let with_noise = BalanceCalculator::compute_balance("stu-1", &fee_plan, &payments);

        prop_assert_eq!(baseline.paid_amount, with_noise.paid_amount);
        prop_assert_eq!(baseline.outstanding_amount, with_noise.outstanding_amount);
        prop_assert_eq!(baseline.payment_status, with_noise.payment_status);
    }

    /// Property: the derivation is deterministic
    #[test]
    fn prop_deterministic(
        fee in 0u64..1_000_000u64,
        amounts in proptest::collection::vec(1u64..500_000u64, 0..8),
    ) {
        let fee_plan = plan(Decimal::from(fee));
        let payments: Vec<PaymentRecord> = amounts
            .iter()
            .map(|&a| payment(Decimal::from(a), PaymentStatus::Confirmed))
            .collect();

        let first = BalanceCalculator::compute_balance("stu-1", &fee_plan, &payments);
        let second = BalanceCalculator::compute_balance("stu-1", &fee_plan, &payments);

        prop_assert_eq!(first, second);
    }
}
