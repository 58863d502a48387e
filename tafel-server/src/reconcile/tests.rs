use super::*;
use crate::db::models::PaymentMethod;

fn mk_payment(method: PaymentMethod, amount: f64, refund: f64, status: PaymentStatus) -> PaymentTransaction {
    PaymentTransaction {
        id: None,
        transaction_id: uuid::Uuid::new_v4().to_string(),
        method,
        amount,
        currency: "EUR".to_string(),
        status,
        refund_amount: refund,
        refund_reason: None,
        reservation_ref: None,
        date: "2025-03-10".to_string(),
        timestamp: 0,
        created_at: 0,
    }
}

#[test]
fn test_decimal_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_balanced_month() {
    let payments = vec![
        mk_payment(PaymentMethod::Cash, 100.10, 0.0, PaymentStatus::Captured),
        mk_payment(PaymentMethod::Cash, 50.20, 0.0, PaymentStatus::Captured),
        mk_payment(PaymentMethod::Card, 200.00, 0.0, PaymentStatus::Captured),
    ];
    let pos: HashMap<String, f64> =
        [("CASH".to_string(), 150.30), ("CARD".to_string(), 200.00)].into();

    let rec = build_reconciliation("2025-03", &payments, &pos, None);
    assert_eq!(rec.status, ReconciliationStatus::Balanced);
    assert_eq!(rec.recorded_total, 350.30);
    assert_eq!(rec.difference, 0.0);

    let cash = rec.breakdowns.iter().find(|b| b.method == "CASH").unwrap();
    assert_eq!(cash.recorded_total, 150.30);
    assert_eq!(cash.count, 2);
}

#[test]
fn test_refunds_reduce_recorded_total() {
    let payments = vec![
        mk_payment(PaymentMethod::Card, 100.00, 100.00, PaymentStatus::Refunded),
        mk_payment(PaymentMethod::Card, 80.00, 30.00, PaymentStatus::Captured),
    ];
    let pos: HashMap<String, f64> = [("CARD".to_string(), 50.00)].into();

    let rec = build_reconciliation("2025-03", &payments, &pos, None);
    assert_eq!(rec.status, ReconciliationStatus::Balanced);
    assert_eq!(rec.recorded_total, 50.00);
}

#[test]
fn test_discrepant_month_reports_difference() {
    let payments = vec![mk_payment(PaymentMethod::Cash, 100.00, 0.0, PaymentStatus::Captured)];
    let pos: HashMap<String, f64> = [("CASH".to_string(), 120.00)].into();

    let rec = build_reconciliation("2025-03", &payments, &pos, None);
    assert_eq!(rec.status, ReconciliationStatus::Discrepant);
    assert_eq!(rec.breakdowns[0].difference, -20.00);
    assert_eq!(rec.difference, -20.00);
}

#[test]
fn test_sub_cent_difference_is_balanced() {
    let payments = vec![mk_payment(PaymentMethod::Cash, 100.004, 0.0, PaymentStatus::Captured)];
    let pos: HashMap<String, f64> = [("CASH".to_string(), 100.00)].into();

    let rec = build_reconciliation("2025-03", &payments, &pos, None);
    assert_eq!(rec.status, ReconciliationStatus::Balanced);
}

#[test]
fn test_unsettled_payments_excluded() {
    let payments = vec![
        mk_payment(PaymentMethod::Card, 100.00, 0.0, PaymentStatus::Authorized),
        mk_payment(PaymentMethod::Card, 60.00, 0.0, PaymentStatus::Failed),
        mk_payment(PaymentMethod::Card, 40.00, 0.0, PaymentStatus::Captured),
    ];
    let pos: HashMap<String, f64> = [("CARD".to_string(), 40.00)].into();

    let rec = build_reconciliation("2025-03", &payments, &pos, None);
    assert_eq!(rec.status, ReconciliationStatus::Balanced);
    let card = rec.breakdowns.iter().find(|b| b.method == "CARD").unwrap();
    assert_eq!(card.count, 1);
}

#[test]
fn test_pos_only_method_gets_a_row() {
    let payments: Vec<PaymentTransaction> = Vec::new();
    let pos: HashMap<String, f64> = [("ONLINE".to_string(), 75.50)].into();

    let rec = build_reconciliation("2025-03", &payments, &pos, None);
    assert_eq!(rec.status, ReconciliationStatus::Discrepant);
    let online = rec.breakdowns.iter().find(|b| b.method == "ONLINE").unwrap();
    assert_eq!(online.recorded_total, 0.0);
    assert_eq!(online.pos_total, 75.50);
}

#[test]
fn test_no_pos_totals_stays_open() {
    let payments = vec![mk_payment(PaymentMethod::Cash, 10.00, 0.0, PaymentStatus::Captured)];
    let rec = build_reconciliation("2025-03", &payments, &HashMap::new(), None);
    assert_eq!(rec.status, ReconciliationStatus::Open);
}
