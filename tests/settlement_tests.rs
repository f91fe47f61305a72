//! Settlement behavior under hostile conditions.
//!
//! Refused transfers, winnerless books, and empty rounds must all leave the
//! market Complete with the book conserved: distributed + retained always
//! equals everything that was staked.

use parimutuel_core::*;

const FEE: u128 = 25_000_000_000_000_000;

fn admin() -> Address {
    Address::from_low_u64(0xd0)
}

fn gambler(id: u64) -> Address {
    Address::from_low_u64(id)
}

fn open_market() -> PredictionMarket<MockPriceFeed, InMemoryTreasury> {
    let mut market = PredictionMarket::new(
        admin(),
        MockPriceFeed::default(),
        InMemoryTreasury::new(),
        MarketParams::default(),
    );
    market.start_market(admin()).unwrap();
    market
}

fn assert_conserved(report: &SettlementReport) {
    let total = report
        .winning_pool
        .checked_add(report.losing_pool)
        .unwrap();
    assert_eq!(
        report.distributed.checked_add(report.retained),
        Some(total)
    );
}

#[test]
fn refused_winner_is_skipped_not_fatal() {
    let mut market = open_market();
    let stake = NativeAmount::new(FEE);

    for id in [1, 2, 3] {
        market.place_bet(gambler(id), Side::Alice, stake).unwrap();
    }
    market.place_bet(gambler(4), Side::Bob, stake).unwrap();
    market.treasury_mut().refuse(gambler(2));

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    assert_eq!(market.market_state(), 3);
    assert_eq!(report.paid.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].player, gambler(2));
    assert_eq!(
        report.failed[0].amount,
        NativeAmount::new(33_333_333_333_333_333)
    );

    // the reachable winners were paid in full
    for id in [1, 3] {
        assert_eq!(
            market.treasury().get_balance(gambler(id)),
            NativeAmount::new(33_333_333_333_333_333)
        );
    }
    assert_eq!(
        market.treasury().get_balance(gambler(2)),
        NativeAmount::zero()
    );

    // the skipped payout stays behind, on top of the floor dust
    assert_eq!(report.retained.value(), 33_333_333_333_333_334);
    assert_conserved(&report);
}

#[test]
fn every_transfer_refused_still_completes() {
    let mut market = open_market();
    let stake = NativeAmount::new(FEE);

    for id in [1, 2] {
        market.place_bet(gambler(id), Side::Alice, stake).unwrap();
        market.treasury_mut().refuse(gambler(id));
    }
    market.place_bet(gambler(3), Side::Bob, stake).unwrap();

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    assert_eq!(market.market_state(), 3);
    assert!(report.paid.is_empty());
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.distributed, NativeAmount::zero());
    assert_eq!(report.retained, NativeAmount::new(3 * FEE));
    assert_conserved(&report);
    assert_eq!(market.treasury().transfer_count(), 0);
}

#[test]
fn winnerless_round_retains_the_pool() {
    let mut market = open_market();
    let stake = NativeAmount::new(FEE);

    market.place_bet(gambler(1), Side::Bob, stake).unwrap();
    market.place_bet(gambler(2), Side::Bob, stake).unwrap();

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    assert_eq!(market.market_state(), 3);
    assert!(report.paid.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(report.winning_pool, NativeAmount::zero());
    assert_eq!(report.losing_pool, NativeAmount::new(2 * FEE));
    assert_eq!(report.retained, NativeAmount::new(2 * FEE));
    assert_eq!(market.treasury().transfer_count(), 0);
    assert_conserved(&report);
}

#[test]
fn empty_book_settles_cleanly() {
    let mut market = open_market();
    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    assert_eq!(market.market_state(), 3);
    assert!(report.paid.is_empty());
    assert!(report.failed.is_empty());
    assert_eq!(report.retained, NativeAmount::zero());
    assert_conserved(&report);
}

#[test]
fn uneven_books_conserve_and_never_short_a_winner() {
    let mut market = open_market();
    let stake = NativeAmount::new(FEE);

    // gambler 1 doubles down, 2 takes one slot, 3 and 4 oppose
    market.place_bet(gambler(1), Side::Alice, stake).unwrap();
    market.place_bet(gambler(1), Side::Alice, stake).unwrap();
    market.place_bet(gambler(2), Side::Alice, stake).unwrap();
    market.place_bet(gambler(3), Side::Bob, stake).unwrap();
    market.place_bet(gambler(4), Side::Bob, stake).unwrap();

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    assert_conserved(&report);
    for entry in &report.paid {
        assert!(entry.amount.value() >= entry.stake.value());
        assert_eq!(market.treasury().get_balance(entry.player), entry.amount);
    }
    // each floors independently: 2f + 2f*2f/3f and f + f*2f/3f
    let double = market.treasury().get_balance(gambler(1));
    let single = market.treasury().get_balance(gambler(2));
    assert_eq!(double.value(), 83_333_333_333_333_333);
    assert_eq!(single.value(), 41_666_666_666_666_666);
    assert_eq!(report.retained.value(), 1);
}

#[test]
fn failures_surface_in_the_event_log() {
    let mut market = open_market();
    let stake = NativeAmount::new(FEE);

    market.place_bet(gambler(1), Side::Alice, stake).unwrap();
    market.place_bet(gambler(2), Side::Bob, stake).unwrap();
    market.treasury_mut().refuse(gambler(1));

    market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    let failures: Vec<_> = market
        .events()
        .iter()
        .filter_map(|e| match &e.payload {
            EventPayload::PayoutFailed(f) => Some(f.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].player, gambler(1));
    assert!(!failures[0].reason.is_empty());

    let completed = market
        .events()
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::SettlementCompleted(_)))
        .count();
    assert_eq!(completed, 1);
}
