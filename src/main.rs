//! Pari-mutuel Market Simulation.
//!
//! Walks the full market lifecycle: oracle-priced entry, two-sided staking,
//! result reporting, and proportional settlement, including the failure
//! paths (moving prices, refused transfers, winnerless books).

use parimutuel_core::*;
use rust_decimal::Decimal;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    println!("Pari-mutuel Prediction Market Simulation");
    println!("Single Round, Oracle-Priced Entry, Proportional Settlement\n");

    scenario_1_full_round();
    scenario_2_moving_price();
    scenario_3_refused_transfer();
    scenario_4_winnerless_book();
    scenario_5_audit_trail();

    println!("\nAll simulations completed successfully.");
}

fn new_market() -> PredictionMarket<MockPriceFeed, InMemoryTreasury> {
    PredictionMarket::new(
        admin(),
        MockPriceFeed::default(),
        InMemoryTreasury::new(),
        MarketParams::default(),
    )
}

fn admin() -> Address {
    Address::from_low_u64(0xd0)
}

fn gambler(id: u64) -> Address {
    Address::from_low_u64(id)
}

fn coins(amount: NativeAmount) -> Decimal {
    amount.as_coins().unwrap_or_default()
}

/// Three backers against one, settled proportionally.
fn scenario_1_full_round() {
    println!("Scenario 1: Full Round\n");

    let mut market = new_market();
    market.start_market(admin()).unwrap();

    let fee = market.entrance_fee().unwrap();
    println!("  Oracle quotes $2,000; $50 entry = {} coin", coins(fee));

    for id in [1, 2, 3] {
        market.place_bet(gambler(id), Side::Alice, fee).unwrap();
    }
    market.place_bet(gambler(4), Side::Bob, fee).unwrap();

    println!(
        "  Pools: Alice {} coin ({} players), Bob {} coin",
        coins(market.bets(Side::Alice)),
        market.player_count() - 1,
        coins(market.bets(Side::Bob)),
    );

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();

    println!("  Alice wins. {} payouts issued:", report.paid.len());
    for entry in &report.paid {
        println!(
            "    {} staked {} coin, paid {} coin",
            entry.player,
            coins(entry.stake),
            coins(entry.amount)
        );
    }
    println!(
        "  Distributed {} coin, retained {} native units of floor dust",
        coins(report.distributed),
        report.retained
    );
    println!(
        "  Bob's backer got nothing: balance {} coin",
        coins(market.treasury().get_balance(gambler(4)))
    );
    println!("  Final state code: {}\n", market.market_state());
}

/// The fee is a live quote, not a constant.
fn scenario_2_moving_price() {
    println!("Scenario 2: Moving Price\n");

    let mut market = new_market();
    market.start_market(admin()).unwrap();

    let fee_at_2k = market.entrance_fee().unwrap();
    market.place_bet(gambler(1), Side::Alice, fee_at_2k).unwrap();
    println!("  At $2,000 the entry costs {} coin", coins(fee_at_2k));

    market.feed_mut().set_answer(400_000_000_000);
    let fee_at_4k = market.entrance_fee().unwrap();
    println!("  Coin rallies to $4,000, entry drops to {} coin", coins(fee_at_4k));

    let stale = market.place_bet(gambler(2), Side::Bob, fee_at_2k);
    println!("  Stale-quoted stake rejected: {}", stale.unwrap_err());

    market.place_bet(gambler(2), Side::Bob, fee_at_4k).unwrap();
    println!(
        "  Re-sent at the live quote, pools now Alice {} / Bob {} coin\n",
        coins(market.bets(Side::Alice)),
        coins(market.bets(Side::Bob)),
    );
}

/// One unreachable winner cannot hold up the rest.
fn scenario_3_refused_transfer() {
    println!("Scenario 3: Refused Transfer\n");

    let mut market = new_market();
    market.start_market(admin()).unwrap();

    let fee = market.entrance_fee().unwrap();
    for id in [1, 2] {
        market.place_bet(gambler(id), Side::Alice, fee).unwrap();
    }
    market.place_bet(gambler(3), Side::Bob, fee).unwrap();

    market.treasury_mut().refuse(gambler(2));
    println!("  Treasury refuses transfers to {}", gambler(2));

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();
    println!(
        "  Settled anyway: {} paid, {} failed, state code {}",
        report.paid.len(),
        report.failed.len(),
        market.market_state()
    );
    for failure in &report.failed {
        println!("    failed: {} coin to {}", coins(failure.amount), failure.player);
    }
    println!(
        "  Paid winner's balance: {} coin, retained {} coin\n",
        coins(market.treasury().get_balance(gambler(1))),
        coins(report.retained),
    );
}

/// Everyone backed the losing side.
fn scenario_4_winnerless_book() {
    println!("Scenario 4: Winnerless Book\n");

    let mut market = new_market();
    market.start_market(admin()).unwrap();

    let fee = market.entrance_fee().unwrap();
    market.place_bet(gambler(1), Side::Bob, fee).unwrap();
    market.place_bet(gambler(2), Side::Bob, fee).unwrap();

    let report = market.report_result(admin(), Side::Alice, Side::Bob).unwrap();
    println!(
        "  Alice wins with an empty pool: {} payouts, {} coin retained, state code {}\n",
        report.paid.len(),
        coins(report.retained),
        market.market_state()
    );
}

/// Every state change lands in the event log.
fn scenario_5_audit_trail() {
    println!("Scenario 5: Audit Trail\n");

    let mut market = new_market();
    market.set_time(Timestamp::now());
    market.start_market(admin()).unwrap();

    let fee = market.entrance_fee().unwrap();
    market.place_bet(gambler(1), Side::Alice, fee).unwrap();
    market.place_bet(gambler(2), Side::Bob, fee).unwrap();
    market.report_result(admin(), Side::Bob, Side::Alice).unwrap();

    for event in market.events() {
        let label = match &event.payload {
            EventPayload::MarketOpened(_) => "market opened".to_string(),
            EventPayload::BetPlaced(e) => {
                format!("bet: {} coin on {} by {}", coins(e.amount), e.side, e.player)
            }
            EventPayload::ResultReported(e) => format!("result: {} beats {}", e.winning, e.losing),
            EventPayload::PayoutIssued(e) => {
                format!("payout: {} coin to {}", coins(e.amount), e.player)
            }
            EventPayload::PayoutFailed(e) => format!("payout failed: {}", e.player),
            EventPayload::SettlementCompleted(e) => format!(
                "settled: {} paid, {} retained",
                e.paid_count, e.retained
            ),
        };
        println!("  [{}] {}", event.id.0, label);
    }
}
