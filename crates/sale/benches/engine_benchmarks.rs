use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{TimeZone, Utc};
use crowdgate_core::{HolderId, LedgerId};
use crowdgate_ledger::{Ledger, TokenInfo};
use crowdgate_sale::{SaleConfig, SaleEngine};

const PRICE: u128 = 5;

fn fresh_engine(supply: u128) -> (SaleEngine, HolderId) {
    let deployer = HolderId::new();
    let ledger = Ledger::new(
        LedgerId::new(),
        TokenInfo {
            name: "Bench Token".to_string(),
            symbol: "BNCH".to_string(),
            decimals: 18,
        },
        supply,
        deployer,
    );
    let mut engine = SaleEngine::new(
        ledger,
        deployer,
        SaleConfig {
            price: PRICE,
            max_tokens: supply,
            window: None,
        },
    )
    .unwrap();
    engine.fund(deployer, supply).unwrap();
    (engine, deployer)
}

fn bench_purchase_throughput(c: &mut Criterion) {
    let now = Utc.timestamp_opt(0, 0).unwrap();
    let mut group = c.benchmark_group("purchase_throughput");

    for purchases in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(purchases));

        group.bench_with_input(
            BenchmarkId::new("buy_tokens", purchases),
            &purchases,
            |b, &n| {
                b.iter(|| {
                    let (mut engine, _) = fresh_engine(u128::from(n) * 2);
                    let buyer = HolderId::new();
                    for _ in 0..n {
                        engine.buy_tokens(buyer, 1, PRICE, now).unwrap();
                    }
                    black_box(engine.tokens_sold())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("receive_payment", purchases),
            &purchases,
            |b, &n| {
                b.iter(|| {
                    let (mut engine, _) = fresh_engine(u128::from(n) * 2);
                    let buyer = HolderId::new();
                    for _ in 0..n {
                        engine.receive_payment(buyer, PRICE + 2, now).unwrap();
                    }
                    black_box(engine.payment_balance())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_purchase_throughput);
criterion_main!(benches);
