//! End-to-end pool lifecycles through the `Pool` facade

use amm_engine::{
    AccountId, AmmError, AmmPool, Asset, LiquidityEngine, LpSupply, Operation, OperationResult,
    Pool, PoolConfig, PoolsConfig, RatioOracle, SwapDirection, SwapEngine, Token, Transfer,
};
use rust_decimal_macros::dec;

fn admin() -> AccountId {
    AccountId::from("manager")
}

fn lp() -> AccountId {
    AccountId::from("provider")
}

fn trader() -> AccountId {
    AccountId::from("trader")
}

#[test]
fn two_token_pool_lifecycle() {
    let mut pool = Pool::new(&PoolConfig::two_token(), admin()).unwrap();

    let minted = pool.mint(&lp(), 1_000_000, 1_000_000).unwrap();
    assert_eq!(minted.shares_to_mint, 1_000_000);
    assert_eq!(pool.state().pool_held_shares(), 10_000_000_000_000_000 - 1_000_000);

    let swapped = pool.swap(&trader(), SwapDirection::XToY, 10_000, 9_800).unwrap();
    assert_eq!(swapped.out_amount, 9_851);
    assert_eq!(swapped.platform_fee, 24);
    assert_eq!(swapped.platform_fee_asset, Asset::Y);
    assert_eq!((swapped.new_reserve_x, swapped.new_reserve_y), (1_010_000, 990_125));
    assert_eq!(
        swapped.transfers,
        vec![
            Transfer {
                token: Token::Reserve(Asset::Y),
                amount: 9_851,
                to: trader(),
            },
            Transfer {
                token: Token::Reserve(Asset::Y),
                amount: 24,
                to: admin(),
            },
        ]
    );

    // sole provider redeems the whole pool, retained LP fee included
    let burned = pool.burn(&lp(), 1_000_000).unwrap();
    assert_eq!(burned.amount_x, 1_010_000);
    assert_eq!(burned.amount_y, 990_125);
    assert_eq!(pool.state().total_lp_supply(), 0);
    assert_eq!(pool.get_reserves(), (0, 0));

    assert_eq!(
        pool.swap(&trader(), SwapDirection::XToY, 10_000, 0),
        Err(AmmError::EmptyReserve)
    );
}

#[test]
fn reseeding_after_full_withdrawal() {
    let mut pool = Pool::new(&PoolConfig::two_token(), admin()).unwrap();
    pool.mint(&lp(), 4_000_000, 1_000_000).unwrap();
    pool.burn(&lp(), 2_000_000).unwrap();

    // a drained pool prices the next deposit like the first one
    let minted = pool.mint(&lp(), 9_000_000, 1_000_000).unwrap();
    assert_eq!(minted.shares_to_mint, 3_000_000);
    assert_eq!(pool.ratio(), 900_000_000);
}

#[test]
fn native_pool_requires_bootstrap_and_collects_fee_in_native_asset() {
    let mut pool = Pool::new(&PoolConfig::native_pair(500_000), admin()).unwrap();

    assert_eq!(pool.mint(&lp(), 1_000_000, 1_000_000), Err(AmmError::EmptyReserve));
    pool.bootstrap(&admin(), 1).unwrap();
    let minted = pool.mint(&lp(), 1_000_000, 1_000_000).unwrap();
    assert_eq!(minted.shares_to_mint, 1_000_000);
    assert_eq!(minted.new_reserve_x, 1_000_001);

    let receipt = pool.swap(&trader(), SwapDirection::YToX, 10_000, 0).unwrap();
    assert_eq!(receipt.out_amount, 9_851);
    assert_eq!(receipt.platform_fee_asset, Asset::X);
    assert_eq!(receipt.transfers[1].token, Token::Reserve(Asset::X));

    let receipt = pool.swap(&trader(), SwapDirection::XToY, 10_000, 0).unwrap();
    assert_eq!(receipt.platform_fee_asset, Asset::X);
    assert_eq!(receipt.transfers[0].token, Token::Reserve(Asset::Y));
    assert!(receipt.platform_fee > 0);
}

#[test]
fn arc200_pool_scales_fees_at_fourteen_decimals() {
    let mut pool = Pool::new(&PoolConfig::arc200_pair(), admin()).unwrap();
    pool.mint(&lp(), 1_000_000_000, 1_000_000_000).unwrap();

    assert_eq!(pool.get_swap_fee_percent(), Some(dec!(1)));

    let quote = pool.quote(SwapDirection::XToY, 1_000_000).unwrap();
    let receipt = pool.swap(&trader(), SwapDirection::XToY, 1_000_000, quote.out_amount).unwrap();
    assert_eq!(receipt.out_amount, quote.out_amount);
    // 1% fee on a ~0.1% trade
    assert_eq!(receipt.out_amount, 989_010);
}

#[test]
fn fee_update_applies_to_next_swap() {
    let mut pool = Pool::new(&PoolConfig::two_token(), admin()).unwrap();
    pool.mint(&lp(), 1_000_000, 1_000_000).unwrap();

    let before = pool.get_amount_out(SwapDirection::XToY, 10_000).unwrap();
    let result = pool
        .execute(
            &admin(),
            Operation::SetFees {
                swap_fee: 0,
                platform_fee: 0,
            },
        )
        .unwrap();
    assert_eq!(
        result,
        OperationResult::FeesUpdated {
            swap_fee: 0,
            platform_fee: 0
        }
    );

    let after = pool.get_amount_out(SwapDirection::XToY, 10_000).unwrap();
    assert_eq!(before, 9_851);
    assert_eq!(after, 9_900);
}

#[test]
fn host_side_reserve_reconstruction() {
    // host observes balances after the deposit landed
    let observed_balance = 1_010_000;
    let reserve = SwapEngine::effective_reserve(observed_balance, 10_000).unwrap();
    assert_eq!(reserve, 1_000_000);

    // fixed-supply accounting after 250 shares were sent back to the pool
    let total = 10_000_000_000_000_000;
    let pool_held = total - 1_000_000 + 250;
    let issued = LiquidityEngine::issued_before_burn(LpSupply::Fixed { total }, pool_held, 250).unwrap();
    assert_eq!(issued, 1_000_000);
}

#[test]
fn pools_from_toml_file() {
    let pools = PoolsConfig::from_toml_str(
        r#"
[pools.stable]
swap_fee = 100_000

[pools.native]
swap_fee = 300_000
platform_fee_asset = { always = "x" }
requires_bootstrap = true
"#,
    )
    .unwrap();

    let mut stable = Pool::new(pools.get("stable").unwrap(), admin()).unwrap();
    stable.mint(&lp(), 5_000_000, 5_000_000).unwrap();
    assert_eq!(stable.ratio(), 100_000_000);
    assert_eq!(RatioOracle::price(stable.state()), Some(dec!(1)));

    let mut native = Pool::new(pools.get("native").unwrap(), admin()).unwrap();
    assert!(native.mint(&lp(), 1, 1).is_err());
    native.bootstrap(&admin(), 1_000).unwrap();
    assert!(native.mint(&lp(), 1_000, 1_000).is_ok());
}
