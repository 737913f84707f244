//! Random baseline: every `period` days each stock is bought, sold, or
//! held with equal probability. Useful as a control when comparing
//! signal-driven strategies on the same simulated prices.

use crate::domain::PriceMatrix;
use crate::engine::Trader;
use crate::ledger::LedgerStore;
use rand::Rng;

use super::StrategyError;

pub fn run<R: Rng>(
    prices: &PriceMatrix,
    period: usize,
    amount: f64,
    fees: f64,
    ledger: LedgerStore,
    rng: &mut R,
) -> Result<(), StrategyError> {
    let trader = Trader::new(prices, fees, ledger);
    let allocations = vec![amount; prices.n_stocks()];
    let mut portfolio = trader.create_portfolio(&allocations)?;

    let last_day = prices.n_days() - 1;
    let mut day = period;
    while day < last_day {
        for stock in 0..prices.n_stocks() {
            match rng.gen_range(0..3u8) {
                0 => trader.buy(day, stock, amount, &mut portfolio)?,
                1 => {
                    // Selling an empty position would only log noise.
                    if portfolio.shares(stock) > 0 {
                        trader.sell(day, stock, &mut portfolio)?;
                    }
                }
                _ => {}
            }
        }
        day += period;
    }

    trader.liquidate(last_day, &mut portfolio)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use crate::ledger::read_ledger;
    use crate::rng::RngHierarchy;

    fn flat_prices(days: usize, stocks: usize) -> PriceMatrix {
        let cols: Vec<Vec<f64>> = (0..stocks).map(|_| vec![100.0; days]).collect();
        PriceMatrix::from_columns(&cols)
    }

    #[test]
    fn deterministic_for_a_fixed_seed() {
        let prices = flat_prices(60, 3);
        let dir = tempfile::tempdir().unwrap();

        let mut ledgers = Vec::new();
        for name in ["a.csv", "b.csv"] {
            let path = dir.path().join(name);
            let mut rng = RngHierarchy::new(99).stream("strategy");
            run(&prices, 7, 5_000.0, 20.0, LedgerStore::new(&path), &mut rng).unwrap();
            ledgers.push(std::fs::read_to_string(&path).unwrap());
        }
        assert_eq!(ledgers[0], ledgers[1]);
    }

    #[test]
    fn opens_and_closes_every_position() {
        let prices = flat_prices(30, 2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut rng = RngHierarchy::new(7).stream("strategy");
        run(&prices, 7, 5_000.0, 20.0, LedgerStore::new(&path), &mut rng).unwrap();

        let report = read_ledger(&path, None).unwrap();
        let (_, closing) = report.history.last().unwrap();
        assert!(closing.iter().all(|&held| held == 0));
        // Day-0 creation buys both stocks.
        let txs = crate::ledger::parse_ledger(&path).unwrap();
        assert!(txs
            .iter()
            .filter(|t| t.day == 0)
            .all(|t| t.direction == Direction::Buy));
        assert_eq!(txs.iter().filter(|t| t.day == 0).count(), 2);
    }

    #[test]
    fn never_sells_short() {
        let prices = flat_prices(120, 4);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut rng = RngHierarchy::new(3).stream("strategy");
        run(&prices, 5, 5_000.0, 20.0, LedgerStore::new(&path), &mut rng).unwrap();

        // Replay aborts with NegativeHoldings if any sell oversteps.
        assert!(read_ledger(&path, None).is_ok());
    }
}
