use normal::{
    constants::BPS_DENOMINATOR,
    error::{ ErrorCode, NormalResult },
    safe_decrement,
    safe_increment,
    validate,
};
use soroban_sdk::{ contracttype, Address, Env, Map, Vec };

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketEntry {
    pub market: Address,
    /// Weight set by the manager, in bps
    pub target_weight: u32,
    /// Weight observed at the last committed rebalance, in bps. Reference for
    /// the weight band on the next rebalance.
    pub realized_weight: u32,
}

/// Ordered set of markets with their weights.
///
/// `entries` keeps insertion order and is the order rebalance deltas are
/// matched against. `index` maps each market to its position in `entries`.
/// `total_weight` always equals the sum of every entry's `target_weight`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WeightRegistry {
    entries: Vec<MarketEntry>,
    index: Map<Address, u32>,
    total_weight: u32,
}

impl WeightRegistry {
    pub fn new(env: &Env) -> Self {
        WeightRegistry {
            entries: Vec::new(env),
            index: Map::new(env),
            total_weight: 0,
        }
    }

    /// Inserts `market` at the end or updates its weight in place.
    /// Returns the previous target weight, zero when the market is new.
    pub fn set_weight(&mut self, env: &Env, market: &Address, weight: u32) -> NormalResult<u32> {
        validate!(
            env,
            weight > 0 && weight <= BPS_DENOMINATOR,
            ErrorCode::InvalidWeight,
            "Registry: weight {} must be within (0, {}]",
            weight,
            BPS_DENOMINATOR
        )?;

        match self.index.get(market.clone()) {
            Some(position) => {
                let mut entry = self.entry_at(position)?;
                let old_weight = entry.target_weight;

                safe_decrement!(env, self.total_weight, old_weight);
                safe_increment!(env, self.total_weight, weight);

                entry.target_weight = weight;
                entry.realized_weight = weight;
                self.entries.set(position, entry);

                Ok(old_weight)
            }
            None => {
                safe_increment!(env, self.total_weight, weight);

                self.index.set(market.clone(), self.entries.len());
                self.entries.push_back(MarketEntry {
                    market: market.clone(),
                    target_weight: weight,
                    realized_weight: weight,
                });

                Ok(0)
            }
        }
    }

    /// Removes `market`, shifting later entries down one position.
    pub fn remove(&mut self, env: &Env, market: &Address) -> NormalResult<MarketEntry> {
        let position = self.position(env, market)?;
        let entry = self.entry_at(position)?;

        self.entries.remove(position);
        self.index.remove(market.clone());

        for i in position..self.entries.len() {
            let shifted = self.entry_at(i)?;
            self.index.set(shifted.market, i);
        }

        safe_decrement!(env, self.total_weight, entry.target_weight);

        Ok(entry)
    }

    pub fn set_realized_weight(&mut self, position: u32, weight: u32) -> NormalResult {
        let mut entry = self.entry_at(position)?;
        entry.realized_weight = weight;
        self.entries.set(position, entry);
        Ok(())
    }

    pub fn get(&self, market: &Address) -> Option<MarketEntry> {
        self.index.get(market.clone()).and_then(|position| self.entries.get(position))
    }

    pub fn position(&self, env: &Env, market: &Address) -> NormalResult<u32> {
        let position = self.index.get(market.clone());
        validate!(
            env,
            position.is_some(),
            ErrorCode::MarketNotFound,
            "Registry: market {} is not registered",
            market.clone()
        )?;
        position.ok_or(ErrorCode::MarketNotFound)
    }

    pub fn contains(&self, market: &Address) -> bool {
        self.index.contains_key(market.clone())
    }

    pub fn entries(&self) -> Vec<MarketEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> u32 {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    fn entry_at(&self, position: u32) -> NormalResult<MarketEntry> {
        self.entries.get(position).ok_or(ErrorCode::MarketNotFound)
    }
}

#[cfg(test)]
mod test {
    use normal::error::ErrorCode;
    use pretty_assertions::assert_eq;
    use soroban_sdk::{ testutils::Address as _, Address, Env };

    use super::WeightRegistry;

    fn sum_of_weights(registry: &WeightRegistry) -> u32 {
        registry
            .entries()
            .iter()
            .map(|e| e.target_weight)
            .sum()
    }

    #[test]
    fn insert_then_update_keeps_position() {
        let env = Env::default();
        let mut registry = WeightRegistry::new(&env);
        let m1 = Address::generate(&env);
        let m2 = Address::generate(&env);

        assert_eq!(registry.set_weight(&env, &m1, 3000), Ok(0));
        assert_eq!(registry.set_weight(&env, &m2, 2000), Ok(0));
        assert_eq!(registry.total_weight(), 5000);

        assert_eq!(registry.set_weight(&env, &m1, 4000), Ok(3000));
        assert_eq!(registry.total_weight(), 6000);
        assert_eq!(registry.len(), 2);

        let first = registry.entries().get(0).unwrap();
        assert_eq!(first.market, m1);
        assert_eq!(first.target_weight, 4000);
        assert_eq!(first.realized_weight, 4000);
        assert_eq!(sum_of_weights(&registry), registry.total_weight());
    }

    #[test]
    fn zero_weight_rejected() {
        let env = Env::default();
        let mut registry = WeightRegistry::new(&env);
        let market = Address::generate(&env);

        assert_eq!(registry.set_weight(&env, &market, 0), Err(ErrorCode::InvalidWeight));
        assert_eq!(registry.set_weight(&env, &market, 10_001), Err(ErrorCode::InvalidWeight));
        assert!(registry.is_empty());
        assert_eq!(registry.total_weight(), 0);
    }

    #[test]
    fn remove_shifts_and_reindexes() {
        let env = Env::default();
        let mut registry = WeightRegistry::new(&env);
        let m1 = Address::generate(&env);
        let m2 = Address::generate(&env);
        let m3 = Address::generate(&env);

        registry.set_weight(&env, &m1, 1000).unwrap();
        registry.set_weight(&env, &m2, 2000).unwrap();
        registry.set_weight(&env, &m3, 3000).unwrap();

        let removed = registry.remove(&env, &m1).unwrap();
        assert_eq!(removed.target_weight, 1000);
        assert_eq!(registry.total_weight(), 5000);
        assert!(!registry.contains(&m1));
        assert_eq!(registry.get(&m1), None);

        assert_eq!(registry.position(&env, &m2), Ok(0));
        assert_eq!(registry.position(&env, &m3), Ok(1));
        assert_eq!(registry.entries().get(1).unwrap().market, m3);
        assert_eq!(sum_of_weights(&registry), registry.total_weight());
    }

    #[test]
    fn remove_absent_market() {
        let env = Env::default();
        let mut registry = WeightRegistry::new(&env);
        let market = Address::generate(&env);

        assert_eq!(registry.remove(&env, &market), Err(ErrorCode::MarketNotFound));
    }

    #[test]
    fn update_sequence_matches_entry_sum() {
        let env = Env::default();
        let mut registry = WeightRegistry::new(&env);
        let markets = [Address::generate(&env), Address::generate(&env), Address::generate(&env)];

        let ops: [(usize, u32); 6] = [(0, 500), (1, 2500), (0, 1500), (2, 100), (1, 10_000), (2, 7)];
        for (i, weight) in ops {
            registry.set_weight(&env, &markets[i], weight).unwrap();
            assert_eq!(sum_of_weights(&registry), registry.total_weight());
        }

        registry.remove(&env, &markets[1]).unwrap();
        assert_eq!(registry.total_weight(), 1507);
        assert_eq!(sum_of_weights(&registry), registry.total_weight());
    }

    #[test]
    fn realized_weight_tracks_rebalance() {
        let env = Env::default();
        let mut registry = WeightRegistry::new(&env);
        let market = Address::generate(&env);

        registry.set_weight(&env, &market, 5000).unwrap();
        registry.set_realized_weight(0, 4761).unwrap();

        let entry = registry.get(&market).unwrap();
        assert_eq!(entry.target_weight, 5000);
        assert_eq!(entry.realized_weight, 4761);
        assert_eq!(registry.set_realized_weight(1, 1), Err(ErrorCode::MarketNotFound));
    }
}
