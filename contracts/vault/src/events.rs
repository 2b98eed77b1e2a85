use soroban_sdk::{ Address, Env, Symbol };

pub struct VaultEvents {}

impl VaultEvents {
    /// Emitted once when the vault is configured
    ///
    /// - topics - `["initialize", manager: Address, keeper: Address]`
    /// - data - `[asset: Address, share_token: Address]`
    pub fn initialize(
        env: &Env,
        manager: Address,
        keeper: Address,
        asset: Address,
        share_token: Address
    ) {
        let topics = (Symbol::new(env, "initialize"), manager, keeper);
        env.events().publish(topics, (asset, share_token));
    }

    pub fn config_update(env: &Env, manager: Address) {
        let topics = (Symbol::new(env, "config_update"), manager);
        env.events().publish(topics, env.ledger().timestamp());
    }

    /// Emitted when a market is added or its target weight changes
    ///
    /// - topics - `["weight_update", market: Address]`
    /// - data - `[old_weight: u32, new_weight: u32]`
    pub fn weight_update(env: &Env, market: Address, old_weight: u32, new_weight: u32) {
        let topics = (Symbol::new(env, "weight_update"), market);
        env.events().publish(topics, (old_weight, new_weight));
    }

    pub fn weight_removal(env: &Env, market: Address, weight: u32) {
        let topics = (Symbol::new(env, "weight_removal"), market);
        env.events().publish(topics, weight);
    }

    /// Emitted after a rebalance commits
    ///
    /// - topics - `["rebalance", keeper: Address]`
    /// - data - `[total_assets: i128, success: bool]`
    pub fn rebalance(env: &Env, keeper: Address, total_assets: i128, success: bool) {
        let topics = (Symbol::new(env, "rebalance"), keeper);
        env.events().publish(topics, (total_assets, success));
    }

    pub fn deposit(env: &Env, owner: Address, assets: i128, shares: i128) {
        let topics = (Symbol::new(env, "deposit"), owner);
        env.events().publish(topics, (assets, shares));
    }

    pub fn withdraw(env: &Env, owner: Address, assets: i128, shares: i128) {
        let topics = (Symbol::new(env, "withdraw"), owner);
        env.events().publish(topics, (assets, shares));
    }
}
