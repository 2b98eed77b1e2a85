use core::cmp::Ordering;

use normal::{ error::{ ErrorCode, NormalResult }, math::safe_math::SafeMath, validate };
use soroban_sdk::{ log, Address, Env, Vec };

use crate::{
    controller::valuation,
    math::band::is_within_band,
    registry::WeightRegistry,
    storage::{ save_last_rebalance, save_registry, utils, Config, RebalancePhase, RebalanceRecord },
};

/// Applies one batch of keeper deltas.
///
/// Realized weights are staged on an in-memory copy of the registry and only
/// written back once both the per-market weight bands and the total asset band
/// hold. Any error leaves storage untouched and the host reverts the transfers.
pub struct Rebalancer<'a> {
    env: &'a Env,
    config: &'a Config,
    registry: WeightRegistry,
    phase: RebalancePhase,
}

impl<'a> Rebalancer<'a> {
    pub fn new(env: &'a Env, config: &'a Config, registry: WeightRegistry) -> Self {
        Rebalancer { env, config, registry, phase: RebalancePhase::Idle }
    }

    pub fn execute(&mut self, keeper: &Address, deltas: &Vec<i128>) -> NormalResult<RebalanceRecord> {
        match self.run(keeper, deltas) {
            Ok(record) => Ok(record),
            Err(error_code) => {
                self.transition(RebalancePhase::Aborted);
                log!(self.env, "Rebalance: aborted with error {}", error_code as u32);
                Err(error_code)
            }
        }
    }

    fn run(&mut self, keeper: &Address, deltas: &Vec<i128>) -> NormalResult<RebalanceRecord> {
        let env = self.env;
        let entries = self.registry.entries();

        validate!(
            env,
            deltas.len() == entries.len(),
            ErrorCode::DeltaLengthMismatch,
            "Rebalance: {} deltas submitted for {} markets",
            deltas.len(),
            entries.len()
        )?;

        self.transition(RebalancePhase::Executing);

        let prev_total_assets = valuation::total_assets(env, self.config, &self.registry)?;

        for (position, entry) in entries.iter().enumerate() {
            let delta = deltas.get(position as u32).ok_or(ErrorCode::DeltaLengthMismatch)?;
            self.move_assets(keeper, delta)?;

            let new_weight = valuation::current_weight(
                env,
                self.config,
                &self.registry,
                &entry.market,
                false
            )?;
            validate!(
                env,
                is_within_band(
                    env,
                    i128::from(new_weight),
                    i128::from(entry.realized_weight),
                    self.config.weight_threshold_bps
                )?,
                ErrorCode::WeightThresholdExceeded,
                "Rebalance: market {} weight moved from {} to {}",
                entry.market.clone(),
                entry.realized_weight,
                new_weight
            )?;

            self.registry.set_realized_weight(position as u32, new_weight)?;
        }

        let total_assets = valuation::total_assets(env, self.config, &self.registry)?;
        validate!(
            env,
            is_within_band(env, total_assets, prev_total_assets, self.config.asset_threshold_bps)?,
            ErrorCode::AssetThresholdExceeded,
            "Rebalance: total assets moved from {} to {}",
            prev_total_assets,
            total_assets
        )?;

        save_registry(env, &self.registry);
        self.transition(RebalancePhase::Committed);

        let record = RebalanceRecord {
            ts: env.ledger().timestamp(),
            keeper: keeper.clone(),
            prev_total_assets,
            total_assets,
            markets: entries.len(),
            phase: self.phase,
        };
        save_last_rebalance(env, &record);

        Ok(record)
    }

    fn move_assets(&self, keeper: &Address, delta: i128) -> NormalResult {
        let vault = self.env.current_contract_address();

        match delta.cmp(&0) {
            Ordering::Greater => {
                utils::transfer_token(self.env, &self.config.asset, keeper, &vault, delta)
            }
            Ordering::Less => {
                let amount = (0i128).safe_sub(delta, self.env)?;
                utils::transfer_token(self.env, &self.config.asset, &vault, keeper, amount)
            }
            Ordering::Equal => Ok(()),
        }
    }

    fn transition(&mut self, phase: RebalancePhase) {
        log!(self.env, "Rebalance: phase {} -> {}", self.phase as u32, phase as u32);
        self.phase = phase;
    }
}
