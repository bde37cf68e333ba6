//! Gold and gem sinks and sources driven by player requests.

use std::time::Duration;

use chrono::NaiveDate;
use log::info;
use merge_arena_core::{
    balance::{
        sell_price, summon_price, OFFLINE_BOX_CHANCE, OFFLINE_BOX_THRESHOLD, OFFLINE_CAP,
        OFFLINE_MINIMUM, SUMMON_COST_GROWTH,
    },
    catalog::{LootRoll, QuestMetric, ShopReward, DAILY_REWARDS},
    ActionError, Currency, Event, HeroClassId, ItemKind, ItemStack, LootBoxKind, LootReward,
    MergeOutcome, OfflineReport, QuestId, ShopItem, UpgradeTrack,
};
use rand::{seq::SliceRandom, Rng};

use crate::World;

const CONVERSION_GOLD_PER_LEVEL: u64 = 500;

impl World {
    pub(crate) fn summon(
        &mut self,
        class: HeroClassId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let cost = summon_price(self.profile.summon_cost);
        self.spend(Currency::Gold, cost, |world| {
            if !world.profile.is_unlocked(class) {
                return Err(ActionError::InvalidReference("class"));
            }
            match world.profile.grid(class) {
                Some(grid) if grid.first_empty().is_some() => Ok(()),
                _ => Err(ActionError::GridFull),
            }
        })?;

        let item = ItemStack::new(self.random_item_kind(), 1);
        let Some(slot) = self.profile.grid_mut(class).and_then(|grid| grid.insert(item)) else {
            return Err(ActionError::GridFull);
        };
        self.profile.summon_cost *= SUMMON_COST_GROWTH;
        self.profile.stats.summons = self.profile.stats.summons.saturating_add(1);
        self.profile.quests.record(QuestMetric::Summons, 1);
        self.refresh_hero_stats();
        out_events.push(Event::ItemSummoned {
            class,
            slot,
            item,
            cost,
        });
        Ok(())
    }

    pub(crate) fn merge(&mut self, class: HeroClassId, from: usize, to: usize, out_events: &mut Vec<Event>) {
        let Some(grid) = self.profile.grid_mut(class) else {
            return;
        };
        match grid.combine(from, to) {
            MergeOutcome::Merged(item) => {
                self.profile.stats.merges = self.profile.stats.merges.saturating_add(1);
                self.profile.quests.record(QuestMetric::Merges, 1);
                self.refresh_hero_stats();
                out_events.push(Event::MergePerformed {
                    class,
                    slot: to,
                    item,
                });
            }
            MergeOutcome::Swapped => out_events.push(Event::ItemsSwapped { class, from, to }),
            MergeOutcome::Ignored => {}
        }
    }

    pub(crate) fn auto_merge(&mut self, class: HeroClassId, out_events: &mut Vec<Event>) {
        let pair = self.profile.grid(class).and_then(|grid| grid.first_merge_pair());
        if let Some((from, to)) = pair {
            self.merge(class, from, to, out_events);
        }
    }

    pub(crate) fn sell(
        &mut self,
        class: HeroClassId,
        index: usize,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let Some(item) = self.profile.grid_mut(class).and_then(|grid| grid.take(index)) else {
            return Err(ActionError::InvalidReference("item"));
        };
        let price = sell_price(item.level);
        self.profile.gold = self.profile.gold.saturating_add(price);
        self.refresh_hero_stats();
        out_events.push(Event::ItemSold {
            class,
            slot: index,
            price,
        });
        Ok(())
    }

    pub(crate) fn purchase_upgrade(
        &mut self,
        track: UpgradeTrack,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let cost = track.cost(self.profile.upgrades.level(track));
        self.spend(Currency::Gold, cost, |_| Ok(()))?;
        let level = self.profile.upgrades.raise(track);
        self.refresh_hero_stats();
        out_events.push(Event::UpgradePurchased { track, level });
        Ok(())
    }

    pub(crate) fn buy_shop_item(
        &mut self,
        item: ShopItem,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let reward = item.reward();
        self.spend(Currency::Gems, item.gem_cost(), |world| match reward {
            ShopReward::Item { .. } if !world.selected_grid_has_room() => Err(ActionError::GridFull),
            _ => Ok(()),
        })?;

        match reward {
            ShopReward::Gold(gold) => self.profile.gold = self.profile.gold.saturating_add(gold),
            ShopReward::Item { level } => {
                let _ = self.grant_item(level, out_events);
            }
            ShopReward::SkillReset => self.cooldowns.clear(),
        }
        out_events.push(Event::ShopItemPurchased { item });
        Ok(())
    }

    pub(crate) fn open_loot_box(
        &mut self,
        kind: LootBoxKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        if self.profile.loot_box_count(kind) == 0 {
            return Err(ActionError::InvalidReference("loot box"));
        }
        let drops = kind.drops();
        let roll = drops
            .choose_weighted(&mut self.rng, |drop| drop.weight)
            .map_err(|_| ActionError::InvalidReference("loot table"))?
            .roll;
        if let Some(count) = self.profile.loot_boxes.get_mut(&kind) {
            *count -= 1;
        }

        let reward = match roll {
            LootRoll::Gold { min, max } => {
                let gold = self.rng.gen_range(min..=max);
                self.profile.gold = self.profile.gold.saturating_add(gold);
                LootReward::Gold(gold)
            }
            LootRoll::Gems { min, max } => {
                let gems = self.rng.gen_range(min..=max);
                self.profile.gems = self.profile.gems.saturating_add(gems);
                LootReward::Gems(gems)
            }
            LootRoll::Item { min, max } => {
                let level = self.rng.gen_range(min..=max);
                match self.grant_item(level, out_events) {
                    Some((class, slot, item)) => LootReward::Item { class, slot, item },
                    None => LootReward::Converted {
                        gold: self.convert_item(level),
                    },
                }
            }
        };
        out_events.push(Event::LootBoxOpened { kind, reward });
        Ok(())
    }

    pub(crate) fn claim_daily_reward(
        &mut self,
        today: NaiveDate,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let index = self.profile.daily.claim(today)?;
        let reward = DAILY_REWARDS[index];
        self.profile.gold = self.profile.gold.saturating_add(reward.gold);
        self.profile.gems = self.profile.gems.saturating_add(reward.gems);
        if let Some(level) = reward.item_level {
            if self.grant_item(level, out_events).is_none() {
                let _ = self.convert_item(level);
            }
        }
        out_events.push(Event::DailyRewardClaimed {
            day: index as u32 + 1,
            gold: reward.gold,
            gems: reward.gems,
        });
        Ok(())
    }

    pub(crate) fn claim_quest(
        &mut self,
        quest: QuestId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let definition = self.profile.quests.claim(quest)?;
        self.profile.gold = self.profile.gold.saturating_add(definition.gold);
        self.profile.gems = self.profile.gems.saturating_add(definition.gems);
        out_events.push(Event::QuestClaimed { quest });
        Ok(())
    }

    pub(crate) fn grant_offline_rewards(&mut self, elapsed: Duration, out_events: &mut Vec<Event>) {
        if elapsed < OFFLINE_MINIMUM {
            return;
        }
        let credited = elapsed.min(OFFLINE_CAP);
        let seconds = credited.as_secs();
        let minutes = seconds / 60;
        let hours = credited.as_secs_f64() / 3_600.0;

        let per_minute = u64::from(self.profile.stage) * 15 + (self.dps.published() * 0.1).floor() as u64;
        let gold = per_minute.saturating_mul(minutes);
        let gems = (hours * (1.0 + self.rng.gen::<f64>() * 2.0)).floor() as u64;
        let kills = seconds / 10;
        let loot_box = credited > OFFLINE_BOX_THRESHOLD && self.rng.gen_bool(OFFLINE_BOX_CHANCE);

        let profile = &mut self.profile;
        profile.gold = profile.gold.saturating_add(gold);
        profile.gems = profile.gems.saturating_add(gems);
        profile.stats.kills = profile.stats.kills.saturating_add(kills);
        profile.stats.gold_earned = profile.stats.gold_earned.saturating_add(gold);
        if loot_box {
            let count = profile.loot_boxes.entry(LootBoxKind::Common).or_insert(0);
            *count = count.saturating_add(1);
        }

        info!("granted {gold} gold and {gems} gems for {minutes} offline minutes");
        out_events.push(Event::OfflineRewardsGranted {
            report: OfflineReport {
                credited,
                gold,
                gems,
                kills,
                loot_box,
            },
        });
    }

    /// Charges `price` after `check` passes, leaving the profile untouched on failure.
    fn spend(
        &mut self,
        currency: Currency,
        price: u64,
        check: impl FnOnce(&Self) -> Result<(), ActionError>,
    ) -> Result<(), ActionError> {
        let balance = match currency {
            Currency::Gold => self.profile.gold,
            Currency::Gems => self.profile.gems,
        };
        if balance < price {
            return Err(ActionError::InsufficientFunds {
                currency,
                required: price,
                available: balance,
            });
        }
        check(self)?;
        match currency {
            Currency::Gold => self.profile.gold -= price,
            Currency::Gems => self.profile.gems -= price,
        }
        Ok(())
    }

    /// Places a random item into the selected class grid.
    fn grant_item(&mut self, level: u32, out_events: &mut Vec<Event>) -> Option<(HeroClassId, usize, ItemStack)> {
        let class = self.selected_class;
        let item = ItemStack::new(self.random_item_kind(), level);
        let slot = self.profile.grid_mut(class)?.insert(item)?;
        self.refresh_hero_stats();
        out_events.push(Event::ItemGranted { class, slot, item });
        Some((class, slot, item))
    }

    fn convert_item(&mut self, level: u32) -> u64 {
        let gold = u64::from(level) * CONVERSION_GOLD_PER_LEVEL;
        self.profile.gold = self.profile.gold.saturating_add(gold);
        gold
    }

    fn selected_grid_has_room(&self) -> bool {
        self.profile
            .grid(self.selected_class)
            .is_some_and(|grid| grid.first_empty().is_some())
    }

    fn random_item_kind(&mut self) -> ItemKind {
        ItemKind::ALL[self.rng.gen_range(0..ItemKind::ALL.len())]
    }
}
