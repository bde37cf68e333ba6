use std::time::Duration;

use chrono::NaiveDate;
use merge_arena_core::{
    catalog::QuestMetric, AchievementId, ActionError, ChallengeKind, Command, Event, HeroClassId,
    ItemKind, ItemStack, LootBoxKind, LootReward, QuestId, RunMode, ShopItem, UpgradeTrack,
};
use merge_arena_world::{apply, query, Profile, World};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn rejection(events: &[Event]) -> Option<ActionError> {
    events.iter().find_map(|event| match event {
        Event::ActionRejected { reason, .. } => Some(reason.clone()),
        _ => None,
    })
}

fn rich_profile() -> Profile {
    let mut profile = Profile::default();
    profile.gold = 100_000;
    profile.gems = 1_000;
    profile
}

#[test]
fn sell_pays_by_level_and_rejects_empty_slots() {
    let mut profile = Profile::default();
    let grid = &mut profile
        .heroes
        .get_mut(&HeroClassId::Warrior)
        .expect("warrior")
        .grid;
    let _ = grid.insert(ItemStack::new(ItemKind::CritGem, 3));
    let mut world = World::from_profile(profile, 3);

    let events = run(&mut world, Command::Sell { class: HeroClassId::Warrior, index: 0 });
    assert!(events.contains(&Event::ItemSold {
        class: HeroClassId::Warrior,
        slot: 0,
        price: 35,
    }));
    assert_eq!(query::profile(&world).gold, 135);

    let events = run(&mut world, Command::Sell { class: HeroClassId::Warrior, index: 0 });
    assert_eq!(rejection(&events), Some(ActionError::InvalidReference("item")));
    assert_eq!(query::profile(&world).gold, 135);
}

#[test]
fn upgrades_cost_gold_and_raise_stats() {
    let mut world = World::from_profile(rich_profile(), 3);
    let base = query::hero_stats(&world, HeroClassId::Warrior).expect("warrior").attack;

    let events = run(&mut world, Command::PurchaseUpgrade { track: UpgradeTrack::Attack });
    assert!(events.contains(&Event::UpgradePurchased {
        track: UpgradeTrack::Attack,
        level: 1,
    }));
    assert_eq!(query::profile(&world).gold, 100_000 - 100);
    let _ = run(&mut world, Command::PurchaseUpgrade { track: UpgradeTrack::Attack });
    assert_eq!(query::profile(&world).gold, 100_000 - 100 - 150);

    let attack = query::hero_stats(&world, HeroClassId::Warrior).expect("warrior").attack;
    assert!((attack - base * 1.1).abs() < 1e-9, "attack was {attack}");

    let mut world = World::with_seed(3);
    let events = run(&mut world, Command::PurchaseUpgrade { track: UpgradeTrack::GoldBonus });
    assert_eq!(
        rejection(&events),
        Some(ActionError::InsufficientFunds {
            currency: merge_arena_core::Currency::Gold,
            required: 250,
            available: 100,
        })
    );
}

#[test]
fn shop_item_purchase_checks_grid_before_spending() {
    let mut profile = rich_profile();
    let grid = &mut profile
        .heroes
        .get_mut(&HeroClassId::Warrior)
        .expect("warrior")
        .grid;
    while grid.insert(ItemStack::new(ItemKind::SwordGem, 1)).is_some() {}
    let mut world = World::from_profile(profile, 5);

    let events = run(&mut world, Command::BuyShopItem { item: ShopItem::RandomItem });
    assert_eq!(rejection(&events), Some(ActionError::GridFull));
    assert_eq!(query::profile(&world).gems, 1_000);

    let events = run(&mut world, Command::BuyShopItem { item: ShopItem::GoldPack });
    assert!(rejection(&events).is_none());
    assert_eq!(query::profile(&world).gems, 990);
    assert_eq!(query::profile(&world).gold, 101_000);

    let _ = run(&mut world, Command::Sell { class: HeroClassId::Warrior, index: 4 });
    let events = run(&mut world, Command::BuyShopItem { item: ShopItem::LegendaryItem });
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ItemGranted { slot: 4, item: ItemStack { level: 5, .. }, .. }
    )));
    assert_eq!(query::profile(&world).gems, 910);
}

#[test]
fn selecting_a_locked_class_is_rejected() {
    let mut world = World::with_seed(1);
    let events = run(&mut world, Command::SelectHeroClass { class: HeroClassId::Mage });
    assert_eq!(rejection(&events), Some(ActionError::Locked { stage: 15 }));
    assert_eq!(query::selected_class(&world), HeroClassId::Warrior);
}

#[test]
fn daily_reward_cycle_and_streak_reset() {
    let mut world = World::with_seed(2);
    let events = run(&mut world, Command::ClaimDailyReward { today: date(2024, 5, 1) });
    assert!(events.contains(&Event::DailyRewardClaimed {
        day: 1,
        gold: 500,
        gems: 5,
    }));
    assert_eq!(query::profile(&world).gold, 600);

    let events = run(&mut world, Command::ClaimDailyReward { today: date(2024, 5, 1) });
    assert_eq!(rejection(&events), Some(ActionError::AlreadyClaimed));

    let events = run(&mut world, Command::ClaimDailyReward { today: date(2024, 5, 2) });
    assert!(events.iter().any(|event| matches!(event, Event::DailyRewardClaimed { day: 2, .. })));

    let events = run(&mut world, Command::ClaimDailyReward { today: date(2024, 5, 9) });
    assert!(events.iter().any(|event| matches!(event, Event::DailyRewardClaimed { day: 1, .. })));
}

#[test]
fn seventh_day_grants_an_item() {
    let mut world = World::with_seed(2);
    for day in 1..=7 {
        let _ = run(&mut world, Command::ClaimDailyReward { today: date(2024, 6, day) });
    }
    let grid = query::profile(&world).grid(HeroClassId::Warrior).expect("grid");
    assert_eq!(grid.get(0).map(|item| item.level), Some(3));
    assert_eq!(query::profile(&world).daily.streak, 7);
}

#[test]
fn quests_claim_once_after_completion() {
    let mut profile = rich_profile();
    profile.gems = 0;
    let mut world = World::from_profile(profile, 8);
    let _ = run(&mut world, Command::RefreshQuests { today: date(2024, 5, 1) });

    let events = run(&mut world, Command::ClaimQuest { quest: QuestId::DailySummons });
    assert_eq!(rejection(&events), Some(ActionError::Incomplete));

    for _ in 0..5 {
        let _ = run(&mut world, Command::Summon { class: HeroClassId::Warrior });
    }
    assert_eq!(query::profile(&world).quests.progress(QuestId::DailySummons), 5);
    let gold = query::profile(&world).gold;

    let events = run(&mut world, Command::ClaimQuest { quest: QuestId::DailySummons });
    assert!(events.contains(&Event::QuestClaimed { quest: QuestId::DailySummons }));
    assert_eq!(query::profile(&world).gold, gold + 200);
    assert_eq!(query::profile(&world).gems, 2);

    let events = run(&mut world, Command::ClaimQuest { quest: QuestId::DailySummons });
    assert_eq!(rejection(&events), Some(ActionError::AlreadyClaimed));

    let _ = run(&mut world, Command::RefreshQuests { today: date(2024, 5, 2) });
    assert_eq!(query::profile(&world).quests.progress(QuestId::DailySummons), 0);
    assert_eq!(
        query::profile(&world).quests.weekly.get(&QuestMetric::Summons),
        Some(&5)
    );
}

#[test]
fn loot_box_opening_consumes_inventory() {
    let mut profile = Profile::default();
    let _ = profile.loot_boxes.insert(LootBoxKind::Legendary, 2);
    let mut world = World::from_profile(profile, 21);

    for _ in 0..2 {
        let events = run(&mut world, Command::OpenLootBox { kind: LootBoxKind::Legendary });
        let reward = events.iter().find_map(|event| match event {
            Event::LootBoxOpened { reward, .. } => Some(*reward),
            _ => None,
        });
        match reward.expect("box opened") {
            LootReward::Gold(gold) => assert!((5_000..=15_000).contains(&gold)),
            LootReward::Gems(gems) => assert!((30..=100).contains(&gems)),
            LootReward::Item { item, .. } => assert!((5..=7).contains(&item.level)),
            LootReward::Converted { gold } => panic!("grid had room, got {gold} gold"),
        }
    }
    assert_eq!(query::profile(&world).loot_box_count(LootBoxKind::Legendary), 0);

    let events = run(&mut world, Command::OpenLootBox { kind: LootBoxKind::Legendary });
    assert_eq!(rejection(&events), Some(ActionError::InvalidReference("loot box")));
}

#[test]
fn offline_rewards_are_capped_and_thresholded() {
    let mut world = World::with_seed(4);
    let events = run(&mut world, Command::GrantOfflineRewards { elapsed: Duration::from_secs(59) });
    assert!(events.is_empty());
    assert_eq!(query::profile(&world).gold, 100);

    let events = run(
        &mut world,
        Command::GrantOfflineRewards { elapsed: Duration::from_secs(48 * 3_600) },
    );
    let report = events
        .iter()
        .find_map(|event| match event {
            Event::OfflineRewardsGranted { report } => Some(*report),
            _ => None,
        })
        .expect("offline report");
    assert_eq!(report.credited, Duration::from_secs(12 * 3_600));
    assert_eq!(report.gold, 15 * 720);
    assert_eq!(report.kills, 4_320);
    assert!((12..=36).contains(&report.gems), "gems {}", report.gems);
    assert_eq!(query::profile(&world).gold, 100 + 15 * 720);
    assert_eq!(query::profile(&world).stats.kills, 4_320);
}

#[test]
fn achievements_unlock_once_on_tick() {
    let mut profile = Profile::default();
    profile.stats.kills = 150;
    let mut world = World::from_profile(profile, 6);

    let events = run(&mut world, Command::Tick { dt: Duration::from_millis(16) });
    let unlocked: Vec<AchievementId> = events
        .iter()
        .filter_map(|event| match event {
            Event::AchievementUnlocked { achievement, .. } => Some(*achievement),
            _ => None,
        })
        .collect();
    assert_eq!(unlocked, vec![AchievementId::FirstKill, AchievementId::Killer100]);
    assert_eq!(query::profile(&world).gems, 25);

    let events = run(&mut world, Command::Tick { dt: Duration::from_millis(16) });
    assert!(!events.iter().any(|event| matches!(event, Event::AchievementUnlocked { .. })));
}

#[test]
fn time_attack_ends_after_three_minutes() {
    let mut world = World::with_seed(9);
    let mode = RunMode::Challenge(ChallengeKind::TimeAttack);
    let events = run(&mut world, Command::SetRunMode { mode });
    assert!(events.contains(&Event::ChallengeStarted { kind: ChallengeKind::TimeAttack }));
    assert_eq!(query::run_mode(&world), mode);

    let events = run(&mut world, Command::Tick { dt: Duration::from_secs(180) });
    assert!(events.contains(&Event::ChallengeEnded {
        kind: ChallengeKind::TimeAttack,
        score: 0,
        gold: 0,
        gems: 0,
        record: false,
    }));
    assert!(events.contains(&Event::RunModeChanged { mode: RunMode::Campaign }));
    assert!(query::challenge(&world).is_none());
}

#[test]
fn play_time_feeds_weekly_minutes() {
    let mut world = World::with_seed(9);
    for _ in 0..3 {
        let _ = run(&mut world, Command::RecordPlayTime { elapsed: Duration::from_secs(50) });
    }
    assert_eq!(query::profile(&world).stats.play_time, Duration::from_secs(150));
    assert_eq!(query::profile(&world).quests.progress(QuestId::WeeklyPlaytime), 2);
}

#[test]
fn simulation_ticks_do_not_count_as_play_time() {
    let mut world = World::with_seed(9);
    let _ = run(&mut world, Command::Tick { dt: Duration::from_secs(90) });
    assert_eq!(query::profile(&world).stats.play_time, Duration::ZERO);
    assert_eq!(query::profile(&world).quests.progress(QuestId::WeeklyPlaytime), 0);
}
