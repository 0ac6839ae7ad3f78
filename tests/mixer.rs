use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use coin_mixer::{Action, DepositKey, Mixer, MixerConfig, MixerError, Workers};

fn mixer() -> Mixer {
    Mixer::new(&MixerConfig::default())
}

/// Every coin id held anywhere, panicking if one shows up twice.
fn all_coin_ids(mixer: &Mixer) -> HashSet<u64> {
    let mut seen = HashSet::new();
    for account in mixer.list_balances().keys() {
        for (id, _) in mixer.inspect(account).unwrap() {
            assert!(seen.insert(id), "coin {} held by two accounts", id);
        }
    }
    seen
}

#[test]
fn test_sweep_then_withdraw_spreads_across_aliases() {
    let mixer = mixer();
    let user1 = mixer.create_user("user1").unwrap();
    let user2 = mixer.create_user("user2").unwrap();
    mixer.mint(&user1, 100).unwrap();
    mixer.mint(&user2, 20).unwrap();

    // Seed the pool with coins from someone else.
    let other = mixer.open_deposit(&user2, &["z"], 5).unwrap();
    assert_eq!(mixer.deposit(&user2, &other, 20).unwrap(), 20);

    let key = mixer.open_deposit(&user1, &["a", "b", "c"], 0).unwrap();
    assert_eq!(mixer.deposit(&user1, &key, 10).unwrap(), 10);

    mixer.sweep_now();
    assert_eq!(mixer.deposit_info(&key).unwrap().balance, 10);
    assert_eq!(mixer.list_balances()["[a,b,c]"], 0);

    mixer.withdraw_now();
    assert_eq!(mixer.deposit_info(&key).unwrap().balance, 0);

    let aliases = ["a", "b", "c"];
    let mut paid = 0;
    for (index, alias) in aliases.iter().enumerate() {
        for (id, history) in mixer.inspect(alias).unwrap() {
            assert_eq!(id as usize % 3, index);
            assert_ne!(history[0].target, "user1");
            assert_eq!(history.last().unwrap().action, Action::Transfer);
            paid += 1;
        }
    }
    assert_eq!(paid, 10);
}

#[test]
fn test_deposit_more_than_held_is_partial() {
    let mixer = mixer();
    let user = mixer.create_user("user").unwrap();
    mixer.mint(&user, 5).unwrap();
    let key = mixer.open_deposit(&user, &["a"], 0).unwrap();

    assert_eq!(mixer.deposit(&user, &key, 20), Ok(5));
    assert_eq!(mixer.list_balances()["user"], 0);
}

#[test]
fn test_overlapping_alias_sets_conflict() {
    let mixer = mixer();
    let alice = mixer.create_user("alice").unwrap();
    let bob = mixer.create_user("bob").unwrap();
    let key = mixer.open_deposit(&alice, &["a", "b"], 3).unwrap();

    assert_eq!(
        mixer.open_deposit(&bob, &["b", "c"], 0),
        Err(MixerError::AddressInUse("b".into()))
    );
    let info = mixer.deposit_info(&key).unwrap();
    assert_eq!(info.owner, "alice");
    assert_eq!(info.delay, 3);
    assert!(mixer.inspect("c").is_none());
}

#[test]
fn test_reregistration_is_idempotent() {
    let mixer = mixer();
    let alice = mixer.create_user("alice").unwrap();
    let first = mixer.open_deposit(&alice, &["x", "y"], 4).unwrap();
    let accounts = mixer.list_balances().len();
    let second = mixer.open_deposit(&alice, &["y", "x"], 0).unwrap();

    assert_eq!(first, second);
    assert_eq!(mixer.list_balances().len(), accounts);
    assert_eq!(mixer.deposit_info(&first).unwrap().delay, 0);
}

#[test]
fn test_delay_counts_withdrawal_passes() {
    let mixer = mixer();
    let alice = mixer.create_user("alice").unwrap();
    let bob = mixer.create_user("bob").unwrap();
    mixer.mint(&alice, 3).unwrap();
    mixer.mint(&bob, 3).unwrap();
    let seed = mixer.open_deposit(&bob, &["b"], 100).unwrap();
    mixer.deposit(&bob, &seed, 3).unwrap();
    let key = mixer.open_deposit(&alice, &["a"], 3).unwrap();
    mixer.deposit(&alice, &key, 3).unwrap();
    mixer.sweep_now();

    for _ in 0..3 {
        mixer.withdraw_now();
        assert_eq!(mixer.list_balances()["a"], 0);
    }
    mixer.withdraw_now();
    assert_eq!(mixer.list_balances()["a"], 3);
}

#[test]
fn test_unknown_deposit_key() {
    let mixer = mixer();
    let alice = mixer.create_user("alice").unwrap();
    mixer.mint(&alice, 1).unwrap();
    let key = DepositKey::from_aliases(["nope"]).unwrap();
    assert_eq!(
        mixer.deposit(&alice, &key, 1),
        Err(MixerError::UnknownDeposit("[nope]".into()))
    );
}

#[test]
fn test_concurrent_users_and_workers_conserve_coins() {
    let config = MixerConfig::with_time_unit(Duration::from_millis(1));
    let mixer = Mixer::new(&config);
    let workers = Workers::start(&mixer, &config).unwrap();

    let clients: Vec<_> = (0..4)
        .map(|n| {
            let mixer = mixer.clone();
            thread::spawn(move || {
                let user = mixer.create_user(&format!("user{}", n)).unwrap();
                let aliases = [format!("u{}a", n), format!("u{}b", n)];
                let key = mixer.open_deposit(&user, &aliases, 1).unwrap();
                for _ in 0..10 {
                    mixer.mint(&user, 5).unwrap();
                    mixer.deposit(&user, &key, 5).unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
                key
            })
        })
        .collect();
    let keys: Vec<DepositKey> = clients.into_iter().map(|c| c.join().unwrap()).collect();

    // Wait until the sweeper has emptied every combined account.
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let balances = mixer.list_balances();
        let pending: usize = keys.iter().map(|k| balances[&k.account_name()]).sum();
        if pending == 0 || Instant::now() > deadline {
            break;
        }
        assert_eq!(mixer.total_coins(), mixer.minted() as usize);
        thread::sleep(Duration::from_millis(5));
    }
    workers.shutdown();

    assert_eq!(mixer.minted(), 200);
    assert_eq!(mixer.total_coins(), 200);
    let ids = all_coin_ids(&mixer);
    assert_eq!(ids, (0..200).collect::<HashSet<u64>>());

    // Whatever is still in the pool is exactly what is owed.
    let owed: u64 = keys
        .iter()
        .map(|k| mixer.deposit_info(k).unwrap().balance)
        .sum();
    assert_eq!(owed as usize, mixer.list_balances()["house"]);

    for n in 0..4 {
        let owner = format!("user{}", n);
        for alias in [format!("u{}a", n), format!("u{}b", n)] {
            for (_, history) in mixer.inspect(&alias).unwrap() {
                assert_ne!(history[0].target, owner);
            }
        }
    }
}
