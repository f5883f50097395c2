//! Host behaviour against an in-process remote collection.

use std::sync::Arc;

use listy_client::{Host, MemoryCollection, RenderedList};
use listy_engine::{City, DialogOutcome, Write};
use tokio::sync::mpsc;

fn remote_with(cities: &[City]) -> Arc<MemoryCollection> {
    Arc::new(MemoryCollection::with_cities("Cities", cities))
}

fn subscribed_host(remote: &Arc<MemoryCollection>) -> (Host<MemoryCollection>, RenderedList) {
    let mut host = Host::new(Arc::clone(remote));
    let rows = RenderedList::new();
    host.attach_view(rows.clone());
    host.subscribe();
    host.pump_snapshots();
    (host, rows)
}

#[tokio::test]
async fn initial_snapshot_fills_the_list() {
    let remote = remote_with(&[City::new("Regina", "SK"), City::new("Calgary", "AB")]);
    let (host, rows) = subscribed_host(&remote);

    assert_eq!(rows.rows(), vec!["Calgary AB", "Regina SK"]);
    assert_eq!(rows.redraws(), 1);
    assert_eq!(host.mirror().len(), 2);
}

#[tokio::test]
async fn add_waits_for_the_snapshot() {
    let remote = remote_with(&[]);
    let (mut host, rows) = subscribed_host(&remote);

    host.dispatch(DialogOutcome::Add(City::new("Calgary", "AB")));
    let outcomes = host.flush_writes().await;
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));

    // Written remotely, but the list only moves on the snapshot.
    assert_eq!(remote.snapshot().len(), 1);
    assert!(host.mirror().is_empty());
    assert!(rows.rows().is_empty());

    assert_eq!(host.pump_snapshots(), 1);
    assert_eq!(rows.rows(), vec!["Calgary AB"]);
}

#[tokio::test]
async fn editing_the_province_is_one_set() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let (mut host, rows) = subscribed_host(&remote);

    let mut dialog = host.activate(0).expect("city at position 0");
    dialog.set_province("BC");
    host.dispatch(dialog.submit().unwrap());
    host.flush_writes().await;
    host.pump_snapshots();

    assert_eq!(
        remote.write_log(),
        vec![Write::set_city(&City::new("Calgary", "BC"))]
    );
    assert_eq!(rows.rows(), vec!["Calgary BC"]);
}

#[tokio::test]
async fn renaming_deletes_the_old_key() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let (mut host, rows) = subscribed_host(&remote);

    let mut dialog = host.activate(0).unwrap();
    dialog.set_name("Edmonton");
    host.dispatch(dialog.submit().unwrap());
    host.flush_writes().await;

    let log = remote.write_log();
    assert_eq!(log.len(), 2);
    assert!(log.contains(&Write::delete("Calgary")));
    assert!(log.contains(&Write::set_city(&City::new("Edmonton", "AB"))));

    host.pump_snapshots();
    assert_eq!(rows.rows(), vec!["Edmonton AB"]);
}

#[tokio::test]
async fn delete_removes_the_city() {
    let remote = remote_with(&[City::new("Calgary", "AB"), City::new("Regina", "SK")]);
    let (mut host, rows) = subscribed_host(&remote);

    let mut dialog = host.activate(1).unwrap();
    assert!(dialog.can_delete());
    host.dispatch(dialog.delete().unwrap());
    host.flush_writes().await;
    host.pump_snapshots();

    assert_eq!(remote.write_log(), vec![Write::delete("Regina")]);
    assert_eq!(rows.rows(), vec!["Calgary AB"]);
}

#[tokio::test]
async fn failed_writes_leave_the_list_alone() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let (mut host, rows) = subscribed_host(&remote);
    remote.fail_writes(Some("backend unavailable"));

    host.dispatch(DialogOutcome::Add(City::new("Regina", "SK")));
    let outcomes = host.flush_writes().await;

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_ok());
    assert_eq!(host.pump_snapshots(), 0);
    assert_eq!(rows.rows(), vec!["Calgary AB"]);
}

#[tokio::test]
async fn listener_errors_do_not_redraw() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let (mut host, rows) = subscribed_host(&remote);

    remote.emit_listener_error("permission denied");
    assert_eq!(host.pump_snapshots(), 1);
    assert_eq!(rows.redraws(), 1);
    assert_eq!(rows.rows(), vec!["Calgary AB"]);

    // The listener survives the error.
    host.dispatch(DialogOutcome::Add(City::new("Regina", "SK")));
    host.flush_writes().await;
    host.pump_snapshots();
    assert_eq!(rows.rows(), vec!["Calgary AB", "Regina SK"]);
}

#[tokio::test]
async fn activation_outside_the_list_opens_nothing() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let (host, _rows) = subscribed_host(&remote);

    assert!(host.activate(0).is_some());
    assert!(host.activate(1).is_none());
    assert!(!host.open_create_dialog().can_delete());
}

#[tokio::test]
async fn invalid_names_never_reach_the_remote() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let (mut host, _rows) = subscribed_host(&remote);

    let mut dialog = host.activate(0).unwrap();
    dialog.set_name("Calgary/North");
    assert!(dialog.submit().is_err());
    assert!(!dialog.is_dismissed());

    host.dispatch(DialogOutcome::Update {
        city: City::new("Calgary", "AB"),
        new_name: "..".to_string(),
        new_province: "AB".to_string(),
    });
    assert!(host.flush_writes().await.is_empty());
    assert!(remote.write_log().is_empty());
}

#[tokio::test]
async fn run_processes_intents_until_closed() {
    let remote = remote_with(&[City::new("Calgary", "AB")]);
    let mut host = Host::new(Arc::clone(&remote));
    let rows = RenderedList::new();
    host.attach_view(rows.clone());

    let (intents, receiver) = mpsc::unbounded_channel();
    intents
        .send(DialogOutcome::Add(City::new("Regina", "SK")))
        .unwrap();
    intents
        .send(DialogOutcome::Update {
            city: City::new("Calgary", "AB"),
            new_name: "Edmonton".to_string(),
            new_province: "AB".to_string(),
        })
        .unwrap();
    drop(intents);

    host.run(receiver).await;

    assert!(host.is_subscribed());
    assert_eq!(host.in_flight(), 0);
    assert_eq!(rows.rows(), vec!["Edmonton AB", "Regina SK"]);
    assert_eq!(remote.write_log().len(), 3);
}
