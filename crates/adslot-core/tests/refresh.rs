// Session tests: route-deduped soft refresh.

use adslot_core::{
    Config,
    domain::{OutOfPageKind, RouteKey, SlotHandle},
    host::PageEvent,
    model::MetricKind,
    workflow::{
        out_of_page::OutOfPageController, refresh::RouteRefreshCoordinator, slot::SlotController,
    },
};
use adslot_testkit::{TestEnv, standard_config};

fn mount_in_page(env: &TestEnv, containers: &[&str]) -> (Vec<SlotController>, Vec<SlotHandle>) {
    let slots: Vec<SlotController> = containers
        .iter()
        .map(|id| SlotController::mount(&env.session, "sidebar", *id).expect("mount"))
        .collect();
    let handles = slots
        .iter()
        .map(|slot| slot.phase().handle().expect("defined"))
        .collect();

    (slots, handles)
}

#[test]
fn route_change_refreshes_only_in_page_slots_in_one_batch() {
    let env = TestEnv::booted(standard_config());
    let (_slots, handles) = mount_in_page(&env, &["ad-1", "ad-2", "ad-3"]);
    let out_of_page = OutOfPageController::new(&env.session);
    out_of_page.ensure_defined(OutOfPageKind::Interstitial);
    out_of_page.ensure_defined(OutOfPageKind::Anchor);
    assert_eq!(env.sdk.live_out_of_page().len(), 2);

    let _coordinator = RouteRefreshCoordinator::attach(&env.session);
    env.navigation.navigate("/news", "");

    // deferred to idle
    assert!(env.sdk.refresh_batches().is_empty());
    env.host.run_idle();

    assert_eq!(env.sdk.refresh_batches(), vec![handles]);
    assert_eq!(env.metrics().get(MetricKind::RefreshIssued), 1);
}

#[test]
fn the_same_route_refreshes_once() {
    let env = TestEnv::booted(standard_config());
    let (_slots, _) = mount_in_page(&env, &["ad-1"]);
    let _coordinator = RouteRefreshCoordinator::attach(&env.session);

    env.navigation.navigate("/a", "");
    env.navigation.navigate("/a", "");
    env.host.run_idle();
    assert_eq!(env.sdk.refresh_batches().len(), 1);

    // the query is part of the route
    env.navigation.navigate("/a", "page=2");
    env.host.run_idle();
    assert_eq!(env.sdk.refresh_batches().len(), 2);
}

#[test]
fn the_route_seen_at_attach_is_the_baseline() {
    let env = TestEnv::builder(standard_config()).at("/home", "?ref=nav").build();
    env.boot_to_ready();
    let (_slots, _) = mount_in_page(&env, &["ad-1"]);
    let coordinator = RouteRefreshCoordinator::attach(&env.session);
    assert_eq!(coordinator.last_route().as_str(), "/home?ref=nav");

    assert!(!coordinator.on_route_changed(&RouteKey::new("/home", "ref=nav")));
    assert!(coordinator.on_route_changed(&RouteKey::new("/about", "")));
    assert!(!coordinator.on_route_changed(&RouteKey::new("/about", "")));

    env.host.run_idle();
    assert_eq!(env.sdk.refresh_batches().len(), 1);
}

#[test]
fn returning_to_the_page_refreshes() {
    let env = TestEnv::booted(standard_config());
    let (_slots, handles) = mount_in_page(&env, &["ad-1", "ad-2"]);
    let _coordinator = RouteRefreshCoordinator::attach(&env.session);

    env.host.emit(&PageEvent::VisibilityChanged { visible: false });
    env.host.emit(&PageEvent::PageShow { persisted: false });
    env.host.run_idle();
    assert!(env.sdk.refresh_batches().is_empty());

    env.host.emit(&PageEvent::VisibilityChanged { visible: true });
    env.host.run_idle();
    env.host.emit(&PageEvent::PageShow { persisted: true });
    env.host.run_idle();

    assert_eq!(env.sdk.refresh_batches(), vec![handles.clone(), handles]);
}

#[test]
fn page_triggers_can_be_switched_off() {
    let config = Config::from_toml(
        r"
        [refresh]
        on_visibility = false
        on_pageshow = false
        ",
    )
    .expect("valid config");
    let env = TestEnv::booted(config);

    let _coordinator = RouteRefreshCoordinator::attach(&env.session);

    assert_eq!(env.host.page_listener_count(), 0);
    assert_eq!(env.navigation.listener_count(), 1);
}

#[test]
fn refresh_with_no_in_page_slots_is_a_no_op() {
    let env = TestEnv::booted(standard_config());
    OutOfPageController::new(&env.session).ensure_defined(OutOfPageKind::Interstitial);
    let _coordinator = RouteRefreshCoordinator::attach(&env.session);

    env.navigation.navigate("/elsewhere", "");
    env.host.run_idle();

    assert!(env.sdk.refresh_batches().is_empty());
    assert_eq!(env.metrics().get(MetricKind::RefreshIssued), 0);
}

#[test]
fn slots_unmounted_before_idle_are_not_refreshed() {
    let env = TestEnv::booted(standard_config());
    let (slots, handles) = mount_in_page(&env, &["ad-1", "ad-2"]);
    let _coordinator = RouteRefreshCoordinator::attach(&env.session);

    env.navigation.navigate("/next", "");
    let mut slots = slots.into_iter();
    drop(slots.next());
    env.host.run_idle();

    assert_eq!(env.sdk.refresh_batches(), vec![vec![handles[1]]]);
}

#[test]
fn dropping_the_coordinator_unsubscribes() {
    let env = TestEnv::booted(standard_config());
    let coordinator = RouteRefreshCoordinator::attach(&env.session);
    assert_eq!(env.navigation.listener_count(), 1);
    assert_eq!(env.host.page_listener_count(), 1);

    drop(coordinator);

    assert_eq!(env.navigation.listener_count(), 0);
    assert_eq!(env.host.page_listener_count(), 0);
}
