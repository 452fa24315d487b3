// Session tests: out-of-page singletons.

use adslot_core::{
    Config,
    domain::{AnchorPosition, OutOfPageFormat, OutOfPageKind},
    model::MetricKind,
    workflow::out_of_page::OutOfPageController,
};
use adslot_testkit::{SdkCall, TestEnv, standard_config};

#[test]
fn each_kind_is_defined_once_per_session() {
    let env = TestEnv::booted(standard_config());

    let first = OutOfPageController::new(&env.session);
    assert!(first.ensure_defined(OutOfPageKind::Interstitial));
    assert!(!first.ensure_defined(OutOfPageKind::Interstitial));

    // a later route mounts the owning component again
    let second = OutOfPageController::new(&env.session);
    assert!(!second.ensure_defined(OutOfPageKind::Interstitial));

    let out_of_page = env.sdk.live_out_of_page();
    assert_eq!(out_of_page.len(), 1);
    assert_eq!(
        env.out_of_page_slots(),
        vec![(OutOfPageKind::Interstitial, out_of_page[0])]
    );
    assert_eq!(
        env.sdk.count(|c| matches!(c, SdkCall::DefineOutOfPage { .. })),
        1
    );
    assert_eq!(env.sdk.count(|c| matches!(c, SdkCall::Display(_))), 1);
    assert!(env.boot_state().out_of_page().interstitial_shown);
    assert!(!env.boot_state().out_of_page().anchor_shown);
}

#[test]
fn anchor_uses_the_configured_position() {
    let env = TestEnv::booted(standard_config());

    assert!(OutOfPageController::new(&env.session).ensure_defined(OutOfPageKind::Anchor));

    assert!(env.sdk.calls().iter().any(|c| matches!(
        c,
        SdkCall::DefineOutOfPage {
            format: OutOfPageFormat::Anchor(AnchorPosition::Bottom),
            handle: Some(_),
            ..
        }
    )));
    assert_eq!(env.metrics().get(MetricKind::OutOfPageDisplayed), 1);
}

#[test]
fn requests_before_boot_are_deferred_and_still_singleton() {
    let env = TestEnv::builder(standard_config()).build();
    let controller = OutOfPageController::new(&env.session);

    assert!(controller.ensure_defined(OutOfPageKind::Anchor));
    assert!(!controller.ensure_defined(OutOfPageKind::Anchor));
    assert!(env.sdk.calls().is_empty());

    env.boot_to_ready();

    assert_eq!(env.sdk.live_out_of_page().len(), 1);
}

#[test]
fn declined_format_is_not_retried() {
    let env = TestEnv::booted(standard_config());
    env.sdk.decline_out_of_page();
    let controller = OutOfPageController::new(&env.session);

    assert!(controller.ensure_defined(OutOfPageKind::Interstitial));
    assert!(!controller.ensure_defined(OutOfPageKind::Interstitial));

    assert!(env.sdk.live_out_of_page().is_empty());
    assert!(env.out_of_page_slots().is_empty());
    assert_eq!(env.metrics().get(MetricKind::OutOfPageDeclined), 1);
    assert_eq!(
        env.sdk.count(|c| matches!(c, SdkCall::DefineOutOfPage { .. })),
        1
    );
}

#[test]
fn unconfigured_kind_is_skipped_without_claiming_the_flag() {
    let config = Config::from_toml(
        r#"
        [out_of_page]
        interstitial = "/2233/site/interstitial"
        "#,
    )
    .expect("valid config");
    let env = TestEnv::booted(config);

    assert!(!OutOfPageController::new(&env.session).ensure_defined(OutOfPageKind::Anchor));
    assert!(!env.boot_state().out_of_page().anchor_shown);
    assert!(env.sdk.live_out_of_page().is_empty());
}

#[test]
fn attach_failure_destroys_the_slot() {
    let env = TestEnv::booted(standard_config());
    env.sdk.fail("add_service");

    assert!(OutOfPageController::new(&env.session).ensure_defined(OutOfPageKind::Interstitial));

    assert!(env.sdk.live_out_of_page().is_empty());
    assert!(env.out_of_page_slots().is_empty());
    assert_eq!(env.sdk.count(|c| matches!(c, SdkCall::Destroy(_))), 1);
    assert_eq!(env.metrics().get(MetricKind::CommandFailed), 1);
    assert_eq!(env.metrics().get(MetricKind::OutOfPageDisplayed), 0);
}

#[test]
fn display_failure_still_records_the_live_slot() {
    let env = TestEnv::booted(standard_config());
    env.sdk.fail("display");

    OutOfPageController::new(&env.session).ensure_defined(OutOfPageKind::Anchor);

    let live = env.sdk.live_out_of_page();
    assert_eq!(live.len(), 1);
    assert_eq!(env.out_of_page_slots(), vec![(OutOfPageKind::Anchor, live[0])]);
    assert_eq!(env.metrics().get(MetricKind::OutOfPageDisplayed), 0);
}
