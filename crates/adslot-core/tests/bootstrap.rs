// Session tests: bootstrap and consent, driven through testkit fakes.

use adslot_core::{
    Config,
    log::{LogBuffer, Topic},
    model::MetricKind,
    ops::QueueState,
    policy::consent::PrivacyMode,
    workflow::slot::SlotController,
};
use adslot_testkit::{FakeCmp, SdkCall, TestEnv, standard_config};

const SCRIPT: &str = "https://ads.example.test/tag.js";

#[test]
fn boot_runs_once_however_many_callers() {
    let env = TestEnv::builder(standard_config()).build();

    assert!(env.boot_once());
    assert!(!env.boot_once());
    let _top = SlotController::mount(&env.session, "article_top", "ad-top").expect("mount");
    let _side = SlotController::mount(&env.session, "sidebar", "ad-side").expect("mount");

    env.host.run_until_stalled();
    env.host.load_scripts();
    env.host.settle();

    assert_eq!(env.host.injected_scripts(), vec![SCRIPT.to_string()]);
    assert_eq!(env.sdk.count(|c| matches!(c, SdkCall::EnableServices)), 1);
    assert_eq!(env.sdk.count(|c| matches!(c, SdkCall::Configure(_))), 1);
    assert_eq!(env.metrics().get(MetricKind::ScriptInjected), 1);
    assert_eq!(env.queue().state(), QueueState::Ready);
}

#[test]
fn present_script_is_not_injected_again() {
    let env = TestEnv::builder(standard_config())
        .with_script_present()
        .build();

    env.boot_once();
    env.host.settle();

    assert!(env.host.injected_scripts().is_empty());
    assert!(env.sdk.services_enabled());
    assert_eq!(env.metrics().get(MetricKind::ScriptInjected), 0);
}

#[test]
fn services_are_enabled_after_privacy_and_policy() {
    let env = TestEnv::booted(standard_config());

    let calls = env.sdk.calls();
    let position = |pred: fn(&SdkCall) -> bool| calls.iter().position(pred).expect("call made");

    let privacy = position(|c| matches!(c, SdkCall::SetPrivacy(_)));
    let configure = position(|c| matches!(c, SdkCall::Configure(_)));
    let enable = position(|c| matches!(c, SdkCall::EnableServices));
    assert!(privacy < configure && configure < enable);
}

#[test]
fn commands_queued_before_boot_run_in_order_after_it() {
    let env = TestEnv::builder(standard_config()).build();

    let _top = SlotController::mount(&env.session, "article_top", "ad-top").expect("mount");
    let _side = SlotController::mount(&env.session, "sidebar", "ad-side").expect("mount");
    assert_eq!(env.queue().pending_len(), 2);
    assert!(env.sdk.calls().is_empty());

    env.host.run_until_stalled();
    env.host.load_scripts();

    let defined: Vec<String> = env
        .sdk
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            SdkCall::DefineSlot { container_id, .. } => Some(container_id),
            _ => None,
        })
        .collect();
    assert_eq!(defined, vec!["ad-top".to_string(), "ad-side".to_string()]);
}

#[test]
fn no_cmp_means_personalized_ads() {
    let env = TestEnv::booted(standard_config());

    assert_eq!(env.privacy_mode(), Some(PrivacyMode::Personalized));
    let privacy = env.sdk.privacy().expect("privacy pushed");
    assert!(!privacy.non_personalized_ads);
    assert!(!privacy.limited_ads);
}

#[test]
fn silent_cmp_fails_safe_after_the_timeout() {
    let env = TestEnv::builder(standard_config())
        .with_cmp(FakeCmp::silent())
        .build();

    env.boot_once();
    env.host.run_until_stalled();
    env.host.load_scripts();
    assert_eq!(env.cmp().pending_requests(), 1);

    env.host.advance_ms(1_499);
    assert!(!env.sdk.services_enabled());
    assert_eq!(env.queue().state(), QueueState::Pending);

    env.host.advance_ms(1);
    assert!(env.sdk.services_enabled());
    assert_eq!(env.privacy_mode(), Some(PrivacyMode::Restricted));

    let privacy = env.sdk.privacy().expect("privacy pushed");
    assert!(privacy.non_personalized_ads);
    assert!(privacy.limited_ads);
    assert_eq!(env.metrics().get(MetricKind::ConsentTimeout), 1);
    assert!(
        LogBuffer::entries_for(Topic::Consent)
            .iter()
            .any(|e| e.message.contains("after 1500ms"))
    );
}

#[test]
fn prompt_cmp_answer_wins_and_clears_the_timer() {
    let env = TestEnv::builder(standard_config())
        .with_cmp(FakeCmp::answering(FakeCmp::consented()))
        .build();

    env.boot_to_ready();

    assert_eq!(env.privacy_mode(), Some(PrivacyMode::Personalized));
    assert_eq!(env.host.pending_timers(), 0);
    assert_eq!(env.metrics().get(MetricKind::ConsentTimeout), 0);
}

#[test]
fn eu_visitor_without_consent_gets_restricted_ads() {
    let env = TestEnv::builder(standard_config())
        .with_cmp(FakeCmp::answering(FakeCmp::refused()))
        .build();

    env.boot_to_ready();

    assert_eq!(env.privacy_mode(), Some(PrivacyMode::Restricted));
    assert!(env.sdk.privacy().expect("privacy pushed").non_personalized_ads);
}

#[test]
fn broken_cmp_fails_safe_without_waiting() {
    let env = TestEnv::builder(standard_config())
        .with_cmp(FakeCmp::broken())
        .build();

    env.boot_to_ready();

    assert!(env.sdk.services_enabled());
    assert_eq!(env.privacy_mode(), Some(PrivacyMode::Restricted));
}

#[test]
fn consent_change_reapplies_privacy_and_refreshes_once() {
    let env = TestEnv::builder(standard_config())
        .with_cmp(FakeCmp::answering(FakeCmp::refused()))
        .build();
    env.boot_to_ready();
    assert_eq!(env.cmp().listener_count(), 1);

    let side = SlotController::mount(&env.session, "sidebar", "ad-side").expect("mount");
    let handle = side.phase().handle().expect("defined");

    env.cmp().emit(FakeCmp::consented());
    env.cmp().emit(FakeCmp::consented());

    assert_eq!(env.privacy_mode(), Some(PrivacyMode::Personalized));
    assert!(!env.sdk.privacy().expect("privacy pushed").non_personalized_ads);
    assert_eq!(env.sdk.refresh_batches(), vec![vec![handle]]);
    assert_eq!(env.metrics().get(MetricKind::PrivacyApplied), 2);
}

#[test]
fn blocked_script_turns_every_command_into_a_no_op() {
    let env = TestEnv::builder(standard_config()).build();

    let side = SlotController::mount(&env.session, "sidebar", "ad-side").expect("mount");
    env.host.run_until_stalled();
    env.host.block_scripts();

    assert_eq!(env.queue().state(), QueueState::Failed);
    assert!(env.sdk.calls().is_empty());

    // later mounts and unmounts are accepted and dropped
    let top = SlotController::mount(&env.session, "article_top", "ad-top").expect("mount");
    drop(top);
    drop(side);

    assert!(env.sdk.calls().is_empty());
    assert_eq!(env.metrics().get(MetricKind::CommandDropped), 4);
}

#[test]
fn enable_services_failure_disables_ads() {
    let env = TestEnv::builder(standard_config()).build();
    env.sdk.fail("enable_services");

    env.boot_to_ready();

    assert_eq!(env.queue().state(), QueueState::Failed);
    assert_eq!(env.metrics().get(MetricKind::ServicesEnabled), 0);
}

#[test]
fn a_second_session_keeps_the_thread_log_capacity() {
    let small = Config::from_toml("[log]\nmax_entries = 2").expect("valid config");
    let large = Config::from_toml("[log]\nmax_entries = 500").expect("valid config");

    let _first = TestEnv::builder(small).build();
    let _second = TestEnv::builder(large).build();

    assert_eq!(LogBuffer::capacity(), 2);
}
