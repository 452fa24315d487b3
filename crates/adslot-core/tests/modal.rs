// Session tests: frequency-capped modal.

use adslot_core::{
    Config, ErrorOrigin,
    host::FlagScope,
    workflow::modal::{CloseReason, FrequencyCappedModal, ModalPhase},
};
use adslot_testkit::{MemoryFlagStore, TestEnv, standard_config};
use std::{cell::RefCell, rc::Rc, sync::Arc};

const NEWSLETTER_FLAG: &str = "adslot:modal:newsletter";

fn mount(env: &TestEnv, id: &str) -> FrequencyCappedModal {
    FrequencyCappedModal::mount(&env.session, id).expect("modal configured")
}

#[test]
fn shows_after_the_delay() {
    let env = TestEnv::builder(standard_config()).build();
    let modal = mount(&env, "newsletter");

    env.host.advance_ms(3_999);
    assert_eq!(modal.phase(), ModalPhase::Idle);

    env.host.advance_ms(1);
    assert_eq!(modal.phase(), ModalPhase::Shown);
    assert!(env.flags.contains(FlagScope::Device, NEWSLETTER_FLAG));
}

#[test]
fn once_policy_survives_a_reload() {
    let flags = Rc::new(MemoryFlagStore::new());

    let first = TestEnv::builder(standard_config())
        .with_flags(Rc::clone(&flags))
        .build();
    let modal = mount(&first, "newsletter");
    first.host.advance_ms(4_000);
    first.host.press_key("Escape");
    assert_eq!(modal.phase(), ModalPhase::Dismissed(CloseReason::Escape));

    let second = TestEnv::builder(standard_config())
        .with_flags(Rc::clone(&flags))
        .build();
    let again = mount(&second, "newsletter");
    second.host.advance_ms(60_000);

    assert_eq!(again.phase(), ModalPhase::Idle);
    assert_eq!(second.host.pending_timers(), 0);
}

#[test]
fn once_policy_also_survives_the_browser_session() {
    let flags = Rc::new(MemoryFlagStore::new());
    let first = TestEnv::builder(standard_config())
        .with_flags(Rc::clone(&flags))
        .build();
    let _modal = mount(&first, "newsletter");
    first.host.advance_ms(4_000);

    flags.end_session();

    let second = TestEnv::builder(standard_config()).with_flags(flags).build();
    let again = mount(&second, "newsletter");
    second.host.advance_ms(4_000);
    assert_eq!(again.phase(), ModalPhase::Idle);
}

#[test]
fn session_policy_resets_with_the_browser_session() {
    let config = Config::from_toml(
        r"
        [modals.survey]
        delay_ms = 100
        ",
    )
    .expect("valid config");
    let flags = Rc::new(MemoryFlagStore::new());

    let first = TestEnv::builder(Arc::clone(&config))
        .with_flags(Rc::clone(&flags))
        .build();
    let _modal = mount(&first, "survey");
    first.host.advance_ms(100);
    assert!(flags.contains(FlagScope::Session, "adslot:modal:survey"));

    let reload = TestEnv::builder(Arc::clone(&config))
        .with_flags(Rc::clone(&flags))
        .build();
    let suppressed = mount(&reload, "survey");
    reload.host.advance_ms(100);
    assert_eq!(suppressed.phase(), ModalPhase::Idle);

    flags.end_session();
    let fresh = TestEnv::builder(config).with_flags(flags).build();
    let shown = mount(&fresh, "survey");
    fresh.host.advance_ms(100);
    assert_eq!(shown.phase(), ModalPhase::Shown);
}

#[test]
fn always_policy_ignores_history() {
    let env = TestEnv::builder(standard_config()).build();

    for _ in 0..2 {
        let modal = mount(&env, "promo");
        env.host.advance_ms(1_000);
        assert_eq!(modal.phase(), ModalPhase::Shown);
        assert!(modal.dismiss(CloseReason::Backdrop));
    }
}

#[test]
fn observer_sees_every_transition_with_its_reason() {
    let env = TestEnv::builder(standard_config()).build();
    let modal = mount(&env, "promo");
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        modal.observe(move |phase| seen.borrow_mut().push(phase));
    }

    env.host.advance_ms(1_000);
    assert!(modal.dismiss(CloseReason::CloseButton));
    assert!(!modal.dismiss(CloseReason::Backdrop));
    env.host.press_key("Escape");

    assert_eq!(
        *seen.borrow(),
        vec![
            ModalPhase::Shown,
            ModalPhase::Dismissed(CloseReason::CloseButton)
        ]
    );
}

#[test]
fn only_escape_closes_from_the_keyboard() {
    let env = TestEnv::builder(standard_config()).build();
    let modal = mount(&env, "promo");
    env.host.advance_ms(1_000);
    assert_eq!(env.host.page_listener_count(), 1);

    env.host.press_key("Enter");
    assert_eq!(modal.phase(), ModalPhase::Shown);

    env.host.press_key("Escape");
    assert_eq!(modal.phase(), ModalPhase::Dismissed(CloseReason::Escape));
    assert_eq!(env.host.page_listener_count(), 0);
}

#[test]
fn dismissing_an_idle_modal_does_nothing() {
    let env = TestEnv::builder(standard_config()).build();
    let modal = mount(&env, "promo");

    assert!(!modal.dismiss(CloseReason::CloseButton));
    assert_eq!(modal.phase(), ModalPhase::Idle);
}

#[test]
fn second_instance_stays_idle_once_the_first_has_shown() {
    let env = TestEnv::builder(standard_config()).build();
    let first = mount(&env, "newsletter");
    let second = mount(&env, "newsletter");

    env.host.advance_ms(4_000);

    assert_eq!(first.phase(), ModalPhase::Shown);
    assert_eq!(second.phase(), ModalPhase::Idle);
}

#[test]
fn unmount_before_the_delay_cancels_the_timer() {
    let env = TestEnv::builder(standard_config()).build();
    let modal = mount(&env, "newsletter");
    assert_eq!(env.host.pending_timers(), 1);

    drop(modal);
    env.host.advance_ms(10_000);

    assert_eq!(env.host.pending_timers(), 0);
    assert!(!env.flags.contains(FlagScope::Device, NEWSLETTER_FLAG));
}

#[test]
fn unmount_while_shown_detaches_the_key_listener() {
    let env = TestEnv::builder(standard_config()).build();
    let modal = mount(&env, "promo");
    env.host.advance_ms(1_000);

    drop(modal);

    assert_eq!(env.host.page_listener_count(), 0);
}

#[test]
fn read_only_storage_still_shows() {
    let env = TestEnv::builder(standard_config()).build();
    env.flags.make_read_only();
    let modal = mount(&env, "newsletter");

    env.host.advance_ms(4_000);

    assert_eq!(modal.phase(), ModalPhase::Shown);
    assert!(!env.flags.contains(FlagScope::Device, NEWSLETTER_FLAG));
}

#[test]
fn unknown_modal_is_a_config_error() {
    let env = TestEnv::builder(standard_config()).build();

    let Err(err) = FrequencyCappedModal::mount(&env.session, "exit-intent") else {
        panic!("exit-intent is not configured");
    };

    assert_eq!(err.origin(), ErrorOrigin::Config);
}
