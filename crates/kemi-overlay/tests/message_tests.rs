//! Message center timing on a paused tokio clock

use kemi_overlay::*;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn test_message_dismisses_after_duration_then_exit_delay() {
    let center = MessageCenter::default();
    let id = center.success("Saved", None);
    assert!(center.has_container());

    tokio::time::sleep(ms(2999)).await;
    assert_eq!(center.get(id).map(|m| m.closing), Some(false));

    tokio::time::sleep(ms(2)).await;
    assert_eq!(center.get(id).map(|m| m.closing), Some(true));

    tokio::time::sleep(ms(298)).await;
    assert_eq!(center.len(), 1);

    tokio::time::sleep(ms(2)).await;
    assert!(center.is_empty());
    assert!(!center.has_container());
}

#[tokio::test(start_paused = true)]
async fn test_loading_stays_until_closed() {
    let center = MessageCenter::default();
    let id = center.loading("Uploading", None);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(center.len(), 1);

    assert!(center.close(id));
    assert!(!center.close(id), "a leaving message cannot be closed twice");
    tokio::time::sleep(ms(350)).await;
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_container_lives_while_any_message_does() {
    let center = MessageCenter::default();
    let short = center.info("short", Some(ms(100)));
    let long = center.warning("long", Some(ms(1000)));

    tokio::time::sleep(ms(500)).await;
    assert!(center.get(short).is_none());
    assert_eq!(center.items().iter().map(|m| m.id).collect::<Vec<_>>(), vec![long]);
    assert!(center.has_container());

    tokio::time::sleep(ms(1000)).await;
    assert!(!center.has_container());

    // Opening again mounts a fresh container
    center.error("again", None);
    assert!(center.has_container());
}

#[tokio::test(start_paused = true)]
async fn test_manual_close_cancels_auto_dismiss() {
    let center = MessageCenter::default();
    let first = center.info("first", Some(ms(1000)));
    let second = center.info("second", Some(ms(1000)));
    assert_ne!(first, second);

    center.close(first);
    tokio::time::sleep(ms(350)).await;
    assert_eq!(center.items().iter().map(|m| m.id).collect::<Vec<_>>(), vec![second]);

    tokio::time::sleep(ms(1000)).await;
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_all_and_configured_delays() {
    let center = MessageCenter::new(MessageConfig {
        default_duration: ms(200),
        exit_delay: ms(50),
    });
    center.success("a", None);
    center.loading("b", None);

    center.close_all();
    assert!(center.items().iter().all(|m| m.closing));
    tokio::time::sleep(ms(60)).await;
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_coordinator_messages_follow_close_delay() {
    let config = OverlayConfig {
        close_delay: ms(100),
        ..OverlayConfig::default()
    };
    let overlays = OverlayCoordinator::new(std::sync::Arc::new(MemoryHost::new()), config);
    assert_eq!(overlays.messages().config().exit_delay, ms(100));

    let id = overlays.messages().info("hi", Some(ms(10)));
    tokio::time::sleep(ms(120)).await;
    assert!(overlays.messages().get(id).is_none());
}
