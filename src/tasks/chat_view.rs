//! Live chat view: mirror world chat to the terminal until stopped.

use super::{TaskContext, TaskReport};
use crate::bridge::Subscription;
use crate::world::{ChatEvent, WorldEvent};
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

const PRIVATE_MARKERS: &[&str] = &["/msg", "/tell", "/w", "/dm", "whispers to you", "->"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatClass {
    /// Sent by the operator's own account; not shown.
    Own,
    Private,
    Public,
}

pub fn is_private_message(text: &str) -> bool {
    let lower = text.to_lowercase();
    PRIVATE_MARKERS.iter().any(|marker| lower.contains(marker))
}

pub fn classify_chat(own_name: &str, event: &ChatEvent) -> ChatClass {
    if !own_name.is_empty() && event.sender.eq_ignore_ascii_case(own_name) {
        ChatClass::Own
    } else if is_private_message(&event.text) {
        ChatClass::Private
    } else {
        ChatClass::Public
    }
}

pub(super) async fn run(ctx: TaskContext, mut events: Subscription) -> TaskReport {
    let TaskContext {
        world,
        renderer,
        settings,
        mut stop,
    } = ctx;
    let own_name = world.username();
    let mut ticker = interval(settings.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    renderer.activity("Starting live chat view.");
    loop {
        tokio::select! {
            biased;
            _ = stop.stopped() => break,
            event = events.recv() => match event {
                Some(WorldEvent::Chat(chat)) => {
                    if stop.is_stopped() {
                        break;
                    }
                    match classify_chat(&own_name, &chat) {
                        ChatClass::Own => debug!("skipping own chat line"),
                        ChatClass::Private if chat.sender.is_empty() => {
                            renderer.chat_private(&chat.text)
                        }
                        ChatClass::Private => {
                            renderer.chat_private(&format!("{}: {}", chat.sender, chat.text))
                        }
                        ChatClass::Public if chat.sender.is_empty() => renderer.line(&chat.text),
                        ChatClass::Public => renderer.chat_public(&chat.sender, &chat.text),
                    }
                }
                Some(_) => {}
                None => break,
            },
            _ = ticker.tick() => {
                if stop.is_stopped() {
                    break;
                }
            }
        }
    }
    TaskReport::ChatClosed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::EventBridge;
    use crate::testsupport::{task_context, FakeWorld, RecordingSink};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn classifies_by_sender_then_markers() {
        let own = "DonutBot";
        assert_eq!(
            classify_chat(own, &ChatEvent::new("donutbot", "/msg steve hi")),
            ChatClass::Own
        );
        assert_eq!(
            classify_chat(own, &ChatEvent::new("steve", "steve whispers to you: hey")),
            ChatClass::Private
        );
        assert_eq!(
            classify_chat(own, &ChatEvent::new("", "[steve -> me] hey")),
            ChatClass::Private
        );
        assert_eq!(
            classify_chat(own, &ChatEvent::new("alex", "anyone selling shards?")),
            ChatClass::Public
        );
    }

    #[test]
    fn private_markers_ignore_case() {
        assert!(is_private_message("Use /TELL to reply"));
        assert!(!is_private_message("good morning"));
    }

    #[tokio::test(start_paused = true)]
    async fn renders_until_stopped() {
        let world = Arc::new(FakeWorld::new("DonutBot"));
        let sink = Arc::new(RecordingSink::new());
        let bridge = EventBridge::new();
        let (handle, ctx) = task_context(&world, &sink);
        let task = tokio::spawn(run(ctx, bridge.subscribe().expect("subscribe")));

        bridge.publish(WorldEvent::Chat(ChatEvent::new("alex", "hello")));
        bridge.publish(WorldEvent::Chat(ChatEvent::new("DonutBot", "my own line")));
        bridge.publish(WorldEvent::Chat(ChatEvent::new("steve", "/msg you psst")));
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.stop();

        assert_eq!(task.await.expect("join"), TaskReport::ChatClosed);
        assert!(sink.saw("chat:[alex]: hello"));
        assert!(sink.saw("private:steve: /msg you psst"));
        assert!(!sink.saw("my own line"));
        assert!(!bridge.has_subscriber());
    }
}
