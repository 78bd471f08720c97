//! # Action Pacing
//!
//! The engine plays scripted turns to completion synchronously. Hosts that want to show
//! the opponent's moves one by one replay the resulting action log here, on their own
//! runtime, with a delay between items.

use std::time::Duration;

/// Hands each action to `on_action`, sleeping `delay` before every item after the first.
///
/// Returns the number of actions replayed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use whitebox::pace_actions;
///
/// let runtime = tokio::runtime::Builder::new_current_thread()
///     .enable_time()
///     .build()
///     .unwrap();
/// let mut seen = Vec::new();
/// let count = runtime.block_on(pace_actions(vec![1, 2, 3], Duration::ZERO, |n| seen.push(n)));
/// assert_eq!(count, 3);
/// assert_eq!(seen, vec![1, 2, 3]);
/// ```
pub async fn pace_actions<T, F>(
    actions: impl IntoIterator<Item = T>,
    delay: Duration,
    mut on_action: F,
) -> usize
where
    F: FnMut(T),
{
    let mut count = 0;
    for action in actions {
        if count > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        on_action(action);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::AiAction;
    use crate::new_entity_id;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_replays_in_order() {
        let city = new_entity_id();
        let actions = vec![
            AiAction::Enqueued {
                city,
                item: "warrior".to_string(),
            },
            AiAction::Enqueued {
                city,
                item: "rider".to_string(),
            },
        ];

        let mut items = Vec::new();
        let count = pace_actions(actions, Duration::ZERO, |action| {
            if let AiAction::Enqueued { item, .. } = action {
                items.push(item);
            }
        })
        .await;
        assert_eq!(count, 2);
        assert_eq!(items, vec!["warrior", "rider"]);
    }

    #[tokio::test]
    async fn test_waits_between_actions() {
        let start = Instant::now();
        let count = pace_actions(0..3, Duration::from_millis(10), |_| {}).await;
        assert_eq!(count, 3);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_empty_log() {
        let count = pace_actions(Vec::<AiAction>::new(), Duration::from_secs(5), |_| {}).await;
        assert_eq!(count, 0);
    }
}
