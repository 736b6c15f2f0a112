// Integration tests for mutate-mode resources.
// Unit tests for individual methods are in src/mutation.rs

mod common;

use loadstate::prelude::*;
use tokio::time::{Duration, sleep, timeout};

use common::{Calls, init_tracing};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Budget {
    team: String,
    limit_usd: u64,
}

fn set_budget(calls: &Calls) -> Mutator<(String, u64), Budget> {
    let calls = calls.clone();
    Mutator::new(move |(team, limit_usd): (String, u64)| {
        calls.hit();
        async move {
            if limit_usd == 0 {
                return Err(ResourceError::new("limit must be positive"));
            }
            Ok(Budget { team, limit_usd })
        }
    })
}

#[tokio::test]
async fn test_nothing_runs_at_creation() {
    let calls = Calls::default();
    let mutation = Mutation::new(set_budget(&calls));

    sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.count(), 0);
    assert_eq!(
        mutation.state(),
        ResourceState {
            data: None,
            loading: false,
            error: None,
        }
    );
}

#[tokio::test]
async fn test_success_returned_and_recorded() {
    init_tracing();
    let calls = Calls::default();
    let mutation = Mutation::new(set_budget(&calls));

    let call = mutation.mutate(("search".to_string(), 500));
    assert!(mutation.is_loading());
    assert_eq!(mutation.error(), None);

    let budget = call.await;
    let expected = Budget {
        team: "search".to_string(),
        limit_usd: 500,
    };
    assert_eq!(budget, Ok(expected.clone()));
    assert_eq!(mutation.data(), Some(expected));
    assert!(!mutation.is_loading());
    assert_eq!(calls.count(), 1);
}

#[tokio::test]
async fn test_failure_returned_and_recorded() {
    let calls = Calls::default();
    let mutation = Mutation::new(set_budget(&calls));

    let ok = mutation.mutate(("search".to_string(), 500)).await;
    let err = mutation.mutate(("search".to_string(), 0)).await;

    // Both channels report the same failure.
    assert_eq!(err, Err(ResourceError::new("limit must be positive")));
    assert_eq!(mutation.error(), err.clone().err());
    assert!(!mutation.is_loading());

    // Data from the earlier success is untouched.
    assert_eq!(mutation.data(), ok.ok());
}

#[tokio::test]
async fn test_state_is_recorded_before_result_is_returned() {
    let calls = Calls::default();
    let mutation = Mutation::new(set_budget(&calls));

    let result = mutation.mutate(("infra".to_string(), 0)).await;

    let state = mutation.state();
    assert_eq!(state.error, result.err());
    assert!(!state.loading);
    assert_eq!(state.phase(), Phase::Failed);
}

#[tokio::test]
async fn test_settled_waits_for_fire_and_forget_call() {
    let calls = Calls::default();
    let mutation = Mutation::new(set_budget(&calls));

    drop(mutation.mutate(("ml".to_string(), 75)));
    let state = mutation.settled().await;

    assert_eq!(state.data.map(|b| b.limit_usd), Some(75));
    assert_eq!(calls.count(), 1);
}

async fn explode(_: u32) -> Result<u32, ResourceError> {
    panic!("thrown string")
}

fn explode_now(_: u32) -> futures::future::Ready<Result<u32, ResourceError>> {
    panic!("raised before the future exists")
}

#[tokio::test]
async fn test_panicking_mutator_is_unknown_error() {
    let mutation = Mutation::new(Mutator::new(explode));

    let result = timeout(Duration::from_secs(1), mutation.mutate(1))
        .await
        .expect("call should settle");

    assert_eq!(result, Err(ResourceError::unknown()));
    assert_eq!(mutation.error(), Some(ResourceError::unknown()));
    assert!(!mutation.is_loading());
}

#[tokio::test]
async fn test_mutator_panicking_before_its_future_is_unknown_error() {
    let mutation = Mutation::new(Mutator::new(explode_now));

    let result = timeout(Duration::from_secs(1), mutation.mutate(1))
        .await
        .expect("call should settle");

    assert_eq!(result, Err(ResourceError::unknown()));
    assert_eq!(
        mutation.state(),
        ResourceState {
            data: None,
            loading: false,
            error: Some(ResourceError::unknown()),
        }
    );
}

#[tokio::test]
async fn test_call_outlives_dropped_mutation() {
    let calls = Calls::default();
    let mutation = Mutation::new(set_budget(&calls));

    let call = mutation.mutate(("infra".to_string(), 900));
    drop(mutation);

    let budget = timeout(Duration::from_secs(1), call)
        .await
        .expect("call should settle");
    assert_eq!(
        budget,
        Ok(Budget {
            team: "infra".to_string(),
            limit_usd: 900,
        })
    );
    assert_eq!(calls.count(), 1);
}
