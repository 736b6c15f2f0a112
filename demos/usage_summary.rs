//! Usage summary example demonstrating a read resource and a mutation.
//!
//! This example shows:
//! - A resource that loads an organization's spend summary at creation
//! - Observing state transitions through `watch()`
//! - A mutation that raises a team budget, then a refetch of the summary
//! - Failure handling in both modes
//!
//! Run with: `RUST_LOG=loadstate=debug cargo run --example usage_summary`

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use color_eyre::eyre::Result;
use futures::StreamExt;
use loadstate::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Spend summary for one organization.
#[derive(Debug, Clone)]
struct Summary {
    spend_usd: u64,
    budget_usd: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Stands in for the gateway's analytics backend.
    let budget = Arc::new(AtomicU64::new(1_000));

    let summary = {
        let budget = Arc::clone(&budget);
        Resource::new(
            Producer::new(move || {
                let budget_usd = budget.load(Ordering::SeqCst);
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok::<_, ResourceError>(Summary {
                        spend_usd: 730,
                        budget_usd,
                    })
                }
            }),
            ResourceOptions::default(),
        )
    };

    let mut states = summary.watch();
    let renderer = tokio::spawn(async move {
        while let Some(state) = states.next().await {
            match (state.phase(), state.data()) {
                (Phase::Loading, _) => info!("summary: loading"),
                (Phase::Success, Some(s)) => {
                    info!(spend = s.spend_usd, budget = s.budget_usd, "summary: ready");
                }
                (Phase::Failed, _) => info!(error = ?state.error, "summary: failed"),
                _ => info!("summary: idle"),
            }
        }
    });

    summary.settled().await;

    let raise_budget = {
        let budget = Arc::clone(&budget);
        Mutation::new(Mutator::new(move |amount: u64| {
            let budget = Arc::clone(&budget);
            async move {
                if amount == 0 {
                    return Err(ResourceError::new("amount must be positive"));
                }
                Ok(budget.fetch_add(amount, Ordering::SeqCst) + amount)
            }
        }))
    };

    match raise_budget.mutate(0).await {
        Ok(total) => info!(total, "budget raised"),
        Err(e) => info!(error = %e, "budget change rejected"),
    }

    let total = raise_budget.mutate(500).await?;
    info!(total, "budget raised");

    summary.refetch().await;
    if let Some(s) = summary.data() {
        info!(
            remaining = s.budget_usd.saturating_sub(s.spend_usd),
            "remaining budget"
        );
    }

    drop(summary);
    renderer.await?;
    Ok(())
}
