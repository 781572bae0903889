//! Periodic pull of fresh rates into the store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, TimeZone};
use log::{error, info};
use tokio::task::JoinHandle;

use crate::nbu::NbuClient;
use crate::store::RateStore;

pub struct RefreshJob {
    client: NbuClient,
    store: Arc<dyn RateStore>,
    refresh_at: NaiveTime,
}

impl RefreshJob {
    pub fn new(client: NbuClient, store: Arc<dyn RateStore>, refresh_at: NaiveTime) -> Self {
        Self {
            client,
            store,
            refresh_at,
        }
    }

    /// Fetch one batch and append it to the store.
    pub async fn run_once(&self) -> anyhow::Result<u64> {
        let rates = self.client.fetch_rates().await?;
        let written = self
            .store
            .save_all(&rates)
            .await
            .context("Can't store fetched exchange rates")?;
        info!("Refreshed {} exchange rates from {}", written, self.client.url());
        Ok(written)
    }

    /// Run immediately, then once a day at the configured local time.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if let Err(e) = self.run_once().await {
                    error!("Exchange rate refresh failed: {:#}", e);
                }

                let now = Local::now();
                let next = next_run(now.naive_local(), self.refresh_at);
                let wait = wait_until(now, next);
                info!("Next exchange rate refresh at {}", next);
                tokio::time::sleep(wait).await;
            }
        })
    }
}

/// The first occurrence of `at` strictly after `now`.
fn next_run(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        return today;
    }
    now.date()
        .checked_add_days(Days::new(1))
        .map(|d| d.and_time(at))
        .unwrap_or(today)
}

fn wait_until(now: DateTime<Local>, next: NaiveDateTime) -> Duration {
    let target = Local
        .from_local_datetime(&next)
        .earliest()
        .unwrap_or_else(|| now + chrono::Duration::days(1));
    (target - now).to_std().unwrap_or(Duration::from_secs(60))
}
