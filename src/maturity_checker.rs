use std::sync::Arc;

use chrono::Utc;
use tokio::time::{ interval, Duration, MissedTickBehavior };

use crate::services::InvestmentService;

/// Periodically completes investments that have reached maturity.
pub struct MaturityChecker {
    investment_service: Arc<InvestmentService>,
    period: Duration,
}

impl MaturityChecker {
    pub fn new(investment_service: Arc<InvestmentService>, period: Duration) -> Self {
        Self {
            investment_service,
            period,
        }
    }

    pub async fn start(self) {
        let mut interval = interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Maturity checker running every {:?}", self.period);

        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }

    async fn run_once(&self) {
        match self.investment_service.complete_matured(Utc::now()).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Completed {} matured investments", count),
            Err(e) => tracing::error!("Maturity checker error: {}", e),
        }
    }
}
