use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use rand::Rng;

use crate::{
    db_types::{Order, OrderStatus},
    traits::{OrderApiError, OrderManagement, OrderProgress, ProgressionSettings, ScanSummary, TicketGate, TicketManagement},
};

/// `ProgressionApi` advances orders through the production-and-delivery lifecycle based on elapsed time.
///
/// One call to [`run_scan`](Self::run_scan) examines every active order exactly once and moves each at most one step
/// along `Pending → InProduction → Shipped → Delivered`, unless the order is gated by unresolved support tickets.
/// Every other status is terminal or manually managed and is never touched.
///
/// Scans are idempotent by construction: thresholds re-check elapsed time against stored timestamps, so an order whose
/// update failed is simply re-evaluated on the next scan. There is no batch transaction; each order is persisted
/// independently and one failure never stalls the rest of the scan.
pub struct ProgressionApi<B> {
    db: B,
}

impl<B> Debug for ProgressionApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgressionApi")
    }
}

impl<B> ProgressionApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> ProgressionApi<B>
where B: OrderManagement + TicketManagement
{
    /// Runs one scan over all active orders.
    ///
    /// For each order, in sequence:
    /// 1. If ticket blocking is enabled, look up the order's tickets. Any unresolved ticket skips the order (counted
    ///    as blocked). A failed lookup is *not* a block: the check fails open, and the failure is logged.
    /// 2. Roll a fresh jitter offset for this order and compare elapsed whole days against the jittered threshold for
    ///    the order's current status.
    /// 3. If the threshold is met, persist the single-step transition. A persistence failure is logged and counted;
    ///    the scan continues with the next order.
    ///
    /// Returns the per-scan counts. Only a failure to *list* the active orders aborts the scan.
    pub async fn run_scan(
        &self,
        settings: &ProgressionSettings,
        now: DateTime<Utc>,
    ) -> Result<ScanSummary, OrderApiError> {
        let orders = self.db.fetch_active_orders().await?;
        let mut summary = ScanSummary { scanned: orders.len(), ..ScanSummary::default() };
        debug!("🔄️ Progression scan started over {} active orders", orders.len());
        for order in orders {
            if settings.block_progression_with_open_tickets {
                match self.ticket_gate(&order).await {
                    TicketGate::Blocked(n) => {
                        debug!("🔄️ Order {} has {n} open ticket(s). Progression skipped.", order.order_id);
                        summary.blocked += 1;
                        continue;
                    },
                    TicketGate::Clear => {},
                    TicketGate::Unknown => {
                        // Fail open: an unreachable ticket store must not stall the whole pipeline.
                        warn!("🔄️ Ticket lookup failed for order {}. Proceeding as if unblocked.", order.order_id);
                    },
                }
            }
            let jitter = roll_jitter(&mut rand::thread_rng(), settings.random_variation_days);
            let Some(progress) = evaluate_transition(&order, settings, jitter, now) else {
                continue;
            };
            info!("🔄️ Moving order {} from {} to {}", order.order_id, order.status, progress.new_status);
            match self.db.apply_order_progress(order.id, progress).await {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    error!(
                        "🔄️ Could not move order {} to {}. It will be re-evaluated on the next scan. {e}",
                        order.order_id, progress.new_status
                    );
                    summary.errors += 1;
                },
            }
        }
        info!("🔄️ Progression scan complete. {summary}");
        Ok(summary)
    }

    /// Checks whether unresolved tickets reference the order. Lookup failures surface as [`TicketGate::Unknown`] so
    /// the caller's fail-open policy stays an explicit branch.
    async fn ticket_gate(&self, order: &Order) -> TicketGate {
        match self.db.fetch_tickets_for_order(&order.order_id).await {
            Ok(tickets) => {
                let open = tickets.iter().filter(|t| t.status.is_blocking()).count();
                if open == 0 {
                    TicketGate::Clear
                } else {
                    TicketGate::Blocked(open)
                }
            },
            Err(e) => {
                warn!("🔄️ Could not fetch tickets for order {}: {e}", order.order_id);
                TicketGate::Unknown
            },
        }
    }
}

/// Decides the single lifecycle step for one order, if any.
///
/// Elapsed time is measured in whole days (time of day is ignored). For `Shipped` orders the clock starts at
/// `shipped_date`, falling back to the order age when the status was set manually without a date. The jittered
/// threshold is supplied by the caller so the decision itself stays deterministic.
pub fn evaluate_transition(
    order: &Order,
    settings: &ProgressionSettings,
    jitter: i64,
    now: DateTime<Utc>,
) -> Option<OrderProgress> {
    let days_since_order = (now - order.order_date).num_days();
    match order.status {
        OrderStatus::Pending => (days_since_order >= settings.pending_to_production_days + jitter)
            .then(|| OrderProgress::to_status(OrderStatus::InProduction)),
        OrderStatus::InProduction => {
            (days_since_order >= settings.production_to_shipped_days + jitter).then(|| OrderProgress::shipped(now))
        },
        OrderStatus::Shipped => {
            let days_since_shipped = order.shipped_date.map(|d| (now - d).num_days()).unwrap_or(days_since_order);
            (days_since_shipped >= settings.shipped_to_delivered_days + jitter)
                .then(|| OrderProgress::delivered(now))
        },
        _ => None,
    }
}

/// A uniform offset in `[-variation, +variation]`, rolled once per order per scan.
fn roll_jitter<R: Rng>(rng: &mut R, variation: i64) -> i64 {
    if variation <= 0 {
        0
    } else {
        rng.gen_range(-variation..=variation)
    }
}
