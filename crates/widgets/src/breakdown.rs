//! Second-level ("breakdown") distribution fan-out.
//!
//! One sub-query runs per main bucket whose element is a core object.
//! Sub-queries run concurrently, at most `concurrency` at a time, and the
//! output keeps the main distribution's order. The first failing sub-query
//! fails the whole breakdown; the remaining in-flight sub-queries are
//! dropped with it.

use std::future::Future;

use futures::stream::{self, StreamExt, TryStreamExt};
use vantage_core::error::CoreError;
use vantage_core::query::DistributionItem;
use vantage_core::stix::is_stix_core_object;

/// Attach a breakdown to every eligible bucket of `buckets`.
///
/// `sub_query` receives the bucket element id. Buckets without an element
/// or whose element is not a core object pass through unchanged and carry
/// no `breakdown_distribution`.
pub async fn fan_out<F, Fut>(
    buckets: Vec<DistributionItem>,
    concurrency: usize,
    sub_query: F,
) -> Result<Vec<DistributionItem>, CoreError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<DistributionItem>, CoreError>>,
{
    let sub_query = &sub_query;

    stream::iter(buckets.into_iter().map(|mut item| {
        let pivot = item
            .entity
            .as_ref()
            .filter(|e| is_stix_core_object(&e.entity_type))
            .map(|e| e.id.clone());
        async move {
            if let Some(id) = pivot {
                item.breakdown_distribution = Some(sub_query(id).await?);
            }
            Ok::<_, CoreError>(item)
        }
    }))
    .buffered(concurrency.max(1))
    .try_collect()
    .await
}
