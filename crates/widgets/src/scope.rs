//! Re-check of engine results against the scoped identity.
//!
//! The engine already filters by identity; these checks make sure nothing
//! outside the marking scope leaves the public path even if it does not.

use vantage_core::identity::ScopedIdentity;
use vantage_core::query::{DistributionItem, ElementPage, KnowledgeElement};

fn visible(identity: &ScopedIdentity, element: &KnowledgeElement) -> bool {
    identity.can_see_entity_type(&element.entity_type) && identity.can_see(&element.object_marking)
}

/// Drop page items the identity may not see.
pub fn retain_visible_page(identity: &ScopedIdentity, mut page: ElementPage) -> ElementPage {
    let before = page.items.len();
    page.items.retain(|e| visible(identity, e));
    let dropped = before - page.items.len();
    if dropped > 0 {
        tracing::warn!(
            dashboard_id = identity.dashboard_id,
            dropped,
            "Engine returned elements outside the public scope"
        );
        page.global_count = (page.global_count - dropped as i64).max(0);
    }
    page
}

/// Drop buckets whose resolved element the identity may not see.
///
/// Buckets without an element (plain attribute values) are kept.
pub fn retain_visible_buckets(
    identity: &ScopedIdentity,
    mut buckets: Vec<DistributionItem>,
) -> Vec<DistributionItem> {
    let before = buckets.len();
    buckets.retain(|b| b.entity.as_ref().is_none_or(|e| visible(identity, e)));
    if buckets.len() < before {
        tracing::warn!(
            dashboard_id = identity.dashboard_id,
            dropped = before - buckets.len(),
            "Engine returned buckets outside the public scope"
        );
    }
    buckets
}
