//! Relation matching and the batch enrichment pass.
//!
//! For each library item with a DOI, the citation graph lookup yields the
//! papers citing it and the papers it cites. Any library item found in
//! that combined list (by DOI, or by exact title) gets cross-linked into
//! the item's `dc:relation` list. Title matching can over-match when two
//! distinct papers share a title; that imprecision is accepted.

use indicatif::ProgressBar;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{Item, Paper};
use crate::sources::{SemanticScholarClient, SourceError};
use crate::zotero::{ZoteroClient, ZoteroError};

/// Pause between per-item graph lookups, to stay inside the service's
/// rate limits.
pub const ITEM_DELAY: Duration = Duration::from_secs(1);

/// Errors from a full enrichment pass
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error(transparent)]
    Zotero(#[from] ZoteroError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Find the library items that appear in `papers`, matching by non-empty
/// DOI or by exact title. Either criterion alone qualifies; matches are
/// accumulated in library order.
pub fn matched_items<'a>(items: &'a [Item], papers: &[Paper]) -> Vec<&'a Item> {
    let dois: HashSet<&str> = papers
        .iter()
        .filter(|paper| paper.has_doi())
        .map(|paper| paper.doi.as_str())
        .collect();
    let titles: HashSet<&str> = papers.iter().map(|paper| paper.title.as_str()).collect();

    items
        .iter()
        .filter(|item| {
            item.doi().is_some_and(|doi| dois.contains(doi))
                || item.title().is_some_and(|title| titles.contains(title))
        })
        .collect()
}

/// Canonical relation link for an item, derived from its API self URL.
///
/// Zotero stores `dc:relation` links under the web host rather than the
/// API one.
fn relation_href(href: &str) -> String {
    href.replace("https://api.", "http://")
}

/// Append the canonical link of every matched item to the item's
/// relations, skipping links already present. Existing entries keep
/// their order; the stored value is always a list.
pub fn append_relations(item: &mut Item, matches: &[&Item]) {
    let mut links = item.data.relations.links();

    for matched in matches {
        let Some(href) = matched.self_href() else {
            continue;
        };
        let link = relation_href(href);
        if !links.contains(&link) {
            links.push(link);
        }
    }

    item.data.relations.set_links(links);
}

/// Cross-link one library item against the rest of the library.
///
/// Items without a DOI are returned untouched and no lookup is made. A
/// failed graph lookup degrades to "no relations added for this item"
/// (see [`SemanticScholarClient::cites_and_refs`]).
pub async fn update_item(
    graph: &SemanticScholarClient,
    mut item: Item,
    items: &[Item],
) -> Result<Item, SourceError> {
    let Some(doi) = item.doi().map(str::to_owned) else {
        info!(key = %item.key, "no DOI, skipping");
        return Ok(item);
    };

    let (citations, references) = graph.cites_and_refs(&doi).await?;
    let papers: Vec<Paper> = citations.into_iter().chain(references).collect();

    let matches = matched_items(items, &papers);
    debug!(
        key = %item.key,
        matched = matches.len(),
        keys = ?matches.iter().map(|m| m.key.as_str()).collect::<Vec<_>>(),
        "matched library items"
    );

    append_relations(&mut item, &matches);
    Ok(item)
}

/// Run the full enrichment pass: fetch the library, cross-link every
/// item in order with a pause between lookups, then submit the whole
/// collection back in one bulk update.
///
/// Returns the number of items submitted.
pub async fn enrich_library(
    zotero: &ZoteroClient,
    graph: &SemanticScholarClient,
    delay: Duration,
) -> Result<usize, EnrichError> {
    println!("Collecting all library items...");
    let items = zotero.all_top().await?;
    info!(count = items.len(), "fetched top-level items");

    println!("Updating items...");
    let progress = ProgressBar::new(items.len() as u64);
    let mut updated = Vec::with_capacity(items.len());

    for item in &items {
        progress.println(format!("Updating {}", item.key));
        let item = update_item(graph, item.clone(), &items).await?;
        updated.push(item);
        progress.inc(1);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    progress.finish_and_clear();

    println!("Submitting bulk update...");
    zotero.update_items(&updated).await?;

    Ok(updated.len())
}
