//! Typed view of a Zotero library item.
//!
//! The Zotero API is the source of truth for items; this tool only reads
//! a handful of fields (`key`, `data.DOI`, `data.title`, the `dc:relation`
//! links, and the item's self URL) and writes the whole item back. Every
//! field the tool does not interpret is carried through untouched in
//! flattened maps so the bulk update round-trips cleanly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One library item, as returned by the Zotero Web API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Item key, unique within the library
    pub key: String,

    /// Library version the item was fetched at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(default, skip_serializing_if = "ItemLinks::is_empty")]
    pub links: ItemLinks,

    pub data: ItemData,

    /// Uninterpreted top-level fields (library, meta, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// The item's DOI, if present and non-empty
    pub fn doi(&self) -> Option<&str> {
        self.data.doi.as_deref().filter(|doi| !doi.is_empty())
    }

    /// The item's title, if present
    pub fn title(&self) -> Option<&str> {
        self.data.title.as_deref()
    }

    /// The item's API self URL, if present
    pub fn self_href(&self) -> Option<&str> {
        self.links.own.as_ref().map(|link| link.href.as_str())
    }
}

/// The `links` object on an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemLinks {
    /// The item's own API URL
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub own: Option<Link>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemLinks {
    fn is_empty(&self) -> bool {
        self.own.is_none() && self.extra.is_empty()
    }
}

/// A single link entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The editable `data` object on an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemData {
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub relations: Relations,

    /// Uninterpreted data fields (itemType, creators, date, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `relations` map on an item's data.
///
/// Zotero stores the related-items list under the `dc:relation` key, as
/// either a single URI string or a list of URI strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(rename = "dc:relation", default, skip_serializing_if = "Option::is_none")]
    pub related: Option<RelationValue>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// String-or-list shape of a relation entry on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationValue {
    One(String),
    Many(Vec<String>),
}

impl Relations {
    /// The related-item links, normalized to a list.
    ///
    /// A single string becomes a one-element list; an absent key becomes
    /// an empty list.
    pub fn links(&self) -> Vec<String> {
        match &self.related {
            None => Vec::new(),
            Some(RelationValue::One(link)) => vec![link.clone()],
            Some(RelationValue::Many(links)) => links.clone(),
        }
    }

    /// Store the related-item links, always in list form
    pub fn set_links(&mut self, links: Vec<String>) {
        self.related = Some(RelationValue::Many(links));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> Value {
        json!({
            "key": "ABCD1234",
            "version": 101,
            "library": {"type": "user", "id": 7, "name": "tester"},
            "links": {
                "self": {"href": "https://api.zotero.org/users/7/items/ABCD1234", "type": "application/json"},
                "alternate": {"href": "https://www.zotero.org/tester/items/ABCD1234", "type": "text/html"}
            },
            "data": {
                "key": "ABCD1234",
                "version": 101,
                "itemType": "journalArticle",
                "title": "A Study of Things",
                "DOI": "10.1234/things",
                "creators": [{"creatorType": "author", "firstName": "Ann", "lastName": "Author"}],
                "relations": {}
            }
        })
    }

    #[test]
    fn test_item_accessors() {
        let item: Item = serde_json::from_value(sample_item()).unwrap();

        assert_eq!(item.key, "ABCD1234");
        assert_eq!(item.doi(), Some("10.1234/things"));
        assert_eq!(item.title(), Some("A Study of Things"));
        assert_eq!(
            item.self_href(),
            Some("https://api.zotero.org/users/7/items/ABCD1234")
        );
    }

    #[test]
    fn test_empty_doi_is_none() {
        let mut value = sample_item();
        value["data"]["DOI"] = json!("");

        let item: Item = serde_json::from_value(value).unwrap();
        assert_eq!(item.doi(), None);
    }

    #[test]
    fn test_relations_normalization() {
        let absent = Relations::default();
        assert!(absent.links().is_empty());

        let single: Relations =
            serde_json::from_value(json!({"dc:relation": "http://zotero.org/users/7/items/X"}))
                .unwrap();
        assert_eq!(single.links(), vec!["http://zotero.org/users/7/items/X"]);

        let many: Relations = serde_json::from_value(json!({
            "dc:relation": ["http://zotero.org/users/7/items/X", "http://zotero.org/users/7/items/Y"]
        }))
        .unwrap();
        assert_eq!(many.links().len(), 2);
    }

    #[test]
    fn test_relations_other_predicates_survive() {
        let relations: Relations = serde_json::from_value(json!({
            "dc:relation": "http://zotero.org/users/7/items/X",
            "owl:sameAs": "http://zotero.org/groups/3/items/Q"
        }))
        .unwrap();

        let round_trip = serde_json::to_value(&relations).unwrap();
        assert_eq!(
            round_trip["owl:sameAs"],
            json!("http://zotero.org/groups/3/items/Q")
        );
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let original = sample_item();
        let item: Item = serde_json::from_value(original.clone()).unwrap();
        let round_trip = serde_json::to_value(&item).unwrap();

        assert_eq!(round_trip["library"], original["library"]);
        assert_eq!(round_trip["data"]["creators"], original["data"]["creators"]);
        assert_eq!(round_trip["data"]["itemType"], json!("journalArticle"));
        assert_eq!(round_trip["version"], json!(101));
    }

    #[test]
    fn test_set_links_always_writes_a_list() {
        let mut relations: Relations =
            serde_json::from_value(json!({"dc:relation": "http://zotero.org/users/7/items/X"}))
                .unwrap();

        relations.set_links(relations.links());

        let value = serde_json::to_value(&relations).unwrap();
        assert_eq!(
            value["dc:relation"],
            json!(["http://zotero.org/users/7/items/X"])
        );
    }
}
