//! Progress extraction from the XML save document.
//!
//! The save serialises dictionaries as repeated `item` elements:
//!
//! ```xml
//! <recipesCooked>
//!   <item><key><string>194</string></key><value><int>1</int></value></item>
//! </recipesCooked>
//! ```
//!
//! Fish use `value/ArrayOfInt/int`, where the first integer is the catch count.

use std::collections::BTreeMap;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use crate::core_api::{CoreError, CoreErrorCode, RawProgress};

pub const LEARNED_RECIPES_ELEMENT: &str = "cookingRecipes";
pub const COOKED_RECIPES_ELEMENT: &str = "recipesCooked";
pub const FISH_CAUGHT_ELEMENT: &str = "fishCaught";

const OBJECT_ID_PREFIX: &str = "(O)";
const UTF8_BOM: char = '\u{feff}';

pub fn extract_progress_bytes(bytes: &[u8]) -> Result<RawProgress, CoreError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        CoreError::new(
            CoreErrorCode::SaveParse,
            format!("save document is not valid UTF-8: {e}"),
        )
    })?;
    extract_progress(text)
}

pub fn extract_progress(xml: &str) -> Result<RawProgress, CoreError> {
    let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options).map_err(|e| {
        CoreError::new(
            CoreErrorCode::SaveParse,
            format!("save document is not well-formed XML: {e}"),
        )
    })?;
    let root = document.root_element();

    let progress = RawProgress {
        learned: parse_dict(root, LEARNED_RECIPES_ELEMENT)?,
        cooked: parse_dict(root, COOKED_RECIPES_ELEMENT)?,
        caught_fish: parse_fish(root)?,
    };
    debug!(
        learned = progress.learned.len(),
        cooked = progress.cooked.len(),
        fish = progress.caught_fish.len(),
        "extracted save progress"
    );
    Ok(progress)
}

/// Reads every `<element>/item` below the root into `key -> int`.
fn parse_dict(root: Node<'_, '_>, element: &str) -> Result<BTreeMap<String, i32>, CoreError> {
    let mut out = BTreeMap::new();
    for container in descendants_named(root, element) {
        for item in children_named(container, "item") {
            let (Some(key), Some(value)) = (
                find_path(item, &["key", "string"]),
                find_path(item, &["value", "int"]),
            ) else {
                continue;
            };
            let key = node_text(key).to_string();
            let value = parse_int(value, element, &key)?;
            out.insert(key, value);
        }
    }
    Ok(out)
}

fn parse_fish(root: Node<'_, '_>) -> Result<BTreeMap<String, i32>, CoreError> {
    // Older saves can carry several `fishCaught` nodes; the first populated
    // one is authoritative.
    let Some(container) = descendants_named(root, FISH_CAUGHT_ELEMENT)
        .find(|node| node.children().any(|child| child.is_element()))
    else {
        return Ok(BTreeMap::new());
    };

    let mut out = BTreeMap::new();
    for item in children_named(container, "item") {
        let Some(key) = find_path(item, &["key", "string"]) else {
            continue;
        };
        let Some(count) = find_path(item, &["value", "ArrayOfInt", "int"]) else {
            continue;
        };
        let raw_id = node_text(key);
        let fish_id = raw_id.strip_prefix(OBJECT_ID_PREFIX).unwrap_or(raw_id);
        let count = parse_int(count, FISH_CAUGHT_ELEMENT, fish_id)?;
        out.insert(fish_id.to_string(), count);
    }
    Ok(out)
}

fn descendants_named<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    root.descendants()
        .skip(1)
        .filter(move |node| node.is_element() && node.tag_name().name() == name)
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

/// First element reached by following `path` through child elements, trying
/// every matching branch in document order.
fn find_path<'a, 'input: 'a>(node: Node<'a, 'input>, path: &[&str]) -> Option<Node<'a, 'input>> {
    let Some((first, rest)) = path.split_first() else {
        return Some(node);
    };
    children_named(node, first).find_map(|child| find_path(child, rest))
}

fn node_text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or("")
}

fn parse_int(node: Node<'_, '_>, element: &str, key: &str) -> Result<i32, CoreError> {
    let text = node_text(node).trim();
    text.parse::<i32>().map_err(|e| {
        CoreError::new(
            CoreErrorCode::SaveParse,
            format!("{element} entry {key:?} has non-integer value {text:?}: {e}"),
        )
    })
}
