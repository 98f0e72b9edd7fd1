//! Nested list construction from depth-tagged entries.
//!
//! [`TreeBuilder`] consumes entries in document order and keeps one open
//! list per depth level on a stack:
//!
//! - deeper entry: open one sub-list per skipped level, hosting each in the
//!   previous entry (or a placeholder item when a level was skipped)
//! - shallower entry: close lists back to its level
//! - same depth: append to the open list
//!
//! With [`Nesting::Max`] increases past the ceiling are clamped, so the tree
//! never has more than `ceiling + 1` list levels. [`Nesting::Disabled`]
//! produces one flat list.
//!
//! ```
//! use tola_toc::options::Nesting;
//! use tola_toc::tree::{ItemContent, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new(Nesting::Unlimited, false);
//! builder.push(1, ItemContent::label("Intro"));
//! builder.push(3, ItemContent::label("Detail"));
//! let list = builder.finish();
//!
//! assert_eq!(list.levels(), 3);
//! assert_eq!(list.items[0].children.as_ref().unwrap().items[0].content, ItemContent::Placeholder);
//! ```

use serde::Serialize;

use crate::options::Nesting;

/// Level increase above which [`TreeBuilder`] logs the jump.
const DEEP_JUMP: u32 = 64;

// =============================================================================
// Output tree
// =============================================================================

/// What a list item shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemContent {
    /// Link to a heading
    Link { label: String, href: String },
    /// Plain text
    Label(String),
    /// Empty item standing in for a skipped level
    #[default]
    Placeholder,
}

impl ItemContent {
    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            label: label.into(),
            href: href.into(),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// One entry of a [`TocList`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub content: ItemContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<TocList>,
}

/// A list level of the table of contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocList {
    pub ordered: bool,
    pub items: Vec<TocItem>,
}

impl TocList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of list levels, this list included.
    pub fn levels(&self) -> usize {
        1 + self
            .items
            .iter()
            .filter_map(|item| item.children.as_ref())
            .map(TocList::levels)
            .max()
            .unwrap_or(0)
    }

    /// Every item in pre-order with its level (this list is level 1).
    pub fn walk(&self) -> Vec<(usize, &TocItem)> {
        let mut out = Vec::new();
        self.walk_into(1, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, level: usize, out: &mut Vec<(usize, &'a TocItem)>) {
        for item in &self.items {
            out.push((level, item));
            if let Some(children) = &item.children {
                children.walk_into(level + 1, out);
            }
        }
    }
}

// =============================================================================
// TreeBuilder
// =============================================================================

type ListId = usize;
type ItemId = usize;

const ROOT: ListId = 0;

#[derive(Debug, Default)]
struct ArenaItem {
    content: ItemContent,
    child: Option<ListId>,
}

/// Incremental list-tree builder.
///
/// Lists and items live in arenas while building, so a sub-list can be
/// attached to an item that was already appended elsewhere.
#[derive(Debug)]
pub struct TreeBuilder {
    nesting: Nesting,
    ordered: bool,
    lists: Vec<Vec<ItemId>>,
    items: Vec<ArenaItem>,
    /// Open sub-lists, innermost last; the root list is implicit.
    stack: Vec<ListId>,
    last_depth: u32,
    last_item: Option<ItemId>,
}

impl TreeBuilder {
    pub fn new(nesting: Nesting, ordered: bool) -> Self {
        Self {
            nesting,
            ordered,
            lists: vec![Vec::new()],
            items: Vec::new(),
            stack: Vec::new(),
            last_depth: 1,
            last_item: None,
        }
    }

    /// Add an entry at `depth` (0 is treated as 1).
    ///
    /// An increase opens one list per level, so under [`Nesting::Unlimited`]
    /// a jump to a huge depth (`h1$4000000000`) allocates that many lists.
    /// Callers that take depths from untrusted input should set a ceiling
    /// with [`Nesting::Max`].
    pub fn push(&mut self, depth: u32, content: ItemContent) {
        let depth = depth.max(1);

        if self.nesting == Nesting::Disabled {
            let item = self.new_item(content);
            self.lists[ROOT].push(item);
            return;
        }

        if depth > self.last_depth {
            let steps = self.clamp(depth).saturating_sub(self.last_depth);
            self.open_levels(steps);
        } else if depth < self.last_depth {
            let steps = self.clamp(self.last_depth).saturating_sub(depth);
            for _ in 0..steps {
                self.stack.pop();
            }
        }

        let item = self.new_item(content);
        let list = self.current_list();
        self.lists[list].push(item);
        self.last_depth = depth;
        self.last_item = Some(item);
    }

    /// Open `steps` nested lists below the last item. Every level but the
    /// innermost gets a placeholder item to host the next one.
    fn open_levels(&mut self, steps: u32) {
        if steps > DEEP_JUMP {
            log::debug!("opening {steps} nested lists for one entry");
        }
        let mut host = self.last_item;
        for step in 0..steps {
            let host_item = match host {
                Some(item) => item,
                None => {
                    // Nothing to nest under yet (first entry is deep)
                    let placeholder = self.new_item(ItemContent::Placeholder);
                    let list = self.current_list();
                    self.lists[list].push(placeholder);
                    placeholder
                }
            };

            let list = self.lists.len();
            self.lists.push(Vec::new());
            self.items[host_item].child = Some(list);
            self.stack.push(list);

            host = if step + 1 < steps {
                let placeholder = self.new_item(ItemContent::Placeholder);
                self.lists[list].push(placeholder);
                Some(placeholder)
            } else {
                None
            };
        }
    }

    /// Clamp a depth to one level below a positive ceiling.
    fn clamp(&self, depth: u32) -> u32 {
        match self.nesting.ceiling() {
            Some(ceiling) if depth > ceiling => ceiling.saturating_add(1),
            _ => depth,
        }
    }

    fn current_list(&self) -> ListId {
        self.stack.last().copied().unwrap_or(ROOT)
    }

    fn new_item(&mut self, content: ItemContent) -> ItemId {
        self.items.push(ArenaItem { content, child: None });
        self.items.len() - 1
    }

    /// Number of entries pushed so far, placeholders excluded.
    pub fn len(&self) -> usize {
        self.items.iter().filter(|i| !i.content.is_placeholder()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finish and return the root list.
    pub fn finish(mut self) -> TocList {
        self.take_list(ROOT)
    }

    fn take_list(&mut self, list: ListId) -> TocList {
        let ids = std::mem::take(&mut self.lists[list]);
        let items = ids
            .into_iter()
            .map(|id| {
                let content = std::mem::take(&mut self.items[id].content);
                let child = self.items[id].child;
                let children = child.map(|child| self.take_list(child));
                TocItem { content, children }
            })
            .collect();
        TocList {
            ordered: self.ordered,
            items,
        }
    }
}

/// Build a list tree from `(depth, content)` entries.
pub fn build_tree<I>(entries: I, nesting: Nesting, ordered: bool) -> TocList
where
    I: IntoIterator<Item = (u32, ItemContent)>,
{
    let mut builder = TreeBuilder::new(nesting, ordered);
    for (depth, content) in entries {
        builder.push(depth, content);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(depths: &[u32]) -> Vec<(u32, ItemContent)> {
        depths
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, ItemContent::label(format!("{i}"))))
            .collect()
    }

    /// Compact rendering: `[a [b] c]`, `_` for placeholders.
    fn shape(list: &TocList) -> String {
        let parts: Vec<String> = list
            .items
            .iter()
            .map(|item| {
                let mut s = match &item.content {
                    ItemContent::Label(l) => l.clone(),
                    ItemContent::Link { label, .. } => label.clone(),
                    ItemContent::Placeholder => "_".to_string(),
                };
                if let Some(children) = &item.children {
                    s.push(' ');
                    s.push_str(&shape(children));
                }
                s
            })
            .collect();
        format!("[{}]", parts.join(" "))
    }

    fn build(depths: &[u32], nesting: Nesting) -> TocList {
        build_tree(labels(depths), nesting, false)
    }

    #[test]
    fn test_empty_input() {
        let list = build(&[], Nesting::Unlimited);
        assert!(list.is_empty());
        assert_eq!(list.levels(), 1);
    }

    #[test]
    fn test_same_depth_run() {
        assert_eq!(shape(&build(&[1, 1, 1], Nesting::Unlimited)), "[0 1 2]");
        assert_eq!(shape(&build(&[2, 2], Nesting::Unlimited)), "[_ [0 1]]");
    }

    #[test]
    fn test_skipped_level_gets_placeholder() {
        // 1, 3, 2, 1: the `3` sits two levels under `0` with one placeholder
        // between; `2` returns to the depth-2 list; the last `1` to the root.
        let list = build(&[1, 3, 2, 1], Nesting::Unlimited);
        assert_eq!(shape(&list), "[0 [_ [1] 2] 3]");
        assert_eq!(list.levels(), 3);
    }

    #[test]
    fn test_first_entry_deeper_than_one() {
        assert_eq!(shape(&build(&[3, 1], Nesting::Unlimited)), "[_ [_ [0]] 1]");
    }

    #[test]
    fn test_ceiling_clamps_increase() {
        let list = build(&[1, 5, 6, 2, 1], Nesting::Max(2));
        assert_eq!(shape(&list), "[0 [_ [1 2] 3] 4]");
        assert_eq!(list.levels(), 3);
    }

    #[test]
    fn test_ceiling_bounds_huge_depth() {
        let list = build(&[1, 4_000_000_000, 2], Nesting::Max(2));
        assert_eq!(shape(&list), "[0 [_ [1] 2]]");
        assert_eq!(list.levels(), 3);
    }

    #[test]
    fn test_ceiling_one() {
        let list = build(&[1, 2, 3, 2, 1, 3], Nesting::Max(1));
        assert_eq!(shape(&list), "[0 [1 2 3] 4 [5]]");
    }

    #[test]
    fn test_nesting_disabled_flattens() {
        let list = build(&[3, 1, 4, 2, 2], Nesting::Disabled);
        assert_eq!(shape(&list), "[0 1 2 3 4]");
        assert_eq!(list.levels(), 1);
    }

    #[test]
    fn test_ordered_flag_propagates() {
        let list = build_tree(labels(&[1, 2]), Nesting::Unlimited, true);
        assert!(list.ordered);
        assert!(list.items[0].children.as_ref().unwrap().ordered);
    }

    #[test]
    fn test_zero_depth_is_depth_one() {
        assert_eq!(shape(&build(&[0, 2, 0], Nesting::Unlimited)), "[0 [1] 2]");
    }

    #[test]
    fn test_builder_len_ignores_placeholders() {
        let mut builder = TreeBuilder::new(Nesting::Unlimited, false);
        assert!(builder.is_empty());
        builder.push(4, ItemContent::link("A", "#a"));
        assert_eq!(builder.len(), 1);
    }

    /// Every depth sequence of length <= 5 over depths 1..=4 and every
    /// ceiling: entries keep their order, nothing is lost, and levels stay
    /// within bounds.
    #[test]
    fn test_exhaustive_small_sequences() {
        fn sequences(len: usize) -> Vec<Vec<u32>> {
            if len == 0 {
                return vec![vec![]];
            }
            let mut out = Vec::new();
            for prefix in sequences(len - 1) {
                for d in 1..=4 {
                    let mut s = prefix.clone();
                    s.push(d);
                    out.push(s);
                }
            }
            out
        }

        for len in 0..=5 {
            for depths in sequences(len) {
                for nesting in [Nesting::Unlimited, Nesting::Disabled, Nesting::Max(1), Nesting::Max(2), Nesting::Max(3)] {
                    let list = build(&depths, nesting);
                    let entries: Vec<String> = list
                        .walk()
                        .into_iter()
                        .filter_map(|(_, item)| match &item.content {
                            ItemContent::Label(l) => Some(l.clone()),
                            _ => None,
                        })
                        .collect();
                    let expected: Vec<String> = (0..depths.len()).map(|i| i.to_string()).collect();
                    assert_eq!(entries, expected, "{depths:?} {nesting:?}");

                    let max_levels = match nesting {
                        Nesting::Unlimited => depths.iter().copied().max().unwrap_or(1) as usize,
                        Nesting::Disabled => 1,
                        Nesting::Max(c) => c as usize + 1,
                    };
                    assert!(list.levels() <= max_levels, "{depths:?} {nesting:?}");
                }
            }
        }
    }

    #[test]
    fn test_serialize_list() {
        let list = build_tree(
            [
                (2, ItemContent::link("Intro", "#intro")),
                (1, ItemContent::label("Notes")),
            ],
            Nesting::Unlimited,
            false,
        );
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ordered": false,
                "items": [
                    {
                        "content": "placeholder",
                        "children": {
                            "ordered": false,
                            "items": [{ "content": { "link": { "label": "Intro", "href": "#intro" } } }]
                        }
                    },
                    { "content": { "label": "Notes" } }
                ]
            })
        );
    }

    #[test]
    fn test_unlimited_mirrors_depths() {
        let list = build(&[1, 2, 3, 4, 2], Nesting::Unlimited);
        let levels: Vec<usize> = list.walk().into_iter().map(|(level, _)| level).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 2]);
    }
}
