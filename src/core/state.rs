//! Panel view state owned by the view controller

use std::fmt;

/// Top-level screen shown on the deck
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Start screen: navigation, toggle and exit keys
    #[default]
    Home,
    /// An item from the item list has been selected
    ItemSelect(String),
    /// Asking whether to exit or restart
    ExitConfirm,
}

impl UiMode {
    /// Whether this is the selection screen for the given item
    pub fn is_item(&self, item: &str) -> bool {
        matches!(self, UiMode::ItemSelect(selected) if selected == item)
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiMode::Home => write!(f, "home"),
            UiMode::ItemSelect(item) => write!(f, "item:{}", item),
            UiMode::ExitConfirm => write!(f, "exit"),
        }
    }
}

/// Ordered labels with a wrapping cursor.
///
/// The list is never empty, so `selected` is always a valid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList {
    items: Vec<String>,
    selected: usize,
}

impl ItemList {
    /// Build a list with the cursor on the first item. Returns `None` for an empty list.
    pub fn new<I, S>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return None;
        }
        Some(Self { items, selected: 0 })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Never true for a list built through [`ItemList::new`]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Label under the cursor
    pub fn current(&self) -> &str {
        &self.items[self.selected]
    }

    /// Move the cursor forward, wrapping to the first item
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    /// Move the cursor back, wrapping to the last item
    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.items.len() - 1) % self.items.len();
    }
}

/// Latched UI flags that are not backed by any external state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleFlags {
    pub running: bool,
}

impl ToggleFlags {
    /// Flip the running flag and return the new value
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }
}

/// Everything the key resolver needs to know about the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: UiMode,
    pub items: ItemList,
    pub flags: ToggleFlags,
}

impl ViewState {
    pub fn new(items: ItemList) -> Self {
        Self {
            mode: UiMode::Home,
            items,
            flags: ToggleFlags::default(),
        }
    }
}
