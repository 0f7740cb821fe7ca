//! Key actions, icon references and the resolved per-key style

use std::fmt;
use std::path::PathBuf;

/// Category folder holding the deck icon set
pub const ICON_CATEGORY: &str = "streamdeck";

/// What pressing a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open the exit confirmation screen
    Exit,
    /// Move the item cursor back
    NavigatePrev,
    /// Move the item cursor forward
    NavigateNext,
    /// Enter the selection screen for the item under the cursor
    ConfirmSelection,
    /// Flip the running flag
    ToggleRunning,
    /// Static icon with no behavior
    Decorative,
    PlayPause,
    Previous,
    Next,
    VolumeUp,
    VolumeDown,
    /// Tear down the deck and exit
    ConfirmExit,
    /// Leave the exit screen
    CancelExit,
    /// Tear down the deck and ask for a restart
    ConfirmRestart,
    /// Unassigned key
    Empty,
}

impl Action {
    /// Symbolic name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Exit => "exit",
            Action::NavigatePrev => "navigatePrev",
            Action::NavigateNext => "navigateNext",
            Action::ConfirmSelection => "confirmSelection",
            Action::ToggleRunning => "toggleRunning",
            Action::Decorative => "decorative",
            Action::PlayPause => "playPause",
            Action::Previous => "previous",
            Action::Next => "next",
            Action::VolumeUp => "volumeUp",
            Action::VolumeDown => "volumeDown",
            Action::ConfirmExit => "confirmExit",
            Action::CancelExit => "cancelExit",
            Action::ConfirmRestart => "confirmRestart",
            Action::Empty => "empty",
        }
    }

}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical reference to an icon file under the asset root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconRef {
    category: Option<&'static str>,
    name: &'static str,
}

impl IconRef {
    /// Icon from the deck icon set (`streamdeck/<name>.png`)
    pub const fn deck(name: &'static str) -> Self {
        Self {
            category: Some(ICON_CATEGORY),
            name,
        }
    }

    /// Icon directly under the asset root (`<name>.png`)
    pub const fn root(name: &'static str) -> Self {
        Self {
            category: None,
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Path relative to the asset root
    pub fn relative_path(&self) -> PathBuf {
        let file = format!("{}.png", self.name);
        match self.category {
            Some(category) => PathBuf::from(category).join(file),
            None => PathBuf::from(file),
        }
    }
}

/// Tile shown for unassigned keys
pub const PLACEHOLDER_ICON: IconRef = IconRef::root("Released");

/// Resolved look and behavior of one key at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct KeyStyle {
    pub action: Action,
    /// `None` renders the rotating item list instead of an icon
    pub icon: Option<IconRef>,
    /// Font file name under the asset root
    pub font: String,
    pub label: String,
}

impl KeyStyle {
    pub fn name(&self) -> &'static str {
        self.action.name()
    }

    /// Fallback style for keys no layer claims
    pub fn empty(font: &str) -> Self {
        Self {
            action: Action::Empty,
            icon: Some(PLACEHOLDER_ICON),
            font: font.to_string(),
            label: String::new(),
        }
    }
}
