use crate::Panel;

/// Outcome of a tab switch: which panel to show and which to hide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSwitch {
    pub from: Panel,
    pub to: Panel,
    pub hidden: Vec<Panel>,
}

/// Tracks the visible panel. Transitions only happen through [`switch_to`].
///
/// [`switch_to`]: TabController::switch_to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabController {
    active: Panel,
}

impl Default for TabController {
    fn default() -> Self {
        Self::new(Panel::Analyzer)
    }
}

impl TabController {
    pub fn new(initial: Panel) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    /// Makes `panel` the visible one. Switching to the active panel is
    /// allowed and still yields a switch so the overlay gets reconciled.
    pub fn switch_to(&mut self, panel: Panel) -> TabSwitch {
        let from = std::mem::replace(&mut self.active, panel);
        TabSwitch {
            from,
            to: panel,
            hidden: Panel::ALL.into_iter().filter(|p| *p != panel).collect(),
        }
    }
}
