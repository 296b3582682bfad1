//! Heading overlay controls.
//!
//! One control per heading block, floated into the gutter to the left of the
//! heading. Each control offers all six levels with the current one
//! disabled; choosing another level yields a [`HeadingCommand`].

use serde::Serialize;

use crate::config::OverlayConfig;
use crate::node::Offset;
use crate::tag::HeadingLevel;
use crate::tracker::TrackedBlockNode;

/// One entry of a control's level menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelOption {
    pub level: HeadingLevel,
    pub label: &'static str,
    pub shortcut: &'static str,
    pub icon: &'static str,
    pub enabled: bool,
}

/// The six level options for a heading currently at `current`.
pub fn level_options(current: HeadingLevel) -> [LevelOption; 6] {
    HeadingLevel::ALL.map(|level| LevelOption {
        level,
        label: level.label(),
        shortcut: level.shortcut(),
        icon: level.icon(),
        enabled: level != current,
    })
}

/// Request to change a heading's level.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingCommand<N> {
    pub node: N,
    pub level: HeadingLevel,
}

/// A positioned level switcher for one heading.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingControl<N> {
    pub node: N,
    /// Index of the heading among the root's children.
    pub index: usize,
    pub level: HeadingLevel,
    pub position: Offset,
    pub options: [LevelOption; 6],
}

impl<N: Clone> HeadingControl<N> {
    /// Pick a level from the menu. The current level yields nothing.
    pub fn select(&self, level: HeadingLevel) -> Option<HeadingCommand<N>> {
        let option = self.options.iter().find(|o| o.level == level)?;
        if !option.enabled {
            return None;
        }
        Some(HeadingCommand {
            node: self.node.clone(),
            level: option.level,
        })
    }

    /// Node-free view of the control, for hosts and snapshots.
    pub fn view(&self) -> ControlView {
        ControlView {
            index: self.index,
            level: self.level,
            position: self.position,
            options: self.options,
        }
    }
}

/// Serializable shape of a [`HeadingControl`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ControlView {
    pub index: usize,
    pub level: HeadingLevel,
    pub position: Offset,
    pub options: [LevelOption; 6],
}

/// Computes heading controls from a tracked node list.
#[derive(Clone, Debug, Default)]
pub struct HeadingOverlay {
    config: OverlayConfig,
}

impl HeadingOverlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Anchor for a heading whose element sits at `offset`.
    pub fn position(&self, offset: Offset, level: HeadingLevel) -> Offset {
        offset.translate(self.config.nudge(level), -self.config.gutter_width)
    }

    pub fn controls<N: Clone>(&self, nodes: &[TrackedBlockNode<N>]) -> Vec<HeadingControl<N>> {
        nodes
            .iter()
            .filter_map(|tracked| {
                let level = tracked.tag.heading_level()?;
                Some(HeadingControl {
                    node: tracked.node.clone(),
                    index: tracked.index,
                    level,
                    position: self.position(tracked.offset, level),
                    options: level_options(level),
                })
            })
            .collect()
    }
}
