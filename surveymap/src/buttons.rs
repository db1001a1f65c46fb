// Copyright 2025 the Surveymap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

/// What a mapped button does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Zoom out one level.
    ZoomOut,
    /// Zoom in one level.
    ZoomIn,
    /// Cycle the map mode forward.
    CycleMode,
    /// Switch between the color and greyscale palettes.
    ToggleColor,
}

/// Host button identifiers for the four minimap actions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonMap {
    /// Zooms out.
    pub up: i32,
    /// Zooms in.
    pub down: i32,
    /// Cycles the map mode.
    pub enter: i32,
    /// Toggles the color scheme.
    pub escape: i32,
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            up: 0,
            down: 1,
            enter: 2,
            escape: 3,
        }
    }
}

impl ButtonMap {
    /// Action bound to `button`, or `None` if it is unmapped.
    ///
    /// If one identifier is bound twice, the first of `up`, `down`, `enter`,
    /// `escape` wins.
    pub fn action(&self, button: i32) -> Option<ButtonAction> {
        [
            (self.up, ButtonAction::ZoomOut),
            (self.down, ButtonAction::ZoomIn),
            (self.enter, ButtonAction::CycleMode),
            (self.escape, ButtonAction::ToggleColor),
        ]
        .into_iter()
        .find_map(|(id, action)| (id == button).then_some(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let map = ButtonMap::default();
        assert_eq!(map.action(0), Some(ButtonAction::ZoomOut));
        assert_eq!(map.action(1), Some(ButtonAction::ZoomIn));
        assert_eq!(map.action(2), Some(ButtonAction::CycleMode));
        assert_eq!(map.action(3), Some(ButtonAction::ToggleColor));
        assert_eq!(map.action(4), None);
        assert_eq!(map.action(-1), None);
    }

    #[test]
    fn rebinding() {
        let map = ButtonMap {
            up: 10,
            down: 11,
            enter: 12,
            escape: 10,
        };
        assert_eq!(map.action(0), None);
        assert_eq!(map.action(10), Some(ButtonAction::ZoomOut));
        assert_eq!(map.action(12), Some(ButtonAction::CycleMode));
    }
}
