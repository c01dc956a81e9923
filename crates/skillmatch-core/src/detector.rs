//! Violation detection.
//!
//! The detector is the single translator from ad hoc host events
//! (visibility, focus, context menu, keyboard, fullscreen) into the
//! session's typed violation categories. It is armed only while an
//! assessment is in progress and disarmed on every exit path, so a stray
//! signal delivered after a session ends translates to nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::ViolationKind;

/// A modifier key observed in a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Alt,
    Control,
    Meta,
}

/// Raw environment signals delivered by the host.
///
/// No payload beyond the signal type is required; the host adapter is
/// expected to have already filtered its native events down to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentSignal {
    /// The page or tab lost visibility.
    VisibilityHidden,
    /// The window lost input focus.
    FocusLost,
    /// A context menu (right-click) was invoked.
    ContextMenu,
    /// A modifier key was pressed.
    ModifierKey(ModifierKey),
    /// Fullscreen was exited without an explicit submit.
    FullscreenExited,
}

impl fmt::Display for EnvironmentSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentSignal::VisibilityHidden => write!(f, "visibility-hidden"),
            EnvironmentSignal::FocusLost => write!(f, "focus-lost"),
            EnvironmentSignal::ContextMenu => write!(f, "context-menu"),
            EnvironmentSignal::ModifierKey(ModifierKey::Alt) => write!(f, "modifier-alt"),
            EnvironmentSignal::ModifierKey(ModifierKey::Control) => write!(f, "modifier-ctrl"),
            EnvironmentSignal::ModifierKey(ModifierKey::Meta) => write!(f, "modifier-meta"),
            EnvironmentSignal::FullscreenExited => write!(f, "fullscreen-exit"),
        }
    }
}

impl FromStr for EnvironmentSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visibility-hidden" | "tab-hidden" => Ok(EnvironmentSignal::VisibilityHidden),
            "focus-lost" | "blur" => Ok(EnvironmentSignal::FocusLost),
            "context-menu" | "right-click" => Ok(EnvironmentSignal::ContextMenu),
            "modifier-alt" => Ok(EnvironmentSignal::ModifierKey(ModifierKey::Alt)),
            "modifier-ctrl" => Ok(EnvironmentSignal::ModifierKey(ModifierKey::Control)),
            "modifier-meta" => Ok(EnvironmentSignal::ModifierKey(ModifierKey::Meta)),
            "fullscreen-exit" => Ok(EnvironmentSignal::FullscreenExited),
            other => Err(format!("unknown environment signal: {other}")),
        }
    }
}

/// Translates environment signals into violation categories while armed.
#[derive(Debug, Default)]
pub struct ViolationDetector {
    armed: bool,
}

impl ViolationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start translating signals. Called on entry to `InProgress`.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop translating signals. Called on every exit from `InProgress`,
    /// including termination and timer expiry.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Map a signal to its violation category, or `None` while disarmed.
    pub fn translate(&self, signal: EnvironmentSignal) -> Option<ViolationKind> {
        if !self.armed {
            tracing::debug!(%signal, "signal ignored while disarmed");
            return None;
        }
        Some(match signal {
            EnvironmentSignal::VisibilityHidden => ViolationKind::TabSwitch,
            EnvironmentSignal::FocusLost => ViolationKind::FocusLoss,
            EnvironmentSignal::ContextMenu => ViolationKind::RightClick,
            EnvironmentSignal::ModifierKey(_) => ViolationKind::ShortcutKey,
            EnvironmentSignal::FullscreenExited => ViolationKind::FullscreenExit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_detector_translates_nothing() {
        let detector = ViolationDetector::new();
        assert!(!detector.is_armed());
        assert_eq!(detector.translate(EnvironmentSignal::FocusLost), None);
    }

    #[test]
    fn armed_detector_maps_every_signal() {
        let mut detector = ViolationDetector::new();
        detector.arm();
        assert_eq!(
            detector.translate(EnvironmentSignal::VisibilityHidden),
            Some(ViolationKind::TabSwitch)
        );
        assert_eq!(
            detector.translate(EnvironmentSignal::FocusLost),
            Some(ViolationKind::FocusLoss)
        );
        assert_eq!(
            detector.translate(EnvironmentSignal::ContextMenu),
            Some(ViolationKind::RightClick)
        );
        assert_eq!(
            detector.translate(EnvironmentSignal::ModifierKey(ModifierKey::Control)),
            Some(ViolationKind::ShortcutKey)
        );
        assert_eq!(
            detector.translate(EnvironmentSignal::ModifierKey(ModifierKey::Meta)),
            Some(ViolationKind::ShortcutKey)
        );
        assert_eq!(
            detector.translate(EnvironmentSignal::FullscreenExited),
            Some(ViolationKind::FullscreenExit)
        );
    }

    #[test]
    fn disarm_takes_effect_immediately() {
        let mut detector = ViolationDetector::new();
        detector.arm();
        assert!(detector.translate(EnvironmentSignal::ContextMenu).is_some());
        detector.disarm();
        assert_eq!(detector.translate(EnvironmentSignal::ContextMenu), None);
    }

    #[test]
    fn signal_parse_accepts_aliases() {
        assert_eq!(
            "blur".parse::<EnvironmentSignal>().unwrap(),
            EnvironmentSignal::FocusLost
        );
        assert_eq!(
            "right-click".parse::<EnvironmentSignal>().unwrap(),
            EnvironmentSignal::ContextMenu
        );
        assert_eq!(
            "modifier-alt".parse::<EnvironmentSignal>().unwrap(),
            EnvironmentSignal::ModifierKey(ModifierKey::Alt)
        );
        assert!("telepathy".parse::<EnvironmentSignal>().is_err());
    }

    #[test]
    fn signal_display_roundtrips_through_parse() {
        for signal in [
            EnvironmentSignal::VisibilityHidden,
            EnvironmentSignal::FocusLost,
            EnvironmentSignal::ContextMenu,
            EnvironmentSignal::ModifierKey(ModifierKey::Meta),
            EnvironmentSignal::FullscreenExited,
        ] {
            let parsed: EnvironmentSignal = signal.to_string().parse().unwrap();
            assert_eq!(parsed, signal);
        }
    }
}
