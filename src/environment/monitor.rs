use crate::integrity::{Finding, Severity, ViolationKind};

use super::events::{EnvironmentEvent, KeyEvent};

/// Keys flagged on their own: dev-tools panel, reload, screen capture.
const FLAGGED_KEYS: [&str; 3] = ["F12", "F5", "PrintScreen"];

/// True for the dev-tools, view-source, and app-switch shortcuts.
fn is_flagged_combo(event: &KeyEvent) -> bool {
    let key = event.key.as_str();
    (event.ctrl && event.shift && key == "I")
        || (event.ctrl && event.shift && key == "C")
        || (event.ctrl && key == "u")
        || (event.alt && key == "Tab")
}

pub fn is_suspicious_key(event: &KeyEvent) -> bool {
    FLAGGED_KEYS.contains(&event.key.as_str()) || is_flagged_combo(event)
}

/// Map one environment signal to a finding. No debouncing: every qualifying
/// event produces its own finding.
pub fn classify(event: &EnvironmentEvent) -> Option<Finding> {
    match event {
        EnvironmentEvent::VisibilityHidden => Some(Finding::new(
            ViolationKind::TabSwitch,
            "User switched tabs or minimized window",
            Severity::Medium,
        )),
        EnvironmentEvent::WindowBlur => Some(Finding::new(
            ViolationKind::WindowBlur,
            "Window lost focus",
            Severity::Medium,
        )),
        EnvironmentEvent::KeyDown(key) if is_suspicious_key(key) => Some(Finding::new(
            ViolationKind::SuspiciousKeystroke,
            format!("Suspicious key combination: {}", key.key),
            Severity::Low,
        )),
        EnvironmentEvent::KeyDown(_) | EnvironmentEvent::VisibilityVisible => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_and_blur_are_medium() {
        let hidden = classify(&EnvironmentEvent::VisibilityHidden).unwrap();
        assert_eq!(hidden.kind, ViolationKind::TabSwitch);
        assert_eq!(hidden.severity, Severity::Medium);

        let blur = classify(&EnvironmentEvent::WindowBlur).unwrap();
        assert_eq!(blur.kind, ViolationKind::WindowBlur);
        assert_eq!(blur.severity, Severity::Medium);

        assert!(classify(&EnvironmentEvent::VisibilityVisible).is_none());
    }

    #[test]
    fn test_flagged_keys() {
        for key in ["F12", "F5", "PrintScreen"] {
            let finding = classify(&EnvironmentEvent::KeyDown(KeyEvent::plain(key))).unwrap();
            assert_eq!(finding.kind, ViolationKind::SuspiciousKeystroke);
            assert_eq!(finding.severity, Severity::Low);
            assert!(finding.description.ends_with(key));
        }
    }

    #[test]
    fn test_flagged_combos() {
        assert!(is_suspicious_key(&KeyEvent::plain("I").with_ctrl().with_shift()));
        assert!(is_suspicious_key(&KeyEvent::plain("C").with_ctrl().with_shift()));
        assert!(is_suspicious_key(&KeyEvent::plain("u").with_ctrl()));
        assert!(is_suspicious_key(&KeyEvent::plain("Tab").with_alt()));
    }

    #[test]
    fn test_ordinary_typing_is_ignored() {
        assert!(!is_suspicious_key(&KeyEvent::plain("a")));
        assert!(!is_suspicious_key(&KeyEvent::plain("I").with_ctrl()));
        assert!(!is_suspicious_key(&KeyEvent::plain("Tab")));
        assert!(!is_suspicious_key(&KeyEvent::plain("c").with_ctrl()));
        assert!(classify(&EnvironmentEvent::KeyDown(KeyEvent::plain("Enter"))).is_none());
    }
}
