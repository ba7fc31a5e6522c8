//! Configuration panel readiness

use std::collections::BTreeSet;

use satlink_core::{SatlinkError, SatlinkResult};

/// Tracks which required panels the operator has completed. The run may
/// only start once every panel is ready.
#[derive(Debug, Clone)]
pub struct PanelReadiness {
    required: Vec<String>,
    complete: BTreeSet<String>,
}

impl PanelReadiness {
    pub fn new<I, T>(required: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        PanelReadiness {
            required: required.into_iter().map(Into::into).collect(),
            complete: BTreeSet::new(),
        }
    }

    /// Mark a panel complete. Returns false for a panel that is not required.
    pub fn mark_complete(&mut self, panel: &str) -> bool {
        if !self.required.iter().any(|p| p == panel) {
            tracing::warn!(panel, "unknown panel");
            return false;
        }
        if self.complete.insert(panel.to_string()) {
            tracing::info!(panel, remaining = self.missing().len(), "panel complete");
        }
        true
    }

    /// Required panels not yet complete, in declaration order
    pub fn missing(&self) -> Vec<String> {
        self.required
            .iter()
            .filter(|p| !self.complete.contains(p.as_str()))
            .cloned()
            .collect()
    }

    pub fn all_ready(&self) -> bool {
        self.required.iter().all(|p| self.complete.contains(p))
    }

    pub fn ensure_ready(&self) -> SatlinkResult<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SatlinkError::PanelsIncomplete(missing))
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_gated_until_all_ready() {
        let mut panels = PanelReadiness::new(["orbit", "terminal"]);
        assert!(!panels.all_ready());
        assert!(matches!(
            panels.ensure_ready(),
            Err(SatlinkError::PanelsIncomplete(ref m)) if m == &["orbit", "terminal"]
        ));

        assert!(panels.mark_complete("terminal"));
        assert_eq!(panels.missing(), vec!["orbit"]);
        assert!(panels.mark_complete("orbit"));
        assert!(panels.all_ready());
        assert!(panels.ensure_ready().is_ok());
    }

    #[test]
    fn test_unknown_panel_rejected() {
        let mut panels = PanelReadiness::new(["orbit"]);
        assert!(!panels.mark_complete("weather"));
        assert_eq!(panels.missing(), vec!["orbit"]);
        assert!(!panels.all_ready());
    }

    #[test]
    fn test_no_required_panels() {
        let panels = PanelReadiness::new(Vec::<String>::new());
        assert!(panels.all_ready());
        assert!(panels.ensure_ready().is_ok());
    }
}
