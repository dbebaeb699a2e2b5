//! Container context identification.

use std::fmt;

use serde::Serialize;

use crate::error::{ExplorerError, Result};

/// Identifies one container inside one pod.
///
/// Every listing and action call names its context explicitly, which is
/// what lets responses from an abandoned context be recognized and
/// dropped. Two contexts are the same container only when all three
/// components match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerContext {
    /// Pod the container runs in
    pub pod_name: String,
    /// Namespace of the pod
    pub namespace: String,
    /// Container name within the pod
    pub container_name: String,
}

impl ContainerContext {
    /// Create a new context.
    pub fn new(
        pod_name: impl Into<String>,
        namespace: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            pod_name: pod_name.into(),
            namespace: namespace.into(),
            container_name: container_name.into(),
        }
    }

    /// A context is usable only when all three components are non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.is_empty() {
            return Err(ExplorerError::InvalidContext("namespace is empty".to_string()));
        }
        if self.pod_name.is_empty() {
            return Err(ExplorerError::InvalidContext("pod name is empty".to_string()));
        }
        if self.container_name.is_empty() {
            return Err(ExplorerError::InvalidContext(
                "container name is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ContainerContext {
    /// `namespace/pod/container`, the form log lines use.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.namespace, self.pod_name, self.container_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_context_validates() {
        let ctx = ContainerContext::new("web-0", "default", "nginx");
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_empty_components_rejected() {
        let cases = [
            ContainerContext::new("", "default", "nginx"),
            ContainerContext::new("web-0", "", "nginx"),
            ContainerContext::new("web-0", "default", ""),
        ];
        for ctx in cases {
            assert!(matches!(
                ctx.validate(),
                Err(ExplorerError::InvalidContext(_))
            ));
        }
    }

    #[test]
    fn test_display_form() {
        let ctx = ContainerContext::new("web-0", "default", "nginx");
        assert_eq!(ctx.to_string(), "default/web-0/nginx");
    }

    #[test]
    fn test_equality_needs_all_components() {
        let a = ContainerContext::new("web-0", "default", "nginx");
        let b = ContainerContext::new("web-0", "default", "sidecar");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
