//! Compiler configuration
//!
//! Settings come from the process environment through [`CompilerEnv`], so tests can
//! substitute a mock.

use stack_common::naming::DEFAULT_INIT_IMAGE;

use crate::ingress::IngressFlavor;

/// Environment variable selecting the ingress flavor (`v1` or `v1beta1`)
pub const INGRESS_FLAVOR_ENV: &str = "STACK_INGRESS_FLAVOR";
/// Environment variable overriding the permission-fixing init image
pub const INIT_IMAGE_ENV: &str = "STACK_INIT_IMAGE";

/// Trait for reading compiler configuration from the environment
#[cfg_attr(test, mockall::automock)]
pub trait CompilerEnv: Send + Sync {
    /// Requested ingress flavor, if any
    fn ingress_flavor(&self) -> Option<String>;

    /// Requested init container image, if any
    fn init_image(&self) -> Option<String>;
}

/// Default implementation that reads from environment variables
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEnv;

impl CompilerEnv for OsEnv {
    fn ingress_flavor(&self) -> Option<String> {
        std::env::var(INGRESS_FLAVOR_ENV).ok()
    }

    fn init_image(&self) -> Option<String> {
        std::env::var(INIT_IMAGE_ENV).ok()
    }
}

/// Settings shared by every synthesis of a compile run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Ingress API version to emit
    pub ingress_flavor: IngressFlavor,
    /// Image of the permission-fixing init container
    pub init_image: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            ingress_flavor: IngressFlavor::default(),
            init_image: DEFAULT_INIT_IMAGE.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Build the configuration from the environment, falling back to defaults
    ///
    /// Empty values count as unset; an unknown flavor is an error.
    pub fn from_env(env: &dyn CompilerEnv) -> stack_common::Result<Self> {
        let mut config = Self::default();

        if let Some(flavor) = env.ingress_flavor().filter(|v| !v.trim().is_empty()) {
            config.ingress_flavor = flavor.parse()?;
        }
        if let Some(image) = env.init_image().filter(|v| !v.trim().is_empty()) {
            config.init_image = image;
        }

        Ok(config)
    }

    /// Override the ingress flavor
    pub fn with_ingress_flavor(mut self, flavor: IngressFlavor) -> Self {
        self.ingress_flavor = flavor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_environment_is_empty() {
        let mut env = MockCompilerEnv::new();
        env.expect_ingress_flavor().returning(|| None);
        env.expect_init_image().returning(|| None);

        let config = CompilerConfig::from_env(&env).unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.ingress_flavor, IngressFlavor::V1);
        assert_eq!(config.init_image, "busybox");
    }

    #[test]
    fn reads_flavor_and_image() {
        let mut env = MockCompilerEnv::new();
        env.expect_ingress_flavor()
            .returning(|| Some("v1beta1".to_string()));
        env.expect_init_image()
            .returning(|| Some("registry.local/busybox:1.36".to_string()));

        let config = CompilerConfig::from_env(&env).unwrap();
        assert_eq!(config.ingress_flavor, IngressFlavor::V1Beta1);
        assert_eq!(config.init_image, "registry.local/busybox:1.36");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let mut env = MockCompilerEnv::new();
        env.expect_ingress_flavor().returning(|| Some("  ".to_string()));
        env.expect_init_image().returning(|| Some(String::new()));

        assert_eq!(
            CompilerConfig::from_env(&env).unwrap(),
            CompilerConfig::default()
        );
    }

    #[test]
    fn unknown_flavor_is_an_error() {
        let mut env = MockCompilerEnv::new();
        env.expect_ingress_flavor()
            .returning(|| Some("v2".to_string()));

        let err = CompilerConfig::from_env(&env).unwrap_err();
        assert!(err.to_string().contains("v2"));
    }

    #[test]
    fn flavor_override() {
        let config = CompilerConfig::default().with_ingress_flavor(IngressFlavor::V1Beta1);
        assert_eq!(config.ingress_flavor, IngressFlavor::V1Beta1);
    }
}
