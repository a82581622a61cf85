use tracing::debug;

use crate::declaration::{ActionFilter, Middleware, ResourceDeclaration};
use crate::error::RouterError;
use crate::router::{ResourceHandle, Router};

/// The seven canonical RESTful actions, in registration order.
pub const RESOURCE_ACTIONS: [&str; 7] = ["index", "create", "store", "show", "edit", "update", "destroy"];

/// Actions kept by [`ActionFilter::ApiOnly`].
pub const API_ACTIONS: [&str; 5] = ["index", "store", "show", "update", "destroy"];

/// Applies a [`ResourceDeclaration`] to the router's resource primitive.
pub struct ResourceExpander;

impl ResourceExpander {
    /// Register `decl` as a resource handled by `controller`, then configure it.
    ///
    /// # Errors
    ///
    /// Whatever the router's resource primitive rejects. Nothing is
    /// registered in that case.
    pub fn expand<R: Router>(decl: &ResourceDeclaration, controller: &str, router: &mut R) -> Result<(), RouterError> {
        let mut handle = router.resource(&decl.base_pattern, controller)?;
        Self::configure(decl, &mut handle);
        debug!(controller, base = %decl.base_pattern, "resource registered");
        Ok(())
    }

    /// Configuration steps, in fixed order: parameter renaming, the single
    /// action filter, per-action middleware, then the name override.
    pub fn configure<H: ResourceHandle>(decl: &ResourceDeclaration, handle: &mut H) {
        if let Some(params) = &decl.params {
            handle.params(params);
        }

        match &decl.filter {
            Some(ActionFilter::ApiOnly) => {
                handle.api_only();
            }
            Some(ActionFilter::Only(actions)) => {
                handle.only(actions);
            }
            Some(ActionFilter::Except(actions)) => {
                handle.except(actions);
            }
            None => {}
        }

        for rule in &decl.action_middleware {
            let middleware = Middleware::flatten([&rule.middleware]);
            handle.middleware(&rule.selector, &middleware);
        }

        if let Some(name) = &decl.name {
            handle.name(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::declaration::{ActionSelector, MiddlewareRef};

    /// Records every configuration call in order.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ResourceHandle for Recorder {
        fn params(&mut self, params: &BTreeMap<String, String>) -> &mut Self {
            self.calls.push(format!("params {params:?}"));
            self
        }

        fn middleware(&mut self, selector: &ActionSelector, middleware: &[MiddlewareRef]) -> &mut Self {
            let names: Vec<&str> = middleware.iter().map(MiddlewareRef::as_str).collect();
            self.calls.push(format!("middleware {selector:?} {names:?}"));
            self
        }

        fn api_only(&mut self) -> &mut Self {
            self.calls.push("api_only".into());
            self
        }

        fn only(&mut self, actions: &[String]) -> &mut Self {
            self.calls.push(format!("only {actions:?}"));
            self
        }

        fn except(&mut self, actions: &[String]) -> &mut Self {
            self.calls.push(format!("except {actions:?}"));
            self
        }

        fn name(&mut self, name: &str) -> &mut Self {
            self.calls.push(format!("name {name}"));
            self
        }
    }

    #[test]
    fn configuration_runs_in_fixed_order() {
        let decl = ResourceDeclaration::new("posts")
            .name("articles")
            .action_middleware("*", "auth")
            .filter(ActionFilter::ApiOnly)
            .params([("posts", "post")])
            .action_middleware(["store", "update"], ["validate", "audit"]);

        let mut recorder = Recorder::default();
        ResourceExpander::configure(&decl, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec![
                r#"params {"posts": "post"}"#.to_string(),
                "api_only".to_string(),
                r#"middleware All ["auth"]"#.to_string(),
                r#"middleware Many(["store", "update"]) ["validate", "audit"]"#.to_string(),
                "name articles".to_string(),
            ]
        );
    }

    #[test]
    fn bare_resource_makes_no_configuration_calls() {
        let mut recorder = Recorder::default();
        ResourceExpander::configure(&ResourceDeclaration::new("posts"), &mut recorder);
        assert!(recorder.calls.is_empty());
    }
}
