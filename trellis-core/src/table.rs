use std::collections::BTreeMap;

use http::Method;
use serde::{Serialize, Serializer};

use crate::declaration::{ActionSelector, Constraint, HandlerRef, Matcher, MiddlewareRef, Verb};
use crate::error::RouterError;
use crate::resource::{API_ACTIONS, RESOURCE_ACTIONS};
use crate::router::{ResourceHandle, RouteHandle, Router};

/// A route as committed to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedRoute {
    pub pattern: String,
    #[serde(serialize_with = "serialize_methods")]
    pub methods: Vec<Method>,
    pub handler: HandlerRef,
    pub name: Option<String>,
    pub constraints: Vec<Constraint>,
    pub middleware: Vec<MiddlewareRef>,
    pub domain: Option<String>,
}

fn serialize_methods<S: Serializer>(methods: &[Method], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(methods.iter().map(Method::as_str))
}

#[derive(Debug, Clone)]
struct ResourceRecord {
    segments: Vec<String>,
    controller: String,
    params: BTreeMap<String, String>,
    only: Option<Vec<String>>,
    except: Vec<String>,
    rules: Vec<(ActionSelector, Vec<MiddlewareRef>)>,
    name: Option<String>,
}

impl ResourceRecord {
    fn allows(&self, action: &str) -> bool {
        let kept = self
            .only
            .as_ref()
            .map_or(true, |only| only.iter().any(|a| a == action));
        kept && !self.except.iter().any(|a| a == action)
    }

    fn param_for(&self, index: usize) -> String {
        let segment = &self.segments[index];
        if let Some(param) = self.params.get(segment) {
            return param.clone();
        }
        if index + 1 == self.segments.len() {
            "id".to_string()
        } else {
            format!("{}_id", singular(segment))
        }
    }

    fn base_path(&self) -> String {
        let last = self.segments.len() - 1;
        let mut path = String::new();
        for (index, segment) in self.segments.iter().enumerate() {
            path.push('/');
            path.push_str(segment);
            if index < last {
                path.push_str("/:");
                path.push_str(&self.param_for(index));
            }
        }
        path
    }

    fn route_for(&self, action: &str) -> CommittedRoute {
        let base = self.base_path();
        let id = format!(":{}", self.param_for(self.segments.len() - 1));
        let (pattern, methods) = match action {
            "index" => (base, Verb::Get.methods()),
            "create" => (format!("{base}/create"), Verb::Get.methods()),
            "store" => (base, Verb::Post.methods()),
            "show" => (format!("{base}/{id}"), Verb::Get.methods()),
            "edit" => (format!("{base}/{id}/edit"), Verb::Get.methods()),
            "update" => (format!("{base}/{id}"), vec![Method::PUT, Method::PATCH]),
            _ => (format!("{base}/{id}"), Verb::Delete.methods()),
        };
        let prefix = self
            .name
            .clone()
            .unwrap_or_else(|| self.segments.join("."));
        let middleware = self
            .rules
            .iter()
            .filter(|(selector, _)| selector.matches(action))
            .flat_map(|(_, middleware)| middleware.iter().cloned())
            .collect();
        CommittedRoute {
            pattern,
            methods,
            handler: HandlerRef::new(self.controller.clone(), action),
            name: Some(format!("{prefix}.{action}")),
            constraints: Vec::new(),
            middleware,
            domain: None,
        }
    }
}

/// Naive singular used for parent parameter names (`users` -> `user`).
fn singular(segment: &str) -> String {
    if let Some(stem) = segment.strip_suffix("ies") {
        format!("{stem}y")
    } else if segment.len() > 1 && segment.ends_with('s') && !segment.ends_with("ss") {
        segment[..segment.len() - 1].to_string()
    } else {
        segment.to_string()
    }
}

/// In-memory route table implementing the [`Router`] contract.
///
/// Resources are kept as records and expanded into their actions by
/// [`routes`](RouteTable::routes), so configuration calls made after
/// registration still apply to every generated action.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CommittedRoute>,
    resources: Vec<ResourceRecord>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every committed route: single routes first, then resource actions,
    /// each in registration order.
    pub fn routes(&self) -> Vec<CommittedRoute> {
        let mut routes = self.routes.clone();
        for resource in &self.resources {
            routes.extend(
                RESOURCE_ACTIONS
                    .iter()
                    .filter(|action| resource.allows(action))
                    .map(|action| resource.route_for(action)),
            );
        }
        routes
    }

    pub fn find_by_name(&self, name: &str) -> Option<CommittedRoute> {
        self.routes()
            .into_iter()
            .find(|route| route.name.as_deref() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.routes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Router for RouteTable {
    type Route<'a> = TableRoute<'a>;
    type Resource<'a> = TableResource<'a>;

    fn route(&mut self, pattern: &str, methods: &[Method], handler: HandlerRef) -> TableRoute<'_> {
        self.routes.push(CommittedRoute {
            pattern: pattern.to_string(),
            methods: methods.to_vec(),
            handler,
            name: None,
            constraints: Vec::new(),
            middleware: Vec::new(),
            domain: None,
        });
        let index = self.routes.len() - 1;
        TableRoute {
            route: &mut self.routes[index],
        }
    }

    fn resource(&mut self, base_pattern: &str, controller: &str) -> Result<TableResource<'_>, RouterError> {
        let invalid = |reason: &str| RouterError::InvalidResource {
            base: base_pattern.to_string(),
            reason: reason.to_string(),
        };
        let segments: Vec<String> = base_pattern
            .split(['/', '.'])
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return Err(invalid("base pattern is empty"));
        }
        if segments
            .iter()
            .any(|s| s.starts_with(':') || s.starts_with('*') || s.contains('{'))
        {
            return Err(invalid("base pattern cannot contain parameters"));
        }
        self.resources.push(ResourceRecord {
            segments,
            controller: controller.to_string(),
            params: BTreeMap::new(),
            only: None,
            except: Vec::new(),
            rules: Vec::new(),
            name: None,
        });
        let index = self.resources.len() - 1;
        Ok(TableResource {
            record: &mut self.resources[index],
        })
    }
}

pub struct TableRoute<'a> {
    route: &'a mut CommittedRoute,
}

impl RouteHandle for TableRoute<'_> {
    fn name(&mut self, name: &str) -> &mut Self {
        self.route.name = Some(name.to_string());
        self
    }

    fn constraint(&mut self, key: &str, matcher: &Matcher) -> &mut Self {
        self.route.constraints.push(Constraint {
            key: key.to_string(),
            matcher: matcher.clone(),
        });
        self
    }

    fn middleware(&mut self, middleware: &MiddlewareRef) -> &mut Self {
        self.route.middleware.push(middleware.clone());
        self
    }

    fn domain(&mut self, domain: &str) -> &mut Self {
        self.route.domain = Some(domain.to_string());
        self
    }
}

pub struct TableResource<'a> {
    record: &'a mut ResourceRecord,
}

impl ResourceHandle for TableResource<'_> {
    fn params(&mut self, params: &BTreeMap<String, String>) -> &mut Self {
        self.record
            .params
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    fn middleware(&mut self, selector: &ActionSelector, middleware: &[MiddlewareRef]) -> &mut Self {
        self.record.rules.push((selector.clone(), middleware.to_vec()));
        self
    }

    fn api_only(&mut self) -> &mut Self {
        self.only(&API_ACTIONS.map(str::to_string))
    }

    fn only(&mut self, actions: &[String]) -> &mut Self {
        self.record.only = Some(actions.to_vec());
        self
    }

    fn except(&mut self, actions: &[String]) -> &mut Self {
        self.record.except.extend(actions.iter().cloned());
        self
    }

    fn name(&mut self, name: &str) -> &mut Self {
        self.record.name = Some(name.to_string());
        self
    }
}
