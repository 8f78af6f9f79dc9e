use super::{Handler, PathParams, PathTemplate, RouteError, Verb};

/// A registered route
#[derive(Debug, Clone)]
struct Route {
    verb: Verb,
    template: PathTemplate,
    handler: Handler,
}

/// Result of a successful lookup
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub verb: Verb,
    /// Template of the route that matched, e.g. `/products/{slug}`
    pub template: &'a str,
    pub handler: &'a Handler,
    pub params: PathParams,
}

/// Immutable, ordered list of routes
///
/// Built once at startup through [`RouteTableBuilder`]; lookups scan in
/// registration order and the first route whose verb and template both
/// match wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Resolve a request method and (already prefix-stripped) path
    ///
    /// The method is compared case-insensitively. Methods outside the
    /// supported verb set never match.
    pub fn match_route(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        let verb: Verb = method.parse().ok()?;

        self.routes
            .iter()
            .filter(|route| route.verb == verb)
            .find_map(|route| {
                route.template.captures(path).map(|params| RouteMatch {
                    verb,
                    template: route.template.source(),
                    handler: &route.handler,
                    params,
                })
            })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `(verb, template)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (Verb, &str)> {
        self.routes
            .iter()
            .map(|route| (route.verb, route.template.source()))
    }
}

/// Collects routes before freezing them into a [`RouteTable`]
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    /// Register a route; the template is compiled here, once
    pub fn route(
        &mut self,
        verb: Verb,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<&mut Self, RouteError> {
        let template = PathTemplate::compile(template)?;
        tracing::trace!(%verb, template = template.source(), "Registered route");
        self.routes.push(Route {
            verb,
            template,
            handler: handler.into(),
        });
        Ok(self)
    }

    /// Register a route by method name (`"get"`, `"POST"`, ...)
    pub fn add(
        &mut self,
        method: &str,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<&mut Self, RouteError> {
        let verb = method.parse()?;
        self.route(verb, template, handler)
    }

    pub fn get(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self, RouteError> {
        self.route(Verb::Get, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self, RouteError> {
        self.route(Verb::Post, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self, RouteError> {
        self.route(Verb::Put, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Self, RouteError> {
        self.route(Verb::Delete, template, handler)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}
