use super::{AssembleContext, Assembly, MatchContext, Route, RouteMatch};
use crate::error::RouterError;
use crate::params::Params;
use crate::request::RequestView;

/// Routes matched back to back, each starting where the previous one ended.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    routes: Vec<Route>,
}

impl Chain {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Every link must match. Without an offset the chain must consume the
    /// whole path.
    pub fn match_request(
        &self,
        request: &dyn RequestView,
        offset: Option<usize>,
        ctx: &mut MatchContext,
    ) -> Option<RouteMatch> {
        let must_terminate = offset.is_none();
        let start = offset.unwrap_or(0);
        let mut position = start;
        let mut matched: Option<RouteMatch> = None;

        for (index, route) in self.routes.iter().enumerate() {
            let Some(sub) = route.match_request(request, Some(position), ctx) else {
                if let Route::Method(method) = route {
                    let rest = &self.routes[index + 1..];
                    ctx.record_allowed_if(method.verbs(), |ctx| {
                        links_reach_end(rest, request, position, ctx)
                    });
                }
                return None;
            };
            position += sub.length();
            matched = Some(match matched {
                Some(acc) => acc.merge(sub),
                None => sub,
            });
        }

        if must_terminate && position != request.path().len() {
            return None;
        }
        Some(matched.unwrap_or_else(|| RouteMatch::new(Params::new(), 0)))
    }

    /// Concatenate each link. Every link but the last assembles as if a child
    /// follows, and params consumed by a link are hidden from later ones.
    pub fn assemble(
        &self,
        params: &Params,
        ctx: &mut AssembleContext<'_>,
    ) -> Result<Assembly, RouterError> {
        let child = ctx.take_child();
        let outer_has_child = ctx.has_child();
        let mut remaining = params.clone();
        let mut assembly = Assembly::empty();
        let last = self.routes.len().saturating_sub(1);

        for (index, route) in self.routes.iter().enumerate() {
            ctx.set_has_child(outer_has_child || index != last);
            let link = route.assemble(&remaining, ctx)?;
            remaining = remaining.without(link.assembled_params());
            assembly.append(link);
        }

        ctx.set_has_child(outer_has_child);
        ctx.set_child(child);
        Ok(assembly)
    }
}

fn links_reach_end(
    routes: &[Route],
    request: &dyn RequestView,
    mut position: usize,
    ctx: &mut MatchContext,
) -> bool {
    for route in routes {
        match route.match_request(request, Some(position), ctx) {
            Some(sub) => position += sub.length(),
            None => return false,
        }
    }
    position == request.path().len()
}
