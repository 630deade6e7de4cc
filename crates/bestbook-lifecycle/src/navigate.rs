//! The routing primitive the lifecycle layer navigates with.

/// Moves the UI to another route.
///
/// The host application supplies this (a router, a window location
/// setter, a test recorder). Any `Fn(&str)` closure qualifies.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}
