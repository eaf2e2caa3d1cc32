//! Route admission guards.
//!
//! Guards are pure predicates over the [`SessionStore`]. They are evaluated
//! on every navigation and never cache a decision, so a sign-out takes
//! effect on the very next page.

use std::fmt;

use crate::session::SessionStore;

/// A page of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: forwards to the profile page.
    Home,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/profile`
    Profile,
    /// `/admin`
    Admin,
}

impl Route {
    /// The path of this page.
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Profile => "/profile",
            Route::Admin => "/admin",
        }
    }

    /// The guard protecting this page, if it is not public.
    pub fn guard(self) -> Option<Guard> {
        match self {
            Route::Login | Route::Register => None,
            Route::Home | Route::Profile => Some(Guard::RequireSession),
            Route::Admin => Some(Guard::RequireAdmin),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Render the requested page.
    Allow,
    /// Render this page instead.
    RedirectTo(Route),
}

/// An admission predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any authenticated session; otherwise `/login`.
    RequireSession,
    /// An admin session; `/login` without a session, `/` for other roles.
    RequireAdmin,
}

impl Guard {
    /// Decide whether the current session may see a guarded page.
    pub fn admit(self, session: &SessionStore) -> Admission {
        if !session.is_authenticated() {
            return Admission::RedirectTo(Route::Login);
        }

        match self {
            Guard::RequireSession => Admission::Allow,
            Guard::RequireAdmin if session.is_admin() => Admission::Allow,
            Guard::RequireAdmin => Admission::RedirectTo(Route::Home),
        }
    }
}

/// Resolve a navigation to `route` into the page that should be shown.
///
/// Applies the route's guard and follows redirects (including the `/`
/// forward to `/profile`) until a page admits the session.
pub fn navigate(route: Route, session: &SessionStore) -> Route {
    let mut current = route;
    // Every redirect chain ends at /login or /profile within a few hops.
    for _ in 0..4 {
        let admission = current
            .guard()
            .map_or(Admission::Allow, |guard| guard.admit(session));

        current = match (admission, current) {
            (Admission::RedirectTo(next), _) => next,
            (Admission::Allow, Route::Home) => Route::Profile,
            (Admission::Allow, page) => return page,
        };
    }
    current
}
