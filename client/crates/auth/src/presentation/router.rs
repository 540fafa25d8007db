//! Client Route Table
//!
//! Maps client paths to views and the authorization rule each one carries.

use crate::domain::route::{
    Destination, RouteRule, GOOGLE_CALLBACK_PATH, LOGIN_PATH, ROLE_SELECTION_PATH,
};
use crate::domain::value_object::Role;

/// Screens the client can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    GoogleCallback,
    RoleSelection,
    Registration(Role),
    Dashboard(Role),
}

/// A routable view with its rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub view: View,
    pub rule: RouteRule,
}

/// Path lookup result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Route(Route),
    /// `/` and unknown paths
    Redirect(Destination),
}

/// Route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<(String, Route)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        let mut routes = vec![
            (
                LOGIN_PATH.to_string(),
                Route {
                    view: View::Login,
                    rule: RouteRule::public().bouncing_signed_in(),
                },
            ),
            (
                GOOGLE_CALLBACK_PATH.to_string(),
                Route {
                    view: View::GoogleCallback,
                    rule: RouteRule::public(),
                },
            ),
            (
                ROLE_SELECTION_PATH.to_string(),
                Route {
                    view: View::RoleSelection,
                    rule: RouteRule::signed_in(),
                },
            ),
        ];

        for role in Role::ALL {
            routes.push((
                Destination::Registration(role).path(),
                Route {
                    view: View::Registration(role),
                    rule: RouteRule::role(role),
                },
            ));
            routes.push((
                Destination::Dashboard(role).path(),
                Route {
                    view: View::Dashboard(role),
                    rule: RouteRule::role(role).with_profile_gate(),
                },
            ));
        }

        Self { routes }
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `path`. Query string, fragment and trailing slash are ignored.
    pub fn resolve(&self, path: &str) -> Resolved {
        let path = normalize(path);
        self.routes
            .iter()
            .find(|(route_path, _)| *route_path == path)
            .map(|(_, route)| Resolved::Route(*route))
            .unwrap_or(Resolved::Redirect(Destination::Login))
    }
}

/// Path component of a client location, without trailing slash
pub fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
