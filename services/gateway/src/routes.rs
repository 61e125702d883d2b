//! Client-visible routes and the role guard in front of them

use std::fmt;

use crate::session::{Role, Session};

const DASHBOARD_ROLES: &[Role] = &[Role::User, Role::Staff, Role::Admin];
const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// A page of the booking site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Services,
    Specialists,
    SkinTest,
    /// Booking wizard, optionally with a preselected service
    Booking { service_id: Option<u64> },
    Login,
    Register,
    Unauthorized,
    /// `/dashboard/<section>`; the section is empty for the overview
    Dashboard(String),
    /// `/admin/<section>`; the section is empty for the overview
    Admin(String),
    NotFound,
}

/// Outcome of guarding a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(AppRoute),
}

impl AppRoute {
    /// Resolve a path (with optional query string) to a route
    pub fn parse(target: &str) -> AppRoute {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        let path = path.trim_end_matches('/');

        match path {
            "" => AppRoute::Home,
            "/services" => AppRoute::Services,
            "/specialists" => AppRoute::Specialists,
            "/skin-test" => AppRoute::SkinTest,
            "/booking" => AppRoute::Booking {
                service_id: query.and_then(service_from_query),
            },
            "/login" => AppRoute::Login,
            "/register" => AppRoute::Register,
            "/unauthorized" => AppRoute::Unauthorized,
            _ => {
                if let Some(section) = section_of(path, "/dashboard") {
                    AppRoute::Dashboard(section)
                } else if let Some(section) = section_of(path, "/admin") {
                    AppRoute::Admin(section)
                } else {
                    AppRoute::NotFound
                }
            }
        }
    }

    /// Canonical path of the route
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Services => "/services".to_string(),
            AppRoute::Specialists => "/specialists".to_string(),
            AppRoute::SkinTest => "/skin-test".to_string(),
            AppRoute::Booking { service_id: None } => "/booking".to_string(),
            AppRoute::Booking {
                service_id: Some(id),
            } => format!("/booking?service={}", id),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Register => "/register".to_string(),
            AppRoute::Unauthorized => "/unauthorized".to_string(),
            AppRoute::Dashboard(section) => join_section("/dashboard", section),
            AppRoute::Admin(section) => join_section("/admin", section),
            AppRoute::NotFound => "/404".to_string(),
        }
    }

    /// Roles allowed on the route, `None` for public pages
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            AppRoute::Dashboard(_) => Some(DASHBOARD_ROLES),
            AppRoute::Admin(_) => Some(ADMIN_ROLES),
            _ => None,
        }
    }

    /// Where a freshly logged-in user lands
    pub fn landing_for(role: Role) -> AppRoute {
        match role {
            Role::Admin => AppRoute::Admin(String::new()),
            Role::Staff | Role::User => AppRoute::Dashboard(String::new()),
        }
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide whether `session` may open `route`.
///
/// Anonymous visitors of protected pages go to the login page; signed-in
/// users whose role is missing or not allowed go to the unauthorized page.
pub fn guard(route: &AppRoute, session: &Session) -> Access {
    let Some(allowed) = route.required_roles() else {
        return Access::Allow;
    };

    if !session.is_authenticated() {
        return Access::Redirect(AppRoute::Login);
    }

    match session.active_role() {
        Some(role) if allowed.contains(&role) => Access::Allow,
        _ => Access::Redirect(AppRoute::Unauthorized),
    }
}

fn section_of(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(String::new())
    } else {
        rest.strip_prefix('/').map(str::to_string)
    }
}

fn join_section(prefix: &str, section: &str) -> String {
    if section.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, section)
    }
}

fn service_from_query(query: &str) -> Option<u64> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "service" || *key == "serviceId")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Option<Role>) -> Session {
        Session {
            token: Some("t".to_string()),
            role,
            user_id: Some("1".to_string()),
        }
    }

    #[test]
    fn test_parse_public_routes() {
        assert_eq!(AppRoute::parse("/"), AppRoute::Home);
        assert_eq!(AppRoute::parse("/services/"), AppRoute::Services);
        assert_eq!(AppRoute::parse("/skin-test"), AppRoute::SkinTest);
        assert_eq!(AppRoute::parse("/nope"), AppRoute::NotFound);
        assert_eq!(AppRoute::parse("/dashboards"), AppRoute::NotFound);
    }

    #[test]
    fn test_parse_booking_prefill() {
        assert_eq!(
            AppRoute::parse("/booking?service=5"),
            AppRoute::Booking { service_id: Some(5) }
        );
        assert_eq!(
            AppRoute::parse("/booking?ref=home&serviceId=12"),
            AppRoute::Booking {
                service_id: Some(12)
            }
        );
        assert_eq!(
            AppRoute::parse("/booking?service=abc"),
            AppRoute::Booking { service_id: None }
        );
    }

    #[test]
    fn test_parse_sections_and_paths() {
        let route = AppRoute::parse("/dashboard/bookings");
        assert_eq!(route, AppRoute::Dashboard("bookings".to_string()));
        assert_eq!(route.path(), "/dashboard/bookings");
        assert_eq!(AppRoute::parse("/admin"), AppRoute::Admin(String::new()));
        assert_eq!(AppRoute::landing_for(Role::Admin).to_string(), "/admin");
        assert_eq!(AppRoute::landing_for(Role::Staff).to_string(), "/dashboard");
    }

    #[test]
    fn test_guard_public_route_allows_anonymous() {
        assert_eq!(
            guard(&AppRoute::Booking { service_id: None }, &Session::default()),
            Access::Allow
        );
    }

    #[test]
    fn test_guard_protected_route_requires_login() {
        assert_eq!(
            guard(&AppRoute::Dashboard(String::new()), &Session::default()),
            Access::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_guard_checks_roles() {
        let admin_page = AppRoute::Admin("reports".to_string());
        assert_eq!(
            guard(&admin_page, &session(Some(Role::Staff))),
            Access::Redirect(AppRoute::Unauthorized)
        );
        assert_eq!(guard(&admin_page, &session(Some(Role::Admin))), Access::Allow);
        assert_eq!(
            guard(&AppRoute::Dashboard(String::new()), &session(Some(Role::User))),
            Access::Allow
        );
        assert_eq!(
            guard(&AppRoute::Dashboard(String::new()), &session(None)),
            Access::Redirect(AppRoute::Unauthorized)
        );
    }
}
