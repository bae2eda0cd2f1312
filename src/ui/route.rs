use crate::auth::Session;

/// Every screen the operator can reach, addressed by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Dashboard,
    Clients,
    ClientMemory(String),
    Finance,
    Services,
    Marketing,
    Templates,
    Settings,
}

/// Navigation bar order; `1`..`7` jump to these.
pub const NAV: [Route; 7] = [
    Route::Dashboard,
    Route::Clients,
    Route::Finance,
    Route::Services,
    Route::Marketing,
    Route::Templates,
    Route::Settings,
];

impl Route {
    /// Unknown paths land on `/landing`.
    pub fn parse(path: &str) -> Route {
        match path.trim_end_matches('/') {
            "" => Route::Dashboard,
            "/landing" => Route::Landing,
            "/login" => Route::Login,
            "/clients" => Route::Clients,
            "/finance" => Route::Finance,
            "/services" => Route::Services,
            "/marketing" => Route::Marketing,
            "/templates" => Route::Templates,
            "/settings" => Route::Settings,
            other => match other.strip_prefix("/client/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::ClientMemory(id.to_string()),
                _ => Route::Landing,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/landing".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Clients => "/clients".to_string(),
            Route::ClientMemory(id) => format!("/client/{id}"),
            Route::Finance => "/finance".to_string(),
            Route::Services => "/services".to_string(),
            Route::Marketing => "/marketing".to_string(),
            Route::Templates => "/templates".to_string(),
            Route::Settings => "/settings".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Canti OS",
            Route::Login => "Operator Login",
            Route::Dashboard => "Dashboard",
            Route::Clients => "Clients",
            Route::ClientMemory(_) => "Client Memory",
            Route::Finance => "Finance",
            Route::Services => "Services",
            Route::Marketing => "Marketing",
            Route::Templates => "Templates",
            Route::Settings => "Settings",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Landing | Route::Login)
    }

    /// Where a request for this route actually ends up.
    pub fn gate(self, session: Option<&Session>) -> Route {
        if self.is_protected() && session.is_none() {
            Route::Landing
        } else {
            self
        }
    }

    /// The nav entry for a `1`..`7` key press.
    pub fn from_nav_key(key: char) -> Option<Route> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        NAV.get(index).cloned()
    }

    /// Position in [`NAV`]; client memory highlights Clients.
    pub fn nav_index(&self) -> Option<usize> {
        let route = match self {
            Route::ClientMemory(_) => &Route::Clients,
            other => other,
        };
        NAV.iter().position(|r| r == route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            operator_id: "op-1".to_string(),
            email: "operator@canti.os".to_string(),
        }
    }

    #[test]
    fn paths_round_trip() {
        for route in NAV.iter().cloned().chain([
            Route::Landing,
            Route::Login,
            Route::ClientMemory("c1".to_string()),
        ]) {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn unknown_paths_go_to_landing() {
        assert_eq!(Route::parse("/nowhere"), Route::Landing);
        assert_eq!(Route::parse("/client/"), Route::Landing);
        assert_eq!(Route::parse("/client/c1/extra"), Route::Landing);
    }

    #[test]
    fn protected_routes_need_a_session() {
        assert_eq!(Route::Finance.gate(None), Route::Landing);
        assert_eq!(Route::ClientMemory("c1".to_string()).gate(None), Route::Landing);
        assert_eq!(Route::Login.gate(None), Route::Login);
        assert_eq!(Route::Finance.gate(Some(&session())), Route::Finance);
    }

    #[test]
    fn nav_keys_map_in_order() {
        assert_eq!(Route::from_nav_key('1'), Some(Route::Dashboard));
        assert_eq!(Route::from_nav_key('7'), Some(Route::Settings));
        assert_eq!(Route::from_nav_key('0'), None);
        assert_eq!(Route::from_nav_key('8'), None);
        assert_eq!(Route::ClientMemory("c2".to_string()).nav_index(), Some(1));
        assert_eq!(Route::Landing.nav_index(), None);
    }
}
