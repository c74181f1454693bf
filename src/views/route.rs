/// Which dashboard page a session is looking at. Owned by the session and
/// handed to renderers; nothing reads it from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Dashboard,
    QueryLogs,
    Search,
    Chat,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Dashboard, Route::QueryLogs, Route::Search, Route::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::QueryLogs => "Query Logs",
            Route::Search => "Search Documents",
            Route::Chat => "Chat",
        }
    }
}

/// Navigation header with the active page highlighted.
pub fn render_nav(current: Route) -> String {
    Route::ALL
        .iter()
        .map(|&route| {
            if route == current {
                format!("**[{}]**", route.title())
            } else {
                route.title().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" · ")
}
