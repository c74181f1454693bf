use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::KnowledgeBase;
use crate::resolver::PreviewSizing;
use crate::views::{Route, ViewRegistry};

/// Presentation knobs (admins can modify at runtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub search_limit: u32,
    pub top_documents: u32,
    pub log_rows: u32,
    pub preview_width: u32,
    pub preview_rows: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            search_limit: 5,
            top_documents: 5,
            log_rows: 10,
            preview_width: 80,
            preview_rows: 15,
        }
    }
}

pub const VIEW_CONFIG_PARAMS: &str =
    "`search_limit`, `top_documents`, `log_rows`, `preview_width`, `preview_rows`";

impl ViewConfig {
    /// Preview size for the page a citation is opened from. The log
    /// inspector and chat sidebar are narrower than the search pane.
    pub fn sizing(&self, route: Route) -> PreviewSizing {
        let width = self.preview_width as usize;
        let rows = self.preview_rows as usize;
        match route {
            Route::Search | Route::Dashboard => PreviewSizing { width, max_rows: rows },
            Route::Chat => PreviewSizing {
                width: width * 3 / 4,
                max_rows: rows,
            },
            Route::QueryLogs => PreviewSizing {
                width: width / 2,
                max_rows: (rows / 2).max(1),
            },
        }
    }

    pub fn set(&mut self, param: &str, value: u32) -> Result<(), String> {
        let slot = match param {
            "search_limit" if (1..=20).contains(&value) => &mut self.search_limit,
            "top_documents" if (1..=25).contains(&value) => &mut self.top_documents,
            "log_rows" if (1..=50).contains(&value) => &mut self.log_rows,
            "preview_width" if (20..=200).contains(&value) => &mut self.preview_width,
            "preview_rows" if (1..=100).contains(&value) => &mut self.preview_rows,
            "search_limit" | "top_documents" | "log_rows" | "preview_width" | "preview_rows" => {
                return Err(format!("`{}` value {} is out of range", param, value));
            }
            _ => {
                return Err(format!("Unknown param `{}`. Valid: {}", param, VIEW_CONFIG_PARAMS));
            }
        };
        *slot = value;
        Ok(())
    }
}

pub struct AppState {
    pub api: Arc<dyn KnowledgeBase>,
    pub views: Arc<ViewRegistry>,
    pub admin_ids: HashSet<u64>,
    pub view_config: Arc<RwLock<ViewConfig>>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
