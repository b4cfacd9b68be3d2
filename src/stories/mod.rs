//! The user-story backlog: the application served by the router.
//!
//! | Method | Pattern              | Handler                      |
//! |--------|----------------------|------------------------------|
//! | GET    | `/userstories/open`  | [`get_open_user_stories`]    |
//! | POST   | `/userstories`       | [`add_user_story`]           |
//! | PUT    | `/userstories/\d+`   | [`update_user_story`]        |

mod handlers;
mod store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::Request;
use crate::router::RouteTable;

pub use handlers::{add_user_story, get_open_user_stories, update_user_story};
pub use store::{Backlog, Datastore};

/// A user story that is still open or already closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStory {
    #[serde(alias = "ID", alias = "Id")]
    pub id: u64,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "Closed")]
    pub closed: bool,
}

impl UserStory {
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user story {0} was not found")]
    NotFound(u64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("user story description is empty")]
    EmptyDescription,
}

/// The backlog's route table, registered in precedence order.
pub fn routes(store: Arc<dyn Backlog>) -> RouteTable {
    let open = Arc::clone(&store);
    let add = Arc::clone(&store);
    let update = store;

    RouteTable::new()
        .register("/userstories/open", "GET", move |req: Request| {
            get_open_user_stories(Arc::clone(&open), req)
        })
        .register("/userstories", "POST", move |req: Request| {
            add_user_story(Arc::clone(&add), req)
        })
        .register(r"/userstories/\d+", "PUT", move |req: Request| {
            update_user_story(Arc::clone(&update), req)
        })
}
