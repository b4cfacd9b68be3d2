//! HTTP handlers for the backlog.
//!
//! Every handler decodes, validates, calls the store, and answers. Anything
//! the client got wrong (bad JSON, empty description, unknown id) is a `400`.

use std::sync::Arc;

use http::StatusCode;
use tracing::{debug, info};

use super::{Backlog, UserStory};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};

/// `GET /userstories/open`: every open story as a JSON array.
pub async fn get_open_user_stories(store: Arc<dyn Backlog>, _req: Request) -> Response {
    Json(store.open_user_stories()).into_response()
}

/// `POST /userstories`: creates a story. The body's id, if any, is ignored.
pub async fn add_user_story(store: Arc<dyn Backlog>, req: Request) -> Response {
    let mut story = match decode(&req) {
        Ok(story) => story,
        Err(resp) => return resp,
    };
    story.id = 0;

    match store.save_user_story(story) {
        Ok(saved) => {
            info!(id = saved.id, "user story created");
            Response::builder()
                .status(StatusCode::CREATED)
                .header("location", &format!("/userstories/{}", saved.id))
                .serialize(&saved)
        }
        Err(e) => {
            debug!("add rejected: {e}");
            Response::status(StatusCode::BAD_REQUEST)
        }
    }
}

/// `PUT /userstories/{id}`: replaces an existing story. The id comes from
/// the body and must be non-zero.
pub async fn update_user_story(store: Arc<dyn Backlog>, req: Request) -> Response {
    let story = match decode(&req) {
        Ok(story) => story,
        Err(resp) => return resp,
    };
    if story.id == 0 {
        debug!(path = req.path(), "update rejected: missing id");
        return Response::status(StatusCode::BAD_REQUEST);
    }

    match store.save_user_story(story) {
        Ok(saved) => {
            info!(id = saved.id, closed = saved.closed, "user story updated");
            Response::builder().serialize(&saved)
        }
        Err(e) => {
            debug!("update rejected: {e}");
            Response::status(StatusCode::BAD_REQUEST)
        }
    }
}

fn decode(req: &Request) -> Result<UserStory, Response> {
    let story: UserStory = req.json().map_err(|e| {
        debug!(method = req.method(), path = req.path(), "invalid story body: {e}");
        Response::status(StatusCode::BAD_REQUEST)
    })?;
    story.validate().map_err(|e| {
        debug!(method = req.method(), path = req.path(), "{e}");
        Response::status(StatusCode::BAD_REQUEST)
    })?;
    Ok(story)
}
