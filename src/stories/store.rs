//! In-memory story storage.

use parking_lot::Mutex;

use super::{StoreError, UserStory};

/// The storage capability the HTTP handlers depend on.
pub trait Backlog: Send + Sync {
    /// Creates the story when `story.id == 0`, otherwise replaces the stored
    /// story with the same id. Returns the story as stored.
    fn save_user_story(&self, story: UserStory) -> Result<UserStory, StoreError>;

    /// Every story not yet closed, in insertion order.
    fn open_user_stories(&self) -> Vec<UserStory>;
}

/// Holds every user story saved in the application.
#[derive(Debug, Default)]
pub struct Datastore {
    inner: Mutex<Stories>,
}

#[derive(Debug, Default)]
struct Stories {
    stories: Vec<UserStory>,
    /// Highest id handed out so far.
    last_id: u64,
}

impl Datastore {
    pub fn all(&self) -> Vec<UserStory> {
        self.inner.lock().stories.clone()
    }
}

impl Backlog for Datastore {
    fn save_user_story(&self, mut story: UserStory) -> Result<UserStory, StoreError> {
        let mut inner = self.inner.lock();

        if story.id == 0 {
            inner.last_id += 1;
            story.id = inner.last_id;
            inner.stories.push(story.clone());
            return Ok(story);
        }

        let slot = inner.stories.iter_mut()
            .find(|s| s.id == story.id)
            .ok_or(StoreError::NotFound(story.id))?;
        *slot = story.clone();
        Ok(story)
    }

    fn open_user_stories(&self) -> Vec<UserStory> {
        self.inner.lock().stories.iter()
            .filter(|s| !s.closed)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, description: &str, closed: bool) -> UserStory {
        UserStory { id, description: description.into(), closed }
    }

    #[test]
    fn save_new_story_assigns_next_id() {
        let ds = Datastore::default();
        let saved = ds.save_user_story(UserStory::new("Find Airbnbs")).unwrap();
        assert_eq!(saved, story(1, "Find Airbnbs", false));

        let second = ds.save_user_story(UserStory::new("Get car repaired")).unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(ds.all(), [story(1, "Find Airbnbs", false), story(2, "Get car repaired", false)]);
    }

    #[test]
    fn update_existing_story() {
        let ds = Datastore::default();
        ds.save_user_story(UserStory::new("Find Airbnbs")).unwrap();

        let updated = ds.save_user_story(story(1, "Find Airbnbs", true)).unwrap();
        assert_eq!(updated, story(1, "Find Airbnbs", true));
        assert_eq!(ds.all(), [story(1, "Find Airbnbs", true)]);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let ds = Datastore::default();
        assert_eq!(
            ds.save_user_story(story(1, "Find Airbnbs", true)),
            Err(StoreError::NotFound(1)),
        );
        assert!(ds.all().is_empty());
    }

    #[test]
    fn open_stories_skip_closed_ones() {
        let ds = Datastore::default();
        for d in ["Find Airbnbs", "Book flights", "Get car repaired"] {
            ds.save_user_story(UserStory::new(d)).unwrap();
        }
        ds.save_user_story(story(2, "Book flights", true)).unwrap();

        assert_eq!(
            ds.open_user_stories(),
            [story(1, "Find Airbnbs", false), story(3, "Get car repaired", false)],
        );
    }

    #[test]
    fn empty_store_has_no_open_stories() {
        assert!(Datastore::default().open_user_stories().is_empty());
    }
}
