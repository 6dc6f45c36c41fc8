use crate::collection::PagedCollection;
use crate::domain::{User, UserId};

/// Shown when the remote store fails a fetch without saying why.
pub const FETCH_ERROR_FALLBACK: &str = "Error loading users";

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsersView {
    pub users: Vec<User>,
    pub selected_user: Option<User>,
    pub loading: bool,
    pub has_more: bool,
    pub error: Option<String>,
}

/// Events the service reduces into state. Each one is either an intent that
/// needs no remote work or the outcome of a gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersEvent {
    UserSelected(Option<User>),
    LocalUpdateApplied(User),
    FetchPending,
    FetchFulfilled(Vec<User>),
    FetchRejected(String),
    UpdateRolledBack(User),
}

/// Everything the users service owns.
#[derive(Debug, Clone)]
pub struct UsersState {
    collection: PagedCollection<User>,
    selected_user: Option<User>,
    loading: bool,
    error: Option<String>,
    page_size: usize,
}

impl UsersState {
    pub fn new(page_size: usize) -> Self {
        Self {
            collection: PagedCollection::new(),
            selected_user: None,
            loading: false,
            error: None,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        self.collection.offset()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.collection.has_more()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.selected_user.as_ref()
    }

    pub fn users(&self) -> &[User] {
        self.collection.items()
    }

    pub fn pending_originals(&self) -> usize {
        self.collection.pending_originals()
    }

    /// Value to restore if the write for `id` fails.
    pub fn take_snapshot(&mut self, id: UserId) -> Option<User> {
        self.collection.take_snapshot(&id)
    }

    /// Applies one event. Returns `true` when the view changed.
    pub fn reduce(&mut self, event: UsersEvent) -> bool {
        match event {
            UsersEvent::UserSelected(user) => {
                self.selected_user = user;
                true
            }
            UsersEvent::LocalUpdateApplied(user) => self.collection.apply_optimistic(user),
            UsersEvent::FetchPending => {
                self.loading = true;
                self.error = None;
                true
            }
            UsersEvent::FetchFulfilled(page) => {
                self.loading = false;
                self.collection.append_page(page, self.page_size);
                true
            }
            UsersEvent::FetchRejected(message) => {
                self.loading = false;
                self.error = Some(message);
                true
            }
            UsersEvent::UpdateRolledBack(snapshot) => self.collection.replace(snapshot).is_some(),
        }
    }

    pub fn view(&self) -> UsersView {
        UsersView {
            users: self.collection.items().to_vec(),
            selected_user: self.selected_user.clone(),
            loading: self.loading,
            has_more: self.collection.has_more(),
            error: self.error.clone(),
        }
    }
}
